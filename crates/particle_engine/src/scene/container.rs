//! Scene membership for leased render targets

slotmap::new_key_type! {
    /// Handle to a render target node leased from a renderer's pool
    pub struct TargetKey;
}

/// Host container that render targets are attached to while visible
///
/// Implementations only track membership. The node data itself stays with
/// the renderer that leased it and is read back through
/// [`crate::render::MeshRenderer::target`].
pub trait SceneContainer {
    /// Attach a target; attaching an already attached target is a no-op
    fn add(&mut self, target: TargetKey);

    /// Detach a target, returning whether it was attached
    fn remove(&mut self, target: TargetKey) -> bool;

    /// Whether the target is currently attached
    fn contains(&self, target: TargetKey) -> bool;

    /// Number of attached targets
    fn len(&self) -> usize;

    /// Whether nothing is attached
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Ordered container, the equivalent of a scene group node
#[derive(Debug, Default, Clone)]
pub struct Group {
    children: Vec<TargetKey>,
}

impl Group {
    /// Create an empty group
    pub fn new() -> Self {
        Self::default()
    }

    /// Attached targets in attachment order
    pub fn children(&self) -> &[TargetKey] {
        &self.children
    }
}

impl SceneContainer for Group {
    fn add(&mut self, target: TargetKey) {
        if !self.children.contains(&target) {
            self.children.push(target);
        }
    }

    fn remove(&mut self, target: TargetKey) -> bool {
        if let Some(index) = self.children.iter().position(|child| *child == target) {
            self.children.remove(index);
            true
        } else {
            false
        }
    }

    fn contains(&self, target: TargetKey) -> bool {
        self.children.contains(&target)
    }

    fn len(&self) -> usize {
        self.children.len()
    }
}
