//! Geometry buffers and the scene objects that carry them

use std::rc::Rc;

use crate::foundation::math::Vec3;

/// Vertex position buffer, three floats per vertex
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Geometry {
    positions: Vec<f32>,
}

impl Geometry {
    /// Build from a flat `[x0, y0, z0, x1, ...]` buffer
    ///
    /// A trailing partial vertex is ignored.
    pub fn from_positions(positions: Vec<f32>) -> Self {
        Self { positions }
    }

    /// Build from vertex positions
    pub fn from_vertices(vertices: &[Vec3]) -> Self {
        Self {
            positions: vertices.iter().flat_map(|v| [v.x, v.y, v.z]).collect(),
        }
    }

    /// Corner vertices of an axis-aligned box centered on the origin
    pub fn cuboid(width: f32, height: f32, depth: f32) -> Self {
        let (hx, hy, hz) = (width * 0.5, height * 0.5, depth * 0.5);
        let mut vertices = Vec::with_capacity(8);
        for x in [-hx, hx] {
            for y in [-hy, hy] {
                for z in [-hz, hz] {
                    vertices.push(Vec3::new(x, y, z));
                }
            }
        }
        Self::from_vertices(&vertices)
    }

    /// A single quad in the XY plane, as used by sprites
    pub fn plane(width: f32, height: f32) -> Self {
        let (hx, hy) = (width * 0.5, height * 0.5);
        Self::from_vertices(&[
            Vec3::new(-hx, -hy, 0.0),
            Vec3::new(hx, -hy, 0.0),
            Vec3::new(hx, hy, 0.0),
            Vec3::new(-hx, hy, 0.0),
        ])
    }

    /// Number of complete vertices
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    /// Position of vertex `index`
    pub fn vertex(&self, index: usize) -> Option<Vec3> {
        let start = index.checked_mul(3)?;
        let xyz = self.positions.get(start..start + 3)?;
        Some(Vec3::new(xyz[0], xyz[1], xyz[2]))
    }

    /// Iterate all vertices
    pub fn vertices(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.positions
            .chunks_exact(3)
            .map(|xyz| Vec3::new(xyz[0], xyz[1], xyz[2]))
    }
}

/// Mesh-like object wrapping a shared geometry
#[derive(Debug, Clone)]
pub struct Mesh {
    /// Shared geometry
    pub geometry: Rc<Geometry>,
}

impl Mesh {
    /// Wrap a geometry
    pub fn new(geometry: Rc<Geometry>) -> Self {
        Self { geometry }
    }
}

/// Composite scene object with optional geometry and children
#[derive(Debug, Clone, Default)]
pub struct SceneObject {
    /// Debug name
    pub name: String,
    /// Geometry attached directly to this object
    pub geometry: Option<Rc<Geometry>>,
    /// Child objects
    pub children: Vec<SceneObject>,
}

impl SceneObject {
    /// Empty object
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Builder: attach geometry
    #[must_use]
    pub fn with_geometry(mut self, geometry: Rc<Geometry>) -> Self {
        self.geometry = Some(geometry);
        self
    }

    /// Builder: append a child
    #[must_use]
    pub fn with_child(mut self, child: SceneObject) -> Self {
        self.children.push(child);
        self
    }

    /// Visit this object and its descendants depth-first, parents first
    pub fn traverse<'a>(&'a self, visit: &mut impl FnMut(&'a SceneObject)) {
        visit(self);
        for child in &self.children {
            child.traverse(visit);
        }
    }

    /// First geometry found in traversal order
    pub fn find_geometry(&self) -> Option<Rc<Geometry>> {
        let mut found = None;
        self.traverse(&mut |object| {
            if found.is_none() {
                found = object.geometry.clone();
            }
        });
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_access() {
        let geometry = Geometry::from_positions(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]);

        assert_eq!(geometry.vertex_count(), 2);
        assert_eq!(geometry.vertex(1), Some(Vec3::new(4.0, 5.0, 6.0)));
        assert_eq!(geometry.vertex(2), None);
        assert_eq!(geometry.vertices().count(), 2);
    }

    #[test]
    fn test_cuboid_corners() {
        let geometry = Geometry::cuboid(2.0, 4.0, 6.0);

        assert_eq!(geometry.vertex_count(), 8);
        for v in geometry.vertices() {
            assert_eq!(v.x.abs(), 1.0);
            assert_eq!(v.y.abs(), 2.0);
            assert_eq!(v.z.abs(), 3.0);
        }
    }

    #[test]
    fn test_find_geometry_depth_first() {
        let deep = Rc::new(Geometry::cuboid(1.0, 1.0, 1.0));
        let shallow = Rc::new(Geometry::plane(1.0, 1.0));

        let root = SceneObject::new("root")
            .with_child(SceneObject::new("a").with_child(SceneObject::new("a1").with_geometry(deep.clone())))
            .with_child(SceneObject::new("b").with_geometry(shallow));

        let found = root.find_geometry().unwrap();
        assert!(Rc::ptr_eq(&found, &deep));
        assert!(SceneObject::new("empty").find_geometry().is_none());
    }
}
