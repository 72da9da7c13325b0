//! Zone sampling the vertices of a host geometry

use std::rc::Rc;

use crate::config::ZoneConfig;
use crate::foundation::math::Vec3;
use crate::foundation::random::MathRandom;
use crate::scene::{Geometry, Mesh, SceneObject};
use crate::zone::{CrossType, Zone, ZoneCapabilities, ZoneError, ZoneKind};

/// Where a [`MeshZone`] takes its geometry from
#[derive(Debug, Clone)]
pub enum ZoneBounds<'a> {
    /// A bare geometry
    Geometry(Rc<Geometry>),
    /// A mesh, using its geometry
    Mesh(&'a Mesh),
    /// A composite object; the first geometry found depth-first is used
    Object(&'a SceneObject),
}

impl ZoneBounds<'_> {
    fn resolve(&self) -> Option<Rc<Geometry>> {
        match self {
            Self::Geometry(geometry) => Some(Rc::clone(geometry)),
            Self::Mesh(mesh) => Some(Rc::clone(&mesh.geometry)),
            Self::Object(object) => object.find_geometry(),
        }
    }
}

impl From<Rc<Geometry>> for ZoneBounds<'_> {
    fn from(geometry: Rc<Geometry>) -> Self {
        Self::Geometry(geometry)
    }
}

impl<'a> From<&'a Mesh> for ZoneBounds<'a> {
    fn from(mesh: &'a Mesh) -> Self {
        Self::Mesh(mesh)
    }
}

impl<'a> From<&'a SceneObject> for ZoneBounds<'a> {
    fn from(object: &'a SceneObject) -> Self {
        Self::Object(object)
    }
}

/// Positions drawn from the vertex list of a geometry
///
/// Every vertex is equally likely, so densely tessellated areas of the
/// surface receive proportionally more particles. Only sampling is
/// supported; the boundary behaviours log a warning and do nothing.
#[derive(Debug, Clone)]
pub struct MeshZone {
    geometry: Rc<Geometry>,
    /// Uniform factor applied to sampled vertices
    pub scale: f32,
    cross_type: CrossType,
    vector: Vec3,
}

impl MeshZone {
    /// Build a zone from `bounds`, scaling sampled vertices by `scale`
    pub fn new<'a>(bounds: impl Into<ZoneBounds<'a>>, scale: f32) -> Result<Self, ZoneError> {
        let geometry = bounds.into().resolve().ok_or(ZoneError::MissingGeometry)?;
        if geometry.vertex_count() == 0 {
            return Err(ZoneError::EmptyGeometry);
        }

        log::debug!("MeshZone sampling {} vertices", geometry.vertex_count());
        Ok(Self {
            geometry,
            scale,
            cross_type: CrossType::default(),
            vector: Vec3::zeros(),
        })
    }

    /// Build a zone using the configured default scale
    pub fn from_config<'a>(
        bounds: impl Into<ZoneBounds<'a>>,
        config: &ZoneConfig,
    ) -> Result<Self, ZoneError> {
        Self::new(bounds, config.default_mesh_scale)
    }

    /// Builder: select the [`Zone::crossing`] behaviour
    #[must_use]
    pub fn with_cross_type(mut self, cross_type: CrossType) -> Self {
        self.cross_type = cross_type;
        self
    }

    /// Sampled geometry
    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// Last sampled position
    pub fn last_position(&self) -> Vec3 {
        self.vector
    }
}

impl Zone for MeshZone {
    fn kind(&self) -> ZoneKind {
        ZoneKind::Mesh
    }

    fn capabilities(&self) -> ZoneCapabilities {
        ZoneCapabilities::SAMPLING
    }

    fn cross_type(&self) -> CrossType {
        self.cross_type
    }

    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    fn get_position(&mut self, rng: &mut MathRandom) -> Vec3 {
        let count = self.geometry.vertex_count();
        let index = ((count as f64 * rng.random()) as usize).min(count - 1);

        // Construction guarantees a non-empty vertex list
        if let Some(vertex) = self.geometry.vertex(index) {
            self.vector = vertex * self.scale;
        }
        self.vector
    }
}
