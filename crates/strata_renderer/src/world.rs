//! A scene paired with a swappable hierarchy.
//!
//! Renders take a snapshot (`Arc<Hierarchy>`) up front and keep it for their
//! whole run. `optimize` builds the replacement without holding the lock and
//! only swaps the pointer at the end, so a render in flight never observes a
//! half-built tree.

use std::sync::{Arc, PoisonError, RwLock};

use strata_core::Scene;

use crate::accel::{build_hierarchy, AccelConfig};
use crate::camera::Camera;
use crate::error::{BuildResult, ConfigError};
use crate::hierarchy::Hierarchy;
use crate::renderer::{render, RenderConfig, RenderOutput};

pub struct World {
    scene: Arc<Scene>,
    hierarchy: RwLock<Arc<Hierarchy>>,
}

impl World {
    /// Wrap `scene` with a flat (unoptimised) hierarchy.
    pub fn new(scene: Scene) -> BuildResult<Self> {
        let hierarchy = Hierarchy::flat(&scene)?;
        Ok(Self {
            scene: Arc::new(scene),
            hierarchy: RwLock::new(Arc::new(hierarchy)),
        })
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// The hierarchy currently installed.
    pub fn snapshot(&self) -> Arc<Hierarchy> {
        let guard = self.hierarchy.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    /// Rebuild the hierarchy and install it. The previous one stays alive
    /// for as long as a snapshot of it is held.
    pub fn optimize(&self, config: &AccelConfig) -> BuildResult<Arc<Hierarchy>> {
        let built = Arc::new(build_hierarchy(&self.scene, config)?);
        {
            let mut guard = self.hierarchy.write().unwrap_or_else(PoisonError::into_inner);
            *guard = Arc::clone(&built);
        }
        log::info!("Installed {} hierarchy ({} nodes)", built.strategy(), built.nodes().len());
        Ok(built)
    }

    /// Render against whatever hierarchy is installed when the call starts.
    pub fn render(&self, camera: &Camera, config: &RenderConfig) -> Result<RenderOutput, ConfigError> {
        let hierarchy = self.snapshot();
        render(&self.scene, &hierarchy, camera, config)
    }
}
