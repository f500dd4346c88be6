//! Errors raised while assembling a scene.

use thiserror::Error;

/// Invalid geometry handed over by a scene loader.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SceneError {
    #[error("non-finite coordinate in {0}")]
    NonFinite(&'static str),

    #[error("sphere radius must not be negative, got {0}")]
    NegativeRadius(f32),

    #[error("sphere thickness must lie within [0, 1], got {0}")]
    Thickness(f32),

    #[error("mesh index count {0} is not a multiple of 3")]
    MeshIndexCount(usize),

    #[error("mesh index {index} out of range for {vertices} vertices")]
    MeshIndex { index: u32, vertices: usize },
}

/// Result type for scene assembly.
pub type SceneResult<T> = Result<T, SceneError>;
