/// Error types for matrix construction and stack discipline
use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, TransformError>;

/// Failures reported by the transform stack and projection builders
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransformError {
    #[error("Matrix stack underflow: cannot pop the base matrix")]
    StackUnderflow,

    #[error("Matrix stack overflow: maximum depth {max_depth} exceeded")]
    StackOverflow { max_depth: usize },

    #[error("Invalid projection: {0}")]
    InvalidProjection(#[from] ProjectionError),
}

/// The precondition a projection request violated
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProjectionError {
    #[error("near plane must be positive, got {0}")]
    NonPositiveNear(f32),

    #[error("far plane ({far}) must lie beyond near plane ({near})")]
    FarNotBeyondNear { near: f32, far: f32 },

    #[error("aspect ratio must be positive, got {0}")]
    NonPositiveAspect(f32),

    #[error("vertical field of view must be within (0, 180) degrees, got {0}")]
    FieldOfViewOutOfRange(f32),

    #[error("{axis} bounds are empty or reversed ({min} .. {max})")]
    EmptyRange {
        axis: &'static str,
        min: f32,
        max: f32,
    },

    #[error("projection parameters must be finite")]
    NonFinite,
}
