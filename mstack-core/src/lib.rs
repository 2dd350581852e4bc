/// mstack Core Library - Matrix math and the hierarchical transform stack
/// 
/// This library provides stateless 4x4 matrix builders (translation, rotation,
/// scale, perspective and frustum projection) and a push/pop transform stack
/// that commits staged scale/rotate/translate deltas into its top matrix.

pub mod error;
pub mod projection;
pub mod stack;
pub mod transform;

// Re-export commonly used types
pub use error::{ProjectionError, Result, TransformError};
pub use projection::{frustum, perspective, Projection};
pub use stack::{PendingTransform, ScopedTransform, StackConfig, TransformStack};
pub use transform::{Matrix, Transform};
