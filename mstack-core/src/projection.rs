/// Perspective and frustum projection matrices
///
/// Both builders follow the OpenGL convention: the camera looks down -Z and
/// clip-space depth spans -1..1. Degenerate parameters are rejected instead of
/// producing a matrix full of NaNs.
use nalgebra::Matrix4;

use crate::error::{ProjectionError, Result, TransformError};
use crate::transform::Matrix;

/// A projection described by value
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Projection {
    /// Symmetric perspective, vertical field of view in degrees
    Perspective {
        fovy_degrees: f32,
        aspect: f32,
        near: f32,
        far: f32,
    },
    /// Off-axis perspective bounded by the near-plane rectangle
    Frustum {
        left: f32,
        right: f32,
        bottom: f32,
        top: f32,
        near: f32,
        far: f32,
    },
}

impl Projection {
    /// Build the projection matrix
    pub fn matrix(&self) -> Result<Matrix> {
        match *self {
            Projection::Perspective {
                fovy_degrees,
                aspect,
                near,
                far,
            } => perspective(fovy_degrees, aspect, near, far),
            Projection::Frustum {
                left,
                right,
                bottom,
                top,
                near,
                far,
            } => frustum(left, right, bottom, top, near, far),
        }
    }
}

/// Symmetric perspective projection.
///
/// Fails when `near <= 0`, `far <= near`, `aspect <= 0` or the field of view
/// lies outside (0, 180) degrees.
pub fn perspective(fovy_degrees: f32, aspect: f32, near: f32, far: f32) -> Result<Matrix> {
    if ![fovy_degrees, aspect, near, far].iter().all(|v| v.is_finite()) {
        return Err(ProjectionError::NonFinite.into());
    }
    if !(fovy_degrees > 0.0 && fovy_degrees < 180.0) {
        return Err(ProjectionError::FieldOfViewOutOfRange(fovy_degrees).into());
    }
    if aspect <= 0.0 {
        return Err(ProjectionError::NonPositiveAspect(aspect).into());
    }
    check_depth_range(near, far)?;

    let ymax = near * (fovy_degrees.to_radians() / 2.0).tan();
    let xmax = ymax * aspect;
    frustum(-xmax, xmax, -ymax, ymax, near, far)
}

/// General off-axis perspective projection (`glFrustum` layout).
pub fn frustum(
    left: f32,
    right: f32,
    bottom: f32,
    top: f32,
    near: f32,
    far: f32,
) -> Result<Matrix> {
    if ![left, right, bottom, top, near, far].iter().all(|v| v.is_finite()) {
        return Err(ProjectionError::NonFinite.into());
    }
    if right <= left {
        return Err(empty_range("horizontal", left, right));
    }
    if top <= bottom {
        return Err(empty_range("vertical", bottom, top));
    }
    check_depth_range(near, far)?;

    let width = right - left;
    let height = top - bottom;
    let depth = far - near;

    #[rustfmt::skip]
    let matrix = Matrix4::new(
        2.0 * near / width, 0.0,                 (right + left) / width,  0.0,
        0.0,                2.0 * near / height, (top + bottom) / height, 0.0,
        0.0,                0.0,                 -(far + near) / depth,   -2.0 * far * near / depth,
        0.0,                0.0,                 -1.0,                    0.0,
    );
    Ok(matrix)
}

fn check_depth_range(near: f32, far: f32) -> Result<()> {
    if near <= 0.0 {
        return Err(ProjectionError::NonPositiveNear(near).into());
    }
    if far <= near {
        return Err(ProjectionError::FarNotBeyondNear { near, far }.into());
    }
    Ok(())
}

fn empty_range(axis: &'static str, min: f32, max: f32) -> TransformError {
    ProjectionError::EmptyRange { axis, min, max }.into()
}
