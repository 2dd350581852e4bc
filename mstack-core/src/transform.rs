/// 4x4 transformation matrices in column-major order
use nalgebra::{Matrix4, Vector3, Vector4};
use std::fmt::Write;

/// A 4x4 homogeneous transform, 16 column-major `f32`.
///
/// `Matrix4` is a plain value: copies are always deep and each binding owns
/// its own storage.
pub type Matrix = Matrix4<f32>;

/// Stateless builders and combinators for transformation matrices.
///
/// All rotation angles are in radians.
pub struct Transform;

impl Transform {
    pub fn identity() -> Matrix {
        Matrix4::identity()
    }

    /// Deep copy of `matrix`
    pub fn copy(matrix: &Matrix) -> Matrix {
        *matrix
    }

    /// Column-order product `a · b`; `b` is applied to a point first
    pub fn multiply(a: &Matrix, b: &Matrix) -> Matrix {
        a * b
    }

    /// Create a translation matrix, (x, y, z) in the last column
    pub fn translation_matrix(x: f32, y: f32, z: f32) -> Matrix {
        Matrix4::new_translation(&Vector3::new(x, y, z))
    }

    pub fn rotation_x(angle: f32) -> Matrix {
        Matrix4::new_rotation(Vector3::new(angle, 0.0, 0.0))
    }

    pub fn rotation_y(angle: f32) -> Matrix {
        Matrix4::new_rotation(Vector3::new(0.0, angle, 0.0))
    }

    pub fn rotation_z(angle: f32) -> Matrix {
        Matrix4::new_rotation(Vector3::new(0.0, 0.0, angle))
    }

    /// Create a rotation matrix from Euler angles.
    ///
    /// Returns `RotX · RotY · RotZ`: a point is rotated about Z first, then Y,
    /// then X.
    pub fn rotation_matrix(euler: &Vector3<f32>) -> Matrix {
        let rx = Self::rotation_x(euler.x);
        let ry = Self::rotation_y(euler.y);
        let rz = Self::rotation_z(euler.z);

        rx * ry * rz
    }

    /// Create a diagonal scale matrix
    pub fn scale_matrix(sx: f32, sy: f32, sz: f32) -> Matrix {
        Matrix4::new_nonuniform_scaling(&Vector3::new(sx, sy, sz))
    }

    /// Create a model-view-projection matrix
    pub fn mvp_matrix(model: &Matrix, view: &Matrix, projection: &Matrix) -> Matrix {
        projection * view * model
    }

    /// Compute `matrix · point` for a homogeneous point
    pub fn transform_point(matrix: &Matrix, point: [f32; 4]) -> [f32; 4] {
        let v = matrix * Vector4::from(point);
        [v.x, v.y, v.z, v.w]
    }

    /// Render the 16 entries as four rows, in the order they appear on paper
    pub fn debug_format(matrix: &Matrix) -> String {
        let mut out = String::with_capacity(4 * 4 * 12);
        for row in 0..4 {
            out.push('[');
            for col in 0..4 {
                if col > 0 {
                    out.push(' ');
                }
                // Writing into a String cannot fail
                let _ = write!(out, "{:>10.4}", matrix[(row, col)]);
            }
            out.push_str("]\n");
        }
        out
    }
}
