//! 2D linear transformations for teaching purposes.
//!
//! A [`Transform2D`] samples a small vector space (a grid or a ring of points),
//! builds one of five named 2x2 matrices and maps every point through it.
//! The [`linalg`] module carries the general square-matrix helpers and
//! [`library`] the plain vector arithmetic everything else leans on.
//!
//! Two small mechanics simulations ride along: [`projectile`] samples a throw
//! over flat ground and [`spring_block`] an inelastic hit on a sprung block.
//! Both write their series as JSON for plotting.

pub mod error;
pub mod export;
pub mod linalg;
pub mod matrix;
pub mod projectile;
pub mod space;
pub mod spring_block;
pub mod transform;

pub use error::{ParamWarning, Result, TransformError};
pub use matrix::{TransformKind, TransformMatrix, TransformParams};
pub use space::{PointSet, VectorSpaceKind};
pub use transform::{Transform2D, TransformConfig};

pub mod library {
    pub type Vector2 = [f64; 2];
    pub type Vector3 = [f64; 3];

    pub fn dot(vec1: Vector2, vec2: Vector2) -> f64 {
        vec1[0] * vec2[0] + vec1[1] * vec2[1]
    }

    pub fn get_magnitude(vec: Vector2) -> f64 {
        (vec[0].powi(2) + vec[1].powi(2)).sqrt()
    }

    pub fn normalize(vec: Vector2) -> Vector2 {
        let mag = get_magnitude(vec);
        if mag == 0.0 {
            return [0.0, 0.0];
        }
        [vec[0] / mag, vec[1] / mag]
    }

    pub fn find_vector(x: Vector2, y: Vector2) -> Vector2 {
        [y[0] - x[0], y[1] - x[1]]
    }

    pub fn find_normal(x: Vector2, y: Vector2) -> Vector2 {
        let vec = normalize(find_vector(x, y));
        [-vec[1], vec[0]]
    }

    pub fn dot3(a: Vector3, b: Vector3) -> f64 {
        a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
    }

    pub fn length3(vec: Vector3) -> f64 {
        dot3(vec, vec).sqrt()
    }

    pub fn unit3(vec: Vector3) -> Vector3 {
        let len = length3(vec);
        if len == 0.0 {
            return [0.0, 0.0, 0.0];
        }
        [vec[0] / len, vec[1] / len, vec[2] / len]
    }

    pub fn cross3(a: Vector3, b: Vector3) -> Vector3 {
        [
            a[1] * b[2] - a[2] * b[1],
            a[2] * b[0] - a[0] * b[2],
            a[0] * b[1] - a[1] * b[0],
        ]
    }

    /// Dot product of `a` and `b` together with the angle between them, in radians.
    ///
    /// The cosine is clamped to `[-1, 1]` so rounding on (anti)parallel vectors
    /// cannot push `acos` out of its domain.
    pub fn dot_with_angle(a: Vector3, b: Vector3) -> crate::Result<(f64, f64)> {
        let lengths = length3(a) * length3(b);
        if lengths == 0.0 {
            return Err(crate::TransformError::ZeroLengthVector);
        }
        let dot = dot3(a, b);
        let theta = (dot / lengths).clamp(-1.0, 1.0).acos();
        Ok((dot, theta))
    }

}
