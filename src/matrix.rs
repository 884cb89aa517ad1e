//! The five transformation families, their parameters and the 2x2 matrix they build.

use std::collections::{BTreeMap, HashSet};
use std::f64::consts::FRAC_PI_4;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{ParamWarning, Result, TransformError};
use crate::library::{Vector2, dot};
use crate::linalg::{self, Matrix};
use crate::space::PointSet;

/// Untyped parameter tables as they come from a config file:
/// transformation name -> parameter name -> value.
pub type RawParams = BTreeMap<String, BTreeMap<String, f64>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransformKind {
    Rotation,
    Scaling,
    Shearing,
    Reflection,
    Collapse,
}

impl TransformKind {
    pub const ALL: [TransformKind; 5] = [
        TransformKind::Rotation,
        TransformKind::Scaling,
        TransformKind::Shearing,
        TransformKind::Reflection,
        TransformKind::Collapse,
    ];

    pub fn name(self) -> &'static str {
        match self {
            TransformKind::Rotation => "rotation",
            TransformKind::Scaling => "scaling",
            TransformKind::Shearing => "shearing",
            TransformKind::Reflection => "reflection",
            TransformKind::Collapse => "collapse",
        }
    }

    /// Parameter names this kind reads, in the order they appear in its formula.
    pub fn parameter_names(self) -> &'static [&'static str] {
        match self {
            TransformKind::Rotation => &["angle"],
            TransformKind::Scaling => &["scale_x", "scale_y"],
            TransformKind::Shearing => &["shear_x", "shear_y"],
            TransformKind::Reflection | TransformKind::Collapse => &[],
        }
    }

    /// "Rotation", "Scaling", ...
    pub fn title(self) -> String {
        let name = self.name();
        name[..1].to_ascii_uppercase() + &name[1..]
    }
}

impl fmt::Display for TransformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TransformKind {
    type Err = TransformError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| TransformError::UnsupportedTransform(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rotation {
    pub angle: f64,
}

impl Default for Rotation {
    fn default() -> Self {
        Rotation { angle: FRAC_PI_4 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Scaling {
    pub scale_x: f64,
    pub scale_y: f64,
}

impl Default for Scaling {
    fn default() -> Self {
        Scaling {
            scale_x: 2.0,
            scale_y: 3.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Shearing {
    pub shear_x: f64,
    pub shear_y: f64,
}

impl Default for Shearing {
    fn default() -> Self {
        Shearing {
            shear_x: 1.0,
            shear_y: 0.0,
        }
    }
}

/// Parameters for every kind that takes any. Reflection and collapse are fixed.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TransformParams {
    pub rotation: Rotation,
    pub scaling: Scaling,
    pub shearing: Shearing,
}

impl TransformParams {
    /// Validates raw parameter tables.
    ///
    /// Every key must name a [`TransformKind`]. Missing sub-keys fall back to
    /// their defaults and unknown sub-keys are dropped; both are reported back
    /// as warnings rather than errors. Keys match case-insensitively, so
    /// `Rotation` and `rotation` are the same table: the later one in key order
    /// wins and a warning says so.
    pub fn from_raw(raw: &RawParams) -> Result<(TransformParams, Vec<ParamWarning>)> {
        let mut params = TransformParams::default();
        let mut warnings = Vec::new();
        let mut seen = HashSet::new();

        for (key, table) in raw {
            let kind: TransformKind =
                key.parse().map_err(|_| TransformError::UnknownParameterKey {
                    key: key.clone(),
                    available: TransformKind::ALL.map(TransformKind::name).join(", "),
                })?;
            if !seen.insert(kind) {
                warnings.push(ParamWarning::DuplicateTable {
                    kind: kind.name().to_string(),
                    key: key.clone(),
                });
            }

            let expected = kind.parameter_names();
            for &name in expected {
                if !table.contains_key(name) {
                    warnings.push(ParamWarning::MissingSubParameter {
                        kind: kind.name().to_string(),
                        key: name,
                    });
                }
            }
            for name in table.keys() {
                if !expected.iter().any(|e| *e == name.as_str()) {
                    warnings.push(ParamWarning::UnexpectedSubParameter {
                        kind: kind.name().to_string(),
                        key: name.clone(),
                    });
                }
            }

            let get = |name: &str, default: f64| table.get(name).copied().unwrap_or(default);
            match kind {
                TransformKind::Rotation => {
                    params.rotation.angle = get("angle", params.rotation.angle);
                }
                TransformKind::Scaling => {
                    params.scaling.scale_x = get("scale_x", params.scaling.scale_x);
                    params.scaling.scale_y = get("scale_y", params.scaling.scale_y);
                }
                TransformKind::Shearing => {
                    params.shearing.shear_x = get("shear_x", params.shearing.shear_x);
                    params.shearing.shear_y = get("shear_y", params.shearing.shear_y);
                }
                TransformKind::Reflection | TransformKind::Collapse => {}
            }
        }

        for warning in &warnings {
            warn!("{warning}");
        }
        Ok((params, warnings))
    }
}

/// A 2x2 matrix, row-major, with its determinant computed once up front.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TransformMatrix {
    rows: [[f64; 2]; 2],
    determinant: f64,
}

impl TransformMatrix {
    pub fn from_rows(rows: [[f64; 2]; 2]) -> TransformMatrix {
        let [[a, b], [c, d]] = rows;
        TransformMatrix {
            rows,
            determinant: a * d - b * c,
        }
    }

    pub fn identity() -> TransformMatrix {
        TransformMatrix::from_rows([[1.0, 0.0], [0.0, 1.0]])
    }

    pub fn build(kind: TransformKind, params: &TransformParams) -> TransformMatrix {
        let rows = match kind {
            TransformKind::Rotation => {
                let (sin, cos) = params.rotation.angle.sin_cos();
                [[cos, -sin], [sin, cos]]
            }
            TransformKind::Scaling => {
                let Scaling { scale_x, scale_y } = params.scaling;
                [[scale_x, 0.0], [0.0, scale_y]]
            }
            TransformKind::Shearing => {
                let Shearing { shear_x, shear_y } = params.shearing;
                [[1.0, shear_x], [shear_y, 1.0]]
            }
            TransformKind::Reflection => [[1.0, 0.0], [0.0, -1.0]],
            TransformKind::Collapse => [[1.0, 1.0], [2.0, 2.0]],
        };
        let matrix = TransformMatrix::from_rows(rows);
        info!(%kind, det = matrix.determinant, "built transformation matrix");
        matrix
    }

    pub fn rows(&self) -> [[f64; 2]; 2] {
        self.rows
    }

    pub fn determinant(&self) -> f64 {
        self.determinant
    }

    /// True when the determinant is zero up to rounding.
    pub fn is_singular(&self) -> bool {
        linalg::is_negligible_determinant(self.determinant, self.rows.iter().map(|r| r.as_slice()))
    }

    pub fn apply_point(&self, point: Vector2) -> Vector2 {
        [dot(self.rows[0], point), dot(self.rows[1], point)]
    }

    /// Maps every point of `points` through the matrix, keeping their order.
    pub fn apply(&self, points: &PointSet) -> PointSet {
        PointSet::from_points(points.iter().map(|p| self.apply_point(p)))
    }

    /// Images of the standard basis vectors, i.e. the matrix columns.
    pub fn basis_images(&self) -> [Vector2; 2] {
        [self.apply_point([1.0, 0.0]), self.apply_point([0.0, 1.0])]
    }

    /// `self * other`: applying the result is applying `other`, then `self`.
    pub fn compose(&self, other: &TransformMatrix) -> TransformMatrix {
        let [r0, r1] = self.rows;
        let [c0, c1] = other.basis_images();
        TransformMatrix::from_rows([[dot(r0, c0), dot(r0, c1)], [dot(r1, c0), dot(r1, c1)]])
    }

    pub fn inverse(&self) -> Result<TransformMatrix> {
        let inv = self.to_matrix().inverse()?;
        let r = inv.rows();
        Ok(TransformMatrix::from_rows([[r[0][0], r[0][1]], [r[1][0], r[1][1]]]))
    }

    pub fn to_matrix(&self) -> Matrix {
        Matrix::from(self.rows)
    }

    pub fn approx_eq(&self, other: &TransformMatrix, tolerance: f64) -> bool {
        self.rows
            .iter()
            .flatten()
            .zip(other.rows.iter().flatten())
            .all(|(a, b)| (a - b).abs() <= tolerance)
    }
}

impl fmt::Display for TransformMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [[a, b], [c, d]] = self.rows;
        writeln!(f, "⎡{a:8.3}  {b:8.3}⎤")?;
        write!(f, "⎣{c:8.3}  {d:8.3}⎦")
    }
}
