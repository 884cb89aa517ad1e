//! JSON artifacts for external plotting tools.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::error::Result;
use crate::library::{self, Vector2, Vector3};
use crate::matrix::TransformKind;
use crate::space::VectorSpaceKind;
use crate::transform::Transform2D;

/// Everything a plot of a [`Transform2D`] needs.
#[derive(Debug, Clone, Serialize)]
pub struct TransformSnapshot {
    pub kind: TransformKind,
    pub vector_space: VectorSpaceKind,
    pub matrix: [[f64; 2]; 2],
    pub determinant: f64,
    pub basis_images: [Vector2; 2],
    pub source: Coordinates,
    pub image: Coordinates,
}

#[derive(Debug, Clone, Serialize)]
pub struct Coordinates {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

impl TransformSnapshot {
    pub fn from_transform(transform: &Transform2D) -> TransformSnapshot {
        let coords = |set: &crate::PointSet| Coordinates {
            x: set.xs().to_vec(),
            y: set.ys().to_vec(),
        };
        TransformSnapshot {
            kind: transform.kind(),
            vector_space: transform.vector_space(),
            matrix: transform.matrix().rows(),
            determinant: transform.determinant(),
            basis_images: transform.matrix().basis_images(),
            source: coords(transform.source()),
            image: coords(transform.image()),
        }
    }

    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<()> {
        write_json(self, path.as_ref())
    }
}

/// A pair of 3D vectors with the quantities the vector plot annotates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VectorReport {
    #[serde(rename = "Vector A")]
    pub a: Vector3,
    #[serde(rename = "Vector B")]
    pub b: Vector3,
    #[serde(rename = "Vector A Length")]
    pub length_a: f64,
    #[serde(rename = "Vector B Length")]
    pub length_b: f64,
    #[serde(rename = "Dot Product")]
    pub dot_product: f64,
    #[serde(rename = "Angle (radians)")]
    pub angle: f64,
    #[serde(rename = "Cross Product")]
    pub cross_product: Vector3,
}

impl VectorReport {
    pub fn new(a: Vector3, b: Vector3) -> Result<VectorReport> {
        let (dot_product, angle) = library::dot_with_angle(a, b)?;
        Ok(VectorReport {
            a,
            b,
            length_a: library::length3(a),
            length_b: library::length3(b),
            dot_product,
            angle,
            cross_product: library::cross3(a, b),
        })
    }

    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<()> {
        write_json(self, path.as_ref())
    }
}

/// Pretty-prints `value` to `path`, creating missing parent directories.
pub(crate) fn write_json<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(writer, value)?;
    info!(path = %path.display(), "data written");
    Ok(())
}
