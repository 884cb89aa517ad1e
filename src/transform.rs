//! [`Transform2D`]: a sampled vector space pushed through one 2x2 matrix.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{ParamWarning, Result};
use crate::matrix::{RawParams, TransformKind, TransformMatrix, TransformParams};
use crate::space::{self, PointSet, VectorSpaceKind};

pub const DEFAULT_POINTS: usize = 100;
pub const DEFAULT_OUTPUT: &str = "figures/default.bmp";

/// Everything needed to build a [`Transform2D`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransformConfig {
    pub kind: TransformKind,
    pub vector_space: VectorSpaceKind,
    /// Requested number of sample points.
    pub n: usize,
    /// Where the renderer should write the picture.
    pub output: PathBuf,
    /// Seed for rectangular sampling. `None` gives a different draw every run.
    pub seed: Option<u64>,
    pub params: RawParams,
}

/// On-disk shape of a config file. Kind names stay strings here so bad names
/// surface as the crate's own errors instead of serde's.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    kind: String,
    vector_space: Option<String>,
    n: Option<usize>,
    output: Option<PathBuf>,
    seed: Option<u64>,
    #[serde(default)]
    params: RawParams,
}

impl TransformConfig {
    pub fn new(kind: TransformKind, vector_space: VectorSpaceKind) -> TransformConfig {
        TransformConfig {
            kind,
            vector_space,
            n: DEFAULT_POINTS,
            output: PathBuf::from(DEFAULT_OUTPUT),
            seed: None,
            params: RawParams::new(),
        }
    }

    pub fn with_points(mut self, n: usize) -> Self {
        self.n = n;
        self
    }

    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = output.into();
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets one parameter, e.g. `with_param("rotation", "angle", 1.0)`.
    /// Names are checked when the transform is built.
    pub fn with_param(mut self, kind: &str, key: &str, value: f64) -> Self {
        self.params
            .entry(kind.to_string())
            .or_default()
            .insert(key.to_string(), value);
        self
    }

    pub fn from_toml_str(text: &str) -> Result<TransformConfig> {
        let file: ConfigFile = toml::from_str(text)?;
        let vector_space = match file.vector_space {
            Some(name) => name.parse()?,
            None => VectorSpaceKind::Rectangular,
        };
        Ok(TransformConfig {
            kind: file.kind.parse()?,
            vector_space,
            n: file.n.unwrap_or(DEFAULT_POINTS),
            output: file.output.unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT)),
            seed: file.seed,
            params: file.params,
        })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<TransformConfig> {
        let text = fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}

#[derive(Debug, Clone)]
pub struct Transform2D {
    kind: TransformKind,
    vector_space: VectorSpaceKind,
    output: PathBuf,
    params: TransformParams,
    warnings: Vec<ParamWarning>,
    matrix: TransformMatrix,
    source: PointSet,
    image: PointSet,
}

impl Transform2D {
    /// Validates `config`, samples the vector space, builds the matrix and
    /// applies it. Nothing is returned unless every step succeeds.
    pub fn new(config: TransformConfig) -> Result<Transform2D> {
        let (params, warnings) = TransformParams::from_raw(&config.params)?;
        let source = space::generate(config.vector_space, config.n, config.seed)?;
        let matrix = TransformMatrix::build(config.kind, &params);
        let image = matrix.apply(&source);

        info!(
            kind = %config.kind,
            space = %config.vector_space,
            points = source.len(),
            det = matrix.determinant(),
            "{} transformation ready",
            config.kind.title()
        );

        Ok(Transform2D {
            kind: config.kind,
            vector_space: config.vector_space,
            output: config.output,
            params,
            warnings,
            matrix,
            source,
            image,
        })
    }

    /// Shorthand for the common case of default output path and no seed.
    pub fn from_parts(
        kind: TransformKind,
        vector_space: VectorSpaceKind,
        n: usize,
        params: RawParams,
    ) -> Result<Transform2D> {
        let mut config = TransformConfig::new(kind, vector_space).with_points(n);
        config.params = params;
        Transform2D::new(config)
    }

    /// Replaces the source points and recomputes their image.
    pub fn apply_transform(&mut self, points: PointSet) -> &PointSet {
        self.image = self.matrix.apply(&points);
        self.source = points;
        &self.image
    }

    pub fn kind(&self) -> TransformKind {
        self.kind
    }

    pub fn vector_space(&self) -> VectorSpaceKind {
        self.vector_space
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    pub fn params(&self) -> &TransformParams {
        &self.params
    }

    pub fn warnings(&self) -> &[ParamWarning] {
        &self.warnings
    }

    pub fn matrix(&self) -> &TransformMatrix {
        &self.matrix
    }

    pub fn determinant(&self) -> f64 {
        self.matrix.determinant()
    }

    pub fn source(&self) -> &PointSet {
        &self.source
    }

    pub fn image(&self) -> &PointSet {
        &self.image
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TransformError;

    #[test]
    fn config_defaults() {
        let config = TransformConfig::new(TransformKind::Rotation, VectorSpaceKind::Circular);
        assert_eq!(config.n, 100);
        assert_eq!(config.output, PathBuf::from("figures/default.bmp"));
        assert!(config.seed.is_none());
        assert!(config.params.is_empty());
    }

    #[test]
    fn config_from_toml() {
        let config = TransformConfig::from_toml_str(
            r#"
            kind = "shearing"
            vector_space = "circular"
            n = 400
            output = "figures/shear.bmp"
            seed = 7

            [params.shearing]
            shear_x = 0.5
            shear_y = 0
            "#,
        )
        .unwrap();
        assert_eq!(config.kind, TransformKind::Shearing);
        assert_eq!(config.vector_space, VectorSpaceKind::Circular);
        assert_eq!(config.n, 400);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.params["shearing"]["shear_x"], 0.5);
        assert_eq!(config.params["shearing"]["shear_y"], 0.0);
    }

    #[test]
    fn config_file_kind_names_use_crate_errors() {
        let err = TransformConfig::from_toml_str("kind = \"shrink\"").unwrap_err();
        assert!(matches!(err, TransformError::UnsupportedTransform(_)));
        let err =
            TransformConfig::from_toml_str("kind = \"rotation\"\nvector_space = \"hex\"").unwrap_err();
        assert!(matches!(err, TransformError::InvalidDomain(_)));
        let err = TransformConfig::from_toml_str("kind = \"rotation\"\nsize = 3").unwrap_err();
        assert!(matches!(err, TransformError::Config(_)));
    }

    #[test]
    fn unknown_parameter_key_fails_construction() {
        let config = TransformConfig::new(TransformKind::Scaling, VectorSpaceKind::Circular)
            .with_param("zoom", "factor", 2.0);
        let err = Transform2D::new(config).unwrap_err();
        assert!(matches!(err, TransformError::UnknownParameterKey { .. }));
    }

    #[test]
    fn warnings_are_kept_on_the_transform() {
        let config = TransformConfig::new(TransformKind::Shearing, VectorSpaceKind::Circular)
            .with_param("shearing", "shear_y", 0.5);
        let t = Transform2D::new(config).unwrap();
        assert_eq!(t.warnings().len(), 1);
        assert_eq!(t.matrix().rows(), [[1.0, 1.0], [0.5, 1.0]]);
    }

    #[test]
    fn apply_transform_replaces_source() {
        let mut t = Transform2D::from_parts(
            TransformKind::Collapse,
            VectorSpaceKind::Circular,
            12,
            RawParams::new(),
        )
        .unwrap();
        let points = PointSet::from_points([[1.0, 1.0], [0.0, -1.0]]);
        let image = t.apply_transform(points.clone()).clone();
        assert_eq!(image, PointSet::from_points([[2.0, 4.0], [-1.0, -2.0]]));
        assert_eq!(t.source(), &points);
        assert_eq!(t.image(), &image);
    }
}
