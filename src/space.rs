//! Sampled vector spaces: a random draw from a square grid, or a ring of points.

use std::f64::consts::TAU;
use std::fmt;
use std::str::FromStr;

use rand::SeedableRng;
use rand::seq::index;
use rand_pcg::Pcg64;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{Result, TransformError};

/// Smallest number of samples per axis of the rectangular grid.
pub const MIN_GRID_SIZE: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VectorSpaceKind {
    Rectangular,
    Circular,
}

impl VectorSpaceKind {
    pub const ALL: [VectorSpaceKind; 2] = [VectorSpaceKind::Rectangular, VectorSpaceKind::Circular];

    pub fn name(self) -> &'static str {
        match self {
            VectorSpaceKind::Rectangular => "rectangular",
            VectorSpaceKind::Circular => "circular",
        }
    }
}

impl fmt::Display for VectorSpaceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for VectorSpaceKind {
    type Err = TransformError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| TransformError::InvalidDomain(s.to_string()))
    }
}

/// An ordered set of 2D points stored as two parallel coordinate lists.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct PointSet {
    xs: Vec<f64>,
    ys: Vec<f64>,
}

impl PointSet {
    pub fn new(xs: Vec<f64>, ys: Vec<f64>) -> Result<PointSet> {
        if xs.len() != ys.len() {
            return Err(TransformError::LengthMismatch {
                xs: xs.len(),
                ys: ys.len(),
            });
        }
        Ok(PointSet { xs, ys })
    }

    pub fn from_points<I: IntoIterator<Item = [f64; 2]>>(points: I) -> PointSet {
        let (xs, ys) = points.into_iter().map(|[x, y]| (x, y)).unzip();
        PointSet { xs, ys }
    }

    pub fn len(&self) -> usize {
        self.xs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }

    pub fn xs(&self) -> &[f64] {
        &self.xs
    }

    pub fn ys(&self) -> &[f64] {
        &self.ys
    }

    pub fn get(&self, idx: usize) -> Option<[f64; 2]> {
        Some([*self.xs.get(idx)?, self.ys[idx]])
    }

    pub fn iter(&self) -> impl Iterator<Item = [f64; 2]> + '_ {
        self.xs.iter().zip(&self.ys).map(|(&x, &y)| [x, y])
    }

    /// Largest absolute coordinate in the set, `0.0` when empty.
    pub fn extent(&self) -> f64 {
        self.xs
            .iter()
            .chain(&self.ys)
            .fold(0.0, |acc: f64, v| acc.max(v.abs()))
    }
}

/// Samples per axis of the rectangular grid used for `n` requested points.
pub fn grid_size(n: usize) -> usize {
    let needed = (n.saturating_mul(2) as f64).sqrt().ceil() as usize;
    needed.max(MIN_GRID_SIZE)
}

/// `count` evenly spaced values from `start` to `end`, both included.
pub fn linspace(start: f64, end: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (count - 1) as f64;
            (0..count)
                .map(|i| if i == count - 1 { end } else { start + step * i as f64 })
                .collect()
        }
    }
}

/// Builds a vector space of `n` points.
///
/// `seed` only matters for [`VectorSpaceKind::Rectangular`], where points are
/// drawn at random from the grid; `None` draws from fresh OS entropy.
pub fn generate(kind: VectorSpaceKind, n: usize, seed: Option<u64>) -> Result<PointSet> {
    if n == 0 {
        return Err(TransformError::EmptyPointSet);
    }
    let points = match kind {
        VectorSpaceKind::Rectangular => rectangular(n, seed),
        VectorSpaceKind::Circular => circular(n),
    };
    Ok(points)
}

fn rectangular(n: usize, seed: Option<u64>) -> PointSet {
    let size = grid_size(n);
    let axis = linspace(-1.0, 1.0, size);
    let total = size.saturating_mul(size);

    // row-major: y is the outer index
    let grid = |idx: usize| [axis[idx % size], axis[idx / size]];

    if n >= total {
        warn!(
            requested = n,
            available = total,
            "requested more points than the {size}x{size} grid holds, using all of them"
        );
        return PointSet::from_points((0..total).map(grid));
    }

    let mut rng = match seed {
        Some(seed) => Pcg64::seed_from_u64(seed),
        None => Pcg64::from_rng(&mut rand::rng()),
    };
    let picked = index::sample(&mut rng, total, n);
    debug!(?seed, "sampled grid indices");
    info!(
        "sampled {n} points from {size}x{size} rectangular grid ({total} total points available)"
    );
    PointSet::from_points(picked.into_iter().map(grid))
}

fn circular(n: usize) -> PointSet {
    let points = linspace(0.0, TAU, n)
        .into_iter()
        .map(|theta| [theta.cos(), theta.sin()]);
    info!("created circular space: {n} points");
    PointSet::from_points(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("Circular".parse::<VectorSpaceKind>().unwrap(), VectorSpaceKind::Circular);
        assert_eq!(
            " rectangular ".parse::<VectorSpaceKind>().unwrap(),
            VectorSpaceKind::Rectangular
        );
    }

    #[test]
    fn unknown_space_is_invalid_domain() {
        let err = "spherical".parse::<VectorSpaceKind>().unwrap_err();
        assert!(matches!(err, TransformError::InvalidDomain(name) if name == "spherical"));
    }

    #[test]
    fn grid_size_has_a_floor_of_twenty() {
        assert_eq!(grid_size(1), 20);
        assert_eq!(grid_size(200), 20);
        assert_eq!(grid_size(201), 21);
        assert_eq!(grid_size(1800), 60);
    }

    #[test]
    fn grid_size_survives_huge_requests() {
        let size = grid_size(usize::MAX);
        assert!(size > MIN_GRID_SIZE);
        assert!(size.saturating_mul(size) >= usize::MAX / 2);
    }

    #[test]
    fn linspace_hits_both_endpoints() {
        let v = linspace(-1.0, 1.0, 5);
        assert_eq!(v, vec![-1.0, -0.5, 0.0, 0.5, 1.0]);
        assert_eq!(linspace(3.0, 4.0, 1), vec![3.0]);
        assert!(linspace(0.0, 1.0, 0).is_empty());
    }

    #[test]
    fn zero_points_is_rejected() {
        assert!(matches!(
            generate(VectorSpaceKind::Circular, 0, None),
            Err(TransformError::EmptyPointSet)
        ));
    }

    #[test]
    fn circle_starts_and_ends_at_angle_zero() {
        let ring = generate(VectorSpaceKind::Circular, 9, None).unwrap();
        assert_eq!(ring.len(), 9);
        let first = ring.get(0).unwrap();
        let last = ring.get(8).unwrap();
        assert_eq!(first, [1.0, 0.0]);
        assert!((last[0] - 1.0).abs() < 1e-12 && last[1].abs() < 1e-12);
        let quarter = ring.get(2).unwrap();
        assert!(quarter[0].abs() < 1e-12 && (quarter[1] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn single_point_circle() {
        let ring = generate(VectorSpaceKind::Circular, 1, None).unwrap();
        assert_eq!(ring.get(0), Some([1.0, 0.0]));
    }

    #[test]
    fn rectangular_samples_are_distinct() {
        let space = generate(VectorSpaceKind::Rectangular, 150, Some(3)).unwrap();
        let unique: HashSet<_> = space.iter().map(|[x, y]| (x.to_bits(), y.to_bits())).collect();
        assert_eq!(unique.len(), 150);
    }

    #[test]
    fn grid_always_holds_the_requested_count() {
        for n in [1, 199, 200, 201, 400, 1800] {
            let size = grid_size(n);
            assert!(size * size >= n);
            assert_eq!(generate(VectorSpaceKind::Rectangular, n, Some(1)).unwrap().len(), n);
        }
    }

    #[test]
    fn point_set_rejects_ragged_input() {
        assert!(matches!(
            PointSet::new(vec![1.0, 2.0], vec![1.0]),
            Err(TransformError::LengthMismatch { xs: 2, ys: 1 })
        ));
    }

    #[test]
    fn extent_is_largest_absolute_coordinate() {
        let set = PointSet::from_points([[0.5, -2.0], [1.5, 0.0]]);
        assert_eq!(set.extent(), 2.0);
        assert_eq!(PointSet::default().extent(), 0.0);
    }
}
