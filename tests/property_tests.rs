use lintrans::library::{cross3, dot3};
use lintrans::space::{self, grid_size};
use lintrans::{PointSet, TransformKind, TransformMatrix, TransformParams, VectorSpaceKind};
use proptest::prelude::*;

fn point_set() -> impl Strategy<Value = PointSet> {
    prop::collection::vec((-100.0f64..100.0, -100.0f64..100.0), 0..200)
        .prop_map(|pts| PointSet::from_points(pts.into_iter().map(|(x, y)| [x, y])))
}

fn matrix() -> impl Strategy<Value = TransformMatrix> {
    prop::array::uniform4(-10.0f64..10.0)
        .prop_map(|[a, b, c, d]| TransformMatrix::from_rows([[a, b], [c, d]]))
}

// =============================================================================
// Applier
// =============================================================================

proptest! {
    #[test]
    fn apply_preserves_cardinality(m in matrix(), points in point_set()) {
        prop_assert_eq!(m.apply(&points).len(), points.len());
    }

    #[test]
    fn identity_leaves_points_alone(points in point_set()) {
        let image = TransformMatrix::identity().apply(&points);
        for (p, q) in points.iter().zip(image.iter()) {
            prop_assert!((p[0] - q[0]).abs() < 1e-9 && (p[1] - q[1]).abs() < 1e-9);
        }
    }

    #[test]
    fn apply_matches_pointwise_product(m in matrix(), points in point_set()) {
        let [[a, b], [c, d]] = m.rows();
        let image = m.apply(&points);
        for (i, [x, y]) in points.iter().enumerate() {
            let q = image.get(i).unwrap();
            prop_assert!((q[0] - (a * x + b * y)).abs() < 1e-9);
            prop_assert!((q[1] - (c * x + d * y)).abs() < 1e-9);
        }
    }

    #[test]
    fn invertible_matrices_round_trip(m in matrix(), points in point_set()) {
        prop_assume!(m.determinant().abs() > 1e-2);
        let back = m.inverse().unwrap().apply(&m.apply(&points));
        for (p, q) in points.iter().zip(back.iter()) {
            prop_assert!((p[0] - q[0]).abs() < 1e-6 && (p[1] - q[1]).abs() < 1e-6);
        }
    }

    #[test]
    fn determinant_is_multiplicative(m in matrix(), k in matrix()) {
        let product = m.compose(&k).determinant();
        let expected = m.determinant() * k.determinant();
        prop_assert!((product - expected).abs() < 1e-6 * (1.0 + expected.abs()));
    }
}

// =============================================================================
// Builder
// =============================================================================

proptest! {
    #[test]
    fn rotation_determinant_is_one(angle in -20.0f64..20.0) {
        let mut params = TransformParams::default();
        params.rotation.angle = angle;
        let m = TransformMatrix::build(TransformKind::Rotation, &params);
        prop_assert!((m.determinant() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn scaling_determinant_is_product(sx in -50.0f64..50.0, sy in -50.0f64..50.0) {
        let mut params = TransformParams::default();
        params.scaling.scale_x = sx;
        params.scaling.scale_y = sy;
        let m = TransformMatrix::build(TransformKind::Scaling, &params);
        prop_assert!((m.determinant() - sx * sy).abs() < 1e-9);
    }

    #[test]
    fn shear_determinant(hx in -5.0f64..5.0, hy in -5.0f64..5.0) {
        let mut params = TransformParams::default();
        params.shearing.shear_x = hx;
        params.shearing.shear_y = hy;
        let m = TransformMatrix::build(TransformKind::Shearing, &params);
        prop_assert!((m.determinant() - (1.0 - hx * hy)).abs() < 1e-9);
    }
}

// =============================================================================
// Generators
// =============================================================================

proptest! {
    #[test]
    fn rectangular_bound(n in 1usize..3000, seed in any::<u64>()) {
        let set = space::generate(VectorSpaceKind::Rectangular, n, Some(seed)).unwrap();
        let size = grid_size(n);
        prop_assert_eq!(set.len(), n.min(size * size));
        for [x, y] in set.iter() {
            prop_assert!((-1.0..=1.0).contains(&x) && (-1.0..=1.0).contains(&y));
        }
    }

    #[test]
    fn circular_is_deterministic(n in 1usize..2000) {
        let a = space::generate(VectorSpaceKind::Circular, n, None).unwrap();
        let b = space::generate(VectorSpaceKind::Circular, n, Some(1)).unwrap();
        prop_assert_eq!(a.len(), n);
        prop_assert_eq!(a, b);
    }

    #[test]
    fn circular_points_are_on_the_unit_circle(n in 1usize..500) {
        let set = space::generate(VectorSpaceKind::Circular, n, None).unwrap();
        for [x, y] in set.iter() {
            prop_assert!(((x * x + y * y).sqrt() - 1.0).abs() < 1e-12);
        }
    }
}

// =============================================================================
// Vectors
// =============================================================================

proptest! {
    #[test]
    fn cross_product_is_orthogonal(
        a in prop::array::uniform3(-10.0f64..10.0),
        b in prop::array::uniform3(-10.0f64..10.0),
    ) {
        let c = cross3(a, b);
        prop_assert!(dot3(c, a).abs() < 1e-9);
        prop_assert!(dot3(c, b).abs() < 1e-9);
    }
}
