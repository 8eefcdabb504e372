//! Layout Tests - Placement Tables, Assembly and Reproducibility
//!
//! Builds both layout variants into the kinematic world and checks that the
//! resulting bodies match the tables, stand on the shake table, and come out
//! identical on every build.

use terremoto_engine::colonnade::{LayoutVariant, assemble, extended_layout, simple_layout};
use terremoto_engine::geometry::{ElementRole, SolidShape};
use terremoto_engine::physics::{BodyShape, KinematicWorld, MaterialProperties, PhysicsWorld, Vec3};

const EPS: f64 = 1e-12;

fn build(variant: LayoutVariant) -> KinematicWorld {
    let plan = variant.build().unwrap();
    let mut world = KinematicWorld::new();
    assemble(&mut world, &plan, &MaterialProperties::default()).unwrap();
    world
}

// ============================================================================
// Reproducibility
// ============================================================================

#[test]
fn test_two_builds_produce_identical_bodies() {
    for variant in [LayoutVariant::Simple, LayoutVariant::Extended] {
        let a = build(variant);
        let b = build(variant);
        assert_eq!(a.body_count(), b.body_count());
        for ((ha, body_a), (hb, body_b)) in a.bodies().zip(b.bodies()) {
            assert_eq!(ha, hb);
            assert_eq!(body_a.pose, body_b.pose);
            assert_eq!(body_a.shape, body_b.shape);
            assert_eq!(body_a.density, body_b.density);
        }
    }
}

#[test]
fn test_creation_order_follows_plan() {
    let plan = extended_layout().unwrap();
    let mut world = KinematicWorld::new();
    let structure = assemble(&mut world, &plan, &MaterialProperties::default()).unwrap();
    for (index, request) in plan.requests.iter().enumerate() {
        assert_eq!(structure.get(&request.name).unwrap().0 as usize, index);
    }
}

// ============================================================================
// Simple layout values
// ============================================================================

#[test]
fn test_simple_layout_body_counts() {
    let world = build(LayoutVariant::Simple);
    let hulls = world
        .bodies()
        .filter(|(_, b)| matches!(b.shape, BodyShape::ConvexHull { .. }))
        .count();
    assert_eq!(world.body_count(), 33);
    assert_eq!(hulls, 27);
}

#[test]
fn test_simple_segment_hull_rings() {
    let plan = simple_layout().unwrap();
    let mut world = KinematicWorld::new();
    let structure = assemble(&mut world, &plan, &MaterialProperties::default()).unwrap();

    // Row 1 uses 1.5 m segments; seg1 spans 1.5..3.0 with radii 0.45 -> 0.40
    let handle = structure.get("row1.col2.seg1").unwrap();
    let body = world.body(handle).unwrap();
    assert_eq!(body.pose.position(), Vec3::new(2.0, 2.25, 2.0));
    assert_eq!(body.density, 3000.0);

    let BodyShape::ConvexHull { points } = &body.shape else {
        panic!("column segment must be a hull");
    };
    assert_eq!(points.len(), 200);
    let (top, bottom) = points.split_at(100);
    for p in top {
        assert!((p.y - 0.75).abs() < EPS);
        assert!((p.x.hypot(p.z) - 0.40).abs() < EPS);
    }
    for p in bottom {
        assert!((p.y + 0.75).abs() < EPS);
        assert!((p.x.hypot(p.z) - 0.45).abs() < EPS);
    }
}

#[test]
fn test_floor_is_fixed_and_passive() {
    let plan = simple_layout().unwrap();
    let mut world = KinematicWorld::new();
    let structure = assemble(&mut world, &plan, &MaterialProperties::default()).unwrap();

    let floor = world.body(structure.ground).unwrap();
    assert!(floor.fixed);
    assert!(!floor.collide);
    assert_eq!(floor.shape, BodyShape::Box { size: Vec3::new(20.0, 2.0, 20.0) });

    let table = world.body(structure.table).unwrap();
    assert!(table.collide);
    assert_eq!(table.shape, BodyShape::Box { size: Vec3::new(15.0, 1.0, 15.0) });
    assert_eq!(world.pose(structure.table).unwrap().position(), Vec3::new(0.0, -0.5, 0.0));
}

#[test]
fn test_material_reaches_every_body() {
    let material = MaterialProperties {
        friction: 0.8,
        rolling_friction: 0.01,
        restitution: 0.1,
    };
    let plan = simple_layout().unwrap();
    let mut world = KinematicWorld::new();
    assemble(&mut world, &plan, &material).unwrap();
    assert!(world.bodies().all(|(_, b)| b.material == material));
}

// ============================================================================
// Structure sanity for both variants
// ============================================================================

#[test]
fn test_structure_stands_on_table() {
    for variant in [LayoutVariant::Simple, LayoutVariant::Extended] {
        let plan = variant.build().unwrap();
        let lowest = plan
            .requests
            .iter()
            .filter(|r| !matches!(r.role, ElementRole::Ground | ElementRole::ShakeTable))
            .map(|r| r.vertical_extent().0)
            .fold(f64::MAX, f64::min);
        assert!(lowest.abs() < EPS, "{variant} lowest element at {lowest}");
    }
}

#[test]
fn test_extended_second_tier_rests_on_beams() {
    let plan = extended_layout().unwrap();
    let (_, beam_top) = plan.get("row0.beam0").unwrap().vertical_extent();
    let (upper_bottom, _) = plan.get("row0.col1.upper.seg0").unwrap().vertical_extent();
    assert!((beam_top - upper_bottom).abs() < EPS);

    let (_, capital_top) = plan.get("row0.col3.upper.capital").unwrap().vertical_extent();
    let (top_beam_bottom, _) = plan.get("row0.top_beam2").unwrap().vertical_extent();
    assert!((capital_top - top_beam_bottom).abs() < EPS);
}

#[test]
fn test_extended_columns_are_slender_above() {
    let plan = extended_layout().unwrap();
    let radius = |name: &str| match &plan.get(name).unwrap().shape {
        SolidShape::Column(spec) => spec.radius_bottom(),
        SolidShape::Box { .. } => panic!("{name} is not a column"),
    };
    assert!(radius("row0.col0.upper.seg0") < radius("row0.col0.seg2"));
}
