use topdown_combat::direction::Direction;
use topdown_combat::vector::{self, Vec2, VecExt};

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-4
}

// ── Bucketing ─────────────────────────────────────────────────────────────────

#[test]
fn compass_centres_map_to_themselves() {
    for dir in Direction::ALL {
        assert_eq!(Direction::from_degrees(dir.degrees()), dir);
    }
}

#[test]
fn boundary_belongs_to_bucket_starting_there() {
    assert_eq!(Direction::from_degrees(22.5), Direction::UpRight);
    assert_eq!(Direction::from_degrees(67.5), Direction::Up);
    assert_eq!(Direction::from_degrees(157.5), Direction::Left);
    assert_eq!(Direction::from_degrees(337.5), Direction::Right);
}

#[test]
fn just_below_boundary_stays_in_previous_bucket() {
    assert_eq!(Direction::from_degrees(22.4), Direction::Right);
    assert_eq!(Direction::from_degrees(337.4), Direction::DownRight);
}

#[test]
fn negative_and_large_angles_wrap() {
    assert_eq!(Direction::from_degrees(-90.0), Direction::Down);
    assert_eq!(Direction::from_degrees(-10.0), Direction::Right);
    assert_eq!(Direction::from_degrees(720.0 + 45.0), Direction::UpRight);
}

#[test]
fn bucketing_is_total_over_a_full_turn() {
    // every tenth of a degree lands in exactly one bucket, and the buckets
    // come out in counter-clockwise order
    let mut seen = Vec::new();
    let mut deg = 0.0_f32;
    while deg < 360.0 {
        let dir = Direction::from_degrees(deg);
        if seen.last() != Some(&dir) {
            seen.push(dir);
        }
        deg += 0.1;
    }
    assert_eq!(
        seen,
        vec![
            Direction::Right,
            Direction::UpRight,
            Direction::Up,
            Direction::UpLeft,
            Direction::Left,
            Direction::DownLeft,
            Direction::Down,
            Direction::DownRight,
            Direction::Right,
        ]
    );
}

#[test]
fn delta_uses_y_up_world_space() {
    assert_eq!(Direction::from_delta(Vec2::new(10.0, 10.0)), Direction::UpRight);
    assert_eq!(Direction::from_delta(Vec2::new(0.0, -5.0)), Direction::Down);
    assert_eq!(Direction::from_delta(Vec2::new(-3.0, 0.0)), Direction::Left);
}

#[test]
fn zero_delta_is_right() {
    assert_eq!(Direction::from_delta(Vec2::ZERO), Direction::Right);
}

// ── Vectors and rotation ──────────────────────────────────────────────────────

#[test]
fn diagonals_use_point_seven() {
    let v = Direction::UpLeft.vector();
    assert!(approx(v.x, -0.7));
    assert!(approx(v.y, 0.7));
    assert!(approx(Direction::Down.vector().length(), 1.0));
}

#[test]
fn rotate_ccw_cycles_through_all_eight() {
    let mut dir = Direction::Right;
    for expected in Direction::ALL.iter().skip(1) {
        dir = dir.rotate_ccw();
        assert_eq!(dir, *expected);
    }
    assert_eq!(dir.rotate_ccw(), Direction::Right);
}

#[test]
fn opposite_is_half_a_turn() {
    assert_eq!(Direction::UpRight.opposite(), Direction::DownLeft);
    assert_eq!(Direction::Left.opposite(), Direction::Right);
}

#[test]
fn cone_excludes_neighbouring_bucket() {
    assert!(Direction::Right.cone_contains(Vec2::new(10.0, 2.0)));
    assert!(!Direction::Right.cone_contains(Vec2::new(10.0, 10.0)));
}

#[test]
fn cardinal_probe_order() {
    assert_eq!(
        Direction::CARDINALS,
        [Direction::Up, Direction::Right, Direction::Down, Direction::Left]
    );
}

// ── Vector helpers ────────────────────────────────────────────────────────────

#[test]
fn angle_degrees_is_in_range() {
    assert!(approx(Vec2::new(0.0, 1.0).angle_degrees(), 90.0));
    assert!(approx(Vec2::new(0.0, -1.0).angle_degrees(), 270.0));
    let a = Vec2::new(1.0, -1e-9).angle_degrees();
    assert!((0.0..360.0).contains(&a));
}

#[test]
fn guarded_normalise_rejects_zero() {
    assert_eq!(Vec2::ZERO.try_normalize_guarded(), None);
    let n = Vec2::new(3.0, 4.0).try_normalize_guarded();
    assert_eq!(n, Some(Vec2::new(0.6, 0.8)));
}

#[test]
fn annulus_clamp_pulls_in_and_pushes_out() {
    let origin = Vec2::new(5.0, 5.0);
    let far = Vec2::new(1005.0, 5.0).clamp_to_annulus(origin, 40.0, 200.0, Vec2::X);
    assert!(approx(far.x, 205.0) && approx(far.y, 5.0));
    let near = Vec2::new(5.0, 15.0).clamp_to_annulus(origin, 40.0, 200.0, Vec2::X);
    assert!(approx(near.x, 5.0) && approx(near.y, 45.0));
    let on_origin = origin.clamp_to_annulus(origin, 40.0, 200.0, Vec2::X);
    assert!(approx(on_origin.x, 45.0) && approx(on_origin.y, 5.0));
}

#[test]
fn from_degrees_points_the_right_way() {
    let up = vector::from_degrees(90.0);
    assert!(approx(up.x, 0.0) && approx(up.y, 1.0));
}
