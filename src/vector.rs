//! 2D vector helpers.
//!
//! The value type itself is `glam::Vec2` (add/sub/scale/distance/lerp come
//! from glam). This module adds the few game-specific helpers the combat
//! code needs on top of it. World space is y-up: +x is right, +y is up.

pub use glam::Vec2;

pub trait VecExt {
    /// Angle of the vector in degrees, normalised to [0, 360).
    fn angle_degrees(self) -> f32;

    /// Unit vector, or `None` for a zero-length input.
    fn try_normalize_guarded(self) -> Option<Vec2>;

    /// Clamp `self` so its distance from `origin` lies in `[min, max]`.
    ///
    /// A point sitting exactly on `origin` has no direction; it is pushed
    /// out along `fallback` instead. Swapped bounds are reordered and a NaN
    /// bound is ignored.
    fn clamp_to_annulus(self, origin: Vec2, min: f32, max: f32, fallback: Vec2) -> Vec2;
}

impl VecExt for Vec2 {
    fn angle_degrees(self) -> f32 {
        let deg = self.y.atan2(self.x).to_degrees();
        let deg = deg.rem_euclid(360.0);
        // rem_euclid can round up to exactly 360.0 for tiny negative inputs
        if deg >= 360.0 {
            0.0
        } else {
            deg
        }
    }

    fn try_normalize_guarded(self) -> Option<Vec2> {
        let len = self.length();
        if len > 0.0 {
            Some(self / len)
        } else {
            None
        }
    }

    fn clamp_to_annulus(self, origin: Vec2, min: f32, max: f32, fallback: Vec2) -> Vec2 {
        let delta = self - origin;
        let distance = delta.length();
        let dir = match delta.try_normalize_guarded() {
            Some(d) => d,
            None => fallback.try_normalize_guarded().unwrap_or(Vec2::X),
        };
        let lo = min.min(max).max(0.0);
        let hi = max.max(min).max(lo);
        let clamped = distance.clamp(lo, hi);
        origin + dir * clamped
    }
}

/// Unit vector pointing at `degrees` (0 = right, 90 = up).
pub fn from_degrees(degrees: f32) -> Vec2 {
    let rad = degrees.to_radians();
    Vec2::new(rad.cos(), rad.sin())
}
