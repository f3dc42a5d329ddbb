//! Random draws over tuning ranges.

use rand::Rng;

/// Uniform value between `a` and `b`, in either order.
///
/// A collapsed or non-finite span yields its finite end (or zero when
/// neither end is finite) without touching the generator.
pub fn range_f32<R: Rng + ?Sized>(rng: &mut R, a: f32, b: f32) -> f32 {
    let (lo, hi) = (a.min(b), a.max(b));
    match (lo.is_finite(), hi.is_finite()) {
        (true, true) if lo < hi && (hi - lo).is_finite() => rng.gen_range(lo..=hi),
        (true, _) => lo,
        (false, true) => hi,
        (false, false) => 0.0,
    }
}

