pub mod colour;

#[inline]
pub fn lerp(t: f32, a: f32, b: f32) -> f32 {
    (1. - t) * a + t * b
}

/// Roots of `a*t^2 + b*t + c = 0`, ascending. `None` when there is no real
/// solution.
#[inline]
pub fn quadratic(a: f32, b: f32, c: f32) -> Option<(f32, f32)> {
    let disc = b * b - 4. * a * c;
    if disc < 0. {
        return None;
    }

    let e = disc.sqrt();
    let inv_lower = 1. / (2. * a);
    let t0 = (-b - e) * inv_lower;
    let t1 = (-b + e) * inv_lower;

    if t0 <= t1 {
        Some((t0, t1))
    } else {
        Some((t1, t0))
    }
}

/// Rounds to the nearest integer, halves up.
#[inline]
pub fn round_to_int(f: f32) -> i64 {
    (f + 0.5) as i64
}

#[inline]
pub fn random_f32() -> f32 {
    fastrand::f32()
}

#[inline]
pub fn random_f32_in(min: f32, max: f32) -> f32 {
    min + (max - min) * random_f32()
}
