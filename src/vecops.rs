//! Elementwise arithmetic over fixed-length float arrays
//!
//! These are the hot-path helpers used by the scene, the debug overlay and the
//! collision queries. Lengths are fixed by the type, so there is nothing to
//! validate at runtime.

/// Elementwise `a + b`
#[inline]
pub fn add<const N: usize>(a: [f32; N], b: [f32; N]) -> [f32; N] {
    map(a, b, |x, y| x + y)
}

/// Elementwise `a - b`
#[inline]
pub fn sub<const N: usize>(a: [f32; N], b: [f32; N]) -> [f32; N] {
    map(a, b, |x, y| x - y)
}

/// Scale every component by `scale`
#[inline]
pub fn mul<const N: usize>(v: [f32; N], scale: f32) -> [f32; N] {
    v.map(|x| x * scale)
}

/// Divide every component by `scale`
#[inline]
pub fn div<const N: usize>(v: [f32; N], scale: f32) -> [f32; N] {
    v.map(|x| x / scale)
}

/// Combine two arrays component by component with `f`
#[inline]
pub fn map<const N: usize, F>(a: [f32; N], b: [f32; N], f: F) -> [f32; N]
where
    F: Fn(f32, f32) -> f32,
{
    let mut out = a;
    for (o, y) in out.iter_mut().zip(b) {
        *o = f(*o, y);
    }
    out
}

#[inline]
pub fn deg2rad(deg: f32) -> f32 {
    deg * std::f32::consts::PI / 180.0
}

#[inline]
pub fn rad2deg(rad: f32) -> f32 {
    rad * 180.0 / std::f32::consts::PI
}
