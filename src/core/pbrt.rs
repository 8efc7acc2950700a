pub type Float = f32;

pub const PI: Float = 3.14159265358979323846;

#[inline]
pub fn radians(deg: Float) -> Float {
    deg * PI / 180.0
}

#[inline]
pub fn clamp(val: Float, low: Float, high: Float) -> Float {
    if val < low {
        low
    } else if val > high {
        high
    } else {
        val
    }
}

#[inline]
pub fn lerp(t: Float, a: Float, b: Float) -> Float {
    (1.0 - t) * a + t * b
}
