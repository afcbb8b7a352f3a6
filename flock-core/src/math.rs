//! Float helpers that work with and without `std`.

#[cfg(feature = "std")]
pub(crate) fn sqrt(value: f32) -> f32 {
    value.sqrt()
}

#[cfg(not(feature = "std"))]
pub(crate) fn sqrt(value: f32) -> f32 {
    libm::sqrtf(value)
}

#[cfg(feature = "std")]
pub(crate) fn abs(value: f32) -> f32 {
    value.abs()
}

#[cfg(not(feature = "std"))]
pub(crate) fn abs(value: f32) -> f32 {
    libm::fabsf(value)
}

#[cfg(feature = "std")]
pub(crate) fn atan2(y: f32, x: f32) -> f32 {
    y.atan2(x)
}

#[cfg(not(feature = "std"))]
pub(crate) fn atan2(y: f32, x: f32) -> f32 {
    libm::atan2f(y, x)
}

#[cfg(feature = "std")]
pub(crate) fn asin(value: f32) -> f32 {
    value.asin()
}

#[cfg(not(feature = "std"))]
pub(crate) fn asin(value: f32) -> f32 {
    libm::asinf(value)
}

#[cfg(feature = "std")]
pub(crate) fn floor(value: f32) -> f32 {
    value.floor()
}

#[cfg(not(feature = "std"))]
pub(crate) fn floor(value: f32) -> f32 {
    libm::floorf(value)
}

/// Remainder with the sign of the divisor, so the result lands in `[0, modulus)`.
pub(crate) fn wrap(value: f32, modulus: f32) -> f32 {
    #[cfg(feature = "std")]
    let rem = value % modulus;
    #[cfg(not(feature = "std"))]
    let rem = libm::fmodf(value, modulus);

    let wrapped = if rem < 0.0 { rem + modulus } else { rem };
    // -tiny + modulus can round up to modulus itself
    if wrapped >= modulus {
        0.0
    } else {
        wrapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_stays_in_range() {
        assert_eq!(wrap(5.0, 4.0), 1.0);
        assert_eq!(wrap(-1.0, 4.0), 3.0);
        assert_eq!(wrap(4.0, 4.0), 0.0);
        assert!(wrap(-1.0e-9, 4.0) < 4.0);
    }

    #[test]
    fn test_floor() {
        assert_eq!(floor(2.7), 2.0);
        assert_eq!(floor(0.2), 0.0);
    }
}
