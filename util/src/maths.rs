//! Utility maths functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use num_traits::Float;

/// Calculates the least nonnegative remainder of `lhs (mod rhs)`.
///
/// Round-off can make the result equal to `rhs.abs()` when `lhs` is a tiny negative number.
pub fn rem_euclid<T>(lhs: T, rhs: T) -> T
where
    T: Float,
{
    let r = lhs % rhs;
    if r < T::zero() {
        r + rhs.abs()
    } else {
        r
    }
}

/// Wrap an angle into the range [0, 2pi).
pub fn wrap_2pi<T>(angle: T) -> T
where
    T: Float,
{
    let tau_t: T = T::from(std::f64::consts::TAU).unwrap_or_else(T::zero);

    let wrapped = rem_euclid(angle, tau_t);

    if wrapped >= tau_t {
        T::zero()
    } else {
        wrapped
    }
}

/// Returns true if `a` and `b` differ by no more than `tol`.
///
/// A tolerance of zero demands exact equality.
pub fn within<T>(a: T, b: T, tol: T) -> bool
where
    T: Float,
{
    if tol <= T::zero() {
        a == b
    } else {
        (a - b).abs() <= tol
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const TAU: f64 = std::f64::consts::TAU;
    const PI: f64 = std::f64::consts::PI;

    #[test]
    fn test_rem_euclid() {
        assert_eq!(rem_euclid(5.0f64, 3.0), 2.0);
        assert_eq!(rem_euclid(-1.0f64, 3.0), 2.0);
    }

    #[test]
    fn test_wrap_2pi() {
        assert_eq!(wrap_2pi(0f64), 0f64);
        assert_eq!(wrap_2pi(TAU), 0f64);
        assert!((wrap_2pi(2.5 * PI) - 0.5 * PI).abs() < 1e-12);
        assert!((wrap_2pi(-0.5 * PI) - 1.5 * PI).abs() < 1e-12);
    }

    #[test]
    fn test_within() {
        assert!(within(1.0f64, 1.0, 0.0));
        assert!(!within(1.0f64, 1.0 + 1e-9, 0.0));
        assert!(within(1.0f64, 1.4, 0.5));
        assert!(!within(1.0f64, 1.6, 0.5));
    }
}
