use crate::TkError;

/// Floating point type used throughout system
pub type Real = f64;

/// One tolerance for everything
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, TkError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(TkError::NonFinite { what, value: v })
    }
}

/// True when `v` is finite and strictly positive.
#[inline]
pub fn is_positive_finite(v: Real) -> bool {
    v.is_finite() && v > 0.0
}

/// True when `v` is a valid efficiency, i.e. in (0, 1].
#[inline]
pub fn is_efficiency(v: Real) -> bool {
    v.is_finite() && v > 0.0 && v <= 1.0
}

/// Evenly spaced grid of `n` points on `[start, end]`.
///
/// Both endpoints are exact. Index `i` maps to `start + i * step`, except the
/// last point which is pinned to `end`.
pub fn grid_point(start: Real, end: Real, n: usize, i: usize) -> Real {
    if n <= 1 {
        return start;
    }
    if i + 1 >= n {
        return end;
    }
    start + i as Real * (end - start) / (n - 1) as Real
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn nearly_equal_basic() {
        let tol = Tolerances {
            abs: 1e-12,
            rel: 1e-9,
        };
        assert!(nearly_equal(1.0, 1.0 + 1e-12, tol));
        assert!(nearly_equal(0.0, 1e-13, tol));
        assert!(!nearly_equal(1.0, 1.0 + 1e-6, tol));
    }

    #[test]
    fn ensure_finite_detects_nan() {
        let err = ensure_finite(Real::NAN, "test").unwrap_err();
        let msg = format!("{err}");
        assert!(msg.contains("Non-finite"));
    }

    #[test]
    fn efficiency_bounds() {
        assert!(is_efficiency(1.0));
        assert!(is_efficiency(0.85));
        assert!(!is_efficiency(0.0));
        assert!(!is_efficiency(1.01));
        assert!(!is_efficiency(Real::NAN));
    }

    #[test]
    fn grid_endpoints_are_exact() {
        assert_eq!(grid_point(0.0, 1.0, 11, 0), 0.0);
        assert_eq!(grid_point(0.0, 1.0, 11, 10), 1.0);
        assert!((grid_point(0.0, 1.0, 11, 3) - 0.3).abs() < 1e-15);
        assert_eq!(grid_point(2.0, 5.0, 1, 0), 2.0);
    }

    proptest! {
        #[test]
        fn nearly_equal_is_symmetric(a in -1e6_f64..1e6, b in -1e6_f64..1e6) {
            let tol = Tolerances::default();
            prop_assert_eq!(nearly_equal(a, b, tol), nearly_equal(b, a, tol));
        }

        #[test]
        fn grid_is_monotonic(n in 2_usize..200) {
            let mut prev = grid_point(0.0, 1.0, n, 0);
            for i in 1..n {
                let next = grid_point(0.0, 1.0, n, i);
                prop_assert!(next > prev);
                prev = next;
            }
        }
    }
}
