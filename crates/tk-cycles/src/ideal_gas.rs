//! Ideal-gas relations with constant specific heats.
//!
//! Logarithm and division arguments are checked before evaluation; violations
//! are reported as [`CycleError::Domain`].

use crate::common::{check_finite, positive_divisor};
use crate::error::{CycleError, SolveResult};

/// Specific entropy change [kJ/(kg·K)] between two states:
/// `cp ln(T2/T1) − R ln(P2/P1)`.
pub fn entropy_change(t1: f64, t2: f64, p1: f64, p2: f64, cp: f64, r: f64) -> SolveResult<f64> {
    let t_ratio = t2 / t1;
    let p_ratio = p2 / p1;
    if !(t_ratio.is_finite() && t_ratio > 0.0) {
        return Err(CycleError::Domain {
            what: "temperature ratio must be positive for ln",
        });
    }
    if !(p_ratio.is_finite() && p_ratio > 0.0) {
        return Err(CycleError::Domain {
            what: "pressure ratio must be positive for ln",
        });
    }
    check_finite(cp * t_ratio.ln() - r * p_ratio.ln(), "entropy change")
}

/// Specific enthalpy change [kJ/kg]: `cp (T2 − T1)`.
pub fn enthalpy_change(t1: f64, t2: f64, cp: f64) -> SolveResult<f64> {
    check_finite(cp * (t2 - t1), "enthalpy change")
}

/// Ratio of an actual to an isentropic enthalpy change.
pub fn isentropic_efficiency(actual: f64, isentropic: f64) -> SolveResult<f64> {
    let divisor = positive_divisor(isentropic.abs(), "isentropic enthalpy change")?;
    check_finite(actual.abs() / divisor, "isentropic efficiency")
}

/// Outlet temperature of an isentropic process: `T · r^((γ−1)/γ)`.
///
/// `pressure_ratio` is outlet over inlet, so expansion uses a ratio below one.
pub fn isentropic_temperature(t: f64, pressure_ratio: f64, gamma: f64) -> SolveResult<f64> {
    if !(pressure_ratio.is_finite() && pressure_ratio > 0.0) {
        return Err(CycleError::Domain {
            what: "pressure ratio must be positive",
        });
    }
    let gamma = positive_divisor(gamma, "heat capacity ratio")?;
    check_finite(t * pressure_ratio.powf((gamma - 1.0) / gamma), "isentropic temperature")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn isentropic_compression_of_air() {
        let t2s = isentropic_temperature(300.0, 5.0, 1.4).unwrap();
        assert!((t2s - 475.15).abs() < 0.5, "T2s = {t2s}");
    }

    #[test]
    fn isentropic_path_has_no_entropy_change() {
        let (r, gamma) = (0.287, 1.4);
        let cp = gamma * r / (gamma - 1.0);
        let t2 = isentropic_temperature(300.0, 5.0, gamma).unwrap();
        let ds = entropy_change(300.0, t2, 1.0e5, 5.0e5, cp, r).unwrap();
        assert!(ds.abs() < 1e-12, "ds = {ds}");
    }

    #[test]
    fn entropy_change_rejects_non_positive_ratio() {
        assert!(matches!(
            entropy_change(300.0, -1.0, 1.0e5, 2.0e5, 1.0, 0.287),
            Err(CycleError::Domain { .. })
        ));
        assert!(entropy_change(300.0, 400.0, 1.0e5, 0.0, 1.0, 0.287).is_err());
    }

    #[test]
    fn efficiency_of_turbine_and_compressor() {
        assert!((isentropic_efficiency(85.0, 100.0).unwrap() - 0.85).abs() < 1e-12);
        assert!(isentropic_efficiency(10.0, 0.0).is_err());
    }

    #[test]
    fn enthalpy_change_is_linear() {
        assert!((enthalpy_change(300.0, 400.0, 1.005).unwrap() - 100.5).abs() < 1e-12);
    }
}
