//! Bubble-pressure equilibrium of a binary mixture.

use crate::activity::ActivityModel;
use crate::error::{EquilibriumResult, VleError};
use crate::pxy::{PxyCurve, generate_pxy_curve};
use tk_core::units::{Pressure, Temperature, pa, to_k, to_pa};
use tracing::debug;

/// Bisection steps for the incipient liquid of a dew point.
const DEW_BISECTIONS: usize = 200;
/// Largest accepted mismatch between the requested and recomputed vapor y1.
const DEW_TOLERANCE: f64 = 1e-8;

/// A binary mixture at fixed temperature.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BinarySystem {
    pub temperature: Temperature,
    /// Saturation pressure of pure component 1 at `temperature`.
    pub psat1: Pressure,
    /// Saturation pressure of pure component 2 at `temperature`.
    pub psat2: Pressure,
    pub model: ActivityModel,
}

impl BinarySystem {
    pub fn new(
        temperature: Temperature,
        psat1: Pressure,
        psat2: Pressure,
        model: ActivityModel,
    ) -> EquilibriumResult<Self> {
        let system = Self {
            temperature,
            psat1,
            psat2,
            model,
        };
        system.validate()?;
        Ok(system)
    }

    pub fn validate(&self) -> EquilibriumResult<()> {
        let t = to_k(self.temperature);
        if !(t.is_finite() && t > 0.0) {
            return Err(VleError::InvalidInput {
                what: "temperature must be positive and finite",
            });
        }
        for p in [self.psat1, self.psat2] {
            let p = to_pa(p);
            if !(p.is_finite() && p > 0.0) {
                return Err(VleError::InvalidInput {
                    what: "saturation pressure must be positive and finite",
                });
            }
        }
        self.model.validate()
    }
}

/// Liquid and vapor compositions in equilibrium at the bubble pressure.
///
/// `x1 + x2 = 1` and `y1 + y2 = 1` hold exactly: the second fraction of each
/// pair is computed as one minus the first.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VleResult {
    pub temperature: Temperature,
    /// Total (bubble) pressure.
    pub pressure: Pressure,
    pub x1: f64,
    pub x2: f64,
    pub y1: f64,
    pub y2: f64,
    pub gamma1: f64,
    pub gamma2: f64,
    pub psat1: Pressure,
    pub psat2: Pressure,
}

impl VleResult {
    pub fn pressure_pa(&self) -> f64 {
        to_pa(self.pressure)
    }

    /// Pxy curve around this state, holding γ1 and γ2 fixed.
    pub fn pxy_curve(&self, n_points: usize) -> EquilibriumResult<PxyCurve> {
        generate_pxy_curve(self.psat1, self.psat2, self.gamma1, self.gamma2, n_points)
    }
}

/// Solve the bubble-pressure problem at liquid composition `x1`.
///
/// Modified Raoult's law: `P = x1 γ1 Psat1 + x2 γ2 Psat2` and
/// `y1 = x1 γ1 Psat1 / P`.
pub fn solve_vle(system: &BinarySystem, x1: f64) -> EquilibriumResult<VleResult> {
    system.validate()?;
    if !(0.0..=1.0).contains(&x1) {
        return Err(VleError::InvalidInput {
            what: "x1 must lie in [0, 1]",
        });
    }
    let x2 = 1.0 - x1;
    let (gamma1, gamma2) = system.model.gammas(x1)?;

    let partial1 = x1 * gamma1 * to_pa(system.psat1);
    let partial2 = x2 * gamma2 * to_pa(system.psat2);
    let p = partial1 + partial2;
    if !p.is_finite() {
        return Err(VleError::Domain {
            what: "total pressure is not finite",
        });
    }
    if p <= 0.0 {
        return Err(VleError::Domain {
            what: "total pressure is zero",
        });
    }
    let y1 = partial1 / p;

    debug!(x1, y1, p, gamma1, gamma2, "solved bubble pressure");

    Ok(VleResult {
        temperature: system.temperature,
        pressure: pa(p),
        x1,
        x2,
        y1,
        y2: 1.0 - y1,
        gamma1,
        gamma2,
        psat1: system.psat1,
        psat2: system.psat2,
    })
}

/// Solve the dew-pressure problem at vapor composition `y1`.
///
/// The incipient liquid satisfies `x1 γ1 Psat1 y2 = x2 γ2 Psat2 y1`. The
/// residual is negative at x1 = 0 and positive at x1 = 1, so the liquid is
/// bracketed and found by bisection. The returned pressure is the bubble
/// pressure of that liquid; `y1` and `y2` are the requested vapor.
pub fn solve_dew(system: &BinarySystem, y1: f64) -> EquilibriumResult<VleResult> {
    system.validate()?;
    if !(0.0..=1.0).contains(&y1) {
        return Err(VleError::InvalidInput {
            what: "y1 must lie in [0, 1]",
        });
    }
    let y2 = 1.0 - y1;
    let (p1, p2) = (to_pa(system.psat1), to_pa(system.psat2));
    let residual = |x1: f64| -> EquilibriumResult<f64> {
        let (g1, g2) = system.model.gammas(x1)?;
        Ok(x1 * g1 * p1 * y2 - (1.0 - x1) * g2 * p2 * y1)
    };

    let x1 = if y1 == 0.0 || y1 == 1.0 {
        y1
    } else {
        let (mut lo, mut hi) = (0.0_f64, 1.0_f64);
        for _ in 0..DEW_BISECTIONS {
            let mid = 0.5 * (lo + hi);
            if residual(mid)? > 0.0 {
                hi = mid;
            } else {
                lo = mid;
            }
            if hi - lo <= f64::EPSILON {
                break;
            }
        }
        0.5 * (lo + hi)
    };

    let liquid = solve_vle(system, x1)?;
    if (liquid.y1 - y1).abs() > DEW_TOLERANCE {
        return Err(VleError::ConvergenceFailed {
            what: "dew point",
            iterations: DEW_BISECTIONS,
        });
    }
    debug!(y1, x1, p = liquid.pressure_pa(), "solved dew pressure");
    Ok(VleResult { y1, y2, ..liquid })
}
