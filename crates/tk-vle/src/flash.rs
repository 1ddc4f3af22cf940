//! Isothermal two-phase flash of a binary feed.
//!
//! Successive substitution on the liquid composition: at each pass the
//! K-values `K_i = γ_i(x) Psat_i / P` are refreshed from the current liquid
//! and the Rachford-Rice equation is solved for the vapor fraction by
//! bisection. Strongly non-ideal liquids can make the substitution cycle; for
//! those the tie line through the feed is bracketed and bisected instead.

use crate::equilibrium::{BinarySystem, solve_dew, solve_vle};
use crate::error::{EquilibriumResult, VleError};
use tk_core::numeric::grid_point;
use tk_core::units::{Pressure, Temperature, to_pa};
use tracing::{debug, trace};

/// Convergence tolerance on the liquid mole fraction x1.
const TOLERANCE: f64 = 1e-10;
const MAX_ITERATIONS: usize = 200;
/// Bisection steps for Rachford-Rice; 2^-100 is far below f64 resolution on [0,1].
const RR_BISECTIONS: usize = 100;
/// Grid used to bracket tie lines when successive substitution stalls.
const TIE_LINE_SEGMENTS: usize = 200;
/// Smallest liquid-vapor split, and slack on the feed lying inside it.
const SPLIT_TOLERANCE: f64 = 1e-12;

/// Flash specification: feed composition, pressure, and the mixture.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FlashSpec {
    /// Overall mole fraction of component 1 in the feed.
    pub z1: f64,
    pub pressure: Pressure,
    pub system: BinarySystem,
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FlashResult {
    /// Vapor fraction V ∈ [0, 1] (moles vapor per mole feed).
    pub vapor_fraction: f64,
    pub x1: f64,
    pub x2: f64,
    pub y1: f64,
    pub y2: f64,
    pub k1: f64,
    pub k2: f64,
    pub gamma1: f64,
    pub gamma2: f64,
    pub pressure: Pressure,
    pub temperature: Temperature,
    /// Successive-substitution passes used.
    pub iterations: usize,
}

/// Rachford-Rice residual Σ z_i (K_i − 1) / (1 + V (K_i − 1)).
fn rachford_rice(z: [f64; 2], k: [f64; 2], v: f64) -> f64 {
    z.iter()
        .zip(k.iter())
        .map(|(&zi, &ki)| zi * (ki - 1.0) / (1.0 + v * (ki - 1.0)))
        .sum()
}

/// Bisection for the vapor fraction. The residual decreases monotonically in
/// V, and callers guarantee a sign change on [0, 1].
fn solve_vapor_fraction(z: [f64; 2], k: [f64; 2]) -> f64 {
    let (mut lo, mut hi) = (0.0_f64, 1.0_f64);
    for _ in 0..RR_BISECTIONS {
        let mid = 0.5 * (lo + hi);
        if rachford_rice(z, k, mid) > 0.0 {
            lo = mid;
        } else {
            hi = mid;
        }
        if hi - lo <= f64::EPSILON {
            break;
        }
    }
    0.5 * (lo + hi)
}

/// Normalize a pair of mole fractions so they sum to one exactly.
fn normalize(a: f64, b: f64) -> EquilibriumResult<(f64, f64)> {
    let sum = a + b;
    if !(sum.is_finite() && sum > 0.0) {
        return Err(VleError::Domain {
            what: "mole fraction sum must be positive and finite",
        });
    }
    let first = a / sum;
    Ok((first, 1.0 - first))
}

/// Liquid x1 of the tie line through the feed at pressure `p`.
///
/// Roots of `P_bub(x1) = p` are bracketed on a uniform grid and bisected; the
/// first one whose tie line contains `z1` is returned.
fn tie_line(system: &BinarySystem, z1: f64, p: f64) -> EquilibriumResult<Option<f64>> {
    let excess =
        |x1: f64| -> EquilibriumResult<f64> { Ok(solve_vle(system, x1)?.pressure_pa() - p) };

    let (mut x_lo, mut f_lo) = (0.0, excess(0.0)?);
    for i in 1..=TIE_LINE_SEGMENTS {
        let x_hi = grid_point(0.0, 1.0, TIE_LINE_SEGMENTS + 1, i);
        let f_hi = excess(x_hi)?;
        if (f_lo <= 0.0) != (f_hi <= 0.0) {
            let (mut a, mut f_a, mut b) = (x_lo, f_lo, x_hi);
            for _ in 0..RR_BISECTIONS {
                let mid = 0.5 * (a + b);
                let f_mid = excess(mid)?;
                if (f_mid <= 0.0) == (f_a <= 0.0) {
                    a = mid;
                    f_a = f_mid;
                } else {
                    b = mid;
                }
                if b - a <= f64::EPSILON {
                    break;
                }
            }
            let x1 = 0.5 * (a + b);
            let y1 = solve_vle(system, x1)?.y1;
            let (lo, hi) = (x1.min(y1), x1.max(y1));
            let contains_feed = (lo - SPLIT_TOLERANCE..=hi + SPLIT_TOLERANCE).contains(&z1);
            if hi - lo > SPLIT_TOLERANCE && contains_feed {
                return Ok(Some(x1));
            }
        }
        x_lo = x_hi;
        f_lo = f_hi;
    }
    Ok(None)
}

/// Flash a binary feed at the system temperature and the given pressure.
///
/// Feeds at or above their bubble pressure stay liquid (V = 0); feeds at or
/// below their dew pressure are all vapor (V = 1) with `y = z` and the
/// incipient dew liquid as `x`. Between the two, successive substitution runs
/// first; if it does not settle within the iteration limit, the tie line
/// through the feed is located directly.
pub fn flash(spec: &FlashSpec) -> EquilibriumResult<FlashResult> {
    let system = &spec.system;
    system.validate()?;
    let z1 = spec.z1;
    if !(0.0..=1.0).contains(&z1) {
        return Err(VleError::InvalidInput {
            what: "feed fraction z1 must lie in [0, 1]",
        });
    }
    let p = to_pa(spec.pressure);
    if !(p.is_finite() && p > 0.0) {
        return Err(VleError::InvalidInput {
            what: "flash pressure must be positive and finite",
        });
    }
    let z = [z1, 1.0 - z1];
    let psat = [to_pa(system.psat1), to_pa(system.psat2)];

    let k_values = |x1: f64| -> EquilibriumResult<([f64; 2], (f64, f64))> {
        let (g1, g2) = system.model.gammas(x1)?;
        Ok(([g1 * psat[0] / p, g2 * psat[1] / p], (g1, g2)))
    };

    let finish = |v: f64,
                  x: (f64, f64),
                  y: (f64, f64),
                  k: [f64; 2],
                  g: (f64, f64),
                  iterations: usize|
     -> EquilibriumResult<FlashResult> {
        debug!(v, x1 = x.0, y1 = y.0, iterations, "flash converged");
        Ok(FlashResult {
            vapor_fraction: v,
            x1: x.0,
            x2: x.1,
            y1: y.0,
            y2: y.1,
            k1: k[0],
            k2: k[1],
            gamma1: g.0,
            gamma2: g.1,
            pressure: spec.pressure,
            temperature: system.temperature,
            iterations,
        })
    };

    // Subcooled: liquid of feed composition does not boil at P.
    let (k_feed, g_feed) = k_values(z1)?;
    if rachford_rice(z, k_feed, 0.0) <= 0.0 {
        let y = normalize(k_feed[0] * z[0], k_feed[1] * z[1])?;
        return finish(0.0, (z[0], z[1]), y, k_feed, g_feed, 0);
    }

    // Superheated: vapor of feed composition does not condense at P.
    let dew = solve_dew(system, z1)?;
    if p <= dew.pressure_pa() {
        let (k, g) = k_values(dew.x1)?;
        return finish(1.0, (dew.x1, dew.x2), (z[0], z[1]), k, g, 0);
    }

    let mut x1 = z1;
    for iteration in 1..=MAX_ITERATIONS {
        let (k, _) = k_values(x1)?;
        let (v, x) = if rachford_rice(z, k, 1.0) >= 0.0 {
            // Past the dew point for these K-values: the liquid is the dew drop.
            (1.0, (dew.x1, dew.x2))
        } else {
            let v = solve_vapor_fraction(z, k);
            let x = normalize(
                z[0] / (1.0 + v * (k[0] - 1.0)),
                z[1] / (1.0 + v * (k[1] - 1.0)),
            )?;
            (v, x)
        };
        trace!(iteration, v, x1 = x.0, "flash pass");

        if !x.0.is_finite() {
            return Err(VleError::Domain {
                what: "liquid composition is not finite",
            });
        }
        if (x.0 - x1).abs() < TOLERANCE {
            let (k, g) = k_values(x.0)?;
            let y = normalize(k[0] * x.0, k[1] * x.1)?;
            return finish(v, x, y, k, g, iteration);
        }
        x1 = x.0;
    }

    debug!(z1, p, "successive substitution stalled, locating tie line");
    match tie_line(system, z1, p)? {
        Some(x1) => {
            let (k, g) = k_values(x1)?;
            let x = (x1, 1.0 - x1);
            let y = normalize(k[0] * x.0, k[1] * x.1)?;
            let v = ((z1 - x.0) / (y.0 - x.0)).clamp(0.0, 1.0);
            finish(v, x, y, k, g, MAX_ITERATIONS)
        }
        None => Err(VleError::ConvergenceFailed {
            what: "isothermal flash",
            iterations: MAX_ITERATIONS,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::ActivityModel;
    use tk_core::units::{k, pa};

    fn system(model: ActivityModel) -> BinarySystem {
        BinarySystem::new(k(350.0), pa(80_000.0), pa(40_000.0), model).unwrap()
    }

    fn spec(z1: f64, p: f64, model: ActivityModel) -> FlashSpec {
        FlashSpec {
            z1,
            pressure: pa(p),
            system: system(model),
        }
    }

    #[test]
    fn ideal_two_phase_split() {
        let r = flash(&spec(0.6, 60_000.0, ActivityModel::Ideal)).unwrap();
        // Raoult: x1 = (P − P2)/(P1 − P2), y1 = x1 P1 / P
        assert!((r.x1 - 0.5).abs() < 1e-9, "x1 = {}", r.x1);
        assert!((r.y1 - 2.0 / 3.0).abs() < 1e-9, "y1 = {}", r.y1);
        assert!((r.vapor_fraction - 0.6).abs() < 1e-8, "V = {}", r.vapor_fraction);
    }

    #[test]
    fn high_pressure_feed_stays_liquid() {
        let r = flash(&spec(0.5, 70_000.0, ActivityModel::Ideal)).unwrap();
        assert_eq!(r.vapor_fraction, 0.0);
        assert_eq!(r.x1, 0.5);
    }

    #[test]
    fn low_pressure_feed_is_all_vapor() {
        let r = flash(&spec(0.5, 45_000.0, ActivityModel::Ideal)).unwrap();
        assert_eq!(r.vapor_fraction, 1.0);
        assert!((r.y1 - 0.5).abs() < 1e-9);
    }

    #[test]
    fn wilson_mass_balance() {
        let model = ActivityModel::wilson(0.7, 1.1).unwrap();
        let r = flash(&spec(0.5, 58_000.0, model)).unwrap();
        assert!(r.vapor_fraction > 0.0 && r.vapor_fraction < 1.0);
        let z1 = (1.0 - r.vapor_fraction) * r.x1 + r.vapor_fraction * r.y1;
        assert!((z1 - 0.5).abs() < 1e-8, "z1 = {z1}");
        assert!((r.y1 - r.k1 * r.x1).abs() < 1e-8);
    }

    #[test]
    fn wilson_feed_below_dew_pressure_is_all_vapor() {
        // Minimum bubble pressure is about 27 kPa; the feed's dew point is about 30.3 kPa.
        let model = ActivityModel::wilson(3.0, 3.0).unwrap();
        let r = flash(&spec(0.1, 20_000.0, model)).unwrap();
        assert_eq!(r.vapor_fraction, 1.0);
        assert_eq!((r.y1, r.y2), (0.1, 0.9));
        assert!((r.x1 - 0.208_478).abs() < 1e-5, "x1 = {}", r.x1);
        assert!((r.x1 + r.x2 - 1.0).abs() < 1e-15);
    }

    #[test]
    fn strongly_non_ideal_split_conserves_mass() {
        let model = ActivityModel::wilson(5.0, 5.0).unwrap();
        let r = flash(&spec(0.9, 50_000.0, model)).unwrap();
        assert!((r.vapor_fraction - 0.516_565).abs() < 1e-5, "V = {}", r.vapor_fraction);
        assert!((r.x1 - 0.803_982).abs() < 1e-5, "x1 = {}", r.x1);
        let z1 = (1.0 - r.vapor_fraction) * r.x1 + r.vapor_fraction * r.y1;
        assert!((z1 - 0.9).abs() < 1e-8, "z1 = {z1}");
        assert!((r.y1 - r.k1 * r.x1).abs() < 1e-8);
    }

    #[test]
    fn invalid_feed_rejected() {
        assert!(matches!(
            flash(&spec(1.5, 60_000.0, ActivityModel::Ideal)),
            Err(VleError::InvalidInput { .. })
        ));
        assert!(flash(&spec(0.5, 0.0, ActivityModel::Ideal)).is_err());
    }
}
