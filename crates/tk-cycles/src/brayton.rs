//! Brayton gas-turbine cycle on an ideal gas with constant γ.

use crate::common::{check_finite, positive_divisor, require_efficiency, require_positive};
use crate::error::{CycleError, SolveResult};
use crate::ideal_gas::{entropy_change, isentropic_temperature};
use crate::result::{CycleKind, CycleResult, Performance};
use tk_core::units::constants::{GAMMA_AIR, R_AIR_KJ_PER_KG_K};
use tk_core::units::{Pressure, Temperature, k, pa, to_k, to_pa};
use tk_props::{Phase, ThermodynamicState};
use tracing::{debug, warn};

/// Boundary conditions of a Brayton cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BraytonInput {
    /// Compressor inlet pressure.
    pub p1: Pressure,
    /// Compressor inlet temperature.
    pub t1: Temperature,
    /// Compressor outlet (combustor) pressure.
    pub p2: Pressure,
    /// Turbine inlet temperature.
    pub t3: Temperature,
    pub eta_compressor: f64,
    pub eta_turbine: f64,
}

/// Solved Brayton cycle plus the isentropic outlet temperatures.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BraytonSolution {
    pub cycle: CycleResult,
    /// Isentropic compressor outlet temperature [K]
    pub t2s: f64,
    /// Isentropic turbine outlet temperature [K]
    pub t4s: f64,
}

/// Ideal-gas Brayton cycle.
///
/// Energies use `R/(γ−1)` per kelvin, so state enthalpies are `R·T/(γ−1)`
/// and differences between states equal the work and heat terms. Entropy is
/// measured from state 1.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BraytonCycleModel {
    /// Heat capacity ratio cp/cv (> 1)
    pub gamma: f64,
    /// Specific gas constant [kJ/(kg·K)]
    pub gas_constant: f64,
}

impl Default for BraytonCycleModel {
    fn default() -> Self {
        Self {
            gamma: GAMMA_AIR,
            gas_constant: R_AIR_KJ_PER_KG_K,
        }
    }
}

impl BraytonCycleModel {
    pub fn new(gamma: f64, gas_constant: f64) -> SolveResult<Self> {
        let model = Self {
            gamma,
            gas_constant,
        };
        model.validate()?;
        Ok(model)
    }

    fn validate(&self) -> SolveResult<()> {
        if !(self.gamma.is_finite() && self.gamma > 1.0) {
            return Err(CycleError::InvalidInput {
                what: "heat capacity ratio must be greater than 1",
            });
        }
        require_positive(self.gas_constant, "gas constant must be positive and finite")?;
        Ok(())
    }

    pub fn solve(&self, input: &BraytonInput) -> SolveResult<BraytonSolution> {
        self.validate()?;
        let p1 = require_positive(
            to_pa(input.p1),
            "compressor inlet pressure must be positive and finite",
        )?;
        let t1 = require_positive(
            to_k(input.t1),
            "compressor inlet temperature must be positive and finite",
        )?;
        let p2 = require_positive(
            to_pa(input.p2),
            "compressor outlet pressure must be positive and finite",
        )?;
        let t3 = require_positive(
            to_k(input.t3),
            "turbine inlet temperature must be positive and finite",
        )?;
        if p2 <= p1 {
            return Err(CycleError::InvalidInput {
                what: "compressor outlet pressure must exceed inlet pressure",
            });
        }
        if t3 <= t1 {
            return Err(CycleError::InvalidInput {
                what: "turbine inlet temperature must exceed compressor inlet temperature",
            });
        }
        let eta_c = require_efficiency(
            input.eta_compressor,
            "compressor efficiency must be in (0,1]",
        )?;
        let eta_t = require_efficiency(input.eta_turbine, "turbine efficiency must be in (0,1]")?;

        let (gamma, r) = (self.gamma, self.gas_constant);
        let cv = r / (gamma - 1.0);
        let cp = gamma * cv;

        // Compressor
        let t2s = isentropic_temperature(t1, p2 / p1, gamma)?;
        let w_c_s = cv * (t2s - t1);
        let w_c = check_finite(w_c_s / eta_c, "compressor work")?;
        let t2 = t1 + w_c / cv;
        if t2 >= t3 {
            return Err(CycleError::InvalidInput {
                what: "compressor outlet temperature must be below turbine inlet temperature",
            });
        }

        // Turbine
        let t4s = isentropic_temperature(t3, p1 / p2, gamma)?;
        let w_t_s = cv * (t3 - t4s);
        let w_t = positive_divisor(w_t_s * eta_t, "turbine work must be positive")?;
        let t4 = t3 - w_t / cv;

        let q_in = positive_divisor(cv * (t3 - t2), "combustor heat input must be positive")?;
        let q_out = check_finite(cv * (t4 - t1), "exhaust heat rejection")?;
        let w_net = w_t - w_c;
        let thermal_efficiency = check_finite(w_net / q_in, "thermal efficiency")?;
        let carnot_efficiency = 1.0 - t1 / t3;
        let back_work_ratio = check_finite(w_c / w_t, "back work ratio")?;

        let state = |p: f64, t: f64| -> SolveResult<ThermodynamicState> {
            let s = entropy_change(t1, t, p1, p, cp, r)?;
            let v = check_finite(r * 1.0e3 * t / p, "specific volume")?;
            Ok(ThermodynamicState::single_phase(
                Phase::Superheated,
                pa(p),
                k(t),
                cv * t,
                s,
                Some(v),
            )?)
        };
        let states = vec![state(p1, t1)?, state(p2, t2)?, state(p2, t3)?, state(p1, t4)?];

        let cycle = CycleResult {
            kind: CycleKind::Brayton,
            states,
            compression_work: w_c,
            expansion_work: w_t,
            net_work: w_net,
            heat_input: q_in,
            heat_output: q_out,
            performance: Performance::Power {
                thermal_efficiency,
                carnot_efficiency,
                back_work_ratio,
            },
        };

        debug!(
            t2s,
            t2,
            t4s,
            t4,
            w_c,
            w_t,
            thermal_efficiency,
            "solved Brayton cycle"
        );
        if cycle.exceeds_carnot_bound() {
            warn!(
                thermal_efficiency,
                carnot_efficiency, "Brayton efficiency exceeds the Carnot bound"
            );
        }

        Ok(BraytonSolution { cycle, t2s, t4s })
    }
}

/// Solve a Brayton cycle for air (R = 0.287 kJ/(kg·K)) with the given γ.
pub fn solve_brayton(
    p1: Pressure,
    t1: Temperature,
    p2: Pressure,
    t3: Temperature,
    eta_compressor: f64,
    eta_turbine: f64,
    gamma: f64,
) -> SolveResult<BraytonSolution> {
    BraytonCycleModel::new(gamma, R_AIR_KJ_PER_KG_K)?.solve(&BraytonInput {
        p1,
        t1,
        p2,
        t3,
        eta_compressor,
        eta_turbine,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn reference() -> BraytonInput {
        BraytonInput {
            p1: pa(100_000.0),
            t1: k(300.0),
            p2: pa(500_000.0),
            t3: k(1400.0),
            eta_compressor: 0.85,
            eta_turbine: 0.90,
        }
    }

    #[test]
    fn reference_scenario() {
        let sol = BraytonCycleModel::default().solve(&reference()).unwrap();
        assert!((sol.t2s - 475.4).abs() < 0.5, "T2s = {}", sol.t2s);
        assert!((sol.cycle.states[1].temperature_k() - 506.4).abs() < 0.5);

        let eta = sol.cycle.thermal_efficiency().unwrap();
        let carnot = 1.0 - 300.0 / 1400.0;
        assert!(eta > 0.0 && eta < carnot, "eta = {eta}");
        assert!((eta - 0.2895).abs() < 1e-3, "eta = {eta}");
    }

    #[test]
    fn energy_balance_closes() {
        let c = BraytonCycleModel::default().solve(&reference()).unwrap().cycle;
        assert!((c.heat_input - c.heat_output - c.net_work).abs() < 1e-9);
        assert!((c.net_work - (c.expansion_work - c.compression_work)).abs() < 1e-12);
    }

    #[test]
    fn repeated_solves_are_identical() {
        let model = BraytonCycleModel::default();
        assert_eq!(model.solve(&reference()), model.solve(&reference()));
    }

    #[test]
    fn state_enthalpies_match_energy_terms() {
        let c = BraytonCycleModel::default().solve(&reference()).unwrap().cycle;
        let h: Vec<f64> = c.states.iter().map(|s| s.enthalpy()).collect();
        assert!((h[1] - h[0] - c.compression_work).abs() < 1e-9);
        assert!((h[2] - h[3] - c.expansion_work).abs() < 1e-9);
        assert!((h[2] - h[1] - c.heat_input).abs() < 1e-9);
    }

    #[test]
    fn entropy_rises_through_irreversible_compression() {
        let c = BraytonCycleModel::default().solve(&reference()).unwrap().cycle;
        assert_eq!(c.states[0].entropy(), 0.0);
        assert!(c.states[1].entropy() > 0.0);
        assert!(c.states.iter().all(|s| s.phase() == Phase::Superheated));
    }

    #[test]
    fn ideal_components_hit_isentropic_temperatures() {
        let input = BraytonInput {
            eta_compressor: 1.0,
            eta_turbine: 1.0,
            ..reference()
        };
        let sol = BraytonCycleModel::default().solve(&input).unwrap();
        assert!((sol.cycle.states[1].temperature_k() - sol.t2s).abs() < 1e-9);
        assert!((sol.cycle.states[3].temperature_k() - sol.t4s).abs() < 1e-9);
    }

    #[test]
    fn rejects_bad_inputs() {
        let model = BraytonCycleModel::default();
        let cases = [
            BraytonInput {
                p2: pa(100_000.0),
                ..reference()
            },
            BraytonInput {
                t3: k(300.0),
                ..reference()
            },
            BraytonInput {
                eta_turbine: 0.0,
                ..reference()
            },
            // T2 above T3: no heat addition
            BraytonInput {
                t3: k(450.0),
                ..reference()
            },
        ];
        for input in cases {
            assert!(matches!(
                model.solve(&input),
                Err(CycleError::InvalidInput { .. })
            ));
        }
        assert!(BraytonCycleModel::new(1.0, 0.287).is_err());
        assert!(BraytonCycleModel::new(1.4, 0.0).is_err());
    }

    proptest! {
        #[test]
        fn efficiency_stays_below_carnot(
            ratio in 1.5_f64..20.0,
            t3 in 1000.0_f64..1800.0,
            eta_c in 0.7_f64..=1.0,
            eta_t in 0.7_f64..=1.0,
        ) {
            let input = BraytonInput {
                p2: pa(100_000.0 * ratio),
                t3: k(t3),
                eta_compressor: eta_c,
                eta_turbine: eta_t,
                ..reference()
            };
            let c = BraytonCycleModel::default().solve(&input).unwrap().cycle;
            prop_assert!(!c.exceeds_carnot_bound());
            prop_assert!((c.heat_input - c.heat_output - c.net_work).abs() < 1e-9);
        }
    }
}
