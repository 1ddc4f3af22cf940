//! Rankine power cycle.

use crate::common::{check_finite, positive_divisor, require_efficiency, require_positive};
use crate::error::{CycleError, SolveResult};
use crate::result::{CycleKind, CycleResult, Performance};
use std::fmt;
use std::sync::Arc;
use tk_core::units::{Pressure, Temperature, to_k, to_pa};
use tk_props::{Phase, PropertyError, PropertyProvider, StateInput, ThermodynamicState};
use tracing::{debug, warn};

/// Pa·m³/kg → kJ/kg
const PA_M3_TO_KJ: f64 = 1.0e-3;

/// Boundary conditions of a Rankine cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RankineInput {
    pub p_boiler: Pressure,
    /// Turbine inlet temperature.
    pub t_boiler: Temperature,
    pub p_condenser: Pressure,
    /// Pump isentropic efficiency (0 < eta <= 1)
    pub eta_pump: f64,
    /// Turbine isentropic efficiency (0 < eta <= 1)
    pub eta_turbine: f64,
}

impl RankineInput {
    /// Check every scalar constraint that does not need property data.
    pub fn validate(&self) -> SolveResult<()> {
        let p_b = require_positive(
            to_pa(self.p_boiler),
            "boiler pressure must be positive and finite",
        )?;
        let p_c = require_positive(
            to_pa(self.p_condenser),
            "condenser pressure must be positive and finite",
        )?;
        require_positive(
            to_k(self.t_boiler),
            "boiler temperature must be positive and finite",
        )?;
        if p_c >= p_b {
            return Err(CycleError::InvalidInput {
                what: "condenser pressure must be below boiler pressure",
            });
        }
        require_efficiency(self.eta_pump, "pump efficiency must be in (0,1]")?;
        require_efficiency(self.eta_turbine, "turbine efficiency must be in (0,1]")?;
        Ok(())
    }
}

/// Four-state Rankine cycle.
///
/// ```text
/// 1 → 2  pump (saturated liquid compressed to boiler pressure)
/// 2 → 3  boiler (heat addition at constant pressure)
/// 3 → 4  turbine (expansion to condenser pressure)
/// 4 → 1  condenser (heat rejection at constant pressure)
/// ```
///
/// The pump treats the liquid as incompressible: `w_s = v1 (P_b − P_c)`, and
/// the outlet keeps the inlet temperature, entropy and volume.
#[derive(Clone)]
pub struct RankineCycleModel {
    provider: Arc<dyn PropertyProvider>,
}

impl RankineCycleModel {
    pub fn new(provider: Arc<dyn PropertyProvider>) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &dyn PropertyProvider {
        self.provider.as_ref()
    }

    pub fn solve(&self, input: &RankineInput) -> SolveResult<CycleResult> {
        solve(self.provider.as_ref(), input)
    }
}

impl fmt::Debug for RankineCycleModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RankineCycleModel")
            .field("provider", &self.provider.name())
            .finish()
    }
}

/// Solve a Rankine cycle with the given provider.
pub fn solve_rankine(
    provider: &dyn PropertyProvider,
    p_boiler: Pressure,
    t_boiler: Temperature,
    p_condenser: Pressure,
    eta_pump: f64,
    eta_turbine: f64,
) -> SolveResult<CycleResult> {
    solve(
        provider,
        &RankineInput {
            p_boiler,
            t_boiler,
            p_condenser,
            eta_pump,
            eta_turbine,
        },
    )
}

fn solve(provider: &dyn PropertyProvider, input: &RankineInput) -> SolveResult<CycleResult> {
    input.validate()?;
    let p_b = to_pa(input.p_boiler);
    let p_c = to_pa(input.p_condenser);
    let t_b = to_k(input.t_boiler);

    // State 1: saturated liquid leaving the condenser
    let state1 = provider.steam_state(StateInput::PQ {
        p: input.p_condenser,
        x: 0.0,
    })?;
    let v1 = state1.specific_volume().ok_or(CycleError::PropertyLookup(
        PropertyError::NotSupported {
            what: "provider gave no specific volume for saturated liquid",
        },
    ))?;
    let t1 = state1.temperature_k();
    let h1 = state1.enthalpy();
    if t_b <= t1 {
        return Err(CycleError::InvalidInput {
            what: "boiler temperature must exceed condenser saturation temperature",
        });
    }

    // Pump
    let w_pump_s = check_finite(v1 * (p_b - p_c) * PA_M3_TO_KJ, "isentropic pump work")?;
    let w_pump = check_finite(w_pump_s / input.eta_pump, "pump work")?;
    let h2 = check_finite(h1 + w_pump, "pump outlet enthalpy")?;
    let state2 = ThermodynamicState::single_phase(
        Phase::Subcooled,
        input.p_boiler,
        state1.temperature(),
        h2,
        state1.entropy(),
        Some(v1),
    )?;

    // Boiler exit
    let state3 = provider.steam_state(StateInput::PT {
        p: input.p_boiler,
        t: input.t_boiler,
    })?;
    let h3 = state3.enthalpy();

    // Turbine
    let state4s = provider.steam_state(StateInput::PS {
        p: input.p_condenser,
        s: state3.entropy(),
    })?;
    let w_turb_s = check_finite(h3 - state4s.enthalpy(), "isentropic turbine work")?;
    let w_turb = positive_divisor(w_turb_s * input.eta_turbine, "turbine work must be positive")?;
    let h4 = h3 - w_turb;
    let state4 = provider.steam_state(StateInput::PH {
        p: input.p_condenser,
        h: h4,
    })?;

    let q_in = positive_divisor(h3 - h2, "boiler heat input must be positive")?;
    let q_out = check_finite(h4 - h1, "condenser heat rejection")?;
    let w_net = w_turb - w_pump;
    let thermal_efficiency = check_finite(w_net / q_in, "thermal efficiency")?;
    let carnot_efficiency = 1.0 - t1 / t_b;
    let back_work_ratio = check_finite(w_pump / w_turb, "back work ratio")?;

    let result = CycleResult {
        kind: CycleKind::Rankine,
        states: vec![state1, state2, state3, state4],
        compression_work: w_pump,
        expansion_work: w_turb,
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
        provider = provider.name(),
        w_pump, w_turb, q_in, thermal_efficiency, "solved Rankine cycle"
    );
    if result.exceeds_carnot_bound() {
        warn!(
            thermal_efficiency,
            carnot_efficiency, "Rankine efficiency exceeds the Carnot bound"
        );
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tk_core::units::{k, kpa, mpa};
    use tk_props::SimplifiedProvider;

    fn base_input() -> RankineInput {
        RankineInput {
            p_boiler: mpa(3.0),
            t_boiler: k(623.15),
            p_condenser: kpa(75.0),
            eta_pump: 0.85,
            eta_turbine: 0.85,
        }
    }

    fn model() -> RankineCycleModel {
        RankineCycleModel::new(Arc::new(SimplifiedProvider::default()))
    }

    #[test]
    fn simplified_cycle_values() {
        let r = model().solve(&base_input()).unwrap();

        let w_pump = 0.001 * (3.0e6 - 75.0e3) / 1000.0 / 0.85;
        assert!((r.compression_work - w_pump).abs() < 1e-9);
        assert!((r.states[0].enthalpy() - 167.5).abs() < 1e-12);
        assert!((r.states[1].enthalpy() - (167.5 + w_pump)).abs() < 1e-9);
        assert!((r.states[2].enthalpy() - 3000.0).abs() < 1e-12);
        assert!((r.expansion_work - 0.85 * 800.0).abs() < 0.1);
        assert!((r.heat_input - 2829.06).abs() < 0.01, "q_in = {}", r.heat_input);

        let eta = r.thermal_efficiency().unwrap();
        assert!((eta - 0.2392).abs() < 1e-3, "eta = {eta}");
        assert!(!r.exceeds_carnot_bound());
    }

    #[test]
    fn pump_outlet_is_compressed_liquid() {
        let r = model().solve(&base_input()).unwrap();
        let s2 = &r.states[1];
        assert_eq!(s2.phase(), Phase::Subcooled);
        assert_eq!(s2.quality(), None);
        assert_eq!(s2.temperature_k(), r.states[0].temperature_k());
        assert_eq!(s2.entropy(), r.states[0].entropy());
        assert!((s2.pressure_pa() - 3.0e6).abs() < 1e-6);
    }

    #[test]
    fn net_work_and_energy_balance() {
        let r = model().solve(&base_input()).unwrap();
        assert!((r.net_work - (r.expansion_work - r.compression_work)).abs() < 1e-12);
        assert!((r.heat_input - r.heat_output - r.net_work).abs() < 1e-9);
    }

    #[test]
    fn low_boiler_temperature_is_flagged_not_rejected() {
        let input = RankineInput {
            t_boiler: k(320.0),
            ..base_input()
        };
        let r = model().solve(&input).unwrap();
        assert!(r.exceeds_carnot_bound());
    }

    #[test]
    fn boiler_below_saturation_is_invalid() {
        let input = RankineInput {
            t_boiler: k(300.0),
            ..base_input()
        };
        assert!(matches!(
            model().solve(&input),
            Err(CycleError::InvalidInput { .. })
        ));
    }

    #[test]
    fn efficiency_out_of_range_is_invalid() {
        for eta in [0.0, -0.1, 1.5, f64::NAN] {
            let input = RankineInput {
                eta_turbine: eta,
                ..base_input()
            };
            assert!(matches!(
                model().solve(&input),
                Err(CycleError::InvalidInput { .. })
            ));
        }
    }

    #[test]
    fn solve_is_idempotent() {
        let m = model();
        assert_eq!(m.solve(&base_input()).unwrap(), m.solve(&base_input()).unwrap());
    }
}
