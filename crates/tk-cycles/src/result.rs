//! Cycle solution values.

use std::fmt;
use tk_props::ThermodynamicState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CycleKind {
    Rankine,
    Brayton,
    Refrigeration,
}

impl fmt::Display for CycleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CycleKind::Rankine => "Rankine",
            CycleKind::Brayton => "Brayton",
            CycleKind::Refrigeration => "Refrigeration",
        };
        f.write_str(label)
    }
}

/// Figures of merit, which depend on whether the cycle produces or absorbs work.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Performance {
    Power {
        thermal_efficiency: f64,
        carnot_efficiency: f64,
        /// Compression work over expansion work.
        back_work_ratio: f64,
    },
    Refrigeration {
        cop: f64,
        carnot_cop: f64,
    },
}

/// Complete solution of a four-state cycle.
///
/// Energies are specific [kJ/kg]. Work terms are positive magnitudes and
/// `net_work = expansion_work - compression_work`, so a refrigeration cycle
/// has negative net work.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CycleResult {
    pub kind: CycleKind,
    /// State points in process order (state 1 first).
    pub states: Vec<ThermodynamicState>,
    /// Pump or compressor work.
    pub compression_work: f64,
    /// Turbine work (zero for refrigeration).
    pub expansion_work: f64,
    pub net_work: f64,
    /// Boiler/combustor heat, or evaporator heat for refrigeration.
    pub heat_input: f64,
    /// Condenser/exhaust heat rejected.
    pub heat_output: f64,
    pub performance: Performance,
}

impl CycleResult {
    pub fn thermal_efficiency(&self) -> Option<f64> {
        match self.performance {
            Performance::Power {
                thermal_efficiency, ..
            } => Some(thermal_efficiency),
            Performance::Refrigeration { .. } => None,
        }
    }

    pub fn cop(&self) -> Option<f64> {
        match self.performance {
            Performance::Refrigeration { cop, .. } => Some(cop),
            Performance::Power { .. } => None,
        }
    }

    /// True when the reported figure of merit beats the reversible cycle
    /// between the same temperatures.
    ///
    /// A physical cycle never does; with placeholder property data it can.
    pub fn exceeds_carnot_bound(&self) -> bool {
        match self.performance {
            Performance::Power {
                thermal_efficiency,
                carnot_efficiency,
                ..
            } => thermal_efficiency > carnot_efficiency,
            Performance::Refrigeration { cop, carnot_cop } => cop > carnot_cop,
        }
    }

    /// State by its 1-based cycle number.
    pub fn state(&self, number: usize) -> Option<&ThermodynamicState> {
        number.checked_sub(1).and_then(|i| self.states.get(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tk_core::units::{k, pa};
    use tk_props::Phase;

    fn result(performance: Performance) -> CycleResult {
        let state = ThermodynamicState::single_phase(
            Phase::Superheated,
            pa(1.0e5),
            k(300.0),
            215.25,
            0.0,
            None,
        )
        .unwrap();
        CycleResult {
            kind: CycleKind::Brayton,
            states: vec![state],
            compression_work: 1.0,
            expansion_work: 2.0,
            net_work: 1.0,
            heat_input: 4.0,
            heat_output: 3.0,
            performance,
        }
    }

    #[test]
    fn carnot_bound_flags_power_cycles() {
        let ok = result(Performance::Power {
            thermal_efficiency: 0.25,
            carnot_efficiency: 0.5,
            back_work_ratio: 0.5,
        });
        assert!(!ok.exceeds_carnot_bound());
        assert_eq!(ok.thermal_efficiency(), Some(0.25));
        assert_eq!(ok.cop(), None);

        let bad = result(Performance::Power {
            thermal_efficiency: 0.6,
            carnot_efficiency: 0.5,
            back_work_ratio: 0.5,
        });
        assert!(bad.exceeds_carnot_bound());
    }

    #[test]
    fn carnot_bound_flags_refrigeration() {
        let r = result(Performance::Refrigeration {
            cop: 6.0,
            carnot_cop: 5.0,
        });
        assert!(r.exceeds_carnot_bound());
        assert_eq!(r.cop(), Some(6.0));
    }

    #[test]
    fn states_are_one_based() {
        let r = result(Performance::Refrigeration {
            cop: 1.0,
            carnot_cop: 5.0,
        });
        assert!(r.state(0).is_none());
        assert!(r.state(1).is_some());
        assert!(r.state(2).is_none());
    }
}
