//! Thermodynamic state definitions.

use crate::error::{PropertyError, PropertyResult};
use crate::provider::validation;
use std::fmt;
use tk_core::units::{Pressure, SpecEnthalpy, SpecEntropy, SpecVolume, Temperature, to_k, to_pa};

/// Phase label of a state point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Phase {
    /// Compressed liquid below the saturation line.
    Subcooled,
    Superheated,
    SaturatedLiquid,
    SaturatedVapor,
    /// Liquid-vapor mixture inside the saturation dome.
    TwoPhase,
}

impl Phase {
    /// Phase label for a point on or inside the saturation envelope.
    ///
    /// The endpoints map to the saturated labels exactly.
    pub fn from_quality(x: f64) -> Self {
        if x <= 0.0 {
            Phase::SaturatedLiquid
        } else if x >= 1.0 {
            Phase::SaturatedVapor
        } else {
            Phase::TwoPhase
        }
    }

    /// Whether a state with this phase carries a quality.
    pub fn has_quality(self) -> bool {
        matches!(
            self,
            Phase::SaturatedLiquid | Phase::SaturatedVapor | Phase::TwoPhase
        )
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Phase::Subcooled => "subcooled liquid",
            Phase::Superheated => "superheated vapor",
            Phase::SaturatedLiquid => "saturated liquid",
            Phase::SaturatedVapor => "saturated vapor",
            Phase::TwoPhase => "two-phase mixture",
        };
        f.write_str(label)
    }
}

/// Input specification for a state lookup: pressure plus one other
/// independent intensive property.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StateInput {
    /// Pressure and temperature.
    PT { p: Pressure, t: Temperature },
    /// Pressure and vapor quality.
    PQ { p: Pressure, x: f64 },
    /// Pressure and specific entropy [kJ/(kg·K)].
    PS { p: Pressure, s: SpecEntropy },
    /// Pressure and specific enthalpy [kJ/kg].
    PH { p: Pressure, h: SpecEnthalpy },
}

impl StateInput {
    pub fn pressure(&self) -> Pressure {
        match *self {
            StateInput::PT { p, .. }
            | StateInput::PQ { p, .. }
            | StateInput::PS { p, .. }
            | StateInput::PH { p, .. } => p,
        }
    }
}

/// A single state point in a cycle.
///
/// Quality is present exactly when the phase is on or inside the saturation
/// dome; for subcooled and superheated states it is `None`, never zero.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ThermodynamicState {
    p: Pressure,
    t: Temperature,
    h: SpecEnthalpy,
    s: SpecEntropy,
    v: Option<SpecVolume>,
    quality: Option<f64>,
    phase: Phase,
}

impl ThermodynamicState {
    /// Create a state, checking every field and the phase/quality pairing.
    pub fn new(
        phase: Phase,
        p: Pressure,
        t: Temperature,
        h: SpecEnthalpy,
        s: SpecEntropy,
        v: Option<SpecVolume>,
        quality: Option<f64>,
    ) -> PropertyResult<Self> {
        validation::validate_pressure(p)?;
        validation::validate_temperature(t)?;
        validation::validate_enthalpy(h)?;
        validation::validate_entropy(s)?;
        if let Some(v) = v {
            validation::validate_specific_volume(v)?;
        }

        match (phase.has_quality(), quality) {
            (true, Some(x)) => {
                validation::validate_quality(x)?;
                let expected = match phase {
                    Phase::SaturatedLiquid => Some(0.0),
                    Phase::SaturatedVapor => Some(1.0),
                    _ => None,
                };
                if let Some(expected) = expected
                    && x != expected
                {
                    return Err(PropertyError::InvalidArg {
                        what: "saturated state quality must be 0 (liquid) or 1 (vapor)",
                    });
                }
            }
            (true, None) => {
                return Err(PropertyError::InvalidArg {
                    what: "saturated or two-phase state requires a quality",
                });
            }
            (false, Some(_)) => {
                return Err(PropertyError::InvalidArg {
                    what: "quality is undefined outside the two-phase envelope",
                });
            }
            (false, None) => {}
        }

        Ok(Self {
            p,
            t,
            h,
            s,
            v,
            quality,
            phase,
        })
    }

    /// Subcooled or superheated state (no quality).
    pub fn single_phase(
        phase: Phase,
        p: Pressure,
        t: Temperature,
        h: SpecEnthalpy,
        s: SpecEntropy,
        v: Option<SpecVolume>,
    ) -> PropertyResult<Self> {
        Self::new(phase, p, t, h, s, v, None)
    }

    /// State on or inside the saturation envelope; the phase follows from `x`.
    pub fn saturated(
        p: Pressure,
        t: Temperature,
        h: SpecEnthalpy,
        s: SpecEntropy,
        v: Option<SpecVolume>,
        x: f64,
    ) -> PropertyResult<Self> {
        validation::validate_quality(x)?;
        Self::new(Phase::from_quality(x), p, t, h, s, v, Some(x))
    }

    /// Same state with the enthalpy replaced.
    pub fn with_enthalpy(mut self, h: SpecEnthalpy) -> PropertyResult<Self> {
        validation::validate_enthalpy(h)?;
        self.h = h;
        Ok(self)
    }

    pub fn pressure(&self) -> Pressure {
        self.p
    }

    pub fn temperature(&self) -> Temperature {
        self.t
    }

    /// Pressure [Pa].
    pub fn pressure_pa(&self) -> f64 {
        to_pa(self.p)
    }

    /// Temperature [K].
    pub fn temperature_k(&self) -> f64 {
        to_k(self.t)
    }

    /// Specific enthalpy [kJ/kg].
    pub fn enthalpy(&self) -> SpecEnthalpy {
        self.h
    }

    /// Specific entropy [kJ/(kg·K)].
    pub fn entropy(&self) -> SpecEntropy {
        self.s
    }

    /// Specific volume [m³/kg], if the provider supplied one.
    pub fn specific_volume(&self) -> Option<SpecVolume> {
        self.v
    }

    pub fn quality(&self) -> Option<f64> {
        self.quality
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tk_core::units::{k, kpa, pa};

    #[test]
    fn saturated_phase_follows_quality() {
        let liquid =
            ThermodynamicState::saturated(kpa(75.0), k(313.15), 167.5, 0.572, Some(0.001), 0.0)
                .unwrap();
        assert_eq!(liquid.phase(), Phase::SaturatedLiquid);
        assert_eq!(liquid.quality(), Some(0.0));

        let mix = ThermodynamicState::saturated(kpa(75.0), k(313.15), 1367.5, 4.072, None, 0.5)
            .unwrap();
        assert_eq!(mix.phase(), Phase::TwoPhase);

        let vapor = ThermodynamicState::saturated(kpa(75.0), k(313.15), 2567.5, 7.572, None, 1.0)
            .unwrap();
        assert_eq!(vapor.phase(), Phase::SaturatedVapor);
    }

    #[test]
    fn single_phase_has_no_quality() {
        let state = ThermodynamicState::single_phase(
            Phase::Superheated,
            pa(3.0e6),
            k(623.15),
            3000.0,
            6.5,
            None,
        )
        .unwrap();
        assert_eq!(state.quality(), None);
        assert_eq!(state.specific_volume(), None);
    }

    #[test]
    fn reject_quality_outside_envelope() {
        let result = ThermodynamicState::new(
            Phase::Subcooled,
            pa(3.0e6),
            k(313.15),
            170.0,
            0.572,
            None,
            Some(0.0),
        );
        assert!(result.is_err());
    }

    #[test]
    fn reject_two_phase_without_quality() {
        let result = ThermodynamicState::new(
            Phase::TwoPhase,
            pa(1.0e5),
            k(373.15),
            1000.0,
            3.0,
            None,
            None,
        );
        assert!(result.is_err());
    }

    #[test]
    fn reject_mislabelled_saturated_vapor() {
        let result = ThermodynamicState::new(
            Phase::SaturatedVapor,
            pa(1.0e5),
            k(373.15),
            2500.0,
            7.0,
            None,
            Some(0.4),
        );
        assert!(result.is_err());
    }

    #[test]
    fn reject_non_physical_fields() {
        let liquid = |p: f64, t: f64, h: f64, v: Option<f64>| {
            ThermodynamicState::single_phase(Phase::Subcooled, pa(p), k(t), h, 0.3, v)
        };
        assert!(liquid(1.0e5, 300.0, 100.0, None).is_ok());
        assert!(liquid(-1.0, 300.0, 100.0, None).is_err());
        assert!(liquid(1.0e5, 0.0, 100.0, None).is_err());
        assert!(liquid(1.0e5, 300.0, f64::NAN, None).is_err());
        assert!(liquid(1.0e5, 300.0, 100.0, Some(-0.001)).is_err());
    }

    #[test]
    fn with_enthalpy_keeps_other_fields() {
        let state = ThermodynamicState::saturated(pa(2.0e5), k(263.15), 251.0, 1.3, None, 0.3)
            .unwrap()
            .with_enthalpy(250.0)
            .unwrap();
        assert_eq!(state.enthalpy(), 250.0);
        assert_eq!(state.quality(), Some(0.3));
        assert_eq!(state.phase(), Phase::TwoPhase);
    }
}
