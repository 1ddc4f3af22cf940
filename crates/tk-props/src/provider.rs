//! Property provider trait and validation helpers.

use crate::error::PropertyResult;
use crate::refrigerant::Refrigerant;
use crate::state::{StateInput, ThermodynamicState};
use std::sync::Arc;
use tk_core::units::{Pressure, SpecEnthalpy, Temperature};

/// The three refrigerant states a provider resolves directly.
///
/// The throttled state is looked up separately with
/// [`PropertyProvider::refrigerant_state_ph`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RefrigerantStates {
    /// Saturated vapor at the evaporator temperature.
    pub evaporator_exit: ThermodynamicState,
    /// Superheated vapor after compression to the condensing pressure.
    pub compressor_exit: ThermodynamicState,
    /// Saturated liquid at the condenser temperature.
    pub condenser_exit: ThermodynamicState,
}

/// Source of thermodynamic properties for the cycle solvers.
///
/// Implementations must be thread-safe (Send + Sync) so one provider can
/// serve many solver calls in parallel. Lookups are pure: the same input
/// always yields the same state.
pub trait PropertyProvider: Send + Sync {
    /// Get the provider name (for debugging/logging).
    fn name(&self) -> &str;

    /// Resolve a water/steam state from two independent properties.
    fn steam_state(&self, input: StateInput) -> PropertyResult<ThermodynamicState>;

    /// Check if this provider has data for the given refrigerant.
    fn supports_refrigerant(&self, refrigerant: Refrigerant) -> bool;

    /// Evaporator exit, compressor exit and condenser exit states for a
    /// vapor-compression cycle between the two saturation temperatures.
    fn refrigerant_states(
        &self,
        refrigerant: Refrigerant,
        t_evap: Temperature,
        t_cond: Temperature,
    ) -> PropertyResult<RefrigerantStates>;

    /// Resolve a refrigerant state from pressure and specific enthalpy [kJ/kg].
    fn refrigerant_state_ph(
        &self,
        refrigerant: Refrigerant,
        p: Pressure,
        h: SpecEnthalpy,
    ) -> PropertyResult<ThermodynamicState>;
}

impl<P: PropertyProvider + ?Sized> PropertyProvider for Arc<P> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn steam_state(&self, input: StateInput) -> PropertyResult<ThermodynamicState> {
        (**self).steam_state(input)
    }

    fn supports_refrigerant(&self, refrigerant: Refrigerant) -> bool {
        (**self).supports_refrigerant(refrigerant)
    }

    fn refrigerant_states(
        &self,
        refrigerant: Refrigerant,
        t_evap: Temperature,
        t_cond: Temperature,
    ) -> PropertyResult<RefrigerantStates> {
        (**self).refrigerant_states(refrigerant, t_evap, t_cond)
    }

    fn refrigerant_state_ph(
        &self,
        refrigerant: Refrigerant,
        p: Pressure,
        h: SpecEnthalpy,
    ) -> PropertyResult<ThermodynamicState> {
        (**self).refrigerant_state_ph(refrigerant, p, h)
    }
}

/// Validation helpers for state inputs.
pub(crate) mod validation {
    use crate::error::{PropertyError, PropertyResult};
    use crate::state::StateInput;
    use tk_core::units::{Pressure, Temperature, to_k, to_pa};

    /// Ensure pressure is positive and finite.
    pub fn validate_pressure(p: Pressure) -> PropertyResult<()> {
        let p = to_pa(p);
        if !p.is_finite() || p <= 0.0 {
            return Err(PropertyError::NonPhysical {
                what: "pressure must be positive and finite",
            });
        }
        Ok(())
    }

    /// Ensure temperature is positive and finite.
    pub fn validate_temperature(t: Temperature) -> PropertyResult<()> {
        let t = to_k(t);
        if !t.is_finite() || t <= 0.0 {
            return Err(PropertyError::NonPhysical {
                what: "temperature must be positive and finite",
            });
        }
        Ok(())
    }

    /// Ensure enthalpy is finite (can be negative).
    pub fn validate_enthalpy(h: f64) -> PropertyResult<()> {
        if !h.is_finite() {
            return Err(PropertyError::NonPhysical {
                what: "enthalpy must be finite",
            });
        }
        Ok(())
    }

    /// Ensure entropy is finite (can be negative).
    pub fn validate_entropy(s: f64) -> PropertyResult<()> {
        if !s.is_finite() {
            return Err(PropertyError::NonPhysical {
                what: "entropy must be finite",
            });
        }
        Ok(())
    }

    pub fn validate_specific_volume(v: f64) -> PropertyResult<()> {
        if !v.is_finite() || v <= 0.0 {
            return Err(PropertyError::NonPhysical {
                what: "specific volume must be positive and finite",
            });
        }
        Ok(())
    }

    /// Ensure quality lies in [0, 1].
    pub fn validate_quality(x: f64) -> PropertyResult<()> {
        if !(0.0..=1.0).contains(&x) {
            return Err(PropertyError::InvalidArg {
                what: "quality must lie in [0, 1]",
            });
        }
        Ok(())
    }

    /// Validate both halves of a state input.
    pub fn validate_input(input: &StateInput) -> PropertyResult<()> {
        match *input {
            StateInput::PT { p, t } => {
                validate_pressure(p)?;
                validate_temperature(t)
            }
            StateInput::PQ { p, x } => {
                validate_pressure(p)?;
                validate_quality(x)
            }
            StateInput::PS { p, s } => {
                validate_pressure(p)?;
                validate_entropy(s)
            }
            StateInput::PH { p, h } => {
                validate_pressure(p)?;
                validate_enthalpy(h)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::validation::*;
    use crate::state::StateInput;
    use tk_core::units::{k, pa};

    #[test]
    fn validate_positive_pressure() {
        assert!(validate_pressure(pa(101325.0)).is_ok());
        assert!(validate_pressure(pa(-100.0)).is_err());
        assert!(validate_pressure(pa(0.0)).is_err());
        assert!(validate_pressure(pa(f64::NAN)).is_err());
    }

    #[test]
    fn validate_positive_temperature() {
        assert!(validate_temperature(k(300.0)).is_ok());
        assert!(validate_temperature(k(-10.0)).is_err());
        assert!(validate_temperature(k(0.0)).is_err());
    }

    #[test]
    fn validate_quality_bounds() {
        assert!(validate_quality(0.0).is_ok());
        assert!(validate_quality(1.0).is_ok());
        assert!(validate_quality(-0.01).is_err());
        assert!(validate_quality(1.01).is_err());
        assert!(validate_quality(f64::NAN).is_err());
    }

    #[test]
    fn validate_input_checks_second_property() {
        assert!(validate_input(&StateInput::PH { p: pa(1.0e5), h: f64::INFINITY }).is_err());
        assert!(validate_input(&StateInput::PS { p: pa(1.0e5), s: 6.5 }).is_ok());
        assert!(validate_input(&StateInput::PQ { p: pa(0.0), x: 0.5 }).is_err());
    }
}
