//! CoolProp-based property provider.

use crate::error::{PropertyError, PropertyResult};
use crate::provider::{PropertyProvider, RefrigerantStates, validation};
use crate::refrigerant::Refrigerant;
use crate::state::{Phase, StateInput, ThermodynamicState};
use rfluids::prelude::*;
use std::fmt::Display;
use tk_core::units::{Pressure, SpecEnthalpy, Temperature, k, pa, to_k, to_pa};
use tracing::trace;

/// kJ → J
const KILO: f64 = 1000.0;

fn backend_err(context: &str, e: impl Display) -> PropertyError {
    PropertyError::Backend {
        message: format!("rfluids error {context}: {e}"),
    }
}

/// Saturation envelope at one pressure, in kJ and m³ units.
#[derive(Debug, Clone, Copy)]
struct Saturation {
    t_k: f64,
    h_f: f64,
    h_g: f64,
    s_f: f64,
    s_g: f64,
}

/// Where a state sits relative to the saturation dome.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Envelope {
    Below,
    /// Inside or on the dome, with quality.
    Inside(f64),
    Above,
}

impl Envelope {
    /// Lever rule on a property whose saturated values are `f` and `g`.
    fn locate(value: f64, f: f64, g: f64) -> Self {
        if value < f {
            Envelope::Below
        } else if value > g {
            Envelope::Above
        } else {
            Envelope::Inside(((value - f) / (g - f)).clamp(0.0, 1.0))
        }
    }
}

/// Raw backend properties of one resolved state, in kJ and m³ units.
#[derive(Debug, Clone, Copy)]
struct Props {
    p_pa: f64,
    t_k: f64,
    h: f64,
    s: f64,
    v: f64,
}

/// Real-fluid property provider backed by CoolProp (via `rfluids`).
///
/// Steam lookups use `Pure::Water`; every [`Refrigerant`] maps to its CoolProp
/// pure fluid. Phase labels come from comparing the resolved state with the
/// saturation envelope at the same pressure. Above the critical pressure there
/// is no envelope and every state is labelled superheated.
///
/// Thread-safe: a fresh rfluids `Fluid` is created per lookup.
#[derive(Debug, Clone, Default)]
pub struct TableProvider {}

impl TableProvider {
    pub fn new() -> Self {
        Self {}
    }

    fn read(pure: Pure, a: FluidInput, b: FluidInput, context: &str) -> PropertyResult<Props> {
        let mut fluid = Fluid::from(pure)
            .in_state(a, b)
            .map_err(|e| backend_err(context, e))?;
        let p_pa = fluid.pressure().map_err(|e| backend_err("getting pressure", e))?;
        let t_k = fluid
            .temperature()
            .map_err(|e| backend_err("getting temperature", e))?;
        let h = fluid.enthalpy().map_err(|e| backend_err("getting enthalpy", e))? / KILO;
        let s = fluid.entropy().map_err(|e| backend_err("getting entropy", e))? / KILO;
        let rho = fluid.density().map_err(|e| backend_err("getting density", e))?;
        Ok(Props {
            p_pa,
            t_k,
            h,
            s,
            v: 1.0 / rho,
        })
    }

    /// Saturation envelope at `p_pa`, or `None` above the critical pressure.
    fn saturation(pure: Pure, p_pa: f64) -> Option<Saturation> {
        let liquid = Self::read(
            pure,
            FluidInput::pressure(p_pa),
            FluidInput::quality(0.0),
            "at saturated liquid",
        )
        .ok()?;
        let vapor = Self::read(
            pure,
            FluidInput::pressure(p_pa),
            FluidInput::quality(1.0),
            "at saturated vapor",
        )
        .ok()?;
        Some(Saturation {
            t_k: liquid.t_k,
            h_f: liquid.h,
            h_g: vapor.h,
            s_f: liquid.s,
            s_g: vapor.s,
        })
    }

    fn classify(props: Props, position: Envelope) -> PropertyResult<ThermodynamicState> {
        let p = pa(props.p_pa);
        let t = k(props.t_k);
        let v = Some(props.v).filter(|v| v.is_finite() && *v > 0.0);
        match position {
            Envelope::Below => {
                ThermodynamicState::single_phase(Phase::Subcooled, p, t, props.h, props.s, v)
            }
            Envelope::Inside(x) => ThermodynamicState::saturated(p, t, props.h, props.s, v, x),
            Envelope::Above => {
                ThermodynamicState::single_phase(Phase::Superheated, p, t, props.h, props.s, v)
            }
        }
    }

    fn resolve(pure: Pure, input: StateInput) -> PropertyResult<ThermodynamicState> {
        validation::validate_input(&input)?;
        let p_pa = to_pa(input.pressure());
        trace!(?input, "CoolProp lookup");

        match input {
            StateInput::PQ { x, .. } => {
                let props = Self::read(
                    pure,
                    FluidInput::pressure(p_pa),
                    FluidInput::quality(x),
                    &format!("at P={p_pa} Pa, x={x}"),
                )?;
                let v = Some(props.v).filter(|v| v.is_finite() && *v > 0.0);
                ThermodynamicState::saturated(pa(props.p_pa), k(props.t_k), props.h, props.s, v, x)
            }
            StateInput::PT { t, .. } => {
                let t_k = to_k(t);
                let props = Self::read(
                    pure,
                    FluidInput::pressure(p_pa),
                    FluidInput::temperature(t_k),
                    &format!("at P={p_pa} Pa, T={t_k} K"),
                )?;
                // A P-T pair never lands inside the dome.
                let position = match Self::saturation(pure, p_pa) {
                    Some(sat) if t_k < sat.t_k => Envelope::Below,
                    _ => Envelope::Above,
                };
                Self::classify(props, position)
            }
            StateInput::PH { h, .. } => {
                let props = Self::read(
                    pure,
                    FluidInput::pressure(p_pa),
                    FluidInput::enthalpy(h * KILO),
                    &format!("at P={p_pa} Pa, h={h} kJ/kg"),
                )?;
                let position = Self::saturation(pure, p_pa)
                    .map_or(Envelope::Above, |sat| Envelope::locate(h, sat.h_f, sat.h_g));
                Self::classify(props, position)
            }
            StateInput::PS { s, .. } => {
                let props = Self::read(
                    pure,
                    FluidInput::pressure(p_pa),
                    FluidInput::entropy(s * KILO),
                    &format!("at P={p_pa} Pa, s={s} kJ/(kg·K)"),
                )?;
                let position = Self::saturation(pure, p_pa)
                    .map_or(Envelope::Above, |sat| Envelope::locate(s, sat.s_f, sat.s_g));
                Self::classify(props, position)
            }
        }
    }

    /// Saturated state at temperature `t_k` with quality `x`.
    fn saturated_at_t(pure: Pure, t_k: f64, x: f64) -> PropertyResult<ThermodynamicState> {
        let props = Self::read(
            pure,
            FluidInput::temperature(t_k),
            FluidInput::quality(x),
            &format!("at T={t_k} K, x={x}"),
        )?;
        let v = Some(props.v).filter(|v| v.is_finite() && *v > 0.0);
        ThermodynamicState::saturated(pa(props.p_pa), k(props.t_k), props.h, props.s, v, x)
    }
}

impl PropertyProvider for TableProvider {
    fn name(&self) -> &str {
        "CoolProp"
    }

    fn steam_state(&self, input: StateInput) -> PropertyResult<ThermodynamicState> {
        Self::resolve(Pure::Water, input)
    }

    fn supports_refrigerant(&self, _refrigerant: Refrigerant) -> bool {
        true
    }

    fn refrigerant_states(
        &self,
        refrigerant: Refrigerant,
        t_evap: Temperature,
        t_cond: Temperature,
    ) -> PropertyResult<RefrigerantStates> {
        validation::validate_temperature(t_evap)?;
        validation::validate_temperature(t_cond)?;
        let pure = refrigerant.rfluids_pure();

        let evaporator_exit = Self::saturated_at_t(pure, to_k(t_evap), 1.0)?;
        let condenser_exit = Self::saturated_at_t(pure, to_k(t_cond), 0.0)?;
        // Isentropic compression to the condensing pressure.
        let compressor_exit = Self::resolve(
            pure,
            StateInput::PS {
                p: condenser_exit.pressure(),
                s: evaporator_exit.entropy(),
            },
        )?;

        Ok(RefrigerantStates {
            evaporator_exit,
            compressor_exit,
            condenser_exit,
        })
    }

    fn refrigerant_state_ph(
        &self,
        refrigerant: Refrigerant,
        p: Pressure,
        h: SpecEnthalpy,
    ) -> PropertyResult<ThermodynamicState> {
        Self::resolve(refrigerant.rfluids_pure(), StateInput::PH { p, h })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_name() {
        assert_eq!(TableProvider::new().name(), "CoolProp");
        assert!(TableProvider::new().supports_refrigerant(Refrigerant::R717));
    }

    #[test]
    fn envelope_lever_rule() {
        assert_eq!(Envelope::locate(0.5, 1.0, 3.0), Envelope::Below);
        assert_eq!(Envelope::locate(2.0, 1.0, 3.0), Envelope::Inside(0.5));
        assert_eq!(Envelope::locate(3.0, 1.0, 3.0), Envelope::Inside(1.0));
        assert_eq!(Envelope::locate(3.5, 1.0, 3.0), Envelope::Above);
    }

    #[test]
    fn invalid_input_rejected_before_backend() {
        let err = TableProvider::new()
            .steam_state(StateInput::PQ { p: pa(-1.0), x: 0.0 })
            .unwrap_err();
        assert!(matches!(err, PropertyError::NonPhysical { .. }));
    }
}
