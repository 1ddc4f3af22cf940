//! Placeholder property model with a fixed saturation envelope.
//!
//! Steam properties come from a single constant envelope that does not vary
//! with pressure. Superheated vapor past the envelope uses a constant vapor
//! heat capacity. The P-T lookup has no temperature dependence at all: any
//! temperature above saturation returns the same superheated point. The model
//! is deliberately crude and exists so the cycle solvers run without an
//! external property library.

use crate::error::{PropertyError, PropertyResult};
use crate::provider::{PropertyProvider, RefrigerantStates, validation};
use crate::refrigerant::Refrigerant;
use crate::state::{Phase, StateInput, ThermodynamicState};
use tk_core::units::{Pressure, SpecEnthalpy, Temperature, k, pa, to_k, to_pa};
use tracing::trace;

/// Constants of the simplified steam model.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimplifiedSteamTable {
    /// Saturation temperature [K]
    pub t_sat: f64,
    /// Saturated liquid enthalpy [kJ/kg]
    pub h_f: f64,
    /// Enthalpy of vaporization [kJ/kg]
    pub h_fg: f64,
    /// Saturated liquid entropy [kJ/(kg·K)]
    pub s_f: f64,
    /// Entropy of vaporization [kJ/(kg·K)]
    pub s_fg: f64,
    /// Saturated liquid specific volume [m³/kg]
    pub v_f: f64,
    /// Specific volume change on vaporization [m³/kg]
    pub v_fg: f64,
    /// Superheated vapor heat capacity [kJ/(kg·K)]
    pub cp_vapor: f64,
    /// Enthalpy returned for any superheated P-T lookup [kJ/kg]
    pub h_superheated: f64,
    /// Entropy returned for any superheated P-T lookup [kJ/(kg·K)]
    pub s_superheated: f64,
}

impl Default for SimplifiedSteamTable {
    fn default() -> Self {
        Self {
            t_sat: 313.15,
            h_f: 167.5,
            h_fg: 2400.0,
            s_f: 0.572,
            s_fg: 7.0,
            v_f: 0.001,
            v_fg: 1.5,
            cp_vapor: 2.0,
            h_superheated: 3000.0,
            s_superheated: 6.5,
        }
    }
}

impl SimplifiedSteamTable {
    /// Saturated vapor enthalpy [kJ/kg].
    pub fn h_g(&self) -> f64 {
        self.h_f + self.h_fg
    }

    /// Saturated vapor entropy [kJ/(kg·K)].
    pub fn s_g(&self) -> f64 {
        self.s_f + self.s_fg
    }

    fn on_envelope(&self, p: Pressure, x: f64) -> PropertyResult<ThermodynamicState> {
        ThermodynamicState::saturated(
            p,
            k(self.t_sat),
            self.h_f + x * self.h_fg,
            self.s_f + x * self.s_fg,
            Some(self.v_f + x * self.v_fg),
            x,
        )
    }

    /// Superheated vapor at temperature `t` past the saturated vapor point.
    fn superheated_at(&self, p: Pressure, t: f64) -> PropertyResult<ThermodynamicState> {
        ThermodynamicState::single_phase(
            Phase::Superheated,
            p,
            k(t),
            self.h_g() + self.cp_vapor * (t - self.t_sat),
            self.s_g() + self.cp_vapor * (t / self.t_sat).ln(),
            None,
        )
    }
}

/// Placeholder R134a data.
///
/// Enthalpies and entropies are fixed per state. Saturation pressure follows
/// ln P = A − B/T through two anchor points.
mod r134a {
    pub const H_EVAP_EXIT: f64 = 400.0;
    pub const S_EVAP_EXIT: f64 = 1.7;
    pub const H_COMP_EXIT: f64 = 430.0;
    pub const S_COMP_EXIT: f64 = 1.8;
    /// Compressor discharge superheat above the condensing temperature [K]
    pub const DISCHARGE_SUPERHEAT: f64 = 20.0;
    pub const H_COND_EXIT: f64 = 250.0;
    pub const S_COND_EXIT: f64 = 1.2;
    /// Saturated liquid enthalpy on the evaporator side [kJ/kg]
    pub const H_F_EVAP: f64 = 186.7;
    pub const S_THROTTLED: f64 = 1.3;

    const LOW_ANCHOR: (f64, f64) = (263.15, 0.2e6);
    const HIGH_ANCHOR: (f64, f64) = (313.15, 1.0e6);

    fn fit() -> (f64, f64) {
        let (t_lo, p_lo) = LOW_ANCHOR;
        let (t_hi, p_hi) = HIGH_ANCHOR;
        let b = (p_hi / p_lo).ln() / (1.0 / t_lo - 1.0 / t_hi);
        let a = p_hi.ln() + b / t_hi;
        (a, b)
    }

    /// Saturation pressure [Pa] at temperature [K].
    pub fn p_sat(t: f64) -> f64 {
        let (a, b) = fit();
        (a - b / t).exp()
    }

    /// Saturation temperature [K] at pressure [Pa].
    pub fn t_sat(p: f64) -> f64 {
        let (a, b) = fit();
        b / (a - p.ln())
    }
}

/// Property provider built on [`SimplifiedSteamTable`] and placeholder R134a
/// data. Other refrigerants are not supported.
#[derive(Debug, Clone, Default)]
pub struct SimplifiedProvider {
    table: SimplifiedSteamTable,
}

impl SimplifiedProvider {
    pub fn new(table: SimplifiedSteamTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &SimplifiedSteamTable {
        &self.table
    }

    fn require_r134a(refrigerant: Refrigerant) -> PropertyResult<()> {
        if refrigerant != Refrigerant::R134a {
            return Err(PropertyError::NotSupported {
                what: "simplified provider only has R134a data",
            });
        }
        Ok(())
    }
}

impl PropertyProvider for SimplifiedProvider {
    fn name(&self) -> &str {
        "simplified"
    }

    fn steam_state(&self, input: StateInput) -> PropertyResult<ThermodynamicState> {
        validation::validate_input(&input)?;
        let tbl = &self.table;
        trace!(?input, "simplified steam lookup");

        match input {
            StateInput::PQ { p, x } => tbl.on_envelope(p, x),
            StateInput::PT { p, t } => {
                if to_k(t) <= tbl.t_sat {
                    return Err(PropertyError::OutOfRange {
                        what: "temperature at or below saturation (no subcooled P-T data)",
                    });
                }
                ThermodynamicState::single_phase(
                    Phase::Superheated,
                    p,
                    t,
                    tbl.h_superheated,
                    tbl.s_superheated,
                    None,
                )
            }
            StateInput::PS { p, s } => {
                if s < tbl.s_f {
                    return Err(PropertyError::OutOfRange {
                        what: "entropy below saturated liquid",
                    });
                }
                if s <= tbl.s_g() {
                    tbl.on_envelope(p, (s - tbl.s_f) / tbl.s_fg)
                } else {
                    let t = tbl.t_sat * ((s - tbl.s_g()) / tbl.cp_vapor).exp();
                    tbl.superheated_at(p, t)
                }
            }
            StateInput::PH { p, h } => {
                if h < tbl.h_f {
                    return Err(PropertyError::OutOfRange {
                        what: "enthalpy below saturated liquid",
                    });
                }
                if h <= tbl.h_g() {
                    tbl.on_envelope(p, (h - tbl.h_f) / tbl.h_fg)
                } else {
                    let t = tbl.t_sat + (h - tbl.h_g()) / tbl.cp_vapor;
                    tbl.superheated_at(p, t)
                }
            }
        }
    }

    fn supports_refrigerant(&self, refrigerant: Refrigerant) -> bool {
        refrigerant == Refrigerant::R134a
    }

    fn refrigerant_states(
        &self,
        refrigerant: Refrigerant,
        t_evap: Temperature,
        t_cond: Temperature,
    ) -> PropertyResult<RefrigerantStates> {
        Self::require_r134a(refrigerant)?;
        validation::validate_temperature(t_evap)?;
        validation::validate_temperature(t_cond)?;

        let p_evap = pa(r134a::p_sat(to_k(t_evap)));
        let p_cond = pa(r134a::p_sat(to_k(t_cond)));

        let evaporator_exit = ThermodynamicState::saturated(
            p_evap,
            t_evap,
            r134a::H_EVAP_EXIT,
            r134a::S_EVAP_EXIT,
            None,
            1.0,
        )?;
        let compressor_exit = ThermodynamicState::single_phase(
            Phase::Superheated,
            p_cond,
            k(to_k(t_cond) + r134a::DISCHARGE_SUPERHEAT),
            r134a::H_COMP_EXIT,
            r134a::S_COMP_EXIT,
            None,
        )?;
        let condenser_exit = ThermodynamicState::saturated(
            p_cond,
            t_cond,
            r134a::H_COND_EXIT,
            r134a::S_COND_EXIT,
            None,
            0.0,
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
        Self::require_r134a(refrigerant)?;
        validation::validate_pressure(p)?;
        validation::validate_enthalpy(h)?;

        if !(r134a::H_F_EVAP..=r134a::H_EVAP_EXIT).contains(&h) {
            return Err(PropertyError::OutOfRange {
                what: "enthalpy outside the R134a placeholder envelope",
            });
        }
        let x = (h - r134a::H_F_EVAP) / (r134a::H_EVAP_EXIT - r134a::H_F_EVAP);
        let t = k(r134a::t_sat(to_pa(p)));
        ThermodynamicState::saturated(p, t, h, r134a::S_THROTTLED, None, x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tk_core::units::{kpa, mpa};

    fn provider() -> SimplifiedProvider {
        SimplifiedProvider::default()
    }

    #[test]
    fn saturated_liquid_has_volume() {
        let s = provider()
            .steam_state(StateInput::PQ { p: kpa(75.0), x: 0.0 })
            .unwrap();
        assert_eq!(s.phase(), Phase::SaturatedLiquid);
        assert_eq!(s.enthalpy(), 167.5);
        assert_eq!(s.entropy(), 0.572);
        assert_eq!(s.specific_volume(), Some(0.001));
        assert_eq!(s.temperature_k(), 313.15);
    }

    #[test]
    fn pt_above_saturation_is_superheated_placeholder() {
        let s = provider()
            .steam_state(StateInput::PT {
                p: mpa(3.0),
                t: k(623.15),
            })
            .unwrap();
        assert_eq!(s.phase(), Phase::Superheated);
        assert_eq!(s.enthalpy(), 3000.0);
        assert_eq!(s.entropy(), 6.5);
        assert_eq!(s.quality(), None);
    }

    #[test]
    fn pt_below_saturation_is_out_of_range() {
        let err = provider()
            .steam_state(StateInput::PT {
                p: mpa(3.0),
                t: k(300.0),
            })
            .unwrap_err();
        assert!(matches!(err, PropertyError::OutOfRange { .. }));
    }

    #[test]
    fn ps_inside_dome_matches_lever_rule() {
        let s = provider()
            .steam_state(StateInput::PS { p: kpa(75.0), s: 6.5 })
            .unwrap();
        assert_eq!(s.phase(), Phase::TwoPhase);
        let x = s.quality().unwrap();
        assert!((x - (6.5 - 0.572) / 7.0).abs() < 1e-12);
        assert!((s.enthalpy() - 2200.0).abs() < 0.1, "h4s = {}", s.enthalpy());
    }

    #[test]
    fn ph_and_ps_agree_past_the_dome() {
        let p = provider();
        let by_h = p.steam_state(StateInput::PH { p: kpa(75.0), h: 2800.0 }).unwrap();
        assert_eq!(by_h.phase(), Phase::Superheated);
        let by_s = p
            .steam_state(StateInput::PS {
                p: kpa(75.0),
                s: by_h.entropy(),
            })
            .unwrap();
        assert!((by_s.enthalpy() - 2800.0).abs() < 1e-9);
        assert!((by_s.temperature_k() - by_h.temperature_k()).abs() < 1e-9);
    }

    #[test]
    fn below_liquid_line_is_out_of_range() {
        let p = provider();
        assert!(p.steam_state(StateInput::PH { p: kpa(75.0), h: 100.0 }).is_err());
        assert!(p.steam_state(StateInput::PS { p: kpa(75.0), s: 0.1 }).is_err());
    }

    #[test]
    fn invalid_quality_is_rejected() {
        let err = provider()
            .steam_state(StateInput::PQ { p: kpa(75.0), x: 1.5 })
            .unwrap_err();
        assert!(matches!(err, PropertyError::InvalidArg { .. }));
    }

    #[test]
    fn r134a_states_use_placeholder_values() {
        let states = provider()
            .refrigerant_states(Refrigerant::R134a, k(263.15), k(313.15))
            .unwrap();
        assert_eq!(states.evaporator_exit.enthalpy(), 400.0);
        assert_eq!(states.evaporator_exit.phase(), Phase::SaturatedVapor);
        assert_eq!(states.compressor_exit.enthalpy(), 430.0);
        assert!((states.compressor_exit.temperature_k() - 333.15).abs() < 1e-9);
        assert_eq!(states.condenser_exit.enthalpy(), 250.0);
        assert_eq!(states.condenser_exit.phase(), Phase::SaturatedLiquid);

        assert!((states.evaporator_exit.pressure_pa() - 0.2e6).abs() < 1.0);
        assert!((states.condenser_exit.pressure_pa() - 1.0e6).abs() < 1.0);
    }

    #[test]
    fn throttled_state_recovers_evaporator_temperature() {
        let p = provider();
        let states = p
            .refrigerant_states(Refrigerant::R134a, k(258.15), k(308.15))
            .unwrap();
        let throttled = p
            .refrigerant_state_ph(Refrigerant::R134a, states.evaporator_exit.pressure(), 250.0)
            .unwrap();
        assert_eq!(throttled.phase(), Phase::TwoPhase);
        assert!((throttled.temperature_k() - 258.15).abs() < 1e-6);
        let x = throttled.quality().unwrap();
        assert!((x - (250.0 - 186.7) / (400.0 - 186.7)).abs() < 1e-12);
    }

    proptest::proptest! {
        #[test]
        fn ph_lookup_reproduces_enthalpy(h in 167.5f64..4000.0) {
            let s = provider()
                .steam_state(StateInput::PH { p: kpa(75.0), h })
                .unwrap();
            proptest::prop_assert!((s.enthalpy() - h).abs() < 1e-9);
            if let Some(x) = s.quality() {
                proptest::prop_assert!((0.0..=1.0).contains(&x));
            } else {
                proptest::prop_assert!(s.temperature_k() > 313.15);
            }
        }
    }

    #[test]
    fn other_refrigerants_are_not_supported() {
        let p = provider();
        assert!(p.supports_refrigerant(Refrigerant::R134a));
        assert!(!p.supports_refrigerant(Refrigerant::R32));
        let err = p
            .refrigerant_states(Refrigerant::R717, k(263.15), k(313.15))
            .unwrap_err();
        assert!(matches!(err, PropertyError::NotSupported { .. }));
    }
}
