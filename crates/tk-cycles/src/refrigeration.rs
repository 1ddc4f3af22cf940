//! Vapor-compression refrigeration cycle.

use crate::common::{check_finite, positive_divisor, require_positive};
use crate::error::{CycleError, SolveResult};
use crate::result::{CycleKind, CycleResult, Performance};
use std::fmt;
use std::sync::Arc;
use tk_core::units::{Temperature, to_k};
use tk_props::{PropertyProvider, Refrigerant, RefrigerantStates};
use tracing::{debug, warn};

/// Operating point of a refrigeration cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RefrigerationInput {
    /// Evaporator saturation temperature.
    pub t_evap: Temperature,
    /// Condenser saturation temperature.
    pub t_cond: Temperature,
    pub refrigerant: Refrigerant,
}

/// Four-state vapor-compression cycle.
///
/// ```text
/// 1 → 2  compressor
/// 2 → 3  condenser
/// 3 → 4  expansion valve (isenthalpic: h4 = h3)
/// 4 → 1  evaporator
/// ```
#[derive(Clone)]
pub struct RefrigerationCycleModel {
    provider: Arc<dyn PropertyProvider>,
}

impl RefrigerationCycleModel {
    pub fn new(provider: Arc<dyn PropertyProvider>) -> Self {
        Self { provider }
    }

    pub fn solve(&self, input: &RefrigerationInput) -> SolveResult<CycleResult> {
        solve(self.provider.as_ref(), input)
    }
}

impl fmt::Debug for RefrigerationCycleModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RefrigerationCycleModel")
            .field("provider", &self.provider.name())
            .finish()
    }
}

/// Solve a refrigeration cycle with the given provider.
pub fn solve_refrigeration(
    provider: &dyn PropertyProvider,
    t_evap: Temperature,
    t_cond: Temperature,
    refrigerant: Refrigerant,
) -> SolveResult<CycleResult> {
    solve(
        provider,
        &RefrigerationInput {
            t_evap,
            t_cond,
            refrigerant,
        },
    )
}

fn solve(provider: &dyn PropertyProvider, input: &RefrigerationInput) -> SolveResult<CycleResult> {
    let t_e = require_positive(
        to_k(input.t_evap),
        "evaporator temperature must be positive and finite",
    )?;
    let t_c = require_positive(
        to_k(input.t_cond),
        "condenser temperature must be positive and finite",
    )?;
    if t_e >= t_c {
        return Err(CycleError::InvalidInput {
            what: "evaporator temperature must be below condenser temperature",
        });
    }
    if !provider.supports_refrigerant(input.refrigerant) {
        return Err(CycleError::InvalidInput {
            what: "refrigerant not supported by the property provider",
        });
    }

    let RefrigerantStates {
        evaporator_exit: state1,
        compressor_exit: state2,
        condenser_exit: state3,
    } = provider.refrigerant_states(input.refrigerant, input.t_evap, input.t_cond)?;
    let (h1, h2, h3) = (state1.enthalpy(), state2.enthalpy(), state3.enthalpy());

    // Throttling is isenthalpic by definition; pin h4 regardless of the
    // provider's rounding.
    let state4 = provider
        .refrigerant_state_ph(input.refrigerant, state1.pressure(), h3)?
        .with_enthalpy(h3)?;

    let w_c = positive_divisor(h2 - h1, "compressor work must be positive")?;
    let q_evap = check_finite(h1 - h3, "evaporator heat")?;
    let q_cond = check_finite(h2 - h3, "condenser heat")?;
    let cop = check_finite(q_evap / w_c, "coefficient of performance")?;
    let carnot_cop = t_e / (t_c - t_e);

    let result = CycleResult {
        kind: CycleKind::Refrigeration,
        states: vec![state1, state2, state3, state4],
        compression_work: w_c,
        expansion_work: 0.0,
        net_work: -w_c,
        heat_input: q_evap,
        heat_output: q_cond,
        performance: Performance::Refrigeration { cop, carnot_cop },
    };

    debug!(
        provider = provider.name(),
        refrigerant = %input.refrigerant,
        w_c,
        q_evap,
        cop,
        "solved refrigeration cycle"
    );
    if result.exceeds_carnot_bound() {
        warn!(cop, carnot_cop, "refrigeration COP exceeds the Carnot bound");
    }

    Ok(result)
}
