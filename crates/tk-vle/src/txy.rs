//! Txy diagrams at fixed total pressure.
//!
//! Each point is the bubble temperature of a liquid composition x1, found by
//! bisection on T. The incipient vapor y1 at that temperature gives the dew
//! curve, so one sweep yields both branches of the diagram. Activity
//! parameters are taken as temperature-independent.

use crate::activity::ActivityModel;
use crate::equilibrium::{BinarySystem, VleResult, solve_vle};
use crate::error::{EquilibriumResult, VleError};
use tk_core::numeric::grid_point;
use tk_core::units::{Pressure, Temperature, k, pa, to_k, to_pa};
use tracing::{debug, trace};

/// Number of points on a default Txy diagram (x1 step 0.1).
pub const DEFAULT_TXY_POINTS: usize = 11;
/// Default bubble-temperature search range [K].
pub const DEFAULT_TXY_BRACKET_K: (f64, f64) = (273.15, 373.15);

const MAX_BISECTIONS: usize = 200;
/// Bracket width [K] at which the bubble temperature is accepted.
const TEMPERATURE_TOLERANCE: f64 = 1e-9;

/// Pure-component saturation pressure as a function of temperature.
///
/// Implemented for [`Antoine`] and for any `Fn(f64) -> f64` closure taking
/// T in K and returning Psat in Pa.
pub trait VaporPressure {
    fn psat(&self, t: f64) -> f64;
}

impl<F> VaporPressure for F
where
    F: Fn(f64) -> f64,
{
    fn psat(&self, t: f64) -> f64 {
        self(t)
    }
}

/// Antoine correlation `log10(Psat [Pa]) = a − b / (T [K] + c)`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Antoine {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl Antoine {
    pub fn new(a: f64, b: f64, c: f64) -> EquilibriumResult<Self> {
        if !(a.is_finite() && b.is_finite() && c.is_finite()) {
            return Err(VleError::InvalidInput {
                what: "Antoine coefficients must be finite",
            });
        }
        Ok(Self { a, b, c })
    }
}

impl VaporPressure for Antoine {
    fn psat(&self, t: f64) -> f64 {
        10f64.powf(self.a - self.b / (t + self.c))
    }
}

fn saturation_pressure(source: &impl VaporPressure, t: f64) -> EquilibriumResult<f64> {
    let p = source.psat(t);
    if !(p.is_finite() && p > 0.0) {
        return Err(VleError::Domain {
            what: "saturation pressure must be positive and finite",
        });
    }
    Ok(p)
}

fn check_bracket(t_low: f64, t_high: f64) -> EquilibriumResult<()> {
    if !(t_low.is_finite() && t_high.is_finite() && t_low > 0.0 && t_low < t_high) {
        return Err(VleError::InvalidInput {
            what: "temperature bracket must satisfy 0 < low < high",
        });
    }
    Ok(())
}

/// Bubble temperature of liquid `x1` at total pressure `pressure`.
///
/// Bisects `x1 γ1 Psat1(T) + x2 γ2 Psat2(T) − P` on `[t_low, t_high]`. The
/// returned state is the bubble point at the converged temperature, so its
/// pressure matches `pressure` to within the temperature tolerance.
///
/// # Errors
///
/// `ConvergenceFailed` when the residual does not change sign on the bracket
/// or the bracket does not shrink below tolerance within the iteration cap.
pub fn bubble_temperature(
    psat1: &impl VaporPressure,
    psat2: &impl VaporPressure,
    model: ActivityModel,
    pressure: Pressure,
    x1: f64,
    (t_low, t_high): (Temperature, Temperature),
) -> EquilibriumResult<VleResult> {
    model.validate()?;
    let p = to_pa(pressure);
    if !(p.is_finite() && p > 0.0) {
        return Err(VleError::InvalidInput {
            what: "pressure must be positive and finite",
        });
    }
    if !(0.0..=1.0).contains(&x1) {
        return Err(VleError::InvalidInput {
            what: "x1 must lie in [0, 1]",
        });
    }
    let (mut lo, mut hi) = (to_k(t_low), to_k(t_high));
    check_bracket(lo, hi)?;

    // γ depends on composition only, so it is fixed for the whole search.
    let (gamma1, gamma2) = model.gammas(x1)?;
    let x2 = 1.0 - x1;
    let residual = |t: f64| -> EquilibriumResult<f64> {
        let p1 = saturation_pressure(psat1, t)?;
        let p2 = saturation_pressure(psat2, t)?;
        Ok(x1 * gamma1 * p1 + x2 * gamma2 * p2 - p)
    };

    if residual(lo)? > 0.0 || residual(hi)? < 0.0 {
        return Err(VleError::ConvergenceFailed {
            what: "bubble temperature (no sign change on the bracket)",
            iterations: 0,
        });
    }

    let mut iterations = 0;
    while hi - lo > TEMPERATURE_TOLERANCE {
        if iterations == MAX_BISECTIONS {
            return Err(VleError::ConvergenceFailed {
                what: "bubble temperature",
                iterations,
            });
        }
        let mid = 0.5 * (lo + hi);
        if residual(mid)? > 0.0 {
            hi = mid;
        } else {
            lo = mid;
        }
        iterations += 1;
        trace!(iterations, lo, hi, "bubble temperature bisection");
    }

    let t = 0.5 * (lo + hi);
    let system = BinarySystem::new(
        k(t),
        pa(saturation_pressure(psat1, t)?),
        pa(saturation_pressure(psat2, t)?),
        model,
    )?;
    let result = solve_vle(&system, x1)?;
    debug!(x1, t, y1 = result.y1, iterations, "solved bubble temperature");
    Ok(result)
}

/// Txy diagram of a binary mixture at fixed pressure.
///
/// Lazy like [`crate::PxyCurve`]: every point is solved as the iterator
/// advances. The x1 grid is exact at 0 and 1.
#[derive(Debug, Clone, PartialEq)]
pub struct TxyDiagram<P1, P2> {
    psat1: P1,
    psat2: P2,
    model: ActivityModel,
    pressure: Pressure,
    bracket: (Temperature, Temperature),
    n_points: usize,
}

impl<P1: VaporPressure, P2: VaporPressure> TxyDiagram<P1, P2> {
    /// Diagram over the default bracket [`DEFAULT_TXY_BRACKET_K`].
    pub fn new(
        psat1: P1,
        psat2: P2,
        model: ActivityModel,
        pressure: Pressure,
        n_points: usize,
    ) -> EquilibriumResult<Self> {
        if n_points < 2 {
            return Err(VleError::InvalidInput {
                what: "a Txy diagram needs at least 2 points",
            });
        }
        let p = to_pa(pressure);
        if !(p.is_finite() && p > 0.0) {
            return Err(VleError::InvalidInput {
                what: "pressure must be positive and finite",
            });
        }
        model.validate()?;
        let (t_low, t_high) = DEFAULT_TXY_BRACKET_K;
        Ok(Self {
            psat1,
            psat2,
            model,
            pressure,
            bracket: (k(t_low), k(t_high)),
            n_points,
        })
    }

    /// Replace the bubble-temperature search range.
    pub fn with_bracket(
        mut self,
        t_low: Temperature,
        t_high: Temperature,
    ) -> EquilibriumResult<Self> {
        check_bracket(to_k(t_low), to_k(t_high))?;
        self.bracket = (t_low, t_high);
        Ok(self)
    }

    pub fn pressure_pa(&self) -> f64 {
        to_pa(self.pressure)
    }

    pub fn len(&self) -> usize {
        self.n_points
    }

    pub fn is_empty(&self) -> bool {
        self.n_points == 0
    }

    pub fn bubble_point(&self, x1: f64) -> EquilibriumResult<VleResult> {
        bubble_temperature(
            &self.psat1,
            &self.psat2,
            self.model,
            self.pressure,
            x1,
            self.bracket,
        )
    }

    pub fn iter(&self) -> TxyIter<'_, P1, P2> {
        TxyIter {
            diagram: self,
            next: 0,
        }
    }
}

impl<'a, P1: VaporPressure, P2: VaporPressure> IntoIterator for &'a TxyDiagram<P1, P2> {
    type Item = EquilibriumResult<VleResult>;
    type IntoIter = TxyIter<'a, P1, P2>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the bubble points of a [`TxyDiagram`].
#[derive(Debug)]
pub struct TxyIter<'a, P1, P2> {
    diagram: &'a TxyDiagram<P1, P2>,
    next: usize,
}

impl<P1: VaporPressure, P2: VaporPressure> Iterator for TxyIter<'_, P1, P2> {
    type Item = EquilibriumResult<VleResult>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.diagram.n_points {
            return None;
        }
        let x1 = grid_point(0.0, 1.0, self.diagram.n_points, self.next);
        self.next += 1;
        Some(self.diagram.bubble_point(x1))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.diagram.n_points - self.next;
        (remaining, Some(remaining))
    }
}

impl<P1: VaporPressure, P2: VaporPressure> ExactSizeIterator for TxyIter<'_, P1, P2> {}
