//! Pxy diagram generation.
//!
//! Both sequences here are lazy: points are computed as the iterator
//! advances and nothing is cached, so iterating a curve twice recomputes it.

use crate::equilibrium::{BinarySystem, VleResult, solve_vle};
use crate::error::{EquilibriumResult, VleError};
use tk_core::numeric::grid_point;
use tk_core::units::{Pressure, pa, to_pa};

/// Number of points on a default Pxy curve (x1 step 0.1).
pub const DEFAULT_PXY_POINTS: usize = 11;

/// One composition on a Pxy diagram.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PxyPoint {
    pub x1: f64,
    /// Pressure at which liquid of composition x1 starts to boil.
    pub bubble_pressure: Pressure,
    /// Pressure at which vapor of composition y1 = x1 starts to condense.
    pub dew_pressure: Pressure,
}

impl PxyPoint {
    pub fn bubble_pressure_pa(&self) -> f64 {
        to_pa(self.bubble_pressure)
    }

    pub fn dew_pressure_pa(&self) -> f64 {
        to_pa(self.dew_pressure)
    }
}

/// Bubble and dew curves for fixed activity coefficients.
///
/// With γ held constant the curves form the lens diagram around a solved
/// state. The grid is exact at x1 = 0 and x1 = 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PxyCurve {
    /// γ1·Psat1 [Pa]
    a1: f64,
    /// γ2·Psat2 [Pa]
    a2: f64,
    n_points: usize,
}

impl PxyCurve {
    pub fn len(&self) -> usize {
        self.n_points
    }

    pub fn is_empty(&self) -> bool {
        self.n_points == 0
    }

    pub fn iter(&self) -> PxyIter {
        PxyIter {
            curve: *self,
            next: 0,
        }
    }

    fn point(&self, i: usize) -> PxyPoint {
        let x1 = grid_point(0.0, 1.0, self.n_points, i);
        let x2 = 1.0 - x1;
        let bubble = x1 * self.a1 + x2 * self.a2;
        let dew = 1.0 / (x1 / self.a1 + x2 / self.a2);
        PxyPoint {
            x1,
            bubble_pressure: pa(bubble),
            dew_pressure: pa(dew),
        }
    }
}

impl IntoIterator for &PxyCurve {
    type Item = PxyPoint;
    type IntoIter = PxyIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the points of a [`PxyCurve`].
#[derive(Debug, Clone)]
pub struct PxyIter {
    curve: PxyCurve,
    next: usize,
}

impl Iterator for PxyIter {
    type Item = PxyPoint;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.curve.n_points {
            return None;
        }
        let point = self.curve.point(self.next);
        self.next += 1;
        Some(point)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.curve.n_points - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for PxyIter {}

fn check_points(n_points: usize) -> EquilibriumResult<()> {
    if n_points < 2 {
        return Err(VleError::InvalidInput {
            what: "a Pxy curve needs at least 2 points",
        });
    }
    Ok(())
}

/// Build a Pxy curve from saturation pressures and fixed activity
/// coefficients.
///
/// ```text
/// P_bub(x1) = x1 γ1 P1 + (1 − x1) γ2 P2
/// P_dew(y1) = 1 / (y1/(γ1 P1) + (1 − y1)/(γ2 P2))
/// ```
pub fn generate_pxy_curve(
    psat1: Pressure,
    psat2: Pressure,
    gamma1: f64,
    gamma2: f64,
    n_points: usize,
) -> EquilibriumResult<PxyCurve> {
    check_points(n_points)?;
    for p in [to_pa(psat1), to_pa(psat2)] {
        if !(p.is_finite() && p > 0.0) {
            return Err(VleError::InvalidInput {
                what: "saturation pressure must be positive and finite",
            });
        }
    }
    for g in [gamma1, gamma2] {
        if !(g.is_finite() && g > 0.0) {
            return Err(VleError::InvalidInput {
                what: "activity coefficient must be positive and finite",
            });
        }
    }
    let a1 = gamma1 * to_pa(psat1);
    let a2 = gamma2 * to_pa(psat2);
    if !(a1.is_finite() && a2.is_finite()) {
        return Err(VleError::Domain {
            what: "modified saturation pressure is not finite",
        });
    }
    Ok(PxyCurve { a1, a2, n_points })
}

/// Bubble-pressure diagram with composition-dependent γ.
///
/// Each step runs [`solve_vle`] at the next grid composition.
#[derive(Debug, Clone)]
pub struct BubblePressureSweep {
    system: BinarySystem,
    n_points: usize,
    next: usize,
}

impl Iterator for BubblePressureSweep {
    type Item = EquilibriumResult<VleResult>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.n_points {
            return None;
        }
        let x1 = grid_point(0.0, 1.0, self.n_points, self.next);
        self.next += 1;
        Some(solve_vle(&self.system, x1))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.n_points - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for BubblePressureSweep {}

/// Start a bubble-pressure sweep over `n_points` compositions.
pub fn bubble_pressure_sweep(
    system: &BinarySystem,
    n_points: usize,
) -> EquilibriumResult<BubblePressureSweep> {
    check_points(n_points)?;
    system.validate()?;
    Ok(BubblePressureSweep {
        system: *system,
        n_points,
        next: 0,
    })
}
