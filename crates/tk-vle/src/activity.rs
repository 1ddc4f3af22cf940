//! Liquid-phase activity-coefficient models.

use crate::error::{EquilibriumResult, VleError};

/// Activity-coefficient model for a binary liquid.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "model", rename_all = "snake_case"))]
pub enum ActivityModel {
    /// Ideal solution: γ1 = γ2 = 1.
    #[default]
    Ideal,
    /// Wilson local-composition model with binary parameters Λ12, Λ21 > 0.
    Wilson { lambda12: f64, lambda21: f64 },
}

impl ActivityModel {
    /// Wilson model with checked parameters.
    pub fn wilson(lambda12: f64, lambda21: f64) -> EquilibriumResult<Self> {
        let model = ActivityModel::Wilson { lambda12, lambda21 };
        model.validate()?;
        Ok(model)
    }

    pub fn validate(&self) -> EquilibriumResult<()> {
        match *self {
            ActivityModel::Ideal => Ok(()),
            ActivityModel::Wilson { lambda12, lambda21 } => {
                if !(lambda12.is_finite() && lambda12 > 0.0) {
                    return Err(VleError::InvalidInput {
                        what: "Wilson parameter lambda12 must be positive and finite",
                    });
                }
                if !(lambda21.is_finite() && lambda21 > 0.0) {
                    return Err(VleError::InvalidInput {
                        what: "Wilson parameter lambda21 must be positive and finite",
                    });
                }
                Ok(())
            }
        }
    }

    /// Activity coefficients (γ1, γ2) at liquid mole fraction `x1`.
    ///
    /// Wilson:
    /// ```text
    /// ln γ1 = −ln(x1 + Λ12 x2) + x2 (Λ12/(x1 + Λ12 x2) − Λ21/(x2 + Λ21 x1))
    /// ln γ2 = −ln(x2 + Λ21 x1) − x1 (Λ12/(x1 + Λ12 x2) − Λ21/(x2 + Λ21 x1))
    /// ```
    pub fn gammas(&self, x1: f64) -> EquilibriumResult<(f64, f64)> {
        match *self {
            ActivityModel::Ideal => Ok((1.0, 1.0)),
            ActivityModel::Wilson { lambda12, lambda21 } => {
                let x2 = 1.0 - x1;
                let a1 = x1 + lambda12 * x2;
                let a2 = x2 + lambda21 * x1;
                if !(a1.is_finite() && a1 > 0.0) {
                    return Err(VleError::Domain {
                        what: "x1 + lambda12*x2 must be positive for ln",
                    });
                }
                if !(a2.is_finite() && a2 > 0.0) {
                    return Err(VleError::Domain {
                        what: "x2 + lambda21*x1 must be positive for ln",
                    });
                }
                let coupling = lambda12 / a1 - lambda21 / a2;
                let gamma1 = (-a1.ln() + x2 * coupling).exp();
                let gamma2 = (-a2.ln() - x1 * coupling).exp();
                if !(gamma1.is_finite() && gamma2.is_finite()) {
                    return Err(VleError::Domain {
                        what: "activity coefficient is not finite",
                    });
                }
                Ok((gamma1, gamma2))
            }
        }
    }

    /// Closed-form infinite-dilution limits (ln γ1∞, ln γ2∞).
    pub fn ln_gamma_infinite_dilution(&self) -> (f64, f64) {
        match *self {
            ActivityModel::Ideal => (0.0, 0.0),
            ActivityModel::Wilson { lambda12, lambda21 } => (
                -lambda12.ln() + 1.0 - lambda21,
                -lambda21.ln() + 1.0 - lambda12,
            ),
        }
    }
}
