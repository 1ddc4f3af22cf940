//! Calculation requests shared by the subcommands and batch files.
//!
//! Pressures are in Pa and temperatures in K throughout.

use crate::config::EngineConfig;
use crate::report::Report;
use serde::Deserialize;
use std::sync::Arc;
use tk_core::units::{k, pa};
use tk_core::{TkError, TkResult};
use tk_cycles::{
    BraytonCycleModel, BraytonInput, RankineCycleModel, RankineInput, RefrigerationCycleModel,
    RefrigerationInput,
};
use tk_props::{PropertyProvider, Refrigerant, StateInput};
use tk_vle::{
    ActivityModel, Antoine, BinarySystem, DEFAULT_TXY_BRACKET_K, DEFAULT_TXY_POINTS, FlashSpec,
    TxyDiagram, flash, generate_pxy_curve, solve_vle,
};

fn default_efficiency() -> f64 {
    0.85
}

fn default_refrigerant() -> String {
    Refrigerant::default().key().to_string()
}

fn unit_gamma() -> f64 {
    1.0
}

/// One calculation, tagged by `kind` in batch files.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Request {
    Rankine {
        p_boiler: f64,
        t_boiler: f64,
        p_condenser: f64,
        #[serde(default = "default_efficiency")]
        eta_pump: f64,
        #[serde(default = "default_efficiency")]
        eta_turbine: f64,
    },
    Brayton {
        p1: f64,
        t1: f64,
        p2: f64,
        t3: f64,
        #[serde(default = "default_efficiency")]
        eta_compressor: f64,
        #[serde(default = "default_efficiency")]
        eta_turbine: f64,
        #[serde(default)]
        gamma: Option<f64>,
    },
    Vle {
        temperature: f64,
        psat1: f64,
        psat2: f64,
        x1: f64,
        /// Wilson parameters [Λ12, Λ21]; ideal solution when absent.
        #[serde(default)]
        wilson: Option<[f64; 2]>,
        #[serde(default)]
        curve_points: Option<usize>,
    },
    Pxy {
        psat1: f64,
        psat2: f64,
        #[serde(default = "unit_gamma")]
        gamma1: f64,
        #[serde(default = "unit_gamma")]
        gamma2: f64,
        #[serde(default)]
        points: Option<usize>,
    },
    Flash {
        z1: f64,
        pressure: f64,
        temperature: f64,
        psat1: f64,
        psat2: f64,
        #[serde(default)]
        wilson: Option<[f64; 2]>,
    },
    Txy {
        pressure: f64,
        /// Antoine [A, B, C] of component 1, `log10(Psat/Pa) = A − B/(T/K + C)`.
        antoine1: [f64; 3],
        antoine2: [f64; 3],
        #[serde(default)]
        wilson: Option<[f64; 2]>,
        #[serde(default)]
        t_min: Option<f64>,
        #[serde(default)]
        t_max: Option<f64>,
        #[serde(default)]
        points: Option<usize>,
    },
    Refrigeration {
        t_evap: f64,
        t_cond: f64,
        #[serde(default = "default_refrigerant")]
        refrigerant: String,
    },
    Steam {
        p: f64,
        #[serde(default)]
        t: Option<f64>,
        #[serde(default)]
        x: Option<f64>,
        #[serde(default)]
        s: Option<f64>,
        #[serde(default)]
        h: Option<f64>,
    },
}

impl Request {
    pub fn kind(&self) -> &'static str {
        match self {
            Request::Rankine { .. } => "rankine",
            Request::Brayton { .. } => "brayton",
            Request::Vle { .. } => "vle",
            Request::Pxy { .. } => "pxy",
            Request::Flash { .. } => "flash",
            Request::Txy { .. } => "txy",
            Request::Refrigeration { .. } => "refrigeration",
            Request::Steam { .. } => "steam",
        }
    }
}

fn activity_model(wilson: Option<[f64; 2]>) -> TkResult<ActivityModel> {
    match wilson {
        Some([lambda12, lambda21]) => Ok(ActivityModel::wilson(lambda12, lambda21)?),
        None => Ok(ActivityModel::Ideal),
    }
}

/// Shared, read-only state for evaluating requests.
///
/// Cheap to share across threads: the provider sits behind an `Arc` and the
/// rest is plain data.
#[derive(Clone)]
pub struct Context {
    provider: Arc<dyn PropertyProvider>,
    brayton: BraytonCycleModel,
    pxy_points: usize,
}

impl Context {
    pub fn from_config(config: &EngineConfig) -> TkResult<Self> {
        let brayton = BraytonCycleModel::new(config.brayton.gamma, config.brayton.gas_constant)?;
        Ok(Self {
            provider: config.provider.build(),
            brayton,
            pxy_points: config.pxy_points,
        })
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub fn evaluate(&self, request: &Request) -> TkResult<Report> {
        match *request {
            Request::Rankine {
                p_boiler,
                t_boiler,
                p_condenser,
                eta_pump,
                eta_turbine,
            } => {
                let model = RankineCycleModel::new(self.provider.clone());
                let cycle = model.solve(&RankineInput {
                    p_boiler: pa(p_boiler),
                    t_boiler: k(t_boiler),
                    p_condenser: pa(p_condenser),
                    eta_pump,
                    eta_turbine,
                })?;
                Ok(Report::Cycle(cycle))
            }
            Request::Brayton {
                p1,
                t1,
                p2,
                t3,
                eta_compressor,
                eta_turbine,
                gamma,
            } => {
                let model = match gamma {
                    Some(gamma) => BraytonCycleModel::new(gamma, self.brayton.gas_constant)?,
                    None => self.brayton,
                };
                let solution = model.solve(&BraytonInput {
                    p1: pa(p1),
                    t1: k(t1),
                    p2: pa(p2),
                    t3: k(t3),
                    eta_compressor,
                    eta_turbine,
                })?;
                Ok(Report::Brayton(solution))
            }
            Request::Vle {
                temperature,
                psat1,
                psat2,
                x1,
                wilson,
                curve_points,
            } => {
                let system = BinarySystem::new(
                    k(temperature),
                    pa(psat1),
                    pa(psat2),
                    activity_model(wilson)?,
                )?;
                let result = solve_vle(&system, x1)?;
                let curve = result.pxy_curve(curve_points.unwrap_or(self.pxy_points))?;
                Ok(Report::Vle {
                    result,
                    curve: curve.iter().collect(),
                })
            }
            Request::Pxy {
                psat1,
                psat2,
                gamma1,
                gamma2,
                points,
            } => {
                let curve = generate_pxy_curve(
                    pa(psat1),
                    pa(psat2),
                    gamma1,
                    gamma2,
                    points.unwrap_or(self.pxy_points),
                )?;
                Ok(Report::Pxy {
                    points: curve.iter().collect(),
                })
            }
            Request::Flash {
                z1,
                pressure,
                temperature,
                psat1,
                psat2,
                wilson,
            } => {
                let system = BinarySystem::new(
                    k(temperature),
                    pa(psat1),
                    pa(psat2),
                    activity_model(wilson)?,
                )?;
                let result = flash(&FlashSpec {
                    z1,
                    pressure: pa(pressure),
                    system,
                })?;
                Ok(Report::Flash(result))
            }
            Request::Txy {
                pressure,
                antoine1: [a1, b1, c1],
                antoine2: [a2, b2, c2],
                wilson,
                t_min,
                t_max,
                points,
            } => {
                let (low, high) = DEFAULT_TXY_BRACKET_K;
                let diagram = TxyDiagram::new(
                    Antoine::new(a1, b1, c1)?,
                    Antoine::new(a2, b2, c2)?,
                    activity_model(wilson)?,
                    pa(pressure),
                    points.unwrap_or(DEFAULT_TXY_POINTS),
                )?
                .with_bracket(k(t_min.unwrap_or(low)), k(t_max.unwrap_or(high)))?;
                let points = diagram.iter().collect::<Result<Vec<_>, _>>()?;
                Ok(Report::Txy {
                    pressure: pa(pressure),
                    points,
                })
            }
            Request::Refrigeration {
                t_evap,
                t_cond,
                ref refrigerant,
            } => {
                let refrigerant: Refrigerant = refrigerant.parse()?;
                let model = RefrigerationCycleModel::new(self.provider.clone());
                let cycle = model.solve(&RefrigerationInput {
                    t_evap: k(t_evap),
                    t_cond: k(t_cond),
                    refrigerant,
                })?;
                Ok(Report::Cycle(cycle))
            }
            Request::Steam { p, t, x, s, h } => {
                let p = pa(p);
                let input = match (t, x, s, h) {
                    (Some(t), None, None, None) => StateInput::PT { p, t: k(t) },
                    (None, Some(x), None, None) => StateInput::PQ { p, x },
                    (None, None, Some(s), None) => StateInput::PS { p, s },
                    (None, None, None, Some(h)) => StateInput::PH { p, h },
                    _ => {
                        return Err(TkError::invalid_input(
                            "steam lookup needs exactly one of t, x, s, h",
                        ));
                    }
                };
                Ok(Report::Steam(self.provider.steam_state(input)?))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tk_core::units::to_k;

    fn ctx() -> Context {
        Context::from_config(&EngineConfig::default()).unwrap()
    }

    #[test]
    fn yaml_request_uses_default_efficiencies() {
        let req: Request = serde_yaml::from_str(
            "kind: rankine\np_boiler: 3.0e6\nt_boiler: 623.15\np_condenser: 75000\n",
        )
        .unwrap();
        assert_eq!(
            req,
            Request::Rankine {
                p_boiler: 3.0e6,
                t_boiler: 623.15,
                p_condenser: 75_000.0,
                eta_pump: 0.85,
                eta_turbine: 0.85,
            }
        );
        assert!(matches!(ctx().evaluate(&req).unwrap(), Report::Cycle(_)));
    }

    #[test]
    fn vle_request_carries_curve() {
        let req = Request::Vle {
            temperature: 350.0,
            psat1: 80_000.0,
            psat2: 40_000.0,
            x1: 0.5,
            wilson: None,
            curve_points: None,
        };
        match ctx().evaluate(&req).unwrap() {
            Report::Vle { result, curve } => {
                assert!((result.pressure_pa() - 60_000.0).abs() < 1e-9);
                assert_eq!(curve.len(), 11);
            }
            other => panic!("unexpected report {other:?}"),
        }
    }

    #[test]
    fn txy_request_spans_both_boiling_points() {
        // Ethanol and water, Antoine constants converted to Pa and K.
        let req: Request = serde_yaml::from_str(
            "kind: txy\npressure: 101325\nantoine1: [10.329073, 1642.89, -42.85]\n\
             antoine2: [10.196213, 1730.63, -39.724]\n",
        )
        .unwrap();
        match ctx().evaluate(&req).unwrap() {
            Report::Txy { points, .. } => {
                assert_eq!(points.len(), 11);
                assert!((to_k(points[0].temperature) - 373.147).abs() < 1e-2);
                assert!((to_k(points[10].temperature) - 351.469).abs() < 1e-2);
            }
            other => panic!("unexpected report {other:?}"),
        }
    }

    #[test]
    fn txy_outside_bracket_is_convergence_failure() {
        let req = Request::Txy {
            pressure: 1.0e7,
            antoine1: [10.329073, 1642.89, -42.85],
            antoine2: [10.196213, 1730.63, -39.724],
            wilson: None,
            t_min: None,
            t_max: None,
            points: Some(3),
        };
        assert!(matches!(
            ctx().evaluate(&req),
            Err(TkError::ConvergenceFailed { .. })
        ));
    }

    #[test]
    fn steam_needs_exactly_one_property() {
        let req = Request::Steam {
            p: 1.0e5,
            t: Some(400.0),
            x: Some(0.5),
            s: None,
            h: None,
        };
        assert!(matches!(
            ctx().evaluate(&req),
            Err(TkError::InvalidInput { .. })
        ));
    }

    #[test]
    fn unknown_refrigerant_is_invalid_input() {
        let req = Request::Refrigeration {
            t_evap: 263.15,
            t_cond: 313.15,
            refrigerant: "R999".into(),
        };
        assert!(matches!(
            ctx().evaluate(&req),
            Err(TkError::InvalidInput { .. })
        ));
    }
}
