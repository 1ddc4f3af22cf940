//! tk-cycles: thermodynamic cycle solvers.
//!
//! Provides four-state models for:
//! - Rankine power cycle (pump, boiler, turbine, condenser)
//! - Brayton gas-turbine cycle (ideal gas, constant γ)
//! - Vapor-compression refrigeration
//!
//! Every solver is a pure function of its inputs. Property lookups go through
//! the injected [`tk_props::PropertyProvider`], so the same solver runs
//! against the simplified placeholder data or a real equation of state.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use tk_cycles::{RankineCycleModel, RankineInput};
//! use tk_core::units::{k, kpa, mpa};
//! use tk_props::SimplifiedProvider;
//!
//! let model = RankineCycleModel::new(Arc::new(SimplifiedProvider::default()));
//! let result = model
//!     .solve(&RankineInput {
//!         p_boiler: mpa(3.0),
//!         t_boiler: k(623.15),
//!         p_condenser: kpa(75.0),
//!         eta_pump: 0.85,
//!         eta_turbine: 0.85,
//!     })
//!     .unwrap();
//! println!("η_th = {:?}", result.thermal_efficiency());
//! ```

pub mod brayton;
pub mod common;
pub mod error;
pub mod ideal_gas;
pub mod rankine;
pub mod refrigeration;
pub mod result;

// Re-exports
pub use brayton::{BraytonCycleModel, BraytonInput, BraytonSolution, solve_brayton};
pub use error::{CycleError, SolveResult};
pub use rankine::{RankineCycleModel, RankineInput, solve_rankine};
pub use refrigeration::{RefrigerationCycleModel, RefrigerationInput, solve_refrigeration};
pub use result::{CycleKind, CycleResult, Performance};
