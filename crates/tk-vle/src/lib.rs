//! tk-vle: binary vapor-liquid equilibrium.
//!
//! Provides:
//! - Activity-coefficient models (ideal solution, Wilson)
//! - Bubble-pressure VLE via modified Raoult's law
//! - Pxy curves (fixed γ) and composition-dependent bubble-pressure sweeps
//! - Dew-pressure solve and isothermal two-phase flash
//! - Isobaric Txy diagrams from vapor-pressure correlations
//!
//! Everything except the Txy diagram is isothermal and takes pure-component
//! saturation pressures as inputs. Txy diagrams take Psat(T) as an
//! [`Antoine`] correlation or a closure.
//!
//! # Example
//!
//! ```
//! use tk_core::units::{k, pa};
//! use tk_vle::{ActivityModel, BinarySystem, solve_vle};
//!
//! let system = BinarySystem::new(k(350.0), pa(80_000.0), pa(40_000.0), ActivityModel::Ideal)?;
//! let vle = solve_vle(&system, 0.5)?;
//! assert!((vle.pressure_pa() - 60_000.0).abs() < 1e-9);
//! # Ok::<(), tk_vle::VleError>(())
//! ```

pub mod activity;
pub mod equilibrium;
pub mod error;
pub mod flash;
pub mod pxy;
pub mod txy;

pub use activity::ActivityModel;
pub use equilibrium::{BinarySystem, VleResult, solve_dew, solve_vle};
pub use error::{EquilibriumResult, VleError};
pub use flash::{FlashResult, FlashSpec, flash};
pub use pxy::{
    BubblePressureSweep, DEFAULT_PXY_POINTS, PxyCurve, PxyIter, PxyPoint, bubble_pressure_sweep,
    generate_pxy_curve,
};
pub use txy::{
    Antoine, DEFAULT_TXY_BRACKET_K, DEFAULT_TXY_POINTS, TxyDiagram, TxyIter, VaporPressure,
    bubble_temperature,
};
