//! tk-props: thermodynamic property lookup for thermokit.
//!
//! Provides:
//! - Thermodynamic state representation with phase and quality
//! - Refrigerant identifiers
//! - `PropertyProvider` trait for state lookups
//! - A simplified placeholder provider (constant saturation envelope)
//! - A CoolProp backend for real fluid properties
//!
//! # Architecture
//!
//! Cycle solvers only see the `PropertyProvider` trait, so the property
//! backend can be swapped without touching any cycle code. The simplified
//! provider is the default and needs no external data; `TableProvider` routes
//! every lookup through CoolProp (via `rfluids`).
//!
//! # Example
//!
//! ```no_run
//! use tk_props::{PropertyProvider, SimplifiedProvider, StateInput};
//! use tk_core::units::kpa;
//!
//! let provider = SimplifiedProvider::default();
//! let liquid = provider
//!     .steam_state(StateInput::PQ { p: kpa(75.0), x: 0.0 })
//!     .unwrap();
//! println!("h_f = {} kJ/kg", liquid.enthalpy());
//! ```

pub mod error;
pub mod provider;
pub mod refrigerant;
pub mod simplified;
pub mod state;
pub mod table;

pub use error::{PropertyError, PropertyResult};
pub use provider::{PropertyProvider, RefrigerantStates};
pub use refrigerant::Refrigerant;
pub use simplified::{SimplifiedProvider, SimplifiedSteamTable};
pub use state::{Phase, StateInput, ThermodynamicState};
pub use table::TableProvider;
