//! # Request-Core
//!
//! Declarative descriptors for remote BroadWorks operations and the engine
//! that turns a submitted form into a typed client call.
//!
//! - [`model`]: `Request`/`Argument` descriptors declared as static tables
//! - [`catalog`]: validated per-protocol catalogs with explicit display order
//! - [`binding`]: the per-argument binding pipeline and [`BoundCall`]
//! - [`property`]: the injected per-user settings accessor
//! - [`registry`]: operation name to handler tables and dispatch

pub mod binding;
pub mod catalog;
pub mod error;
pub mod model;
pub mod property;
pub mod registry;

pub use binding::{bind, checkbox_state, form_inputs, BoundCall, BoundValue, FormInputs, FormValue};
pub use catalog::Catalog;
pub use error::{DispatchError, DispatchResult, RegistryError};
pub use model::{Argument, ArgumentKind, DefaultValue, Position, Protocol, Request};
pub use property::{form_defaults, DiscardProperties, FormField, PropertyAccessor, PropertyValue};
pub use registry::{Handler, OperationTable, Outcome};
