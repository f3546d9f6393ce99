//! Typed XSI operations, grouped by resource
//!
//! All methods live on [`crate::XsiClient`]. Setters follow the
//! read-modify-write pattern: GET the feature document, edit a deep copy
//! (see [`crate::updates`]), PUT the copy back.

mod calls;
mod profile;
mod services;

pub use profile::{device_credentials, device_name_by_type};
