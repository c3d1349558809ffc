//! Core types for Customer Sheets.
//!
//! This module provides type-safe wrappers for the customer domain.

pub mod cell;
pub mod field;
pub mod id;
pub mod record;

pub use field::CustomerField;
pub use id::CustomerId;
pub use record::{CustomerPatch, CustomerRecord};
