//! Customer Sheets Core - Shared types library.
//!
//! This crate provides the customer record model used by the server and its tests:
//!
//! - [`types`] - Customer id, field schema, record and patch types
//! - [`sheet`] - Conversion between sheet rows (grids of strings) and records
//!
//! # Architecture
//!
//! The core crate contains only types and pure conversions - no I/O, no HTTP
//! clients. The header row of a sheet is the schema: [`sheet::SheetHeader`] is
//! discovered per call and never cached here.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod sheet;
pub mod types;

pub use sheet::{SheetHeader, SheetTable};
pub use types::*;
