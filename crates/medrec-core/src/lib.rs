//! Core domain model for medrec
//!
//! This crate contains:
//! - The `Patient` record and its validated input form
//! - Birthday parsing and wire formatting
//! - Blob identifier generation

pub mod error;
pub mod ident;
pub mod patient;

pub use error::{Error, Result};
pub use patient::{parse_birthday, Patient, PatientFields};
