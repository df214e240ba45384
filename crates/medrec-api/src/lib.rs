//! HTTP API for medrec
//!
//! Exposes the patient CRUD surface and orchestrates the record store and
//! the object store so that rows never point at blobs that were not
//! committed first.

pub mod error;
pub mod form;
pub mod server;

pub use error::ApiError;
pub use server::ApiServer;
