//! Storage layer for medrec
//!
//! This crate provides:
//! - The patient record store (SQLite via sqlx)
//! - The image object store (HTTP-backed or local filesystem)

pub mod db;
pub mod error;
pub mod models;
pub mod object;

pub use db::{RecordStore, SqliteRecordStore};
pub use error::{Result, StorageError};
pub use object::{FsObjectStore, HttpObjectStore, ObjectStore};
