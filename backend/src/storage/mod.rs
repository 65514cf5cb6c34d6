//! Storage layer: per-collection trait abstractions, the SQLite
//! implementation, and the blob store used for profile images.

pub mod blobs;
pub mod sqlite;
pub mod traits;

pub use blobs::{BlobStore, FsBlobStore};
pub use traits::{CategoryStore, ExpenseStore, IncomeStore, ProfileStore};
