//! Input helpers: curve CSV ingest and the on-disk curve store.

pub mod ingest;

pub use ingest::*;
