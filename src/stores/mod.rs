//! Entry store implementations.
//!
//! - `DatabaseEntryStore`: SQL databases (PostgreSQL, SQLite)
//! - `MemoryEntryStore`: in-memory map for local development/testing

pub mod database_store;
pub mod memory_store;

pub use database_store::DatabaseEntryStore;
pub use memory_store::MemoryEntryStore;
