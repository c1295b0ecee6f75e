//! SeaORM entity definitions for the persisted layout.
//!
//! A single `binaries` table holds every stored file; no other persisted
//! state exists.

pub mod binary_entry;

pub use binary_entry::Entity as BinaryEntry;
pub use binary_entry::Model as BinaryEntryModel;
