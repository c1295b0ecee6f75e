use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::path::ROOT_DIRECTORY;

/// One stored file: path identity, payload and metadata.
///
/// `(directory, name)` is unique across live entries; the store creates the
/// backing unique index at schema init.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "binaries")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    /// Time-ordered identifier assigned at creation; kept for traceability,
    /// never used for lookup.
    pub hash: Uuid,

    /// Directory prefix of the path; `"."` for root-level entries.
    pub directory: String,

    pub name: String,

    #[sea_orm(column_type = "Blob")]
    pub content: Vec<u8>,

    /// Byte length of `content`, derived at write time.
    pub size: i64,

    #[sea_orm(column_type = "Text", nullable)]
    pub mime_type: Option<String>,

    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Full logical path of the entry.
    pub fn path(&self) -> String {
        if self.directory == ROOT_DIRECTORY {
            self.name.clone()
        } else {
            format!("{}/{}", self.directory, self.name)
        }
    }

    /// Human readable size, e.g. "1.46 KB".
    pub fn size_formatted(&self) -> String {
        const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];
        let bytes = self.size.max(0) as f64;
        if bytes < 1.0 {
            return "0 B".to_string();
        }
        let pow = (bytes.log(1024.0)).floor() as usize;
        let pow = pow.min(UNITS.len() - 1);
        format!("{:.2} {}", bytes / 1024f64.powi(pow as i32), UNITS[pow])
    }
}
