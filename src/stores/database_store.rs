//! Database-backed entry store.
//!
//! Supports SQLite and PostgreSQL backends via SeaORM.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::Index;
use sea_orm::*;
use tracing::info;
use uuid::Uuid;

use crate::config::{Config, DatabaseType};
use crate::entities::binary_entry::{self, Entity as BinaryEntry};
use crate::path::EntryKey;
use crate::store::{EntryStore, NewEntry, StoreError};

/// Entry store persisting rows in a relational `binaries` table.
pub struct DatabaseEntryStore {
    db: DatabaseConnection,
}

impl DatabaseEntryStore {
    /// Create from existing config.
    pub async fn from_config(config: &Config) -> Result<Self, StoreError> {
        info!("Initializing DatabaseEntryStore");
        info!("Database type: {}", config.database.db_type_str());

        let url = match &config.database.db_config {
            DatabaseType::Sqlite { url } | DatabaseType::Postgres { url } => url,
        };
        Self::connect(url).await
    }

    /// Connect to a database URL and initialize the schema.
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        info!("Connecting to database: {}", url);
        let mut opts = ConnectOptions::new(url.to_string());
        if url.contains(":memory:") {
            // each pooled connection would otherwise get its own memory database
            opts.max_connections(1);
        }
        let db = Database::connect(opts).await?;
        Self::init_schema(&db).await?;

        info!("DatabaseEntryStore initialized successfully");
        Ok(Self { db })
    }

    /// Initialize database schema: the `binaries` table, the unique index
    /// on `(directory, name)` and the `hash` lookup index.
    async fn init_schema(db: &DatabaseConnection) -> Result<(), StoreError> {
        let builder = db.get_database_backend();
        let schema = Schema::new(builder);

        let table_stmt = schema
            .create_table_from_entity(BinaryEntry)
            .if_not_exists()
            .to_owned();
        db.execute(builder.build(&table_stmt)).await?;

        let unique_stmt = Index::create()
            .if_not_exists()
            .name("idx_binaries_directory_name")
            .table(BinaryEntry)
            .col(binary_entry::Column::Directory)
            .col(binary_entry::Column::Name)
            .unique()
            .to_owned();
        db.execute(builder.build(&unique_stmt)).await?;

        let hash_stmt = Index::create()
            .if_not_exists()
            .name("idx_binaries_hash")
            .table(BinaryEntry)
            .col(binary_entry::Column::Hash)
            .to_owned();
        db.execute(builder.build(&hash_stmt)).await?;

        info!("Database schema initialized successfully");
        Ok(())
    }

    fn now_nanos() -> i64 {
        Utc::now().timestamp_nanos_opt().unwrap_or(0)
    }

    /// Map a duplicate-key engine error onto the uniqueness variant the
    /// adapter treats as a collision.
    fn map_write_err(e: DbErr, key: &EntryKey) -> StoreError {
        if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
            StoreError::UniquenessViolation {
                directory: key.directory.clone(),
                name: key.name.clone(),
            }
        } else {
            StoreError::Database(e)
        }
    }
}

#[async_trait]
impl EntryStore for DatabaseEntryStore {
    fn name(&self) -> &'static str {
        "database-entry-store"
    }

    async fn find_by_key(
        &self,
        key: &EntryKey,
    ) -> Result<Vec<binary_entry::Model>, StoreError> {
        Ok(BinaryEntry::find()
            .filter(binary_entry::Column::Directory.eq(&key.directory))
            .filter(binary_entry::Column::Name.eq(&key.name))
            .all(&self.db)
            .await?)
    }

    async fn insert(&self, entry: NewEntry) -> Result<binary_entry::Model, StoreError> {
        let now = Self::now_nanos();
        let size = entry.content.len() as i64;
        let key = entry.key;

        let model = binary_entry::ActiveModel {
            id: NotSet,
            hash: Set(Uuid::now_v7()),
            directory: Set(key.directory.clone()),
            name: Set(key.name.clone()),
            content: Set(entry.content),
            size: Set(size),
            mime_type: Set(entry.mime_type),
            created_at: Set(now),
            updated_at: Set(now),
        };

        model
            .insert(&self.db)
            .await
            .map_err(|e| Self::map_write_err(e, &key))
    }

    async fn update_key(&self, old: &EntryKey, new: &EntryKey) -> Result<(), StoreError> {
        let found = self.find_by_key(old).await?;
        let Some(model) = found.into_iter().next() else {
            return Err(StoreError::NotFound {
                directory: old.directory.clone(),
                name: old.name.clone(),
            });
        };

        let mut active: binary_entry::ActiveModel = model.into();
        active.directory = Set(new.directory.clone());
        active.name = Set(new.name.clone());
        active.updated_at = Set(Self::now_nanos());
        active
            .update(&self.db)
            .await
            .map_err(|e| Self::map_write_err(e, new))?;

        Ok(())
    }

    async fn delete_by_key(&self, key: &EntryKey) -> Result<u64, StoreError> {
        let res = BinaryEntry::delete_many()
            .filter(binary_entry::Column::Directory.eq(&key.directory))
            .filter(binary_entry::Column::Name.eq(&key.name))
            .exec(&self.db)
            .await?;
        Ok(res.rows_affected)
    }

    async fn delete_by_prefix(&self, prefix: &str) -> Result<u64, StoreError> {
        let res = BinaryEntry::delete_many()
            .filter(binary_entry::Column::Directory.eq(prefix))
            .exec(&self.db)
            .await?;
        Ok(res.rows_affected)
    }

    async fn list_by_prefix(
        &self,
        prefix: &str,
    ) -> Result<Vec<binary_entry::Model>, StoreError> {
        Ok(BinaryEntry::find()
            .filter(binary_entry::Column::Directory.eq(prefix))
            .all(&self.db)
            .await?)
    }
}
