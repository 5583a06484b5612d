//! Durable archive for the three persisted collections, backed by redb.
//!
//! Exactly three top-level blobs, each an independent JSON document loaded and
//! saved on its own: the node collection and the path collection as ordered
//! id→entity pairs, the insight list as a plain array. The blob schema
//! (camelCase fields, string enums) predates this implementation and must stay
//! compatible. Cross-blob consistency is best effort — a failed save of one
//! blob never rolls back the others.

use std::path::Path;
use std::sync::Arc;

use redb::{Database, TableDefinition};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::StoreError;
use crate::insight::KnowledgeInsight;
use crate::node::KnowledgeNode;
use crate::path::LearningPath;

/// Single table of named JSON blobs.
const BLOB_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("blobs");

const NODES_KEY: &str = "nodes";
const PATHS_KEY: &str = "paths";
const INSIGHTS_KEY: &str = "insights";

/// Result type for archive operations.
pub type ArchiveResult<T> = std::result::Result<T, StoreError>;

/// Key-value archive for knowledge state.
///
/// Writes go through redb transactions; reads use MVCC snapshots. Callers
/// (the engine) treat every failure here as non-fatal: log and continue on
/// in-memory state.
pub struct KnowledgeArchive {
    db: Arc<Database>,
}

impl KnowledgeArchive {
    /// Open or create an archive in the given directory.
    pub fn open(data_dir: &Path) -> ArchiveResult<Self> {
        std::fs::create_dir_all(data_dir).map_err(|e| StoreError::Io { source: e })?;
        let db_path = data_dir.join("sebayt.redb");
        let db = Database::create(&db_path).map_err(|e| StoreError::Redb {
            message: format!("failed to open redb at {}: {e}", db_path.display()),
        })?;
        Ok(Self { db: Arc::new(db) })
    }

    fn put_blob<T: Serialize>(&self, key: &str, value: &T) -> ArchiveResult<()> {
        let bytes = serde_json::to_vec(value).map_err(|e| StoreError::Serialization {
            message: format!("serializing `{key}` blob: {e}"),
        })?;
        let txn = self.db.begin_write().map_err(|e| StoreError::Redb {
            message: format!("begin_write failed: {e}"),
        })?;
        {
            let mut table = txn.open_table(BLOB_TABLE).map_err(|e| StoreError::Redb {
                message: format!("open_table failed: {e}"),
            })?;
            table
                .insert(key, bytes.as_slice())
                .map_err(|e| StoreError::Redb {
                    message: format!("insert failed: {e}"),
                })?;
        }
        txn.commit().map_err(|e| StoreError::Redb {
            message: format!("commit failed: {e}"),
        })?;
        Ok(())
    }

    fn get_blob<T: DeserializeOwned>(&self, key: &str) -> ArchiveResult<Option<T>> {
        let txn = self.db.begin_read().map_err(|e| StoreError::Redb {
            message: format!("begin_read failed: {e}"),
        })?;
        let table = match txn.open_table(BLOB_TABLE) {
            Ok(t) => t,
            // Fresh database: the table doesn't exist until the first write.
            Err(redb::TableError::TableDoesNotExist(_)) => return Ok(None),
            Err(e) => {
                return Err(StoreError::Redb {
                    message: format!("open_table failed: {e}"),
                });
            }
        };
        let Some(guard) = table.get(key).map_err(|e| StoreError::Redb {
            message: format!("get failed: {e}"),
        })?
        else {
            return Ok(None);
        };
        let value = serde_json::from_slice(guard.value()).map_err(|e| StoreError::Serialization {
            message: format!("deserializing `{key}` blob: {e}"),
        })?;
        Ok(Some(value))
    }

    /// Save the node collection blob.
    pub fn save_nodes(&self, pairs: &[(String, KnowledgeNode)]) -> ArchiveResult<()> {
        self.put_blob(NODES_KEY, &pairs)
    }

    /// Load the node collection blob. `None` on first run.
    pub fn load_nodes(&self) -> ArchiveResult<Option<Vec<(String, KnowledgeNode)>>> {
        self.get_blob(NODES_KEY)
    }

    /// Save the path collection blob.
    pub fn save_paths(&self, pairs: &[(String, LearningPath)]) -> ArchiveResult<()> {
        self.put_blob(PATHS_KEY, &pairs)
    }

    /// Load the path collection blob. `None` on first run.
    pub fn load_paths(&self) -> ArchiveResult<Option<Vec<(String, LearningPath)>>> {
        self.get_blob(PATHS_KEY)
    }

    /// Save the insight list blob (oldest first).
    pub fn save_insights(&self, list: &[KnowledgeInsight]) -> ArchiveResult<()> {
        self.put_blob(INSIGHTS_KEY, &list)
    }

    /// Load the insight list blob. `None` on first run.
    pub fn load_insights(&self) -> ArchiveResult<Option<Vec<KnowledgeInsight>>> {
        self.get_blob(INSIGHTS_KEY)
    }
}

impl std::fmt::Debug for KnowledgeArchive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KnowledgeArchive").finish()
    }
}
