//! File-backed todo storage.
//!
//! The whole collection lives in one JSON file, an array of records in
//! insertion order:
//! ```text
//! [
//!   {"id":"…","content":"…","isCompleted":false,"createdAt":"…"}
//! ]
//! ```
//! The file is read once at startup; every mutation rewrites it through a
//! temp file + rename so a crash mid-write never leaves a truncated store.
//! If the rewrite fails the in-memory mutation is reverted, keeping memory
//! and disk in agreement.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

/// A stored todo. Field names follow the wire format so the file is the
/// serialized wire shape plus the creation timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TodoRecord {
    pub id: Uuid,
    pub content: String,
    #[serde(rename = "isCompleted")]
    pub is_completed: bool,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

/// Errors from reading or writing the store file.
#[derive(Debug)]
pub enum StoreError {
    Io(PathBuf, io::Error),
    Parse(PathBuf, serde_json::Error),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Io(path, e) => {
                write!(f, "I/O error for {}: {}", path.display(), e)
            }
            StoreError::Parse(path, e) => {
                write!(f, "Failed to parse store file {}: {}", path.display(), e)
            }
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Io(_, e) => Some(e),
            StoreError::Parse(_, e) => Some(e),
        }
    }
}

/// Insertion-ordered todo collection with optional file persistence.
///
/// All access goes through an async `RwLock`, so the store can be shared
/// across handlers behind an `Arc`.
#[derive(Debug)]
pub struct TodoStore {
    path: Option<PathBuf>,
    todos: RwLock<Vec<TodoRecord>>,
}

impl TodoStore {
    /// Open the store backed by `path`, loading any existing contents.
    /// A missing file is an empty store; it is created on first write.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let todos = match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents)
                .map_err(|e| StoreError::Parse(path.clone(), e))?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(StoreError::Io(path, e)),
        };
        Ok(Self {
            path: Some(path),
            todos: RwLock::new(todos),
        })
    }

    /// Store with no backing file. Used by tests.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            todos: RwLock::new(Vec::new()),
        }
    }

    /// All todos in insertion order.
    pub async fn list(&self) -> Vec<TodoRecord> {
        self.todos.read().await.clone()
    }

    /// Append a new todo and persist. On persistence failure the append is
    /// undone and the error returned.
    pub async fn insert(&self, content: String) -> Result<TodoRecord, StoreError> {
        let record = TodoRecord {
            id: Uuid::new_v4(),
            content,
            is_completed: false,
            created_at: Utc::now(),
        };
        let mut todos = self.todos.write().await;
        todos.push(record.clone());
        if let Err(e) = self.persist(&todos) {
            todos.pop();
            return Err(e);
        }
        Ok(record)
    }

    /// Replace the content of the todo with `id` and persist. Returns
    /// `Ok(None)` when no todo has that id. On persistence failure the
    /// previous content is restored.
    pub async fn update_content(
        &self,
        id: Uuid,
        content: String,
    ) -> Result<Option<TodoRecord>, StoreError> {
        let mut todos = self.todos.write().await;
        let Some(index) = todos.iter().position(|t| t.id == id) else {
            return Ok(None);
        };
        let previous = std::mem::replace(&mut todos[index].content, content);
        if let Err(e) = self.persist(&todos) {
            todos[index].content = previous;
            return Err(e);
        }
        Ok(Some(todos[index].clone()))
    }

    /// Remove the todo with `id` and persist. Returns `Ok(false)` when no
    /// todo has that id. On persistence failure the todo is reinserted at
    /// its original position.
    pub async fn remove(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut todos = self.todos.write().await;
        let Some(index) = todos.iter().position(|t| t.id == id) else {
            return Ok(false);
        };
        let removed = todos.remove(index);
        if let Err(e) = self.persist(&todos) {
            todos.insert(index, removed);
            return Err(e);
        }
        Ok(true)
    }

    /// Rewrite the store file atomically (temp file + rename). Called with
    /// the write lock held so readers never observe unpersisted state.
    fn persist(&self, todos: &[TodoRecord]) -> Result<(), StoreError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let bytes = serde_json::to_vec(todos).map_err(|e| StoreError::Parse(path.clone(), e))?;

        let temp_path = path.with_extension("json.tmp");
        let mut file =
            File::create(&temp_path).map_err(|e| StoreError::Io(temp_path.clone(), e))?;
        file.write_all(&bytes)
            .map_err(|e| StoreError::Io(temp_path.clone(), e))?;
        file.sync_all()
            .map_err(|e| StoreError::Io(temp_path.clone(), e))?;
        fs::rename(&temp_path, path).map_err(|e| StoreError::Io(path.clone(), e))
    }
}
