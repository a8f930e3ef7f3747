//! Wire types for the todo API.
//!
//! # Design
//! Defined independently from the server crate's types on purpose: the two
//! sides agree only on JSON, and the integration tests catch schema drift.
//! JSON keys follow the API contract (`isCompleted`), Rust fields follow
//! Rust naming.
//!
//! `Todo::id` is an opaque `String`. The store mints ids and the controller
//! only ever echoes them back, so the client side never parses or inspects
//! them.

use serde::{Deserialize, Serialize};

/// A single todo item as the API serves it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Todo {
    pub id: String,
    pub content: String,
    #[serde(rename = "isCompleted")]
    pub is_completed: bool,
}

/// Request payload for creating a todo. The controller sends trimmed,
/// non-empty content only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTodo {
    pub content: String,
}

/// Request payload for replacing a todo's content. Content-only by
/// contract; empty content is legal here (updates are not validated).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateTodo {
    pub content: String,
}
