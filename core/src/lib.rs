//! Client core for the todo service: request building, response parsing,
//! and the optimistic session state machine.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern). The caller executes the
//! actual HTTP round-trip, making the core fully deterministic and testable.
//!
//! # Design
//! - `TodoClient` is stateless — it holds only `base_url`. Each CRUD
//!   operation is split into `build_*` (produces request) and `parse_*`
//!   (consumes response), so the I/O boundary is explicit.
//! - `TodoController` layers session state on top: the ordered list, the
//!   edit selection, the loading flag and the error banner, with optimistic
//!   completion/update and snapshot rollback. It hands out [`PendingOp`]
//!   values for the host to execute and resolve.
//! - DTOs are defined independently from the server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod controller;
pub mod error;
pub mod http;
pub mod types;

pub use client::TodoClient;
pub use controller::{ControllerState, PendingOp, SubmitRejected, TodoController};
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use types::{CreateTodo, Todo, UpdateTodo};
