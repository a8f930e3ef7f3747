//! Optimistic-update controller for a single todo session.
//!
//! # Overview
//! `TodoController` is the source of truth for one UI session: the ordered
//! todo list, the at-most-one editing selection, the loading flag, and the
//! error banner. UI intents (submit, complete, select-for-edit, save) come
//! in as method calls; network work goes out as [`PendingOp`] values the
//! host executes and resolves. Consumers observe state through registered
//! listeners instead of polling.
//!
//! # Operation lifecycle
//! Mutating intents apply locally first and reconcile with the server
//! after: `complete` and `update` mutate the list immediately and stash the
//! prior sequence inside the returned `PendingOp`; resolving the op with a
//! failed response restores that snapshot and raises the matching banner
//! message.
//! `submit` is the exception — it waits for the server because the id must
//! come from the store, so nothing is inserted until the create succeeds.
//!
//! Every transition happens inside a `&mut self` call, so consumers never
//! observe a half-applied or half-rolled-back list. The controller stays
//! responsive while ops are outstanding: nothing blocks, and concurrent
//! submits or completes on different ids are allowed to race. `PendingOp`
//! is not `Clone` and `resolve`/`fail` consume it, so an op is resolved at
//! most once; dropping the controller discards in-flight results outright.

use std::fmt;

use crate::client::TodoClient;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::types::{CreateTodo, Todo, UpdateTodo};

const LOAD_FAILED: &str = "Failed to load data.";
const SUBMIT_FAILED: &str = "Failed to submit todo";
const COMPLETE_FAILED: &str = "Failed to complete todo";
const UPDATE_FAILED: &str = "Failed to update todo";

/// Why `submit` refused to issue a create operation. Surfaced directly to
/// the user as a notice; the error banner is not involved.
#[derive(Debug)]
pub enum SubmitRejected {
    /// The input was empty after trimming. No network call is made.
    EmptyContent,
    /// The create payload could not be serialized.
    Request(ApiError),
}

impl fmt::Display for SubmitRejected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmitRejected::EmptyContent => write!(f, "empty item is invalid"),
            SubmitRejected::Request(e) => write!(f, "could not build create request: {e}"),
        }
    }
}

impl std::error::Error for SubmitRejected {}

/// Client-visible session state. Owned exclusively by the controller; the
/// accessor and listener callbacks hand out shared references only, so all
/// mutation flows through the controller's operations.
#[derive(Debug, Clone, Default)]
pub struct ControllerState {
    /// Ordered todos: server order at load, then append order for new items.
    pub todos: Vec<Todo>,
    /// Id of the todo currently open for inline editing, if any.
    pub editing_id: Option<String>,
    /// True during the initial fetch and while a submit is in flight.
    pub is_loading: bool,
    /// Banner message from the most recent failure; cleared by a successful
    /// load, otherwise sticky until overwritten.
    pub error: Option<String>,
}

enum OpKind {
    Load,
    Submit,
    Complete { snapshot: Vec<Todo> },
    Update { snapshot: Vec<Todo> },
}

/// An issued operation awaiting its HTTP outcome.
///
/// Carries the request for the host to execute plus whatever the controller
/// needs to finish the operation (the rollback snapshot for optimistic
/// mutations). Hand it back via [`TodoController::resolve`] once a response
/// exists, or [`TodoController::fail`] if the transport itself failed.
pub struct PendingOp {
    request: HttpRequest,
    kind: OpKind,
}

impl PendingOp {
    /// The request the host must execute.
    pub fn request(&self) -> &HttpRequest {
        &self.request
    }
}

impl fmt::Debug for PendingOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            OpKind::Load => "load",
            OpKind::Submit => "submit",
            OpKind::Complete { .. } => "complete",
            OpKind::Update { .. } => "update",
        };
        f.debug_struct("PendingOp")
            .field("kind", &kind)
            .field("request", &self.request)
            .finish()
    }
}

type Listener = Box<dyn FnMut(&ControllerState)>;

/// Session controller: owns the todo list state and mediates between UI
/// intents and the REST API.
pub struct TodoController {
    client: TodoClient,
    state: ControllerState,
    listeners: Vec<Listener>,
}

impl TodoController {
    /// Create a controller for the API at `base_url` and issue the initial
    /// list fetch. `is_loading` is set until the returned op resolves.
    pub fn new(base_url: &str) -> (Self, PendingOp) {
        let client = TodoClient::new(base_url);
        let load = PendingOp {
            request: client.build_list_todos(),
            kind: OpKind::Load,
        };
        let controller = Self {
            client,
            state: ControllerState {
                is_loading: true,
                ..ControllerState::default()
            },
            listeners: Vec::new(),
        };
        (controller, load)
    }

    /// Current session state.
    pub fn state(&self) -> &ControllerState {
        &self.state
    }

    /// Register a listener invoked after every visible state mutation.
    pub fn subscribe(&mut self, listener: impl FnMut(&ControllerState) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    fn notify(&mut self) {
        for listener in &mut self.listeners {
            listener(&self.state);
        }
    }

    /// Submit new todo text.
    ///
    /// The input is trimmed; empty results are rejected up front with no
    /// network call and no state change. Otherwise `is_loading` is raised
    /// and a create op returned. Nothing is appended until the op resolves
    /// successfully — the id must come from the store. Resetting the input
    /// field is the caller's concern and happens regardless of outcome.
    pub fn submit(&mut self, raw_text: &str) -> Result<PendingOp, SubmitRejected> {
        let content = raw_text.trim();
        if content.is_empty() {
            return Err(SubmitRejected::EmptyContent);
        }
        let input = CreateTodo {
            content: content.to_string(),
        };
        let request = self
            .client
            .build_create_todo(&input)
            .map_err(SubmitRejected::Request)?;
        self.state.is_loading = true;
        self.notify();
        Ok(PendingOp {
            request,
            kind: OpKind::Submit,
        })
    }

    /// Complete (remove) the todo with `id`.
    ///
    /// Returns `None` when `id` is not in the list: the todo is treated as
    /// already completed and no call is issued. Otherwise the todo is
    /// removed immediately and a delete op returned; a failed resolution
    /// restores the pre-removal sequence. Completing the todo currently
    /// being edited also ends that edit, so edit state cannot land on a
    /// neighboring item.
    pub fn complete(&mut self, id: &str) -> Option<PendingOp> {
        if !self.state.todos.iter().any(|t| t.id == id) {
            return None;
        }
        let snapshot = self.state.todos.clone();
        self.state.todos.retain(|t| t.id != id);
        if self.state.editing_id.as_deref() == Some(id) {
            self.state.editing_id = None;
        }
        self.notify();
        Some(PendingOp {
            request: self.client.build_delete_todo(id),
            kind: OpKind::Complete { snapshot },
        })
    }

    /// Save `new_content` into the todo with `id`.
    ///
    /// No validation: empty content is accepted. The matching todo is
    /// rewritten immediately and the edit selection is cleared — saving
    /// always ends the edit, and a later failure does not reopen it. A
    /// failed resolution restores the pre-update sequence (the selection
    /// stays cleared). An id that is no longer present still issues the
    /// call; the local rewrite simply matches nothing.
    pub fn update(&mut self, id: &str, new_content: &str) -> Result<PendingOp, ApiError> {
        let input = UpdateTodo {
            content: new_content.to_string(),
        };
        let request = self.client.build_update_todo(id, &input)?;
        let snapshot = self.state.todos.clone();
        if let Some(todo) = self.state.todos.iter_mut().find(|t| t.id == id) {
            todo.content = new_content.to_string();
        }
        self.state.editing_id = None;
        self.notify();
        Ok(PendingOp {
            request,
            kind: OpKind::Update { snapshot },
        })
    }

    /// Open the todo with `id` for editing and return a working copy of its
    /// current content for the caller's input buffer.
    ///
    /// Selecting a todo while another is being edited moves the selection;
    /// the abandoned edit is not saved. Returns `None` (and changes
    /// nothing) when `id` is not in the list.
    pub fn begin_edit(&mut self, id: &str) -> Option<String> {
        let content = self
            .state
            .todos
            .iter()
            .find(|t| t.id == id)
            .map(|t| t.content.clone())?;
        self.state.editing_id = Some(id.to_string());
        self.notify();
        Some(content)
    }

    /// Feed the HTTP response for `op` back into the controller.
    pub fn resolve(&mut self, op: PendingOp, response: HttpResponse) {
        self.finish(op.kind, Some(response));
    }

    /// Record that the transport failed to produce any response for `op`
    /// (connection refused, timeout in the host, and so on). Treated
    /// exactly like a non-2xx response.
    pub fn fail(&mut self, op: PendingOp) {
        self.finish(op.kind, None);
    }

    fn finish(&mut self, kind: OpKind, response: Option<HttpResponse>) {
        match kind {
            OpKind::Load => {
                let loaded = response.and_then(|r| self.client.parse_list_todos(r).ok());
                match loaded {
                    Some(todos) => {
                        self.state.todos = todos;
                        self.state.error = None;
                    }
                    None => self.state.error = Some(LOAD_FAILED.to_string()),
                }
                self.state.is_loading = false;
                self.notify();
            }
            OpKind::Submit => {
                let created = response.and_then(|r| self.client.parse_create_todo(r).ok());
                match created {
                    Some(todo) => self.state.todos.push(todo),
                    None => self.state.error = Some(SUBMIT_FAILED.to_string()),
                }
                self.state.is_loading = false;
                self.notify();
            }
            OpKind::Complete { snapshot } => {
                let ok = response
                    .map(|r| self.client.parse_delete_todo(r).is_ok())
                    .unwrap_or(false);
                if !ok {
                    self.state.todos = snapshot;
                    self.state.error = Some(COMPLETE_FAILED.to_string());
                    self.notify();
                }
            }
            OpKind::Update { snapshot } => {
                let ok = response
                    .map(|r| self.client.parse_update_todo(r).is_ok())
                    .unwrap_or(false);
                if !ok {
                    self.state.todos = snapshot;
                    self.state.error = Some(UPDATE_FAILED.to_string());
                    self.notify();
                }
            }
        }
    }
}
