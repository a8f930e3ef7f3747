//! Interactive session: line commands in, rendered list out.
//!
//! The loop owns a `TodoController` and plays its host: each command
//! becomes a controller intent, the issued operation is executed over HTTP,
//! and the response resolved back in before the next prompt. Error banners
//! surface through a subscribed listener, so they print only when the
//! banner actually changes.
//!
//! `edit <n>` opens the todo for editing; the next line read is the new
//! content, saved as-is (empty included). Todos are addressed by their
//! 1-based position in the displayed list.

use std::cell::RefCell;
use std::fmt;
use std::io::{self, BufRead, Write};
use std::rc::Rc;

use todo_core::{ControllerState, PendingOp, TodoController};

use crate::transport::UreqTransport;

const HELP: &str = "commands:
  add <content>   create a todo
  done <number>   complete (remove) a todo
  edit <number>   edit a todo; the next line is the new content
  list            show the list
  quit            leave";

#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Add(String),
    Done(usize),
    Edit(usize),
    List,
    Help,
    Quit,
}

#[derive(Debug, PartialEq, Eq)]
pub enum CommandError {
    Unknown(String),
    MissingNumber(&'static str),
    InvalidNumber(String),
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::Unknown(word) => {
                write!(f, "unknown command '{word}' (try 'help')")
            }
            CommandError::MissingNumber(command) => {
                write!(f, "'{command}' needs a todo number")
            }
            CommandError::InvalidNumber(raw) => {
                write!(f, "'{raw}' is not a todo number")
            }
        }
    }
}

impl std::error::Error for CommandError {}

/// Parse one input line. An empty line redisplays the list.
pub fn parse_command(line: &str) -> Result<Command, CommandError> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(Command::List);
    }
    let (word, rest) = match trimmed.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (trimmed, ""),
    };
    match word {
        // Content validation belongs to the controller, so `add` with
        // nothing after it still becomes a submit.
        "add" => Ok(Command::Add(rest.to_string())),
        "done" => parse_number(rest, "done").map(Command::Done),
        "edit" => parse_number(rest, "edit").map(Command::Edit),
        "list" | "ls" => Ok(Command::List),
        "help" => Ok(Command::Help),
        "quit" | "exit" => Ok(Command::Quit),
        other => Err(CommandError::Unknown(other.to_string())),
    }
}

fn parse_number(raw: &str, command: &'static str) -> Result<usize, CommandError> {
    if raw.is_empty() {
        return Err(CommandError::MissingNumber(command));
    }
    raw.parse()
        .map_err(|_| CommandError::InvalidNumber(raw.to_string()))
}

/// Render the list for display: a loading line, an empty notice, or
/// numbered todos with the one under edit marked.
pub fn render_list(state: &ControllerState) -> String {
    if state.is_loading {
        return "Loading...".to_string();
    }
    if state.todos.is_empty() {
        return "There is no todos".to_string();
    }
    let mut out = String::new();
    for (index, todo) in state.todos.iter().enumerate() {
        if index > 0 {
            out.push('\n');
        }
        out.push_str(&format!("{:>3}. {}", index + 1, todo.content));
        if state.editing_id.as_deref() == Some(todo.id.as_str()) {
            out.push_str(" (editing)");
        }
    }
    out
}

fn todo_id_at(state: &ControllerState, number: usize) -> Option<String> {
    state
        .todos
        .get(number.checked_sub(1)?)
        .map(|t| t.id.clone())
}

fn dispatch(controller: &mut TodoController, transport: &UreqTransport, op: PendingOp) {
    match transport.execute(op.request()) {
        Ok(response) => controller.resolve(op, response),
        Err(e) => {
            eprintln!("network error: {e}");
            controller.fail(op);
        }
    }
}

fn flush_events(events: &Rc<RefCell<Vec<String>>>, output: &mut dyn Write) -> io::Result<()> {
    for line in events.borrow_mut().drain(..) {
        writeln!(output, "{line}")?;
    }
    Ok(())
}

/// Run the interactive loop until `quit` or end of input.
pub fn run_session(
    base_url: &str,
    input: impl BufRead,
    output: &mut dyn Write,
) -> io::Result<()> {
    let transport = UreqTransport::new();
    let (mut controller, load) = TodoController::new(base_url);

    let events: Rc<RefCell<Vec<String>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    let mut last_error: Option<String> = None;
    controller.subscribe(move |state| {
        if state.error != last_error {
            if let Some(message) = &state.error {
                sink.borrow_mut().push(format!("! {message}"));
            }
            last_error = state.error.clone();
        }
    });

    dispatch(&mut controller, &transport, load);
    flush_events(&events, output)?;
    writeln!(output, "{}", render_list(controller.state()))?;

    let mut lines = input.lines();
    loop {
        if controller.state().editing_id.is_some() {
            write!(output, "new content> ")?;
        } else {
            write!(output, "> ")?;
        }
        output.flush()?;

        let Some(line) = lines.next() else { break };
        let line = line?;

        // While a todo is under edit the whole line is its new content.
        if let Some(id) = controller.state().editing_id.clone() {
            match controller.update(&id, &line) {
                Ok(op) => dispatch(&mut controller, &transport, op),
                Err(e) => writeln!(output, "! {e}")?,
            }
            flush_events(&events, output)?;
            writeln!(output, "{}", render_list(controller.state()))?;
            continue;
        }

        match parse_command(&line) {
            Ok(Command::Quit) => break,
            Ok(Command::Help) => writeln!(output, "{HELP}")?,
            Ok(Command::List) => writeln!(output, "{}", render_list(controller.state()))?,
            Ok(Command::Add(text)) => {
                match controller.submit(&text) {
                    Ok(op) => dispatch(&mut controller, &transport, op),
                    Err(rejected) => writeln!(output, "! {rejected}")?,
                }
                flush_events(&events, output)?;
                writeln!(output, "{}", render_list(controller.state()))?;
            }
            Ok(Command::Done(number)) => match todo_id_at(controller.state(), number) {
                Some(id) => {
                    if let Some(op) = controller.complete(&id) {
                        dispatch(&mut controller, &transport, op);
                    }
                    flush_events(&events, output)?;
                    writeln!(output, "{}", render_list(controller.state()))?;
                }
                None => writeln!(output, "! no todo #{number}")?,
            },
            Ok(Command::Edit(number)) => match todo_id_at(controller.state(), number) {
                Some(id) => {
                    if let Some(content) = controller.begin_edit(&id) {
                        writeln!(output, "editing \"{content}\"")?;
                    }
                }
                None => writeln!(output, "! no todo #{number}")?,
            },
            Err(e) => writeln!(output, "! {e}")?,
        }
    }
    Ok(())
}
