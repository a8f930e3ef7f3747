//! Interactive terminal client for the todo service.
//!
//! Connects to the API server, loads the list, and reads commands from
//! stdin until `quit` or end of input. `help` lists the commands.

use std::io;

use clap::Parser;

mod session;
mod transport;

#[derive(Parser)]
#[command(name = "todo")]
#[command(version)]
#[command(about = "Interactive client for the todo API", long_about = None)]
struct Cli {
    /// Base URL of the todo API server
    #[arg(long, default_value = "http://localhost:3001")]
    server: String,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    session::run_session(&cli.server, stdin.lock(), &mut stdout)?;
    Ok(())
}
