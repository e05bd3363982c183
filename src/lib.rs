//! Echo Chat is a terminal client for the Echo question-answering backend.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns the conversation log, the session controller that runs
//!   one request/reply cycle per question, the think-tag sanitizer, the
//!   typewriter reveal engine, and configuration.
//! - [`api`] defines the `POST /chat` payloads and the HTTP backend.
//! - [`ui`] renders the terminal interface and runs the interactive event loop
//!   that drives user input and display updates.
//! - [`cli`] parses arguments and dispatches to the chat screen, the one-shot
//!   `say` command, and config editing.
//! - [`logging`] sets up optional file-based diagnostics.
//!
//! Runtime entrypoints live in the binary crate (`src/main.rs`) and route
//! through [`crate::cli::main`].

pub mod api;
pub mod cli;
pub mod core;
pub mod logging;
pub mod ui;
pub mod utils;
