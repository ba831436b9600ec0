//! MedAI Vision is a terminal client for a medical-imaging analysis backend.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns the view state, the reducer that applies user and network
//!   actions to it, configuration, and the command executor.
//! - [`api`] defines the upload/chat payloads and the HTTP backend client.
//! - [`ui`] renders the terminal interface and runs the event loop that turns
//!   key presses into actions and network completions back into actions.
//! - [`cli`] parses arguments and dispatches to the interactive interface,
//!   the headless `analyze` command, or configuration management.
//!
//! Runtime entrypoints live in the binary crate (`src/main.rs`) and route
//! through [`crate::cli::main`].

pub mod api;
pub mod cli;
pub mod core;
pub mod ui;
pub mod utils;
