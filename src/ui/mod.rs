//! Terminal UI layer for the interactive session.
//!
//! - [`chat_loop`]: terminal lifecycle, key routing and the draw loop.
//! - [`renderer`]: turns an [`App`](crate::core::app::App) into a frame.
//!
//! Domain state and its transitions live in [`crate::core`]; this layer only
//! presents them and turns input into actions.

pub mod chat_loop;
pub mod renderer;
