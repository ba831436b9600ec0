//! Interactive session: terminal setup, input routing and the draw loop.
//!
//! The loop is the only place actions are applied. Key presses and command
//! completions both arrive as [`AppAction`](crate::core::app::AppAction)s on
//! one queue, which keeps the reducer single-threaded even though uploads and
//! chat requests run as background tasks.

mod event_loop;
mod keybindings;
mod lifecycle;

pub use event_loop::run_app;

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::core::app::App;

/// Shared access to the application state for the loop and its tasks.
#[derive(Clone)]
pub struct AppHandle {
    inner: Arc<Mutex<App>>,
}

impl AppHandle {
    pub fn new(app: App) -> Self {
        Self {
            inner: Arc::new(Mutex::new(app)),
        }
    }

    pub async fn read<R>(&self, f: impl FnOnce(&App) -> R) -> R {
        let guard = self.inner.lock().await;
        f(&guard)
    }

    pub async fn update<R>(&self, f: impl FnOnce(&mut App) -> R) -> R {
        let mut guard = self.inner.lock().await;
        f(&mut guard)
    }
}
