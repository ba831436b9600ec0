//! View state and the reducer that drives it.
//!
//! [`App`] holds everything the screen shows. All mutation goes through
//! [`apply_action`], which updates the state synchronously and hands back an
//! [`AppCommand`] when network work is needed. The command's completion comes
//! back later as another [`AppAction`], so an optimistic update (the user's
//! chat message) and its follow-up (the reply or the fallback) are two
//! separate reducer steps.

mod actions;
pub mod executor;
pub mod ui_state;

#[cfg(test)]
mod tests;

pub use actions::{apply_action, apply_actions, AppAction, AppActionDispatcher, AppCommand};
pub use executor::execute_command;
pub use ui_state::{Focus, UiState};

use crate::core::analysis::AnalysisResult;
use crate::core::config::data::ResolvedSettings;
use crate::core::message::ChatMessage;
use crate::core::selection::UploadSelection;

/// Data the view renders: selection, live result, chat, error and loading.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewState {
    pub selection: UploadSelection,
    /// Present only after a successful upload; replaced by the next one.
    pub results: Option<AnalysisResult>,
    pub chat_history: Vec<ChatMessage>,
    pub error: Option<String>,
    pub is_loading: bool,
}

impl ViewState {
    pub fn has_results(&self) -> bool {
        self.results.is_some()
    }
}

pub struct App {
    pub backend_url: String,
    pub view: ViewState,
    pub ui: UiState,
}

impl App {
    pub fn new(settings: &ResolvedSettings) -> Self {
        Self {
            backend_url: settings.backend_url.clone(),
            view: ViewState {
                selection: UploadSelection::new(settings.organ, settings.image_type),
                ..ViewState::default()
            },
            ui: UiState::new(),
        }
    }
}
