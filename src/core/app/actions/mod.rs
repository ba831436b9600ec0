mod chat;
mod input;
mod upload;

use tokio::sync::mpsc;

use super::App;
use crate::api::{ChatRequest, UploadRequest, UploadResponse};
use crate::core::selection::{ImageType, OrganType};

#[derive(Debug, Clone, PartialEq)]
pub enum AppAction {
    SelectOrgan {
        organ: OrganType,
    },
    SelectImageType {
        image_type: ImageType,
    },
    ToggleOrgan,
    ToggleImageType,
    SelectFile {
        path: String,
    },
    Submit,
    UploadSucceeded {
        response: UploadResponse,
    },
    UploadFailed {
        error: String,
    },
    SendMessage {
        text: String,
    },
    ChatReplied {
        content: String,
    },
    ChatFailed {
        error: String,
    },
    CycleFocus,
    FocusPrevious,
    ScrollChat {
        lines: i32,
    },
    ScrollChatToEnd,
    Quit,
}

/// Network work requested by the reducer. Each command resolves to exactly
/// one follow-up action.
#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    Upload(UploadRequest),
    Chat(ChatRequest),
}

#[derive(Clone)]
pub struct AppActionDispatcher {
    tx: mpsc::UnboundedSender<AppAction>,
}

impl AppActionDispatcher {
    pub fn new(tx: mpsc::UnboundedSender<AppAction>) -> Self {
        Self { tx }
    }

    pub fn dispatch(&self, action: AppAction) {
        let _ = self.tx.send(action);
    }

    pub fn dispatch_many<I>(&self, actions: I)
    where
        I: IntoIterator<Item = AppAction>,
    {
        for action in actions.into_iter() {
            self.dispatch(action);
        }
    }
}

pub fn apply_actions(app: &mut App, actions: impl IntoIterator<Item = AppAction>) -> Vec<AppCommand> {
    let mut commands = Vec::new();
    for action in actions {
        if let Some(cmd) = apply_action(app, action) {
            commands.push(cmd);
        }
    }
    commands
}

pub fn apply_action(app: &mut App, action: AppAction) -> Option<AppCommand> {
    match action {
        AppAction::SelectOrgan { .. }
        | AppAction::SelectImageType { .. }
        | AppAction::ToggleOrgan
        | AppAction::ToggleImageType
        | AppAction::SelectFile { .. }
        | AppAction::Submit
        | AppAction::UploadSucceeded { .. }
        | AppAction::UploadFailed { .. } => upload::handle_upload_action(app, action),

        AppAction::SendMessage { .. }
        | AppAction::ChatReplied { .. }
        | AppAction::ChatFailed { .. } => chat::handle_chat_action(app, action),

        AppAction::CycleFocus
        | AppAction::FocusPrevious
        | AppAction::ScrollChat { .. }
        | AppAction::ScrollChatToEnd
        | AppAction::Quit => input::handle_input_action(app, action),
    }
}
