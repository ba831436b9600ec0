use tracing::{debug, warn};

use super::{App, AppAction, AppCommand};
use crate::api::ChatRequest;
use crate::core::constants::CHAT_FALLBACK_REPLY;
use crate::core::message::ChatMessage;

pub(super) fn handle_chat_action(app: &mut App, action: AppAction) -> Option<AppCommand> {
    match action {
        AppAction::SendMessage { text } => send_message(app, text),
        AppAction::ChatReplied { content } => {
            push_message(app, ChatMessage::assistant(content));
            None
        }
        AppAction::ChatFailed { error } => {
            warn!(%error, "chat request failed");
            push_message(app, ChatMessage::assistant(CHAT_FALLBACK_REPLY));
            None
        }
        _ => None,
    }
}

/// Appends the user's message right away; the reply arrives as a later action.
fn send_message(app: &mut App, text: String) -> Option<AppCommand> {
    if text.trim().is_empty() {
        return None;
    }
    let results = app.view.results.as_ref()?;

    let request = ChatRequest {
        message: text.clone(),
        prediction: results.prediction.clone(),
        organ_type: results.organ_type.clone(),
    };
    debug!(prediction = %request.prediction, "queueing chat message");

    push_message(app, ChatMessage::user(text));
    app.ui.clear_chat_input();

    Some(AppCommand::Chat(request))
}

fn push_message(app: &mut App, message: ChatMessage) {
    app.view.chat_history.push(message);
    app.ui.scroll_chat_to_end();
}
