//! Runs the network side of an [`AppCommand`] and turns the outcome into
//! the follow-up [`AppAction`].

use tracing::debug;

use super::{AppAction, AppCommand};
use crate::api::AnalysisBackend;

/// Every command resolves to exactly one action, success or failure.
pub async fn execute_command(backend: &dyn AnalysisBackend, command: AppCommand) -> AppAction {
    match command {
        AppCommand::Upload(request) => match backend.upload(request).await {
            Ok(response) => AppAction::UploadSucceeded { response },
            Err(err) => {
                debug!(error = ?err, "upload command failed");
                AppAction::UploadFailed {
                    error: err.to_string(),
                }
            }
        },
        AppCommand::Chat(request) => match backend.chat(request).await {
            Ok(response) => AppAction::ChatReplied {
                content: response.response,
            },
            Err(err) => {
                debug!(error = ?err, "chat command failed");
                AppAction::ChatFailed {
                    error: err.to_string(),
                }
            }
        },
    }
}
