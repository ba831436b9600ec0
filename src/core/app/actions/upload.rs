use tracing::{debug, info, warn};

use super::{App, AppAction, AppCommand};
use crate::api::{UploadRequest, UploadResponse};
use crate::core::analysis::AnalysisResult;
use crate::core::app::Focus;
use crate::core::constants::{NO_FILE_ERROR, UPLOAD_FAILED_ERROR};
use crate::core::message::ChatMessage;
use crate::core::selection::FileSelection;

pub(super) fn handle_upload_action(app: &mut App, action: AppAction) -> Option<AppCommand> {
    match action {
        AppAction::SelectOrgan { organ } => {
            app.view.selection.organ = organ;
            None
        }
        AppAction::SelectImageType { image_type } => {
            app.view.selection.image_type = image_type;
            None
        }
        AppAction::ToggleOrgan => {
            app.view.selection.organ = app.view.selection.organ.toggled();
            None
        }
        AppAction::ToggleImageType => {
            app.view.selection.image_type = app.view.selection.image_type.toggled();
            None
        }
        AppAction::SelectFile { path } => {
            if let Some(file) = FileSelection::from_path(path.trim()) {
                debug!(file = %file.path.display(), "file selected");
                app.view.selection.file = Some(file);
            }
            None
        }
        AppAction::Submit => begin_submit(app),
        AppAction::UploadSucceeded { response } => {
            complete_upload(app, response);
            None
        }
        AppAction::UploadFailed { error } => {
            warn!(%error, "image upload failed");
            app.view.error = Some(UPLOAD_FAILED_ERROR.to_string());
            app.view.is_loading = false;
            None
        }
        _ => None,
    }
}

fn begin_submit(app: &mut App) -> Option<AppCommand> {
    let Some(file) = app.view.selection.file.clone() else {
        app.view.error = Some(NO_FILE_ERROR.to_string());
        return None;
    };

    let selection = &app.view.selection;
    info!(
        file = %file.file_name,
        organ = selection.organ.as_str(),
        image_type = selection.image_type.as_str(),
        "submitting image for analysis"
    );

    let request = UploadRequest {
        file: file.path,
        file_name: file.file_name,
        organ: selection.organ,
        image_type: selection.image_type,
    };

    app.view.error = None;
    app.view.chat_history.clear();
    app.view.is_loading = true;
    app.ui.pulse_start = std::time::Instant::now();
    app.ui.scroll_chat_to_end();

    Some(AppCommand::Upload(request))
}

/// Overlapping submissions are not fenced: whichever response lands last is
/// what the view shows.
fn complete_upload(app: &mut App, response: UploadResponse) {
    let seed = response
        .llama_response
        .clone()
        .filter(|message| !message.is_empty());

    info!(prediction = %response.prediction, "analysis received");
    app.view.results = Some(AnalysisResult::from(response));
    if let Some(seed) = seed {
        app.view.chat_history = vec![ChatMessage::assistant(seed)];
    }
    app.view.is_loading = false;
    app.ui.scroll_chat_to_end();
    app.ui.focus = Focus::Chat;
}
