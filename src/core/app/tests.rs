use super::*;
use crate::api::UploadResponse;
use crate::core::constants::{CHAT_FALLBACK_REPLY, NO_FILE_ERROR, UPLOAD_FAILED_ERROR};
use crate::core::message::{ChatMessage, ChatRole};
use crate::core::selection::{ImageType, OrganType};
use crate::utils::test_utils::{create_test_app, sample_upload_response};

fn app_with_file() -> App {
    let mut app = create_test_app();
    apply_action(
        &mut app,
        AppAction::SelectFile {
            path: "scans/brain.png".into(),
        },
    );
    app
}

fn app_with_results() -> App {
    let mut app = app_with_file();
    apply_action(&mut app, AppAction::Submit);
    apply_action(
        &mut app,
        AppAction::UploadSucceeded {
            response: sample_upload_response(),
        },
    );
    app
}

#[test]
fn submit_without_file_sets_error_and_issues_nothing() {
    let mut app = create_test_app();

    let command = apply_action(&mut app, AppAction::Submit);

    assert!(command.is_none());
    assert_eq!(app.view.error.as_deref(), Some(NO_FILE_ERROR));
    assert!(!app.view.is_loading);
}

#[test]
fn submit_uses_current_selection() {
    let mut app = app_with_file();
    apply_action(&mut app, AppAction::ToggleOrgan);
    apply_action(&mut app, AppAction::ToggleImageType);

    let command = apply_action(&mut app, AppAction::Submit);

    match command {
        Some(AppCommand::Upload(request)) => {
            assert_eq!(request.file_name, "brain.png");
            assert_eq!(request.organ, OrganType::Lungs);
            assert_eq!(request.image_type, ImageType::Ct);
        }
        other => panic!("expected upload command, got {other:?}"),
    }
}

#[test]
fn empty_file_path_keeps_previous_selection() {
    let mut app = app_with_file();
    apply_action(&mut app, AppAction::SelectFile { path: "  ".into() });
    assert_eq!(
        app.view.selection.file.as_ref().map(|f| f.file_name.as_str()),
        Some("brain.png")
    );
}

#[test]
fn loading_spans_submit_until_success() {
    let mut app = app_with_file();
    assert!(!app.view.is_loading);

    apply_action(&mut app, AppAction::Submit);
    assert!(app.view.is_loading);

    apply_action(
        &mut app,
        AppAction::UploadSucceeded {
            response: sample_upload_response(),
        },
    );
    assert!(!app.view.is_loading);
}

#[test]
fn loading_spans_submit_until_failure() {
    let mut app = app_with_file();
    apply_action(&mut app, AppAction::Submit);
    assert!(app.view.is_loading);

    apply_action(
        &mut app,
        AppAction::UploadFailed {
            error: "connection refused".into(),
        },
    );
    assert!(!app.view.is_loading);
    assert_eq!(app.view.error.as_deref(), Some(UPLOAD_FAILED_ERROR));
    assert!(app.view.results.is_none());
}

#[test]
fn seed_message_becomes_single_assistant_entry() {
    let app = app_with_results();

    assert_eq!(app.view.chat_history.len(), 1);
    assert_eq!(app.view.chat_history[0].role, ChatRole::Assistant);
    assert_eq!(app.view.chat_history[0].content, "I see an abnormality.");
    assert_eq!(app.ui.focus, Focus::Chat);
}

#[test]
fn missing_or_empty_seed_leaves_history_empty() {
    for seed in [None, Some(String::new())] {
        let mut app = app_with_file();
        apply_action(&mut app, AppAction::Submit);
        apply_action(
            &mut app,
            AppAction::UploadSucceeded {
                response: UploadResponse {
                    llama_response: seed,
                    ..sample_upload_response()
                },
            },
        );
        assert!(app.view.results.is_some());
        assert!(app.view.chat_history.is_empty());
    }
}

#[test]
fn resubmitting_clears_history_and_error() {
    let mut app = app_with_results();
    apply_action(
        &mut app,
        AppAction::SendMessage {
            text: "Is it benign?".into(),
        },
    );
    app.view.error = Some("stale".into());
    assert_eq!(app.view.chat_history.len(), 2);

    let command = apply_action(&mut app, AppAction::Submit);

    assert!(matches!(command, Some(AppCommand::Upload(_))));
    assert!(app.view.chat_history.is_empty());
    assert!(app.view.error.is_none());
}

#[test]
fn blank_message_is_ignored() {
    let mut app = app_with_results();
    let before = app.view.clone();

    for text in ["", "   ", "\n\t"] {
        let command = apply_action(&mut app, AppAction::SendMessage { text: text.into() });
        assert!(command.is_none());
    }
    assert_eq!(app.view, before);
}

#[test]
fn message_without_result_is_ignored() {
    let mut app = create_test_app();

    let command = apply_action(
        &mut app,
        AppAction::SendMessage {
            text: "hello".into(),
        },
    );

    assert!(command.is_none());
    assert!(app.view.chat_history.is_empty());
}

#[test]
fn message_is_appended_before_reply() {
    let mut app = app_with_results();

    let command = apply_action(
        &mut app,
        AppAction::SendMessage {
            text: " What does this mean? ".into(),
        },
    );

    let Some(AppCommand::Chat(request)) = command else {
        panic!("expected chat command");
    };
    assert_eq!(request.message, " What does this mean? ");
    assert_eq!(request.prediction, "Glioma");
    assert_eq!(request.organ_type, "brain");
    assert_eq!(
        app.view.chat_history.last(),
        Some(&ChatMessage::user(" What does this mean? "))
    );
    assert!(app.ui.chat_text().is_empty());
}

#[test]
fn failed_reply_appends_exactly_one_fallback() {
    let mut app = app_with_results();
    apply_action(
        &mut app,
        AppAction::SendMessage {
            text: "Next steps?".into(),
        },
    );

    apply_action(
        &mut app,
        AppAction::ChatFailed {
            error: "timeout".into(),
        },
    );

    assert_eq!(app.view.chat_history.len(), 3);
    assert_eq!(
        app.view.chat_history[1..],
        [
            ChatMessage::user("Next steps?"),
            ChatMessage::assistant(CHAT_FALLBACK_REPLY),
        ]
    );
}

#[test]
fn overlapping_submits_show_last_response() {
    let mut app = app_with_file();
    apply_action(&mut app, AppAction::Submit);
    apply_action(&mut app, AppAction::Submit);

    apply_action(
        &mut app,
        AppAction::UploadSucceeded {
            response: UploadResponse {
                prediction: "Meningioma".into(),
                ..sample_upload_response()
            },
        },
    );
    assert!(!app.view.is_loading);

    apply_action(
        &mut app,
        AppAction::UploadSucceeded {
            response: sample_upload_response(),
        },
    );

    let results = app.view.results.as_ref().expect("results");
    assert_eq!(results.prediction, "Glioma");
    assert_eq!(app.view.chat_history.len(), 1);
}

#[test]
fn focus_cycle_includes_chat_only_with_results() {
    let mut app = create_test_app();
    app.ui.focus = Focus::File;
    apply_action(&mut app, AppAction::CycleFocus);
    assert_eq!(app.ui.focus, Focus::Organ);

    let mut app = app_with_results();
    app.ui.focus = Focus::File;
    apply_action(&mut app, AppAction::CycleFocus);
    assert_eq!(app.ui.focus, Focus::Chat);
    apply_action(&mut app, AppAction::FocusPrevious);
    assert_eq!(app.ui.focus, Focus::File);
}

#[test]
fn scrolling_is_bounded_by_last_drawn_overflow() {
    let mut app = app_with_results();
    app.ui.transcript_overflow = Some(12);
    apply_action(&mut app, AppAction::ScrollChat { lines: 50 });
    assert_eq!(app.ui.chat_scroll, 12);
    apply_action(&mut app, AppAction::ScrollChat { lines: -5 });
    assert_eq!(app.ui.chat_scroll, 7);

    apply_action(&mut app, AppAction::ScrollChatToEnd);
    assert_eq!(app.ui.chat_scroll, 0);
}

#[test]
fn apply_actions_collects_commands() {
    let mut app = create_test_app();
    let commands = apply_actions(
        &mut app,
        [
            AppAction::SelectFile {
                path: "scan.jpg".into(),
            },
            AppAction::Submit,
            AppAction::Quit,
        ],
    );
    assert_eq!(commands.len(), 1);
    assert!(app.ui.exit_requested);
}
