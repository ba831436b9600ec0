//! Event polling, dispatching, and UI rendering loop.
//!
//! Terminal input is read on a background task and forwarded over a channel.
//! Each turn of the loop draws (at most `MAX_FPS`), routes pending input to
//! the reducer through the action queue, applies queued actions, and spawns
//! a task for every command they produce.

use std::{
    error::Error,
    io,
    sync::Arc,
    time::{Duration, Instant},
};

use ratatui::crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use tokio::sync::mpsc;
use tracing::{debug, info};

use super::keybindings::{resolve_key, KeyIntent};
use super::lifecycle::{restore_terminal, setup_terminal, SharedTerminal};
use super::AppHandle;
use crate::api::{AnalysisBackend, HttpBackend};
use crate::core::app::{
    apply_actions, execute_command, App, AppAction, AppActionDispatcher, AppCommand,
};
use crate::core::config::ResolvedSettings;
use crate::ui::renderer::ui;

#[derive(Debug)]
pub enum UiEvent {
    Crossterm(Event),
}

async fn is_exit_requested(app: &AppHandle) -> bool {
    app.read(|app| app.ui.exit_requested).await
}

async fn try_draw_frame(
    app: &AppHandle,
    terminal: &SharedTerminal,
    request_redraw: &mut bool,
    last_draw: &mut Instant,
    frame_duration: Duration,
) -> io::Result<()> {
    if !*request_redraw {
        return Ok(());
    }

    let now = Instant::now();
    if now.duration_since(*last_draw) < frame_duration {
        return Ok(());
    }

    let mut terminal_guard = terminal.lock().await;
    app.update(|app| terminal_guard.draw(|f| ui(f, app))).await?;
    *last_draw = now;
    *request_redraw = false;
    Ok(())
}

/// Returns whether any event was handled.
async fn process_ui_events(
    app: &AppHandle,
    event_rx: &mut mpsc::UnboundedReceiver<UiEvent>,
    dispatcher: &AppActionDispatcher,
) -> bool {
    let mut events_processed = false;

    while let Ok(ev) = event_rx.try_recv() {
        events_processed = true;
        match ev {
            UiEvent::Crossterm(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                route_keyboard_event(app, dispatcher, key).await;
            }
            UiEvent::Crossterm(Event::Paste(text)) => {
                let sanitized = sanitize_pasted_text(&text);
                if !sanitized.is_empty() {
                    app.update(|app| app.ui.paste_into_focused_field(&sanitized))
                        .await;
                }
            }
            UiEvent::Crossterm(_) => {}
        }
    }

    events_processed
}

/// Text edits go straight into the focused field; everything that changes
/// view state goes through the action queue.
async fn route_keyboard_event(app: &AppHandle, dispatcher: &AppActionDispatcher, key: KeyEvent) {
    let focus = app.read(|app| app.ui.focus).await;
    match resolve_key(focus, &key) {
        KeyIntent::Dispatch(action) => dispatcher.dispatch(action),
        KeyIntent::CommitField => {
            if let Some(action) = app.read(|app| app.ui.commit_focused_field()).await {
                dispatcher.dispatch(action);
            }
        }
        KeyIntent::CommitFieldAndSubmit => {
            if let Some(action) = app.read(|app| app.ui.commit_focused_field()).await {
                dispatcher.dispatch(action);
            }
            dispatcher.dispatch(AppAction::Submit);
        }
        KeyIntent::EditField => {
            app.update(|app| app.ui.edit_focused_field(key)).await;
        }
        KeyIntent::Ignore => {}
    }
}

pub(crate) fn sanitize_pasted_text(text: &str) -> String {
    let without_crlf = text.replace("\r\n", "\n");
    let without_cr = without_crlf.replace('\r', "\n");
    let expanded_tabs = without_cr.replace('\t', "    ");
    expanded_tabs
        .chars()
        .filter(|&c| c == '\n' || !c.is_control())
        .collect()
}

async fn drain_action_queue(
    app: &AppHandle,
    backend: &Arc<dyn AnalysisBackend>,
    dispatcher: &AppActionDispatcher,
    action_rx: &mut mpsc::UnboundedReceiver<AppAction>,
) -> bool {
    let mut pending = Vec::new();
    while let Ok(action) = action_rx.try_recv() {
        pending.push(action);
    }

    if pending.is_empty() {
        return false;
    }

    let commands = app.update(|app| apply_actions(app, pending)).await;
    for cmd in commands {
        spawn_command(backend.clone(), dispatcher.clone(), cmd);
    }
    true
}

/// Runs a command off the loop; its single completion action is queued back.
pub(crate) fn spawn_command(
    backend: Arc<dyn AnalysisBackend>,
    dispatcher: AppActionDispatcher,
    command: AppCommand,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let action = execute_command(backend.as_ref(), command).await;
        dispatcher.dispatch(action);
    })
}

fn spawn_event_reader(event_tx: mpsc::UnboundedSender<UiEvent>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            if let Ok(true) = event::poll(Duration::from_millis(10)) {
                match event::read() {
                    Ok(ev) => {
                        if event_tx.send(UiEvent::Crossterm(ev)).is_err() {
                            break;
                        }
                    }
                    Err(_) => {
                        continue;
                    }
                }
            } else {
                tokio::task::yield_now().await;
            }
        }
    })
}

/// Run the interactive session until the user quits.
///
/// `initial_file` pre-fills and selects the scan path, so `medai scan.png`
/// opens ready to process.
pub async fn run_app(
    settings: ResolvedSettings,
    initial_file: Option<String>,
) -> Result<(), Box<dyn Error>> {
    info!(backend = %settings.backend_url, "starting interactive session");

    let backend: Arc<dyn AnalysisBackend> =
        Arc::new(HttpBackend::new(settings.backend_url.clone()));
    let app = AppHandle::new(App::new(&settings));

    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<AppAction>();
    let dispatcher = AppActionDispatcher::new(action_tx);

    if let Some(path) = initial_file {
        app.update(|app| app.ui.set_file_text(&path)).await;
        dispatcher.dispatch(AppAction::SelectFile { path });
    }

    let terminal = setup_terminal()?;

    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<UiEvent>();
    let event_reader_handle = spawn_event_reader(event_tx);

    const MAX_FPS: u64 = 60;
    let frame_duration = Duration::from_millis(1000 / MAX_FPS);
    let mut last_draw = Instant::now() - frame_duration;
    let mut request_redraw = true;

    let result: Result<(), Box<dyn Error>> = 'main_loop: loop {
        if is_exit_requested(&app).await {
            break 'main_loop Ok(());
        }

        if let Err(err) = try_draw_frame(
            &app,
            &terminal,
            &mut request_redraw,
            &mut last_draw,
            frame_duration,
        )
        .await
        {
            break 'main_loop Err(err.into());
        }

        let events_processed = process_ui_events(&app, &mut event_rx, &dispatcher).await;
        if events_processed {
            request_redraw = true;
        }

        let actions_applied =
            drain_action_queue(&app, &backend, &dispatcher, &mut action_rx).await;
        if actions_applied {
            request_redraw = true;
        }

        // The processing indicator animates while an upload is in flight.
        if app.read(|app| app.view.is_loading).await {
            request_redraw = true;
        }

        if !events_processed && !actions_applied && !request_redraw {
            tokio::time::sleep(Duration::from_millis(16)).await;
        }
    };

    event_reader_handle.abort();
    restore_terminal(&terminal).await?;
    debug!("interactive session ended");

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiError, ChatRequest, ChatResponse, UploadRequest, UploadResponse};
    use crate::core::selection::{ImageType, OrganType};
    use crate::utils::test_utils::{create_test_app, sample_upload_response};
    use async_trait::async_trait;
    use ratatui::crossterm::event::{KeyCode, KeyModifiers};

    struct CannedBackend;

    #[async_trait]
    impl AnalysisBackend for CannedBackend {
        async fn upload(&self, _request: UploadRequest) -> Result<UploadResponse, ApiError> {
            Ok(sample_upload_response())
        }

        async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, ApiError> {
            Ok(ChatResponse {
                response: format!("echo: {}", request.message),
            })
        }
    }

    fn new_dispatcher() -> (AppActionDispatcher, mpsc::UnboundedReceiver<AppAction>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (AppActionDispatcher::new(tx), rx)
    }

    #[test]
    fn sanitize_paste_text_removes_control_characters() {
        assert_eq!(
            sanitize_pasted_text("a\r\nb\tc\u{7}"),
            "a\nb    c".to_string()
        );
    }

    #[tokio::test]
    async fn spawned_command_posts_exactly_one_completion() {
        let (dispatcher, mut rx) = new_dispatcher();
        let backend: Arc<dyn AnalysisBackend> = Arc::new(CannedBackend);

        spawn_command(
            backend,
            dispatcher,
            AppCommand::Upload(UploadRequest {
                file: "scan.png".into(),
                file_name: "scan.png".into(),
                organ: OrganType::Brain,
                image_type: ImageType::Mri,
            }),
        )
        .await
        .expect("task");

        assert_eq!(
            rx.recv().await,
            Some(AppAction::UploadSucceeded {
                response: sample_upload_response()
            })
        );
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn drained_submit_runs_upload_and_feeds_result_back() {
        let app = AppHandle::new(create_test_app());
        let backend: Arc<dyn AnalysisBackend> = Arc::new(CannedBackend);
        let (dispatcher, mut rx) = new_dispatcher();

        dispatcher.dispatch_many([
            AppAction::SelectFile {
                path: "scan.png".into(),
            },
            AppAction::Submit,
        ]);
        assert!(drain_action_queue(&app, &backend, &dispatcher, &mut rx).await);
        assert!(app.read(|app| app.view.is_loading).await);

        let completion = rx.recv().await.expect("completion");
        app.update(|app| apply_actions(app, [completion])).await;

        let (loading, prediction) = app
            .read(|app| {
                (
                    app.view.is_loading,
                    app.view.results.as_ref().map(|r| r.prediction.clone()),
                )
            })
            .await;
        assert!(!loading);
        assert_eq!(prediction.as_deref(), Some("Glioma"));
    }

    #[tokio::test]
    async fn enter_in_chat_field_sends_the_typed_message() {
        let mut seeded = create_test_app();
        apply_actions(
            &mut seeded,
            [
                AppAction::SelectFile {
                    path: "scan.png".into(),
                },
                AppAction::Submit,
                AppAction::UploadSucceeded {
                    response: sample_upload_response(),
                },
            ],
        );
        let app = AppHandle::new(seeded);
        let (dispatcher, mut rx) = new_dispatcher();

        for ch in "hi".chars() {
            route_keyboard_event(
                &app,
                &dispatcher,
                KeyEvent::new(KeyCode::Char(ch), KeyModifiers::NONE),
            )
            .await;
        }
        route_keyboard_event(
            &app,
            &dispatcher,
            KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE),
        )
        .await;

        assert_eq!(
            rx.try_recv().ok(),
            Some(AppAction::SendMessage { text: "hi".into() })
        );
    }

    #[tokio::test]
    async fn process_key_selects_the_typed_path_first() {
        let app = AppHandle::new(create_test_app());
        let backend: Arc<dyn AnalysisBackend> = Arc::new(CannedBackend);
        let (dispatcher, mut rx) = new_dispatcher();

        for ch in "scan.png".chars() {
            route_keyboard_event(
                &app,
                &dispatcher,
                KeyEvent::new(KeyCode::Char(ch), KeyModifiers::NONE),
            )
            .await;
        }
        route_keyboard_event(
            &app,
            &dispatcher,
            KeyEvent::new(KeyCode::Char('p'), KeyModifiers::CONTROL),
        )
        .await;

        assert!(drain_action_queue(&app, &backend, &dispatcher, &mut rx).await);
        let (loading, error, file) = app
            .read(|app| {
                (
                    app.view.is_loading,
                    app.view.error.clone(),
                    app.view
                        .selection
                        .file
                        .as_ref()
                        .map(|file| file.file_name.clone()),
                )
            })
            .await;
        assert!(loading);
        assert_eq!(error, None);
        assert_eq!(file.as_deref(), Some("scan.png"));
    }

    #[tokio::test]
    async fn paste_lands_in_focused_field() {
        let app = AppHandle::new(create_test_app());
        let (dispatcher, _rx) = new_dispatcher();
        let (event_tx, mut event_rx) = mpsc::unbounded_channel();
        event_tx
            .send(UiEvent::Crossterm(Event::Paste("/tmp/scan.png\r\n".into())))
            .expect("send");

        assert!(process_ui_events(&app, &mut event_rx, &dispatcher).await);
        assert_eq!(app.read(|app| app.ui.file_text()).await, "/tmp/scan.png");
    }
}
