use super::{App, AppAction, AppCommand};

pub(super) fn handle_input_action(app: &mut App, action: AppAction) -> Option<AppCommand> {
    match action {
        AppAction::CycleFocus => {
            app.ui.focus = app.ui.focus.next(app.view.has_results());
            None
        }
        AppAction::FocusPrevious => {
            app.ui.focus = app.ui.focus.previous(app.view.has_results());
            None
        }
        AppAction::ScrollChat { lines } => {
            let max_scroll = app.ui.max_chat_scroll();
            app.ui.scroll_chat(lines, max_scroll);
            None
        }
        AppAction::ScrollChatToEnd => {
            app.ui.scroll_chat_to_end();
            None
        }
        AppAction::Quit => {
            app.ui.exit_requested = true;
            None
        }
        _ => None,
    }
}
