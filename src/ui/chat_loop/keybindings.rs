//! Maps key presses to reducer actions for the focused control.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::core::app::{AppAction, Focus};
use crate::core::constants::CHAT_SCROLL_STEP;
use crate::core::selection::{ImageType, OrganType};

/// What the event loop should do with a key press.
#[derive(Debug, Clone, PartialEq)]
pub enum KeyIntent {
    Dispatch(AppAction),
    /// Enter in a text field: commit its contents.
    CommitField,
    /// Process from the file field: select what was typed, then submit.
    CommitFieldAndSubmit,
    /// Hand the key to the focused text field.
    EditField,
    Ignore,
}

pub fn resolve_key(focus: Focus, key: &KeyEvent) -> KeyIntent {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        KeyCode::Char('c') if ctrl => return KeyIntent::Dispatch(AppAction::Quit),
        KeyCode::Esc => return KeyIntent::Dispatch(AppAction::Quit),
        KeyCode::Char('p') if ctrl => return submit_intent(focus),
        KeyCode::F(5) => return submit_intent(focus),
        KeyCode::Tab => return KeyIntent::Dispatch(AppAction::CycleFocus),
        KeyCode::BackTab => return KeyIntent::Dispatch(AppAction::FocusPrevious),
        KeyCode::PageUp => {
            return KeyIntent::Dispatch(AppAction::ScrollChat {
                lines: CHAT_SCROLL_STEP,
            })
        }
        KeyCode::PageDown => {
            return KeyIntent::Dispatch(AppAction::ScrollChat {
                lines: -CHAT_SCROLL_STEP,
            })
        }
        KeyCode::End if ctrl => return KeyIntent::Dispatch(AppAction::ScrollChatToEnd),
        _ => {}
    }

    match focus {
        Focus::Organ => match key.code {
            KeyCode::Left | KeyCode::Right | KeyCode::Up | KeyCode::Down | KeyCode::Char(' ') => {
                KeyIntent::Dispatch(AppAction::ToggleOrgan)
            }
            KeyCode::Char('b') => KeyIntent::Dispatch(AppAction::SelectOrgan {
                organ: OrganType::Brain,
            }),
            KeyCode::Char('l') => KeyIntent::Dispatch(AppAction::SelectOrgan {
                organ: OrganType::Lungs,
            }),
            KeyCode::Enter => KeyIntent::Dispatch(AppAction::CycleFocus),
            _ => KeyIntent::Ignore,
        },
        Focus::ImageType => match key.code {
            KeyCode::Left | KeyCode::Right | KeyCode::Up | KeyCode::Down | KeyCode::Char(' ') => {
                KeyIntent::Dispatch(AppAction::ToggleImageType)
            }
            KeyCode::Char('m') => KeyIntent::Dispatch(AppAction::SelectImageType {
                image_type: ImageType::Mri,
            }),
            KeyCode::Char('c') => KeyIntent::Dispatch(AppAction::SelectImageType {
                image_type: ImageType::Ct,
            }),
            KeyCode::Enter => KeyIntent::Dispatch(AppAction::CycleFocus),
            _ => KeyIntent::Ignore,
        },
        Focus::File | Focus::Chat => match key.code {
            KeyCode::Enter => KeyIntent::CommitField,
            _ => KeyIntent::EditField,
        },
    }
}

fn submit_intent(focus: Focus) -> KeyIntent {
    match focus {
        Focus::File => KeyIntent::CommitFieldAndSubmit,
        Focus::Organ | Focus::ImageType | Focus::Chat => KeyIntent::Dispatch(AppAction::Submit),
    }
}
