use std::time::Instant;

use ratatui::crossterm::event::KeyEvent;
use ratatui::style::{Modifier, Style};
use tui_textarea::{Input, Key, TextArea};

use super::AppAction;

const FILE_PLACEHOLDER: &str = "Path to a .png, .jpg or .jpeg scan (Enter to select)";
const CHAT_PLACEHOLDER: &str = "Ask a question about your results...";

/// Which control receives keyboard input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Organ,
    ImageType,
    File,
    Chat,
}

impl Focus {
    /// The chat input only exists while a result is shown.
    pub fn next(self, chat_available: bool) -> Self {
        match self {
            Focus::Organ => Focus::ImageType,
            Focus::ImageType => Focus::File,
            Focus::File if chat_available => Focus::Chat,
            Focus::File | Focus::Chat => Focus::Organ,
        }
    }

    pub fn previous(self, chat_available: bool) -> Self {
        match self {
            Focus::Organ if chat_available => Focus::Chat,
            Focus::Organ => Focus::File,
            Focus::ImageType => Focus::Organ,
            Focus::File => Focus::ImageType,
            Focus::Chat => Focus::File,
        }
    }
}

pub struct UiState {
    pub focus: Focus,
    pub file_input: TextArea<'static>,
    pub chat_input: TextArea<'static>,
    /// Lines scrolled up from the bottom of the transcript; 0 follows new messages.
    pub chat_scroll: u16,
    /// Wrapped rows the transcript overflowed its panel by at the last draw.
    /// `None` until the transcript has been drawn once.
    pub transcript_overflow: Option<u16>,
    pub exit_requested: bool,
    pub pulse_start: Instant,
}

impl Default for UiState {
    fn default() -> Self {
        Self::new()
    }
}

impl UiState {
    pub fn new() -> Self {
        Self {
            focus: Focus::File,
            file_input: new_text_field(FILE_PLACEHOLDER),
            chat_input: new_text_field(CHAT_PLACEHOLDER),
            chat_scroll: 0,
            transcript_overflow: None,
            exit_requested: false,
            pulse_start: Instant::now(),
        }
    }

    pub fn file_text(&self) -> String {
        single_line_text(&self.file_input)
    }

    pub fn chat_text(&self) -> String {
        single_line_text(&self.chat_input)
    }

    pub fn set_file_text(&mut self, text: &str) {
        self.file_input = new_text_field(FILE_PLACEHOLDER);
        self.file_input.insert_str(text);
    }

    pub fn clear_chat_input(&mut self) {
        self.chat_input = new_text_field(CHAT_PLACEHOLDER);
    }

    /// Feed a key press to the focused text field. Selectors ignore it, and
    /// both fields are single-line so keys that would open a row are dropped.
    pub fn edit_focused_field(&mut self, key: KeyEvent) -> bool {
        let input = Input::from(key);
        if opens_new_row(&input) {
            return false;
        }
        match self.focus {
            Focus::File => self.file_input.input(input),
            Focus::Chat => self.chat_input.input(input),
            Focus::Organ | Focus::ImageType => false,
        }
    }

    /// Insert pasted text into the focused text field as a single line.
    pub fn paste_into_focused_field(&mut self, text: &str) -> bool {
        let single_line = text.replace('\n', " ");
        match self.focus {
            Focus::File => self.file_input.insert_str(single_line.trim()),
            Focus::Chat => self.chat_input.insert_str(&single_line),
            Focus::Organ | Focus::ImageType => false,
        }
    }

    /// The action Enter produces in the focused text field.
    pub fn commit_focused_field(&self) -> Option<AppAction> {
        match self.focus {
            Focus::File => Some(AppAction::SelectFile {
                path: self.file_text().trim().to_string(),
            }),
            Focus::Chat => Some(AppAction::SendMessage {
                text: self.chat_text(),
            }),
            Focus::Organ | Focus::ImageType => None,
        }
    }

    pub fn scroll_chat_to_end(&mut self) {
        self.chat_scroll = 0;
    }

    /// Scroll bound from the last draw; unbounded until layout is known, the
    /// renderer clamps on its next pass.
    pub fn max_chat_scroll(&self) -> u16 {
        self.transcript_overflow.unwrap_or(u16::MAX)
    }

    pub fn scroll_chat(&mut self, lines: i32, max_scroll: u16) {
        let current = i32::from(self.chat_scroll);
        let next = (current + lines).clamp(0, i32::from(max_scroll));
        self.chat_scroll = next as u16;
    }
}

/// A field's buffer as one line, rows joined by single spaces.
pub fn single_line_text(textarea: &TextArea<'_>) -> String {
    textarea.lines().join(" ")
}

fn opens_new_row(input: &Input) -> bool {
    match input.key {
        Key::Enter => true,
        Key::Char('m') | Key::Char('j') => input.ctrl,
        _ => false,
    }
}

fn new_text_field(placeholder: &str) -> TextArea<'static> {
    let mut textarea = TextArea::default();
    textarea.set_placeholder_text(placeholder);
    textarea.set_cursor_line_style(Style::default());
    textarea.set_placeholder_style(Style::default().add_modifier(Modifier::DIM));
    textarea
}
