use crate::core::app::ui_state::single_line_text;
use crate::core::app::{App, Focus, UiState};
use crate::core::message::ChatMessage;
use crate::core::selection::{ImageType, OrganType};
use crate::utils::url::resolve_artifact_url;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use tui_textarea::TextArea;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const FORM_WIDTH: u16 = 46;

/// Draws one frame. The transcript's overflow is recorded in `app.ui` so
/// scrolling can be bounded by what was actually laid out.
pub fn ui(f: &mut Frame, app: &mut App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(f.area());

    let title = format!(
        "MedAI Vision v{} • {}",
        env!("CARGO_PKG_VERSION"),
        app.backend_url
    );
    f.render_widget(
        Paragraph::new(title).style(Style::default().add_modifier(Modifier::BOLD)),
        rows[0],
    );

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(FORM_WIDTH), Constraint::Min(0)])
        .split(rows[1]);

    render_form(f, app, columns[0]);
    if app.view.has_results() {
        render_analysis(f, app, columns[1]);
    } else {
        render_placeholder(f, columns[1]);
    }

    f.render_widget(
        Paragraph::new(footer_hint(app)).style(Style::default().fg(Color::DarkGray)),
        rows[2],
    );
}

fn render_form(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title("Upload Medical Image");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // organ
            Constraint::Length(1), // image type
            Constraint::Length(1),
            Constraint::Length(3), // file path input
            Constraint::Length(1), // chosen file
            Constraint::Length(1),
            Constraint::Length(1), // process status
            Constraint::Min(0),    // error
        ])
        .split(inner);

    let selection = &app.view.selection;
    let organs: Vec<(&str, bool)> = OrganType::ALL
        .iter()
        .map(|organ| (organ.label(), *organ == selection.organ))
        .collect();
    let image_types: Vec<(&str, bool)> = ImageType::ALL
        .iter()
        .map(|kind| (kind.label(), *kind == selection.image_type))
        .collect();

    f.render_widget(
        Paragraph::new(selector_line(
            "Organ Type",
            &organs,
            app.ui.focus == Focus::Organ,
        )),
        parts[0],
    );
    f.render_widget(
        Paragraph::new(selector_line(
            "Image Type",
            &image_types,
            app.ui.focus == Focus::ImageType,
        )),
        parts[1],
    );

    render_text_field(
        f,
        &app.ui.file_input,
        "Image File",
        app.ui.focus == Focus::File,
        parts[3],
    );

    f.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled("Selected: ", Style::default().fg(Color::DarkGray)),
            Span::raw(selection.file_label().to_string()),
        ])),
        parts[4],
    );

    f.render_widget(Paragraph::new(process_line(app)), parts[6]);

    if let Some(error) = &app.view.error {
        f.render_widget(
            Paragraph::new(error.as_str())
                .style(Style::default().fg(Color::Red))
                .wrap(Wrap { trim: true }),
            parts[7],
        );
    }
}

fn selector_line(label: &str, options: &[(&str, bool)], focused: bool) -> Line<'static> {
    let label_style = if focused {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    let mut spans = vec![Span::styled(format!("{label:<11}"), label_style)];
    for (name, selected) in options {
        let (marker, style) = if *selected {
            ("(•) ", Style::default().add_modifier(Modifier::BOLD))
        } else {
            ("( ) ", Style::default().fg(Color::DarkGray))
        };
        spans.push(Span::styled(format!("{marker}{name}  "), style));
    }
    Line::from(spans)
}

fn process_line(app: &App) -> Line<'static> {
    if app.view.is_loading {
        Line::from(vec![
            Span::styled(
                format!("{} ", pulse_symbol(app)),
                Style::default().fg(Color::Yellow),
            ),
            Span::raw("Processing..."),
        ])
    } else {
        Line::from(Span::styled(
            "[ Process Image: Ctrl+P ]",
            Style::default().add_modifier(Modifier::BOLD),
        ))
    }
}

/// Breathing indicator, two cycles per second.
fn pulse_symbol(app: &App) -> &'static str {
    let elapsed = app.ui.pulse_start.elapsed().as_millis() as f32 / 1000.0;
    let pulse_phase = (elapsed * 2.0) % 2.0;
    let pulse_intensity = if pulse_phase < 1.0 {
        pulse_phase
    } else {
        2.0 - pulse_phase
    };

    if pulse_intensity < 0.33 {
        "○"
    } else if pulse_intensity < 0.66 {
        "◐"
    } else {
        "●"
    }
}

fn render_placeholder(f: &mut Frame, area: Rect) {
    let text = vec![
        Line::from("Choose an organ and image type, enter the path to a scan,"),
        Line::from("then press Ctrl+P to analyze it."),
        Line::from(""),
        Line::from("Results and a consultation chat appear here."),
    ];
    f.render_widget(
        Paragraph::new(text)
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL).title("Analysis Results"))
            .wrap(Wrap { trim: true }),
        area,
    );
}

fn render_analysis(f: &mut Frame, app: &mut App, area: Rect) {
    let Some(results) = app.view.results.as_ref() else {
        return;
    };
    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6),
            Constraint::Min(3),
            Constraint::Length(3),
        ])
        .split(area);

    let selected = app.view.selection.image_type;
    let mut lines = vec![Line::from(Span::styled(
        results.prediction_line(),
        Style::default().add_modifier(Modifier::BOLD),
    ))];
    for (kind, reference) in results.artifacts() {
        lines.push(Line::from(vec![
            Span::styled(
                format!("{}: ", kind.label(selected)),
                Style::default().fg(Color::DarkGray),
            ),
            Span::raw(resolve_artifact_url(&app.backend_url, reference)),
        ]));
    }
    f.render_widget(
        Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title("Analysis Results"))
            .wrap(Wrap { trim: false }),
        parts[0],
    );

    render_transcript(f, &app.view.chat_history, &mut app.ui, parts[1]);
    render_text_field(
        f,
        &app.ui.chat_input,
        "Ask about your results",
        app.ui.focus == Focus::Chat,
        parts[2],
    );
}

fn render_transcript(f: &mut Frame, history: &[ChatMessage], ui: &mut UiState, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title("Medical Consultation");
    let inner = block.inner(area);

    let mut lines = Vec::new();
    for message in history {
        let color = if message.role.is_user() {
            Color::Cyan
        } else {
            Color::Reset
        };
        let mut first = true;
        for text in message.content.split('\n') {
            let mut spans = Vec::new();
            if first {
                spans.push(Span::styled(
                    format!("{}: ", message.role.display_prefix()),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ));
                first = false;
            }
            spans.push(Span::styled(text.to_string(), Style::default().fg(color)));
            lines.push(Line::from(spans));
        }
        lines.push(Line::from(""));
    }

    let rows = prewrap_lines(lines, inner.width);
    let total = u16::try_from(rows.len()).unwrap_or(u16::MAX);
    let max_offset = total.saturating_sub(inner.height);
    ui.transcript_overflow = Some(max_offset);
    ui.chat_scroll = ui.chat_scroll.min(max_offset);
    let offset = max_offset - ui.chat_scroll;

    f.render_widget(Paragraph::new(rows).block(block).scroll((offset, 0)), area);
}

/// Word-wrap styled lines to `width` columns, breaking words wider than a
/// row. The result is drawn without ratatui's wrapping so the row count used
/// for scrolling is exactly what ends up on screen.
fn prewrap_lines(lines: Vec<Line<'static>>, width: u16) -> Vec<Line<'static>> {
    let width = usize::from(width.max(1));
    let mut out = Vec::with_capacity(lines.len());

    for line in lines {
        let mut row: Vec<Span<'static>> = Vec::new();
        let mut row_width = 0usize;

        for span in line.spans {
            let style = span.style;
            for run in split_space_runs(&span.content) {
                let run_width = UnicodeWidthStr::width(run);
                if row_width + run_width <= width {
                    append_run(&mut row, style, run);
                    row_width += run_width;
                    continue;
                }
                // Spaces at a break point are dropped.
                if run.starts_with(' ') {
                    out.push(Line::from(std::mem::take(&mut row)));
                    row_width = 0;
                    continue;
                }
                if row_width > 0 && run_width <= width {
                    out.push(Line::from(std::mem::take(&mut row)));
                    append_run(&mut row, style, run);
                    row_width = run_width;
                    continue;
                }
                for ch in run.chars() {
                    let ch_width = UnicodeWidthChar::width(ch).unwrap_or(0);
                    if row_width > 0 && row_width + ch_width > width {
                        out.push(Line::from(std::mem::take(&mut row)));
                        row_width = 0;
                    }
                    append_run(&mut row, style, ch.encode_utf8(&mut [0; 4]));
                    row_width += ch_width;
                }
            }
        }
        out.push(Line::from(row));
    }
    out
}

/// Alternating runs of spaces and non-spaces.
fn split_space_runs(text: &str) -> Vec<&str> {
    let mut runs = Vec::new();
    let mut start = 0;
    let mut previous_is_space = None;
    for (idx, ch) in text.char_indices() {
        let is_space = ch == ' ';
        if previous_is_space.is_some_and(|prev| prev != is_space) {
            runs.push(&text[start..idx]);
            start = idx;
        }
        previous_is_space = Some(is_space);
    }
    if start < text.len() {
        runs.push(&text[start..]);
    }
    runs
}

fn append_run(row: &mut Vec<Span<'static>>, style: Style, text: &str) {
    if let Some(last) = row.last_mut() {
        if last.style == style {
            last.content.to_mut().push_str(text);
            return;
        }
    }
    row.push(Span::styled(text.to_string(), style));
}

/// Text fields render their buffer through a paragraph; the focused one owns
/// the terminal cursor and scrolls horizontally to keep it visible.
fn render_text_field(
    f: &mut Frame,
    textarea: &TextArea<'static>,
    title: &str,
    focused: bool,
    area: Rect,
) {
    let border_style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(title.to_string());
    let inner = block.inner(area);

    let text = single_line_text(textarea);
    let before_cursor: String = text.chars().take(cursor_offset(textarea)).collect();
    let cursor_x = UnicodeWidthStr::width(before_cursor.as_str());
    let visible = usize::from(inner.width.saturating_sub(1));
    let h_scroll = cursor_x.saturating_sub(visible);

    let paragraph = if text.is_empty() && !focused {
        Paragraph::new(textarea.placeholder_text().to_string())
            .style(Style::default().fg(Color::DarkGray))
    } else {
        Paragraph::new(text).scroll((0, u16::try_from(h_scroll).unwrap_or(u16::MAX)))
    };
    f.render_widget(paragraph.block(block), area);

    if focused {
        let x = u16::try_from(cursor_x - h_scroll).unwrap_or(0);
        f.set_cursor_position((inner.x + x, inner.y));
    }
}

/// Characters before the cursor once the buffer's rows are joined with
/// single spaces.
fn cursor_offset(textarea: &TextArea<'_>) -> usize {
    let (row, col) = textarea.cursor();
    let preceding: usize = textarea
        .lines()
        .iter()
        .take(row)
        .map(|line| line.chars().count() + 1)
        .sum();
    preceding + col
}

fn footer_hint(app: &App) -> &'static str {
    match app.ui.focus {
        Focus::Organ | Focus::ImageType => {
            "←/→ change • Tab next field • Ctrl+P process • Esc quit"
        }
        Focus::File => "Enter select file • Tab next field • Ctrl+P process • Esc quit",
        Focus::Chat => "Enter send • PgUp/PgDn scroll • Tab next field • Ctrl+P process • Esc quit",
    }
}
