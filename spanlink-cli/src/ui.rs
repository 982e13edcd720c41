//! Terminal UI rendering

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
    Frame,
};

use spanlink_core::{Mode, SequenceUnit, TextId};

use crate::app::{App, Focus, View};

// Catppuccin Mocha colors
const BASE: Color = Color::Rgb(30, 30, 46);
const SURFACE0: Color = Color::Rgb(49, 50, 68);
const SURFACE1: Color = Color::Rgb(69, 71, 90);
const TEXT: Color = Color::Rgb(205, 214, 244);
const SUBTEXT0: Color = Color::Rgb(166, 173, 200);
const RED: Color = Color::Rgb(243, 139, 168);
const BLUE: Color = Color::Rgb(137, 180, 250);
const MAUVE: Color = Color::Rgb(203, 166, 247);
const TEAL: Color = Color::Rgb(148, 226, 213);

pub fn draw(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Title bar
            Constraint::Min(0),    // Main content
            Constraint::Length(1), // Label picker
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    draw_title_bar(frame, app, chunks[0]);
    draw_main_area(frame, app, chunks[1]);
    draw_label_bar(frame, app, chunks[2]);
    draw_status_bar(frame, app, chunks[3]);

    if app.view == View::Help {
        draw_help(frame);
    }
}

fn draw_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let labeled = app
        .annotator
        .sequence()
        .iter()
        .filter(|u| u.is_labeled())
        .count();
    let dirty = if app.dirty { " *" } else { "" };
    let readonly = if app.annotator.config().overview_mode {
        " (overview)"
    } else {
        ""
    };

    let title_text = format!(
        " Spanlink - {}{}{} [{} spans, {} relationships]",
        app.title(),
        dirty,
        readonly,
        labeled,
        app.annotator.relationships().len()
    );

    let title_bar = Paragraph::new(title_text).style(Style::default().fg(TEXT).bg(SURFACE0));

    frame.render_widget(title_bar, area);
}

fn draw_main_area(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),     // Editor
            Constraint::Length(36), // Sidebar
        ])
        .split(area);

    draw_editor(frame, app, chunks[0]);
    draw_sidebar(frame, app, chunks[1]);
}

/// Map a label colour onto the terminal palette
fn label_color(unit: &SequenceUnit) -> Color {
    unit.color
        .as_ref()
        .and_then(|c| c.to_rgb())
        .map(|(r, g, b)| Color::Rgb(r, g, b))
        .unwrap_or(SUBTEXT0)
}

fn draw_editor(frame: &mut Frame, app: &App, area: Rect) {
    let editor_style = if app.focus == Focus::Editor {
        Style::default().fg(BLUE)
    } else {
        Style::default().fg(SUBTEXT0)
    };

    let mode_indicator = match (app.mode(), app.view) {
        (_, View::Visual) => " [VISUAL]",
        (Mode::Relationships, _) => " [RELATIONSHIPS]",
        _ => " [ENTITIES]",
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(editor_style)
        .title(format!("Document{}", mode_indicator));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let highlight = app.annotator.selection().highlighted();
    let pending_first = app.annotator.selection().pending_first();

    let mut lines: Vec<Line> = Vec::new();
    let mut spans: Vec<Span> = Vec::new();

    for (index, unit) in app.annotator.sequence().iter().enumerate() {
        let mut style = Style::default().fg(TEXT);

        if unit.is_labeled() {
            style = style.fg(BASE).bg(label_color(unit));
        } else if highlight.is_some_and(|r| r.contains(index)) {
            style = style.bg(SURFACE1).add_modifier(Modifier::BOLD);
        }
        if pending_first == Some(&unit.text_id) {
            style = style.fg(MAUVE).add_modifier(Modifier::UNDERLINED);
        }
        if index == app.cursor.index && app.focus == Focus::Editor {
            style = style.add_modifier(Modifier::REVERSED);
        }

        // Newlines inside a unit break the rendered line
        let mut parts = unit.text.split('\n').peekable();
        while let Some(part) = parts.next() {
            if !part.is_empty() {
                spans.push(Span::styled(part.to_string(), style));
            }
            if parts.peek().is_some() {
                lines.push(Line::from(std::mem::take(&mut spans)));
            }
        }

        if let Some(label) = &unit.label {
            spans.push(Span::styled(
                format!("·{}", label),
                Style::default().fg(label_color(unit)).add_modifier(Modifier::DIM),
            ));
        }
    }
    lines.push(Line::from(spans));

    // Keep the cursor line in view
    let cursor_line = app.cursor.line();
    let visible_height = inner.height as usize;
    let scroll_offset = if cursor_line >= visible_height {
        cursor_line - visible_height + 1
    } else {
        0
    };

    let paragraph = Paragraph::new(lines)
        .scroll((scroll_offset as u16, 0))
        .wrap(Wrap { trim: false });

    frame.render_widget(paragraph, inner);
}

fn preview(text: &str) -> String {
    let short: String = text.chars().take(12).collect::<String>().replace('\n', " ");
    if text.chars().count() > 12 {
        format!("{}…", short)
    } else {
        short
    }
}

fn draw_sidebar(frame: &mut Frame, app: &App, area: Rect) {
    let sidebar_style = if app.focus == Focus::Sidebar {
        Style::default().fg(BLUE)
    } else {
        Style::default().fg(SUBTEXT0)
    };

    let relationships = app.sidebar_relationships();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(sidebar_style)
        .title(format!("Relationships ({})", app.annotator.relationships().len()));

    let items: Vec<ListItem> = relationships
        .iter()
        .enumerate()
        .map(|(i, rel)| {
            let text_of = |id: &TextId| {
                app.annotator
                    .unit(id)
                    .map(|u| preview(&u.text))
                    .unwrap_or_else(|| "?".to_string())
            };
            let selected = !rel.temp && i == app.sidebar_selected && app.focus == Focus::Sidebar;
            let marker = if selected { ">" } else { " " };
            let color = rel
                .color
                .to_rgb()
                .map(|(r, g, b)| Color::Rgb(r, g, b))
                .unwrap_or(RED);

            let line1 = format!("{} {} → {}", marker, text_of(&rel.from), text_of(&rel.to));
            let line2 = format!("   {}", rel.label);

            let style = if selected {
                Style::default().fg(TEXT).bg(SURFACE1)
            } else {
                Style::default().fg(TEXT)
            };

            ListItem::new(vec![
                Line::from(Span::styled(line1, style)),
                Line::from(Span::styled(line2, style.fg(color))),
            ])
        })
        .collect();

    let list = List::new(items).block(block);
    frame.render_widget(list, area);
}

fn draw_label_bar(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![Span::styled(
        format!(" {} labels: ", app.mode().as_str()),
        Style::default().fg(SUBTEXT0),
    )];

    for (i, label) in app.active_labels().iter().enumerate().take(9) {
        let color = app
            .annotator
            .colors()
            .get(&label.id)
            .and_then(|c| c.to_rgb())
            .map(|(r, g, b)| Color::Rgb(r, g, b))
            .unwrap_or(TEAL);
        spans.push(Span::styled(format!("{}", i + 1), Style::default().fg(MAUVE)));
        spans.push(Span::styled(format!(" {}  ", label.id), Style::default().fg(color)));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let view_str = match app.view {
        View::Normal => "NORMAL",
        View::Visual => "VISUAL",
        View::Help => "HELP",
    };

    let status = app.status_message.as_deref().unwrap_or("");

    let help_hint = match app.mode() {
        Mode::Entities => "h/l move | v select | 1-9 label | x unlabel | Tab mode | ? help",
        Mode::Relationships => "h/l move | Enter link | 1-9 label | d delete | Tab mode | ? help",
    };

    let status_text = format!(
        " {} | {}",
        view_str,
        if status.is_empty() { help_hint } else { status },
    );

    let status_bar = Paragraph::new(status_text).style(Style::default().fg(SUBTEXT0).bg(SURFACE0));

    frame.render_widget(status_bar, area);
}

fn draw_help(frame: &mut Frame) {
    let area = centered_rect(60, 24, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(BLUE))
        .title("Help (press any key to close)");

    let heading = Style::default().fg(MAUVE).add_modifier(Modifier::BOLD);
    let help_text = vec![
        Line::from(Span::styled("Navigation", heading)),
        Line::from("  h/l      Previous/next span"),
        Line::from("  j/k      Next/previous line"),
        Line::from("  g/G      Go to top/bottom"),
        Line::from("  Tab      Toggle entity/relationship mode"),
        Line::from("  s        Toggle document/sidebar focus"),
        Line::from(""),
        Line::from(Span::styled("Entities", heading)),
        Line::from("  v        Start highlighting, move to extend"),
        Line::from("  1-9      Label the highlight"),
        Line::from("  x        Remove label under cursor"),
        Line::from(""),
        Line::from(Span::styled("Relationships", heading)),
        Line::from("  Enter    Pick first, then second span"),
        Line::from("  1-9      Label the new relationship"),
        Line::from("  ]/[ d    Select/delete relationship"),
        Line::from(""),
        Line::from(Span::styled("File", heading)),
        Line::from("  e        Export session as JSON"),
        Line::from("  r        Reload document from disk"),
        Line::from(""),
        Line::from(Span::styled("Press any key to close", Style::default().fg(SUBTEXT0))),
    ];

    let paragraph = Paragraph::new(help_text).block(block);
    frame.render_widget(paragraph, area);
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}
