//! The UI renders the application state into something visible and vim-able.
//!
//! The draw function dispatches on the current view (display grid, edit
//! rows, or the notes editor), with the command prompt layered over
//! whichever view it was opened from and the quick-add overlay centered
//! over the display grid. Everything here is a pure projection of
//! `AppState`; no handler mutates documents.

use crate::app_state::{AppState, View};
use crate::draft::{DraftRow, EditDraft, LinkField, MoveState};
use crate::ingest::QuickAddField;
use crate::status::{StatusBadge, StatusLevel};
use edtui::{EditorTheme, EditorView};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

/// Accent used for section headings and the armed move row.
const MOVING_COLOR: Color = Color::Rgb(255, 165, 0);

/// Renders the active view based on current application state.
pub fn draw(f: &mut Frame, app: &mut AppState) {
    let base = if app.view == View::Command {
        app.command_return
    } else {
        app.view
    };

    match base {
        View::Display => draw_display(f, app),
        View::Edit => draw_edit(f, app),
        View::Notes => draw_notes(f, app),
        // The prompt never opens over itself.
        View::Command => draw_display(f, app),
    }
}

fn badge_spans(badge: &StatusBadge) -> Vec<Span<'_>> {
    match badge {
        StatusBadge::Hidden => Vec::new(),
        StatusBadge::Visible {
            level,
            message,
            ..
        } => {
            let (label, color) = match level {
                StatusLevel::Ok => ("● ok", Color::Green),
                StatusLevel::Investigate => ("● investigate", Color::Yellow),
                StatusLevel::Error => ("● error", Color::Red),
            };
            let mut spans = vec![Span::styled(
                label,
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )];
            // The message is only readable through the error badge.
            if *level == StatusLevel::Error {
                if let Some(text) = message {
                    spans.push(Span::styled(
                        format!("  {text}"),
                        Style::default().fg(Color::DarkGray),
                    ));
                }
            }
            spans
        }
    }
}

fn footer(f: &mut Frame, app: &AppState, area: Rect, help: &str) {
    let (text, title) = if app.view == View::Command {
        (format!(":{}", app.command_buffer), "Command")
    } else if app.search_active {
        (format!("/{}", app.search_query), "Search")
    } else if let Some(ref msg) = app.message {
        (msg.clone(), "")
    } else {
        (help.to_string(), "")
    };

    let mut block = Block::default().borders(Borders::ALL);
    if !title.is_empty() {
        block = block.title(title);
    }
    f.render_widget(Paragraph::new(text).block(block), area);
}

#[allow(clippy::too_many_lines)]
fn draw_display(f: &mut Frame, app: &mut AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(f.area());

    // Header: page title on the left, badge on the right of it.
    let mut header_spans = vec![Span::styled(
        app.settings.page_title.clone(),
        Style::default().add_modifier(Modifier::BOLD),
    )];
    let badge = badge_spans(&app.badge);
    if !badge.is_empty() {
        header_spans.push(Span::raw("    "));
        header_spans.extend(badge);
    }
    f.render_widget(
        Paragraph::new(Line::from(header_spans)).block(Block::default().borders(Borders::ALL)),
        chunks[0],
    );

    // Body: visible sections as column grids.
    let columns = app.settings.effective_columns();
    let inner_width = chunks[1].width.saturating_sub(2).max(1) as usize;
    let cell_width = (inner_width / columns).max(2);

    let visibility = app.visibility();
    let selected = app.visible_links().get(app.selected_link).copied();

    let mut lines: Vec<Line> = Vec::new();
    let mut selected_line = 0;

    for (si, section) in app.links.sections.iter().enumerate() {
        let Some((section_visible, link_flags)) = visibility.get(si) else {
            continue;
        };
        if !section_visible {
            continue;
        }

        lines.push(Line::from(Span::styled(
            section.title.clone(),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )));

        let mut row: Vec<Span> = Vec::new();
        for (li, link) in section.links.iter().enumerate() {
            if !link_flags.get(li).copied().unwrap_or(false) {
                continue;
            }
            let mut cell: String = link.name.chars().take(cell_width - 1).collect();
            while cell.chars().count() < cell_width {
                cell.push(' ');
            }
            let style = if selected == Some((si, li)) {
                selected_line = lines.len();
                Style::default().add_modifier(Modifier::REVERSED)
            } else {
                Style::default().fg(Color::Blue)
            };
            row.push(Span::styled(cell, style));
            if row.len() == columns {
                lines.push(Line::from(std::mem::take(&mut row)));
            }
        }
        if !row.is_empty() {
            lines.push(Line::from(row));
        }
        lines.push(Line::default());
    }

    // Keep the selection inside the viewport.
    let viewport = chunks[1].height.saturating_sub(2) as usize;
    let scroll = selected_line.saturating_sub(viewport.saturating_sub(1).max(1));

    let title = if app.search_query.is_empty() {
        "Links".to_string()
    } else {
        format!("Links (filtered: {})", app.search_query)
    };
    f.render_widget(
        Paragraph::new(lines)
            .scroll((u16::try_from(scroll).unwrap_or(u16::MAX), 0))
            .block(Block::default().borders(Borders::ALL).title(title)),
        chunks[1],
    );

    footer(
        f,
        app,
        chunks[2],
        "↑/↓: Navigate | Enter: Open | /: Search | e: Edit | n: Notes | s: Status Page | q: Quit",
    );

    if app.quick_add.is_some() {
        draw_quick_add(f, app);
    }
}

fn link_row_spans<'a>(
    draft: &'a EditDraft,
    si: usize,
    li: usize,
    name: &'a str,
    url: &'a str,
) -> Vec<Span<'a>> {
    let on_row = draft.cursor == DraftRow::Link(si, li);
    let field_style = |field: LinkField| {
        if on_row && draft.field == field {
            if draft.editing {
                Style::default().add_modifier(Modifier::UNDERLINED | Modifier::BOLD)
            } else {
                Style::default().add_modifier(Modifier::UNDERLINED)
            }
        } else {
            Style::default()
        }
    };

    vec![
        Span::raw("    "),
        Span::styled(
            if name.is_empty() { "(name)" } else { name },
            field_style(LinkField::Name),
        ),
        Span::raw(" │ "),
        Span::styled(
            if url.is_empty() { "(url)" } else { url },
            field_style(LinkField::Url).fg(Color::Blue),
        ),
    ]
}

fn draw_edit(f: &mut Frame, app: &mut AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)])
        .split(f.area());

    let Some(ref draft) = app.draft else {
        return;
    };

    let mut lines: Vec<Line> = Vec::new();
    let mut cursor_line = 0;

    for (si, section) in draft.sections.iter().enumerate() {
        let title_text = if section.title.is_empty() {
            "(untitled section)"
        } else {
            section.title.as_str()
        };
        let mut spans = vec![Span::styled(
            format!("▸ {title_text}"),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )];
        if draft.cursor == DraftRow::Section(si) && draft.editing {
            spans.push(Span::styled("▏", Style::default().fg(Color::Cyan)));
        }
        lines.push(style_row(
            Line::from(spans),
            draft,
            DraftRow::Section(si),
            &mut cursor_line,
            lines.len(),
        ));

        for (li, link) in section.links.iter().enumerate() {
            let row = Line::from(link_row_spans(draft, si, li, &link.name, &link.url));
            lines.push(style_row(
                row,
                draft,
                DraftRow::Link(si, li),
                &mut cursor_line,
                lines.len(),
            ));
        }
    }

    let title = match draft.move_state {
        MoveState::None => "Links (EDITING)",
        MoveState::Selected | MoveState::Moved => "Links (MOVING)",
    };

    let viewport = chunks[0].height.saturating_sub(2) as usize;
    let scroll = cursor_line.saturating_sub(viewport.saturating_sub(1).max(1));

    f.render_widget(
        Paragraph::new(lines)
            .scroll((u16::try_from(scroll).unwrap_or(u16::MAX), 0))
            .block(Block::default().borders(Borders::ALL).title(title)),
        chunks[0],
    );

    let help = if draft.editing {
        "Type to edit | Enter/Esc: Done"
    } else if draft.move_state == MoveState::None {
        "↑/↓: Rows | Tab: Name/URL | Enter: Edit | a: +Link | A: +Section | d: Remove | Ctrl+↑/↓: Move | :w Save | :q Discard"
    } else {
        "Ctrl+↑/↓: Move | Esc: Stop Moving | :w Save | :q Discard"
    };
    footer(f, app, chunks[1], help);
}

fn style_row<'a>(
    line: Line<'a>,
    draft: &EditDraft,
    row: DraftRow,
    cursor_line: &mut usize,
    line_index: usize,
) -> Line<'a> {
    if draft.cursor != row {
        return line;
    }
    *cursor_line = line_index;
    let style = match draft.move_state {
        MoveState::Selected => Style::default()
            .fg(MOVING_COLOR)
            .add_modifier(Modifier::BOLD),
        MoveState::Moved => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        MoveState::None => {
            if draft.editing {
                Style::default()
            } else {
                Style::default().add_modifier(Modifier::REVERSED)
            }
        }
    };
    line.style(style)
}

fn draw_notes(f: &mut Frame, app: &mut AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)])
        .split(f.area());

    let block = Block::default().borders(Borders::ALL).title("Notes");
    let inner = block.inner(chunks[0]);
    f.render_widget(block, chunks[0]);

    if let Some(ref mut editor_state) = app.notes_editor {
        let editor = EditorView::new(editor_state)
            .theme(EditorTheme::default())
            .wrap(true);
        f.render_widget(editor, inner);
    }

    footer(f, app, chunks[1], ":w Save | :x Save & Exit | :q Back");
}

fn draw_quick_add(f: &mut Frame, app: &AppState) {
    let Some(ref form) = app.quick_add else {
        return;
    };

    let area = centered_rect(f.area(), 64, 8);
    f.render_widget(Clear, area);

    let input_style = |field: QuickAddField| {
        if form.focus == field {
            Style::default().add_modifier(Modifier::UNDERLINED | Modifier::BOLD)
        } else {
            Style::default()
        }
    };

    let lines = vec![
        Line::from(vec![
            Span::raw("Name:    "),
            Span::styled(form.name.clone(), input_style(QuickAddField::Name)),
        ]),
        Line::from(vec![
            Span::raw("URL:     "),
            Span::styled(form.url.clone(), input_style(QuickAddField::Url)),
        ]),
        Line::from(vec![
            Span::raw("Section: "),
            Span::styled(
                form.target_label(&app.links.sections),
                input_style(QuickAddField::Target),
            ),
        ]),
        Line::default(),
        Line::from(Span::styled(
            "Tab: Next | ↑/↓: Section | Enter: Add | Esc: Cancel",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    f.render_widget(
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Add link")),
        area,
    );
}

fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    Rect {
        x: area.x + (area.width - w) / 2,
        y: area.y + (area.height - h) / 2,
        width: w,
        height: h,
    }
}
