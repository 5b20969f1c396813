use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Span;
use ratatui::widgets::{Cell, Row, Table};

use crate::app::{App, SortMode};
use crate::format::{format_bytes, format_cpu_time};
use crate::system::process::ProcessInfo;
use crate::ui::theme::Theme;

const COLUMNS: [(&str, Option<SortMode>, Constraint); 12] = [
    ("PID", Some(SortMode::Pid), Constraint::Length(7)),
    ("USER", None, Constraint::Length(9)),
    ("PRI", None, Constraint::Length(4)),
    ("NI", None, Constraint::Length(4)),
    ("VIRT", None, Constraint::Length(6)),
    ("RES", Some(SortMode::Memory), Constraint::Length(6)),
    ("SHR", None, Constraint::Length(6)),
    ("S", None, Constraint::Length(1)),
    ("CPU%", Some(SortMode::Cpu), Constraint::Length(6)),
    ("MEM%", Some(SortMode::Memory), Constraint::Length(5)),
    ("TIME+", Some(SortMode::Time), Constraint::Length(9)),
    ("Command", Some(SortMode::Name), Constraint::Min(10)),
];

/// Cell texts of one row, in column order.
pub fn row_cells(p: &ProcessInfo) -> [String; 12] {
    [
        p.pid.to_string(),
        p.user.clone(),
        p.priority.to_string(),
        p.niceness.to_string(),
        format_bytes(p.virtual_memory),
        format_bytes(p.resident_memory),
        format_bytes(p.shared_memory),
        p.state.as_char().to_string(),
        format!("{:.1}", p.cpu_percent),
        format!("{:.1}", p.memory_percent),
        format_cpu_time(p.cpu_time_seconds),
        p.command.clone(),
    ]
}

pub fn render(frame: &mut Frame, area: Rect, app: &mut App) {
    // header row
    app.table_height = area.height.saturating_sub(1) as usize;

    let theme = &app.theme;
    let header = Row::new(COLUMNS.iter().map(|(title, mode, _)| {
        header_cell(title, *mode, app.sort_mode, app.sort_reversed, theme)
    }))
    .style(
        Style::default()
            .fg(theme.table_header_fg)
            .bg(theme.table_header_bg)
            .add_modifier(Modifier::BOLD),
    );

    let rows: Vec<Row> = app
        .visible_processes()
        .map(|p| {
            let style = if p.kernel_thread {
                Style::default().fg(theme.kernel_thread_fg)
            } else {
                Style::default().fg(theme.text_primary)
            };
            let cells = row_cells(p);
            Row::new(cells.into_iter().enumerate().map(|(i, text)| {
                // CPU% column
                if i == 8 {
                    Cell::from(Span::styled(
                        text,
                        Style::default().fg(theme.usage_color(p.cpu_percent)),
                    ))
                } else {
                    Cell::from(text)
                }
            }))
            .style(style)
        })
        .collect();

    let widths = COLUMNS.iter().map(|(_, _, width)| *width);
    let table = Table::new(rows, widths)
        .header(header)
        .column_spacing(1)
        .row_highlight_style(
            Style::default()
                .fg(theme.selection_fg)
                .bg(theme.selection_bg)
                .add_modifier(Modifier::BOLD),
        );

    let mut state = app.table_state.clone();
    frame.render_stateful_widget(table, area, &mut state);
    app.table_state = state;
}

fn header_cell(
    title: &'static str,
    column: Option<SortMode>,
    active: SortMode,
    reversed: bool,
    theme: &Theme,
) -> Cell<'static> {
    // MEM% carries the memory sort marker, RES does not
    if column == Some(active) && !(title == "RES" && active == SortMode::Memory) {
        let arrow = if reversed { "\u{25b2}" } else { "\u{25bc}" };
        Cell::from(Span::styled(
            format!("{title}{arrow}"),
            Style::default()
                .fg(theme.header_accent_fg)
                .add_modifier(Modifier::UNDERLINED | Modifier::BOLD),
        ))
    } else {
        Cell::from(title)
    }
}
