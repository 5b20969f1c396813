use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthStr;

use crate::format::{format_bytes, format_bytes_signed, truncate_unicode};
use crate::system::snapshot::EngineSnapshot;
use crate::ui::theme::Theme;

/// Above this many cores the meters are laid out in two columns.
const SINGLE_COLUMN_CORES: usize = 8;

fn core_rows(core_count: usize) -> usize {
    if core_count > SINGLE_COLUMN_CORES {
        core_count.div_ceil(2)
    } else {
        core_count
    }
}

/// Rows the header needs: the core meters plus Mem and Swp, and at least
/// the four summary lines.
pub fn height(core_count: usize) -> u16 {
    (core_rows(core_count) + 2).max(4) as u16
}

pub fn render(frame: &mut Frame, area: Rect, snapshot: &EngineSnapshot, theme: &Theme) {
    let [left, right] =
        Layout::horizontal([Constraint::Percentage(60), Constraint::Percentage(40)]).areas(area);

    render_meters(frame, left, snapshot, theme);
    render_summary(frame, right, snapshot, theme);
}

fn render_meters(frame: &mut Frame, area: Rect, snapshot: &EngineSnapshot, theme: &Theme) {
    let width = area.width as usize;
    let cores = &snapshot.cpu_cores;
    let rows = core_rows(cores.len());
    let mut lines = Vec::with_capacity(rows + 2);

    let core_meter = |index: usize, width: usize| {
        let percent = cores[index];
        meter_spans(
            &format!("{index:>3}"),
            percent / 100.0,
            &format!("{percent:.1}%"),
            width,
            theme.usage_color(percent),
            theme,
        )
    };

    if cores.len() > SINGLE_COLUMN_CORES {
        let half = width / 2;
        for row in 0..rows {
            let mut spans = core_meter(row, half);
            if row + rows < cores.len() {
                spans.push(Span::raw(" "));
                spans.extend(core_meter(row + rows, width.saturating_sub(half + 1)));
            }
            lines.push(Line::from(spans));
        }
    } else {
        for index in 0..cores.len() {
            lines.push(Line::from(core_meter(index, width)));
        }
    }

    let total = snapshot.memory_total();
    let used = snapshot.memory_used;
    let mem_ratio = ratio(used, total);
    lines.push(Line::from(meter_spans(
        "Mem",
        mem_ratio,
        &format!("{}/{}", format_bytes_signed(used), format_bytes(total)),
        width,
        theme.usage_color(mem_ratio * 100.0),
        theme,
    )));

    let swap_total = snapshot.swap_total();
    let swap_used = snapshot.swap_used;
    let swap_ratio = ratio(swap_used, swap_total);
    lines.push(Line::from(meter_spans(
        "Swp",
        swap_ratio,
        &format!("{}/{}", format_bytes_signed(swap_used), format_bytes(swap_total)),
        width,
        theme.usage_color(swap_ratio * 100.0),
        theme,
    )));

    frame.render_widget(Paragraph::new(lines), area);
}

fn ratio(used: i64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        (used as f64 / total as f64).clamp(0.0, 1.0)
    }
}

/// `LBL[|||||       text]` filling `width` columns.
pub fn meter_spans(
    label: &str,
    ratio: f64,
    text: &str,
    width: usize,
    color: Color,
    theme: &Theme,
) -> Vec<Span<'static>> {
    let inner = width.saturating_sub(label.width() + 2);
    let text = truncate_unicode(text, inner);
    let bar_room = inner.saturating_sub(text.width());
    let filled = ((ratio.clamp(0.0, 1.0) * inner as f64).round() as usize).min(bar_room);

    vec![
        Span::styled(
            label.to_string(),
            Style::default()
                .fg(theme.text_secondary)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled("[", Style::default().fg(theme.text_primary)),
        Span::styled("|".repeat(filled), Style::default().fg(color)),
        Span::styled(
            " ".repeat(bar_room - filled),
            Style::default().bg(theme.gauge_unfilled),
        ),
        Span::styled(text, Style::default().fg(theme.text_secondary)),
        Span::styled("]", Style::default().fg(theme.text_primary)),
    ]
}

fn render_summary(frame: &mut Frame, area: Rect, snapshot: &EngineSnapshot, theme: &Theme) {
    let label = |s: &'static str| Span::styled(s, Style::default().fg(theme.text_secondary));
    let value = |s: String| {
        Span::styled(
            s,
            Style::default()
                .fg(theme.text_primary)
                .add_modifier(Modifier::BOLD),
        )
    };

    let tasks = &snapshot.tasks;
    let lines = vec![
        Line::from(vec![
            label(" Tasks: "),
            value(tasks.total.to_string()),
            label(", "),
            value(tasks.threads.to_string()),
            label(" thr, "),
            value(tasks.kernel_threads.to_string()),
            label(" kthr; "),
            value(tasks.running.to_string()),
            label(" running"),
        ]),
        Line::from(vec![label(" Load average: "), value(snapshot.load_text.clone())]),
        Line::from(vec![label(" Uptime: "), value(snapshot.uptime_text.clone())]),
        Line::from(vec![
            label(" CPU: "),
            Span::styled(
                format!("{:.1}%", snapshot.cpu_total),
                Style::default()
                    .fg(theme.usage_color(snapshot.cpu_total))
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
    ];

    frame.render_widget(Paragraph::new(lines), area);
}
