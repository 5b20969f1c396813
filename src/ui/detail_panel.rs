use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::format::{format_bytes, format_cpu_time, truncate_unicode};
use crate::system::process::ProcessInfo;
use crate::ui::theme::Theme;

pub fn render(frame: &mut Frame, area: Rect, process: &ProcessInfo, theme: &Theme) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.overlay_border))
        .title(Span::styled(
            " Process Detail ",
            Style::default()
                .fg(theme.text_primary)
                .add_modifier(Modifier::BOLD),
        ));

    let value_width = (area.width as usize).saturating_sub(13);
    let lines: Vec<Line> = detail_rows(process)
        .into_iter()
        .map(|(label, value)| detail_line(label, truncate_unicode(&value, value_width), theme))
        .collect();

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

pub fn detail_rows(process: &ProcessInfo) -> Vec<(&'static str, String)> {
    let command = if process.command.is_empty() {
        "(none)".to_string()
    } else {
        process.command.clone()
    };
    vec![
        ("PID", process.pid.to_string()),
        ("PPID", process.ppid.to_string()),
        ("Name", process.name.clone()),
        ("Cmd", command),
        ("User", format!("{} ({})", process.user, process.uid)),
        (
            "State",
            format!("{} ({})", process.state.as_char(), process.state.label()),
        ),
        (
            "Priority",
            format!("{} (nice {})", process.priority, process.niceness),
        ),
        ("Threads", process.num_threads.to_string()),
        ("Virtual", format_bytes(process.virtual_memory)),
        ("Resident", format_bytes(process.resident_memory)),
        ("Shared", format_bytes(process.shared_memory)),
        ("CPU", format!("{:.1}%", process.cpu_percent)),
        ("Memory", format!("{:.1}%", process.memory_percent)),
        ("Time", format_cpu_time(process.cpu_time_seconds)),
        (
            "Kind",
            if process.kernel_thread {
                "kernel thread".to_string()
            } else {
                "user process".to_string()
            },
        ),
    ]
}

fn detail_line(label: &str, value: String, theme: &Theme) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!(" {label:<10}"),
            Style::default()
                .fg(theme.pill_key_bg)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(value, Style::default().fg(theme.text_primary)),
    ])
}
