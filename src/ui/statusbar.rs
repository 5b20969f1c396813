use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::app::{InputMode, ResolvedKeybinds, key_label};
use crate::ui::theme::Theme;

pub struct StatusContext<'a> {
    pub input_mode: InputMode,
    pub filter_text: &'a str,
    pub status_message: Option<&'a (String, std::time::Instant)>,
    pub sort_label: &'a str,
    pub sort_reversed: bool,
    pub keybinds: &'a ResolvedKeybinds,
}

pub fn render(frame: &mut Frame, area: Rect, ctx: &StatusContext<'_>, theme: &Theme) {
    let bg_style = Style::default().bg(theme.statusbar_bg);

    // Status message takes priority
    if let Some((msg, _)) = ctx.status_message {
        let color = if msg.starts_with("Refresh failed") {
            theme.status_err
        } else {
            theme.status_ok
        };
        let line = Line::from(Span::styled(
            format!(" {msg}"),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ));
        frame.render_widget(Paragraph::new(line).style(bg_style), area);
        return;
    }

    let line = match ctx.input_mode {
        InputMode::Filter => {
            let mut spans = vec![
                Span::styled(
                    " / ",
                    Style::default()
                        .fg(theme.pill_key_fg)
                        .bg(theme.pill_key_bg)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!(" {}", ctx.filter_text),
                    Style::default().fg(theme.pill_desc_fg),
                ),
                Span::styled("\u{2588}", Style::default().fg(theme.pill_key_bg)),
            ];
            spans.extend(pill_spans("Esc", "Cancel", theme));
            spans.extend(pill_spans("Enter", "Apply", theme));
            Line::from(spans)
        }
        InputMode::Normal if !ctx.filter_text.is_empty() => {
            let mut spans = vec![
                Span::styled(
                    " Filter: ",
                    Style::default()
                        .fg(theme.pill_key_bg)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    ctx.filter_text.to_string(),
                    Style::default().fg(theme.pill_desc_fg),
                ),
            ];
            spans.extend(pill_spans("Esc", "Clear", theme));
            spans.extend(pill_spans("/", "Edit", theme));
            Line::from(spans)
        }
        InputMode::Normal | InputMode::Help => {
            let kb = ctx.keybinds;
            let arrow = if ctx.sort_reversed { "\u{25b2}" } else { "\u{25bc}" };
            let sort = format!("Sort {}{arrow}", ctx.sort_label);
            let mut spans = Vec::new();
            spans.extend(pill_spans(&key_label(kb.help), "Help", theme));
            spans.extend(pill_spans(&key_label(kb.filter), "Filter", theme));
            spans.extend(pill_spans(&key_label(kb.cycle_sort), &sort, theme));
            spans.extend(pill_spans(&key_label(kb.reverse_sort), "Invert", theme));
            spans.extend(pill_spans(&key_label(kb.toggle_kernel_threads), "Kthreads", theme));
            spans.extend(pill_spans(&key_label(kb.toggle_detail), "Detail", theme));
            spans.extend(pill_spans(&key_label(kb.cycle_theme), "Theme", theme));
            spans.extend(pill_spans(&key_label(kb.quit), "Quit", theme));
            Line::from(spans)
        }
    };

    frame.render_widget(Paragraph::new(line).style(bg_style), area);
}

fn pill_spans(key: &str, desc: &str, theme: &Theme) -> Vec<Span<'static>> {
    vec![
        Span::raw(" "),
        Span::styled(
            format!(" {key} "),
            Style::default()
                .fg(theme.pill_key_fg)
                .bg(theme.pill_key_bg)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!(" {desc}"), Style::default().fg(theme.pill_desc_fg)),
    ]
}
