use ratatui::Frame;
use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Padding, Paragraph};
use unicode_width::UnicodeWidthStr;

use crate::app::HelpGroup;
use crate::ui::theme::Theme;

const MAX_WIDTH: u16 = 48;

/// Centered overlay listing every keybind, one titled section per group.
pub fn render(frame: &mut Frame, area: Rect, groups: &[HelpGroup], theme: &Theme) {
    let key_width = groups
        .iter()
        .flat_map(|g| g.entries.iter())
        .map(|(key, _)| key.width())
        .max()
        .unwrap_or(0);
    let lines = help_lines(groups, key_width, theme);

    // borders plus one column of padding each side
    let width = MAX_WIDTH.min(area.width.saturating_sub(4));
    let height = (lines.len() as u16 + 2).min(area.height.saturating_sub(2));
    let overlay = centered(area, width, height);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.overlay_border))
        .padding(Padding::horizontal(1))
        .title(Line::from(" Keybinds ").centered())
        .title_style(
            Style::default()
                .fg(theme.header_accent_bg)
                .add_modifier(Modifier::BOLD),
        );

    frame.render_widget(Clear, overlay);
    frame.render_widget(
        Paragraph::new(lines)
            .block(block)
            .style(Style::default().bg(theme.statusbar_bg)),
        overlay,
    );
}

fn help_lines(groups: &[HelpGroup], key_width: usize, theme: &Theme) -> Vec<Line<'static>> {
    let heading = Style::default()
        .fg(theme.text_secondary)
        .add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
    let key = Style::default()
        .fg(theme.pill_key_fg)
        .bg(theme.pill_key_bg)
        .add_modifier(Modifier::BOLD);
    let desc = Style::default().fg(theme.pill_desc_fg);

    let mut lines = Vec::new();
    for (i, group) in groups.iter().enumerate() {
        if i > 0 {
            lines.push(Line::default());
        }
        lines.push(Line::from(Span::styled(group.title, heading)));
        for (label, description) in &group.entries {
            let pad = key_width.saturating_sub(label.width());
            lines.push(Line::from(vec![
                Span::styled(format!(" {label}{} ", " ".repeat(pad)), key),
                Span::styled(format!(" {description}"), desc),
            ]));
        }
    }
    lines
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    let [cell] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(row);
    cell
}
