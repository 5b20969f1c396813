pub mod detail_panel;
pub mod header;
pub mod help;
pub mod process_table;
pub mod statusbar;
pub mod theme;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};

use crate::app::App;

const DETAIL_PANEL_WIDTH: u16 = 42;

pub fn draw(frame: &mut Frame, app: &mut App) {
    let snapshot = app.snapshot.clone();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(header::height(snapshot.cpu_cores.len())),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(frame.area());

    header::render(frame, chunks[0], &snapshot, &app.theme);

    let content_area = chunks[1];
    if app.show_detail_panel {
        let h_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(20), Constraint::Length(DETAIL_PANEL_WIDTH)])
            .split(content_area);

        process_table::render(frame, h_chunks[0], app);
        if let Some(process) = app.selected_process() {
            detail_panel::render(frame, h_chunks[1], process, &app.theme);
        }
    } else {
        process_table::render(frame, content_area, app);
    }

    let status = statusbar::StatusContext {
        input_mode: app.input_mode,
        filter_text: &app.filter_text,
        status_message: app.status_message.as_ref(),
        sort_label: app.sort_mode.label(),
        sort_reversed: app.sort_reversed,
        keybinds: &app.keybinds,
    };
    statusbar::render(frame, chunks[2], &status, &app.theme);

    // drawn last so it sits on top
    if app.show_help() {
        help::render(frame, frame.area(), &app.help_groups(), &app.theme);
    }
}
