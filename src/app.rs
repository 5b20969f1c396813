use std::cmp::Ordering;
use std::sync::Arc;
use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::widgets::TableState;

use crate::action::{Action, Direction};
use crate::config::{Config, KeybindsConfig, parse_key};
use crate::system::engine::MetricsEngine;
use crate::system::process::ProcessInfo;
use crate::system::procfs::ProcFs;
use crate::system::snapshot::EngineSnapshot;
use crate::ui::theme::Theme;

const STATUS_TTL_SECS: u64 = 3;

/// Anything that can produce engine snapshots on demand.
pub trait SnapshotSource {
    fn refresh(&mut self) -> crate::system::Result<Arc<EngineSnapshot>>;
    fn snapshot(&self) -> Arc<EngineSnapshot>;
}

impl<F: ProcFs> SnapshotSource for MetricsEngine<F> {
    fn refresh(&mut self) -> crate::system::Result<Arc<EngineSnapshot>> {
        MetricsEngine::refresh(self)
    }

    fn snapshot(&self) -> Arc<EngineSnapshot> {
        MetricsEngine::snapshot(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Filter,
    Help,
}

#[derive(Debug, Clone)]
pub struct ResolvedKeybinds {
    pub quit: KeyCode,
    pub filter: KeyCode,
    pub cycle_sort: KeyCode,
    pub reverse_sort: KeyCode,
    pub toggle_kernel_threads: KeyCode,
    pub toggle_detail: KeyCode,
    pub cycle_theme: KeyCode,
    pub help: KeyCode,
    pub refresh: KeyCode,
}

impl ResolvedKeybinds {
    pub fn from_config(kb: &KeybindsConfig) -> Self {
        Self {
            quit: parse_key(&kb.quit).unwrap_or(KeyCode::Char('q')),
            filter: parse_key(&kb.filter).unwrap_or(KeyCode::Char('/')),
            cycle_sort: parse_key(&kb.cycle_sort).unwrap_or(KeyCode::Char('s')),
            reverse_sort: parse_key(&kb.reverse_sort).unwrap_or(KeyCode::Char('I')),
            toggle_kernel_threads: parse_key(&kb.toggle_kernel_threads)
                .unwrap_or(KeyCode::Char('K')),
            toggle_detail: parse_key(&kb.toggle_detail).unwrap_or(KeyCode::Char('d')),
            cycle_theme: parse_key(&kb.cycle_theme).unwrap_or(KeyCode::Char('t')),
            help: parse_key(&kb.help).unwrap_or(KeyCode::Char('?')),
            refresh: parse_key(&kb.refresh).unwrap_or(KeyCode::Char('r')),
        }
    }

    /// Keybinds grouped the way the help overlay lists them.
    pub fn help_groups(&self) -> Vec<HelpGroup> {
        let bound = |code: KeyCode, desc: &'static str| (key_label(code), desc);
        vec![
            HelpGroup {
                title: "Navigate",
                entries: vec![
                    ("\u{2191}/\u{2193}".to_string(), "Move selection"),
                    ("PgUp/PgDn".to_string(), "Move one page"),
                    ("Home/End".to_string(), "First or last row"),
                ],
            },
            HelpGroup {
                title: "Processes",
                entries: vec![
                    bound(self.filter, "Filter processes"),
                    bound(self.cycle_sort, "Cycle sort column"),
                    bound(self.reverse_sort, "Reverse sort order"),
                    bound(self.toggle_kernel_threads, "Show/hide kernel threads"),
                ],
            },
            HelpGroup {
                title: "View",
                entries: vec![
                    bound(self.toggle_detail, "Toggle detail panel"),
                    bound(self.cycle_theme, "Cycle theme"),
                    bound(self.refresh, "Refresh now"),
                    bound(self.help, "Toggle help"),
                ],
            },
            HelpGroup {
                title: "Exit",
                entries: vec![
                    bound(self.quit, "Quit"),
                    ("Ctrl+C".to_string(), "Quit (always)"),
                ],
            },
        ]
    }
}

/// A titled block of the help overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelpGroup {
    pub title: &'static str,
    pub entries: Vec<(String, &'static str)>,
}

pub fn key_label(code: KeyCode) -> String {
    match code {
        KeyCode::Char(' ') => "Space".to_string(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::Backspace => "Bksp".to_string(),
        KeyCode::Delete => "Del".to_string(),
        KeyCode::F(n) => format!("F{n}"),
        _ => "?".to_string(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortMode {
    #[default]
    Cpu,
    Memory,
    Pid,
    Time,
    Name,
}

impl SortMode {
    pub fn next(self) -> Self {
        match self {
            SortMode::Cpu => SortMode::Memory,
            SortMode::Memory => SortMode::Pid,
            SortMode::Pid => SortMode::Time,
            SortMode::Time => SortMode::Name,
            SortMode::Name => SortMode::Cpu,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SortMode::Cpu => "CPU%",
            SortMode::Memory => "MEM%",
            SortMode::Pid => "PID",
            SortMode::Time => "TIME+",
            SortMode::Name => "Command",
        }
    }

    pub fn from_str_config(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "mem" | "memory" => SortMode::Memory,
            "pid" => SortMode::Pid,
            "time" => SortMode::Time,
            "name" | "command" => SortMode::Name,
            _ => SortMode::Cpu,
        }
    }

    /// Usage columns list the heaviest processes first.
    fn descending_by_default(self) -> bool {
        matches!(self, SortMode::Cpu | SortMode::Memory | SortMode::Time)
    }

    pub fn compare(self, a: &ProcessInfo, b: &ProcessInfo) -> Ordering {
        let ord = match self {
            SortMode::Cpu => a.cpu_percent.total_cmp(&b.cpu_percent),
            SortMode::Memory => a.resident_memory.cmp(&b.resident_memory),
            SortMode::Pid => a.pid.cmp(&b.pid),
            SortMode::Time => a.cpu_time_seconds.total_cmp(&b.cpu_time_seconds),
            SortMode::Name => a.command.to_lowercase().cmp(&b.command.to_lowercase()),
        };
        let ord = if self.descending_by_default() {
            ord.reverse()
        } else {
            ord
        };
        ord.then_with(|| a.pid.cmp(&b.pid))
    }
}

pub struct App {
    pub running: bool,
    source: Box<dyn SnapshotSource>,
    pub snapshot: Arc<EngineSnapshot>,
    /// Indices into `snapshot.processes`, filtered and sorted for display.
    pub rows: Vec<usize>,
    pub table_state: TableState,
    pub table_height: usize,
    pub input_mode: InputMode,
    pub filter_text: String,
    pub show_detail_panel: bool,
    pub show_kernel_threads: bool,
    pub theme: Theme,
    pub sort_mode: SortMode,
    pub sort_reversed: bool,
    pub status_message: Option<(String, Instant)>,
    pub keybinds: ResolvedKeybinds,
}

impl App {
    pub fn new(config: &Config, source: Box<dyn SnapshotSource>) -> Self {
        let snapshot = source.snapshot();
        let mut app = App {
            running: true,
            source,
            snapshot,
            rows: Vec::new(),
            table_state: TableState::default(),
            table_height: 0,
            input_mode: InputMode::Normal,
            filter_text: String::new(),
            show_detail_panel: config.general.show_detail_panel,
            show_kernel_threads: config.general.show_kernel_threads,
            theme: Theme::from_config(&config.colors.theme),
            sort_mode: SortMode::from_str_config(&config.general.default_sort),
            sort_reversed: false,
            status_message: None,
            keybinds: ResolvedKeybinds::from_config(&config.keybinds),
        };
        app.rebuild_rows();
        app
    }

    /// Pulls a new snapshot. A failed refresh keeps the previous snapshot on
    /// screen and reports the error in the status bar.
    pub fn refresh_data(&mut self) {
        match self.source.refresh() {
            Ok(snapshot) => self.snapshot = snapshot,
            Err(e) => {
                tracing::warn!(error = %e, "refresh failed, keeping previous snapshot");
                self.set_status(format!("Refresh failed: {e}"));
            }
        }
        self.rebuild_rows();

        if let Some((_, created)) = &self.status_message
            && created.elapsed().as_secs() >= STATUS_TTL_SECS
        {
            self.status_message = None;
        }
    }

    /// Re-applies filter and sort, keeping the selected pid selected when it
    /// is still visible.
    pub fn rebuild_rows(&mut self) {
        let previous = self.selected_pid();
        let filter_lower = self.filter_text.to_lowercase();
        let processes = &self.snapshot.processes;

        let mut rows: Vec<usize> = processes
            .iter()
            .enumerate()
            .filter(|(_, p)| self.show_kernel_threads || !p.kernel_thread)
            .filter(|(_, p)| {
                filter_lower.is_empty()
                    || p.command.to_lowercase().contains(&filter_lower)
                    || p.name.to_lowercase().contains(&filter_lower)
                    || p.user.to_lowercase().contains(&filter_lower)
            })
            .map(|(i, _)| i)
            .collect();

        let mode = self.sort_mode;
        let reversed = self.sort_reversed;
        rows.sort_by(|&a, &b| {
            let ord = mode.compare(&processes[a], &processes[b]);
            if reversed { ord.reverse() } else { ord }
        });
        self.rows = rows;

        let index = previous
            .and_then(|pid| self.rows.iter().position(|&i| self.snapshot.processes[i].pid == pid))
            .unwrap_or(0);
        self.table_state
            .select((!self.rows.is_empty()).then_some(index));
    }

    pub fn visible_processes(&self) -> impl Iterator<Item = &ProcessInfo> {
        self.rows.iter().map(|&i| &self.snapshot.processes[i])
    }

    pub fn selected_process(&self) -> Option<&ProcessInfo> {
        let row = self.table_state.selected()?;
        self.rows.get(row).map(|&i| &self.snapshot.processes[i])
    }

    pub fn selected_pid(&self) -> Option<u32> {
        self.selected_process().map(|p| p.pid)
    }

    pub fn map_key(&self, key: KeyEvent) -> Action {
        // Ctrl+C always quits (hardwired safety)
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Action::Quit;
        }

        match self.input_mode {
            InputMode::Normal => self.map_key_normal(key),
            InputMode::Filter => self.map_key_filter(key),
            InputMode::Help => self.map_key_help(key),
        }
    }

    fn map_key_normal(&self, key: KeyEvent) -> Action {
        let code = key.code;
        let kb = &self.keybinds;

        // Navigation keys are hardwired (not configurable)
        match code {
            KeyCode::Up => return Action::Navigate(Direction::Up),
            KeyCode::Down => return Action::Navigate(Direction::Down),
            KeyCode::PageUp => return Action::Navigate(Direction::PageUp),
            KeyCode::PageDown => return Action::Navigate(Direction::PageDown),
            KeyCode::Home => return Action::Navigate(Direction::Home),
            KeyCode::End => return Action::Navigate(Direction::End),
            _ => {}
        }

        if code == kb.quit {
            return Action::Quit;
        }
        if code == kb.filter {
            return Action::EnterFilterMode;
        }
        if code == kb.cycle_sort {
            return Action::CycleSortMode;
        }
        if code == kb.reverse_sort {
            return Action::ReverseSort;
        }
        if code == kb.toggle_kernel_threads {
            return Action::ToggleKernelThreads;
        }
        if code == kb.toggle_detail {
            return Action::ToggleDetailPanel;
        }
        if code == kb.cycle_theme {
            return Action::CycleTheme;
        }
        if code == kb.help {
            return Action::ToggleHelp;
        }
        if code == kb.refresh {
            return Action::Refresh;
        }
        if code == KeyCode::Esc && !self.filter_text.is_empty() {
            return Action::ClearFilter;
        }

        Action::None
    }

    fn map_key_help(&self, key: KeyEvent) -> Action {
        let code = key.code;
        // In help mode, only the help key and Esc dismiss, everything else is ignored
        if code == self.keybinds.help || code == KeyCode::Esc {
            return Action::ToggleHelp;
        }
        Action::None
    }

    fn map_key_filter(&self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Esc => Action::ClearFilter,
            KeyCode::Enter => Action::ExitFilterMode,
            KeyCode::Backspace => {
                let mut text = self.filter_text.clone();
                text.pop();
                Action::UpdateFilter(text)
            }
            KeyCode::Char(c) => {
                let mut text = self.filter_text.clone();
                text.push(c);
                Action::UpdateFilter(text)
            }
            _ => Action::None,
        }
    }

    pub fn dispatch(&mut self, action: Action) {
        match action {
            Action::Quit => self.running = false,
            Action::Navigate(dir) => self.navigate(dir),
            Action::EnterFilterMode => {
                self.input_mode = InputMode::Filter;
            }
            Action::ExitFilterMode => {
                self.input_mode = InputMode::Normal;
            }
            Action::ClearFilter => {
                self.filter_text.clear();
                self.input_mode = InputMode::Normal;
                self.rebuild_rows();
            }
            Action::UpdateFilter(text) => {
                self.filter_text = text;
                self.rebuild_rows();
            }
            Action::CycleSortMode => {
                self.sort_mode = self.sort_mode.next();
                self.sort_reversed = false;
                self.rebuild_rows();
            }
            Action::ReverseSort => {
                self.sort_reversed = !self.sort_reversed;
                self.rebuild_rows();
            }
            Action::ToggleKernelThreads => {
                self.show_kernel_threads = !self.show_kernel_threads;
                let state = if self.show_kernel_threads { "shown" } else { "hidden" };
                self.set_status(format!("Kernel threads {state}"));
                self.rebuild_rows();
            }
            Action::ToggleDetailPanel => {
                self.show_detail_panel = !self.show_detail_panel;
            }
            Action::ToggleHelp => {
                self.input_mode = if self.input_mode == InputMode::Help {
                    InputMode::Normal
                } else {
                    InputMode::Help
                };
            }
            Action::CycleTheme => {
                self.theme = self.theme.next();
            }
            Action::Refresh => {
                self.refresh_data();
            }
            Action::None => {}
        }
    }

    fn navigate(&mut self, direction: Direction) {
        if self.rows.is_empty() {
            return;
        }
        let last = self.rows.len() - 1;
        let current = self.table_state.selected().unwrap_or(0);
        let page = self.table_height.max(1);

        let next = match direction {
            Direction::Up => current.saturating_sub(1),
            Direction::Down => (current + 1).min(last),
            Direction::PageUp => current.saturating_sub(page),
            Direction::PageDown => (current + page).min(last),
            Direction::Home => 0,
            Direction::End => last,
        };
        self.table_state.select(Some(next));
    }

    pub fn show_help(&self) -> bool {
        self.input_mode == InputMode::Help
    }

    pub fn help_groups(&self) -> Vec<HelpGroup> {
        self.keybinds.help_groups()
    }

    pub fn set_status(&mut self, message: String) {
        self.status_message = Some((message, Instant::now()));
    }

    pub fn on_resize(&mut self) {
        self.table_state.select(self.table_state.selected());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::mock::{MockFs, MockProcess, stat_text};
    use crate::system::users::UserTable;

    fn mock_fs() -> Arc<MockFs> {
        let fs = MockFs::typical_system();
        fs.add_process(
            &MockProcess::new(1051, "postgres")
                .cmdline("postgres -D /var/lib/postgresql")
                .uid(1000)
                .memory_kb(400_000, 90_000, 20_000),
        );
        fs.add_process(&MockProcess::new(4242, "Xorg").memory_kb(300_000, 60_000, 1_000));
        Arc::new(fs)
    }

    fn make_test_app(fs: &Arc<MockFs>, config: &Config) -> App {
        let users =
            UserTable::parse("root:x:0:0::/root:/bin/sh\ntest_user:x:1000:1000::/home:/bin/sh\n");
        let engine = MetricsEngine::with_clock_ticks(Arc::clone(fs), users, 100).unwrap();
        App::new(config, Box::new(engine))
    }

    fn pids(app: &App) -> Vec<u32> {
        app.visible_processes().map(|p| p.pid).collect()
    }

    #[test]
    fn sort_mode_cycles_through_all_variants() {
        let mode = SortMode::Cpu;
        assert_eq!(mode.next(), SortMode::Memory);
        assert_eq!(mode.next().next(), SortMode::Pid);
        assert_eq!(mode.next().next().next(), SortMode::Time);
        assert_eq!(mode.next().next().next().next(), SortMode::Name);
        assert_eq!(mode.next().next().next().next().next(), SortMode::Cpu);
    }

    #[test]
    fn kernel_threads_are_hidden_by_default() {
        let fs = mock_fs();
        let mut app = make_test_app(&fs, &Config::default());
        assert!(!pids(&app).contains(&2));

        app.dispatch(Action::ToggleKernelThreads);
        assert!(pids(&app).contains(&2));
        assert_eq!(app.status_message.as_ref().unwrap().0, "Kernel threads shown");
    }

    #[test]
    fn memory_sort_orders_by_resident_descending() {
        let fs = mock_fs();
        let mut config = Config::default();
        config.general.default_sort = "mem".to_string();
        let mut app = make_test_app(&fs, &config);
        assert_eq!(pids(&app), vec![1051, 4242, 1, 300]);

        app.dispatch(Action::ReverseSort);
        assert_eq!(pids(&app), vec![300, 1, 4242, 1051]);
    }

    #[test]
    fn name_sort_is_case_insensitive_on_command() {
        let fs = mock_fs();
        let mut config = Config::default();
        config.general.default_sort = "name".to_string();
        let app = make_test_app(&fs, &config);
        // "-bash", "/sbin/init splash", "postgres ...", "Xorg"
        assert_eq!(pids(&app), vec![300, 1, 1051, 4242]);
    }

    #[test]
    fn filter_matches_command_and_user() {
        let fs = mock_fs();
        let mut app = make_test_app(&fs, &Config::default());

        app.dispatch(Action::UpdateFilter("POSTGRES".to_string()));
        assert_eq!(pids(&app), vec![1051]);

        app.dispatch(Action::UpdateFilter("test_user".to_string()));
        let mut matched = pids(&app);
        matched.sort_unstable();
        assert_eq!(matched, vec![300, 1051]);

        app.dispatch(Action::ClearFilter);
        assert_eq!(app.rows.len(), 4);
        assert_eq!(app.input_mode, InputMode::Normal);
    }

    #[test]
    fn selection_follows_pid_across_resort() {
        let fs = mock_fs();
        let mut config = Config::default();
        config.general.default_sort = "pid".to_string();
        let mut app = make_test_app(&fs, &config);

        app.dispatch(Action::Navigate(Direction::End));
        assert_eq!(app.selected_pid(), Some(4242));

        app.dispatch(Action::ReverseSort);
        assert_eq!(app.selected_pid(), Some(4242));
        assert_eq!(app.table_state.selected(), Some(0));
    }

    #[test]
    fn navigation_is_clamped() {
        let fs = mock_fs();
        let mut app = make_test_app(&fs, &Config::default());
        app.table_height = 2;

        app.dispatch(Action::Navigate(Direction::Up));
        assert_eq!(app.table_state.selected(), Some(0));
        app.dispatch(Action::Navigate(Direction::PageDown));
        assert_eq!(app.table_state.selected(), Some(2));
        app.dispatch(Action::Navigate(Direction::PageDown));
        assert_eq!(app.table_state.selected(), Some(3));
        app.dispatch(Action::Navigate(Direction::Down));
        assert_eq!(app.table_state.selected(), Some(3));
        app.dispatch(Action::Navigate(Direction::Home));
        assert_eq!(app.table_state.selected(), Some(0));
    }

    #[test]
    fn failed_refresh_keeps_previous_snapshot() {
        let fs = mock_fs();
        let mut app = make_test_app(&fs, &Config::default());
        app.refresh_data();
        assert_eq!(app.snapshot.generation, 1);

        fs.set_stat(&stat_text(&[[0; 10]; 8]));
        app.refresh_data();
        assert_eq!(app.snapshot.generation, 1);
        let (message, _) = app.status_message.as_ref().unwrap();
        assert!(message.starts_with("Refresh failed: cpu core set changed"));
    }

    #[test]
    fn refresh_picks_up_new_processes() {
        let fs = mock_fs();
        let mut app = make_test_app(&fs, &Config::default());
        fs.add_process(&MockProcess::new(5000, "htop").state('R'));
        app.dispatch(Action::Refresh);
        assert!(pids(&app).contains(&5000));
        assert_eq!(app.snapshot.tasks.running, 1);
    }

    #[test]
    fn default_keybinds() {
        let fs = mock_fs();
        let app = make_test_app(&fs, &Config::default());

        let key = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        assert_eq!(app.map_key(key), Action::Quit);

        let key = KeyEvent::new(KeyCode::Char('/'), KeyModifiers::NONE);
        assert_eq!(app.map_key(key), Action::EnterFilterMode);

        let key = KeyEvent::new(KeyCode::Char('s'), KeyModifiers::NONE);
        assert_eq!(app.map_key(key), Action::CycleSortMode);

        let key = KeyEvent::new(KeyCode::Char('I'), KeyModifiers::SHIFT);
        assert_eq!(app.map_key(key), Action::ReverseSort);

        let key = KeyEvent::new(KeyCode::Char('K'), KeyModifiers::SHIFT);
        assert_eq!(app.map_key(key), Action::ToggleKernelThreads);

        let key = KeyEvent::new(KeyCode::Char('?'), KeyModifiers::NONE);
        assert_eq!(app.map_key(key), Action::ToggleHelp);

        // Ctrl+C always quits
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(app.map_key(key), Action::Quit);

        let key = KeyEvent::new(KeyCode::PageDown, KeyModifiers::NONE);
        assert_eq!(app.map_key(key), Action::Navigate(Direction::PageDown));
    }

    #[test]
    fn custom_keybind_remap_works() {
        let fs = mock_fs();
        let mut config = Config::default();
        config.keybinds.quit = "x".to_string();
        let app = make_test_app(&fs, &config);

        let key = KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE);
        assert_eq!(app.map_key(key), Action::Quit);

        let key = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        assert_eq!(app.map_key(key), Action::None);
    }

    #[test]
    fn filter_mode_captures_typing() {
        let fs = mock_fs();
        let mut app = make_test_app(&fs, &Config::default());
        app.dispatch(Action::EnterFilterMode);

        let key = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        assert_eq!(app.map_key(key), Action::UpdateFilter("q".to_string()));

        let key = KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE);
        assert_eq!(app.map_key(key), Action::ExitFilterMode);
    }

    #[test]
    fn help_mode_blocks_other_keys() {
        let fs = mock_fs();
        let mut app = make_test_app(&fs, &Config::default());

        app.dispatch(Action::ToggleHelp);
        assert!(app.show_help());

        let key = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        assert_eq!(app.map_key(key), Action::None);

        let key = KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE);
        assert_eq!(app.map_key(key), Action::ToggleHelp);

        // Ctrl+C still works (safety)
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(app.map_key(key), Action::Quit);

        app.dispatch(Action::ToggleHelp);
        assert!(!app.show_help());
    }

    #[test]
    fn help_groups_follow_rebound_keys() {
        let mut config = Config::default();
        config.keybinds.quit = "x".to_string();
        let keybinds = ResolvedKeybinds::from_config(&config.keybinds);
        let groups = keybinds.help_groups();

        let titles: Vec<_> = groups.iter().map(|g| g.title).collect();
        assert_eq!(titles, ["Navigate", "Processes", "View", "Exit"]);
        let exit = &groups[3].entries;
        assert_eq!(exit[0], ("x".to_string(), "Quit"));
        assert_eq!(exit[1].0, "Ctrl+C");
    }
}
