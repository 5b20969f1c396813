use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use color_eyre::Result;
use color_eyre::eyre::eyre;
use proctop::app::App;
use proctop::config::{self, load_config, load_config_from_path};
use proctop::event::{Event, EventHandler};
use proctop::system::MetricsEngine;
use proctop::{logging, ui};

#[derive(Parser)]
#[command(
    name = "proctop",
    about = "Terminal process and resource monitor driven by /proc"
)]
struct Cli {
    /// Path to config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Refresh rate in milliseconds
    #[arg(long)]
    refresh_rate: Option<u64>,

    /// Root of the proc filesystem to sample
    #[arg(long)]
    proc_root: Option<PathBuf>,

    /// Initial sort column: cpu, mem, pid, time, name
    #[arg(long)]
    sort: Option<String>,

    /// Take two samples one interval apart, print the snapshot as JSON and exit.
    #[arg(long, default_value_t = false)]
    once: bool,

    /// Write JSON log lines to this file.
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log level used with --log-file.
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    if let Some(path) = &cli.log_file {
        logging::init_file_logging(path, &cli.log_level)?;
    }
    let config = load_config_for_cli(&cli)?;

    if cli.once {
        return print_once(&config).await;
    }

    let engine = MetricsEngine::open(&config.engine.proc_root, &config.engine.passwd_path)?;

    let mut terminal = ratatui::init();

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        ratatui::restore();
        original_hook(panic_info);
    }));

    let result = run(&mut terminal, App::new(&config, Box::new(engine)), &config).await;

    ratatui::restore();

    result
}

async fn run(
    terminal: &mut ratatui::DefaultTerminal,
    mut app: App,
    config: &config::Config,
) -> Result<()> {
    let tick_rate = Duration::from_millis(config.general.refresh_rate_ms);
    let mut events = EventHandler::new(tick_rate);

    terminal.draw(|frame| ui::draw(frame, &mut app))?;

    while app.running {
        let Some(event) = events.next().await else {
            break;
        };
        match event {
            Event::Key(key) => {
                let action = app.map_key(key);
                app.dispatch(action);
            }
            Event::Tick => app.refresh_data(),
            Event::Resize => app.on_resize(),
        }
        terminal.draw(|frame| ui::draw(frame, &mut app))?;
    }

    Ok(())
}

async fn print_once(config: &config::Config) -> Result<()> {
    let mut engine = MetricsEngine::open(&config.engine.proc_root, &config.engine.passwd_path)?;
    tokio::time::sleep(Duration::from_millis(config.general.refresh_rate_ms)).await;
    let snapshot = engine.refresh()?;
    println!("{}", serde_json::to_string_pretty(&*snapshot)?);
    Ok(())
}

fn load_config_for_cli(cli: &Cli) -> Result<config::Config> {
    let mut config = match &cli.config {
        Some(path) => load_config_from_path(path),
        None => load_config(),
    };

    if let Some(rate) = cli.refresh_rate {
        config.general.refresh_rate_ms = rate;
    }
    if let Some(root) = &cli.proc_root {
        config.engine.proc_root = root.clone();
    }
    if let Some(sort) = &cli.sort {
        config.general.default_sort = sort.clone();
    }

    if config.general.refresh_rate_ms == 0 {
        return Err(eyre!("refresh rate must be greater than 0 ms"));
    }

    Ok(config)
}
