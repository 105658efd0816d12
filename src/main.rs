mod action;
mod app;
mod event;
mod ui;

use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use app::App;
use clap::Parser;
use color_eyre::Result;
use color_eyre::eyre::eyre;
use event::{Event, EventHandler};
use syspanel::commands::{SnapshotEvent, generate_header_text};
use syspanel::config::{Config, Mode, load_config, load_config_from_path};
use syspanel::display::DisplayState;
use syspanel::logging::init_file_logging;
use syspanel::preferences::{PreferenceStore, default_store_path};
use syspanel::publisher::{SnapshotPublisher, spawn_sampler};
use syspanel::system::collector::Collector;

#[derive(Parser)]
#[command(name = "syspanel", about = "Live host system information panel")]
struct Cli {
    /// Path to config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Delivery mode: pull, push, static
    #[arg(long)]
    mode: Option<Mode>,

    /// Sampling interval in milliseconds (push mode)
    #[arg(long)]
    refresh_rate: Option<u64>,

    /// Hide the process list
    #[arg(long, default_value_t = false)]
    no_processes: bool,

    /// Operating system name shown in the header and sent with requests
    #[arg(long)]
    os: Option<String>,

    /// Processes whose name contains this sort first
    #[arg(long)]
    marker: Option<String>,

    /// Print the panel once as plain text and exit.
    #[arg(long, default_value_t = false)]
    once: bool,

    /// Stream `update_system_info` events as JSON lines instead of drawing.
    #[arg(long, default_value_t = false)]
    emit_json: bool,

    /// Stop after this many JSON events (0 = run until interrupted).
    #[arg(long, default_value_t = 0)]
    count: usize,

    /// Write logs to this file.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    if let Some(path) = &cli.log_file {
        init_file_logging(path)?;
    }
    let config = load_config_for_cli(&cli);
    tracing::info!(mode = %config.general.mode, "starting syspanel");

    if cli.emit_json {
        return run_emit_json(&config, cli.count).await;
    }
    if cli.once {
        return run_once(&config);
    }

    let mut terminal = ratatui::init();

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        ratatui::restore();
        original_hook(panic_info);
    }));

    let result = run(&mut terminal, &config).await;

    ratatui::restore();

    result
}

async fn run(terminal: &mut ratatui::DefaultTerminal, config: &Config) -> Result<()> {
    let mode = config.general.mode;
    let publisher = live_publisher(config);
    let mut app = App::new(config, publisher.clone(), open_preferences(config));
    let mut events = EventHandler::new();

    // Subscribe before the first pull; a push may land first and the
    // display keeps whichever snapshot is newer.
    let mut subscription = None;
    let mut sampler = None;
    if let (Mode::Push, Some(publisher)) = (mode, &publisher) {
        let tx = events.sender();
        subscription = Some(publisher.subscribe(move |update| {
            let _ = tx.send(Event::Snapshot(update.clone()));
        }));
        sampler = Some(spawn_sampler(
            publisher.clone(),
            Duration::from_millis(config.general.refresh_rate_ms),
        ));
    }
    // The first sample waits for a CPU baseline; show loading meanwhile.
    terminal.draw(|frame| ui::draw(frame, &app))?;
    app.request_snapshot();
    terminal.draw(|frame| ui::draw(frame, &app))?;

    while app.running {
        let Some(event) = events.next().await else {
            break;
        };
        match event {
            Event::Key(key) => {
                if key.kind == crossterm::event::KeyEventKind::Press {
                    let action = app.map_key(key);
                    app.dispatch(action);
                }
            }
            Event::Snapshot(update) => app.on_snapshot(&update),
            Event::Resize => {}
        }
        terminal.draw(|frame| ui::draw(frame, &app))?;
    }

    if let Some(sampler) = sampler {
        sampler.abort();
    }
    // Released before the event channel goes away.
    drop(subscription);

    Ok(())
}

fn run_once(config: &Config) -> Result<()> {
    let mut app = App::new(config, live_publisher(config), None);
    app.request_snapshot();

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", app.header_text())?;
    match app.display.state() {
        DisplayState::Loading => writeln!(stdout, "Loading...")?,
        DisplayState::Ready(view) => {
            for line in view.lines() {
                writeln!(stdout, "{line}")?;
            }
        }
    }
    Ok(())
}

async fn run_emit_json(config: &Config, count: usize) -> Result<()> {
    if config.general.mode != Mode::Push {
        return Err(eyre!("--emit-json requires push mode"));
    }
    let publisher = SnapshotPublisher::new(Collector::new(config.general.include_processes));
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let subscription = publisher.subscribe(move |update| {
        let _ = tx.send(update.clone());
    });
    let sampler = spawn_sampler(
        publisher.clone(),
        Duration::from_millis(config.general.refresh_rate_ms),
    );

    tracing::debug!(
        header = %generate_header_text(&config.general.operating_system),
        "streaming snapshots"
    );
    let mut emitted = 0;
    while let Some(update) = rx.recv().await {
        let line = SnapshotEvent::new(&update.snapshot).to_json_line()?;
        println!("{line}");
        emitted += 1;
        if count > 0 && emitted >= count {
            break;
        }
    }

    sampler.abort();
    subscription.unsubscribe();
    Ok(())
}

fn live_publisher(config: &Config) -> Option<SnapshotPublisher> {
    match config.general.mode {
        Mode::Static => None,
        Mode::Pull | Mode::Push => Some(SnapshotPublisher::new(Collector::new(
            config.general.include_processes,
        ))),
    }
}

fn open_preferences(config: &Config) -> Option<PreferenceStore> {
    let path = config.preferences.path.clone().or_else(default_store_path)?;
    match PreferenceStore::open(&path) {
        Ok(store) => Some(store),
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "ignoring unreadable preferences");
            None
        }
    }
}

fn load_config_for_cli(cli: &Cli) -> Config {
    let mut config = match &cli.config {
        Some(path) => load_config_from_path(path),
        None => load_config(),
    };

    if let Some(mode) = cli.mode {
        config.general.mode = mode;
    }
    if let Some(rate) = cli.refresh_rate {
        config.general.refresh_rate_ms = rate;
    }
    if cli.no_processes {
        config.general.include_processes = false;
    }
    if let Some(ref os) = cli.os {
        config.general.operating_system = os.clone();
    }
    if let Some(ref marker) = cli.marker {
        config.display.marker = marker.clone();
    }
    // tokio intervals panic on a zero period.
    config.general.refresh_rate_ms = config.general.refresh_rate_ms.max(1);

    config
}
