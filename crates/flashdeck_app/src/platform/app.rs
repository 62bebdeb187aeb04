use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;

use anyhow::Context;
use flashdeck_core::{update, AppState, Msg};
use flashdeck_logging::{deck_info, deck_warn, LevelFilter};

use super::commands::{self, Command};
use super::config::{load_config, AppConfig, CONFIG_FILENAME};
use super::effects::EffectRunner;
use super::ui::render;

/// Everything the main loop reacts to.
pub enum AppEvent {
    Msg(Msg),
    Command(Command),
    InputClosed,
}

pub fn run_app() -> anyhow::Result<()> {
    let config_path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILENAME));
    let (config, config_error) = match load_config(&config_path) {
        Ok(config) => (config, None),
        Err(err) => (AppConfig::default(), Some(err)),
    };

    flashdeck_logging::initialize(config.log_destination(), LevelFilter::Info);
    if let Some(err) = config_error {
        deck_warn!("Using default settings: {}", err);
        eprintln!("warning: {err}; using default settings");
    }
    deck_info!("Flashdeck starting against {}", config.server_url);

    let (app_tx, app_rx) = mpsc::channel::<AppEvent>();
    let runner = EffectRunner::new(config.engine_config(), app_tx.clone())
        .context("failed to start the network engine")?;
    spawn_input_reader(app_tx);

    let mut stdout = io::stdout();
    let mut state = AppState::default();
    writeln!(stdout, "{}", commands::HELP)?;
    render::render(&mut stdout, &state.view())?;

    while let Ok(event) = app_rx.recv() {
        let from_input = matches!(event, AppEvent::Command(_));
        let msgs = match event {
            AppEvent::Msg(msg) => vec![msg],
            AppEvent::Command(Command::Msgs(msgs)) => msgs,
            AppEvent::Command(Command::Help) => {
                writeln!(stdout, "{}", commands::HELP)?;
                write!(stdout, "> ")?;
                stdout.flush()?;
                continue;
            }
            AppEvent::Command(Command::Unknown(line)) => {
                writeln!(stdout, "Unknown command: {line} (type 'help')")?;
                write!(stdout, "> ")?;
                stdout.flush()?;
                continue;
            }
            AppEvent::Command(Command::Quit) | AppEvent::InputClosed => break,
        };

        for msg in msgs {
            let (next, effects) = update(state, msg);
            state = next;
            runner.run(effects);
        }
        if state.consume_dirty() {
            render::render(&mut stdout, &state.view())?;
        } else if from_input {
            write!(stdout, "> ")?;
            stdout.flush()?;
        }
    }

    deck_info!("Flashdeck exiting");
    Ok(())
}

fn spawn_input_reader(app_tx: mpsc::Sender<AppEvent>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else {
                break;
            };
            if app_tx
                .send(AppEvent::Command(commands::parse(&line)))
                .is_err()
            {
                return;
            }
        }
        let _ = app_tx.send(AppEvent::InputClosed);
    });
}
