use std::io::{self, BufRead};
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use anyhow::Context;
use org_logging::{org_error, org_info, org_warn};
use org_settings_core::{update, AppState, Msg};
use org_settings_engine::EngineHandle;

use super::commands::{parse_command, Command, HELP};
use super::config::{load_config, save_config, AppConfig, DEFAULT_CONFIG_FILENAME};
use super::effects::EffectRunner;
use super::render::render;

const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(10);
const SETTLE_WINDOW: Duration = Duration::from_millis(200);

pub(crate) enum AppInput {
    Msg(Msg),
    Show,
    Quit,
}

/// Entry point. `args` is either `[config.ron]` or `--init-config [config.ron]`.
pub fn run_app(args: Vec<String>) -> anyhow::Result<()> {
    if args.first().map(String::as_str) == Some("--init-config") {
        let path = config_path(args.get(1));
        save_config(&path, &AppConfig::default())?;
        println!("wrote default config to {}", path.display());
        return Ok(());
    }

    let path = config_path(args.first());
    let config = load_config(&path)?;
    org_logging::initialize(config.log_destination(), config.log_level());
    config.validate()?;
    org_info!("Starting org settings for org {}", config.org_id);

    let engine = EngineHandle::new(config.engine_settings()).context("starting engine")?;
    run_loop(config.org_id.clone(), engine)
}

fn config_path(arg: Option<&String>) -> PathBuf {
    arg.map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILENAME))
}

fn run_loop(org_id: String, engine: EngineHandle) -> anyhow::Result<()> {
    let (input_tx, input_rx) = mpsc::channel::<AppInput>();
    let runner = EffectRunner::new(engine, input_tx.clone());
    spawn_stdin_reader(input_tx);
    println!("{HELP}");

    let mut state = AppState::new(org_id);
    state = dispatch(state, Msg::PageOpened, &runner);

    while let Ok(input) = input_rx.recv() {
        match input {
            AppInput::Msg(msg) => state = dispatch(state, msg, &runner),
            AppInput::Show => print!("{}", render(&state.view())),
            AppInput::Quit => break,
        }
    }

    if !runner.engine().shutdown(SHUTDOWN_TIMEOUT) {
        org_warn!("Engine did not finish within {:?}", SHUTDOWN_TIMEOUT);
    }
    // Apply the results of the final saves before exiting.
    while let Ok(input) = input_rx.recv_timeout(SETTLE_WINDOW) {
        if let AppInput::Msg(msg) = input {
            state = dispatch(state, msg, &runner);
        }
    }
    if let Some(org) = state.org() {
        org_info!(
            "Last saved values for {}: name={:?} website={:?} email={:?}",
            org.id,
            org.name,
            org.website,
            org.email
        );
    }
    org_info!("Org settings stopped");
    Ok(())
}

fn dispatch(state: AppState, msg: Msg, runner: &EffectRunner) -> AppState {
    let (mut state, effects) = update(state, msg);
    runner.enqueue(effects);
    if state.consume_dirty() {
        print!("{}", render(&state.view()));
    }
    state
}

fn spawn_stdin_reader(input_tx: mpsc::Sender<AppInput>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let line = match line {
                Ok(line) => line,
                Err(err) => {
                    org_error!("Failed to read stdin: {}", err);
                    break;
                }
            };
            let input = match parse_command(&line) {
                Ok(Some(Command::Edit { field, value })) => {
                    AppInput::Msg(Msg::FieldChanged { field, value })
                }
                Ok(Some(Command::Logo(path))) => AppInput::Msg(Msg::LogoSelected { path }),
                Ok(Some(Command::Show)) => AppInput::Show,
                Ok(Some(Command::Help)) => {
                    println!("{HELP}");
                    continue;
                }
                Ok(Some(Command::Quit)) => AppInput::Quit,
                Ok(None) => continue,
                Err(err) => {
                    eprintln!("{err}; {HELP}");
                    continue;
                }
            };
            if input_tx.send(input).is_err() {
                return;
            }
        }
        let _ = input_tx.send(AppInput::Quit);
    });
}
