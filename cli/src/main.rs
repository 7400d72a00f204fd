use std::fs::File;
use std::io::{self, BufRead, BufReader, Stdout, Write};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::{Context, Result};
use clap::Parser;
use imbridge_core::{BridgeConfig, EngineSession, SessionBridge, StatusFlag, ToggleGroup};
use tracing_subscriber::EnvFilter;

mod console;
mod demo;
mod script;

use console::ConsoleHost;
use demo::DemoFactory;
use script::{Command, RawKey};

type Bridge<W> = SessionBridge<DemoFactory, ConsoleHost<W>>;

#[derive(Parser)]
#[command(name = "imbridge")]
#[command(about = "Drive the input-method session bridge from a script", long_about = None)]
struct Cli {
    /// Script file (reads stdin when omitted)
    script: Option<PathBuf>,

    /// Bridge configuration (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the effective configuration and exit
    #[arg(long)]
    dump_config: bool,

    /// Do not send focus-in before the script starts
    #[arg(long)]
    no_focus: bool,
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_target(true)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("imbridge_core=info")),
        )
        .init();
}

fn load_config(path: Option<&Path>) -> Result<BridgeConfig> {
    match path {
        Some(path) => BridgeConfig::load_toml(path),
        None => Ok(BridgeConfig::default()),
    }
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref())?;
    if cli.dump_config {
        print!("{}", config.to_toml_string()?);
        return Ok(());
    }

    let factory = Rc::new(DemoFactory::new());
    let host = ConsoleHost::new(io::stdout());
    let mut bridge = SessionBridge::new(factory.clone(), host, config);
    bridge.ensure_valid()?;
    if !cli.no_focus {
        bridge.focus_in();
    }

    let reader: Box<dyn BufRead> = match &cli.script {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("opening script {}", path.display()))?,
        )),
        None => Box::new(io::stdin().lock()),
    };

    for (index, line) in reader.lines().enumerate() {
        let line = line.context("reading script")?;
        match script::parse_line(&line) {
            Ok(Some(command)) => run(&mut bridge, &factory, command, cli.config.as_deref())?,
            Ok(None) => {}
            Err(err) => eprintln!("line {}: {:#}", index + 1, err),
        }
    }

    drop(bridge);
    tracing::debug!(live = factory.live_sessions(), "bridge dropped");
    Ok(())
}

fn press(bridge: &mut Bridge<Stdout>, key: RawKey) {
    if !bridge.process_key_event(key.value, key.code, key.modifiers) {
        bridge
            .host_mut()
            .emit(&format!("passthrough: {:#x} mods={:#x}", key.value, key.modifiers));
    }
}

fn run(
    bridge: &mut Bridge<Stdout>,
    factory: &DemoFactory,
    command: Command,
    config_path: Option<&Path>,
) -> Result<()> {
    if command == Command::Status {
        print_status(bridge, factory);
        return Ok(());
    }
    if let Err(err) = bridge.ensure_valid() {
        bridge.host_mut().emit(&format!("ignored: {err}"));
        return Ok(());
    }

    match command {
        Command::Key(key) => press(bridge, key),
        Command::Type(text) => {
            for ch in text.chars() {
                press(bridge, script::raw_key(ch as u32, Default::default()));
            }
        }
        Command::FocusIn => bridge.focus_in(),
        Command::FocusOut => bridge.focus_out(),
        Command::Prop(name) => bridge.property_activate(&name, 0),
        Command::PageUp => bridge.page_up(),
        Command::PageDown => bridge.page_down(),
        Command::CursorUp => {
            bridge.cursor_up();
        }
        Command::CursorDown => {
            bridge.cursor_down();
        }
        Command::Click(index) => bridge.candidate_clicked(index),
        Command::Reset => bridge.reset(),
        Command::Reload(path) => {
            let config = load_config(path.as_deref().or(config_path))?;
            bridge.on_config_changed(config);
            bridge.host_mut().emit("config: reloaded");
        }
        Command::Destroy => {
            if bridge.destroy() {
                bridge.host_mut().emit("session: destroyed");
            }
        }
        Command::Status => {}
    }
    io::stdout().flush().context("flushing output")?;
    Ok(())
}

fn print_status(bridge: &mut Bridge<Stdout>, factory: &DemoFactory) {
    let toggles: Vec<String> = ToggleGroup::ALL
        .iter()
        .map(|&g| format!("{}={}", g.property_name(), bridge.toggles().get(g)))
        .collect();
    let (scheme, layout) = factory.scheme();
    let history = bridge
        .session()
        .map(|s| s.history_power().to_string())
        .unwrap_or_else(|| "-".into());
    let chinese = bridge
        .session()
        .map(|s| s.status_flag(StatusFlag::Chinese));
    let line = format!(
        concat!(
            "status: state={:?} {} engine_chinese={:?} history_power={} ",
            "scheme={:?}/{:?} window={} live_sessions={}",
        ),
        bridge.state(),
        toggles.join(" "),
        chinese,
        history,
        scheme,
        layout,
        bridge.pager().page_size(),
        factory.live_sessions(),
    );
    bridge.host_mut().emit(&line);
}
