use anyhow::{Context, Result as AnyhowResult};
use clap::Parser;
use easypoetry::app::Editor;
use easypoetry::config::Config;
use easypoetry::input::decoder::KeyDecoder;
use easypoetry::model::filesystem::StdFileStore;
use easypoetry::services::terminal::StdTerminal;
use easypoetry::services::terminal_modes::{self, TerminalModes};
use easypoetry::services::{log_dirs, tracing_setup};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

/// A small terminal text editor
#[derive(Parser, Debug)]
#[command(name = "easypoetry")]
#[command(about = "A small terminal text editor with incremental search", long_about = None)]
#[command(version)]
struct Args {
    /// File to open. A file that doesn't exist yet is created on first save.
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,
}

fn load_config() -> Config {
    match Config::load_default() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Warning: ignoring configuration file: {}", e);
            tracing::warn!("Falling back to default config: {}", e);
            Config::default()
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    if !tracing_setup::init_global(&log_dirs::main_log_path()) {
        eprintln!("Warning: logging is disabled");
    }
    log_dirs::cleanup_stale_logs();
    tracing::info!("Editor starting");

    // Reported on stderr while the terminal is still cooked
    let config = load_config();

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        terminal_modes::emergency_cleanup();
        original_hook(panic);
    }));

    let mut modes = match TerminalModes::enable() {
        Ok(modes) => modes,
        Err(e) => {
            eprintln!("Error: failed to enter raw mode: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    match run(&args, &config) {
        Ok(()) => {
            modes.undo();
            tracing::info!("Editor exiting normally");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("Fatal: {:#}", e);
            // Diagnostic goes out before raw mode is dropped
            terminal_modes::report_fatal(&format!("{:#}", e));
            modes.undo();
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args, config: &Config) -> AnyhowResult<()> {
    let mut terminal = StdTerminal::new();
    let (rows, cols) = terminal
        .query_size_with_fallback()
        .context("Failed to determine the terminal size")?;

    let mut editor = Editor::new(
        &config.editor,
        Box::new(StdFileStore),
        rows,
        cols,
        Instant::now(),
    );
    if let Some(path) = &args.file {
        editor
            .open(path.clone(), Instant::now())
            .with_context(|| format!("Failed to open {}", path.display()))?;
    }

    let decoder = KeyDecoder::new(config.input.poll_timeout(), config.input.escape_timeout());

    while !editor.should_quit() {
        if let Ok((rows, cols)) = terminal.query_size() {
            editor.resize(rows, cols);
        }

        let frame = editor
            .render(Instant::now())
            .context("Failed to compose frame")?;
        terminal
            .write_frame(&frame)
            .context("Failed to write to the terminal")?;

        if let Some(key) = decoder
            .next_key(&mut terminal)
            .context("Failed to read from the terminal")?
        {
            editor.process_key(key, Instant::now());
        }
    }

    let mut park = Vec::new();
    terminal_modes::queue_park_cursor(&mut park)?;
    terminal
        .write_frame(&park)
        .context("Failed to write to the terminal")?;
    Ok(())
}
