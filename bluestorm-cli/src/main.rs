//! bluestorm entry point
//!
//! Startup order: privileges, tool probes, adapter, initial scan, menu
//! loop. Everything before the loop is fatal on failure; once the loop
//! runs, leaving it (Ctrl-C) stops all jobs best-effort on the way out.

mod args;

use std::process::ExitCode;
use std::sync::Arc;

use bluestorm_attack::AttackRegistry;
use bluestorm_core::Result;
use bluestorm_system::{check_dependencies, ensure_root, Adapter, HcitoolScanner};
use bluestorm_tui::{term, DeviceMenu, Prompt, StdinPrompt};
use tracing_subscriber::EnvFilter;

use args::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse_args();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("bluestorm: {err}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn run(cli: Cli) -> Result<()> {
    ensure_root()?;
    check_dependencies()?;

    let adapter_id = match cli.adapter {
        Some(id) => id,
        None => {
            let mut prompt = StdinPrompt;
            let id = prompt.line("Enter bluetooth adapter id (default 0): ")?;
            if id.is_empty() {
                "0".to_string()
            } else {
                id
            }
        }
    };
    let adapter = Adapter::open(&adapter_id)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let registry = Arc::new(AttackRegistry::new());

    // SIGINT can only arrive while a line-buffered prompt has the
    // terminal (raw mode swallows Ctrl-C as a key); without this task it
    // would kill the process and orphan every flood worker.
    let cleanup = Arc::clone(&registry);
    runtime.spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cleanup.stop_all().await;
            let _ = crossterm::terminal::disable_raw_mode();
            std::process::exit(0);
        }
    });

    term::clear_screen()?;
    term::print_line("Scanning devices...", false)?;
    let mut menu = DeviceMenu::new(
        Box::new(HcitoolScanner::new(adapter.name())),
        Arc::clone(&registry),
        runtime.handle().clone(),
        adapter.name(),
        StdinPrompt,
    )?;

    let result = bluestorm_tui::run(&mut menu);

    // Stop whatever is still running before exiting, on the interrupt
    // path and on loop errors alike.
    runtime.block_on(registry.stop_all());
    result
}
