//! mssh CLI entry point.
//!
//! This binary provides the `mssh` command: pick tags from an inventory CSV
//! and open synchronized ssh panes in tmux.

use clap::Parser;
use mssh::cli::{self, Cli};
use mssh::error::Result;
use mssh::menu::{self, Menu, Outcome};
use mssh::prefs::Preferences;
use mssh::tmux::{self, SessionPlan};
use mssh::{Context, Inventory, MsshError, TagIndex, loader, logging, ssh};
use signal_hook::consts::{SIGINT, SIGTERM};
use signal_hook::iterator::{Handle, Signals};
use std::io::{self, Write};
use std::process::ExitCode;
use std::thread::JoinHandle;

fn main() -> ExitCode {
    logging::init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Line printed when `signal` ends a prompt.
fn interrupt_message(signal: i32) -> &'static str {
    match signal {
        SIGINT => "--> Keyboard interrupt pressed <--",
        _ => "--> Terminated <--",
    }
}

/// Quits with a message on Ctrl-C or SIGTERM while the user is being
/// prompted. Dropping the guard stops listening, so the tmux setup that
/// follows is not cut short.
struct InterruptGuard {
    handle: Handle,
    listener: Option<JoinHandle<()>>,
}

impl InterruptGuard {
    fn install() -> Result<Self> {
        let mut signals = Signals::new([SIGINT, SIGTERM])?;
        let handle = signals.handle();
        let listener = std::thread::spawn(move || {
            if let Some(signal) = signals.forever().next() {
                tracing::debug!(signal, "interrupted");
                eprintln!("\n{}\nBye!", interrupt_message(signal));
                std::process::exit(1);
            }
        });
        Ok(InterruptGuard {
            handle,
            listener: Some(listener),
        })
    }
}

impl Drop for InterruptGuard {
    fn drop(&mut self) {
        self.handle.close();
        if let Some(listener) = self.listener.take() {
            let _ = listener.join();
        }
    }
}

/// Main application logic.
fn run() -> Result<()> {
    let cli = Cli::parse();

    if let Some(shell) = cli.completion {
        cli::print_completion(shell);
        return Ok(());
    }

    let config = loader::load_default_config()?;
    let ctx = Context::new(&cli, &config)?;

    if !ctx.menu_only {
        ssh::require_program(&ctx.client)?;
        if !ctx.dry_run {
            ssh::require_program("tmux")?;
        }
    }

    let inventory = Inventory::load(&ctx.inventory)?;
    if inventory.is_empty() {
        return Err(MsshError::EmptyInventory(ctx.inventory.clone()));
    }
    let index = TagIndex::build(&inventory);

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut out = io::stdout();

    let menu = Menu::new(&ctx, index.tags());
    if ctx.menu_only {
        menu.render(&mut out)?;
        return Ok(());
    }

    let interrupts = InterruptGuard::install()?;
    let mut prefs = Preferences::open(&ctx.prefs_file)?;
    let selection = match menu.run(&mut prefs, &mut input, &mut out)? {
        Outcome::Accept(selection) => selection,
        Outcome::Quit => return Ok(()),
    };

    let hosts = index.resolve(&inventory, &selection)?;
    writeln!(out, "{}\n", hosts.join("\n"))?;

    let user = menu::prompt_username(&ctx, &mut prefs, &mut input, &mut out)?;
    let targets = ssh::targets(&user, &hosts);
    drop(interrupts);

    if ctx.dry_run {
        writeln!(out, "{}", ssh::display_list(&targets))?;
    } else {
        let plan = SessionPlan::new(tmux::session_name(chrono::Local::now()), &ctx.client, &targets);
        tracing::debug!(session = plan.name(), "launching");
        plan.launch()?;
    }

    writeln!(out, "Done!")?;
    Ok(())
}
