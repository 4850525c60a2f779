use anyhow::Result;
use log::{error, info};
use std::path::PathBuf;
use std::rc::Rc;
use std::{env, io::stdout, panic};
use vim_motions::constants::{DEFAULT_CONFIG_FILE, DEFAULT_LOG_FILE};
use vim_motions::logger::setup_log;
use vim_motions::terminal::{Document, TerminalContext, TerminalHost, ViewAction};
use vim_motions::{Config, Extension, SessionOutcome};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Enable better panic messages
    better_panic::install();

    setup_log(env::var("VIM_MOTIONS_LOG").unwrap_or_else(|_| DEFAULT_LOG_FILE.to_string()))?;

    let args: Vec<String> = env::args().collect();
    let config_path = env::var("VIM_MOTIONS_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE));
    let config = Config::load_from_file(&config_path)?;

    let document = match args.get(1) {
        Some(path) => Document::open(path)?,
        None => Document::from_text(include_str!("main.rs")),
    };

    let panic_hook = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        _ = crossterm::execute!(
            stdout(),
            crossterm::terminal::LeaveAlternateScreen,
            crossterm::cursor::Show,
        );
        _ = crossterm::terminal::disable_raw_mode();
        panic_hook(info);
    }));

    let host = Rc::new(TerminalHost::new(TerminalContext::new()?, document));
    let extension = Extension::activate(Rc::clone(&host), config);

    let result = run(&host, &extension).await;

    // Always restore the terminal, even if the loop failed
    extension.deactivate();
    if let Err(e) = host.cleanup() {
        eprintln!("Error cleaning up terminal: {e}");
    }

    result
}

async fn run(host: &TerminalHost, extension: &Extension<TerminalHost>) -> Result<()> {
    info!("Press ':' or space to enter a motion, 'q' to quit");
    host.show_info("Press ':' or space to enter a motion, 'q' to quit");

    loop {
        match host.next_action().await? {
            ViewAction::Quit => return Ok(()),
            ViewAction::None => {}
            ViewAction::ExecuteMotion => match extension.execute(extension.command_id()).await {
                Ok(SessionOutcome::Confirmed(motion)) => host.show_info(format!("Moved {motion}")),
                Ok(SessionOutcome::Cancelled) => host.show_info("Cancelled"),
                Ok(SessionOutcome::Aborted(_)) => {}
                Err(e) => {
                    error!("{e:#}");
                    host.show_info(format!("{e:#}"));
                }
            },
        }
    }
}
