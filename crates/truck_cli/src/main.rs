use std::io::{self, Write};

use anyhow::Context;
use tracing::info;
use truck_cli::app::{App, Mode};
use truck_cli::fetchers;
use truck_pager::{
    init_logging, parse_key, restore_on_signal, stdout_columns, EnvConfig, KeyModeGuard,
    KeyReader, NavKey,
};

const PROMPT: &str = "> ";

fn main() -> anyhow::Result<()> {
    let config = EnvConfig::from_env();
    let log_target = init_logging(&config).context("failed to initialize logging")?;

    let selected = fetchers::fetcher_from_config(&config).map_err(anyhow::Error::msg)?;
    info!(
        fetcher = selected.fetcher.fetcher_id(),
        endpoint = %selected.endpoint,
        ?log_target,
        "truck pager starting"
    );

    let mut app = App::new(selected.fetcher, selected.endpoint);
    if let Some(columns) = stdout_columns() {
        app.set_width(usize::from(columns));
    }

    let mut reader = KeyReader::stdin();
    print_lines(&app.greeting())?;
    while read_commands(&mut app, &mut reader)? {
        browse(&mut app, &mut reader)?;
    }
    Ok(())
}

/// Runs the line prompt. Returns whether a session is ready to browse.
fn read_commands<F, C>(app: &mut App<F, C>, reader: &mut KeyReader) -> anyhow::Result<bool>
where
    F: page_fetch::PageFetcher,
    C: truck_session::Clock,
{
    loop {
        print!("{PROMPT}");
        io::stdout().flush()?;

        let Some(line) = reader.read_line().context("failed to read command")? else {
            return Ok(false);
        };
        print_lines(&app.handle_line(&line))?;

        match app.mode() {
            Mode::AwaitingCommand => {}
            Mode::Browsing => return Ok(true),
            Mode::Exiting => return Ok(false),
        }
    }
}

/// Reads navigation keys until the user quits or asks for the prompt again.
fn browse<F, C>(app: &mut App<F, C>, reader: &mut KeyReader) -> anyhow::Result<()>
where
    F: page_fetch::PageFetcher,
    C: truck_session::Clock,
{
    let guard = KeyModeGuard::stdin().context("failed to switch the terminal to key input")?;
    let _signals = restore_on_signal(guard.fd(), *guard.original())
        .context("failed to install signal handlers")?;

    while app.mode() == Mode::Browsing {
        let Some(sequence) = reader.read_sequence().context("failed to read key")? else {
            break;
        };
        let Some(key) = parse_key(&sequence)
            .as_deref()
            .and_then(NavKey::from_key_id)
        else {
            continue;
        };
        print_lines(&app.handle_key(key))?;
    }

    guard.restore().context("failed to restore the terminal")?;
    Ok(())
}

fn print_lines(lines: &[String]) -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    for line in lines {
        writeln!(stdout, "{line}")?;
    }
    stdout.flush()
}
