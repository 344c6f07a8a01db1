pub mod candidates;
pub mod console;
pub mod draw;
pub mod number_parser;
pub mod session;

use draw::ThreadRngSource;
use session::{Session, Settings};

/// Start the interactive console on stdin/stdout.
pub fn run(settings: Settings) -> anyhow::Result<()> {
    tracing::debug!(?settings, "starting interactive session");
    let mut session = Session::new(settings);
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    console::run_console(&mut session, stdin.lock(), &mut stdout, &ThreadRngSource)?;
    tracing::debug!(
        draws = session.history().len(),
        cache = ?session.cache_stats(),
        "session ended"
    );
    Ok(())
}
