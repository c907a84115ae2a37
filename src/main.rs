use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;

use connect_four_mcts::config::AppConfig;
use connect_four_mcts::game::{BotProfile, GameSession};
use connect_four_mcts::logging;
use connect_four_mcts::oracle::{MctsOracle, SharedOracle};
use connect_four_mcts::play::{spawn_session_worker, SessionSnapshot, WorkerTiming};
use connect_four_mcts::ui::App;

/// Play Connect Four against an MCTS bot.
#[derive(Parser)]
#[command(name = "connect-four", about = "Play Connect Four against an MCTS bot")]
struct Cli {
    /// Path to TOML configuration file
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    /// Opponent to start with (veronica, anna, jan, arnie, puffy)
    #[arg(long)]
    bot: Option<String>,

    /// Override the pause before the bot replies
    #[arg(long)]
    reply_delay_ms: Option<u64>,

    /// Print the default configuration as TOML and exit
    #[arg(long)]
    print_config: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.print_config {
        print!("{}", AppConfig::default_toml().context("serializing default config")?);
        return Ok(());
    }

    // Load configuration
    let mut config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;

    // Apply CLI overrides
    if let Some(bot) = &cli.bot {
        config.session.default_bot = bot.clone();
    }
    if let Some(delay) = cli.reply_delay_ms {
        config.session.reply_delay_ms = delay;
    }
    config.validate().context("invalid configuration")?;

    logging::init_file(&config.logging)
        .with_context(|| format!("opening log file {}", config.logging.file.display()))?;

    let runtime = tokio::runtime::Runtime::new().context("starting async runtime")?;

    // The session starts before the oracle is ready; drops are refused until
    // it is installed.
    let oracle = SharedOracle::new();
    {
        let oracle = oracle.clone();
        let mcts = MctsOracle::new(config.oracle.clone());
        runtime.spawn(async move {
            oracle.install(Arc::new(mcts));
        });
    }

    let bot: BotProfile = config.default_bot();
    info!(bot = bot.name(), "starting session");
    let session = GameSession::new(Arc::new(oracle.clone()), bot);
    let snapshot = SessionSnapshot::of(&session);
    let handle = spawn_session_worker(
        runtime.handle(),
        session,
        WorkerTiming::from(&config.session),
    );

    run_tui(App::new(handle, oracle, snapshot)).context("terminal UI failed")?;

    info!("session closed");
    runtime.shutdown_timeout(std::time::Duration::from_secs(1));
    Ok(())
}

fn run_tui(mut app: App) -> io::Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = app.run(&mut terminal);

    // Restore terminal even if the app failed
    let _ = disable_raw_mode();
    let _ = execute!(terminal.backend_mut(), LeaveAlternateScreen);
    let _ = terminal.show_cursor();

    res
}
