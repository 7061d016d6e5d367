mod app;
mod command;
mod config;
mod consts;
mod game;
mod host;
mod leaderboard;
mod persistence;
mod util;
use crate::app::{log_failure, App, Services};
use crate::config::Config;
use crate::game::Game;
use crate::host::{EventFile, HostShell};
use crate::leaderboard::{Leaderboard, LocalLeaderboard};
use crate::persistence::{MemoryStore, ScoreStore, TotalScoreFile};
use anyhow::Context;
use lexopt::{Arg, Parser};
use log::info;
use simplelog::WriteLogger;
use std::io::{self, ErrorKind};
use std::path::PathBuf;
use std::process::ExitCode;

const HELP: &str = concat!(
    "Usage: powersnake [-c|--config <PATH>]\n",
    "\n",
    "Play snake with power-ups in the terminal\n",
    "\n",
    "Options:\n",
    "  -c <PATH>, --config <PATH>\n",
    "                    Read configuration from the given file\n",
    "\n",
    "  -h, --help        Display this help message and exit\n",
    "  -V, --version     Show the program version and exit\n",
);

#[derive(Clone, Debug, Eq, PartialEq)]
enum Command {
    Run { config: Option<PathBuf> },
    Help,
    Version,
}

impl Command {
    fn from_parser(mut parser: Parser) -> Result<Command, lexopt::Error> {
        let mut config = None;
        while let Some(arg) = parser.next()? {
            match arg {
                Arg::Short('c') | Arg::Long("config") => {
                    config = Some(PathBuf::from(parser.value()?));
                }
                Arg::Short('h') | Arg::Long("help") => return Ok(Command::Help),
                Arg::Short('V') | Arg::Long("version") => return Ok(Command::Version),
                _ => return Err(arg.unexpected()),
            }
        }
        Ok(Command::Run { config })
    }

    fn run(self) -> anyhow::Result<()> {
        match self {
            Command::Run { config } => run(config),
            Command::Help => {
                print!("{HELP}");
                Ok(())
            }
            Command::Version => {
                println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
                Ok(())
            }
        }
    }
}

fn main() -> ExitCode {
    let r = Command::from_parser(Parser::from_env())
        .map_err(anyhow::Error::from)
        .and_then(Command::run);
    match r {
        Ok(()) => ExitCode::SUCCESS,
        Err(e)
            if e.downcast_ref::<io::Error>()
                .is_some_and(|e| e.kind() == ErrorKind::BrokenPipe) =>
        {
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("powersnake: {e:?}");
            ExitCode::from(2)
        }
    }
}

fn run(config_path: Option<PathBuf>) -> anyhow::Result<()> {
    let (path, allow_missing) = match config_path {
        Some(p) => (p, false),
        None => (Config::default_path()?, true),
    };
    let config = Config::load(&path, allow_missing)
        .with_context(|| format!("failed to load configuration from {}", path.display()))?;
    init_logging(&config)?;
    let grid = config.grid.grid().context("invalid grid configuration")?;
    let mut store: Box<dyn ScoreStore> = match config.total_score_file() {
        Some(p) => Box::new(TotalScoreFile::new(p.into_owned())),
        None => Box::new(MemoryStore::default()),
    };
    let total = store.load_total().unwrap_or_else(|e| {
        log_failure("Failed to load total score; starting from 0", e);
        0
    });
    let leaderboard = config.leaderboard_file().map(|p| -> Box<dyn Leaderboard> {
        Box::new(LocalLeaderboard::new(p.into_owned()))
    });
    let host = config.host_events_file().map(|p| -> Box<dyn HostShell> {
        Box::new(EventFile::new(p.to_owned()))
    });
    info!(
        "Starting up with a {}x{} grid and a total score of {total}",
        grid.width, grid.height
    );
    let game = Game::new(grid, total).with_skin(config.style.skin());
    let services = Services {
        player: config.player_name,
        store,
        leaderboard,
        host,
    };
    let terminal = ratatui::init();
    let r = App::new(game, services).run(terminal);
    ratatui::restore();
    r?;
    Ok(())
}

/// Send log messages to the configured log file, creating it if necessary.
/// Nothing is logged if no file is configured and none could be determined.
fn init_logging(config: &Config) -> anyhow::Result<()> {
    let Some(path) = config.log_file() else {
        return Ok(());
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs_err::create_dir_all(parent)?;
    }
    let fp = fs_err::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&*path)?;
    WriteLogger::init(config.log.level, simplelog::Config::default(), fp)
        .context("failed to initialize logger")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(&[], Command::Run { config: None })]
    #[case(&["-c", "snake.toml"], Command::Run { config: Some(PathBuf::from("snake.toml")) })]
    #[case(&["--config=snake.toml"], Command::Run { config: Some(PathBuf::from("snake.toml")) })]
    #[case(&["--config", "a.toml", "-h"], Command::Help)]
    #[case(&["-V"], Command::Version)]
    fn parse_args(#[case] args: &[&str], #[case] cmd: Command) {
        assert_eq!(Command::from_parser(Parser::from_args(args)).unwrap(), cmd);
    }

    #[test]
    fn logging_creates_log_file() {
        let tmpdir = tempfile::tempdir().unwrap();
        let path = tmpdir.path().join("logs").join("powersnake.log");
        let config = toml::from_str::<Config>(&format!(
            "[log]\nfile = {path:?}\nlevel = \"debug\"\n"
        ))
        .unwrap();
        init_logging(&config).unwrap();
        info!("Logging to {}", path.display());
        assert!(path.exists(), "log file should have been created");
    }

    #[test]
    fn reject_extra_args() {
        assert!(
            Command::from_parser(Parser::from_args(["extra"])).is_err(),
            "positional arguments are not accepted"
        );
    }
}
