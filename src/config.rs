use crate::consts;
use crate::game::{Grid, GridError, Skin};
use crate::util::data_file_path;
use log::LevelFilter;
use ratatui::style::Style;
use serde::Deserialize;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Program configuration read from a configuration file
#[derive(Clone, Deserialize, Debug, Eq, PartialEq)]
#[serde(default, rename_all = "kebab-case")]
pub(crate) struct Config {
    /// Name under which scores are submitted to the leaderboard
    pub(crate) player_name: String,

    /// Dimensions of the play field
    pub(crate) grid: GridConfig,

    /// Colors & attributes of the play field
    pub(crate) style: StyleConfig,

    /// Settings about data files
    pub(crate) files: FileConfig,

    /// Settings about the log file
    pub(crate) log: LogConfig,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            player_name: String::from(consts::DEFAULT_PLAYER_NAME),
            grid: GridConfig::default(),
            style: StyleConfig::default(),
            files: FileConfig::default(),
            log: LogConfig::default(),
        }
    }
}

impl Config {
    /// Return the default configuration file path
    pub(crate) fn default_path() -> Result<PathBuf, ConfigError> {
        dirs::config_local_dir()
            .map(|p| p.join(consts::PROGRAM_NAME).join("config.toml"))
            .ok_or(ConfigError::NoPath)
    }

    /// Read configuration from a file on disk.  If the file does not exist and
    /// `allow_missing` is true, a default `Config` value is returned.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the file could not be read or if the file's contents
    /// could not be deserialized.
    pub(crate) fn load(path: &Path, allow_missing: bool) -> Result<Config, ConfigError> {
        let content = match fs_err::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound && allow_missing => {
                return Ok(Config::default())
            }
            Err(e) => return Err(ConfigError::Read(e)),
        };
        toml::from_str(&content).map_err(Into::into)
    }

    /// Return the filepath at which the total score should be stored: the
    /// file given in the configuration or, if that is not set, the default
    /// path.  Return `None` if saving is disabled or no path could be
    /// determined.
    pub(crate) fn total_score_file(&self) -> Option<Cow<'_, Path>> {
        if !self.files.save_total_score {
            return None;
        }
        self.files
            .total_score_file
            .as_deref()
            .map(Cow::from)
            .or_else(|| data_file_path("total-score.json").map(Cow::from))
    }

    /// Return the filepath of the local leaderboard, or `None` if no path
    /// could be determined
    pub(crate) fn leaderboard_file(&self) -> Option<Cow<'_, Path>> {
        self.files
            .leaderboard_file
            .as_deref()
            .map(Cow::from)
            .or_else(|| data_file_path("leaderboard.json").map(Cow::from))
    }

    /// Return the filepath to which host events are appended.  There is no
    /// default; without one, no host is attached.
    pub(crate) fn host_events_file(&self) -> Option<&Path> {
        self.files.host_events_file.as_deref()
    }

    /// Return the filepath of the log file, or `None` if logging is disabled
    /// or no path could be determined
    pub(crate) fn log_file(&self) -> Option<Cow<'_, Path>> {
        if self.log.level == LevelFilter::Off {
            return None;
        }
        self.log
            .file
            .as_deref()
            .map(Cow::from)
            .or_else(|| data_file_path("powersnake.log").map(Cow::from))
    }
}

#[derive(Clone, Copy, Deserialize, Debug, Eq, PartialEq)]
#[serde(default, rename_all = "kebab-case")]
pub(crate) struct GridConfig {
    /// Width in pixels of the viewport the grid is cut from
    pub(crate) viewport_width: u32,

    /// Height in pixels of the viewport the grid is cut from
    pub(crate) viewport_height: u32,

    /// Edge length in pixels of a single cell
    pub(crate) cell_size: u32,
}

impl GridConfig {
    /// Derive the play field from the configured dimensions
    pub(crate) fn grid(&self) -> Result<Grid, GridError> {
        Grid::from_viewport(self.viewport_width, self.viewport_height, self.cell_size)
    }
}

impl Default for GridConfig {
    fn default() -> GridConfig {
        GridConfig {
            viewport_width: consts::DEFAULT_VIEWPORT_WIDTH,
            viewport_height: consts::DEFAULT_VIEWPORT_HEIGHT,
            cell_size: consts::DEFAULT_CELL_SIZE,
        }
    }
}

/// Styles for the play field, each written as a style string such as
/// `"bold green"` or `"on #202020"`
#[derive(Clone, Copy, Deserialize, Debug, Eq, PartialEq)]
#[serde(from = "RawStyleConfig")]
pub(crate) struct StyleConfig {
    snake: Style,
    background: Style,
}

impl StyleConfig {
    pub(crate) fn skin(&self) -> Skin {
        Skin {
            snake: self.snake,
            background: self.background,
        }
    }
}

impl Default for StyleConfig {
    fn default() -> StyleConfig {
        let skin = Skin::default();
        StyleConfig {
            snake: skin.snake,
            background: skin.background,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
struct RawStyleConfig {
    snake: Option<parse_style::Style>,
    background: Option<parse_style::Style>,
}

impl From<RawStyleConfig> for StyleConfig {
    fn from(value: RawStyleConfig) -> StyleConfig {
        let default = StyleConfig::default();
        StyleConfig {
            snake: value.snake.map_or(default.snake, Style::from),
            background: value.background.map_or(default.background, Style::from),
        }
    }
}

#[derive(Clone, Deserialize, Debug, Eq, PartialEq)]
#[serde(default, rename_all = "kebab-case")]
pub(crate) struct FileConfig {
    /// Path at which the total score should be stored
    total_score_file: Option<PathBuf>,

    /// Path at which the local leaderboard should be stored
    leaderboard_file: Option<PathBuf>,

    /// Path to which host lifecycle events should be appended
    host_events_file: Option<PathBuf>,

    /// Whether to load & save the total score in a file
    save_total_score: bool,
}

impl Default for FileConfig {
    fn default() -> FileConfig {
        FileConfig {
            total_score_file: None,
            leaderboard_file: None,
            host_events_file: None,
            save_total_score: true,
        }
    }
}

#[derive(Clone, Deserialize, Debug, Eq, PartialEq)]
#[serde(try_from = "RawLogConfig")]
pub(crate) struct LogConfig {
    /// Path of the log file
    file: Option<PathBuf>,

    /// Most verbose level of messages to log
    pub(crate) level: LevelFilter,
}

impl Default for LogConfig {
    fn default() -> LogConfig {
        LogConfig {
            file: None,
            level: LevelFilter::Info,
        }
    }
}

#[derive(Clone, Deserialize, Debug, Eq, PartialEq)]
#[serde(default, rename_all = "kebab-case")]
struct RawLogConfig {
    file: Option<PathBuf>,
    level: String,
}

impl Default for RawLogConfig {
    fn default() -> RawLogConfig {
        RawLogConfig {
            file: None,
            level: String::from("info"),
        }
    }
}

impl TryFrom<RawLogConfig> for LogConfig {
    type Error = log::ParseLevelError;

    fn try_from(value: RawLogConfig) -> Result<LogConfig, log::ParseLevelError> {
        Ok(LogConfig {
            file: value.file,
            level: value.level.parse()?,
        })
    }
}

#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("failed to determine path to local configuration directory")]
    NoPath,
    #[error("failed to read configuration file")]
    Read(#[from] std::io::Error),
    #[error("failed to parse configuration file")]
    Parse(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::style::{Color, Modifier};
    use tempfile::tempdir;

    #[test]
    fn empty_config() {
        let cfg = toml::from_str::<Config>("").unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.player_name, "player");
        assert_eq!(cfg.grid.grid(), Ok(Grid::new(30, 20)));
        assert!(cfg.files.save_total_score, "saving enabled by default");
        assert_eq!(cfg.log.level, LevelFilter::Info);
        assert_eq!(cfg.host_events_file(), None);
        assert_eq!(cfg.style.skin(), Skin::default());
    }

    #[test]
    fn style_config() {
        let cfg = toml::from_str::<Config>(concat!(
            "[style]\n",
            "snake = \"bold #a3be8c\"\n",
            "background = \"on #2e3440\"\n",
        ))
        .unwrap();
        let skin = cfg.style.skin();
        assert_eq!(skin.snake.fg, Some(Color::Rgb(0xA3, 0xBE, 0x8C)));
        assert!(
            skin.snake.add_modifier.contains(Modifier::BOLD),
            "snake should be bold"
        );
        assert_eq!(skin.background.bg, Some(Color::Rgb(0x2E, 0x34, 0x40)));
        assert_eq!(skin.background.fg, None);
    }

    #[test]
    fn partial_style_config() {
        let cfg = toml::from_str::<Config>("[style]\nbackground = \"on #000000\"\n").unwrap();
        let skin = cfg.style.skin();
        assert_eq!(skin.snake, consts::SNAKE_STYLE);
        assert_eq!(skin.background.bg, Some(Color::Rgb(0, 0, 0)));
    }

    #[test]
    fn bad_style() {
        assert!(
            toml::from_str::<Config>("[style]\nsnake = \"sparkly\"\n").is_err(),
            "unknown style should be rejected"
        );
    }

    #[test]
    fn full_config() {
        let cfg = toml::from_str::<Config>(concat!(
            "player-name = \"jo\"\n",
            "\n",
            "[grid]\n",
            "viewport-width = 800\n",
            "viewport-height = 300\n",
            "cell-size = 25\n",
            "\n",
            "[files]\n",
            "total-score-file = \"/data/total.json\"\n",
            "leaderboard-file = \"/data/board.json\"\n",
            "host-events-file = \"/run/events.jsonl\"\n",
            "\n",
            "[log]\n",
            "file = \"/var/log/snake.log\"\n",
            "level = \"debug\"\n",
        ))
        .unwrap();
        assert_eq!(cfg.player_name, "jo");
        assert_eq!(cfg.grid.grid(), Ok(Grid::new(32, 12)));
        assert_eq!(
            cfg.total_score_file().as_deref(),
            Some(Path::new("/data/total.json"))
        );
        assert_eq!(
            cfg.leaderboard_file().as_deref(),
            Some(Path::new("/data/board.json"))
        );
        assert_eq!(cfg.host_events_file(), Some(Path::new("/run/events.jsonl")));
        assert_eq!(
            cfg.log_file().as_deref(),
            Some(Path::new("/var/log/snake.log"))
        );
        assert_eq!(cfg.log.level, LevelFilter::Debug);
    }

    #[test]
    fn saving_disabled() {
        let cfg = toml::from_str::<Config>(concat!(
            "[files]\n",
            "total-score-file = \"/data/total.json\"\n",
            "save-total-score = false\n",
        ))
        .unwrap();
        assert_eq!(cfg.total_score_file(), None);
    }

    #[test]
    fn logging_off() {
        let cfg = toml::from_str::<Config>("[log]\nlevel = \"off\"\n").unwrap();
        assert_eq!(cfg.log_file(), None);
    }

    #[test]
    fn bad_log_level() {
        assert!(
            toml::from_str::<Config>("[log]\nlevel = \"chatty\"\n").is_err(),
            "unknown log level should be rejected"
        );
    }

    #[test]
    fn misaligned_grid() {
        let cfg = toml::from_str::<Config>("[grid]\ncell-size = 7\n").unwrap();
        assert_eq!(
            cfg.grid.grid(),
            Err(GridError::Misaligned {
                width: 600,
                height: 400,
                cell_size: 7
            })
        );
    }

    #[test]
    fn load_missing() {
        let tmpdir = tempdir().unwrap();
        let path = tmpdir.path().join("config.toml");
        assert_eq!(Config::load(&path, true).unwrap(), Config::default());
        assert!(
            matches!(Config::load(&path, false), Err(ConfigError::Read(_))),
            "explicitly given config file must exist"
        );
    }

    #[test]
    fn load_file() {
        let tmpdir = tempdir().unwrap();
        let path = tmpdir.path().join("config.toml");
        fs_err::write(&path, "player-name = \"sam\"\n").unwrap();
        let cfg = Config::load(&path, false).unwrap();
        assert_eq!(cfg.player_name, "sam");
        fs_err::write(&path, "player-name = 42\n").unwrap();
        assert!(
            matches!(Config::load(&path, false), Err(ConfigError::Parse(_))),
            "wrong type should fail to parse"
        );
    }
}
