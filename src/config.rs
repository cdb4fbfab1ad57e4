use crate::consts;
use crate::game::food::FoodTable;
use crate::game::grid::{BoundaryPolicy, GridSpec};
use crate::game::session::SessionSettings;
use log::LevelFilter;
use ratatui::style::Style;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Program configuration read from a configuration file
#[derive(Clone, Deserialize, Debug, Default, Eq, PartialEq)]
pub(crate) struct Config {
    /// Gameplay settings
    #[serde(default)]
    pub(crate) game: GameConfig,

    /// Rewards & spawn weights of the different kinds of fruit
    #[serde(default)]
    pub(crate) food: FoodTable,

    /// Settings about data files
    #[serde(default)]
    pub(crate) files: FileConfig,

    #[serde(default)]
    pub(crate) styles: Styles,
}

impl Config {
    /// Return the default configuration file path
    pub(crate) fn default_path() -> Result<PathBuf, ConfigError> {
        dirs::config_local_dir()
            .map(|p| p.join("gridsnake").join("config.toml"))
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

    /// Build the settings for a game session played on `grid`
    pub(crate) fn session_settings(&self, grid: GridSpec) -> SessionSettings {
        SessionSettings {
            grid,
            policy: self.game.boundary,
            tick_period: self.game.tick_period,
            initial_length: self.game.initial_length,
            food: self.food.clone(),
        }
    }
}

#[derive(Clone, Copy, Deserialize, Debug, Eq, PartialEq)]
#[serde(try_from = "RawGameConfig")]
pub(crate) struct GameConfig {
    pub(crate) boundary: BoundaryPolicy,

    /// Fixed grid dimensions.  If `None`, the grid is sized to fit the
    /// terminal.
    pub(crate) grid: Option<GridSpec>,

    pub(crate) tick_period: Duration,

    pub(crate) initial_length: usize,
}

impl Default for GameConfig {
    fn default() -> GameConfig {
        GameConfig {
            boundary: BoundaryPolicy::default(),
            grid: None,
            tick_period: consts::TICK_PERIOD,
            initial_length: consts::INITIAL_SNAKE_LENGTH,
        }
    }
}

#[derive(Clone, Copy, Deserialize, Debug, Eq, PartialEq)]
#[serde(default, rename_all = "kebab-case")]
struct RawGameConfig {
    boundary: BoundaryPolicy,
    grid: Option<GridSpec>,
    tick_period_ms: u64,
    initial_length: usize,
}

impl Default for RawGameConfig {
    fn default() -> RawGameConfig {
        let defaults = GameConfig::default();
        RawGameConfig {
            boundary: defaults.boundary,
            grid: defaults.grid,
            tick_period_ms: u64::try_from(defaults.tick_period.as_millis()).unwrap_or(u64::MAX),
            initial_length: defaults.initial_length,
        }
    }
}

impl TryFrom<RawGameConfig> for GameConfig {
    type Error = GameConfigError;

    fn try_from(value: RawGameConfig) -> Result<GameConfig, GameConfigError> {
        if value.tick_period_ms == 0 {
            return Err(GameConfigError::ZeroTickPeriod);
        }
        if value.initial_length == 0 {
            return Err(GameConfigError::ZeroLength);
        }
        Ok(GameConfig {
            boundary: value.boundary,
            grid: value.grid,
            tick_period: Duration::from_millis(value.tick_period_ms),
            initial_length: value.initial_length,
        })
    }
}

#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
pub(crate) enum GameConfigError {
    #[error("tick-period-ms must be positive")]
    ZeroTickPeriod,
    #[error("initial-length must be positive")]
    ZeroLength,
}

#[derive(Clone, Deserialize, Debug, Eq, PartialEq)]
#[serde(try_from = "RawFileConfig")]
pub(crate) struct FileConfig {
    /// Path at which the high score is stored
    pub(crate) high_score_file: Option<PathBuf>,

    /// Path to which log messages are written
    pub(crate) log_file: Option<PathBuf>,

    /// Log messages below this level are discarded; `Off` disables logging
    /// entirely
    pub(crate) log_level: LevelFilter,
}

impl Default for FileConfig {
    fn default() -> FileConfig {
        FileConfig {
            high_score_file: None,
            log_file: None,
            log_level: LevelFilter::Info,
        }
    }
}

#[derive(Clone, Deserialize, Debug, Default, Eq, PartialEq)]
#[serde(default, rename_all = "kebab-case")]
struct RawFileConfig {
    high_score_file: Option<PathBuf>,
    log_file: Option<PathBuf>,
    log_level: Option<String>,
}

impl TryFrom<RawFileConfig> for FileConfig {
    type Error = log::ParseLevelError;

    fn try_from(value: RawFileConfig) -> Result<FileConfig, log::ParseLevelError> {
        let log_level = match value.log_level {
            Some(s) => s.parse::<LevelFilter>()?,
            None => FileConfig::default().log_level,
        };
        Ok(FileConfig {
            high_score_file: value.high_score_file,
            log_file: value.log_file,
            log_level,
        })
    }
}

/// Styles for the parts of the game that can be customized
#[derive(Clone, Copy, Deserialize, Debug, Eq, PartialEq)]
#[serde(from = "RawStyles")]
pub(crate) struct Styles {
    pub(crate) snake: Style,
    pub(crate) snake_veteran: Style,
    pub(crate) food_common: Style,
    pub(crate) food_rare: Style,
}

impl Default for Styles {
    fn default() -> Styles {
        Styles {
            snake: consts::SNAKE_STYLE,
            snake_veteran: consts::SNAKE_VETERAN_STYLE,
            food_common: consts::COMMON_FOOD_STYLE,
            food_rare: consts::RARE_FOOD_STYLE,
        }
    }
}

/// Styles as written in the configuration file, e.g., `"bold green"`
#[derive(Clone, Deserialize, Debug, Default)]
#[serde(default, rename_all = "kebab-case")]
struct RawStyles {
    snake: Option<parse_style::Style>,
    snake_veteran: Option<parse_style::Style>,
    food_common: Option<parse_style::Style>,
    food_rare: Option<parse_style::Style>,
}

impl From<RawStyles> for Styles {
    fn from(value: RawStyles) -> Styles {
        let defaults = Styles::default();
        Styles {
            snake: value.snake.map_or(defaults.snake, Style::from),
            snake_veteran: value
                .snake_veteran
                .map_or(defaults.snake_veteran, Style::from),
            food_common: value.food_common.map_or(defaults.food_common, Style::from),
            food_rare: value.food_rare.map_or(defaults.food_rare, Style::from),
        }
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
    use crate::game::food::FoodKind;
    use pretty_assertions::assert_eq;
    use ratatui::style::{Color, Modifier};
    use tempfile::tempdir;

    #[test]
    fn empty_config() {
        let cfg = toml::from_str::<Config>("").unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.game.boundary, BoundaryPolicy::Wrap);
        assert_eq!(cfg.game.tick_period, Duration::from_millis(100));
        assert_eq!(cfg.files.log_level, LevelFilter::Info);
    }

    #[test]
    fn full_config() {
        let src = concat!(
            "[game]\n",
            "boundary = \"wall\"\n",
            "grid = { columns = 30, rows = 12 }\n",
            "tick-period-ms = 150\n",
            "initial-length = 1\n",
            "\n",
            "[food]\n",
            "common = { reward = 1, weight = 9 }\n",
            "rare = { reward = 3, weight = 1 }\n",
            "\n",
            "[files]\n",
            "high-score-file = \"/tmp/gridsnake/high.json\"\n",
            "log-file = \"/tmp/gridsnake/log.txt\"\n",
            "log-level = \"debug\"\n",
            "\n",
            "[styles]\n",
            "snake = \"bold blue\"\n",
            "food-rare = \"magenta\"\n",
        );
        let cfg = toml::from_str::<Config>(src).unwrap();
        assert_eq!(
            cfg.game,
            GameConfig {
                boundary: BoundaryPolicy::Wall,
                grid: Some(GridSpec::new(30, 12).unwrap()),
                tick_period: Duration::from_millis(150),
                initial_length: 1,
            }
        );
        assert_eq!(cfg.food.reward(FoodKind::Common), 1);
        assert_eq!(cfg.food.reward(FoodKind::Rare), 3);
        assert_eq!(
            cfg.files,
            FileConfig {
                high_score_file: Some(PathBuf::from("/tmp/gridsnake/high.json")),
                log_file: Some(PathBuf::from("/tmp/gridsnake/log.txt")),
                log_level: LevelFilter::Debug,
            }
        );
        // Named colors are converted to their palette indices
        assert_eq!(cfg.styles.snake.fg, Some(Color::Indexed(4)));
        assert!(cfg.styles.snake.add_modifier.contains(Modifier::BOLD));
        assert_eq!(cfg.styles.food_rare.fg, Some(Color::Indexed(5)));
        assert_eq!(cfg.styles.snake_veteran, consts::SNAKE_VETERAN_STYLE);
        assert_eq!(cfg.styles.food_common, consts::COMMON_FOOD_STYLE);
    }

    #[test]
    fn session_settings() {
        let cfg = toml::from_str::<Config>("[game]\ninitial-length = 5\n").unwrap();
        let grid = GridSpec::new(40, 20).unwrap();
        let settings = cfg.session_settings(grid);
        assert_eq!(
            settings,
            SessionSettings {
                grid,
                policy: BoundaryPolicy::Wrap,
                tick_period: consts::TICK_PERIOD,
                initial_length: 5,
                food: FoodTable::default(),
            }
        );
    }

    #[test]
    fn zero_tick_period() {
        assert!(toml::from_str::<Config>("[game]\ntick-period-ms = 0\n").is_err());
    }

    #[test]
    fn zero_initial_length() {
        assert!(toml::from_str::<Config>("[game]\ninitial-length = 0\n").is_err());
    }

    #[test]
    fn zero_sized_grid() {
        assert!(toml::from_str::<Config>("[game]\ngrid = { columns = 0, rows = 10 }\n").is_err());
    }

    #[test]
    fn bad_log_level() {
        assert!(toml::from_str::<Config>("[files]\nlog-level = \"loud\"\n").is_err());
    }

    #[test]
    fn load_missing() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("config.toml");
        assert_eq!(Config::load(&path, true).unwrap(), Config::default());
        assert!(matches!(
            Config::load(&path, false),
            Err(ConfigError::Read(_))
        ));
    }

    #[test]
    fn load_file() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("config.toml");
        fs_err::write(&path, "[game]\nboundary = \"wall\"\n").unwrap();
        let cfg = Config::load(&path, false).unwrap();
        assert_eq!(cfg.game.boundary, BoundaryPolicy::Wall);
        fs_err::write(&path, "[game\n").unwrap();
        assert!(matches!(
            Config::load(&path, true),
            Err(ConfigError::Parse(_))
        ));
    }
}
