mod app;
mod command;
mod config;
mod consts;
mod game;
mod highscore;
mod logging;
mod util;
use crate::app::App;
use crate::config::Config;
use crate::game::clock::SystemClock;
use crate::game::grid::{BoundaryPolicy, GridSpec};
use crate::game::session::GameSession;
use crate::game::Game;
use crate::highscore::HighScoreFile;
use anyhow::Context;
use lexopt::{Arg, Parser};
use log::{error, info};
use ratatui::layout::Size;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::process::ExitCode;

const USAGE: &str = concat!(
    "Usage: gridsnake [--config <path>] [--wrap | --walls]\n",
    "\n",
    "Play Snake in your terminal\n",
    "\n",
    "Options:\n",
    "  -c, --config <path>  Read configuration from the given file\n",
    "      --wrap           Let the snake pass through the edges of the grid\n",
    "      --walls          End the game when the snake hits an edge of the grid\n",
    "  -h, --help           Show this help message and exit\n",
    "  -V, --version        Show the program version and exit\n",
);

#[derive(Clone, Debug, Eq, PartialEq)]
enum Arguments {
    Run {
        config: Option<PathBuf>,
        boundary: Option<BoundaryPolicy>,
    },
    Help,
    Version,
}

impl Arguments {
    fn from_parser(mut parser: Parser) -> Result<Arguments, lexopt::Error> {
        let mut config = None;
        let mut boundary = None;
        while let Some(arg) = parser.next()? {
            match arg {
                Arg::Short('c') | Arg::Long("config") => {
                    config = Some(PathBuf::from(parser.value()?));
                }
                Arg::Long("wrap") => boundary = Some(BoundaryPolicy::Wrap),
                Arg::Long("walls") => boundary = Some(BoundaryPolicy::Wall),
                Arg::Short('h') | Arg::Long("help") => return Ok(Arguments::Help),
                Arg::Short('V') | Arg::Long("version") => return Ok(Arguments::Version),
                _ => return Err(arg.unexpected()),
            }
        }
        Ok(Arguments::Run { config, boundary })
    }
}

fn main() -> ExitCode {
    match Arguments::from_parser(Parser::from_env()) {
        Ok(Arguments::Run { config, boundary }) => match run(config, boundary) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                if e
                    .downcast_ref::<std::io::Error>()
                    .is_some_and(|ioe| ioe.kind() == ErrorKind::BrokenPipe)
                {
                    return ExitCode::SUCCESS;
                }
                error!("{e:#}");
                eprintln!("gridsnake: {e:#}");
                ExitCode::from(2)
            }
        },
        Ok(Arguments::Help) => {
            print!("{USAGE}");
            ExitCode::SUCCESS
        }
        Ok(Arguments::Version) => {
            println!("gridsnake {}", env!("CARGO_PKG_VERSION"));
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("gridsnake: {e}");
            eprint!("{USAGE}");
            ExitCode::from(2)
        }
    }
}

fn run(config_path: Option<PathBuf>, boundary: Option<BoundaryPolicy>) -> anyhow::Result<()> {
    let (config_path, allow_missing) = match config_path {
        Some(path) => (path, false),
        None => (Config::default_path()?, true),
    };
    let mut config =
        Config::load(&config_path, allow_missing).context("Failed to load configuration")?;
    if let Some(boundary) = boundary {
        config.game.boundary = boundary;
    }
    if let Err(e) = logging::init(&config.files) {
        eprintln!("gridsnake: warning: {:#}", anyhow::Error::new(e));
    }
    info!("Starting gridsnake {}", env!("CARGO_PKG_VERSION"));

    let high_score_file = HighScoreFile::new(config.files.high_score_file.clone());
    let high_score = high_score_file.load().unwrap_or_else(|e| {
        error!("{:#}", anyhow::Error::new(e));
        0
    });

    let (grid, auto_grid) = match config.game.grid {
        Some(grid) => (grid, false),
        None => {
            let (width, height) =
                crossterm::terminal::size().context("Failed to get terminal size")?;
            let grid = GridSpec::fit(Size { width, height }).context("Terminal is too small")?;
            (grid, true)
        }
    };

    let session = GameSession::new(
        config.session_settings(grid),
        high_score,
        rand::rng(),
        SystemClock,
    );
    let game = Game::new(session, high_score_file, config.styles, auto_grid);
    let terminal = ratatui::init();
    let r = App::new(game).run(terminal);
    ratatui::restore();
    info!("Exiting");
    r.map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(&[], Arguments::Run { config: None, boundary: None })]
    #[case(&["--wrap"], Arguments::Run { config: None, boundary: Some(BoundaryPolicy::Wrap) })]
    #[case(&["--walls"], Arguments::Run { config: None, boundary: Some(BoundaryPolicy::Wall) })]
    #[case(&["--wrap", "--walls"], Arguments::Run { config: None, boundary: Some(BoundaryPolicy::Wall) })]
    #[case(
        &["--config", "snake.toml"],
        Arguments::Run { config: Some(PathBuf::from("snake.toml")), boundary: None },
    )]
    #[case(
        &["-c", "snake.toml", "--walls"],
        Arguments::Run {
            config: Some(PathBuf::from("snake.toml")),
            boundary: Some(BoundaryPolicy::Wall),
        },
    )]
    #[case(&["--config=snake.toml"], Arguments::Run { config: Some(PathBuf::from("snake.toml")), boundary: None })]
    #[case(&["--walls", "--help"], Arguments::Help)]
    #[case(&["-V"], Arguments::Version)]
    fn parse_args(#[case] args: &[&str], #[case] expected: Arguments) {
        let parser = Parser::from_args(args.iter().copied());
        assert_eq!(Arguments::from_parser(parser).unwrap(), expected);
    }

    #[rstest]
    #[case(&["--speed"])]
    #[case(&["--config"])]
    #[case(&["extra"])]
    fn bad_args(#[case] args: &[&str]) {
        let parser = Parser::from_args(args.iter().copied());
        assert!(Arguments::from_parser(parser).is_err());
    }
}
