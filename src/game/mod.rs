pub(crate) mod clock;
pub(crate) mod direction;
pub(crate) mod food;
pub(crate) mod grid;
pub(crate) mod session;
pub(crate) mod snake;
use self::clock::{Clock, SystemClock};
use self::direction::Direction;
use self::food::FoodKind;
use self::grid::GridSpec;
use self::session::{EndReason, GameOver, GameSession, SessionState};
use crate::app::Screen;
use crate::command::Command;
use crate::config::Styles;
use crate::consts;
use crate::highscore::HighScoreFile;
use crate::util::{center_rect, get_display_area};
use crossterm::event::{poll, read, Event};
use log::{error, warn};
use rand::Rng;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Margin, Position, Rect, Size},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Widget},
    Frame,
};

/// The game screen: a [`GameSession`] plus everything needed to show it on a
/// terminal and to remember the high score
#[derive(Clone, Debug)]
pub(crate) struct Game<R = rand::rngs::ThreadRng, C = SystemClock> {
    session: GameSession<R, C>,
    high_score_file: HighScoreFile,
    styles: Styles,

    /// Whether to refit the grid when the terminal is resized
    auto_grid: bool,
}

impl<R: Rng, C: Clock> Game<R, C> {
    pub(crate) fn new(
        session: GameSession<R, C>,
        high_score_file: HighScoreFile,
        styles: Styles,
        auto_grid: bool,
    ) -> Game<R, C> {
        Game {
            session,
            high_score_file,
            styles,
            auto_grid,
        }
    }

    pub(crate) fn process_input(&mut self) -> std::io::Result<Option<Screen>> {
        if let Some(wait) = self.session.time_until_next() {
            if wait.is_zero() || !poll(wait)? {
                self.advance();
                return Ok(None);
            }
        }
        Ok(self.handle_event(read()?))
    }

    /// Run whatever work the session has scheduled, and save the high score
    /// if that work ended the game with a new record
    fn advance(&mut self) {
        if self.session.poll().is_some() && !self.session.is_running() {
            self.record_game_over();
        }
    }

    fn record_game_over(&self) {
        if let SessionState::Ended(GameOver {
            new_high_score: true,
            ..
        }) = self.session.state()
        {
            if let Err(e) = self.high_score_file.save(self.session.high_score()) {
                error!("{:#}", anyhow::Error::new(e));
            }
        }
    }

    fn handle_event(&mut self, event: Event) -> Option<Screen> {
        if let Event::Resize(width, height) = event {
            self.refit(Size { width, height });
            return None;
        }
        match Command::from_key_event(event.as_key_press_event()?)? {
            Command::Quit | Command::Q => return Some(Screen::Quit),
            Command::Up => self.session.set_direction(Direction::Up),
            Command::Down => self.session.set_direction(Direction::Down),
            Command::Left => self.session.set_direction(Direction::Left),
            Command::Right => self.session.set_direction(Direction::Right),
            Command::Enter | Command::Space => {
                if !self.session.is_running() {
                    self.start();
                }
            }
            Command::R => self.start(),
        }
        None
    }

    fn start(&mut self) {
        self.session.start();
        // An empty board can be filled before the first tick
        if !self.session.is_running() {
            self.record_game_over();
        }
    }

    fn refit(&mut self, area: Size) {
        if !self.auto_grid {
            return;
        }
        match GridSpec::fit(area) {
            Ok(grid) => self.session.resize(grid),
            Err(e) => warn!("Not resizing grid: {e}"),
        }
    }
}

impl<R, C> Game<R, C> {
    pub(crate) fn draw(&self, frame: &mut Frame<'_>) {
        frame.render_widget(self, frame.area());
    }
}

impl<R, C> Widget for &Game<R, C> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let snap = self.session.snapshot();
        let display = get_display_area(area);
        let [status_area, block_area, msg1_area, msg2_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Fill(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(display);
        Line::styled(
            format!(
                " Score: {}   High Score: {}   Time: {}s",
                snap.score, snap.high_score, snap.elapsed
            ),
            consts::STATUS_BAR_STYLE,
        )
        .render(status_area, buf);

        let mut block_size = snap.grid.size();
        block_size.width = block_size.width.saturating_add(2);
        block_size.height = block_size.height.saturating_add(2);
        let block_area = center_rect(block_area, block_size);
        if snap.policy.wraps() {
            DottedBorder.render(block_area, buf);
        } else {
            Block::bordered().render(block_area, buf);
        }

        let grid_area = block_area.inner(Margin::new(1, 1));
        let mut canvas = Canvas {
            area: grid_area,
            buf,
        };
        let snake_style = if snap.score >= consts::VETERAN_SCORE {
            self.styles.snake_veteran
        } else {
            self.styles.snake
        };
        for &p in snap.snake.body().iter().skip(1) {
            canvas.draw_cell(p, consts::SNAKE_BODY_SYMBOL, snake_style);
        }
        if let Some(food) = snap.food {
            let (symbol, style) = match food.kind {
                FoodKind::Common => (consts::COMMON_FOOD_SYMBOL, self.styles.food_common),
                FoodKind::Rare => (consts::RARE_FOOD_SYMBOL, self.styles.food_rare),
            };
            canvas.draw_cell(food.position, symbol, style);
        }
        // Draw the head last so that, if it's a collision, we overwrite
        // whatever it's colliding with
        let crashed = matches!(
            snap.state,
            SessionState::Ended(GameOver {
                reason: EndReason::WallCollision | EndReason::SelfCollision,
                ..
            })
        );
        if crashed {
            canvas.draw_cell(
                snap.snake.head(),
                consts::COLLISION_SYMBOL,
                consts::COLLISION_STYLE,
            );
        } else {
            canvas.draw_cell(snap.snake.head(), snap.direction.head_symbol(), snake_style);
        }

        match snap.state {
            SessionState::Idle => {
                Span::from(" Eat the fruit, but don't hit yourself!").render(msg1_area, buf);
                Line::from_iter([
                    Span::raw(" Start ("),
                    Span::styled("Enter", consts::KEY_STYLE),
                    Span::raw(") — Quit ("),
                    Span::styled("q", consts::KEY_STYLE),
                    Span::raw(")"),
                ])
                .render(msg2_area, buf);
            }
            SessionState::Running => {
                Line::from_iter([
                    Span::raw(" Restart ("),
                    Span::styled("r", consts::KEY_STYLE),
                    Span::raw(") — Quit ("),
                    Span::styled("q", consts::KEY_STYLE),
                    Span::raw(")"),
                ])
                .render(msg2_area, buf);
            }
            SessionState::Ended(over) => {
                let banner = if over.reason == EndReason::BoardFilled {
                    " — BOARD FILLED — "
                } else {
                    " — GAME OVER — "
                };
                let mut line = Line::from_iter([Span::raw(banner), Span::raw(over.message())]);
                if over.new_high_score {
                    line.push_span(Span::raw(" "));
                    line.push_span(Span::styled("NEW HIGH SCORE", consts::NEW_RECORD_STYLE));
                }
                line.render(msg1_area, buf);
                Line::from_iter([
                    Span::raw(format!(
                        " Scored {} in {}s — Play Again (",
                        over.score, over.elapsed
                    )),
                    Span::styled("Enter", consts::KEY_STYLE),
                    Span::raw(") — Quit ("),
                    Span::styled("q", consts::KEY_STYLE),
                    Span::raw(")"),
                ])
                .render(msg2_area, buf);
            }
        }
    }
}

#[derive(Debug, Eq, PartialEq)]
struct Canvas<'a> {
    area: Rect,
    buf: &'a mut Buffer,
}

impl Canvas<'_> {
    fn cell_mut(&mut self, pos: Position) -> Option<&mut ratatui::buffer::Cell> {
        let x = self.area.x.checked_add(pos.x)?;
        let y = self.area.y.checked_add(pos.y)?;
        self.buf.cell_mut((x, y))
    }

    fn draw_char(&mut self, pos: Position, symbol: char) {
        if let Some(cell) = self.cell_mut(pos) {
            cell.set_char(symbol);
        }
    }

    fn draw_cell(&mut self, pos: Position, symbol: char, style: Style) {
        if let Some(cell) = self.cell_mut(pos) {
            cell.set_char(symbol);
            cell.set_style(Style::reset().patch(style));
        }
    }
}

/// Border drawn around grids whose edges wrap around
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct DottedBorder;

impl Widget for DottedBorder {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.is_empty() {
            return;
        }
        let size = area.as_size();
        let max_x = size.width.saturating_sub(1);
        let max_y = size.height.saturating_sub(1);
        let mut canvas = Canvas { area, buf };
        canvas.draw_char(Position::ORIGIN, '·');
        canvas.draw_char(Position::new(max_x, 0), '·');
        canvas.draw_char(Position::new(max_x, max_y), '·');
        canvas.draw_char(Position::new(0, max_y), '·');
        for x in 1..max_x {
            canvas.draw_char(Position::new(x, 0), '⋯');
            canvas.draw_char(Position::new(x, max_y), '⋯');
        }
        for y in 1..max_y {
            canvas.draw_char(Position::new(0, y), '⋮');
            canvas.draw_char(Position::new(max_x, y), '⋮');
        }
    }
}
