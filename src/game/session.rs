use super::clock::{Clock, Interval, SystemClock};
use super::direction::Direction;
use super::food::{Food, FoodSpawner, FoodTable, GridFull};
use super::grid::{BoundaryPolicy, GridSpec};
use super::snake::{Snake, SnakeStateMachine, Tick};
use crate::consts;
use log::{debug, info, trace};
use rand::Rng;
use std::time::{Duration, Instant};

/// Parameters fixed for the duration of a single game
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct SessionSettings {
    pub(crate) grid: GridSpec,
    pub(crate) policy: BoundaryPolicy,
    pub(crate) tick_period: Duration,
    pub(crate) initial_length: usize,
    pub(crate) food: FoodTable,
}

/// The lifecycle of a [`GameSession`]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum SessionState {
    /// Not yet started
    Idle,
    Running,
    /// The game is over; `start()` begins a new one
    Ended(GameOver),
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) enum EndReason {
    WallCollision,
    SelfCollision,
    /// The snake filled the grid, leaving nowhere to put a fruit
    BoardFilled,
}

/// The outcome of a finished game
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct GameOver {
    pub(crate) score: u32,
    /// Seconds the game ran for
    pub(crate) elapsed: u64,
    /// The high score after taking this game into account
    pub(crate) high_score: u32,
    pub(crate) new_high_score: bool,
    pub(crate) reason: EndReason,
}

impl GameOver {
    /// A remark on the player's performance
    pub(crate) fn message(&self) -> &'static str {
        if self.new_high_score {
            "Incredible! You've set a new record!"
        } else if u64::from(self.score) * 5 >= u64::from(self.high_score) * 4 {
            "So close! You almost beat your record!"
        } else if self.score >= 50 {
            "Great job! Keep practicing!"
        } else if self.score >= 20 {
            "Not bad! You're getting better!"
        } else {
            "Better luck next time!"
        }
    }
}

/// A read-only view of a session for rendering
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Snapshot<'a> {
    pub(crate) grid: GridSpec,
    pub(crate) policy: BoundaryPolicy,
    pub(crate) snake: &'a Snake,
    pub(crate) direction: Direction,
    pub(crate) food: Option<Food>,
    pub(crate) score: u32,
    pub(crate) elapsed: u64,
    pub(crate) high_score: u32,
    pub(crate) state: SessionState,
}

/// A game of snake from start to finish, plus its restarts.
///
/// The session owns two schedules: the movement interval, which ticks the
/// snake every `tick_period`, and the clock interval, which counts elapsed
/// seconds.  Both run only while the session is `Running`.  Callers drive
/// them by calling [`GameSession::poll()`] whenever
/// [`GameSession::next_deadline()`] passes.
#[derive(Clone, Debug)]
pub(crate) struct GameSession<R = rand::rngs::ThreadRng, C = SystemClock> {
    settings: SessionSettings,
    state: SessionState,
    board: SnakeStateMachine,
    spawner: FoodSpawner<R>,
    food: Option<Food>,
    score: u32,
    elapsed: u64,
    high_score: u32,
    clock: C,
    mover: Interval,
    stopwatch: Interval,
}

impl<R: Rng, C: Clock> GameSession<R, C> {
    /// Create an idle session with the snake in its starting position and a
    /// fruit already placed
    pub(crate) fn new(settings: SessionSettings, high_score: u32, rng: R, clock: C) -> Self {
        let board =
            SnakeStateMachine::starting(settings.grid, settings.policy, settings.initial_length);
        let spawner = FoodSpawner::new(rng, settings.food.clone());
        let mover = Interval::new(settings.tick_period);
        let mut session = GameSession {
            settings,
            state: SessionState::Idle,
            board,
            spawner,
            food: None,
            score: 0,
            elapsed: 0,
            high_score,
            clock,
            mover,
            stopwatch: Interval::new(consts::CLOCK_PERIOD),
        };
        session.food = session.spawn_food().ok();
        session
    }

    /// Begin a new game, abandoning any game in progress
    pub(crate) fn start(&mut self) {
        self.mover.cancel();
        self.stopwatch.cancel();
        self.reset();
        self.state = SessionState::Running;
        info!(
            "Starting game on {}×{} grid with {:?} boundaries",
            self.settings.grid.columns(),
            self.settings.grid.rows(),
            self.settings.policy
        );
        if self.food.is_none() {
            self.end(EndReason::BoardFilled);
            return;
        }
        let now = self.clock.now();
        self.mover.start(now);
        self.stopwatch.start(now);
    }

    fn reset(&mut self) {
        self.board = SnakeStateMachine::starting(
            self.settings.grid,
            self.settings.policy,
            self.settings.initial_length,
        );
        self.score = 0;
        self.elapsed = 0;
        self.food = self.spawn_food().ok();
    }

    fn spawn_food(&mut self) -> Result<Food, GridFull> {
        self.spawner
            .spawn(self.board.grid(), self.board.snake().cells())
    }

    /// Request a turn for the next tick.  Ignored unless the game is running.
    pub(crate) fn set_direction(&mut self, direction: Direction) {
        if self.is_running() && !self.board.set_direction(direction) {
            trace!("Ignoring reversal to {direction:?}");
        }
    }

    /// Use `grid` for games started from now on.  An idle session is reset
    /// immediately so that the new grid is displayed.
    pub(crate) fn resize(&mut self, grid: GridSpec) {
        if grid == self.settings.grid {
            return;
        }
        debug!("Grid resized to {}×{}", grid.columns(), grid.rows());
        self.settings.grid = grid;
        if self.state == SessionState::Idle {
            self.reset();
        }
    }

    /// The earliest instant at which [`GameSession::poll()`] has work to do
    pub(crate) fn next_deadline(&self) -> Option<Instant> {
        match (self.mover.deadline(), self.stopwatch.deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// How long to wait before the next call to [`GameSession::poll()`], or
    /// `None` if nothing is scheduled
    pub(crate) fn time_until_next(&self) -> Option<Duration> {
        self.next_deadline()
            .map(|when| when.saturating_duration_since(self.clock.now()))
    }

    /// Run any scheduled work that is due: count elapsed seconds and, if the
    /// movement interval has fired, advance the snake by one tick.  Returns
    /// the outcome of the tick, if any.
    pub(crate) fn poll(&mut self) -> Option<Tick> {
        if !self.is_running() {
            return None;
        }
        let now = self.clock.now();
        let seconds = self.stopwatch.fire(now);
        self.elapsed = self.elapsed.saturating_add(u64::from(seconds));
        // However many periods have passed, the snake only moves one cell
        (self.mover.fire(now) > 0).then(|| self.tick())
    }

    /// Advance the snake by one tick and update the score & state
    /// accordingly.
    ///
    /// # Panics
    ///
    /// Panics if the session is not running.
    pub(crate) fn tick(&mut self) -> Tick {
        assert!(
            self.is_running(),
            "GameSession::tick() called while session is {:?}",
            self.state
        );
        let outcome = self.board.tick(self.food);
        match outcome {
            Tick::Moved => (),
            Tick::FoodEaten(kind) => {
                let reward = self.spawner.table().reward(kind);
                self.score = self.score.saturating_add(reward);
                let head = self.board.snake().head();
                debug!(
                    "Ate {kind:?} fruit at ({}, {}); score is now {}, length {}",
                    head.x,
                    head.y,
                    self.score,
                    self.board.snake().len()
                );
                match self.spawn_food() {
                    Ok(food) => self.food = Some(food),
                    Err(GridFull) => {
                        self.food = None;
                        self.end(EndReason::BoardFilled);
                    }
                }
            }
            Tick::WallCollision => self.end(EndReason::WallCollision),
            Tick::SelfCollision => self.end(EndReason::SelfCollision),
        }
        outcome
    }

    fn end(&mut self, reason: EndReason) {
        self.mover.cancel();
        self.stopwatch.cancel();
        let new_high_score = self.score > self.high_score;
        if new_high_score {
            self.high_score = self.score;
        }
        let over = GameOver {
            score: self.score,
            elapsed: self.elapsed,
            high_score: self.high_score,
            new_high_score,
            reason,
        };
        info!(
            "Game over ({reason:?}): score {} after {}s{}",
            over.score,
            over.elapsed,
            if new_high_score {
                ", a new high score"
            } else {
                ""
            }
        );
        self.state = SessionState::Ended(over);
    }
}

impl<R, C> GameSession<R, C> {
    pub(crate) fn state(&self) -> SessionState {
        self.state
    }

    pub(crate) fn is_running(&self) -> bool {
        self.state == SessionState::Running
    }

    #[cfg(test)]
    pub(crate) fn score(&self) -> u32 {
        self.score
    }

    #[cfg(test)]
    pub(crate) fn elapsed(&self) -> u64 {
        self.elapsed
    }

    pub(crate) fn high_score(&self) -> u32 {
        self.high_score
    }

    pub(crate) fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            grid: self.board.grid(),
            policy: self.board.policy(),
            snake: self.board.snake(),
            direction: self.board.direction(),
            food: self.food,
            score: self.score,
            elapsed: self.elapsed,
            high_score: self.high_score,
            state: self.state,
        }
    }
}

#[cfg(test)]
impl<R, C> GameSession<R, C> {
    /// Replace the snake & fruit with the given arrangement
    pub(crate) fn arrange(&mut self, board: SnakeStateMachine, food: Option<Food>) {
        self.board = board;
        self.food = food;
    }

    /// Put the fruit one cell ahead of the snake's head
    pub(crate) fn place_food_ahead(&mut self, kind: super::food::FoodKind) {
        let head = self.board.snake().head();
        let ahead = self
            .board
            .direction()
            .advance(head, self.board.grid(), self.board.policy());
        self.food = ahead.map(|position| Food::new(position, kind));
    }
}
