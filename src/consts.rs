//! Assorted constants & hard-coded configuration
use ratatui::{
    layout::Size,
    style::{Color, Modifier, Style},
};
use std::time::Duration;

/// Default time between movements of the snake
pub(crate) const TICK_PERIOD: Duration = Duration::from_millis(100);

/// Resolution of the elapsed-time counter
pub(crate) const CLOCK_PERIOD: Duration = Duration::from_secs(1);

/// Draw everything inside a rectangle of this size in the center of the
/// terminal window.
///
/// Cf. [`crate::util::get_display_area()`]
pub(crate) const DISPLAY_SIZE: Size = Size {
    width: 80,
    height: 24,
};

/// Number of rows of the display taken up by things other than the grid: the
/// status bar, the top & bottom borders, and two message lines
pub(crate) const DISPLAY_CHROME_HEIGHT: u16 = 5;

/// Number of columns of the display taken up by the left & right borders
pub(crate) const DISPLAY_CHROME_WIDTH: u16 = 2;

/// Snake length at the start of a game
pub(crate) const INITIAL_SNAKE_LENGTH: usize = 3;

/// Points for eating a common fruit
pub(crate) const COMMON_FOOD_REWARD: u32 = 5;

/// Relative likelihood of a spawned fruit being common
pub(crate) const COMMON_FOOD_WEIGHT: u32 = 70;

/// Points for eating a rare fruit
pub(crate) const RARE_FOOD_REWARD: u32 = 10;

/// Relative likelihood of a spawned fruit being rare
pub(crate) const RARE_FOOD_WEIGHT: u32 = 30;

/// Once the score reaches this value, the snake is drawn with
/// [`SNAKE_VETERAN_STYLE`]
pub(crate) const VETERAN_SCORE: u32 = 50;

/// Glyph for the snake's head when it is moving up
pub(crate) const SNAKE_HEAD_UP_SYMBOL: char = 'v';

/// Glyph for the snake's head when it is moving down
pub(crate) const SNAKE_HEAD_DOWN_SYMBOL: char = '^';

/// Glyph for the snake's head when it is moving right
pub(crate) const SNAKE_HEAD_RIGHT_SYMBOL: char = '<';

/// Glyph for the snake's head when it is moving left
pub(crate) const SNAKE_HEAD_LEFT_SYMBOL: char = '>';

/// Glyph for the parts of the snake's body
pub(crate) const SNAKE_BODY_SYMBOL: char = '⚬';

/// Glyph for common fruits
pub(crate) const COMMON_FOOD_SYMBOL: char = '●';

/// Glyph for rare fruits
pub(crate) const RARE_FOOD_SYMBOL: char = '◆';

/// Glyph for the snake's head when it's collided with a wall or itself
pub(crate) const COLLISION_SYMBOL: char = '×';

/// Default style for the snake's head and body
pub(crate) const SNAKE_STYLE: Style = Style::new().fg(Color::Green).add_modifier(Modifier::BOLD);

/// Default style for the snake once the score reaches [`VETERAN_SCORE`]
pub(crate) const SNAKE_VETERAN_STYLE: Style =
    Style::new().fg(Color::White).add_modifier(Modifier::BOLD);

/// Default style for common fruits
pub(crate) const COMMON_FOOD_STYLE: Style = Style::new().fg(Color::LightRed);

/// Default style for rare fruits
pub(crate) const RARE_FOOD_STYLE: Style = Style::new().fg(Color::LightGreen);

/// Style for [`COLLISION_SYMBOL`]
pub(crate) const COLLISION_STYLE: Style = Style::new()
    .fg(Color::LightRed)
    .add_modifier(Modifier::REVERSED);

/// Style for key codes shown in the interface
pub(crate) const KEY_STYLE: Style = Style::new().fg(Color::Yellow);

/// Style for the status bar at the top of the game screen
pub(crate) const STATUS_BAR_STYLE: Style = Style::new().add_modifier(Modifier::REVERSED);

/// Style for the banner announcing a new high score
pub(crate) const NEW_RECORD_STYLE: Style = Style::new()
    .fg(Color::Yellow)
    .add_modifier(Modifier::BOLD);
