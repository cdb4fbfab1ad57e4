use super::grid::{BoundaryPolicy, GridSpec};
use crate::consts;
use ratatui::layout::Position;

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Return the cell one step from `pos` in this direction.  Returns `None`
    /// if the step would leave `grid` and `policy` does not wrap.
    pub(crate) fn advance(
        self,
        pos: Position,
        grid: GridSpec,
        policy: BoundaryPolicy,
    ) -> Option<Position> {
        let Position { mut x, mut y } = pos;
        let wrap = policy.wraps();
        match self {
            Direction::Up => {
                y = decrement_in_bounds(y, grid.rows(), wrap)?;
            }
            Direction::Down => {
                y = increment_in_bounds(y, grid.rows(), wrap)?;
            }
            Direction::Left => {
                x = decrement_in_bounds(x, grid.columns(), wrap)?;
            }
            Direction::Right => {
                x = increment_in_bounds(x, grid.columns(), wrap)?;
            }
        }
        Some(Position { x, y })
    }

    pub(crate) fn reverse(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// The glyph for the snake's head when moving in this direction
    pub(crate) fn head_symbol(self) -> char {
        match self {
            Direction::Up => consts::SNAKE_HEAD_UP_SYMBOL,
            Direction::Down => consts::SNAKE_HEAD_DOWN_SYMBOL,
            Direction::Left => consts::SNAKE_HEAD_LEFT_SYMBOL,
            Direction::Right => consts::SNAKE_HEAD_RIGHT_SYMBOL,
        }
    }
}

fn decrement_in_bounds(x: u16, max: u16, wrap: bool) -> Option<u16> {
    if let Some(x2) = x.checked_sub(1) {
        Some(x2)
    } else if wrap {
        Some(max - 1)
    } else {
        None
    }
}

fn increment_in_bounds(x: u16, max: u16, wrap: bool) -> Option<u16> {
    if let Some(x2) = x.checked_add(1).filter(|&xx| xx < max) {
        Some(x2)
    } else if wrap {
        Some(0)
    } else {
        None
    }
}

/// Tracks the direction the snake is moving in along with the turn requested
/// for the next tick.
///
/// Requests may arrive at any rate between ticks; the last one that isn't a
/// reversal of the current direction wins.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct DirectionController {
    /// The direction applied on the most recent tick
    current: Direction,

    /// The direction that the next tick will apply
    pending: Direction,
}

impl DirectionController {
    pub(crate) fn new(direction: Direction) -> DirectionController {
        DirectionController {
            current: direction,
            pending: direction,
        }
    }

    /// Request that the snake move in `requested` on the next tick.  Returns
    /// `false` and leaves the pending direction unchanged if `requested` is
    /// the opposite of the current direction.
    pub(crate) fn set_direction(&mut self, requested: Direction) -> bool {
        if requested == self.current.reverse() {
            false
        } else {
            self.pending = requested;
            true
        }
    }

    /// Make the pending direction current and return it.  Called once at the
    /// start of every tick.
    pub(crate) fn apply(&mut self) -> Direction {
        self.current = self.pending;
        self.current
    }

    pub(crate) fn current(&self) -> Direction {
        self.current
    }

    #[cfg(test)]
    pub(crate) fn pending(&self) -> Direction {
        self.pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn grid() -> GridSpec {
        GridSpec::new(10, 15).unwrap()
    }

    #[rstest]
    #[case(Direction::Up, Position::new(2, 7), BoundaryPolicy::Wall, Some(Position::new(2, 6)))]
    #[case(Direction::Down, Position::new(2, 7), BoundaryPolicy::Wall, Some(Position::new(2, 8)))]
    #[case(Direction::Right, Position::new(2, 7), BoundaryPolicy::Wall, Some(Position::new(3, 7)))]
    #[case(Direction::Left, Position::new(2, 7), BoundaryPolicy::Wall, Some(Position::new(1, 7)))]
    #[case(Direction::Up, Position::new(2, 0), BoundaryPolicy::Wall, None)]
    #[case(Direction::Up, Position::new(2, 0), BoundaryPolicy::Wrap, Some(Position::new(2, 14)))]
    #[case(Direction::Down, Position::new(2, 14), BoundaryPolicy::Wall, None)]
    #[case(Direction::Down, Position::new(2, 14), BoundaryPolicy::Wrap, Some(Position::new(2, 0)))]
    #[case(Direction::Right, Position::new(9, 7), BoundaryPolicy::Wall, None)]
    #[case(Direction::Right, Position::new(9, 7), BoundaryPolicy::Wrap, Some(Position::new(0, 7)))]
    #[case(Direction::Left, Position::new(0, 7), BoundaryPolicy::Wall, None)]
    #[case(Direction::Left, Position::new(0, 7), BoundaryPolicy::Wrap, Some(Position::new(9, 7)))]
    fn test_direction_advance(
        #[case] d: Direction,
        #[case] pos: Position,
        #[case] policy: BoundaryPolicy,
        #[case] r: Option<Position>,
    ) {
        assert_eq!(d.advance(pos, grid(), policy), r);
    }

    #[test]
    fn advance_on_single_cell_grid() {
        let grid = GridSpec::new(1, 1).unwrap();
        let origin = Position::ORIGIN;
        assert_eq!(
            Direction::Right.advance(origin, grid, BoundaryPolicy::Wrap),
            Some(origin)
        );
        assert_eq!(
            Direction::Up.advance(origin, grid, BoundaryPolicy::Wall),
            None
        );
    }

    #[test]
    fn reversal_is_rejected() {
        let mut ctrl = DirectionController::new(Direction::Right);
        assert!(!ctrl.set_direction(Direction::Left));
        assert_eq!(ctrl.pending(), Direction::Right);
        assert_eq!(ctrl.apply(), Direction::Right);
    }

    #[rstest]
    #[case(Direction::Up, Direction::Down)]
    #[case(Direction::Down, Direction::Up)]
    #[case(Direction::Left, Direction::Right)]
    #[case(Direction::Right, Direction::Left)]
    fn every_reversal_is_rejected(#[case] current: Direction, #[case] requested: Direction) {
        let mut ctrl = DirectionController::new(current);
        assert!(!ctrl.set_direction(requested));
        assert_eq!(ctrl.pending(), current);
    }

    #[test]
    fn last_valid_request_wins() {
        let mut ctrl = DirectionController::new(Direction::Right);
        assert!(ctrl.set_direction(Direction::Up));
        assert!(ctrl.set_direction(Direction::Down));
        assert_eq!(ctrl.pending(), Direction::Down);
        assert_eq!(ctrl.current(), Direction::Right);
        assert_eq!(ctrl.apply(), Direction::Down);
        assert_eq!(ctrl.current(), Direction::Down);
    }

    #[test]
    fn reversal_is_judged_against_applied_direction() {
        let mut ctrl = DirectionController::new(Direction::Right);
        assert!(ctrl.set_direction(Direction::Up));
        // Still moving right until the next tick, so Left is a reversal even
        // though Up is pending
        assert!(!ctrl.set_direction(Direction::Left));
        assert_eq!(ctrl.pending(), Direction::Up);
        let _ = ctrl.apply();
        assert!(ctrl.set_direction(Direction::Left));
        assert_eq!(ctrl.apply(), Direction::Left);
    }
}
