use super::direction::{Direction, DirectionController};
use super::food::{Food, FoodKind};
use super::grid::{BoundaryPolicy, GridSpec};
use ratatui::layout::Position;
use std::collections::{HashSet, VecDeque};

/// The body of a snake
///
/// All positions are relative to the top-left corner of the grid.  The body
/// is never empty and never contains the same cell twice.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Snake {
    /// The cells occupied by the snake, head first
    body: VecDeque<Position>,

    /// The same cells as `body`, for quick lookup
    cells: HashSet<Position>,
}

impl Snake {
    /// Create a snake of up to `length` cells with its head at `head`,
    /// trailing behind it away from `direction`.  The body is cut short if it
    /// would run off the edge of `grid`.
    pub(crate) fn new(head: Position, direction: Direction, length: usize, grid: GridSpec) -> Snake {
        let back = direction.reverse();
        let body = std::iter::successors(Some(head), |&p| {
            back.advance(p, grid, BoundaryPolicy::Wall)
        })
        .take(length.max(1))
        .collect::<VecDeque<_>>();
        let cells = body.iter().copied().collect();
        Snake { body, cells }
    }

    /// Create a snake from a list of cells, head first.  Returns `None` if
    /// the list is empty or contains duplicates.
    #[cfg(test)]
    pub(crate) fn from_segments<I>(segments: I) -> Option<Snake>
    where
        I: IntoIterator<Item = Position>,
    {
        let body = segments.into_iter().collect::<VecDeque<_>>();
        let cells = body.iter().copied().collect::<HashSet<_>>();
        (!body.is_empty() && cells.len() == body.len()).then_some(Snake { body, cells })
    }

    pub(crate) fn head(&self) -> Position {
        self.body[0]
    }

    pub(crate) fn tail(&self) -> Position {
        self.body[self.body.len() - 1]
    }

    pub(crate) fn len(&self) -> usize {
        self.body.len()
    }

    /// Return the cells of the snake, head first
    pub(crate) fn body(&self) -> &VecDeque<Position> {
        &self.body
    }

    /// Return the set of cells occupied by the snake
    pub(crate) fn cells(&self) -> &HashSet<Position> {
        &self.cells
    }

    pub(crate) fn contains(&self, pos: Position) -> bool {
        self.cells.contains(&pos)
    }

    /// Move the head to `new_head`.  Unless `grow` is true, the tail is
    /// dropped first so that `new_head` may be the old tail cell.
    fn slither(&mut self, new_head: Position, grow: bool) {
        if !grow {
            if let Some(tail) = self.body.pop_back() {
                self.cells.remove(&tail);
            }
        }
        self.body.push_front(new_head);
        self.cells.insert(new_head);
    }
}

/// The result of advancing a [`SnakeStateMachine`] by one tick
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) enum Tick {
    /// The snake moved one cell
    Moved,

    /// The snake moved onto the fruit and grew by one cell
    FoodEaten(FoodKind),

    /// The snake ran into the edge of a walled grid
    WallCollision,

    /// The snake ran into itself
    SelfCollision,
}

/// A snake moving around a grid
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct SnakeStateMachine {
    snake: Snake,
    direction: DirectionController,
    grid: GridSpec,
    policy: BoundaryPolicy,
}

impl SnakeStateMachine {
    pub(crate) fn new(
        snake: Snake,
        direction: Direction,
        grid: GridSpec,
        policy: BoundaryPolicy,
    ) -> SnakeStateMachine {
        SnakeStateMachine {
            snake,
            direction: DirectionController::new(direction),
            grid,
            policy,
        }
    }

    /// Create a snake of the given length at the center of `grid`, heading
    /// right
    pub(crate) fn starting(grid: GridSpec, policy: BoundaryPolicy, length: usize) -> SnakeStateMachine {
        let direction = Direction::Right;
        let snake = Snake::new(grid.center(), direction, length, grid);
        SnakeStateMachine::new(snake, direction, grid, policy)
    }

    pub(crate) fn snake(&self) -> &Snake {
        &self.snake
    }

    pub(crate) fn grid(&self) -> GridSpec {
        self.grid
    }

    pub(crate) fn policy(&self) -> BoundaryPolicy {
        self.policy
    }

    /// The direction the snake moved in on the last tick
    pub(crate) fn direction(&self) -> Direction {
        self.direction.current()
    }

    /// Request a turn for the next tick.  Reversals are ignored.
    pub(crate) fn set_direction(&mut self, direction: Direction) -> bool {
        self.direction.set_direction(direction)
    }

    /// Advance the snake one cell in the pending direction, eating `food` if
    /// the head lands on it.  On a collision the snake is left unchanged.
    pub(crate) fn tick(&mut self, food: Option<Food>) -> Tick {
        let direction = self.direction.apply();
        let Some(new_head) = direction.advance(self.snake.head(), self.grid, self.policy) else {
            return Tick::WallCollision;
        };
        let eaten = food.filter(|f| f.position == new_head);
        // The tail cell is vacated this tick unless the snake grows
        let vacated = eaten.is_none().then(|| self.snake.tail());
        if self.snake.contains(new_head) && Some(new_head) != vacated {
            return Tick::SelfCollision;
        }
        self.snake.slither(new_head, eaten.is_some());
        match eaten {
            Some(food) => Tick::FoodEaten(food.kind),
            None => Tick::Moved,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn grid() -> GridSpec {
        GridSpec::new(20, 20).unwrap()
    }

    fn machine(
        segments: &[(u16, u16)],
        direction: Direction,
        policy: BoundaryPolicy,
    ) -> SnakeStateMachine {
        let snake =
            Snake::from_segments(segments.iter().map(|&(x, y)| Position::new(x, y))).unwrap();
        SnakeStateMachine::new(snake, direction, grid(), policy)
    }

    fn body(sm: &SnakeStateMachine) -> Vec<(u16, u16)> {
        sm.snake().body().iter().map(|p| (p.x, p.y)).collect()
    }

    #[test]
    fn new_snake_trails_behind_head() {
        let snake = Snake::new(Position::new(10, 10), Direction::Right, 3, grid());
        assert_eq!(
            Vec::from(snake.body().clone()),
            vec![
                Position::new(10, 10),
                Position::new(9, 10),
                Position::new(8, 10)
            ]
        );
        assert_eq!(snake.cells().len(), 3);
    }

    #[test]
    fn new_snake_is_cut_short_at_edge() {
        let snake = Snake::new(Position::new(1, 4), Direction::Right, 5, grid());
        assert_eq!(snake.len(), 2);
        assert_eq!(snake.tail(), Position::new(0, 4));
    }

    #[test]
    fn duplicate_segments_are_rejected() {
        assert!(Snake::from_segments([Position::new(1, 1), Position::new(1, 1)]).is_none());
        assert!(Snake::from_segments([]).is_none());
    }

    #[test]
    fn plain_move() {
        let mut sm = machine(&[(5, 5), (4, 5), (3, 5)], Direction::Right, BoundaryPolicy::Wall);
        assert_eq!(sm.tick(None), Tick::Moved);
        assert_eq!(body(&sm), [(6, 5), (5, 5), (4, 5)]);
    }

    #[test]
    fn move_up_away_from_body() {
        let mut sm = machine(
            &[(5, 5), (5, 6), (5, 7), (5, 8)],
            Direction::Up,
            BoundaryPolicy::Wall,
        );
        assert_eq!(sm.tick(None), Tick::Moved);
        assert_eq!(sm.snake().head(), Position::new(5, 4));
        assert_eq!(body(&sm), [(5, 4), (5, 5), (5, 6), (5, 7)]);
    }

    #[test]
    fn turn_into_own_body() {
        let mut sm = machine(
            &[(5, 5), (4, 5), (4, 6), (5, 6)],
            Direction::Left,
            BoundaryPolicy::Wall,
        );
        assert_eq!(sm.tick(None), Tick::SelfCollision);
        assert_eq!(body(&sm), [(5, 5), (4, 5), (4, 6), (5, 6)]);
    }

    #[test]
    fn chase_own_tail() {
        // The head moves into the cell that the tail is leaving
        let mut sm = machine(
            &[(5, 5), (6, 5), (6, 6), (5, 6)],
            Direction::Down,
            BoundaryPolicy::Wall,
        );
        assert_eq!(sm.tick(None), Tick::Moved);
        assert_eq!(body(&sm), [(5, 6), (5, 5), (6, 5), (6, 6)]);
        let cells = sm.snake().cells();
        assert_eq!(cells.len(), 4);
        assert!(cells.contains(&Position::new(5, 6)));
    }

    #[test]
    fn chase_own_tail_forever() {
        let mut sm = machine(
            &[(5, 5), (6, 5), (6, 6), (5, 6)],
            Direction::Down,
            BoundaryPolicy::Wall,
        );
        for dir in [Direction::Down, Direction::Right, Direction::Up, Direction::Left].repeat(5) {
            assert!(sm.set_direction(dir));
            assert_eq!(sm.tick(None), Tick::Moved);
            assert_eq!(sm.snake().cells().len(), 4);
        }
    }

    #[test]
    fn eat_food() {
        let mut sm = machine(&[(5, 5), (4, 5), (3, 5)], Direction::Right, BoundaryPolicy::Wall);
        let food = Food::new(Position::new(6, 5), FoodKind::Rare);
        assert_eq!(sm.tick(Some(food)), Tick::FoodEaten(FoodKind::Rare));
        assert_eq!(body(&sm), [(6, 5), (5, 5), (4, 5), (3, 5)]);
    }

    #[test]
    fn food_elsewhere_is_ignored() {
        let mut sm = machine(&[(5, 5), (4, 5), (3, 5)], Direction::Right, BoundaryPolicy::Wall);
        let food = Food::new(Position::new(6, 6), FoodKind::Common);
        assert_eq!(sm.tick(Some(food)), Tick::Moved);
        assert_eq!(sm.snake().len(), 3);
    }

    #[rstest]
    #[case(BoundaryPolicy::Wrap, Tick::Moved, Some((0, 7)))]
    #[case(BoundaryPolicy::Wall, Tick::WallCollision, None)]
    fn cross_right_edge(
        #[case] policy: BoundaryPolicy,
        #[case] outcome: Tick,
        #[case] head: Option<(u16, u16)>,
    ) {
        let mut sm = machine(&[(19, 7), (18, 7)], Direction::Right, policy);
        assert_eq!(sm.tick(None), outcome);
        if let Some((x, y)) = head {
            assert_eq!(sm.snake().head(), Position::new(x, y));
        } else {
            assert_eq!(body(&sm), [(19, 7), (18, 7)]);
        }
    }

    #[test]
    fn pending_turn_is_applied_at_tick() {
        let mut sm = machine(&[(5, 5), (4, 5)], Direction::Right, BoundaryPolicy::Wall);
        assert!(sm.set_direction(Direction::Down));
        assert_eq!(sm.direction(), Direction::Right);
        assert_eq!(sm.tick(None), Tick::Moved);
        assert_eq!(sm.direction(), Direction::Down);
        assert_eq!(sm.snake().head(), Position::new(5, 6));
    }

    #[test]
    fn reversal_is_ignored() {
        let mut sm = machine(&[(5, 5), (4, 5)], Direction::Right, BoundaryPolicy::Wall);
        assert!(!sm.set_direction(Direction::Left));
        assert_eq!(sm.tick(None), Tick::Moved);
        assert_eq!(sm.snake().head(), Position::new(6, 5));
    }

    #[test]
    fn starting_snake_is_centered() {
        let sm = SnakeStateMachine::starting(grid(), BoundaryPolicy::Wrap, 3);
        assert_eq!(body(&sm), [(10, 10), (9, 10), (8, 10)]);
        assert_eq!(sm.direction(), Direction::Right);
    }

    #[test]
    fn tick_is_deterministic() {
        let mut sm1 = machine(&[(5, 5), (4, 5), (3, 5)], Direction::Right, BoundaryPolicy::Wrap);
        let mut sm2 = sm1.clone();
        let food = Some(Food::new(Position::new(7, 5), FoodKind::Common));
        for _ in 0..30 {
            assert_eq!(sm1.tick(food), sm2.tick(food));
        }
        assert_eq!(sm1, sm2);
    }
}
