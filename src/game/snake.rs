use super::direction::Direction;
use super::grid::{occupied, Grid};
use crate::consts;
use ratatui::layout::Position;
use std::collections::VecDeque;

/// The snake as a chain of cells.
///
/// All positions are relative to the top-left corner of the grid.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Snake {
    /// The cells of the snake, head first.  Never empty.
    pub(super) segments: VecDeque<Position>,

    /// The direction committed for the most recent movement
    pub(super) direction: Direction,
}

impl Snake {
    /// Create a new snake of length 1 at `head`, facing in `direction`
    pub(crate) fn new(head: Position, direction: Direction) -> Snake {
        Snake {
            segments: VecDeque::from([head]),
            direction,
        }
    }

    /// Return the position of the snake's head
    pub(crate) fn head(&self) -> Position {
        self.segments
            .front()
            .copied()
            .expect("snake should never be empty")
    }

    /// Return every cell of the snake, head first
    pub(crate) fn segments(&self) -> &VecDeque<Position> {
        &self.segments
    }

    /// Return the cells of the snake behind its head
    pub(crate) fn body(&self) -> impl Iterator<Item = Position> + '_ {
        self.segments.iter().skip(1).copied()
    }

    pub(crate) fn len(&self) -> usize {
        self.segments.len()
    }

    pub(crate) fn direction(&self) -> Direction {
        self.direction
    }

    /// Return the glyph to use for drawing the snake's head
    pub(crate) fn head_symbol(&self) -> char {
        match self.direction {
            Direction::North => consts::SNAKE_HEAD_NORTH_SYMBOL,
            Direction::South => consts::SNAKE_HEAD_SOUTH_SYMBOL,
            Direction::East => consts::SNAKE_HEAD_EAST_SYMBOL,
            Direction::West => consts::SNAKE_HEAD_WEST_SYMBOL,
        }
    }

    /// Commit `direction` for the next movement.  An exact reversal of the
    /// current direction is ignored.  Returns whether the direction was
    /// accepted.
    pub(crate) fn turn(&mut self, direction: Direction) -> bool {
        if direction == self.direction.reverse() {
            false
        } else {
            self.direction = direction;
            true
        }
    }

    /// Return the cell the head would move into next
    pub(crate) fn next_head(&self, grid: Grid) -> Position {
        self.direction.advance(self.head(), grid)
    }

    pub(crate) fn push_head(&mut self, pos: Position) {
        self.segments.push_front(pos);
    }

    /// Remove the last segment, unless it is also the head
    pub(crate) fn drop_tail(&mut self) {
        if self.segments.len() > 1 {
            let _ = self.segments.pop_back();
        }
    }

    /// Cut the snake down to half its length, but to no fewer than
    /// [`MIN_SHRUNK_LENGTH`][consts::MIN_SHRUNK_LENGTH] segments
    pub(crate) fn shrink(&mut self) {
        let target = (self.segments.len() / 2).max(consts::MIN_SHRUNK_LENGTH);
        self.segments.truncate(target);
    }

    /// Test whether the head shares a cell with any other segment
    pub(crate) fn hits_body(&self) -> bool {
        occupied(self.body(), self.head())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn straight_snake(len: u16) -> Snake {
        Snake {
            segments: (0..len).rev().map(|x| Position::new(x, 0)).collect(),
            direction: Direction::East,
        }
    }

    #[rstest]
    #[case(10, 5)]
    #[case(11, 5)]
    #[case(8, 4)]
    #[case(7, 3)]
    #[case(4, 3)]
    #[case(3, 3)]
    #[case(2, 2)]
    #[case(1, 1)]
    fn shrink(#[case] before: u16, #[case] after: usize) {
        let mut snake = straight_snake(before);
        let head = snake.head();
        snake.shrink();
        assert_eq!(snake.len(), after);
        assert_eq!(snake.head(), head);
    }

    #[test]
    fn reversal_rejected() {
        let mut snake = Snake::new(Position::new(10, 10), Direction::East);
        assert!(!snake.turn(Direction::West), "reversal should be rejected");
        assert_eq!(snake.direction(), Direction::East);
        assert!(snake.turn(Direction::North), "right angle should be accepted");
        assert_eq!(snake.direction(), Direction::North);
        assert!(snake.turn(Direction::North), "same direction should be accepted");
        assert!(!snake.turn(Direction::South), "reversal should be rejected");
        assert_eq!(snake.direction(), Direction::North);
    }

    #[test]
    fn move_without_growth() {
        let grid = Grid::new(30, 20);
        let mut snake = straight_snake(3);
        let next = snake.next_head(grid);
        assert_eq!(next, Position::new(3, 0));
        snake.push_head(next);
        snake.drop_tail();
        assert_eq!(
            snake.segments().iter().copied().collect::<Vec<_>>(),
            [Position::new(3, 0), Position::new(2, 0), Position::new(1, 0)]
        );
    }

    #[test]
    fn drop_tail_keeps_head() {
        let mut snake = Snake::new(Position::new(4, 4), Direction::South);
        snake.drop_tail();
        assert_eq!(snake.len(), 1);
        assert_eq!(snake.head(), Position::new(4, 4));
    }

    #[test]
    fn self_collision() {
        let mut snake = Snake {
            segments: VecDeque::from([
                Position::new(5, 5),
                Position::new(5, 6),
                Position::new(6, 6),
                Position::new(6, 5),
            ]),
            direction: Direction::North,
        };
        assert!(!snake.hits_body(), "no overlap yet");
        let _ = snake.turn(Direction::East);
        let next = snake.next_head(Grid::new(30, 20));
        snake.push_head(next);
        snake.drop_tail();
        assert!(!snake.hits_body(), "tail moved out of the way");
        snake.push_head(Position::new(5, 6));
        assert!(snake.hits_body(), "head landed on the body");
    }
}
