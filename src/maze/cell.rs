/// The four cardinal directions in screen coordinates: `Up` points toward
/// row 0 and `Left` toward column 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Fixed neighbor scan order shared by the carvers and the deterministic
    /// solvers: Left, Right, Up, Down. Tie situations depend on this order,
    /// so seeded runs reproduce bit-for-bit.
    pub const SCAN_ORDER: [Direction; 4] = [
        Direction::Left,
        Direction::Right,
        Direction::Up,
        Direction::Down,
    ];

    /// The 180-degree reverse.
    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Quarter turn clockwise. With y growing downward this is the
    /// "relative right" of the right-hand rule.
    pub fn turn_right(self) -> Self {
        match self {
            Direction::Up => Direction::Right,
            Direction::Right => Direction::Down,
            Direction::Down => Direction::Left,
            Direction::Left => Direction::Up,
        }
    }

    /// Quarter turn counter-clockwise.
    pub fn turn_left(self) -> Self {
        self.turn_right().opposite()
    }

    /// Offset of one step in this direction, as `(dx, dy)`.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    /// The direction from `a` to `b`, if `b` is exactly one orthogonal step
    /// away from `a`.
    pub fn between(a: (u16, u16), b: (u16, u16)) -> Option<Direction> {
        let dx = b.0 as i32 - a.0 as i32;
        let dy = b.1 as i32 - a.1 as i32;
        match (dx, dy) {
            (0, -1) => Some(Direction::Up),
            (0, 1) => Some(Direction::Down),
            (-1, 0) => Some(Direction::Left),
            (1, 0) => Some(Direction::Right),
            _ => None,
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Direction::Up => 0,
            Direction::Down => 1,
            Direction::Left => 2,
            Direction::Right => 3,
        }
    }
}

/// One square of the maze. A wall flag of `true` means the wall is intact.
///
/// `visited` is transient and phase-dependent: during carving, "all four
/// walls intact" stands in for "not yet joined to the tree" and `visited` is
/// untouched; during solving it means "already explored by the current
/// search" and is reset before every solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    walls: [bool; 4],
    pub visited: bool,
    /// Which neighbor the solver's current path edge points to. Purely
    /// observational, for external rendering.
    pub path: Option<Direction>,
}

impl Cell {
    /// The freshly stamped state: every wall intact, unvisited, no path.
    pub const INTACT: Cell = Cell {
        walls: [true; 4],
        visited: false,
        path: None,
    };

    /// Whether the wall facing `dir` is intact.
    pub fn wall(&self, dir: Direction) -> bool {
        self.walls[dir.index()]
    }

    pub(crate) fn set_wall(&mut self, dir: Direction, intact: bool) {
        self.walls[dir.index()] = intact;
    }

    /// True iff all four wall flags are intact.
    pub fn all_walls_intact(&self) -> bool {
        self.walls.iter().all(|&w| w)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotation_table() {
        // One full clockwise cycle.
        assert_eq!(Direction::Up.turn_right(), Direction::Right);
        assert_eq!(Direction::Right.turn_right(), Direction::Down);
        assert_eq!(Direction::Down.turn_right(), Direction::Left);
        assert_eq!(Direction::Left.turn_right(), Direction::Up);
        for dir in Direction::SCAN_ORDER {
            assert_eq!(dir.turn_left().turn_right(), dir);
            assert_eq!(dir.opposite().opposite(), dir);
            assert_eq!(dir.turn_right().turn_right(), dir.opposite());
        }
    }

    #[test]
    fn test_direction_between() {
        assert_eq!(Direction::between((3, 3), (3, 2)), Some(Direction::Up));
        assert_eq!(Direction::between((3, 3), (4, 3)), Some(Direction::Right));
        assert_eq!(Direction::between((3, 3), (4, 4)), None);
        assert_eq!(Direction::between((3, 3), (3, 3)), None);
        assert_eq!(Direction::between((0, 0), (2, 0)), None);
    }

    #[test]
    fn test_cell_walls() {
        let mut cell = Cell::INTACT;
        assert!(cell.all_walls_intact());
        cell.set_wall(Direction::Left, false);
        assert!(!cell.wall(Direction::Left));
        assert!(cell.wall(Direction::Right));
        assert!(!cell.all_walls_intact());
    }
}
