use crate::error::MazeError;

use super::cell::{Cell, Direction};

/// Fixed-capacity container of maze cells.
///
/// Storage is allocated once at `max_width x max_height`; each
/// [`Grid::initialize`] call re-stamps an active sub-rectangle to the
/// all-walls-intact, unvisited state. Pure bookkeeping: the only wall
/// mutators live here, and `remove_wall_between` is the only one that acts
/// on interior walls.
pub struct Grid {
    cells: Box<[Cell]>,
    max_width: u16,
    max_height: u16,
    width: u16,
    height: u16,
}

impl Grid {
    pub fn new(max_width: u16, max_height: u16) -> Self {
        let cells =
            vec![Cell::INTACT; max_width as usize * max_height as usize].into_boxed_slice();
        Grid {
            cells,
            max_width,
            max_height,
            width: 0,
            height: 0,
        }
    }

    /// Re-stamps every cell of the requested active rectangle to
    /// [`Cell::INTACT`]. Fails if the dimensions are zero or exceed capacity.
    pub fn initialize(&mut self, width: u16, height: u16) -> Result<(), MazeError> {
        if width == 0 || height == 0 || width > self.max_width || height > self.max_height {
            return Err(MazeError::InvalidDimensions {
                width,
                height,
                max_width: self.max_width,
                max_height: self.max_height,
            });
        }
        self.width = width;
        self.height = height;
        for y in 0..height {
            for x in 0..width {
                let idx = self.ravel((x, y));
                self.cells[idx] = Cell::INTACT;
            }
        }
        Ok(())
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn max_width(&self) -> u16 {
        self.max_width
    }

    pub fn max_height(&self) -> u16 {
        self.max_height
    }

    /// Whether the coordinate lies within the active rectangle.
    pub fn contains(&self, coord: (u16, u16)) -> bool {
        coord.0 < self.width && coord.1 < self.height
    }

    fn ravel(&self, coord: (u16, u16)) -> usize {
        debug_assert!(
            self.contains(coord),
            "coordinate {:?} outside active {}x{} grid",
            coord,
            self.width,
            self.height
        );
        coord.1 as usize * self.max_width as usize + coord.0 as usize
    }

    /// The adjacent cell one step in `dir`, if it is within the active
    /// rectangle.
    pub fn neighbor(&self, coord: (u16, u16), dir: Direction) -> Option<(u16, u16)> {
        let (dx, dy) = dir.delta();
        let x = coord.0 as i32 + dx;
        let y = coord.1 as i32 + dy;
        if x >= 0 && y >= 0 && (x as u16) < self.width && (y as u16) < self.height {
            Some((x as u16, y as u16))
        } else {
            None
        }
    }

    /// Clears both facing walls between two grid-adjacent cells in one
    /// operation and returns the direction from `a` to `b`. This is the only
    /// interior wall mutator, so wall symmetry holds at every point in time.
    ///
    /// # Panics
    /// If the cells are not exactly one orthogonal step apart.
    pub fn remove_wall_between(&mut self, a: (u16, u16), b: (u16, u16)) -> Direction {
        let dir = match Direction::between(a, b) {
            Some(dir) => dir,
            None => panic!("cells {:?} and {:?} are not orthogonally adjacent", a, b),
        };
        let ia = self.ravel(a);
        let ib = self.ravel(b);
        self.cells[ia].set_wall(dir, false);
        self.cells[ib].set_wall(dir.opposite(), false);
        dir
    }

    /// Opens a boundary wall of `coord` facing outside the grid. Used only
    /// to cut the entrance and exit openings.
    pub(crate) fn open_boundary(&mut self, coord: (u16, u16), dir: Direction) {
        debug_assert!(
            self.neighbor(coord, dir).is_none(),
            "boundary opening at {:?} must face outside the grid",
            coord
        );
        let idx = self.ravel(coord);
        self.cells[idx].set_wall(dir, false);
    }

    /// Whether one can step from `coord` in `dir`: the neighbor exists and
    /// the facing walls are open.
    pub fn passage_open(&self, coord: (u16, u16), dir: Direction) -> bool {
        match self.neighbor(coord, dir) {
            Some(nb) => !self[nb].wall(dir.opposite()),
            None => false,
        }
    }

    /// True iff the cell still has all four walls. During carving this is
    /// the "not yet joined to the tree" test.
    pub fn all_walls_intact(&self, coord: (u16, u16)) -> bool {
        self[coord].all_walls_intact()
    }

    /// Clears `visited` and `path` on every active cell. Walls are left
    /// untouched; called before each solve.
    pub(crate) fn reset_marks(&mut self) {
        for y in 0..self.height {
            for x in 0..self.width {
                let idx = self.ravel((x, y));
                self.cells[idx].visited = false;
                self.cells[idx].path = None;
            }
        }
    }

    pub(crate) fn cell_mut(&mut self, coord: (u16, u16)) -> &mut Cell {
        let idx = self.ravel(coord);
        &mut self.cells[idx]
    }
}

impl std::ops::Index<(u16, u16)> for Grid {
    type Output = Cell;

    fn index(&self, index: (u16, u16)) -> &Self::Output {
        &self.cells[self.ravel(index)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initialize_bounds() {
        let mut grid = Grid::new(8, 8);
        assert!(grid.initialize(8, 8).is_ok());
        assert!(grid.initialize(3, 5).is_ok());
        assert_eq!(grid.width(), 3);
        assert_eq!(grid.height(), 5);
        assert!(matches!(
            grid.initialize(0, 5),
            Err(MazeError::InvalidDimensions { .. })
        ));
        assert!(matches!(
            grid.initialize(9, 5),
            Err(MazeError::InvalidDimensions { .. })
        ));
        assert!(matches!(
            grid.initialize(5, 0),
            Err(MazeError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_neighbor_edges() {
        let mut grid = Grid::new(4, 4);
        grid.initialize(4, 3).expect("valid dims");
        assert_eq!(grid.neighbor((0, 0), Direction::Left), None);
        assert_eq!(grid.neighbor((0, 0), Direction::Up), None);
        assert_eq!(grid.neighbor((0, 0), Direction::Right), Some((1, 0)));
        assert_eq!(grid.neighbor((3, 2), Direction::Right), None);
        assert_eq!(grid.neighbor((3, 2), Direction::Down), None);
        assert_eq!(grid.neighbor((3, 2), Direction::Up), Some((3, 1)));
    }

    #[test]
    fn test_remove_wall_symmetry() {
        let mut grid = Grid::new(5, 5);
        grid.initialize(5, 5).expect("valid dims");
        let dir = grid.remove_wall_between((1, 1), (1, 2));
        assert_eq!(dir, Direction::Down);
        assert!(!grid[(1, 1)].wall(Direction::Down));
        assert!(!grid[(1, 2)].wall(Direction::Up));
        assert!(grid.passage_open((1, 1), Direction::Down));
        assert!(grid.passage_open((1, 2), Direction::Up));
        // Other walls untouched.
        assert!(grid[(1, 1)].wall(Direction::Left));
        assert!(!grid.all_walls_intact((1, 1)));
        assert!(grid.all_walls_intact((0, 0)));
    }

    #[test]
    #[should_panic(expected = "not orthogonally adjacent")]
    fn test_remove_wall_rejects_non_adjacent() {
        let mut grid = Grid::new(5, 5);
        grid.initialize(5, 5).expect("valid dims");
        grid.remove_wall_between((1, 1), (2, 2));
    }

    #[test]
    fn test_passage_closed_across_boundary() {
        let mut grid = Grid::new(3, 3);
        grid.initialize(3, 3).expect("valid dims");
        assert!(!grid.passage_open((0, 0), Direction::Left));
        // Opening the boundary wall still yields no passage: there is no
        // neighbor cell outside the grid.
        grid.open_boundary((0, 0), Direction::Left);
        assert!(!grid[(0, 0)].wall(Direction::Left));
        assert!(!grid.passage_open((0, 0), Direction::Left));
    }

    #[test]
    fn test_reset_marks_keeps_walls() {
        let mut grid = Grid::new(3, 3);
        grid.initialize(3, 3).expect("valid dims");
        grid.remove_wall_between((0, 0), (1, 0));
        grid.cell_mut((0, 0)).visited = true;
        grid.cell_mut((1, 0)).path = Some(Direction::Left);
        grid.reset_marks();
        assert!(!grid[(0, 0)].visited);
        assert_eq!(grid[(1, 0)].path, None);
        assert!(grid.passage_open((0, 0), Direction::Right));
    }
}
