use rand::{Rng, SeedableRng, rngs::StdRng};

mod bfs;
mod dfs;

use crate::{
    error::MazeError,
    maze::{Maze, cell::Direction},
};

/// Maze generation algorithms. Both share the same forward-carve step and
/// differ only in the container holding backtrack targets, which changes the
/// carve shape but not the spanning-tree result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Generator {
    DepthFirst,
    BreadthFirst,
}

impl std::fmt::Display for Generator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Generator::DepthFirst => write!(f, "Depth-First Carving (stack backtrack)"),
            Generator::BreadthFirst => write!(f, "Breadth-First Carving (queue backtrack)"),
        }
    }
}

/// Get a random number generator, optionally seeded for reproducibility.
pub(crate) fn get_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_os_rng(),
    }
}

/// Carves a spanning tree over the maze's active rectangle with the chosen
/// algorithm, then designates entrance and exit from the same RNG stream.
pub(crate) fn generate_maze(
    maze: &mut Maze,
    generator: Generator,
    rng: &mut StdRng,
) -> Result<(), MazeError> {
    match generator {
        Generator::DepthFirst => dfs::carve(maze, rng)?,
        Generator::BreadthFirst => bfs::carve(maze, rng)?,
    }
    place_endpoints(maze, rng);
    Ok(())
}

/// In-bounds neighbors not yet joined to the tree, i.e. with all four walls
/// still intact. Valid as a visitation proxy only because carving is the
/// sole wall-mutating operation.
pub(crate) fn unjoined_neighbors(maze: &Maze, at: (u16, u16)) -> Vec<(u16, u16)> {
    let grid = maze.grid();
    Direction::SCAN_ORDER
        .iter()
        .filter_map(|&dir| grid.neighbor(at, dir))
        .filter(|&coord| grid.all_walls_intact(coord))
        .collect()
}

/// Picks a uniformly random starting cell, row first then column as the
/// seeded RNG stream expects.
pub(crate) fn random_start(maze: &Maze, rng: &mut StdRng) -> (u16, u16) {
    let row = rng.random_range(0..maze.height());
    let col = rng.random_range(0..maze.width());
    (col, row)
}

/// Entrance: random row at column 0, left boundary wall opened. Exit: random
/// row at the last column, right boundary wall opened. Replaces any previous
/// endpoints.
fn place_endpoints(maze: &mut Maze, rng: &mut StdRng) {
    let entrance = (0, rng.random_range(0..maze.height()));
    maze.open_boundary(entrance, Direction::Left);
    let exit = (maze.width() - 1, rng.random_range(0..maze.height()));
    maze.open_boundary(exit, Direction::Right);
    maze.set_endpoints(entrance, exit);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    fn carved(generator: Generator, width: u16, height: u16, seed: u64) -> Maze {
        let mut maze = Maze::new(width, height, None);
        maze.generate(width, height, generator, Some(seed))
            .expect("generate succeeds");
        maze
    }

    /// Interior wall pairs removed, counted once per adjacency.
    fn open_pairs(maze: &Maze) -> usize {
        maze.cells()
            .map(|(coord, _)| {
                [Direction::Right, Direction::Down]
                    .iter()
                    .filter(|&&dir| maze.grid().passage_open(coord, dir))
                    .count()
            })
            .sum()
    }

    /// Cells reachable from the origin through open passages.
    fn reachable(maze: &Maze) -> usize {
        let mut seen = vec![false; maze.width() as usize * maze.height() as usize];
        let ravel = |c: (u16, u16)| c.1 as usize * maze.width() as usize + c.0 as usize;
        let mut queue = VecDeque::from([(0u16, 0u16)]);
        seen[0] = true;
        let mut count = 0;
        while let Some(coord) = queue.pop_front() {
            count += 1;
            for dir in Direction::SCAN_ORDER {
                if maze.grid().passage_open(coord, dir) {
                    if let Some(nb) = maze.grid().neighbor(coord, dir) {
                        if !seen[ravel(nb)] {
                            seen[ravel(nb)] = true;
                            queue.push_back(nb);
                        }
                    }
                }
            }
        }
        count
    }

    fn wall_fingerprint(maze: &Maze) -> Vec<[bool; 4]> {
        maze.cells()
            .map(|(_, cell)| {
                [
                    cell.wall(Direction::Up),
                    cell.wall(Direction::Down),
                    cell.wall(Direction::Left),
                    cell.wall(Direction::Right),
                ]
            })
            .collect()
    }

    #[test]
    fn test_spanning_tree_property() {
        for generator in [Generator::DepthFirst, Generator::BreadthFirst] {
            for (width, height, seed) in [(3, 3, 1u64), (8, 5, 42), (16, 16, 7)] {
                let maze = carved(generator, width, height, seed);
                let cells = width as usize * height as usize;
                // Connected and acyclic: exactly cells - 1 open wall pairs
                // and every cell reachable.
                assert_eq!(open_pairs(&maze), cells - 1, "{generator} {width}x{height}");
                assert_eq!(reachable(&maze), cells, "{generator} {width}x{height}");
            }
        }
    }

    #[test]
    fn test_wall_symmetry_everywhere() {
        let maze = carved(Generator::DepthFirst, 12, 9, 99);
        for (coord, cell) in maze.cells() {
            for dir in Direction::SCAN_ORDER {
                if let Some(nb) = maze.grid().neighbor(coord, dir) {
                    assert_eq!(
                        cell.wall(dir),
                        maze.cell(nb).wall(dir.opposite()),
                        "asymmetric wall between {:?} and {:?}",
                        coord,
                        nb
                    );
                }
            }
        }
    }

    #[test]
    fn test_seeded_generation_is_deterministic() {
        for generator in [Generator::DepthFirst, Generator::BreadthFirst] {
            let a = carved(generator, 10, 10, 1234);
            let b = carved(generator, 10, 10, 1234);
            assert_eq!(wall_fingerprint(&a), wall_fingerprint(&b));
            assert_eq!(a.entrance(), b.entrance());
            assert_eq!(a.exit(), b.exit());
        }
    }

    #[test]
    fn test_regenerate_fully_resets_state() {
        let mut maze = Maze::new(10, 10, None);
        maze.generate(10, 10, Generator::DepthFirst, Some(5))
            .expect("generate succeeds");
        let first = wall_fingerprint(&maze);
        // Solving leaves visited/path marks behind.
        maze.solve(crate::solvers::Solver::IterativeBfs)
            .expect("solve succeeds");
        // A different carve in between must not leak into the re-run.
        maze.generate(10, 10, Generator::BreadthFirst, Some(6))
            .expect("generate succeeds");
        maze.generate(10, 10, Generator::DepthFirst, Some(5))
            .expect("generate succeeds");
        assert_eq!(wall_fingerprint(&maze), first);
        assert!(maze.cells().all(|(_, cell)| !cell.visited));
        assert!(maze.cells().all(|(_, cell)| cell.path.is_none()));
    }

    #[test]
    fn test_single_cell_maze() {
        let maze = carved(Generator::DepthFirst, 1, 1, 0);
        assert_eq!(maze.entrance(), Some((0, 0)));
        assert_eq!(maze.exit(), Some((0, 0)));
        // Both boundary openings cut into the one cell.
        assert!(!maze.cell((0, 0)).wall(Direction::Left));
        assert!(!maze.cell((0, 0)).wall(Direction::Right));
        assert_eq!(open_pairs(&maze), 0);
    }

    #[test]
    fn test_single_column_maze() {
        let maze = carved(Generator::BreadthFirst, 1, 8, 21);
        let entrance = maze.entrance().expect("entrance designated");
        let exit = maze.exit().expect("exit designated");
        // width - 1 == 0: both endpoints resolve to column 0.
        assert_eq!(entrance.0, 0);
        assert_eq!(exit.0, 0);
        assert_eq!(open_pairs(&maze), 7);
        assert_eq!(reachable(&maze), 8);
    }
}
