use crate::{
    error::MazeError,
    maze::{Maze, cell::Direction},
};

use super::ParentMap;

/// Iterative depth-first search with parent-chain reconstruction.
///
/// Pops a cell; if it is the exit, walks the parent map back to the
/// entrance. Otherwise marks it visited and pushes every wall-open,
/// unvisited neighbor with the current cell recorded as its parent. On a
/// spanning tree the visited check guarantees each cell at most one parent:
/// any second open neighbor of a cell is only reachable through the cell
/// itself.
pub(crate) fn solve(
    maze: &mut Maze,
    entrance: (u16, u16),
    exit: (u16, u16),
) -> Result<Vec<(u16, u16)>, MazeError> {
    let mut parents = ParentMap::new(maze.width(), maze.height());
    let mut stack = vec![entrance];

    while let Some(current) = stack.pop() {
        if current == exit {
            maze.mark_visited(exit);
            return Ok(parents.chain_to(exit));
        }
        maze.step(current)?;
        maze.mark_visited(current);

        for dir in Direction::SCAN_ORDER {
            if let Some(neighbor) = maze.grid().neighbor(current, dir) {
                if maze.grid().passage_open(current, dir) && !maze.cell(neighbor).visited {
                    parents.record(neighbor, current);
                    stack.push(neighbor);
                }
            }
        }
    }
    Err(MazeError::NoPathFound)
}
