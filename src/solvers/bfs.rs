use std::collections::VecDeque;

use crate::{
    error::MazeError,
    maze::{Maze, cell::Direction},
};

use super::ParentMap;

/// Iterative breadth-first search. Identical to the depth-first variant
/// except for the FIFO queue; on the spanning tree both discover the same
/// unique path, only the scan order of the animation differs.
pub(crate) fn solve(
    maze: &mut Maze,
    entrance: (u16, u16),
    exit: (u16, u16),
) -> Result<Vec<(u16, u16)>, MazeError> {
    let mut parents = ParentMap::new(maze.width(), maze.height());
    let mut queue = VecDeque::from([entrance]);

    while let Some(current) = queue.pop_front() {
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
                    queue.push_back(neighbor);
                }
            }
        }
    }
    Err(MazeError::NoPathFound)
}
