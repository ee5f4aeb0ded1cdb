use std::collections::VecDeque;

use rand::{Rng, rngs::StdRng};

use crate::{error::MazeError, maze::Maze};

use super::{random_start, unjoined_neighbors};

/// Breadth-first carve: the forward step is identical to the depth-first
/// variant, but pre-move locations go into a FIFO queue and backtracking
/// dequeues the oldest one. This is deliberately not a textbook
/// whole-frontier BFS; only the order of backtrack targets differs from the
/// stack variant, which gives the mode its distinct carve shape.
pub(crate) fn carve(maze: &mut Maze, rng: &mut StdRng) -> Result<(), MazeError> {
    let mut location = random_start(maze, rng);
    let mut queue = VecDeque::from([location]);

    while !queue.is_empty() {
        let neighbors = unjoined_neighbors(maze, location);
        if neighbors.is_empty() {
            if let Some(oldest) = queue.pop_front() {
                location = oldest;
            }
        } else {
            let next = neighbors[rng.random_range(0..neighbors.len())];
            maze.carve_passage(location, next);
            queue.push_back(location);
            location = next;
        }
        maze.step(location)?;
    }
    Ok(())
}
