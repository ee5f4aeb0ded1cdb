use rand::{Rng, rngs::StdRng};

use crate::{error::MazeError, maze::Maze};

use super::{random_start, unjoined_neighbors};

/// Depth-first carve: walk to a random unjoined neighbor, knocking the wall
/// pair down and remembering the pre-move location on a stack; when the
/// current location has no unjoined neighbor left, pop the stack to
/// backtrack. Every step either joins a cell to the tree or backtracks, so
/// the loop ends after O(width * height) steps with a spanning tree.
pub(crate) fn carve(maze: &mut Maze, rng: &mut StdRng) -> Result<(), MazeError> {
    let mut location = random_start(maze, rng);
    let mut stack = vec![location];

    while !stack.is_empty() {
        let neighbors = unjoined_neighbors(maze, location);
        if neighbors.is_empty() {
            if let Some(previous) = stack.pop() {
                location = previous;
            }
        } else {
            let next = neighbors[rng.random_range(0..neighbors.len())];
            maze.carve_passage(location, next);
            // Remember the pre-move location so its remaining neighbors get
            // revisited on backtrack.
            stack.push(location);
            location = next;
        }
        maze.step(location)?;
    }
    Ok(())
}
