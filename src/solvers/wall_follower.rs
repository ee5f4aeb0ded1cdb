use crate::{
    error::MazeError,
    maze::{Maze, cell::Direction},
};

/// Right-hand rule wall follower: a memory-less local heuristic.
///
/// State is just the current cell and a facing orientation, initially
/// `Right` toward the exit column. Each step probes relative-right, then
/// front, then left via the rotation table and moves into the first open
/// passage, adopting that absolute direction; if all three are blocked it
/// stays in place and flips the orientation 180 degrees, so the reverse
/// passage is taken on a later step. The maze graph is a tree, so the walk
/// is guaranteed to reach the exit without any visited bookkeeping; the
/// visited marks below are purely for rendering.
///
/// The raw walk enters dead ends and comes back out. Whenever it re-enters
/// a cell already on the recorded route, the excursion since that cell is
/// dropped, leaving exactly the unique simple path.
pub(crate) fn solve(
    maze: &mut Maze,
    entrance: (u16, u16),
    exit: (u16, u16),
) -> Result<Vec<(u16, u16)>, MazeError> {
    let mut current = entrance;
    let mut facing = Direction::Right;
    let mut path = vec![entrance];

    while current != exit {
        maze.step(current)?;
        maze.mark_visited(current);

        let mut moved = false;
        for dir in [facing.turn_right(), facing, facing.turn_left()] {
            if maze.grid().passage_open(current, dir) {
                if let Some(next) = maze.grid().neighbor(current, dir) {
                    current = next;
                    facing = dir;
                    moved = true;
                    break;
                }
            }
        }
        if moved {
            match path.iter().position(|&cell| cell == current) {
                Some(index) => path.truncate(index + 1),
                None => path.push(current),
            }
        } else {
            facing = facing.opposite();
        }
    }

    maze.mark_visited(exit);
    Ok(path)
}
