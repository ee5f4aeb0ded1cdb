use crate::{
    error::MazeError,
    maze::{Maze, cell::Direction},
};

/// Backtracking search in recursion order, kept as a demonstration
/// strategy. The call stack of the textbook recursive version would grow
/// with the path length (up to width * height), so the recursion is
/// expressed as explicit frames instead; the observable behavior is
/// unchanged: cells are marked visited on entry, neighbors are tried in the
/// fixed Left/Right/Up/Down order, the cell's path direction is set before
/// descending and cleared back to None when every direction fails.
pub(crate) fn solve(
    maze: &mut Maze,
    entrance: (u16, u16),
    exit: (u16, u16),
) -> Result<Vec<(u16, u16)>, MazeError> {
    #[derive(Clone, Copy)]
    struct Frame {
        at: (u16, u16),
        /// Next index into [`Direction::SCAN_ORDER`] to try.
        scan: usize,
    }

    let mut frames = vec![Frame {
        at: entrance,
        scan: 0,
    }];

    while let Some(&Frame { at, scan }) = frames.last() {
        if scan == 0 {
            // Frame entry: the success and already-visited checks come
            // before any marking.
            if at == exit {
                maze.mark_visited(at);
                // The live frames are exactly the entrance-to-exit chain.
                return Ok(frames.iter().map(|frame| frame.at).collect());
            }
            if maze.cell(at).visited {
                frames.pop();
                continue;
            }
            maze.step(at)?;
            maze.mark_visited(at);
        } else if scan < Direction::SCAN_ORDER.len() {
            maze.step(at)?;
        } else {
            // All four directions failed: true backtrack. The cell stays
            // visited to prevent re-entry, only its path mark is undone.
            maze.mark_path(at, None);
            frames.pop();
            continue;
        }

        let dir = Direction::SCAN_ORDER[scan];
        if let Some(frame) = frames.last_mut() {
            frame.scan += 1;
        }
        if let Some(neighbor) = maze.grid().neighbor(at, dir) {
            if maze.grid().passage_open(at, dir) {
                maze.mark_path(at, Some(dir));
                frames.push(Frame {
                    at: neighbor,
                    scan: 0,
                });
            }
        }
    }
    Err(MazeError::NoPathFound)
}
