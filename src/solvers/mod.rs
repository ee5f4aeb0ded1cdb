mod bfs;
mod dfs;
mod recursive_dfs;
mod wall_follower;

use crate::{
    error::MazeError,
    maze::{Maze, cell::Direction},
};

/// Maze solving strategies. The carved graph is a spanning tree, so all
/// four discover the same unique entrance-to-exit path and differ only in
/// traversal order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Solver {
    /// Backtracking in recursion order; demonstration strategy.
    RecursiveDfs,
    IterativeDfs,
    IterativeBfs,
    /// Right-hand rule; memory-less local heuristic.
    WallFollower,
}

impl std::fmt::Display for Solver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Solver::RecursiveDfs => write!(f, "Recursive Depth-First Search (demonstration)"),
            Solver::IterativeDfs => write!(f, "Iterative Depth-First Search (DFS)"),
            Solver::IterativeBfs => write!(f, "Iterative Breadth-First Search (BFS)"),
            Solver::WallFollower => write!(f, "Wall Follower (right-hand rule)"),
        }
    }
}

/// Runs the chosen strategy over the carved grid. The recursive variant
/// records path directions while it searches; the others get the route
/// marked after reconstruction, for rendering only.
pub(crate) fn solve_maze(
    maze: &mut Maze,
    solver: Solver,
    entrance: (u16, u16),
    exit: (u16, u16),
) -> Result<Vec<(u16, u16)>, MazeError> {
    let path = match solver {
        Solver::RecursiveDfs => recursive_dfs::solve(maze, entrance, exit),
        Solver::IterativeDfs => dfs::solve(maze, entrance, exit),
        Solver::IterativeBfs => bfs::solve(maze, entrance, exit),
        Solver::WallFollower => wall_follower::solve(maze, entrance, exit),
    }?;
    if !matches!(solver, Solver::RecursiveDfs) {
        mark_route(maze, &path);
    }
    Ok(path)
}

fn mark_route(maze: &mut Maze, path: &[(u16, u16)]) {
    for pair in path.windows(2) {
        if let Some(dir) = Direction::between(pair[0], pair[1]) {
            maze.mark_path(pair[0], Some(dir));
        }
    }
}

/// Index-based parent map local to one solve call. Cells are addressed by
/// their row-major index within the active rectangle; no references into
/// the grid are stored.
pub(crate) struct ParentMap {
    parents: Vec<Option<usize>>,
    width: u16,
}

impl ParentMap {
    pub(crate) fn new(width: u16, height: u16) -> Self {
        ParentMap {
            parents: vec![None; width as usize * height as usize],
            width,
        }
    }

    fn ravel(&self, coord: (u16, u16)) -> usize {
        coord.1 as usize * self.width as usize + coord.0 as usize
    }

    fn unravel(&self, index: usize) -> (u16, u16) {
        (
            (index % self.width as usize) as u16,
            (index / self.width as usize) as u16,
        )
    }

    pub(crate) fn record(&mut self, child: (u16, u16), parent: (u16, u16)) {
        let idx = self.ravel(child);
        self.parents[idx] = Some(self.ravel(parent));
    }

    /// Walks the parent chain from `goal` back to its root and returns the
    /// root-to-goal sequence, both endpoints inclusive.
    pub(crate) fn chain_to(&self, goal: (u16, u16)) -> Vec<(u16, u16)> {
        let mut path = vec![goal];
        let mut index = self.ravel(goal);
        while let Some(parent) = self.parents[index] {
            path.push(self.unravel(parent));
            index = parent;
        }
        path.reverse();
        path
    }
}
