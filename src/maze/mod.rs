pub mod cell;
pub mod grid;

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicBool, Ordering},
    mpsc::SyncSender,
};

use crate::{
    error::MazeError,
    generators::{self, Generator},
    progress::{CancelToken, MazeEvent, Phase, Progress, ProgressWatch, StepHook},
    solvers::{self, Solver},
};

use cell::{Cell, Direction};
use grid::Grid;

/// Creates and solves perfect mazes over a fixed-capacity grid.
///
/// The grid is the single shared mutable structure; at most one generate or
/// solve invocation may be active at a time, enforced with an atomic busy
/// flag. Progress is published atomically per step, and an optional event
/// channel feeds an external renderer.
pub struct Maze {
    grid: Grid,
    entrance: Option<(u16, u16)>,
    exit: Option<(u16, u16)>,
    generated: bool,
    busy: AtomicBool,
    progress: Arc<Mutex<Progress>>,
    cancel: CancelToken,
    events: Option<SyncSender<MazeEvent>>,
    step_hook: Option<StepHook>,
}

impl Maze {
    /// Creates a maze with the given maximum capacity. `events`, when
    /// present, receives an incremental [`MazeEvent`] stream during every
    /// generate and solve call.
    pub fn new(max_width: u16, max_height: u16, events: Option<SyncSender<MazeEvent>>) -> Self {
        Maze {
            grid: Grid::new(max_width, max_height),
            entrance: None,
            exit: None,
            generated: false,
            busy: AtomicBool::new(false),
            progress: Arc::new(Mutex::new(Progress::default())),
            cancel: CancelToken::default(),
            events,
            step_hook: None,
        }
    }

    /// Installs a per-step callback, invoked once per algorithmic step of
    /// either carving or solving.
    pub fn set_step_hook(&mut self, hook: StepHook) {
        self.step_hook = Some(hook);
    }

    /// A cloneable token that cancels the in-flight operation at its next
    /// step boundary. The token stays triggered until [`CancelToken::reset`].
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// A shared handle for polling progress from another thread.
    pub fn progress_watch(&self) -> ProgressWatch {
        ProgressWatch(Arc::clone(&self.progress))
    }

    pub fn width(&self) -> u16 {
        self.grid.width()
    }

    pub fn height(&self) -> u16 {
        self.grid.height()
    }

    pub fn is_generated(&self) -> bool {
        self.generated
    }

    pub fn entrance(&self) -> Option<(u16, u16)> {
        self.entrance
    }

    pub fn exit(&self) -> Option<(u16, u16)> {
        self.exit
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn cell(&self, coord: (u16, u16)) -> &Cell {
        &self.grid[coord]
    }

    /// Iterates over the active cells in row-major order, for external
    /// renderers.
    pub fn cells(&self) -> impl Iterator<Item = ((u16, u16), &Cell)> {
        let width = self.grid.width();
        let height = self.grid.height();
        (0..height).flat_map(move |y| (0..width).map(move |x| ((x, y), &self.grid[(x, y)])))
    }

    /// Carves a fresh spanning-tree maze over a `width x height` active
    /// rectangle and designates entrance and exit. Any previous maze state
    /// is fully reset first. With `seed` set, repeated calls reproduce the
    /// carved grid bit-for-bit.
    pub fn generate(
        &mut self,
        width: u16,
        height: u16,
        generator: Generator,
        seed: Option<u64>,
    ) -> Result<(), MazeError> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            return Err(MazeError::Busy);
        }
        let result = self.generate_inner(width, height, generator, seed);
        self.set_phase(Phase::Idle);
        self.busy.store(false, Ordering::Release);
        result
    }

    fn generate_inner(
        &mut self,
        width: u16,
        height: u16,
        generator: Generator,
        seed: Option<u64>,
    ) -> Result<(), MazeError> {
        self.grid.initialize(width, height)?;
        self.entrance = None;
        self.exit = None;
        self.generated = false;
        self.emit(MazeEvent::Initialized { width, height });
        self.set_phase(Phase::Generating);
        tracing::info!(width, height, generator = %generator, seed, "generating maze");

        let mut rng = generators::get_rng(seed);
        generators::generate_maze(self, generator, &mut rng)?;

        self.generated = true;
        tracing::info!("maze generated");
        Ok(())
    }

    /// Finds the path from entrance to exit over the already-carved grid,
    /// returned as an ordered sequence of cell positions (both endpoints
    /// inclusive). Resets every cell's `visited`/`path` marks first.
    pub fn solve(&mut self, solver: Solver) -> Result<Vec<(u16, u16)>, MazeError> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            return Err(MazeError::Busy);
        }
        let result = self.solve_inner(solver);
        self.set_phase(Phase::Idle);
        self.busy.store(false, Ordering::Release);
        result
    }

    fn solve_inner(&mut self, solver: Solver) -> Result<Vec<(u16, u16)>, MazeError> {
        let (entrance, exit) = match (self.generated, self.entrance, self.exit) {
            (true, Some(entrance), Some(exit)) => (entrance, exit),
            _ => return Err(MazeError::NotGenerated),
        };
        self.grid.reset_marks();
        self.emit(MazeEvent::MarksCleared);
        self.set_phase(Phase::Solving);
        tracing::info!(solver = %solver, "solving maze");

        let path = solvers::solve_maze(self, solver, entrance, exit)?;
        self.emit(MazeEvent::Solved { len: path.len() });
        tracing::info!(len = path.len(), "path found");
        Ok(path)
    }

    fn set_phase(&self, phase: Phase) {
        if let Ok(mut progress) = self.progress.lock() {
            progress.phase = phase;
            progress.current = None;
            progress.steps = 0;
        }
    }

    /// One algorithmic step: checks cancellation, publishes the frontier
    /// cell, fires the pacing hook and emits a [`MazeEvent::Current`].
    pub(crate) fn step(&mut self, at: (u16, u16)) -> Result<(), MazeError> {
        if self.cancel.is_cancelled() {
            tracing::debug!(?at, "operation cancelled at step boundary");
            return Err(MazeError::Cancelled);
        }
        let snapshot = match self.progress.lock() {
            Ok(mut progress) => {
                progress.steps += 1;
                progress.current = Some(at);
                *progress
            }
            Err(_) => Progress::default(),
        };
        if let Some(hook) = self.step_hook.as_mut() {
            hook(snapshot);
        }
        self.emit(MazeEvent::Current {
            phase: snapshot.phase,
            at,
        });
        Ok(())
    }

    /// Carves the passage between two adjacent cells. Delegates to the
    /// grid's sole wall mutator, then publishes the update.
    pub(crate) fn carve_passage(&mut self, from: (u16, u16), to: (u16, u16)) {
        self.grid.remove_wall_between(from, to);
        self.emit(MazeEvent::WallRemoved { from, to });
    }

    pub(crate) fn open_boundary(&mut self, at: (u16, u16), side: Direction) {
        self.grid.open_boundary(at, side);
        self.emit(MazeEvent::BoundaryOpened { at, side });
    }

    pub(crate) fn set_endpoints(&mut self, entrance: (u16, u16), exit: (u16, u16)) {
        self.entrance = Some(entrance);
        self.exit = Some(exit);
        self.emit(MazeEvent::Endpoints { entrance, exit });
    }

    pub(crate) fn mark_visited(&mut self, at: (u16, u16)) {
        if !self.grid[at].visited {
            self.grid.cell_mut(at).visited = true;
            self.emit(MazeEvent::Visited { at });
        }
    }

    pub(crate) fn mark_path(&mut self, at: (u16, u16), dir: Option<Direction>) {
        let old = self.grid[at].path;
        if old != dir {
            self.grid.cell_mut(at).path = dir;
            self.emit(MazeEvent::PathMarked { at, old, new: dir });
        }
    }

    fn emit(&self, event: MazeEvent) {
        if let Some(tx) = &self.events {
            // A dropped receiver just means nobody is watching.
            let _ = tx.send(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc::sync_channel;

    #[test]
    fn test_solve_before_generate_is_not_generated() {
        let mut maze = Maze::new(8, 8, None);
        for solver in [
            Solver::RecursiveDfs,
            Solver::IterativeDfs,
            Solver::IterativeBfs,
            Solver::WallFollower,
        ] {
            assert_eq!(maze.solve(solver), Err(MazeError::NotGenerated));
        }
    }

    #[test]
    fn test_invalid_dimensions() {
        let mut maze = Maze::new(8, 8, None);
        assert!(matches!(
            maze.generate(0, 4, Generator::DepthFirst, Some(1)),
            Err(MazeError::InvalidDimensions { .. })
        ));
        assert!(matches!(
            maze.generate(9, 4, Generator::DepthFirst, Some(1)),
            Err(MazeError::InvalidDimensions { .. })
        ));
        assert!(!maze.is_generated());
    }

    #[test]
    fn test_busy_flag_rejects_second_invocation() {
        let mut maze = Maze::new(8, 8, None);
        maze.busy.store(true, Ordering::Release);
        assert_eq!(
            maze.generate(4, 4, Generator::DepthFirst, Some(1)),
            Err(MazeError::Busy)
        );
        assert_eq!(maze.solve(Solver::IterativeBfs), Err(MazeError::Busy));
        maze.busy.store(false, Ordering::Release);
        assert!(maze.generate(4, 4, Generator::DepthFirst, Some(1)).is_ok());
    }

    #[test]
    fn test_cancellation_at_step_boundary() {
        let mut maze = Maze::new(32, 32, None);
        let token = maze.cancel_token();
        let mut steps = 0u64;
        maze.set_step_hook(Box::new(move |_progress| {
            steps += 1;
            if steps == 5 {
                token.cancel();
            }
        }));
        assert_eq!(
            maze.generate(32, 32, Generator::DepthFirst, Some(7)),
            Err(MazeError::Cancelled)
        );
        assert!(!maze.is_generated());
        // A re-armed token lets the next run finish.
        maze.cancel_token().reset();
        maze.step_hook = None;
        assert!(maze.generate(32, 32, Generator::DepthFirst, Some(7)).is_ok());
    }

    #[test]
    fn test_progress_published_during_generate() {
        let mut maze = Maze::new(8, 8, None);
        let watch = maze.progress_watch();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_hook = Arc::clone(&seen);
        maze.set_step_hook(Box::new(move |progress| {
            if let Ok(mut all) = seen_hook.lock() {
                all.push(progress);
            }
        }));
        maze.generate(8, 8, Generator::BreadthFirst, Some(3))
            .expect("generate succeeds");

        let snapshots = seen.lock().expect("hook snapshots");
        assert!(!snapshots.is_empty());
        assert!(snapshots.iter().all(|p| p.phase == Phase::Generating));
        assert!(snapshots.iter().all(|p| p.current.is_some()));
        // Steps increase monotonically.
        assert!(snapshots.windows(2).all(|w| w[0].steps < w[1].steps));
        // Idle again once the call returns.
        assert_eq!(watch.get().phase, Phase::Idle);
    }

    #[test]
    fn test_event_stream_reflects_spanning_tree() {
        let (tx, rx) = sync_channel(4096);
        let mut maze = Maze::new(6, 6, Some(tx));
        maze.generate(6, 6, Generator::DepthFirst, Some(11))
            .expect("generate succeeds");

        let events: Vec<MazeEvent> = rx.try_iter().collect();
        assert_eq!(
            events.first(),
            Some(&MazeEvent::Initialized {
                width: 6,
                height: 6
            })
        );
        let walls = events
            .iter()
            .filter(|e| matches!(e, MazeEvent::WallRemoved { .. }))
            .count();
        // A spanning tree over w*h cells removes exactly w*h - 1 wall pairs.
        assert_eq!(walls, 6 * 6 - 1);
        let boundaries = events
            .iter()
            .filter(|e| matches!(e, MazeEvent::BoundaryOpened { .. }))
            .count();
        assert_eq!(boundaries, 2);
        assert!(
            events
                .iter()
                .any(|e| matches!(e, MazeEvent::Endpoints { .. }))
        );
    }

    #[test]
    fn test_entrance_and_exit_on_boundaries() {
        let mut maze = Maze::new(10, 10, None);
        maze.generate(10, 7, Generator::DepthFirst, Some(2))
            .expect("generate succeeds");
        let entrance = maze.entrance().expect("entrance designated");
        let exit = maze.exit().expect("exit designated");
        assert_eq!(entrance.0, 0);
        assert_eq!(exit.0, 9);
        assert!(!maze.cell(entrance).wall(Direction::Left));
        assert!(!maze.cell(exit).wall(Direction::Right));
    }

    #[test]
    fn test_cells_iterator_covers_active_rectangle() {
        let mut maze = Maze::new(9, 9, None);
        maze.generate(4, 3, Generator::BreadthFirst, Some(5))
            .expect("generate succeeds");
        let coords: Vec<(u16, u16)> = maze.cells().map(|(coord, _)| coord).collect();
        assert_eq!(coords.len(), 12);
        assert_eq!(coords[0], (0, 0));
        assert_eq!(coords[11], (3, 2));
    }
}
