use std::sync::{
    Arc, Mutex,
    atomic::{AtomicBool, Ordering},
};

use crate::maze::cell::Direction;

/// Which operation the maze is currently running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Generating,
    Solving,
}

/// Snapshot of a running operation, published atomically once per step so a
/// concurrent reader never observes a torn update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Progress {
    pub phase: Phase,
    /// The frontier cell of the current carve or search step.
    pub current: Option<(u16, u16)>,
    /// Steps taken since the operation started.
    pub steps: u64,
}

/// Shared read handle onto a maze's [`Progress`]. Cloneable and cheap;
/// intended for a driver thread polling while generate/solve runs elsewhere.
#[derive(Clone)]
pub struct ProgressWatch(pub(crate) Arc<Mutex<Progress>>);

impl ProgressWatch {
    pub fn get(&self) -> Progress {
        self.0.lock().map(|p| *p).unwrap_or_default()
    }
}

/// Cancellation signal checked at every carve/solve step boundary.
#[derive(Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    /// Re-arms the token after a cancelled run.
    pub fn reset(&self) {
        self.0.store(false, Ordering::Relaxed);
    }
}

/// Per-step callback for pacing and animation. Invoked once per algorithmic
/// step of either carving or solving; must not busy-wait.
pub type StepHook = Box<dyn FnMut(Progress) + Send>;

/// Incremental maze updates published to an optional bounded channel, for an
/// external renderer. Sends on a full channel block the compute side, which
/// is what paces the animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MazeEvent {
    /// A generate call re-initialized the active rectangle; every wall is
    /// intact again.
    Initialized { width: u16, height: u16 },
    /// The carver removed the wall pair between two adjacent cells.
    WallRemoved { from: (u16, u16), to: (u16, u16) },
    /// An entrance/exit opening was cut into the outer boundary.
    BoundaryOpened { at: (u16, u16), side: Direction },
    /// Entrance and exit cells were designated.
    Endpoints {
        entrance: (u16, u16),
        exit: (u16, u16),
    },
    /// The frontier cell of the running operation moved.
    Current { phase: Phase, at: (u16, u16) },
    /// A solver marked a cell as explored.
    Visited { at: (u16, u16) },
    /// A cell's path direction changed. The old value is carried so a
    /// renderer can revert the previous edge on backtrack.
    PathMarked {
        at: (u16, u16),
        old: Option<Direction>,
        new: Option<Direction>,
    },
    /// All visited/path marks were cleared ahead of a solve.
    MarksCleared,
    /// A solve finished with a path of `len` cells.
    Solved { len: usize },
}
