use std::fmt;

/// Errors reported by [`crate::Maze`] operations.
///
/// `NoPathFound` is defined for robustness but is unreachable on a correctly
/// carved grid: carving always produces a spanning tree, so exactly one path
/// exists between any two cells. It is surfaced rather than swallowed to keep
/// that invariant testable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MazeError {
    /// Requested dimensions are zero or exceed the grid capacity.
    InvalidDimensions {
        width: u16,
        height: u16,
        max_width: u16,
        max_height: u16,
    },
    /// `solve` was called before any successful `generate`.
    NotGenerated,
    /// A generate or solve invocation is already in flight.
    Busy,
    /// The search exhausted the grid without reaching the exit.
    NoPathFound,
    /// The cancellation token was triggered at a step boundary.
    Cancelled,
}

impl fmt::Display for MazeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MazeError::InvalidDimensions {
                width,
                height,
                max_width,
                max_height,
            } => write!(
                f,
                "invalid maze dimensions {}x{} (must be between 1x1 and {}x{})",
                width, height, max_width, max_height
            ),
            MazeError::NotGenerated => write!(f, "no maze has been generated yet"),
            MazeError::Busy => write!(f, "another generate or solve operation is in flight"),
            MazeError::NoPathFound => write!(f, "no path between entrance and exit"),
            MazeError::Cancelled => write!(f, "operation was cancelled"),
        }
    }
}

impl std::error::Error for MazeError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = MazeError::InvalidDimensions {
            width: 0,
            height: 7,
            max_width: 64,
            max_height: 64,
        };
        assert_eq!(
            err.to_string(),
            "invalid maze dimensions 0x7 (must be between 1x1 and 64x64)"
        );
        assert_eq!(
            MazeError::Busy.to_string(),
            "another generate or solve operation is in flight"
        );
    }
}
