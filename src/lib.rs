//! Perfect-maze generation and solving.
//!
//! A [`maze::Maze`] owns a fixed-capacity grid of wall-flag cells. Each call
//! to [`maze::Maze::generate`] carves a random spanning tree over an active
//! sub-rectangle of that grid and designates an entrance and an exit on the
//! left and right boundaries; [`maze::Maze::solve`] then finds the unique
//! path between them with one of four interchangeable strategies. The
//! [`app`] module drives both on a background thread and animates them in
//! the terminal.

pub mod app;
pub mod error;
pub mod generators;
pub mod maze;
pub mod progress;
pub mod solvers;

pub use error::MazeError;
pub use maze::Maze;
