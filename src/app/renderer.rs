use std::{
    io::{Stdout, Write},
    sync::{
        atomic::{AtomicBool, Ordering},
        mpsc::{Receiver, TryRecvError},
    },
    time::Duration,
};

use crossterm::{
    QueueableCommand, cursor, queue,
    style::{self, Color, Stylize},
    terminal::{self, ClearType},
};
use unicode_truncate::UnicodeTruncateStr;

use crate::{
    maze::cell::Direction,
    progress::{MazeEvent, Phase},
};

use super::UserActionEvent;

/// How the render loop ended.
pub(crate) enum RendererStatus {
    Completed,
    Cancelled,
}

/// One tile of the doubled render grid. A maze of `w x h` cells is drawn as
/// a `(2w+1) x (2h+1)` tile grid: odd coordinates are cell interiors, the
/// rest are walls and the gaps carved into them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tile {
    Wall,
    Open,
    Visited,
    Entrance,
    Exit,
    Route,
}

impl Tile {
    /// Rendered width of every tile, in terminal columns.
    const WIDTH: u16 = 2;
}

impl std::fmt::Display for Tile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let styled = match self {
            Tile::Wall => "⬜".with(Color::White),
            Tile::Open => "  ".with(Color::Reset),
            Tile::Visited => "* ".with(Color::Blue),
            Tile::Entrance => "🟩".with(Color::Green),
            Tile::Exit => "🟥".with(Color::Red),
            Tile::Route => "██".with(Color::Yellow),
        };

        #[cfg(debug_assertions)]
        {
            use unicode_width::UnicodeWidthStr;
            assert_eq!(
                styled.content().width(),
                Tile::WIDTH as usize,
                "Each tile must occupy exactly two character widths."
            );
        }

        write!(f, "{}", styled)
    }
}

/// Draws the [`MazeEvent`] stream incrementally onto the terminal.
pub(crate) struct Renderer {
    stdout: Stdout,
    tiles: Vec<Tile>,
    tile_width: u16,
    tile_height: u16,
    /// Tile coordinate of the frontier overlay, drawn on top of the buffer.
    current: Option<(u16, u16)>,
    /// Sleep between events; adjusted live by the speed controls.
    refresh: Duration,
    phase: Phase,
}

impl Renderer {
    pub(crate) const CELL_WIDTH: u16 = Tile::WIDTH;
    /// Rows reserved below the maze for the status line.
    pub(crate) const STATUS_ROWS: u16 = 2;
    const MAX_REFRESH: Duration = Duration::from_millis(250);

    pub(crate) fn new(refresh: Duration) -> Self {
        Renderer {
            stdout: std::io::stdout(),
            tiles: Vec::new(),
            tile_width: 0,
            tile_height: 0,
            current: None,
            refresh,
            phase: Phase::Idle,
        }
    }

    fn tile_index(&self, tile: (u16, u16)) -> usize {
        tile.1 as usize * self.tile_width as usize + tile.0 as usize
    }

    fn cell_tile(coord: (u16, u16)) -> (u16, u16) {
        (coord.0 * 2 + 1, coord.1 * 2 + 1)
    }

    /// The wall tile adjacent to a cell tile in the given direction.
    fn gap_tile(coord: (u16, u16), dir: Direction) -> (u16, u16) {
        let (cx, cy) = Renderer::cell_tile(coord);
        let (dx, dy) = dir.delta();
        ((cx as i32 + dx) as u16, (cy as i32 + dy) as u16)
    }

    /// Updates the buffer and repaints the tile, unless the frontier
    /// overlay currently covers it (it gets repainted when the overlay
    /// moves on).
    fn set_tile(&mut self, tile: (u16, u16), kind: Tile) -> std::io::Result<()> {
        let index = self.tile_index(tile);
        self.tiles[index] = kind;
        if self.current != Some(tile) {
            self.paint(tile)?;
        }
        Ok(())
    }

    fn paint(&mut self, tile: (u16, u16)) -> std::io::Result<()> {
        let kind = self.tiles[self.tile_index(tile)];
        queue!(
            self.stdout,
            cursor::MoveTo(tile.0 * Tile::WIDTH, tile.1),
            style::Print(kind)
        )?;
        Ok(())
    }

    fn overlay_glyph() -> style::StyledContent<&'static str> {
        "▓▓".with(Color::Red)
    }

    fn draw_all(&mut self) -> std::io::Result<()> {
        self.stdout.queue(cursor::MoveTo(0, 0))?;
        for y in 0..self.tile_height {
            for x in 0..self.tile_width {
                let kind = self.tiles[self.tile_index((x, y))];
                if self.current == Some((x, y)) {
                    self.stdout.queue(style::Print(Renderer::overlay_glyph()))?;
                } else {
                    self.stdout.queue(style::Print(kind))?;
                }
            }
            self.stdout.queue(style::Print("\r\n"))?;
        }
        self.stdout.flush()?;
        Ok(())
    }

    fn draw_status(&mut self, text: &str) -> std::io::Result<()> {
        let (term_width, _) = terminal::size()?;
        let (line, _) = text.unicode_truncate(term_width as usize);
        queue!(
            self.stdout,
            cursor::MoveTo(0, self.tile_height),
            terminal::Clear(ClearType::CurrentLine),
            style::PrintStyledContent(line.to_string().with(Color::Cyan))
        )?;
        Ok(())
    }

    fn apply(&mut self, event: &MazeEvent) -> std::io::Result<()> {
        match *event {
            MazeEvent::Initialized { width, height } => {
                self.tile_width = width * 2 + 1;
                self.tile_height = height * 2 + 1;
                self.current = None;
                // Every wall intact: only the cell interiors are open.
                self.tiles =
                    vec![Tile::Wall; self.tile_width as usize * self.tile_height as usize];
                for y in 0..height {
                    for x in 0..width {
                        let index = self.tile_index(Renderer::cell_tile((x, y)));
                        self.tiles[index] = Tile::Open;
                    }
                }
                self.draw_all()?;
            }
            MazeEvent::WallRemoved { from, to } => {
                let gap = (from.0 + to.0 + 1, from.1 + to.1 + 1);
                self.set_tile(gap, Tile::Open)?;
            }
            MazeEvent::BoundaryOpened { at, side } => {
                self.set_tile(Renderer::gap_tile(at, side), Tile::Open)?;
            }
            MazeEvent::Endpoints { entrance, exit } => {
                self.set_tile(Renderer::cell_tile(entrance), Tile::Entrance)?;
                self.set_tile(Renderer::cell_tile(exit), Tile::Exit)?;
            }
            MazeEvent::Current { phase, at } => {
                if phase != self.phase {
                    self.phase = phase;
                    let status = match phase {
                        Phase::Generating => "Carving maze...",
                        Phase::Solving => "Searching for the exit...",
                        Phase::Idle => "",
                    };
                    self.draw_status(status)?;
                }
                if let Some(old) = self.current.take() {
                    self.paint(old)?;
                }
                let tile = Renderer::cell_tile(at);
                queue!(
                    self.stdout,
                    cursor::MoveTo(tile.0 * Tile::WIDTH, tile.1),
                    style::Print(Renderer::overlay_glyph())
                )?;
                self.current = Some(tile);
            }
            MazeEvent::Visited { at } => {
                let tile = Renderer::cell_tile(at);
                if self.tiles[self.tile_index(tile)] == Tile::Open {
                    self.set_tile(tile, Tile::Visited)?;
                }
            }
            MazeEvent::PathMarked { at, old, new } => {
                if let Some(dir) = old {
                    self.set_tile(Renderer::gap_tile(at, dir), Tile::Open)?;
                }
                let cell = Renderer::cell_tile(at);
                let kind = self.tiles[self.tile_index(cell)];
                match new {
                    Some(dir) => {
                        self.set_tile(Renderer::gap_tile(at, dir), Tile::Route)?;
                        if kind != Tile::Entrance && kind != Tile::Exit {
                            self.set_tile(cell, Tile::Route)?;
                        }
                    }
                    None => {
                        if kind == Tile::Route {
                            self.set_tile(cell, Tile::Visited)?;
                        }
                    }
                }
            }
            MazeEvent::MarksCleared => {
                for tile in self.tiles.iter_mut() {
                    if *tile == Tile::Visited || *tile == Tile::Route {
                        *tile = Tile::Open;
                    }
                }
                self.current = None;
                self.draw_all()?;
            }
            MazeEvent::Solved { len } => {
                self.draw_status(&format!("Path found: {} cells.", len))?;
            }
        }
        self.stdout.flush()?;
        Ok(())
    }

    fn speed_up(&mut self) {
        self.refresh /= 2;
    }

    fn slow_down(&mut self) {
        self.refresh = if self.refresh.is_zero() {
            Duration::from_millis(1)
        } else {
            (self.refresh * 2).min(Renderer::MAX_REFRESH)
        };
    }

    fn park_cursor(&mut self) -> std::io::Result<()> {
        queue!(
            self.stdout,
            cursor::MoveTo(0, self.tile_height + Renderer::STATUS_ROWS - 1),
            cursor::Show
        )?;
        self.stdout.flush()?;
        Ok(())
    }

    /// Render loop: applies maze events as they arrive, paced by the
    /// current refresh interval, until the event channel disconnects or the
    /// run is cancelled.
    pub(crate) fn render(
        &mut self,
        event_rx: Receiver<MazeEvent>,
        action_rx: Receiver<UserActionEvent>,
        cancel: &AtomicBool,
        done: &AtomicBool,
    ) -> std::io::Result<RendererStatus> {
        queue!(self.stdout, terminal::Clear(ClearType::All), cursor::Hide)?;
        self.stdout.flush()?;

        loop {
            loop {
                match action_rx.try_recv() {
                    Ok(action) => {
                        tracing::debug!(?action, "renderer received user action");
                        match action {
                            UserActionEvent::SpeedUp => self.speed_up(),
                            UserActionEvent::SlowDown => self.slow_down(),
                            UserActionEvent::Redraw => self.draw_all()?,
                            UserActionEvent::Cancel => {
                                self.park_cursor()?;
                                return Ok(RendererStatus::Cancelled);
                            }
                        }
                    }
                    Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
                }
            }

            match event_rx.recv() {
                // Compute side finished and dropped its sender.
                Err(_) => break,
                Ok(event) => {
                    if cancel.load(Ordering::Relaxed) {
                        self.park_cursor()?;
                        return Ok(RendererStatus::Cancelled);
                    }
                    self.apply(&event)?;
                    std::thread::sleep(self.refresh);
                }
            }
        }

        self.park_cursor()?;
        done.store(true, Ordering::Relaxed);
        Ok(RendererStatus::Completed)
    }
}
