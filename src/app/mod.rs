mod renderer;

use std::{
    io::{Stdout, Write},
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
        mpsc::{Receiver, Sender},
    },
    time::Duration,
};

use crossterm::{
    ExecutableCommand, QueueableCommand, cursor,
    event::{self, KeyCode},
    queue,
    style::{self, Attribute, Color, Stylize},
    terminal::{self, ClearType},
};

use crate::{
    app::renderer::{Renderer, RendererStatus},
    error::MazeError,
    generators::Generator,
    maze::Maze,
    progress::MazeEvent,
    solvers::Solver,
};

enum UserInputEvent {
    KeyPress(event::KeyEvent),
    Resize,
}

#[derive(Debug)]
enum UserActionEvent {
    /// Terminal resize, repaint everything
    Redraw,
    /// Increase animation speed
    SpeedUp,
    /// Decrease animation speed
    SlowDown,
    /// Cancel rendering
    Cancel,
}

pub struct App {
    /// Timeout for receiving input events, a.k.a. how often to check for render done/cancel flags
    input_recv_timeout: Duration,
    /// Timeout for polling input events in the input thread, a.k.a.
    /// how often to check for render done/cancel flags
    user_input_event_poll_timeout: Duration,
    /// Initial per-event render delay; adjustable at runtime with the arrow keys
    initial_refresh: Duration,
}

impl Default for App {
    fn default() -> Self {
        Self {
            input_recv_timeout: Duration::from_millis(100),
            user_input_event_poll_timeout: Duration::from_millis(100),
            initial_refresh: Duration::from_micros(500),
        }
    }
}

impl App {
    /// Maximum number of maze events to buffer in the channel between compute and render threads
    const MAX_EVENTS_IN_CHANNEL_BUFFER: usize = 1024;
    /// Available carving variants
    const GENERATORS: [Generator; 2] = [Generator::DepthFirst, Generator::BreadthFirst];
    /// Available solving strategies
    const SOLVERS: [Solver; 4] = [
        Solver::RecursiveDfs,
        Solver::IterativeDfs,
        Solver::IterativeBfs,
        Solver::WallFollower,
    ];

    /// Set a panic hook to restore terminal state on panic
    /// This ensures that the terminal is not left in raw mode or alternate screen on panic
    /// even if the panic occurs in a different thread
    fn set_panic_hook() {
        let hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |panic_info| {
            let _ = App::restore_terminal(&mut std::io::stdout()); // ignore any errors as we are already failing
            hook(panic_info);
        }));
    }

    /// Setup terminal in raw mode and enter alternate screen
    /// Also sets a panic hook to restore terminal on panic
    pub fn setup_terminal(stdout: &mut Stdout) -> std::io::Result<()> {
        terminal::enable_raw_mode()?;
        App::set_panic_hook();
        crossterm::queue!(
            stdout,
            terminal::EnterAlternateScreen,
            terminal::Clear(ClearType::All),
            cursor::Hide,
            cursor::MoveTo(0, 0)
        )?;
        stdout.flush()?;
        Ok(())
    }

    /// Restore terminal to original state
    /// Leave alternate screen and disable raw mode
    pub fn restore_terminal(stdout: &mut Stdout) -> std::io::Result<()> {
        queue!(stdout, terminal::LeaveAlternateScreen, cursor::Show)?;
        stdout.flush()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    /// Main application loop
    pub fn run(&self, stdout: &mut Stdout) -> std::io::Result<()> {
        // Ask user for maze dimensions
        let (width, height) = match App::ask_maze_dimensions(stdout)? {
            Some(dims) => dims,
            None => {
                return Ok(());
            }
        };

        // Ask user for carving variant
        let generator = match App::select_from_menu(
            stdout,
            "Select maze carving variant (use arrow keys and Enter, or Esc to exit):",
            &App::GENERATORS,
        )? {
            Some(generator) => {
                stdout.execute(style::PrintStyledContent(
                    format!("Selected generator: {}\r\n", generator)
                        .with(Color::Green)
                        .attribute(Attribute::Bold),
                ))?;
                generator
            }
            None => {
                return Ok(());
            }
        };

        // Ask user for solving strategy
        let solver = match App::select_from_menu(
            stdout,
            "Select maze solving strategy (use arrow keys and Enter, or Esc to exit):",
            &App::SOLVERS,
        )? {
            Some(solver) => {
                stdout.execute(style::PrintStyledContent(
                    format!("Selected solver: {}\r\n", solver)
                        .with(Color::Green)
                        .attribute(Attribute::Bold),
                ))?;
                solver
            }
            None => {
                return Ok(());
            }
        };

        queue!(
            stdout,
            style::PrintStyledContent(
                "Controls:\r\n"
                    .with(Color::Yellow)
                    .attribute(Attribute::Bold)
            ),
            style::PrintStyledContent("  ↑/↓: Speed up/slow down animation\r\n".with(Color::Cyan)),
            style::PrintStyledContent("  Esc: Cancel and exit\r\n\r\n".with(Color::Cyan)),
            style::PrintStyledContent(
                "Press Enter to start...\r\n"
                    .with(Color::Blue)
                    .attribute(Attribute::Bold)
            ),
        )?;
        stdout.flush()?;
        if !App::wait_for_enter_or_esc()? {
            return Ok(());
        }

        // Flag to indicate rendering is done. Set to true by the render thread when it finishes.
        let render_done = Arc::new(AtomicBool::new(false));
        // Flag to indicate rendering should be cancelled. Set to true by the main thread on Esc key event.
        let render_cancel = Arc::new(AtomicBool::new(false));

        let (user_input_event_tx, user_input_event_rx) =
            std::sync::mpsc::channel::<UserInputEvent>();
        let user_input_event_poll_timeout = self.user_input_event_poll_timeout;
        let render_done_for_input = render_done.clone();
        let render_cancel_for_input = render_cancel.clone();
        // Spawn a thread to listen for user input
        let input_thread_handle = std::thread::spawn(move || -> std::io::Result<()> {
            App::listen_to_user_input(
                user_input_event_tx,
                user_input_event_poll_timeout,
                &render_done_for_input,
                &render_cancel_for_input,
            )
        });

        let (maze_event_tx, maze_event_rx) =
            std::sync::mpsc::sync_channel::<MazeEvent>(App::MAX_EVENTS_IN_CHANNEL_BUFFER);
        let (user_action_event_tx, user_action_event_rx) =
            std::sync::mpsc::channel::<UserActionEvent>();

        // Spawn a thread to listen for maze events and render the maze
        let initial_refresh = self.initial_refresh;
        let render_cancel_for_render = render_cancel.clone();
        let render_done_for_render = render_done.clone();
        let render_thread_handle = std::thread::spawn(move || {
            let mut renderer = Renderer::new(initial_refresh);
            renderer.render(
                maze_event_rx,
                user_action_event_rx,
                &render_cancel_for_render,
                &render_done_for_render,
            )
        });

        // Spawn a thread to generate and solve the maze. The cancel token is
        // cloned out before the maze moves into the thread so the main loop
        // can interrupt the computation at the next step boundary.
        let mut maze = Maze::new(width, height, Some(maze_event_tx));
        let cancel_token = maze.cancel_token();
        let compute_thread_handle =
            std::thread::spawn(move || -> Result<Vec<(u16, u16)>, MazeError> {
                maze.generate(width, height, generator, None)?;
                maze.solve(solver)
                // Maze is dropped here, as well as the maze_event_tx sender
            });

        // Main thread loop to listen for user input events during rendering
        self.app_loop(
            user_input_event_rx,
            user_action_event_tx,
            &render_done,
            &render_cancel,
            || cancel_token.cancel(),
        );

        // Wait for input thread to finish
        let _ = input_thread_handle.join();

        // Wait for compute thread to finish
        let outcome = compute_thread_handle
            .join()
            .expect("Compute thread panicked");

        // Wait for render thread to finish
        let completed = render_thread_handle
            .join()
            .expect("Render thread panicked")?;

        if let RendererStatus::Cancelled = completed {
            tracing::info!("Rendering was cancelled by user.");
            return Ok(());
        }

        let msg = match &outcome {
            Ok(path) => format!("Path found through {} cells! ", path.len()),
            Err(MazeError::Cancelled) => "Cancelled. ".to_string(),
            Err(e) => format!("Error: {} ", e),
        };
        stdout.execute(style::PrintStyledContent(
            msg.with(Color::Green).attribute(Attribute::Bold),
        ))?;

        stdout.execute(style::PrintStyledContent(
            "Press Esc to exit...\r\n"
                .with(Color::Blue)
                .attribute(Attribute::Bold),
        ))?;
        // Wait for user to press Esc
        App::wait_for_esc()?;
        Ok(())
    }

    /// Profiling mode: generate and solve repeatedly without rendering to terminal
    pub fn profile(
        &self,
        width: u16,
        height: u16,
        generator: Generator,
        solver: Solver,
        num_iterations: Option<usize>,
    ) -> std::io::Result<()> {
        let (maze_event_tx, maze_event_rx) =
            std::sync::mpsc::sync_channel::<MazeEvent>(App::MAX_EVENTS_IN_CHANNEL_BUFFER);

        // Spawn a thread to drain maze events so the compute side never blocks
        let render_thread_handle = std::thread::spawn(move || {
            loop {
                match maze_event_rx.recv() {
                    Err(_e) => {
                        // Channel disconnected, exit the thread
                        break;
                    }
                    Ok(_event) => {
                        // For profiling mode, we just discard the event
                    }
                }
            }
        });

        let compute_thread_handle =
            std::thread::spawn(move || -> Result<(), MazeError> {
                let mut maze = Maze::new(width, height, Some(maze_event_tx));
                for _ in 0..num_iterations.unwrap_or(1) {
                    maze.generate(width, height, generator, None)?;
                    let path = maze.solve(solver)?;
                    tracing::info!(len = path.len(), "profile iteration solved");
                }
                Ok(())
            });

        // Wait for compute thread to finish
        if let Err(e) = compute_thread_handle
            .join()
            .expect("Compute thread panicked")
        {
            tracing::error!(error = %e, "profile run failed");
        }

        // Wait for render thread to finish
        render_thread_handle.join().expect("Render thread panicked");

        Ok(())
    }

    /// App loop after starting input and render threads
    fn app_loop(
        &self,
        user_input_event_rx: Receiver<UserInputEvent>,
        user_action_event_tx: Sender<UserActionEvent>,
        render_done: &AtomicBool,
        render_cancel: &AtomicBool,
        cancel_compute: impl Fn(),
    ) {
        tracing::info!("Started main app loop");
        loop {
            // Check if render is done
            if render_done.load(Ordering::Relaxed) {
                // Drop the receiver to signal input thread to exit
                drop(user_input_event_rx);
                break;
            }

            let event = match user_input_event_rx.recv_timeout(self.input_recv_timeout) {
                Err(e) => {
                    match e {
                        std::sync::mpsc::RecvTimeoutError::Timeout => {
                            // Skip to next iteration to check render_done again
                            continue;
                        }
                        std::sync::mpsc::RecvTimeoutError::Disconnected => {
                            // Input thread has exited, break the loop
                            break;
                        }
                    }
                }
                Ok(event) => match event {
                    UserInputEvent::KeyPress(key_event) => {
                        match key_event.code {
                            // Exit on Esc key
                            KeyCode::Esc => {
                                tracing::debug!("[app loop] Esc key pressed, notifying renderer");
                                // Stop the computation at its next step boundary,
                                // then tell the renderer to bail out
                                cancel_compute();
                                // Error only happens if user_action_event_rx is dropped, which
                                // means Renderer::render has exited already
                                user_action_event_tx.send(UserActionEvent::Cancel).ok();
                                render_cancel.store(true, Ordering::Relaxed);
                                break;
                            }
                            KeyCode::Up => {
                                // Speed up animation
                                Some(UserActionEvent::SpeedUp)
                            }
                            KeyCode::Down => {
                                // Slow down animation
                                Some(UserActionEvent::SlowDown)
                            }
                            _ => None, // Ignore other keys
                        }
                    }
                    UserInputEvent::Resize => Some(UserActionEvent::Redraw),
                },
            };

            // Send the user action event to the render thread
            if let Some(event) = event {
                if user_action_event_tx.send(event).is_err() {
                    // Render thread has exited
                    break;
                }
            }
        }
        // The user_input_event_rx and user_action_event_tx are dropped here
        tracing::info!("Exiting main app loop");
    }

    /// Listen for user input events (key presses and resize)
    /// This function runs in a separate thread, and is the only place where user input is read
    fn listen_to_user_input(
        user_input_event_tx: Sender<UserInputEvent>,
        event_poll_timeout: Duration,
        render_done: &AtomicBool,
        render_cancel: &AtomicBool,
    ) -> std::io::Result<()> {
        loop {
            // Check if render is done or canceled
            if render_done.load(Ordering::Relaxed) || render_cancel.load(Ordering::Relaxed) {
                return Ok(());
            }

            // Poll for events with a timeout
            if !event::poll(event_poll_timeout)? {
                // No event available, continue loop to check flags again
                continue;
            }

            // Read the next event
            // We only care about key press events for now
            let input_event = match event::read()? {
                event::Event::Key(key_event) if key_event.kind == event::KeyEventKind::Press => {
                    UserInputEvent::KeyPress(key_event)
                }
                event::Event::Resize(_, _) => UserInputEvent::Resize,
                _ => continue, // Ignore other events
            };

            // Should exit input thread on Esc key
            let should_exit = matches!(
                input_event,
                UserInputEvent::KeyPress(event::KeyEvent {
                    code: KeyCode::Esc,
                    ..
                })
            );

            // Send the input event to the main thread
            if user_input_event_tx.send(input_event).is_err() {
                // Receiver has been dropped, exit the thread
                return Ok(());
            }

            if should_exit {
                tracing::debug!("[input loop] Esc key pressed, exiting");
                return Ok(());
            }
        }
    }

    /// Wait for the user to press the Esc key
    /// This function blocks until Esc is pressed
    fn wait_for_esc() -> std::io::Result<()> {
        loop {
            if let event::Event::Key(event::KeyEvent { code, kind, .. }) = event::read()? {
                if code == KeyCode::Esc && kind == event::KeyEventKind::Press {
                    break;
                }
            }
        }
        Ok(())
    }

    /// Wait for Enter (returns true) or Esc (returns false)
    fn wait_for_enter_or_esc() -> std::io::Result<bool> {
        loop {
            if let event::Event::Key(event::KeyEvent { code, kind, .. }) = event::read()? {
                if kind != event::KeyEventKind::Press {
                    continue;
                }
                match code {
                    KeyCode::Enter => return Ok(true),
                    KeyCode::Esc => return Ok(false),
                    _ => {}
                }
            }
        }
    }

    /// Get user input with real-time validation and feedback
    /// Returns None if user cancels input with Esc
    /// Returns Some(T) if user inputs a valid input and presses Enter, where T is the validated type
    fn prompt_with_validation<F, T>(
        stdout: &mut Stdout,
        prompt: &str,
        validate: F,
    ) -> std::io::Result<Option<T>>
    where
        F: Fn(&str) -> Result<T, String>,
    {
        // Save cursor position so we can restore / redraw
        queue!(stdout, cursor::Hide, cursor::SavePosition)?;
        stdout.flush()?;

        let mut input = String::new();

        let number_option = loop {
            // Re-render prompt line
            queue!(
                stdout,
                cursor::RestorePosition,
                terminal::Clear(ClearType::FromCursorDown)
            )?;

            // Print prompt
            stdout.queue(style::PrintStyledContent(
                prompt.with(Color::Cyan).attribute(Attribute::Bold),
            ))?;

            // Decide color based on validity
            let validation_result = validate(input.trim());
            match validation_result {
                Ok(_) => {
                    stdout.queue(style::SetForegroundColor(Color::Green))?;
                }
                Err(_) => {
                    stdout.queue(style::SetForegroundColor(Color::Red))?;
                }
            }

            queue!(stdout, style::Print(&input), style::ResetColor)?;

            stdout.queue(style::Print(" \r\n"))?;

            // Error message line (if any)
            if let Err(msg) = validation_result {
                stdout.queue(style::PrintStyledContent(
                    msg.with(Color::DarkGrey).attribute(Attribute::Dim),
                ))?;
            }

            stdout.flush()?;

            // Wait for key event
            if let event::Event::Key(event::KeyEvent { code, kind, .. }) = event::read()? {
                match code {
                    KeyCode::Enter => {
                        match validate(&input) {
                            Ok(n) => break Some(n), // valid number, exit loop
                            Err(_) => continue,     // invalid, re-render
                        }
                    }
                    KeyCode::Char(c) if kind == event::KeyEventKind::Press => {
                        if !c.is_whitespace() && !c.is_control() {
                            input.push(c);
                        }
                    }
                    KeyCode::Backspace => {
                        input.pop();
                    }
                    KeyCode::Esc => {
                        // User cancelled input
                        break None;
                    }
                    _ => {}
                }
            }
        };
        // Cleanup
        queue!(
            stdout,
            cursor::RestorePosition,
            terminal::Clear(ClearType::FromCursorDown),
            cursor::Show
        )?;
        stdout.flush()?;

        Ok(number_option)
    }

    /// Calculate max maze dimensions that fit the current terminal.
    /// A w x h maze renders as (2w+1) x (2h+1) tiles plus the status rows.
    fn get_max_maze_size(term_width: u16, term_height: u16) -> (u16, u16) {
        let max_width = ((term_width / Renderer::CELL_WIDTH).saturating_sub(1) / 2).max(1);
        let max_height = (term_height
            .saturating_sub(Renderer::STATUS_ROWS)
            .saturating_sub(1)
            / 2)
        .max(1);
        (max_width, max_height)
    }

    /// Ask user for maze dimensions
    /// Returns None if user cancels input with Esc
    /// Returns Some((width, height)) if user inputs valid dimensions
    fn ask_maze_dimensions(stdout: &mut Stdout) -> std::io::Result<Option<(u16, u16)>> {
        stdout.execute(style::PrintStyledContent(
            "Enter maze dimensions (or press Esc to exit). An empty input picks the \
largest maze that fits the current terminal.\r\n"
                .with(Color::Blue),
        ))?;

        // Validation closure, re-evaluated on every keystroke so a terminal
        // resize mid-prompt is picked up
        let validate = |s: &str, is_width| {
            let (max_width, max_height) = match terminal::size() {
                Ok((term_width, term_height)) => App::get_max_maze_size(term_width, term_height),
                // Fallback if terminal size cannot be determined
                Err(_) => (u16::MAX, u16::MAX),
            };
            let max_size = if is_width { max_width } else { max_height };

            if s.trim().is_empty() {
                return Ok(max_size);
            }

            let error_msg = format!("Please enter a valid number between 1 and {}.", max_size);
            s.parse::<u16>()
                .map_err(|_| error_msg.clone())
                .and_then(|n| match n {
                    1.. if n <= max_size => Ok(n),
                    _ => Err(error_msg),
                })
        };

        let validate_width = |s: &str| validate(s, true);
        let validate_height = |s: &str| validate(s, false);

        let width = match App::prompt_with_validation(stdout, "Width: ", validate_width)? {
            Some(w) => w,
            None => return Ok(None),
        };
        stdout.execute(style::PrintStyledContent(
            format!("Width set to {}\r\n", width)
                .with(Color::Green)
                .attribute(Attribute::Bold),
        ))?;

        let height = match App::prompt_with_validation(stdout, "Height: ", validate_height)? {
            Some(h) => h,
            None => return Ok(None),
        };
        stdout.execute(style::PrintStyledContent(
            format!("Height set to {}\r\n", height)
                .with(Color::Green)
                .attribute(Attribute::Bold),
        ))?;

        Ok(Some((width, height)))
    }

    /// Present a menu of options to the user and let them select one using arrow keys
    /// Returns None if user cancels input with Esc
    /// Returns Some(T) if user selects an option and presses Enter, where T is the option type
    fn select_from_menu<T: std::fmt::Display + Copy>(
        stdout: &mut Stdout,
        prompt: &str,
        options: &[T],
    ) -> std::io::Result<Option<T>> {
        if options.is_empty() {
            return Ok(None);
        }

        // Save cursor position so we can restore / redraw
        queue!(stdout, cursor::Hide, cursor::SavePosition)?;

        let mut selected = 0;

        let selected_option = loop {
            // Re-render prompt line
            queue!(
                stdout,
                cursor::RestorePosition,
                terminal::Clear(ClearType::FromCursorDown)
            )?;

            // Print prompt
            stdout.queue(style::PrintStyledContent(prompt.with(Color::Yellow)))?;

            // Print options
            for (i, option) in options.iter().enumerate() {
                if i == selected {
                    stdout.queue(style::SetAttribute(Attribute::Reverse))?;
                }
                stdout.queue(style::Print(format!("\r\n{}", option)))?;
                if i == selected {
                    stdout.queue(style::SetAttribute(Attribute::NoReverse))?;
                }
            }
            stdout.queue(style::Print("\r\n"))?;

            stdout.flush()?;

            // Wait for key event
            if let event::Event::Key(event::KeyEvent { code, kind, .. }) = event::read()? {
                if kind != event::KeyEventKind::Press {
                    // Only handle key press events
                    continue;
                }
                match code {
                    KeyCode::Up => {
                        selected = match selected {
                            0 => options.len() - 1,
                            _ => selected - 1,
                        };
                    }
                    KeyCode::Down => {
                        selected = if selected >= options.len() - 1 {
                            0
                        } else {
                            selected + 1
                        };
                    }
                    KeyCode::Enter => {
                        break Some(options[selected]);
                    }
                    KeyCode::Esc => {
                        // User cancelled input
                        break None;
                    }
                    _ => {}
                }
            }
        };
        // Cleanup
        queue!(
            stdout,
            cursor::RestorePosition,
            terminal::Clear(ClearType::FromCursorDown),
            cursor::Show
        )?;
        stdout.flush()?;

        Ok(selected_option)
    }
}
