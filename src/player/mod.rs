//! Player: plays a recorded turtle presentation in the terminal.
//!
//! Consumes a `PlayablePresentation` and drives it to the terminal at the
//! recorded frame rate. It never looks at turtles or canvases; the frames
//! are the whole script.

use std::io::{self, Write};
use std::time::{Duration, Instant};

use anyhow::{Result, bail};
use crossterm::{cursor, event, execute, queue, style, terminal};

use crate::types::{Cell, Color, Frame, NamedColor, PlayablePresentation, TerminalContract};

/// Rows reserved above the canvas for the menu bar.
const CANVAS_OFFSET: u16 = 1;

pub struct Player {
    presentation: PlayablePresentation,
    current_frame: usize,
    grid: Vec<Vec<Cell>>,
    paused: bool,
}

impl Player {
    /// The cell grid is only allocated once `play` has checked the
    /// presentation fits the terminal.
    pub fn new(presentation: PlayablePresentation) -> Self {
        Self {
            presentation,
            current_frame: 0,
            grid: Vec::new(),
            paused: false,
        }
    }

    /// Play the presentation in the terminal.
    ///
    /// Sets up the terminal, enters the event loop, and restores the terminal
    /// on exit (even on error).
    pub fn play(&mut self) -> Result<()> {
        if self.presentation.frames.is_empty() {
            bail!("Presentation has no frames");
        }

        let (term_w, term_h) = terminal::size()?;
        check_fits(self.presentation.contract, term_w, term_h)?;

        let mut stdout = io::stdout();
        terminal::enable_raw_mode()?;
        execute!(
            stdout,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            terminal::Clear(terminal::ClearType::All),
        )?;

        let result = self.run_loop(&mut stdout);

        // Always restore terminal state.
        let _ = execute!(stdout, cursor::Show, terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();

        result
    }

    fn last_frame(&self) -> usize {
        self.presentation.frames.len().saturating_sub(1)
    }

    fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.presentation.frame_interval_ms.max(1))
    }

    // -----------------------------------------------------------------------
    // Event loop
    // -----------------------------------------------------------------------

    fn run_loop(&mut self, stdout: &mut io::Stdout) -> Result<()> {
        self.rebuild_grid(0);
        render_menubar(stdout)?;
        self.render_full(stdout)?;
        self.render_status(stdout)?;

        let mut next_frame_at = Instant::now() + self.frame_interval();

        loop {
            let playing = !self.paused && self.current_frame < self.last_frame();
            let timeout = if playing {
                next_frame_at.saturating_duration_since(Instant::now())
            } else {
                Duration::from_secs(3600)
            };

            if !event::poll(timeout)? {
                if playing {
                    self.step_forward(stdout)?;
                    next_frame_at += self.frame_interval();
                }
                continue;
            }

            match event::read()? {
                event::Event::Key(key) => {
                    use event::KeyCode::*;
                    match key.code {
                        Char('q') | Esc => break,
                        Char(' ') => {
                            self.paused = !self.paused;
                            next_frame_at = Instant::now() + self.frame_interval();
                            self.render_status(stdout)?;
                        }
                        Right => {
                            self.paused = true;
                            self.step_forward(stdout)?;
                        }
                        Left => {
                            self.paused = true;
                            if self.current_frame > 0 {
                                self.seek(stdout, self.current_frame - 1)?;
                            }
                        }
                        Home => {
                            self.seek(stdout, 0)?;
                            next_frame_at = Instant::now() + self.frame_interval();
                        }
                        End => self.seek(stdout, self.last_frame())?,
                        _ => {}
                    }
                }
                event::Event::Resize(_, _) => {
                    render_menubar(stdout)?;
                    self.render_full(stdout)?;
                    self.render_status(stdout)?;
                }
                _ => {}
            }
        }

        Ok(())
    }

    fn step_forward(&mut self, stdout: &mut io::Stdout) -> Result<()> {
        if self.current_frame < self.last_frame() {
            self.current_frame += 1;
            self.apply_frame(self.current_frame);
            self.render_diff(stdout, self.current_frame)?;
        }
        self.render_status(stdout)
    }

    fn seek(&mut self, stdout: &mut io::Stdout, target: usize) -> Result<()> {
        self.current_frame = target;
        self.rebuild_grid(target);
        self.render_full(stdout)?;
        self.render_status(stdout)
    }

    // -----------------------------------------------------------------------
    // Grid management
    // -----------------------------------------------------------------------

    fn apply_frame(&mut self, index: usize) {
        match &self.presentation.frames[index] {
            Frame::Full { cells } => {
                self.grid = cells.clone();
            }
            Frame::Diff { changes } => {
                for change in changes {
                    let x = change.x as usize;
                    let y = change.y as usize;
                    if let Some(cell) = self.grid.get_mut(y).and_then(|row| row.get_mut(x)) {
                        *cell = change.cell.clone();
                    }
                }
            }
        }
    }

    fn rebuild_grid(&mut self, target: usize) {
        let w = self.presentation.contract.width as usize;
        let h = self.presentation.contract.height as usize;
        self.grid = vec![vec![Cell::default(); w]; h];
        for i in 0..=target {
            self.apply_frame(i);
        }
    }

    // -----------------------------------------------------------------------
    // Terminal output
    // -----------------------------------------------------------------------

    fn render_full(&self, stdout: &mut io::Stdout) -> Result<()> {
        for (y, row) in self.grid.iter().enumerate() {
            queue!(stdout, cursor::MoveTo(0, canvas_row(y as u16)))?;
            for cell in row {
                queue!(stdout, style::PrintStyledContent(styled(cell)))?;
            }
        }
        stdout.flush()?;
        Ok(())
    }

    fn render_diff(&self, stdout: &mut io::Stdout, frame_index: usize) -> Result<()> {
        match &self.presentation.frames[frame_index] {
            Frame::Diff { changes } => {
                for change in changes {
                    queue!(
                        stdout,
                        cursor::MoveTo(change.x, canvas_row(change.y)),
                        style::PrintStyledContent(styled(&change.cell)),
                    )?;
                }
                stdout.flush()?;
            }
            Frame::Full { .. } => self.render_full(stdout)?,
        }
        Ok(())
    }

    fn render_status(&self, stdout: &mut io::Stdout) -> Result<()> {
        let status_y = canvas_row(self.presentation.contract.height);
        let (_, term_h) = terminal::size()?;
        if status_y >= term_h {
            return Ok(()); // No room for status bar.
        }

        let state = if self.current_frame == self.last_frame() {
            "done"
        } else if self.paused {
            "paused"
        } else {
            "playing"
        };
        let status = format!(
            " Frame {}/{} | {} ",
            self.current_frame + 1,
            self.presentation.frames.len(),
            state,
        );

        let mut cs = style::ContentStyle::default();
        cs.attributes.set(style::Attribute::Dim);

        queue!(
            stdout,
            cursor::MoveTo(0, status_y),
            terminal::Clear(terminal::ClearType::CurrentLine),
            style::PrintStyledContent(style::StyledContent::new(cs, status)),
        )?;
        stdout.flush()?;
        Ok(())
    }
}

/// Canvas plus one menu row above and one status row below.
fn check_fits(contract: TerminalContract, term_w: u16, term_h: u16) -> Result<()> {
    let need_w = contract.width;
    let need_h = u32::from(contract.height) + 2;
    if term_w < need_w || u32::from(term_h) < need_h {
        bail!("Terminal too small: need {need_w}x{need_h}, have {term_w}x{term_h}");
    }
    Ok(())
}

fn canvas_row(y: u16) -> u16 {
    y.saturating_add(CANVAS_OFFSET)
}

fn render_menubar(stdout: &mut io::Stdout) -> Result<()> {
    let items: &[(&str, &str)] = &[
        ("[Space]", " pause"),
        ("[←][→]", " step"),
        ("[Home]", " restart"),
        ("[End]", " last"),
        ("[q][Esc]", " quit"),
    ];

    queue!(
        stdout,
        cursor::MoveTo(0, 0),
        terminal::Clear(terminal::ClearType::CurrentLine),
        style::Print(" "),
    )?;
    for (i, (keys, label)) in items.iter().enumerate() {
        if i > 0 {
            queue!(stdout, style::Print("  "))?;
        }
        queue!(
            stdout,
            style::SetAttribute(style::Attribute::Bold),
            style::Print(keys),
            style::SetAttribute(style::Attribute::Reset),
            style::SetAttribute(style::Attribute::Dim),
            style::Print(label),
            style::SetAttribute(style::Attribute::Reset),
        )?;
    }
    stdout.flush()?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Style conversion
// ---------------------------------------------------------------------------

fn styled(cell: &Cell) -> style::StyledContent<char> {
    let mut cs = style::ContentStyle::default();
    if let Some(fg) = &cell.fg {
        cs.foreground_color = Some(to_ct_color(fg));
    }
    style::StyledContent::new(cs, cell.ch)
}

pub fn to_ct_color(c: &Color) -> style::Color {
    match c {
        Color::Named(n) => match n {
            NamedColor::Black => style::Color::Black,
            NamedColor::Red => style::Color::Red,
            NamedColor::Green => style::Color::Green,
            NamedColor::Yellow => style::Color::Yellow,
            NamedColor::Blue => style::Color::Blue,
            NamedColor::Magenta => style::Color::Magenta,
            NamedColor::Cyan => style::Color::Cyan,
            NamedColor::White => style::Color::White,
        },
        Color::Rgb { r, g, b } => style::Color::Rgb {
            r: *r,
            g: *g,
            b: *b,
        },
    }
}
