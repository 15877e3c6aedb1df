use std::io::{self, Write};
use std::time::Duration;

use crossterm::{
    cursor,
    event::{self, Event as CrosstermEvent},
    execute, queue,
    style::{Attribute, Color as CtColor, SetAttribute, SetBackgroundColor, SetForegroundColor},
    terminal,
};

use crate::buffer::{Buffer, Cell};
use crate::page::Page;
use crate::text::char_width;
use crate::types::{Rgb, TextStyle};

/// Raw-mode, alternate-screen terminal that paints a [`Page`].
///
/// Restores the terminal on drop.
pub struct Terminal {
    stdout: io::Stdout,
    previous_buffer: Buffer,
}

impl Terminal {
    pub fn new() -> io::Result<Self> {
        let mut stdout = io::stdout();

        terminal::enable_raw_mode()?;
        execute!(
            stdout,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            event::EnableMouseCapture
        )?;

        let (width, height) = terminal::size()?;
        Ok(Self {
            stdout,
            previous_buffer: Buffer::new(width, height),
        })
    }

    pub fn size(&self) -> (u16, u16) {
        (self.previous_buffer.width(), self.previous_buffer.height())
    }

    /// Wait up to `timeout` for input and drain everything pending.
    /// `None` blocks until one event arrives.
    pub fn poll(&self, timeout: Option<Duration>) -> io::Result<Vec<CrosstermEvent>> {
        let mut events = Vec::new();

        let has_event = match timeout {
            Some(dur) => event::poll(dur)?,
            None => {
                events.push(event::read()?);
                return Ok(events);
            }
        };

        if has_event {
            events.push(event::read()?);
            while event::poll(Duration::ZERO)? {
                events.push(event::read()?);
            }
        }

        Ok(events)
    }

    pub fn render(&mut self, page: &mut Page) -> io::Result<()> {
        let (width, height) = terminal::size()?;
        if width != self.previous_buffer.width() || height != self.previous_buffer.height() {
            // Force a full repaint after a resize
            execute!(self.stdout, terminal::Clear(terminal::ClearType::All))?;
            self.previous_buffer = Buffer::new(width, height);
            self.previous_buffer = invalidated(&self.previous_buffer);
        }

        let buffer = page.render(width, height);
        self.flush_diff(&buffer)?;
        self.previous_buffer = buffer;
        Ok(())
    }

    fn flush_diff(&mut self, buffer: &Buffer) -> io::Result<()> {
        let mut last: Option<(u16, u16)> = None;
        let mut last_char_width: u16 = 1;
        let mut pen = Pen::default();

        queue!(self.stdout, SetAttribute(Attribute::Reset))?;

        for (x, y, cell) in buffer.diff(&self.previous_buffer) {
            if cell.wide_continuation {
                continue;
            }

            let sequential = matches!(last, Some((lx, ly)) if ly == y && lx + last_char_width == x);
            if !sequential {
                queue!(self.stdout, cursor::MoveTo(x, y))?;
            }

            pen.apply(&mut self.stdout, cell)?;
            write!(self.stdout, "{}", cell.char)?;

            last = Some((x, y));
            last_char_width = char_width(cell.char).max(1) as u16;
        }

        queue!(self.stdout, SetAttribute(Attribute::Reset))?;
        self.stdout.flush()
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        let _ = execute!(
            self.stdout,
            event::DisableMouseCapture,
            cursor::Show,
            terminal::LeaveAlternateScreen
        );
        let _ = terminal::disable_raw_mode();
    }
}

/// A buffer that differs from every rendered cell, so the next diff
/// repaints the whole screen.
fn invalidated(buffer: &Buffer) -> Buffer {
    let mut out = buffer.clone();
    for y in 0..buffer.height() {
        for x in 0..buffer.width() {
            out.set(x, y, Cell::new('\0'));
        }
    }
    out
}

/// Current terminal colors and attributes, so only changes are emitted.
/// `None` means the terminal default is active.
#[derive(Default)]
struct Pen {
    fg: Option<Rgb>,
    bg: Option<Rgb>,
    style: TextStyle,
}

impl Pen {
    fn apply(&mut self, out: &mut impl Write, cell: &Cell) -> io::Result<()> {
        if cell.style != self.style {
            // Reset and re-apply, the "off" codes overlap (bold/dim)
            queue!(out, SetAttribute(Attribute::Reset))?;
            if cell.style.bold {
                queue!(out, SetAttribute(Attribute::Bold))?;
            }
            if cell.style.dim {
                queue!(out, SetAttribute(Attribute::Dim))?;
            }
            if cell.style.underline {
                queue!(out, SetAttribute(Attribute::Underlined))?;
            }
            if cell.style.reverse {
                queue!(out, SetAttribute(Attribute::Reverse))?;
            }
            self.style = cell.style;
            self.fg = None;
            self.bg = None;
        }
        if self.fg != Some(cell.fg) {
            queue!(out, SetForegroundColor(rgb(cell.fg)))?;
            self.fg = Some(cell.fg);
        }
        if self.bg != Some(cell.bg) {
            queue!(out, SetBackgroundColor(rgb(cell.bg)))?;
            self.bg = Some(cell.bg);
        }
        Ok(())
    }
}

fn rgb(color: Rgb) -> CtColor {
    CtColor::Rgb {
        r: color.r,
        g: color.g,
        b: color.b,
    }
}
