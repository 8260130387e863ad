//! Puts frames on the real terminal.
//!
//! Each frame is compared row by row with the one currently on screen and
//! only the spans that differ are repainted. With nothing on screen, or after
//! a resize, the whole frame is painted.

use std::io::{self, Write};
use std::ops::Range;

use anyhow::Result;
use crossterm::{
    cursor, execute, queue,
    style::{
        Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
    },
    terminal,
};

use crate::fb::{Cell, CellStyle, FrameBuffer, Rgb};

pub struct TerminalRenderer {
    stdout: io::Stdout,
    /// What the terminal currently shows, if known.
    on_screen: Option<FrameBuffer>,
    out: Vec<u8>,
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalRenderer {
    pub fn new() -> Self {
        Self {
            stdout: io::stdout(),
            on_screen: None,
            out: Vec::with_capacity(16 * 1024),
        }
    }

    /// Raw mode plus the alternate screen, cursor hidden.
    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.stdout,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            terminal::DisableLineWrap
        )?;
        Ok(())
    }

    pub fn exit(&mut self) -> Result<()> {
        execute!(
            self.stdout,
            SetAttribute(Attribute::Reset),
            ResetColor,
            terminal::EnableLineWrap,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    /// Forget what is on screen so the next draw paints everything.
    pub fn invalidate(&mut self) {
        self.on_screen = None;
    }

    /// Show `fb`, then hand the previously shown frame back through `fb`.
    ///
    /// The caller draws the next frame into whatever comes back, so two
    /// buffers alternate without copying.
    pub fn draw_swap(&mut self, fb: &mut FrameBuffer) -> Result<()> {
        let shown = self
            .on_screen
            .take()
            .filter(|prev| prev.width() == fb.width() && prev.height() == fb.height());

        self.out.clear();
        encode_frame(shown.as_ref(), fb, &mut self.out)?;
        self.stdout.write_all(&self.out)?;
        self.stdout.flush()?;

        let mut spare = shown.unwrap_or_else(|| FrameBuffer::new(fb.width(), fb.height()));
        std::mem::swap(&mut spare, fb);
        self.on_screen = Some(spare);
        Ok(())
    }
}

/// Append the terminal commands that turn `shown` into `next`.
///
/// `None`, or a frame of another size, clears the screen and paints every row.
pub fn encode_frame(
    shown: Option<&FrameBuffer>,
    next: &FrameBuffer,
    out: &mut Vec<u8>,
) -> Result<()> {
    let mut painter = Painter::new(out);
    match shown {
        Some(prev) if prev.width() == next.width() && prev.height() == next.height() => {
            for y in 0..next.height() {
                let row = next.row(y);
                for span in changed_spans(prev.row(y), row) {
                    painter.paint(span.start as u16, y, &row[span])?;
                }
            }
        }
        _ => {
            queue!(painter.out, terminal::Clear(terminal::ClearType::All))?;
            for y in 0..next.height() {
                painter.paint(0, y, next.row(y))?;
            }
        }
    }
    painter.finish()
}

/// Maximal runs of columns where `before` and `after` differ.
fn changed_spans<'a>(
    before: &'a [Cell],
    after: &'a [Cell],
) -> impl Iterator<Item = Range<usize>> + 'a {
    let mut x = 0;
    std::iter::from_fn(move || {
        let differs = |i: usize| before.get(i) != after.get(i);
        while x < after.len() && !differs(x) {
            x += 1;
        }
        if x >= after.len() {
            return None;
        }
        let start = x;
        while x < after.len() && differs(x) {
            x += 1;
        }
        Some(start..x)
    })
}

/// Writes cells while remembering the terminal's pen, so a style is only
/// sent when it changes.
struct Painter<'a> {
    out: &'a mut Vec<u8>,
    pen: Option<CellStyle>,
    dirty: bool,
}

impl<'a> Painter<'a> {
    fn new(out: &'a mut Vec<u8>) -> Self {
        Self {
            out,
            pen: None,
            dirty: false,
        }
    }

    fn paint(&mut self, x: u16, y: u16, cells: &[Cell]) -> Result<()> {
        if cells.is_empty() {
            return Ok(());
        }
        queue!(self.out, cursor::MoveTo(x, y))?;
        for cell in cells {
            self.set_pen(cell.style)?;
            queue!(self.out, Print(cell.ch))?;
        }
        self.dirty = true;
        Ok(())
    }

    fn set_pen(&mut self, style: CellStyle) -> Result<()> {
        let pen = self.pen;
        if pen == Some(style) {
            return Ok(());
        }

        // SGR reset drops the colours too.
        let reset = pen.map_or(true, |p| p.bold != style.bold || p.dim != style.dim);
        if reset {
            queue!(self.out, SetAttribute(Attribute::Reset))?;
            if style.bold {
                queue!(self.out, SetAttribute(Attribute::Bold))?;
            }
            if style.dim {
                queue!(self.out, SetAttribute(Attribute::Dim))?;
            }
        }
        if reset || pen.map(|p| p.fg) != Some(style.fg) {
            queue!(self.out, SetForegroundColor(color(style.fg)))?;
        }
        if reset || pen.map(|p| p.bg) != Some(style.bg) {
            queue!(self.out, SetBackgroundColor(color(style.bg)))?;
        }
        self.pen = Some(style);
        Ok(())
    }

    fn finish(self) -> Result<()> {
        if self.dirty {
            queue!(self.out, SetAttribute(Attribute::Reset), ResetColor)?;
        }
        Ok(())
    }
}

fn color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.r,
        g: rgb.g,
        b: rgb.b,
    }
}
