//! TerminalRenderer: flushes frames to the real terminal.
//!
//! The first frame, and any frame after a resize or
//! [`TerminalRenderer::invalidate`], is a full redraw. Later frames only
//! rewrite the horizontal runs of cells that differ from the previous frame.

use std::io::{self, Write};

use anyhow::Result;
use crossterm::{
    cursor, queue,
    style::{
        Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
    },
    terminal,
};

use crate::fb::{Cell, CellStyle, FrameBuffer, Rgb};

pub struct TerminalRenderer {
    stdout: io::Stdout,
    /// Frame currently on screen.
    shown: Option<FrameBuffer>,
    bytes: Vec<u8>,
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
            shown: None,
            bytes: Vec::with_capacity(32 * 1024),
        }
    }

    /// Raw mode, alternate screen, hidden cursor.
    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        self.bytes.clear();
        queue!(
            self.bytes,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            terminal::DisableLineWrap
        )?;
        self.flush()
    }

    /// Undo [`TerminalRenderer::enter`].
    pub fn exit(&mut self) -> Result<()> {
        self.bytes.clear();
        queue!(
            self.bytes,
            ResetColor,
            SetAttribute(Attribute::Reset),
            terminal::EnableLineWrap,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        self.flush()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    /// Force the next frame to be a full redraw (after a resize).
    pub fn invalidate(&mut self) {
        self.shown = None;
    }

    /// Draw `frame`, then swap it with the previously shown buffer.
    ///
    /// On return `frame` holds stale contents the caller renders over; no
    /// buffer is cloned per frame.
    pub fn draw_swap(&mut self, frame: &mut FrameBuffer) -> Result<()> {
        self.bytes.clear();
        let mut shown = match self.shown.take() {
            Some(prev) if prev.width() == frame.width() && prev.height() == frame.height() => {
                encode_diff_into(&prev, frame, &mut self.bytes)?;
                prev
            }
            _ => {
                encode_full_into(frame, &mut self.bytes)?;
                FrameBuffer::new(frame.width(), frame.height())
            }
        };
        self.flush()?;

        std::mem::swap(&mut shown, frame);
        self.shown = Some(shown);
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.stdout.write_all(&self.bytes)?;
        self.stdout.flush()?;
        Ok(())
    }
}

/// Emits cells, switching style only when it changes.
struct Painter<'a> {
    out: &'a mut Vec<u8>,
    style: Option<CellStyle>,
}

impl<'a> Painter<'a> {
    fn new(out: &'a mut Vec<u8>) -> Self {
        Self { out, style: None }
    }

    fn paint(&mut self, cell: Cell) -> Result<()> {
        if self.style != Some(cell.style) {
            let s = cell.style;
            queue!(
                self.out,
                SetForegroundColor(color(s.fg)),
                SetBackgroundColor(color(s.bg)),
                SetAttribute(Attribute::Reset)
            )?;
            if s.bold {
                queue!(self.out, SetAttribute(Attribute::Bold))?;
            }
            if s.dim {
                queue!(self.out, SetAttribute(Attribute::Dim))?;
            }
            self.style = Some(s);
        }
        queue!(self.out, Print(cell.ch))?;
        Ok(())
    }

    fn finish(self) -> Result<()> {
        queue!(self.out, ResetColor, SetAttribute(Attribute::Reset))?;
        Ok(())
    }
}

/// Encode a full-frame redraw into `out` (no terminal I/O).
pub fn encode_full_into(fb: &FrameBuffer, out: &mut Vec<u8>) -> Result<()> {
    queue!(out, terminal::Clear(terminal::ClearType::All))?;

    let mut painter = Painter::new(out);
    for y in 0..fb.height() {
        queue!(painter.out, cursor::MoveTo(0, y))?;
        for x in 0..fb.width() {
            painter.paint(fb.get(x, y).unwrap_or_default())?;
        }
    }
    painter.finish()
}

/// Encode only the runs that differ between `prev` and `next` into `out`.
///
/// Both frames must have the same size; use [`encode_full_into`] otherwise.
pub fn encode_diff_into(prev: &FrameBuffer, next: &FrameBuffer, out: &mut Vec<u8>) -> Result<()> {
    let mut painter = Painter::new(out);
    for y in 0..next.height() {
        let mut x = 0;
        while let Some((start, len)) = next_changed_run(prev, next, y, x) {
            queue!(painter.out, cursor::MoveTo(start, y))?;
            for dx in 0..len {
                painter.paint(next.get(start + dx, y).unwrap_or_default())?;
            }
            x = start + len;
        }
    }
    painter.finish()
}

/// First run of differing cells in row `y` at or after column `from`.
fn next_changed_run(prev: &FrameBuffer, next: &FrameBuffer, y: u16, from: u16) -> Option<(u16, u16)> {
    let differs = |x: u16| prev.get(x, y) != next.get(x, y);
    let start = (from..next.width()).find(|&x| differs(x))?;
    let end = (start..next.width())
        .find(|&x| !differs(x))
        .unwrap_or(next.width());
    Some((start, end - start))
}

fn color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.r,
        g: rgb.g,
        b: rgb.b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn runs(prev: &FrameBuffer, next: &FrameBuffer, y: u16) -> Vec<(u16, u16)> {
        let mut out = Vec::new();
        let mut x = 0;
        while let Some(run) = next_changed_run(prev, next, y, x) {
            out.push(run);
            x = run.0 + run.1;
        }
        out
    }

    #[test]
    fn full_encode_contains_every_glyph() {
        let mut fb = FrameBuffer::new(2, 2);
        fb.put_str(0, 0, "AB", CellStyle::default());
        fb.put_str(0, 1, "CD", CellStyle::default());

        let mut out = Vec::new();
        encode_full_into(&fb, &mut out).unwrap();
        let text = String::from_utf8_lossy(&out);
        for ch in ["A", "B", "C", "D"] {
            assert!(text.contains(ch));
        }
    }

    #[test]
    fn identical_frames_encode_no_glyphs() {
        let mut fb = FrameBuffer::new(4, 2);
        fb.put_str(0, 0, "wxyz", CellStyle::default());

        let mut out = Vec::new();
        encode_diff_into(&fb, &fb.clone(), &mut out).unwrap();
        assert!(!String::from_utf8_lossy(&out).contains('w'));
    }

    #[test]
    fn adjacent_changes_coalesce_into_one_run() {
        let a = FrameBuffer::new(8, 1);
        let mut b = FrameBuffer::new(8, 1);
        b.put_str(1, 0, "###", CellStyle::default());
        b.put_char(6, 0, '#', CellStyle::default());

        assert_eq!(runs(&a, &b, 0), vec![(1, 3), (6, 1)]);
    }

    #[test]
    fn run_reaching_the_edge_ends_at_width() {
        let a = FrameBuffer::new(4, 1);
        let mut b = FrameBuffer::new(4, 1);
        b.put_str(2, 0, "##", CellStyle::default());
        assert_eq!(runs(&a, &b, 0), vec![(2, 2)]);
    }
}
