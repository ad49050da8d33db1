//! GameView: maps a `GameSnapshot` into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.

use crate::core::{shape_of, ActiveSnapshot, GameSnapshot};
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::types::{PieceKind, BOARD_HEIGHT, BOARD_WIDTH};

const WELL_BG: Rgb = Rgb::new(18, 18, 28);
const PANEL_BG: Rgb = Rgb::new(0, 0, 0);

const BLOCK: char = '█';
const GHOST: char = '░';
const EMPTY: char = '·';

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// A lightweight terminal renderer for the game.
#[derive(Debug, Clone, Copy)]
pub struct GameView {
    /// Board cell width in terminal columns.
    cell_w: u16,
    /// Board cell height in terminal rows.
    cell_h: u16,
}

impl Default for GameView {
    fn default() -> Self {
        // 2x1 helps compensate for typical terminal glyph aspect ratio.
        Self {
            cell_w: 2,
            cell_h: 1,
        }
    }
}

/// Top-left of the well frame plus its outer size.
#[derive(Debug, Clone, Copy)]
struct Frame {
    x: u16,
    y: u16,
    w: u16,
    h: u16,
}

impl GameView {
    pub fn new(cell_w: u16, cell_h: u16) -> Self {
        Self {
            cell_w: cell_w.max(1),
            cell_h: cell_h.max(1),
        }
    }

    /// Outer size of the bordered well.
    pub fn well_size(&self) -> (u16, u16) {
        (
            BOARD_WIDTH as u16 * self.cell_w + 2,
            BOARD_HEIGHT as u16 * self.cell_h + 2,
        )
    }

    /// Render the snapshot into an existing framebuffer.
    ///
    /// Callers can reuse a framebuffer across frames; it is resized to the
    /// viewport when the terminal size changes.
    pub fn render_into(&self, snap: &GameSnapshot, viewport: Viewport, fb: &mut FrameBuffer) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(CellStyle::default().cell(' '));

        let (frame_w, frame_h) = self.well_size();
        let frame = Frame {
            x: viewport.width.saturating_sub(frame_w) / 2,
            y: viewport.height.saturating_sub(frame_h) / 2,
            w: frame_w,
            h: frame_h,
        };

        self.draw_border(fb, frame);

        for y in 0..BOARD_HEIGHT as u16 {
            for x in 0..BOARD_WIDTH as u16 {
                match snap.board[y as usize][x as usize] {
                    Some(kind) => self.draw_block(fb, frame, x, y, kind),
                    None => {
                        let style = CellStyle {
                            dim: true,
                            ..CellStyle::plain(Rgb::new(70, 70, 85), WELL_BG)
                        };
                        self.fill_cell(fb, frame, x, y, EMPTY, style);
                    }
                }
            }
        }

        if let Some(active) = snap.active {
            if let Some(ghost_y) = snap.ghost_y {
                let style = CellStyle::plain(Rgb::of(active.kind).darkened(2), WELL_BG);
                self.draw_cells(fb, frame, &active, ghost_y, GHOST, style);
            }
            let style = CellStyle {
                bold: true,
                ..CellStyle::plain(Rgb::of(active.kind), WELL_BG)
            };
            self.draw_cells(fb, frame, &active, active.y, BLOCK, style);
        }

        self.draw_side_panel(fb, snap, viewport, frame);

        if snap.game_over {
            self.draw_overlay(fb, frame, "GAME OVER", "R to restart");
        } else if snap.paused {
            self.draw_overlay(fb, frame, "PAUSED", "P to resume");
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, snap: &GameSnapshot, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, viewport, &mut fb);
        fb
    }

    fn draw_border(&self, fb: &mut FrameBuffer, f: Frame) {
        let style = CellStyle::plain(Rgb::new(0, 200, 220), PANEL_BG);

        fb.put_char(f.x, f.y, '┌', style);
        fb.put_char(f.x + f.w - 1, f.y, '┐', style);
        fb.put_char(f.x, f.y + f.h - 1, '└', style);
        fb.put_char(f.x + f.w - 1, f.y + f.h - 1, '┘', style);

        for dx in 1..f.w - 1 {
            fb.put_char(f.x + dx, f.y, '─', style);
            fb.put_char(f.x + dx, f.y + f.h - 1, '─', style);
        }
        for dy in 1..f.h - 1 {
            fb.put_char(f.x, f.y + dy, '│', style);
            fb.put_char(f.x + f.w - 1, f.y + dy, '│', style);
        }
    }

    /// Piece cells anchored at row `y`; rows above the well are skipped.
    fn draw_cells(
        &self,
        fb: &mut FrameBuffer,
        frame: Frame,
        piece: &ActiveSnapshot,
        y: i8,
        ch: char,
        style: CellStyle,
    ) {
        for (x, y) in piece.cells_at(y) {
            if (0..BOARD_WIDTH as i8).contains(&x) && (0..BOARD_HEIGHT as i8).contains(&y) {
                self.fill_cell(fb, frame, x as u16, y as u16, ch, style);
            }
        }
    }

    fn draw_block(&self, fb: &mut FrameBuffer, frame: Frame, x: u16, y: u16, kind: PieceKind) {
        let style = CellStyle::plain(Rgb::of(kind), WELL_BG);
        self.fill_cell(fb, frame, x, y, BLOCK, style);
    }

    fn fill_cell(
        &self,
        fb: &mut FrameBuffer,
        frame: Frame,
        cell_x: u16,
        cell_y: u16,
        ch: char,
        style: CellStyle,
    ) {
        let px = frame.x + 1 + cell_x * self.cell_w;
        let py = frame.y + 1 + cell_y * self.cell_h;
        fb.fill_rect(px, py, self.cell_w, self.cell_h, ch, style);
    }

    fn draw_side_panel(
        &self,
        fb: &mut FrameBuffer,
        snap: &GameSnapshot,
        viewport: Viewport,
        frame: Frame,
    ) {
        let panel_x = frame.x.saturating_add(frame.w).saturating_add(2);
        if panel_x >= viewport.width || viewport.width - panel_x < 10 {
            return;
        }

        let label = CellStyle {
            bold: true,
            ..CellStyle::plain(Rgb::new(0, 200, 220), PANEL_BG)
        };
        let value = CellStyle::plain(Rgb::new(230, 230, 230), PANEL_BG);

        let mut y = frame.y;
        for (name, n) in [
            ("SCORE", snap.score),
            ("LEVEL", snap.level),
            ("LINES", snap.lines),
        ] {
            fb.put_str(panel_x, y, name, label);
            fb.put_u32(panel_x, y + 1, n, value);
            y = y.saturating_add(3);
        }

        fb.put_str(panel_x, y, "NEXT", label);
        self.draw_preview(fb, panel_x, y + 1, Some(snap.next), true);
        y = y.saturating_add(4);

        fb.put_str(panel_x, y, "HOLD", label);
        self.draw_preview(fb, panel_x, y + 1, snap.hold, snap.can_hold);
    }

    /// Two-row preview of a piece in its spawn orientation.
    fn draw_preview(
        &self,
        fb: &mut FrameBuffer,
        x: u16,
        y: u16,
        kind: Option<PieceKind>,
        bright: bool,
    ) {
        let Some(kind) = kind else {
            fb.put_str(x, y, "-", CellStyle::default());
            return;
        };

        let mut fg = Rgb::of(kind);
        if !bright {
            fg = fg.darkened(1);
        }
        let style = CellStyle::plain(fg, PANEL_BG);

        let shape = shape_of(kind);
        // The I matrix keeps its blocks on row 1; start from the first used row.
        let top = shape.minos().map(|(_, dy)| dy).min().unwrap_or(0);
        for (dx, dy) in shape.minos() {
            let row = (dy - top) as u16;
            if row > 1 {
                continue;
            }
            fb.fill_rect(x + dx as u16 * 2, y + row, 2, 1, BLOCK, style);
        }
    }

    fn draw_overlay(&self, fb: &mut FrameBuffer, f: Frame, title: &str, hint: &str) {
        let mid_y = f.y.saturating_add(f.h / 2);
        let title_style = CellStyle {
            bold: true,
            ..CellStyle::plain(Rgb::new(255, 255, 255), PANEL_BG)
        };
        let hint_style = CellStyle {
            dim: true,
            ..CellStyle::plain(Rgb::new(200, 200, 200), PANEL_BG)
        };

        for (dy, text, style) in [(0, title, title_style), (1, hint, hint_style)] {
            let text_w = text.chars().count() as u16;
            let x = f.x.saturating_add(f.w.saturating_sub(text_w) / 2);
            fb.put_str(x, mid_y + dy, text, style);
        }
    }
}
