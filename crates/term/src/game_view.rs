//! GameView: maps a [`GameSnapshot`] into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.

use crate::core::{matrix, GameSnapshot};
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::types::{PieceKind, Rotation, BOARD_HEIGHT, BOARD_WIDTH};

const TITLE: &str = "NEON TETRIS";
const BOARD_BG: Rgb = Rgb::new(18, 14, 34);
const PANEL_BG: Rgb = Rgb::new(0, 0, 0);

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

/// What the commentary panel shows next to the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommentaryView<'a> {
    pub text: &'a str,
    /// A remark is being generated
    pub loading: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorY {
    Center,
    Top,
}

/// A lightweight terminal renderer for the Tetris game.
pub struct GameView {
    /// Board cell width in terminal columns.
    cell_w: u16,
    /// Board cell height in terminal rows.
    cell_h: u16,
    anchor_y: AnchorY,
}

impl Default for GameView {
    fn default() -> Self {
        // 2x1 helps compensate for typical terminal glyph aspect ratio.
        Self::new(2, 1)
    }
}

impl GameView {
    pub fn new(cell_w: u16, cell_h: u16) -> Self {
        Self {
            cell_w: cell_w.max(1),
            cell_h: cell_h.max(1),
            anchor_y: AnchorY::Center,
        }
    }

    pub fn with_anchor_y(mut self, anchor_y: AnchorY) -> Self {
        self.anchor_y = anchor_y;
        self
    }

    /// Render a snapshot into an existing framebuffer.
    ///
    /// Callers can reuse a framebuffer across frames; it is only reallocated
    /// when the terminal size changes.
    pub fn render_into(
        &self,
        snap: &GameSnapshot,
        commentary: Option<CommentaryView<'_>>,
        viewport: Viewport,
        fb: &mut FrameBuffer,
    ) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(CellStyle::default().into_cell(' '));

        let board_px_w = (BOARD_WIDTH as u16) * self.cell_w;
        let board_px_h = (BOARD_HEIGHT as u16) * self.cell_h;
        let frame_w = board_px_w + 2;
        let frame_h = board_px_h + 2;

        let start_x = viewport.width.saturating_sub(frame_w + PANEL_MIN_W) / 2;
        let start_y = match self.anchor_y {
            AnchorY::Center => viewport.height.saturating_sub(frame_h + 1) / 2 + 1,
            AnchorY::Top => 1,
        };

        let title_style = CellStyle::new(Rgb::new(255, 60, 200), PANEL_BG).bold();
        let title_x = start_x + frame_w.saturating_sub(TITLE.len() as u16) / 2;
        fb.put_str(title_x, start_y - 1, TITLE, title_style);

        let bg = CellStyle::new(Rgb::new(70, 60, 100), BOARD_BG);
        let border = CellStyle::new(Rgb::new(0, 220, 255), PANEL_BG);

        fb.fill_rect(start_x + 1, start_y + 1, board_px_w, board_px_h, ' ', bg);
        self.draw_border(fb, start_x, start_y, frame_w, frame_h, border);

        // Locked cells.
        for y in 0..BOARD_HEIGHT as i8 {
            for x in 0..BOARD_WIDTH as i8 {
                match snap.board.get(x, y).flatten() {
                    Some(kind) => self.draw_board_cell(fb, start_x, start_y, x, y, kind),
                    None => self.draw_empty_cell(fb, start_x, start_y, x, y),
                }
            }
        }

        if let Some(active) = snap.active {
            // Ghost first so the active piece wins where they overlap.
            if let Some(ghost_y) = snap.ghost_y() {
                let ghost_style = CellStyle::new(Rgb::new(140, 140, 160), BOARD_BG).dim();
                for &(dx, dy) in active.matrix().minos() {
                    self.fill_cell_rect(
                        fb,
                        start_x,
                        start_y,
                        active.x + dx,
                        ghost_y + dy,
                        '░',
                        ghost_style,
                    );
                }
            }
            for &(dx, dy) in active.matrix().minos() {
                self.draw_board_cell(
                    fb,
                    start_x,
                    start_y,
                    active.x + dx,
                    active.y + dy,
                    active.kind,
                );
            }
        }

        self.draw_side_panel(fb, snap, commentary, viewport, start_x, start_y, frame_w);

        if snap.game_over {
            self.draw_overlay_text(fb, start_x, start_y, frame_w, frame_h, "GAME OVER");
        } else if snap.paused {
            self.draw_overlay_text(fb, start_x, start_y, frame_w, frame_h, "PAUSED");
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(
        &self,
        snap: &GameSnapshot,
        commentary: Option<CommentaryView<'_>>,
        viewport: Viewport,
    ) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, commentary, viewport, &mut fb);
        fb
    }

    fn draw_border(&self, fb: &mut FrameBuffer, x: u16, y: u16, w: u16, h: u16, style: CellStyle) {
        if w < 2 || h < 2 {
            return;
        }

        fb.put_char(x, y, '┌', style);
        fb.put_char(x + w - 1, y, '┐', style);
        fb.put_char(x, y + h - 1, '└', style);
        fb.put_char(x + w - 1, y + h - 1, '┘', style);

        for dx in 1..w - 1 {
            fb.put_char(x + dx, y, '─', style);
            fb.put_char(x + dx, y + h - 1, '─', style);
        }
        for dy in 1..h - 1 {
            fb.put_char(x, y + dy, '│', style);
            fb.put_char(x + w - 1, y + dy, '│', style);
        }
    }

    fn draw_empty_cell(&self, fb: &mut FrameBuffer, start_x: u16, start_y: u16, x: i8, y: i8) {
        let style = CellStyle::new(Rgb::new(60, 50, 90), BOARD_BG).dim();
        self.fill_cell_rect(fb, start_x, start_y, x, y, '·', style);
    }

    fn draw_board_cell(
        &self,
        fb: &mut FrameBuffer,
        start_x: u16,
        start_y: u16,
        x: i8,
        y: i8,
        kind: PieceKind,
    ) {
        let style = CellStyle::new(kind.color().into(), BOARD_BG).bold();
        self.fill_cell_rect(fb, start_x, start_y, x, y, '█', style);
    }

    /// Fill one board cell. Cells outside the visible grid (spawn rows) are skipped.
    #[allow(clippy::too_many_arguments)]
    fn fill_cell_rect(
        &self,
        fb: &mut FrameBuffer,
        start_x: u16,
        start_y: u16,
        cell_x: i8,
        cell_y: i8,
        ch: char,
        style: CellStyle,
    ) {
        if cell_x < 0 || cell_x >= BOARD_WIDTH as i8 || cell_y < 0 || cell_y >= BOARD_HEIGHT as i8
        {
            return;
        }
        let px = start_x + 1 + cell_x as u16 * self.cell_w;
        let py = start_y + 1 + cell_y as u16 * self.cell_h;
        fb.fill_rect(px, py, self.cell_w, self.cell_h, ch, style);
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_side_panel(
        &self,
        fb: &mut FrameBuffer,
        snap: &GameSnapshot,
        commentary: Option<CommentaryView<'_>>,
        viewport: Viewport,
        start_x: u16,
        start_y: u16,
        frame_w: u16,
    ) {
        let panel_x = start_x.saturating_add(frame_w).saturating_add(2);
        if panel_x >= viewport.width {
            return;
        }
        let panel_w = viewport.width - panel_x;
        if panel_w < 12 {
            return;
        }

        let label = CellStyle::new(Rgb::new(0, 220, 255), PANEL_BG).bold();
        let value = CellStyle::new(Rgb::new(230, 230, 230), PANEL_BG);

        let mut y = start_y;
        for (name, v) in [("SCORE", snap.score), ("LEVEL", snap.level), ("LINES", snap.lines)] {
            fb.put_str(panel_x, y, name, label);
            fb.put_u32(panel_x, y.saturating_add(1), v, value);
            y = y.saturating_add(3);
        }

        fb.put_str(panel_x, y, "NEXT", label);
        y = y.saturating_add(1);
        self.draw_preview(fb, panel_x, y, snap.next);
        y = y.saturating_add(4 * self.cell_h + 1);

        if let Some(view) = commentary {
            let heading = if view.loading { "COMMENTARY ..." } else { "COMMENTARY" };
            fb.put_str(panel_x, y, heading, label);
            y = y.saturating_add(1);
            let rows = viewport.height.saturating_sub(y);
            let text = CellStyle::new(Rgb::new(255, 140, 230), PANEL_BG);
            draw_wrapped(fb, panel_x, y, panel_w.min(PANEL_TEXT_W), rows, view.text, text);
        }
    }

    /// Draw the spawn rotation of `kind` as a small matrix.
    fn draw_preview(&self, fb: &mut FrameBuffer, x: u16, y: u16, kind: PieceKind) {
        let m = matrix(kind, Rotation::SPAWN);
        let style = CellStyle::new(kind.color().into(), PANEL_BG).bold();
        for row in 0..m.size() {
            for col in 0..m.size() {
                if m.is_occupied(col, row) {
                    let px = x + col as u16 * self.cell_w;
                    let py = y + row as u16 * self.cell_h;
                    fb.fill_rect(px, py, self.cell_w, self.cell_h, '█', style);
                }
            }
        }
    }

    fn draw_overlay_text(
        &self,
        fb: &mut FrameBuffer,
        start_x: u16,
        start_y: u16,
        frame_w: u16,
        frame_h: u16,
        text: &str,
    ) {
        let mid_y = start_y.saturating_add(frame_h / 2);
        let text_w = text.chars().count() as u16;
        let x = start_x.saturating_add(frame_w.saturating_sub(text_w) / 2);
        let style = CellStyle::new(Rgb::new(255, 255, 255), Rgb::new(120, 0, 90)).bold();
        fb.put_str(x, mid_y, text, style);
    }
}

/// Columns reserved right of the board when centering.
const PANEL_MIN_W: u16 = 24;
/// Widest line used for commentary text.
const PANEL_TEXT_W: u16 = 28;

/// Greedy word wrap of `text` into a `w` x `max_rows` box. Returns rows used.
///
/// Words longer than a line are hard-split.
fn draw_wrapped(
    fb: &mut FrameBuffer,
    x: u16,
    y: u16,
    w: u16,
    max_rows: u16,
    text: &str,
    style: CellStyle,
) -> u16 {
    if w == 0 || max_rows == 0 {
        return 0;
    }
    let mut row = 0u16;
    let mut col = 0u16;
    for word in text.split_whitespace() {
        let mut word_len = word.chars().count() as u16;
        if col > 0 && col + 1 + word_len > w {
            row += 1;
            col = 0;
        } else if col > 0 {
            col += 1;
        }
        let mut chars = word.chars();
        while word_len > 0 {
            if row >= max_rows {
                return row;
            }
            let take = word_len.min(w - col);
            for _ in 0..take {
                if let Some(ch) = chars.next() {
                    fb.put_char(x + col, y + row, ch, style);
                    col += 1;
                }
            }
            word_len -= take;
            if word_len > 0 {
                row += 1;
                col = 0;
            }
        }
    }
    if col > 0 {
        row += 1;
    }
    row.min(max_rows)
}
