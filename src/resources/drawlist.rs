//! Backend-neutral draw commands.
//!
//! Level render schedules never touch the GPU. They push [`DrawCmd`]s into
//! the [`DrawList`] resource in painter's order; the frontend replays them
//! onto the render target. Text is drawn from glyph tiles in the sheet, so the
//! tile-font helpers live here too.

use bevy_ecs::prelude::Resource;

use crate::resources::tilegrid::{HALF_TILE, TILE_SIZE};

/// Sheet row holding the 16 px font.
const FONT_ROW: i32 = 6;
/// First sheet tile of the 8 px font; every tile holds four glyph quadrants.
const SMALL_FONT_BASE: i32 = 14;

/// Which 8x8 quarter of a tile to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quadrant {
    TopLeft,
    TopRight,
    BottomRight,
    BottomLeft,
}

impl Quadrant {
    /// Quadrant from its sheet index: 0 top-left, 1 top-right, 2 bottom-right, 3 bottom-left.
    pub fn from_index(q: i32) -> Self {
        match q {
            1 => Quadrant::TopRight,
            2 => Quadrant::BottomRight,
            3 => Quadrant::BottomLeft,
            _ => Quadrant::TopLeft,
        }
    }

    /// Pixel offset of the quadrant inside its tile.
    pub fn offset(self) -> (i32, i32) {
        match self {
            Quadrant::TopLeft => (0, 0),
            Quadrant::TopRight => (HALF_TILE, 0),
            Quadrant::BottomRight => (HALF_TILE, HALF_TILE),
            Quadrant::BottomLeft => (0, HALF_TILE),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawCmd {
    /// A full tile with its top-left corner at `(x, y)`.
    Tile { image_id: i32, set: i32, x: i32, y: i32 },
    /// One quarter of a tile, top-left corner at `(x, y)`.
    QuarterTile {
        image_id: i32,
        set: i32,
        quadrant: Quadrant,
        x: i32,
        y: i32,
    },
    /// White ellipse filling the given rectangle.
    Flash { x: i32, y: i32, w: i32, h: i32 },
    /// Red one-pixel line.
    Line { x0: i32, y0: i32, x1: i32, y1: i32 },
}

#[derive(Resource, Debug, Clone, Default)]
pub struct DrawList {
    cmds: Vec<DrawCmd>,
}

impl DrawList {
    pub fn push(&mut self, cmd: DrawCmd) {
        self.cmds.push(cmd);
    }

    /// Tile from the default set.
    pub fn tile(&mut self, image_id: i32, x: i32, y: i32) {
        self.tile_in_set(image_id, 0, x, y);
    }

    pub fn tile_in_set(&mut self, image_id: i32, set: i32, x: i32, y: i32) {
        self.push(DrawCmd::Tile {
            image_id,
            set,
            x,
            y,
        });
    }

    /// Quarter of a tile from the default set.
    pub fn quarter(&mut self, image_id: i32, quadrant: Quadrant, x: i32, y: i32) {
        self.push(DrawCmd::QuarterTile {
            image_id,
            set: 0,
            quadrant,
            x,
            y,
        });
    }

    pub fn flash(&mut self, rect: (i32, i32, i32, i32)) {
        let (x, y, w, h) = rect;
        self.push(DrawCmd::Flash { x, y, w, h });
    }

    pub fn line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32) {
        self.push(DrawCmd::Line { x0, y0, x1, y1 });
    }

    pub fn commands(&self) -> &[DrawCmd] {
        &self.cmds
    }

    pub fn len(&self) -> usize {
        self.cmds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cmds.is_empty()
    }

    pub fn clear(&mut self) {
        self.cmds.clear();
    }

    /// Hand the recorded commands over, leaving the list empty.
    pub fn take(&mut self) -> Vec<DrawCmd> {
        std::mem::take(&mut self.cmds)
    }

    // ==================== TILE FONT ====================

    /// Big-font text on the tile grid, wrapping every `columns` characters.
    pub fn text(&mut self, s: &str, column: i32, row: i32, columns: i32) {
        let columns = columns.max(1);
        let mut row_offset = 0;
        for (i, c) in s.to_lowercase().chars().enumerate() {
            let i = i as i32;
            if i % columns == 0 && i != 0 {
                row_offset += 1;
            }
            let tile = FONT_ROW * 32 + glyph_index(c);
            self.tile(
                tile,
                (column + i % columns) * TILE_SIZE,
                (row + row_offset) * TILE_SIZE,
            );
        }
    }

    /// Small-font text starting half a tile below `row`, optionally nudged half a tile.
    pub fn small_text(&mut self, column: i32, row: i32, s: &str, offset_x: bool, offset_y: bool) {
        let ox = if offset_x { HALF_TILE } else { 0 };
        let oy = if offset_y { HALF_TILE } else { 0 };
        for (i, c) in s.to_lowercase().chars().enumerate() {
            let g = glyph_index(c);
            self.quarter(
                small_font_tile(g),
                small_font_quadrant(g, false),
                i as i32 * HALF_TILE + column * TILE_SIZE + ox,
                HALF_TILE + row * TILE_SIZE + oy,
            );
        }
    }

    /// Small-font lines packed two per tile row.
    pub fn small_text_lines(&mut self, lines: &[&str], column: i32, row: i32) {
        let mut y = row;
        let mut half_step = true;
        for line in lines {
            self.small_text(column, y, line, false, half_step);
            if half_step {
                half_step = false;
                y += 1;
            } else {
                half_step = true;
            }
        }
    }

    /// HUD label on the top half-row and its value below, at half-tile `column`.
    pub fn hud_element(&mut self, column: i32, label: &str, value: u64) {
        for (i, c) in label.to_lowercase().chars().enumerate() {
            let g = glyph_index(c);
            self.quarter(
                small_font_tile(g),
                small_font_quadrant(g, false),
                (column + i as i32) * HALF_TILE,
                0,
            );
        }
        for (i, c) in value.to_string().chars().enumerate() {
            let g = glyph_index(c);
            self.quarter(
                small_font_tile(g),
                small_font_quadrant(g, true),
                (column + i as i32) * HALF_TILE,
                HALF_TILE,
            );
        }
    }
}

/// Position of a character in the font strip. Unknown characters map to `?`.
pub fn glyph_index(c: char) -> i32 {
    let code = c as i32;
    match c {
        '!' => 28,
        ',' => 27,
        '.' => 26,
        '?' => 29,
        ' ' => 30,
        _ if (97..=123).contains(&code) => code - 97,
        _ if (48..=58).contains(&code) => code - 48,
        _ => 29,
    }
}

fn small_font_tile(glyph: i32) -> i32 {
    SMALL_FONT_BASE + glyph / 2
}

/// Letters sit in the top quarters, digits in the bottom ones.
fn small_font_quadrant(glyph: i32, digit: bool) -> Quadrant {
    if digit {
        Quadrant::from_index((1 - glyph % 2) + 2)
    } else {
        Quadrant::from_index(glyph % 2)
    }
}
