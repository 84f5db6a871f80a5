//! Tile sheet textures, keyed by tile-set id.
//!
//! A sheet is a grid of 16x16 tiles; tile `n` sits at column `n % columns`,
//! row `n / columns`. Ids outside the sheet draw the tile at column 1, row 0.
//! A set that failed to load is skipped when drawing.
//!
//! NonSend: the textures live on the GPU and belong to the main thread.

use std::path::Path;

use log::{error, info};
use raylib::prelude::*;
use rustc_hash::FxHashMap;

use crate::resources::drawlist::{DrawCmd, Quadrant};
use crate::resources::tilegrid::{HALF_TILE, TILE_SIZE};

/// Sheet files under `<assets>/sheet/`, by set id.
pub const SHEET_FILES: [(i32, &str); 2] = [(0, "32x32_16x16px_tech.png"), (1, "32x32_16x16px.png")];

pub struct TileSheet {
    pub texture: Texture2D,
    pub columns: i32,
    pub rows: i32,
}

/// Source cell `(column, row)` of `image_id` on a sheet of the given size.
pub fn sheet_cell(image_id: i32, columns: i32, rows: i32) -> (i32, i32) {
    if columns <= 0 || rows <= 0 {
        return (1, 0);
    }
    let x = image_id % columns;
    let y = image_id / columns;
    if x >= 0 && x < columns && y >= 0 && y < rows {
        (x, y)
    } else {
        (1, 0)
    }
}

impl TileSheet {
    fn source(&self, image_id: i32, quadrant: Option<Quadrant>) -> Rectangle {
        let (cx, cy) = sheet_cell(image_id, self.columns, self.rows);
        let (x, y) = (cx * TILE_SIZE, cy * TILE_SIZE);
        match quadrant {
            None => Rectangle::new(x as f32, y as f32, TILE_SIZE as f32, TILE_SIZE as f32),
            Some(q) => {
                let (ox, oy) = q.offset();
                Rectangle::new(
                    (x + ox) as f32,
                    (y + oy) as f32,
                    HALF_TILE as f32,
                    HALF_TILE as f32,
                )
            }
        }
    }
}

#[derive(Default)]
pub struct TileSheets {
    sets: FxHashMap<i32, TileSheet>,
}

impl TileSheets {
    /// Load every known sheet; failures are logged and leave the set empty.
    pub fn load_all(rl: &mut RaylibHandle, th: &RaylibThread, assets: &Path) -> Self {
        let mut sheets = Self::default();
        for (set, file) in SHEET_FILES {
            let path = assets.join("sheet").join(file);
            match rl.load_texture(th, &path.to_string_lossy()) {
                Ok(texture) => {
                    let columns = texture.width / TILE_SIZE;
                    let rows = texture.height / TILE_SIZE;
                    info!("Loaded tile set {} from {:?} ({}x{})", set, path, columns, rows);
                    sheets.sets.insert(
                        set,
                        TileSheet {
                            texture,
                            columns,
                            rows,
                        },
                    );
                }
                Err(e) => error!("Failed to load tile set {} from {:?}: {}", set, path, e),
            }
        }
        sheets
    }

    pub fn get(&self, set: i32) -> Option<&TileSheet> {
        self.sets.get(&set)
    }

    /// Replay one draw command onto `d`.
    pub fn draw<D: RaylibDraw>(&self, d: &mut D, cmd: &DrawCmd) {
        match *cmd {
            DrawCmd::Tile { image_id, set, x, y } => {
                if let Some(sheet) = self.get(set) {
                    let src = sheet.source(image_id, None);
                    d.draw_texture_rec(
                        &sheet.texture,
                        src,
                        Vector2::new(x as f32, y as f32),
                        Color::WHITE,
                    );
                }
            }
            DrawCmd::QuarterTile {
                image_id,
                set,
                quadrant,
                x,
                y,
            } => {
                if let Some(sheet) = self.get(set) {
                    let src = sheet.source(image_id, Some(quadrant));
                    d.draw_texture_rec(
                        &sheet.texture,
                        src,
                        Vector2::new(x as f32, y as f32),
                        Color::WHITE,
                    );
                }
            }
            DrawCmd::Flash { x, y, w, h } => {
                d.draw_ellipse(
                    x + w / 2,
                    y + h / 2,
                    w as f32 / 2.0,
                    h as f32 / 2.0,
                    Color::WHITE,
                );
            }
            DrawCmd::Line { x0, y0, x1, y1 } => {
                d.draw_line(x0, y0, x1, y1, Color::RED);
            }
        }
    }
}
