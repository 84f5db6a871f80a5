//! Tile grid resource and room document loading.
//!
//! A [`TileGrid`] is the fixed-size playfield of a level: every cell carries an
//! image id, a collision type and the tile-set it draws from. Grids are built
//! from JSON room documents ([`RoomFile`]) and are read-only during gameplay.
//!
//! Out-of-range reads never fail; they return the empty cell so collision
//! probes and renderers can sample past the edges freely.

use bevy_ecs::prelude::Resource;
use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Edge length of a tile in pixels.
pub const TILE_SIZE: i32 = 16;
/// Half of [`TILE_SIZE`]; bodies are centered on their position.
pub const HALF_TILE: i32 = TILE_SIZE / 2;
/// Playfield width in pixels.
pub const PLAYFIELD_WIDTH: i32 = 320;
/// Playfield height in pixels.
pub const PLAYFIELD_HEIGHT: i32 = 256;
/// Visible tile columns.
pub const PLAYFIELD_COLUMNS: i32 = PLAYFIELD_WIDTH / TILE_SIZE;
/// Visible tile rows.
pub const PLAYFIELD_ROWS: i32 = PLAYFIELD_HEIGHT / TILE_SIZE;

/// Collision type of a solid tile.
pub const SOLID: i32 = 1;

/// Largest number of cells a room document may declare.
pub const MAX_ROOM_CELLS: usize = 1 << 20;

/// One cell of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TileCell {
    /// Frame index in the tile sheet; 0 means nothing is drawn.
    pub image_id: i32,
    /// Collision type; [`SOLID`] blocks movement.
    pub kind: i32,
    /// Tile-set the image is taken from.
    pub set: i32,
}

/// Fixed-size 2D array of [`TileCell`]s.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct TileGrid {
    name: String,
    info: String,
    columns: i32,
    rows: i32,
    cells: Vec<TileCell>,
}

impl TileGrid {
    /// Create an empty grid of the given size. Negative sizes are clamped to zero.
    pub fn new(name: impl Into<String>, columns: i32, rows: i32) -> Self {
        let columns = columns.max(0);
        let rows = rows.max(0);
        Self {
            name: name.into(),
            info: String::new(),
            columns,
            rows,
            cells: vec![TileCell::default(); columns as usize * rows as usize],
        }
    }

    /// The room used when a room document cannot be loaded: one empty screen.
    pub fn default_room() -> Self {
        Self::new("empty", PLAYFIELD_COLUMNS, PLAYFIELD_ROWS)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn info(&self) -> &str {
        &self.info
    }

    pub fn columns(&self) -> i32 {
        self.columns
    }

    pub fn rows(&self) -> i32 {
        self.rows
    }

    /// Width of the grid in pixels.
    pub fn pixel_width(&self) -> i32 {
        self.columns * TILE_SIZE
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.columns || y >= self.rows {
            return None;
        }
        Some((y * self.columns + x) as usize)
    }

    /// Cell at `(x, y)`, or the empty cell when out of range.
    pub fn cell(&self, x: i32, y: i32) -> TileCell {
        self.index(x, y)
            .map(|i| self.cells[i])
            .unwrap_or_default()
    }

    pub fn image_id(&self, x: i32, y: i32) -> i32 {
        self.cell(x, y).image_id
    }

    pub fn tile_type(&self, x: i32, y: i32) -> i32 {
        self.cell(x, y).kind
    }

    pub fn set_id(&self, x: i32, y: i32) -> i32 {
        self.cell(x, y).set
    }

    /// True when the cell at `(x, y)` blocks movement.
    pub fn is_solid(&self, x: i32, y: i32) -> bool {
        self.tile_type(x, y) == SOLID
    }

    /// Overwrite a cell. Returns false (and changes nothing) when out of range.
    pub fn set_cell(&mut self, x: i32, y: i32, cell: TileCell) -> bool {
        match self.index(x, y) {
            Some(i) => {
                self.cells[i] = cell;
                true
            }
            None => false,
        }
    }

    /// Build a grid from a parsed room document.
    ///
    /// Tiles placed outside the declared size are skipped with a warning.
    /// Negative sizes or more than [`MAX_ROOM_CELLS`] cells are an error.
    pub fn from_room(room: &RoomFile) -> Result<Self, String> {
        let info = &room.information;
        let cells = usize::try_from(info.width)
            .ok()
            .zip(usize::try_from(info.height).ok())
            .and_then(|(w, h)| w.checked_mul(h));
        match cells {
            Some(n) if n <= MAX_ROOM_CELLS => {}
            _ => {
                return Err(format!(
                    "Room '{}' declares an invalid size {}x{}",
                    info.name, info.width, info.height
                ));
            }
        }
        let mut grid = Self::new(info.name.clone(), info.width, info.height);
        grid.info = info.info.clone();
        for tile in &room.tiles {
            let cell = TileCell {
                image_id: tile.imageid,
                kind: tile.kind,
                set: tile.set,
            };
            if !grid.set_cell(tile.x, tile.y, cell) {
                warn!(
                    "Room '{}': tile ({}, {}) is outside {}x{}, skipped",
                    grid.name, tile.x, tile.y, grid.columns, grid.rows
                );
            }
        }
        Ok(grid)
    }

    /// Read and parse a room document.
    pub fn load_room(path: impl AsRef<Path>) -> Result<Self, String> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read room file {}: {}", path.display(), e))?;
        let room: RoomFile = serde_json::from_str(&text)
            .map_err(|e| format!("Failed to parse room file {}: {}", path.display(), e))?;
        let grid = Self::from_room(&room).map_err(|e| format!("{} in {}", e, path.display()))?;
        info!(
            "Loaded room '{}' ({}x{}) from {}",
            grid.name,
            grid.columns,
            grid.rows,
            path.display()
        );
        Ok(grid)
    }

    /// Like [`TileGrid::load_room`], falling back to [`TileGrid::default_room`].
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load_room(path) {
            Ok(grid) => grid,
            Err(e) => {
                error!("{}", e);
                Self::default_room()
            }
        }
    }
}

impl Default for TileGrid {
    fn default() -> Self {
        Self::default_room()
    }
}

/// Header of a room document.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RoomInformation {
    pub name: String,
    /// Width in tiles.
    pub width: i32,
    /// Height in tiles.
    pub height: i32,
    #[serde(default)]
    pub info: String,
}

/// A single tile placement inside a room document.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RoomTile {
    pub x: i32,
    pub y: i32,
    pub imageid: i32,
    #[serde(rename = "type", default)]
    pub kind: i32,
    #[serde(default)]
    pub set: i32,
}

/// Room document as stored on disk.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RoomFile {
    pub information: RoomInformation,
    #[serde(default)]
    pub tiles: Vec<RoomTile>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const ROOM_JSON: &str = r#"{
        "information": { "name": "test", "width": 3, "height": 2, "info": "unit" },
        "tiles": [
            { "x": 0, "y": 0, "imageid": 5, "type": 1, "set": 1 },
            { "x": 2, "y": 1, "imageid": 7, "type": 0 },
            { "x": 9, "y": 9, "imageid": 3, "type": 1 }
        ]
    }"#;

    #[test]
    fn out_of_range_reads_empty_cell() {
        let grid = TileGrid::new("g", 2, 2);
        assert_eq!(grid.cell(-1, 0), TileCell::default());
        assert_eq!(grid.cell(0, 2), TileCell::default());
        assert!(!grid.is_solid(5, 5));
    }

    #[test]
    fn set_cell_rejects_out_of_range() {
        let mut grid = TileGrid::new("g", 2, 2);
        let solid = TileCell {
            image_id: 1,
            kind: SOLID,
            set: 0,
        };
        assert!(grid.set_cell(1, 1, solid));
        assert!(!grid.set_cell(2, 0, solid));
        assert!(grid.is_solid(1, 1));
    }

    #[test]
    fn from_room_reads_cells_and_skips_outside() {
        let room: RoomFile = serde_json::from_str(ROOM_JSON).unwrap();
        let grid = TileGrid::from_room(&room).unwrap();
        assert_eq!(grid.name(), "test");
        assert_eq!(grid.info(), "unit");
        assert_eq!(grid.columns(), 3);
        assert_eq!(grid.rows(), 2);
        assert_eq!(grid.image_id(0, 0), 5);
        assert_eq!(grid.set_id(0, 0), 1);
        assert!(grid.is_solid(0, 0));
        assert_eq!(grid.image_id(2, 1), 7);
        assert_eq!(grid.set_id(2, 1), 0);
        assert!(!grid.is_solid(2, 1));
    }

    #[test]
    fn load_room_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(ROOM_JSON.as_bytes()).unwrap();
        let grid = TileGrid::load_room(file.path()).unwrap();
        assert_eq!(grid.pixel_width(), 48);
    }

    #[test]
    fn load_or_default_falls_back() {
        let grid = TileGrid::load_or_default("/definitely/not/here.json");
        assert_eq!(grid, TileGrid::default_room());
        assert_eq!(grid.columns(), PLAYFIELD_COLUMNS);
        assert_eq!(grid.rows(), PLAYFIELD_ROWS);
    }

    #[test]
    fn oversized_room_is_rejected() {
        let json = r#"{
            "information": { "name": "huge", "width": 50000, "height": 50000, "info": "" },
            "tiles": []
        }"#;
        let room: RoomFile = serde_json::from_str(json).unwrap();
        let err = TileGrid::from_room(&room).unwrap_err();
        assert!(err.contains("50000x50000"));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        assert!(TileGrid::load_room(file.path()).is_err());
        assert_eq!(TileGrid::load_or_default(file.path()), TileGrid::default_room());
    }

    #[test]
    fn negative_room_size_is_rejected() {
        let json = r#"{
            "information": { "name": "neg", "width": -3, "height": 2, "info": "" },
            "tiles": []
        }"#;
        let room: RoomFile = serde_json::from_str(json).unwrap();
        assert!(TileGrid::from_room(&room).is_err());
    }

    #[test]
    fn malformed_room_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{ not json").unwrap();
        let err = TileGrid::load_room(file.path()).unwrap_err();
        assert!(err.contains("parse"));
    }
}
