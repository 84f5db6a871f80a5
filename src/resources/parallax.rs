//! Scrolling tile layers drawn behind and in front of the playfield.
//!
//! A level has four slots; each slot holds up to [`MAX_LAYERS_PER_SLOT`]
//! layers, updated and drawn in insertion order.

use arrayvec::ArrayVec;
use bevy_ecs::prelude::Resource;
use log::warn;
use raylib::prelude::Vector2;

use crate::resources::drawlist::DrawList;
use crate::resources::tilegrid::{
    PLAYFIELD_COLUMNS, PLAYFIELD_HEIGHT, PLAYFIELD_ROWS, PLAYFIELD_WIDTH, TILE_SIZE, TileGrid,
};

pub const MAX_LAYERS_PER_SLOT: usize = 4;

/// Draw depth of a layer slot. The numeric codes are the historical layer ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerSlot {
    Background,
    BehindObjects,
    InFrontOfObjects,
    Foreground,
}

impl LayerSlot {
    pub const fn code(self) -> u8 {
        match self {
            LayerSlot::Background => 0,
            LayerSlot::BehindObjects => 2,
            LayerSlot::InFrontOfObjects => 3,
            LayerSlot::Foreground => 4,
        }
    }

    const fn index(self) -> usize {
        match self {
            LayerSlot::Background => 0,
            LayerSlot::BehindObjects => 1,
            LayerSlot::InFrontOfObjects => 2,
            LayerSlot::Foreground => 3,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ParallaxLayer {
    grid: TileGrid,
    offset: Vector2,
    velocity: Vector2,
}

impl ParallaxLayer {
    pub fn new(grid: TileGrid) -> Self {
        Self {
            grid,
            offset: Vector2::zero(),
            velocity: Vector2::zero(),
        }
    }

    pub fn with_velocity(mut self, velocity: Vector2) -> Self {
        self.velocity = Vector2::new(
            velocity.x % PLAYFIELD_WIDTH as f32,
            velocity.y % PLAYFIELD_HEIGHT as f32,
        );
        self
    }

    pub fn offset(&self) -> Vector2 {
        self.offset
    }

    /// Scroll by the velocity. Both axes wrap on `span` pixels, the width of the
    /// room the layer belongs to.
    pub fn update(&mut self, span: f32) {
        let mut x = self.offset.x + self.velocity.x;
        if x < 0.0 {
            x += span;
        }
        if x > span {
            x -= span;
        }
        let mut y = self.offset.y + self.velocity.y;
        if y < 0.0 {
            y += span;
        }
        if y > span {
            y -= span;
        }
        self.offset = Vector2::new(x, y);
    }

    /// Draw one screen plus a tile of margin, tiled from the layer's own grid.
    /// Layers always draw from the default tile set.
    pub fn render(&self, draw: &mut DrawList) {
        let columns = self.grid.columns();
        let rows = self.grid.rows();
        if columns <= 0 || rows <= 0 {
            return;
        }
        let map_x = (self.offset.x / TILE_SIZE as f32) as i32;
        let map_y = (self.offset.y / TILE_SIZE as f32) as i32;
        let shift_x = (self.offset.x % TILE_SIZE as f32) as i32;
        let shift_y = (self.offset.y % TILE_SIZE as f32) as i32;
        for h in 0..PLAYFIELD_ROWS + 2 {
            for w in 0..PLAYFIELD_COLUMNS + 2 {
                let tx = (map_x + w).rem_euclid(columns);
                let ty = (map_y + h).rem_euclid(rows);
                let image_id = self.grid.image_id(tx, ty);
                if image_id != 0 {
                    draw.tile(image_id, w * TILE_SIZE - shift_x, h * TILE_SIZE - shift_y);
                }
            }
        }
    }
}

#[derive(Resource, Debug, Clone, Default)]
pub struct Parallax {
    slots: [ArrayVec<ParallaxLayer, MAX_LAYERS_PER_SLOT>; 4],
}

impl Parallax {
    pub fn push(&mut self, slot: LayerSlot, layer: ParallaxLayer) {
        if self.slots[slot.index()].try_push(layer).is_err() {
            warn!("Layer slot {} is full, layer dropped", slot.code());
        }
    }

    pub fn layers(&self, slot: LayerSlot) -> &[ParallaxLayer] {
        &self.slots[slot.index()]
    }

    pub fn update(&mut self, slot: LayerSlot, span: f32) {
        for layer in self.slots[slot.index()].iter_mut() {
            layer.update(span);
        }
    }

    pub fn render(&self, slot: LayerSlot, draw: &mut DrawList) {
        for layer in &self.slots[slot.index()] {
            layer.render(draw);
        }
    }
}
