//! Parallax scrolling.
//!
//! Layers behind the map objects scroll before the objects are stepped, the
//! ones in front after. Offsets wrap on the pixel width of the level's room.

use bevy_ecs::prelude::*;

use crate::resources::parallax::{LayerSlot, Parallax};
use crate::resources::tilegrid::TileGrid;

pub fn update_back_layers(mut parallax: ResMut<Parallax>, grid: Res<TileGrid>) {
    let span = grid.pixel_width() as f32;
    parallax.update(LayerSlot::Background, span);
    parallax.update(LayerSlot::BehindObjects, span);
}

pub fn update_front_layers(mut parallax: ResMut<Parallax>, grid: Res<TileGrid>) {
    let span = grid.pixel_width() as f32;
    parallax.update(LayerSlot::InFrontOfObjects, span);
    parallax.update(LayerSlot::Foreground, span);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::parallax::ParallaxLayer;
    use raylib::prelude::Vector2;

    #[test]
    fn back_and_front_slots_scroll_separately() {
        let mut world = World::new();
        let mut parallax = Parallax::default();
        parallax.push(
            LayerSlot::Background,
            ParallaxLayer::new(TileGrid::default_room()).with_velocity(Vector2::new(1.0, 0.0)),
        );
        parallax.push(
            LayerSlot::Foreground,
            ParallaxLayer::new(TileGrid::default_room()).with_velocity(Vector2::new(2.0, 0.0)),
        );
        world.insert_resource(parallax);
        world.insert_resource(TileGrid::default_room());

        let mut schedule = Schedule::default();
        schedule.add_systems(update_back_layers);
        schedule.run(&mut world);

        let parallax = world.resource::<Parallax>();
        assert_eq!(parallax.layers(LayerSlot::Background)[0].offset().x, 1.0);
        assert_eq!(parallax.layers(LayerSlot::Foreground)[0].offset().x, 0.0);
    }
}
