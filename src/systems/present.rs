//! Frame presentation.
//!
//! The active level's [`DrawList`] is replayed into the fixed 320x256
//! [`RenderTarget`], which is then stretched onto the window by the display
//! scale and shifted by the current screen-shake offset.

use bevy_ecs::prelude::*;
use raylib::prelude::*;

use crate::resources::drawlist::DrawList;
use crate::resources::gameconfig::GameConfig;
use crate::resources::levelrng::LevelRng;
use crate::resources::rendertarget::RenderTarget;
use crate::resources::screenshake::ScreenShake;
use crate::resources::tilesheets::TileSheets;

#[allow(clippy::too_many_arguments)]
pub fn present(
    mut rl: NonSendMut<RaylibHandle>,
    th: NonSend<RaylibThread>,
    mut target: NonSendMut<RenderTarget>,
    sheets: NonSend<TileSheets>,
    config: Res<GameConfig>,
    mut shake: ResMut<ScreenShake>,
    mut rng: ResMut<LevelRng>,
    draw: Res<DrawList>,
) {
    let offset = shake.step(&mut rng.0);
    let scale = config.scale.max(1);
    let target = &mut *target;

    {
        let mut t = rl.begin_texture_mode(&th, &mut target.texture);
        t.clear_background(Color::BLACK);
        for cmd in draw.commands() {
            sheets.draw(&mut t, cmd);
        }
    }

    let src = target.source_rect();
    let shift = Vector2::new(offset.x * scale as f32, offset.y * scale as f32);
    let dest = target.dest_rect(scale, shift);
    let mut d = rl.begin_drawing(&th);
    d.clear_background(Color::BLACK);
    d.draw_texture_pro(&target.texture, src, dest, Vector2::zero(), 0.0, Color::WHITE);
}
