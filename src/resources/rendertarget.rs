//! Playfield framebuffer.
//!
//! Every frame is drawn at 320x256 into this texture; [`present`] stretches it
//! onto the window by the integer display scale.
//!
//! [`present`]: crate::systems::present::present

use raylib::ffi::{self, TextureFilter};
use raylib::prelude::*;

/// Off-screen framebuffer at the playfield resolution.
///
/// Non-send: the texture lives on the GPU and belongs to the main thread.
pub struct RenderTarget {
    pub texture: RenderTexture2D,
    pub width: u32,
    pub height: u32,
}

impl RenderTarget {
    /// Create the framebuffer with point filtering, so scaled tiles stay sharp.
    pub fn new(
        rl: &mut RaylibHandle,
        th: &RaylibThread,
        width: u32,
        height: u32,
    ) -> Result<Self, String> {
        let texture = rl
            .load_render_texture(th, width, height)
            .map_err(|e| format!("Failed to create playfield texture: {}", e))?;
        unsafe {
            ffi::SetTextureFilter(
                texture.texture,
                TextureFilter::TEXTURE_FILTER_POINT as i32,
            );
        }
        Ok(Self {
            texture,
            width,
            height,
        })
    }

    /// The whole texture, flipped: render textures are stored upside down.
    pub fn source_rect(&self) -> Rectangle {
        playfield_source(self.width, self.height)
    }

    /// Window rectangle for `scale`, shifted by `offset` window pixels.
    pub fn dest_rect(&self, scale: u32, offset: Vector2) -> Rectangle {
        scaled_dest(self.width, self.height, scale, offset)
    }
}

fn playfield_source(width: u32, height: u32) -> Rectangle {
    Rectangle::new(0.0, 0.0, width as f32, -(height as f32))
}

fn scaled_dest(width: u32, height: u32, scale: u32, offset: Vector2) -> Rectangle {
    Rectangle::new(
        offset.x,
        offset.y,
        (width * scale) as f32,
        (height * scale) as f32,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_is_flipped() {
        let r = playfield_source(320, 256);
        assert_eq!(r.width, 320.0);
        assert_eq!(r.height, -256.0);
    }

    #[test]
    fn dest_scales_and_shifts() {
        let r = scaled_dest(320, 256, 3, Vector2::new(-6.0, 3.0));
        assert_eq!((r.x, r.y), (-6.0, 3.0));
        assert_eq!((r.width, r.height), (960.0, 768.0));
    }
}
