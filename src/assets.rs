//! Asset loading
//!
//! Pre-decoded texture handles for everything the game draws: the 16x16
//! sprite sheet, the two parallax background layers and the 8x8 pixel font.
//! Loading failures are fatal at startup with a clear diagnostic; nothing
//! in the per-tick core touches the filesystem.

use macroquad::prelude::*;

pub struct GameAssets {
    /// 16x16 tile sheet: one animation per row.
    pub sprites: Texture2D,
    pub background_stars: Texture2D,
    pub background_planet: Texture2D,
    /// 8x8 glyphs, 16 per row, indexed by byte value.
    pub pixel_font: Texture2D,
}

impl GameAssets {
    pub async fn load() -> Result<Self, macroquad::Error> {
        let assets = Self {
            sprites: load_texture("assets/sprites.png").await?,
            background_stars: load_texture("assets/background_stars.png").await?,
            background_planet: load_texture("assets/background_planet.png").await?,
            pixel_font: load_texture("assets/pixel_font.png").await?,
        };
        // Pixel art: no smoothing anywhere.
        for texture in [
            &assets.sprites,
            &assets.background_stars,
            &assets.background_planet,
            &assets.pixel_font,
        ] {
            texture.set_filter(FilterMode::Nearest);
        }
        Ok(assets)
    }
}
