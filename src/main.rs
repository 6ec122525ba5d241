//! STARBLITZ: a side-scrolling arcade shooter
//!
//! A fixed 288x160 virtual canvas scaled to the window, driven by a single
//! per-frame tick: poll input, run the director (scene + stage + collision
//! engine), then blit the canvas with nearest-neighbor scaling.

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

mod assets;
mod config;
mod entities;
mod game;
mod gfx;
mod input;
mod save;
mod scenes;

use macroquad::logging::{error, info, warn};
use macroquad::prelude::*;

use assets::GameAssets;
use config::{GameConfig, CANVAS_H, CANVAS_W};
use game::{Director, GameContext};
use gfx::RenderCtx;
use input::InputSnapshot;
use save::SaveSlot;
use scenes::TitleScreen;

fn window_conf() -> Conf {
    Conf {
        window_title: format!("STARBLITZ v{}", VERSION),
        window_width: CANVAS_W as i32 * 4,
        window_height: CANVAS_H as i32 * 4,
        window_resizable: true,
        high_dpi: true,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    let assets = match GameAssets::load().await {
        Ok(assets) => assets,
        Err(e) => {
            error!("failed to load assets: {}", e);
            return;
        }
    };

    let config = GameConfig::load_or_default("config.ron");
    let seed = miniquad::date::now() as u64;
    let mut gc = GameContext::new(config, SaveSlot::default_path(), seed);
    match gc.save_slot.load() {
        Ok(data) => gc.stats.high_score = data.high_score,
        Err(e) => warn!("save data not readable, starting fresh: {}", e),
    }

    let mut director = Director::new(Box::new(TitleScreen::new()));

    // All drawing happens on the virtual canvas, then one scaled blit.
    let canvas = render_target(CANVAS_W as u32, CANVAS_H as u32);
    canvas.texture.set_filter(FilterMode::Nearest);
    let mut camera = Camera2D::from_display_rect(Rect::new(0.0, 0.0, CANVAS_W, CANVAS_H));
    camera.render_target = Some(canvas.clone());

    info!("STARBLITZ v{} starting, rng seed {}", VERSION, seed);

    loop {
        let input = InputSnapshot::poll();
        let dt = get_frame_time();
        {
            let mut env = gc.env(&input);
            director.update(&mut env, dt);
        }

        set_camera(&camera);
        clear_background(BLACK);
        director.render(&RenderCtx { assets: &assets });

        // Integer upscale, letterboxed and centered.
        set_default_camera();
        clear_background(BLACK);
        let scale = (screen_width() / CANVAS_W)
            .min(screen_height() / CANVAS_H)
            .floor()
            .max(1.0);
        let dest = vec2(CANVAS_W * scale, CANVAS_H * scale);
        draw_texture_ex(
            &canvas.texture,
            ((screen_width() - dest.x) / 2.0).floor(),
            ((screen_height() - dest.y) / 2.0).floor(),
            WHITE,
            DrawTextureParams {
                dest_size: Some(dest),
                ..Default::default()
            },
        );

        next_frame().await;
    }
}
