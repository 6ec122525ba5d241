//! The two screens of the game
//!
//! The title screen idles with a blinking prompt until fire is pressed; the
//! level runs until the player dies, lingers for a short countdown, saves a
//! new high score if one was set, and hands control back to the title.

use std::cell::RefCell;
use std::rc::Rc;

use macroquad::logging::warn;
use macroquad::prelude::vec2;

use crate::config::{CANVAS_H, TILE};
use crate::entities::{Background, EnemySpawner, Label, Player};
use crate::game::{Entity, Env, Scene, Stage};
use crate::save::SaveData;

pub struct TitleScreen {
    prompt: Option<Rc<RefCell<Label>>>,
    blink: f32,
}

impl TitleScreen {
    pub fn new() -> Self {
        Self {
            prompt: None,
            blink: 0.0,
        }
    }
}

impl Default for TitleScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene for TitleScreen {
    fn name(&self) -> &'static str {
        "title"
    }

    fn start(&mut self, stage: &mut Stage, env: &mut Env<'_>) {
        stage.spawn(Background::new());

        let title = "STARBLITZ";
        stage.spawn(Label::new(title, Label::centered(title, 40.0)));

        let prompt_text = "PRESS FIRE TO START";
        let prompt = Label::new(prompt_text, Label::centered(prompt_text, 96.0));
        stage.spawn(prompt.clone());
        self.prompt = Some(prompt);
        self.blink = env.config.timing.title_blink;

        let hi = format!("HI {:05}", env.stats.high_score);
        stage.spawn(Label::new(hi.as_str(), Label::centered(&hi, 120.0)));
    }

    fn update(&mut self, _stage: &mut Stage, env: &mut Env<'_>, dt: f32) -> Option<Box<dyn Scene>> {
        self.blink -= dt;
        if self.blink <= 0.0 {
            self.blink = env.config.timing.title_blink;
            if let Some(prompt) = &self.prompt {
                let mut prompt = prompt.borrow_mut();
                let shown = prompt.visible();
                prompt.set_visible(!shown);
            }
        }

        if env.input.fire {
            return Some(Box::new(GameLevel::new()));
        }
        None
    }
}

pub struct GameLevel {
    player: Option<Rc<RefCell<Player>>>,
    score_label: Option<Rc<RefCell<Label>>>,
    end_countdown: f32,
}

impl GameLevel {
    pub fn new() -> Self {
        Self {
            player: None,
            score_label: None,
            end_countdown: 0.0,
        }
    }
}

impl Default for GameLevel {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene for GameLevel {
    fn name(&self) -> &'static str {
        "level"
    }

    fn start(&mut self, stage: &mut Stage, env: &mut Env<'_>) {
        env.stats.score = 0;
        self.end_countdown = env.config.timing.end_of_run_delay;

        stage.spawn(Background::new());

        let score_label = Label::new("SCORE 00000", vec2(8.0, 8.0));
        stage.spawn(score_label.clone());
        self.score_label = Some(score_label);

        let player = Player::new(vec2(2.0 * TILE, CANVAS_H / 2.0 - TILE / 2.0));
        stage.spawn(player.clone());
        self.player = Some(player);

        stage.spawn(EnemySpawner::new());
    }

    fn update(&mut self, _stage: &mut Stage, env: &mut Env<'_>, dt: f32) -> Option<Box<dyn Scene>> {
        if let Some(label) = &self.score_label {
            label.borrow_mut().text = format!("SCORE {:05}", env.stats.score);
        }

        let alive = self.player.as_ref().map_or(false, |p| p.borrow().alive());
        if alive {
            return None;
        }

        // The run is over; the field keeps simulating through the countdown
        // so bullets fly on and the explosion finishes.
        self.end_countdown -= dt;
        if self.end_countdown > 0.0 {
            return None;
        }

        if env.stats.score > env.stats.high_score {
            env.stats.high_score = env.stats.score;
            let data = SaveData {
                high_score: env.stats.high_score,
            };
            if let Err(e) = env.save_slot.save(&data) {
                warn!("high score not persisted: {}", e);
            }
        }
        Some(Box::new(TitleScreen::new()))
    }
}
