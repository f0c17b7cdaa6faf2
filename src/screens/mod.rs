//! Screen state machine
//!
//! Splash -> class select -> playing -> lose -> class select. Each screen
//! consumes itself on update and returns the screen for the next tick.

mod class_select;
mod lose;
mod playing;
mod splash;

pub use class_select::ClassSelect;
pub use lose::Lose;
pub use playing::Playing;
pub use splash::Splash;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::assets::Sound;
use crate::audio::AudioSink;
use crate::consts::{CANVAS_HEIGHT, CANVAS_WIDTH};
use crate::input::InputState;
use crate::settings::Settings;
use crate::sim::{Mode, Pool};
use crate::tuning::Tuning;
use crate::ui::{Renderer, draw_paper};

/// Key that toggles mute
pub const MUTE_KEY: &str = "m";

/// Shared per-tick context handed to screens
pub struct Ctx<'a> {
    pub input: &'a InputState,
    pub rng: &'a mut Pcg32,
    pub tuning: &'a Tuning,
    pub audio: &'a mut dyn AudioSink,
}

pub enum Screen {
    Splash(Splash),
    ClassSelect(ClassSelect),
    Playing(Playing),
    Lose(Lose),
}

impl Screen {
    pub fn name(&self) -> &'static str {
        match self {
            Screen::Splash(_) => "splash",
            Screen::ClassSelect(_) => "class select",
            Screen::Playing(_) => "playing",
            Screen::Lose(_) => "lose",
        }
    }

    fn update(self, ctx: &mut Ctx) -> Screen {
        match self {
            Screen::Splash(s) => s.update(ctx),
            Screen::ClassSelect(s) => s.update(ctx),
            Screen::Playing(s) => s.update(ctx),
            Screen::Lose(s) => s.update(ctx),
        }
    }

    fn draw(&self, r: &mut dyn Renderer) {
        match self {
            Screen::Splash(s) => s.draw(r),
            Screen::ClassSelect(s) => s.draw(r),
            Screen::Playing(s) => s.draw(r),
            Screen::Lose(s) => s.draw(r),
        }
    }
}

/// The whole game: current screen plus the things that outlive screens
pub struct App {
    screen: Screen,
    rng: Pcg32,
    tuning: Tuning,
    settings: Settings,
    music_started: bool,
}

impl App {
    pub fn new(seed: u64, tuning: Tuning, settings: Settings) -> Self {
        log::info!("App created with seed {seed}");
        Self {
            screen: Screen::Splash(Splash),
            rng: Pcg32::seed_from_u64(seed),
            tuning,
            settings,
            music_started: false,
        }
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Advance one tick. `input` must already be sampled for this tick.
    pub fn update(&mut self, input: &InputState, audio: &mut dyn AudioSink) {
        // Browsers only allow audio after a user gesture
        if !self.music_started && input.is_clicked(crate::input::MOUSE) {
            audio.apply_settings(&self.settings);
            audio.play(Sound::BgMusic);
            self.music_started = true;
        }
        if input.is_clicked(MUTE_KEY) {
            self.settings.toggle_mute();
            audio.apply_settings(&self.settings);
        }

        let mut ctx = Ctx {
            input,
            rng: &mut self.rng,
            tuning: &self.tuning,
            audio,
        };
        let before = self.screen.name();
        let current = std::mem::replace(&mut self.screen, Screen::Splash(Splash));
        self.screen = current.update(&mut ctx);
        if self.screen.name() != before {
            log::info!("Screen: {before} -> {}", self.screen.name());
        }
    }

    pub fn draw(&self, r: &mut dyn Renderer) {
        draw_paper(r);
        self.screen.draw(r);
    }

    /// Where a player who always spends the first ready die would click next.
    /// `None` once the run is over.
    pub fn autoplay_target(&self) -> Option<Vec2> {
        match &self.screen {
            Screen::Splash(_) => Some(Vec2::new(CANVAS_WIDTH * 0.5, CANVAS_HEIGHT * 0.5)),
            Screen::ClassSelect(s) => Some(s.class_rect(0).center()),
            Screen::Playing(p) => Some(match p.state().mode() {
                Mode::Monster => playing::die_rect(Pool::Ready, 0).center(),
                Mode::Treasure | Mode::Lost => playing::INFO_PANEL.center(),
            }),
            Screen::Lose(_) => None,
        }
    }
}
