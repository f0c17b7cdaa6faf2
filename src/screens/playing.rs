//! The dungeon: monster art, dice trays, inventory, info panel and log

use glam::Vec2;

use super::{Ctx, Lose, Screen};
use crate::assets::{Sound, Sprite};
use crate::consts::*;
use crate::input::MOUSE;
use crate::sim::{CoverMode, GameEvent, GameplayState, Mode, Monster, PlayerClass, Pool, TurnOutcome};
use crate::title_case;
use crate::ui::{Align, DIE_TEX_SIZE, Rect, Renderer, draw_die, draw_string};
use crate::wrap_words;

const ART_WIDTH: f32 = 240.0;
const ART_HEIGHT: f32 = 240.0;
const INFO_BOX_HEIGHT: f32 = CHAR_WIDTH * 23.75;
const DIE_TRAY_HEIGHT: f32 = 54.0;
const INFO_BOX_CHARS: usize = 48;
const LOG_LINES: usize = 18;
const ITEM_SIZE: f32 = 20.0;

/// Animation lengths in ticks
const DIE_ROLL_TIME: u64 = 20;
const MONSTER_ANIM_TIME: u64 = 20;
const MONSTER_FALL_TIME: u64 = 8;
const BOB_PERIOD: u64 = 35;

/// Clicking here claims the chest or ends a lost run
pub(crate) const INFO_PANEL: Rect = Rect::new(ART_WIDTH, 0.0, CANVAS_WIDTH - ART_WIDTH, INFO_BOX_HEIGHT);

const ART: Rect = Rect::new(0.0, 0.0, ART_WIDTH, ART_HEIGHT);

/// Die slot `index` of a tray
pub(crate) fn die_rect(pool: Pool, index: usize) -> Rect {
    let x = VERT_LINE_OFFSET + CHAR_WIDTH + index as f32 * (DIE_TEX_SIZE + CHAR_WIDTH);
    let tray = match pool {
        Pool::Ready => 0.0,
        Pool::Used => DIE_TRAY_HEIGHT,
    };
    let y = ART_HEIGHT + (DIE_TRAY_HEIGHT / 2.0 - DIE_TEX_SIZE / 2.0) + tray;
    Rect::new(x, y, DIE_TEX_SIZE, DIE_TEX_SIZE)
}

/// Inventory slot `index`, in the tray under the used dice
pub(crate) fn item_rect(index: usize) -> Rect {
    let die = die_rect(Pool::Used, index);
    Rect::new(die.pos.x - 1.0, die.pos.y + DIE_TRAY_HEIGHT - 8.0, ITEM_SIZE, ITEM_SIZE)
}

/// The class power button, right-aligned on the log header row
pub(crate) fn power_rect(label: &str) -> Rect {
    let width = label.chars().count() as f32 * CHAR_WIDTH;
    Rect::new(
        CANVAS_WIDTH - CHAR_WIDTH - width,
        INFO_BOX_HEIGHT + CHAR_HEIGHT + 7.0,
        width,
        CHAR_HEIGHT,
    )
}

/// Things on the play screen that react to the pointer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Widget {
    Die { pool: Pool, index: usize },
    Item(usize),
    Power,
    InfoPanel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AnimKind {
    /// Previous monster falls, next one slides in
    Kill,
    /// Previous monster runs off with the die
    Run,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct MonsterAnim {
    kind: AnimKind,
    prev: Monster,
    start: u64,
}

pub struct Playing {
    state: GameplayState,
    frames: u64,
    hovered: Option<Widget>,
    anim: Option<MonsterAnim>,
    /// Frame each slot last started rolling
    roll_started: [[Option<u64>; MAX_DIE_COUNT]; 2],
}

impl Playing {
    pub fn start(class: &PlayerClass, ctx: &mut Ctx) -> Self {
        let state = GameplayState::start(class, ctx.rng, ctx.tuning);
        let mut playing = Self {
            state,
            frames: 0,
            hovered: None,
            anim: None,
            roll_started: [[None; MAX_DIE_COUNT]; 2],
        };
        playing.react(ctx);
        playing
    }

    pub fn state(&self) -> &GameplayState {
        &self.state
    }

    fn power_label(&self) -> String {
        let power = self.state.class().power();
        if self.state.power_used_this_floor() {
            format!("{} (used)", power.name())
        } else {
            format!("[{}]", power.name())
        }
    }

    fn widget_at(&self, point: Vec2) -> Option<Widget> {
        for pool in [Pool::Ready, Pool::Used] {
            if let Some(index) = (0..MAX_DIE_COUNT).find(|&i| die_rect(pool, i).contains(point)) {
                return Some(Widget::Die { pool, index });
            }
        }
        if let Some(index) = (0..ITEM_CAPACITY).find(|&i| item_rect(i).contains(point)) {
            return Some(Widget::Item(index));
        }
        if power_rect(&self.power_label()).contains(point) {
            return Some(Widget::Power);
        }
        INFO_PANEL.contains(point).then_some(Widget::InfoPanel)
    }

    pub fn update(mut self, ctx: &mut Ctx) -> Screen {
        self.frames += 1;
        if self
            .anim
            .is_some_and(|a| self.frames - a.start > MONSTER_ANIM_TIME)
        {
            self.anim = None;
        }

        let hovered = self.widget_at(ctx.input.pointer());
        if hovered != self.hovered {
            self.state.clear_hover();
            match hovered {
                Some(Widget::Die { pool, index }) => self.state.hover_die(pool, index),
                Some(Widget::Item(index)) => self.state.hover_item(index),
                _ => {}
            }
            self.hovered = hovered;
        }

        if ctx.input.is_clicked(MOUSE) {
            let result = match hovered {
                Some(Widget::Die { pool, index }) => self.state.use_die(pool, index, ctx.rng, ctx.tuning),
                Some(Widget::Item(index)) => self.state.use_item(index, ctx.rng),
                Some(Widget::Power) => self.state.activate_power(ctx.rng, ctx.tuning),
                Some(Widget::InfoPanel) => return self.click_info_panel(ctx),
                None => Ok(TurnOutcome::Cancelled),
            };
            if let Err(err) = result {
                log::debug!("Ignored click: {err}");
            }
        }

        self.react(ctx);
        Screen::Playing(self)
    }

    fn click_info_panel(mut self, ctx: &mut Ctx) -> Screen {
        match self.state.mode() {
            Mode::Treasure => {
                self.state = match self.state.descend(ctx.rng, ctx.tuning) {
                    Ok(next) => next,
                    Err(same) => same,
                };
                self.anim = None;
                self.hovered = None;
                self.roll_started = [[Some(self.frames); MAX_DIE_COUNT]; 2];
                ctx.audio.play(Sound::DiceRoll);
                self.react(ctx);
                Screen::Playing(self)
            }
            Mode::Lost => match self.state.summary() {
                Some(summary) => Screen::Lose(Lose::new(summary)),
                None => Screen::Playing(self),
            },
            Mode::Monster => {
                log::debug!("Info panel click ignored mid-floor");
                Screen::Playing(self)
            }
        }
    }

    /// Turn engine events into sounds and animations
    fn react(&mut self, ctx: &mut Ctx) {
        let mut rolled = false;
        for event in self.state.drain_events() {
            match event {
                GameEvent::MonsterEntered(monster) => ctx.audio.play(monster.family().enter_sound()),
                GameEvent::MonsterDefeated(monster) => {
                    ctx.audio.play(monster.family().die_sound());
                    self.start_anim(AnimKind::Kill, monster);
                }
                GameEvent::MonsterEscaped(monster) => {
                    ctx.audio.play(monster.family().win_sound());
                    self.start_anim(AnimKind::Run, monster);
                }
                GameEvent::DieRolled { pool, index } => {
                    let tray = match pool {
                        Pool::Ready => 0,
                        Pool::Used => 1,
                    };
                    if let Some(slot) = self.roll_started[tray].get_mut(index) {
                        *slot = Some(self.frames);
                    }
                    rolled = true;
                }
                GameEvent::FloorCleared | GameEvent::RunLost => {}
            }
        }
        if rolled {
            ctx.audio.play(Sound::DiceRoll);
        }
    }

    fn start_anim(&mut self, kind: AnimKind, prev: Monster) {
        self.anim = Some(MonsterAnim {
            kind,
            prev,
            start: self.frames,
        });
    }

    // === Drawing ===

    pub fn draw(&self, r: &mut dyn Renderer) {
        self.draw_boxes(r);
        self.draw_log(r);

        let labels_x = CHAR_HEIGHT * 0.5;
        r.text_vertical("Ready", Vec2::new(labels_x, ART_HEIGHT + DIE_TRAY_HEIGHT * 0.5), PENCIL_COLOR);
        r.text_vertical("Used", Vec2::new(labels_x, ART_HEIGHT + DIE_TRAY_HEIGHT * 1.5), PENCIL_COLOR);
        r.text_vertical("Items", Vec2::new(labels_x, ART_HEIGHT + DIE_TRAY_HEIGHT * 2.5), PENCIL_COLOR);

        r.push_clip(ART);
        self.draw_art(r);
        r.pop_clip();

        for pool in [Pool::Ready, Pool::Used] {
            for index in 0..self.state.pool(pool).len() {
                self.draw_die_slot(r, pool, index);
            }
        }
        for (index, item) in self.state.items().iter().enumerate() {
            let rect = item_rect(index);
            r.sprite(item.sprite(), rect);
            let label_pos = Vec2::new(rect.center().x, rect.pos.y + ITEM_SIZE + 4.0);
            r.text(&item.short(), label_pos, Align::Center, PENCIL_COLOR);
        }

        self.draw_info(r);

        if !self.state.class().power().is_passive() {
            let label = self.power_label();
            let color = if self.state.power_used_this_floor() {
                BLUE_LINE_COLOR
            } else {
                PINK_LINE_COLOR
            };
            r.text(&label, power_rect(&label).pos, Align::Left, color);
        }
    }

    fn draw_boxes(&self, r: &mut dyn Renderer) {
        let h = |y: f32, from: f32, to: f32| (Vec2::new(from, y + 0.5), Vec2::new(to, y + 0.5));
        let lines = [
            h(ART_HEIGHT, 0.0, ART_WIDTH),
            h(ART_HEIGHT + DIE_TRAY_HEIGHT, 0.0, ART_WIDTH),
            h(ART_HEIGHT + DIE_TRAY_HEIGHT * 2.0, 0.0, ART_WIDTH),
            h(INFO_BOX_HEIGHT, ART_WIDTH, CANVAS_WIDTH),
            (Vec2::new(ART_WIDTH + 0.5, 0.0), Vec2::new(ART_WIDTH + 0.5, CANVAS_HEIGHT)),
        ];
        for (from, to) in lines {
            r.line(from, to, 1.0, PENCIL_COLOR);
        }
    }

    fn draw_log(&self, r: &mut dyn Renderer) {
        let x = ART_WIDTH + CHAR_WIDTH / 2.0;
        r.text(
            "Game Log",
            Vec2::new(x, INFO_BOX_HEIGHT + CHAR_HEIGHT + 7.0),
            Align::Left,
            PINK_LINE_COLOR,
        );

        // Newest entries, wrapped, filling the box bottom-up
        let mut lines: Vec<String> = Vec::with_capacity(LOG_LINES);
        'entries: for entry in self.state.log_lines().iter().rev() {
            for line in wrap_words(entry, INFO_BOX_CHARS).into_iter().rev() {
                lines.push(line);
                if lines.len() >= LOG_LINES {
                    break 'entries;
                }
            }
        }
        for (i, line) in lines.iter().rev().enumerate() {
            let y = INFO_BOX_HEIGHT + 3.0 * CHAR_HEIGHT + i as f32 * HORIZ_LINE_SPACING;
            r.text(line, Vec2::new(x, y), Align::Left, PENCIL_COLOR);
        }
    }

    fn draw_art(&self, r: &mut dyn Renderer) {
        let current = match self.state.mode() {
            Mode::Monster => self.state.current_monster().map(Monster::sprite),
            Mode::Treasure => Some(Sprite::TreasureChest),
            Mode::Lost => None,
        };
        let Some(current) = current else {
            return;
        };

        let Some(anim) = self.anim else {
            let bob = if self.frames % BOB_PERIOD >= BOB_PERIOD / 2 { -1.0 } else { 1.0 };
            r.sprite(current, ART.offset(Vec2::new(0.0, bob)));
            return;
        };

        let dt = self.frames.saturating_sub(anim.start);
        let prev = anim.prev.sprite();
        match anim.kind {
            AnimKind::Kill if dt < MONSTER_FALL_TIME => {
                let t = ease_out(dt as f32 / MONSTER_FALL_TIME as f32);
                let dest = Rect::new(0.0, t * ART_HEIGHT, ART_WIDTH, (1.0 - t) * ART_HEIGHT);
                r.sprite(prev, dest);
            }
            AnimKind::Kill => {
                let progress = (dt - MONSTER_FALL_TIME) as f32 / (MONSTER_ANIM_TIME - MONSTER_FALL_TIME) as f32;
                let t = ease_out(progress.min(1.0));
                r.sprite(current, ART.offset(Vec2::new((1.0 - t) * ART_WIDTH, 0.0)));
            }
            AnimKind::Run => {
                let shift = (dt as f32 / MONSTER_ANIM_TIME as f32).min(1.0) * ART_WIDTH;
                r.sprite(prev, ART.offset(Vec2::new(-shift, 0.0)));
                r.sprite(current, ART.offset(Vec2::new(ART_WIDTH - shift, 0.0)));
            }
        }
    }

    fn draw_die_slot(&self, r: &mut dyn Renderer, pool: Pool, index: usize) {
        let Some(rolled) = self.state.pool(pool).get(index) else {
            return;
        };
        let Some(die) = self.state.arena().get(rolled.id) else {
            return;
        };
        let rect = die_rect(pool, index);
        let tray = match pool {
            Pool::Ready => 0,
            Pool::Used => 1,
        };

        let mut pos = rect.pos;
        let mut shown = rolled.value;
        let rolling = self.roll_started[tray]
            .get(index)
            .copied()
            .flatten()
            .map(|start| self.frames.saturating_sub(start))
            .filter(|&t| t < DIE_ROLL_TIME);
        if let Some(t) = rolling {
            // Tumble: flicker faces and shake in place
            let sides = die.sides.count() as u64;
            shown = ((t * 7 + index as u64 * 13) % sides + 1) as u32;
            let jiggle = |k: u64| ((t * k + index as u64) % 5) as f32 - 2.0;
            pos += Vec2::new(jiggle(3), jiggle(7));
        }
        draw_die(r, die, pos, shown);

        let center_x = rect.center().x;
        r.text(
            &die.sides.to_string(),
            Vec2::new(center_x, rect.pos.y - CHAR_HEIGHT - 4.0),
            Align::Center,
            PENCIL_COLOR,
        );
        if let Some(die_mod) = &die.die_mod {
            r.text(
                &die_mod.short(),
                Vec2::new(center_x, rect.pos.y + DIE_TEX_SIZE + 4.0),
                Align::Center,
                PENCIL_COLOR,
            );
        }
    }

    fn info_text(&self) -> (String, String) {
        let state = &self.state;
        match state.cover() {
            CoverMode::HoverItem { index } if index < state.items().len() => {
                let item = &state.items()[index];
                (title_case(&item.name()), item.description())
            }
            CoverMode::HoverDie { pool, index } if index < state.pool(pool).len() => {
                let rolled = state.pool(pool)[index];
                match state.arena().get(rolled.id) {
                    Some(die) => {
                        let mut text = format!("A {} that has rolled a {}.", die.sides, rolled.value);
                        if let Some(m) = &die.die_mod {
                            text.push_str(&format!("\n\nEquipped with {}: {}", m.name(), m.description()));
                        }
                        (die.sides.to_string(), text)
                    }
                    None => (String::new(), String::new()),
                }
            }
            CoverMode::ApplyingItem { item_index } => match state.items().get(item_index) {
                Some(item) => (
                    format!("Applying {}", item.name()),
                    format!("Click on a die to apply the {} to.", item.name()),
                ),
                None => (String::new(), String::new()),
            },
            CoverMode::ApplyingPower => {
                let power = state.class().power();
                (
                    format!("Using {}", power.name()),
                    format!("Click on a die. {}", power.description()),
                )
            }
            _ => self.mode_text(),
        }
    }

    fn mode_text(&self) -> (String, String) {
        let state = &self.state;
        match (state.mode(), state.current_monster()) {
            (Mode::Monster, Some(monster)) => {
                let mut next: Vec<String> = state.upcoming().iter().map(Monster::name).collect();
                next.push("treasure chest".to_string());
                (
                    title_case(&monster.name()),
                    format!("{}\n\nComing up: {}.", monster.blurb(), next.join(", ")),
                )
            }
            (Mode::Treasure, _) => {
                let prize = state
                    .treasure()
                    .map_or_else(|| "die".to_string(), |d| d.sides.to_string());
                (
                    format!("Floor {} defeated!", state.depth() + 1),
                    format!(
                        "You found a treasure chest with a {prize} in it! Click here to claim it and go to the next floor."
                    ),
                )
            }
            (_, monster) => (
                "You died!".to_string(),
                format!(
                    "You were defenseless against the {}.\n\nClick here to see your stats.",
                    monster.map_or_else(|| "dark".to_string(), Monster::name)
                ),
            ),
        }
    }

    fn draw_info(&self, r: &mut dyn Renderer) {
        let (header, text) = self.info_text();
        let x = ART_WIDTH + CHAR_WIDTH / 2.0;
        draw_string(r, &header, Vec2::new(x, CHAR_HEIGHT + 6.0), INFO_BOX_CHARS, PINK_LINE_COLOR);
        draw_string(r, &text, Vec2::new(x, CHAR_HEIGHT * 3.0), INFO_BOX_CHARS, PENCIL_COLOR);
    }
}

/// Quadratic ease-out on [0, 1]
fn ease_out(t: f32) -> f32 {
    1.0 - (1.0 - t) * (1.0 - t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::RecordingAudio;
    use crate::input::InputState;
    use crate::sim::ClassType;
    use crate::tuning::Tuning;
    use crate::ui::RecordingRenderer;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    struct Harness {
        input: InputState,
        rng: Pcg32,
        tuning: Tuning,
        audio: RecordingAudio,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                input: InputState::new(),
                rng: Pcg32::seed_from_u64(11),
                tuning: Tuning::default(),
                audio: RecordingAudio::default(),
            }
        }

        fn start(&mut self, class: ClassType) -> Playing {
            let mut ctx = Ctx {
                input: &self.input,
                rng: &mut self.rng,
                tuning: &self.tuning,
                audio: &mut self.audio,
            };
            Playing::start(&PlayerClass::new(class), &mut ctx)
        }

        /// One tick with the mouse pressed at `pos`, then one released
        fn click(&mut self, playing: Playing, pos: Vec2) -> Screen {
            self.input.mouse_move(pos.x * CANVAS_SCALE, pos.y * CANVAS_SCALE);
            self.input.mouse_down();
            self.input.sample();
            let screen = self.tick(playing);
            self.input.mouse_up();
            self.input.sample();
            match screen {
                Screen::Playing(p) => self.tick(p),
                other => other,
            }
        }

        fn tick(&mut self, playing: Playing) -> Screen {
            let mut ctx = Ctx {
                input: &self.input,
                rng: &mut self.rng,
                tuning: &self.tuning,
                audio: &mut self.audio,
            };
            playing.update(&mut ctx)
        }
    }

    fn playing(screen: Screen) -> Playing {
        match screen {
            Screen::Playing(p) => p,
            other => panic!("expected playing, got {}", other.name()),
        }
    }

    #[test]
    fn test_start_plays_first_monster_entry() {
        let mut h = Harness::new();
        let p = h.start(ClassType::Fighter);
        assert_eq!(p.state().depth(), 0);
        assert_eq!(h.audio.played, vec![Sound::ModronEnter]);
    }

    #[test]
    fn test_clicking_ready_die_fights_monodron() {
        let mut h = Harness::new();
        let p = h.start(ClassType::Fighter);
        let p = playing(h.click(p, die_rect(Pool::Ready, 0).center()));
        // Any roll divides by 1
        assert_eq!(p.state().monster_index(), 1);
        assert_eq!(p.state().used().len(), 1);
        assert!(h.audio.played.contains(&Sound::ModronDie));
        assert!(h.audio.played.contains(&Sound::GoblinEnter));
        assert!(p.anim.is_some());
    }

    #[test]
    fn test_empty_slot_click_is_ignored() {
        let mut h = Harness::new();
        let p = h.start(ClassType::Fighter);
        let p = playing(h.click(p, die_rect(Pool::Ready, 7).center()));
        assert_eq!(p.state().monster_index(), 0);
    }

    #[test]
    fn test_hover_item_fills_info_panel() {
        let mut h = Harness::new();
        let p = h.start(ClassType::Fighter);
        h.input.mouse_move(item_rect(1).center().x * CANVAS_SCALE, item_rect(1).center().y * CANVAS_SCALE);
        h.input.sample();
        let p = playing(h.tick(p));
        assert_eq!(p.state().cover(), CoverMode::HoverItem { index: 1 });

        let mut r = RecordingRenderer::new();
        p.draw(&mut r);
        assert!(r.has_text("Healing Potion"));
        assert!(r.has_text("Restores a single die."));
    }

    #[test]
    fn test_item_then_die_applies() {
        let mut h = Harness::new();
        let p = h.start(ClassType::Fighter);
        // Fighter's third item is a luck potion
        let p = playing(h.click(p, item_rect(2).center()));
        assert_eq!(p.state().cover(), CoverMode::ApplyingItem { item_index: 2 });
        let mut r = RecordingRenderer::new();
        p.draw(&mut r);
        assert!(r.has_text("Applying luck potion"));

        let p = playing(h.click(p, die_rect(Pool::Ready, 0).center()));
        assert_eq!(p.state().items().len(), 2);
        assert_eq!(p.state().monster_index(), 0);
        assert!(h.audio.played.contains(&Sound::DiceRoll));
    }

    #[test]
    fn test_power_button_starts_second_wind() {
        let mut h = Harness::new();
        let p = h.start(ClassType::Fighter);
        let label = p.power_label();
        let p = playing(h.click(p, power_rect(&label).center()));
        assert_eq!(p.state().cover(), CoverMode::ApplyingPower);
    }

    #[test]
    fn test_treasure_click_descends() {
        let mut h = Harness::new();
        let mut p = h.start(ClassType::Fighter);
        for _ in 0..3 {
            p = playing(h.click(p, die_rect(Pool::Ready, 0).center()));
        }
        assert_eq!(p.state().mode(), Mode::Treasure);
        for _ in 0..=MONSTER_ANIM_TIME {
            p = playing(h.tick(p));
        }
        let mut r = RecordingRenderer::new();
        p.draw(&mut r);
        assert!(r.has_text("Floor 1 defeated!"));
        assert!(r.sprites().contains(&Sprite::TreasureChest));

        let p = playing(h.click(p, INFO_PANEL.center()));
        assert_eq!(p.state().depth(), 1);
        assert_eq!(p.state().mode(), Mode::Monster);
    }

    #[test]
    fn test_log_shows_newest_lines() {
        let mut h = Harness::new();
        let p = h.start(ClassType::Wizard);
        let mut r = RecordingRenderer::new();
        p.draw(&mut r);
        assert!(r.has_text("Game Log"));
        assert!(r.has_text("don't run out of"));
    }
}
