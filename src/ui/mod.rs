//! Drawing seam and layout helpers
//!
//! Screens describe what to draw through the `Renderer` trait. The browser
//! build implements it over a Canvas2D context; tests use `RecordingRenderer`.

use glam::Vec2;

use crate::assets::Sprite;
use crate::consts::*;
use crate::sim::Die;
use crate::wrap_words;

/// Size of one die face in the dice atlas
pub const DIE_TEX_SIZE: f32 = 18.0;

/// Axis-aligned rectangle in logical canvas units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    /// Inclusive on every edge
    pub fn contains(&self, point: Vec2) -> bool {
        let max = self.pos + self.size;
        point.x >= self.pos.x && point.x <= max.x && point.y >= self.pos.y && point.y <= max.y
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    pub fn offset(&self, by: Vec2) -> Self {
        Self {
            pos: self.pos + by,
            size: self.size,
        }
    }
}

/// Horizontal anchoring of a text run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

/// Everything a screen can put on the canvas
pub trait Renderer {
    /// Wipe the canvas to a flat color
    fn clear(&mut self, color: &str);

    fn line(&mut self, from: Vec2, to: Vec2, width: f32, color: &str);

    /// Stretch a whole sprite into `dest`
    fn sprite(&mut self, sprite: Sprite, dest: Rect);

    /// Copy part of a sprite sheet into `dest`
    fn sprite_region(&mut self, sprite: Sprite, src: Rect, dest: Rect);

    /// Single line of monospace text with its top edge at `pos.y`
    fn text(&mut self, text: &str, pos: Vec2, align: Align, color: &str);

    /// Text rotated a quarter turn counter-clockwise, centered on `center`
    fn text_vertical(&mut self, text: &str, center: Vec2, color: &str);

    /// Restrict drawing to `rect` until `pop_clip`
    fn push_clip(&mut self, rect: Rect);

    fn pop_clip(&mut self);
}

/// Draw word-wrapped text, returning the number of lines used
pub fn draw_string(r: &mut dyn Renderer, text: &str, pos: Vec2, chars_width: usize, color: &str) -> usize {
    let lines = wrap_words(text, chars_width);
    for (i, line) in lines.iter().enumerate() {
        let y = pos.y + i as f32 * HORIZ_LINE_SPACING;
        r.text(line, Vec2::new(pos.x, y), Align::Left, color);
    }
    lines.len()
}

/// Ruled notebook paper behind every screen
pub fn draw_paper(r: &mut dyn Renderer) {
    r.clear(BG_COLOR);
    let mut y = CHAR_HEIGHT * 3.0 - KERNING_Y;
    while y < CANVAS_HEIGHT {
        r.line(Vec2::new(0.0, y - 0.5), Vec2::new(CANVAS_WIDTH, y - 0.5), 1.0, BLUE_LINE_COLOR);
        y += HORIZ_LINE_SPACING;
    }
    r.line(
        Vec2::new(VERT_LINE_OFFSET, 0.0),
        Vec2::new(VERT_LINE_OFFSET, CANVAS_HEIGHT),
        2.0,
        PINK_LINE_COLOR,
    );
}

/// Draw a die face from the atlas with its value on top
pub fn draw_die(r: &mut dyn Renderer, die: &Die, pos: Vec2, value: u32) {
    let column = die.sides.atlas_index() as f32;
    let src = Rect::new(column * DIE_TEX_SIZE, 0.0, DIE_TEX_SIZE, DIE_TEX_SIZE);
    let dest = Rect::new(pos.x, pos.y, DIE_TEX_SIZE, DIE_TEX_SIZE);
    r.sprite_region(Sprite::DiceAtlas, src, dest);

    // Light faces get dark numerals
    let color = match die.sides.count() {
        2 | 4 | 8 => "#222",
        _ => BG_COLOR,
    };
    let text_pos = dest.center() - Vec2::new(0.0, CHAR_HEIGHT * 0.5);
    r.text(&value.to_string(), text_pos, Align::Center, color);
}

/// One recorded draw call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    Clear(String),
    Line { from: Vec2, to: Vec2 },
    Sprite { sprite: Sprite, dest: Rect },
    SpriteRegion { sprite: Sprite, src: Rect, dest: Rect },
    Text { text: String, pos: Vec2, color: String },
    PushClip(Rect),
    PopClip,
}

/// Renderer that keeps a list of what was drawn
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    pub commands: Vec<DrawCmd>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// All text drawn, in order
    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCmd::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn has_text(&self, needle: &str) -> bool {
        self.texts().iter().any(|t| t.contains(needle))
    }

    pub fn sprites(&self) -> Vec<Sprite> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCmd::Sprite { sprite, .. } | DrawCmd::SpriteRegion { sprite, .. } => Some(*sprite),
                _ => None,
            })
            .collect()
    }
}

impl Renderer for RecordingRenderer {
    fn clear(&mut self, color: &str) {
        self.commands.clear();
        self.commands.push(DrawCmd::Clear(color.to_string()));
    }

    fn line(&mut self, from: Vec2, to: Vec2, _width: f32, _color: &str) {
        self.commands.push(DrawCmd::Line { from, to });
    }

    fn sprite(&mut self, sprite: Sprite, dest: Rect) {
        self.commands.push(DrawCmd::Sprite { sprite, dest });
    }

    fn sprite_region(&mut self, sprite: Sprite, src: Rect, dest: Rect) {
        self.commands.push(DrawCmd::SpriteRegion { sprite, src, dest });
    }

    fn text(&mut self, text: &str, pos: Vec2, _align: Align, color: &str) {
        self.commands.push(DrawCmd::Text {
            text: text.to_string(),
            pos,
            color: color.to_string(),
        });
    }

    fn text_vertical(&mut self, text: &str, center: Vec2, color: &str) {
        self.text(text, center, Align::Center, color);
    }

    fn push_clip(&mut self, rect: Rect) {
        self.commands.push(DrawCmd::PushClip(rect));
    }

    fn pop_clip(&mut self) {
        self.commands.push(DrawCmd::PopClip);
    }
}
