//! Roll-Playing Game - a dice dungeon crawler for the browser canvas
//!
//! Core modules:
//! - `sim`: Gameplay core (dice, items, monsters, level generation, turn engine)
//! - `screens`: Screen state machine (splash, class select, playing, lose)
//! - `ui`: Renderer seam and layout helpers
//! - `platform`: Browser Canvas2D renderer and asset store
//! - `tuning`: Data-driven game balance

pub mod assets;
pub mod audio;
pub mod input;
pub mod platform;
pub mod screens;
pub mod settings;
pub mod sim;
pub mod tuning;
pub mod ui;

pub use input::InputState;
pub use screens::App;
pub use settings::Settings;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Fixed tick rate of the game loop
    pub const FPS: u32 = 30;
    /// Canvas is drawn at logical size and scaled up by CSS
    pub const CANVAS_SCALE: f32 = 1.5;

    /// Logical canvas size
    pub const CANVAS_WIDTH: f32 = 640.0;
    pub const CANVAS_HEIGHT: f32 = 400.0;

    /// Monospace glyph cell
    pub const CHAR_WIDTH: f32 = 8.0;
    pub const CHAR_HEIGHT: f32 = 8.0;
    pub const KERNING_Y: f32 = 2.0;
    pub const HORIZ_LINE_SPACING: f32 = CHAR_HEIGHT + KERNING_Y;
    pub const VERT_LINE_OFFSET: f32 = CHAR_WIDTH * 2.0;

    /// Maximum dice a run can hold (ready + used)
    pub const MAX_DIE_COUNT: usize = 8;
    /// Maximum items in the inventory
    pub const ITEM_CAPACITY: usize = 8;

    /// Paper palette
    pub const BG_COLOR: &str = "#ede6d5";
    pub const PINK_LINE_COLOR: &str = "#f4887c";
    pub const BLUE_LINE_COLOR: &str = "#acd8f1";
    pub const PENCIL_COLOR: &str = "#494d47";
}

/// Split text into lines no longer than `width` characters.
///
/// Breaks on whitespace; explicit newlines always start a new line.
pub fn wrap_words(text: &str, width: usize) -> Vec<String> {
    let mut out = Vec::new();
    for paragraph in text.split('\n') {
        let mut line = String::new();
        let mut line_chars = 0;
        for word in paragraph.split_whitespace() {
            let word_chars = word.chars().count();
            if !line.is_empty() && line_chars + 1 + word_chars >= width {
                out.push(std::mem::take(&mut line));
                line_chars = 0;
            }
            if !line.is_empty() {
                line.push(' ');
                line_chars += 1;
            }
            line.push_str(word);
            line_chars += word_chars;
        }
        out.push(line);
    }
    // A trailing empty paragraph is not a line
    if out.last().is_some_and(|l| l.is_empty()) && text.ends_with('\n') {
        out.pop();
    }
    out
}

/// Capitalize the first letter of every word
pub fn title_case(s: &str) -> String {
    s.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
