//! Game over card with run stats

use glam::Vec2;

use super::{ClassSelect, Ctx, Screen};
use crate::consts::*;
use crate::input::MOUSE;
use crate::sim::RunSummary;
use crate::ui::{Renderer, draw_string};

#[derive(Debug)]
pub struct Lose {
    summary: RunSummary,
}

impl Lose {
    pub fn new(summary: RunSummary) -> Self {
        log::info!(
            "Run over on floor {}, killed by {}",
            summary.depth + 1,
            summary.died_to.name()
        );
        Self { summary }
    }

    pub fn update(self, ctx: &mut Ctx) -> Screen {
        if ctx.input.is_clicked(MOUSE) {
            Screen::ClassSelect(ClassSelect::new())
        } else {
            Screen::Lose(self)
        }
    }

    pub fn draw(&self, r: &mut dyn Renderer) {
        let text = format!(
            "You died!\n\nYou made it to floor {}, where you were killed by a {}.\n\nClick to play again.",
            self.summary.depth + 1,
            self.summary.died_to.name()
        );
        let pos = Vec2::new(VERT_LINE_OFFSET + CHAR_WIDTH, CHAR_HEIGHT * 8.0);
        draw_string(r, &text, pos, 48, PENCIL_COLOR);
    }
}
