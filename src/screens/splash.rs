//! Title card

use glam::Vec2;

use super::{ClassSelect, Ctx, Screen};
use crate::consts::*;
use crate::input::MOUSE;
use crate::ui::{Renderer, draw_string};

const TITLE: &str = "Roll-Playing Game\nCode by petrak@, art by Falkory, and music by Cass Cuttlefish\n\nClick to start!";

#[derive(Debug, Default)]
pub struct Splash;

impl Splash {
    pub fn update(self, ctx: &mut Ctx) -> Screen {
        if ctx.input.is_clicked(MOUSE) {
            Screen::ClassSelect(ClassSelect::new())
        } else {
            Screen::Splash(self)
        }
    }

    pub fn draw(&self, r: &mut dyn Renderer) {
        let pos = Vec2::new(VERT_LINE_OFFSET + CHAR_WIDTH * 8.0, CHAR_HEIGHT * 8.0);
        draw_string(r, TITLE, pos, 64, PENCIL_COLOR);
    }
}
