//! Class picker

use glam::Vec2;

use super::{Ctx, Playing, Screen};
use crate::consts::*;
use crate::input::MOUSE;
use crate::sim::PlayerClass;
use crate::ui::{Align, Rect, Renderer};
use crate::wrap_words;

/// Card width in characters
const CARD_CHARS: usize = 60;

struct ClassCard {
    class: PlayerClass,
    rect: Rect,
    lines: Vec<String>,
}

impl ClassCard {
    fn new(class: PlayerClass, pos: Vec2) -> Self {
        let text = format!(
            "{}\n{}\n{}\n{}: {}\nDifficulty: {}",
            class.description,
            class.dice_summary(),
            class.items_summary(),
            class.power.name(),
            class.power.description(),
            "♦".repeat(class.difficulty as usize),
        );
        let lines = wrap_words(&text, CARD_CHARS - 2);
        let height = HORIZ_LINE_SPACING * (lines.len() + 1) as f32;
        Self {
            class,
            rect: Rect::new(pos.x, pos.y, CHAR_WIDTH * CARD_CHARS as f32, height),
            lines,
        }
    }

    fn draw(&self, r: &mut dyn Renderer) {
        r.text(self.class.class_type.as_str(), self.rect.pos, Align::Left, PINK_LINE_COLOR);
        for (i, line) in self.lines.iter().enumerate() {
            let pos = self.rect.pos + Vec2::new(CHAR_WIDTH * 2.0, (i + 1) as f32 * HORIZ_LINE_SPACING);
            r.text(line, pos, Align::Left, PENCIL_COLOR);
        }
    }
}

pub struct ClassSelect {
    cards: Vec<ClassCard>,
}

impl Default for ClassSelect {
    fn default() -> Self {
        Self::new()
    }
}

impl ClassSelect {
    pub fn new() -> Self {
        let x = VERT_LINE_OFFSET + CHAR_WIDTH * 4.0;
        let mut y = HORIZ_LINE_SPACING * 4.0 + 4.0;
        let cards = PlayerClass::all()
            .into_iter()
            .map(|class| {
                let card = ClassCard::new(class, Vec2::new(x, y));
                y += card.rect.size.y + HORIZ_LINE_SPACING;
                card
            })
            .collect();
        Self { cards }
    }

    /// Clickable area of the n-th class
    pub fn class_rect(&self, index: usize) -> Rect {
        self.cards
            .get(index)
            .map_or(Rect::new(0.0, 0.0, 0.0, 0.0), |c| c.rect)
    }

    pub fn update(self, ctx: &mut Ctx) -> Screen {
        if !ctx.input.is_clicked(MOUSE) {
            return Screen::ClassSelect(self);
        }
        let pointer = ctx.input.pointer();
        match self.cards.into_iter().find(|c| c.rect.contains(pointer)) {
            Some(card) => Screen::Playing(Playing::start(&card.class, ctx)),
            None => Screen::ClassSelect(ClassSelect::new()),
        }
    }

    pub fn draw(&self, r: &mut dyn Renderer) {
        r.text(
            "Choose your Class",
            Vec2::new(VERT_LINE_OFFSET + CHAR_WIDTH * 4.0, HORIZ_LINE_SPACING * 2.0 + 4.0),
            Align::Left,
            PENCIL_COLOR,
        );
        for card in &self.cards {
            card.draw(r);
        }
    }
}
