//! Canvas2D renderer and image store

use std::collections::HashMap;
use std::f64::consts::FRAC_PI_2;

use glam::Vec2;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, HtmlImageElement};

use crate::assets::Sprite;
use crate::consts::*;
use crate::tuning::Tuning;
use crate::ui::{Align, Rect, Renderer};

/// Log a canvas call that threw
fn logged(result: Result<(), JsValue>, call: &str) {
    if let Err(err) = result {
        log::debug!("Canvas {call} failed: {err:?}");
    }
}

/// Element id of the optional tuning override
const TUNING_ELEMENT_ID: &str = "tuning";

/// Read `<script id="tuning" type="application/json">` if the page has one
pub fn read_tuning(document: &Document) -> Tuning {
    match document
        .get_element_by_id(TUNING_ELEMENT_ID)
        .and_then(|el| el.text_content())
    {
        Some(json) if !json.trim().is_empty() => Tuning::from_json_or_default(&json),
        _ => Tuning::default(),
    }
}

/// Every sprite, loading in the background from startup
pub struct AssetStore {
    images: HashMap<Sprite, HtmlImageElement>,
}

impl AssetStore {
    /// Start loading all images. Never blocks; unfinished images are skipped
    /// when drawn.
    pub fn load() -> Result<Self, JsValue> {
        let mut images = HashMap::with_capacity(Sprite::ALL.len());
        for sprite in Sprite::ALL {
            let img = HtmlImageElement::new()?;
            img.set_src(&sprite.url());
            images.insert(sprite, img);
        }
        log::info!("Loading {} images", images.len());
        Ok(Self { images })
    }

    /// The image, once it has finished loading
    pub fn image(&self, sprite: Sprite) -> Option<&HtmlImageElement> {
        self.images
            .get(&sprite)
            .filter(|img| img.complete() && img.natural_width() > 0)
    }
}

/// `Renderer` over a 2D canvas context at logical resolution
pub struct CanvasRenderer {
    ctx: CanvasRenderingContext2d,
    assets: AssetStore,
}

impl CanvasRenderer {
    pub fn new(canvas: &HtmlCanvasElement, assets: AssetStore) -> Result<Self, JsValue> {
        canvas.set_width(CANVAS_WIDTH as u32);
        canvas.set_height(CANVAS_HEIGHT as u32);
        // Upscale with CSS; the pointer is divided back down in InputState
        canvas.set_attribute(
            "style",
            &format!(
                "width: {}px; height: {}px; image-rendering: pixelated;",
                CANVAS_WIDTH * CANVAS_SCALE,
                CANVAS_HEIGHT * CANVAS_SCALE
            ),
        )?;

        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("canvas has no 2d context"))?
            .dyn_into()?;
        ctx.set_image_smoothing_enabled(false);
        ctx.set_font(&format!("{}px monospace", CHAR_HEIGHT + KERNING_Y));
        ctx.set_text_baseline("top");

        Ok(Self { ctx, assets })
    }
}

impl Renderer for CanvasRenderer {
    fn clear(&mut self, color: &str) {
        self.ctx.set_fill_style_str(color);
        self.ctx
            .fill_rect(0.0, 0.0, CANVAS_WIDTH as f64, CANVAS_HEIGHT as f64);
    }

    fn line(&mut self, from: Vec2, to: Vec2, width: f32, color: &str) {
        self.ctx.set_stroke_style_str(color);
        self.ctx.set_line_width(width as f64);
        self.ctx.begin_path();
        self.ctx.move_to(from.x as f64, from.y as f64);
        self.ctx.line_to(to.x as f64, to.y as f64);
        self.ctx.stroke();
    }

    fn sprite(&mut self, sprite: Sprite, dest: Rect) {
        let Some(img) = self.assets.image(sprite) else {
            return;
        };
        let drawn = self.ctx.draw_image_with_html_image_element_and_dw_and_dh(
            img,
            dest.pos.x as f64,
            dest.pos.y as f64,
            dest.size.x as f64,
            dest.size.y as f64,
        );
        logged(drawn, "drawImage");
    }

    fn sprite_region(&mut self, sprite: Sprite, src: Rect, dest: Rect) {
        let Some(img) = self.assets.image(sprite) else {
            return;
        };
        let drawn = self
            .ctx
            .draw_image_with_html_image_element_and_sw_and_sh_and_dx_and_dy_and_dw_and_dh(
                img,
                src.pos.x as f64,
                src.pos.y as f64,
                src.size.x as f64,
                src.size.y as f64,
                dest.pos.x as f64,
                dest.pos.y as f64,
                dest.size.x as f64,
                dest.size.y as f64,
            );
        logged(drawn, "drawImage");
    }

    fn text(&mut self, text: &str, pos: Vec2, align: Align, color: &str) {
        self.ctx.set_fill_style_str(color);
        self.ctx.set_text_align(match align {
            Align::Left => "left",
            Align::Center => "center",
            Align::Right => "right",
        });
        logged(self.ctx.fill_text(text, pos.x as f64, pos.y as f64), "fillText");
    }

    fn text_vertical(&mut self, text: &str, center: Vec2, color: &str) {
        self.ctx.save();
        logged(self.ctx.translate(center.x as f64, center.y as f64), "translate");
        logged(self.ctx.rotate(-FRAC_PI_2), "rotate");
        self.ctx.set_fill_style_str(color);
        self.ctx.set_text_align("center");
        logged(self.ctx.fill_text(text, 0.0, -(CHAR_HEIGHT as f64) / 2.0), "fillText");
        self.ctx.restore();
    }

    fn push_clip(&mut self, rect: Rect) {
        self.ctx.save();
        self.ctx.begin_path();
        self.ctx.rect(
            rect.pos.x as f64,
            rect.pos.y as f64,
            rect.size.x as f64,
            rect.size.y as f64,
        );
        self.ctx.clip();
    }

    fn pop_clip(&mut self) {
        self.ctx.restore();
    }
}
