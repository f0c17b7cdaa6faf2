//! Per-tick input sampling
//!
//! Browser callbacks record raw key and button state as it arrives. Once per
//! tick `sample` turns that into hold counters, so a press is "clicked" on
//! exactly one tick no matter how long it is held.

use std::collections::{HashMap, HashSet};

use glam::Vec2;

use crate::consts::CANVAS_SCALE;

/// Name the primary mouse button is tracked under
pub const MOUSE: &str = "mouse";

#[derive(Debug, Default, Clone)]
pub struct InputState {
    raw: HashSet<String>,
    held_ticks: HashMap<String, u32>,
    pointer: Vec2,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_down(&mut self, key: &str) {
        self.raw.insert(key.to_string());
    }

    pub fn key_up(&mut self, key: &str) {
        self.raw.remove(key);
    }

    pub fn mouse_down(&mut self) {
        self.key_down(MOUSE);
    }

    pub fn mouse_up(&mut self) {
        self.key_up(MOUSE);
    }

    /// Record the pointer from element offset coordinates
    pub fn mouse_move(&mut self, offset_x: f32, offset_y: f32) {
        self.pointer = Vec2::new(offset_x, offset_y) / CANVAS_SCALE;
    }

    /// Advance hold counters; call once at the start of each tick
    pub fn sample(&mut self) {
        for key in &self.raw {
            *self.held_ticks.entry(key.clone()).or_insert(0) += 1;
        }
        let raw = &self.raw;
        self.held_ticks.retain(|key, _| raw.contains(key));
    }

    /// True only on the first tick a key is held
    pub fn is_clicked(&self, key: &str) -> bool {
        self.held_ticks.get(key) == Some(&1)
    }

    #[cfg(test)]
    pub fn is_pressed(&self, key: &str) -> bool {
        self.held_ticks.get(key).is_some_and(|&t| t >= 1)
    }

    /// Pointer in logical canvas units
    pub fn pointer(&self) -> Vec2 {
        self.pointer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_click_fires_once_per_press() {
        let mut input = InputState::new();
        input.mouse_down();
        let mut clicks = 0;
        for _ in 0..10 {
            input.sample();
            if input.is_clicked(MOUSE) {
                clicks += 1;
            }
            assert!(input.is_pressed(MOUSE));
        }
        assert_eq!(clicks, 1);

        input.mouse_up();
        input.sample();
        assert!(!input.is_pressed(MOUSE));

        input.mouse_down();
        input.sample();
        assert!(input.is_clicked(MOUSE));
    }

    #[test]
    fn test_press_and_release_between_ticks_is_missed() {
        let mut input = InputState::new();
        input.key_down("m");
        input.key_up("m");
        input.sample();
        assert!(!input.is_clicked("m"));
    }

    #[test]
    fn test_pointer_scaled_to_logical_units() {
        let mut input = InputState::new();
        input.mouse_move(300.0, 150.0);
        assert_eq!(input.pointer(), Vec2::new(200.0, 100.0));
    }
}
