//! Platform layer
//!
//! Browser glue lives behind `cfg(target_arch = "wasm32")`. The rest of the
//! crate only sees the `Renderer` and `AudioSink` seams.

#[cfg(target_arch = "wasm32")]
mod web;

#[cfg(target_arch = "wasm32")]
pub use web::{AssetStore, CanvasRenderer, read_tuning};

/// RNG seed from the wall clock
#[cfg(target_arch = "wasm32")]
pub fn clock_seed() -> u64 {
    js_sys::Date::now() as u64
}

/// RNG seed from the wall clock
#[cfg(not(target_arch = "wasm32"))]
pub fn clock_seed() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map_or(0, |d| d.as_millis() as u64)
}
