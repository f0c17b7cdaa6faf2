//! Sound output
//!
//! Screens talk to an `AudioSink`. The browser build plays clips through the
//! Web Audio API; tests and the native smoke run record what would play.

use crate::assets::Sound;
use crate::settings::Settings;

/// Where the game sends sounds
pub trait AudioSink {
    /// Fire a clip. `Sound::BgMusic` starts the looping track.
    fn play(&mut self, sound: Sound);

    /// Apply mute and volume levels
    fn apply_settings(&mut self, settings: &Settings);
}

/// Sink that remembers what was played
#[derive(Debug, Default, Clone)]
pub struct RecordingAudio {
    pub played: Vec<Sound>,
    pub muted: bool,
}

impl AudioSink for RecordingAudio {
    fn play(&mut self, sound: Sound) {
        if !self.muted {
            self.played.push(sound);
        }
    }

    fn apply_settings(&mut self, settings: &Settings) {
        self.muted = settings.muted;
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::WebAudio;

#[cfg(target_arch = "wasm32")]
mod web {
    use std::collections::HashMap;

    use web_sys::{AudioContext, GainNode, HtmlAudioElement};

    use super::AudioSink;
    use crate::assets::Sound;
    use crate::settings::Settings;

    /// Web Audio backed sink
    ///
    /// Clips are `<audio>` elements created up front so loading starts at
    /// startup. The background track is routed through a gain node.
    pub struct WebAudio {
        ctx: Option<AudioContext>,
        music_gain: Option<GainNode>,
        clips: HashMap<Sound, HtmlAudioElement>,
        music_started: bool,
        sfx_volume: f32,
        muted: bool,
    }

    impl WebAudio {
        pub fn new(settings: &Settings) -> Self {
            // May fail outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - music gain disabled");
            }

            let mut clips = HashMap::new();
            for sound in Sound::ALL {
                match HtmlAudioElement::new_with_src(&sound.url()) {
                    Ok(el) => {
                        clips.insert(sound, el);
                    }
                    Err(err) => log::warn!("Could not create audio for {}: {err:?}", sound.file_stem()),
                }
            }

            let music_gain = ctx.as_ref().and_then(|ctx| {
                let music = clips.get(&Sound::BgMusic)?;
                music.set_loop(true);
                let source = ctx.create_media_element_source(music).ok()?;
                let gain = ctx.create_gain().ok()?;
                source.connect_with_audio_node(&gain).ok()?;
                gain.connect_with_audio_node(&ctx.destination()).ok()?;
                Some(gain)
            });

            let mut audio = Self {
                ctx,
                music_gain,
                clips,
                music_started: false,
                sfx_volume: 1.0,
                muted: false,
            };
            audio.apply_settings(settings);
            log::info!("Audio ready: {} clips", audio.clips.len());
            audio
        }

        /// Browsers keep the context suspended until a user gesture
        fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                if ctx.state() == web_sys::AudioContextState::Suspended {
                    if let Err(err) = ctx.resume() {
                        log::debug!("AudioContext did not resume: {err:?}");
                    }
                }
            }
        }
    }

    impl AudioSink for WebAudio {
        fn play(&mut self, sound: Sound) {
            self.resume();
            let Some(el) = self.clips.get(&sound) else {
                return;
            };

            if sound == Sound::BgMusic {
                if !self.music_started {
                    self.music_started = el.play().is_ok();
                }
                return;
            }

            if self.muted {
                return;
            }
            el.set_volume(self.sfx_volume as f64);
            el.set_current_time(0.0);
            if let Err(err) = el.play() {
                log::debug!("Clip {} did not play: {err:?}", sound.file_stem());
            }
        }

        fn apply_settings(&mut self, settings: &Settings) {
            self.muted = settings.muted;
            self.sfx_volume = settings.effective_sfx_volume();
            let music = settings.effective_music_volume();
            match &self.music_gain {
                Some(gain) => gain.gain().set_value(music),
                None => {
                    if let Some(el) = self.clips.get(&Sound::BgMusic) {
                        el.set_volume(music as f64);
                    }
                }
            }
        }
    }
}
