//! Audio cues
//!
//! The simulation never touches audio. The driver turns tick events into
//! `AudioCue`s and hands them to whatever `AudioCueSink` it was given.
//! On the web, `WebAudioCueSink` synthesizes them with oscillators; no
//! sound files needed.

/// Sound cue types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioCue {
    /// Footstep (sampled, not every moving tick)
    Step,
    /// Player slipped into cover
    Hide,
    /// Detection crossed the danger threshold
    Danger,
    /// Run lost
    Caught,
    /// Run won
    Escape,
}

/// Oscillator shape, platform independent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
    Sawtooth,
}

/// Single-oscillator voice: frequency (Hz), shape, peak gain, length (s)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Voice {
    pub freq: f32,
    pub waveform: Waveform,
    pub gain: f32,
    pub duration: f64,
}

impl AudioCue {
    pub fn voice(&self) -> Voice {
        let (freq, waveform, gain, duration) = match self {
            AudioCue::Step => (150.0, Waveform::Square, 0.1, 0.05),
            AudioCue::Hide => (200.0, Waveform::Sine, 0.15, 0.2),
            AudioCue::Danger => (800.0, Waveform::Sawtooth, 0.2, 0.15),
            AudioCue::Caught => (100.0, Waveform::Sawtooth, 0.3, 0.5),
            AudioCue::Escape => (600.0, Waveform::Sine, 0.2, 0.4),
        };
        Voice {
            freq,
            waveform,
            gain,
            duration,
        }
    }
}

/// Capability to play cues, injected into the driver
pub trait AudioCueSink {
    fn play(&mut self, cue: AudioCue);
}

impl<S: AudioCueSink + ?Sized> AudioCueSink for Box<S> {
    fn play(&mut self, cue: AudioCue) {
        (**self).play(cue);
    }
}

/// Discards every cue
#[derive(Debug, Clone, Copy, Default)]
pub struct NullCueSink;

impl AudioCueSink for NullCueSink {
    fn play(&mut self, _cue: AudioCue) {}
}

/// Logs cues at debug level (headless runs)
#[derive(Debug, Clone, Copy, Default)]
pub struct LogCueSink;

impl AudioCueSink for LogCueSink {
    fn play(&mut self, cue: AudioCue) {
        log::debug!("cue: {:?}", cue);
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::WebAudioCueSink;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{AudioCue, AudioCueSink, Voice, Waveform};

    /// Web Audio backed cue player
    pub struct WebAudioCueSink {
        ctx: Option<AudioContext>,
        master_volume: f32,
        muted: bool,
    }

    impl Default for WebAudioCueSink {
        fn default() -> Self {
            Self::new()
        }
    }

    impl WebAudioCueSink {
        pub fn new() -> Self {
            // May fail outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                master_volume: 0.8,
                muted: false,
            }
        }

        /// Set master volume (0.0 - 1.0)
        pub fn set_master_volume(&mut self, vol: f32) {
            self.master_volume = vol.clamp(0.0, 1.0);
        }

        pub fn set_muted(&mut self, muted: bool) {
            self.muted = muted;
        }

        fn effective_volume(&self) -> f32 {
            if self.muted { 0.0 } else { self.master_volume }
        }

        fn create_osc(
            &self,
            ctx: &AudioContext,
            freq: f32,
            waveform: Waveform,
        ) -> Option<(OscillatorNode, GainNode)> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(match waveform {
                Waveform::Sine => OscillatorType::Sine,
                Waveform::Square => OscillatorType::Square,
                Waveform::Sawtooth => OscillatorType::Sawtooth,
            });
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            Some((osc, gain))
        }

        fn play_voice(&self, ctx: &AudioContext, voice: Voice, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, voice.freq, voice.waveform) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(voice.gain * vol, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + voice.duration)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + voice.duration).ok();
        }
    }

    impl AudioCueSink for WebAudioCueSink {
        fn play(&mut self, cue: AudioCue) {
            let vol = self.effective_volume();
            if vol <= 0.0 {
                return;
            }
            let Some(ctx) = &self.ctx else { return };

            // Browsers suspend the context until a user gesture
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }
            self.play_voice(ctx, cue.voice(), vol);
        }
    }
}
