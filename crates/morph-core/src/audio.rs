//! Procedural sound cues.
//!
//! The core only decides *which* cue fires; each frontend plays the matching
//! [`CuePatch`]. [`CueVoice`] renders a patch sample by sample for backends
//! that mix their own audio (the native cpal stream).

use std::f32::consts::TAU;

/// Discrete trigger events for the audio collaborator. Fire-and-forget.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SoundCue {
    /// The hand closed: particles gather.
    Converge,
    /// The hand opened: particles scatter.
    Disperse,
    /// The finale rockets left the pad.
    Launch,
    /// The finale exploded.
    Burst,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
    Saw,
    Triangle,
    Noise,
}

/// A single swept oscillator (or noise burst) with a linear attack and release.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CuePatch {
    pub waveform: Waveform,
    pub start_hz: f32,
    pub end_hz: f32,
    pub duration_sec: f32,
    pub gain: f32,
    pub attack_sec: f32,
}

impl SoundCue {
    pub fn patch(self) -> CuePatch {
        match self {
            SoundCue::Converge => CuePatch {
                waveform: Waveform::Sine,
                start_hz: 220.0,
                end_hz: 660.0,
                duration_sec: 0.5,
                gain: 0.25,
                attack_sec: 0.05,
            },
            SoundCue::Disperse => CuePatch {
                waveform: Waveform::Triangle,
                start_hz: 660.0,
                end_hz: 180.0,
                duration_sec: 0.6,
                gain: 0.22,
                attack_sec: 0.02,
            },
            SoundCue::Launch => CuePatch {
                waveform: Waveform::Saw,
                start_hz: 120.0,
                end_hz: 900.0,
                duration_sec: 0.6,
                gain: 0.08,
                attack_sec: 0.05,
            },
            SoundCue::Burst => CuePatch {
                waveform: Waveform::Noise,
                start_hz: 0.0,
                end_hz: 0.0,
                duration_sec: 0.9,
                gain: 0.35,
                attack_sec: 0.005,
            },
        }
    }
}

#[inline]
pub fn render_wave_sample(phase: f32, wave: Waveform, noise: &mut u32) -> f32 {
    match wave {
        Waveform::Sine => phase.sin(),
        Waveform::Square => {
            if phase.sin() >= 0.0 {
                1.0
            } else {
                -1.0
            }
        }
        Waveform::Saw => {
            let t = phase / TAU;
            2.0 * (t - t.floor()) - 1.0
        }
        Waveform::Triangle => {
            let t = phase / TAU;
            let saw = 2.0 * (t - t.floor()) - 1.0;
            2.0 * saw.abs() - 1.0
        }
        Waveform::Noise => {
            // xorshift32
            let mut x = *noise;
            x ^= x << 13;
            x ^= x >> 17;
            x ^= x << 5;
            *noise = x;
            (x as f32 / u32::MAX as f32) * 2.0 - 1.0
        }
    }
}

/// One playing cue.
#[derive(Clone, Debug)]
pub struct CueVoice {
    patch: CuePatch,
    sample_rate: f32,
    phase: f32,
    emitted: u32,
    total: u32,
    attack: u32,
    noise: u32,
}

impl CueVoice {
    pub fn new(patch: CuePatch, sample_rate: f32) -> Self {
        let total = ((patch.duration_sec * sample_rate) as u32).max(1);
        let attack = ((patch.attack_sec * sample_rate) as u32).min(total);
        Self {
            patch,
            sample_rate,
            phase: 0.0,
            emitted: 0,
            total,
            attack,
            noise: 0x1234_ABCD,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.emitted >= self.total
    }

    /// Attack ramps linearly to full gain, then the rest of the cue releases linearly to zero.
    pub fn envelope(&self) -> f32 {
        let n = self.emitted;
        if n >= self.total {
            0.0
        } else if n < self.attack {
            n as f32 / self.attack.max(1) as f32
        } else {
            let release = (self.total - self.attack).max(1);
            1.0 - (n - self.attack) as f32 / release as f32
        }
    }

    /// Exponential sweep from `start_hz` to `end_hz` over the cue length.
    pub fn frequency(&self) -> f32 {
        let t = self.emitted as f32 / self.total as f32;
        let (a, b) = (self.patch.start_hz.max(1.0), self.patch.end_hz.max(1.0));
        a * (b / a).powf(t)
    }

    pub fn next_sample(&mut self) -> f32 {
        if self.is_finished() {
            return 0.0;
        }
        let amp = self.patch.gain * self.envelope();
        let raw = render_wave_sample(self.phase, self.patch.waveform, &mut self.noise);
        self.phase = (self.phase + TAU * self.frequency() / self.sample_rate) % TAU;
        self.emitted += 1;
        raw * amp
    }
}

/// Sum all voices for one sample, dropping finished ones, soft-clipped to (-1, 1).
pub fn mix_voices(voices: &mut Vec<CueVoice>) -> f32 {
    let mut acc = 0.0f32;
    voices.retain_mut(|v| {
        acc += v.next_sample();
        !v.is_finished()
    });
    acc.tanh()
}
