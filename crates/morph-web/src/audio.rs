use anyhow::anyhow;
use morph_core::{render_wave_sample, CuePatch, SoundCue, Waveform};
use web_sys as web;

const MASTER_GAIN: f32 = 0.6;
const REVERB_SEND: f32 = 0.35;
const REVERB_SECONDS: f32 = 2.5;
const NOISE_SECONDS: f32 = 1.0;

/// Master gain + convolution reverb send, plus a shared noise buffer for noise cues.
pub struct CueBus {
    ctx: web::AudioContext,
    master: web::GainNode,
    reverb_send: web::GainNode,
    noise: web::AudioBuffer,
}

fn js_err(what: &str, e: wasm_bindgen::JsValue) -> anyhow::Error {
    anyhow!("{} error: {:?}", what, e)
}

fn create_gain(ctx: &web::AudioContext, value: f32, label: &str) -> anyhow::Result<web::GainNode> {
    let g = web::GainNode::new(ctx).map_err(|e| js_err(label, e))?;
    g.gain().set_value(value);
    Ok(g)
}

/// Fill `channels` x `seconds` of xorshift noise shaped by `envelope(t)`.
fn noise_buffer(
    ctx: &web::AudioContext,
    channels: u32,
    seconds: f32,
    envelope: impl Fn(f32) -> f32,
) -> anyhow::Result<web::AudioBuffer> {
    let sr = ctx.sample_rate();
    let len = ((sr * seconds) as u32).max(1);
    let buffer = ctx
        .create_buffer(channels, len, sr)
        .map_err(|e| js_err("AudioBuffer", e))?;
    for ch in 0..channels {
        let mut seed: u32 = 0x1234_ABCD ^ (ch.wrapping_add(1)).wrapping_mul(0x9E37_79B9);
        let mut samples: Vec<f32> = (0..len as usize)
            .map(|i| {
                let t = i as f32 / sr;
                render_wave_sample(0.0, Waveform::Noise, &mut seed) * envelope(t)
            })
            .collect();
        buffer
            .copy_to_channel(&mut samples, ch as i32)
            .map_err(|e| js_err("copy_to_channel", e))?;
    }
    Ok(buffer)
}

impl CueBus {
    pub fn new(ctx: web::AudioContext) -> anyhow::Result<Self> {
        let master = create_gain(&ctx, MASTER_GAIN, "master")?;
        master
            .connect_with_audio_node(&ctx.destination())
            .map_err(|e| js_err("connect", e))?;

        // Short dark room: exponentially decaying stereo noise, lowpassed.
        let reverb = web::ConvolverNode::new(&ctx).map_err(|e| js_err("ConvolverNode", e))?;
        reverb.set_normalize(true);
        let ir = noise_buffer(&ctx, 2, REVERB_SECONDS, |t| (-t / 0.6).exp())?;
        reverb.set_buffer(Some(&ir));
        let tone = web::BiquadFilterNode::new(&ctx).map_err(|e| js_err("BiquadFilterNode", e))?;
        tone.set_type(web::BiquadFilterType::Lowpass);
        tone.frequency().set_value(2400.0);
        let reverb_send = create_gain(&ctx, REVERB_SEND, "reverb send")?;
        let _ = reverb_send.connect_with_audio_node(&reverb);
        let _ = reverb.connect_with_audio_node(&tone);
        let _ = tone.connect_with_audio_node(&master);

        let noise = noise_buffer(&ctx, 1, NOISE_SECONDS, |_| 1.0)?;
        log::info!("[audio] cue bus ready at {} Hz", ctx.sample_rate());
        Ok(Self {
            ctx,
            master,
            reverb_send,
            noise,
        })
    }

    /// Browsers start the context suspended until a user gesture.
    pub fn resume(&self) {
        if let Err(e) = self.ctx.resume() {
            log::warn!("[audio] resume failed: {:?}", e);
        }
    }

    pub fn play(&self, cue: SoundCue) {
        let patch = cue.patch();
        let t0 = self.ctx.current_time() + 0.005;
        let Some(env) = self.envelope(&patch, t0) else {
            return;
        };
        let end = t0 + patch.duration_sec as f64;
        let started = match patch.waveform {
            Waveform::Noise => self.start_noise(&env, t0, end),
            wave => self.start_oscillator(&patch, wave, &env, t0, end),
        };
        if let Err(e) = started {
            log::warn!("[audio] {:?} cue failed: {:?}", cue, e);
        }
    }

    fn envelope(&self, patch: &CuePatch, t0: f64) -> Option<web::GainNode> {
        let g = create_gain(&self.ctx, 0.0, "cue").ok()?;
        let attack_end = t0 + patch.attack_sec as f64;
        let _ = g.gain().set_value_at_time(0.0, t0);
        let _ = g.gain().linear_ramp_to_value_at_time(patch.gain, attack_end);
        let _ = g
            .gain()
            .linear_ramp_to_value_at_time(0.0, t0 + patch.duration_sec as f64);
        let _ = g.connect_with_audio_node(&self.master);
        let _ = g.connect_with_audio_node(&self.reverb_send);
        Some(g)
    }

    fn start_oscillator(
        &self,
        patch: &CuePatch,
        wave: Waveform,
        env: &web::GainNode,
        t0: f64,
        end: f64,
    ) -> Result<(), wasm_bindgen::JsValue> {
        let src = web::OscillatorNode::new(&self.ctx)?;
        src.set_type(match wave {
            Waveform::Square => web::OscillatorType::Square,
            Waveform::Saw => web::OscillatorType::Sawtooth,
            Waveform::Triangle => web::OscillatorType::Triangle,
            _ => web::OscillatorType::Sine,
        });
        let freq = src.frequency();
        freq.set_value_at_time(patch.start_hz.max(1.0), t0)?;
        freq.exponential_ramp_to_value_at_time(patch.end_hz.max(1.0), end)?;
        src.connect_with_audio_node(env)?;
        src.start_with_when(t0)?;
        src.stop_with_when(end + 0.05)
    }

    fn start_noise(&self, env: &web::GainNode, t0: f64, end: f64) -> Result<(), wasm_bindgen::JsValue> {
        let src = web::AudioBufferSourceNode::new(&self.ctx)?;
        src.set_buffer(Some(&self.noise));
        src.set_loop(true);
        src.connect_with_audio_node(env)?;
        src.start_with_when(t0)?;
        src.stop_with_when(end + 0.05)
    }
}
