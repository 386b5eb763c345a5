use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, Sample, SizedSample};
use morph_core::{mix_voices, CueVoice, SoundCue};
use std::sync::{Arc, Mutex};

const MAX_VOICES: usize = 16;

/// cpal output stream summing whatever cues are currently playing.
pub struct CueMixer {
    _stream: cpal::Stream,
    voices: Arc<Mutex<Vec<CueVoice>>>,
    sample_rate: f32,
}

impl CueMixer {
    /// `None` when the host has no usable output device; the experience runs silent.
    pub fn start() -> Option<Self> {
        let host = cpal::default_host();
        let device = host.default_output_device()?;
        let config = device.default_output_config().ok()?;
        let sample_rate = config.sample_rate().0 as f32;
        let voices = Arc::new(Mutex::new(Vec::with_capacity(MAX_VOICES)));

        let stream = match config.sample_format() {
            cpal::SampleFormat::F32 => build_stream::<f32>(&device, &config.into(), voices.clone()),
            cpal::SampleFormat::I16 => build_stream::<i16>(&device, &config.into(), voices.clone()),
            cpal::SampleFormat::U16 => build_stream::<u16>(&device, &config.into(), voices.clone()),
            other => {
                log::warn!("[audio] unsupported sample format {:?}", other);
                return None;
            }
        };
        let stream = match stream {
            Ok(s) => s,
            Err(e) => {
                log::warn!("[audio] build_output_stream failed: {}", e);
                return None;
            }
        };
        if let Err(e) = stream.play() {
            log::warn!("[audio] stream play failed: {}", e);
            return None;
        }
        log::info!("[audio] output at {} Hz", sample_rate);
        Some(Self {
            _stream: stream,
            voices,
            sample_rate,
        })
    }

    pub fn play(&self, cue: SoundCue) {
        let Ok(mut voices) = self.voices.lock() else {
            return;
        };
        if voices.len() >= MAX_VOICES {
            voices.remove(0);
        }
        voices.push(CueVoice::new(cue.patch(), self.sample_rate));
    }
}

fn build_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    voices: Arc<Mutex<Vec<CueVoice>>>,
) -> Result<cpal::Stream, cpal::BuildStreamError>
where
    T: SizedSample + FromSample<f32>,
{
    let channels = config.channels as usize;
    device.build_output_stream(
        config,
        move |data: &mut [T], _| {
            let Ok(mut voices) = voices.lock() else {
                data.fill(T::EQUILIBRIUM);
                return;
            };
            // cues are mono: same sample on every channel
            for frame in data.chunks_mut(channels.max(1)) {
                let s = T::from_sample(mix_voices(&mut voices));
                frame.fill(s);
            }
        },
        |err| log::error!("[audio] stream error: {}", err),
        None,
    )
}
