//! Synthesized sound effects. Each cue is a small fundsp graph rendered to a
//! sample buffer and played on a detached rodio sink. No audio device means
//! silence, never a startup failure.

use fundsp::prelude32::*;
use rodio::buffer::SamplesBuffer;
use rodio::{OutputStream, OutputStreamHandle, Sink};

use crate::game::Cue;

const SAMPLE_RATE: u32 = 44_100;

pub struct Audio {
    // the stream must outlive every sink attached to it
    _stream: Option<OutputStream>,
    handle: Option<OutputStreamHandle>,
}

impl Audio {
    pub fn new() -> Audio {
        match OutputStream::try_default() {
            Ok((stream, handle)) => Audio {
                _stream: Some(stream),
                handle: Some(handle),
            },
            Err(_) => Audio {
                _stream: None,
                handle: None,
            },
        }
    }

    pub fn play(&self, cue: Cue) {
        let Some(handle) = &self.handle else { return };
        let Ok(sink) = Sink::try_new(handle) else { return };
        sink.append(SamplesBuffer::new(1, SAMPLE_RATE, synth(cue)));
        sink.detach();
    }
}

fn render(mut unit: impl AudioUnit, seconds: f32) -> Vec<f32> {
    unit.set_sample_rate(SAMPLE_RATE as f64);
    let n = (SAMPLE_RATE as f32 * seconds) as usize;
    (0..n).map(|_| unit.get_mono()).collect()
}

fn synth(cue: Cue) -> Vec<f32> {
    match cue {
        // falling sawtooth, 400Hz down to 80Hz
        Cue::Collide => {
            let freq = lfo(|t: f32| lerp(400.0, 80.0, (t / 0.4).min(1.0)));
            let gain = lfo(|t: f32| lerp(0.2, 0.0, (t / 0.5).min(1.0)));
            render((freq >> saw()) * gain, 0.5)
        }
        // quick upward chirp
        Cue::Fly => {
            let freq = lfo(|t: f32| lerp(300.0, 700.0, (t / 0.1).min(1.0)));
            let gain = lfo(|t: f32| lerp(0.25, 0.0, (t / 0.12).min(1.0)));
            render((freq >> sine()) * gain, 0.12)
        }
        // two-note coin blip
        Cue::Point => {
            let freq = lfo(|t: f32| if t < 0.07 { 987.8 } else { 1318.5 });
            let gain = lfo(|t: f32| lerp(0.2, 0.0, (t / 0.18).min(1.0)));
            render((freq >> square()) * gain, 0.18)
        }
        // single fading tone
        Cue::Pause => {
            let gain = lfo(|t: f32| lerp(0.2, 0.0, (t / 0.15).min(1.0)));
            render((constant(440.0) >> sine()) * gain, 0.15)
        }
    }
}
