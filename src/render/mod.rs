//! Offline synthesis of an event plan
//!
//! Renders an [`EventPlan`] into a mono f32 sample buffer. The renderer is the
//! "audio graph" half of playback: triangle/sine oscillators with fast-attack
//! exponential-decay envelopes for notes, seeded white-noise bursts for the
//! downbeat clicks, and a faded sine drone. Rendering is fully deterministic —
//! equal plans produce bit-identical buffers — so the audible output is as
//! reproducible as the theme itself.

use crate::sequencer::{ClickEvent, DroneEvent, EventPlan, ToneEvent, Waveform};
use std::f64::consts::TAU;

/// Linear attack length for pitched tones, in seconds
const TONE_ATTACK_SECS: f64 = 0.005;

/// Exponential decay floor relative to peak gain (-80 dB), mirroring a
/// Web-Audio-style `exponentialRampToValueAtTime` toward a near-zero target
const DECAY_FLOOR: f64 = 1e-4;

/// Percussive click length in seconds
const CLICK_SECS: f64 = 0.025;

/// Drone fade-in / fade-out lengths in seconds
const DRONE_FADE_IN_SECS: f64 = 0.05;
const DRONE_FADE_OUT_SECS: f64 = 0.25;

/// Render a plan to mono samples at the given rate.
///
/// Output length is `ceil(plan.total_secs * sample_rate)`; all samples are
/// clamped to [-1, 1] after mixing.
pub fn render_plan(plan: &EventPlan, sample_rate: u32) -> Vec<f32> {
    let rate = sample_rate as f64;
    let total_samples = (plan.total_secs * rate).ceil() as usize;
    let mut buffer = vec![0.0f32; total_samples];

    render_drone(&plan.drone, rate, &mut buffer);
    for click in &plan.clicks {
        render_click(click, rate, &mut buffer);
    }
    for tone in &plan.tones {
        render_tone(tone, rate, &mut buffer);
    }

    for sample in buffer.iter_mut() {
        *sample = sample.clamp(-1.0, 1.0);
    }
    buffer
}

/// Mix one pitched tone into the buffer.
///
/// Envelope: linear attack over [`TONE_ATTACK_SECS`], then per-sample
/// multiplicative decay reaching [`DECAY_FLOOR`] of peak at the note's end.
fn render_tone(tone: &ToneEvent, rate: f64, buffer: &mut [f32]) {
    let start = (tone.start_secs * rate).round() as usize;
    let length = (tone.duration_secs * rate).round() as usize;
    if length == 0 {
        return;
    }

    let attack_samples = ((TONE_ATTACK_SECS * rate).round() as usize).max(1);
    let decay_per_sample = DECAY_FLOOR.powf(1.0 / length as f64);
    let phase_inc = tone.frequency / rate;

    let mut phase = 0.0f64;
    let mut envelope = 1.0f64;
    for n in 0..length {
        let Some(sample) = buffer.get_mut(start + n) else {
            break;
        };
        let attack = if n < attack_samples {
            n as f64 / attack_samples as f64
        } else {
            1.0
        };
        let osc = oscillator(tone.waveform, phase);
        *sample += (osc * attack * envelope * tone.gain as f64) as f32;

        envelope *= decay_per_sample;
        phase += phase_inc;
        if phase >= 1.0 {
            phase -= 1.0;
        }
    }
}

/// Mix one percussive noise click into the buffer.
///
/// White noise from a xorshift32 stream seeded by the click's start sample —
/// deliberately independent of the theme PRNG, so the note grid never shifts
/// because a click consumed a draw.
fn render_click(click: &ClickEvent, rate: f64, buffer: &mut [f32]) {
    let start = (click.start_secs * rate).round() as usize;
    let length = ((CLICK_SECS * rate).round() as usize).max(1);
    let decay_per_sample = DECAY_FLOOR.powf(1.0 / length as f64);

    let mut noise = NoiseState::new(start as u32);
    let mut envelope = 1.0f64;
    for n in 0..length {
        let Some(sample) = buffer.get_mut(start + n) else {
            break;
        };
        *sample += (noise.next_bipolar() * envelope * click.gain as f64) as f32;
        envelope *= decay_per_sample;
    }
}

/// Mix the sustained drone into the buffer.
fn render_drone(drone: &DroneEvent, rate: f64, buffer: &mut [f32]) {
    let length = (drone.duration_secs * rate).round() as usize;
    let fade_in = ((DRONE_FADE_IN_SECS * rate).round() as usize).max(1);
    let fade_out = ((DRONE_FADE_OUT_SECS * rate).round() as usize).max(1);
    let phase_inc = drone.frequency / rate;

    let mut phase = 0.0f64;
    for n in 0..length {
        let Some(sample) = buffer.get_mut(n) else {
            break;
        };
        let fade = fade_envelope(n, length, fade_in, fade_out);
        *sample += ((TAU * phase).sin() * fade * drone.gain as f64) as f32;

        phase += phase_inc;
        if phase >= 1.0 {
            phase -= 1.0;
        }
    }
}

/// Linear fade-in/fade-out envelope for the drone.
fn fade_envelope(n: usize, length: usize, fade_in: usize, fade_out: usize) -> f64 {
    let rising = (n as f64 / fade_in as f64).min(1.0);
    let remaining = length.saturating_sub(n);
    let falling = (remaining as f64 / fade_out as f64).min(1.0);
    rising.min(falling)
}

/// Evaluate one oscillator cycle at `phase` in [0, 1).
#[inline]
fn oscillator(waveform: Waveform, phase: f64) -> f64 {
    match waveform {
        Waveform::Sine => (TAU * phase).sin(),
        // Triangle: 0 -> 1 -> 0 -> -1 -> 0 over one cycle
        Waveform::Triangle => {
            let saw = 2.0 * phase - 1.0;
            2.0 * (1.0 - saw.abs()) - 1.0
        }
    }
}

/// Xorshift32 noise stream for percussive clicks.
///
/// Separate from [`crate::Mulberry32`] on purpose: the theme PRNG's draw
/// order is contractual and must not depend on how many noise samples the
/// renderer needs.
struct NoiseState {
    state: u32,
}

impl NoiseState {
    fn new(tag: u32) -> Self {
        // Golden-ratio constant keeps a zero tag from producing a stuck state
        Self {
            state: tag ^ 0x9E37_79B9,
        }
    }

    #[inline]
    fn next_bipolar(&mut self) -> f64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        (x as f64 / 4_294_967_296.0) * 2.0 - 1.0
    }
}
