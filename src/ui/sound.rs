/// Sound engine: the objective chime, synthesised via rodio.
///
/// The cue is generated as an in-memory WAV buffer at init time.
/// Playback is fire-and-forget (non-blocking) via rodio's Sink.
///
/// Compile without the "sound" feature to disable audio entirely (the
/// stub SoundEngine does nothing). `Mute` stands in when no output
/// device can be opened.

use crate::device::Chime;

#[cfg(feature = "sound")]
mod inner {
    use std::io::Cursor;
    use std::sync::Arc;

    use log::debug;
    use rodio::{OutputStream, OutputStreamHandle, Sink};

    const SAMPLE_RATE: u32 = 22050;

    pub struct SoundEngine {
        _stream: OutputStream,
        handle: OutputStreamHandle,
        sfx_chime: Arc<Vec<u8>>,
    }

    impl SoundEngine {
        pub fn new() -> Option<Self> {
            let (stream, handle) = OutputStream::try_default().ok()?;
            Some(SoundEngine {
                _stream: stream,
                handle,
                sfx_chime: Arc::new(make_wav(&gen_ding_dong())),
            })
        }

        pub fn play_chime(&self) {
            let sink = match Sink::try_new(&self.handle) {
                Ok(s) => s,
                Err(e) => {
                    debug!("chime skipped: {e}");
                    return;
                }
            };
            let cursor = Cursor::new(self.sfx_chime.as_ref().clone());
            if let Ok(src) = rodio::Decoder::new(cursor) {
                sink.append(src);
                sink.detach(); // fire-and-forget
            }
        }
    }

    // ════════════════════════════════════════════════════════════
    //  Waveform generator: mono f32 samples
    // ════════════════════════════════════════════════════════════

    /// Doorbell "ding-dong": E6 then C6, each a bell-like decaying sine
    /// with a touch of octave harmonic.
    pub(super) fn gen_ding_dong() -> Vec<f32> {
        let notes = [(1319.0_f32, 0.18), (1047.0, 0.32)]; // E6, C6
        let mut samples = Vec::new();
        for &(freq, dur) in &notes {
            let n = (SAMPLE_RATE as f32 * dur) as usize;
            for i in 0..n {
                let t = i as f32 / SAMPLE_RATE as f32;
                let env = (-(i as f32 / n as f32) * 4.0).exp();
                let wave = (t * freq * 2.0 * std::f32::consts::PI).sin() * 0.8
                    + (t * freq * 2.0 * 2.0 * std::f32::consts::PI).sin() * 0.2;
                samples.push(wave * env * 0.3);
            }
        }
        samples
    }

    // ════════════════════════════════════════════════════════════
    //  WAV encoder: wraps f32 samples into a WAV buffer
    // ════════════════════════════════════════════════════════════

    pub(super) fn make_wav(samples: &[f32]) -> Vec<u8> {
        let num_channels: u16 = 1;
        let bits_per_sample: u16 = 16;
        let byte_rate = SAMPLE_RATE * (num_channels as u32) * (bits_per_sample as u32) / 8;
        let block_align = num_channels * bits_per_sample / 8;
        let data_size = samples.len() as u32 * 2; // 16-bit = 2 bytes per sample
        let file_size = 36 + data_size;

        let mut buf = Vec::with_capacity(44 + data_size as usize);

        // RIFF header
        buf.extend_from_slice(b"RIFF");
        buf.extend_from_slice(&file_size.to_le_bytes());
        buf.extend_from_slice(b"WAVE");

        // fmt chunk
        buf.extend_from_slice(b"fmt ");
        buf.extend_from_slice(&16u32.to_le_bytes()); // chunk size
        buf.extend_from_slice(&1u16.to_le_bytes());  // PCM format
        buf.extend_from_slice(&num_channels.to_le_bytes());
        buf.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
        buf.extend_from_slice(&byte_rate.to_le_bytes());
        buf.extend_from_slice(&block_align.to_le_bytes());
        buf.extend_from_slice(&bits_per_sample.to_le_bytes());

        // data chunk
        buf.extend_from_slice(b"data");
        buf.extend_from_slice(&data_size.to_le_bytes());

        for &s in samples {
            let val = (s.clamp(-1.0, 1.0) * 32767.0) as i16;
            buf.extend_from_slice(&val.to_le_bytes());
        }

        buf
    }
}

// ════════════════════════════════════════════════════════════
//  Public API: no-ops when the sound feature is off
// ════════════════════════════════════════════════════════════

#[cfg(feature = "sound")]
pub use inner::SoundEngine;

#[cfg(not(feature = "sound"))]
pub struct SoundEngine;

#[cfg(not(feature = "sound"))]
impl SoundEngine {
    pub fn new() -> Option<Self> { Some(SoundEngine) }
    pub fn play_chime(&self) {}
}

impl Chime for SoundEngine {
    fn play_chime(&self) {
        SoundEngine::play_chime(self);
    }
}

/// Silent chime for hosts without an audio device.
pub struct Mute;

impl Chime for Mute {
    fn play_chime(&self) {}
}
