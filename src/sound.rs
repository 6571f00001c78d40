//! Completion chime, synthesized rather than bundled as an asset.
//!
//! Playback happens on a short-lived spawned thread because rodio's output
//! stream is not Send and the event loop must not block on audio. A missing
//! or broken audio device only costs a log line; the timer carries on.

use std::f32::consts::PI;
use std::thread;
use std::time::Duration;

use rodio::{OutputStream, Sink, Source};

const SAMPLE_RATE: u32 = 44100;
const CHIME_SECONDS: f32 = 0.9;

/// Two-tone sine chime with a linear fade-out
struct Chime {
    num_sample: usize,
    total_samples: usize,
}

impl Chime {
    fn new() -> Self {
        Self {
            num_sample: 0,
            total_samples: (SAMPLE_RATE as f32 * CHIME_SECONDS) as usize,
        }
    }
}

impl Iterator for Chime {
    type Item = f32;

    fn next(&mut self) -> Option<Self::Item> {
        if self.num_sample >= self.total_samples {
            return None;
        }
        let t = self.num_sample as f32 / SAMPLE_RATE as f32;
        self.num_sample += 1;

        // E6 for the first half, A5 for the second
        let freq = if t < CHIME_SECONDS / 2.0 { 1318.5 } else { 880.0 };
        let fade = 1.0 - (self.num_sample as f32 / self.total_samples as f32);
        let sample = (2.0 * PI * freq * t).sin();

        Some(sample * fade * 0.2)
    }
}

impl Source for Chime {
    fn current_frame_len(&self) -> Option<usize> {
        Some(self.total_samples.saturating_sub(self.num_sample))
    }

    fn channels(&self) -> u16 {
        1
    }

    fn sample_rate(&self) -> u32 {
        SAMPLE_RATE
    }

    fn total_duration(&self) -> Option<Duration> {
        Some(Duration::from_secs_f32(CHIME_SECONDS))
    }
}

/// Fire-and-forget chime. Playback errors are logged, never surfaced.
pub fn play_completion_chime() {
    let spawned = thread::Builder::new()
        .name("chime".to_string())
        .spawn(|| match OutputStream::try_default() {
            Ok((_stream, handle)) => match Sink::try_new(&handle) {
                Ok(sink) => {
                    sink.append(Chime::new());
                    sink.sleep_until_end();
                }
                Err(e) => log::warn!("Failed to create audio sink: {}", e),
            },
            Err(e) => log::warn!("Failed to open audio output: {}", e),
        });
    if let Err(e) = spawned {
        log::warn!("Failed to spawn chime thread: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chime_is_finite_and_bounded() {
        let samples: Vec<f32> = Chime::new().collect();
        assert_eq!(samples.len(), (SAMPLE_RATE as f32 * CHIME_SECONDS) as usize);
        assert!(samples.iter().all(|s| s.abs() <= 0.2));
        // Fade-out lands near silence
        assert!(samples.last().copied().unwrap_or(1.0).abs() < 0.01);
    }
}
