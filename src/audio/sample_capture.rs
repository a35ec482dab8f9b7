//! A wrapper source that taps decoded audio into a ring buffer for analysis.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use ringbuf::{traits::*, HeapRb};
use rodio::source::SeekError;
use rodio::Source;

/// Shared buffer of the most recent mono samples.
pub type SampleTap = Arc<Mutex<HeapRb<f32>>>;

/// Push a sample, dropping the oldest one when the buffer is full.
pub fn push_sample(buf: &mut HeapRb<f32>, sample: f32) {
    if buf.is_full() {
        let _ = buf.try_pop();
    }
    let _ = buf.try_push(sample);
}

/// Passes samples through untouched while writing a mono down-mix of each
/// frame into the tap.
pub struct SampleCapture<S> {
    source: S,
    tap: SampleTap,
    /// Sum of the channels seen so far in the current frame
    frame_sum: f32,
    /// Index of the next channel within the current frame
    channel: u16,
}

impl<S> SampleCapture<S> {
    /// Create a new sample capture wrapper around an existing source.
    pub fn new(source: S, tap: SampleTap) -> Self {
        Self {
            source,
            tap,
            frame_sum: 0.0,
            channel: 0,
        }
    }
}

impl<S> Iterator for SampleCapture<S>
where
    S: Source<Item = f32>,
{
    type Item = f32;

    fn next(&mut self) -> Option<Self::Item> {
        let sample = self.source.next()?;
        let channels = self.source.channels().max(1);

        self.frame_sum += sample;
        self.channel += 1;
        if self.channel >= channels {
            let mono = self.frame_sum / channels as f32;
            if let Ok(mut buf) = self.tap.lock() {
                push_sample(&mut buf, mono);
            }
            self.frame_sum = 0.0;
            self.channel = 0;
        }

        Some(sample)
    }
}

impl<S> Source for SampleCapture<S>
where
    S: Source<Item = f32>,
{
    fn current_frame_len(&self) -> Option<usize> {
        self.source.current_frame_len()
    }

    fn channels(&self) -> u16 {
        self.source.channels()
    }

    fn sample_rate(&self) -> u32 {
        self.source.sample_rate()
    }

    fn total_duration(&self) -> Option<Duration> {
        self.source.total_duration()
    }

    fn try_seek(&mut self, pos: Duration) -> Result<(), SeekError> {
        // a partial frame from before the seek would skew the down-mix
        self.frame_sum = 0.0;
        self.channel = 0;
        self.source.try_seek(pos)
    }
}
