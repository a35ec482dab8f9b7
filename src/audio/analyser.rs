//! FFT analyser producing byte frequency and time-domain snapshots.

use std::sync::Arc;

use ringbuf::traits::*;
use rustfft::{num_complex::Complex, Fft, FftPlanner};

use super::sample_capture::SampleTap;
use crate::error::{Result, VizError};

pub const MIN_FFT_SIZE: usize = 32;
pub const MAX_FFT_SIZE: usize = 32768;
pub const DEFAULT_FFT_SIZE: usize = 2048;

/// Check that `fft_size` is a power of two the analyser supports.
pub fn validate_fft_size(fft_size: usize) -> Result<usize> {
    if fft_size.is_power_of_two() && (MIN_FFT_SIZE..=MAX_FFT_SIZE).contains(&fft_size) {
        Ok(fft_size)
    } else {
        Err(VizError::InvalidFftSize(fft_size))
    }
}

/// Windowed FFT over the most recent `fft_size` samples.
///
/// Magnitudes are smoothed over time, converted to decibels and mapped from
/// `[min_db, max_db]` onto `0..=255`.
pub struct AnalyserNode {
    fft: Arc<dyn Fft<f32>>,
    fft_size: usize,
    /// Blend factor with the previous frame's magnitudes (0 = none)
    smoothing: f32,
    min_db: f32,
    max_db: f32,
    /// Blackman window coefficients
    window: Vec<f32>,
    /// Latest time-domain block
    input: Vec<f32>,
    /// Smoothed linear magnitude per bin
    magnitudes: Vec<f32>,
    scratch: Vec<Complex<f32>>,
}

impl AnalyserNode {
    pub fn new(fft_size: usize) -> Result<Self> {
        let fft_size = validate_fft_size(fft_size)?;
        let fft = FftPlanner::new().plan_fft_forward(fft_size);

        let window = (0..fft_size)
            .map(|i| {
                let x = 2.0 * std::f32::consts::PI * i as f32 / fft_size as f32;
                0.42 - 0.5 * x.cos() + 0.08 * (2.0 * x).cos()
            })
            .collect();

        Ok(Self {
            fft,
            fft_size,
            smoothing: 0.8,
            min_db: -100.0,
            max_db: -30.0,
            window,
            input: vec![0.0; fft_size],
            magnitudes: vec![0.0; fft_size / 2],
            scratch: vec![Complex::new(0.0, 0.0); fft_size],
        })
    }

    pub fn fft_size(&self) -> usize {
        self.fft_size
    }

    pub fn frequency_bin_count(&self) -> usize {
        self.fft_size / 2
    }

    /// Copy the newest `fft_size` samples from the tap; older history is
    /// zero-filled when the tap holds fewer.
    pub fn capture(&mut self, tap: &SampleTap) {
        let Ok(buf) = tap.lock() else {
            return;
        };
        let available = buf.occupied_len();
        let take = available.min(self.fft_size);
        let pad = self.fft_size - take;

        self.input[..pad].fill(0.0);
        for (slot, &sample) in self.input[pad..]
            .iter_mut()
            .zip(buf.iter().skip(available - take))
        {
            *slot = sample;
        }
    }

    /// Replace the analysed block with `samples` (newest last).
    pub fn process_block(&mut self, samples: &[f32]) {
        let take = samples.len().min(self.fft_size);
        let pad = self.fft_size - take;
        self.input[..pad].fill(0.0);
        self.input[pad..].copy_from_slice(&samples[samples.len() - take..]);
    }

    /// Analyse a block of silence. Smoothed magnitudes decay from here.
    pub fn process_silence(&mut self) {
        self.input.fill(0.0);
    }

    /// Fill `out` with time-domain samples mapped to bytes, 128 = silence.
    pub fn get_byte_time_domain_data(&self, out: &mut [u8]) {
        for (o, &s) in out.iter_mut().zip(self.input.iter()) {
            *o = (128.0 * (1.0 + s)).floor().clamp(0.0, 255.0) as u8;
        }
    }

    /// Run the FFT on the current block and fill `out` with byte magnitudes.
    pub fn get_byte_frequency_data(&mut self, out: &mut [u8]) {
        for ((c, &s), &w) in self
            .scratch
            .iter_mut()
            .zip(self.input.iter())
            .zip(self.window.iter())
        {
            *c = Complex::new(s * w, 0.0);
        }
        self.fft.process(&mut self.scratch);

        let scale = 1.0 / self.fft_size as f32;
        let range = self.max_db - self.min_db;
        for ((mag, c), o) in self
            .magnitudes
            .iter_mut()
            .zip(self.scratch.iter())
            .zip(out.iter_mut())
        {
            let current = c.norm() * scale;
            *mag = self.smoothing * *mag + (1.0 - self.smoothing) * current;

            let db = 20.0 * mag.max(1e-12).log10();
            *o = (255.0 / range * (db - self.min_db)).floor().clamp(0.0, 255.0) as u8;
        }
    }

    /// Forget smoothing history, e.g. between tracks.
    pub fn reset(&mut self) {
        self.input.fill(0.0);
        self.magnitudes.fill(0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ringbuf::HeapRb;
    use std::sync::Mutex;

    fn sine(bin: usize, fft_size: usize, amplitude: f32) -> Vec<f32> {
        (0..fft_size)
            .map(|i| {
                (2.0 * std::f32::consts::PI * bin as f32 * i as f32 / fft_size as f32).sin()
                    * amplitude
            })
            .collect()
    }

    #[test]
    fn test_validate_fft_size() {
        assert!(validate_fft_size(2048).is_ok());
        assert!(validate_fft_size(32).is_ok());
        assert!(matches!(validate_fft_size(1000), Err(VizError::InvalidFftSize(1000))));
        assert!(validate_fft_size(16).is_err());
        assert!(validate_fft_size(65536).is_err());
        assert!(validate_fft_size(0).is_err());
    }

    #[test]
    fn test_bin_count_is_half_fft_size() {
        let analyser = AnalyserNode::new(1024).unwrap();
        assert_eq!(analyser.frequency_bin_count(), 512);
    }

    #[test]
    fn test_silence_maps_to_zero_and_center() {
        let mut analyser = AnalyserNode::new(256).unwrap();
        analyser.process_block(&[0.0; 256]);

        let mut freq = vec![7u8; 128];
        let mut time = vec![7u8; 128];
        analyser.get_byte_frequency_data(&mut freq);
        analyser.get_byte_time_domain_data(&mut time);
        assert!(freq.iter().all(|&b| b == 0));
        assert!(time.iter().all(|&b| b == 128));
    }

    #[test]
    fn test_sine_peaks_in_its_bin() {
        let mut analyser = AnalyserNode::new(512).unwrap();
        analyser.smoothing = 0.0;
        analyser.process_block(&sine(40, 512, 0.8));

        let mut freq = vec![0u8; 256];
        analyser.get_byte_frequency_data(&mut freq);
        let peak = freq
            .iter()
            .enumerate()
            .max_by_key(|&(_, &v)| v)
            .map(|(i, _)| i)
            .unwrap();
        assert!((39..=41).contains(&peak), "peak at bin {}", peak);
        assert_eq!(freq[40], 255);
        assert!(freq[200] < 100, "far bin was {}", freq[200]);
    }

    #[test]
    fn test_smoothing_rises_gradually() {
        let mut analyser = AnalyserNode::new(512).unwrap();
        analyser.process_block(&sine(40, 512, 0.01));

        let mut first = vec![0u8; 256];
        let mut second = vec![0u8; 256];
        analyser.get_byte_frequency_data(&mut first);
        analyser.get_byte_frequency_data(&mut second);
        assert!(second[40] > first[40]);
    }

    #[test]
    fn test_silence_decays_to_zero() {
        let mut analyser = AnalyserNode::new(256).unwrap();
        analyser.process_block(&sine(20, 256, 0.9));
        let mut freq = vec![0u8; 128];
        analyser.get_byte_frequency_data(&mut freq);
        assert!(freq[20] > 0);

        analyser.process_silence();
        analyser.get_byte_frequency_data(&mut freq);
        assert!(freq[20] > 0, "smoothing should hold the peak briefly");

        for _ in 0..200 {
            analyser.get_byte_frequency_data(&mut freq);
        }
        assert!(freq.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_time_domain_mapping() {
        let mut analyser = AnalyserNode::new(32).unwrap();
        let mut block = vec![0.0f32; 32];
        block[0] = 1.0;
        block[1] = -1.0;
        block[2] = 0.5;
        analyser.process_block(&block);

        let mut time = vec![0u8; 16];
        analyser.get_byte_time_domain_data(&mut time);
        assert_eq!(&time[..3], &[255, 0, 192]);
    }

    #[test]
    fn test_capture_takes_newest_samples() {
        let tap: SampleTap = Arc::new(Mutex::new(HeapRb::new(64)));
        {
            let mut buf = tap.lock().unwrap();
            for i in 0..40 {
                let _ = buf.try_push(i as f32 / 100.0);
            }
        }
        let mut analyser = AnalyserNode::new(32).unwrap();
        analyser.capture(&tap);
        assert!((analyser.input[0] - 0.08).abs() < 1e-6);
        assert!((analyser.input[31] - 0.39).abs() < 1e-6);
    }

    #[test]
    fn test_capture_pads_short_history() {
        let tap: SampleTap = Arc::new(Mutex::new(HeapRb::new(64)));
        let _ = tap.lock().unwrap().try_push(0.25);
        let mut analyser = AnalyserNode::new(32).unwrap();
        analyser.capture(&tap);
        assert!(analyser.input[..31].iter().all(|&s| s == 0.0));
        assert_eq!(analyser.input[31], 0.25);
    }
}
