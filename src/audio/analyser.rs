use std::sync::Arc;

use rustfft::{num_complex::Complex, Fft, FftPlanner};

/// Floor of the byte magnitude scale, in dB relative to full scale.
pub const MIN_DECIBELS: f32 = -100.0;
/// Ceiling of the byte magnitude scale.
pub const MAX_DECIBELS: f32 = -30.0;

/// Read side of the analyser, the only surface the sampler sees. Kept as a
/// trait so the sampler can be exercised against a mock.
pub trait FrequencySource {
    /// Number of frequency bins exposed, half the transform size.
    fn frequency_bin_count(&self) -> usize;

    /// Fill `out` with the current byte magnitudes, one per bin.
    fn byte_frequency_data(&mut self, out: &mut [u8]);
}

/// Frequency-domain tap over a mono sample stream.
///
/// Holds the most recent `fft_size` samples, and on each read runs a
/// Hann-windowed forward FFT, applies exponential time smoothing, and maps
/// magnitudes onto a 0-255 byte scale over a fixed dB window.
pub struct Analyser {
    fft_size: usize,
    smoothing: f32,
    fft: Arc<dyn Fft<f32>>,
    window: Vec<f32>,
    input: Vec<f32>,
    scratch: Vec<Complex<f32>>,
    smoothed: Vec<f32>,
}

impl Analyser {
    /// `fft_size` must be a power of two (the graph validates this before
    /// construction); `smoothing` is clamped into [0,1].
    pub fn new(fft_size: usize, smoothing: f32) -> Self {
        debug_assert!(fft_size.is_power_of_two());

        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(fft_size);

        Self {
            fft_size,
            smoothing: smoothing.clamp(0.0, 1.0),
            fft,
            window: Self::hann_window(fft_size),
            input: vec![0.0; fft_size],
            scratch: vec![Complex::new(0.0, 0.0); fft_size],
            smoothed: vec![0.0; fft_size / 2],
        }
    }

    fn hann_window(size: usize) -> Vec<f32> {
        (0..size)
            .map(|i| {
                let phase = 2.0 * std::f32::consts::PI * i as f32 / (size - 1) as f32;
                0.5 * (1.0 - phase.cos())
            })
            .collect()
    }

    pub fn fft_size(&self) -> usize {
        self.fft_size
    }

    pub fn smoothing(&self) -> f32 {
        self.smoothing
    }

    /// Append mono samples, keeping only the most recent `fft_size`.
    pub fn push_samples(&mut self, samples: &[f32]) {
        if samples.is_empty() {
            return;
        }
        if samples.len() >= self.fft_size {
            self.input
                .copy_from_slice(&samples[samples.len() - self.fft_size..]);
        } else {
            let keep = self.fft_size - samples.len();
            self.input.copy_within(self.fft_size - keep.., 0);
            self.input[keep..].copy_from_slice(samples);
        }
    }

    /// Run the transform over the current input and fold the magnitudes into
    /// the smoothed spectrum: `s[i] = a*s[i] + (1-a)*|X[i]|`.
    fn analyse(&mut self) {
        for (i, slot) in self.scratch.iter_mut().enumerate() {
            *slot = Complex::new(self.input[i] * self.window[i], 0.0);
        }
        self.fft.process(&mut self.scratch);

        let scale = 2.0 / self.fft_size as f32;
        let alpha = self.smoothing;
        for (i, value) in self.smoothed.iter_mut().enumerate() {
            let magnitude = self.scratch[i].norm() * scale;
            *value = alpha * *value + (1.0 - alpha) * magnitude;
        }
    }

    fn magnitude_to_byte(magnitude: f32) -> u8 {
        let db = if magnitude > 0.0 {
            20.0 * magnitude.log10()
        } else {
            MIN_DECIBELS
        };
        let scaled = (db - MIN_DECIBELS) / (MAX_DECIBELS - MIN_DECIBELS);
        (scaled.clamp(0.0, 1.0) * 255.0) as u8
    }
}

impl FrequencySource for Analyser {
    fn frequency_bin_count(&self) -> usize {
        self.fft_size / 2
    }

    fn byte_frequency_data(&mut self, out: &mut [u8]) {
        self.analyse();
        for (byte, &magnitude) in out.iter_mut().zip(self.smoothed.iter()) {
            *byte = Self::magnitude_to_byte(magnitude);
        }
    }
}
