//! FFT spectrum view of the audio tap.
//!
//! One octave of triangle waves lives between roughly 260 Hz and 500 Hz
//! with harmonics above, so the display uses log-spaced bins from 100 Hz up
//! to 8 kHz rather than the full Nyquist range.

use std::sync::Arc;

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
    Frame,
};
use rustfft::{num_complex::Complex, Fft, FftPlanner};

/// Number of log-spaced display bins.
const DISPLAY_BINS: usize = 48;

const MIN_FREQ: f64 = 100.0;
const MAX_FREQ: f64 = 8_000.0;
const FLOOR_DB: f64 = -90.0;

pub struct Spectrum {
    fft: Arc<dyn Fft<f32>>,
    window: Vec<f32>,
    scratch: Vec<Complex<f32>>,
    /// FFT bin index backing each display bin.
    bin_indices: Vec<usize>,
    /// Current display data: (bin ordinal, magnitude dB).
    data: Vec<(f64, f64)>,
}

impl Spectrum {
    pub fn new(fft_size: usize, sample_rate: f32) -> Self {
        let fft = FftPlanner::new().plan_fft_forward(fft_size);

        // Hann window against spectral leakage.
        let window = (0..fft_size)
            .map(|i| {
                let t = i as f32 / (fft_size.saturating_sub(1)).max(1) as f32;
                0.5 * (1.0 - (std::f32::consts::TAU * t).cos())
            })
            .collect();

        let max_freq = MAX_FREQ.min(sample_rate as f64 / 2.0);
        let half = (fft_size / 2).max(1);
        let bin_indices = (0..DISPLAY_BINS)
            .map(|i| {
                let t = i as f64 / (DISPLAY_BINS - 1) as f64;
                let freq = MIN_FREQ * (max_freq / MIN_FREQ).powf(t);
                let index = (freq * fft_size as f64 / sample_rate as f64).round() as usize;
                index.min(half - 1)
            })
            .collect();

        Self {
            fft,
            window,
            scratch: vec![Complex::new(0.0, 0.0); fft_size],
            bin_indices,
            data: (0..DISPLAY_BINS).map(|i| (i as f64, FLOOR_DB)).collect(),
        }
    }

    /// Recompute magnitudes from a tap buffer. Ignores buffers that don't
    /// match the planned FFT size.
    pub fn update(&mut self, samples: &[f32]) {
        if samples.len() != self.window.len() {
            return;
        }

        for (slot, (&s, &w)) in self
            .scratch
            .iter_mut()
            .zip(samples.iter().zip(&self.window))
        {
            slot.re = s * w;
            slot.im = 0.0;
        }

        self.fft.process(&mut self.scratch);

        for (i, &bin) in self.bin_indices.iter().enumerate() {
            let c = self.scratch[bin];
            let power = (c.re * c.re + c.im * c.im).max(1e-12) as f64;
            self.data[i].1 = (10.0 * power.log10()).max(FLOOR_DB);
        }
    }

    pub fn data(&self) -> &[(f64, f64)] {
        &self.data
    }
}

/// Render the spectrum as a line chart over the display bins.
pub fn render_spectrum(frame: &mut Frame, area: Rect, spectrum: &Spectrum) {
    let block = Block::default().title(" Spectrum ").borders(Borders::ALL);

    let dataset = Dataset::default()
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Green))
        .data(spectrum.data());

    let chart = Chart::new(vec![dataset])
        .block(block)
        .x_axis(
            Axis::default()
                .bounds([0.0, (DISPLAY_BINS - 1) as f64])
                .style(Style::default().fg(Color::DarkGray)),
        )
        .y_axis(
            Axis::default()
                .bounds([FLOOR_DB, 0.0])
                .labels(vec!["-90", "-45", "0"])
                .style(Style::default().fg(Color::DarkGray)),
        );

    frame.render_widget(chart, area);
}
