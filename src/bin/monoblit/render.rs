//! Offline render with level and spectrum report.

use std::collections::VecDeque;

use color_eyre::eyre::{Result as EyreResult, WrapErr};
use rustfft::{num_complex::Complex, FftPlanner};

use monoblit::{
    dsp::{amplify, db_to_mag},
    synth::SynthMessage,
    GeneratorMode, Synth, SynthConfig, BLOCK_SIZE,
};

use super::phrase::{self, Event};

const SAMPLE_RATE: f32 = 48_000.0;
/// FFT length for the spectrum report.
const FFT_SIZE: usize = 8192;
/// Where the analysis window starts: inside the held note at 1.0 s.
const ANALYSIS_START: f32 = 1.1;
/// Strongest peaks to list.
const PEAKS: usize = 8;

pub fn run(generator: GeneratorMode) -> EyreResult<()> {
    let config = SynthConfig {
        sample_rate: SAMPLE_RATE,
        generator,
        ..SynthConfig::default()
    };
    let mut synth = Synth::new(config).wrap_err("failed to build synth")?;
    let output = render_phrase(&mut synth, phrase::events(generator));

    println!("=== monoblit render ===");
    println!("Generator: {}", generator.name());
    println!("Sample rate: {SAMPLE_RATE} Hz");
    println!("Samples: {}", output.len());
    println!("Rejected messages: {}", synth.rejected_messages());
    println!();

    let peak = amplify::peak(&output);
    let rms = amplify::rms(&output);
    println!("Peak: {peak:.4} ({:.1} dBFS)", to_db(peak));
    println!("RMS:  {rms:.4} ({:.1} dBFS)", to_db(rms));
    println!();

    let start = (ANALYSIS_START * SAMPLE_RATE) as usize;
    let window = &output[start..start + FFT_SIZE];
    println!(
        "Strongest bins, {:.2}s..{:.2}s (note 55 = {:.2} Hz):",
        ANALYSIS_START,
        ANALYSIS_START + FFT_SIZE as f32 / SAMPLE_RATE,
        synth.frequency(55)?,
    );
    for (hz, db) in spectral_peaks(window, SAMPLE_RATE, PEAKS) {
        println!("  {hz:>9.1} Hz  {db:>7.1} dB");
    }

    Ok(())
}

/// Render the whole phrase, applying each event at the block it falls in.
fn render_phrase(synth: &mut Synth, events: Vec<Event>) -> Vec<f32> {
    let total = phrase::block_offset(phrase::DURATION, SAMPLE_RATE);
    let mut output = vec![0.0; total];
    let mut pending: VecDeque<Event> = events.into();
    let mut queue: VecDeque<SynthMessage> = VecDeque::new();

    for (index, block) in output.chunks_mut(BLOCK_SIZE).enumerate() {
        let position = index * BLOCK_SIZE;
        while pending
            .front()
            .is_some_and(|e| phrase::block_offset(e.at, SAMPLE_RATE) <= position)
        {
            if let Some(event) = pending.pop_front() {
                queue.push_back(event.message);
            }
        }
        synth.process_messages(&mut queue);
        synth.step(block);
    }

    output
}

/// Hann-windowed magnitude spectrum, returning the largest local maxima as
/// (frequency Hz, level dB relative to a full-scale sine).
fn spectral_peaks(samples: &[f32], sample_rate: f32, count: usize) -> Vec<(f32, f32)> {
    let len = samples.len();
    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_forward(len);

    let mut buffer: Vec<Complex<f32>> = samples
        .iter()
        .enumerate()
        .map(|(i, &x)| {
            let w = 0.5 * (1.0 - (std::f32::consts::TAU * i as f32 / (len - 1) as f32).cos());
            Complex::new(x * w, 0.0)
        })
        .collect();
    fft.process(&mut buffer);

    // Hann coherent gain is 0.5; a full-scale sine lands at len / 4.
    let reference = len as f32 / 4.0;
    let half = len / 2;
    let magnitude: Vec<f32> = buffer[..half].iter().map(|c| c.norm() / reference).collect();

    let mut peaks: Vec<(usize, f32)> = (1..half - 1)
        .filter(|&k| magnitude[k] > magnitude[k - 1] && magnitude[k] >= magnitude[k + 1])
        .map(|k| (k, magnitude[k]))
        .collect();
    peaks.sort_by(|a, b| b.1.total_cmp(&a.1));
    peaks.truncate(count);

    peaks
        .into_iter()
        .map(|(k, m)| (k as f32 * sample_rate / len as f32, to_db(m)))
        .collect()
}

fn to_db(magnitude: f32) -> f32 {
    // floor at -120 dB
    20.0 * magnitude.max(db_to_mag(-120.0)).log10()
}
