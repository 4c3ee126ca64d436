//! Realtime playback through cpal.
//!
//! The synth lives inside the audio callback. Note events travel over an rtrb
//! queue and are drained once per block, so the control thread never touches
//! the synth directly.

use std::time::{Duration, Instant};

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use rtrb::RingBuffer;

use monoblit::{synth::SynthMessage, GeneratorMode, Synth, SynthConfig, BLOCK_SIZE, MAX_BLOCK_SIZE};

use super::phrase;

/// Queue slots; the phrase never has more than a handful in flight.
const QUEUE_CAPACITY: usize = 64;

pub fn run(generator: GeneratorMode) -> EyreResult<()> {
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| eyre!("no default output device available"))?;
    let config = device
        .default_output_config()
        .wrap_err("failed to fetch default output config")?;

    let sample_rate = config.sample_rate().0 as f32;
    let channels = config.channels() as usize;

    let mut synth = Synth::new(SynthConfig {
        generator,
        ..SynthConfig::with_sample_rate(sample_rate)
    })
    .wrap_err("failed to build synth")?;

    println!("=== monoblit play ===");
    println!("Generator: {}", generator.name());
    println!("Sample rate: {sample_rate} Hz");
    println!("Channels: {channels}");
    println!();

    let (mut producer, mut consumer) = RingBuffer::<SynthMessage>::new(QUEUE_CAPACITY);
    let mut render_buf = vec![0.0f32; MAX_BLOCK_SIZE];

    let stream = device.build_output_stream(
        &config.into(),
        move |data: &mut [f32], _| {
            let total_frames = data.len() / channels;
            let mut frames_written = 0;

            while frames_written < total_frames {
                let frames = (total_frames - frames_written).min(BLOCK_SIZE);

                // block boundary: apply pending control changes
                synth.process_messages(&mut consumer);

                let block = &mut render_buf[..frames];
                synth.step(block);

                // mono to all channels
                let out_off = frames_written * channels;
                for (i, &s) in block.iter().enumerate() {
                    for ch in 0..channels {
                        data[out_off + i * channels + ch] = s;
                    }
                }

                frames_written += frames;
            }
        },
        |err| log::error!("audio stream error: {err}"),
        None,
    )?;

    stream.play()?;
    log::info!("playing {:.1}s phrase", phrase::DURATION);

    let start = Instant::now();
    for event in phrase::events(generator) {
        let due = start + Duration::from_secs_f32(event.at);
        if let Some(wait) = due.checked_duration_since(Instant::now()) {
            std::thread::sleep(wait);
        }
        println!("  {:>5.2}s  {:?}", event.at, event.message);
        if producer.push(event.message).is_err() {
            log::warn!("control queue full, dropped {:?}", event.message);
        }
    }

    let end = start + Duration::from_secs_f32(phrase::DURATION);
    if let Some(wait) = end.checked_duration_since(Instant::now()) {
        std::thread::sleep(wait);
    }
    Ok(())
}
