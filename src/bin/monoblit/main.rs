//! monoblit - demo harness for the synth core
//!
//! Run with: cargo run -- render [generator]
//!           cargo run -- play [generator]
//!
//! Generators: sine, lut, blit, bandpass

mod phrase;
mod playback;
mod render;

use color_eyre::eyre::{bail, eyre, Result as EyreResult};
use monoblit::GeneratorMode;

fn main() -> EyreResult<()> {
    color_eyre::install()?;
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let mut args = std::env::args().skip(1);
    let command = args.next().unwrap_or_else(|| "render".to_string());
    let generator = match args.next() {
        Some(name) => GeneratorMode::from_name(&name)
            .ok_or_else(|| eyre!("unknown generator '{name}' (expected sine, lut, blit or bandpass)"))?,
        None => GeneratorMode::Blit,
    };

    match command.as_str() {
        "render" => render::run(generator),
        "play" => playback::run(generator),
        other => bail!("unknown command '{other}' (expected render or play)"),
    }
}
