//! Generates the sine lookup table used by `dsp::oscillator_lut`.
//!
//! The table is written to `$OUT_DIR/sine_table.rs` as a `static` array so the
//! oscillator reads precomputed, read-only data at runtime.

use std::env;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

/// log2 of the table length. The oscillator shifts its 32-bit phase right by
/// `32 - TABLE_BITS` to form an index.
const TABLE_BITS: u32 = 12;

fn main() {
    let length = 1usize << TABLE_BITS;

    let mut source = String::new();
    let _ = writeln!(source, "pub(crate) const SINE_TABLE_BITS: u32 = {TABLE_BITS};");
    source.push_str("#[allow(dead_code)]\n");
    let _ = writeln!(source, "pub(crate) const SINE_TABLE_LEN: usize = {length};");
    let _ = writeln!(source, "pub(crate) static SINE_TABLE: [f32; {length}] = [");
    for i in 0..length {
        let value = (std::f64::consts::TAU * i as f64 / length as f64).sin() as f32;
        let _ = writeln!(source, "    {value:?},");
    }
    source.push_str("];\n");

    let out_dir = env::var_os("OUT_DIR").expect("cargo sets OUT_DIR for build scripts");
    let path = Path::new(&out_dir).join("sine_table.rs");
    fs::write(&path, source).expect("failed to write sine table");

    println!("cargo:rerun-if-changed=build.rs");
}
