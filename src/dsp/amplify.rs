//! Sample-by-sample gain helpers.

/*
Amplitude Control
=================

Everything that changes loudness in the synth is a multiplication:

    voice     generator[i] × envelope[i]
    render    mix[i] × constant gain (normalization)

  gain          Multiplier on amplitude. 1.0 is unity, 0.0 silence.
  attenuation   Gain below unity. The envelope only ever attenuates.

Level in decibels is 20·log10(gain); see `db_to_mag` for the inverse.
*/

/// Multiply `signal` by `modulator` in place.
#[inline]
pub fn multiply_in_place(signal: &mut [f32], modulator: &[f32]) {
    debug_assert_eq!(signal.len(), modulator.len());

    for (s, &m) in signal.iter_mut().zip(modulator.iter()) {
        *s *= m;
    }
}

/// Scale `signal` by a constant gain in place.
#[inline]
pub fn apply_gain(signal: &mut [f32], gain: f32) {
    for sample in signal.iter_mut() {
        *sample *= gain;
    }
}

/// Largest absolute sample value, 0.0 for an empty slice.
pub fn peak(signal: &[f32]) -> f32 {
    signal.iter().fold(0.0f32, |acc, &x| acc.max(x.abs()))
}

/// Root mean square level, 0.0 for an empty slice.
pub fn rms(signal: &[f32]) -> f32 {
    if signal.is_empty() {
        return 0.0;
    }
    let energy: f64 = signal.iter().map(|&x| (x as f64) * (x as f64)).sum();
    (energy / signal.len() as f64).sqrt() as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multiply_in_place_applies_envelope() {
        let mut signal = [1.0, 0.5, -0.5, -1.0];
        let envelope = [0.0, 0.5, 1.0, 0.25];
        multiply_in_place(&mut signal, &envelope);
        assert_eq!(signal, [0.0, 0.25, -0.5, -0.25]);
    }

    #[test]
    fn gain_scales_every_sample() {
        let mut signal = [1.0, 0.5, -0.5, -1.0];
        apply_gain(&mut signal, 0.5);
        assert_eq!(signal, [0.5, 0.25, -0.25, -0.5]);
    }

    #[test]
    fn levels_of_a_square_wave() {
        let signal = [0.5, -0.5, 0.5, -0.5];
        assert_eq!(peak(&signal), 0.5);
        assert!((rms(&signal) - 0.5).abs() < 1e-7);
        assert_eq!(peak(&[]), 0.0);
        assert_eq!(rms(&[]), 0.0);
    }
}
