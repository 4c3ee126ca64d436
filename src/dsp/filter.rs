use crate::{dsp::delay::DelayLine, error::ConfigError};

/*
IIR Filter Topologies
=====================

An IIR filter of order N is fully described by two coefficient arrays:

    b[0..=N]   feed-forward (zeros)
    a[0..=N]   feedback (poles), normalized so a[0] = 1

    y[n] = Σ b[j]·x[n-j]  -  Σ a[j]·y[n-j]      (second sum from j = 1)

There are several ways to wire that equation up. They produce the same
output in exact arithmetic and differ in how much state they keep and in
which order rounding happens.

| topology       | state                    | structure                         |
| -------------- | ------------------------ | --------------------------------- |
| Direct Form I  | N inputs + N outputs     | zeros, then poles                 |
| Direct Form II | N intermediate values    | poles, then zeros, shared delays  |
| Transposed I   | N pole + N zero partials | poles, then zeros, transposed     |
| Transposed II  | N partial sums           | one accumulator chain             |

Direct Form I
-------------

    y[n] = b0·x[n] + Σ b[j]·x[n-j] - Σ a[j]·y[n-j]

Two delay lines hold the input and output history.

Direct Form II
--------------

    v[n] = x[n] - Σ a[j]·v[n-j]
    y[n] = b0·v[n] + Σ b[j]·v[n-j]

One delay line of the intermediate signal v serves both halves, the minimum
state for a given order (canonical form).

Transposed Forms
----------------

Reversing every arrow in the direct form graphs turns delay lines into chains
of partial sums. Each sample the output is read from the head of the chain,
and every partial sum is replaced by its neighbour plus this sample's
contribution:

    TDF-II:  y    = b0·x + s[0]
             s[j] = s[j+1] + b[j+1]·x - a[j+1]·y        (s[N] = 0)

    TDF-I:   v    = x + p[0]                              all-pole part
             p[j] = p[j+1] - a[j+1]·v
             y    = b0·v + z[0]                           all-zero part
             z[j] = z[j+1] + b[j+1]·v

Order 0 is a plain gain of b0/a0, which with the default coefficients is a
passthrough.
*/

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topology {
    DirectFormI,
    DirectFormII,
    TransposedDirectFormI,
    TransposedDirectFormII,
}

/// Normalized coefficient storage shared by every topology.
#[derive(Debug, Clone)]
struct Coefficients {
    b: Vec<f32>,
    a: Vec<f32>,
}

impl Coefficients {
    fn passthrough(order: usize) -> Self {
        let mut b = vec![0.0; order + 1];
        let mut a = vec![0.0; order + 1];
        b[0] = 1.0;
        a[0] = 1.0;
        Self { b, a }
    }

    #[inline]
    fn order(&self) -> usize {
        self.a.len() - 1
    }

    /// Copy `b` and `a` in, zero-padding to the filter order and dividing by a[0].
    fn set(&mut self, b: &[f32], a: &[f32]) -> Result<(), ConfigError> {
        let expected = self.a.len();
        for got in [b.len(), a.len()] {
            if got > expected {
                return Err(ConfigError::CoefficientLength { expected, got });
            }
        }

        let a0 = a.first().copied().unwrap_or(0.0);
        if a0 == 0.0 || !a0.is_finite() {
            return Err(ConfigError::ZeroLeadingCoefficient);
        }

        self.b.fill(0.0);
        self.a.fill(0.0);
        for (dst, &src) in self.b.iter_mut().zip(b) {
            *dst = src / a0;
        }
        for (dst, &src) in self.a.iter_mut().zip(a) {
            *dst = src / a0;
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct DirectFormI {
    coeffs: Coefficients,
    x_history: DelayLine,
    y_history: DelayLine,
}

impl DirectFormI {
    pub fn new(order: usize) -> Self {
        Self {
            coeffs: Coefficients::passthrough(order),
            x_history: DelayLine::new(order),
            y_history: DelayLine::new(order),
        }
    }

    #[inline]
    pub fn tick(&mut self, x: f32) -> f32 {
        let Coefficients { b, a } = &self.coeffs;
        let mut y = b[0] * x;
        for j in 1..=self.coeffs.order() {
            y += b[j] * self.x_history.access(j - 1);
            y -= a[j] * self.y_history.access(j - 1);
        }
        self.x_history.insert(x);
        self.y_history.insert(y);
        y
    }

    pub fn reset(&mut self) {
        self.x_history.reset();
        self.y_history.reset();
    }
}

#[derive(Debug, Clone)]
pub struct DirectFormII {
    coeffs: Coefficients,
    v_history: DelayLine,
}

impl DirectFormII {
    pub fn new(order: usize) -> Self {
        Self {
            coeffs: Coefficients::passthrough(order),
            v_history: DelayLine::new(order),
        }
    }

    #[inline]
    pub fn tick(&mut self, x: f32) -> f32 {
        let Coefficients { b, a } = &self.coeffs;
        let order = self.coeffs.order();

        let mut v = x;
        for j in 1..=order {
            v -= a[j] * self.v_history.access(j - 1);
        }
        let mut y = b[0] * v;
        for j in 1..=order {
            y += b[j] * self.v_history.access(j - 1);
        }
        self.v_history.insert(v);
        y
    }

    pub fn reset(&mut self) {
        self.v_history.reset();
    }
}

#[derive(Debug, Clone)]
pub struct TransposedDirectFormI {
    coeffs: Coefficients,
    pole_state: Vec<f32>,
    zero_state: Vec<f32>,
}

impl TransposedDirectFormI {
    pub fn new(order: usize) -> Self {
        Self {
            coeffs: Coefficients::passthrough(order),
            pole_state: vec![0.0; order],
            zero_state: vec![0.0; order],
        }
    }

    #[inline]
    pub fn tick(&mut self, x: f32) -> f32 {
        let Coefficients { b, a } = &self.coeffs;
        let order = self.coeffs.order();
        if order == 0 {
            return b[0] * x;
        }

        let v = x + self.pole_state[0];
        for j in 0..order - 1 {
            self.pole_state[j] = self.pole_state[j + 1] - a[j + 1] * v;
        }
        self.pole_state[order - 1] = -a[order] * v;

        let y = b[0] * v + self.zero_state[0];
        for j in 0..order - 1 {
            self.zero_state[j] = self.zero_state[j + 1] + b[j + 1] * v;
        }
        self.zero_state[order - 1] = b[order] * v;
        y
    }

    pub fn reset(&mut self) {
        self.pole_state.fill(0.0);
        self.zero_state.fill(0.0);
    }
}

#[derive(Debug, Clone)]
pub struct TransposedDirectFormII {
    coeffs: Coefficients,
    state: Vec<f32>,
}

impl TransposedDirectFormII {
    pub fn new(order: usize) -> Self {
        Self {
            coeffs: Coefficients::passthrough(order),
            state: vec![0.0; order],
        }
    }

    #[inline]
    pub fn tick(&mut self, x: f32) -> f32 {
        let Coefficients { b, a } = &self.coeffs;
        let order = self.coeffs.order();
        if order == 0 {
            return b[0] * x;
        }

        let y = b[0] * x + self.state[0];
        for j in 0..order - 1 {
            self.state[j] = self.state[j + 1] + b[j + 1] * x - a[j + 1] * y;
        }
        self.state[order - 1] = b[order] * x - a[order] * y;
        y
    }

    pub fn reset(&mut self) {
        self.state.fill(0.0);
    }
}

/// One IIR filter of fixed order, in one of the four topologies.
///
/// The topology is chosen at construction and dispatched with a `match`.
#[derive(Debug, Clone)]
pub enum IirFilter {
    DirectFormI(DirectFormI),
    DirectFormII(DirectFormII),
    TransposedDirectFormI(TransposedDirectFormI),
    TransposedDirectFormII(TransposedDirectFormII),
}

impl IirFilter {
    /// Passthrough filter of the given order; call `set_coefficients` next.
    pub fn new(topology: Topology, order: usize) -> Self {
        match topology {
            Topology::DirectFormI => Self::DirectFormI(DirectFormI::new(order)),
            Topology::DirectFormII => Self::DirectFormII(DirectFormII::new(order)),
            Topology::TransposedDirectFormI => {
                Self::TransposedDirectFormI(TransposedDirectFormI::new(order))
            }
            Topology::TransposedDirectFormII => {
                Self::TransposedDirectFormII(TransposedDirectFormII::new(order))
            }
        }
    }

    /// Build a filter sized to the longer of `b` and `a`.
    pub fn with_coefficients(topology: Topology, b: &[f32], a: &[f32]) -> Result<Self, ConfigError> {
        let order = b.len().max(a.len()).saturating_sub(1);
        let mut filter = Self::new(topology, order);
        filter.set_coefficients(b, a)?;
        Ok(filter)
    }

    pub fn topology(&self) -> Topology {
        match self {
            Self::DirectFormI(_) => Topology::DirectFormI,
            Self::DirectFormII(_) => Topology::DirectFormII,
            Self::TransposedDirectFormI(_) => Topology::TransposedDirectFormI,
            Self::TransposedDirectFormII(_) => Topology::TransposedDirectFormII,
        }
    }

    pub fn order(&self) -> usize {
        self.coeffs().order()
    }

    fn coeffs(&self) -> &Coefficients {
        match self {
            Self::DirectFormI(f) => &f.coeffs,
            Self::DirectFormII(f) => &f.coeffs,
            Self::TransposedDirectFormI(f) => &f.coeffs,
            Self::TransposedDirectFormII(f) => &f.coeffs,
        }
    }

    /// Load new coefficients. Shorter arrays are zero-padded to the order;
    /// both are divided by `a[0]`, which must be non-zero. State is kept.
    pub fn set_coefficients(&mut self, b: &[f32], a: &[f32]) -> Result<(), ConfigError> {
        let coeffs = match self {
            Self::DirectFormI(f) => &mut f.coeffs,
            Self::DirectFormII(f) => &mut f.coeffs,
            Self::TransposedDirectFormI(f) => &mut f.coeffs,
            Self::TransposedDirectFormII(f) => &mut f.coeffs,
        };
        coeffs.set(b, a)
    }

    /// Normalized feed-forward coefficients.
    pub fn b(&self) -> &[f32] {
        &self.coeffs().b
    }

    /// Normalized feedback coefficients (`a()[0] == 1`).
    pub fn a(&self) -> &[f32] {
        &self.coeffs().a
    }

    #[inline]
    pub fn tick(&mut self, x: f32) -> f32 {
        match self {
            Self::DirectFormI(f) => f.tick(x),
            Self::DirectFormII(f) => f.tick(x),
            Self::TransposedDirectFormI(f) => f.tick(x),
            Self::TransposedDirectFormII(f) => f.tick(x),
        }
    }

    /// Filter `input` into `output`. Both slices must be the same length.
    pub fn step(&mut self, input: &[f32], output: &mut [f32]) {
        debug_assert_eq!(input.len(), output.len());
        for (y, &x) in output.iter_mut().zip(input) {
            *y = self.tick(x);
        }
    }

    /// Filter `buffer` in place.
    pub fn process(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.tick(*sample);
        }
    }

    pub fn reset(&mut self) {
        match self {
            Self::DirectFormI(f) => f.reset(),
            Self::DirectFormII(f) => f.reset(),
            Self::TransposedDirectFormI(f) => f.reset(),
            Self::TransposedDirectFormII(f) => f.reset(),
        }
    }
}

impl Default for IirFilter {
    /// Order-0 passthrough.
    fn default() -> Self {
        Self::new(Topology::DirectFormII, 0)
    }
}
