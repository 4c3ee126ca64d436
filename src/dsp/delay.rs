/// Fixed-capacity ring buffer of past samples.
///
/// `insert` steps the write cursor backwards and stores the new sample there,
/// so `access(d)` is simply `buffer[(cursor + d) % capacity]`: the sample
/// inserted `d` steps ago. Reading never moves the cursor.
#[derive(Debug, Clone)]
pub struct DelayLine {
    buffer: Vec<f32>,
    index: usize,
}

impl DelayLine {
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: vec![0.0; capacity],
            index: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    pub fn insert(&mut self, sample: f32) {
        let len = self.buffer.len();
        if len == 0 {
            return;
        }

        self.index = if self.index == 0 { len - 1 } else { self.index - 1 };
        self.buffer[self.index] = sample;
    }

    /// Sample inserted `delay` steps ago (0 = most recent).
    ///
    /// Delays at or beyond the capacity wrap around.
    #[inline]
    pub fn access(&self, delay: usize) -> f32 {
        let len = self.buffer.len();
        if len == 0 {
            return 0.0;
        }
        self.buffer[(self.index + delay) % len]
    }

    pub fn reset(&mut self) {
        self.buffer.fill(0.0);
        self.index = 0;
    }
}
