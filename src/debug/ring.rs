/// Fixed-capacity circular buffer. Oldest entries are overwritten.
pub struct RingBuffer<T> {
    buf: Vec<T>,
    head: usize,
    len: usize,
}

impl<T: Copy + Default> RingBuffer<T> {
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "ring buffer needs room for one entry");
        Self {
            buf: vec![T::default(); capacity],
            head: 0,
            len: 0,
        }
    }

    pub fn push(&mut self, value: T) {
        let capacity = self.buf.len();
        self.buf[self.head] = value;
        self.head = (self.head + 1) % capacity;
        self.len = (self.len + 1).min(capacity);
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Iterate from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        let capacity = self.buf.len();
        let start = (self.head + capacity - self.len) % capacity;
        (0..self.len).map(move |i| &self.buf[(start + i) % capacity])
    }
}

/// min / mean / max over a window of frame times.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowStats {
    pub min: f64,
    pub mean: f64,
    pub max: f64,
}

impl RingBuffer<f64> {
    pub fn stats(&self) -> Option<WindowStats> {
        if self.is_empty() {
            return None;
        }
        let (mut min, mut max, mut sum) = (f64::MAX, f64::MIN, 0.0);
        for &v in self.iter() {
            min = min.min(v);
            max = max.max(v);
            sum += v;
        }
        Some(WindowStats {
            min,
            mean: sum / self.len as f64,
            max,
        })
    }
}
