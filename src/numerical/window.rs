const MIN_SAMPLES: usize = 200;
const MAX_SAMPLES: usize = 200_000;

/// Finite interval of the real line that numerical searches run inside, plus the sampling
/// density used there. Infinite domains are explored only as far as this window reaches.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchWindow {
    pub start: f64,
    pub end: f64,
    /// number of grid intervals over the whole window
    pub samples: usize,
}

impl Default for SearchWindow {
    fn default() -> Self {
        Self {
            start: -100.0,
            end: 100.0,
            samples: 4000,
        }
    }
}

impl SearchWindow {
    pub fn new(start: f64, end: f64, samples: usize) -> Self {
        Self {
            start,
            end,
            samples: samples.max(2),
        }
    }

    pub fn width(&self) -> f64 {
        self.end - self.start
    }

    /// Intersects `[a, b]` with the window; `None` when the intersection is empty.
    pub fn clamp(&self, a: f64, b: f64) -> Option<(f64, f64)> {
        let lo = a.max(self.start);
        let hi = b.min(self.end);
        if lo < hi { Some((lo, hi)) } else { None }
    }

    /// Window restricted to `[a, b]`, with the sample count scaled to its share of the width.
    pub fn restrict(&self, a: f64, b: f64) -> Option<SearchWindow> {
        let (lo, hi) = self.clamp(a, b)?;
        let share = ((hi - lo) / self.width() * self.samples as f64).ceil() as usize;
        Some(SearchWindow::new(lo, hi, share.max(MIN_SAMPLES)))
    }

    /// grid intervals per unit length
    pub fn density(&self) -> f64 {
        self.samples as f64 / self.width()
    }

    /// Window over `[a, b]` at the same density. Finite ends are kept even outside this
    /// window; an infinite end stops at the window edge, or one window width past the finite
    /// end when that lies beyond the edge. `None` for an empty or inverted interval.
    pub fn covering(&self, a: f64, b: f64) -> Option<SearchWindow> {
        if a.is_nan() || b.is_nan() || !(a < b) {
            return None;
        }
        let lo = if a.is_finite() {
            a
        } else if b > self.start {
            self.start
        } else {
            b - self.width()
        };
        let hi = if b.is_finite() {
            b
        } else if a < self.end {
            self.end
        } else {
            a + self.width()
        };
        if !(lo < hi) {
            return None;
        }
        let samples = ((hi - lo) * self.density()).ceil();
        let samples = if samples.is_finite() {
            (samples as usize).clamp(MIN_SAMPLES, MAX_SAMPLES)
        } else {
            MAX_SAMPLES
        };
        Some(SearchWindow::new(lo, hi, samples))
    }
}
