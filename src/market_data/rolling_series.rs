use std::collections::VecDeque;

use crate::types::Sample;

// ---------------------------------------------------------------------------
// RollingSeries -- fixed-capacity FIFO
// ---------------------------------------------------------------------------

/// Ordered buffer holding the most recent `capacity` values, by default of a
/// single price field.  Appending past capacity evicts from the front.
#[derive(Debug, Clone)]
pub struct RollingSeries<T = f64> {
    values: VecDeque<T>,
    capacity: usize,
}

impl<T: Clone> RollingSeries<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            values: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Append one value and trim the oldest until `len() <= capacity`.
    pub fn append(&mut self, value: T) {
        self.values.push_back(value);
        while self.values.len() > self.capacity {
            self.values.pop_front();
        }
    }

    /// Current contents, oldest first.  Copies; use [`PriceSeries::window`]
    /// for a borrowed view.
    #[allow(dead_code)]
    pub fn values(&self) -> Vec<T> {
        self.values.iter().cloned().collect()
    }

    /// The newest `count` values (or all of them when fewer), oldest first.
    pub fn tail(&self, count: usize) -> Vec<T> {
        let skip = self.values.len().saturating_sub(count);
        self.values.iter().skip(skip).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn as_slice(&mut self) -> &[T] {
        self.values.make_contiguous()
    }
}

// ---------------------------------------------------------------------------
// PriceSeries -- the four OHLC series moving in lock-step
// ---------------------------------------------------------------------------

/// The open/high/low/close series for the tracked instrument.  All four always
/// have the same length because they are only ever appended together.
#[derive(Debug, Clone)]
pub struct PriceSeries {
    open: RollingSeries<f64>,
    high: RollingSeries<f64>,
    low: RollingSeries<f64>,
    close: RollingSeries<f64>,
}

/// Borrowed, oldest-first view of the OHLC series handed to indicator math.
#[derive(Debug, Clone, Copy)]
pub struct PriceWindow<'a> {
    #[allow(dead_code)] // no indicator reads opens
    pub open: &'a [f64],
    pub high: &'a [f64],
    pub low: &'a [f64],
    pub close: &'a [f64],
}

impl PriceSeries {
    pub fn new(capacity: usize) -> Self {
        Self {
            open: RollingSeries::new(capacity),
            high: RollingSeries::new(capacity),
            low: RollingSeries::new(capacity),
            close: RollingSeries::new(capacity),
        }
    }

    pub fn push(&mut self, sample: &Sample) {
        self.open.append(sample.open);
        self.high.append(sample.high);
        self.low.append(sample.low);
        self.close.append(sample.close);
    }

    /// Number of samples currently held (identical across the four fields).
    pub fn len(&self) -> usize {
        self.close.len()
    }

    pub fn capacity(&self) -> usize {
        self.close.capacity()
    }

    pub fn window(&mut self) -> PriceWindow<'_> {
        let Self {
            open,
            high,
            low,
            close,
        } = self;
        PriceWindow {
            open: open.as_slice(),
            high: high.as_slice(),
            low: low.as_slice(),
            close: close.as_slice(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
