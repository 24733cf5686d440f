use std::{f32, fmt};

#[derive(Clone)]
pub struct Stats {
    sum: f32,
    count: u32,
    max: f32,
    min: f32
}

impl fmt::Debug for Stats {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), std::fmt::Error> {
        f.debug_struct("Stats")
            .field("count", &self.count)
            .field("min", &self.min)
            .field("max", &self.max)
            .field("sum", &self.sum)
            .field("mean", &self.mean())
            .finish()
    }
}

impl Stats {

    pub fn new() -> Self {
        Stats {
            sum: 0.0,
            count: 0,
            max: f32::NAN,
            min: f32::NAN
        }
    }

    #[inline]
    pub fn report(&mut self, value: f32) {
        self.sum += value;
        self.count += 1;
        if self.min.is_nan() || self.min > value {
            self.min = value;
        }
        if self.max.is_nan() || self.max < value {
            self.max = value;
        }
    }

    /// Folds in statistics gathered elsewhere, e.g. by another worker.
    pub fn merge(&mut self, other: &Stats) {
        if other.count == 0 {
            return;
        }
        self.sum += other.sum;
        self.count += other.count;
        if self.min.is_nan() || self.min > other.min {
            self.min = other.min;
        }
        if self.max.is_nan() || self.max < other.max {
            self.max = other.max;
        }
    }

    #[inline]
    pub fn mean(&self) -> f32 {
        self.sum / self.count as f32
    }

    #[inline]
    pub fn max(&self) -> f32 {
        self.max
    }

    #[inline]
    pub fn min(&self) -> f32 {
        self.min
    }

    #[inline]
    pub fn count(&self) -> u32 {
        self.count
    }
}
