//! Collection of measurements useful for debugging and "primitive benchmarking"
use std::fmt::Debug;
use std::ops::AddAssign;
use std::time::Duration;

use log::info;

/// Everything an [`IntersectingTilesFinder`](crate::finder::IntersectingTilesFinder) keeps track of
#[derive(Default, Copy, Clone, Debug)]
pub struct Measurements {
    /// Time spent projecting, buffering and descending per geometry
    pub time: CombinedMeasure<Duration>,

    /// Number of tiles tested against each geometry
    pub tested: CombinedMeasure<u64>,

    /// Number of input features which couldn't be converted into a geometry
    pub skipped: u32,
}
impl Measurements {
    /// Combine with the measurements of another finder
    pub fn merge(&mut self, other: &Measurements) {
        self.time.merge(&other.time);
        self.tested.merge(&other.tested);
        self.skipped += other.skipped;
    }

    /// Log the measured results
    pub fn print(&self) {
        let CombinedMeasure { polygons, lines } = &self.time;
        for (name, measurement) in [("polygons", polygons), ("lines", lines)] {
            info!(
                "{} {name} took {:?} to process at {:?} each",
                measurement.number,
                measurement.acc,
                measurement.avg()
            );
        }

        let CombinedMeasure { polygons, lines } = &self.tested;
        for (name, measurement) in [("Polygons", polygons), ("Lines", lines)] {
            info!(
                "{name} required between {} and {} tile tests, averaging at {:.1}",
                measurement.min,
                measurement.max,
                measurement.avg()
            );
        }

        if self.skipped > 0 {
            info!("Skipped {} features", self.skipped);
        }
    }
}

/// Collective measurements of a single type seperated in polygons and lines.
#[derive(Default, Copy, Clone, Debug)]
pub struct CombinedMeasure<T: Measureable> {
    pub polygons: Measurement<T>,
    pub lines: Measurement<T>,
}
impl<T: Measureable> CombinedMeasure<T> {
    pub fn merge(&mut self, other: &CombinedMeasure<T>) {
        self.polygons.merge(&other.polygons);
        self.lines.merge(&other.lines);
    }
}

#[derive(Default, Copy, Clone)]
pub struct Measurement<T: Measureable> {
    /// How many values have been:
    /// - accumulated into `acc`
    /// - compared with `max`
    pub number: u32,

    /// Sum of all seen values
    pub acc: T,

    /// The lowest of all seen values
    pub min: T,

    /// The highest of all seen values
    pub max: T,
}
impl<T: Measureable> Measurement<T> {
    /// Add a data point to the measurement
    pub fn add(&mut self, value: T) {
        self.merge(&Measurement {
            number: 1,
            acc: value,
            min: value,
            max: value,
        });
    }

    /// Add all data points of another measurement
    pub fn merge(&mut self, other: &Measurement<T>) {
        if other.number == 0 {
            return;
        }
        if self.number == 0 {
            // Since Measurement<T> is generic, min and max can't be initialised with some MAX and MIN constants.
            *self = *other;
            return;
        }

        self.number += other.number;
        self.acc += other.acc;
        if self.max < other.max {
            self.max = other.max;
        }
        if self.min > other.min {
            self.min = other.min;
        }
    }

    /// Get the average value
    pub fn avg(&self) -> T::Avg {
        self.acc.avg(self.number)
    }
}
// Custom Debug impl
// - also outputs `avg`
impl<T: Measureable> Debug for Measurement<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Measurement")
            .field("number", &self.number)
            .field("acc", &self.acc)
            .field("min", &self.min)
            .field("max", &self.max)
            .field("avg", &self.avg())
            .finish()
    }
}

/// Empty trait combining all traits required of measured values into a single shorthand.
pub trait Measureable: Default + Copy + PartialOrd + AddAssign<Self> + Debug {
    type Avg: Debug + Default;

    /// Average of `count` values summing up to `self`, the default for no values
    fn avg(self, count: u32) -> Self::Avg;
}
impl Measureable for Duration {
    type Avg = Self;
    fn avg(self, count: u32) -> Self::Avg {
        self.checked_div(count).unwrap_or_default()
    }
}
macro_rules! impl_numeric {
    ($($T:ty),*) => {
        $(
            impl Measureable for $T {
                type Avg = f64;
                fn avg(self, count: u32) -> Self::Avg {
                    if count == 0 {
                        0.0
                    } else {
                        self as f64 / count as f64
                    }
                }
            }
        )*
    };
}
impl_numeric!(u64);
