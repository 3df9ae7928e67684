use crate::core::util::unit_position;
use crate::core::Element;

/// Fixed-bin frequency distribution of a sample sequence.
///
/// Bins have equal width and span `[min, max]`; the last bin is closed so
/// the maximum lands in it. Non-finite samples take no part in the range and
/// are not binned, they are only tallied in `get_excluded_count`.
#[derive(Clone, Debug, PartialEq)]
pub struct Histogram {
    min: f64,
    max: f64,
    counts: Vec<u64>,
    total_count: u64,
    excluded_count: u64,
}

#[inline(always)]
fn bin_of(value: f64, min: f64, max: f64, bin_count: usize) -> usize {
    let bin = (unit_position(value, min, max) * bin_count as f64) as usize;
    if bin >= bin_count { bin_count - 1 } else { bin }
}

impl Histogram {
    /// Histogram of nothing: no bins, min = max = 0.
    pub fn empty() -> Histogram {
        Histogram {
            min: 0.0,
            max: 0.0,
            counts: Vec::new(),
            total_count: 0,
            excluded_count: 0,
        }
    }

    /// Scan `values` once for the finite range, then once more to bin them.
    ///
    /// A constant sequence yields a single bin holding every finite sample.
    pub fn compute<T: Element>(values: &[T], bin_count: usize) -> Histogram {
        let bin_count = bin_count.max(1);
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut finite = 0_u64;
        for v in values {
            let v = v.as_f64();
            if v.is_finite() {
                finite += 1;
                if v < min {
                    min = v;
                }
                if v > max {
                    max = v;
                }
            }
        }
        let excluded_count = values.len() as u64 - finite;

        if finite == 0 {
            return Histogram { excluded_count, ..Histogram::empty() };
        }

        if min == max {
            return Histogram {
                min,
                max,
                counts: vec![finite],
                total_count: finite,
                excluded_count,
            };
        }

        let mut counts = vec![0_u64; bin_count];
        for v in values {
            let v = v.as_f64();
            if v.is_finite() {
                counts[bin_of(v, min, max, bin_count)] += 1;
            }
        }

        Histogram {
            min,
            max,
            counts,
            total_count: finite,
            excluded_count,
        }
    }

    pub fn get_min(&self) -> f64 {
        self.min
    }

    pub fn get_max(&self) -> f64 {
        self.max
    }

    pub fn get_range(&self) -> f64 {
        self.max - self.min
    }

    pub fn get_bin_count(&self) -> usize {
        self.counts.len()
    }

    pub fn get_count_at_index(&self, index: usize) -> Option<u64> {
        self.counts.get(index).copied()
    }

    /// Number of binned (finite) samples.
    pub fn get_total_count(&self) -> u64 {
        self.total_count
    }

    pub fn get_excluded_count(&self) -> u64 {
        self.excluded_count
    }

    pub fn get_max_bin_count(&self) -> u64 {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    /// Width of one bin; infinite when `max - min` overflows f64.
    pub fn get_bin_width(&self) -> f64 {
        if self.counts.is_empty() {
            0.0
        } else {
            self.get_range() / self.counts.len() as f64
        }
    }

    /// Lower edge of bin `index`.
    pub fn get_bin_start(&self, index: usize) -> Option<f64> {
        if index >= self.counts.len() {
            return None;
        }
        let half_width = (self.max * 0.5 - self.min * 0.5) / self.counts.len() as f64;
        Some(self.min + index as f64 * half_width * 2.0)
    }

    /// Bin that `value` falls into, `None` outside `[min, max]`.
    pub fn bin_index(&self, value: f64) -> Option<usize> {
        if self.counts.is_empty() || !(value >= self.min && value <= self.max) {
            return None;
        }
        if self.counts.len() == 1 {
            return Some(0);
        }
        Some(bin_of(value, self.min, self.max, self.counts.len()))
    }

    /// True once at least one finite sample was binned.
    pub fn is_valid(&self) -> bool {
        !self.counts.is_empty()
    }

    pub fn counts(&self) -> &[u64] {
        &self.counts
    }
}

impl Default for Histogram {
    fn default() -> Histogram {
        Histogram::empty()
    }
}
