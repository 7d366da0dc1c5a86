//! Rolling angle history for the real-time chart
//!
//! Keeps the last N samples of each tracked signal (neck, arm, body, leg)
//! in arrival order. Series start pre-filled with a neutral value so the
//! chart has a stable x-axis domain from the first draw.

use std::collections::VecDeque;

use anyhow::Error;
use ndarray::{stack, Array2, ArrayView1, Axis};
use serde::{Deserialize, Serialize};

/// Default number of samples kept per signal
pub const DEFAULT_CAPACITY: usize = 200;

/// Joint angles derived from a single tick, in degrees
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AngleSample {
    pub neck: f64,
    pub arm: f64,
    pub body: f64,
    pub leg: f64,
}

/// Label texts shown next to the video
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AngleLabels {
    pub neck: String,
    pub arm: String,
    pub body: String,
    pub leg: String,
}

impl AngleSample {
    pub fn new(neck: f64, arm: f64, body: f64, leg: f64) -> Self {
        AngleSample { neck, arm, body, leg }
    }

    /// labels renders one decimal per angle. Body shows the tilt magnitude.
    pub fn labels(&self) -> AngleLabels {
        self.labels_for("")
    }

    /// labels_for renders the labels of one camera, e.g. `Neck A: 12.3°`.
    /// An empty tag gives the untagged form.
    pub fn labels_for(&self, tag: &str) -> AngleLabels {
        let name = |signal: &str| {
            if tag.is_empty() {
                signal.to_string()
            } else {
                format!("{signal} {tag}")
            }
        };
        AngleLabels {
            neck: format!("{}: {:.1}°", name("Neck"), self.neck),
            arm: format!("{}: {:.1}°", name("Arm"), self.arm),
            body: format!("{}: {:.1}°", name("Body"), self.body.abs()),
            leg: format!("{}: {:.1}°", name("Leg"), self.leg),
        }
    }
}

/// Single capacity-bounded FIFO series
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesBuffer {
    data: VecDeque<f64>,
    capacity: usize,
}

impl SeriesBuffer {
    pub fn with_fill(capacity: usize, fill: f64) -> Self {
        let mut data = VecDeque::with_capacity(capacity);
        data.extend(std::iter::repeat(fill).take(capacity));
        SeriesBuffer { data, capacity }
    }

    /// Append a value, evicting the oldest one when full
    pub fn push(&mut self, value: f64) {
        if self.capacity == 0 {
            return
        }
        if self.data.len() == self.capacity {
            self.data.pop_front();
        }
        self.data.push_back(value);
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn latest(&self) -> Option<f64> {
        self.data.back().copied()
    }

    /// Values oldest to newest
    pub fn to_vec(&self) -> Vec<f64> {
        self.data.iter().copied().collect()
    }
}

/// Owned copy of all four series, oldest to newest
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SeriesSnapshot {
    pub neck: Vec<f64>,
    pub arm: Vec<f64>,
    pub body: Vec<f64>,
    pub leg: Vec<f64>,
}

impl SeriesSnapshot {
    pub fn len(&self) -> usize {
        self.neck.len()
    }

    pub fn is_empty(&self) -> bool {
        self.neck.is_empty()
    }

    /// to_array stacks the series into rows (neck, arm, body, leg).
    ///
    /// # Returns
    /// * `Result<Array2<f64>, Error>` with shape `(4, len)`
    pub fn to_array(&self) -> Result<Array2<f64>, Error> {
        let rows = [
            ArrayView1::from(&self.neck[..]),
            ArrayView1::from(&self.arm[..]),
            ArrayView1::from(&self.body[..]),
            ArrayView1::from(&self.leg[..]),
        ];
        Ok(stack(Axis(0), &rows)?)
    }

    /// x_axis returns sample offsets relative to the newest, e.g. `-199..=0`.
    pub fn x_axis(&self) -> Vec<i64> {
        let len = self.len() as i64;
        (1 - len..=0).collect()
    }
}

/// Four named series advanced together, one slot per tick
#[derive(Debug, Clone, PartialEq)]
pub struct RollingSeriesBuffer {
    neck: SeriesBuffer,
    arm: SeriesBuffer,
    body: SeriesBuffer,
    leg: SeriesBuffer,
    fill: f64,
}

impl RollingSeriesBuffer {
    pub fn new(capacity: usize) -> Self {
        Self::with_fill(capacity, 0.0)
    }

    pub fn with_fill(capacity: usize, fill: f64) -> Self {
        RollingSeriesBuffer {
            neck: SeriesBuffer::with_fill(capacity, fill),
            arm: SeriesBuffer::with_fill(capacity, fill),
            body: SeriesBuffer::with_fill(capacity, fill),
            leg: SeriesBuffer::with_fill(capacity, fill),
            fill,
        }
    }

    /// Push one sample set into the four series
    pub fn push(&mut self, sample: AngleSample) {
        self.neck.push(sample.neck);
        self.arm.push(sample.arm);
        self.body.push(sample.body);
        self.leg.push(sample.leg);
    }

    pub fn snapshot(&self) -> SeriesSnapshot {
        SeriesSnapshot {
            neck: self.neck.to_vec(),
            arm: self.arm.to_vec(),
            body: self.body.to_vec(),
            leg: self.leg.to_vec(),
        }
    }

    pub fn latest(&self) -> Option<AngleSample> {
        Some(AngleSample {
            neck: self.neck.latest()?,
            arm: self.arm.latest()?,
            body: self.body.latest()?,
            leg: self.leg.latest()?,
        })
    }

    /// Reset every series back to the pre-filled state
    pub fn clear(&mut self) {
        *self = Self::with_fill(self.capacity(), self.fill);
    }

    pub fn capacity(&self) -> usize {
        self.neck.capacity()
    }

    pub fn len(&self) -> usize {
        self.neck.len()
    }

    pub fn is_empty(&self) -> bool {
        self.neck.is_empty()
    }
}

impl Default for RollingSeriesBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
