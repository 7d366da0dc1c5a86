use std::sync::Arc;

use parking_lot::Mutex;

use crate::series::rolling_buffer::{AngleSample, RollingSeriesBuffer, SeriesSnapshot};

/// Cloneable handle to a rolling buffer written by one capture worker and
/// read by the render side. Reads copy the series under a short-held lock.
#[derive(Debug, Clone)]
pub struct SharedSeriesBuffer {
    inner: Arc<Mutex<RollingSeriesBuffer>>,
}

impl SharedSeriesBuffer {
    pub fn new(buffer: RollingSeriesBuffer) -> Self {
        SharedSeriesBuffer {
            inner: Arc::new(Mutex::new(buffer)),
        }
    }

    pub fn push(&self, sample: AngleSample) {
        self.inner.lock().push(sample);
    }

    pub fn snapshot(&self) -> SeriesSnapshot {
        self.inner.lock().snapshot()
    }

    /// push_and_snapshot appends a sample and returns the resulting series in one lock.
    pub fn push_and_snapshot(&self, sample: AngleSample) -> SeriesSnapshot {
        let mut buffer = self.inner.lock();
        buffer.push(sample);
        buffer.snapshot()
    }

    pub fn clear(&self) {
        self.inner.lock().clear();
    }

    pub fn capacity(&self) -> usize {
        self.inner.lock().capacity()
    }
}

impl From<RollingSeriesBuffer> for SharedSeriesBuffer {
    fn from(value: RollingSeriesBuffer) -> Self {
        SharedSeriesBuffer::new(value)
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use crate::series::rolling_buffer::{AngleSample, RollingSeriesBuffer};
    use crate::series::shared::SharedSeriesBuffer;

    #[test]
    fn test_reader_never_sees_torn_sample() {
        let shared = SharedSeriesBuffer::new(RollingSeriesBuffer::new(16));

        let writer = {
            let shared = shared.clone();
            thread::spawn(move || {
                for i in 1..=2000 {
                    let v = i as f64;
                    shared.push(AngleSample::new(v, v, v, v));
                }
            })
        };

        for _ in 0..200 {
            let snapshot = shared.snapshot();
            assert_eq!(snapshot.len(), 16);
            assert_eq!(snapshot.neck, snapshot.arm);
            assert_eq!(snapshot.arm, snapshot.body);
            assert_eq!(snapshot.body, snapshot.leg);
        }

        writer.join().unwrap();
        let snapshot = shared.snapshot();
        assert_eq!(snapshot.neck.last().copied(), Some(2000.0));
        assert_eq!(snapshot.neck.first().copied(), Some(1985.0));
    }

    #[test]
    fn test_push_and_snapshot() {
        let shared = SharedSeriesBuffer::from(RollingSeriesBuffer::new(2));
        let snapshot = shared.push_and_snapshot(AngleSample::new(1.0, 2.0, 3.0, 4.0));
        assert_eq!(snapshot.leg, vec![0.0, 4.0]);
        assert_eq!(shared.snapshot(), snapshot);

        shared.clear();
        assert_eq!(shared.snapshot().leg, vec![0.0, 0.0]);
        assert_eq!(shared.capacity(), 2);
    }
}
