use foundation::time::Time;

/// Per-tick frame metadata.
///
/// The loop is driven by the host's animation callback, so `dt_s` varies from
/// frame to frame; `time` is the running sum of all deltas so far.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Frame {
    /// 0-based frame index.
    pub index: u64,
    /// Seconds since the previous frame.
    pub dt_s: f64,
    /// Engine time at the start of the frame (seconds).
    pub time: Time,
}

impl Frame {
    /// The frame before the first tick. `next` on it yields index 0.
    pub fn start() -> Self {
        Self {
            index: u64::MAX,
            dt_s: 0.0,
            time: Time(0.0),
        }
    }

    pub fn next(self, dt_s: f64) -> Self {
        let dt_s = if dt_s.is_finite() { dt_s.max(0.0) } else { 0.0 };
        let index = self.index.wrapping_add(1);
        // The first frame starts the clock at zero.
        let time = if index == 0 {
            Time(0.0)
        } else {
            self.time.advanced(dt_s)
        };
        Self { index, dt_s, time }
    }
}

impl Default for Frame {
    fn default() -> Self {
        Self::start()
    }
}
