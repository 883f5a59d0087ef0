/// Time-bounded flashing of one label, used to draw attention to a marking
/// after it was created or merged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Blink {
    pub label: u32,
    pub period_ms: u64,
    pub until_ms: u64,
}

impl Blink {
    /// Flashes `flashes` times, each on and off phase lasting `period_ms`.
    pub fn start(label: u32, flashes: u32, period_ms: u64, now_ms: u64) -> Self {
        let period_ms = period_ms.max(1);
        let duration = u64::from(flashes) * 2 * period_ms;
        Self {
            label,
            period_ms,
            until_ms: now_ms.saturating_add(duration),
        }
    }

    pub fn is_active(&self, now_ms: u64) -> bool {
        now_ms < self.until_ms
    }

    /// Emphasis for `label` at `now_ms`, or `None` when the blink does not
    /// apply and the selection state decides.
    pub fn emphasis(&self, label: u32, now_ms: u64) -> Option<bool> {
        (label == self.label && self.is_active(now_ms))
            .then(|| (now_ms / self.period_ms) % 2 == 0)
    }
}
