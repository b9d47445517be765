use chrono::{DateTime, Duration, Utc};

/// Notified after every view change.
pub trait ViewListener: Send + Sync {
    /// `is_on_duty` is whether the local arbitrator holds duty in the new view.
    fn on_view_changed(&self, is_on_duty: bool);
}

/// Listener that ignores view changes.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopViewListener;

impl ViewListener for NoopViewListener {
    fn on_view_changed(&self, _is_on_duty: bool) {}
}

/// Round position: view offset and when the current view started.
///
/// SAFETY: The offset only moves forward within a round (or back to 0 on
/// reset), so a node never re-proposes at a view it already tried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
    view_offset: u32,
    view_start_time: DateTime<Utc>,
    sign_tolerance: Duration,
}

impl View {
    pub fn new(sign_tolerance: Duration, now: DateTime<Utc>) -> Self {
        View {
            view_offset: 0,
            view_start_time: now,
            sign_tolerance,
        }
    }

    pub fn view_offset(&self) -> u32 {
        self.view_offset
    }

    pub fn view_start_time(&self) -> DateTime<Utc> {
        self.view_start_time
    }

    pub fn sign_tolerance(&self) -> Duration {
        self.sign_tolerance
    }

    /// Back to offset 0 with a fresh timer.
    pub fn reset(&mut self, now: DateTime<Utc>) {
        self.view_offset = 0;
        self.view_start_time = now;
    }

    /// Move to the next view.
    pub fn advance(&mut self, now: DateTime<Utc>) {
        self.view_offset = self.view_offset.wrapping_add(1);
        self.view_start_time = now;
    }

    /// True once more than the sign tolerance has elapsed since the view started.
    pub fn is_timed_out(&self, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(self.view_start_time) > self.sign_tolerance
    }

    pub fn restore(&mut self, view_offset: u32, view_start_time: DateTime<Utc>) {
        self.view_offset = view_offset;
        self.view_start_time = view_start_time;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_is_strict() {
        let start = Utc::now();
        let view = View::new(Duration::seconds(5), start);
        assert!(!view.is_timed_out(start));
        assert!(!view.is_timed_out(start + Duration::seconds(5)));
        assert!(view.is_timed_out(start + Duration::milliseconds(5_001)));
    }

    #[test]
    fn test_advance_and_reset() {
        let start = Utc::now();
        let mut view = View::new(Duration::seconds(5), start);
        let later = start + Duration::seconds(6);
        view.advance(later);
        view.advance(later);
        assert_eq!(view.view_offset(), 2);
        assert_eq!(view.view_start_time(), later);
        assert!(!view.is_timed_out(later));

        view.reset(start);
        assert_eq!(view.view_offset(), 0);
        assert_eq!(view.view_start_time(), start);
    }
}
