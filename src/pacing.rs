use crossbeam_channel::{Receiver, Sender};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Delay between two frames of a stream running at `fps_num / fps_den` frames per second.
///
/// Truncated to whole milliseconds. Returns `None` for a zero numerator.
pub fn frame_delay(fps_num: u64, fps_den: u64) -> Option<Duration> {
    if fps_num == 0 {
        return None;
    }

    let millis = 1000u64.saturating_mul(fps_den) / fps_num;

    Some(Duration::from_millis(millis))
}

/// Cooperative stop flag shared between a playback worker and whoever controls it.
///
/// Raising the signal also wakes a worker blocked in [`wait_timeout`](Self::wait_timeout).
#[derive(Debug, Clone)]
pub struct StopSignal {
    raised: Arc<AtomicBool>,
    wake_tx: Sender<()>,
    wake_rx: Receiver<()>,
}

impl Default for StopSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl StopSignal {
    pub fn new() -> Self {
        let (wake_tx, wake_rx) = crossbeam_channel::bounded(1);

        Self {
            raised: Arc::new(AtomicBool::new(false)),
            wake_tx,
            wake_rx,
        }
    }

    pub fn raise(&self) {
        self.raised.store(true, Ordering::Release);

        // A pending wake-up is as good as a new one
        let _ = self.wake_tx.try_send(());
    }

    pub fn is_raised(&self) -> bool {
        self.raised.load(Ordering::Acquire)
    }

    /// Block for up to `timeout`, returning early once the signal is raised.
    ///
    /// Returns whether the signal is raised.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        if self.is_raised() {
            return true;
        }

        // Both channel ends live in `self`, so this only ends by wake-up or timeout
        let _ = self.wake_rx.recv_timeout(timeout);

        self.is_raised()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Instant;

    #[test]
    fn delay_from_frame_rate() {
        assert_eq!(frame_delay(30, 1), Some(Duration::from_millis(33)));
        assert_eq!(frame_delay(30000, 1001), Some(Duration::from_millis(33)));
        assert_eq!(frame_delay(24, 1), Some(Duration::from_millis(41)));
        assert_eq!(frame_delay(1, 2), Some(Duration::from_millis(2000)));
        assert_eq!(frame_delay(2000, 1), Some(Duration::ZERO));
        assert_eq!(frame_delay(0, 1), None);
    }

    #[test]
    fn wait_times_out_when_not_raised() {
        let stop = StopSignal::new();
        let start = Instant::now();

        assert!(!stop.wait_timeout(Duration::from_millis(20)));
        assert!(start.elapsed() >= Duration::from_millis(20));
    }

    #[test]
    fn raise_wakes_waiter() {
        let stop = StopSignal::new();
        let remote = stop.clone();

        let waiter = thread::spawn(move || {
            let start = Instant::now();
            let raised = stop.wait_timeout(Duration::from_secs(30));
            (raised, start.elapsed())
        });

        thread::sleep(Duration::from_millis(10));
        remote.raise();

        let (raised, elapsed) = waiter.join().unwrap();
        assert!(raised);
        assert!(elapsed < Duration::from_secs(30));
    }

    #[test]
    fn raising_twice_is_fine() {
        let stop = StopSignal::new();
        stop.raise();
        stop.raise();

        assert!(stop.is_raised());
        assert!(stop.wait_timeout(Duration::from_secs(30)));
    }
}
