//! Fixed-delay driver for synchronization ticks

use log::{error, info};
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::Duration;

/// Runs a tick function repeatedly with a fixed delay between runs
///
/// The delay is measured from the end of one tick to the start of the
/// next, so a slow tick postpones the following one and ticks never
/// overlap. A failed tick is logged and the loop carries on.
#[derive(Debug, Clone, Copy)]
pub struct Scheduler {
    interval: Duration,
}

impl Scheduler {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Run ticks on the calling thread until `shutdown` fires
    ///
    /// A message on `shutdown`, or its sender being dropped, stops the loop
    /// at the next wait. Returns the number of ticks executed.
    pub fn run<T, E, F>(&self, mut tick: F, shutdown: &Receiver<()>) -> usize
    where
        F: FnMut() -> Result<T, E>,
        E: Into<anyhow::Error>,
    {
        info!(
            "Scheduler started with {}ms between ticks",
            self.interval.as_millis()
        );

        let mut ticks = 0;
        loop {
            if let Err(e) = tick() {
                let e: anyhow::Error = e.into();
                error!("Catalog integration tick failed: {:#}", e);
            }
            ticks += 1;

            match shutdown.recv_timeout(self.interval) {
                Err(RecvTimeoutError::Timeout) => continue,
                Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
            }
        }

        info!("Scheduler stopped after {} ticks", ticks);
        ticks
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new(Duration::from_millis(5000))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::{Arc, mpsc};
    use std::time::Instant;

    #[test]
    fn test_stops_when_signalled() {
        let scheduler = Scheduler::new(Duration::from_millis(1));
        let (tx, rx) = mpsc::channel();
        let mut count = 0;

        let ticks = scheduler.run(
            || {
                count += 1;
                if count == 3 {
                    tx.send(()).unwrap();
                }
                Ok::<_, anyhow::Error>(())
            },
            &rx,
        );

        assert_eq!(ticks, 3);
    }

    #[test]
    fn test_keeps_running_after_failure() {
        let scheduler = Scheduler::new(Duration::from_millis(1));
        let (tx, rx) = mpsc::channel();
        let mut count = 0;

        let ticks = scheduler.run(
            || {
                count += 1;
                if count == 4 {
                    tx.send(()).unwrap();
                }
                if count % 2 == 1 {
                    Err(anyhow!("catalog unavailable"))
                } else {
                    Ok(())
                }
            },
            &rx,
        );

        assert_eq!(ticks, 4);
    }

    #[test]
    fn test_disconnected_sender_stops_after_first_tick() {
        let scheduler = Scheduler::new(Duration::from_secs(60));
        let (tx, rx) = mpsc::channel::<()>();
        drop(tx);

        let ticks = scheduler.run(|| Ok::<_, anyhow::Error>(()), &rx);

        assert_eq!(ticks, 1);
    }

    #[test]
    fn test_ticks_never_overlap_and_wait_after_completion() {
        let interval = Duration::from_millis(20);
        let scheduler = Scheduler::new(interval);
        let (tx, rx) = mpsc::channel();
        let running = Arc::new(AtomicBool::new(false));
        let overlaps = Arc::new(AtomicUsize::new(0));
        let mut finished_at: Option<Instant> = None;
        let mut gaps = Vec::new();
        let mut count = 0;

        scheduler.run(
            || {
                if let Some(end) = finished_at {
                    gaps.push(end.elapsed());
                }
                if running.swap(true, Ordering::SeqCst) {
                    overlaps.fetch_add(1, Ordering::SeqCst);
                }
                // Slower than the interval
                std::thread::sleep(Duration::from_millis(30));
                running.store(false, Ordering::SeqCst);
                finished_at = Some(Instant::now());

                count += 1;
                if count == 3 {
                    tx.send(()).unwrap();
                }
                Ok::<_, anyhow::Error>(())
            },
            &rx,
        );

        assert_eq!(overlaps.load(Ordering::SeqCst), 0);
        assert_eq!(gaps.len(), 2);
        assert!(gaps.iter().all(|gap| *gap >= interval));
    }

    #[test]
    fn test_default_interval() {
        assert_eq!(Scheduler::default().interval(), Duration::from_millis(5000));
    }
}
