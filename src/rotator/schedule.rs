//! Timer-driven rotation.
//!
//! The first cycle runs as soon as the task starts. After that one cycle runs
//! per interval, measured from the start, until the handle is stopped or
//! dropped, the cycle limit is reached, or the surface fails.

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, error, info};

use super::{DisplaySurface, MessageRotator};
use crate::error::{Result, RotatorError};

/// Time between two cycles on the landing page
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(3000);

/// Timing of a rotation run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schedule {
    pub interval: Duration,
    /// Pause between fade-out and the text swap. Zero keeps the flip instant.
    pub fade: Duration,
    /// Stop after this many cycles (runs forever when `None`)
    pub max_cycles: Option<u64>,
}

impl Default for Schedule {
    fn default() -> Self {
        Self {
            interval: DEFAULT_INTERVAL,
            fade: Duration::ZERO,
            max_cycles: None,
        }
    }
}

/// Summary of a finished rotation run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotationReport {
    pub cycles: u64,
    /// Index the next cycle would have shown
    pub index: usize,
}

/// Handle to a running rotation. Dropping it stops the rotation.
pub struct RotationHandle {
    stop_tx: watch::Sender<bool>,
    task: JoinHandle<Result<RotationReport>>,
}

impl RotationHandle {
    /// Ask the rotation to end. A cycle in progress is finished first.
    pub fn stop(&self) {
        let _ = self.stop_tx.send(true);
    }

    /// Wait for the rotation to end on its own.
    ///
    /// Must not be called again once it has returned.
    pub async fn join(&mut self) -> Result<RotationReport> {
        match (&mut self.task).await {
            Ok(result) => result,
            Err(e) => Err(RotatorError::TaskFailed(e.to_string())),
        }
    }

    /// Stop the rotation and wait for it
    pub async fn shutdown(mut self) -> Result<RotationReport> {
        self.stop();
        self.join().await
    }
}

impl<S: DisplaySurface + 'static> MessageRotator<S> {
    /// Spawn the rotation on the tokio runtime.
    ///
    /// Consumes the rotator, so a rotator can only ever be started once.
    /// Two rotators sharing one surface will each drive it on their own timer.
    pub fn start(self, schedule: Schedule) -> RotationHandle {
        let (stop_tx, stop_rx) = watch::channel(false);
        let task = tokio::spawn(self.run(schedule, stop_rx));
        RotationHandle { stop_tx, task }
    }

    async fn run(
        mut self,
        schedule: Schedule,
        mut stop_rx: watch::Receiver<bool>,
    ) -> Result<RotationReport> {
        info!(
            "Rotating {} messages every {:?}",
            self.messages.len(),
            schedule.interval
        );

        let mut ticker = time::interval_at(Instant::now() + schedule.interval, schedule.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut cycles: u64 = 0;
        if schedule.max_cycles == Some(0) {
            debug!("Cycle limit is zero, nothing to rotate");
            return Ok(RotationReport {
                cycles,
                index: self.current_index,
            });
        }

        loop {
            if let Err(e) = self.cycle(schedule.fade).await {
                error!("Rotation stopped after {} cycles: {}", cycles, e);
                return Err(e);
            }
            cycles += 1;

            if schedule.max_cycles.is_some_and(|max| cycles >= max) {
                debug!("Reached cycle limit of {}", cycles);
                break;
            }

            tokio::select! {
                _ = ticker.tick() => {}
                // Fires on stop() and when the handle is dropped
                _ = stop_rx.changed() => {
                    debug!("Rotation stop requested");
                    break;
                }
            }
        }

        info!("Rotation finished after {} cycles", cycles);
        Ok(RotationReport {
            cycles,
            index: self.current_index,
        })
    }

    async fn cycle(&mut self, fade: Duration) -> Result<()> {
        self.fade_out().await?;

        // Post-render step: give the host a turn to paint the faded-out state
        // before the swap. Without a fade this is a yield, not a delay.
        if fade.is_zero() {
            tokio::task::yield_now().await;
        } else {
            time::sleep(fade).await;
        }

        self.apply_next().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rotator::testing::{RecordingSurface, SurfaceOp};
    use crate::rotator::{MessageList, Opacity};

    fn start_default(schedule: Schedule) -> (RotationHandle, RecordingSurface) {
        let surface = RecordingSurface::new();
        let rotator = MessageRotator::new(MessageList::default(), surface.clone());
        (rotator.start(schedule), surface)
    }

    #[test]
    fn test_default_schedule() {
        let schedule = Schedule::default();
        assert_eq!(schedule.interval, Duration::from_millis(3000));
        assert_eq!(schedule.fade, Duration::ZERO);
        assert_eq!(schedule.max_cycles, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_cycle_runs_immediately() {
        let (handle, surface) = start_default(Schedule::default());

        time::sleep(Duration::from_millis(1)).await;
        assert_eq!(surface.texts(), vec!["Discover your dream job"]);

        handle.shutdown().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_cycles_follow_interval() {
        let (handle, surface) = start_default(Schedule::default());

        time::sleep(Duration::from_millis(2999)).await;
        assert_eq!(surface.texts().len(), 1);

        time::sleep(Duration::from_millis(2)).await;
        assert_eq!(surface.texts().len(), 2);

        time::sleep(Duration::from_millis(6000)).await;
        assert_eq!(
            surface.texts(),
            vec![
                "Discover your dream job",
                "Find the perfect match for your skills",
                "Unlock new career opportunities",
                "Discover your dream job",
            ]
        );

        let report = handle.shutdown().await.unwrap();
        assert_eq!(report.cycles, 4);
        assert_eq!(report.index, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_ends_rotation() {
        let (handle, surface) = start_default(Schedule::default());
        time::sleep(Duration::from_millis(1)).await;

        let report = handle.shutdown().await.unwrap();
        assert_eq!(report.cycles, 1);

        time::sleep(Duration::from_millis(10_000)).await;
        assert_eq!(surface.texts().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_max_cycles_finishes_on_its_own() {
        let schedule = Schedule {
            max_cycles: Some(2),
            ..Schedule::default()
        };
        let (mut handle, surface) = start_default(schedule);
        let started = Instant::now();

        let report = handle.join().await.unwrap();

        assert_eq!(report, RotationReport { cycles: 2, index: 2 });
        assert_eq!(surface.texts().len(), 2);
        assert!(started.elapsed() >= Duration::from_millis(3000));
        assert!(started.elapsed() < Duration::from_millis(3100));
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_cycle_limit_touches_nothing() {
        let schedule = Schedule {
            max_cycles: Some(0),
            ..Schedule::default()
        };
        let (mut handle, surface) = start_default(schedule);

        let report = handle.join().await.unwrap();

        assert_eq!(report, RotationReport { cycles: 0, index: 0 });
        assert!(surface.ops().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_fade_holds_surface_transparent() {
        let schedule = Schedule {
            fade: Duration::from_millis(500),
            ..Schedule::default()
        };
        let (handle, surface) = start_default(schedule);

        time::sleep(Duration::from_millis(100)).await;
        assert_eq!(surface.ops(), vec![SurfaceOp::Opacity(Opacity::Transparent)]);

        time::sleep(Duration::from_millis(500)).await;
        assert_eq!(surface.ops().len(), 3);
        assert_eq!(surface.ops()[2], SurfaceOp::Opacity(Opacity::Opaque));

        handle.shutdown().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_surface_error_ends_rotation() {
        // First cycle plus the second fade-out succeed, the second swap fails
        let surface = RecordingSurface::failing_after(4);
        let rotator = MessageRotator::new(MessageList::default(), surface.clone());
        let mut handle = rotator.start(Schedule::default());

        let result = handle.join().await;

        assert!(matches!(result, Err(RotatorError::Io(_))));
        assert_eq!(surface.texts(), vec!["Discover your dream job"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_two_rotators_on_one_surface_both_schedule() {
        let surface = RecordingSurface::new();
        let first = MessageRotator::new(MessageList::default(), surface.clone());
        let second = MessageRotator::new(MessageList::default(), surface.clone());

        let first = first.start(Schedule::default());
        let second = second.start(Schedule::default());

        time::sleep(Duration::from_millis(3001)).await;
        // Each rotator keeps its own index, so every message appears twice
        assert_eq!(surface.texts().len(), 4);
        assert_eq!(
            surface
                .texts()
                .iter()
                .filter(|t| *t == "Discover your dream job")
                .count(),
            2
        );

        first.shutdown().await.unwrap();
        second.shutdown().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_handle_stops_rotation() {
        let (handle, surface) = start_default(Schedule::default());
        time::sleep(Duration::from_millis(1)).await;

        drop(handle);
        time::sleep(Duration::from_millis(10_000)).await;

        assert_eq!(surface.texts().len(), 1);
    }
}
