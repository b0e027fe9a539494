//! Asynchronous timer abstraction pacing the monitor loop when it runs
//! under an executor.
use futures_util::Future;

/// Timer trait abstraction.
pub trait MonitorTimer {
    /// Asynchronously wait for `millis` milliseconds.
    fn delay_ms<'a>(&'a mut self, millis: u32) -> impl Future<Output = ()> + 'a;
}

/// [`MonitorTimer`] backed by the `embassy-time` driver of the target.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmbassyTimer;

impl MonitorTimer for EmbassyTimer {
    async fn delay_ms(&mut self, millis: u32) {
        embassy_time::Timer::after_millis(millis as u64).await;
    }
}
