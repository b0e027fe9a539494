//! The async driver: `Monitor::run` keeps polling until a fatal error.
mod helpers {
    include!("helpers/mod.rs");
}

use can_monitor::{
    config::{MonitorConfig, DEFAULT_TEST_FRAME},
    error::{MonitorError, SerialError},
    protocol::transport::traits::monitor_timer::MonitorTimer,
};
use helpers::{monitor_bench, new_queue, MockTimer};
use tokio::time::{timeout, Duration};

#[tokio::test]
/// Work queued before the failure is completed, then the error is returned.
async fn test_run_until_fatal_error() {
    let queue = new_queue();
    let (producer, consumer) = queue.split();
    let (mut monitor, bench) = monitor_bench(consumer, MonitorConfig::default());

    assert!(producer.enqueue(DEFAULT_TEST_FRAME));
    bench.serial.type_text("tx\r");

    let serial = bench.serial.clone();
    let mut timer = MockTimer;
    let run = async {
        // Idle polls sleep; the stall is armed once everything above was handled.
        let mut stall_timer = MockTimer;
        let arm = async {
            loop {
                stall_timer.delay_ms(2).await;
                if serial.state.lock().unwrap().input.is_empty() {
                    serial.stall_next_read();
                    break;
                }
            }
        };
        let (err, ()) = tokio::join!(monitor.run(&mut timer), arm);
        err
    };

    let err = timeout(Duration::from_secs(5), run)
        .await
        .expect("monitor loop did not stop");
    assert!(matches!(err, MonitorError::SerialRead(SerialError::Timeout)));
    assert_eq!(
        bench.serial.take_output(),
        "std[ 03 03 ]: de ad be ef\r\ntx\r\n"
    );
    assert_eq!(bench.controller.transmitted(), vec![DEFAULT_TEST_FRAME]);
}

#[tokio::test]
/// An idle monitor sleeps between polls instead of returning.
async fn test_idle_run_keeps_going() {
    let queue = new_queue();
    let (_, consumer) = queue.split();
    let config = MonitorConfig::new().with_poll_interval_ms(1);
    let (mut monitor, _bench) = monitor_bench(consumer, config);
    let mut timer = MockTimer;

    let outcome = timeout(Duration::from_millis(50), monitor.run(&mut timer)).await;
    assert!(outcome.is_err(), "run returned early: {:?}", outcome);
}
