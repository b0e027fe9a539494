//! Fatal-error path: diagnostic output, interrupt masking, halt or reset.
mod helpers {
    include!("helpers/mod.rs");
}

use std::panic::{catch_unwind, AssertUnwindSafe};

use can_monitor::{
    config::{FaultPolicy, MonitorConfig},
    core::FATAL_BANNER,
    error::{MonitorError, SerialError},
    infra::fault::{fatal_error, fault_detail, DETAIL_CAPACITY},
};
use embedded_can::ErrorKind;
use helpers::{monitor_bench, new_queue, LinkDown, MockSerial, MockSystem};

#[test]
#[should_panic(expected = "system halted")]
fn test_default_policy_halts() {
    let mut serial = MockSerial::new();
    let mut system = MockSystem::default();
    let error: MonitorError<LinkDown> = MonitorError::CanReceive(ErrorKind::Bit);
    fatal_error(&mut serial, &mut system, FaultPolicy::Halt, &error);
}

#[test]
/// The banner and the error description reach the serial link before the halt.
fn test_monitor_fail_prints_diagnostic() {
    let queue = new_queue();
    let (_, consumer) = queue.split();
    let (mut monitor, bench) = monitor_bench(consumer, MonitorConfig::default());
    let mut system = MockSystem::default();

    bench.serial.stall_next_read();
    let error = monitor.poll().unwrap_err();
    assert!(matches!(error, MonitorError::SerialRead(SerialError::Timeout)));

    let outcome = catch_unwind(AssertUnwindSafe(|| monitor.fail(&mut system, &error)));
    assert!(outcome.is_err());
    assert!(system.interrupts_disabled);
    assert_eq!(
        bench.serial.take_output(),
        format!("{FATAL_BANNER}Serial read error: Serial read timed out\r\n")
    );
}

#[test]
fn test_reset_policy() {
    let queue = new_queue();
    let (_, consumer) = queue.split();
    let config = MonitorConfig::new().with_fault_policy(FaultPolicy::Reset);
    let (mut monitor, bench) = monitor_bench(consumer, config);
    let mut system = MockSystem::default();

    let error = MonitorError::TestFrameRejected;
    let outcome = catch_unwind(AssertUnwindSafe(|| monitor.fail(&mut system, &error)));
    let message = outcome.unwrap_err();
    assert_eq!(message.downcast_ref::<&str>(), Some(&"system reset"));
    assert!(bench.serial.take_output().starts_with(FATAL_BANNER));
}

#[test]
/// A dead serial link does not stop the handler from halting.
fn test_write_failure_during_report_ignored() {
    let mut serial = MockSerial::new();
    serial.fail_writes();
    let mut system = MockSystem::default();
    let error: MonitorError<LinkDown> = MonitorError::SerialWrite(LinkDown);

    let outcome = catch_unwind(AssertUnwindSafe(|| {
        fatal_error(&mut serial, &mut system, FaultPolicy::Halt, &error)
    }));
    assert!(outcome.is_err());
    assert!(system.interrupts_disabled);
    assert!(serial.take_output().is_empty());
}

#[test]
fn test_fault_detail_truncates() {
    let long = "e".repeat(200);
    let detail = fault_detail(&long);
    assert_eq!(detail.len(), DETAIL_CAPACITY);
    assert!(detail.ends_with("\r\n"));

    let short = fault_detail(&MonitorError::<LinkDown>::RenderOverflow);
    assert_eq!(short.as_str(), "Render buffer overflow\r\n");
}
