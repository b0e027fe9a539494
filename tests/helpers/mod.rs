/// Test doubles for the monitor's collaborators: CAN controller, serial link,
/// digital pins, timer, and system control.
///
/// Every double is a cheap handle over shared state, so a test can keep a
/// clone to script inputs and inspect outputs while the monitor owns another.
use can_monitor::{
    config::MonitorConfig,
    error::SerialError,
    infra::queue::{FrameConsumer, MonitorQueue},
    protocol::{
        monitor::monitor_loop::Monitor,
        transport::{
            can_frame::CanFrame,
            can_id::CanId,
            traits::{
                monitor_timer::MonitorTimer, serial_port::SerialPort,
                system_control::SystemControl,
            },
        },
    },
};
use can_monitor::core::QUEUE_CAPACITY;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embedded_can::ErrorKind;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::time::{sleep, Duration};

//==================================================================================CAN
#[derive(Default)]
#[allow(dead_code)]
pub struct ControllerState {
    /// Hardware receive FIFO; `Err` entries are reported as bus errors.
    pub rx_fifo: VecDeque<Result<CanFrame, ErrorKind>>,
    /// Frames accepted for transmission, oldest first.
    pub transmitted: Vec<CanFrame>,
    /// Number of `WouldBlock` answers before the next transmit succeeds.
    pub tx_busy: usize,
    /// Error returned by the next transmit attempt.
    pub tx_error: Option<ErrorKind>,
}

#[derive(Clone, Default)]
#[allow(dead_code)]
/// In-memory CAN controller implementing `embedded_can::nb::Can`.
pub struct MockController {
    pub state: Arc<Mutex<ControllerState>>,
}

#[allow(dead_code)]
impl MockController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `frame` appear in the receive FIFO.
    pub fn deliver(&self, frame: CanFrame) {
        self.state.lock().unwrap().rx_fifo.push_back(Ok(frame));
    }

    pub fn deliver_error(&self, kind: ErrorKind) {
        self.state.lock().unwrap().rx_fifo.push_back(Err(kind));
    }

    pub fn pending_rx(&self) -> usize {
        self.state.lock().unwrap().rx_fifo.len()
    }

    pub fn transmitted(&self) -> Vec<CanFrame> {
        self.state.lock().unwrap().transmitted.clone()
    }
}

impl embedded_can::nb::Can for MockController {
    type Frame = CanFrame;
    type Error = ErrorKind;

    fn transmit(&mut self, frame: &CanFrame) -> nb::Result<Option<CanFrame>, ErrorKind> {
        let mut state = self.state.lock().unwrap();
        if let Some(kind) = state.tx_error.take() {
            return Err(nb::Error::Other(kind));
        }
        if state.tx_busy > 0 {
            state.tx_busy -= 1;
            return Err(nb::Error::WouldBlock);
        }
        state.transmitted.push(*frame);
        Ok(None)
    }

    fn receive(&mut self) -> nb::Result<CanFrame, ErrorKind> {
        match self.state.lock().unwrap().rx_fifo.pop_front() {
            Some(Ok(frame)) => Ok(frame),
            Some(Err(kind)) => Err(nb::Error::Other(kind)),
            None => Err(nb::Error::WouldBlock),
        }
    }
}

//==================================================================================SERIAL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Transport failure injected into [`MockSerial`].
pub struct LinkDown;

#[derive(Default)]
#[allow(dead_code)]
pub struct SerialState {
    /// Bytes typed by the operator, not yet read.
    pub input: VecDeque<u8>,
    /// Everything the monitor wrote.
    pub output: Vec<u8>,
    /// Report a byte as available but let the read time out.
    pub stall_next_read: bool,
    pub fail_writes: bool,
}

#[derive(Clone, Default)]
#[allow(dead_code)]
pub struct MockSerial {
    pub state: Arc<Mutex<SerialState>>,
}

#[allow(dead_code)]
impl MockSerial {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn type_text(&self, text: &str) {
        self.state.lock().unwrap().input.extend(text.bytes());
    }

    pub fn stall_next_read(&self) {
        self.state.lock().unwrap().stall_next_read = true;
    }

    pub fn fail_writes(&self) {
        self.state.lock().unwrap().fail_writes = true;
    }

    /// Drain and return what the monitor printed so far.
    pub fn take_output(&self) -> String {
        let bytes = std::mem::take(&mut self.state.lock().unwrap().output);
        String::from_utf8(bytes).unwrap()
    }
}

impl SerialPort for MockSerial {
    type Error = LinkDown;

    fn byte_available(&mut self) -> bool {
        let state = self.state.lock().unwrap();
        state.stall_next_read || !state.input.is_empty()
    }

    fn read_byte(&mut self, _timeout: embassy_time::Duration) -> Result<u8, SerialError<LinkDown>> {
        let mut state = self.state.lock().unwrap();
        if state.stall_next_read {
            state.stall_next_read = false;
            return Err(SerialError::Timeout);
        }
        state.input.pop_front().ok_or(SerialError::Timeout)
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), LinkDown> {
        let mut state = self.state.lock().unwrap();
        if state.fail_writes {
            return Err(LinkDown);
        }
        state.output.extend_from_slice(bytes);
        Ok(())
    }
}

//==================================================================================GPIO
#[derive(Default)]
#[allow(dead_code)]
pub struct PinState {
    pub high: bool,
    pub toggles: u32,
    pub fail: bool,
}

#[derive(Clone, Default)]
#[allow(dead_code)]
/// Digital pin usable as the trigger input or the status output.
pub struct MockPin {
    pub state: Arc<Mutex<PinState>>,
}

#[allow(dead_code)]
impl MockPin {
    /// A pin resting high: a released active-low trigger, or an LED that is on.
    pub fn high() -> Self {
        let pin = Self::default();
        pin.state.lock().unwrap().high = true;
        pin
    }

    pub fn set_level(&self, high: bool) {
        self.state.lock().unwrap().high = high;
    }

    pub fn toggles(&self) -> u32 {
        self.state.lock().unwrap().toggles
    }

    pub fn break_pin(&self) {
        self.state.lock().unwrap().fail = true;
    }

    fn read(&self) -> Result<bool, embedded_hal::digital::ErrorKind> {
        let state = self.state.lock().unwrap();
        if state.fail {
            return Err(embedded_hal::digital::ErrorKind::Other);
        }
        Ok(state.high)
    }

    fn write(&self, high: bool) -> Result<(), embedded_hal::digital::ErrorKind> {
        let mut state = self.state.lock().unwrap();
        if state.fail {
            return Err(embedded_hal::digital::ErrorKind::Other);
        }
        if state.high != high {
            state.toggles += 1;
        }
        state.high = high;
        Ok(())
    }
}

impl embedded_hal::digital::ErrorType for MockPin {
    type Error = embedded_hal::digital::ErrorKind;
}

impl embedded_hal::digital::InputPin for MockPin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        self.read()
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.read().map(|high| !high)
    }
}

impl embedded_hal::digital::OutputPin for MockPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.write(false)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.write(true)
    }
}

impl embedded_hal::digital::StatefulOutputPin for MockPin {
    fn is_set_high(&mut self) -> Result<bool, Self::Error> {
        self.read()
    }

    fn is_set_low(&mut self) -> Result<bool, Self::Error> {
        self.read().map(|high| !high)
    }
}

//==================================================================================TIMER / SYSTEM
#[allow(dead_code)]
/// Timer based on `tokio::time::sleep` to drive delays in tests.
pub struct MockTimer;

impl MonitorTimer for MockTimer {
    async fn delay_ms(&mut self, millis: u32) {
        sleep(Duration::from_millis(millis as u64)).await;
    }
}

#[derive(Default)]
#[allow(dead_code)]
/// System control that records the interrupt mask and panics instead of
/// halting or resetting.
pub struct MockSystem {
    pub interrupts_disabled: bool,
}

impl SystemControl for MockSystem {
    fn disable_interrupts(&mut self) {
        self.interrupts_disabled = true;
    }

    fn halt(&mut self) -> ! {
        panic!("system halted");
    }

    fn reset(&mut self) -> ! {
        panic!("system reset");
    }
}

//==================================================================================FIXTURE
#[allow(dead_code)]
pub type TestMonitor<'q> = Monitor<
    'q,
    CriticalSectionRawMutex,
    QUEUE_CAPACITY,
    MockController,
    MockSerial,
    MockPin,
    MockPin,
>;

#[allow(dead_code)]
/// Handles kept by the test while the monitor owns the peripherals.
pub struct Bench {
    pub controller: MockController,
    pub serial: MockSerial,
    pub trigger: MockPin,
    pub led: MockPin,
}

#[allow(dead_code)]
/// Build a monitor over `consumer` with a released active-low trigger.
pub fn monitor_bench<'q>(
    consumer: FrameConsumer<'q, CriticalSectionRawMutex, QUEUE_CAPACITY>,
    config: MonitorConfig,
) -> (TestMonitor<'q>, Bench) {
    let bench = Bench {
        controller: MockController::new(),
        serial: MockSerial::new(),
        trigger: MockPin::high(),
        led: MockPin::default(),
    };
    let monitor = Monitor::new(
        consumer,
        bench.controller.clone(),
        bench.serial.clone(),
        bench.trigger.clone(),
        bench.led.clone(),
        config,
    );
    (monitor, bench)
}

#[allow(dead_code)]
pub fn new_queue() -> MonitorQueue {
    MonitorQueue::new()
}

#[allow(dead_code)]
/// Data frame on a standard identifier.
pub fn std_frame(id: u16, payload: &[u8]) -> CanFrame {
    CanFrame::with_data(CanId::standard(id).unwrap(), payload).unwrap()
}
