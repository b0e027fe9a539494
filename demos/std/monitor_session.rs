//! # Host monitor session
//!
//! Runs the monitor on the desktop against a simulated CAN controller. A
//! background thread plays the receive interrupt and a scripted operator
//! types commands; everything the monitor prints goes to stdout.
//!
//! ```bash
//! cargo run --example monitor_session
//! ```

use std::collections::VecDeque;
use std::io::Write;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration as StdDuration;

use can_monitor::{
    config::MonitorConfig,
    error::SerialError,
    infra::queue::MonitorQueue,
    protocol::{
        monitor::monitor_loop::Monitor,
        transport::{
            can_frame::CanFrame,
            can_id::CanId,
            ingestion::ReceiveIngestion,
            traits::{monitor_timer::EmbassyTimer, serial_port::SerialPort},
        },
    },
};
use embedded_can::ErrorKind;

static QUEUE: MonitorQueue = MonitorQueue::new();

// ============================================================================
// Simulated peripherals
// ============================================================================

/// Controller whose receive FIFO is filled by the simulated bus.
#[derive(Clone, Default)]
struct SimController {
    rx_fifo: Arc<Mutex<VecDeque<CanFrame>>>,
}

impl embedded_can::nb::Can for SimController {
    type Frame = CanFrame;
    type Error = ErrorKind;

    fn transmit(&mut self, frame: &CanFrame) -> nb::Result<Option<CanFrame>, ErrorKind> {
        println!("[bus] transmitted id {:#x}", frame.identifier());
        Ok(None)
    }

    fn receive(&mut self) -> nb::Result<CanFrame, ErrorKind> {
        let mut fifo = self.rx_fifo.lock().map_err(|_| nb::Error::Other(ErrorKind::Other))?;
        fifo.pop_front().ok_or(nb::Error::WouldBlock)
    }
}

/// Serial link: scripted keystrokes in, stdout out.
struct ConsoleSerial {
    keystrokes: VecDeque<u8>,
}

impl SerialPort for ConsoleSerial {
    type Error = std::io::Error;

    fn byte_available(&mut self) -> bool {
        !self.keystrokes.is_empty()
    }

    fn read_byte(
        &mut self,
        _timeout: embassy_time::Duration,
    ) -> Result<u8, SerialError<std::io::Error>> {
        self.keystrokes.pop_front().ok_or(SerialError::Timeout)
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), std::io::Error> {
        let mut out = std::io::stdout().lock();
        out.write_all(bytes)?;
        out.flush()
    }
}

/// Pin with a fixed level (trigger never pressed) or a plain LED.
struct SimPin {
    high: bool,
}

impl embedded_hal::digital::ErrorType for SimPin {
    type Error = core::convert::Infallible;
}

impl embedded_hal::digital::InputPin for SimPin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.high)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.high)
    }
}

impl embedded_hal::digital::OutputPin for SimPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.high = false;
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.high = true;
        Ok(())
    }
}

impl embedded_hal::digital::StatefulOutputPin for SimPin {
    fn is_set_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.high)
    }

    fn is_set_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.high)
    }
}

// ============================================================================
// Session
// ============================================================================

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let (producer, consumer) = QUEUE.split();
    let controller = SimController::default();

    // Receive interrupt: a burst of traffic every 100 ms.
    let bus = controller.clone();
    thread::spawn(move || {
        let mut ingestion = ReceiveIngestion::new(bus.clone(), producer);
        for tick in 0u8..5 {
            if let Ok(mut fifo) = bus.rx_fifo.lock() {
                if let Ok(id) = CanId::standard(0x100 + tick as u16) {
                    if let Ok(frame) = CanFrame::with_data(id, &[tick, 0xAA, 0x55]) {
                        fifo.push_back(frame);
                    }
                }
                if let Ok(id) = CanId::extended(0x18FE_F100 | tick as u32) {
                    if let Ok(frame) = CanFrame::remote_request(id, 8) {
                        fifo.push_back(frame);
                    }
                }
            }
            if let Err(err) = ingestion.on_interrupt() {
                eprintln!("receive interrupt failed: {err}");
                return;
            }
            thread::sleep(StdDuration::from_millis(100));
        }
    });

    let serial = ConsoleSerial {
        keystrokes: b"help\rreqPerfId\rtx\rbogus\r".iter().copied().collect(),
    };
    let mut monitor = Monitor::new(
        consumer,
        controller,
        serial,
        SimPin { high: true },
        SimPin { high: false },
        MonitorConfig::default().with_poll_interval_ms(5),
    );

    if let Err(err) = monitor.start() {
        eprintln!("cannot print banner: {err}");
        return;
    }

    let mut timer = EmbassyTimer;
    let outcome = tokio::time::timeout(StdDuration::from_millis(700), monitor.run(&mut timer)).await;
    match outcome {
        Ok(err) => eprintln!("monitor stopped: {err}"),
        Err(_) => println!("\nsession over: {:?}", monitor.stats()),
    }
}
