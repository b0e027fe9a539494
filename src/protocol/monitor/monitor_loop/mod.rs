//! The cooperative main loop.
//!
//! Each [`Monitor::poll`] does at most one unit of work per source: one queued
//! frame printed, one serial byte consumed, one trigger sample. Hardware
//! failures come back as [`MonitorError`] and are meant for
//! [`Monitor::fail`]; nothing is retried.
use embassy_sync::blocking_mutex::raw::RawMutex;
use embedded_can::Error as _;
use embedded_hal::digital::{Error as _, InputPin, StatefulOutputPin};

use crate::config::MonitorConfig;
use crate::core::{BANNER, COMMAND_LINE_CAPACITY, HELP_TEXT, UNKNOWN_COMMAND_SUFFIX};
use crate::error::MonitorError;
use crate::infra::fault::fatal_error;
use crate::infra::queue::FrameConsumer;
use crate::infra::render::render_frame;
use crate::protocol::monitor::command_line::{classify, Command, CommandLine, LineEvent};
use crate::protocol::monitor::trigger::{TriggerDebouncer, TriggerEvent, TriggerState};
use crate::protocol::transport::can_frame::CanFrame;
use crate::protocol::transport::traits::{
    can_bus::CanTransmitter, monitor_timer::MonitorTimer, serial_port::SerialPort,
    system_control::SystemControl,
};

/// Running counters of the monitor.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MonitorStats {
    /// Frames printed on the serial link.
    pub frames_rendered: u32,
    /// Test frames handed to the CAN controller (command or trigger).
    pub test_frames_sent: u32,
    /// Complete non-empty lines received.
    pub commands: u32,
    pub unknown_commands: u32,
    /// Frames the receive interrupt could not queue.
    pub frames_dropped: u32,
}

/// What one [`Monitor::poll`] did.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PollReport {
    pub frame_rendered: bool,
    pub byte_received: bool,
    pub command_dispatched: bool,
    pub trigger_fired: bool,
}

impl PollReport {
    /// `true` when the iteration found nothing to do.
    pub fn is_idle(&self) -> bool {
        !(self.frame_rendered || self.byte_received || self.trigger_fired)
    }
}

/// Main-loop state and the peripherals it owns.
pub struct Monitor<'q, M, const N: usize, Tx, S, P, L>
where
    M: RawMutex,
    Tx: CanTransmitter,
    S: SerialPort,
    P: InputPin,
    L: StatefulOutputPin,
{
    /// Consumer end of the frame queue filled by the receive interrupt.
    queue: FrameConsumer<'q, M, N>,
    /// CAN controller, transmit side.
    can_tx: Tx,
    /// Serial link for output and commands.
    serial: S,
    /// Manual trigger input.
    trigger: P,
    /// Status indicator, toggled on each trigger press.
    status: L,
    config: MonitorConfig,
    command_line: CommandLine<COMMAND_LINE_CAPACITY>,
    debouncer: TriggerDebouncer,
    stats: MonitorStats,
}

impl<'q, M, const N: usize, Tx, S, P, L> Monitor<'q, M, N, Tx, S, P, L>
where
    M: RawMutex,
    Tx: CanTransmitter,
    S: SerialPort,
    P: InputPin,
    L: StatefulOutputPin,
{
    pub fn new(
        queue: FrameConsumer<'q, M, N>,
        can_tx: Tx,
        serial: S,
        trigger: P,
        status: L,
        config: MonitorConfig,
    ) -> Self {
        Self {
            queue,
            can_tx,
            serial,
            trigger,
            status,
            command_line: CommandLine::new(config.line_terminator),
            debouncer: TriggerDebouncer::new(config.release_settle_polls),
            config,
            stats: MonitorStats::default(),
        }
    }

    /// Print the startup banner.
    pub fn start(&mut self) -> Result<(), MonitorError<S::Error>> {
        #[cfg(feature = "defmt")]
        defmt::info!("CAN monitor started");
        self.write(BANNER.as_bytes())
    }

    /// Run one iteration of the loop.
    pub fn poll(&mut self) -> Result<PollReport, MonitorError<S::Error>> {
        if let Some(kind) = self.queue.take_fault() {
            return Err(MonitorError::CanReceive(kind));
        }

        let mut report = PollReport::default();

        if let Some(frame) = self.queue.try_dequeue() {
            self.print_frame(&frame)?;
            report.frame_rendered = true;
        }

        if self.serial.byte_available() {
            let byte = self
                .serial
                .read_byte(self.config.serial_read_timeout)
                .map_err(MonitorError::SerialRead)?;
            report.byte_received = true;
            report.command_dispatched = self.handle_byte(byte)?;
        }

        if self.sample_trigger()? == TriggerEvent::Fired {
            #[cfg(feature = "defmt")]
            defmt::debug!("trigger pressed");
            self.status
                .toggle()
                .map_err(|err| MonitorError::Gpio(err.kind()))?;
            self.transmit_test_frame()?;
            report.trigger_fired = true;
        }

        Ok(report)
    }

    /// Poll forever, pausing `poll_interval_ms` whenever an iteration was idle.
    ///
    /// Only returns on a fatal error.
    pub async fn run<T: MonitorTimer>(&mut self, timer: &mut T) -> MonitorError<S::Error> {
        loop {
            match self.poll() {
                Ok(report) if report.is_idle() => {
                    timer.delay_ms(self.config.poll_interval_ms).await;
                }
                Ok(_) => {}
                Err(err) => return err,
            }
        }
    }

    /// Hand `error` to the fatal-error handler through this monitor's serial link.
    pub fn fail<C: SystemControl>(&mut self, system: &mut C, error: &MonitorError<S::Error>) -> ! {
        fatal_error(&mut self.serial, system, self.config.fault_policy, error)
    }

    fn write(&mut self, bytes: &[u8]) -> Result<(), MonitorError<S::Error>> {
        self.serial.write_bytes(bytes).map_err(MonitorError::SerialWrite)
    }

    fn print_frame(&mut self, frame: &CanFrame) -> Result<(), MonitorError<S::Error>> {
        let line =
            render_frame(frame, self.config.remote_style).map_err(|_| MonitorError::RenderOverflow)?;
        self.write(line.as_bytes())?;
        self.stats.frames_rendered = self.stats.frames_rendered.wrapping_add(1);
        Ok(())
    }

    /// Echo `byte` and feed it to the command line. Returns `true` when a line
    /// was completed and dispatched.
    fn handle_byte(&mut self, byte: u8) -> Result<bool, MonitorError<S::Error>> {
        self.write(&[byte])?;
        match self.command_line.push(byte) {
            LineEvent::Complete(line) => {
                self.write(b"\n")?;
                self.dispatch(&line)?;
                Ok(true)
            }
            LineEvent::Pending | LineEvent::Dropped => Ok(false),
        }
    }

    fn dispatch(&mut self, line: &[u8]) -> Result<(), MonitorError<S::Error>> {
        let command = classify(line, self.config.command_case);
        if command != Command::NoOp {
            self.stats.commands = self.stats.commands.wrapping_add(1);
        }
        match command {
            Command::NoOp => Ok(()),
            Command::TransmitTest => self.transmit_test_frame(),
            Command::PerformanceId => {
                let reply = self.config.performance_id;
                self.write(reply.as_bytes())?;
                self.write(b"\r\n")
            }
            Command::Help => self.write(HELP_TEXT.as_bytes()),
            Command::Unknown(text) => {
                #[cfg(feature = "defmt")]
                defmt::debug!("unknown command: {=[u8]:a}", text);
                self.stats.unknown_commands = self.stats.unknown_commands.wrapping_add(1);
                self.write(text)?;
                self.write(UNKNOWN_COMMAND_SUFFIX.as_bytes())
            }
        }
    }

    fn sample_trigger(&mut self) -> Result<TriggerEvent, MonitorError<S::Error>> {
        let level = if self.config.trigger_active_low {
            self.trigger.is_low()
        } else {
            self.trigger.is_high()
        };
        let asserted = level.map_err(|err| MonitorError::Gpio(err.kind()))?;
        Ok(self.debouncer.update(asserted))
    }

    /// Send the configured test frame, waiting for a free mailbox.
    pub fn transmit_test_frame(&mut self) -> Result<(), MonitorError<S::Error>> {
        let frame: Tx::Frame = self
            .config
            .test_frame
            .to_frame()
            .ok_or(MonitorError::TestFrameRejected)?;
        nb::block!(self.can_tx.transmit(&frame))
            .map_err(|err| MonitorError::CanTransmit(err.kind()))?;
        self.stats.test_frames_sent = self.stats.test_frames_sent.wrapping_add(1);
        Ok(())
    }

    pub fn stats(&self) -> MonitorStats {
        MonitorStats {
            frames_dropped: self.queue.dropped(),
            ..self.stats
        }
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Bytes of the command currently being typed.
    pub fn pending_command(&self) -> &[u8] {
        self.command_line.pending()
    }

    pub fn trigger_state(&self) -> TriggerState {
        self.debouncer.state()
    }

    /// Frames waiting to be printed.
    pub fn backlog(&self) -> usize {
        self.queue.len()
    }

    pub fn serial(&self) -> &S {
        &self.serial
    }

    pub fn serial_mut(&mut self) -> &mut S {
        &mut self.serial
    }

    /// Tear the monitor down and return its peripherals.
    pub fn release(self) -> (Tx, S, P, L) {
        (self.can_tx, self.serial, self.trigger, self.status)
    }
}
