//! Sequencing and delivery of ping events
//!
//! The dispatcher runs on the monitor's draining thread. Every delivery goes
//! through a [`StopGate`] so that once a handle's `stop()` has returned, no new
//! observer call can begin, even for output that was already buffered.

use crate::event::{Outcome, PingEvent, SequenceNumber};
use crate::monitor::lines::LineBuffer;
use crate::monitor::parser::{parse_line, ParsedLine};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};
use std::thread::{self, ThreadId};
use tracing::{debug, warn};

/// Receiver of classified ping events.
///
/// Called from the monitor's background thread, strictly in delivery order and
/// never concurrently with itself. Implementations must return quickly.
pub trait EventObserver: Send {
    fn on_event(&mut self, event: PingEvent);
}

/// Adapts a closure into an [`EventObserver`]
pub struct CallbackObserver<F> {
    callback: F,
}

impl<F> CallbackObserver<F>
where
    F: FnMut(PingEvent) + Send,
{
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> EventObserver for CallbackObserver<F>
where
    F: FnMut(PingEvent) + Send,
{
    fn on_event(&mut self, event: PingEvent) {
        (self.callback)(event)
    }
}

/// Which pipe of the ping process a chunk came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Stdout,
    Stderr,
}

/// Stop flag shared between a monitor handle and its draining thread.
#[derive(Debug, Default)]
pub struct StopGate {
    stopped: AtomicBool,
    delivery: Mutex<()>,
    drain_thread: OnceLock<ThreadId>,
}

impl StopGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the calling thread as the one that performs deliveries
    pub fn enter_drain_thread(&self) {
        let _ = self.drain_thread.set(thread::current().id());
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }

    /// Run `deliver` unless the gate is closed.
    ///
    /// The flag is checked under the delivery lock, so a concurrent `close`
    /// either sees this delivery finish or this delivery sees the flag.
    pub fn deliver<R>(&self, deliver: impl FnOnce() -> R) -> Option<R> {
        let _guard = self.delivery.lock().unwrap_or_else(PoisonError::into_inner);
        if self.is_stopped() {
            return None;
        }
        Some(deliver())
    }

    /// Close the gate. Returns true only for the first call.
    ///
    /// Blocks until an in-flight delivery has finished, except when called from
    /// the draining thread itself (an observer stopping its own monitor).
    pub fn close(&self) -> bool {
        let first = !self.stopped.swap(true, Ordering::AcqRel);
        if self.drain_thread.get() != Some(&thread::current().id()) {
            drop(self.delivery.lock().unwrap_or_else(PoisonError::into_inner));
        }
        first
    }
}

/// Turns raw pipe output into sequenced events for one monitor
pub struct Dispatcher<O> {
    gate: Arc<StopGate>,
    observer: O,
    sequence: SequenceNumber,
    stdout: LineBuffer,
    stderr: LineBuffer,
}

impl<O: EventObserver> Dispatcher<O> {
    pub fn new(gate: Arc<StopGate>, observer: O) -> Self {
        Self {
            gate,
            observer,
            sequence: SequenceNumber::default(),
            stdout: LineBuffer::new(),
            stderr: LineBuffer::new(),
        }
    }

    /// Sequence number of the last delivered event (0 before the first)
    pub fn sequence(&self) -> SequenceNumber {
        self.sequence
    }

    /// Feed a chunk read from one of the pipes
    pub fn handle_chunk(&mut self, stream: Stream, chunk: &[u8]) {
        let lines = match stream {
            Stream::Stdout => self.stdout.push(chunk),
            Stream::Stderr => self.stderr.push(chunk),
        };
        for line in lines {
            self.handle_line(stream, &line);
        }
    }

    /// Flush an unterminated last line once its pipe has closed
    pub fn finish_stream(&mut self, stream: Stream) {
        let remainder = match stream {
            Stream::Stdout => self.stdout.finish(),
            Stream::Stderr => self.stderr.finish(),
        };
        if let Some(line) = remainder {
            self.handle_line(stream, &line);
        }
    }

    fn handle_line(&mut self, stream: Stream, line: &str) {
        match stream {
            Stream::Stdout => match parse_line(line) {
                Some(ParsedLine::Reply(latency_ms)) => {
                    self.emit_next(Outcome::Reply { latency_ms });
                }
                Some(ParsedLine::Timeout) => self.emit_next(Outcome::Timeout),
                None => debug!(line = line, "Ignoring ping output line"),
            },
            Stream::Stderr => {
                let message = line.trim();
                if message.is_empty() {
                    return;
                }
                warn!(message = message, "Ping wrote to stderr");
                self.emit_next(Outcome::Error {
                    message: message.to_string(),
                });
            }
        }
    }

    /// Report how the ping process ended.
    ///
    /// Only a non-zero exit code is reported, reusing the current sequence
    /// number. Exit code 0 and signal termination are silent.
    pub fn report_exit(&mut self, code: Option<i32>) {
        match code {
            Some(0) => debug!("Ping process exited cleanly"),
            Some(code) => {
                warn!(code = code, "Ping process exited unexpectedly");
                self.report_failure(format!("Ping exited with code {}", code));
            }
            None => debug!("Ping process terminated by signal"),
        }
    }

    /// Deliver a terminal error at the current sequence number
    pub fn report_failure(&mut self, message: String) {
        let event = PingEvent::new(self.sequence, Outcome::Error { message });
        self.deliver(event);
    }

    /// Deliver the single sequence-0 event for a process that never started
    pub fn report_launch_failure(&mut self, message: String) {
        self.deliver(PingEvent::launch_failure(message));
    }

    fn emit_next(&mut self, outcome: Outcome) {
        let delivered = self.gate.deliver(|| {
            self.sequence = self.sequence.next();
            let event = PingEvent::new(self.sequence, outcome);
            debug!(sequence = event.sequence.0, outcome = ?event.outcome, "Delivering ping event");
            self.observer.on_event(event);
        });
        if delivered.is_none() {
            debug!("Monitor stopped, dropping ping event");
        }
    }

    fn deliver(&mut self, event: PingEvent) {
        let observer = &mut self.observer;
        if self.gate.deliver(|| observer.on_event(event)).is_none() {
            debug!("Monitor stopped, dropping ping event");
        }
    }
}
