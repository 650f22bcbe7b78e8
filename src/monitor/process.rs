//! Ping process lifecycle
//!
//! A started monitor owns one `ping` child process and three background
//! threads: one reader per pipe, and the draining thread that parses lines and
//! delivers events. The readers only move bytes; ordering, sequencing and the
//! stop gate all live on the draining thread.

use crate::event::PingEvent;
use crate::monitor::command::PingCommand;
use crate::monitor::constants::READ_CHUNK_SIZE;
use crate::monitor::dispatcher::{CallbackObserver, Dispatcher, EventObserver, StopGate, Stream};
use crate::monitor::error::{MonitorError, Result};
use std::io::{ErrorKind, Read};
use std::process::{Child, ExitStatus};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Back-off between exit checks when the pipes closed before the process exited
const REAP_RETRY_INTERVAL: Duration = Duration::from_millis(10);

enum PipeMessage {
    Chunk(Stream, Vec<u8>),
    Closed(Stream),
}

/// State shared between a handle and its background threads
struct Shared {
    gate: Arc<StopGate>,
    child: Mutex<Option<Child>>,
}

impl Shared {
    fn child(&self) -> MutexGuard<'_, Option<Child>> {
        self.child.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Launches continuous pings against one target
#[derive(Debug, Clone)]
pub struct PingMonitor {
    command: PingCommand,
}

impl PingMonitor {
    /// Monitor that runs the platform ping tool in continuous mode
    pub fn new(target: &str) -> Self {
        Self::with_command(PingCommand::continuous(target))
    }

    /// Monitor that runs an explicit command line
    pub fn with_command(command: PingCommand) -> Self {
        Self { command }
    }

    pub fn command(&self) -> &PingCommand {
        &self.command
    }

    /// Start the ping process and push every event into `on_event`
    pub fn start<F>(&self, on_event: F) -> MonitorHandle
    where
        F: FnMut(PingEvent) + Send + 'static,
    {
        self.start_with_observer(CallbackObserver::new(on_event))
    }

    /// Start the ping process and expose events as a channel
    pub fn subscribe(&self) -> (MonitorHandle, Receiver<PingEvent>) {
        let (tx, rx) = mpsc::channel();
        let handle = self.start(move |event| {
            // receiver gone means nobody is listening any more
            let _ = tx.send(event);
        });
        (handle, rx)
    }

    /// Start the ping process with a custom observer.
    ///
    /// Never fails: a process that cannot be launched is reported to the
    /// observer as one error event with sequence 0, and the returned handle is
    /// already stopped.
    pub fn start_with_observer<O>(&self, observer: O) -> MonitorHandle
    where
        O: EventObserver + 'static,
    {
        let shared = Arc::new(Shared {
            gate: Arc::new(StopGate::new()),
            child: Mutex::new(None),
        });

        // Held back until launch succeeds so a failure can still be reported
        let observer = Arc::new(Mutex::new(Some(observer)));
        match self.launch(&shared, Arc::clone(&observer)) {
            Ok(()) => {
                info!(command = %self.command, "Ping monitor started");
            }
            Err(e) => {
                error!(command = %self.command, error = %e, "Ping monitor failed to start");
                kill_child(&shared);
                let observer = observer
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .take();
                if let Some(observer) = observer {
                    let mut dispatcher = Dispatcher::new(Arc::new(StopGate::new()), observer);
                    dispatcher.report_launch_failure(e.to_string());
                }
                shared.gate.close();
            }
        }

        MonitorHandle {
            command: self.command.clone(),
            shared,
        }
    }

    fn launch<O>(&self, shared: &Arc<Shared>, observer: Arc<Mutex<Option<O>>>) -> Result<()>
    where
        O: EventObserver + 'static,
    {
        let mut child = self
            .command
            .to_command()
            .spawn()
            .map_err(|e| MonitorError::Launch(e.to_string()))?;
        debug!(pid = child.id(), command = %self.command, "Ping process spawned");

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        *shared.child() = Some(child);

        let (tx, rx) = mpsc::channel();
        if let Some(stdout) = stdout {
            spawn_reader(Stream::Stdout, stdout, tx.clone())?;
        }
        if let Some(stderr) = stderr {
            spawn_reader(Stream::Stderr, stderr, tx)?;
        }

        let drain_shared = Arc::clone(shared);
        thread::Builder::new()
            .name("ping-drain".into())
            .spawn(move || {
                let observer = observer
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .take();
                if let Some(observer) = observer {
                    drain(drain_shared, rx, observer);
                }
            })?;

        Ok(())
    }
}

/// Run an explicit command line as the ping tool, delivering events to `on_event`
pub fn start_with_command<F>(command: PingCommand, on_event: F) -> MonitorHandle
where
    F: FnMut(PingEvent) + Send + 'static,
{
    PingMonitor::with_command(command).start(on_event)
}

/// Start pinging `target` with the platform tool, delivering events to `on_event`
pub fn start<F>(target: &str, on_event: F) -> MonitorHandle
where
    F: FnMut(PingEvent) + Send + 'static,
{
    PingMonitor::new(target).start(on_event)
}

fn spawn_reader<R>(stream: Stream, mut pipe: R, tx: Sender<PipeMessage>) -> Result<()>
where
    R: Read + Send + 'static,
{
    let name = match stream {
        Stream::Stdout => "ping-stdout",
        Stream::Stderr => "ping-stderr",
    };
    thread::Builder::new()
        .name(name.into())
        .spawn(move || {
            let mut buf = [0u8; READ_CHUNK_SIZE];
            loop {
                match pipe.read(&mut buf) {
                    Ok(0) => break,
                    Ok(len) => {
                        if tx.send(PipeMessage::Chunk(stream, buf[..len].to_vec())).is_err() {
                            return;
                        }
                    }
                    Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                    Err(e) => {
                        debug!(stream = ?stream, error = %e, "Pipe read failed");
                        break;
                    }
                }
            }
            let _ = tx.send(PipeMessage::Closed(stream));
        })?;
    Ok(())
}

/// Draining thread body: deliver events until both pipes close, then reap
fn drain<O: EventObserver>(shared: Arc<Shared>, rx: Receiver<PipeMessage>, observer: O) {
    shared.gate.enter_drain_thread();
    let mut dispatcher = Dispatcher::new(Arc::clone(&shared.gate), observer);

    for message in rx {
        match message {
            PipeMessage::Chunk(stream, bytes) => dispatcher.handle_chunk(stream, &bytes),
            PipeMessage::Closed(stream) => {
                debug!(stream = ?stream, "Ping pipe closed");
                dispatcher.finish_stream(stream);
            }
        }
    }

    match reap(&shared) {
        Ok(Some(status)) => {
            if shared.gate.is_stopped() {
                debug!(status = %status, "Ping process ended after stop");
            } else if status.success() {
                info!("Ping process exited on its own with code 0");
            } else if status.code().is_none() {
                warn!(status = %status, "Ping process killed externally");
            }
            dispatcher.report_exit(status.code());
        }
        Ok(None) => debug!("Ping process already reaped by stop"),
        Err(e) => {
            warn!(error = %e, "Failed to collect ping exit status");
            dispatcher.report_failure(e.to_string());
        }
    }
}

/// Wait for the child to exit without holding the lock across a blocking wait,
/// so a concurrent `stop()` can still kill it.
///
/// Only reached once both pipes have closed. A ping that closes its output
/// keeps being checked every `REAP_RETRY_INTERVAL` until it exits or `stop()`
/// takes the child, which ends the loop on the next check.
fn reap(shared: &Shared) -> Result<Option<ExitStatus>> {
    loop {
        {
            let mut guard = shared.child();
            let Some(child) = guard.as_mut() else {
                return Ok(None);
            };
            if let Some(status) = child
                .try_wait()
                .map_err(|e| MonitorError::Process(format!("wait failed: {}", e)))?
            {
                guard.take();
                return Ok(Some(status));
            }
        }
        thread::sleep(REAP_RETRY_INTERVAL);
    }
}

fn kill_child(shared: &Shared) {
    let Some(mut child) = shared.child().take() else {
        return;
    };
    if let Err(e) = child.kill() {
        // InvalidInput: the process had already exited
        debug!(error = %e, "Kill failed");
    }
    match child.wait() {
        Ok(status) => debug!(status = %status, "Ping process reaped"),
        Err(e) => warn!(error = %e, "Failed to reap ping process"),
    }
}

/// Lifecycle handle for a running monitor.
///
/// Dropping the handle stops the monitor.
#[must_use = "dropping a MonitorHandle stops the monitor"]
pub struct MonitorHandle {
    command: PingCommand,
    shared: Arc<Shared>,
}

impl MonitorHandle {
    /// Stop delivering events and kill the ping process.
    ///
    /// Idempotent and callable from any thread, including from inside the
    /// observer. Once this returns no new observer call will begin.
    ///
    /// Only the direct child is killed. If it started processes that inherited
    /// its pipes, the reader threads stay blocked until those exit too; their
    /// output is discarded.
    pub fn stop(&self) {
        if !self.shared.gate.close() {
            return;
        }
        info!(command = %self.command, "Stopping ping monitor");
        kill_child(&self.shared);
    }

    pub fn is_stopped(&self) -> bool {
        self.shared.gate.is_stopped()
    }

    /// True while the ping process is alive and the monitor has not been stopped
    pub fn is_running(&self) -> bool {
        !self.is_stopped() && self.shared.child().is_some()
    }

    pub fn command(&self) -> &PingCommand {
        &self.command
    }

    /// Host being pinged: the last argument of the command line
    pub fn target(&self) -> Option<&str> {
        self.command.target()
    }
}

impl Drop for MonitorHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

impl std::fmt::Debug for MonitorHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MonitorHandle")
            .field("command", &self.command)
            .field("stopped", &self.is_stopped())
            .finish()
    }
}
