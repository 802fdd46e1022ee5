//! Background signal listener.
//!
//! An external source delivers two named signals, toggle-capture and
//! stop, on its own cadence. The listener thread polls the source,
//! mutates the shared flags, and nothing else: it holds no puzzle state.
//! It is a cancellable task, not fire-and-forget: raising the stop flag
//! makes it exit its poll loop, and [`SignalListener::join`] waits for
//! that.

use super::ControlFlags;
use std::io::BufRead;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

/// How long one listener poll waits before re-checking the stop flag.
const POLL_TIMEOUT: Duration = Duration::from_millis(100);

/// Signals the control surface can deliver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    /// Flip the armed flag.
    ToggleCapture,
    /// Terminate the program.
    Stop,
}

/// A source of control signals.
pub trait SignalSource: Send {
    /// Waits up to `timeout` for the next signal.
    fn poll(&mut self, timeout: Duration) -> Option<Signal>;
}

/// Line-oriented source reading from standard input.
///
/// `c` or `toggle` arms/disarms; `q` or `stop` terminates. The reader
/// thread blocks on stdin and feeds a channel; it dies with the process
/// once the listener stops draining.
pub struct StdinSignals {
    rx: Receiver<Signal>,
}

impl StdinSignals {
    /// Spawns the stdin reader.
    pub fn spawn() -> Self {
        let (tx, rx) = mpsc::channel();
        std::thread::Builder::new()
            .name("stdin-signals".into())
            .spawn(move || {
                let stdin = std::io::stdin();
                for line in stdin.lock().lines() {
                    let Ok(line) = line else { break };
                    let signal = match line.trim() {
                        "c" | "toggle" => Some(Signal::ToggleCapture),
                        "q" | "stop" => Some(Signal::Stop),
                        _ => None,
                    };
                    if let Some(signal) = signal {
                        if tx.send(signal).is_err() {
                            break;
                        }
                    }
                }
            })
            .expect("spawn stdin reader");
        Self { rx }
    }
}

impl SignalSource for StdinSignals {
    fn poll(&mut self, timeout: Duration) -> Option<Signal> {
        match self.rx.recv_timeout(timeout) {
            Ok(signal) => Some(signal),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }
}

/// Scripted source for tests: pops queued signals in order.
#[derive(Debug, Default)]
pub struct QueuedSignals {
    queue: std::collections::VecDeque<Signal>,
}

impl QueuedSignals {
    /// Builds a source from a signal list.
    pub fn new(signals: impl IntoIterator<Item = Signal>) -> Self {
        Self {
            queue: signals.into_iter().collect(),
        }
    }
}

impl SignalSource for QueuedSignals {
    fn poll(&mut self, _timeout: Duration) -> Option<Signal> {
        self.queue.pop_front()
    }
}

/// Handle to the running listener thread.
pub struct SignalListener {
    handle: JoinHandle<()>,
}

impl SignalListener {
    /// Spawns the listener over a source and the shared flags.
    pub fn spawn(mut source: impl SignalSource + 'static, flags: Arc<ControlFlags>) -> Self {
        let handle = std::thread::Builder::new()
            .name("signal-listener".into())
            .spawn(move || {
                while !flags.stop_requested() {
                    match source.poll(POLL_TIMEOUT) {
                        Some(Signal::ToggleCapture) => {
                            let armed = flags.toggle_armed();
                            tracing::info!(armed, "capture toggled");
                        }
                        Some(Signal::Stop) => {
                            tracing::info!("stop requested");
                            flags.request_stop();
                        }
                        None => {}
                    }
                }
            })
            .expect("spawn signal listener");
        Self { handle }
    }

    /// Waits for the listener thread to exit.
    ///
    /// Call after raising the stop flag; the listener notices within one
    /// poll timeout.
    pub fn join(self) {
        if self.handle.join().is_err() {
            tracing::warn!("signal listener panicked");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listener_applies_toggle_then_stop() {
        let flags = Arc::new(ControlFlags::new());
        let source = QueuedSignals::new([Signal::ToggleCapture, Signal::Stop]);

        let listener = SignalListener::spawn(source, Arc::clone(&flags));
        listener.join();

        assert!(flags.armed());
        assert!(flags.stop_requested());
    }

    #[test]
    fn test_listener_exits_on_external_stop() {
        let flags = Arc::new(ControlFlags::new());
        let listener = SignalListener::spawn(QueuedSignals::default(), Arc::clone(&flags));

        flags.request_stop();
        // Join returns once the poll timeout elapses and the flag is seen.
        listener.join();
        assert!(flags.stop_requested());
    }
}
