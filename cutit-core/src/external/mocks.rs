// cutit-core/src/external/mocks.rs

// --- Mocking Infrastructure (for testing) ---

// This module is only compiled when the "test-mocks" feature is enabled.
#![cfg(feature = "test-mocks")]

use super::{CutRequest, MediaCutter, MediaProbe};
use crate::error::{CoreError, CoreResult, probe_error};
use crate::planning::MediaDuration;
use crate::progress::CancelToken;
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, bounded};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Mock implementation of MediaProbe returning a fixed answer.
#[derive(Debug)]
pub struct MockProbe {
    result: Result<f64, String>,
    calls: AtomicUsize,
    probed: Mutex<Vec<PathBuf>>,
}

impl MockProbe {
    /// Probe that reports `seconds` for every file.
    pub fn with_duration(seconds: f64) -> Self {
        Self {
            result: Ok(seconds),
            calls: AtomicUsize::new(0),
            probed: Mutex::new(Vec::new()),
        }
    }

    /// Probe that fails with `reason` for every file.
    pub fn failing(reason: &str) -> Self {
        Self {
            result: Err(reason.to_string()),
            calls: AtomicUsize::new(0),
            probed: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn probed_paths(&self) -> Vec<PathBuf> {
        lock(&self.probed).clone()
    }
}

impl MediaProbe for MockProbe {
    fn duration(&self, path: &Path) -> CoreResult<MediaDuration> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        lock(&self.probed).push(path.to_path_buf());
        log::info!("MockProbe::duration called for: {}", path.display());
        match &self.result {
            Ok(seconds) => MediaDuration::new(*seconds),
            Err(reason) => Err(probe_error(path, reason.clone())),
        }
    }
}

/// Handle for a cut call that blocks until released.
pub struct MockGate {
    entered: Receiver<()>,
    release: Sender<()>,
}

impl MockGate {
    /// Waits until the held call has started and written its output.
    pub fn wait_entered(&self, timeout: Duration) -> bool {
        self.entered.recv_timeout(timeout).is_ok()
    }

    /// Lets the held call return successfully.
    pub fn release(&self) {
        let _ = self.release.send(());
    }
}

enum CutBehavior {
    Fail(String),
    SkipOutput,
    EmptyOutput,
    Hold {
        entered: Sender<()>,
        release: Receiver<()>,
    },
}

/// Mock implementation of MediaCutter.
///
/// By default every call writes a small file to the requested output and
/// succeeds. Rules keyed by the 1-based call number change that.
#[derive(Default)]
pub struct MockCutter {
    rules: Mutex<HashMap<usize, CutBehavior>>,
    calls: Mutex<Vec<CutRequest>>,
}

impl MockCutter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Call `call` writes a partial file and then fails with `reason`.
    pub fn fail_call(self, call: usize, reason: &str) -> Self {
        lock(&self.rules).insert(call, CutBehavior::Fail(reason.to_string()));
        self
    }

    /// Call `call` reports success without writing anything.
    pub fn skip_output(self, call: usize) -> Self {
        lock(&self.rules).insert(call, CutBehavior::SkipOutput);
        self
    }

    /// Call `call` reports success after leaving the output empty.
    pub fn empty_output(self, call: usize) -> Self {
        lock(&self.rules).insert(call, CutBehavior::EmptyOutput);
        self
    }

    /// Call `call` writes its output and then blocks until released or aborted.
    pub fn hold_call(&self, call: usize) -> MockGate {
        let (entered_tx, entered_rx) = bounded(1);
        let (release_tx, release_rx) = bounded(1);
        lock(&self.rules).insert(
            call,
            CutBehavior::Hold {
                entered: entered_tx,
                release: release_rx,
            },
        );
        MockGate {
            entered: entered_rx,
            release: release_tx,
        }
    }

    pub fn received_calls(&self) -> Vec<CutRequest> {
        lock(&self.calls).clone()
    }

    fn write_dummy_output(path: &Path, contents: &[u8]) -> CoreResult<()> {
        std::fs::write(path, contents)?;
        log::info!("MockCutter created dummy output file: {:?}", path);
        Ok(())
    }
}

impl MediaCutter for MockCutter {
    fn cut(&self, request: &CutRequest, cancel: &CancelToken) -> CoreResult<()> {
        let call = {
            let mut calls = lock(&self.calls);
            calls.push(request.clone());
            calls.len()
        };
        let behavior = lock(&self.rules).remove(&call);

        match behavior {
            None => Self::write_dummy_output(&request.output, b"mock segment data"),
            Some(CutBehavior::Fail(reason)) => {
                Self::write_dummy_output(&request.output, b"partial")?;
                log::warn!("MockCutter simulating failure for call {}: {}", call, reason);
                Err(CoreError::OperationFailed(reason))
            }
            Some(CutBehavior::SkipOutput) => {
                if request.output.exists() {
                    std::fs::remove_file(&request.output)?;
                }
                Ok(())
            }
            Some(CutBehavior::EmptyOutput) => Self::write_dummy_output(&request.output, b""),
            Some(CutBehavior::Hold { entered, release }) => {
                Self::write_dummy_output(&request.output, b"mock segment data")?;
                let _ = entered.send(());
                loop {
                    match release.recv_timeout(Duration::from_millis(5)) {
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => return Ok(()),
                        Err(RecvTimeoutError::Timeout) => {
                            if cancel.is_aborted() {
                                log::info!("MockCutter call {} aborted", call);
                                return Err(CoreError::Cancelled);
                            }
                        }
                    }
                }
            }
        }
    }
}
