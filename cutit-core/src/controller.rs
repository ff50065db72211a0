// ============================================================================
// cutit-core/src/controller.rs
// ============================================================================
//
// JOB CONTROLLER: Background Probe -> Plan -> Cut Pipeline
//
// This module runs a cut job on a background worker thread and gives the
// caller a JobHandle to observe and stop it. The worker sends JobEvents over
// a crossbeam channel to a dispatcher thread, which keeps the event history
// and forwards each event to registered callbacks and subscribers. Callbacks
// registered after events were sent are replayed what they missed.
//
// KEY COMPONENTS:
// - JobController: owns the probe, the cutter and the configuration; one
//   active job at a time
// - JobHandle: cancel/abort, callbacks, event subscription, wait
//
// WORKFLOW:
// 1. Probing: input must be readable, then the duration is probed
// 2. Planning: the duration is split into equal segments
// 3. Cutting: the output directory is created and each segment is cut in order
// 4. A terminal state and a CutReport are delivered
//
// AI-ASSISTANT-INFO: Job orchestration, threading and event dispatch

// ---- Standard library imports ----
use std::any::Any;
use std::fs::{self, File};
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread;
use std::time::{Duration, Instant};

// ---- External crate imports ----
use crossbeam_channel::{Receiver, Sender, bounded, unbounded};

// ---- Internal crate imports ----
use crate::config::CutConfig;
use crate::error::{CoreError, CoreResult, probe_error};
use crate::executor::{SegmentExecutor, segment_failure_reason};
use crate::external::{FfmpegProbe, MediaCutter, MediaProbe, SidecarCutter};
use crate::job::{CutJob, CutReport, JobState, SegmentFailure, SegmentStatus};
use crate::output::{default_output_dir, segment_output_path};
use crate::planning::SegmentPlan;
use crate::progress::{CancelToken, JobEvent, ProgressUpdate, SegmentOutcome};

type ProgressCallbackFn = Box<dyn Fn(&ProgressUpdate) + Send>;
type CompleteCallbackFn = Box<dyn FnOnce(&CutReport) + Send>;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic")
}

/// Runs a caller-supplied callback so that a panic in it cannot stop event dispatch.
fn run_callback<F: FnOnce()>(kind: &str, callback: F) {
    if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(callback)) {
        log::error!("{} callback panicked: {}", kind, panic_message(payload.as_ref()));
    }
}

// ============================================================================
// CONTROLLER
// ============================================================================

/// Runs cut jobs in the background, one at a time.
///
/// # Examples
///
/// ```rust,no_run
/// use cutit_core::{CutConfigBuilder, JobController, JobState};
///
/// let config = CutConfigBuilder::new().ffmpeg_path("ffmpeg").build();
/// let controller = JobController::with_ffmpeg(config)?;
/// let handle = controller.submit_job("movie.mp4", 4, None)?;
/// handle.on_progress(|update| println!("{update}"));
/// let report = handle.wait();
/// assert_eq!(report.state, JobState::Completed);
/// # Ok::<(), cutit_core::CoreError>(())
/// ```
pub struct JobController<P, C> {
    probe: Arc<P>,
    cutter: Arc<C>,
    config: CutConfig,
    busy: Arc<AtomicBool>,
}

impl JobController<FfmpegProbe, SidecarCutter> {
    /// Controller that probes and cuts with the ffmpeg binary from `config`.
    pub fn with_ffmpeg(config: CutConfig) -> CoreResult<Self> {
        config.validate()?;
        let probe = FfmpegProbe::new(&config.ffmpeg_path);
        let cutter =
            SidecarCutter::new(&config.ffmpeg_path).with_poll_interval(config.poll_interval);
        Ok(Self::new(probe, cutter, config))
    }
}

impl<P, C> JobController<P, C>
where
    P: MediaProbe + 'static,
    C: MediaCutter + 'static,
{
    pub fn new(probe: P, cutter: C, config: CutConfig) -> Self {
        Self {
            probe: Arc::new(probe),
            cutter: Arc::new(cutter),
            config,
            busy: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn config(&self) -> &CutConfig {
        &self.config
    }

    pub fn probe(&self) -> &P {
        &self.probe
    }

    pub fn cutter(&self) -> &C {
        &self.cutter
    }

    /// Whether a job is currently running.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    /// Starts a job splitting `input` into `part_count` parts.
    ///
    /// The parts go to `destination`, or to `<stem>_parts` next to the input
    /// when it is `None`. Returns immediately; the job runs on its own thread.
    ///
    /// # Errors
    ///
    /// * `CoreError::Busy` - Another job of this controller is still running
    /// * `CoreError::Config` - The configuration is invalid
    /// * `CoreError::Io` - The worker thread could not be started
    pub fn submit_job(
        &self,
        input: impl Into<PathBuf>,
        part_count: i64,
        destination: Option<PathBuf>,
    ) -> CoreResult<JobHandle> {
        self.config.validate()?;
        if self
            .busy
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            log::warn!("Rejected job submission: a job is already running");
            return Err(CoreError::Busy);
        }
        let guard = BusyGuard(Arc::clone(&self.busy));

        let input = input.into();
        let cancel = CancelToken::new();
        let hub = Arc::new(Mutex::new(EventHub::default()));
        let (events_tx, events_rx) = unbounded::<JobEvent>();

        let dispatcher_hub = Arc::clone(&hub);
        let input_for_report = input.clone();
        thread::Builder::new()
            .name("cutit-events".to_string())
            .spawn(move || run_dispatcher(events_rx, dispatcher_hub, input_for_report))?;

        let worker = JobWorker {
            probe: Arc::clone(&self.probe),
            cutter: Arc::clone(&self.cutter),
            config: self.config.clone(),
            input: input.clone(),
            part_count,
            destination,
            cancel: cancel.clone(),
            events: events_tx,
        };
        log::info!("Submitting job: {} into {} part(s)", input.display(), part_count);
        thread::Builder::new()
            .name("cutit-worker".to_string())
            .spawn(move || worker.run(guard))?;

        Ok(JobHandle {
            input,
            cancel,
            hub,
            started: Instant::now(),
        })
    }
}

/// Clears the controller's busy flag when the worker ends, even on panic.
struct BusyGuard(Arc<AtomicBool>);

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

// ============================================================================
// WORKER
// ============================================================================

struct JobWorker<P, C> {
    probe: Arc<P>,
    cutter: Arc<C>,
    config: CutConfig,
    input: PathBuf,
    part_count: i64,
    destination: Option<PathBuf>,
    cancel: CancelToken,
    events: Sender<JobEvent>,
}

impl<P: MediaProbe, C: MediaCutter> JobWorker<P, C> {
    fn run(self, guard: BusyGuard) {
        let started = Instant::now();
        let mut report = self.execute(started);
        report.elapsed_secs = started.elapsed().as_secs_f64();

        match report.state {
            JobState::Failed => log::error!(
                "Job for {} failed: {}",
                self.input.display(),
                report.error.as_deref().unwrap_or("no segment could be written")
            ),
            state => log::info!(
                "Job for {} finished: {} ({} written, {} failed)",
                self.input.display(),
                state,
                report.outputs.len(),
                report.failures.len()
            ),
        }

        // A caller woken by Finished may submit again straight away
        drop(guard);
        self.emit(JobEvent::StateChanged(report.state));
        self.emit(JobEvent::Finished(report));
    }

    fn emit(&self, event: JobEvent) {
        let _ = self.events.send(event);
    }

    fn fail(&self, started: Instant, duration_secs: Option<f64>, err: CoreError) -> CutReport {
        CutReport::early_failure(
            &self.input,
            duration_secs,
            err.to_string(),
            started.elapsed().as_secs_f64(),
        )
    }

    fn execute(&self, started: Instant) -> CutReport {
        // ---- Probing ----
        self.emit(JobEvent::StateChanged(JobState::Probing));
        let readable = File::open(&self.input)
            .and_then(|f| f.metadata())
            .map(|meta| meta.is_file());
        if !matches!(readable, Ok(true)) {
            log::debug!("Cannot read {}: {:?}", self.input.display(), readable);
            return self.fail(started, None, CoreError::InputNotFound(self.input.clone()));
        }
        let duration = match self.probe.duration(&self.input) {
            Ok(d) if d.is_zero() => {
                return self.fail(started, Some(0.0), probe_error(&self.input, "duration is zero"));
            }
            Ok(d) => d,
            Err(e) => return self.fail(started, None, e),
        };
        log::info!("Duration of {}: {}", self.input.display(), duration);

        // ---- Planning ----
        self.emit(JobEvent::StateChanged(JobState::Planning));
        let plan = match SegmentPlan::new(duration, self.part_count) {
            Ok(plan) => plan,
            Err(e) => return self.fail(started, Some(duration.as_secs()), e),
        };

        // ---- Cutting ----
        self.emit(JobEvent::StateChanged(JobState::Cutting));
        let output_dir = self
            .destination
            .clone()
            .unwrap_or_else(|| default_output_dir(&self.input, &self.config.output_dir_suffix));
        if let Err(e) = fs::create_dir_all(&output_dir) {
            let err = CoreError::OperationFailed(format!(
                "Could not create output directory {}: {}",
                output_dir.display(),
                e
            ));
            return self.fail(started, Some(duration.as_secs()), err);
        }

        let mut job = CutJob::new(&self.input, &output_dir, plan);
        let executor = SegmentExecutor::new(self.cutter.as_ref(), self.config.collision_policy);
        let segments = job.segments().to_vec();
        let total = segments.len();
        let mut outputs = Vec::new();
        let mut failures = Vec::new();
        let mut interrupted = false;

        for segment in &segments {
            if self.cancel.is_cancelled() {
                log::info!(
                    "Cancellation requested, stopping before part {} of {}",
                    segment.index,
                    total
                );
                interrupted = true;
                break;
            }

            job.set_status(segment.index, SegmentStatus::Running);
            self.emit(JobEvent::SegmentStarted {
                index: segment.index,
                total,
            });
            log::info!("Processing part {} of {}", segment.index, total);

            let target = segment_output_path(
                &self.input,
                &output_dir,
                segment.index,
                &self.config.default_extension,
            );
            let run_to_end = job.plan().is_last(segment);
            let outcome = match executor.run_segment(&self.input, segment, &target, run_to_end, &self.cancel) {
                Ok(file) => {
                    job.set_status(segment.index, SegmentStatus::Done);
                    outputs.push(file.clone());
                    SegmentOutcome::Written(file)
                }
                Err(e) => {
                    let reason = segment_failure_reason(&e);
                    log::warn!("Part {} of {} failed: {}", segment.index, total, reason);
                    if self.cancel.is_aborted() {
                        interrupted = true;
                    }
                    job.set_status(segment.index, SegmentStatus::Failed(reason.clone()));
                    let failure = SegmentFailure {
                        index: segment.index,
                        reason,
                    };
                    failures.push(failure.clone());
                    SegmentOutcome::Failed(failure)
                }
            };

            self.emit(JobEvent::Progress(ProgressUpdate {
                completed: segment.index,
                total,
                last: outcome,
            }));
        }

        let state = JobState::after_cutting(interrupted, outputs.len(), failures.len());
        CutReport {
            state,
            input: self.input.clone(),
            output_dir: Some(output_dir),
            duration_secs: Some(duration.as_secs()),
            outputs,
            failures,
            statuses: job.into_statuses(),
            error: None,
            elapsed_secs: 0.0,
        }
    }
}

// ============================================================================
// EVENT DISPATCH
// ============================================================================

#[derive(Default)]
struct EventHub {
    history: Vec<JobEvent>,
    progress_callbacks: Vec<ProgressCallbackFn>,
    complete_callbacks: Vec<CompleteCallbackFn>,
    subscribers: Vec<Sender<JobEvent>>,
    finished: Option<CutReport>,
}

impl EventHub {
    fn dispatch(&mut self, event: JobEvent) {
        match &event {
            JobEvent::Progress(update) => {
                for callback in &self.progress_callbacks {
                    run_callback("Progress", || callback(update));
                }
            }
            JobEvent::Finished(report) => {
                self.finished = Some(report.clone());
                for callback in self.complete_callbacks.drain(..) {
                    run_callback("Completion", || callback(report));
                }
            }
            _ => {}
        }
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
        self.history.push(event);
    }

    fn current_state(&self) -> JobState {
        self.history
            .iter()
            .rev()
            .find_map(|event| match event {
                JobEvent::StateChanged(state) => Some(*state),
                _ => None,
            })
            .unwrap_or(JobState::Idle)
    }
}

fn run_dispatcher(events: Receiver<JobEvent>, hub: Arc<Mutex<EventHub>>, input: PathBuf) {
    for event in events.iter() {
        lock(&hub).dispatch(event);
    }

    let mut hub = lock(&hub);
    if hub.finished.is_none() {
        log::error!("Job worker for {} stopped without a result", input.display());
        let report = CutReport::early_failure(
            &input,
            None,
            "job worker stopped unexpectedly".to_string(),
            0.0,
        );
        hub.dispatch(JobEvent::Finished(report));
    }
    hub.progress_callbacks.clear();
    hub.subscribers.clear();
}

// ============================================================================
// HANDLE
// ============================================================================

/// Caller side of a submitted job.
///
/// Callbacks run on the job's dispatcher thread and must not register further
/// callbacks on the same handle. A panicking callback is logged and skipped.
pub struct JobHandle {
    input: PathBuf,
    cancel: CancelToken,
    hub: Arc<Mutex<EventHub>>,
    started: Instant,
}

impl JobHandle {
    pub fn input(&self) -> &Path {
        &self.input
    }

    /// Stops the job before its next segment; written parts are kept.
    pub fn cancel(&self) {
        log::info!("Cancel requested for {}", self.input.display());
        self.cancel.cancel();
    }

    /// Like `cancel`, and also kills the ffmpeg process of the running segment.
    pub fn abort(&self) {
        log::info!("Abort requested for {}", self.input.display());
        self.cancel.abort();
    }

    /// Token shared with the worker, for callers that stop jobs from elsewhere.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Time since the job was submitted.
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Last state the job reported.
    pub fn state(&self) -> JobState {
        lock(&self.hub).current_state()
    }

    pub fn is_finished(&self) -> bool {
        lock(&self.hub).finished.is_some()
    }

    /// Calls `callback` after every segment, in segment order.
    ///
    /// Updates sent before registration are replayed first.
    pub fn on_progress<F>(&self, callback: F)
    where
        F: Fn(&ProgressUpdate) + Send + 'static,
    {
        let mut hub = lock(&self.hub);
        for event in &hub.history {
            if let JobEvent::Progress(update) = event {
                callback(update);
            }
        }
        if hub.finished.is_none() {
            hub.progress_callbacks.push(Box::new(callback));
        }
    }

    /// Calls `callback` once with the final report.
    ///
    /// Runs immediately when the job has already finished.
    pub fn on_complete<F>(&self, callback: F)
    where
        F: FnOnce(&CutReport) + Send + 'static,
    {
        let mut hub = lock(&self.hub);
        match &hub.finished {
            Some(report) => callback(report),
            None => hub.complete_callbacks.push(Box::new(callback)),
        }
    }

    /// Channel receiving every event of the job, starting with those already sent.
    ///
    /// The channel disconnects after the `Finished` event.
    pub fn subscribe(&self) -> Receiver<JobEvent> {
        let (tx, rx) = unbounded();
        let mut hub = lock(&self.hub);
        for event in &hub.history {
            let _ = tx.send(event.clone());
        }
        if hub.finished.is_none() {
            hub.subscribers.push(tx);
        }
        rx
    }

    /// Blocks until the job finishes and returns its report.
    pub fn wait(&self) -> CutReport {
        let (tx, rx) = bounded(1);
        self.on_complete(move |report| {
            let _ = tx.send(report.clone());
        });
        rx.recv().unwrap_or_else(|_| {
            CutReport::early_failure(
                &self.input,
                None,
                "job worker stopped unexpectedly".to_string(),
                self.elapsed().as_secs_f64(),
            )
        })
    }

    /// Like `wait`, but gives up after `timeout`.
    pub fn wait_timeout(&self, timeout: Duration) -> Option<CutReport> {
        let (tx, rx) = bounded(1);
        self.on_complete(move |report| {
            let _ = tx.send(report.clone());
        });
        rx.recv_timeout(timeout).ok()
    }
}
