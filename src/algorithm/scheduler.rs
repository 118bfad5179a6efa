//! Cooperative batch scheduling, progress reporting and result delivery
//!
//! A run advances in bounded slices so the owner of the run can react to
//! pause, resume and replacement commands between them. All mutable run
//! bookkeeping lives in a [`RunContext`] handed to every call.

use std::sync::mpsc;
use std::time::Instant;

use crate::algorithm::growth::{GrowthEngine, StepOutcome};
use crate::algorithm::profile::BatchPolicy;
use crate::io::error::{GenerationError, Result, RunError};
use crate::io::output::{GeneratedImage, assemble};
use crate::io::request::GenerationRequest;

/// Lifecycle of a run
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunState {
    /// Frontier seeded, no slice executed yet
    Seeding,
    /// Slices are being executed
    Growing,
    /// Held between slices until resumed
    Paused,
    /// Growth stopped, output being assembled
    Finalizing,
    /// Buffer delivered
    Done,
    /// Run ended with an error
    Error,
}

/// Message emitted by a run
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Response {
    /// Percentage of pixels filled, non-decreasing within a run
    Progress(u8),
    /// Run failed; no buffer follows
    Error(RunError),
    /// Final buffer and metadata
    Complete(GeneratedImage),
}

/// Destination for run responses
pub trait ResponseSink {
    /// Hand a response over, returning it when the receiver refused it
    ///
    /// # Errors
    ///
    /// Returns the undelivered response if the receiver is gone or full
    fn send(&mut self, response: Response) -> std::result::Result<(), Response>;
}

impl ResponseSink for mpsc::Sender<Response> {
    fn send(&mut self, response: Response) -> std::result::Result<(), Response> {
        mpsc::Sender::send(self, response).map_err(|mpsc::SendError(returned)| returned)
    }
}

impl ResponseSink for Vec<Response> {
    fn send(&mut self, response: Response) -> std::result::Result<(), Response> {
        self.push(response);
        Ok(())
    }
}

/// Mutable bookkeeping of one run
#[derive(Clone, Debug)]
pub struct RunContext {
    state: RunState,
    filled: usize,
    total: usize,
    paused: bool,
    slices: usize,
    last_progress: Instant,
    last_reported: Option<u8>,
}

impl RunContext {
    /// Context for a run over `total` pixels
    pub fn new(total: usize) -> Self {
        Self {
            state: RunState::Seeding,
            filled: 0,
            total,
            paused: false,
            slices: 0,
            last_progress: Instant::now(),
            last_reported: None,
        }
    }

    /// Context matching an engine's canvas
    pub fn for_engine(engine: &GrowthEngine) -> Self {
        let mut context = Self::new(engine.canvas().pixel_count());
        context.filled = engine.canvas().filled_count();
        context
    }

    /// Current lifecycle state
    pub const fn state(&self) -> RunState {
        self.state
    }

    /// Pixels filled so far
    pub const fn filled(&self) -> usize {
        self.filled
    }

    /// Total pixels of the canvas
    pub const fn total(&self) -> usize {
        self.total
    }

    /// Slices executed so far
    pub const fn slices(&self) -> usize {
        self.slices
    }

    /// Whether the run is held between slices
    pub const fn is_paused(&self) -> bool {
        self.paused
    }

    /// Hold the run before its next slice
    pub const fn pause(&mut self) {
        if !matches!(self.state, RunState::Done | RunState::Error) {
            self.paused = true;
            self.state = RunState::Paused;
        }
    }

    /// Let the run continue with its next slice
    pub const fn resume(&mut self) {
        self.paused = false;
        if matches!(self.state, RunState::Paused) {
            self.state = RunState::Growing;
        }
    }

    /// Mark the run as failed
    pub const fn fail(&mut self) {
        self.state = RunState::Error;
    }

    /// Last percentage reported to the sink
    pub const fn last_reported(&self) -> Option<u8> {
        self.last_reported
    }

    /// Filled percentage, rounded down
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 100;
        }
        let percent = (self.filled as u128 * 100 / self.total as u128).min(100);
        u8::try_from(percent).unwrap_or(100)
    }

    fn report<S: ResponseSink + ?Sized>(&mut self, percent: u8, sink: &mut S) {
        self.last_progress = Instant::now();
        if self.last_reported.is_some_and(|last| last >= percent) {
            return;
        }
        self.last_reported = Some(percent);
        if sink.send(Response::Progress(percent)).is_err() {
            log::debug!("progress {percent}% dropped: receiver gone");
        }
    }
}

/// Outcome of one slice
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SliceOutcome {
    /// Budget spent; more slices are needed
    Continue,
    /// The run is paused and no work was done
    Paused,
    /// Growth reached a terminal outcome
    Finished(StepOutcome),
}

/// Executes bounded slices of a growth run
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Scheduler {
    policy: BatchPolicy,
}

impl Scheduler {
    /// Scheduler with explicit limits
    pub const fn new(policy: BatchPolicy) -> Self {
        Self { policy }
    }

    /// Scheduler using the limits of an engine's profile
    pub const fn for_engine(engine: &GrowthEngine) -> Self {
        Self::new(engine.profile().batch)
    }

    /// Slice limits in use
    pub const fn policy(&self) -> BatchPolicy {
        self.policy
    }

    /// Run one slice of growth
    ///
    /// A slice ends after the iteration cap, when the time box is exceeded
    /// (the clock is read once per stride) or when growth stops. Progress is
    /// reported whenever the reporting interval has elapsed.
    ///
    /// # Errors
    ///
    /// Propagates any growth step error
    pub fn run_slice<S: ResponseSink + ?Sized>(
        &self,
        engine: &mut GrowthEngine,
        context: &mut RunContext,
        sink: &mut S,
    ) -> Result<SliceOutcome> {
        if context.paused {
            return Ok(SliceOutcome::Paused);
        }
        context.state = RunState::Growing;
        context.slices += 1;

        let started = Instant::now();
        let stride = self.policy.time_check_stride.max(1);
        for iteration in 0..self.policy.max_iterations {
            if iteration > 0 && iteration % stride == 0 && started.elapsed() >= self.policy.time_limit
            {
                log::trace!("slice {} yielded after {iteration} iterations", context.slices);
                break;
            }

            let outcome = engine.step()?;
            if let StepOutcome::Progressed { filled } = outcome {
                context.filled += filled;
            } else {
                context.state = RunState::Finalizing;
                match outcome {
                    StepOutcome::EarlyFinish => log::info!(
                        "early finish at {}/{} pixels",
                        context.filled,
                        context.total
                    ),
                    _ => log::debug!(
                        "growth stopped ({outcome:?}) at {}/{} pixels",
                        context.filled,
                        context.total
                    ),
                }
                return Ok(SliceOutcome::Finished(outcome));
            }

            if context.last_progress.elapsed() >= self.policy.progress_interval {
                let percent = context.percent();
                context.report(percent, sink);
            }
        }

        Ok(SliceOutcome::Continue)
    }

    /// Run slices until growth stops or the run is paused
    ///
    /// Returns `None` when the run was paused.
    ///
    /// # Errors
    ///
    /// Propagates any growth step error
    pub fn drive<S: ResponseSink + ?Sized>(
        &self,
        engine: &mut GrowthEngine,
        context: &mut RunContext,
        sink: &mut S,
    ) -> Result<Option<StepOutcome>> {
        loop {
            match self.run_slice(engine, context, sink)? {
                SliceOutcome::Continue => {}
                SliceOutcome::Paused => return Ok(None),
                SliceOutcome::Finished(outcome) => return Ok(Some(outcome)),
            }
        }
    }
}

/// Report completion, assemble the output and deliver it
///
/// # Errors
///
/// Returns an error if:
/// - The output buffer cannot be assembled
/// - The receiver refuses the buffer twice
pub fn finalize<S: ResponseSink + ?Sized>(
    engine: GrowthEngine,
    context: &mut RunContext,
    sink: &mut S,
) -> Result<()> {
    context.state = RunState::Finalizing;
    context.report(100, sink);

    let request = engine.request().clone();
    let pattern_complexity = engine.profile().pattern_complexity;
    let image = assemble(engine.into_canvas(), &request, pattern_complexity)?;
    deliver(image, sink)?;

    context.state = RunState::Done;
    log::info!(
        "run complete: {}/{} pixels filled in {} slices",
        context.filled,
        context.total,
        context.slices
    );
    Ok(())
}

/// Hand the final buffer to the receiver
///
/// When the first handoff is refused the buffer is copied into a fresh
/// allocation and sent once more.
///
/// # Errors
///
/// Returns an error if the copy cannot be allocated or the retry is refused
pub fn deliver<S: ResponseSink + ?Sized>(image: GeneratedImage, sink: &mut S) -> Result<()> {
    let Err(refused) = sink.send(Response::Complete(image)) else {
        return Ok(());
    };
    let Response::Complete(image) = refused else {
        return Err(GenerationError::TransferFailure {
            reason: "receiver returned an unexpected message".to_owned(),
        });
    };
    log::warn!("buffer handoff refused, retrying with a copy");

    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(image.buffer.len())
        .map_err(|e| GenerationError::TransferFailure {
            reason: format!("could not copy buffer for retry: {e}"),
        })?;
    buffer.extend_from_slice(&image.buffer);
    let copy = GeneratedImage {
        buffer,
        metadata: image.metadata,
    };

    match sink.send(Response::Complete(copy)) {
        Ok(()) => Ok(()),
        Err(_second) => Err(GenerationError::TransferFailure {
            reason: "receiver refused the buffer twice".to_owned(),
        }),
    }
}

/// Run a request to completion on the calling thread
///
/// Responses go to `sink`; the final buffer arrives as
/// [`Response::Complete`].
///
/// # Errors
///
/// Returns an error if the request is rejected, growth fails or delivery fails
pub fn run_blocking<S: ResponseSink + ?Sized>(
    request: &GenerationRequest,
    sink: &mut S,
) -> Result<()> {
    let mut engine = GrowthEngine::new(request)?;
    let mut context = RunContext::for_engine(&engine);
    let scheduler = Scheduler::for_engine(&engine);

    match scheduler.drive(&mut engine, &mut context, sink) {
        Ok(Some(_)) => finalize(engine, &mut context, sink),
        Ok(None) => Err(crate::io::error::runtime_fault(
            "blocking run",
            &"run paused with no way to resume",
        )),
        Err(e) => {
            context.fail();
            Err(e)
        }
    }
}

/// Generate an image on the calling thread without progress reporting
///
/// # Errors
///
/// Returns an error if the request is rejected or growth fails
pub fn generate(request: &GenerationRequest) -> Result<GeneratedImage> {
    let mut responses = Vec::new();
    run_blocking(request, &mut responses)?;
    responses
        .into_iter()
        .rev()
        .find_map(|response| match response {
            Response::Complete(image) => Some(image),
            Response::Progress(_) | Response::Error(_) => None,
        })
        .ok_or_else(|| GenerationError::TransferFailure {
            reason: "run finished without a buffer".to_owned(),
        })
}
