//! Background worker owning one growth run at a time
//!
//! Commands arrive over a channel and are drained between slices, so a
//! pause, resume or replacement request takes effect before the next slice
//! starts. A new generate command discards the run in flight.
//!
//! Both ends number runs by counting generate commands, and every response
//! travels tagged with its run number. The handle drops responses of
//! replaced runs, so callers only ever see the run they started last.

use std::any::Any;
use std::cell::Cell;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{self, Receiver, RecvError, RecvTimeoutError, Sender, TryRecvError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::algorithm::growth::GrowthEngine;
use crate::algorithm::scheduler::{
    Response, ResponseSink, RunContext, Scheduler, SliceOutcome, finalize,
};
use crate::io::error::{GenerationError, Result, RunError, runtime_fault};
use crate::io::output::GeneratedImage;
use crate::io::request::GenerationRequest;

const WORKER_THREAD_NAME: &str = "growth-worker";

/// Command accepted by the worker
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Start a run, replacing any run in flight
    Generate(Box<GenerationRequest>),
    /// Hold the current run before its next slice
    Pause,
    /// Continue a held run
    Resume,
    /// Discard any run and shut the worker down
    Stop,
}

/// Response tagged with the number of the run that sent it
#[derive(Debug)]
struct Tagged {
    run: u64,
    response: Response,
}

/// Sink delivering one run's responses over the worker channel
struct RunSink<'a> {
    run: u64,
    channel: &'a Sender<Tagged>,
}

impl ResponseSink for RunSink<'_> {
    fn send(&mut self, response: Response) -> std::result::Result<(), Response> {
        self.channel
            .send(Tagged {
                run: self.run,
                response,
            })
            .map_err(|mpsc::SendError(returned)| returned.response)
    }
}

/// Handle to the worker thread
///
/// Dropping the handle stops the worker and waits for it to exit.
#[derive(Debug)]
pub struct Worker {
    commands: Sender<Command>,
    responses: Receiver<Tagged>,
    current_run: Cell<u64>,
    handle: Option<JoinHandle<()>>,
}

impl Worker {
    /// Spawn an idle worker thread
    ///
    /// # Errors
    ///
    /// Returns an error if the thread cannot be spawned
    pub fn spawn() -> Result<Self> {
        let (commands, command_rx) = mpsc::channel();
        let (response_tx, responses) = mpsc::channel();

        let handle = thread::Builder::new()
            .name(WORKER_THREAD_NAME.to_owned())
            .spawn(move || worker_loop(&command_rx, &response_tx))
            .map_err(|e| runtime_fault("worker spawn", &e))?;

        Ok(Self {
            commands,
            responses,
            current_run: Cell::new(0),
            handle: Some(handle),
        })
    }

    /// Send a raw command
    ///
    /// # Errors
    ///
    /// Returns an error if the worker has exited
    pub fn send(&self, command: Command) -> Result<()> {
        let starts_run = matches!(command, Command::Generate(_));
        self.commands
            .send(command)
            .map_err(|_closed| runtime_fault("worker command", &"worker has exited"))?;
        if starts_run {
            self.current_run.set(self.current_run.get() + 1);
        }
        Ok(())
    }

    /// Number of the run responses are accepted from, 0 before the first
    pub const fn current_run(&self) -> u64 {
        self.current_run.get()
    }

    /// Start a new run, discarding the current one
    ///
    /// # Errors
    ///
    /// Returns an error if the worker has exited
    pub fn generate(&self, request: GenerationRequest) -> Result<()> {
        self.send(Command::Generate(Box::new(request)))
    }

    /// Pause the current run
    ///
    /// # Errors
    ///
    /// Returns an error if the worker has exited
    pub fn pause(&self) -> Result<()> {
        self.send(Command::Pause)
    }

    /// Resume the current run
    ///
    /// # Errors
    ///
    /// Returns an error if the worker has exited
    pub fn resume(&self) -> Result<()> {
        self.send(Command::Resume)
    }

    /// Wait for the next response of the current run
    ///
    /// Returns `None` once the worker has exited.
    pub fn recv(&self) -> Option<Response> {
        self.next_response(None).ok()
    }

    /// Wait up to `timeout` for the next response of the current run
    pub fn recv_timeout(&self, timeout: Duration) -> Option<Response> {
        self.next_response(Some(Instant::now() + timeout)).ok()
    }

    /// Take a response of the current run if one is ready
    pub fn try_recv(&self) -> Option<Response> {
        while let Ok(tagged) = self.responses.try_recv() {
            if let Some(response) = self.accept(tagged) {
                return Some(response);
            }
        }
        None
    }

    fn next_response(
        &self,
        deadline: Option<Instant>,
    ) -> std::result::Result<Response, RecvTimeoutError> {
        loop {
            let tagged = match deadline {
                None => self
                    .responses
                    .recv()
                    .map_err(|RecvError| RecvTimeoutError::Disconnected)?,
                Some(at) => self
                    .responses
                    .recv_timeout(at.saturating_duration_since(Instant::now()))?,
            };
            if let Some(response) = self.accept(tagged) {
                return Ok(response);
            }
        }
    }

    fn accept(&self, tagged: Tagged) -> Option<Response> {
        if tagged.run == self.current_run.get() {
            Some(tagged.response)
        } else {
            log::trace!("dropped response of replaced run {}", tagged.run);
            None
        }
    }

    /// Wait for the current run to end
    ///
    /// Progress percentages are passed to `on_progress` as they arrive.
    /// Responses of runs replaced by a later generate command are skipped.
    /// With a `timeout` the wait gives up once it has elapsed; the run is
    /// left to the worker, which discards it on the next generate command
    /// or when the handle is dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The run reports an error
    /// - The timeout expires
    /// - The worker exits without a result
    pub fn wait_for_result(
        &self,
        timeout: Option<Duration>,
        mut on_progress: impl FnMut(u8),
    ) -> Result<GeneratedImage> {
        let deadline = timeout.map(|limit| Instant::now() + limit);
        loop {
            let response = self.next_response(deadline).map_err(|e| match (e, timeout) {
                (RecvTimeoutError::Timeout, Some(limit)) => GenerationError::TimedOut { limit },
                _ => runtime_fault("worker response", &"worker exited without a result"),
            })?;

            match response {
                Response::Progress(percent) => on_progress(percent),
                Response::Complete(image) => return Ok(image),
                Response::Error(error) => return Err(error.into()),
            }
        }
    }
}

impl Drop for Worker {
    fn drop(&mut self) {
        let _ = self.commands.send(Command::Stop);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

/// Run owned by the worker thread
struct ActiveRun {
    id: u64,
    engine: GrowthEngine,
    context: RunContext,
    scheduler: Scheduler,
}

enum RunStatus {
    Running(Box<ActiveRun>),
    Ended,
}

fn worker_loop(commands: &Receiver<Command>, responses: &Sender<Tagged>) {
    log::debug!("worker started");
    let mut active: Option<Box<ActiveRun>> = None;
    let mut runs: u64 = 0;

    loop {
        let runnable = active.as_ref().is_some_and(|run| !run.context.is_paused());
        let command = if runnable {
            match commands.try_recv() {
                Ok(command) => Some(command),
                Err(TryRecvError::Empty) => None,
                Err(TryRecvError::Disconnected) => break,
            }
        } else {
            match commands.recv() {
                Ok(command) => Some(command),
                Err(_disconnected) => break,
            }
        };

        if let Some(command) = command {
            match command {
                Command::Generate(request) => {
                    runs += 1;
                    if let Some(run) = active.take() {
                        log::info!("discarding run {} for a new request", run.id);
                    }
                    active = start_run(runs, &request, responses);
                }
                Command::Pause => match active.as_mut() {
                    Some(run) => {
                        run.context.pause();
                        log::info!("run paused at {}%", run.context.percent());
                    }
                    None => log::debug!("pause ignored: no active run"),
                },
                Command::Resume => match active.as_mut() {
                    Some(run) => {
                        run.context.resume();
                        log::info!("run resumed at {}%", run.context.percent());
                    }
                    None => log::debug!("resume ignored: no active run"),
                },
                Command::Stop => break,
            }
            continue;
        }

        if let Some(run) = active.take() {
            active = match advance(run, responses) {
                RunStatus::Running(run) => Some(run),
                RunStatus::Ended => None,
            };
            thread::yield_now();
        }
    }

    log::debug!("worker stopped");
}

fn start_run(
    id: u64,
    request: &GenerationRequest,
    responses: &Sender<Tagged>,
) -> Option<Box<ActiveRun>> {
    let started = panic::catch_unwind(AssertUnwindSafe(|| GrowthEngine::new(request)))
        .unwrap_or_else(|payload| Err(runtime_fault("run setup", &panic_message(&*payload))));

    match started {
        Ok(engine) => {
            let context = RunContext::for_engine(&engine);
            let scheduler = Scheduler::for_engine(&engine);
            Some(Box::new(ActiveRun {
                id,
                engine,
                context,
                scheduler,
            }))
        }
        Err(e) => {
            log::warn!("run {id} rejected: {e}");
            report_error(&e, &mut RunSink {
                run: id,
                channel: responses,
            });
            None
        }
    }
}

fn advance(mut run: Box<ActiveRun>, responses: &Sender<Tagged>) -> RunStatus {
    let mut sink = RunSink {
        run: run.id,
        channel: responses,
    };
    let ActiveRun {
        engine,
        context,
        scheduler,
        ..
    } = &mut *run;

    let sliced = panic::catch_unwind(AssertUnwindSafe(|| {
        scheduler.run_slice(engine, context, &mut sink)
    }))
    .unwrap_or_else(|payload| Err(runtime_fault("growth", &panic_message(&*payload))));

    match sliced {
        Ok(SliceOutcome::Continue | SliceOutcome::Paused) => RunStatus::Running(run),
        Ok(SliceOutcome::Finished(_)) => {
            let ActiveRun {
                engine,
                mut context,
                ..
            } = *run;
            let finished = panic::catch_unwind(AssertUnwindSafe(|| {
                finalize(engine, &mut context, &mut sink)
            }))
            .unwrap_or_else(|payload| Err(runtime_fault("finalize", &panic_message(&*payload))));
            if let Err(e) = finished {
                context.fail();
                log::error!("run failed while finalizing: {e}");
                report_error(&e, &mut sink);
            }
            RunStatus::Ended
        }
        Err(e) => {
            run.context.fail();
            log::error!("run failed: {e}");
            report_error(&e, &mut sink);
            RunStatus::Ended
        }
    }
}

fn report_error(error: &GenerationError, sink: &mut RunSink<'_>) {
    if sink.send(Response::Error(RunError::from(error))).is_err() {
        log::debug!("error report dropped: receiver gone");
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|message| (*message).to_owned())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_owned())
}
