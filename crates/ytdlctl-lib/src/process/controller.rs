use super::invocation::Invocation;
use super::locate::ExecutableLocator;
use super::pump::pump_lines;
use super::types::{OutputStream, RunEvent, RunState};
use crate::args::build_arguments;
use crate::error::YtdlError;
use crate::options::DownloadOptions;
use eyre::eyre;
use futures::future::join_all;
use std::io::ErrorKind;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::{Child, Command};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

/// How long buffered output may keep draining after the child has exited. Pipes
/// inherited by background grandchildren would otherwise stay open indefinitely.
const OUTPUT_DRAIN_GRACE: Duration = Duration::from_millis(500);

/// Starts youtube-dl runs, one at a time.
///
/// The controller remembers the handle of its latest run so that a second
/// [`Controller::start`] while the first one is still going is refused.
#[derive(Debug, Default)]
pub struct Controller {
    locator: ExecutableLocator,
    current: Option<RunHandle>,
}

impl Controller {
    pub fn new(locator: ExecutableLocator) -> Self {
        Self {
            locator,
            current: None,
        }
    }

    /// Resolves the executable and builds the arguments without starting anything.
    pub fn prepare(&self, options: &DownloadOptions) -> Result<Invocation, YtdlError> {
        let program = self.locator.locate()?;
        Ok(Invocation::new(program, build_arguments(options)))
    }

    /// Spawns youtube-dl for `options`. Must be called from within a Tokio runtime.
    ///
    /// The executable is resolved before anything is spawned, so a missing binary
    /// fails with [`YtdlError::ExecutableNotFound`] without side effects.
    #[instrument(skip_all, err)]
    pub fn start(&mut self, options: &DownloadOptions) -> Result<Run, YtdlError> {
        if self.state() == RunState::Running {
            return Err(YtdlError::AlreadyRunning);
        }

        let invocation = self.prepare(options)?;
        let run = spawn_run(invocation)?;
        self.current = Some(run.handle());
        Ok(run)
    }

    /// Cancels the current run, if there is one that has not finished yet.
    pub fn cancel(&self) {
        if let Some(handle) = &self.current {
            handle.cancel();
        }
    }

    pub fn state(&self) -> RunState {
        self.current
            .as_ref()
            .map_or(RunState::NotStarted, RunHandle::state)
    }
}

/// Cheap, cloneable access to a run's state and cancellation.
#[derive(Clone, Debug)]
pub struct RunHandle {
    cancel: CancellationToken,
    state: watch::Receiver<RunState>,
}

impl RunHandle {
    pub fn state(&self) -> RunState {
        *self.state.borrow()
    }

    /// Requests termination of the child and stops the output pumps.
    ///
    /// Does nothing once the run has finished; in particular no kill is attempted
    /// for a child that already exited.
    pub fn cancel(&self) {
        if self.state().is_finished() {
            debug!("Run already finished, nothing to cancel");
            return;
        }
        info!("Cancelling youtube-dl run");
        self.cancel.cancel();
    }

    /// Waits until the run reaches [`RunState::Completed`] or [`RunState::Killed`].
    pub async fn wait(&self) -> RunState {
        let mut state = self.state.clone();
        let finished = state
            .wait_for(RunState::is_finished)
            .await
            .map(|finished| *finished);
        finished.unwrap_or_else(|_| *state.borrow())
    }
}

/// A started youtube-dl process together with its event stream.
#[derive(Debug)]
pub struct Run {
    invocation: Invocation,
    events: UnboundedReceiver<RunEvent>,
    handle: RunHandle,
}

impl Run {
    pub fn invocation(&self) -> &Invocation {
        &self.invocation
    }

    pub fn handle(&self) -> RunHandle {
        self.handle.clone()
    }

    pub fn state(&self) -> RunState {
        self.handle.state()
    }

    pub fn cancel(&self) {
        self.handle.cancel();
    }

    /// Next output line or the final [`RunEvent::Exited`]; `None` once the run is
    /// over and every event has been delivered.
    pub async fn next_event(&mut self) -> Option<RunEvent> {
        self.events.recv().await
    }
}

#[instrument(skip_all, fields(program = %invocation.program.display()), err)]
fn spawn_run(invocation: Invocation) -> Result<Run, YtdlError> {
    let mut command = Command::new(&invocation.program);
    command
        .args(&invocation.args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    // Own process group, so a terminal Ctrl-C does not reach youtube-dl directly
    // and cancellation can take down everything it started.
    #[cfg(unix)]
    command.process_group(0);

    #[cfg(target_os = "windows")]
    command.creation_flags(0x08000000); // CREATE_NO_WINDOW

    let mut child = command.spawn().map_err(|e| match e.kind() {
        ErrorKind::NotFound => YtdlError::ExecutableNotFound {
            name: invocation.program.display().to_string(),
            reason: e.to_string(),
        },
        _ => YtdlError::Spawn {
            program: invocation.program.clone(),
            reason: e.to_string(),
        },
    })?;
    info!(pid = child.id(), command = %invocation, "Started youtube-dl");

    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| eyre!("Child stdout was not captured"))?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| eyre!("Child stderr was not captured"))?;

    let (events_tx, events_rx) = mpsc::unbounded_channel();
    let (state_tx, state_rx) = watch::channel(RunState::Running);
    let cancel = CancellationToken::new();

    let pumps = vec![
        tokio::spawn(pump_lines(
            stdout,
            OutputStream::Stdout,
            events_tx.clone(),
            cancel.child_token(),
        )),
        tokio::spawn(pump_lines(
            stderr,
            OutputStream::Stderr,
            events_tx.clone(),
            cancel.child_token(),
        )),
    ];
    tokio::spawn(supervise(child, pumps, events_tx, state_tx, cancel.clone()));

    Ok(Run {
        invocation,
        events: events_rx,
        handle: RunHandle {
            cancel,
            state: state_rx,
        },
    })
}

/// Waits for the child to exit or for cancellation, then publishes the final state.
async fn supervise(
    mut child: Child,
    mut pumps: Vec<JoinHandle<()>>,
    events: UnboundedSender<RunEvent>,
    state: watch::Sender<RunState>,
    cancel: CancellationToken,
) {
    let final_state = tokio::select! {
        biased;
        status = child.wait() => {
            let exit_code = match status {
                Ok(status) => status.code(),
                Err(err) => {
                    warn!("Failed to wait for youtube-dl: {}", err);
                    None
                }
            };
            info!(?exit_code, "youtube-dl exited");
            let final_state = RunState::Completed { exit_code };
            state.send_replace(final_state);

            tokio::select! {
                drained = tokio::time::timeout(OUTPUT_DRAIN_GRACE, join_all(pumps.iter_mut())) => {
                    if drained.is_err() {
                        debug!("Output still open after exit, a background process holds the pipes");
                    }
                }
                _ = cancel.cancelled() => debug!("Stopped draining output after cancellation"),
            }
            for pump in &pumps {
                pump.abort();
            }
            final_state
        }
        _ = cancel.cancelled() => {
            kill_process_tree(&mut child).await;
            info!("youtube-dl killed");
            state.send_replace(RunState::Killed);
            RunState::Killed
        }
    };

    if events.send(RunEvent::Exited(final_state)).is_err() {
        debug!("Event receiver dropped before the exit notification");
    }
}

/// Kills youtube-dl together with whatever it spawned (ffmpeg, `--exec` commands).
async fn kill_process_tree(child: &mut Child) {
    if let Some(pid) = child.id() {
        kill_process_group(pid).await;
    }
    if let Err(err) = child.kill().await {
        debug!("Kill failed, youtube-dl has probably exited already: {}", err);
    }
}

#[cfg(unix)]
async fn kill_process_group(pid: u32) {
    // The child leads its own process group, so its pid is also the group id.
    let status = Command::new("kill")
        .args(["-KILL", "--", &format!("-{pid}")])
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await;
    match status {
        Ok(status) if status.success() => debug!(pid, "Killed process group"),
        Ok(status) => debug!(pid, %status, "kill did not succeed, the group is probably gone"),
        Err(err) => debug!(pid, "Could not run kill: {}", err),
    }
}

#[cfg(windows)]
async fn kill_process_group(pid: u32) {
    let mut command = Command::new("taskkill");
    command
        .args(["/F", "/T", "/PID", &pid.to_string()])
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .creation_flags(0x08000000); // CREATE_NO_WINDOW
    match command.status().await {
        Ok(status) if status.success() => debug!(pid, "Killed process tree"),
        Ok(status) => debug!(pid, %status, "taskkill did not succeed, the tree is probably gone"),
        Err(err) => debug!(pid, "Could not run taskkill: {}", err),
    }
}

#[cfg(not(any(unix, windows)))]
async fn kill_process_group(_pid: u32) {}
