/// Lifecycle of a single youtube-dl run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunState {
    NotStarted,
    Running,
    /// The child exited on its own. The exit code is reported as-is and is never
    /// interpreted as success or failure.
    Completed { exit_code: Option<i32> },
    /// The run was cancelled and the child was killed.
    Killed,
}

impl RunState {
    pub fn is_finished(&self) -> bool {
        matches!(self, Self::Completed { .. } | Self::Killed)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RunEvent {
    Stdout(String),
    Stderr(String),
    /// Always the last event of a run.
    Exited(RunState),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputStream {
    Stdout,
    Stderr,
}

impl OutputStream {
    pub fn event(&self, line: String) -> RunEvent {
        match self {
            Self::Stdout => RunEvent::Stdout(line),
            Self::Stderr => RunEvent::Stderr(line),
        }
    }
}
