mod controller;
mod invocation;
mod locate;
mod pump;
mod types;

pub use controller::{Controller, Run, RunHandle};
pub use invocation::Invocation;
pub use locate::{DEFAULT_EXECUTABLE_NAME, ExecutableLocator};
pub use types::{OutputStream, RunEvent, RunState};
