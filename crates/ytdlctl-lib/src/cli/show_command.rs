use crate::cli::params::RunParams;
use crate::error::YtdlError;
use crate::process::Controller;

/// Prints the command line a download would run, without starting anything.
pub async fn run_show_command(params: RunParams) -> Result<(), YtdlError> {
    let controller = Controller::new(params.locator);
    let invocation = controller.prepare(&params.options)?;
    println!("{invocation}");
    Ok(())
}
