use crate::cli::follow::follow_run;
use crate::cli::params::RunParams;
use crate::error::YtdlError;
use crate::process::Controller;
use tracing;

pub async fn run_update(params: RunParams) -> Result<(), YtdlError> {
    tracing::info!("Updating {}", params.locator.name());

    let mut controller = Controller::new(params.locator);
    let run = controller.start(&params.options)?;
    follow_run(run).await?;

    Ok(())
}
