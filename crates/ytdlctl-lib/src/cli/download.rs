use crate::cli::follow::follow_run;
use crate::cli::params::RunParams;
use crate::error::YtdlError;
use crate::process::Controller;
use tracing;

pub async fn run_download(params: RunParams) -> Result<(), YtdlError> {
    let RunParams { locator, options } = params;
    tracing::info!(
        "Downloading {} URL(s) with {}",
        options.urls.len(),
        locator.name()
    );

    let mut controller = Controller::new(locator);
    let run = controller.start(&options)?;
    follow_run(run).await?;

    Ok(())
}
