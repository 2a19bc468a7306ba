use ytdlctl_lib::cli::{
    ResolvedCommand, parse_args, resolve_command, run_download, run_show_command, run_update,
};
use ytdlctl_lib::error::YtdlError;

#[tokio::main(flavor = "multi_thread")]
async fn main() -> Result<(), YtdlError> {
    color_eyre::install()?;

    let args = parse_args();
    let command = resolve_command(args.command)?;

    match command {
        ResolvedCommand::Download(params) => run_download(params).await?,
        ResolvedCommand::Update(params) => run_update(params).await?,
        ResolvedCommand::ShowCommand(params) => run_show_command(params).await?,
    }

    Ok(())
}
