use crate::error::YtdlError;
use crate::process::{Run, RunEvent, RunState};
use crate::progress::parse_percent;
use eyre::WrapErr;
use indicatif::{ProgressBar, ProgressStyle};
use tracing;

/// Streams the output of `run` to the terminal until it finishes.
///
/// Standard output goes to stdout and standard error to stderr, both printed above
/// a progress bar fed from the percentages youtube-dl reports. Ctrl-C kills the run.
pub(crate) async fn follow_run(mut run: Run) -> Result<RunState, YtdlError> {
    println!("Running the following command:\n{}", run.invocation());

    let pb = ProgressBar::new(100);
    pb.set_style(
        ProgressStyle::with_template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos:>3}% {msg}")
            .wrap_err("Invalid progress bar template")?
            .progress_chars("#>-"),
    );

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    let mut interrupted = false;

    let final_state = loop {
        tokio::select! {
            result = &mut ctrl_c, if !interrupted => {
                interrupted = true;
                match result {
                    Ok(()) => run.cancel(),
                    Err(err) => tracing::warn!("Could not listen for Ctrl-C: {}", err),
                }
            }
            event = run.next_event() => match event {
                Some(RunEvent::Stdout(line)) => {
                    if let Some(fraction) = parse_percent(&line) {
                        pb.set_position((fraction * 100.0).round() as u64);
                    }
                    pb.suspend(|| println!("{line}"));
                }
                Some(RunEvent::Stderr(line)) => pb.suspend(|| eprintln!("{line}")),
                Some(RunEvent::Exited(state)) => break state,
                None => break run.state(),
            }
        }
    };

    match final_state {
        RunState::Killed => {
            pb.abandon_with_message("cancelled");
            println!("Process killed.");
        }
        RunState::Completed { exit_code: Some(0) } => {
            pb.finish_with_message("done");
            tracing::info!("youtube-dl finished successfully");
        }
        RunState::Completed { exit_code } => {
            pb.abandon_with_message("failed");
            match exit_code {
                Some(code) => tracing::warn!("youtube-dl exited with code {}", code),
                None => tracing::warn!("youtube-dl was terminated by a signal"),
            }
        }
        RunState::NotStarted | RunState::Running => {
            pb.abandon();
            tracing::warn!(state = ?final_state, "Lost track of the youtube-dl run");
        }
    }

    Ok(final_state)
}
