use crate::options::{AudioFormat, ByteUnit, FixupPolicy};
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber;

#[derive(Debug, Clone)]
pub enum Command {
    Download {
        binary: BinarySelection,
        overrides: DownloadOverrides,
    },
    Update {
        binary: BinarySelection,
    },
    ShowCommand {
        binary: BinarySelection,
        overrides: DownloadOverrides,
    },
}

pub struct Args {
    pub command: Command,
    pub log_level: Level,
}

/// Options file and executable selection, shared by every subcommand.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct BinarySelection {
    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        help = "Options file (yaml, toml or json) providing defaults for every flag"
    )]
    pub config_path: Option<String>,

    #[arg(
        long = "binary",
        value_name = "PATH",
        help = "Path to the youtube-dl executable"
    )]
    pub binary: Option<PathBuf>,

    #[arg(
        long = "embedded",
        help = "Use the youtube-dl copy bundled next to ytdlctl instead of the one on PATH"
    )]
    pub embedded: bool,

    #[arg(
        long = "bundled-dir",
        value_name = "DIR",
        help = "Directory holding the bundled youtube-dl (default: lib/ beside ytdlctl)"
    )]
    pub bundled_dir: Option<PathBuf>,

    #[arg(long = "verbose-output", help = "Pass --verbose to youtube-dl")]
    pub verbose_output: bool,
}

/// Download flags. Numeric values are taken as text and parsed leniently: malformed
/// input falls back to 0 instead of aborting.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct DownloadOverrides {
    #[arg(value_name = "URL", help = "Video, playlist or channel URLs")]
    pub urls: Vec<String>,

    #[arg(
        short = 'o',
        long = "output",
        value_name = "TEMPLATE",
        help = "Output filename template"
    )]
    pub output: Option<String>,

    #[arg(long = "proxy", value_name = "URL", help = "HTTP/HTTPS proxy to use")]
    pub proxy_url: Option<String>,

    #[arg(
        long = "socket-timeout",
        value_name = "SECONDS",
        help = "Time to wait before giving up"
    )]
    pub socket_timeout: Option<String>,

    #[arg(
        short = 'r',
        long = "limit-rate",
        value_name = "RATE",
        help = "Maximum download rate, in --limit-rate-unit per second"
    )]
    pub rate_limit: Option<String>,

    #[arg(long = "limit-rate-unit", value_enum, ignore_case = true)]
    pub rate_limit_unit: Option<ByteUnit>,

    #[arg(
        short = 'R',
        long = "retries",
        value_name = "RETRIES",
        allow_hyphen_values = true,
        help = "Number of retries, or -1 to retry forever"
    )]
    pub retries: Option<String>,

    #[arg(short = 'w', long = "no-overwrites", help = "Do not overwrite files")]
    pub no_overwrites: bool,

    #[arg(
        long = "continue",
        help = "Force resume of partially downloaded files (wins over --no-continue)"
    )]
    pub continue_downloads: bool,

    #[arg(long = "no-continue", help = "Do not resume partially downloaded files")]
    pub no_continue: bool,

    #[arg(short = 'u', long = "username", help = "Login with this account ID")]
    pub username: Option<String>,

    #[arg(short = 'p', long = "password", help = "Account password")]
    pub password: Option<String>,

    #[arg(
        short = '2',
        long = "twofactor",
        value_name = "CODE",
        help = "Two-factor auth code"
    )]
    pub two_factor: Option<String>,

    #[arg(long = "video-password", help = "Video password")]
    pub video_password: Option<String>,

    #[arg(
        short = 'x',
        long = "extract-audio",
        help = "Convert video files to audio-only files"
    )]
    pub extract_audio: bool,

    #[arg(long = "audio-format", value_enum)]
    pub audio_format: Option<AudioFormat>,

    #[arg(
        long = "audio-quality",
        value_name = "INDEX",
        value_parser = clap::value_parser!(u8).range(0..=10),
        help = "VBR quality 0 (best) to 9, or 10 to use --custom-audio-quality"
    )]
    pub audio_quality: Option<u8>,

    #[arg(
        long = "custom-audio-quality",
        value_name = "KBPS",
        help = "Constant bitrate used when --audio-quality is 10"
    )]
    pub custom_audio_quality: Option<String>,

    #[arg(
        short = 'k',
        long = "keep-video",
        help = "Keep the video file after post-processing"
    )]
    pub keep_video: bool,

    #[arg(long = "no-post-overwrites")]
    pub no_post_overwrites: bool,

    #[arg(long = "embed-subs")]
    pub embed_subs: bool,

    #[arg(long = "embed-thumbnail")]
    pub embed_thumbnail: bool,

    #[arg(long = "add-metadata")]
    pub add_metadata: bool,

    #[arg(long = "xattrs")]
    pub xattrs: bool,

    #[arg(long = "fixup", value_enum)]
    pub fixup: Option<FixupPolicy>,

    #[arg(
        long = "exec",
        value_name = "CMD",
        help = "Command to run on each downloaded file, {} is the file name"
    )]
    pub exec_command: Option<String>,

    #[arg(long = "ignore-config", help = "Do not read youtube-dl configuration files")]
    pub ignore_config: bool,

    #[arg(long = "abort-on-error")]
    pub abort_on_error: bool,
}

#[derive(Debug, Parser)]
#[command(
    name = "ytdlctl",
    version,
    author = "Nick Guletskii",
    about = "Run youtube-dl with streamed output, a progress bar and clean cancellation"
)]
struct Cli {
    #[arg(
        short = 'v',
        long = "verbose",
        help = "Sets the level of verbosity",
        action = ArgAction::Count,
        global = true
    )]
    verbose: u8,

    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Debug, Subcommand)]
enum CliCommand {
    /// Download the given URLs with youtube-dl
    Download {
        #[command(flatten)]
        binary: BinarySelection,

        #[command(flatten)]
        overrides: DownloadOverrides,
    },

    /// Let youtube-dl update itself
    Update {
        #[command(flatten)]
        binary: BinarySelection,
    },

    /// Print the youtube-dl command line without running it
    #[command(name = "show-command", visible_alias = "show_command")]
    ShowCommand {
        #[command(flatten)]
        binary: BinarySelection,

        #[command(flatten)]
        overrides: DownloadOverrides,
    },
}

pub fn parse_args() -> Args {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(log_level.into())
                .from_env_lossy(),
        )
        .init();

    let command = match cli.command {
        CliCommand::Download { binary, overrides } => Command::Download { binary, overrides },
        CliCommand::Update { binary } => Command::Update { binary },
        CliCommand::ShowCommand { binary, overrides } => {
            Command::ShowCommand { binary, overrides }
        }
    };

    Args { command, log_level }
}
