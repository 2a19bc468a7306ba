mod lenient;
mod model;

pub use lenient::{
    DEFAULT_MALFORMED_CUSTOM_AUDIO_QUALITY, DEFAULT_MALFORMED_RATE_LIMIT,
    DEFAULT_MALFORMED_RETRIES, DEFAULT_MALFORMED_SOCKET_TIMEOUT, parse_lenient,
};
pub use model::{
    AudioFormat, ByteUnit, CUSTOM_AUDIO_QUALITY_INDEX, DownloadOptions, ExternalDownloader,
    FixupPolicy, IpVersion, VideoFormat,
};
