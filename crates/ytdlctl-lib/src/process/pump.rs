use super::types::{OutputStream, RunEvent};
use std::io;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncRead, BufReader};
use tokio::sync::mpsc::UnboundedSender;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

/// Reads one line, where `\n`, `\r\n` and a bare `\r` all end a line.
///
/// youtube-dl redraws its progress line with `\r`, so treating it as a terminator
/// is what yields one event per progress update. `\r\n` produces an empty segment,
/// which callers skip. Returns `None` at end of stream.
async fn read_segment<R>(reader: &mut R, buf: &mut Vec<u8>) -> io::Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
{
    loop {
        let (found_terminator, consumed) = {
            let available = reader.fill_buf().await?;
            if available.is_empty() {
                if buf.is_empty() {
                    return Ok(None);
                }
                break;
            }
            match available.iter().position(|b| *b == b'\n' || *b == b'\r') {
                Some(pos) => {
                    buf.extend_from_slice(&available[..pos]);
                    (true, pos + 1)
                }
                None => {
                    buf.extend_from_slice(available);
                    (false, available.len())
                }
            }
        };
        reader.consume(consumed);
        if found_terminator {
            break;
        }
    }

    let line = String::from_utf8_lossy(buf).into_owned();
    buf.clear();
    Ok(Some(line))
}

/// Forwards every non-empty line of `reader` to `events` until end of stream,
/// cancellation, or until nobody is listening anymore.
pub(crate) async fn pump_lines<R>(
    reader: R,
    stream: OutputStream,
    events: UnboundedSender<RunEvent>,
    cancel: CancellationToken,
) where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();

    loop {
        let segment = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!(?stream, "Output pump cancelled");
                break;
            }
            segment = read_segment(&mut reader, &mut buf) => segment,
        };

        match segment {
            Ok(Some(line)) if line.is_empty() => continue,
            Ok(Some(line)) => {
                trace!(?stream, %line, "Output line");
                if events.send(stream.event(line)).is_err() {
                    debug!(?stream, "Event receiver dropped, stopping output pump");
                    break;
                }
            }
            Ok(None) => {
                debug!(?stream, "Output stream closed");
                break;
            }
            Err(err) => {
                warn!(?stream, "Failed to read child output: {}", err);
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncWriteExt;
    use tokio::sync::mpsc;

    async fn segments(input: &[u8]) -> Vec<String> {
        let mut reader = BufReader::new(input);
        let mut buf = Vec::new();
        let mut out = Vec::new();
        while let Some(segment) = read_segment(&mut reader, &mut buf).await.unwrap() {
            out.push(segment);
        }
        out
    }

    async fn pump(input: &'static [u8], stream: OutputStream) -> Vec<RunEvent> {
        let (tx, mut rx) = mpsc::unbounded_channel();
        pump_lines(input, stream, tx, CancellationToken::new()).await;

        let mut events = Vec::new();
        while let Some(event) = rx.recv().await {
            events.push(event);
        }
        events
    }

    #[tokio::test]
    async fn test_newline_terminated_lines() {
        assert_eq!(segments(b"one\ntwo\n").await, vec!["one", "two"]);
    }

    #[tokio::test]
    async fn test_trailing_line_without_terminator() {
        assert_eq!(segments(b"one\ntwo").await, vec!["one", "two"]);
    }

    #[tokio::test]
    async fn test_carriage_returns_split_lines() {
        assert_eq!(
            segments(b"[download]  1.0%\r[download]  2.0%\r\ndone\n").await,
            vec!["[download]  1.0%", "[download]  2.0%", "", "done"]
        );
    }

    #[tokio::test]
    async fn test_invalid_utf8_is_replaced() {
        assert_eq!(segments(b"caf\xe9\n").await, vec!["caf\u{fffd}"]);
    }

    #[tokio::test]
    async fn test_lines_longer_than_buffer() {
        let long = "x".repeat(64 * 1024);
        let input = format!("{long}\nshort\n");
        assert_eq!(segments(input.as_bytes()).await, vec![long, "short".to_string()]);
    }

    #[tokio::test]
    async fn test_pump_emits_one_event_per_non_empty_line() {
        let events = pump(b"first\r\n\nsecond\rthird\n", OutputStream::Stdout).await;

        assert_eq!(
            events,
            vec![
                RunEvent::Stdout("first".to_string()),
                RunEvent::Stdout("second".to_string()),
                RunEvent::Stdout("third".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_pump_tags_stderr() {
        let events = pump(b"ERROR: nope\n", OutputStream::Stderr).await;

        assert_eq!(events, vec![RunEvent::Stderr("ERROR: nope".to_string())]);
    }

    #[tokio::test]
    async fn test_pump_stops_on_cancellation() {
        let (mut writer, reader) = tokio::io::duplex(64);
        let (tx, mut rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        let task = tokio::spawn(pump_lines(reader, OutputStream::Stdout, tx, cancel.clone()));

        writer.write_all(b"hello\n").await.unwrap();
        assert_eq!(rx.recv().await, Some(RunEvent::Stdout("hello".to_string())));

        cancel.cancel();
        task.await.unwrap();
        assert_eq!(rx.recv().await, None);
        drop(writer);
    }

    #[tokio::test]
    async fn test_pump_stops_when_receiver_is_dropped() {
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);

        pump_lines(&b"a\nb\nc\n"[..], OutputStream::Stdout, tx, CancellationToken::new()).await;
    }
}
