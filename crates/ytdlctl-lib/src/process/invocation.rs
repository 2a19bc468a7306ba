use itertools::Itertools;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

/// Flags whose value must never show up in logs.
const SECRET_FLAGS: &[&str] = &["-p", "-2", "--video-password"];
const REDACTED: &str = "********";

/// The resolved executable plus the argument vector it will be started with.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Invocation {
    pub program: PathBuf,
    pub args: Vec<String>,
}

impl Invocation {
    pub fn new(program: PathBuf, args: Vec<String>) -> Self {
        Self { program, args }
    }

    /// Human-readable command line with secrets redacted.
    ///
    /// Display only: the process is always started from `args` directly.
    pub fn command_line(&self) -> String {
        let program = self.program.to_string_lossy();
        let mut redact_next = false;
        let args = self.args.iter().map(|arg| {
            let shown = if redact_next { REDACTED } else { arg.as_str() };
            redact_next = SECRET_FLAGS.contains(&arg.as_str());
            quote_for_display(shown)
        });

        std::iter::once(quote_for_display(&program))
            .chain(args)
            .join(" ")
    }
}

impl Display for Invocation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.command_line())
    }
}

fn quote_for_display(arg: &str) -> String {
    let needs_quoting = arg.is_empty()
        || arg
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '\'' | '"' | '&' | ';' | '|' | '$'));
    if needs_quoting {
        format!("'{}'", arg.replace('\'', r"'\''"))
    } else {
        arg.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invocation(args: &[&str]) -> Invocation {
        Invocation::new(
            PathBuf::from("youtube-dl"),
            args.iter().map(|a| a.to_string()).collect(),
        )
    }

    #[test]
    fn test_plain_command_line() {
        let inv = invocation(&["-o", "%(title)s.%(ext)s", "-R", "10", "--", "https://x.y/z"]);
        assert_eq!(
            inv.command_line(),
            "youtube-dl -o %(title)s.%(ext)s -R 10 -- https://x.y/z"
        );
    }

    #[test]
    fn test_arguments_with_spaces_are_quoted() {
        let inv = invocation(&["--exec", "adb push {} /sdcard/ && rm {}", "-o", "it's"]);
        assert_eq!(
            inv.command_line(),
            r#"youtube-dl --exec 'adb push {} /sdcard/ && rm {}' -o 'it'\''s'"#
        );
    }

    #[test]
    fn test_secrets_are_redacted() {
        let inv = invocation(&[
            "-u",
            "alice",
            "-p",
            "hunter2",
            "-2",
            "123456",
            "--video-password",
            "open sesame",
        ]);
        let line = inv.to_string();

        assert!(line.contains("-u alice"));
        assert!(!line.contains("hunter2"));
        assert!(!line.contains("123456"));
        assert!(!line.contains("sesame"));
        assert_eq!(line.matches(REDACTED).count(), 3);
    }
}
