//! Scan Source - streams the neighbor table line by line
//!
//! Output is consumed incrementally; the exit status is checked only after
//! stdout is drained. Any failure discards the whole scan.

use crate::error::ScanError;
use async_trait::async_trait;
use std::process::Stdio;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::process::Command;

/// Default neighbor-table dump
pub const ARP_PROGRAM: &str = "arp";
pub const ARP_ARGS: &[&str] = &["-an"];

/// Something that yields the currently visible link-layer addresses as text lines
#[async_trait]
pub trait ScanSource: Send + Sync {
    /// Call `on_line` for every line, in order; an error means the scan is unusable
    async fn scan(
        &self,
        on_line: &mut (dyn for<'l> FnMut(&'l str) + Send),
    ) -> Result<(), ScanError>;
}

/// Runs an external command and reads its stdout
#[derive(Debug, Clone)]
pub struct ArpScanner {
    program: String,
    args: Vec<String>,
}

impl Default for ArpScanner {
    fn default() -> Self {
        Self::new(ARP_PROGRAM, ARP_ARGS.iter().copied())
    }
}

impl ArpScanner {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Command line as shown in diagnostics
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[async_trait]
impl ScanSource for ArpScanner {
    async fn scan(
        &self,
        on_line: &mut (dyn for<'l> FnMut(&'l str) + Send),
    ) -> Result<(), ScanError> {
        let command = self.command_line();

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| ScanError::Spawn {
                command: command.clone(),
                source,
            })?;

        let stdout = child.stdout.take().ok_or_else(|| ScanError::Spawn {
            command: command.clone(),
            source: std::io::Error::new(std::io::ErrorKind::Other, "stdout not captured"),
        })?;

        stream_lines(BufReader::new(stdout), &command, on_line).await?;

        let status = child.wait().await.map_err(|source| ScanError::Read {
            command: command.clone(),
            source,
        })?;

        if !status.success() {
            return Err(ScanError::Exit {
                command,
                code: status.code(),
            });
        }

        Ok(())
    }
}

/// Feed every `\n`-terminated segment of `reader` to `on_line`
///
/// Split on raw bytes so a stray non-UTF-8 hostname cannot abort the scan.
async fn stream_lines<R>(
    reader: R,
    command: &str,
    on_line: &mut (dyn for<'l> FnMut(&'l str) + Send),
) -> Result<(), ScanError>
where
    R: AsyncBufRead + Unpin,
{
    let mut segments = reader.split(b'\n');
    loop {
        match segments.next_segment().await {
            Ok(Some(bytes)) => {
                let line = String::from_utf8_lossy(&bytes);
                on_line(line.trim_end_matches('\r'));
            }
            Ok(None) => return Ok(()),
            Err(source) => {
                return Err(ScanError::Read {
                    command: command.to_string(),
                    source,
                })
            }
        }
    }
}

/// Replays a fixed set of lines; useful for dry runs and tests
#[derive(Debug, Clone, Default)]
pub struct FixedScan {
    lines: Vec<String>,
}

impl FixedScan {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }
}

#[async_trait]
impl ScanSource for FixedScan {
    async fn scan(
        &self,
        on_line: &mut (dyn for<'l> FnMut(&'l str) + Send),
    ) -> Result<(), ScanError> {
        for line in &self.lines {
            on_line(line);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_command_line() {
        assert_eq!(ArpScanner::default().command_line(), "arp -an");
    }

    #[tokio::test]
    async fn test_fixed_scan_replays_lines() {
        let scan = FixedScan::new(["one", "two"]);
        let mut seen = Vec::new();
        scan.scan(&mut |line: &str| seen.push(line.to_string()))
            .await
            .unwrap();
        assert_eq!(seen, vec!["one", "two"]);
    }

    #[tokio::test]
    async fn test_missing_command_fails_to_spawn() {
        let scanner = ArpScanner::new("mac-presence-no-such-command", Vec::<String>::new());
        let err = scanner.scan(&mut |_: &str| {}).await.unwrap_err();
        assert!(matches!(err, ScanError::Spawn { .. }));
    }

    /// Yields some bytes, then fails like a broken pipe
    struct FailingReader {
        sent: bool,
    }

    impl tokio::io::AsyncRead for FailingReader {
        fn poll_read(
            mut self: std::pin::Pin<&mut Self>,
            _cx: &mut std::task::Context<'_>,
            buf: &mut tokio::io::ReadBuf<'_>,
        ) -> std::task::Poll<std::io::Result<()>> {
            if self.sent {
                return std::task::Poll::Ready(Err(std::io::Error::new(
                    std::io::ErrorKind::BrokenPipe,
                    "pipe closed",
                )));
            }
            self.sent = true;
            buf.put_slice(b"first\nsecond\n");
            std::task::Poll::Ready(Ok(()))
        }
    }

    #[tokio::test]
    async fn test_stream_lines_read_failure() {
        let reader = BufReader::new(FailingReader { sent: false });
        let mut seen = Vec::new();
        let err = stream_lines(reader, "arp -an", &mut |line: &str| {
            seen.push(line.to_string())
        })
        .await
        .unwrap_err();

        match err {
            ScanError::Read { command, source } => {
                assert_eq!(command, "arp -an");
                assert_eq!(source.kind(), std::io::ErrorKind::BrokenPipe);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(seen, vec!["first", "second"]);
    }

    #[tokio::test]
    async fn test_stream_lines_lossy_and_crlf() {
        let reader = BufReader::new(&b"ok\r\nbad \xff byte\nlast"[..]);
        let mut seen = Vec::new();
        stream_lines(reader, "arp -an", &mut |line: &str| seen.push(line.to_string()))
            .await
            .unwrap();

        assert_eq!(seen, vec!["ok", "bad \u{fffd} byte", "last"]);
    }
}
