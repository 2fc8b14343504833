use std::io::{self, BufRead, BufReader, Read, Write};
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::time::{Duration, Instant};

use super::error::ProbeError;

const MAX_LINE_BYTES: usize = 4096;
const MAX_REPLY_LINES: usize = 128;

/// Byte stream the probe talks SMTP over.
pub trait Transport: Read + Write {
    /// Bounds every subsequent read and write. `None` blocks indefinitely.
    fn set_io_timeout(&mut self, timeout: Option<Duration>) -> io::Result<()>;
}

impl Transport for TcpStream {
    fn set_io_timeout(&mut self, timeout: Option<Duration>) -> io::Result<()> {
        self.set_read_timeout(timeout)?;
        self.set_write_timeout(timeout)
    }
}

/// A raw SMTP reply, preserving the numeric status code and message text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpReply {
    pub code: u16,
    pub message: String,
}

impl SmtpReply {
    pub fn is_positive_completion(&self) -> bool {
        (200..300).contains(&self.code)
    }

    pub fn is_permanent_failure(&self) -> bool {
        (500..600).contains(&self.code)
    }
}

/// Opens a TCP connection to `host:port`, trying each resolved address in
/// turn with `timeout` applied to every attempt.
pub(crate) fn connect_host(
    host: &str,
    port: u16,
    timeout: Duration,
) -> Result<TcpStream, ProbeError> {
    let addrs: Vec<SocketAddr> = format!("{host}:{port}")
        .to_socket_addrs()
        .map_err(|source| ProbeError::Resolve {
            host: host.to_string(),
            source,
        })?
        .collect();

    let mut last_err = None;
    for addr in &addrs {
        match TcpStream::connect_timeout(addr, timeout) {
            Ok(stream) => return Ok(stream),
            Err(err) => last_err = Some(err),
        }
    }
    match last_err {
        Some(source) => Err(ProbeError::Connect {
            host: host.to_string(),
            source,
        }),
        None => Err(ProbeError::NoAddress {
            host: host.to_string(),
        }),
    }
}

/// One SMTP conversation. Every read and write is bounded by the remaining
/// time before `deadline`.
pub(crate) struct SmtpSession<S> {
    stream: BufReader<S>,
    deadline: Option<Instant>,
}

impl<S: Transport> SmtpSession<S> {
    pub(crate) fn new(stream: S, deadline: Option<Instant>) -> Self {
        Self {
            stream: BufReader::new(stream),
            deadline,
        }
    }

    /// Sends `command` and reads the reply to it.
    pub(crate) fn command(&mut self, command: &str) -> Result<SmtpReply, ProbeError> {
        self.send_command(command)?;
        self.read_reply()
    }

    pub(crate) fn send_command(&mut self, command: &str) -> Result<(), ProbeError> {
        self.arm()?;
        let mut line = command.as_bytes().to_vec();
        line.extend_from_slice(b"\r\n");
        let stream = self.stream.get_mut();
        stream.write_all(&line).map_err(ProbeError::io)?;
        stream.flush().map_err(ProbeError::io)
    }

    /// Reads one reply, following `NNN-` continuation lines up to the final
    /// `NNN ` line.
    pub(crate) fn read_reply(&mut self) -> Result<SmtpReply, ProbeError> {
        let mut code = None;
        let mut message_lines = Vec::new();
        loop {
            let raw = self.read_line()?;
            let parsed_code = parse_code(&raw)?;
            match code {
                Some(existing) if existing != parsed_code => {
                    return Err(ProbeError::Protocol(format!(
                        "inconsistent SMTP reply codes: {existing} vs {parsed_code}"
                    )));
                }
                Some(_) => {}
                None => code = Some(parsed_code),
            }
            let continuation = raw.as_bytes().get(3).copied() == Some(b'-');
            message_lines.push(raw.get(4..).unwrap_or_default().to_string());
            if !continuation {
                break;
            }
            if message_lines.len() >= MAX_REPLY_LINES {
                return Err(ProbeError::Protocol(format!(
                    "reply exceeds {MAX_REPLY_LINES} lines"
                )));
            }
        }
        let code = code
            .ok_or_else(|| ProbeError::Protocol("SMTP reply missing status code".into()))?;
        Ok(SmtpReply {
            code,
            message: message_lines.join("\n"),
        })
    }

    /// Reads up to and including `\n`, re-arming the deadline before every
    /// underlying read. The terminator is stripped.
    fn read_line(&mut self) -> Result<String, ProbeError> {
        let mut line = Vec::new();
        loop {
            self.arm()?;
            let available = self.stream.fill_buf().map_err(ProbeError::io)?;
            if available.is_empty() {
                return Err(ProbeError::io(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "connection closed while reading reply",
                )));
            }
            let (used, complete) = match available.iter().position(|&b| b == b'\n') {
                Some(end) => (end + 1, true),
                None => (available.len(), false),
            };
            line.extend_from_slice(&available[..used]);
            self.stream.consume(used);
            if complete {
                break;
            }
            if line.len() > MAX_LINE_BYTES {
                return Err(ProbeError::Protocol(format!(
                    "reply line exceeds {MAX_LINE_BYTES} bytes"
                )));
            }
        }
        line.pop();
        if line.last() == Some(&b'\r') {
            line.pop();
        }
        Ok(String::from_utf8_lossy(&line).into_owned())
    }

    fn arm(&mut self) -> Result<(), ProbeError> {
        let timeout = match self.deadline {
            Some(deadline) => {
                let remaining = deadline.saturating_duration_since(Instant::now());
                if remaining.is_zero() {
                    return Err(ProbeError::DeadlineExceeded);
                }
                Some(remaining)
            }
            None => None,
        };
        self.stream
            .get_mut()
            .set_io_timeout(timeout)
            .map_err(ProbeError::io)
    }
}

fn parse_code(line: &str) -> Result<u16, ProbeError> {
    let digits = line
        .get(..3)
        .filter(|part| part.bytes().all(|b| b.is_ascii_digit()))
        .ok_or_else(|| ProbeError::Protocol(format!("invalid SMTP reply: '{line}'")))?;
    digits
        .parse::<u16>()
        .map_err(|_| ProbeError::Protocol(format!("invalid SMTP status code: '{digits}'")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_code_accepts_three_digits() {
        assert_eq!(parse_code("250 ok").expect("code"), 250);
        assert_eq!(parse_code("550").expect("code"), 550);
        assert_eq!(parse_code("220-mx.example ESMTP").expect("code"), 220);
    }

    #[test]
    fn parse_code_rejects_garbage() {
        assert!(parse_code("hi").is_err());
        assert!(parse_code("+25 nope").is_err());
        assert!(parse_code("éé").is_err());
    }

    #[test]
    fn reply_classes() {
        let reply = |code| SmtpReply {
            code,
            message: String::new(),
        };
        assert!(reply(250).is_positive_completion());
        assert!(!reply(451).is_permanent_failure());
        assert!(reply(550).is_permanent_failure());
        assert!(!reply(354).is_positive_completion());
    }
}
