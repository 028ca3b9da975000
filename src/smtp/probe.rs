//! SMTP mailbox verification probe.
//!
//! The probe speaks the minimal dialogue a mail exchanger needs before it
//! reveals whether it accepts mail for an address:
//!
//! ```text
//! S: 220 greeting        C: HELO <name>
//! S: 250 ...             C: MAIL FROM:<sender>
//! S: 250 ...             C: RCPT TO:<address>
//! S: 250 / 4xx / 5xx     C: QUIT
//! ```
//!
//! No message data is ever transferred. The `RCPT TO` reply is classified
//! into a [`Verdict`]; everything that prevents the dialogue from reaching
//! that reply is a [`ProbeError`].

use std::time::Duration;

use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;

use crate::config::{
    DEFAULT_SMTP_PORT, MAX_SMTP_MESSAGE_LENGTH, SMTP_CONNECT_TIMEOUT_SECS, SMTP_REPLY_TIMEOUT_SECS,
};
use crate::dns::MxHost;
use crate::email::EmailAddress;

use super::reply::{Reply, ReplyParseError, ReplyParser};

/// Errors that abort a probe before `RCPT TO` is answered.
///
/// These correspond to processing failures, not to the mail server's opinion
/// of the mailbox; the latter is expressed as a [`Verdict`].
#[derive(Error, Debug)]
pub enum ProbeError {
    /// TCP connection failed (refused, unreachable, name resolution).
    #[error("failed to connect to mail server: {0}")]
    Connect(#[source] std::io::Error),

    /// TCP connection attempt exceeded the connect timeout.
    #[error("timed out connecting to {host}")]
    ConnectTimeout { host: String },

    /// The server did not answer a command within the reply timeout.
    #[error("timed out waiting for reply to {command}")]
    ReplyTimeout { command: &'static str },

    /// Read or write on the established connection failed.
    #[error("connection error during SMTP dialogue: {0}")]
    Io(#[source] std::io::Error),

    /// The server sent something that is not an SMTP reply.
    #[error("malformed server reply: {0}")]
    MalformedReply(#[from] ReplyParseError),

    /// The greeting was not 220.
    #[error("server refused service in greeting ({code}: {message})")]
    Greeting { code: u16, message: String },

    /// HELO was refused.
    #[error("HELO rejected ({code}: {message})")]
    Helo { code: u16, message: String },

    /// MAIL FROM was refused.
    #[error("MAIL FROM rejected ({code}: {message})")]
    MailFrom { code: u16, message: String },

    /// No mail exchanger could be probed at all.
    #[error("no mail server could be probed ({attempts} attempted)")]
    AllHostsFailed { attempts: usize },
}

/// Outcome of a completed `RCPT TO` exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// The server accepted the recipient (2xx).
    Deliverable { code: u16, message: String },
    /// The server permanently refused the recipient (5xx).
    Rejected { code: u16, message: String },
    /// The server answered with a transient refusal (4xx, greylisting) or
    /// an out-of-spec code; the mailbox may still exist.
    Unverifiable { code: u16, message: String },
}

impl Verdict {
    /// Stable lowercase label used in the database and exports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Deliverable { .. } => "deliverable",
            Verdict::Rejected { .. } => "rejected",
            Verdict::Unverifiable { .. } => "unverifiable",
        }
    }

    /// The `RCPT TO` reply code behind the verdict.
    pub fn code(&self) -> u16 {
        match self {
            Verdict::Deliverable { code, .. }
            | Verdict::Rejected { code, .. }
            | Verdict::Unverifiable { code, .. } => *code,
        }
    }

    /// The `RCPT TO` reply text behind the verdict.
    pub fn message(&self) -> &str {
        match self {
            Verdict::Deliverable { message, .. }
            | Verdict::Rejected { message, .. }
            | Verdict::Unverifiable { message, .. } => message,
        }
    }

    fn from_reply(reply: Reply) -> Self {
        let Reply { code, message } = reply;
        let message = truncate_message(message);
        if (200..300).contains(&code) {
            Verdict::Deliverable { code, message }
        } else if (500..600).contains(&code) {
            Verdict::Rejected { code, message }
        } else {
            Verdict::Unverifiable { code, message }
        }
    }
}

fn truncate_message(mut message: String) -> String {
    if message.len() > MAX_SMTP_MESSAGE_LENGTH {
        // Truncate on a char boundary
        let mut cut = MAX_SMTP_MESSAGE_LENGTH;
        while !message.is_char_boundary(cut) {
            cut -= 1;
        }
        message.truncate(cut);
    }
    message
}

/// SMTP mailbox verification client.
///
/// One probe instance is shared across all checks in a run; it holds the
/// dialogue options and timeouts but no connection state.
#[derive(Debug, Clone)]
pub struct SmtpProbe {
    port: u16,
    helo_name: String,
    mail_from: Option<String>,
    connect_timeout: Duration,
    reply_timeout: Duration,
}

impl Default for SmtpProbe {
    fn default() -> Self {
        Self::new(DEFAULT_SMTP_PORT, None, None)
    }
}

impl SmtpProbe {
    /// Creates a probe.
    ///
    /// # Arguments
    ///
    /// * `port` - SMTP port to connect to
    /// * `helo_name` - Hostname announced in HELO; defaults to the local hostname
    /// * `mail_from` - Envelope sender; `None` uses the null reverse-path `<>`
    pub fn new(port: u16, helo_name: Option<String>, mail_from: Option<String>) -> Self {
        let helo_name = helo_name
            .unwrap_or_else(|| gethostname::gethostname().to_string_lossy().to_string());
        SmtpProbe {
            port,
            helo_name,
            mail_from,
            connect_timeout: Duration::from_secs(SMTP_CONNECT_TIMEOUT_SECS),
            reply_timeout: Duration::from_secs(SMTP_REPLY_TIMEOUT_SECS),
        }
    }

    /// Overrides the connect and per-reply timeouts.
    pub fn with_timeouts(mut self, connect: Duration, reply: Duration) -> Self {
        self.connect_timeout = connect;
        self.reply_timeout = reply;
        self
    }

    /// Verifies a mailbox by walking the mail exchangers in preference order.
    ///
    /// A probe failure on one host moves on to the next; a completed dialogue
    /// is final regardless of its verdict. When every host fails, the last
    /// failure is returned.
    ///
    /// # Returns
    ///
    /// The verdict together with the exchanger hostname that produced it.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::AllHostsFailed`] for an empty host list, or the
    /// last per-host error once all hosts have been tried.
    pub async fn verify_email(
        &self,
        hosts: &[MxHost],
        email: &EmailAddress,
    ) -> Result<(Verdict, String), ProbeError> {
        let mut last_error = None;
        for host in hosts {
            match self.verify_mailbox(&host.exchange, email).await {
                Ok(verdict) => return Ok((verdict, host.exchange.clone())),
                Err(e) => {
                    log::debug!(
                        "probe of {} via {} failed: {e}; trying next exchanger",
                        email,
                        host.exchange
                    );
                    last_error = Some(e);
                }
            }
        }
        Err(last_error.unwrap_or(ProbeError::AllHostsFailed { attempts: 0 }))
    }

    /// Runs one complete dialogue against one mail server.
    pub async fn verify_mailbox(
        &self,
        host: &str,
        email: &EmailAddress,
    ) -> Result<Verdict, ProbeError> {
        let stream = tokio::time::timeout(
            self.connect_timeout,
            TcpStream::connect((host, self.port)),
        )
        .await
        .map_err(|_| ProbeError::ConnectTimeout {
            host: host.to_string(),
        })?
        .map_err(ProbeError::Connect)?;

        let (reader, mut writer) = stream.into_split();
        let mut reader = BufReader::new(reader);

        let greeting = self.read_reply(&mut reader, "greeting").await?;
        if greeting.code != 220 {
            return Err(ProbeError::Greeting {
                code: greeting.code,
                message: truncate_message(greeting.message),
            });
        }

        self.write_line(&mut writer, &format!("HELO {}", self.helo_name))
            .await?;
        let reply = self.read_reply(&mut reader, "HELO").await?;
        if !reply.is_positive() {
            return Err(ProbeError::Helo {
                code: reply.code,
                message: truncate_message(reply.message),
            });
        }

        let sender = match &self.mail_from {
            Some(addr) => format!("MAIL FROM:<{addr}>"),
            None => "MAIL FROM:<>".to_string(),
        };
        self.write_line(&mut writer, &sender).await?;
        let reply = self.read_reply(&mut reader, "MAIL FROM").await?;
        if !reply.is_positive() {
            return Err(ProbeError::MailFrom {
                code: reply.code,
                message: truncate_message(reply.message),
            });
        }

        self.write_line(&mut writer, &format!("RCPT TO:<{email}>"))
            .await?;
        let reply = self.read_reply(&mut reader, "RCPT TO").await?;
        let verdict = Verdict::from_reply(reply);

        // Best effort; the verdict is already decided.
        let _ = self.write_line(&mut writer, "QUIT").await;
        let _ = tokio::time::timeout(self.reply_timeout, async {
            let mut line = String::new();
            let _ = reader.read_line(&mut line).await;
        })
        .await;

        Ok(verdict)
    }

    /// Reads one (possibly multiline) reply.
    async fn read_reply(
        &self,
        reader: &mut BufReader<OwnedReadHalf>,
        command: &'static str,
    ) -> Result<Reply, ProbeError> {
        let mut parser = ReplyParser::new();
        loop {
            let mut line = String::new();
            let n = tokio::time::timeout(self.reply_timeout, reader.read_line(&mut line))
                .await
                .map_err(|_| ProbeError::ReplyTimeout { command })?
                .map_err(ProbeError::Io)?;
            if n == 0 {
                return Err(ProbeError::Io(std::io::Error::new(
                    std::io::ErrorKind::UnexpectedEof,
                    "server closed the connection",
                )));
            }
            log::trace!("< {}", line.trim_end());
            if let Some(reply) = parser.feed(&line)? {
                return Ok(reply);
            }
        }
    }

    async fn write_line(
        &self,
        writer: &mut OwnedWriteHalf,
        line: &str,
    ) -> Result<(), ProbeError> {
        log::trace!("> {line}");
        writer
            .write_all(format!("{line}\r\n").as_bytes())
            .await
            .map_err(ProbeError::Io)
    }
}
