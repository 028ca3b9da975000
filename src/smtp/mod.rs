//! SMTP mailbox verification.
//!
//! This module implements the client side of a minimal SMTP dialogue
//! (greeting, HELO, MAIL FROM, RCPT TO, QUIT) used to check whether a mail
//! exchanger accepts a given recipient, without ever transferring a message.

mod probe;
mod reply;

pub use probe::{ProbeError, SmtpProbe, Verdict};
pub use reply::{Reply, ReplyParseError, ReplyParser};
