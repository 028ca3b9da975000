//! SMTP probe tests against scripted mock servers.
//!
//! Each test binds a `TcpListener` on an ephemeral loopback port and speaks
//! a canned server side of the dialogue, so no real mail server or network
//! access is needed.

use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;

use dnsmx::email::EmailAddress;
use dnsmx::{MxHost, ProbeError, SmtpProbe, Verdict};

/// Spawns a single-connection SMTP server.
///
/// The first entry of `replies` is sent as the greeting; each subsequent
/// entry is sent after one command line has been read. Returns the bound
/// port and a handle resolving to the commands received.
async fn script_server(replies: Vec<&'static str>) -> (u16, tokio::task::JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let port = listener.local_addr().unwrap().port();

    let handle = tokio::spawn(async move {
        let mut received = Vec::new();
        let Ok((stream, _)) = listener.accept().await else {
            return received;
        };
        let (read_half, mut write_half) = stream.into_split();
        let mut reader = BufReader::new(read_half);

        let mut replies = replies.into_iter();
        if let Some(greeting) = replies.next() {
            let _ = write_half.write_all(greeting.as_bytes()).await;
        }

        for reply in replies {
            let mut line = String::new();
            match reader.read_line(&mut line).await {
                Ok(0) | Err(_) => return received,
                Ok(_) => received.push(line.trim_end().to_string()),
            }
            let _ = write_half.write_all(reply.as_bytes()).await;
        }

        // Drain whatever else the client sends (QUIT)
        let mut line = String::new();
        if reader.read_line(&mut line).await.unwrap_or(0) > 0 {
            received.push(line.trim_end().to_string());
        }
        received
    });

    (port, handle)
}

fn test_probe(port: u16) -> SmtpProbe {
    SmtpProbe::new(port, Some("probe.test".into()), None)
        .with_timeouts(Duration::from_secs(2), Duration::from_secs(2))
}

fn addr(s: &str) -> EmailAddress {
    EmailAddress::parse(s).expect("test address should parse")
}

#[tokio::test]
async fn test_probe_deliverable() {
    let (port, server) = script_server(vec![
        "220 mx.test ESMTP ready\r\n",
        "250 mx.test\r\n",
        "250 sender ok\r\n",
        "250 recipient ok\r\n",
    ])
    .await;

    let probe = test_probe(port);
    let verdict = probe
        .verify_mailbox("127.0.0.1", &addr("user@example.com"))
        .await
        .expect("dialogue should complete");

    assert_eq!(verdict.as_str(), "deliverable");
    assert_eq!(verdict.code(), 250);

    let received = server.await.unwrap();
    assert_eq!(
        received,
        vec![
            "HELO probe.test",
            "MAIL FROM:<>",
            "RCPT TO:<user@example.com>",
            "QUIT",
        ]
    );
}

#[tokio::test]
async fn test_probe_rejected_mailbox() {
    let (port, server) = script_server(vec![
        "220 mx.test ESMTP ready\r\n",
        "250 mx.test\r\n",
        "250 sender ok\r\n",
        "550 5.1.1 no such user\r\n",
    ])
    .await;

    let probe = test_probe(port);
    let verdict = probe
        .verify_mailbox("127.0.0.1", &addr("ghost@example.com"))
        .await
        .expect("dialogue should complete");

    match verdict {
        Verdict::Rejected { code, ref message } => {
            assert_eq!(code, 550);
            assert!(message.contains("no such user"));
        }
        other => panic!("Expected Rejected, got {other:?}"),
    }

    let received = server.await.unwrap();
    assert!(received.contains(&"RCPT TO:<ghost@example.com>".to_string()));
}

#[tokio::test]
async fn test_probe_greylisted_is_unverifiable() {
    let (port, _server) = script_server(vec![
        "220 mx.test ESMTP ready\r\n",
        "250 mx.test\r\n",
        "250 sender ok\r\n",
        "450 4.7.1 greylisted, try again later\r\n",
    ])
    .await;

    let probe = test_probe(port);
    let verdict = probe
        .verify_mailbox("127.0.0.1", &addr("user@example.com"))
        .await
        .expect("dialogue should complete");

    assert_eq!(verdict.as_str(), "unverifiable");
    assert_eq!(verdict.code(), 450);
}

#[tokio::test]
async fn test_probe_multiline_replies() {
    let (port, _server) = script_server(vec![
        "220 mx.test ESMTP ready\r\n",
        "250-mx.test greets probe.test\r\n250-SIZE 35882577\r\n250 HELP\r\n",
        "250 sender ok\r\n",
        "250 recipient ok\r\n",
    ])
    .await;

    let probe = test_probe(port);
    let verdict = probe
        .verify_mailbox("127.0.0.1", &addr("user@example.com"))
        .await
        .expect("multiline replies should parse");

    assert_eq!(verdict.as_str(), "deliverable");
}

#[tokio::test]
async fn test_probe_custom_mail_from() {
    let (port, server) = script_server(vec![
        "220 mx.test ESMTP ready\r\n",
        "250 mx.test\r\n",
        "250 sender ok\r\n",
        "250 recipient ok\r\n",
    ])
    .await;

    let probe = SmtpProbe::new(
        port,
        Some("probe.test".into()),
        Some("checker@probe.test".into()),
    )
    .with_timeouts(Duration::from_secs(2), Duration::from_secs(2));
    probe
        .verify_mailbox("127.0.0.1", &addr("user@example.com"))
        .await
        .expect("dialogue should complete");

    let received = server.await.unwrap();
    assert!(received.contains(&"MAIL FROM:<checker@probe.test>".to_string()));
}

#[tokio::test]
async fn test_probe_rejecting_greeting() {
    let (port, _server) = script_server(vec!["554 go away\r\n"]).await;

    let probe = test_probe(port);
    let err = probe
        .verify_mailbox("127.0.0.1", &addr("user@example.com"))
        .await
        .expect_err("554 greeting should abort the probe");

    match err {
        ProbeError::Greeting { code, .. } => assert_eq!(code, 554),
        other => panic!("Expected Greeting error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_probe_rejected_helo() {
    let (port, _server) = script_server(vec![
        "220 mx.test ESMTP ready\r\n",
        "501 syntax error in HELO\r\n",
    ])
    .await;

    let probe = test_probe(port);
    let err = probe
        .verify_mailbox("127.0.0.1", &addr("user@example.com"))
        .await
        .expect_err("rejected HELO should abort the probe");

    assert!(matches!(err, ProbeError::Helo { code: 501, .. }));
}

#[tokio::test]
async fn test_probe_rejected_mail_from() {
    let (port, _server) = script_server(vec![
        "220 mx.test ESMTP ready\r\n",
        "250 mx.test\r\n",
        "550 bounces not welcome\r\n",
    ])
    .await;

    let probe = test_probe(port);
    let err = probe
        .verify_mailbox("127.0.0.1", &addr("user@example.com"))
        .await
        .expect_err("rejected MAIL FROM should abort the probe");

    assert!(matches!(err, ProbeError::MailFrom { code: 550, .. }));
}

#[tokio::test]
async fn test_probe_connection_refused() {
    // Bind and immediately drop a listener to get a port nothing listens on
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let probe = test_probe(port);
    let err = probe
        .verify_mailbox("127.0.0.1", &addr("user@example.com"))
        .await
        .expect_err("connect to closed port should fail");

    assert!(matches!(
        err,
        ProbeError::Connect(_) | ProbeError::ConnectTimeout { .. }
    ));
}

#[tokio::test]
async fn test_probe_server_closes_mid_dialogue() {
    let (port, _server) = script_server(vec!["220 mx.test ESMTP ready\r\n"]).await;

    let probe = test_probe(port);
    let err = probe
        .verify_mailbox("127.0.0.1", &addr("user@example.com"))
        .await
        .expect_err("EOF after greeting should abort the probe");

    assert!(matches!(
        err,
        ProbeError::Io(_) | ProbeError::ReplyTimeout { .. }
    ));
}

#[tokio::test]
async fn test_verify_email_walks_exchangers() {
    let (port, _server) = script_server(vec![
        "220 mx.test ESMTP ready\r\n",
        "250 mx.test\r\n",
        "250 sender ok\r\n",
        "250 recipient ok\r\n",
    ])
    .await;

    // The listener is bound to 127.0.0.1 only, so the first exchanger
    // (another loopback address) refuses the connection and the probe
    // falls through to the second
    let probe = test_probe(port);
    let hosts = vec![MxHost::new(5, "127.1.2.3"), MxHost::new(10, "127.0.0.1")];
    let (verdict, host) = probe
        .verify_email(&hosts, &addr("user@example.com"))
        .await
        .expect("second exchanger should answer");

    assert_eq!(verdict.as_str(), "deliverable");
    assert_eq!(host, "127.0.0.1");
}

#[tokio::test]
async fn test_verify_email_empty_host_list() {
    let probe = test_probe(2525);
    let err = probe
        .verify_email(&[], &addr("user@example.com"))
        .await
        .expect_err("empty host list cannot be probed");

    assert!(matches!(err, ProbeError::AllHostsFailed { attempts: 0 }));
}
