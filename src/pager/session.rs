// src/pager/session.rs
// =============================================================================
// The interactive listing: pages of tags streamed into an external pager.
//
// Three pieces run at the same time and share one CancellationToken:
//
//   stdin ──> read_controls ──(Control)──> drive ──(lines)──> pager stdin
//                                                                │
//   supervisor: waits for the pager to exit OR the token ────────┘
//
// - read_controls (control.rs) turns keystrokes into NextPage / Quit
// - drive pulls one page per NextPage through the Continuation and writes it
//   into the pager's stdin. A full pipe blocks the write, so we never fetch
//   faster than the pager reads.
// - the supervisor kills the pager as soon as the token is cancelled, so a
//   pager blocked on reading never outlives the session
//
// Who cancels the token:
// - the reader, when stdin ends or fails
// - the driver, on Quit or on a fetch error
// - the supervisor, once the pager has exited
//
// When the last page has been written the driver just closes the pipe: the
// pager sees end-of-input and the user can keep scrolling until they quit it.
// =============================================================================

use std::io::ErrorKind;
use std::process::Stdio;

use anyhow::{Context, Result};
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio::process::Command;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use super::control::{read_controls, Control};
use crate::config::Config;
use crate::hub::Continuation;
use crate::output::{format_header, format_image};

/// How a pagination run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Every page was written
    Exhausted,
    /// The user pressed `q` (or the control input went away)
    Quit,
    /// Someone else cancelled the session
    Cancelled,
    /// The pager stopped reading (broken pipe)
    PagerClosed,
}

// The pagination loop
//
// Waits for a control or cancellation. Each NextPage fetches one page through
// the current continuation and writes one line per image to `out`. Stops:
// - when the continuation is exhausted   -> Ok(Exhausted)
// - on Quit or a closed control channel  -> cancels, Ok(Quit)
// - when the token is cancelled          -> Ok(Cancelled)
// - when `out` is a broken pipe          -> Ok(PagerClosed)
// - on a fetch or write error            -> cancels, Err
pub async fn drive<W>(
    first: Continuation,
    controls: &mut mpsc::Receiver<Control>,
    out: &mut W,
    token: &CancellationToken,
) -> Result<Outcome>
where
    W: AsyncWrite + Unpin,
{
    let result = drive_pages(first, controls, out, token).await;
    if matches!(result, Ok(Outcome::Quit) | Err(_)) {
        token.cancel();
    }
    result
}

async fn drive_pages<W>(
    first: Continuation,
    controls: &mut mpsc::Receiver<Control>,
    out: &mut W,
    token: &CancellationToken,
) -> Result<Outcome>
where
    W: AsyncWrite + Unpin,
{
    let mut next = Some(first);

    while let Some(continuation) = next.take() {
        let control = tokio::select! {
            _ = token.cancelled() => return Ok(Outcome::Cancelled),
            control = controls.recv() => control,
        };

        match control {
            Some(Control::NextPage) => {}
            Some(Control::Quit) | None => return Ok(Outcome::Quit),
        }

        tracing::debug!(url = continuation.url(), "fetching next page");

        let page = tokio::select! {
            _ = token.cancelled() => return Ok(Outcome::Cancelled),
            page = continuation.fetch() => page?,
        };

        tracing::debug!(images = page.images.len(), last = page.is_last(), "page received");

        let mut lines = String::new();
        for image in &page.images {
            lines.push_str(&format_image(image));
            lines.push('\n');
        }

        match write_flush(out, lines.as_bytes()).await {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::BrokenPipe => return Ok(Outcome::PagerClosed),
            Err(e) => return Err(e).context("failed to write to pager"),
        }

        next = page.next;
    }

    Ok(Outcome::Exhausted)
}

async fn write_flush<W: AsyncWrite + Unpin>(out: &mut W, bytes: &[u8]) -> std::io::Result<()> {
    out.write_all(bytes).await?;
    out.flush().await
}

/// Runs the interactive listing until the pager exits or the session is
/// cancelled.
///
/// `input` is where keystrokes come from (stdin in the real program). The
/// pager command comes from `config.pager`.
pub async fn run_session<R>(
    config: &Config,
    first: Continuation,
    input: R,
    show_header: bool,
) -> Result<Outcome>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    let token = CancellationToken::new();
    let (controls_tx, mut controls_rx) = mpsc::channel(1);

    // The first page is fetched without waiting for a key press
    controls_tx
        .send(Control::NextPage)
        .await
        .context("failed to queue the first page")?;

    let (program, args) = config.pager_command();
    tracing::debug!(%program, ?args, "starting pager");

    let mut pager = Command::new(&program)
        .args(&args)
        .stdin(Stdio::piped())
        .stdout(Stdio::inherit())
        .kill_on_drop(true)
        .spawn()
        .with_context(|| format!("failed to run pager '{}'", program))?;

    let mut pipe = pager.stdin.take().context("pager has no stdin")?;

    if show_header {
        let header = format!("{}\n", format_header());
        write_flush(&mut pipe, header.as_bytes())
            .await
            .context("failed to write to pager")?;
    }

    let reader = tokio::spawn(read_controls(input, controls_tx, token.clone()));

    let driver = tokio::spawn({
        let token = token.clone();
        async move {
            let result = drive(first, &mut controls_rx, &mut pipe, &token).await;
            // Closing stdin lets the pager see end-of-input
            drop(pipe);
            result
        }
    });

    let pager_exited = tokio::select! {
        status = pager.wait() => {
            let status = match status {
                Ok(status) => status,
                Err(e) => {
                    token.cancel();
                    reader.abort();
                    return Err(e).context("failed to wait for pager");
                }
            };
            if !status.success() && !token.is_cancelled() {
                tracing::warn!(%status, "pager exited with an error");
            }
            true
        }
        _ = token.cancelled() => false,
    };

    if !pager_exited {
        tracing::debug!("session cancelled, stopping pager");
        if let Err(e) = pager.kill().await {
            tracing::debug!(error = %e, "pager already gone");
        }
    }

    token.cancel();
    // A blocked stdin read can't be interrupted; the task is just detached
    reader.abort();

    let outcome = driver.await.context("pager driver task failed")??;
    tracing::debug!(?outcome, "session finished");
    Ok(outcome)
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What is tokio::select!?
//    - Waits on several futures at once and runs the branch of whichever
//      finishes first; the other futures are dropped
//    - We use it so a blocked wait (for a key, for a page) still notices
//      cancellation right away
//
// 2. What is a CancellationToken?
//    - A shared "stop" flag from tokio-util that tasks can also await
//    - Cloning it is cheap; cancelling any clone cancels all of them
//    - drop_guard() cancels it when the guard goes out of scope, so a task
//      cancels the session however it returns
//
// 3. Why mpsc::channel(1)?
//    - A channel with room for one message: the key reader can be at most one
//      key press ahead of the driver
//
// 4. Why is `drive` generic over AsyncWrite?
//    - In the program it writes to the pager's stdin (ChildStdin)
//    - In tests it writes to a Vec<u8> or an in-memory duplex pipe
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hub::{FindOptions, HubClient};
    use serde_json::{json, Value};
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn tags(prefix: &str, count: usize) -> Vec<Value> {
        (0..count)
            .map(|i| {
                json!({
                    "name": format!("{}-{}", prefix, i),
                    "full_size": 1048576,
                    "last_updated": "2024-01-01T12:00:00Z",
                    "digest": format!("sha256:{}", i)
                })
            })
            .collect()
    }

    // Page 1: 25 tags and a link to page 2. Page 2: 10 tags, no next link.
    async fn two_page_server() -> MockServer {
        let server = MockServer::start().await;
        let next = format!(
            "{}/v2/namespaces/library/repositories/nginx/tags?page=2&page_size=25",
            server.uri()
        );

        Mock::given(method("GET"))
            .and(path("/v2/namespaces/library/repositories/nginx/tags"))
            .and(query_param("page", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "count": 35, "next": next, "previous": null, "results": tags("one", 25)
            })))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/v2/namespaces/library/repositories/nginx/tags"))
            .and(query_param("page", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "count": 35, "next": "", "previous": null, "results": tags("two", 10)
            })))
            .mount(&server)
            .await;

        server
    }

    fn config_for(server: &MockServer, pager: &str) -> Config {
        Config::new(&server.uri(), "library", Some(pager)).unwrap()
    }

    fn first_page(config: &Config) -> Continuation {
        HubClient::with_client(reqwest::Client::new(), config)
            .find_images(&FindOptions::new("nginx"))
            .unwrap()
    }

    #[tokio::test]
    async fn test_two_pages_then_stop() {
        let server = two_page_server().await;
        let config = config_for(&server, "cat");
        let token = CancellationToken::new();

        let (tx, mut rx) = mpsc::channel(3);
        for _ in 0..3 {
            tx.send(Control::NextPage).await.unwrap();
        }

        let mut out = Vec::new();
        let outcome = drive(first_page(&config), &mut rx, &mut out, &token).await.unwrap();
        assert_eq!(outcome, Outcome::Exhausted);

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 35);
        assert!(lines[..25].iter().all(|l| l.starts_with("nginx:one-")));
        assert!(lines[25..].iter().all(|l| l.starts_with("nginx:two-")));
        assert!(lines[0].contains("1.00Mib"));

        // Only two requests, and the third signal was never consumed
        assert_eq!(server.received_requests().await.unwrap().len(), 2);
        assert_eq!(rx.try_recv(), Ok(Control::NextPage));
        assert!(!token.is_cancelled());
    }

    #[tokio::test]
    async fn test_quit_stops_fetching() {
        let server = two_page_server().await;
        let config = config_for(&server, "cat");
        let token = CancellationToken::new();

        let (tx, mut rx) = mpsc::channel(3);
        tx.send(Control::NextPage).await.unwrap();
        tx.send(Control::Quit).await.unwrap();
        tx.send(Control::NextPage).await.unwrap();

        let mut out = Vec::new();
        let outcome = drive(first_page(&config), &mut rx, &mut out, &token).await.unwrap();

        assert_eq!(outcome, Outcome::Quit);
        assert!(token.is_cancelled());
        assert_eq!(String::from_utf8(out).unwrap().lines().count(), 25);
        assert_eq!(server.received_requests().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_closed_channel_counts_as_quit() {
        let server = two_page_server().await;
        let config = config_for(&server, "cat");
        let token = CancellationToken::new();

        let (tx, mut rx) = mpsc::channel::<Control>(1);
        drop(tx);

        let mut out = Vec::new();
        let outcome = drive(first_page(&config), &mut rx, &mut out, &token).await.unwrap();
        assert_eq!(outcome, Outcome::Quit);
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_cancelled_before_any_signal() {
        let server = two_page_server().await;
        let config = config_for(&server, "cat");
        let token = CancellationToken::new();
        token.cancel();

        let (_tx, mut rx) = mpsc::channel::<Control>(1);
        let mut out = Vec::new();
        let outcome = drive(first_page(&config), &mut rx, &mut out, &token).await.unwrap();
        assert_eq!(outcome, Outcome::Cancelled);
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_error_cancels_session() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let config = config_for(&server, "cat");
        let token = CancellationToken::new();
        let (tx, mut rx) = mpsc::channel(1);
        tx.send(Control::NextPage).await.unwrap();

        let mut out = Vec::new();
        let err = drive(first_page(&config), &mut rx, &mut out, &token).await.unwrap_err();
        assert!(format!("{:#}", err).contains("503"));
        assert!(token.is_cancelled());
    }

    #[tokio::test]
    async fn test_broken_pipe_means_pager_closed() {
        let server = two_page_server().await;
        let config = config_for(&server, "cat");
        let token = CancellationToken::new();
        let (tx, mut rx) = mpsc::channel(1);
        tx.send(Control::NextPage).await.unwrap();

        let (mut pipe, pager_side) = tokio::io::duplex(64);
        drop(pager_side);

        let outcome = drive(first_page(&config), &mut rx, &mut pipe, &token).await.unwrap();
        assert_eq!(outcome, Outcome::PagerClosed);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_session_quit_kills_pager() {
        let server = two_page_server().await;
        // `cat` keeps running while the driver holds its stdin open, so only
        // the kill on quit can end the session here
        let config = config_for(&server, "cat");

        let (mut keys, input) = tokio::io::duplex(8);
        keys.write_all(b"q").await.unwrap();

        let outcome = run_session(&config, first_page(&config), input, true).await.unwrap();
        assert_eq!(outcome, Outcome::Quit);
        assert_eq!(server.received_requests().await.unwrap().len(), 1);
        drop(keys);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_session_ends_after_last_page() {
        let server = two_page_server().await;
        let config = config_for(&server, "cat");

        // One key after the seeded first page: page 2 is the last one, the
        // pipe closes and `cat` exits on its own
        let (mut keys, input) = tokio::io::duplex(8);
        keys.write_all(b"n").await.unwrap();

        let session = run_session(&config, first_page(&config), input, true);
        let outcome = tokio::time::timeout(std::time::Duration::from_secs(10), session)
            .await
            .expect("session did not end after the last page")
            .unwrap();

        assert_eq!(outcome, Outcome::Exhausted);
        assert_eq!(server.received_requests().await.unwrap().len(), 2);
        drop(keys);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_session_fetch_error_stops_pager() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let config = config_for(&server, "cat");
        let (_keys, input) = tokio::io::duplex(8);

        let session = run_session(&config, first_page(&config), input, false);
        let result = tokio::time::timeout(std::time::Duration::from_secs(10), session)
            .await
            .expect("session did not end after a fetch error");

        let err = result.unwrap_err();
        assert!(format!("{:#}", err).contains("503"));
        assert_eq!(server.received_requests().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_missing_pager_is_an_error() {
        let server = two_page_server().await;
        let config = config_for(&server, "docker-find-no-such-pager --flag");

        let (_keys, input) = tokio::io::duplex(8);
        let err = run_session(&config, first_page(&config), input, false).await.unwrap_err();
        assert!(err.to_string().contains("failed to run pager 'docker-find-no-such-pager'"));
        assert!(server.received_requests().await.unwrap().is_empty());
    }
}
