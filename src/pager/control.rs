// src/pager/control.rs
// =============================================================================
// Turns keystrokes into control signals for the pager session.
//
// Key map:
//   Enter, Space, n, j, k  -> NextPage
//   q                      -> Quit
//   anything else          -> ignored
//
// The reader runs as its own task. When its input ends (or fails) it cancels
// the shared CancellationToken, which tears the whole session down.
// =============================================================================

use tokio::io::{AsyncRead, AsyncReadExt, BufReader};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    NextPage,
    Quit,
}

impl Control {
    /// Maps one input byte to a control, `None` for bytes we ignore.
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            b'q' => Some(Control::Quit),
            b'\n' | b'\r' | b' ' | b'n' | b'j' | b'k' => Some(Control::NextPage),
            _ => None,
        }
    }
}

// Reads `input` byte by byte and forwards controls into `controls`
//
// Stops when:
// - the input reaches end-of-file (normal, e.g. stdin closed)
// - reading fails (reported on stderr)
// - the session is cancelled by someone else
// - the driver hung up its end of the channel
//
// In every case the token is cancelled on the way out.
pub async fn read_controls<R>(input: R, controls: mpsc::Sender<Control>, token: CancellationToken)
where
    R: AsyncRead + Unpin,
{
    let _cancel_on_exit = token.clone().drop_guard();
    let mut input = BufReader::new(input);

    loop {
        let byte = tokio::select! {
            _ = token.cancelled() => return,
            byte = input.read_u8() => byte,
        };

        let byte = match byte {
            Ok(byte) => byte,
            Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                tracing::debug!("control input closed");
                return;
            }
            Err(e) => {
                eprintln!("failed to read from stdin: {}", e);
                return;
            }
        };

        let Some(control) = Control::from_byte(byte) else {
            continue;
        };

        tracing::trace!(?control, "control input");

        tokio::select! {
            _ = token.cancelled() => return,
            sent = controls.send(control) => {
                if sent.is_err() {
                    return;
                }
            }
        }
    }
}
