//! Startup text source: command-line words, else piped stdin, else the text
//! file, else a sample sentence.
//!
//! Piped stdin is only waited on for `STDIN_WAIT`. A writer that holds the pipe
//! open longer is treated as having sent nothing, so startup never hangs.

use std::io::{IsTerminal, Read};
use std::path::Path;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{debug, warn};

pub const SAMPLE_TEXT: &str = "The quick brown fox jumped over the lazy dog.";

/// How long startup waits for piped stdin to reach end of file.
pub const STDIN_WAIT: Duration = Duration::from_millis(250);

/// Expands tabs to four spaces.
pub fn normalize(text: &str) -> String {
    text.replace('\t', "    ")
}

/// Resolves the initial text from `words`, `stdin` and `text_file`, in order.
pub fn initial_text(words: &[String], stdin: Option<String>, text_file: &Path) -> String {
    let mut text = if words.is_empty() {
        stdin.unwrap_or_default()
    } else {
        words.join(" ")
    };
    text = normalize(&text);

    if text.is_empty() {
        text = read_text_file(text_file);
    }
    if text.is_empty() {
        debug!("no input text, showing sample");
        text = SAMPLE_TEXT.to_string();
    }
    text
}

/// Reads piped stdin; `None` when stdin is a terminal or still open after `STDIN_WAIT`.
pub fn read_piped_stdin() -> Result<Option<String>> {
    let stdin = std::io::stdin();
    if stdin.is_terminal() {
        return Ok(None);
    }
    read_until_eof(stdin, STDIN_WAIT)
}

/// Reads `reader` to the end on a helper thread, giving up after `wait`.
///
/// On timeout the helper thread is left blocked in `read` and is reclaimed when
/// the process exits.
fn read_until_eof<R: Read + Send + 'static>(mut reader: R, wait: Duration) -> Result<Option<String>> {
    let (tx, rx) = mpsc::channel();
    thread::Builder::new()
        .name("stdin-reader".into())
        .spawn(move || {
            let mut buf = String::new();
            let result = reader.read_to_string(&mut buf).map(|_| buf);
            // The receiver is gone after a timeout.
            let _ = tx.send(result);
        })
        .context("Failed to spawn stdin reader")?;

    match rx.recv_timeout(wait) {
        Ok(read) => read.map(Some).context("Failed to read text from stdin"),
        Err(_) => {
            warn!("stdin still open after {wait:?}, ignoring it");
            Ok(None)
        }
    }
}

/// A missing or unreadable file reads as empty.
fn read_text_file(path: &Path) -> String {
    match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            debug!("text file {} not read: {e}", path.display());
            String::new()
        }
    }
}
