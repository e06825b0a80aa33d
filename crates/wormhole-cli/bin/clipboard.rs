use std::io::Write;
use std::process::{Command, Stdio};
use wormhole_sync::{Clipboard, ClipboardError};

/// Writes to the system clipboard through the platform's copy utility:
/// `pbcopy` on macOS, `xclip` or `xsel` on Linux, `clip` on Windows.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClipboard;

impl Clipboard for SystemClipboard {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        copy(text)
    }
}

#[cfg(target_os = "macos")]
fn copy(text: &str) -> Result<(), ClipboardError> {
    pipe_to("pbcopy", &[], text)
}

#[cfg(target_os = "linux")]
fn copy(text: &str) -> Result<(), ClipboardError> {
    pipe_to("xclip", &["-selection", "clipboard"], text)
        .or_else(|_| pipe_to("xsel", &["--clipboard", "--input"], text))
}

#[cfg(target_os = "windows")]
fn copy(text: &str) -> Result<(), ClipboardError> {
    pipe_to("clip", &[], text)
}

#[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
fn copy(_text: &str) -> Result<(), ClipboardError> {
    Err(ClipboardError(
        "clipboard not supported on this platform".to_string(),
    ))
}

#[allow(dead_code)]
fn pipe_to(program: &str, args: &[&str], text: &str) -> Result<(), ClipboardError> {
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .spawn()
        .map_err(|e| ClipboardError(format!("failed to spawn {program}: {e}")))?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin
            .write_all(text.as_bytes())
            .map_err(|e| ClipboardError(format!("failed to write to {program}: {e}")))?;
    }

    let status = child
        .wait()
        .map_err(|e| ClipboardError(format!("failed to wait for {program}: {e}")))?;
    if status.success() {
        Ok(())
    } else {
        Err(ClipboardError(format!("{program} exited with {status}")))
    }
}
