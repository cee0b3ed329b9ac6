//! Stderr diagnostics shared by the engine and the gate binary.

/// Prefix an error message so it stands out in mixed stderr output.
pub fn error_message(msg: impl AsRef<str>) -> String {
    format!("distfxn error: {}", msg.as_ref())
}

/// Emit a non-fatal warning on stderr.
pub fn warn(msg: impl AsRef<str>) {
    eprintln!("WARN: {}", msg.as_ref());
}

/// Progress line for long-running gate runs.
pub fn info(msg: impl AsRef<str>) {
    eprintln!("INFO: {}", msg.as_ref());
}
