use crate::error::Error;

/// Diagnostic side channel for failed codec operations.
///
/// Purely observability: callers never branch on it, and without the
/// `tracing` feature it compiles to nothing.
pub(crate) fn trace_err(op: &'static str, field: &str, err: &Error) {
    let _ = (op, field, err);

    #[cfg(feature = "tracing")]
    tracing::debug!(op, field, error = %err, "fiid operation failed");
}

fn dump_enabled() -> bool {
    std::env::var("IPMI_FIID_DEBUG")
        .map(|v| !v.is_empty())
        .unwrap_or(false)
}

/// Hex-dump a wire image on bulk load/extract when `IPMI_FIID_DEBUG` is
/// set in the environment.
pub(crate) fn dump_hex(label: &str, bytes: &[u8]) {
    if !dump_enabled() {
        return;
    }
    let mut out = String::with_capacity(label.len() + bytes.len() * 3 + 4);
    out.push_str(label);
    out.push_str(" (");
    out.push_str(&bytes.len().to_string());
    out.push_str("):");
    for b in bytes {
        out.push(' ');
        out.push_str(&format!("{b:02x}"));
    }

    #[cfg(feature = "tracing")]
    tracing::trace!("{out}");

    #[cfg(not(feature = "tracing"))]
    eprintln!("{out}");
}
