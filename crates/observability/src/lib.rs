//! Tracing/logging setup shared by the binaries.

/// Initialize process-wide logging at `info`, overridable via `RUST_LOG`.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init("info");
}

/// Like [`init`], with a caller-chosen default level (e.g. `debug` for `--verbose`).
pub fn init_with_default(level: &str) {
    tracing::init(level);
}

/// Tracing configuration (filters, layers).
pub mod tracing;
