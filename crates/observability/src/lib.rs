//! Process-wide tracing setup shared by the `billcat` binaries.

pub mod subscriber;

pub use subscriber::LogFormat;

/// Initialize process-wide tracing.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    subscriber::init();
}
