/// Result used throughout the crate.
///
/// Errors are `anyhow::Error`; typed failures are `SbomError` values that
/// callers recover with `downcast_ref` (the binary does so to pick an exit code).
pub type Result<T> = std::result::Result<T, anyhow::Error>;
