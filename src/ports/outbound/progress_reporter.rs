/// ProgressReporter port for user-facing status output
///
/// Graph discovery, license scanning and hashing can touch tens of
/// thousands of files in a kernel tree; this port is how the use cases
/// tell the user where they are. Nothing reported here ends up in the
/// generated documents.
pub trait ProgressReporter {
    /// One status line, e.g. the graph statistics
    fn report(&self, message: &str);

    /// Position within the running phase
    ///
    /// `total` may grow between calls while discovery keeps finding
    /// new files.
    fn report_progress(&self, current: usize, total: usize, message: Option<&str>);

    /// A warning or recoverable problem; the run continues
    fn report_error(&self, message: &str);

    /// Final line of a phase; ends any running progress display
    fn report_completion(&self, message: &str);
}
