/// LicensePriority policy for the license and copyright of root packages
///
/// Root packages are not source files, so their license cannot be read
/// from a header. Priority order:
/// 1. the configured package license (if non-empty)
/// 2. the identifier declared in the source tree's `COPYING` file
pub struct LicensePriority;

impl LicensePriority {
    /// Selects the declared license of the output packages
    ///
    /// # Arguments
    /// * `configured` - License expression from the command line or config file
    /// * `copying` - Expression declared in `COPYING`, if any
    ///
    /// # Returns
    /// The selected expression, or None if no license is known
    pub fn select_package_license(
        configured: Option<&str>,
        copying: Option<&str>,
    ) -> Option<String> {
        configured
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .or_else(|| copying.map(str::trim).filter(|l| !l.is_empty()))
            .map(str::to_string)
    }

    /// Selects the copyright text of the output packages
    ///
    /// Falls back to the full content of `COPYING`.
    pub fn select_copyright_text(
        configured: Option<&str>,
        copying_content: Option<&str>,
    ) -> Option<String> {
        configured
            .filter(|t| !t.trim().is_empty())
            .or(copying_content.filter(|t| !t.trim().is_empty()))
            .map(str::to_string)
    }
}
