use crate::ports::outbound::UsedFilesFormatter;

/// PlainUsedFilesFormatter adapter for the used-files report
///
/// One file name per line, lexically sorted, without duplicates.
pub struct PlainUsedFilesFormatter;

impl PlainUsedFilesFormatter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PlainUsedFilesFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl UsedFilesFormatter for PlainUsedFilesFormatter {
    fn format(&self, used_files: &[String]) -> String {
        let mut names: Vec<&str> = used_files.iter().map(String::as_str).collect();
        names.sort_unstable();
        names.dedup();

        let mut output = String::new();
        for name in names {
            output.push_str(name);
            output.push('\n');
        }
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_sorted_unique_lines() {
        let files = vec![
            "init/main.c".to_string(),
            "include/linux/kernel.h".to_string(),
            "init/main.c".to_string(),
        ];

        let report = PlainUsedFilesFormatter::new().format(&files);

        assert_eq!(report, "include/linux/kernel.h\ninit/main.c\n");
    }

    #[test]
    fn test_format_empty_list() {
        assert_eq!(PlainUsedFilesFormatter::default().format(&[]), "");
    }
}
