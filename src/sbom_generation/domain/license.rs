use std::sync::Arc;

/// Outcome of looking for a declared license in one file
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LicenseResolution {
    /// Normalized license expression, shared by every file declaring it
    Declared(Arc<str>),
    /// The file carries no license marker (or could not be read)
    NotFound,
}

impl LicenseResolution {
    pub fn expression(&self) -> Option<&str> {
        match self {
            LicenseResolution::Declared(expression) => Some(expression),
            LicenseResolution::NotFound => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expression_accessor() {
        let declared = LicenseResolution::Declared(Arc::from("GPL-2.0-only"));
        assert_eq!(declared.expression(), Some("GPL-2.0-only"));
        assert_eq!(LicenseResolution::NotFound.expression(), None);
    }
}
