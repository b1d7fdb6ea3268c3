use serde::Serialize;
use std::fmt;
use uuid::Uuid;

/// Compact prefix of elements shared by every document (agent)
pub const SHARED_PREFIX: &str = "shared";

/// Compact SPDX identifier such as `build:12`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct SpdxId(String);

impl SpdxId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Compact prefix naming the namespace, `build` for `build:12`
    pub fn prefix(&self) -> &str {
        self.0.split_once(':').map(|(prefix, _)| prefix).unwrap_or("")
    }
}

impl fmt::Display for SpdxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// JSON-LD prefix mapping: `prefix` expands to `namespace`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpdxNamespace {
    prefix: String,
    namespace: String,
}

impl SpdxNamespace {
    pub fn new(prefix: &str, id_prefix: &str, uuid: &Uuid) -> Self {
        Self {
            prefix: prefix.to_string(),
            namespace: format!("{}{}/{}#", id_prefix, uuid, prefix),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Expands a compact id of this namespace into its full IRI.
    ///
    /// Needed for properties whose JSON-LD type is a literal (`anyURI`,
    /// `string`), which the SPDX context does not expand.
    pub fn expand(&self, id: &SpdxId) -> Option<String> {
        id.as_str()
            .strip_prefix(self.prefix.as_str())
            .and_then(|rest| rest.strip_prefix(':'))
            .map(|local| format!("{}{}", self.namespace, local))
    }
}

/// Sequential id generator for one namespace
#[derive(Debug, Clone)]
pub struct SpdxIdGenerator {
    namespace: SpdxNamespace,
    counter: usize,
}

impl SpdxIdGenerator {
    pub fn new(namespace: SpdxNamespace) -> Self {
        Self {
            namespace,
            counter: 0,
        }
    }

    pub fn next_id(&mut self) -> SpdxId {
        let id = SpdxId(format!("{}:{}", self.namespace.prefix(), self.counter));
        self.counter += 1;
        id
    }

    pub fn namespace(&self) -> &SpdxNamespace {
        &self.namespace
    }
}
