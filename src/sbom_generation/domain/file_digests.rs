/// FileDigests value object: content hashes of one file, lowercase hex
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDigests {
    pub sha256: String,
    /// Git blob object id, as printed by `git hash-object`
    pub gitoid: String,
}
