use crate::ports::outbound::{BuildTreeReader, DigestRepository, LicenseRepository};
use crate::sbom_generation::domain::FileDigests;
use crate::shared::error::SbomError;
use crate::shared::security::{
    validate_file_size, MAX_LICENSE_HEADER_BYTES, MAX_METADATA_FILE_SIZE,
};
use crate::shared::Result;
use async_trait::async_trait;
use sha1::Sha1;
use sha2::{Digest, Sha256};
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncReadExt;

/// Buffer size used while hashing files
const HASH_BUFFER_SIZE: usize = 64 * 1024;

/// FileSystemReader adapter for reading the source and output trees
///
/// This adapter implements the BuildTreeReader, LicenseRepository and
/// DigestRepository ports on top of `tokio::fs`. Missing files are
/// reported as None; only files that exist but cannot be read are errors.
pub struct FileSystemReader;

impl FileSystemReader {
    pub fn new() -> Self {
        Self
    }
}

impl Default for FileSystemReader {
    fn default() -> Self {
        Self::new()
    }
}

fn read_error(path: &Path, error: io::Error) -> anyhow::Error {
    SbomError::FileReadError {
        path: path.to_path_buf(),
        details: error.to_string(),
    }
    .into()
}

impl FileSystemReader {
    /// Opens a regular file, None if the path does not exist or is not a file
    async fn open_regular_file(&self, path: &Path) -> Result<Option<(fs::File, u64)>> {
        let metadata = match fs::metadata(path).await {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(read_error(path, e)),
        };
        if !metadata.is_file() {
            return Ok(None);
        }

        let file = fs::File::open(path)
            .await
            .map_err(|e| read_error(path, e))?;
        Ok(Some((file, metadata.len())))
    }

    async fn read_limited(&self, path: &Path, max_size: u64) -> Result<Option<String>> {
        let Some((mut file, size)) = self.open_regular_file(path).await? else {
            return Ok(None);
        };
        validate_file_size(size, path, max_size)?;

        let mut bytes = Vec::with_capacity(size as usize);
        file.read_to_end(&mut bytes)
            .await
            .map_err(|e| read_error(path, e))?;
        Ok(Some(String::from_utf8_lossy(&bytes).into_owned()))
    }
}

#[async_trait]
impl BuildTreeReader for FileSystemReader {
    async fn read_text(&self, path: &Path) -> Result<Option<String>> {
        self.read_limited(path, MAX_METADATA_FILE_SIZE).await
    }

    async fn exists(&self, path: &Path) -> bool {
        fs::try_exists(path).await.unwrap_or(false)
    }

    async fn resolve_symlink(&self, path: &Path) -> Result<Option<PathBuf>> {
        match fs::canonicalize(path).await {
            Ok(canonical) if canonical != path => Ok(Some(canonical)),
            Ok(_) => Ok(None),
            // dangling links and missing inputs keep their lexical path
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(read_error(path, e)),
        }
    }
}

#[async_trait]
impl LicenseRepository for FileSystemReader {
    async fn read_header(&self, path: &Path) -> Result<Option<String>> {
        let Some((file, _)) = self.open_regular_file(path).await? else {
            return Ok(None);
        };

        let mut bytes = Vec::with_capacity(MAX_LICENSE_HEADER_BYTES);
        file.take(MAX_LICENSE_HEADER_BYTES as u64)
            .read_to_end(&mut bytes)
            .await
            .map_err(|e| read_error(path, e))?;
        Ok(Some(String::from_utf8_lossy(&bytes).into_owned()))
    }

    async fn read_license_file(&self, path: &Path) -> Result<Option<String>> {
        self.read_limited(path, MAX_METADATA_FILE_SIZE).await
    }
}

#[async_trait]
impl DigestRepository for FileSystemReader {
    async fn digests(&self, path: &Path) -> Result<Option<FileDigests>> {
        let Some((mut file, size)) = self.open_regular_file(path).await? else {
            return Ok(None);
        };

        let mut sha256 = Sha256::new();
        let mut gitoid = Sha1::new();
        gitoid.update(format!("blob {}\0", size).as_bytes());

        let mut buffer = vec![0u8; HASH_BUFFER_SIZE];
        let mut total: u64 = 0;
        loop {
            let read = file
                .read(&mut buffer)
                .await
                .map_err(|e| read_error(path, e))?;
            if read == 0 {
                break;
            }
            sha256.update(&buffer[..read]);
            gitoid.update(&buffer[..read]);
            total += read as u64;
        }
        if total != size {
            return Err(SbomError::FileReadError {
                path: path.to_path_buf(),
                details: format!("file changed size while hashing ({} -> {} bytes)", size, total),
            }
            .into());
        }

        Ok(Some(FileDigests {
            sha256: format!("{:x}", sha256.finalize()),
            gitoid: format!("{:x}", gitoid.finalize()),
        }))
    }
}
