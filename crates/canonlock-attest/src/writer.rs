use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::errors::AttestError;
use crate::receipt::AttestationReceipt;

/// Append-only writer for receipt files.
///
/// Every receipt is created with create-new semantics under
/// `canon_attest_<YYYYmmdd_HHMMSS>.txt`. When that name is taken, by an
/// earlier run in the same second or by a concurrent writer, a numeric
/// suffix is added (`canon_attest_<stamp>_1.txt`, …). Existing receipts are
/// never opened for writing.
#[derive(Debug, Clone)]
pub struct ReceiptWriter {
    dir: PathBuf,
}

impl ReceiptWriter {
    /// Writes receipts into `dir`, creating it on first use.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Writes receipts into `<source-dir>/receipts`.
    pub fn beside(source: &Path) -> Self {
        let parent = source.parent().unwrap_or_else(|| Path::new("."));
        Self::new(parent.join("receipts"))
    }

    /// Target directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Persists `receipt` and returns the path of the new file.
    pub fn write(&self, receipt: &AttestationReceipt) -> Result<PathBuf, AttestError> {
        fs::create_dir_all(&self.dir).map_err(|e| AttestError::io(&self.dir, e))?;
        let stamp = receipt.timestamp.file_stamp();
        let body = receipt.render();

        let mut attempt: u32 = 0;
        loop {
            let name = if attempt == 0 {
                format!("canon_attest_{}.txt", stamp)
            } else {
                format!("canon_attest_{}_{}.txt", stamp, attempt)
            };
            let path = self.dir.join(name);
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => {
                    fill_or_remove(&path, file, |file| {
                        file.write_all(body.as_bytes())?;
                        file.sync_all()
                    })?;
                    return Ok(path);
                }
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => attempt += 1,
                Err(e) => return Err(AttestError::io(&path, e)),
            }
        }
    }
}

/// Runs `fill` on a freshly created receipt file. A failed write leaves no
/// partial receipt behind.
fn fill_or_remove(
    path: &Path,
    mut file: File,
    fill: impl FnOnce(&mut File) -> io::Result<()>,
) -> Result<(), AttestError> {
    fill(&mut file).map_err(|e| {
        drop(file);
        if let Err(cleanup) = fs::remove_file(path) {
            tracing::warn!(path = %path.display(), error = %cleanup, "failed to remove partial receipt");
        }
        AttestError::io(path, e)
    })
}
