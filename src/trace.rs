//! Golden-vector artifact files.
//!
//! Every artifact is a list of signed integers, one per line, separated by
//! `\n` with no newline after the last value. Artifacts of one run are staged
//! as temporary files next to their destination and only renamed into place
//! once all of them were written, so a failed run leaves no truncated trace.
//! Artifacts of an earlier run in the same directory are moved aside while
//! the new set is renamed in and put back if any rename fails.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tempfile::{NamedTempFile, TempPath};

use crate::error::{OlaError, OlaResult};

/// Quantized stimulus.
pub const INPUT_FILE: &str = "anaInputs.txt";
/// Analysis window ROM table.
pub const ANALYSIS_WINDOW_FILE: &str = "analysisWindow_initFile.txt";
/// Synthesis window ROM table.
pub const SYNTHESIS_WINDOW_FILE: &str = "synthesisWindow_initFile.txt";
/// Rounded analysis frames.
pub const ANALYSIS_OUTPUT_FILE: &str = "anaOutputs.txt";
/// Reconstructed output per hop.
pub const SYNTHESIS_OUTPUT_FILE: &str = "synOutputs.txt";

/// Serialize `values` in artifact format.
pub fn format_integers(values: &[i64]) -> String {
    values
        .iter()
        .map(i64::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Parse artifact `text`. A single trailing newline is tolerated.
pub fn parse_integers(text: &str, path: &Path) -> OlaResult<Vec<i64>> {
    let text = text.strip_suffix('\n').unwrap_or(text);
    if text.is_empty() {
        return Ok(Vec::new());
    }
    text.split('\n')
        .enumerate()
        .map(|(i, line)| {
            line.trim().parse::<i64>().map_err(|e| OlaError::Parse {
                path: path.to_path_buf(),
                line: i + 1,
                message: format!("`{}`: {e}", line.trim()),
            })
        })
        .collect()
}

/// Read an artifact file back into integers.
pub fn read_integers(path: impl AsRef<Path>) -> OlaResult<Vec<i64>> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|e| OlaError::io(path, e))?;
    parse_integers(&text, path)
}

/// BLAKE3 digest of the serialized artifact, as lowercase hex.
pub fn fingerprint(values: &[i64]) -> String {
    blake3::hash(format_integers(values).as_bytes())
        .to_hex()
        .to_string()
}

/// An artifact that has been persisted to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenArtifact {
    pub path: PathBuf,
    pub len: usize,
    pub digest: String,
}

/// Stages artifacts of a run and persists them all at once.
///
/// Dropping the writer without calling [`ArtifactWriter::commit`] removes
/// every staged file.
#[derive(Debug)]
pub struct ArtifactWriter {
    dir: PathBuf,
    staged: Vec<(NamedTempFile, WrittenArtifact)>,
}

impl ArtifactWriter {
    /// Create a writer targeting `dir`, creating the directory if needed.
    pub fn new(dir: impl Into<PathBuf>) -> OlaResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| OlaError::io(&dir, e))?;
        Ok(Self {
            dir,
            staged: Vec::new(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write `values` to a temporary file that becomes `file_name` on commit.
    pub fn stage(&mut self, file_name: &str, values: &[i64]) -> OlaResult<()> {
        let path = self.dir.join(file_name);
        let tmp = NamedTempFile::new_in(&self.dir).map_err(|e| OlaError::io(&path, e))?;
        {
            let mut out = BufWriter::new(tmp.as_file());
            out.write_all(format_integers(values).as_bytes())
                .and_then(|_| out.flush())
                .map_err(|e| OlaError::io(&path, e))?;
        }
        log::debug!("staged {} values for {}", values.len(), path.display());
        self.staged.push((
            tmp,
            WrittenArtifact {
                path,
                len: values.len(),
                digest: fingerprint(values),
            },
        ));
        Ok(())
    }

    /// Rename every staged file into place.
    ///
    /// An existing file at a destination is kept as a backup until the whole
    /// set is in place. If a rename fails, the artifacts already persisted by
    /// this call are removed and the backups restored before the error is
    /// returned.
    pub fn commit(self) -> OlaResult<Vec<WrittenArtifact>> {
        let mut done: Vec<(WrittenArtifact, Option<TempPath>)> =
            Vec::with_capacity(self.staged.len());
        for (tmp, artifact) in self.staged {
            let backup = match back_up(&self.dir, &artifact.path) {
                Ok(backup) => backup,
                Err(e) => {
                    roll_back(done);
                    return Err(e);
                }
            };
            if let Err(e) = tmp.persist(&artifact.path) {
                if let Some(backup) = backup {
                    restore(backup, &artifact.path);
                }
                roll_back(done);
                return Err(OlaError::io(&artifact.path, e.error));
            }
            log::info!(
                "wrote {} ({} values, blake3 {})",
                artifact.path.display(),
                artifact.len,
                artifact.digest
            );
            done.push((artifact, backup));
        }
        // dropping the backups deletes the previous run's files
        Ok(done.into_iter().map(|(artifact, _)| artifact).collect())
    }
}

/// Move an existing regular file at `path` to a temporary path in `dir`.
fn back_up(dir: &Path, path: &Path) -> OlaResult<Option<TempPath>> {
    if !path.is_file() {
        return Ok(None);
    }
    let backup = NamedTempFile::new_in(dir)
        .map_err(|e| OlaError::io(path, e))?
        .into_temp_path();
    fs::rename(path, &backup).map_err(|e| OlaError::io(path, e))?;
    log::debug!("moved previous {} aside", path.display());
    Ok(Some(backup))
}

fn restore(backup: TempPath, path: &Path) {
    if let Err(e) = backup.persist(path) {
        log::warn!("could not restore {}: {}", path.display(), e.error);
    }
}

fn roll_back(done: Vec<(WrittenArtifact, Option<TempPath>)>) {
    for (artifact, backup) in done.into_iter().rev() {
        if let Err(e) = fs::remove_file(&artifact.path) {
            log::warn!("could not roll back {}: {e}", artifact.path.display());
        }
        if let Some(backup) = backup {
            restore(backup, &artifact.path);
        }
    }
}
