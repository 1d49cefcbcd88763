use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use crate::core::utils::ensure_dir;
use crate::errors::{FinanceError, FinanceResult};

use super::store::KeyValueStore;

const VALUE_EXTENSION: &str = "json";
const TMP_SUFFIX: &str = "tmp";
const BACKUP_SUFFIX: &str = "bak";

/// Filesystem-backed key-value store: one JSON file per key.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    root: PathBuf,
}

impl JsonFileStore {
    pub fn new(root: PathBuf) -> FinanceResult<Self> {
        ensure_dir(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, key: &str) -> FinanceResult<PathBuf> {
        let slug = canonical_key(key)?;
        Ok(self.root.join(format!("{slug}.{VALUE_EXTENSION}")))
    }
}

impl KeyValueStore for JsonFileStore {
    fn get_item(&self, key: &str) -> FinanceResult<Option<String>> {
        let path = self.path_for(key)?;
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(path)?))
    }

    fn set_item(&self, key: &str, value: &str) -> FinanceResult<()> {
        let path = self.path_for(key)?;
        let tmp = sibling_path(&path, TMP_SUFFIX);
        write_atomic(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn set_items(&self, items: &[(&str, String)]) -> FinanceResult<()> {
        let mut staged = Vec::with_capacity(items.len());
        for (key, value) in items {
            let path = self.path_for(key)?;
            let tmp = sibling_path(&path, TMP_SUFFIX);
            if let Err(err) = write_atomic(&tmp, value) {
                discard(&staged);
                let _ = fs::remove_file(&tmp);
                return Err(err);
            }
            staged.push((tmp, path));
        }

        let mut committed = Vec::with_capacity(staged.len());
        for (tmp, path) in &staged {
            match commit(tmp, path) {
                Ok(done) => committed.push(done),
                Err(err) => {
                    roll_back(&committed);
                    discard(&staged);
                    tracing::warn!(error = %err, "batch write rolled back");
                    return Err(err);
                }
            }
        }
        for done in &committed {
            if let Some(backup) = &done.backup {
                let _ = fs::remove_file(backup);
            }
        }
        Ok(())
    }
}

/// A file replaced during a batch, with the previous contents parked beside it.
struct Committed {
    path: PathBuf,
    backup: Option<PathBuf>,
}

fn commit(tmp: &Path, path: &Path) -> FinanceResult<Committed> {
    let backup = if path.is_file() {
        let backup = sibling_path(path, BACKUP_SUFFIX);
        fs::rename(path, &backup)?;
        Some(backup)
    } else {
        None
    };
    if let Err(err) = fs::rename(tmp, path) {
        if let Some(backup) = &backup {
            let _ = fs::rename(backup, path);
        }
        return Err(err.into());
    }
    Ok(Committed {
        path: path.to_path_buf(),
        backup,
    })
}

fn roll_back(committed: &[Committed]) {
    for done in committed.iter().rev() {
        let restored = match &done.backup {
            Some(backup) => fs::rename(backup, &done.path),
            None => fs::remove_file(&done.path),
        };
        if let Err(err) = restored {
            tracing::error!(
                path = %done.path.display(),
                error = %err,
                "could not restore file after failed batch"
            );
        }
    }
}

fn discard(staged: &[(PathBuf, PathBuf)]) {
    for (tmp, _) in staged {
        let _ = fs::remove_file(tmp);
    }
}

fn canonical_key(key: &str) -> FinanceResult<String> {
    let trimmed = key.trim();
    if trimmed.is_empty()
        || !trimmed
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_'))
    {
        return Err(FinanceError::Persistence(format!(
            "invalid storage key `{key}`"
        )));
    }
    Ok(trimmed.to_string())
}

fn sibling_path(path: &Path, suffix: &str) -> PathBuf {
    let mut sibling = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{existing}.{suffix}"),
        None => suffix.to_string(),
    };
    sibling.set_extension(ext);
    sibling
}

fn write_atomic(path: &Path, data: &str) -> FinanceResult<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}
