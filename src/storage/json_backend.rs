use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use crate::{
    core::utils::{ensure_dir, PathResolver},
    errors::ExpenseError,
    ledger::Ledger,
};

use super::{Result, StorageBackend};

const LEDGER_EXTENSION: &str = "json";
const TMP_SUFFIX: &str = "tmp";

/// Stores each ledger as a pretty-printed JSON file named after its slug.
#[derive(Clone)]
pub struct JsonStorage {
    ledgers_dir: PathBuf,
}

impl JsonStorage {
    /// `root` is the application base directory; ledgers live in `root/ledgers`.
    pub fn new(root: Option<PathBuf>) -> Result<Self> {
        let app_root = PathResolver::resolve_base(root);
        let ledgers_dir = PathResolver::ledger_dir_in(&app_root);
        ensure_dir(&ledgers_dir)?;
        Ok(Self { ledgers_dir })
    }
}

impl StorageBackend for JsonStorage {
    fn save(&self, ledger: &Ledger, name: &str) -> Result<PathBuf> {
        let path = self.ledger_path(name);
        save_ledger_to_path(ledger, &path)?;
        tracing::debug!(path = %path.display(), "ledger saved");
        Ok(path)
    }

    fn load(&self, name: &str) -> Result<Ledger> {
        let path = self.ledger_path(name);
        if !path.exists() {
            return Err(ExpenseError::StorageError(format!(
                "ledger `{}` not found",
                name
            )));
        }
        load_ledger_from_path(&path)
    }

    fn exists(&self, name: &str) -> bool {
        self.ledger_path(name).exists()
    }

    fn list(&self) -> Result<Vec<String>> {
        if !self.ledgers_dir.exists() {
            return Ok(Vec::new());
        }
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.ledgers_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(LEDGER_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    fn remove(&self, name: &str) -> Result<()> {
        let path = self.ledger_path(name);
        if !path.exists() {
            return Err(ExpenseError::StorageError(format!(
                "ledger `{}` not found",
                name
            )));
        }
        fs::remove_file(path)?;
        Ok(())
    }

    fn ledger_path(&self, name: &str) -> PathBuf {
        self.ledgers_dir
            .join(format!("{}.{}", canonical_name(name), LEDGER_EXTENSION))
    }
}

pub fn save_ledger_to_path(ledger: &Ledger, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let json = serde_json::to_string_pretty(ledger)?;
    let tmp = tmp_path(path);
    write_atomic(&tmp, &json)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

pub fn load_ledger_from_path(path: &Path) -> Result<Ledger> {
    let data = fs::read_to_string(path)?;
    let ledger: Ledger = serde_json::from_str(&data)?;
    Ok(ledger)
}

pub(crate) fn canonical_name(name: &str) -> String {
    let sanitized: String = name
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'a'..='z' | '0'..='9' | '-' => c,
            _ => '_',
        })
        .collect();
    if sanitized.trim_matches('_').is_empty() {
        "ledger".into()
    } else {
        sanitized
    }
}

pub(crate) fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

pub(crate) fn write_atomic(path: &Path, data: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}
