//! # Ledger Snapshot Files
//!
//! The CLI keeps world state between invocations as a pretty-printed JSON
//! [`LedgerSnapshot`]. A missing file is an empty ledger.
//!
//! Saving is compare-and-swap on the snapshot height: a session may only
//! replace the file if it still holds the height the session loaded.
//! Otherwise another invocation committed in between and the save is
//! refused, so its transaction is never overwritten.

use std::io::Write;
use std::path::Path;

use anyhow::{bail, Context, Result};

use landreg_ledger::{LedgerSnapshot, MemoryLedger};

fn read_snapshot(path: &Path) -> Result<Option<LedgerSnapshot>> {
    if !path.exists() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read ledger {}", path.display()))?;
    let snapshot = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse ledger {}", path.display()))?;
    Ok(Some(snapshot))
}

/// Load the ledger at `path`, or an empty one if the file does not exist.
pub fn load_ledger(path: &Path) -> Result<MemoryLedger> {
    let Some(snapshot) = read_snapshot(path)? else {
        tracing::debug!(path = %path.display(), "no ledger file, starting empty");
        return Ok(MemoryLedger::new());
    };
    let height = snapshot.height;
    let ledger = MemoryLedger::from_snapshot(snapshot)
        .with_context(|| format!("invalid ledger snapshot {}", path.display()))?;
    tracing::debug!(path = %path.display(), height, keys = ledger.len(), "ledger loaded");
    Ok(ledger)
}

/// Height recorded in the file at `path`; 0 if there is no file yet.
pub fn stored_height(path: &Path) -> Result<u64> {
    Ok(read_snapshot(path)?.map_or(0, |s| s.height))
}

/// Replace the file at `path` with the committed state of `ledger`.
///
/// `loaded_height` is the height the caller loaded. If the file has moved
/// on since, nothing is written and an error is returned. The new content
/// goes to a temporary file in the same directory and is renamed over
/// `path`, so readers never see a partial snapshot.
pub fn save_ledger(path: &Path, ledger: &MemoryLedger, loaded_height: u64) -> Result<()> {
    let parent = match path.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(parent) => {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
            parent
        }
        None => Path::new("."),
    };

    let current = stored_height(path)?;
    if current != loaded_height {
        bail!(
            "ledger {} changed since it was loaded (height {loaded_height}, now {current}); \
             transaction not saved, resubmit it",
            path.display()
        );
    }

    let snapshot = ledger.snapshot()?;
    let json = serde_json::to_string_pretty(&snapshot)?;
    let mut temp = tempfile::NamedTempFile::new_in(parent)
        .with_context(|| format!("failed to create temp file in {}", parent.display()))?;
    temp.write_all(json.as_bytes())
        .context("failed to write ledger temp file")?;
    temp.persist(path)
        .with_context(|| format!("failed to write ledger {}", path.display()))?;
    tracing::debug!(path = %path.display(), height = snapshot.height, "ledger saved");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use landreg_ledger::{LedgerStub, StaticIdentity};

    fn put(ledger: &MemoryLedger, key: &str) {
        let mut tx = ledger.begin(StaticIdentity::new("Org1MSP")).unwrap();
        tx.put_state(key, b"{\"x\":1}".to_vec()).unwrap();
        tx.commit().unwrap();
    }

    #[test]
    fn missing_file_is_empty_ledger() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");
        let ledger = load_ledger(&path).unwrap();
        assert!(ledger.is_empty());
        assert_eq!(ledger.height(), 0);
        assert_eq!(stored_height(&path).unwrap(), 0);
    }

    #[test]
    fn save_then_load_preserves_state() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("ledger.json");

        let ledger = MemoryLedger::new();
        put(&ledger, "land/a");
        save_ledger(&path, &ledger, 0).unwrap();

        let loaded = load_ledger(&path).unwrap();
        assert_eq!(loaded.height(), 1);
        assert_eq!(stored_height(&path).unwrap(), 1);
        assert_eq!(loaded.get("land/a"), Some(b"{\"x\":1}".to_vec()));
    }

    #[test]
    fn overlapping_sessions_cannot_overwrite_each_other() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.json");

        let first = load_ledger(&path).unwrap();
        let second = load_ledger(&path).unwrap();
        put(&first, "land/a");
        put(&second, "land/b");

        save_ledger(&path, &first, 0).unwrap();
        let err = save_ledger(&path, &second, 0).unwrap_err();
        assert!(err.to_string().contains("changed since it was loaded"));

        let on_disk = load_ledger(&path).unwrap();
        assert_eq!(on_disk.keys_with_prefix("land/"), vec!["land/a".to_string()]);
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.json");
        std::fs::write(&path, "not json").unwrap();
        let err = load_ledger(&path).unwrap_err();
        assert!(err.to_string().contains("failed to parse ledger"));
    }

    #[test]
    fn refused_save_leaves_no_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.json");
        let ledger = MemoryLedger::new();
        put(&ledger, "land/a");
        save_ledger(&path, &ledger, 0).unwrap();
        assert!(save_ledger(&path, &ledger, 0).is_err());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }
}
