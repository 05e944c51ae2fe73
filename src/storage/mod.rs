//! Ledger persistence.
//!
//! Stores settled projects as one JSON file per project under a ledger
//! directory. Recording is write-once, mirroring the receipt semantics: a
//! second attempt for the same project is rejected rather than silently
//! overwriting the authoritative payout ledger. Writes land in a temp file
//! and are renamed into place, so a crash mid-write never leaves a torn
//! ledger behind. The engine itself never touches storage; transactional
//! persistence remains the web layer's job.

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::settlement::Settlement;

/// Directory-backed store of settlement ledgers, keyed by project id.
#[derive(Debug, Clone)]
pub struct LedgerStore {
    dir: PathBuf,
}

impl LedgerStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn ledger_path(&self, project_id: &str) -> PathBuf {
        self.dir.join(format!("{project_id}.json"))
    }

    /// Whether a ledger has already been recorded for this project.
    pub fn is_recorded(&self, project_id: &str) -> bool {
        self.ledger_path(project_id).exists()
    }

    /// Record a settlement ledger. Write-once: fails if this project
    /// already has one. Returns the path the ledger was written to.
    pub fn record(&self, settlement: &Settlement) -> Result<PathBuf> {
        let project_id = &settlement.project.id;
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create ledger dir {}", self.dir.display()))?;

        let path = self.ledger_path(project_id);
        if path.exists() {
            bail!("Ledger already recorded for project {project_id}");
        }

        let json = serde_json::to_string_pretty(settlement)
            .context("Failed to serialise settlement ledger")?;

        // Temp file + rename keeps the ledger whole even if we die mid-write.
        let tmp = self.dir.join(format!("{project_id}.json.tmp"));
        fs::write(&tmp, &json)
            .with_context(|| format!("Failed to write ledger to {}", tmp.display()))?;
        fs::rename(&tmp, &path)
            .with_context(|| format!("Failed to move ledger into place at {}", path.display()))?;

        info!(
            project_id = %project_id,
            path = %path.display(),
            payouts = settlement.payouts.len(),
            total_paid = %settlement.total_paid(),
            "Ledger recorded"
        );
        Ok(path)
    }

    /// Load the ledger for a project. Returns None if the project has not
    /// been settled (no ledger on disk).
    pub fn load(&self, project_id: &str) -> Result<Option<Settlement>> {
        let path = self.ledger_path(project_id);
        if !path.exists() {
            debug!(project_id, "No ledger on disk");
            return Ok(None);
        }

        let json = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read ledger from {}", path.display()))?;
        let settlement: Settlement = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse ledger from {}", path.display()))?;

        debug!(
            project_id,
            payouts = settlement.payouts.len(),
            "Ledger loaded"
        );
        Ok(Some(settlement))
    }

    /// Remove a project's ledger (testing or operator reset). A missing
    /// ledger is not an error.
    pub fn remove(&self, project_id: &str) -> Result<()> {
        let path = self.ledger_path(project_id);
        if path.exists() {
            fs::remove_file(&path)
                .with_context(|| format!("Failed to delete ledger {}", path.display()))?;
        }
        Ok(())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
