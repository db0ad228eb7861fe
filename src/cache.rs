//! Build ledger for reproducible, incremental output.
//!
//! Every page the generator writes passes through a [`BuildLedger`], which
//! remembers the SHA-256 of the bytes last written to each output path. A page
//! whose bytes have not changed and whose file is still on disk is not
//! rewritten, so modification times only move for pages that actually
//! changed.
//!
//! The ledger doubles as a reproducibility check: rendering is deterministic,
//! so rebuilding an unchanged dataset must report every page
//! [`WriteStatus::Unchanged`].
//!
//! ## Storage
//!
//! The ledger is a JSON file at `<output_dir>/.build-manifest.json`, keyed by
//! output path relative to the output directory. Keys are kept in a
//! `BTreeMap` so the file itself is byte-stable between identical builds.
//!
//! ## Invalidation
//!
//! A ledger with a different [`LEDGER_VERSION`], or one that fails to parse,
//! is discarded and the build starts from an empty ledger. Every page is then
//! rewritten and reported as [`WriteStatus::Updated`] (file present) or
//! [`WriteStatus::Created`].

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Name of the ledger file within the output directory.
const LEDGER_FILENAME: &str = ".build-manifest.json";

/// Version of the ledger format. Bump to invalidate existing ledgers.
pub const LEDGER_VERSION: u32 = 1;

/// What happened to one output file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteStatus {
    Created,
    Updated,
    Unchanged,
}

/// On-disk map of output path → SHA-256 of the bytes last written there.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildLedger {
    pub version: u32,
    pub entries: BTreeMap<String, String>,
}

impl BuildLedger {
    /// Empty ledger (first build, or an old/corrupt ledger was discarded).
    pub fn empty() -> Self {
        Self {
            version: LEDGER_VERSION,
            entries: BTreeMap::new(),
        }
    }

    /// Load from the output directory. Returns an empty ledger if the file
    /// doesn't exist or can't be parsed (version mismatch, corruption).
    pub fn load(output_dir: &Path) -> Self {
        let path = ledger_path(output_dir);
        let content = match fs::read_to_string(&path) {
            Ok(c) => c,
            Err(_) => return Self::empty(),
        };
        let ledger: Self = match serde_json::from_str(&content) {
            Ok(l) => l,
            Err(err) => {
                debug!(%err, "discarding unreadable build ledger");
                return Self::empty();
            }
        };
        if ledger.version != LEDGER_VERSION {
            debug!(found = ledger.version, "discarding build ledger from another version");
            return Self::empty();
        }
        ledger
    }

    /// Save to the output directory.
    pub fn save(&self, output_dir: &Path) -> io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(ledger_path(output_dir), json)
    }

    /// Write `bytes` to `output_dir/rel_path` unless the ledger shows the
    /// same content is already there.
    pub fn write(
        &mut self,
        output_dir: &Path,
        rel_path: &str,
        bytes: &[u8],
    ) -> io::Result<WriteStatus> {
        let target = output_dir.join(rel_path);
        let digest = hash_bytes(bytes);
        let exists = target.is_file();

        if exists && self.entries.get(rel_path) == Some(&digest) {
            return Ok(WriteStatus::Unchanged);
        }

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&target, bytes)?;
        self.entries.insert(rel_path.to_string(), digest);
        Ok(if exists {
            WriteStatus::Updated
        } else {
            WriteStatus::Created
        })
    }

    /// Drop entries whose path is not in `keep`. Returns the dropped paths.
    ///
    /// Stale files are left on disk; only the ledger forgets them.
    pub fn retain_paths<'a>(&mut self, keep: impl IntoIterator<Item = &'a str>) -> Vec<String> {
        let keep: std::collections::HashSet<&str> = keep.into_iter().collect();
        let stale: Vec<String> = self
            .entries
            .keys()
            .filter(|k| !keep.contains(k.as_str()))
            .cloned()
            .collect();
        for key in &stale {
            self.entries.remove(key);
        }
        stale
    }
}

/// SHA-256 of a byte slice, returned as a hex string.
pub fn hash_bytes(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

/// Resolve the ledger path for an output directory.
pub fn ledger_path(output_dir: &Path) -> PathBuf {
    output_dir.join(LEDGER_FILENAME)
}

/// Summary of ledger outcomes for a build run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LedgerStats {
    pub created: u32,
    pub updated: u32,
    pub unchanged: u32,
}

impl LedgerStats {
    pub fn record(&mut self, status: WriteStatus) {
        match status {
            WriteStatus::Created => self.created += 1,
            WriteStatus::Updated => self.updated += 1,
            WriteStatus::Unchanged => self.unchanged += 1,
        }
    }

    pub fn total(&self) -> u32 {
        self.created + self.updated + self.unchanged
    }

    /// True when the run wrote nothing new.
    pub fn is_reproduction(&self) -> bool {
        self.total() > 0 && self.unchanged == self.total()
    }
}

impl fmt::Display for LedgerStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.created == 0 && self.updated == 0 {
            write!(f, "{} unchanged", self.unchanged)
        } else {
            write!(
                f,
                "{} created, {} updated, {} unchanged ({} total)",
                self.created,
                self.updated,
                self.unchanged,
                self.total()
            )
        }
    }
}
