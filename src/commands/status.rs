use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rusqlite::Connection;
use tracing::{info, warn};

use crate::cli::StatusArgs;
use crate::commands::extract::{count_rows, default_db_path};
use crate::model::ExtractRunManifest;

pub fn run(args: StatusArgs) -> Result<()> {
    let manifest_dir = args.cache_root.join("manifests");
    let db_path = args
        .db_path
        .clone()
        .unwrap_or_else(|| default_db_path(&args.cache_root));

    info!(cache_root = %args.cache_root.display(), "status requested");

    match latest_manifest_path(&manifest_dir)? {
        Some(manifest_path) => {
            let raw = fs::read(&manifest_path)
                .with_context(|| format!("failed to read {}", manifest_path.display()))?;
            let manifest: ExtractRunManifest = serde_json::from_slice(&raw)
                .with_context(|| format!("failed to parse {}", manifest_path.display()))?;

            info!(
                run_id = %manifest.run_id,
                status = %manifest.status,
                source = %manifest.source.path,
                doc_id = %manifest.source.doc_id,
                pages = manifest.source.page_count,
                entries = manifest.summary.entries_total,
                unmatched_blocks = manifest.summary.unmatched_blocks,
                warnings = manifest.warnings.len(),
                updated_at = %manifest.updated_at,
                "loaded latest extract manifest"
            );
        }
        None => warn!(path = %manifest_dir.display(), "no extract manifest found"),
    }

    if db_path.exists() {
        let conn = Connection::open(&db_path)
            .with_context(|| format!("failed to open {}", db_path.display()))?;
        let entries = count_rows(&conn, "SELECT COUNT(*) FROM organizations").unwrap_or(0);
        let ministries =
            count_rows(&conn, "SELECT COUNT(DISTINCT ministry) FROM organizations").unwrap_or(0);
        let expanded = count_rows(
            &conn,
            "SELECT COUNT(*) FROM organizations WHERE expanded_from <> ''",
        )
        .unwrap_or(0);
        let aliased = count_rows(
            &conn,
            "SELECT COUNT(*) FROM organizations WHERE bureau_alias <> ''",
        )
        .unwrap_or(0);

        info!(
            path = %db_path.display(),
            entries,
            ministries,
            expanded,
            aliased,
            "database status"
        );
    } else {
        warn!(path = %db_path.display(), "database file missing");
    }

    Ok(())
}

/// Manifest names embed a compact UTC stamp, so the lexically last one is the newest.
fn latest_manifest_path(manifest_dir: &Path) -> Result<Option<PathBuf>> {
    if !manifest_dir.exists() {
        return Ok(None);
    }

    let entries = fs::read_dir(manifest_dir)
        .with_context(|| format!("failed to read {}", manifest_dir.display()))?;

    let mut manifests = Vec::new();
    for entry in entries {
        let entry =
            entry.with_context(|| format!("failed to read entry in {}", manifest_dir.display()))?;
        let path = entry.path();
        let is_manifest = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.starts_with("extract_run_") && name.ends_with(".json"));
        if is_manifest {
            manifests.push(path);
        }
    }

    manifests.sort();
    Ok(manifests.pop())
}
