use super::*;

pub(crate) fn default_db_path(cache_root: &Path) -> PathBuf {
    cache_root.join("kikou.sqlite")
}

pub(crate) fn configure_connection(connection: &Connection) -> Result<()> {
    connection
        .pragma_update(None, "journal_mode", "WAL")
        .context("failed to set journal_mode=WAL")?;
    connection
        .pragma_update(None, "synchronous", "NORMAL")
        .context("failed to set synchronous=NORMAL")?;
    Ok(())
}

pub(crate) fn ensure_schema(connection: &Connection) -> Result<()> {
    connection
        .execute_batch(
            "
            CREATE TABLE IF NOT EXISTS metadata (
              key TEXT PRIMARY KEY,
              value TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS organizations (
              doc_id TEXT NOT NULL,
              seq INTEGER NOT NULL,
              ministry TEXT NOT NULL,
              category TEXT NOT NULL,
              bureau TEXT NOT NULL,
              bureau_alias TEXT NOT NULL DEFAULT '',
              section TEXT NOT NULL,
              expanded_from TEXT NOT NULL DEFAULT '',
              PRIMARY KEY(doc_id, ministry, category, bureau, section)
            );

            CREATE INDEX IF NOT EXISTS idx_organizations_bureau ON organizations(bureau);
            CREATE INDEX IF NOT EXISTS idx_organizations_alias ON organizations(bureau_alias);
            ",
        )
        .context("failed to create output schema")?;

    upsert_metadata(connection, "db_schema_version", DB_SCHEMA_VERSION)?;
    Ok(())
}

pub(crate) fn upsert_metadata(connection: &Connection, key: &str, value: &str) -> Result<()> {
    connection
        .execute(
            "INSERT INTO metadata(key, value) VALUES(?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value=excluded.value",
            params![key, value],
        )
        .with_context(|| format!("failed to write metadata key {key}"))?;
    Ok(())
}

/// Replaces every stored row of `doc_id` with `entries`, in one transaction.
pub(crate) fn replace_entries(
    connection: &mut Connection,
    doc_id: &str,
    entries: &[Entry],
) -> Result<usize> {
    let tx = connection.transaction()?;

    let removed = tx
        .execute("DELETE FROM organizations WHERE doc_id = ?1", params![doc_id])
        .with_context(|| format!("failed to clear previous rows for {doc_id}"))?;
    if removed > 0 {
        info!(doc_id = %doc_id, removed, "cleared previous organization rows");
    }

    {
        let mut statement = tx
            .prepare(
                "
                INSERT INTO organizations(
                  doc_id, seq, ministry, category, bureau, bureau_alias, section, expanded_from
                )
                VALUES(?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                ",
            )
            .context("failed to prepare organization insert")?;

        for (seq, entry) in entries.iter().enumerate() {
            statement
                .execute(params![
                    doc_id,
                    seq as i64,
                    entry.ministry,
                    entry.category,
                    entry.bureau,
                    entry.bureau_alias,
                    entry.section,
                    entry.expanded_from,
                ])
                .with_context(|| {
                    format!(
                        "failed to insert organization row {} / {} / {}",
                        entry.ministry, entry.bureau, entry.section
                    )
                })?;
        }
    }

    tx.commit().context("failed to commit organization rows")?;
    Ok(entries.len())
}

pub(crate) fn count_rows(connection: &Connection, sql: &str) -> Result<i64> {
    let count = connection.query_row(sql, [], |row| row.get(0))?;
    Ok(count)
}
