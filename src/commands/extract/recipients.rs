use super::*;

const RECIPIENT_EXISTS_SQL: &str =
    "SELECT 1 FROM recipients WHERE recipient_name = ?1 LIMIT 1";

/// Canonical-name lookup over the `recipients` table of the disbursement store.
pub(crate) struct RecipientLookup {
    connection: Connection,
}

impl RecipientLookup {
    pub(crate) fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            bail!("recipients store not found: {}", path.display());
        }

        let connection = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .with_context(|| format!("failed to open {}", path.display()))?;

        Self::from_connection(connection)
            .with_context(|| format!("unusable recipients store: {}", path.display()))
    }

    pub(crate) fn from_connection(connection: Connection) -> Result<Self> {
        let has_table: bool = connection
            .query_row(
                "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type = 'table' AND name = 'recipients'",
                [],
                |row| row.get(0),
            )
            .context("failed to inspect recipients schema")?;
        if !has_table {
            bail!("table 'recipients' is missing");
        }

        Ok(Self { connection })
    }
}

impl NameLookup for RecipientLookup {
    fn exists(&self, name: &str) -> Result<bool> {
        let mut statement = self
            .connection
            .prepare_cached(RECIPIENT_EXISTS_SQL)
            .context("failed to prepare recipient lookup")?;
        statement
            .exists(params![name])
            .with_context(|| format!("failed to look up recipient {name}"))
    }
}

/// Reads a plain name list, one canonical name per line. Blank lines and
/// `#` comments are skipped.
pub(crate) fn load_name_list(path: &Path) -> Result<NameSet> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read name list {}", path.display()))?;

    let names = raw
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .collect::<Vec<&str>>();
    if names.is_empty() {
        bail!("name list {} contains no names", path.display());
    }

    info!(path = %path.display(), names = names.len(), "loaded canonical name list");
    Ok(NameSet::new(names))
}
