use super::*;

pub fn run(args: ExtractArgs) -> Result<()> {
    let started_ts = Utc::now();
    let started_at = now_utc_string();
    let run_id = format!("run-{}", utc_compact_string(started_ts));

    let cache_root = args.cache_root.clone();
    let manifest_dir = cache_root.join("manifests");
    ensure_directory(&manifest_dir)?;

    let manifest_path = args.manifest_path.clone().unwrap_or_else(|| {
        manifest_dir.join(format!(
            "extract_run_{}.json",
            utc_compact_string(started_ts)
        ))
    });
    let db_path = args
        .db_path
        .clone()
        .unwrap_or_else(|| default_db_path(&cache_root));

    info!(cache_root = %cache_root.display(), run_id = %run_id, "starting extract");

    let loaded = load_pages(&args)?;
    let doc_id = doc_id_for(&loaded.source_path);
    let source_sha256 = sha256_file(&loaded.source_path)?;
    info!(
        source = %loaded.source_path.display(),
        doc_id = %doc_id,
        pages = loaded.pages.len(),
        "loaded document text"
    );

    let lookup: Box<dyn NameLookup> = match &args.names_file {
        Some(names_file) => Box::new(load_name_list(names_file)?),
        None => Box::new(RecipientLookup::open(&args.recipients_db)?),
    };
    let recovery = recovery::recover(&loaded.pages, lookup.as_ref())
        .with_context(|| format!("failed to recover organizations from {}", doc_id))?;

    let mut warnings = Vec::new();
    if recovery.summary.ordinals_dropped > 0 {
        warnings.push(format!(
            "{} ordinal range members outside the supported vocabulary were dropped",
            recovery.summary.ordinals_dropped
        ));
    }
    if recovery.summary.orphan_template_lines > 0 {
        warnings.push(format!(
            "{} template lines had no preceding numbered bureau",
            recovery.summary.orphan_template_lines
        ));
    }
    if recovery.entries.is_empty() {
        warn!(doc_id = %doc_id, "no organization entries recovered");
        warnings.push("no organization entries recovered".to_string());
    }

    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            ensure_directory(parent)?;
        }
    }
    let mut connection = Connection::open(&db_path)
        .with_context(|| format!("failed to open {}", db_path.display()))?;
    configure_connection(&connection)?;
    ensure_schema(&connection)?;
    let stored = replace_entries(&mut connection, &doc_id, &recovery.entries)?;
    upsert_metadata(&connection, "last_run_id", &run_id)?;

    if let Some(entries_json) = &args.entries_json {
        write_json_pretty(entries_json, &recovery.entries)?;
        info!(path = %entries_json.display(), entries = stored, "wrote entries json");
    }

    let manifest = ExtractRunManifest {
        manifest_version: 1,
        run_id: run_id.clone(),
        db_schema_version: DB_SCHEMA_VERSION.to_string(),
        status: "completed".to_string(),
        started_at,
        updated_at: now_utc_string(),
        command: render_extract_command(&args),
        tool_versions: collect_tool_versions(&loaded),
        source: SourceDocument {
            path: loaded.source_path.display().to_string(),
            doc_id: doc_id.clone(),
            sha256: source_sha256,
            page_count: loaded.pages.len(),
        },
        paths: ExtractPaths {
            cache_root: cache_root.display().to_string(),
            manifest_dir: manifest_dir.display().to_string(),
            recipients_db_path: args.recipients_db.display().to_string(),
            names_file_path: args
                .names_file
                .as_ref()
                .map(|path| path.display().to_string()),
            db_path: db_path.display().to_string(),
            entries_json_path: args
                .entries_json
                .as_ref()
                .map(|path| path.display().to_string()),
        },
        summary: recovery.summary.clone(),
        warnings,
    };

    write_json_pretty(&manifest_path, &manifest)?;
    info!(path = %manifest_path.display(), "wrote extract run manifest");

    let summary = &recovery.summary;
    info!(
        entries = summary.entries_total,
        ministries = summary.ministries,
        bureaus = summary.unique_bureaus,
        sections = summary.unique_sections,
        expanded = summary.expanded_entries,
        aliases = summary.aliases_assigned,
        "extract completed"
    );

    Ok(())
}
