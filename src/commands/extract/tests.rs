use super::*;

fn recipients_connection(names: &[&str]) -> Connection {
    let connection = Connection::open_in_memory().expect("in-memory db should open");
    connection
        .execute_batch("CREATE TABLE recipients (recipient_name TEXT NOT NULL, amount INTEGER);")
        .expect("recipients table should be created");
    for name in names {
        connection
            .execute(
                "INSERT INTO recipients(recipient_name, amount) VALUES(?1, 0)",
                params![name],
            )
            .expect("recipient row should insert");
    }
    connection
}

fn entry(bureau: &str, section: &str) -> Entry {
    Entry {
        ministry: "外務省".to_string(),
        category: "内部部局".to_string(),
        bureau: bureau.to_string(),
        section: section.to_string(),
        ..Entry::default()
    }
}

fn extract_args(text: PathBuf) -> ExtractArgs {
    ExtractArgs {
        pdf: None,
        text: Some(text),
        layout: false,
        max_pages: None,
        cache_root: PathBuf::from(".cache/kikou"),
        recipients_db: PathBuf::from("data/result/recipients.db"),
        names_file: None,
        db_path: None,
        entries_json: None,
        manifest_path: None,
    }
}

#[test]
fn split_pages_drops_nul_and_trailing_blank_pages() {
    let pages = split_pages("Ⅰ 外務省\u{0000}\n\u{000C}  大臣官房\n\u{000C}  \n\u{000C}");
    assert_eq!(pages, vec!["Ⅰ 外務省\n", "  大臣官房\n"]);
}

#[test]
fn load_pages_reads_form_feed_text_and_honours_max_pages() {
    let path = std::env::temp_dir().join(format!(
        "kikou_pages_{}_{}.txt",
        std::process::id(),
        Utc::now().timestamp_nanos_opt().unwrap_or_default()
    ));
    fs::write(&path, "  Ⅰ 外務省\u{000C}  大臣官房\u{000C}  総務局\n").expect("fixture should write");

    let mut args = extract_args(path.clone());
    args.max_pages = Some(2);
    let loaded = load_pages(&args).expect("text pages should load");
    let _ = fs::remove_file(&path);

    assert_eq!(loaded.pages, vec!["  Ⅰ 外務省", "  大臣官房"]);
    assert_eq!(loaded.source_path, path);
    assert!(loaded.pdftotext_version.is_none());
}

#[test]
fn recipient_lookup_reports_known_names() {
    let lookup = RecipientLookup::from_connection(recipients_connection(&["九州防衛局"]))
        .expect("lookup should accept recipients table");

    assert!(lookup.exists("九州防衛局").expect("lookup should succeed"));
    assert!(!lookup.exists("九州地方防衛局").expect("lookup should succeed"));
}

#[test]
fn recipient_lookup_rejects_store_without_recipients_table() {
    let connection = Connection::open_in_memory().expect("in-memory db should open");
    assert!(RecipientLookup::from_connection(connection).is_err());
}

#[test]
fn recipient_lookup_rejects_missing_file() {
    let missing = std::env::temp_dir().join("kikou_missing_recipients_store.db");
    assert!(RecipientLookup::open(&missing).is_err());
}

#[test]
fn recover_with_recipient_lookup_assigns_alias() {
    let lookup = RecipientLookup::from_connection(recipients_connection(&["東北防衛局"]))
        .expect("lookup should accept recipients table");
    let pages = vec!["  Ⅰ 防衛省\n  地方防衛局８\n  ＜北海道、東北＞".to_string()];

    let recovery = recovery::recover(&pages, &lookup).expect("recovery should succeed");
    let aliased = recovery
        .entries
        .iter()
        .filter(|entry| !entry.bureau_alias.is_empty())
        .map(|entry| (entry.bureau.as_str(), entry.bureau_alias.as_str()))
        .collect::<Vec<_>>();
    assert_eq!(aliased, vec![("東北地方防衛局", "東北防衛局")]);
}

#[test]
fn replace_entries_overwrites_previous_rows_of_same_document() {
    let mut connection = Connection::open_in_memory().expect("in-memory db should open");
    ensure_schema(&connection).expect("schema should be created");

    let first = vec![entry("大臣官房", ""), entry("大臣官房", "総務課")];
    assert_eq!(
        replace_entries(&mut connection, "r071215kouji", &first).expect("insert should succeed"),
        2
    );
    replace_entries(&mut connection, "other", &[entry("国際局", "")])
        .expect("insert should succeed");

    let second = vec![entry("総合外交政策局", "")];
    replace_entries(&mut connection, "r071215kouji", &second).expect("replace should succeed");

    let total = count_rows(&connection, "SELECT COUNT(*) FROM organizations")
        .expect("count should succeed");
    assert_eq!(total, 2);
    let bureau: String = connection
        .query_row(
            "SELECT bureau FROM organizations WHERE doc_id = 'r071215kouji'",
            [],
            |row| row.get(0),
        )
        .expect("row should exist");
    assert_eq!(bureau, "総合外交政策局");

    let version: String = connection
        .query_row(
            "SELECT value FROM metadata WHERE key = 'db_schema_version'",
            [],
            |row| row.get(0),
        )
        .expect("schema version should be recorded");
    assert_eq!(version, DB_SCHEMA_VERSION);
}

#[test]
fn render_extract_command_lists_explicit_options() {
    let mut args = extract_args(PathBuf::from("data/ichiran.txt"));
    args.max_pages = Some(40);
    args.entries_json = Some(PathBuf::from("out/entries.json"));
    args.names_file = Some(PathBuf::from("data/names.txt"));

    assert_eq!(
        render_extract_command(&args),
        "kikou extract --text data/ichiran.txt --max-pages 40 --cache-root .cache/kikou \
         --recipients-db data/result/recipients.db --names-file data/names.txt \
         --entries-json out/entries.json"
    );
}

#[test]
fn name_list_file_feeds_alias_resolution() {
    let path = std::env::temp_dir().join(format!(
        "kikou_names_{}_{}.txt",
        std::process::id(),
        Utc::now().timestamp_nanos_opt().unwrap_or_default()
    ));
    fs::write(&path, "# attested names\n九州防衛局\n\n  東北防衛局  \n").expect("fixture should write");
    let lookup = load_name_list(&path).expect("name list should load");
    let _ = fs::remove_file(&path);

    assert!(lookup.exists("東北防衛局").expect("lookup should succeed"));
    assert!(!lookup.exists("# attested names").expect("lookup should succeed"));

    let pages = vec!["  Ⅰ 防衛省\n  地方防衛局８\n  ＜九州、東北＞".to_string()];
    let recovery = recovery::recover(&pages, &lookup).expect("recovery should succeed");
    assert_eq!(recovery.summary.aliases_assigned, 2);
}

#[test]
fn name_list_without_names_is_rejected() {
    let path = std::env::temp_dir().join(format!(
        "kikou_empty_names_{}_{}.txt",
        std::process::id(),
        Utc::now().timestamp_nanos_opt().unwrap_or_default()
    ));
    fs::write(&path, "# nothing yet\n\n").expect("fixture should write");
    let loaded = load_name_list(&path);
    let _ = fs::remove_file(&path);

    assert!(loaded.is_err());
}
