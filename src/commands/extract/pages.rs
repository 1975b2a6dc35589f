use super::*;

#[derive(Debug)]
pub(crate) struct LoadedPages {
    pub source_path: PathBuf,
    pub pages: Vec<String>,
    pub pdftotext_version: Option<String>,
}

pub(crate) fn load_pages(args: &ExtractArgs) -> Result<LoadedPages> {
    match (&args.pdf, &args.text) {
        (Some(pdf_path), _) => {
            if !command_available("pdftotext") {
                bail!(
                    "pdftotext is required to read {} but was not found on PATH",
                    pdf_path.display()
                );
            }
            let pages = extract_pages_with_pdftotext(pdf_path, args.max_pages, args.layout)?;
            Ok(LoadedPages {
                source_path: pdf_path.clone(),
                pages,
                pdftotext_version: command_version_optional("pdftotext", &["-v"]),
            })
        }
        (None, Some(text_path)) => {
            let raw = fs::read_to_string(text_path)
                .with_context(|| format!("failed to read {}", text_path.display()))?;
            let mut pages = split_pages(&raw);
            if let Some(max_pages) = args.max_pages {
                pages.truncate(max_pages);
            }
            Ok(LoadedPages {
                source_path: text_path.clone(),
                pages,
                pdftotext_version: None,
            })
        }
        (None, None) => bail!("either --pdf or --text is required"),
    }
}

fn extract_pages_with_pdftotext(
    pdf_path: &Path,
    max_pages: Option<usize>,
    layout: bool,
) -> Result<Vec<String>> {
    let mut command = Command::new("pdftotext");
    command.arg("-enc").arg("UTF-8").arg("-f").arg("1");
    if let Some(max_pages) = max_pages {
        command.arg("-l").arg(max_pages.to_string());
    }
    if layout {
        command.arg("-layout");
    }
    command.arg(pdf_path).arg("-");

    let output = command
        .output()
        .with_context(|| format!("failed to execute pdftotext for {}", pdf_path.display()))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!(
            "pdftotext returned non-zero exit status for {}: {}",
            pdf_path.display(),
            stderr.trim()
        );
    }

    Ok(split_pages(&String::from_utf8_lossy(&output.stdout)))
}

/// Splits extractor output on form feeds, dropping NULs and trailing blank pages.
pub(crate) fn split_pages(raw: &str) -> Vec<String> {
    let mut pages: Vec<String> = raw
        .split('\u{000C}')
        .map(|chunk| chunk.replace('\u{0000}', ""))
        .collect();

    while let Some(last_page) = pages.last() {
        if last_page.trim().is_empty() {
            pages.pop();
            continue;
        }
        break;
    }

    pages
}

fn command_available(program: &str) -> bool {
    Command::new(program).arg("-v").output().is_ok()
}

fn command_version_optional(program: &str, args: &[&str]) -> Option<String> {
    let output = Command::new(program).args(args).output().ok()?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    let source = if stdout.trim().is_empty() {
        stderr.trim()
    } else {
        stdout.trim()
    };

    source
        .lines()
        .next()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| line.to_string())
}

pub(crate) fn collect_tool_versions(loaded: &LoadedPages) -> ToolVersions {
    ToolVersions {
        kikou: env!("CARGO_PKG_VERSION").to_string(),
        pdftotext: loaded.pdftotext_version.clone(),
    }
}

pub(crate) fn render_extract_command(args: &ExtractArgs) -> String {
    let mut command = vec!["kikou".to_string(), "extract".to_string()];

    if let Some(path) = &args.pdf {
        command.push("--pdf".to_string());
        command.push(path.display().to_string());
    }
    if let Some(path) = &args.text {
        command.push("--text".to_string());
        command.push(path.display().to_string());
    }
    if args.layout {
        command.push("--layout".to_string());
    }
    if let Some(max_pages) = args.max_pages {
        command.push("--max-pages".to_string());
        command.push(max_pages.to_string());
    }
    command.push("--cache-root".to_string());
    command.push(args.cache_root.display().to_string());
    command.push("--recipients-db".to_string());
    command.push(args.recipients_db.display().to_string());
    if let Some(path) = &args.names_file {
        command.push("--names-file".to_string());
        command.push(path.display().to_string());
    }
    if let Some(path) = &args.db_path {
        command.push("--db-path".to_string());
        command.push(path.display().to_string());
    }
    if let Some(path) = &args.entries_json {
        command.push("--entries-json".to_string());
        command.push(path.display().to_string());
    }
    if let Some(path) = &args.manifest_path {
        command.push("--manifest-path".to_string());
        command.push(path.display().to_string());
    }

    command.join(" ")
}
