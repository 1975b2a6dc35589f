use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result, bail};
use chrono::Utc;
use rusqlite::{Connection, OpenFlags, params};
use tracing::{info, warn};

use crate::cli::ExtractArgs;
use crate::model::{
    Entry, ExtractPaths, ExtractRunManifest, SourceDocument, ToolVersions,
};
use crate::recovery::{self, NameLookup, NameSet};
use crate::util::{
    doc_id_for, ensure_directory, now_utc_string, sha256_file, utc_compact_string,
    write_json_pretty,
};

pub(crate) const DB_SCHEMA_VERSION: &str = "0.1.0";

mod pages;
mod recipients;
mod run;
mod store;
#[cfg(test)]
mod tests;

pub use run::run;
pub(crate) use store::{count_rows, default_db_path};

use pages::*;
use recipients::*;
use store::*;
