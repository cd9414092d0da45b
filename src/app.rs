//! Startup wiring shared by the binaries: dataset, validation, theme store,
//! session, and writing render passes to disk.

use anyhow::{Context, Result};
use std::fs;
use std::io::BufRead;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::controller::session::{RenderPass, Session};
use crate::data::{self, LoadedDataset};
use crate::logging::{
    log, log_dataset_loaded, log_validation_issue, obj, v_str, Domain, Level, ProfileScope,
};
use crate::storage::PreferenceStore;
use crate::verify::validate_dataset;
use crate::view::ViewOptions;

/// Load the configured dataset and report (but tolerate) shape problems.
pub fn load_dataset(cfg: &Config) -> Result<LoadedDataset> {
    let _scope = ProfileScope::new("load_dataset");
    let loaded = data::load(cfg.data_path.as_deref()).context("loading dataset")?;
    log_dataset_loaded(
        &loaded.source,
        &loaded.hash_sha256,
        loaded.dataset.risks.len(),
        loaded.dataset.locations.len(),
    );
    for issue in validate_dataset(&loaded.dataset) {
        log_validation_issue(issue.kind.as_str(), &issue.subject, &issue.msg);
    }
    Ok(loaded)
}

pub fn open_store(cfg: &Config) -> Result<PreferenceStore> {
    let mut store = PreferenceStore::new(&cfg.sqlite_path)
        .with_context(|| format!("opening preference store {}", cfg.sqlite_path))?;
    store.init()?;
    Ok(store)
}

pub fn bootstrap(cfg: &Config) -> Result<Session> {
    let loaded = load_dataset(cfg)?;
    let store = open_store(cfg)?;
    let theme = store.load_theme(cfg.color_scheme)?;
    log(
        Level::Info,
        Domain::Theme,
        "theme_loaded",
        obj(&[("theme", v_str(theme.as_str()))]),
    );
    let opts = ViewOptions {
        top_n: cfg.top_n,
        fingerprint: Some(loaded.hash_sha256),
    };
    Ok(Session::new(loaded.dataset, theme, opts).with_store(store))
}

/// Write `index.html` and `summary.json` for a render pass into `out_dir`.
pub fn write_outputs(out_dir: &Path, pass: &RenderPass) -> Result<PathBuf> {
    fs::create_dir_all(out_dir).with_context(|| format!("creating {}", out_dir.display()))?;
    let index = out_dir.join("index.html");
    fs::write(&index, &pass.html).with_context(|| format!("writing {}", index.display()))?;
    let summary = serde_json::to_string_pretty(&pass.view)?;
    fs::write(out_dir.join("summary.json"), summary)?;
    Ok(index)
}

/// Next input line, or `None` at end of input. Invalid UTF-8 is replaced
/// rather than rejected so one bad byte cannot end a session.
pub fn read_line_lossy<R: BufRead>(reader: &mut R) -> Result<Option<String>> {
    let mut buf = Vec::new();
    if reader.read_until(b'\n', &mut buf)? == 0 {
        return Ok(None);
    }
    Ok(Some(String::from_utf8_lossy(&buf).into_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::state::Theme;
    use tempfile::TempDir;

    #[test]
    fn write_outputs_creates_page_and_summary() {
        let dir = TempDir::new().unwrap();
        let session = Session::new(data::seed().unwrap().dataset, Theme::Light, ViewOptions::default());
        let index = write_outputs(&dir.path().join("dash"), session.current()).unwrap();
        let html = fs::read_to_string(index).unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
        let summary: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(dir.path().join("dash/summary.json")).unwrap()).unwrap();
        assert_eq!(summary["active_tab"], "overview");
        assert_eq!(summary["header"]["total_risks"], 13);
    }

    #[test]
    fn invalid_utf8_line_does_not_end_input() {
        let mut input = std::io::Cursor::new(b"search \xff\xfeleak\ntab risks\n".to_vec());
        let first = read_line_lossy(&mut input).unwrap().unwrap();
        assert!(first.starts_with("search "));
        assert!(first.contains('\u{FFFD}'));
        assert_eq!(read_line_lossy(&mut input).unwrap().as_deref(), Some("tab risks\n"));
        assert!(read_line_lossy(&mut input).unwrap().is_none());
    }
}
