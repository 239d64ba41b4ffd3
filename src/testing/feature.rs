//! Scenario sources
//!
//! Gherkin files are parsed with the `gherkin` crate that cucumber uses,
//! YAML files are rendered to Gherkin first. Outlines are expanded at
//! load time, so every feature handed to the runner holds plain
//! scenarios.

use std::path::{Path, PathBuf};

use cucumber::feature::Ext as _;
use cucumber::gherkin::{self, GherkinEnv};
use futures_util::stream;

use crate::common::{Error, Result};

use super::config::load_yaml_feature;

/// Scenario files under `paths`, directories searched recursively
///
/// Files named explicitly must be `.feature`, `.yaml` or `.yml`; other
/// files inside directories are ignored. The result is sorted.
pub fn collect_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            walk_dir(path, &mut files)?;
        } else if path.is_file() {
            if !is_scenario_file(path) {
                return Err(Error::Config(format!(
                    "Unsupported scenario file '{}': expected .feature, .yaml or .yml",
                    path.display()
                )));
            }
            files.push(path.clone());
        } else {
            return Err(Error::FileRead {
                path: path.display().to_string(),
                error: "No such file or directory".to_string(),
            });
        }
    }
    files.sort();
    files.dedup();
    Ok(files)
}

fn walk_dir(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    let entries = std::fs::read_dir(dir).map_err(|e| Error::FileRead {
        path: dir.display().to_string(),
        error: e.to_string(),
    })?;
    for entry in entries {
        let path = entry?.path();
        if path.is_dir() {
            walk_dir(&path, files)?;
        } else if is_scenario_file(&path) {
            files.push(path);
        }
    }
    Ok(())
}

fn is_scenario_file(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("feature") | Some("yaml") | Some("yml")
    )
}

/// Parse Gherkin text; `path` names the feature in reports and errors
pub fn parse_feature(path: &Path, content: &str) -> Result<gherkin::Feature> {
    let mut feature = gherkin::Feature::parse(content, GherkinEnv::default())
        .map_err(|e| Error::feature_parse(path, e))?;
    feature.path = Some(path.to_path_buf());
    expand(path, feature)
}

/// Parse one scenario file by extension
pub fn load_feature(path: &Path) -> Result<gherkin::Feature> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("yaml") | Some("yml") => load_yaml_feature(path),
        _ => {
            let feature = gherkin::Feature::parse_path(path, GherkinEnv::default())
                .map_err(|e| Error::feature_parse(path, e))?;
            expand(path, feature)
        }
    }
}

/// Collect and parse every scenario file under `paths`
pub fn load_features(paths: &[PathBuf]) -> Result<Vec<gherkin::Feature>> {
    collect_files(paths)?
        .iter()
        .map(|path| load_feature(path))
        .collect()
}

/// Scenario count across features, rules included
pub fn scenario_count(features: &[gherkin::Feature]) -> usize {
    features.iter().map(|f| f.count_scenarios()).sum()
}

fn expand(path: &Path, feature: gherkin::Feature) -> Result<gherkin::Feature> {
    feature
        .expand_examples()
        .map_err(|e| Error::feature_parse(path, e))
}

/// Hands already loaded features to cucumber
///
/// One run can mix several paths and YAML files. Parse errors surface
/// from loading, before any scenario runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct Preloaded;

impl cucumber::Parser<Vec<gherkin::Feature>> for Preloaded {
    type Cli = cucumber::cli::Empty;
    type Output =
        stream::Iter<std::vec::IntoIter<cucumber::parser::Result<gherkin::Feature>>>;

    fn parse(self, features: Vec<gherkin::Feature>, _: Self::Cli) -> Self::Output {
        stream::iter(features.into_iter().map(Ok).collect::<Vec<_>>())
    }
}
