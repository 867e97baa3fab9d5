//! Plugin comparing file sizes between the snapshots.

use std::io;

use async_trait::async_trait;
use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use serde_json::json;

use super::{Plugin, PluginError, PluginResult};
use crate::snapshot::SnapshotPair;

/// Size of one file in both snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SizeComparison {
    before: Option<u64>,
    after: Option<u64>,
}

impl SizeComparison {
    /// Bytes the file grew by; a file new in "after" grows by its full size.
    const fn growth(self) -> u64 {
        match (self.before, self.after) {
            (Some(before), Some(after)) => after.saturating_sub(before),
            (None, Some(after)) => after,
            (_, None) => 0,
        }
    }

    fn change(self) -> String {
        match (self.before, self.after) {
            (Some(before), Some(after)) if after >= before => format!("+{} B", after - before),
            (Some(before), Some(after)) => format!("-{} B", before - after),
            (None, Some(_)) => "added".to_owned(),
            (Some(_), None) => "removed".to_owned(),
            (None, None) => "missing".to_owned(),
        }
    }
}

fn describe(size: Option<u64>) -> String {
    size.map_or_else(|| "missing".to_owned(), |bytes| format!("{bytes} B"))
}

/// Reports how the size of selected files changed.
pub struct FileSizePlugin {
    name: Option<String>,
    files: Vec<Utf8PathBuf>,
    max_increase_bytes: Option<u64>,
}

impl FileSizePlugin {
    /// Creates a file size plugin for `files`, relative to each snapshot.
    #[must_use]
    pub const fn new(
        name: Option<String>,
        files: Vec<Utf8PathBuf>,
        max_increase_bytes: Option<u64>,
    ) -> Self {
        Self {
            name,
            files,
            max_increase_bytes,
        }
    }

    fn exceeds_limit(&self, comparison: SizeComparison) -> bool {
        self.max_increase_bytes
            .is_some_and(|limit| comparison.growth() > limit)
    }
}

fn open_root(root: &Utf8Path) -> Result<Dir, PluginError> {
    Dir::open_ambient_dir(root, ambient_authority())
        .map_err(|error| PluginError::new(format!("unable to open snapshot '{root}': {error}")))
}

fn file_size(root: &Dir, file: &Utf8Path) -> Result<Option<u64>, PluginError> {
    match root.metadata(file) {
        Ok(metadata) => Ok(Some(metadata.len())),
        Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(error) => Err(PluginError::new(format!(
            "unable to read the size of '{file}': {error}"
        ))),
    }
}

#[async_trait]
impl Plugin for FileSizePlugin {
    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    async fn run(&self, snapshots: &SnapshotPair) -> Result<PluginResult, PluginError> {
        let before_root = open_root(snapshots.before_path())?;
        let after_root = open_root(snapshots.after_path())?;

        let mut pretty = String::new();
        let mut markdown = String::from("| File | Before | After | Change |\n");
        markdown.push_str("| --- | --- | --- | --- |\n");
        let mut entries = Vec::with_capacity(self.files.len());
        let mut fail_pr = false;

        for file in &self.files {
            let comparison = SizeComparison {
                before: file_size(&before_root, file)?,
                after: file_size(&after_root, file)?,
            };
            if comparison.before.is_none() && comparison.after.is_none() {
                return Err(PluginError::new(format!(
                    "'{file}' exists in neither snapshot"
                )));
            }

            let over_limit = self.exceeds_limit(comparison);
            fail_pr |= over_limit;
            let marker = if over_limit { " (over limit)" } else { "" };
            let before = describe(comparison.before);
            let after = describe(comparison.after);
            let change = comparison.change();

            pretty.push_str(&format!("  {file}: {before} -> {after} ({change}){marker}\n"));
            markdown.push_str(&format!(
                "| `{file}` | {before} | {after} | {change}{marker} |\n"
            ));
            entries.push(json!({
                "file": file,
                "before": comparison.before,
                "after": comparison.after,
                "over_limit": over_limit,
            }));
        }

        Ok(PluginResult {
            details: json!({ "files": entries }),
            ..PluginResult::default()
        }
        .with_pretty_log(pretty.trim_end())
        .with_markdown_log(markdown.trim_end())
        .failing(fail_pr))
    }
}
