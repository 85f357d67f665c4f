use crate::pipeline::{evaluate, file_name_of};
use crate::rule::Rule;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenameStatus {
    Ready,
    Unchanged,
    Conflict,
    Success,
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameOutcome {
    pub old_path: PathBuf,
    pub new_path: PathBuf,
    pub old_name: String,
    pub new_name: String,
    pub status: RenameStatus,
    #[serde(default)]
    pub error: String,
}

pub trait PathProbe {
    fn exists(&self, path: &Path) -> bool;
}

pub struct FsProbe;

impl PathProbe for FsProbe {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

pub fn preview_rename(paths: &[PathBuf], rules: &[Rule]) -> Vec<RenameOutcome> {
    plan(paths, rules, &FsProbe)
}

pub fn plan(paths: &[PathBuf], rules: &[Rule], probe: &dyn PathProbe) -> Vec<RenameOutcome> {
    let mut entries = Vec::with_capacity(paths.len());
    let mut target_counts = HashMap::<PathBuf, usize>::new();

    for (old_path, new_name) in evaluate(paths, rules) {
        let old_name = file_name_of(&old_path);
        let new_path = match old_path.parent() {
            Some(parent) => parent.join(&new_name),
            None => PathBuf::from(&new_name),
        };
        *target_counts.entry(new_path.clone()).or_insert(0) += 1;
        entries.push((old_path, old_name, new_name, new_path));
    }

    let mut statuses: Vec<RenameStatus> = entries
        .iter()
        .map(|(_, old_name, new_name, new_path)| {
            if new_name == old_name {
                RenameStatus::Unchanged
            } else if target_counts.get(new_path).copied().unwrap_or(0) > 1 {
                RenameStatus::Conflict
            } else {
                RenameStatus::Ready
            }
        })
        .collect();

    // 元パスを空けるのは実際に動く候補だけ。降格が連鎖するため不動点まで繰り返す
    let mut vacating: HashSet<PathBuf> = entries
        .iter()
        .zip(&statuses)
        .filter(|(_, status)| **status == RenameStatus::Ready)
        .map(|((old_path, _, _, _), _)| old_path.clone())
        .collect();

    loop {
        let mut demoted = false;
        for (index, (old_path, _, _, new_path)) in entries.iter().enumerate() {
            if statuses[index] != RenameStatus::Ready {
                continue;
            }
            if probe.exists(new_path) && !vacating.contains(new_path) {
                statuses[index] = RenameStatus::Conflict;
                vacating.remove(old_path);
                demoted = true;
            }
        }
        if !demoted {
            break;
        }
    }

    entries
        .into_iter()
        .zip(statuses)
        .map(|((old_path, old_name, new_name, new_path), status)| RenameOutcome {
            old_path,
            new_path,
            old_name,
            new_name,
            status,
            error: String::new(),
        })
        .collect()
}
