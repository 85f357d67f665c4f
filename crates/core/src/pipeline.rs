use crate::rule::Rule;
use crate::transform::apply_rule;
use std::path::{Path, PathBuf};

pub fn evaluate_name(name: &str, rules: &[Rule], index: usize) -> String {
    let mut current = name.to_string();
    for rule in rules.iter().filter(|r| r.enabled) {
        current = apply_rule(&rule.kind, &current, index);
    }
    current
}

pub fn evaluate(paths: &[PathBuf], rules: &[Rule]) -> Vec<(PathBuf, String)> {
    paths
        .iter()
        .enumerate()
        .map(|(index, path)| {
            let name = file_name_of(path);
            let proposed = evaluate_name(&name, rules, index);
            (path.clone(), proposed)
        })
        .collect()
}

pub(crate) fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|v| v.to_string_lossy().to_string())
        .unwrap_or_default()
}
