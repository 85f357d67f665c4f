use crate::planner::{preview_rename, RenameOutcome, RenameStatus};
use crate::rule::Rule;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

pub fn execute_rename(paths: &[PathBuf], rules: &[Rule]) -> Vec<RenameOutcome> {
    execute_plan(preview_rename(paths, rules))
}

pub fn execute_plan(mut outcomes: Vec<RenameOutcome>) -> Vec<RenameOutcome> {
    // ready対象を一時名へ退避してから確定名へ移す。入れ替えや連鎖の対策
    let mut staged = Vec::<(usize, PathBuf)>::new();
    for (index, outcome) in outcomes.iter_mut().enumerate() {
        if outcome.status != RenameStatus::Ready {
            continue;
        }
        let temp_path = temp_path_for(&outcome.old_path, index);
        match fs::rename(&outcome.old_path, &temp_path) {
            Ok(()) => staged.push((index, temp_path)),
            Err(err) => {
                outcome.status = RenameStatus::Error;
                outcome.error = format!(
                    "リネームに失敗しました: {} -> {}: {}",
                    outcome.old_path.display(),
                    outcome.new_path.display(),
                    err
                );
            }
        }
    }

    for (index, temp_path) in staged {
        let outcome = &mut outcomes[index];
        if outcome.new_path.exists() {
            let cause = format!(
                "リネーム先が既に存在します: {}",
                outcome.new_path.display()
            );
            outcome.status = RenameStatus::Error;
            outcome.error = match fs::rename(&temp_path, &outcome.old_path) {
                Ok(()) => cause,
                Err(rollback_err) => {
                    format!("{cause} (差し戻しにも失敗しました: {rollback_err})")
                }
            };
            continue;
        }
        match fs::rename(&temp_path, &outcome.new_path) {
            Ok(()) => outcome.status = RenameStatus::Success,
            Err(err) => {
                let cause = format!(
                    "リネームに失敗しました: {} -> {}: {}",
                    outcome.old_path.display(),
                    outcome.new_path.display(),
                    err
                );
                outcome.status = RenameStatus::Error;
                outcome.error = match fs::rename(&temp_path, &outcome.old_path) {
                    Ok(()) => cause,
                    Err(rollback_err) => {
                        format!("{cause} (差し戻しにも失敗しました: {rollback_err})")
                    }
                };
            }
        }
    }

    outcomes
}

fn temp_path_for(original_path: &Path, index: usize) -> PathBuf {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    let parent = original_path.parent().unwrap_or_else(|| Path::new("."));
    let file_name = original_path
        .file_name()
        .map(|v| v.to_string_lossy().to_string())
        .unwrap_or_else(|| "file".to_string());
    parent.join(format!(".renovo_tmp_{}_{}_{}", now, index, file_name))
}
