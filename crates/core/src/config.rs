use crate::geometry::ResizeConfig;
use crate::rule::Rule;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub language: String,
    pub worker_threads: usize,
    pub default_rules: Vec<Rule>,
    pub resize: ResizeConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            language: "ja".to_string(),
            worker_threads: 0,
            default_rules: Vec::new(),
            resize: ResizeConfig::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppPaths {
    pub config_dir: PathBuf,
    pub config_path: PathBuf,
}

pub fn app_paths() -> Result<AppPaths> {
    let proj = ProjectDirs::from("com", "renovo", "renovo")
        .context("OS標準設定ディレクトリを取得できませんでした")?;
    let config_dir = proj.config_dir().to_path_buf();
    Ok(AppPaths {
        config_path: config_dir.join("config.toml"),
        config_dir,
    })
}

pub fn load_config() -> Result<AppConfig> {
    let paths = app_paths()?;
    if !paths.config_path.exists() {
        return Ok(AppConfig::default());
    }

    let raw = fs::read_to_string(&paths.config_path).with_context(|| {
        format!(
            "設定ファイルを読めませんでした: {}",
            paths.config_path.display()
        )
    })?;

    let config = toml::from_str::<AppConfig>(&raw).context("設定ファイルのパースに失敗しました")?;
    Ok(config)
}

pub fn save_config(config: &AppConfig) -> Result<()> {
    let paths = app_paths()?;
    fs::create_dir_all(&paths.config_dir).with_context(|| {
        format!(
            "設定ディレクトリを作成できませんでした: {}",
            paths.config_dir.display()
        )
    })?;
    let body = toml::to_string_pretty(config).context("設定のシリアライズに失敗しました")?;
    fs::write(&paths.config_path, body).with_context(|| {
        format!(
            "設定ファイルを書き込めませんでした: {}",
            paths.config_path.display()
        )
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::RuleKind;

    #[test]
    fn config_round_trips_through_toml() {
        let config = AppConfig {
            language: "ja".to_string(),
            worker_threads: 4,
            default_rules: vec![Rule {
                id: "r1".to_string(),
                enabled: true,
                kind: RuleKind::Sequence {
                    start: 1,
                    pad: 3,
                    separator: "_".to_string(),
                },
            }],
            resize: ResizeConfig::default(),
        };

        let body = toml::to_string_pretty(&config).expect("must serialize");
        let parsed: AppConfig = toml::from_str(&body).expect("must parse");
        assert_eq!(parsed.worker_threads, 4);
        assert_eq!(parsed.default_rules.len(), 1);
        assert!(matches!(
            parsed.default_rules[0].kind,
            RuleKind::Sequence { start: 1, pad: 3, .. }
        ));
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let parsed: AppConfig = toml::from_str("language = \"ja\"").expect("must parse");
        assert_eq!(parsed.worker_threads, 0);
        assert!(parsed.default_rules.is_empty());
        assert_eq!(parsed.resize.quality, 85);
    }
}
