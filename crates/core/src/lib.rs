mod config;
mod executor;
mod geometry;
mod imager;
mod pipeline;
mod planner;
mod rule;
mod transform;

pub use config::{app_paths, load_config, save_config, AppConfig, AppPaths};
pub use executor::{execute_plan, execute_rename};
pub use geometry::{
    compute_geometry, validate_resize_config, CropRect, OutputFormat, ResizeConfig,
    ResizeConfigError, ResizeGeometry, ResizeMode,
};
pub use imager::{
    is_image_path, resize_batch, resize_batch_with_workers, resize_images_only, ResizeOutcome,
    ResizeStatus,
};
pub use pipeline::{evaluate, evaluate_name};
pub use planner::{plan, preview_rename, FsProbe, PathProbe, RenameOutcome, RenameStatus};
pub use rule::{validate_rules, CaseMode, Rule, RuleError, RuleKind};
pub use transform::{apply_rule, split_stem_ext};
