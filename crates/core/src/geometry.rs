use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResizeConfig {
    pub width: u32,
    pub height: u32,
    pub keep_aspect: bool,
    pub quality: u8,
    pub output_format: OutputFormat,
    pub resize_mode: ResizeMode,
    pub output_dir: String,
    pub overwrite: bool,
}

impl Default for ResizeConfig {
    fn default() -> Self {
        Self {
            width: 0,
            height: 0,
            keep_aspect: true,
            quality: 85,
            output_format: OutputFormat::Same,
            resize_mode: ResizeMode::Fit,
            output_dir: String::new(),
            overwrite: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum OutputFormat {
    #[default]
    #[serde(rename = "", alias = "same")]
    Same,
    #[serde(rename = "jpeg", alias = "jpg")]
    Jpeg,
    #[serde(rename = "png")]
    Png,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ResizeMode {
    #[default]
    Fit,
    Fill,
    Exact,
}

#[derive(Debug, Error)]
pub enum ResizeConfigError {
    #[error("幅と高さの両方を0にはできません")]
    BothZero,
    #[error("{mode}モードでは幅と高さの両方を指定してください")]
    ZeroDimension { mode: &'static str },
    #[error("品質は1〜100で指定してください: {0}")]
    QualityOutOfRange(u8),
}

pub fn validate_resize_config(config: &ResizeConfig) -> Result<(), ResizeConfigError> {
    if config.quality < 1 || config.quality > 100 {
        return Err(ResizeConfigError::QualityOutOfRange(config.quality));
    }
    match config.resize_mode {
        ResizeMode::Fit => {
            if config.width == 0 && config.height == 0 {
                return Err(ResizeConfigError::BothZero);
            }
        }
        ResizeMode::Fill => {
            if config.width == 0 || config.height == 0 {
                return Err(ResizeConfigError::ZeroDimension { mode: "fill" });
            }
        }
        ResizeMode::Exact => {
            if config.width == 0 || config.height == 0 {
                return Err(ResizeConfigError::ZeroDimension { mode: "exact" });
            }
        }
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CropRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResizeGeometry {
    pub output_w: u32,
    pub output_h: u32,
    // fillのリサンプル寸法。cropはこの座標系内の中央窓
    pub scaled_w: u32,
    pub scaled_h: u32,
    pub crop: Option<CropRect>,
}

pub fn compute_geometry(original_w: u32, original_h: u32, config: &ResizeConfig) -> ResizeGeometry {
    match config.resize_mode {
        ResizeMode::Exact => ResizeGeometry {
            output_w: config.width,
            output_h: config.height,
            scaled_w: config.width,
            scaled_h: config.height,
            crop: None,
        },
        ResizeMode::Fit => {
            let factor = fit_factor(original_w, original_h, config.width, config.height);
            let w = scale_dim(original_w, factor);
            let h = scale_dim(original_h, factor);
            ResizeGeometry {
                output_w: w,
                output_h: h,
                scaled_w: w,
                scaled_h: h,
                crop: None,
            }
        }
        ResizeMode::Fill => {
            let factor = f64::max(
                config.width as f64 / original_w.max(1) as f64,
                config.height as f64 / original_h.max(1) as f64,
            );
            let scaled_w = scale_dim(original_w, factor).max(config.width);
            let scaled_h = scale_dim(original_h, factor).max(config.height);
            ResizeGeometry {
                output_w: config.width,
                output_h: config.height,
                scaled_w,
                scaled_h,
                crop: Some(CropRect {
                    x: (scaled_w - config.width) / 2,
                    y: (scaled_h - config.height) / 2,
                    width: config.width,
                    height: config.height,
                }),
            }
        }
    }
}

fn fit_factor(original_w: u32, original_h: u32, target_w: u32, target_h: u32) -> f64 {
    let ratio_w = target_w as f64 / original_w.max(1) as f64;
    let ratio_h = target_h as f64 / original_h.max(1) as f64;
    match (target_w, target_h) {
        (0, _) => ratio_h,
        (_, 0) => ratio_w,
        _ => f64::min(ratio_w, ratio_h),
    }
}

fn scale_dim(value: u32, factor: f64) -> u32 {
    ((value as f64 * factor).round() as u32).max(1)
}
