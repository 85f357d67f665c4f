use crate::geometry::{compute_geometry, validate_resize_config, OutputFormat, ResizeConfig};
use crate::pipeline::file_name_of;
use anyhow::{Context, Result};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageReader};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

const IMAGE_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "bmp", "gif", "webp", "tif", "tiff",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeStatus {
    Success,
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResizeOutcome {
    pub old_path: PathBuf,
    pub new_path: PathBuf,
    pub old_name: String,
    pub new_name: String,
    pub status: ResizeStatus,
    #[serde(default)]
    pub error: String,
    pub original_w: u32,
    pub original_h: u32,
    pub output_w: u32,
    pub output_h: u32,
    pub original_size: u64,
    pub output_size: u64,
}

pub fn is_image_path(path: &Path) -> bool {
    path.extension()
        .map(|ext| {
            let ext = ext.to_string_lossy();
            IMAGE_EXTENSIONS.iter().any(|e| ext.eq_ignore_ascii_case(e))
        })
        .unwrap_or(false)
}

pub fn resize_batch(paths: &[PathBuf], config: &ResizeConfig) -> Result<Vec<ResizeOutcome>> {
    resize_batch_with_workers(paths, config, None)
}

pub fn resize_images_only(
    paths: &[PathBuf],
    config: &ResizeConfig,
    workers: Option<usize>,
) -> Result<Vec<ResizeOutcome>> {
    let image_paths: Vec<PathBuf> = paths
        .iter()
        .filter(|p| is_image_path(p))
        .cloned()
        .collect();
    resize_batch_with_workers(&image_paths, config, workers)
}

pub fn resize_batch_with_workers(
    paths: &[PathBuf],
    config: &ResizeConfig,
    workers: Option<usize>,
) -> Result<Vec<ResizeOutcome>> {
    validate_resize_config(config)?;

    let mut reserved = HashSet::<PathBuf>::new();
    let jobs: Vec<(PathBuf, PathBuf)> = paths
        .iter()
        .map(|path| {
            let output = resolve_output_path(path, config, &mut reserved);
            (path.clone(), output)
        })
        .collect();

    let run = || {
        jobs.par_iter()
            .map(|(input, output)| resize_one(input, output, config))
            .collect::<Vec<ResizeOutcome>>()
    };

    match workers {
        Some(n) if n > 0 => {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(n)
                .build()
                .context("ワーカープールを作成できませんでした")?;
            Ok(pool.install(run))
        }
        _ => Ok(run()),
    }
}

fn resize_one(input: &Path, output: &Path, config: &ResizeConfig) -> ResizeOutcome {
    let mut outcome = ResizeOutcome {
        old_path: input.to_path_buf(),
        new_path: output.to_path_buf(),
        old_name: file_name_of(input),
        new_name: file_name_of(output),
        status: ResizeStatus::Success,
        error: String::new(),
        original_w: 0,
        original_h: 0,
        output_w: 0,
        output_h: 0,
        original_size: 0,
        output_size: 0,
    };

    if let Err(err) = resize_into(input, output, config, &mut outcome) {
        outcome.status = ResizeStatus::Error;
        outcome.error = format!("{err:#}");
    }
    outcome
}

fn resize_into(
    input: &Path,
    output: &Path,
    config: &ResizeConfig,
    outcome: &mut ResizeOutcome,
) -> Result<()> {
    if let Ok(meta) = fs::metadata(input) {
        outcome.original_size = meta.len();
    }

    let src = ImageReader::open(input)
        .with_context(|| format!("画像を開けませんでした: {}", input.display()))?
        .with_guessed_format()
        .with_context(|| format!("画像形式を判別できませんでした: {}", input.display()))?
        .decode()
        .with_context(|| format!("画像をデコードできませんでした: {}", input.display()))?;

    outcome.original_w = src.width();
    outcome.original_h = src.height();

    let geometry = compute_geometry(src.width(), src.height(), config);
    let mut dst = src.resize_exact(geometry.scaled_w, geometry.scaled_h, FilterType::Lanczos3);
    if let Some(crop) = geometry.crop {
        dst = dst.crop_imm(crop.x, crop.y, crop.width, crop.height);
    }
    outcome.output_w = dst.width();
    outcome.output_h = dst.height();

    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("出力フォルダを作成できませんでした: {}", parent.display()))?;
    }

    encode_to(&dst, output, config.quality)
        .with_context(|| format!("画像を書き込めませんでした: {}", output.display()))?;

    outcome.output_size = fs::metadata(output)
        .with_context(|| format!("出力ファイルを確認できませんでした: {}", output.display()))?
        .len();
    Ok(())
}

fn encode_to(image: &DynamicImage, output: &Path, quality: u8) -> Result<()> {
    let ext = output
        .extension()
        .map(|v| v.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    if ext == "jpg" || ext == "jpeg" {
        let file = File::create(output)?;
        let mut writer = BufWriter::new(file);
        let encoder = JpegEncoder::new_with_quality(&mut writer, quality);
        // JPEGはアルファ非対応のためRGBへ落とす
        DynamicImage::ImageRgb8(image.to_rgb8()).write_with_encoder(encoder)?;
        writer.flush()?;
    } else {
        image.save(output)?;
    }
    Ok(())
}

fn resolve_output_path(
    input: &Path,
    config: &ResizeConfig,
    reserved: &mut HashSet<PathBuf>,
) -> PathBuf {
    let parent = input.parent().unwrap_or_else(|| Path::new("."));
    let stem = input
        .file_stem()
        .map(|v| v.to_string_lossy().to_string())
        .unwrap_or_else(|| "image".to_string());
    let ext = output_extension(input, config);
    let file_name = if ext.is_empty() {
        stem
    } else {
        format!("{stem}.{ext}")
    };

    if config.overwrite {
        return if config.output_format == OutputFormat::Same {
            input.to_path_buf()
        } else {
            parent.join(file_name)
        };
    }

    let dir = if config.output_dir.is_empty() {
        parent.join("_resized")
    } else {
        PathBuf::from(&config.output_dir)
    };
    unique_output_path(dir.join(file_name), reserved)
}

fn output_extension(input: &Path, config: &ResizeConfig) -> String {
    match config.output_format {
        OutputFormat::Jpeg => "jpg".to_string(),
        OutputFormat::Png => "png".to_string(),
        OutputFormat::Same => input
            .extension()
            .map(|v| v.to_string_lossy().to_lowercase())
            .unwrap_or_default(),
    }
}

fn unique_output_path(candidate: PathBuf, reserved: &mut HashSet<PathBuf>) -> PathBuf {
    if !candidate.exists() && !reserved.contains(&candidate) {
        reserved.insert(candidate.clone());
        return candidate;
    }

    let parent = candidate.parent().unwrap_or_else(|| Path::new("."));
    let stem = candidate
        .file_stem()
        .map(|v| v.to_string_lossy().to_string())
        .unwrap_or_else(|| "image".to_string());
    let ext = candidate
        .extension()
        .map(|v| v.to_string_lossy().to_string())
        .unwrap_or_default();

    let mut n = 1usize;
    loop {
        let mut name = format!("{}_{:03}", stem, n);
        if !ext.is_empty() {
            name.push('.');
            name.push_str(&ext);
        }
        let next = parent.join(name);
        if !next.exists() && !reserved.contains(&next) {
            reserved.insert(next.clone());
            return next;
        }
        n += 1;
    }
}
