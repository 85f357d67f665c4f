use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use renovo_core::{
    app_paths, execute_rename, load_config, preview_rename, resize_batch_with_workers,
    resize_images_only, validate_rules, OutputFormat, RenameOutcome, RenameStatus, ResizeConfig,
    ResizeMode, ResizeOutcome, ResizeStatus, Rule,
};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "renovo-cli")]
#[command(about = "ルールでファイル名を一括リネームし、画像を一括リサイズします")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Rename(RenameArgs),
    Resize(ResizeArgs),
    Config(ConfigArgs),
}

#[derive(Debug, Args)]
struct ConfigArgs {
    #[command(subcommand)]
    action: ConfigAction,
}

#[derive(Debug, Subcommand)]
enum ConfigAction {
    Show,
}

#[derive(Debug, Args)]
struct RenameArgs {
    #[arg(required = true)]
    files: Vec<PathBuf>,
    #[arg(long)]
    rules: Option<PathBuf>,
    #[arg(long, default_value_t = false)]
    apply: bool,
    #[arg(long, value_enum, default_value_t = OutputKind::Table)]
    output: OutputKind,
}

#[derive(Debug, Args)]
struct ResizeArgs {
    #[arg(required = true)]
    files: Vec<PathBuf>,
    #[arg(long, default_value_t = 0)]
    width: u32,
    #[arg(long, default_value_t = 0)]
    height: u32,
    #[arg(long, value_enum, default_value_t = ModeArg::Fit)]
    mode: ModeArg,
    #[arg(long, default_value_t = 85)]
    quality: u8,
    #[arg(long, value_enum)]
    format: Option<FormatArg>,
    #[arg(long, default_value = "")]
    output_dir: String,
    #[arg(long, default_value_t = false)]
    overwrite: bool,
    #[arg(long)]
    workers: Option<usize>,
    #[arg(long, default_value_t = false)]
    all_files: bool,
    #[arg(long, value_enum, default_value_t = OutputKind::Table)]
    output: OutputKind,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputKind {
    Table,
    Json,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModeArg {
    Fit,
    Fill,
    Exact,
}

impl From<ModeArg> for ResizeMode {
    fn from(value: ModeArg) -> Self {
        match value {
            ModeArg::Fit => ResizeMode::Fit,
            ModeArg::Fill => ResizeMode::Fill,
            ModeArg::Exact => ResizeMode::Exact,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    Jpeg,
    Png,
}

impl From<FormatArg> for OutputFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Jpeg => OutputFormat::Jpeg,
            FormatArg::Png => OutputFormat::Png,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Rename(args) => cmd_rename(args),
        Commands::Resize(args) => cmd_resize(args),
        Commands::Config(config) => match config.action {
            ConfigAction::Show => cmd_config_show(),
        },
    }
}

fn cmd_rename(args: RenameArgs) -> Result<()> {
    let rules = load_rules(args.rules.as_deref())?;
    if rules.is_empty() {
        anyhow::bail!(
            "リネームルールがありません。--rules でJSONファイルを指定するか、設定にdefault_rulesを保存してください。"
        );
    }
    validate_rules(&rules)?;

    let outcomes = if args.apply {
        execute_rename(&args.files, &rules)
    } else {
        preview_rename(&args.files, &rules)
    };

    match args.output {
        OutputKind::Json => println!("{}", serde_json::to_string_pretty(&outcomes)?),
        OutputKind::Table => print_rename_table(&outcomes),
    }

    if !args.apply {
        eprintln!("dry-runモード: 実ファイルは変更していません。適用するには --apply を指定してください。");
    }

    Ok(())
}

fn cmd_resize(args: ResizeArgs) -> Result<()> {
    let saved = load_config()?;
    let workers = args
        .workers
        .or((saved.worker_threads > 0).then_some(saved.worker_threads));

    let config = ResizeConfig {
        width: args.width,
        height: args.height,
        keep_aspect: true,
        quality: args.quality,
        output_format: args.format.map(Into::into).unwrap_or(OutputFormat::Same),
        resize_mode: args.mode.into(),
        output_dir: args.output_dir,
        overwrite: args.overwrite,
    };

    let outcomes = if args.all_files {
        resize_batch_with_workers(&args.files, &config, workers)?
    } else {
        resize_images_only(&args.files, &config, workers)?
    };

    match args.output {
        OutputKind::Json => println!("{}", serde_json::to_string_pretty(&outcomes)?),
        OutputKind::Table => print_resize_table(&outcomes),
    }

    Ok(())
}

fn cmd_config_show() -> Result<()> {
    let config = load_config()?;
    let paths = app_paths()?;
    println!("設定ファイル: {}", paths.config_path.display());
    println!("{}", toml::to_string_pretty(&config)?);
    Ok(())
}

fn load_rules(path: Option<&std::path::Path>) -> Result<Vec<Rule>> {
    match path {
        Some(path) => {
            let raw = fs::read_to_string(path).with_context(|| {
                format!("ルールファイルを読めませんでした: {}", path.display())
            })?;
            serde_json::from_str::<Vec<Rule>>(&raw).with_context(|| {
                format!("ルールファイルのパースに失敗しました: {}", path.display())
            })
        }
        None => Ok(load_config()?.default_rules),
    }
}

fn print_rename_table(outcomes: &[RenameOutcome]) {
    println!("元ファイル -> 新ファイル (status)");
    for outcome in outcomes {
        let detail = if outcome.error.is_empty() {
            String::new()
        } else {
            format!(" [{}]", outcome.error)
        };
        println!(
            "{} -> {} ({:?}){}",
            outcome.old_path.display(),
            outcome.new_name,
            outcome.status,
            detail
        );
    }

    let count = |status: RenameStatus| outcomes.iter().filter(|o| o.status == status).count();
    println!(
        "\n集計: ready={} unchanged={} conflict={} success={} error={}",
        count(RenameStatus::Ready),
        count(RenameStatus::Unchanged),
        count(RenameStatus::Conflict),
        count(RenameStatus::Success),
        count(RenameStatus::Error)
    );
}

fn print_resize_table(outcomes: &[ResizeOutcome]) {
    println!("元ファイル -> 新ファイル (寸法/サイズ)");
    for outcome in outcomes {
        match outcome.status {
            ResizeStatus::Success => println!(
                "{} -> {} ({}x{} -> {}x{}, {} -> {} bytes)",
                outcome.old_path.display(),
                outcome.new_name,
                outcome.original_w,
                outcome.original_h,
                outcome.output_w,
                outcome.output_h,
                outcome.original_size,
                outcome.output_size
            ),
            ResizeStatus::Error => println!(
                "{} -> ERROR [{}]",
                outcome.old_path.display(),
                outcome.error
            ),
        }
    }

    let success = outcomes
        .iter()
        .filter(|o| o.status == ResizeStatus::Success)
        .count();
    println!(
        "\n集計: success={} error={}",
        success,
        outcomes.len() - success
    );
}
