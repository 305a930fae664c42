use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "reelforge", version)]
struct Cli {
    /// Log at debug level.
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate and assemble videos for one or more source scripts (requires `ffmpeg` on PATH).
    Make(MakeArgs),
    /// Re-run assembly on an existing job directory from its `response.txt`.
    Assemble(AssembleArgs),
    /// Parse a scene script and print the directives as JSON.
    Parse(ParseArgs),
    /// Print upload metadata for a job as JSON.
    UploadMeta(UploadMetaArgs),
}

#[derive(Parser, Debug)]
struct MakeArgs {
    /// Script names under `--scripts-dir` (a `.txt` suffix is optional).
    #[arg(required = true)]
    scripts: Vec<String>,

    /// Settings JSON.
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Directory holding the source scripts.
    #[arg(long, default_value = "scripts")]
    scripts_dir: PathBuf,

    /// Directory job folders are created in.
    #[arg(long, default_value = "shorts")]
    shorts_dir: PathBuf,

    /// Captioned output filename inside each job folder.
    #[arg(long, default_value = reelforge::job::DEFAULT_OUTPUT_FILENAME)]
    output: String,

    /// Seed for art-style selection.
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Parser, Debug)]
struct AssembleArgs {
    /// Job directory.
    #[arg(long)]
    job: PathBuf,

    /// Settings JSON.
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Captioned output filename inside the job folder.
    #[arg(long, default_value = reelforge::job::DEFAULT_OUTPUT_FILENAME)]
    output: String,
}

#[derive(Parser, Debug)]
struct ParseArgs {
    /// Scene script text file.
    #[arg(long = "in")]
    in_path: PathBuf,
}

#[derive(Parser, Debug)]
struct UploadMetaArgs {
    /// Job directory.
    #[arg(long)]
    job: PathBuf,

    /// Settings JSON.
    #[arg(long)]
    settings: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .with_max_level(if cli.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .with_writer(std::io::stderr)
        .init();

    match cli.cmd {
        Command::Make(args) => cmd_make(args),
        Command::Assemble(args) => cmd_assemble(args),
        Command::Parse(args) => cmd_parse(args),
        Command::UploadMeta(args) => cmd_upload_meta(args),
    }
}

fn load_settings(path: Option<&Path>) -> anyhow::Result<reelforge::Settings> {
    let settings = reelforge::Settings::load_or_default(path)?;
    tracing::debug!(?settings, "loaded settings");
    Ok(settings)
}

fn script_path(scripts_dir: &Path, name: &str) -> PathBuf {
    let stem = name.strip_suffix(".txt").unwrap_or(name);
    scripts_dir.join(format!("{stem}.txt"))
}

fn cmd_make(args: MakeArgs) -> anyhow::Result<()> {
    let settings = load_settings(args.settings.as_deref())?;
    let mut ctx = reelforge::JobContext::from_settings(settings)?;
    if let Some(seed) = args.seed {
        ctx = ctx.with_seed(seed);
    }

    let mut items = Vec::with_capacity(args.scripts.len());
    for name in &args.scripts {
        let path = script_path(&args.scripts_dir, name);
        let source_material = std::fs::read_to_string(&path)
            .with_context(|| format!("read script '{}'", path.display()))?;
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        items.push(reelforge::pipeline::BatchItem {
            name: stem,
            source_material,
        });
    }

    std::fs::create_dir_all(&args.shorts_dir)
        .with_context(|| format!("create shorts dir '{}'", args.shorts_dir.display()))?;
    let outcomes = reelforge::run_batch(&mut ctx, &args.shorts_dir, &items, &args.output);

    let mut failed = 0usize;
    for outcome in &outcomes {
        match &outcome.result {
            Ok(report) => eprintln!("{}: wrote {}", outcome.name, report.final_path.display()),
            Err(e) => {
                failed += 1;
                eprintln!("{}: failed: {e}", outcome.name);
            }
        }
    }
    if failed > 0 {
        anyhow::bail!("{failed} of {} jobs failed", outcomes.len());
    }
    Ok(())
}

fn cmd_assemble(args: AssembleArgs) -> anyhow::Result<()> {
    let settings = load_settings(args.settings.as_deref())?;
    let ctx = reelforge::JobContext::from_settings(settings)?;
    let job = reelforge::JobArtifactSet::new(&args.job, args.output);
    let report = reelforge::pipeline::assemble_existing(&ctx, &job)?;
    eprintln!("wrote {}", report.final_path.display());
    Ok(())
}

fn cmd_parse(args: ParseArgs) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(&args.in_path)
        .with_context(|| format!("read script '{}'", args.in_path.display()))?;
    let script = reelforge::parse_script(&text)?;
    println!(
        "{}",
        serde_json::to_string_pretty(&script).context("serialize parsed script")?
    );
    Ok(())
}

fn cmd_upload_meta(args: UploadMetaArgs) -> anyhow::Result<()> {
    let settings = load_settings(args.settings.as_deref())?;
    let job = reelforge::JobArtifactSet::new(&args.job, reelforge::job::DEFAULT_OUTPUT_FILENAME);
    let meta = reelforge::pipeline::load_upload_metadata(&job, &settings)?;
    println!(
        "{}",
        serde_json::to_string_pretty(&meta).context("serialize upload metadata")?
    );
    Ok(())
}
