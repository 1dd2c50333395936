use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

use lowerthird::{Configuration, FontLoader, ImageSaver, LowerThirdGenerator, RowData};

#[derive(Parser, Debug)]
#[command(name = "lowerthird", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a single lower third.
    Render(RenderArgs),
    /// Render every row of a JSON array in parallel.
    Batch(BatchArgs),
    /// Write the default configuration as JSON.
    Config(ConfigArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Row JSON object. Overrides --main/--secondary/--justification.
    #[arg(long)]
    row: Option<PathBuf>,

    /// Main text.
    #[arg(long, default_value = "")]
    main: String,

    /// Secondary text.
    #[arg(long, default_value = "")]
    secondary: String,

    /// Placement keyword, e.g. "lower left".
    #[arg(long, default_value = "")]
    justification: String,

    /// Configuration JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output directory.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct BatchArgs {
    /// JSON array of rows.
    #[arg(long)]
    rows: PathBuf,

    /// Configuration JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output directory.
    #[arg(long)]
    out: PathBuf,

    /// Override rayon worker threads.
    #[arg(long)]
    threads: Option<usize>,
}

#[derive(Parser, Debug)]
struct ConfigArgs {
    /// Destination JSON path.
    #[arg(long)]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Batch(args) => cmd_batch(args),
        Command::Config(args) => cmd_config(args),
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<Configuration> {
    let config = match path {
        Some(p) => Configuration::from_path(p)
            .with_context(|| format!("load configuration '{}'", p.display()))?,
        None => Configuration::default(),
    };
    init_tracing(&config)?;
    Ok(config.validate()?)
}

fn init_tracing(config: &Configuration) -> anyhow::Result<()> {
    let level = if config.debug {
        "debug".to_owned()
    } else {
        match config.log_level.to_ascii_lowercase().as_str() {
            "warning" => "warn".to_owned(),
            "critical" => "error".to_owned(),
            other => other.to_owned(),
        }
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match &config.log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("open log file '{path}'"))?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).init();
        }
        None => builder.with_writer(std::io::stderr).init(),
    }
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref())?;
    let row = match &args.row {
        Some(p) => {
            let s = std::fs::read_to_string(p)
                .with_context(|| format!("read row '{}'", p.display()))?;
            RowData::from_json_str(&s)?
        }
        None => RowData::new(args.main, args.secondary, args.justification)?,
    };

    let saver = ImageSaver::new(config.output.clone());
    let stem = row
        .output_stem()
        .unwrap_or_else(|| "lower_third".to_owned());
    let existing = saver.output_path(&args.out, &stem);
    if saver.should_skip(&existing) {
        eprintln!("skipped {} (already exists)", existing.display());
        return Ok(());
    }

    let generator = LowerThirdGenerator::new(config);
    let image = generator.generate_from_row(&row)?;
    let path = saver.save(&image, &args.out, &stem)?;

    eprintln!("wrote {}", path.display());
    Ok(())
}

fn cmd_batch(args: BatchArgs) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref())?;
    let rows = RowData::list_from_path(&args.rows)?;
    let saver = ImageSaver::new(config.output.clone());
    let generator = LowerThirdGenerator::with_loader(config, Arc::new(FontLoader::system()));

    let mut pool = rayon::ThreadPoolBuilder::new();
    if let Some(n) = args.threads {
        pool = pool.num_threads(n);
    }
    let pool = pool.build().context("build rayon thread pool")?;
    let report = pool.install(|| generator.generate_batch(&rows, &saver, &args.out));

    for (i, msg) in &report.failures {
        eprintln!("row {}: {msg}", i + 1);
    }
    eprintln!(
        "wrote {} file(s), skipped {}, failed {} in {}",
        report.generated.len(),
        report.skipped.len(),
        report.failed,
        args.out.display()
    );
    if report.failed > 0 {
        anyhow::bail!("{} row(s) failed", report.failed);
    }
    Ok(())
}

fn cmd_config(args: ConfigArgs) -> anyhow::Result<()> {
    Configuration::default().to_path(&args.out)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}
