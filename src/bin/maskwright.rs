use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};

use maskwright::{
    EditParams, EditSession, ImageSize, MaskwrightConfig, OutputFormat, Quality, SourceImage,
    StrokeScript,
};

#[derive(Parser, Debug)]
#[command(name = "maskwright", version)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay a stroke script over an image and write the mask PNG.
    Mask(MaskArgs),
    /// Build the multipart edit request body for an image, stroke script and prompt.
    Request(RequestArgs),
}

#[derive(Args, Debug)]
struct InputArgs {
    /// Source image (png, jpeg or webp).
    #[arg(long)]
    image: PathBuf,

    /// Stroke script JSON.
    #[arg(long)]
    strokes: PathBuf,

    /// Config JSON; `MASKWRIGHT_*` environment variables override it.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct MaskArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Args, Debug)]
struct RequestArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Edit instruction sent with the request.
    #[arg(long)]
    prompt: String,

    /// Output path for the request body.
    #[arg(long)]
    out: PathBuf,

    #[arg(long, default_value = "gpt-image-1")]
    model: String,

    /// low, medium, high or auto.
    #[arg(long, default_value = "auto")]
    quality: Quality,

    /// auto, 1024x1024, 1536x1024 or 1024x1536.
    #[arg(long, default_value = "auto")]
    size: ImageSize,

    /// png, webp or jpeg.
    #[arg(long, default_value = "png")]
    format: OutputFormat,

    /// Number of images to generate (1-10).
    #[arg(long, default_value_t = 1)]
    n: u8,

    /// Output compression for webp/jpeg (0-100).
    #[arg(long, default_value_t = 100)]
    compression: u8,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match cli.cmd {
        Command::Mask(args) => cmd_mask(args),
        Command::Request(args) => cmd_request(args),
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .with_target(false)
        .init();
}

fn load_session(input: &InputArgs) -> anyhow::Result<EditSession> {
    let config = match &input.config {
        Some(path) => MaskwrightConfig::from_path(path)?,
        None => MaskwrightConfig::default(),
    }
    .apply_env();
    config.validate()?;

    let source = SourceImage::from_path(&input.image, config.max_upload_bytes)
        .with_context(|| format!("load image '{}'", input.image.display()))?;
    let script = StrokeScript::from_path(&input.strokes)?;

    let mut session = EditSession::new(source, script.display, config);
    let stats = script
        .replay(&mut session)
        .with_context(|| format!("replay '{}'", input.strokes.display()))?;
    tracing::info!(
        strokes = stats.strokes,
        undos = stats.undos,
        redos = stats.redos,
        clears = stats.clears,
        "strokes replayed"
    );
    Ok(session)
}

fn cmd_mask(args: MaskArgs) -> anyhow::Result<()> {
    let mut session = load_session(&args.input)?;
    let mask = session.working_mask()?;
    let stats = mask.stats();
    if stats.is_degenerate() {
        tracing::warn!("mask has no transparent pixels; nothing would be edited");
    }
    let png = mask.encode_png()?;
    write_output(&args.out, &png)?;

    eprintln!(
        "wrote {} ({}, {:.1}% marked for edit)",
        args.out.display(),
        mask.size(),
        stats.edit_fraction() * 100.0
    );
    Ok(())
}

fn cmd_request(args: RequestArgs) -> anyhow::Result<()> {
    let mut session = load_session(&args.input)?;
    let params = EditParams {
        model: args.model,
        quality: args.quality,
        size: args.size,
        output_format: args.format,
        n: args.n,
        output_compression: args.compression,
    };
    let request = session.build_request(&args.prompt, params)?;
    let boundary = request.multipart_boundary();
    let body = request.to_multipart(&boundary)?;
    write_output(&args.out, &body)?;

    println!("{}", maskwright::submit::multipart::content_type(&boundary));
    eprintln!(
        "wrote {} ({} bytes, image {}{})",
        args.out.display(),
        body.len(),
        request.image().size,
        if request.was_downscaled() {
            ", downscaled"
        } else {
            ""
        }
    );
    Ok(())
}

fn write_output(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(path, bytes).with_context(|| format!("write '{}'", path.display()))
}
