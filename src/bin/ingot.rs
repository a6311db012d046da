use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "ingot", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Engrave text or a logo onto a base image and write a PNG.
    Render(RenderArgs),
    /// Print the engraving area for a base image drawn at the given size.
    Area(AreaArgs),
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ModeArg {
    Rect,
    Perspective,
}

impl From<ModeArg> for ingot::MappingMode {
    fn from(m: ModeArg) -> Self {
        match m {
            ModeArg::Rect => Self::Rect,
            ModeArg::Perspective => Self::Perspective,
        }
    }
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Base product image (URL, data URL or path).
    #[arg(long)]
    base: String,

    /// Text to engrave. Wins over --logo.
    #[arg(long)]
    text: Option<String>,

    /// Logo to engrave (URL, data URL or path).
    #[arg(long)]
    logo: Option<String>,

    /// TTF/OTF font used for text.
    #[arg(long)]
    font: Option<PathBuf>,

    /// Area mapping mode (defaults to the config's mode).
    #[arg(long, value_enum)]
    mode: Option<ModeArg>,

    /// Rotation in degrees.
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    rotate: f64,

    /// Uniform content scale.
    #[arg(long, default_value_t = 1.0)]
    scale: f64,

    /// Horizontal nudge in pixels.
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    offset_x: f64,

    /// Vertical nudge in pixels.
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    offset_y: f64,

    /// Content opacity in [0, 1].
    #[arg(long, default_value_t = 0.9)]
    opacity: f64,

    /// Compositor config JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output PNG path.
    #[arg(long, conflicts_with = "out_dir")]
    out: Option<PathBuf>,

    /// Output directory; the file is named `engraved-gold-bar-<unix ms>.png`.
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Also print the result as a data URL on stdout.
    #[arg(long, default_value_t = false)]
    data_url: bool,
}

#[derive(Parser, Debug)]
struct AreaArgs {
    /// Drawn base image width.
    #[arg(long)]
    width: f64,

    /// Drawn base image height.
    #[arg(long)]
    height: f64,

    /// Area mapping mode.
    #[arg(long, value_enum, default_value = "rect")]
    mode: ModeArg,

    /// Compositor config JSON (for custom area ratios).
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args).await,
        Command::Area(args) => cmd_area(args),
    }
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<ingot::CompositorConfig> {
    match path {
        Some(p) => ingot::CompositorConfig::from_json_file(p)
            .with_context(|| format!("load config '{}'", p.display())),
        None => Ok(ingot::CompositorConfig::default()),
    }
}

async fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let config = load_config(args.config.as_ref())?;
    let placement = ingot::PlacementSettings::new(
        args.rotate,
        args.scale,
        args.offset_x,
        args.offset_y,
        args.opacity,
        &config.placement_bounds,
    );

    let mut request =
        ingot::EngravingRequest::new(ingot::ImageRef::parse(&args.base)).with_placement(placement);
    if let Some(mode) = args.mode {
        request = request.with_mode(mode.into());
    }
    if let Some(text) = args.text {
        request = request.with_text(text);
    }
    if let Some(logo) = args.logo.as_deref() {
        request = request.with_logo(ingot::ImageRef::parse(logo));
    }

    let loader = ingot::ImageLoader::new(config.loader.clone())?;
    let mut compositor = ingot::EngravingCompositor::new(config)?;
    if let Some(font_path) = &args.font {
        let font = ingot::EngravingFont::from_path(font_path)
            .with_context(|| format!("load font '{}'", font_path.display()))?;
        compositor = compositor.with_font(font);
    }

    let result = ingot::render_engraving(&loader, &mut compositor, &request).await?;

    let out = match (args.out, args.out_dir) {
        (Some(out), _) => out,
        (None, dir) => {
            let ts = std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_millis() as u64)
                .unwrap_or(0);
            dir.unwrap_or_else(|| PathBuf::from("."))
                .join(ingot::download_file_name("engraved-gold-bar", ts))
        }
    };
    if let Some(parent) = out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

    let png = result.to_png()?;
    std::fs::write(&out, png).with_context(|| format!("write png '{}'", out.display()))?;
    if args.data_url {
        println!("{}", result.to_data_url()?);
    }

    eprintln!(
        "wrote {} ({})",
        out.display(),
        result.metadata.technique
    );
    Ok(())
}

fn cmd_area(args: AreaArgs) -> anyhow::Result<()> {
    let config = load_config(args.config.as_ref())?;
    let mapper = ingot::SurfaceMapper::new(config.area)?;
    let bounds = ingot::Rect::new(0.0, 0.0, args.width, args.height);
    let area = mapper.compute_area(bounds, args.mode.into())?;
    println!(
        "{}",
        serde_json::to_string_pretty(&area).context("serialize area")?
    );
    Ok(())
}
