use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::Context as _;
use clap::{Parser, Subcommand};

use dissolve::{
    BackendKind, BackgroundStage, DissolveBackend, DissolveConfig, DissolveEngine, DissolvePreset,
    Extent, FsImageSource, PixelSurface, Preloader, SharedSurface, SurfaceLayout, Viewport,
    create_backend,
};

#[derive(Parser, Debug)]
#[command(name = "dissolve", version)]
struct Cli {
    /// Maximum log level written to stderr.
    #[arg(long, default_value_t = tracing::Level::WARN, global = true)]
    log_level: tracing::Level,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the noise mask as a grayscale PNG.
    Mask(MaskArgs),
    /// Render every frame of a transition between two images as PNGs.
    Frames(FramesArgs),
    /// Print the surface layout for a viewport as JSON.
    Layout(LayoutArgs),
}

#[derive(Parser, Debug)]
struct TuningArgs {
    /// Named preset (`classic` or `layered`).
    #[arg(long, default_value = "layered")]
    preset: String,

    /// JSON config file; overrides `--preset`.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Rasterization backend (`cpu`).
    #[arg(long, default_value = "cpu")]
    backend: String,
}

impl TuningArgs {
    fn backend(&self) -> anyhow::Result<Box<dyn DissolveBackend>> {
        Ok(create_backend(BackendKind::parse(&self.backend)?))
    }

    fn resolve(&self) -> anyhow::Result<DissolveConfig> {
        match &self.config {
            Some(path) => Ok(DissolveConfig::from_path(path)?),
            None => Ok(DissolvePreset::parse(&self.preset)?.config()),
        }
    }
}

#[derive(Parser, Debug)]
struct ViewportArgs {
    /// Viewport width in CSS pixels.
    #[arg(long, default_value_t = 1280)]
    width: u32,

    /// Viewport height in CSS pixels.
    #[arg(long, default_value_t = 720)]
    height: u32,

    /// Device pixel ratio.
    #[arg(long, default_value_t = 1.0)]
    dpr: f64,
}

impl ViewportArgs {
    fn viewport(&self) -> Viewport {
        Viewport::new(self.width, self.height).with_device_pixel_ratio(self.dpr)
    }
}

#[derive(Parser, Debug)]
struct MaskArgs {
    /// Mask width in pixels.
    #[arg(long, default_value_t = 800)]
    width: u32,

    /// Mask height in pixels.
    #[arg(long, default_value_t = 400)]
    height: u32,

    #[command(flatten)]
    tuning: TuningArgs,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct FramesArgs {
    /// Directory image locators are resolved against.
    #[arg(long, default_value = ".")]
    assets: PathBuf,

    /// Locator of the image shown first.
    #[arg(long)]
    from: String,

    /// Locator of the image revealed.
    #[arg(long)]
    to: String,

    #[command(flatten)]
    viewport: ViewportArgs,

    #[command(flatten)]
    tuning: TuningArgs,

    /// Simulated display refresh rate.
    #[arg(long, default_value_t = 60.0)]
    fps: f64,

    /// Output directory for `frame_NNNN.png` files.
    #[arg(long)]
    out_dir: PathBuf,
}

#[derive(Parser, Debug)]
struct LayoutArgs {
    #[command(flatten)]
    viewport: ViewportArgs,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(cli.log_level)
        .with_writer(std::io::stderr)
        .init();

    match cli.cmd {
        Command::Mask(args) => cmd_mask(args),
        Command::Frames(args) => cmd_frames(args),
        Command::Layout(args) => cmd_layout(args),
    }
}

fn cmd_mask(args: MaskArgs) -> anyhow::Result<()> {
    let config = args.tuning.resolve()?;
    let backend = args.tuning.backend()?;
    let mask = backend.render_mask(
        &config.noise_params(),
        Extent::new(args.width, args.height),
    )?;
    write_png(&args.out, mask.width(), mask.height(), &mask.to_rgba8())?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_frames(args: FramesArgs) -> anyhow::Result<()> {
    if !(args.fps.is_finite() && args.fps > 0.0) {
        anyhow::bail!("--fps must be a positive number, got {}", args.fps);
    }
    let config = args.tuning.resolve()?;
    let backend = args.tuning.backend()?;
    let interval_ms = 1000.0 / args.fps;
    let viewport = args.viewport.viewport();
    let mask_rows = SurfaceLayout::for_viewport(viewport).logical.height;
    // Generous cap in case the clock never reaches the duration.
    let max_ticks = ((config.duration_ms / interval_ms).ceil() as u64).saturating_mul(2)
        + u64::from(mask_rows.div_ceil(config.mask_rows_per_frame))
        + 2;

    let preloader = Preloader::new(FsImageSource::new(args.assets.clone()));
    let images = preloader
        .load(&[args.from.as_str(), args.to.as_str()])
        .with_context(|| {
            format!(
                "preload images under '{}'",
                preloader.source().root().display()
            )
        })?;
    let lookup = |locator: &str| {
        images
            .get(locator)
            .cloned()
            .with_context(|| format!("preloader returned no image for '{locator}'"))
    };
    let from = lookup(&args.from)?;
    let to = lookup(&args.to)?;

    let pixels = Rc::new(RefCell::new(PixelSurface::new(Extent::new(1, 1))?));
    let surface: SharedSurface = pixels.clone();
    let mut stage = BackgroundStage::new(
        DissolveEngine::with_backend(config, backend)?,
        surface,
        viewport,
    )?;
    stage.show(from)?;
    stage.navigate(to)?;

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create output dir '{}'", args.out_dir.display()))?;

    let mut ts = 0.0;
    let mut ticks = 0u64;
    let mut written = 0u64;
    while stage.is_transitioning() && ticks < max_ticks {
        let presented = pixels.borrow().present_count();
        stage.tick(ts);
        ticks += 1;
        ts += interval_ms;

        // Ticks spent rendering the mask present nothing.
        let px = pixels.borrow();
        if px.present_count() == presented {
            continue;
        }
        let frame = px.frame();
        let path = args.out_dir.join(format!("frame_{written:04}.png"));
        write_png(&path, frame.width, frame.height, &frame.to_straight_rgba8())?;
        written += 1;
    }

    eprintln!("wrote {written} frames to {}", args.out_dir.display());
    Ok(())
}

fn cmd_layout(args: LayoutArgs) -> anyhow::Result<()> {
    let layout = SurfaceLayout::for_viewport(args.viewport.viewport());
    let json = serde_json::to_string_pretty(&layout).context("serialize layout")?;
    println!("{json}");
    Ok(())
}

fn write_png(path: &Path, width: u32, height: u32, rgba: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    image::save_buffer_with_format(
        path,
        rgba,
        width,
        height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))
}
