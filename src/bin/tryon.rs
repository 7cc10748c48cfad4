use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};

use tryon::{
    AssetListing, Detection, DirectoryAssetSource, DirectorySink, FrameInputs, FrameRenderer,
    FrameSource, ImmediateFeed, JewelryAsset, JewelryLayer, LandmarkSet, SegmentationMask,
    SessionOpts, SessionState, Slot, SmoothedState, StillFrameSource, TryOnConfig, TryOnResult,
    TryOnSession, VideoFrame, Watermark, build_fontdb, encode_png,
};

#[derive(Parser, Debug)]
#[command(name = "tryon", version)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Composite one still frame with one asset and write a PNG.
    Frame(FrameArgs),
    /// Run "try all" over a category directory and write every snapshot.
    Sequence(SequenceArgs),
}

#[derive(clap::Args, Debug)]
struct SceneArgs {
    /// Camera frame image.
    #[arg(long)]
    frame: PathBuf,

    /// Face landmarks JSON: an array of `{x, y, z}` in normalized frame coordinates.
    #[arg(long)]
    landmarks: PathBuf,

    /// Person segmentation mask image (bright = person).
    #[arg(long)]
    mask: Option<PathBuf>,

    /// Watermark image (PNG, JPEG or SVG).
    #[arg(long)]
    watermark: Option<PathBuf>,

    /// Config JSON overriding the defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Extra directory of `.ttf`/`.otf` fonts for captions and SVG text.
    #[arg(long)]
    font_dir: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SlotArg {
    Earrings,
    Necklace,
}

impl From<SlotArg> for Slot {
    fn from(s: SlotArg) -> Self {
        match s {
            SlotArg::Earrings => Slot::Earrings,
            SlotArg::Necklace => Slot::Necklace,
        }
    }
}

#[derive(Parser, Debug)]
struct FrameArgs {
    #[command(flatten)]
    scene: SceneArgs,

    /// Jewelry image to place.
    #[arg(long)]
    asset: Option<PathBuf>,

    #[arg(long, value_enum, default_value = "necklace")]
    slot: SlotArg,

    /// Caption text drawn bottom-left, as on snapshots.
    #[arg(long)]
    caption: Option<String>,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct SequenceArgs {
    #[command(flatten)]
    scene: SceneArgs,

    /// Root directory with one sub-directory per category.
    #[arg(long)]
    assets: PathBuf,

    /// Category (sub-directory name) to run through.
    #[arg(long)]
    category: String,

    /// Simulated frame interval in milliseconds.
    #[arg(long, default_value_t = 33)]
    tick_ms: u64,

    /// Output directory for the gallery.
    #[arg(long)]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let level = match cli.verbose {
        0 => tracing::Level::INFO,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .init();

    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Sequence(args) => cmd_sequence(args),
    }
}

struct Scene {
    cfg: TryOnConfig,
    source: StillFrameSource,
    frame: VideoFrame,
    face: LandmarkSet,
    mask: Option<SegmentationMask>,
    watermark: Option<Vec<u8>>,
    fontdb: Arc<usvg::fontdb::Database>,
}

fn load_scene(args: &SceneArgs) -> anyhow::Result<Scene> {
    let cfg = match &args.config {
        Some(p) => TryOnConfig::from_path(p)?,
        None => TryOnConfig::default(),
    };

    let mut source = StillFrameSource::new(&args.frame);
    source.open()?;
    let frame = source
        .next_frame()?
        .context("frame source produced no frame")?;

    let text = std::fs::read_to_string(&args.landmarks)
        .with_context(|| format!("read landmarks '{}'", args.landmarks.display()))?;
    let face = LandmarkSet::from_json_str(&text)?;

    let mask = args
        .mask
        .as_deref()
        .map(|p| read_bytes(p).and_then(|b| Ok(SegmentationMask::from_image_bytes(&b)?)))
        .transpose()?;
    let watermark = args.watermark.as_deref().map(read_bytes).transpose()?;

    let dirs: Vec<&Path> = args.font_dir.as_deref().into_iter().collect();
    let fontdb = build_fontdb(&dirs);

    Ok(Scene {
        cfg,
        source,
        frame,
        face,
        mask,
        watermark,
        fontdb,
    })
}

fn read_bytes(path: &Path) -> anyhow::Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("read '{}'", path.display()))
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let scene = load_scene(&args.scene)?;
    let mut renderer = FrameRenderer::new(&scene.cfg, scene.fontdb.clone());
    if let Some(bytes) = &scene.watermark {
        renderer.set_watermark(Some(Watermark::from_bytes(bytes, scene.fontdb.clone())?));
    }

    let asset = args
        .asset
        .as_deref()
        .map(|p| load_asset(p, scene.fontdb.clone()))
        .transpose()?;
    let layers: Vec<JewelryLayer<'_>> = asset
        .iter()
        .map(|asset| JewelryLayer {
            slot: args.slot.into(),
            asset,
        })
        .collect();

    let mut tracking = SmoothedState::new(&scene.cfg.smoothing);
    let view = renderer.view_for(scene.frame.canvas());
    if tracking.update(Some(scene.face), &view).is_none() {
        tracing::warn!("landmarks lack ear/neck anchors; rendering video only");
    }

    let (surface, report) = renderer.render(FrameInputs {
        frame: &scene.frame,
        face: tracking.current(),
        jewelry: &layers,
        mask: scene.mask.as_ref(),
        caption: args.caption.as_deref(),
    })?;
    tracing::info!(?report, "frame rendered");

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    let png = encode_png(&surface)?;
    std::fs::write(&args.out, png)
        .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn load_asset(path: &Path, fontdb: Arc<usvg::fontdb::Database>) -> anyhow::Result<JewelryAsset> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("asset")
        .to_string();
    let listing = AssetListing {
        id: name.clone(),
        name,
        source_uri: path.display().to_string(),
    };
    let bytes = read_bytes(path)?;
    Ok(JewelryAsset::decode(&listing, &bytes, fontdb)?)
}

fn cmd_sequence(args: SequenceArgs) -> anyhow::Result<()> {
    let Scene {
        cfg,
        mut source,
        frame: _,
        face,
        mask,
        watermark,
        fontdb,
    } = load_scene(&args.scene)?;

    let detection = ImmediateFeed::new(move |f: &VideoFrame| Detection {
        face: Some(face.clone()),
        hand: None,
        frame_size: f.canvas(),
    });
    let segmentation = mask.map(|mask| {
        Box::new(ImmediateFeed::new(move |_: &VideoFrame| -> TryOnResult<SegmentationMask> {
            Ok(mask.clone())
        })) as Box<dyn tryon::SegmentationFeed + Send>
    });

    let mut session = TryOnSession::new(
        cfg,
        SessionOpts {
            assets: Box::new(DirectoryAssetSource::new(&args.assets)),
            detection: Box::new(detection),
            segmentation,
            fontdb: Some(fontdb),
        },
    )?;
    if let Some(bytes) = &watermark {
        session.set_watermark_bytes(bytes)?;
    }

    let count = session.select_category(&args.category)?;
    tracing::info!(category = %args.category, assets = count, "category loaded");

    let tick = Duration::from_millis(args.tick_ms.max(1));
    let mut now = Duration::ZERO;
    let Some(first) = source.next_frame()? else {
        anyhow::bail!("frame source produced no frame");
    };
    session.on_frame(now, first)?;
    session.start_auto_sequence(now)?;
    while session.is_sequence_running() {
        now += tick;
        let Some(frame) = source.next_frame()? else {
            session.stop_auto_sequence();
            break;
        };
        session.on_frame(now, frame)?;
    }

    if session.state() != SessionState::GalleryOpen {
        anyhow::bail!("no snapshots captured (is the face visible in the frame?)");
    }
    let mut sink = DirectorySink::create(&args.out)?;
    let written = session.export_gallery(&mut sink)?;
    eprintln!("wrote {written} snapshots to {}", args.out.display());
    Ok(())
}
