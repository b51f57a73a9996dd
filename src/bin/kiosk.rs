use std::{path::PathBuf, time::Duration};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "kiosk", version, about = "Transit arrival kiosk")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the kiosk loop against the wall clock.
    Run(RunArgs),
    /// Simulate the kiosk on a virtual clock and write one frame as PNG.
    Frame(FrameArgs),
    /// Atomically replace the background image.
    InstallBackground(InstallArgs),
}

#[derive(Args, Debug)]
struct ConfigArgs {
    /// Kiosk config JSON. Defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Read arrivals from this payload file instead of the live feed.
    #[arg(long)]
    payload: Option<PathBuf>,

    /// Background image to poll.
    #[arg(long)]
    background: Option<PathBuf>,

    /// Font used for text in written frames.
    #[arg(long)]
    font: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct RunArgs {
    #[command(flatten)]
    config: ConfigArgs,

    /// Stop after this many seconds. Runs forever when omitted.
    #[arg(long)]
    seconds: Option<u64>,

    /// Write the last frame here when the run ends.
    #[arg(long)]
    snapshot: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct FrameArgs {
    #[command(flatten)]
    config: ConfigArgs,

    /// Virtual time to simulate before capturing, in milliseconds.
    #[arg(long, default_value_t = 0)]
    at_ms: u64,

    /// Touch points `x,y` applied at time zero.
    #[arg(long = "touch", value_parser = parse_point)]
    touches: Vec<kiosk::Point>,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Args, Debug)]
struct InstallArgs {
    /// Image to install.
    #[arg(long)]
    src: PathBuf,

    /// Background path the kiosk polls.
    #[arg(long, default_value = "background/current.jpg")]
    dest: PathBuf,
}

fn parse_point(s: &str) -> Result<kiosk::Point, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected x,y but got '{s}'"))?;
    let x: f64 = x.trim().parse().map_err(|e| format!("bad x in '{s}': {e}"))?;
    let y: f64 = y.trim().parse().map_err(|e| format!("bad y in '{s}': {e}"))?;
    Ok(kiosk::Point::new(x, y))
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Run(args) => cmd_run(args),
        Command::Frame(args) => cmd_frame(args),
        Command::InstallBackground(args) => cmd_install(args),
    }
}

fn load_config(args: &ConfigArgs) -> anyhow::Result<kiosk::KioskConfig> {
    let mut cfg = match &args.config {
        Some(path) => kiosk::KioskConfig::from_path(path)?,
        None => kiosk::KioskConfig::default(),
    };
    if let Some(p) = &args.payload {
        cfg.feed.payload_path = Some(p.clone());
    }
    if let Some(p) = &args.background {
        cfg.background_path = p.clone();
    }
    if let Some(p) = &args.font {
        cfg.font_path = Some(p.clone());
    }
    Ok(cfg.with_process_env())
}

fn make_compositor(cfg: &kiosk::KioskConfig) -> anyhow::Result<kiosk::Compositor> {
    let compositor = match &cfg.font_path {
        Some(path) => kiosk::Compositor::with_font_path(path)
            .with_context(|| format!("load font '{}'", path.display()))?,
        None => kiosk::Compositor::new(),
    };
    if !compositor.has_font() {
        tracing::warn!("no font loaded; text layers are not drawn");
    }
    Ok(compositor)
}

fn cmd_run(args: RunArgs) -> anyhow::Result<()> {
    let cfg = load_config(&args.config)?;
    let mut compositor = make_compositor(&cfg)?;
    let mut kiosk = kiosk::Kiosk::from_config(&cfg)?;

    tracing::info!(
        width = cfg.canvas.width,
        height = cfg.canvas.height,
        background = %kiosk.controller().background().path().display(),
        frame_ms = kiosk.scheduler().interval().as_millis(),
        "kiosk starting"
    );
    kiosk.start();
    kiosk.run_realtime(args.seconds.map(Duration::from_secs));

    if let Some(out) = &args.snapshot {
        let frame = compositor.render_scene(kiosk.surface())?;
        frame.save_png(out)?;
        eprintln!("wrote {}", out.display());
    }
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let cfg = load_config(&args.config)?;
    let mut compositor = make_compositor(&cfg)?;
    let mut kiosk = kiosk::Kiosk::from_config(&cfg)?;

    kiosk.start();
    for p in &args.touches {
        kiosk.touch(*p);
    }
    let ran = kiosk.run_for(Duration::from_millis(args.at_ms));

    let frame = compositor.render_scene(kiosk.surface())?;
    frame.save_png(&args.out)?;
    if let Some(report) = kiosk.last_report() {
        eprintln!("{} / {}", report.text.primary, report.text.secondary);
    }
    eprintln!("ran {ran} tasks; wrote {}", args.out.display());
    Ok(())
}

fn cmd_install(args: InstallArgs) -> anyhow::Result<()> {
    let dest = kiosk::install_background(&args.src, &args.dest)?;
    eprintln!("installed {}", dest.display());
    Ok(())
}
