use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use hoverpad_core::{
    compute_roi, Anchor, Event, HoverPad, NoopClassifier, PadConfig, PadState, PreviewSurface,
};
use hoverpad_hw::{Camera, PreviewWindow};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

mod config;

#[derive(Parser)]
#[command(name = "hoverpad", about = "HoverPad — gesture pad over a live camera feed")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the camera and show the pad (ESC or q to quit)
    Show {
        #[command(flatten)]
        pad: PadArgs,
        /// Frames to discard while the camera settles
        #[arg(long, default_value_t = 4)]
        warmup: usize,
        /// Requested camera resolution, before resizing to the pad size
        #[arg(long, default_value_t = 640)]
        capture_width: u32,
        #[arg(long, default_value_t = 480)]
        capture_height: u32,
    },
    /// Print the region of interest for a configuration as JSON
    Roi {
        #[command(flatten)]
        pad: PadArgs,
    },
    /// List video capture devices as JSON
    Devices,
}

/// Pad options; flags override the config file and `HOVERPAD_*` variables.
#[derive(Args)]
struct PadArgs {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Capture device index (/dev/videoN)
    #[arg(short, long)]
    device: Option<u32>,
    /// Pad width in pixels
    #[arg(long)]
    width: Option<u32>,
    /// Pad height in pixels
    #[arg(long)]
    height: Option<u32>,
    /// Corner the region is pinned to: tl, tr, bl, br
    #[arg(short, long)]
    anchor: Option<Anchor>,
    /// Region size as a fraction of the pad, in (0, 1]
    #[arg(long)]
    ratio: Option<f64>,
    /// Publish the classifier's diagnostic image
    #[arg(short, long)]
    verbose: bool,
    /// Cap on loop iterations per second
    #[arg(long)]
    max_fps: Option<u32>,
}

impl PadArgs {
    fn resolve(&self) -> Result<PadConfig> {
        let mut config = config::load(self.config.as_deref())?;
        if let Some(device) = self.device {
            config.device_id = device;
        }
        if let Some(width) = self.width {
            config.size.width = width;
        }
        if let Some(height) = self.height {
            config.size.height = height;
        }
        if let Some(anchor) = self.anchor {
            config.anchor = anchor;
        }
        if let Some(ratio) = self.ratio {
            config.ratio = ratio;
        }
        if self.verbose {
            config.verbose = true;
        }
        if self.max_fps.is_some() {
            config.max_fps = self.max_fps;
        }
        Ok(config)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Show {
            pad,
            warmup,
            capture_width,
            capture_height,
        } => show(pad.resolve()?, warmup, capture_width, capture_height),
        Commands::Roi { pad } => {
            let config = pad.resolve()?;
            let region = compute_roi(config.size, config.ratio, config.anchor)?;
            let out = serde_json::json!({
                "size": config.size,
                "ratio": config.ratio,
                "anchor": config.anchor,
                "region": region,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
            Ok(())
        }
        Commands::Devices => {
            let devices = Camera::list_devices();
            println!("{}", serde_json::to_string_pretty(&devices)?);
            Ok(())
        }
    }
}

fn show(config: PadConfig, warmup: usize, capture_width: u32, capture_height: u32) -> Result<()> {
    let mut camera = Camera::open(config.device_id, capture_width, capture_height)?;
    camera.warm_up(warmup);

    let (title, size) = (config.title.clone(), config.size);
    let pad = HoverPad::new(config, camera, NoopClassifier, move || {
        PreviewWindow::open(&title, size).map(|w| Box::new(w) as Box<dyn PreviewSurface>)
    })?;
    tracing::info!(region = ?pad.region(), "starting pad");
    pad.start()?;

    let reader = pad.reader();
    let mut last_event = Event::None;
    while reader.state() == PadState::Running {
        let event = reader.get_event();
        if event != last_event {
            tracing::info!(%event, "event");
            last_event = event;
        }
        std::thread::sleep(Duration::from_millis(100));
    }

    pad.join()?;
    tracing::info!("pad closed");
    Ok(())
}
