//! FOMO Vision CLI
//!
//! Runs the capture → detect loop against a mock camera and a grid
//! engine, logging every detection.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use clap::Parser;
use fomo_vision::{
    capture::{Camera, FileConfig, MockCamera, PixelFormat},
    inference::GridEngine,
    metrics::{MetricsRegistry, MetricsSnapshot},
    Detector,
};
use tracing::{info, warn};

/// Object detection demo on synthetic camera frames.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// TOML configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Number of frames to process
    #[arg(long, value_name = "COUNT")]
    frames: Option<u32>,

    /// Run until interrupted
    #[arg(long)]
    continuous: bool,

    /// Pass verbose diagnostics to the engine
    #[arg(long)]
    debug: bool,

    /// Capture RGB565 frames and feed the model RGB888
    #[arg(long)]
    color: bool,

    /// Print Prometheus metrics when done
    #[arg(long)]
    metrics: bool,
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => match FileConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Failed to load config {}: {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => FileConfig::default(),
    };

    if let Some(frames) = args.frames {
        config.output.frame_count = frames;
    }
    config.output.continuous |= args.continuous;
    config.output.print_metrics |= args.metrics;
    config.detector.debug |= args.debug;
    if args.color {
        config.detector.color = true;
        config.capture.pixel_format = PixelFormat::Rgb565;
    }

    info!("FOMO Vision v{}", fomo_vision::VERSION);
    info!("This is a demonstration using mock camera input");

    let mut camera = MockCamera::new();
    if let Err(e) = camera.open(&config.capture) {
        eprintln!("Failed to open camera: {}", e);
        std::process::exit(1);
    }

    let mut detector = Detector::new(GridEngine::from_config(&config.detector));
    detector.configure(config.detector.debug);

    let registry = match MetricsRegistry::new() {
        Ok(registry) => registry,
        Err(e) => {
            eprintln!("Failed to create metrics registry: {}", e);
            std::process::exit(1);
        }
    };

    let running = Arc::new(AtomicBool::new(true));
    {
        let running = Arc::clone(&running);
        if let Err(e) = ctrlc::set_handler(move || running.store(false, Ordering::SeqCst)) {
            warn!("Failed to install Ctrl-C handler: {}", e);
        }
    }

    let frame_size = (config.capture.width, config.capture.height);
    let model_size = (config.detector.input_width, config.detector.input_height);
    let mut processed = 0u32;

    info!("Processing frames...");

    while running.load(Ordering::SeqCst)
        && (config.output.continuous || processed < config.output.frame_count)
    {
        let frame = match camera.capture() {
            Ok(f) => f,
            Err(e) => {
                warn!("Frame capture failed: {}", e);
                continue;
            }
        };
        processed += 1;

        if let Err(e) = detector.detect_objects(&frame) {
            warn!("Frame {}: detection failed: {}", frame.sequence(), e);
            continue;
        }

        let stamp = chrono::Local::now().format("%H:%M:%S%.3f");
        if !detector.found() {
            info!("[{}] frame {}: no objects", stamp, frame.sequence());
        }
        detector.for_each(|i, bbox| {
            let on_frame = bbox.scaled(model_size, frame_size);
            info!(
                "[{}] frame {}: #{} {} {} (frame coords {})",
                stamp,
                frame.sequence(),
                i,
                detector.label(&bbox).unwrap_or("?"),
                bbox,
                on_frame
            );
        });
        info!(
            "dsp {:?}, classification {:?}, total {:?}, wall {:?}",
            detector.dsp_time(),
            detector.classification_time(),
            detector.total_time(),
            detector.benchmark().elapsed()
        );

        registry.update(&MetricsSnapshot::from_detector(&detector));
    }

    camera.close();

    let stats = detector.stats();
    info!(
        "Processed {} frames: {} ok, {} input errors, {} inference errors, {} objects",
        stats.calls, stats.successes, stats.input_errors, stats.inference_errors, stats.objects
    );

    if config.output.print_metrics {
        match registry.encode() {
            Ok(text) => println!("{}", text),
            Err(e) => warn!("Failed to encode metrics: {}", e),
        }
    }
}
