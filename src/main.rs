use anyhow::{bail, Context, Result};
use clap::Parser;
use hueblob::color::rgb_to_hsv;
use hueblob::output::{OutlineSink, OverlayWriter};
use hueblob::source::{FrameSource, ImageSequenceSource};
use hueblob::{ColorBlobDetector, Hsv};
use std::time::{Duration, Instant};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input image file or directory of frames
    #[arg(short, long)]
    input: String,

    /// Target color as full-range HSV bytes, e.g. "170,200,220"
    #[arg(short, long, conflicts_with = "pick")]
    color: Option<String>,

    /// Pick the target color from a pixel of the first frame, e.g. "320,240"
    #[arg(short, long)]
    pick: Option<String>,

    /// Directory for overlay output
    #[arg(short, long, default_value = "out")]
    out_dir: String,

    /// Save the calibration spectrum strip next to the overlays
    #[arg(long)]
    save_spectrum: bool,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .init();

    tracing::info!("hueblob starting");
    tracing::info!("Input: {}", args.input);
    tracing::info!("Output: {}", args.out_dir);

    let mut source =
        ImageSequenceSource::new(&args.input).context("Failed to open frame source")?;
    let (width, height) = source.resolution();
    tracing::info!("Frames: {}x{}", width, height);

    let mut sink = OverlayWriter::new(&args.out_dir).context("Failed to open output sink")?;

    let detector = ColorBlobDetector::new();
    if let Some(spec) = &args.color {
        let target = parse_hsv(spec)?;
        tracing::info!(?target, "calibrating from --color");
        detector.calibrate(target);
    } else if args.pick.is_none() {
        bail!("one of --color or --pick is required");
    }

    let pick = args.pick.as_deref().map(parse_pixel).transpose()?;

    run_pipeline(&mut source, &mut sink, &detector, pick, args.save_spectrum)?;

    Ok(())
}

fn run_pipeline<C, O>(
    source: &mut C,
    sink: &mut O,
    detector: &ColorBlobDetector,
    pick: Option<(u32, u32)>,
    save_spectrum: bool,
) -> Result<()>
where
    C: FrameSource,
    O: OutlineSink,
{
    let mut frame_count = 0u64;
    let mut total_detect_time = Duration::ZERO;
    let mut total_output_time = Duration::ZERO;

    tracing::info!("Starting detection loop");

    while let Some(frame) = source.next_frame().context("Failed to read frame")? {
        // Tap-to-pick: sample the target color from the first frame.
        if frame_count == 0 {
            if let Some((x, y)) = pick {
                let (w, h) = frame.dimensions();
                if x >= w || y >= h {
                    bail!("pick coordinate ({x},{y}) outside {w}x{h} frame");
                }
                let px = frame.get_pixel(x, y);
                let target = rgb_to_hsv(px[0], px[1], px[2]);
                tracing::info!(x, y, ?target, "calibrating from picked pixel");
                detector.calibrate(target);
            }
            if save_spectrum {
                if let Some(spectrum) = detector.spectrum() {
                    sink.save_spectrum(&spectrum)
                        .context("Failed to save spectrum")?;
                }
            }
        }

        let detect_start = Instant::now();
        let outlines = detector.detect(&frame);
        let detect_time = detect_start.elapsed();
        total_detect_time += detect_time;

        let output_start = Instant::now();
        sink.write(&frame, &outlines)
            .context("Failed to write detection result")?;
        let output_time = output_start.elapsed();
        total_output_time += output_time;

        frame_count += 1;

        // Log stats every 30 frames
        if frame_count % 30 == 0 {
            let avg_detect_ms = total_detect_time.as_secs_f64() * 1000.0 / frame_count as f64;
            let avg_output_ms = total_output_time.as_secs_f64() * 1000.0 / frame_count as f64;
            tracing::info!(
                "Frame {}: detect={:.1}ms, output={:.1}ms, outlines={}",
                frame_count,
                avg_detect_ms,
                avg_output_ms,
                outlines.len()
            );
        }
    }

    tracing::info!("Processed {} frames", frame_count);
    Ok(())
}

fn parse_hsv(spec: &str) -> Result<Hsv> {
    let parts: Vec<&str> = spec.split(',').map(str::trim).collect();
    if parts.len() != 3 {
        bail!("expected H,S,V but got {spec:?}");
    }
    let channel = |s: &str| -> Result<u8> {
        s.parse::<u8>()
            .with_context(|| format!("invalid channel value {s:?}"))
    };
    Ok(Hsv::new(
        channel(parts[0])?,
        channel(parts[1])?,
        channel(parts[2])?,
    ))
}

fn parse_pixel(spec: &str) -> Result<(u32, u32)> {
    let parts: Vec<&str> = spec.split(',').map(str::trim).collect();
    if parts.len() != 2 {
        bail!("expected X,Y but got {spec:?}");
    }
    let coord = |s: &str| -> Result<u32> {
        s.parse::<u32>()
            .with_context(|| format!("invalid coordinate {s:?}"))
    };
    Ok((coord(parts[0])?, coord(parts[1])?))
}
