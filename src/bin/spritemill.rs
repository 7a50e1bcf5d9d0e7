use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "spritemill", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Auto-detect a frame grid for a spritesheet and print it as JSON.
    Detect(DetectArgs),
    /// Cut a spritesheet into individual frame PNGs.
    Slice(SliceArgs),
    /// Simulate playback ticks and print the visited frame indices as JSON.
    Sequence(SequenceArgs),
}

#[derive(Parser, Debug)]
struct DetectArgs {
    /// Input spritesheet image.
    #[arg(long = "in")]
    in_path: PathBuf,
}

#[derive(Parser, Debug)]
struct SliceArgs {
    /// Input spritesheet image.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output directory for frame PNGs.
    #[arg(long)]
    out: PathBuf,

    /// Frame width in pixels (auto-detected when omitted).
    #[arg(long, requires = "frame_height")]
    frame_width: Option<u32>,

    /// Frame height in pixels (auto-detected when omitted).
    #[arg(long, requires = "frame_width")]
    frame_height: Option<u32>,

    /// Gap in pixels between adjacent cells.
    #[arg(long, default_value_t = 0)]
    padding: u32,

    /// Offset in pixels from the sheet edges to the first cell.
    #[arg(long, default_value_t = 0)]
    margin: u32,

    /// Treat the sheet as a strip of equal cells in this iteration order.
    #[arg(long, value_enum)]
    direction: Option<DirectionChoice>,

    /// Strip columns (with --direction).
    #[arg(long)]
    columns: Option<u32>,

    /// Strip rows (with --direction).
    #[arg(long)]
    rows: Option<u32>,

    /// Tight-crop each frame to its opaque bounding box.
    #[arg(long)]
    tight: bool,
}

#[derive(Parser, Debug)]
struct SequenceArgs {
    /// Number of frames in the animation.
    #[arg(long)]
    frames: usize,

    /// Playback speed in frames per second.
    #[arg(long, default_value_t = 10.0)]
    speed: f64,

    /// Wrap around at the ends.
    #[arg(long = "loop")]
    looped: bool,

    /// Bounce at the ends instead of wrapping.
    #[arg(long)]
    ping_pong: bool,

    /// Invert the effective playback direction.
    #[arg(long)]
    reverse: bool,

    /// Number of ticks to simulate.
    #[arg(long, default_value_t = 16)]
    ticks: usize,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum DirectionChoice {
    Horizontal,
    Vertical,
}

#[derive(Debug, serde::Serialize)]
struct SequenceReport {
    visited: Vec<usize>,
    ended: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Detect(args) => cmd_detect(args),
        Command::Slice(args) => cmd_slice(args),
        Command::Sequence(args) => cmd_sequence(args),
    }
}

fn read_sheet(path: &Path) -> anyhow::Result<spritemill::SheetImage> {
    let bytes =
        fs::read(path).with_context(|| format!("read spritesheet '{}'", path.display()))?;
    Ok(spritemill::SheetImage::decode(&bytes)?)
}

fn cmd_detect(args: DetectArgs) -> anyhow::Result<()> {
    let sheet = read_sheet(&args.in_path)?;
    let grid = spritemill::auto_detect_grid(&sheet);
    println!("{}", serde_json::to_string_pretty(&grid)?);
    Ok(())
}

fn cmd_slice(args: SliceArgs) -> anyhow::Result<()> {
    let sheet = read_sheet(&args.in_path)?;

    let frames = if let Some(direction) = args.direction {
        let (columns, rows) = match (args.columns, args.rows) {
            (Some(columns), Some(rows)) => (columns, rows),
            _ => anyhow::bail!("--direction requires --columns and --rows"),
        };
        let direction = match direction {
            DirectionChoice::Horizontal => spritemill::StripDirection::Horizontal,
            DirectionChoice::Vertical => spritemill::StripDirection::Vertical,
        };
        spritemill::extract_frames_with_direction(&sheet, columns, rows, direction)?
    } else {
        let grid = match (args.frame_width, args.frame_height) {
            (Some(frame_width), Some(frame_height)) => {
                let (columns, rows) = spritemill::compute_grid(&sheet, frame_width, frame_height);
                if columns == 0 || rows == 0 {
                    anyhow::bail!(
                        "frame size {frame_width}x{frame_height} yields no frames for a {}x{} sheet",
                        sheet.width(),
                        sheet.height()
                    );
                }
                spritemill::GridDescriptor {
                    frame_width,
                    frame_height,
                    columns,
                    rows,
                    padding: args.padding,
                    margin: args.margin,
                }
            }
            _ => spritemill::auto_detect_grid(&sheet),
        };
        spritemill::extract_frames(&sheet, &grid, None)?
    };

    let frames: Vec<spritemill::Frame> = if args.tight {
        frames.iter().map(spritemill::tight_crop).collect()
    } else {
        frames
    };

    fs::create_dir_all(&args.out)
        .with_context(|| format!("create output dir '{}'", args.out.display()))?;

    for (i, frame) in frames.iter().enumerate() {
        let path = args.out.join(format!("frame_{i:03}.png"));
        image::save_buffer_with_format(
            &path,
            &frame.rgba8,
            frame.width,
            frame.height,
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .with_context(|| format!("write png '{}'", path.display()))?;
    }

    eprintln!("wrote {} frames to {}", frames.len(), args.out.display());
    Ok(())
}

fn cmd_sequence(args: SequenceArgs) -> anyhow::Result<()> {
    let settings = spritemill::AnimationSettings {
        speed: spritemill::Speed::new(args.speed)?,
        looped: args.looped,
        ping_pong: args.ping_pong,
        reverse: args.reverse,
    };

    let mut player = spritemill::Player::new(args.frames, settings);
    player.start(Duration::ZERO);

    let mut report = SequenceReport {
        visited: Vec::with_capacity(args.ticks),
        ended: false,
    };
    for _ in 0..args.ticks {
        if player.state() != spritemill::PlayState::Playing {
            break;
        }
        match player.step() {
            spritemill::PlaybackEvent::Advanced(i) => report.visited.push(i),
            spritemill::PlaybackEvent::Ended => {
                report.ended = true;
                break;
            }
        }
    }

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
