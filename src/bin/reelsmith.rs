use std::io::Write as _;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use tracing::Level;

use reelsmith::{
    FrameIndex, GenerateRequest, GenerateResponse, PreviewHost, RemotionCliBackend, Settings,
    Studio,
};

#[derive(Parser, Debug)]
#[command(name = "reelsmith", version)]
struct Cli {
    /// Settings JSON (composition, generator, export).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// More logging on stderr (-v info, -vv debug).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(flatten)]
    overrides: Overrides,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Args, Debug)]
struct Overrides {
    /// Override the composition length in frames.
    #[arg(long, global = true)]
    frames: Option<u64>,

    /// Override the composition frame rate (whole frames per second).
    #[arg(long, global = true)]
    fps: Option<u32>,

    /// Override the generator program.
    #[arg(long, global = true)]
    generator: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the prompt that would be sent to the generator.
    Prompt(DescribeArgs),
    /// Generate a component and print the response payload.
    Generate(GenerateArgs),
    /// Normalize raw generator output.
    Normalize(InArgs),
    /// Render one frame as JSON, or sweep the whole timeline.
    Preview(PreviewArgs),
    /// Bundle and render a component to a video file.
    Export(ExportArgs),
}

#[derive(Args, Debug)]
struct DescribeArgs {
    /// What the video should show.
    #[arg(long, short)]
    description: String,
}

#[derive(Args, Debug)]
struct GenerateArgs {
    #[command(flatten)]
    describe: DescribeArgs,

    /// Also write the normalized code here.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct InArgs {
    /// Input file.
    #[arg(long = "in")]
    in_path: PathBuf,
}

#[derive(Args, Debug)]
struct PreviewArgs {
    /// Component source.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Frame to render; without it every frame is rendered and stats are printed.
    #[arg(long)]
    frame: Option<u64>,

    /// Write the JSON here instead of stdout.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct ExportArgs {
    /// Component source.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output video path.
    #[arg(long)]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let settings = load_settings(cli.config.as_deref(), &cli.overrides)?;

    match cli.cmd {
        Command::Prompt(args) => cmd_prompt(&settings, args),
        Command::Generate(args) => cmd_generate(settings, args),
        Command::Normalize(args) => cmd_normalize(args),
        Command::Preview(args) => cmd_preview(&settings, args),
        Command::Export(args) => cmd_export(&settings, args),
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_settings(path: Option<&Path>, overrides: &Overrides) -> anyhow::Result<Settings> {
    let mut settings = match path {
        Some(path) => Settings::from_json_file(path)
            .with_context(|| format!("load settings '{}'", path.display()))?,
        None => Settings::default(),
    };
    if let Some(frames) = overrides.frames {
        settings.composition.duration_in_frames = frames;
    }
    if let Some(fps) = overrides.fps {
        settings.composition.fps = reelsmith::Fps::new(fps, 1)?;
    }
    if let Some(program) = &overrides.generator {
        settings.generator.program = program.clone();
    }
    settings.validate()?;
    Ok(settings)
}

fn read_text(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("read '{}'", path.display()))
}

fn write_output(out: Option<&Path>, text: &str) -> anyhow::Result<()> {
    match out {
        Some(path) => {
            std::fs::write(path, text).with_context(|| format!("write '{}'", path.display()))?;
            eprintln!("wrote {}", path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{text}").context("write stdout")?;
        }
    }
    Ok(())
}

fn cmd_prompt(settings: &Settings, args: DescribeArgs) -> anyhow::Result<()> {
    let prompt = reelsmith::assemble_prompt(&args.description, &settings.composition);
    write_output(None, &prompt)
}

fn cmd_generate(settings: Settings, args: GenerateArgs) -> anyhow::Result<()> {
    let studio = Studio::from_settings(settings)?;

    let response = studio.handle_generate(&GenerateRequest {
        description: args.describe.description,
    });
    write_output(None, &serde_json::to_string_pretty(&response)?)?;

    match response {
        GenerateResponse::Ok { code } => {
            if reelsmith::synthesize(&code, &studio.settings().composition).is_none() {
                eprintln!("{}", reelsmith::COMPILE_FAILED);
            }
            if let Some(out) = &args.out {
                std::fs::write(out, &code)
                    .with_context(|| format!("write '{}'", out.display()))?;
                eprintln!("wrote {}", out.display());
            }
            Ok(())
        }
        GenerateResponse::Err { error } => anyhow::bail!("generation failed: {error}"),
    }
}

fn cmd_normalize(args: InArgs) -> anyhow::Result<()> {
    let raw = read_text(&args.in_path)?;
    let report = reelsmith::normalize_with_report(&raw);
    tracing::info!(passes = ?report.applied, "normalized");
    write_output(None, &report.code)
}

fn cmd_preview(settings: &Settings, args: PreviewArgs) -> anyhow::Result<()> {
    let code = read_text(&args.in_path)?;
    let unit = reelsmith::synthesize_detailed(&code, &settings.composition)
        .with_context(|| format!("compile '{}'", args.in_path.display()))?;
    let mut host = PreviewHost::new(unit, settings.composition.clone())?;

    let json = match args.frame {
        Some(frame) => {
            let node = host.render_frame(FrameIndex(frame))?;
            serde_json::to_string_pretty(&node)?
        }
        None => {
            let stats = host.sweep(settings.composition.frame_range())?;
            if !stats.is_stable() {
                eprintln!(
                    "warning: {} frame(s) rendered differently when revisited",
                    stats.unstable_frames.len()
                );
            }
            serde_json::to_string_pretty(&stats)?
        }
    };
    write_output(args.out.as_deref(), &json)
}

fn cmd_export(settings: &Settings, args: ExportArgs) -> anyhow::Result<()> {
    let code = read_text(&args.in_path)?;
    let backend = RemotionCliBackend::new(settings.export.clone());
    let artifact =
        reelsmith::export_video(&code, &settings.composition, &settings.export, &backend)?;

    if let Some(parent) = args.out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(&args.out, &artifact.bytes)
        .with_context(|| format!("write video '{}'", args.out.display()))?;
    eprintln!("wrote {} ({} bytes)", args.out.display(), artifact.bytes.len());
    Ok(())
}
