use std::path::{Path, PathBuf};

use anyhow::Context as _;
use chrono::{Local, NaiveDate, Utc};
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "moonlake", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a single frame of the scene as a PNG.
    Frame(FrameArgs),
    /// Render a PNG frame sequence.
    Frames(FramesArgs),
    /// Inspect or update the dream journal.
    Journal(JournalArgs),
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Elapsed scene time in seconds.
    #[arg(long, default_value_t = 0.0)]
    time: f64,

    #[arg(long, default_value_t = 1280)]
    width: u32,

    #[arg(long, default_value_t = 720)]
    height: u32,

    /// Optional scene parameters JSON.
    #[arg(long)]
    params: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct FramesArgs {
    /// Output directory for frame_00000.png ...
    #[arg(long)]
    out_dir: PathBuf,

    /// Number of frames to render.
    #[arg(long)]
    count: u32,

    /// Frames per second of scene time.
    #[arg(long, default_value_t = 30.0)]
    fps: f64,

    #[arg(long, default_value_t = 1280)]
    width: u32,

    #[arg(long, default_value_t = 720)]
    height: u32,

    /// Optional scene parameters JSON.
    #[arg(long)]
    params: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct JournalArgs {
    /// Journal store file (created on first write).
    #[arg(long)]
    store: PathBuf,

    #[command(subcommand)]
    cmd: JournalCommand,
}

#[derive(Subcommand, Debug)]
enum JournalCommand {
    /// Save a dream entry.
    Add {
        #[arg(long)]
        title: String,

        #[arg(long)]
        content: String,

        /// peaceful | adventurous | mysterious | scary | happy | sad
        #[arg(long)]
        mood: Option<String>,

        /// Dream date (YYYY-MM-DD); defaults to today.
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// List saved entries, optionally for one date.
    List {
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Print the month grid with entry marks.
    Calendar {
        #[arg(long)]
        month: u32,

        #[arg(long)]
        year: i32,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Frames(args) => cmd_frames(args),
        Command::Journal(args) => cmd_journal(args),
    }
}

fn read_params(path: Option<&Path>) -> anyhow::Result<moonlake::SceneParams> {
    match path {
        None => Ok(moonlake::SceneParams::default()),
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("open params '{}'", path.display()))?;
            serde_json::from_str(&content).with_context(|| "parse params JSON")
        }
    }
}

fn write_png(frame: &moonlake::FrameRGBA, out: &Path) -> anyhow::Result<()> {
    if let Some(parent) = out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    image::save_buffer_with_format(
        out,
        &frame.data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", out.display()))?;
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let params = read_params(args.params.as_deref())?;
    let scene = moonlake::build_scene(&params)?;
    let viewport = moonlake::Viewport::new(args.width, args.height)?;

    let mut backend =
        moonlake::create_backend(moonlake::BackendKind::Cpu, &moonlake::RenderSettings::default())?;
    let mut rloop = moonlake::RenderLoop::new(scene, viewport);
    let frame = rloop.render_at(args.time, backend.as_mut())?;

    write_png(&frame, &args.out)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_frames(args: FramesArgs) -> anyhow::Result<()> {
    let params = read_params(args.params.as_deref())?;
    let scene = moonlake::build_scene(&params)?;
    let viewport = moonlake::Viewport::new(args.width, args.height)?;

    let mut backend =
        moonlake::create_backend(moonlake::BackendKind::Cpu, &moonlake::RenderSettings::default())?;
    let mut rloop = moonlake::RenderLoop::new(scene, viewport);

    for i in 0..args.count {
        let time = f64::from(i) / args.fps;
        let frame = rloop.render_at(time, backend.as_mut())?;
        let out = args.out_dir.join(format!("frame_{i:05}.png"));
        write_png(&frame, &out)?;
    }

    eprintln!("wrote {} frames to {}", args.count, args.out_dir.display());
    Ok(())
}

fn cmd_journal(args: JournalArgs) -> anyhow::Result<()> {
    let store = moonlake::FileStore::open(&args.store)?;
    let today = Local::now().date_naive();
    let mut journal = moonlake::JournalStore::new(store, rand::thread_rng(), today);

    match args.cmd {
        JournalCommand::Add {
            title,
            content,
            mood,
            date,
        } => {
            journal.open(today)?;
            let form = journal.form_mut();
            form.title = title;
            form.content = content;
            if let Some(mood) = mood {
                form.mood = mood.parse()?;
            }
            if let Some(date) = date {
                form.date = date;
            }

            match journal.save(Utc::now())? {
                moonlake::SaveOutcome::Saved(entry) => {
                    eprintln!("saved dream {} ({})", entry.id, entry.date);
                    Ok(())
                }
                moonlake::SaveOutcome::Invalid(field) => {
                    anyhow::bail!("refusing to save: {field:?} is empty")
                }
            }
        }
        JournalCommand::List { date } => {
            let entries = match date {
                Some(date) => journal.list_for_date(date)?,
                None => journal.entries()?,
            };
            for entry in entries {
                println!(
                    "{}  {}  {:<11}  {}",
                    entry.id,
                    entry.date,
                    entry.mood.as_str(),
                    entry.title
                );
            }
            Ok(())
        }
        JournalCommand::Calendar { month, year } => {
            let entry_dates: Vec<NaiveDate> =
                journal.entries()?.iter().map(|e| e.date).collect();
            let grid = moonlake::month_grid(year, month, today, &entry_dates)?;

            let name = moonlake::MONTH_NAMES[(month as usize) - 1];
            println!("{name} {year}");
            println!(" Su  Mo  Tu  We  Th  Fr  Sa");
            for week in grid.chunks(7) {
                let row: Vec<String> = week
                    .iter()
                    .map(|cell| {
                        if !cell.in_month {
                            "   ".to_string()
                        } else if cell.has_entry {
                            format!("{:>2}*", cell.day)
                        } else if cell.today {
                            format!("{:>2}.", cell.day)
                        } else {
                            format!("{:>2} ", cell.day)
                        }
                    })
                    .collect();
                println!(" {}", row.join(" "));
            }
            Ok(())
        }
    }
}
