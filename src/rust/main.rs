use hijaiyah::canvas::load_pixel_buffer;
use hijaiyah::console::{ConsoleCommand, HELP};
use hijaiyah::view::{render_history, render_outcome, render_settings, startup_banner};
use hijaiyah::{AppConfig, AppContext, Canvas, Drawing, HexColor, ModelManager, Session};
use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use log::info;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    paths: PathArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct PathArgs {
    /// Path to the ONNX model artifact
    #[arg(long, global = true)]
    model: Option<PathBuf>,

    /// Path to the letter description JSON file
    #[arg(long, global = true)]
    reference: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Classify a single drawing and exit
    Predict {
        /// Image file used as the canvas snapshot
        #[arg(long, conflicts_with = "strokes", required_unless_present = "strokes")]
        image: Option<PathBuf>,

        /// JSON stroke file drawn onto a fresh canvas
        #[arg(long)]
        strokes: Option<PathBuf>,

        /// Pen thickness (5-25)
        #[arg(long, default_value_t = 15)]
        pen_width: u32,

        /// Pen color
        #[arg(long, default_value = "#000000")]
        pen_color: HexColor,

        /// Background color
        #[arg(long, default_value = "#FFFFFF")]
        background: HexColor,
    },
    /// Start an interactive drawing session
    Session,
    /// Download the model artifact into the models directory and verify its SHA-256
    Fetch {
        #[arg(long)]
        url: String,

        #[arg(long)]
        sha256: String,
    },
}

fn load_config(paths: &PathArgs) -> AppConfig {
    let mut config = AppConfig::from_env();
    if let Some(model) = &paths.model {
        config = config.with_model_path(model);
    }
    if let Some(reference) = &paths.reference {
        config = config.with_reference_path(reference);
    }
    config
}

fn start(config: &AppConfig) -> Arc<AppContext> {
    let start_time = Instant::now();
    let ctx = Arc::new(AppContext::new(config));
    info!("Application ready (took {:.2?})", start_time.elapsed());
    if let Some(banner) = startup_banner(&ctx) {
        eprintln!("{}", banner);
    }
    ctx
}

#[tokio::main]
async fn main() -> Result<()> {
    hijaiyah::init_logger();
    let args = Cli::parse();

    match args.command {
        Command::Predict {
            image,
            strokes,
            pen_width,
            pen_color,
            background,
        } => {
            let ctx = start(&load_config(&args.paths));
            let mut session = Session::new(ctx);
            let settings = session.settings_mut();
            settings.set_stroke_width(pen_width)?;
            settings.stroke_color = pen_color;
            settings.background_color = background;

            let buffer = match (image, strokes) {
                (Some(image), _) => load_pixel_buffer(&image)
                    .with_context(|| format!("reading {}", image.display()))?,
                (None, Some(strokes)) => {
                    let drawing = Drawing::from_json_file(&strokes)
                        .with_context(|| format!("reading {}", strokes.display()))?;
                    let mut canvas = Canvas::new(session.settings());
                    canvas.draw(&drawing, session.settings());
                    canvas.pixels()
                }
                (None, None) => bail!("either --image or --strokes is required"),
            };

            println!("{}", render_outcome(&session.predict(buffer.view())));
        }
        Command::Session => {
            let ctx = start(&load_config(&args.paths));
            let result = run_session(Session::new(Arc::clone(&ctx)));
            ctx.shutdown();
            result?;
        }
        Command::Fetch { url, sha256 } => {
            let manager = ModelManager::new_default();
            let path = manager.download_model(&url, &sha256).await?;
            println!("Model ready at {}", path.display());
        }
    }

    Ok(())
}

fn run_session(mut session: Session) -> Result<()> {
    let mut canvas = Canvas::new(session.settings());
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    println!("Draw a Hijaiyah letter, then type 'predict'. Type 'help' for commands.");
    loop {
        print!("> ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        if line.trim().is_empty() {
            continue;
        }

        let command = match line.parse::<ConsoleCommand>() {
            Ok(command) => command,
            Err(e) => {
                println!("{}", e);
                continue;
            }
        };

        match command {
            ConsoleCommand::Pen(width) => match session.settings_mut().set_stroke_width(width) {
                Ok(()) => println!("{}", render_settings(session.settings())),
                Err(e) => println!("{}", e),
            },
            ConsoleCommand::Color(color) => {
                session.settings_mut().stroke_color = color;
                println!("{}", render_settings(session.settings()));
            }
            ConsoleCommand::Background(color) => {
                session.settings_mut().background_color = color;
                canvas.clear(session.settings());
                println!("{}", render_settings(session.settings()));
            }
            ConsoleCommand::Draw(path) => match Drawing::from_json_file(&path) {
                Ok(drawing) => {
                    canvas.draw(&drawing, session.settings());
                    println!("Added {} stroke(s)", drawing.strokes.len());
                }
                Err(e) => println!("{}", e),
            },
            ConsoleCommand::Load(path) => match load_pixel_buffer(&path) {
                Ok(buffer) => {
                    let outcome = session.predict(buffer.view());
                    println!("{}", render_outcome(&outcome));
                }
                Err(e) => println!("{}", e),
            },
            ConsoleCommand::Clear => {
                canvas.clear(session.settings());
                println!("Canvas cleared");
            }
            ConsoleCommand::Predict => {
                let outcome = session.predict(canvas.pixels().view());
                println!("{}", render_outcome(&outcome));
            }
            ConsoleCommand::History => println!("{}", render_history(&session.history_lines())),
            ConsoleCommand::Settings => println!("{}", render_settings(session.settings())),
            ConsoleCommand::Help => println!("{}", HELP),
            ConsoleCommand::Quit => break,
        }
    }

    info!("Session ended after {} prediction(s)", session.history().len());
    Ok(())
}
