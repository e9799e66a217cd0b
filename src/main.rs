use base64::{engine::general_purpose::STANDARD, Engine as _};
use clap::{Parser, Subcommand};
use menu_photographer::{
    logger::{self, LogLevel, LoggerConfig},
    save_image, Dish, GeminiClient, GeminiConfig, GeneratedImage, ImageData, ImageStyle,
    ModelGateway, RunEvent, Session, StudioError, IMAGE_STYLES,
};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "menu-photographer", version, about = "Turn your menu into a masterpiece")]
struct Cli {
    /// Debug-level logging with source locations.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Also append log lines to this file.
    #[arg(long, global = true)]
    log_file: Option<String>,

    /// One JSON object per log line, no colors or emojis.
    #[arg(long, global = true, conflicts_with = "verbose")]
    json_logs: bool,

    /// Plain log lines without ANSI colors.
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the photographic style presets.
    Styles,
    /// Print a model-written sample menu.
    SampleMenu,
    /// Photograph every main dish on a menu.
    Generate {
        /// Menu text file, or `-` for stdin.
        #[arg(short, long, conflicts_with = "sample")]
        menu: Option<PathBuf>,
        /// Use a generated sample menu instead of reading one.
        #[arg(long)]
        sample: bool,
        #[arg(short, long, default_value = "Bright & Modern")]
        style: String,
        #[arg(short, long, default_value = "photos")]
        out: PathBuf,
        /// Print social captions for each photo.
        #[arg(long)]
        captions: bool,
    },
    /// Edit an existing photo with a free-text instruction.
    Edit {
        #[arg(short, long)]
        image: PathBuf,
        #[arg(long)]
        instruction: String,
        /// Dish name used for the output file (defaults to the input file stem).
        #[arg(long)]
        dish: Option<String>,
        #[arg(short, long, default_value = "edited")]
        out: PathBuf,
    },
    /// Write three social captions for a dish.
    Captions {
        #[arg(long)]
        dish: String,
        #[arg(long)]
        description: String,
        #[arg(short, long, default_value = "Bright & Modern")]
        style: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let dotenv_loaded = dotenv::dotenv().is_ok();

    let mut log_config = if cli.json_logs {
        LoggerConfig::production()
    } else if cli.verbose {
        LoggerConfig::development()
    } else {
        LoggerConfig::default().with_level(LogLevel::Info)
    };
    if cli.no_color {
        log_config = log_config.with_colors(false);
    }
    if let Some(path) = &cli.log_file {
        log_config = log_config.with_file_output(path);
    }
    logger::init_with_config(log_config)?;
    logger::log_startup_info(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    if !dotenv_loaded {
        log::debug!("No .env file found, using process environment");
    }

    if let Command::Styles = cli.command {
        for style in IMAGE_STYLES.iter() {
            println!("{}\n    {}", style.name, style.prompt);
        }
        return Ok(());
    }

    let config = GeminiConfig::from_env().map_err(|e| {
        log::error!("❌ {}", e);
        e
    })?;
    logger::log_config_info(&config);
    let client = Arc::new(GeminiClient::new(config)?);

    match cli.command {
        Command::Styles => Ok(()),
        Command::SampleMenu => {
            println!("{}", client.generate_sample_menu().await?);
            Ok(())
        }
        Command::Generate {
            menu,
            sample,
            style,
            out,
            captions,
        } => run_generate(client, menu, sample, &style, &out, captions).await,
        Command::Edit {
            image,
            instruction,
            dish,
            out,
        } => run_edit(client.as_ref(), &image, &instruction, dish, &out).await,
        Command::Captions {
            dish,
            description,
            style,
        } => {
            let style = resolve_style(&style)?;
            let captions = client
                .generate_captions(&dish, &description, style.prompt)
                .await?;
            print_captions(&captions);
            Ok(())
        }
    }
}

fn resolve_style(name: &str) -> Result<ImageStyle, StudioError> {
    ImageStyle::by_name(name).ok_or_else(|| StudioError::UnknownStyle(name.to_string()))
}

fn read_menu(path: &Path) -> io::Result<String> {
    if path == Path::new("-") {
        let mut text = String::new();
        io::stdin().read_to_string(&mut text)?;
        Ok(text)
    } else {
        fs::read_to_string(path)
    }
}

async fn run_generate(
    client: Arc<GeminiClient>,
    menu: Option<PathBuf>,
    sample: bool,
    style: &str,
    out: &Path,
    with_captions: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = Session::new(client);
    session.select_style(style)?;

    if sample {
        if !session.load_sample_menu().await {
            return Err(session.error_message().unwrap_or_default().into());
        }
        println!("{}\n", session.menu_text().trim());
    } else {
        let path = menu.unwrap_or_else(|| PathBuf::from("-"));
        session.set_menu_text(read_menu(&path)?);
    }

    log::info!("🎨 Style: {}", session.style().name);
    let mut saved = Vec::new();
    let generated = session
        .generate_photos_with(|event, _| match event {
            RunEvent::Progress(message) => log::info!("{}", message),
            RunEvent::ImageGenerated { image, .. } => match save_image(image, out) {
                Ok(path) => saved.push((image.id.clone(), path)),
                Err(e) => log::error!("❌ Could not save {}: {}", image.dish_name, e),
            },
            _ => {}
        })
        .await;

    for (_, path) in &saved {
        println!("{}", path.display());
    }
    let run_error = session.error_message();
    if let Some(message) = &run_error {
        log::error!("❌ Stopped after {} photo(s): {}", generated, message);
    }

    if with_captions {
        let ids: Vec<String> = session.gallery().ids().to_vec();
        for id in ids {
            let ok = session.open_captions(&id).await;
            if let Some(image) = session.gallery().get(&id) {
                println!("\n{}", image.dish_name);
            }
            if ok {
                print_captions(session.captions());
            } else if let Some(message) = session.dialog_error_message() {
                println!("   (no captions: {})", message);
            }
            session.close_dialog();
        }
    }

    if let Some(message) = run_error {
        return Err(message.into());
    }
    log::info!("🎉 {} photo(s) saved to {}", generated, out.display());
    Ok(())
}

async fn run_edit(
    client: &GeminiClient,
    image_path: &Path,
    instruction: &str,
    dish: Option<String>,
    out: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    if instruction.trim().is_empty() {
        return Err(StudioError::EmptyInstruction.into());
    }

    let bytes = fs::read(image_path)?;
    let source = ImageData {
        base64: STANDARD.encode(bytes),
        mime_type: mime_for_path(image_path).to_string(),
    };
    let dish_name = dish.unwrap_or_else(|| {
        image_path
            .file_stem()
            .map(|s| s.to_string_lossy().replace('-', " "))
            .unwrap_or_else(|| "edited".to_string())
    });

    let edited = client.edit_image(&source, instruction).await?;
    let image = GeneratedImage::new(&Dish::new(dish_name.as_str(), ""), "", edited);
    let path = save_image(&image, out)?;
    println!("{}", path.display());
    Ok(())
}

fn mime_for_path(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("webp") => "image/webp",
        _ => "image/png",
    }
}

fn print_captions(captions: &[String]) {
    for (i, caption) in captions.iter().enumerate() {
        println!("{}. {}", i + 1, caption);
    }
}
