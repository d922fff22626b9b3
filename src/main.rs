use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};

use picdex::catalog::{self, Catalog, NewImage};
use picdex::config::Config;
use picdex::db::Database;
use picdex::export::{self, ExportFormat};
use picdex::logging;
use picdex::thumbs::{self, ThumbnailGenerator};

enum Command {
    Add(Box<NewImage>),
    List,
    Export { format: ExportFormat, output: PathBuf },
    Convert { source: PathBuf },
}

struct Cli {
    config_path: Option<PathBuf>,
    command: Command,
}

fn parse_args() -> Result<Cli> {
    let args: Vec<String> = std::env::args().collect();
    let mut config_path = None;
    let mut command = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                std::process::exit(0);
            }
            "--version" | "-V" => {
                println!("picdex {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            "--config" | "-c" => {
                config_path = Some(PathBuf::from(flag_value(&args, &mut i, "--config")?));
            }
            "add" => {
                command = Some(parse_add(&args, &mut i)?);
            }
            "list" => {
                command = Some(Command::List);
            }
            "export" => {
                command = Some(parse_export(&args, &mut i)?);
            }
            "convert" => {
                if i + 1 >= args.len() {
                    bail!("convert requires an image path argument");
                }
                i += 1;
                command = Some(Command::Convert {
                    source: PathBuf::from(&args[i]),
                });
            }
            other => {
                eprintln!("Unknown argument: {other}");
                print_help();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    let command = match command {
        Some(cmd) => cmd,
        None => {
            print_help();
            std::process::exit(1);
        }
    };

    Ok(Cli { config_path, command })
}

fn flag_value<'a>(args: &'a [String], i: &mut usize, flag: &str) -> Result<&'a str> {
    if *i + 1 >= args.len() {
        bail!("{flag} requires a value");
    }
    *i += 1;
    Ok(&args[*i])
}

fn parse_add(args: &[String], i: &mut usize) -> Result<Command> {
    let mut image = NewImage::default();
    let mut seen_filename = false;
    let mut seen_url = false;
    let mut seen_size = false;

    while *i + 1 < args.len() {
        *i += 1;
        match args[*i].as_str() {
            "--filename" => {
                image.filename = flag_value(args, i, "--filename")?.to_string();
                seen_filename = true;
            }
            "--url" => {
                image.url = flag_value(args, i, "--url")?.to_string();
                seen_url = true;
            }
            "--size" => {
                image.file_size = flag_value(args, i, "--size")?.to_string();
                seen_size = true;
            }
            "--rating" => {
                let raw = flag_value(args, i, "--rating")?;
                image.rating = raw
                    .parse()
                    .with_context(|| format!("invalid rating: {raw:?}"))?;
            }
            "--ranking" => {
                let raw = flag_value(args, i, "--ranking")?;
                image.ranking = raw
                    .parse()
                    .with_context(|| format!("invalid ranking: {raw:?}"))?;
            }
            "--tags" => image.tags = flag_value(args, i, "--tags")?.to_string(),
            "--time" => image.creation_time = flag_value(args, i, "--time")?.to_string(),
            "--person" => image.person = flag_value(args, i, "--person")?.to_string(),
            "--location" => image.location = flag_value(args, i, "--location")?.to_string(),
            "--type" => image.kind = flag_value(args, i, "--type")?.to_string(),
            "--image" => {
                image.original_image_path =
                    Some(PathBuf::from(flag_value(args, i, "--image")?));
            }
            other => bail!("unknown add option: {other}"),
        }
    }

    if !seen_filename || !seen_url || !seen_size {
        bail!("add requires --filename, --url and --size");
    }
    Ok(Command::Add(Box::new(image)))
}

fn parse_export(args: &[String], i: &mut usize) -> Result<Command> {
    let mut format = None;
    let mut output = None;

    while *i + 1 < args.len() {
        *i += 1;
        match args[*i].as_str() {
            "--format" | "-f" => {
                let raw = flag_value(args, i, "--format")?;
                format = Some(
                    ExportFormat::parse(raw)
                        .with_context(|| format!("unknown export format: {raw:?}"))?,
                );
            }
            "--output" | "-o" => {
                output = Some(PathBuf::from(flag_value(args, i, "--output")?));
            }
            other => bail!("unknown export option: {other}"),
        }
    }

    let format = format.unwrap_or(ExportFormat::Json);
    let output = output
        .unwrap_or_else(|| PathBuf::from(format!("catalog.{}", format.extension())));
    Ok(Command::Export { format, output })
}

fn print_help() {
    println!(
        r#"picdex - personal image cataloging utility

USAGE:
    picdex [OPTIONS] <COMMAND>

COMMANDS:
    add         Catalog one image
                  --filename NAME   display name (required)
                  --url URL         source URL or original path (required)
                  --size SIZE       bytes or '<number> <unit>' e.g. '1.5 MB' (required)
                  --rating N        quality score
                  --ranking N       ordering key
                  --tags TAGS       comma-separated
                  --time TIME       'YYYY-MM-DD HH:MM:SS', defaults to now
                  --person NAME
                  --location PLACE
                  --type KIND
                  --image PATH      original image; generates a WebP thumbnail
    list        Print the catalog, sorted by ranking then rating
    export      Write the catalog to a file
                  --format, -f json|csv   (default: json)
                  --output, -o PATH       (default: catalog.<ext>)
    convert PATH  Convert a single image to WebP alongside the thumbnails

OPTIONS:
    --config, -c PATH   Path to config file
    --version, -V       Show version
    --help, -h          Show this help message

ENVIRONMENT:
    PICDEX_LOG          Log level (trace, debug, info, warn, error)

Config file location: $XDG_CONFIG_HOME/picdex/config.toml"#
    );
}

/// Copy the original image into the originals directory under the catalog
/// filename, mirroring an upload.
fn stage_original(source: &Path, originals_dir: &Path, filename: &str) -> Result<PathBuf> {
    std::fs::create_dir_all(originals_dir)?;
    let dest = originals_dir.join(filename);
    std::fs::copy(source, &dest)
        .with_context(|| format!("failed to copy {} into {}", source.display(), originals_dir.display()))?;
    Ok(dest)
}

fn run_add(config: &Config, mut image: NewImage) -> Result<()> {
    let db = Database::open(&config.db_path)?;
    db.initialize()?;
    let thumbnails = ThumbnailGenerator::new(&config.thumbnails);

    if let Some(source) = image.original_image_path.take() {
        let staged = stage_original(&source, &config.originals_dir, &image.filename)?;
        image.original_image_path = Some(staged);
    }

    let catalog = Catalog::new(db, thumbnails);
    let id = catalog.add_image(&image)?;
    println!("Cataloged {} (id {id})", image.filename);
    Ok(())
}

fn run_list(config: &Config) -> Result<()> {
    let db = Database::open(&config.db_path)?;
    db.initialize()?;

    let mut records = db.all_images()?;
    catalog::sort_for_display(&mut records);

    if records.is_empty() {
        println!("Catalog is empty.");
        return Ok(());
    }

    println!(
        "{:<4} {:<24} {:>10} {:>6} {:>7}  {:<19} {:<14} {:<12} {:<10} {}",
        "ID", "FILENAME", "SIZE", "RATING", "RANKING", "CREATED", "PERSON", "LOCATION", "TYPE", "THUMBNAIL"
    );
    for rec in &records {
        println!(
            "{:<4} {:<24} {:>10} {:>6} {:>7}  {:<19} {:<14} {:<12} {:<10} {}",
            rec.id,
            rec.filename,
            catalog::format_file_size(rec.file_size),
            rec.rating,
            rec.ranking,
            rec.creation_time,
            rec.person,
            rec.location,
            rec.kind,
            catalog::thumbnail_display_name(rec.thumbnail_path.as_deref()),
        );
    }
    println!("\n{} image(s)", records.len());
    Ok(())
}

fn run_export(config: &Config, format: ExportFormat, output: &Path) -> Result<()> {
    let db = Database::open(&config.db_path)?;
    db.initialize()?;

    let count = export::export_images(&db, output, format)?;
    println!("Exported {count} record(s) to {} ({})", output.display(), format.name());
    Ok(())
}

fn run_convert(config: &Config, source: &Path) -> Result<()> {
    let (out, original, converted) =
        thumbs::convert_to_webp(source, &config.thumbnails.path, config.thumbnails.quality)?;
    println!(
        "Converted {} -> {} ({} -> {})",
        source.display(),
        out.display(),
        catalog::format_file_size(original as i64),
        catalog::format_file_size(converted as i64),
    );
    Ok(())
}

fn main() -> Result<()> {
    let cli = parse_args()?;

    let _ = logging::init(Some(Config::config_dir().join("logs")));

    let config = match &cli.config_path {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    match cli.command {
        Command::Add(image) => run_add(&config, *image),
        Command::List => run_list(&config),
        Command::Export { format, output } => run_export(&config, format, &output),
        Command::Convert { source } => run_convert(&config, &source),
    }
}
