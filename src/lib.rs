//! Boxlabel: storage for bounding-box image annotation.
//!
//! Boxlabel is the persistence layer behind an image labeling tool. A user
//! points it at a folder of images, draws boxes, and the boxes are saved as
//! YOLO label files next to reloadable, named project snapshots.
//!
//! # Modules
//!
//! - [`model`]: Identifiers, annotations and projects
//! - [`path_guard`]: Keeps every file access inside its declared root
//! - [`image_index`]: Stable, sorted image listings
//! - [`codec`]: YOLO label text encoding and decoding
//! - [`store`]: Label file and project snapshot stores
//! - [`image_service`]: Image lookup, streaming and rotation
//! - [`workspace`]: The operations a transport exposes
//! - [`error`]: Error types for boxlabel operations

pub mod codec;
pub mod config;
pub mod error;
pub mod image_index;
pub mod image_service;
pub mod model;
pub mod path_guard;
pub mod store;
pub mod workspace;

use std::fs::File;
use std::io::{self, BufReader, Read, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

pub use config::Config;
pub use error::{BoxlabelError, ErrorKind};
pub use workspace::Workspace;

use image_service::RotateDirection;
use model::{AnnotationSet, ImageIdentifier};
use store::LabelLayout;

/// The boxlabel CLI application.
#[derive(Parser)]
#[command(name = "boxlabel")]
#[command(version, author, about)]
#[command(propagate_version = true)]
struct Cli {
    #[command(flatten)]
    config: ConfigArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Settings shared by all subcommands.
#[derive(clap::Args)]
struct ConfigArgs {
    /// Directory holding project snapshots.
    #[arg(
        long,
        global = true,
        env = "BOXLABEL_PROJECTS_DIR",
        default_value = config::DEFAULT_PROJECTS_DIR
    )]
    projects_dir: PathBuf,

    /// How label files are laid out under the destination directory.
    #[arg(
        long,
        global = true,
        env = "BOXLABEL_LABEL_LAYOUT",
        value_enum,
        default_value = "basename"
    )]
    label_layout: LabelLayout,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Check a source/destination pair and count the source images.
    SetDirs(DirsArgs),
    /// List image identifiers under a source directory.
    ListImages(SourceArgs),
    /// Write the raw bytes of one image to stdout.
    CatImage(ImageArgs),
    /// Replace the annotations of one image (JSON array on stdin or --input).
    SaveAnnotations(SaveAnnotationsArgs),
    /// Print the annotations of one image.
    LoadAnnotations(LoadAnnotationsArgs),
    /// Rotate an image 90 degrees in place.
    Rotate(RotateArgs),
    /// Save a project snapshot (JSON document on stdin or --input).
    SaveProject(SaveProjectArgs),
    /// Print a project snapshot.
    LoadProject(ProjectArgs),
    /// List saved project names.
    ListProjects,
}

#[derive(clap::Args)]
struct DirsArgs {
    /// Directory containing the images.
    #[arg(long)]
    source: PathBuf,

    /// Directory receiving label files.
    #[arg(long)]
    dest: PathBuf,
}

#[derive(clap::Args)]
struct SourceArgs {
    /// Directory containing the images.
    #[arg(long)]
    source: PathBuf,
}

#[derive(clap::Args)]
struct ImageArgs {
    /// Directory containing the images.
    #[arg(long)]
    source: PathBuf,

    /// Image identifier, relative to the source directory.
    id: String,
}

#[derive(clap::Args)]
struct SaveAnnotationsArgs {
    /// Directory containing the images.
    #[arg(long)]
    source: PathBuf,

    /// Directory receiving label files.
    #[arg(long)]
    dest: PathBuf,

    /// Image identifier, relative to the source directory.
    id: String,

    /// JSON file with the annotations, or '-' for stdin.
    #[arg(long, default_value = "-")]
    input: String,
}

#[derive(clap::Args)]
struct LoadAnnotationsArgs {
    /// Directory holding label files.
    #[arg(long)]
    dest: PathBuf,

    /// Image identifier, relative to the source directory.
    id: String,
}

#[derive(clap::Args)]
struct RotateArgs {
    /// Directory containing the images.
    #[arg(long)]
    source: PathBuf,

    /// Image identifier, relative to the source directory.
    id: String,

    /// Rotation direction.
    #[arg(long, value_enum)]
    direction: RotateDirection,
}

#[derive(clap::Args)]
struct SaveProjectArgs {
    /// Project name.
    name: String,

    /// JSON file with the project document, or '-' for stdin.
    #[arg(long, default_value = "-")]
    input: String,
}

#[derive(clap::Args)]
struct ProjectArgs {
    /// Project name.
    name: String,
}

/// Run the boxlabel CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), BoxlabelError> {
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        println!("boxlabel {}", env!("CARGO_PKG_VERSION"));
        println!();
        println!("Bounding-box annotation storage.");
        println!();
        println!("Run 'boxlabel --help' for usage information.");
        return Ok(());
    };

    let config = Config::new(cli.config.projects_dir).with_label_layout(cli.config.label_layout);
    let workspace = Workspace::new(config)?;

    match command {
        Commands::SetDirs(args) => {
            let count = workspace.set_dirs(&args.source, &args.dest)?;
            print_json(&json!({ "count": count }))
        }
        Commands::ListImages(args) => {
            let images = workspace.list_images(&args.source)?;
            print_json(&json!({ "images": images }))
        }
        Commands::CatImage(args) => run_cat_image(&workspace, args),
        Commands::SaveAnnotations(args) => {
            let set: AnnotationSet = read_json_input(&args.input)?;
            workspace.save_annotations(
                &args.source,
                &args.dest,
                &ImageIdentifier::new(args.id),
                &set,
            )?;
            print_json(&json!({ "ok": true }))
        }
        Commands::LoadAnnotations(args) => {
            let set = workspace.load_annotations(&args.dest, &ImageIdentifier::new(args.id))?;
            print_json(&json!({ "annotations": set }))
        }
        Commands::Rotate(args) => {
            workspace.rotate_image(&args.source, &ImageIdentifier::new(args.id), args.direction)?;
            print_json(&json!({ "ok": true }))
        }
        Commands::SaveProject(args) => {
            let payload: Value = read_json_input(&args.input)?;
            let path = workspace.save_project(&args.name, payload)?;
            print_json(&json!({ "ok": true, "path": path.display().to_string() }))
        }
        Commands::LoadProject(args) => {
            let payload = workspace.load_project(&args.name)?;
            print_json(&json!({ "project": payload }))
        }
        Commands::ListProjects => {
            let projects = workspace.list_projects()?;
            print_json(&json!({ "projects": projects }))
        }
    }
}

/// Execute the cat-image subcommand.
fn run_cat_image(workspace: &Workspace, args: ImageArgs) -> Result<(), BoxlabelError> {
    let id = ImageIdentifier::new(args.id);
    let path = workspace.image_path(&args.source, &id)?;
    let mut file = File::open(&path).map_err(|source| BoxlabelError::storage(&path, source))?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    io::copy(&mut file, &mut out)
        .and_then(|_| out.flush())
        .map_err(|source| BoxlabelError::storage(path, source))
}

/// Reads a JSON document from a file, or from stdin when `input` is `-`.
fn read_json_input<T: DeserializeOwned>(input: &str) -> Result<T, BoxlabelError> {
    let reader: Box<dyn Read> = if input == "-" {
        Box::new(io::stdin().lock())
    } else {
        let file = File::open(input).map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => BoxlabelError::NotFound {
                path: PathBuf::from(input),
                what: "input file",
            },
            _ => BoxlabelError::storage(input, source),
        })?;
        Box::new(file)
    };

    let source_name = if input == "-" { "stdin" } else { input };
    serde_json::from_reader(BufReader::new(reader)).map_err(|source| BoxlabelError::InputParse {
        source_name: source_name.to_string(),
        source,
    })
}

fn print_json(value: &Value) -> Result<(), BoxlabelError> {
    println!("{value:#}");
    Ok(())
}
