// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! mpsh-shapes - cut shapes from source images and export them for legacy engines.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use mpsh_shapes::io::batch::BlitzShapesWriter;
use mpsh_shapes::io::media::ImageCrateProcessor;
use mpsh_shapes::io::mpsh::{read_mpsh, MpshFile};
use mpsh_shapes::io::regions::ExportReport;
use mpsh_shapes::ui::textures::Headless;
use mpsh_shapes::{BitDepth, ExportConfig, Shape, ShapeEditor};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "mpsh-shapes")]
#[command(version, about)]
struct Cli {
    /// Directory source image paths are relative to (defaults to the working directory).
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    /// Log debug output.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a source image to a project, creating the project if needed.
    AddImage {
        #[arg(long)]
        project: PathBuf,
        image: PathBuf,
    },
    /// Append a shape to a container.
    AddShape {
        #[arg(long)]
        project: PathBuf,
        container: usize,
        x: u16,
        y: u16,
        width: u16,
        height: u16,
    },
    /// Remove a shape from a container.
    RemoveShape {
        #[arg(long)]
        project: PathBuf,
        container: usize,
        shape: usize,
    },
    /// Remove a container and all of its shapes.
    RemoveImage {
        #[arg(long)]
        project: PathBuf,
        container: usize,
    },
    /// List containers and shapes.
    List {
        #[arg(long)]
        project: PathBuf,
    },
    /// Export all shapes to an MPSH file.
    ExportMpsh(ExportArgs),
    /// Export all shapes to a Blitz shapes file.
    ExportBatch(ExportArgs),
    /// Show the header and manifest of an MPSH file.
    Inspect { file: PathBuf },
}

#[derive(Args)]
struct ExportArgs {
    #[arg(long)]
    project: PathBuf,

    /// Output file.
    output: PathBuf,

    /// YAML or JSON file with export settings.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Bits per pixel (1-8), overrides the config file.
    #[arg(long)]
    bit_depth: Option<u8>,

    /// Palette index for colours dropped by the reduction.
    #[arg(long)]
    background: Option<u8>,
}

type Editor = ShapeEditor<Headless>;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let root = match cli.root {
        Some(root) => root,
        None => std::env::current_dir().context("Cannot determine the working directory")?,
    };

    if let Err(e) = run(cli.command, &root) {
        log::error!("{:#}", e);
        return Err(e);
    }
    Ok(())
}

fn run(command: Commands, root: &Path) -> Result<()> {
    match command {
        Commands::AddImage { project, image } => {
            let mut editor = open_or_create(&project, root)?;
            editor
                .add_source_image(&image, &ImageCrateProcessor)
                .with_context(|| format!("Failed to add {}", image.display()))?;
            save(&editor, &project)
        }
        Commands::AddShape {
            project,
            container,
            x,
            y,
            width,
            height,
        } => {
            let mut editor = open(&project, root)?;
            if editor
                .add_shape(container, Shape::new(x, y, width, height))
                .is_none()
            {
                bail!("Project has no container {}", container);
            }
            save(&editor, &project)
        }
        Commands::RemoveShape {
            project,
            container,
            shape,
        } => {
            let mut editor = open(&project, root)?;
            editor.mark_shape_for_removal(container, shape);
            if editor.apply_removals().shape.is_none() {
                bail!("Container {} has no shape {}", container, shape);
            }
            save(&editor, &project)
        }
        Commands::RemoveImage { project, container } => {
            let mut editor = open(&project, root)?;
            editor.mark_container_for_removal(container);
            if editor.apply_removals().container.is_none() {
                bail!("Project has no container {}", container);
            }
            save(&editor, &project)
        }
        Commands::List { project } => {
            let editor = open(&project, root)?;
            for (index, container) in editor.project().containers().iter().enumerate() {
                println!("[{}] {}", index, container.image_file.display());
                let labels = editor.shape_labels(index);
                for (label, shape) in labels.iter().zip(&container.shapes) {
                    println!(
                        "    {}: x={} y={} width={} height={}",
                        label, shape.x, shape.y, shape.width, shape.height
                    );
                }
            }
            Ok(())
        }
        Commands::ExportMpsh(args) => {
            let editor = open_for_export(&args, root)?;
            let report = editor
                .export_mpsh(&args.output, &ImageCrateProcessor)
                .with_context(|| format!("Failed to export {}", args.output.display()))?;
            print_report(&report, &args.output);
            Ok(())
        }
        Commands::ExportBatch(args) => {
            let editor = open_for_export(&args, root)?;
            let report = editor
                .export_batch(&args.output, &ImageCrateProcessor, &BlitzShapesWriter)
                .with_context(|| format!("Failed to export {}", args.output.display()))?;
            print_report(&report, &args.output);
            Ok(())
        }
        Commands::Inspect { file } => {
            let bytes = read_mpsh(&file)?;
            let mpsh = MpshFile::parse_file(&file, &bytes)?;
            println!("MPSH version {}, {} shapes", mpsh.version(), mpsh.len());
            for (index, entry) in mpsh.manifest().iter().enumerate() {
                match mpsh.record(index) {
                    Some(shape) => println!(
                        "  {:>4}: offset {:>8} size {:>8}  {}x{}x{}",
                        index, entry.offset, entry.size, shape.width, shape.height, shape.depth
                    ),
                    None => println!("  {:>4}: offset {:>8} size {:>8}", index, entry.offset, entry.size),
                }
            }
            Ok(())
        }
    }
}

fn open(project: &Path, root: &Path) -> Result<Editor> {
    let mut editor = ShapeEditor::new(root, Headless);
    editor
        .load(project, &ImageCrateProcessor)
        .with_context(|| format!("Failed to load {}", project.display()))?;
    Ok(editor)
}

fn open_or_create(project: &Path, root: &Path) -> Result<Editor> {
    if project.exists() {
        open(project, root)
    } else {
        log::info!("Creating new project {}", project.display());
        Ok(ShapeEditor::new(root, Headless))
    }
}

fn open_for_export(args: &ExportArgs, root: &Path) -> Result<Editor> {
    let mut config = match &args.config {
        Some(path) => ExportConfig::load(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => ExportConfig::default(),
    };
    if let Some(bits) = args.bit_depth {
        config.bit_depth = BitDepth::new(bits)?;
    }
    if let Some(background) = args.background {
        config.background_index = background;
    }

    let mut editor = open(&args.project, root)?;
    editor.set_config(config);
    Ok(editor)
}

fn save(editor: &Editor, project: &Path) -> Result<()> {
    editor
        .save(project)
        .with_context(|| format!("Failed to save {}", project.display()))
}

fn print_report(report: &ExportReport, output: &Path) {
    println!(
        "Wrote {} shapes ({} bytes) to {}",
        report.records,
        report.bytes,
        output.display()
    );
    for skipped in &report.skipped {
        println!("  skipped: {}", skipped.to_error());
    }
}
