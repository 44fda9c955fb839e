//! rmturtle command line entry point.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand, ValueEnum};
use rmturtle_core::codec::read_file;
use rmturtle_core::{Document, JsonCodec, Notebook, SceneCodec};
use rmturtle_render::palette::parse_hex;
use rmturtle_render::{SvgOptions, SvgRenderer};

#[derive(Parser, Debug)]
#[command(
    name = "rmturtle",
    version,
    about = "Turtle drawings compiled to reMarkable scene blocks",
    arg_required_else_help = true
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Shape {
    Triangle,
    Square,
    Star,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Draw a sample shape and save the scene
    New {
        #[arg(value_enum)]
        shape: Shape,
        #[arg(long, default_value = "Layer 1")]
        label: String,
        /// Mark the layer hidden
        #[arg(long)]
        hidden: bool,
        #[arg(long, short, value_name = "FILE", default_value = "scene.json")]
        out: PathBuf,
    },
    /// Print block counts and layers of a scene file
    Inspect {
        #[arg(value_name = "FILE")]
        path: PathBuf,
    },
    /// Export a scene file to SVG
    Svg {
        #[arg(value_name = "FILE")]
        path: PathBuf,
        /// Defaults to the input path with an .svg extension
        #[arg(long, short, value_name = "FILE")]
        out: Option<PathBuf>,
        #[arg(long)]
        include_hidden: bool,
        /// Background fill, as #rrggbb
        #[arg(long, value_name = "COLOR")]
        background: Option<String>,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.command {
        Command::New {
            shape,
            label,
            hidden,
            out,
        } => new_scene(shape, &label, hidden, &out),
        Command::Inspect { path } => inspect(&path),
        Command::Svg {
            path,
            out,
            include_hidden,
            background,
        } => export_svg(&path, out, include_hidden, background.as_deref()),
    }
}

fn new_scene(shape: Shape, label: &str, hidden: bool, out: &Path) -> Result<()> {
    let mut nb = Notebook::new();
    nb.layer_with_visibility(label, !hidden);
    match shape {
        Shape::Triangle => {
            nb.triangle(702.0, 936.0, 400.0);
        }
        Shape::Square => {
            nb.move_to(502.0, 736.0);
            for _ in 0..4 {
                nb.forward(400.0).right(90.0);
            }
            nb.stroke();
        }
        Shape::Star => {
            nb.star(702.0, 936.0, 300.0, 5, 0.45, -90.0);
        }
    }
    nb.save(out)
        .with_context(|| format!("failed to save {}", out.display()))?;
    log::info!("wrote {:?} to {}", shape, out.display());
    Ok(())
}

fn inspect(path: &Path) -> Result<()> {
    let bytes = read_file(path)?;
    let codec = JsonCodec::default();
    let blocks = codec.read_blocks(&bytes)?;

    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for block in &blocks {
        *counts.entry(block.kind()).or_default() += 1;
    }
    println!("{} block(s)", blocks.len());
    for (kind, count) in &counts {
        println!("  {kind:<18} {count}");
    }

    let document = Document::load(&codec, &bytes)?;
    println!("{} layer(s)", document.layers().len());
    for layer in document.layers() {
        let hidden = if layer.visible { "" } else { " (hidden)" };
        println!(
            "  {}{hidden}: {} stroke(s), {} highlight(s)",
            layer.label,
            layer.strokes.len(),
            layer.highlights.len()
        );
    }
    if !document.root_texts().is_empty() {
        println!("{} text block(s)", document.root_texts().len());
    }
    Ok(())
}

fn export_svg(
    path: &Path,
    out: Option<PathBuf>,
    include_hidden: bool,
    background: Option<&str>,
) -> Result<()> {
    let nb = Notebook::open(path).with_context(|| format!("failed to load {}", path.display()))?;

    let mut options = SvgOptions::default().with_hidden_layers(include_hidden);
    if let Some(value) = background {
        let color = parse_hex(value).ok_or_else(|| anyhow!("invalid color {value:?}"))?;
        options = options.with_background(color);
    }

    let out = out.unwrap_or_else(|| path.with_extension("svg"));
    SvgRenderer::new(options).save(nb.document(), &out)?;
    Ok(())
}
