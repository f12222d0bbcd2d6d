use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "porta", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a region of a graph node to a PNG or a raw byte stream.
    Render(RenderArgs),
    /// Print a region of a graph as block characters.
    Ascii(AsciiArgs),
    /// List the registered operations.
    Ops,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Graph JSON. Defaults to the built-in demo graph.
    #[arg(long)]
    graph: Option<PathBuf>,

    /// Node to render, by name. Defaults to the graph's output.
    #[arg(long)]
    node: Option<String>,

    /// Region as `x,y,width,height` in output pixels. Defaults to the node's bounding box.
    #[arg(long, value_parser = parse_rect)]
    rect: Option<porta::Rect>,

    /// Output pixels per scene unit.
    #[arg(long, default_value_t = 1.0)]
    scale: f64,

    /// Byte encoding for raw output, e.g. `RGBA u8` or `Y float`. PNG output is always `RGBA u8`.
    #[arg(long, default_value = "RGBA u8")]
    format: String,

    /// Worker threads for the render (defaults to rayon's global pool).
    #[arg(long)]
    threads: Option<usize>,

    /// Output path. A `.png` extension writes an image, anything else raw bytes.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct AsciiArgs {
    /// Graph JSON. Defaults to the built-in demo graph.
    #[arg(long)]
    graph: Option<PathBuf>,

    #[arg(long, default_value_t = 40)]
    width: u32,

    #[arg(long, default_value_t = 40)]
    height: u32,

    /// Light-on-dark ramp.
    #[arg(long)]
    reverse: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Ascii(args) => cmd_ascii(args),
        Command::Ops => cmd_ops(),
    }
}

fn parse_rect(s: &str) -> Result<porta::Rect, String> {
    let parts = s
        .split(',')
        .map(|p| p.trim().parse::<i32>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| format!("rect '{s}': {e}"))?;
    let &[x, y, w, h] = parts.as_slice() else {
        return Err(format!("rect '{s}': expected x,y,width,height"));
    };
    porta::Rect::new(x, y, w, h).map_err(|e| e.to_string())
}

fn load_scene(graph: Option<&Path>, width: u32, height: u32) -> anyhow::Result<porta::Scene> {
    let def = match graph {
        Some(path) => porta::GraphDef::from_path(path)
            .with_context(|| format!("load graph '{}'", path.display()))?,
        None => porta::GraphDef::demo(width, height),
    };
    Ok(def.build(&porta::OperationRegistry::with_builtins())?)
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let scene = load_scene(args.graph.as_deref(), 400, 400)?;
    let node = match &args.node {
        Some(name) => scene
            .graph
            .find(name)
            .with_context(|| format!("no node named '{name}'"))?,
        None => scene.output,
    };
    let rect = match args.rect {
        Some(r) => r,
        None => scene
            .graph
            .bounding_box(node)?
            .map(|r| scale_rect(r, args.scale))
            .context("node has an unbounded region; pass --rect")?,
    };

    let engine = porta::RenderEngine::new(porta::RenderOpts {
        threads: args.threads,
        ..porta::RenderOpts::default()
    })?;

    if let Some(parent) = args.out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

    let is_png = args
        .out
        .extension()
        .is_some_and(|e| e.eq_ignore_ascii_case("png"));
    if is_png {
        let bytes = engine.render(&scene.graph, node, rect, args.scale, "RGBA u8")?;
        image::save_buffer_with_format(
            &args.out,
            &bytes,
            rect.width as u32,
            rect.height as u32,
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .with_context(|| format!("write png '{}'", args.out.display()))?;
    } else {
        let bytes = engine.render(&scene.graph, node, rect, args.scale, &args.format)?;
        std::fs::write(&args.out, &bytes)
            .with_context(|| format!("write '{}'", args.out.display()))?;
    }

    eprintln!("wrote {} ({rect})", args.out.display());
    Ok(())
}

/// Scene-space rect to the output-pixel rect covering it at `scale`.
fn scale_rect(r: porta::Rect, scale: f64) -> porta::Rect {
    let x0 = (f64::from(r.x) * scale).floor();
    let y0 = (f64::from(r.y) * scale).floor();
    let x1 = (r.right() as f64 * scale).ceil();
    let y1 = (r.bottom() as f64 * scale).ceil();
    porta::Rect {
        x: x0 as i32,
        y: y0 as i32,
        width: (x1 - x0) as i32,
        height: (y1 - y0) as i32,
    }
}

fn cmd_ascii(args: AsciiArgs) -> anyhow::Result<()> {
    let scene = load_scene(args.graph.as_deref(), args.width, args.height)?;
    let rect = porta::Rect::sized(args.width, args.height)?;
    let luma = porta::render(&scene.graph, scene.output, rect, 1.0, "Y u8")?;
    print!(
        "{}",
        porta::ascii_ramp(&luma, args.width as usize, args.reverse)
    );
    Ok(())
}

fn cmd_ops() -> anyhow::Result<()> {
    let registry = porta::OperationRegistry::with_builtins();
    for decl in registry.decls() {
        let kind = serde_json::to_value(decl.kind)?;
        let params: Vec<&str> = decl.params.iter().map(|p| p.name).collect();
        println!(
            "{:<14} {:<9} {}",
            decl.name,
            kind.as_str().unwrap_or_default(),
            params.join(", ")
        );
    }
    Ok(())
}
