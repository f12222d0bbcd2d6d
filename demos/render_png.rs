use std::path::PathBuf;

use porta::{GraphDef, OperationRegistry, Rect, RenderEngine, RenderOpts};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let out = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("assets/porta_demo.png"));
    let (width, height) = (512u32, 512u32);

    let scene = GraphDef::demo(width, height).build(&OperationRegistry::with_builtins())?;
    let engine = RenderEngine::new(RenderOpts::default())?;
    let plan = engine.compile(&scene.graph, scene.output, Rect::sized(width, height)?, 1.0)?;
    eprintln!("plan: {} steps", plan.len());

    let buf = engine.execute(&scene.graph, &plan)?;
    let bytes = buf.to_byte_stream(porta::PixelFormat::RgbaU8);

    if let Some(parent) = out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    image::save_buffer_with_format(
        &out,
        &bytes,
        width,
        height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )?;
    eprintln!("wrote {}", out.display());
    Ok(())
}
