use porta::{
    Graph, OperationRegistry, Rect, RenderEngine, ascii_ramp,
    ops::{composer::PorterDuffOp, filter::Threshold},
};
use serde_json::json;

fn parse_reverse() -> bool {
    std::env::args().skip(1).any(|a| a == "--reverse")
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let (width, height) = (40u32, 40u32);
    let registry = OperationRegistry::with_builtins();

    let mut graph = Graph::new();
    let fractal = graph.create(
        &registry,
        "fractal",
        &json!({ "width": width, "height": height, "iterations": 30 }),
    )?;
    let contrast = graph.add(Threshold::new(0.5)?);
    let checker = graph.create(
        &registry,
        "checkerboard",
        &json!({ "x": 10, "y": 10, "color1": [0.0, 0.0, 0.0, 0.0], "color2": [0.0, 0.0, 0.0, 0.35] }),
    )?;
    let over = graph.add(PorterDuffOp::over());

    graph.link_many(&[fractal, contrast, over])?;
    graph.node(over).aux(checker)?;

    let engine = RenderEngine::default();
    let luma = engine.render(&graph, over, Rect::sized(width, height)?, 1.0, "Y u8")?;
    print!("{}", ascii_ramp(&luma, width as usize, parse_reverse()));
    Ok(())
}
