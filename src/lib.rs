//! Porta is a node-graph image compositing engine.
//!
//! Images are described as a [`Graph`] of nodes, each wrapping an [`Operation`]: generators,
//! single-input filters, or Porter-Duff compositors over premultiplied float RGBA. Nothing is
//! computed until a region of one node is requested:
//!
//! - Build a graph in code ([`Graph::add`], [`Graph::node`]) or from JSON ([`GraphDef`])
//! - Ask a [`RenderEngine`] for a rect of a node at some scale
//! - Receive a [`PixelBuffer`] or an encoded byte stream (`"RGBA u8"`, `"Y u8"`, ...)
#![forbid(unsafe_code)]

mod foundation;

/// Pixel storage and format tags.
pub mod buffer;
/// The twelve Porter-Duff operators and the compose kernel.
pub mod compose;
pub mod graph;
pub mod ops;
pub mod render;
pub mod scene;

pub use crate::foundation::core::{Extent, NodeId, Rect};
pub use crate::foundation::error::{PortaError, PortaResult};

pub use crate::buffer::format::PixelFormat;
pub use crate::buffer::pixel::{PixelBuffer, Rgba};
pub use crate::compose::kernel::{compose, compose_named};
pub use crate::compose::porter_duff::PorterDuff;
pub use crate::graph::{Graph, Node, NodeBuilder};
pub use crate::ops::registry::{OperationDecl, OperationRegistry};
pub use crate::ops::{EvalCtx, Operation, OperationKind, ResolvedInputs};
pub use crate::render::{RenderEngine, RenderOpts, RenderPlan, ascii_ramp, render};
pub use crate::scene::{GraphDef, NodeDef, Scene};
