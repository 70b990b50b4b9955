//! Render boundary.
//!
//! The composer only produces numbers. This module turns a
//! [`CurrentTransform`](crate::CurrentTransform) into drawing-context calls on
//! any backend that implements [`RenderSurface`]:
//!
//! ```text
//! render_pre_pass   save → translate(shake) → scale(zoom) → rotate → filter
//!   (scene is drawn by the host)
//! render_post_pass  flash (additive) → tint (multiply) → restore
//! ```

mod commands;
mod hooks;
mod stats;
mod uniforms;

pub use commands::{CommandBuffer, DrawCommand};
pub use hooks::{render_post_pass, render_pre_pass, BlendMode, FilterChain, RenderSurface, SurfaceError};
pub use stats::{RenderStatKind, RenderStats};
pub use uniforms::TransformUniforms;
