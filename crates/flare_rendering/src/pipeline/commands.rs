//! Recording surface.
//!
//! Captures hook output as a flat command list. Backends that batch (or run
//! on another thread) replay it; tests assert on it.

use flare_core::{Color4, Vec2};

use super::hooks::{BlendMode, FilterChain, RenderSurface, SurfaceError};

/// One recorded drawing-context call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawCommand {
    /// Push state.
    Save,
    /// Pop state.
    Restore,
    /// Translate by offset.
    Translate(Vec2),
    /// Uniform scale.
    Scale(f32),
    /// Rotate by radians.
    Rotate(f32),
    /// Set filters.
    Filter(FilterChain),
    /// Full-surface fill.
    Overlay {
        /// Fill colour.
        color: Color4,
        /// Blend mode.
        blend: BlendMode,
    },
}

/// A [`RenderSurface`] that records instead of drawing.
#[derive(Debug, Clone)]
pub struct CommandBuffer {
    size: Vec2,
    commands: Vec<DrawCommand>,
    depth: u32,
}

impl CommandBuffer {
    /// Creates an empty buffer for a surface of `size`.
    #[must_use]
    pub fn new(size: Vec2) -> Self {
        Self {
            size,
            commands: Vec::with_capacity(16),
            depth: 0,
        }
    }

    /// Recorded commands in issue order.
    #[inline]
    #[must_use]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Current save depth.
    #[inline]
    #[must_use]
    pub const fn depth(&self) -> u32 {
        self.depth
    }

    /// Takes the recorded commands, leaving the buffer empty.
    pub fn take(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Discards recorded commands and resets depth.
    pub fn clear(&mut self) {
        self.commands.clear();
        self.depth = 0;
    }

    /// Resizes the surface.
    pub fn resize(&mut self, size: Vec2) {
        self.size = size;
    }
}

impl RenderSurface for CommandBuffer {
    fn size(&self) -> Vec2 {
        self.size
    }

    fn save(&mut self) -> Result<(), SurfaceError> {
        self.depth += 1;
        self.commands.push(DrawCommand::Save);
        Ok(())
    }

    fn restore(&mut self) -> Result<(), SurfaceError> {
        if self.depth == 0 {
            return Err(SurfaceError::UnbalancedRestore);
        }
        self.depth -= 1;
        self.commands.push(DrawCommand::Restore);
        Ok(())
    }

    fn translate(&mut self, offset: Vec2) -> Result<(), SurfaceError> {
        self.commands.push(DrawCommand::Translate(offset));
        Ok(())
    }

    fn scale(&mut self, factor: f32) -> Result<(), SurfaceError> {
        self.commands.push(DrawCommand::Scale(factor));
        Ok(())
    }

    fn rotate(&mut self, radians: f32) -> Result<(), SurfaceError> {
        self.commands.push(DrawCommand::Rotate(radians));
        Ok(())
    }

    fn set_filter(&mut self, chain: &FilterChain) -> Result<(), SurfaceError> {
        self.commands.push(DrawCommand::Filter(*chain));
        Ok(())
    }

    fn fill_overlay(&mut self, color: Color4, blend: BlendMode) -> Result<(), SurfaceError> {
        self.commands.push(DrawCommand::Overlay { color, blend });
        Ok(())
    }
}
