//! Console context: explicit ownership of the active and alternate screen
//! buffers.
//!
//! The VT alt-screen owns an independent buffer sized to the main viewport
//! (no scrollback); it shares nothing with the main buffer's storage. The
//! dispatcher reaches buffers through this context rather than any global
//! state.

use crate::error::Result;
use crate::geometry::Size;
use crate::screen::{ScreenBuffer, ScreenBufferConfig};

/// Owner of the main screen buffer and, while active, the alternate one.
#[derive(Debug)]
pub struct Console {
    main: ScreenBuffer,
    alt: Option<Box<ScreenBuffer>>,
}

impl Console {
    /// Create a console with a main buffer built from `config`.
    pub fn new(config: ScreenBufferConfig) -> Result<Self> {
        Ok(Self {
            main: ScreenBuffer::new(config)?,
            alt: None,
        })
    }

    /// The buffer mutations should target: the alternate buffer while one
    /// is active, otherwise the main buffer.
    #[must_use]
    pub fn active_buffer(&self) -> &ScreenBuffer {
        self.alt.as_deref().unwrap_or(&self.main)
    }

    /// Mutable access to the active buffer.
    pub fn active_buffer_mut(&mut self) -> &mut ScreenBuffer {
        self.alt.as_deref_mut().unwrap_or(&mut self.main)
    }

    /// The main buffer, regardless of which is active.
    #[must_use]
    pub fn main_buffer(&self) -> &ScreenBuffer {
        &self.main
    }

    /// Whether the alternate buffer is active.
    #[must_use]
    pub fn is_alternate_active(&self) -> bool {
        self.alt.is_some()
    }

    /// Switch to the alternate buffer, creating it at the main viewport's
    /// size with the main buffer's colors and cursor presentation.
    ///
    /// Re-entering while already on the alternate buffer recreates it blank,
    /// as a fresh alt-screen request does.
    pub fn use_alternate_buffer(&mut self) -> Result<()> {
        let viewport = self.main.viewport();
        let size = Size::new(viewport.width(), viewport.height());
        let config = ScreenBufferConfig {
            buffer_size: size,
            window_size: size,
            default_attr: self.main.attributes(),
            popup_attr: self.main.popup_attributes(),
            width_policy: self.main.buffer().width_policy(),
            cursor_size: self.main.buffer().cursor().size(),
        };
        let mut alt = ScreenBuffer::new(config)?;
        alt.buffer_mut()
            .cursor_mut()
            .copy_properties(self.main.buffer().cursor());
        self.alt = Some(Box::new(alt));
        Ok(())
    }

    /// Drop the alternate buffer and return to the main one.
    ///
    /// The alternate buffer's contents are discarded; the main buffer is
    /// exactly as it was left.
    pub fn use_main_buffer(&mut self) {
        self.alt = None;
    }
}
