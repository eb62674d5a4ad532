//! Render command generation.
//!
//! The simulation never draws. Each frame it appends [`RenderCommand`]s to a
//! [`FrameBatch`], and the host hands that batch to whatever [`Canvas`] it
//! owns (a 2D browser canvas, a recorder in tests, a summary printer in the
//! headless CLI).

use fireworks_shared::Vec2;

/// Colour in hue / saturation / brightness space.
///
/// Hue is in degrees `[0, 360)`, saturation and brightness in `[0, 100]`,
/// alpha in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsba {
    /// Hue (degrees).
    pub hue: f32,
    /// Saturation (0-100).
    pub saturation: f32,
    /// Brightness (0-100).
    pub brightness: f32,
    /// Alpha (0-1).
    pub alpha: f32,
}

impl Hsba {
    /// Opaque black.
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);

    /// Creates a colour.
    #[must_use]
    pub const fn new(hue: f32, saturation: f32, brightness: f32, alpha: f32) -> Self {
        Self {
            hue,
            saturation,
            brightness,
            alpha,
        }
    }

    /// Fully saturated, fully bright colour of the given hue.
    #[must_use]
    pub const fn vivid(hue: f32, alpha: f32) -> Self {
        Self::new(hue, 100.0, 100.0, alpha)
    }

    /// Returns a new colour with different alpha.
    #[must_use]
    pub const fn with_alpha(self, alpha: f32) -> Self {
        Self::new(self.hue, self.saturation, self.brightness, alpha)
    }

    /// Converts to RGBA components in `[0, 1]`.
    #[must_use]
    pub fn to_rgba(self) -> [f32; 4] {
        let s = (self.saturation / 100.0).clamp(0.0, 1.0);
        let v = (self.brightness / 100.0).clamp(0.0, 1.0);
        let h = self.hue.rem_euclid(360.0) / 60.0;

        let c = v * s;
        let x = c * (1.0 - (h % 2.0 - 1.0).abs());
        let m = v - c;

        let (r, g, b) = match h as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };

        [r + m, g + m, b + m, self.alpha.clamp(0.0, 1.0)]
    }

    /// CSS `rgba(...)` string for 2D canvas APIs.
    #[must_use]
    pub fn to_css(self) -> String {
        let [r, g, b, a] = self.to_rgba();
        format!(
            "rgba({}, {}, {}, {:.3})",
            (r * 255.0).round() as u8,
            (g * 255.0).round() as u8,
            (b * 255.0).round() as u8,
            a
        )
    }
}

/// A single draw call.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCommand {
    /// Fill the whole viewport (translucent black leaves trails).
    Fade {
        /// Fill colour.
        color: Hsba,
    },
    /// Filled disc, one per live particle.
    Disc {
        /// Centre.
        center: Vec2,
        /// Diameter.
        diameter: f32,
        /// Fill colour.
        color: Hsba,
    },
    /// Centred text.
    Text {
        /// Text content.
        text: String,
        /// Anchor (horizontal centre, baseline).
        position: Vec2,
        /// Font size.
        size: f32,
        /// Fill colour.
        color: Hsba,
    },
    /// Closed filled polygon.
    Polygon {
        /// Vertices in order.
        points: Vec<Vec2>,
        /// Fill colour.
        color: Hsba,
    },
}

/// Draw commands for one frame, in paint order.
#[derive(Debug, Clone, Default)]
pub struct FrameBatch {
    /// Commands in this batch.
    commands: Vec<RenderCommand>,
}

impl FrameBatch {
    /// Creates a new empty batch.
    #[must_use]
    pub fn new() -> Self {
        Self {
            commands: Vec::with_capacity(1024),
        }
    }

    /// Appends a command.
    pub fn push(&mut self, command: RenderCommand) {
        self.commands.push(command);
    }

    /// Appends a filled disc.
    pub fn disc(&mut self, center: Vec2, diameter: f32, color: Hsba) {
        self.push(RenderCommand::Disc {
            center,
            diameter,
            color,
        });
    }

    /// Drops every command, keeping the allocation.
    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Returns the commands.
    #[must_use]
    pub fn commands(&self) -> &[RenderCommand] {
        &self.commands
    }

    /// Number of commands.
    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Returns true if nothing was drawn.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Number of particle discs in the batch.
    #[must_use]
    pub fn disc_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, RenderCommand::Disc { .. }))
            .count()
    }
}

/// Something that can paint a frame.
pub trait Canvas {
    /// Backend error.
    type Error;

    /// Paints every command of the batch, in order.
    ///
    /// # Errors
    ///
    /// Returns the backend's error if a draw call fails.
    fn present(&mut self, batch: &FrameBatch) -> Result<(), Self::Error>;
}
