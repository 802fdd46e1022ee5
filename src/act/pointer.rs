//! Pointer injection abstraction.
//!
//! The input service is opaque: one fire-and-forget click at an absolute
//! coordinate. The mock records clicks for tests; the real adapter is
//! compiled only with the `input` feature.

/// Trait for synthetic pointer implementations.
pub trait PointerInjector {
    /// Issues one click at an absolute screen coordinate.
    fn click(&mut self, x: i32, y: i32);
}

/// Mock pointer that records every click.
#[derive(Debug, Default)]
pub struct MockPointer {
    clicks: Vec<(i32, i32)>,
}

impl MockPointer {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// All clicks issued so far, in order.
    pub fn clicks(&self) -> &[(i32, i32)] {
        &self.clicks
    }
}

impl PointerInjector for MockPointer {
    fn click(&mut self, x: i32, y: i32) {
        self.clicks.push((x, y));
    }
}

/// Real pointer adapter backed by the `enigo` crate.
#[cfg(feature = "input")]
pub struct EnigoPointer {
    enigo: enigo::Enigo,
}

#[cfg(feature = "input")]
impl EnigoPointer {
    /// Connects to the platform input service.
    pub fn open() -> Result<Self, enigo::NewConError> {
        let enigo = enigo::Enigo::new(&enigo::Settings::default())?;
        Ok(Self { enigo })
    }
}

#[cfg(feature = "input")]
impl PointerInjector for EnigoPointer {
    fn click(&mut self, x: i32, y: i32) {
        use enigo::{Button, Coordinate, Direction, Mouse};
        if let Err(err) = self.enigo.move_mouse(x, y, Coordinate::Abs) {
            tracing::warn!(%err, x, y, "pointer move failed");
            return;
        }
        if let Err(err) = self.enigo.button(Button::Left, Direction::Click) {
            tracing::warn!(%err, x, y, "click failed");
        }
    }
}
