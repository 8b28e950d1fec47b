//! Drag gesture capability.
//!
//! The pointer library recognises gestures and hit-tests targets; the engine
//! only consumes the three lifecycle events it reports. Implementations of
//! [`DragEventHandler`] are driven by whatever gesture adapter is in use.

/// A drag lifecycle event: the dragged element and the element under the
/// pointer, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragEvent {
    active: String,
    over: Option<String>,
}

impl DragEvent {
    /// Creates an event for `active` with nothing under the pointer.
    #[must_use]
    pub fn new(active: impl Into<String>) -> Self {
        Self {
            active: active.into(),
            over: None,
        }
    }

    /// Creates an event for `active` hovering or dropped over `over`.
    #[must_use]
    pub fn over(active: impl Into<String>, over: impl Into<String>) -> Self {
        Self {
            active: active.into(),
            over: Some(over.into()),
        }
    }

    /// Returns the raw id of the dragged element.
    #[must_use]
    pub fn active(&self) -> &str {
        &self.active
    }

    /// Returns the raw id of the element under the pointer, if any.
    #[must_use]
    pub fn over_id(&self) -> Option<&str> {
        self.over.as_deref()
    }
}

/// Receiver of drag lifecycle events.
pub trait DragEventHandler {
    /// Value produced when a drop commits a change.
    type Commit;
    /// Error raised while handling an event.
    type Error;

    /// Called once when the pointer picks up an element.
    ///
    /// # Errors
    ///
    /// Implementations report infrastructure failures only; unknown ids are
    /// ignored.
    fn on_drag_start(&mut self, event: &DragEvent) -> Result<(), Self::Error>;

    /// Called repeatedly while the element moves over targets.
    ///
    /// # Errors
    ///
    /// Implementations report infrastructure failures only.
    fn on_drag_over(&mut self, event: &DragEvent) -> Result<(), Self::Error>;

    /// Called once when the element is released.
    ///
    /// Returns `None` when the drop is aborted or changes nothing.
    ///
    /// # Errors
    ///
    /// Implementations report infrastructure failures only.
    fn on_drag_end(&mut self, event: &DragEvent) -> Result<Option<Self::Commit>, Self::Error>;
}
