//! Input event types for pointer and touch drawing.

use serde::{Deserialize, Serialize};

/// Pointer (mouse or pen) events. Coordinates are relative to the surface
/// element, as reported by the host's offset fields.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down { x: f32, y: f32 },
    Move { x: f32, y: f32 },
    Up { x: f32, y: f32 },
}

/// Touch events for the first changed touch. Coordinates are page-relative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TouchEvent {
    Start { page_x: f32, page_y: f32 },
    Move { page_x: f32, page_y: f32 },
    End { page_x: f32, page_y: f32 },
}

/// Device that produced an input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputSource {
    Pointer,
    Touch,
}

/// Gesture phase of an input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputPhase {
    Start,
    Move,
    End,
}

/// Any drawing input forwarded from the UI.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    Pointer(PointerEvent),
    Touch(TouchEvent),
}

impl InputEvent {
    /// Device that produced this event
    pub fn source(&self) -> InputSource {
        match self {
            Self::Pointer(_) => InputSource::Pointer,
            Self::Touch(_) => InputSource::Touch,
        }
    }

    /// Gesture phase of this event
    pub fn phase(&self) -> InputPhase {
        match self {
            Self::Pointer(PointerEvent::Down { .. }) | Self::Touch(TouchEvent::Start { .. }) => {
                InputPhase::Start
            }
            Self::Pointer(PointerEvent::Move { .. }) | Self::Touch(TouchEvent::Move { .. }) => {
                InputPhase::Move
            }
            Self::Pointer(PointerEvent::Up { .. }) | Self::Touch(TouchEvent::End { .. }) => {
                InputPhase::End
            }
        }
    }

    /// Raw device coordinates carried by the event
    pub fn position(&self) -> (f32, f32) {
        match *self {
            Self::Pointer(PointerEvent::Down { x, y })
            | Self::Pointer(PointerEvent::Move { x, y })
            | Self::Pointer(PointerEvent::Up { x, y }) => (x, y),
            Self::Touch(TouchEvent::Start { page_x, page_y })
            | Self::Touch(TouchEvent::Move { page_x, page_y })
            | Self::Touch(TouchEvent::End { page_x, page_y }) => (page_x, page_y),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_classification() {
        let down = InputEvent::Pointer(PointerEvent::Down { x: 3.0, y: 4.0 });
        assert_eq!(down.source(), InputSource::Pointer);
        assert_eq!(down.phase(), InputPhase::Start);
        assert_eq!(down.position(), (3.0, 4.0));

        let end = InputEvent::Touch(TouchEvent::End {
            page_x: 10.0,
            page_y: 170.0,
        });
        assert_eq!(end.source(), InputSource::Touch);
        assert_eq!(end.phase(), InputPhase::End);
        assert_eq!(end.position(), (10.0, 170.0));
    }
}
