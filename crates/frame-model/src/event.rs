//! Input event types for the live cursor feed.
//!
//! Events carry monotonic nanoseconds relative to the session epoch and
//! screen-space pointer coordinates. Scripted event streams use the same
//! JSONL encoding as this module's serde representation.

use serde::{Deserialize, Serialize};

use crate::geometry::Point2D;

/// Monotonic timestamp in nanoseconds since session start.
pub type TimestampNs = u64;

/// A single input event with timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InputEvent {
    /// Monotonic nanoseconds since session start.
    #[serde(rename = "t")]
    pub timestamp_ns: TimestampNs,

    /// The event payload.
    #[serde(flatten)]
    pub kind: EventKind,
}

/// Discriminated union of event types.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventKind {
    /// Pointer moved to an absolute screen position.
    Move { x: f64, y: f64 },
    LeftDown,
    LeftUp,
    RightDown,
    RightUp,
    /// Keyboard key pressed. `code` is the platform virtual key code.
    KeyDown { code: u32 },
    /// Keyboard key released.
    KeyUp { code: u32 },
}

impl InputEvent {
    /// Create a pointer move event.
    pub fn moved(timestamp_ns: TimestampNs, x: f64, y: f64) -> Self {
        Self {
            timestamp_ns,
            kind: EventKind::Move { x, y },
        }
    }

    pub fn left_down(timestamp_ns: TimestampNs) -> Self {
        Self {
            timestamp_ns,
            kind: EventKind::LeftDown,
        }
    }

    pub fn left_up(timestamp_ns: TimestampNs) -> Self {
        Self {
            timestamp_ns,
            kind: EventKind::LeftUp,
        }
    }

    pub fn right_down(timestamp_ns: TimestampNs) -> Self {
        Self {
            timestamp_ns,
            kind: EventKind::RightDown,
        }
    }

    pub fn right_up(timestamp_ns: TimestampNs) -> Self {
        Self {
            timestamp_ns,
            kind: EventKind::RightUp,
        }
    }

    pub fn key_down(timestamp_ns: TimestampNs, code: u32) -> Self {
        Self {
            timestamp_ns,
            kind: EventKind::KeyDown { code },
        }
    }

    pub fn key_up(timestamp_ns: TimestampNs, code: u32) -> Self {
        Self {
            timestamp_ns,
            kind: EventKind::KeyUp { code },
        }
    }

    /// Timestamp as fractional seconds since session start.
    pub fn timestamp_secs(&self) -> f64 {
        self.timestamp_ns as f64 / 1_000_000_000.0
    }

    /// Extract the pointer position if this event carries one.
    pub fn pointer_position(&self) -> Option<Point2D> {
        match self.kind {
            EventKind::Move { x, y } => Some(Point2D::new(x, y)),
            _ => None,
        }
    }

    /// Whether this is a button or key edge (anything but a move).
    pub fn is_edge(&self) -> bool {
        !matches!(self.kind, EventKind::Move { .. })
    }
}

/// A periodic pointer position sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CursorSample {
    pub timestamp_ns: TimestampNs,
    pub position: Point2D,
}

impl CursorSample {
    pub fn new(timestamp_ns: TimestampNs, position: Point2D) -> Self {
        Self {
            timestamp_ns,
            position,
        }
    }
}

/// What gesture produced a zoom trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerKind {
    Click,
    Dwell,
    Key,
}

/// A request to zoom toward a screen position.
///
/// Produced by the trigger detector and consumed at most once by the camera.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomTrigger {
    /// Screen-space position the camera should focus on.
    pub anchor: Point2D,
    pub timestamp_ns: TimestampNs,
    pub kind: TriggerKind,
}

impl ZoomTrigger {
    pub fn new(anchor: Point2D, timestamp_ns: TimestampNs, kind: TriggerKind) -> Self {
        Self {
            anchor,
            timestamp_ns,
            kind,
        }
    }
}

/// Parse events from JSONL content (one JSON object per line).
///
/// Blank lines and `#` comment lines are skipped.
pub fn parse_events(jsonl: &str) -> Result<Vec<InputEvent>, serde_json::Error> {
    jsonl
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(serde_json::from_str)
        .collect()
}

/// Serialize events to JSONL format.
pub fn serialize_events(events: &[InputEvent]) -> Result<String, serde_json::Error> {
    let mut output = String::new();
    for event in events {
        output.push_str(&serde_json::to_string(event)?);
        output.push('\n');
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_format_is_flat_and_tagged() {
        let event = InputEvent::moved(1_234_567, 640.0, 360.5);
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"t\":1234567"));
        assert!(json.contains("\"type\":\"move\""));
        assert!(json.contains("\"x\":640.0"));

        let key = serde_json::to_string(&InputEvent::key_down(5, 49)).unwrap();
        assert!(key.contains("\"type\":\"key_down\""));
        assert!(key.contains("\"code\":49"));
    }

    #[test]
    fn test_parse_script_with_comments() {
        let jsonl = "# demo script\n\
                     {\"t\":0,\"type\":\"move\",\"x\":10.0,\"y\":20.0}\n\
                     \n\
                     {\"t\":500000000,\"type\":\"left_down\"}\n\
                     {\"t\":600000000,\"type\":\"left_up\"}\n";
        let events = parse_events(jsonl).unwrap();
        assert_eq!(events.len(), 3);
        assert_eq!(events[1].kind, EventKind::LeftDown);
        assert_eq!(events[0].pointer_position(), Some(Point2D::new(10.0, 20.0)));

        let text = serialize_events(&events).unwrap();
        assert_eq!(parse_events(&text).unwrap(), events);
    }

    #[test]
    fn test_edges_and_positions() {
        assert!(!InputEvent::moved(0, 1.0, 1.0).is_edge());
        assert!(InputEvent::left_down(0).is_edge());
        assert!(InputEvent::key_up(0, 3).is_edge());
        assert_eq!(InputEvent::right_down(0).pointer_position(), None);
        assert!((InputEvent::left_up(1_500_000_000).timestamp_secs() - 1.5).abs() < 1e-9);
    }
}
