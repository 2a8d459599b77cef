#![forbid(unsafe_code)]

//! JSON input parser for host-encoded pointer events.
//!
//! The host page serializes DOM pointer input as one JSON object per event:
//!
//! ```text
//! {"kind":"mouse","phase":"down","x":500,"y":12}
//! {"kind":"touch","phase":"move","touches":[{"id":0,"x":10,"y":4}]}
//! ```
//!
//! [`parse_encoded_pointer`] turns such a record into a [`PointerEvent`].
//! Kinds without a pointer mapping (keyboard, wheel, focus, ...) return
//! `Ok(None)`.
//!
//! # Design
//!
//! Coordinates are accepted as given (including absent ones); deciding that
//! an event carries no usable x-coordinate is left to
//! [`PointerEvent::normalized_x`], so a malformed-but-parseable record is
//! ignored downstream instead of failing here.

use serde::Deserialize;
use swipecard_core::event::{PointerEvent, PointerEventKind, TouchPoint};

/// Errors from parsing encoded pointer JSON.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputParseError {
    /// Malformed JSON.
    #[error("JSON parse error: {0}")]
    Json(String),
    /// Missing required field.
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    /// Unknown phase for a pointer kind.
    #[error("unknown phase: {0}")]
    UnknownPhase(String),
}

#[derive(Debug, Deserialize)]
struct RawInput {
    kind: String,
    #[serde(default)]
    phase: Option<String>,
    #[serde(default)]
    x: Option<f64>,
    #[serde(default)]
    y: Option<f64>,
    #[serde(default)]
    touches: Option<Vec<RawTouch>>,
}

#[derive(Debug, Deserialize)]
struct RawTouch {
    #[serde(default)]
    id: u32,
    x: f64,
    #[serde(default)]
    y: f64,
}

/// Parse one JSON-encoded pointer record into a [`PointerEvent`].
///
/// Returns `Ok(None)` for kinds other than `mouse` and `touch`, and `Err` for
/// malformed JSON, a missing phase, or an unknown phase.
pub fn parse_encoded_pointer(json: &str) -> Result<Option<PointerEvent>, InputParseError> {
    let raw: RawInput =
        serde_json::from_str(json).map_err(|e| InputParseError::Json(e.to_string()))?;

    match raw.kind.as_str() {
        "mouse" => parse_mouse(raw).map(Some),
        "touch" => parse_touch(raw).map(Some),
        _other => {
            #[cfg(feature = "tracing")]
            tracing::trace!(kind = _other, "encoded input has no pointer mapping");
            Ok(None)
        }
    }
}

fn required_phase(raw: &RawInput) -> Result<&str, InputParseError> {
    raw.phase
        .as_deref()
        .ok_or(InputParseError::MissingField("phase"))
}

fn parse_mouse(raw: RawInput) -> Result<PointerEvent, InputParseError> {
    let kind = match required_phase(&raw)? {
        "down" => PointerEventKind::MouseDown,
        "move" => PointerEventKind::MouseMove,
        "up" => PointerEventKind::MouseUp,
        other => return Err(InputParseError::UnknownPhase(other.to_string())),
    };
    Ok(PointerEvent {
        kind,
        page_x: raw.x,
        page_y: raw.y,
        touches: None,
    })
}

fn parse_touch(raw: RawInput) -> Result<PointerEvent, InputParseError> {
    let kind = match required_phase(&raw)? {
        "start" => PointerEventKind::TouchStart,
        "move" => PointerEventKind::TouchMove,
        "end" | "cancel" => PointerEventKind::TouchEnd,
        other => return Err(InputParseError::UnknownPhase(other.to_string())),
    };
    let touches = raw
        .touches
        .unwrap_or_default()
        .into_iter()
        .map(|touch| TouchPoint::new(touch.id, touch.x, touch.y))
        .collect();
    Ok(PointerEvent {
        kind,
        page_x: raw.x,
        page_y: raw.y,
        touches: Some(touches),
    })
}
