//! Surface mutations as data, for the JSON output and the web feed.

use serde::Serialize;

use crate::rotator::Opacity;

/// One mutation applied to a display surface
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SurfaceEvent {
    Opacity { element: String, value: Opacity },
    Text { element: String, text: String },
}

impl SurfaceEvent {
    pub fn opacity(element: &str, value: Opacity) -> Self {
        SurfaceEvent::Opacity {
            element: element.to_string(),
            value,
        }
    }

    pub fn text(element: &str, text: &str) -> Self {
        SurfaceEvent::Text {
            element: element.to_string(),
            text: text.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialize_text_event() {
        let event = SurfaceEvent::text("rotating-text", "Discover your dream job");
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(
            json,
            r#"{"type":"text","element":"rotating-text","text":"Discover your dream job"}"#
        );
    }

    #[test]
    fn test_serialize_opacity_event() {
        let event = SurfaceEvent::opacity("rotating-text", Opacity::Opaque);
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(
            json,
            r#"{"type":"opacity","element":"rotating-text","value":"opaque"}"#
        );
    }
}
