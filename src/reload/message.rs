// src/reload/message.rs

use serde::Serialize;

/// A live-reload instruction for connected browsers.
///
/// Wire format (one JSON text frame per message):
///
/// ```json
/// {"type":"reload"}
/// {"type":"css","path":"/build/styles/main.min.css"}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum ReloadMessage {
    /// Reload the whole page.
    #[serde(rename = "reload")]
    FullPage,
    /// Swap the stylesheet served at `path` without reloading.
    #[serde(rename = "css")]
    Stylesheet { path: String },
}

impl ReloadMessage {
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| r#"{"type":"reload"}"#.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_format() {
        assert_eq!(ReloadMessage::FullPage.to_json(), r#"{"type":"reload"}"#);
        assert_eq!(
            ReloadMessage::Stylesheet {
                path: "/build/styles/main.min.css".into()
            }
            .to_json(),
            r#"{"type":"css","path":"/build/styles/main.min.css"}"#
        );
    }
}
