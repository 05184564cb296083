//! JSON-lines contact scripts
//!
//! One contact event per line, deserialized straight into [`ContactEvent`]:
//!
//! ```text
//! {"kind": "down", "position": {"x": 0.0, "y": 0.0}, "time_ms": 0}
//! {"kind": "motion", "position": {"x": 60.0, "y": 0.0}, "time_ms": 100}
//! {"kind": "up", "time_ms": 150}
//! ```
//!
//! Blank lines and `#` comments are skipped. This drives the engine from
//! raw input without hardware; it does not record or replay classified
//! gestures.

use std::path::{Path, PathBuf};

use crate::input::touch::ContactEvent;

/// Failure to load a contact script
#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    #[error("failed to read script {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid event on line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// Parse a script from its text content
pub fn parse_script(content: &str) -> Result<Vec<ContactEvent>, ScriptError> {
    let mut events = Vec::new();
    for (index, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let event = serde_json::from_str(line).map_err(|source| ScriptError::Parse {
            line: index + 1,
            source,
        })?;
        events.push(event);
    }
    Ok(events)
}

/// Load a script file
pub fn load_script(path: &Path) -> Result<Vec<ContactEvent>, ScriptError> {
    let content = std::fs::read_to_string(path).map_err(|source| ScriptError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_script(&content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::touch::Point;

    #[test]
    fn test_parse_skips_comments_and_blanks() {
        let content = r#"
# a tap
{"kind": "down", "position": {"x": 1.0, "y": 2.0}, "time_ms": 0}

{"kind": "up", "time_ms": 80}
"#;
        let events = parse_script(content).unwrap();
        assert_eq!(
            events,
            vec![
                ContactEvent::Down {
                    position: Point::new(1.0, 2.0),
                    time_ms: 0
                },
                ContactEvent::Up { time_ms: 80 },
            ]
        );
    }

    #[test]
    fn test_parse_cancel() {
        let events = parse_script("{\"kind\": \"cancel\"}\n").unwrap();
        assert_eq!(events, vec![ContactEvent::Cancel]);
    }

    #[test]
    fn test_parse_error_reports_line() {
        let content = "{\"kind\": \"up\", \"time_ms\": 10}\nnot json\n";
        let err = parse_script(content).unwrap_err();
        match err {
            ScriptError::Parse { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {other}"),
        }
    }
}
