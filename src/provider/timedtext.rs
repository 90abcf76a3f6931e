//! Parser for YouTube's `timedtext` caption payload.
//!
//! Payloads look like:
//!
//! ```xml
//! <transcript>
//!   <text start="0.5" dur="1.54">Hey there &amp;#39;folks&amp;#39;</text>
//!   <text start="2.1" dur="3"/>
//! </transcript>
//! ```
//!
//! Text is usually escaped twice, so entities are decoded twice. Decoding works one entity at a
//! time: HTML named entities (`&nbsp;`) and numeric references resolve, anything else (a bare
//! `&`, an unknown name) is kept as written. Inline markup (`<i>`, `<font ...>`) is stripped.

use quick_xml::escape::{resolve_html5_entity, resolve_predefined_entity};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use regex::{Captures, Regex};
use std::borrow::Cow;

use crate::transcript::CaptionSegment;
use crate::{TranscriptError, TranscriptResult};

const TEXT_ELEMENT: &[u8] = b"text";

/// Parse a timedtext document into segments, preserving document order
pub fn parse(xml: &str) -> TranscriptResult<Vec<CaptionSegment>> {
    let cleaner = TextCleaner::new()?;
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);

    let mut segments = Vec::new();
    let mut current: Option<(f64, f64, String)> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.local_name().as_ref() == TEXT_ELEMENT => {
                let (start, duration) = timing(&e)?;
                current = Some((start, duration, String::new()));
            }
            Ok(Event::Empty(e)) if e.local_name().as_ref() == TEXT_ELEMENT => {
                let (start, duration) = timing(&e)?;
                segments.push(CaptionSegment::new(start, duration, String::new()));
            }
            Ok(Event::Text(e)) => {
                if let Some((_, _, text)) = current.as_mut() {
                    let raw = String::from_utf8_lossy(&e);
                    text.push_str(&cleaner.decode_entities(&raw));
                }
            }
            Ok(Event::CData(e)) => {
                if let Some((_, _, text)) = current.as_mut() {
                    text.push_str(&String::from_utf8_lossy(&e));
                }
            }
            Ok(Event::End(e)) if e.local_name().as_ref() == TEXT_ELEMENT => {
                if let Some((start, duration, raw)) = current.take() {
                    segments.push(CaptionSegment::new(start, duration, cleaner.clean(&raw)));
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(TranscriptError::Provider(format!(
                    "Failed to parse caption payload at position {}: {}",
                    reader.buffer_position(),
                    e
                )))
            }
        }
    }

    Ok(segments)
}

fn timing(element: &BytesStart<'_>) -> TranscriptResult<(f64, f64)> {
    let start = numeric_attribute(element, "start")?.unwrap_or(0.0);
    let duration = numeric_attribute(element, "dur")?.unwrap_or(0.0);
    Ok((start, duration))
}

fn numeric_attribute(element: &BytesStart<'_>, name: &str) -> TranscriptResult<Option<f64>> {
    let attribute = element
        .try_get_attribute(name)
        .map_err(|e| TranscriptError::Provider(format!("Malformed caption attribute '{}': {}", name, e)))?;

    let Some(attribute) = attribute else {
        return Ok(None);
    };

    let value = attribute
        .unescape_value()
        .map_err(|e| TranscriptError::Provider(format!("Malformed caption attribute '{}': {}", name, e)))?;

    value
        .trim()
        .parse::<f64>()
        .map(Some)
        .map_err(|_| TranscriptError::Provider(format!("Invalid caption {} value: {}", name, value)))
}

struct TextCleaner {
    entity: Regex,
    markup: Regex,
}

impl TextCleaner {
    fn new() -> TranscriptResult<Self> {
        let compile = |pattern: &str| {
            Regex::new(pattern)
                .map_err(|e| TranscriptError::Provider(format!("Invalid caption text pattern: {}", e)))
        };

        Ok(Self {
            entity: compile(r"&(#[xX][0-9a-fA-F]+|#[0-9]+|[A-Za-z][A-Za-z0-9]*);")?,
            markup: compile(r"<[^>]*>")?,
        })
    }

    /// One decoding pass; unresolvable references stay untouched
    fn decode_entities<'t>(&self, text: &'t str) -> Cow<'t, str> {
        self.entity.replace_all(text, |captures: &Captures| {
            resolve_entity(&captures[1]).unwrap_or_else(|| captures[0].to_string())
        })
    }

    /// Second entity pass plus markup removal
    fn clean(&self, text: &str) -> String {
        let decoded = self.decode_entities(text);
        self.markup.replace_all(&decoded, "").into_owned()
    }
}

fn resolve_entity(name: &str) -> Option<String> {
    if let Some(number) = name.strip_prefix('#') {
        let code = match number.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => number.parse().ok()?,
        };
        return char::from_u32(code).map(String::from);
    }

    resolve_predefined_entity(name)
        .or_else(|| resolve_html5_entity(name))
        .map(str::to_string)
}
