//! XML flattener.
//!
//! Walks a metadata document depth-first and records the trimmed text of every
//! element under its underscore-joined path, namespace prefixes removed:
//!
//! ```xml
//! <mmd:mmd xmlns:mmd="http://www.met.no/schema/mmd">
//!   <mmd:metadata_identifier>abc</mmd:metadata_identifier>
//! </mmd:mmd>
//! ```
//!
//! yields the single entry `mmd_metadata_identifier = abc`.

use std::collections::HashMap;
use std::io::BufRead;

use metadata_indexer_shared::FlattenedRecord;
use quick_xml::encoding::Decoder;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::errors::IngestError;
use crate::processor::composition::CompositionRules;

/// One open element on the parse stack.
#[derive(Debug, Default)]
struct PathFrame {
    /// Path from the root element, e.g. `mmd_data_access_type`. Empty for the
    /// document frame at the bottom of the stack.
    path: String,
    local_name: String,
    text: String,
    /// Values cached by composition rules for this frame's children.
    sibling_cache: HashMap<String, String>,
}

impl PathFrame {
    fn child(&self, local_name: String) -> Self {
        let path = if self.path.is_empty() {
            local_name.clone()
        } else {
            format!("{}_{}", self.path, local_name)
        };
        Self {
            path,
            local_name,
            ..Self::default()
        }
    }
}

fn local_name(start: &BytesStart<'_>, decoder: Decoder) -> Result<String, IngestError> {
    decoder
        .decode(start.local_name().as_ref())
        .map(|name| name.into_owned())
        .map_err(|e| IngestError::parse(format!("Element name cannot be decoded: {}", e)))
}

/// Emit the value of a closing element into the record.
fn close_frame(
    frame: PathFrame,
    parent: &mut PathFrame,
    rules: &CompositionRules,
    record: &mut FlattenedRecord,
) {
    let text = frame.text.trim();
    if text.is_empty() {
        return;
    }

    let mut value = text.to_string();
    for rule in rules.matching(&frame.local_name, &frame.path) {
        parent
            .sibling_cache
            .insert(rule.suffix().to_string(), text.to_string());
        if rule.compose() {
            value = rule.compose_value(&parent.sibling_cache, text);
        }
    }

    record.push(frame.path, value);
}

/// Flatten an XML metadata document into an ordered path/value record.
///
/// # Returns
///
/// * `Ok(FlattenedRecord)` - Every non-empty element value, in document order
/// * `Err(IngestError::ParseError)` - If the document is malformed or does not
///   have exactly one root element; nothing parsed before the failure is returned
pub fn flatten(xml: &str, rules: &CompositionRules) -> Result<FlattenedRecord, IngestError> {
    walk(Reader::from_str(xml), rules)
}

/// Flatten raw metadata bytes.
///
/// The character encoding is taken from the byte order mark or the XML
/// declaration, defaulting to UTF-8.
pub fn flatten_bytes(xml: &[u8], rules: &CompositionRules) -> Result<FlattenedRecord, IngestError> {
    walk(Reader::from_reader(xml), rules)
}

fn walk<R: BufRead>(
    mut reader: Reader<R>,
    rules: &CompositionRules,
) -> Result<FlattenedRecord, IngestError> {
    let mut buf = Vec::new();
    let mut stack = vec![PathFrame::default()];
    let mut record = FlattenedRecord::new();
    let mut root_seen = false;

    loop {
        buf.clear();
        let event = match reader.read_event_into(&mut buf) {
            Ok(event) => event,
            Err(e) => {
                return Err(IngestError::parse(format!(
                    "Malformed XML at position {}: {}",
                    reader.buffer_position(),
                    e
                )))
            }
        };

        match event {
            Event::Start(start) => {
                if stack.len() == 1 {
                    open_root(&mut root_seen)?;
                }
                let name = local_name(&start, reader.decoder())?;
                let frame = match stack.last() {
                    Some(parent) => parent.child(name),
                    None => return Err(IngestError::parse("Parse stack underflow")),
                };
                stack.push(frame);
            }
            // Self-closing elements carry no text.
            Event::Empty(_) => {
                if stack.len() == 1 {
                    open_root(&mut root_seen)?;
                }
            }
            Event::Text(text) => {
                let text = text
                    .unescape()
                    .map_err(|e| IngestError::parse(format!("Invalid character data: {}", e)))?;
                push_text(&mut stack, &text)?;
            }
            Event::CData(cdata) => {
                let bytes = cdata.into_inner();
                let text = reader
                    .decoder()
                    .decode(&bytes)
                    .map_err(|e| IngestError::parse(format!("CDATA cannot be decoded: {}", e)))?;
                push_text(&mut stack, &text)?;
            }
            Event::End(_) => {
                let frame = stack
                    .pop()
                    .ok_or_else(|| IngestError::parse("Parse stack underflow"))?;
                // Only the document frame has no parent.
                let parent = stack
                    .last_mut()
                    .ok_or_else(|| IngestError::parse("Unexpected closing tag"))?;
                close_frame(frame, parent, rules, &mut record);
            }
            Event::Eof => break,
            // Declarations, comments and processing instructions are not part
            // of the record.
            _ => {}
        }
    }

    if let Some(open) = stack.get(1) {
        return Err(IngestError::parse(format!(
            "Unexpected end of document, element <{}> is not closed",
            open.local_name
        )));
    }
    if !root_seen {
        return Err(IngestError::parse("Document has no root element"));
    }

    Ok(record)
}

fn open_root(root_seen: &mut bool) -> Result<(), IngestError> {
    if *root_seen {
        return Err(IngestError::parse("Document has more than one root element"));
    }
    *root_seen = true;
    Ok(())
}

/// Append character data to the innermost open element. Only whitespace may
/// appear outside the root element.
fn push_text(stack: &mut [PathFrame], text: &str) -> Result<(), IngestError> {
    match stack {
        [_document] => {
            if text.trim().is_empty() {
                Ok(())
            } else {
                Err(IngestError::parse("Character data outside the root element"))
            }
        }
        [.., frame] => {
            frame.text.push_str(text);
            Ok(())
        }
        [] => Err(IngestError::parse("Parse stack underflow")),
    }
}
