use crate::errors::{AppError, AppResult};
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::ResolveResult;
use quick_xml::reader::NsReader;
use std::borrow::Cow;
use std::collections::HashMap;
use std::io::Cursor;

/// An opened element, reduced to what the WFS parsers look at.
pub(crate) struct ElementStart {
    /// Tag name with any namespace prefix stripped.
    pub name: String,
    /// Raw attribute keys (prefix kept) with unescaped values.
    pub attributes: Vec<(String, String)>,
    /// Number of open ancestors; the document root is at depth 0.
    pub depth: usize,
}

impl ElementStart {
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

pub(crate) enum XmlNode<'a> {
    Open(&'a ElementStart),
    /// Character data, with `depth` equal to the depth of its parent plus one.
    Text { text: &'a str, depth: usize },
    /// Closing of the element opened at `depth`. Self-closing tags produce Open then Close.
    Close { depth: usize },
}

/// Streams a document through `visit`, rejecting anything that is not well-formed XML.
///
/// The declared encoding is honoured, line endings in character data are normalized
/// to `\n`, and entities declared in the internal DTD subset are expanded when
/// their replacement text contains no markup.
///
/// The whole input is checked before this returns `Ok`, so callers that only commit
/// their results on success never hand out a partial parse.
pub(crate) fn walk_document<F>(content: &[u8], mut visit: F) -> AppResult<()>
where
    F: FnMut(XmlNode<'_>) -> AppResult<()>,
{
    let mut reader = NsReader::from_reader(Cursor::new(content));
    reader.config_mut().trim_text(false);
    reader.config_mut().check_end_names = true;

    let mut buf = Vec::with_capacity(8192);
    let mut depth = 0usize;
    let mut root_seen = false;
    let mut entities: HashMap<String, String> = HashMap::new();

    loop {
        let (namespace, event) = reader.read_resolved_event_into(&mut buf)?;
        let unbound = match namespace {
            ResolveResult::Unknown(prefix) => Some(prefix),
            _ => None,
        };
        if let (Some(prefix), Event::Start(_) | Event::Empty(_)) = (&unbound, &event) {
            return Err(unbound_prefix(prefix));
        }

        match event {
            Event::Start(e) => {
                ensure_single_root(depth, root_seen)?;
                root_seen = true;
                let element = read_element(&reader, &e, depth, &entities)?;
                visit(XmlNode::Open(&element))?;
                depth += 1;
            }
            Event::Empty(e) => {
                ensure_single_root(depth, root_seen)?;
                root_seen = true;
                let element = read_element(&reader, &e, depth, &entities)?;
                visit(XmlNode::Open(&element))?;
                visit(XmlNode::Close { depth })?;
            }
            Event::End(_) => {
                if depth == 0 {
                    return Err(AppError::MalformedDocument(
                        "closing tag without matching opening tag".into(),
                    ));
                }
                depth -= 1;
                visit(XmlNode::Close { depth })?;
            }
            Event::Text(e) => {
                let text = e.decode().map_err(|e| {
                    AppError::MalformedDocument(format!("Failed to decode XML text: {e}"))
                })?;
                ensure_xml_chars(&text)?;
                emit_text(&mut visit, &normalize_line_endings(&text), depth)?;
            }
            Event::CData(e) => {
                let text = e.decode().map_err(|e| {
                    AppError::MalformedDocument(format!("Failed to decode CDATA section: {e}"))
                })?;
                ensure_xml_chars(&text)?;
                emit_text(&mut visit, &normalize_line_endings(&text), depth)?;
            }
            Event::GeneralRef(e) => {
                // Character references are taken literally; `&#13;` stays a carriage return
                let resolved = match e
                    .resolve_char_ref()
                    .map_err(|e| AppError::MalformedDocument(e.to_string()))?
                {
                    Some(ch) => {
                        ensure_xml_chars(ch.encode_utf8(&mut [0; 4]))?;
                        ch.to_string()
                    }
                    None => {
                        let entity = e.decode().map_err(|e| {
                            AppError::MalformedDocument(format!("Failed to decode entity: {e}"))
                        })?;
                        resolve_entity(&entity, &entities)
                            .ok_or_else(|| {
                                AppError::MalformedDocument(format!(
                                    "undefined or unsupported entity &{entity};"
                                ))
                            })?
                            .to_string()
                    }
                };
                emit_text(&mut visit, &resolved, depth)?;
            }
            Event::DocType(e) => {
                let doctype = e.decode().map_err(|e| {
                    AppError::MalformedDocument(format!("Failed to decode DOCTYPE: {e}"))
                })?;
                declare_internal_entities(&doctype, &mut entities);
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if !root_seen {
        return Err(AppError::MalformedDocument("no element found".into()));
    }
    if depth > 0 {
        return Err(AppError::MalformedDocument(format!(
            "unexpected end of document with {depth} unclosed element(s)"
        )));
    }
    Ok(())
}

fn ensure_single_root(depth: usize, root_seen: bool) -> AppResult<()> {
    if depth == 0 && root_seen {
        return Err(AppError::MalformedDocument(
            "junk after document element".into(),
        ));
    }
    Ok(())
}

fn unbound_prefix(prefix: &[u8]) -> AppError {
    AppError::MalformedDocument(format!(
        "unbound namespace prefix '{}'",
        String::from_utf8_lossy(prefix)
    ))
}

fn emit_text<F>(visit: &mut F, text: &str, depth: usize) -> AppResult<()>
where
    F: FnMut(XmlNode<'_>) -> AppResult<()>,
{
    if depth == 0 {
        if text.trim().is_empty() {
            return Ok(());
        }
        return Err(AppError::MalformedDocument(
            "character data outside the document element".into(),
        ));
    }
    if text.is_empty() {
        return Ok(());
    }
    visit(XmlNode::Text { text, depth })
}

fn read_element<R>(
    reader: &NsReader<R>,
    e: &BytesStart<'_>,
    depth: usize,
    entities: &HashMap<String, String>,
) -> AppResult<ElementStart> {
    let decoder = reader.decoder();
    let qname = e.name();
    let qualified = decoder
        .decode(qname.as_ref())
        .map_err(|e| AppError::MalformedDocument(format!("Invalid element name: {e}")))?;
    ensure_xml_name(&qualified)?;
    let name = decoder
        .decode(e.local_name().as_ref())
        .map_err(|e| AppError::MalformedDocument(format!("Invalid element name: {e}")))?
        .into_owned();

    let mut attributes = Vec::new();
    for attr in e.attributes() {
        let attr = attr?;
        let key = decoder
            .decode(attr.key.as_ref())
            .map_err(|e| AppError::MalformedDocument(format!("Invalid attribute name: {e}")))?
            .into_owned();
        ensure_xml_name(&key)?;

        // `xml` and `xmlns` are reserved prefixes that never need a declaration
        let reserved = key == "xmlns" || key.starts_with("xmlns:") || key.starts_with("xml:");
        if !reserved {
            if let (ResolveResult::Unknown(prefix), _) = reader.resolve_attribute(attr.key) {
                return Err(unbound_prefix(&prefix));
            }
        }

        let value = attr
            .decode_and_unescape_value_with(decoder, |entity| resolve_entity(entity, entities))
            .map_err(|e| AppError::MalformedDocument(format!("Invalid attribute value: {e}")))?
            .into_owned();
        ensure_xml_chars(&value)?;
        attributes.push((key, value));
    }

    Ok(ElementStart {
        name,
        attributes,
        depth,
    })
}

fn resolve_entity<'a>(name: &str, entities: &'a HashMap<String, String>) -> Option<&'a str> {
    entities
        .get(name)
        .map(String::as_str)
        .or_else(|| resolve_predefined_entity(name))
}

/// Replaces `\r\n` and lone `\r` with `\n`, as XML parsers do before reporting text.
fn normalize_line_endings(text: &str) -> Cow<'_, str> {
    if text.contains('\r') {
        Cow::Owned(text.replace("\r\n", "\n").replace('\r', "\n"))
    } else {
        Cow::Borrowed(text)
    }
}

/// Records the general entities declared in a DOCTYPE's internal subset.
///
/// Parameter entities, external entities and values containing markup are skipped,
/// so references to them still fail as undefined. The first declaration of a name wins.
fn declare_internal_entities(doctype: &str, entities: &mut HashMap<String, String>) {
    let Some(open) = doctype.find('[') else {
        return;
    };
    let mut rest = &doctype[open + 1..];

    while let Some(pos) = rest.find("<!ENTITY") {
        rest = rest[pos + "<!ENTITY".len()..].trim_start();
        if rest.starts_with('%') {
            continue;
        }

        let name_end = rest
            .find(|c: char| c.is_whitespace())
            .unwrap_or(rest.len());
        let name = &rest[..name_end];
        rest = rest[name_end..].trim_start();

        let Some(quote) = rest.chars().next().filter(|c| *c == '"' || *c == '\'') else {
            continue;
        };
        let Some(end) = rest[1..].find(quote) else {
            break;
        };
        let raw = &rest[1..1 + end];
        rest = &rest[end + 2..];

        if !entities.contains_key(name) {
            if let Some(value) = expand_entity_value(raw, entities) {
                entities.insert(name.to_string(), value);
            }
        }
    }
}

fn expand_entity_value(raw: &str, entities: &HashMap<String, String>) -> Option<String> {
    if raw.contains('<') {
        return None;
    }

    let mut value = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(amp) = rest.find('&') {
        value.push_str(&rest[..amp]);
        let after = &rest[amp + 1..];
        let semi = after.find(';')?;
        let reference = &after[..semi];
        match reference.strip_prefix('#') {
            Some(code) => {
                let number = match code.strip_prefix('x') {
                    Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                    None => code.parse().ok()?,
                };
                value.push(char::from_u32(number).filter(|c| is_xml_char(*c))?);
            }
            None => value.push_str(resolve_entity(reference, entities)?),
        }
        rest = &after[semi + 1..];
    }
    value.push_str(rest);
    Some(normalize_line_endings(&value).into_owned())
}

fn ensure_xml_chars(text: &str) -> AppResult<()> {
    match text.chars().find(|c| !is_xml_char(*c)) {
        Some(c) => Err(AppError::MalformedDocument(format!(
            "invalid character U+{:04X}",
            c as u32
        ))),
        None => Ok(()),
    }
}

fn ensure_xml_name(name: &str) -> AppResult<()> {
    let mut chars = name.chars();
    let valid = chars.next().is_some_and(is_name_start_char) && chars.all(is_name_char);
    if valid {
        Ok(())
    } else {
        Err(AppError::MalformedDocument(format!("invalid name '{name}'")))
    }
}

// XML 1.0 (fifth edition) `Char`, `NameStartChar` and `NameChar` productions
fn is_xml_char(c: char) -> bool {
    matches!(c,
        '\u{9}' | '\u{A}' | '\u{D}'
        | '\u{20}'..='\u{D7FF}'
        | '\u{E000}'..='\u{FFFD}'
        | '\u{10000}'..='\u{10FFFF}')
}

fn is_name_start_char(c: char) -> bool {
    matches!(c,
        ':' | 'A'..='Z' | '_' | 'a'..='z'
        | '\u{C0}'..='\u{D6}'
        | '\u{D8}'..='\u{F6}'
        | '\u{F8}'..='\u{2FF}'
        | '\u{370}'..='\u{37D}'
        | '\u{37F}'..='\u{1FFF}'
        | '\u{200C}'..='\u{200D}'
        | '\u{2070}'..='\u{218F}'
        | '\u{2C00}'..='\u{2FEF}'
        | '\u{3001}'..='\u{D7FF}'
        | '\u{F900}'..='\u{FDCF}'
        | '\u{FDF0}'..='\u{FFFD}'
        | '\u{10000}'..='\u{EFFFF}')
}

fn is_name_char(c: char) -> bool {
    is_name_start_char(c)
        || matches!(c,
            '-' | '.' | '0'..='9' | '\u{B7}'
            | '\u{300}'..='\u{36F}'
            | '\u{203F}'..='\u{2040}')
}
