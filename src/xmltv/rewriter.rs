//! Streaming XMLTV channel icon rewriter
//!
//! The guide is copied event by event with quick-xml. Each `<channel>` element
//! is buffered whole so its identifier, first display name and icon can be
//! inspected before it is written back out with the icon source assigned by
//! the caller. Everything outside channels is passed through untouched apart
//! from the XML declaration, which is always `version="1.0" encoding="UTF-8"`,
//! and empty elements, which are always written as a start/end tag pair.

use quick_xml::Reader;
use quick_xml::Writer;
use quick_xml::escape::unescape;
use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use std::borrow::Cow;

use crate::errors::{AppError, AppResult};
use crate::models::ChannelRecord;

const CHANNEL: &[u8] = b"channel";
const DISPLAY_NAME: &[u8] = b"display-name";
const ICON: &[u8] = b"icon";
const SRC: &str = "src";

/// What the rewriter knows about a channel when asking for its icon.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelInfo {
    pub id: String,
    /// Text of the first `display-name`, entities resolved and trimmed.
    /// `None` when the channel has no display name or it is empty.
    pub display_name: Option<String>,
    /// `src` of the first `icon` child, if any.
    pub icon_src: Option<String>,
}

impl ChannelInfo {
    /// Name used for matching and reporting: the display name, else the id.
    pub fn matching_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.id)
    }
}

/// Result of rewriting a guide.
#[derive(Debug, Clone)]
pub struct GuideRewrite {
    pub document: String,
    /// One record per channel in document order. `logo_url` is set for the
    /// channels whose icon was assigned during this rewrite.
    pub channels: Vec<ChannelRecord>,
}

impl GuideRewrite {
    pub fn assigned(&self) -> usize {
        self.channels.iter().filter(|c| c.logo_url.is_some()).count()
    }
}

/// A buffered `<channel>` element.
struct ChannelBlock {
    events: Vec<Event<'static>>,
    info: ChannelInfo,
    /// Index of the first direct `icon` child event.
    icon_at: Option<usize>,
    /// Whitespace preceding the first direct child element, reused to indent
    /// a newly created icon.
    child_indent: Option<String>,
}

fn attribute_value(attr: &Attribute) -> String {
    let raw = String::from_utf8_lossy(&attr.value);
    match unescape(&raw) {
        Ok(value) => value.into_owned(),
        Err(_) => raw.into_owned(),
    }
}

fn find_attribute(element: &BytesStart, key: &str) -> Option<String> {
    element
        .attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == key.as_bytes())
        .map(|attr| attribute_value(&attr))
}

fn is_whitespace(text: &BytesText) -> bool {
    text.iter().all(|b| b.is_ascii_whitespace())
}

fn parse_error(document_name: &str, reader: &Reader<&[u8]>, message: impl std::fmt::Display) -> AppError {
    AppError::parse(
        document_name,
        format!("{message} (at byte {})", reader.error_position()),
    )
}

/// Read the rest of a channel element after its start tag.
fn read_channel_block(
    reader: &mut Reader<&[u8]>,
    start: BytesStart<'static>,
    document_name: &str,
) -> AppResult<ChannelBlock> {
    let mut block = ChannelBlock {
        info: ChannelInfo {
            id: find_attribute(&start, "id").unwrap_or_default(),
            ..ChannelInfo::default()
        },
        events: vec![Event::Start(start)],
        icon_at: None,
        child_indent: None,
    };

    let mut depth = 1usize;
    // Some(text) while inside the first display-name
    let mut name_text: Option<String> = None;
    let mut name_seen = false;

    loop {
        let event = match reader.read_event() {
            Ok(Event::Eof) => {
                return Err(parse_error(document_name, reader, "unexpected end of document inside <channel>"));
            }
            Ok(event) => event.into_owned(),
            Err(e) => return Err(parse_error(document_name, reader, e)),
        };

        match &event {
            Event::Start(e) | Event::Empty(e) if depth == 1 => {
                if block.child_indent.is_none()
                    && let Some(Event::Text(text)) = block.events.last()
                    && is_whitespace(text)
                {
                    block.child_indent = Some(String::from_utf8_lossy(text).into_owned());
                }

                let name = e.name();
                if name.as_ref() == ICON && block.icon_at.is_none() {
                    block.icon_at = Some(block.events.len());
                    block.info.icon_src = find_attribute(e, SRC);
                } else if name.as_ref() == DISPLAY_NAME && !name_seen {
                    name_seen = true;
                    if matches!(event, Event::Start(_)) {
                        name_text = Some(String::new());
                    }
                }
            }
            Event::Text(text) if depth == 2 => {
                if let Some(buffer) = name_text.as_mut() {
                    let raw = String::from_utf8_lossy(text.as_ref());
                    buffer.push_str(&unescape(&raw).unwrap_or(Cow::Borrowed(raw.as_ref())));
                }
            }
            Event::CData(data) if depth == 2 => {
                if let Some(buffer) = name_text.as_mut() {
                    buffer.push_str(&String::from_utf8_lossy(data.as_ref()));
                }
            }
            Event::GeneralRef(reference) if depth == 2 => {
                if let Some(buffer) = name_text.as_mut() {
                    let entity = format!("&{};", String::from_utf8_lossy(reference.as_ref()));
                    match unescape(&entity) {
                        Ok(resolved) => buffer.push_str(&resolved),
                        Err(_) => buffer.push_str(&entity),
                    }
                }
            }
            _ => {}
        }

        match &event {
            Event::Start(_) => depth += 1,
            Event::End(_) => {
                depth -= 1;
                if depth == 1
                    && let Some(text) = name_text.take()
                {
                    let text = text.trim();
                    if !text.is_empty() {
                        block.info.display_name = Some(text.to_string());
                    }
                }
            }
            _ => {}
        }

        let finished = depth == 0;
        block.events.push(event);
        if finished {
            return Ok(block);
        }
    }
}

/// Copy of an icon start tag with `src` replaced, keeping the other
/// attributes in order. `src` is appended when the tag has none.
fn icon_with_src(original: Option<&BytesStart>, url: &str) -> BytesStart<'static> {
    let mut icon = BytesStart::new("icon");
    let mut replaced = false;
    if let Some(original) = original {
        for attr in original.attributes().flatten() {
            if attr.key.as_ref() == SRC.as_bytes() {
                if !replaced {
                    icon.push_attribute((SRC, url));
                    replaced = true;
                }
            } else {
                icon.push_attribute(attr);
            }
        }
    }
    if !replaced {
        icon.push_attribute((SRC, url));
    }
    icon.into_owned()
}

impl ChannelBlock {
    fn set_icon(&mut self, url: &str) {
        match self.icon_at {
            Some(position) => {
                let replacement = match &self.events[position] {
                    Event::Start(e) => Event::Start(icon_with_src(Some(e), url)),
                    Event::Empty(e) => Event::Empty(icon_with_src(Some(e), url)),
                    _ => return,
                };
                self.events[position] = replacement;
            }
            None => {
                let icon = Event::Empty(icon_with_src(None, url));
                let end = self.events.len() - 1;
                let closing_whitespace = matches!(
                    self.events.get(end.wrapping_sub(1)),
                    Some(Event::Text(text)) if end > 1 && is_whitespace(text)
                );

                match (&self.child_indent, closing_whitespace) {
                    (Some(indent), true) => {
                        let indent = Event::Text(BytesText::from_escaped(indent.clone()));
                        self.events.splice(end - 1..end - 1, [indent, icon]);
                    }
                    _ => self.events.insert(end, icon),
                }
                self.icon_at = Some(end);
            }
        }
        self.info.icon_src = Some(url.to_string());
    }
}

/// Write an event, expanding `<x/>` into `<x></x>`.
fn write_expanded(writer: &mut Writer<Vec<u8>>, event: Event<'_>, document_name: &str) -> AppResult<()> {
    let result = match event {
        Event::Empty(element) => {
            let name = String::from_utf8_lossy(element.name().as_ref()).into_owned();
            writer
                .write_event(Event::Start(element))
                .and_then(|_| writer.write_event(Event::End(BytesEnd::new(name))))
        }
        other => writer.write_event(other),
    };
    result.map_err(|e| AppError::serialization(document_name, e.to_string()))
}

fn write_declaration(writer: &mut Writer<Vec<u8>>, document_name: &str) -> AppResult<()> {
    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(|e| AppError::serialization(document_name, e.to_string()))
}

fn has_declaration(document: &str) -> bool {
    document
        .trim_start()
        .strip_prefix("<?xml")
        .is_some_and(|rest| rest.starts_with(|c: char| c.is_ascii_whitespace() || c == '?'))
}

/// Rewrite every channel's icon.
///
/// `assign` is called once per channel in document order; returning a URL
/// sets (or creates) that channel's `<icon src>`, returning `None` leaves the
/// channel as it was. Parse errors and serialization errors abort the whole
/// rewrite.
pub fn rewrite_channel_icons<F>(document: &str, document_name: &str, mut assign: F) -> AppResult<GuideRewrite>
where
    F: FnMut(&ChannelInfo) -> Option<String>,
{
    let document = document.strip_prefix('\u{feff}').unwrap_or(document);
    let mut reader = Reader::from_str(document);
    let mut writer = Writer::new(Vec::with_capacity(document.len() + document.len() / 8));
    let mut channels = Vec::new();

    if !has_declaration(document) {
        write_declaration(&mut writer, document_name)?;
        write_expanded(&mut writer, Event::Text(BytesText::from_escaped("\n")), document_name)?;
    }

    let mut depth = 0usize;
    let mut saw_root = false;

    loop {
        let event = match reader.read_event() {
            Ok(event) => event,
            Err(e) => return Err(parse_error(document_name, &reader, e)),
        };

        if depth == 0 && saw_root && matches!(event, Event::Start(_) | Event::Empty(_)) {
            return Err(parse_error(document_name, &reader, "more than one root element"));
        }

        match event {
            Event::Eof => break,
            Event::Decl(_) => write_declaration(&mut writer, document_name)?,
            Event::Start(start) if start.name().as_ref() == CHANNEL => {
                saw_root = true;
                let mut block = read_channel_block(&mut reader, start.into_owned(), document_name)?;
                let assigned = assign(&block.info);
                if let Some(url) = &assigned {
                    block.set_icon(url);
                }
                channels.push(ChannelRecord {
                    name: block.info.matching_name().to_string(),
                    id: block.info.id,
                    logo_url: assigned,
                });
                for event in block.events {
                    write_expanded(&mut writer, event, document_name)?;
                }
            }
            Event::Empty(element) if element.name().as_ref() == CHANNEL => {
                saw_root = true;
                let id = find_attribute(&element, "id").unwrap_or_default();
                let mut block = ChannelBlock {
                    info: ChannelInfo {
                        id,
                        ..ChannelInfo::default()
                    },
                    events: vec![
                        Event::Start(element.into_owned()),
                        Event::End(BytesEnd::new("channel")),
                    ],
                    icon_at: None,
                    child_indent: None,
                };
                let assigned = assign(&block.info);
                if let Some(url) = &assigned {
                    block.set_icon(url);
                }
                channels.push(ChannelRecord {
                    name: block.info.matching_name().to_string(),
                    id: block.info.id,
                    logo_url: assigned,
                });
                for event in block.events {
                    write_expanded(&mut writer, event, document_name)?;
                }
            }
            other => {
                match &other {
                    Event::Start(_) => {
                        saw_root = true;
                        depth += 1;
                    }
                    Event::End(_) => depth = depth.saturating_sub(1),
                    Event::Empty(_) => saw_root = true,
                    Event::Text(text) if depth == 0 && !is_whitespace(text) => {
                        return Err(parse_error(document_name, &reader, "text outside the root element"));
                    }
                    _ => {}
                }
                write_expanded(&mut writer, other, document_name)?;
            }
        }
    }

    if depth != 0 {
        return Err(parse_error(document_name, &reader, "unclosed elements at end of document"));
    }
    if !saw_root {
        return Err(parse_error(document_name, &reader, "no root element found"));
    }

    let document = String::from_utf8(writer.into_inner())
        .map_err(|e| AppError::serialization(document_name, e.to_string()))?;

    Ok(GuideRewrite { document, channels })
}

/// Visit every channel without rewriting anything.
pub fn scan_channels<F>(document: &str, document_name: &str, mut visit: F) -> AppResult<()>
where
    F: FnMut(&ChannelInfo),
{
    rewrite_channel_icons(document, document_name, |info| {
        visit(info);
        None
    })
    .map(|_| ())
}
