//! Reading and writing documents with quick-xml

use crate::error::{XmlError, XmlResult};
use crate::tree::{Document, Element, Node};
use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use std::borrow::Cow;
use std::io::Cursor;

/// Parse a complete document
///
/// Input that is not valid UTF-8 is read as ISO-8859-1, which is what older
/// OCI-P servers declare. Whitespace-only text between elements is dropped.
pub fn parse(input: impl AsRef<[u8]>) -> XmlResult<Document> {
    let text = decode(input.as_ref());
    let mut reader = Reader::from_str(text.trim_start_matches('\u{feff}'));

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        let event = match reader.read_event() {
            Ok(event) => event,
            Err(e) => {
                return Err(XmlError::parse(format!(
                    "{} (at byte {})",
                    e,
                    reader.buffer_position()
                )))
            }
        };

        match event {
            Event::Start(e) => stack.push(start_element(&e)?),
            Event::Empty(e) => {
                let element = start_element(&e)?;
                attach(element, &mut stack, &mut root)?;
            }
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| XmlError::parse("closing tag without opening tag"))?;
                attach(element, &mut stack, &mut root)?;
            }
            Event::Text(e) => {
                let content = e.unescape().map_err(|e| XmlError::parse(e.to_string()))?;
                if content.trim().is_empty() {
                    continue;
                }
                match stack.last_mut() {
                    Some(parent) => parent.push_node(Node::Text(content.into_owned())),
                    None => return Err(XmlError::parse("text outside the document element")),
                }
            }
            Event::CData(e) => {
                if let Some(parent) = stack.last_mut() {
                    let content = String::from_utf8_lossy(&e.into_inner()).into_owned();
                    parent.push_node(Node::CData(content));
                }
            }
            Event::Comment(e) => {
                if let Some(parent) = stack.last_mut() {
                    let content = String::from_utf8_lossy(&e.into_inner()).into_owned();
                    parent.push_node(Node::Comment(content));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(XmlError::parse(format!("unclosed element <{}>", open.name())));
    }

    root.map(Document::new)
        .ok_or_else(|| XmlError::parse("document has no root element"))
}

/// Pretty-print a document with a UTF-8 declaration and two-space indentation
pub fn serialize(doc: &Document) -> XmlResult<String> {
    to_xml_string(doc, true)
}

/// Write a document, indented or on a single line
pub fn to_xml_string(doc: &Document, pretty: bool) -> XmlResult<String> {
    let bytes = if pretty {
        let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);
        write_document(&mut writer, doc)?;
        writer.into_inner().into_inner()
    } else {
        let mut writer = Writer::new(Cursor::new(Vec::new()));
        write_document(&mut writer, doc)?;
        writer.into_inner().into_inner()
    };
    String::from_utf8(bytes).map_err(|e| XmlError::Serialize(e.to_string()))
}

/// Write a single element without an XML declaration
pub fn element_to_string(element: &Element) -> XmlResult<String> {
    let mut writer = Writer::new(Cursor::new(Vec::new()));
    write_element(&mut writer, element)?;
    String::from_utf8(writer.into_inner().into_inner())
        .map_err(|e| XmlError::Serialize(e.to_string()))
}

fn decode(input: &[u8]) -> Cow<'_, str> {
    match std::str::from_utf8(input) {
        Ok(text) => Cow::Borrowed(text),
        Err(_) => Cow::Owned(input.iter().map(|&b| b as char).collect()),
    }
}

fn start_element(start: &BytesStart<'_>) -> XmlResult<Element> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut element = Element::new(name);
    for attr in start.attributes() {
        let attr = attr.map_err(|e| XmlError::parse(e.to_string()))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|e| XmlError::parse(e.to_string()))?
            .into_owned();
        element.set_attribute(key, value);
    }
    Ok(element)
}

fn attach(element: Element, stack: &mut [Element], root: &mut Option<Element>) -> XmlResult<()> {
    if let Some(parent) = stack.last_mut() {
        parent.push_node(Node::Element(element));
        return Ok(());
    }
    if root.is_some() {
        return Err(XmlError::parse(format!(
            "second document element <{}>",
            element.name()
        )));
    }
    *root = Some(element);
    Ok(())
}

fn write_document<W: std::io::Write>(writer: &mut Writer<W>, doc: &Document) -> XmlResult<()> {
    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(|e| XmlError::Serialize(e.to_string()))?;
    write_element(writer, doc.root())
}

fn write_element<W: std::io::Write>(writer: &mut Writer<W>, element: &Element) -> XmlResult<()> {
    let mut start = BytesStart::new(element.name());
    for (key, value) in element.attributes() {
        start.push_attribute((key, value));
    }

    if element.nodes().is_empty() {
        return writer
            .write_event(Event::Empty(start))
            .map_err(|e| XmlError::Serialize(e.to_string()));
    }

    writer
        .write_event(Event::Start(start))
        .map_err(|e| XmlError::Serialize(e.to_string()))?;

    for node in element.nodes() {
        let result = match node {
            Node::Element(child) => {
                write_element(writer, child)?;
                continue;
            }
            Node::Text(text) => writer.write_event(Event::Text(BytesText::new(text))),
            Node::CData(text) => writer.write_event(Event::CData(BytesCData::new(text.as_str()))),
            Node::Comment(text) => {
                writer.write_event(Event::Comment(BytesText::from_escaped(text.as_str())))
            }
        };
        result.map_err(|e| XmlError::Serialize(e.to_string()))?;
    }

    writer
        .write_event(Event::End(BytesEnd::new(element.name())))
        .map_err(|e| XmlError::Serialize(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keeps_prefixes_and_attributes() {
        let doc = parse(
            br#"<?xml version="1.0" encoding="UTF-8"?>
            <x:Profile xmlns:x="http://schema.broadsoft.com/xsi" level="user">
                <x:details><x:userId>alice@example.com</x:userId></x:details>
            </x:Profile>"#,
        )
        .unwrap();
        assert_eq!(doc.root().name(), "x:Profile");
        assert_eq!(doc.root().attribute("level"), Some("user"));
        assert_eq!(
            doc.find("details/userId").and_then(|e| e.text()).as_deref(),
            Some("alice@example.com")
        );
    }

    #[test]
    fn test_parse_unescapes_text() {
        let doc = parse("<a><b>Tom &amp; Jerry</b></a>").unwrap();
        assert_eq!(doc.find("b").unwrap().text().as_deref(), Some("Tom & Jerry"));
    }

    #[test]
    fn test_parse_rejects_malformed_input() {
        assert!(matches!(parse("<a><b></a>"), Err(XmlError::Parse(_))));
        assert!(matches!(parse("<a>"), Err(XmlError::Parse(_))));
        assert!(matches!(parse(""), Err(XmlError::Parse(_))));
        assert!(matches!(parse("<a/><b/>"), Err(XmlError::Parse(_))));
    }

    #[test]
    fn test_parse_latin1_fallback() {
        let bytes = b"<?xml version=\"1.0\" encoding=\"ISO-8859-1\"?><n>Jos\xe9</n>";
        let doc = parse(&bytes[..]).unwrap();
        assert_eq!(doc.root().text().as_deref(), Some("Jos\u{e9}"));
    }

    #[test]
    fn test_serialize_escapes_and_declares() {
        let mut root = Element::new("note");
        root.set_attribute("title", "a<b");
        root.push_child(Element::with_text("body", "x & y"));
        root.push_child(Element::new("empty"));
        let xml = serialize(&Document::new(root)).unwrap();
        assert!(xml.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
        assert!(xml.contains(r#"title="a&lt;b""#));
        assert!(xml.contains("<body>x &amp; y</body>"));
        assert!(xml.contains("<empty/>"));
    }

    #[test]
    fn test_compact_output_has_no_newlines_between_elements() {
        let doc = parse("<a>\n  <b>1</b>\n  <c>2</c>\n</a>").unwrap();
        let xml = to_xml_string(&doc, false).unwrap();
        assert!(xml.ends_with("<a><b>1</b><c>2</c></a>"));
        assert_eq!(element_to_string(doc.root()).unwrap(), "<a><b>1</b><c>2</c></a>");
    }
}
