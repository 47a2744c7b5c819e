// The recursive element tree and its encode/decode entry points

use serde::{Deserialize, Serialize};

use crate::bits::to_hex;
use crate::error::{BinaryError, Result};
use crate::types::{ContentId, Value};

use super::attribute;
use super::container::{read_container, write_container};
use super::tokens::{self, TokenTable};
use super::values;

/// Lowest valid element tag.
pub const MIN_ELEMENT_TAG: u8 = 0x02;
/// Highest valid element tag.
pub const MAX_ELEMENT_TAG: u8 = 0x36;
/// Character data payload of an element.
pub const CDATA_TAG: u8 = 0x01;
/// Token table attached to an element.
pub const TOKEN_TABLE_TAG: u8 = 0x04;
/// Default content id attached to an element.
pub const DEFAULT_CONTENT_ID_TAG: u8 = 0x05;
/// Default language marker, recognised and skipped.
pub const DEFAULT_LANGUAGE_TAG: u8 = 0x06;

/// Deepest element nesting accepted before decoding gives up, so that
/// malformed input cannot exhaust the native stack.
const MAX_DEPTH: usize = 64;

/// An attribute: tag byte plus decoded value. The value kind is not on
/// the wire; see [`super::attribute`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    pub tag: u8,
    pub value: Value,
}

impl Attribute {
    pub fn new(tag: u8, value: Value) -> Self {
        Self { tag, value }
    }
}

/// A node of the element tree: tag, ordered attributes, ordered
/// children, optional character data, and the optional per-element
/// facilities (token table, default content id) that descendants
/// inherit.
///
/// Ancestor context is supplied top-down during decoding rather than
/// through parent back-references, so the tree owns its children
/// outright and has no reference cycles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    tag: u8,
    attributes: Vec<Attribute>,
    children: Vec<Element>,
    cdata: Option<String>,
    tokens: Option<TokenTable>,
    default_content_id: Option<ContentId>,
}

impl Element {
    pub fn new(tag: u8) -> Self {
        Self {
            tag,
            attributes: Vec::new(),
            children: Vec::new(),
            cdata: None,
            tokens: None,
            default_content_id: None,
        }
    }

    pub fn tag(&self) -> u8 {
        self.tag
    }

    /// Append an attribute, preserving insertion order.
    pub fn add_attribute(&mut self, attribute: Attribute) {
        self.attributes.push(attribute);
    }

    /// Append a child element, preserving insertion order.
    pub fn add_child(&mut self, child: Element) {
        self.children.push(child);
    }

    pub fn set_cdata(&mut self, text: impl Into<String>) {
        self.cdata = Some(text.into());
    }

    pub fn cdata(&self) -> Option<&str> {
        self.cdata.as_deref()
    }

    pub fn set_tokens(&mut self, tokens: TokenTable) {
        self.tokens = Some(tokens);
    }

    pub fn tokens(&self) -> Option<&TokenTable> {
        self.tokens.as_ref()
    }

    pub fn set_default_content_id(&mut self, id: ContentId) {
        self.default_content_id = Some(id);
    }

    pub fn default_content_id(&self) -> Option<&ContentId> {
        self.default_content_id.as_ref()
    }

    /// All attributes in wire order.
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// Attributes with the given tag, in wire order.
    pub fn attributes_by_tag(&self, tag: u8) -> impl Iterator<Item = &Attribute> {
        self.attributes.iter().filter(move |a| a.tag == tag)
    }

    pub fn has_attribute(&self, tag: u8) -> bool {
        self.attributes_by_tag(tag).next().is_some()
    }

    /// All children in wire order.
    pub fn children(&self) -> &[Element] {
        &self.children
    }

    /// Children with the given tag, in wire order.
    pub fn children_by_tag(&self, tag: u8) -> impl Iterator<Item = &Element> {
        self.children.iter().filter(move |c| c.tag == tag)
    }

    pub fn has_child(&self, tag: u8) -> bool {
        self.children_by_tag(tag).next().is_some()
    }

    pub(crate) fn children_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        self.children.iter_mut()
    }
}

fn valid_element_tag(tag: u8) -> bool {
    (MIN_ELEMENT_TAG..=MAX_ELEMENT_TAG).contains(&tag)
}

/// Encode an element tree into its binary document.
pub fn encode(element: &Element) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    encode_into(element, &mut out, 0)?;
    tracing::debug!(
        "encoded element 0x{:02x} into {} bytes",
        element.tag,
        out.len()
    );
    Ok(out)
}

fn encode_into(element: &Element, out: &mut Vec<u8>, depth: usize) -> Result<()> {
    if depth >= MAX_DEPTH {
        return Err(BinaryError::NestingTooDeep { depth });
    }
    if !valid_element_tag(element.tag) {
        return Err(BinaryError::InvalidTag { tag: element.tag });
    }
    let mut payload = Vec::new();
    for attribute in &element.attributes {
        let data = attribute::encode_value(&attribute.value)?;
        write_container(&mut payload, attribute.tag, &data)?;
    }
    if let Some(tokens) = &element.tokens {
        write_container(&mut payload, TOKEN_TABLE_TAG, &tokens::encode_token_table(tokens)?)?;
    }
    if let Some(id) = &element.default_content_id {
        write_container(
            &mut payload,
            DEFAULT_CONTENT_ID_TAG,
            &values::encode_contentid(id)?,
        )?;
    }
    for child in &element.children {
        encode_into(child, &mut payload, depth + 1)?;
    }
    if let Some(cdata) = &element.cdata {
        write_container(&mut payload, CDATA_TAG, cdata.as_bytes())?;
    }
    if payload.is_empty() {
        return Err(BinaryError::EmptyPayload { tag: element.tag });
    }
    write_container(out, element.tag, &payload)
}

/// Decode a binary document into its element tree. Token substitution
/// is applied to character data before the tree is returned.
pub fn decode(input: &[u8]) -> Result<Element> {
    let (container, consumed) = read_container(input)?;
    if consumed < input.len() {
        tracing::debug!(
            "ignoring {} trailing bytes after the root element",
            input.len() - consumed
        );
    }
    let mut root = decode_tree(container.tag, container.payload, 0)?;
    tokens::substitute(&mut root);
    Ok(root)
}

fn decode_tree(tag: u8, payload: &[u8], depth: usize) -> Result<Element> {
    if depth >= MAX_DEPTH {
        return Err(BinaryError::NestingTooDeep { depth });
    }
    if !valid_element_tag(tag) {
        return Err(BinaryError::InvalidTag { tag });
    }
    tracing::debug!(
        "decoding element 0x{:02x} from {} bytes of payload",
        tag,
        payload.len()
    );
    let mut element = Element::new(tag);
    let mut rest = payload;
    while !rest.is_empty() {
        let (child, consumed) = read_container(rest)?;
        match child.tag {
            0x80..=0x87 => {
                let value = attribute::decode_value(tag, child.tag, child.payload)?;
                element.attributes.push(Attribute::new(child.tag, value));
            }
            TOKEN_TABLE_TAG => {
                element.tokens = Some(tokens::decode_token_table(child.payload)?);
            }
            DEFAULT_CONTENT_ID_TAG => {
                element.default_content_id = Some(values::decode_contentid(child.payload)?);
            }
            DEFAULT_LANGUAGE_TAG => {
                // recognised but deliberately not stored
                tracing::debug!("skipping default language marker under 0x{:02x}", tag);
            }
            CDATA_TAG => {
                if element.cdata.is_some() {
                    return Err(BinaryError::DuplicateCdata { tag });
                }
                element.cdata = Some(String::from_utf8(child.payload.to_vec())?);
            }
            child_tag if valid_element_tag(child_tag) => {
                element
                    .children
                    .push(decode_tree(child_tag, child.payload, depth + 1)?);
            }
            child_tag => {
                tracing::debug!(
                    "unknown tag 0x{:02x} under 0x{:02x}: {}",
                    child_tag,
                    tag,
                    to_hex(child.payload)
                );
                return Err(BinaryError::UnknownTag {
                    tag: child_tag,
                    parent: tag,
                });
            }
        }
        rest = &rest[consumed..];
    }
    Ok(element)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{EnsembleId, Timepoint};
    use chrono::NaiveDate;

    fn sample_schedule() -> Element {
        let mut programme = Element::new(0x1c);
        programme.add_attribute(Attribute::new(0x81, Value::integer(0x51DD, 24)));
        programme.add_attribute(Attribute::new(
            0x80,
            Value::string("crid://bbc.co.uk/4969758988"),
        ));
        let mut name = Element::new(0x11);
        name.set_cdata("Gilles Peterson");
        programme.add_child(name);

        let mut schedule = Element::new(0x21);
        let created = NaiveDate::from_ymd_opt(2014, 4, 25)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        schedule.add_attribute(Attribute::new(
            0x81,
            Value::Timepoint(Timepoint::utc(created)),
        ));
        schedule.add_child(programme);
        schedule
    }

    #[test]
    fn test_tree_round_trip() {
        let mut root = Element::new(0x02);
        root.add_child(sample_schedule());
        let bytes = encode(&root).unwrap();
        let decoded = decode(&bytes).unwrap();
        assert_eq!(decoded, root);
    }

    #[test]
    fn test_serde_round_trip() {
        let schedule = sample_schedule();
        let json = serde_json::to_string(&schedule).unwrap();
        let restored: Element = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, schedule);

        let mut programme = Element::new(0x1c);
        programme.add_attribute(Attribute::new(
            0x84,
            Value::Enumeration {
                ordinal: 0x01,
                symbol: Some("on-air"),
            },
        ));
        let json = serde_json::to_string(&programme).unwrap();
        let restored: Element = serde_json::from_str(&json).unwrap();
        // enum symbols are derived from the ordinal, not stored
        assert_eq!(
            restored.attributes()[0].value,
            Value::Enumeration {
                ordinal: 0x01,
                symbol: None,
            }
        );
    }

    #[test]
    fn test_wire_order_preserved() {
        let mut element = Element::new(0x1c);
        element.add_attribute(Attribute::new(0x81, Value::integer(1, 24)));
        element.add_attribute(Attribute::new(0x82, Value::integer(2, 16)));
        element.add_attribute(Attribute::new(0x87, Value::integer(3, 8)));
        for tag in [0x11, 0x10, 0x12] {
            let mut child = Element::new(tag);
            child.set_cdata("x");
            element.add_child(child);
        }
        let decoded = decode(&encode(&element).unwrap()).unwrap();
        let attribute_tags: Vec<u8> = decoded.attributes().iter().map(|a| a.tag).collect();
        assert_eq!(attribute_tags, vec![0x81, 0x82, 0x87]);
        let child_tags: Vec<u8> = decoded.children().iter().map(|c| c.tag()).collect();
        assert_eq!(child_tags, vec![0x11, 0x10, 0x12]);
    }

    #[test]
    fn test_empty_payload_rejected() {
        let element = Element::new(0x10);
        let err = encode(&element).unwrap_err();
        assert!(matches!(err, BinaryError::EmptyPayload { tag: 0x10 }));
    }

    #[test]
    fn test_invalid_tag_rejected() {
        let mut element = Element::new(0x40);
        element.set_cdata("x");
        assert!(matches!(
            encode(&element).unwrap_err(),
            BinaryError::InvalidTag { tag: 0x40 }
        ));
        // 0x40 is also outside every decode dispatch range
        let err = decode(&[0x40, 0x01, 0x00]).unwrap_err();
        assert!(matches!(err, BinaryError::InvalidTag { tag: 0x40 }));
    }

    #[test]
    fn test_unknown_child_tag_rejected() {
        // element 0x10 containing a container with tag 0x90
        let bytes = [0x10, 0x03, 0x90, 0x01, 0x00];
        let err = decode(&bytes).unwrap_err();
        assert!(matches!(
            err,
            BinaryError::UnknownTag {
                tag: 0x90,
                parent: 0x10
            }
        ));
    }

    #[test]
    fn test_duplicate_cdata_rejected() {
        let bytes = [0x10, 0x06, 0x01, 0x01, b'a', 0x01, 0x01, b'b'];
        let err = decode(&bytes).unwrap_err();
        assert!(matches!(err, BinaryError::DuplicateCdata { tag: 0x10 }));
    }

    #[test]
    fn test_default_language_skipped() {
        // 0x06 marker with a 2-byte payload, then cdata
        let bytes = [0x10, 0x07, 0x06, 0x02, b'e', b'n', 0x01, 0x01, b'a'];
        let element = decode(&bytes).unwrap();
        assert_eq!(element.cdata(), Some("a"));
        assert!(element.children().is_empty());
    }

    #[test]
    fn test_default_content_id_attached() {
        let mut element = Element::new(0x1c);
        element.set_cdata("x");
        element.set_default_content_id(ContentId::Ensemble(EnsembleId {
            ecc: 0xE1,
            eid: 0xC479,
        }));
        let decoded = decode(&encode(&element).unwrap()).unwrap();
        assert_eq!(decoded, element);
        assert!(decoded.default_content_id().is_some());
    }

    #[test]
    fn test_token_substitution_in_descendants() {
        let mut tokens = TokenTable::new();
        tokens.insert(0x02, "Radio".to_string());
        let mut root = Element::new(0x28);
        root.set_tokens(tokens);
        let mut name = Element::new(0x11);
        name.set_cdata("\u{2} One");
        root.add_child(name);

        let decoded = decode(&encode(&root).unwrap()).unwrap();
        assert_eq!(decoded.children()[0].cdata(), Some("Radio One"));
    }

    #[test]
    fn test_nesting_depth_capped() {
        let mut bytes = vec![0x01, 0x01, b'a'];
        for _ in 0..80 {
            let mut wrapped = Vec::new();
            write_container(&mut wrapped, 0x10, &bytes).unwrap();
            bytes = wrapped;
        }
        let err = decode(&bytes).unwrap_err();
        assert!(matches!(err, BinaryError::NestingTooDeep { .. }));
    }

    #[test]
    fn test_accessors() {
        let mut element = Element::new(0x1c);
        element.add_attribute(Attribute::new(0x81, Value::integer(1, 24)));
        let mut child = Element::new(0x11);
        child.set_cdata("x");
        element.add_child(child);

        assert!(element.has_attribute(0x81));
        assert!(!element.has_attribute(0x82));
        assert!(element.has_child(0x11));
        assert!(!element.has_child(0x12));
        assert_eq!(element.children_by_tag(0x11).count(), 1);
        assert_eq!(element.attributes_by_tag(0x81).count(), 1);
    }
}
