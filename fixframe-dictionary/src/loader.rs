/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! QuickFIX-format XML dictionary loader.
//!
//! The document is parsed into raw intermediate definitions first, then
//! assembled in a fixed order regardless of document order: fields, then
//! components, then header and trailer, then messages. Any unresolved
//! reference, duplicate fid, or malformed attribute aborts the whole load;
//! a partial dictionary is never exposed.
//!
//! Component references are resolved single-pass: a component may only
//! reference components defined earlier in the document. Forward references
//! are a hard `UndefinedReference` error.

use crate::schema::{
    DictVersion, Dictionary, EnumDomain, FieldDef, FieldKind, MessageCategory, SchemaNode,
    TypeBand,
};
use fixframe_core::error::SchemaLoadError;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use tracing::{debug, warn};

impl Dictionary {
    /// Loads a dictionary from a QuickFIX-format XML document.
    ///
    /// # Arguments
    /// * `xml` - The schema document text
    ///
    /// # Errors
    /// Returns `SchemaLoadError` if the document is malformed, declares a
    /// duplicate field, or references an undefined field or component.
    pub fn load(xml: &str) -> Result<Self, SchemaLoadError> {
        let doc = parse_document(xml)?;
        assemble(doc)
    }
}

/// One declared child within a node definition, before resolution.
#[derive(Debug)]
enum RawPart {
    Field {
        name: String,
        required: bool,
    },
    Component {
        name: String,
        required: bool,
    },
    Group {
        name: String,
        required: bool,
        parts: Vec<RawPart>,
    },
}

#[derive(Debug)]
struct RawFieldDef {
    fid: u32,
    name: String,
    type_name: String,
    values: Vec<(String, String)>,
}

#[derive(Debug)]
struct RawMessageDef {
    name: String,
    msg_type: String,
    category: String,
    parts: Vec<RawPart>,
}

#[derive(Debug, Default)]
struct RawDocument {
    version: Option<DictVersion>,
    header: Vec<RawPart>,
    trailer: Vec<RawPart>,
    components: Vec<(String, Vec<RawPart>)>,
    messages: Vec<RawMessageDef>,
    fields: Vec<RawFieldDef>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Prolog,
    Header,
    Trailer,
    Messages,
    Components,
    Fields,
}

struct GroupFrame {
    name: String,
    required: bool,
    parts: Vec<RawPart>,
}

struct Parser {
    doc: RawDocument,
    section: Section,
    current_field: Option<RawFieldDef>,
    current_message: Option<RawMessageDef>,
    current_component: Option<(String, Vec<RawPart>)>,
    group_stack: Vec<GroupFrame>,
    // Open non-empty <component>/<field> reference elements, so their
    // closing tags are not mistaken for the end of a definition.
    open_component_refs: usize,
    open_field_refs: usize,
}

fn xml_err(err: impl std::fmt::Display) -> SchemaLoadError {
    SchemaLoadError::Xml(err.to_string())
}

fn attr(e: &BytesStart<'_>, name: &str) -> Result<Option<String>, SchemaLoadError> {
    for a in e.attributes() {
        let a = a.map_err(xml_err)?;
        if a.key.as_ref() == name.as_bytes() {
            return Ok(Some(a.unescape_value().map_err(xml_err)?.into_owned()));
        }
    }
    Ok(None)
}

fn require_attr(e: &BytesStart<'_>, name: &str) -> Result<String, SchemaLoadError> {
    attr(e, name)?.ok_or_else(|| SchemaLoadError::MalformedAttribute {
        element: String::from_utf8_lossy(e.name().as_ref()).into_owned(),
        attribute: name.to_string(),
        reason: "attribute is missing".to_string(),
    })
}

fn numeric_attr(e: &BytesStart<'_>, name: &str) -> Result<u32, SchemaLoadError> {
    let raw = require_attr(e, name)?;
    raw.parse()
        .map_err(|_| SchemaLoadError::MalformedAttribute {
            element: String::from_utf8_lossy(e.name().as_ref()).into_owned(),
            attribute: name.to_string(),
            reason: format!("'{raw}' is not a number"),
        })
}

fn required_attr(e: &BytesStart<'_>) -> Result<bool, SchemaLoadError> {
    let raw = require_attr(e, "required")?;
    match raw.as_str() {
        "Y" | "y" => Ok(true),
        "N" | "n" => Ok(false),
        other => Err(SchemaLoadError::MalformedAttribute {
            element: String::from_utf8_lossy(e.name().as_ref()).into_owned(),
            attribute: "required".to_string(),
            reason: format!("'{other}' is not Y or N"),
        }),
    }
}

impl Parser {
    fn new() -> Self {
        Self {
            doc: RawDocument::default(),
            section: Section::Prolog,
            current_field: None,
            current_message: None,
            current_component: None,
            group_stack: Vec::new(),
            open_component_refs: 0,
            open_field_refs: 0,
        }
    }

    fn push_part(&mut self, part: RawPart) -> Result<(), SchemaLoadError> {
        if let Some(frame) = self.group_stack.last_mut() {
            frame.parts.push(part);
            return Ok(());
        }
        match self.section {
            Section::Header => self.doc.header.push(part),
            Section::Trailer => self.doc.trailer.push(part),
            Section::Messages => {
                self.current_message
                    .as_mut()
                    .ok_or_else(|| xml_err("field list outside of <message>"))?
                    .parts
                    .push(part);
            }
            Section::Components => {
                self.current_component
                    .as_mut()
                    .ok_or_else(|| xml_err("field list outside of <component>"))?
                    .1
                    .push(part);
            }
            _ => return Err(xml_err("misplaced schema element")),
        }
        Ok(())
    }

    fn handle_start(&mut self, e: &BytesStart<'_>, is_empty: bool) -> Result<(), SchemaLoadError> {
        match e.name().as_ref() {
            b"fix" => {
                let service_pack = match attr(e, "servicepack")? {
                    Some(raw) => {
                        raw.parse()
                            .map_err(|_| SchemaLoadError::MalformedAttribute {
                                element: "fix".to_string(),
                                attribute: "servicepack".to_string(),
                                reason: format!("'{raw}' is not a number"),
                            })?
                    }
                    None => 0,
                };
                let fix_type = attr(e, "type")?.unwrap_or_else(|| "FIX".to_string());
                self.doc.version = Some(DictVersion::new(
                    numeric_attr(e, "major")?,
                    numeric_attr(e, "minor")?,
                    service_pack,
                    fix_type,
                ));
            }
            b"header" => self.section = Section::Header,
            b"trailer" => self.section = Section::Trailer,
            b"messages" => self.section = Section::Messages,
            b"components" => self.section = Section::Components,
            b"fields" => self.section = Section::Fields,
            b"field" => {
                if self.section == Section::Fields {
                    let def = RawFieldDef {
                        fid: numeric_attr(e, "number")?,
                        name: require_attr(e, "name")?,
                        type_name: require_attr(e, "type")?,
                        values: Vec::new(),
                    };
                    if is_empty {
                        self.doc.fields.push(def);
                    } else {
                        self.current_field = Some(def);
                    }
                } else {
                    self.push_part(RawPart::Field {
                        name: require_attr(e, "name")?,
                        required: required_attr(e)?,
                    })?;
                    if !is_empty {
                        self.open_field_refs += 1;
                    }
                }
            }
            b"value" => {
                if let Some(field) = self.current_field.as_mut() {
                    field.values.push((
                        require_attr(e, "enum")?,
                        attr(e, "description")?.unwrap_or_default(),
                    ));
                }
            }
            b"component" => {
                let name = require_attr(e, "name")?;
                let is_definition =
                    self.section == Section::Components && self.current_component.is_none();
                if is_definition {
                    if is_empty {
                        self.doc.components.push((name, Vec::new()));
                    } else {
                        self.current_component = Some((name, Vec::new()));
                    }
                } else {
                    self.push_part(RawPart::Component {
                        name,
                        required: required_attr(e)?,
                    })?;
                    if !is_empty {
                        self.open_component_refs += 1;
                    }
                }
            }
            b"message" => {
                let def = RawMessageDef {
                    name: require_attr(e, "name")?,
                    msg_type: require_attr(e, "msgtype")?,
                    category: require_attr(e, "msgcat")?,
                    parts: Vec::new(),
                };
                if is_empty {
                    self.doc.messages.push(def);
                } else {
                    self.current_message = Some(def);
                }
            }
            b"group" => {
                let name = require_attr(e, "name")?;
                let required = required_attr(e)?;
                if is_empty {
                    self.push_part(RawPart::Group {
                        name,
                        required,
                        parts: Vec::new(),
                    })?;
                } else {
                    self.group_stack.push(GroupFrame {
                        name,
                        required,
                        parts: Vec::new(),
                    });
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn handle_end(&mut self, name: &[u8]) -> Result<(), SchemaLoadError> {
        match name {
            b"header" | b"trailer" | b"messages" | b"components" | b"fields" => {
                self.section = Section::Prolog;
            }
            b"field" => {
                if self.open_field_refs > 0 {
                    self.open_field_refs -= 1;
                } else if let Some(field) = self.current_field.take() {
                    self.doc.fields.push(field);
                }
            }
            b"component" => {
                if self.open_component_refs > 0 {
                    self.open_component_refs -= 1;
                } else if let Some(component) = self.current_component.take() {
                    self.doc.components.push(component);
                }
            }
            b"message" => {
                if let Some(message) = self.current_message.take() {
                    self.doc.messages.push(message);
                }
            }
            b"group" => {
                let frame = self
                    .group_stack
                    .pop()
                    .ok_or_else(|| xml_err("unbalanced </group>"))?;
                self.push_part(RawPart::Group {
                    name: frame.name,
                    required: frame.required,
                    parts: frame.parts,
                })?;
            }
            _ => {}
        }
        Ok(())
    }
}

fn parse_document(xml: &str) -> Result<RawDocument, SchemaLoadError> {
    let mut reader = Reader::from_str(xml);
    let mut parser = Parser::new();

    loop {
        match reader.read_event().map_err(xml_err)? {
            Event::Start(e) => parser.handle_start(&e, false)?,
            Event::Empty(e) => parser.handle_start(&e, true)?,
            Event::End(e) => parser.handle_end(e.name().as_ref())?,
            Event::Eof => break,
            _ => {}
        }
    }

    if parser.doc.version.is_none() {
        return Err(xml_err("missing <fix> root element"));
    }
    Ok(parser.doc)
}

/// Resolves a raw part list into a schema node.
///
/// Every referenced field and component must already be registered in the
/// dictionary; group nodes created along the way are inserted into the
/// arena as they complete.
fn build_node(
    dict: &mut Dictionary,
    mut node: SchemaNode,
    parts: &[RawPart],
) -> Result<SchemaNode, SchemaLoadError> {
    for part in parts {
        match part {
            RawPart::Field { name, required } => {
                let fid = dict
                    .field_by_name(name)
                    .ok_or_else(|| SchemaLoadError::UndefinedReference { name: name.clone() })?
                    .fid;
                node.add_field(fid, *required);
            }
            RawPart::Component { name, required } => {
                let id = dict
                    .component_id(name)
                    .ok_or_else(|| SchemaLoadError::UndefinedReference { name: name.clone() })?;
                dict.attach_child(&mut node, id, *required);
            }
            RawPart::Group {
                name,
                required,
                parts,
            } => {
                let count_field = dict
                    .field_by_name(name)
                    .ok_or_else(|| SchemaLoadError::UndefinedReference { name: name.clone() })?;
                if count_field.kind.band() != TypeBand::Integer {
                    warn!(
                        group = %name,
                        kind = ?count_field.kind,
                        "group count field is not integer-typed"
                    );
                }
                let count_fid = count_field.fid;
                let group = build_node(dict, SchemaNode::group(name.clone(), count_fid), parts)?;
                let id = dict.insert_group(group);
                dict.attach_child(&mut node, id, *required);
            }
        }
    }
    Ok(node)
}

fn assemble(doc: RawDocument) -> Result<Dictionary, SchemaLoadError> {
    let version = doc
        .version
        .ok_or_else(|| xml_err("missing <fix> root element"))?;
    let mut dict = Dictionary::new(version);

    // Fields first, so every later reference resolves by name.
    for raw in &doc.fields {
        let kind = FieldKind::from_name(&raw.type_name).ok_or_else(|| {
            SchemaLoadError::MalformedAttribute {
                element: "field".to_string(),
                attribute: "type".to_string(),
                reason: format!("unknown type name '{}'", raw.type_name),
            }
        })?;
        let mut def = FieldDef::new(raw.fid, raw.name.clone(), kind);
        if !raw.values.is_empty() {
            let mut domain = EnumDomain::for_band(kind.band());
            for (value, description) in &raw.values {
                domain.insert(value, description.clone())?;
            }
            def = def.with_domain(domain);
        }
        dict.add_field(def)?;
    }

    // Components in document order; forward references fail hard.
    for (name, parts) in &doc.components {
        let node = build_node(&mut dict, SchemaNode::component(name.clone()), parts)?;
        dict.insert_component(node);
    }

    let header = build_node(&mut dict, SchemaNode::component("Header"), &doc.header)?;
    dict.set_header(header);
    let trailer = build_node(&mut dict, SchemaNode::component("Trailer"), &doc.trailer)?;
    dict.set_trailer(trailer);

    for raw in &doc.messages {
        let category = match raw.category.to_lowercase().as_str() {
            "admin" => MessageCategory::Admin,
            "app" => MessageCategory::App,
            other => {
                return Err(SchemaLoadError::MalformedAttribute {
                    element: "message".to_string(),
                    attribute: "msgcat".to_string(),
                    reason: format!("'{other}' is not admin or app"),
                });
            }
        };
        let node = build_node(
            &mut dict,
            SchemaNode::message(raw.name.clone(), raw.msg_type.clone(), category),
            &raw.parts,
        )?;
        dict.insert_message(node);
    }

    debug!(
        version = %dict.version(),
        fields = dict.field_count(),
        messages = dict.message_count(),
        "dictionary loaded"
    );
    Ok(dict)
}
