/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Schema definitions for FIX dictionaries.
//!
//! This module defines the structures that represent FIX protocol specifications:
//! - [`FieldDef`]: Field definitions with fid, name, type and enum domain
//! - [`SchemaNode`]: One structure unifying components, repeating groups, and messages
//! - [`Dictionary`]: Complete FIX version dictionary owning all fields and nodes
//!
//! The dictionary owns every field and schema node in index-stable arenas;
//! nodes reference each other by [`NodeId`], never by owning handle, so the
//! whole structure is acyclic and freely shareable once built.

use fixframe_core::error::SchemaLoadError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Dictionary version metadata, recorded for identification only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DictVersion {
    /// Major protocol version.
    pub major: u32,
    /// Minor protocol version.
    pub minor: u32,
    /// Service pack number.
    pub service_pack: u32,
    /// Dictionary type (e.g., "FIX" or "FIXT").
    pub fix_type: String,
}

impl DictVersion {
    /// Creates new version metadata.
    #[must_use]
    pub fn new(major: u32, minor: u32, service_pack: u32, fix_type: impl Into<String>) -> Self {
        Self {
            major,
            minor,
            service_pack,
            fix_type: fix_type.into(),
        }
    }

    /// Returns the BeginString value for this version (e.g., "FIX.4.4").
    #[must_use]
    pub fn begin_string(&self) -> String {
        format!("{}.{}.{}", self.fix_type, self.major, self.minor)
    }
}

impl fmt::Display for DictVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.begin_string())
    }
}

/// Coarse semantic band of a field type.
///
/// Bands drive enum-domain storage selection and validation representation
/// with a single range test instead of exhaustive type matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeBand {
    /// Whole-number types.
    Integer,
    /// Decimal-valued types.
    Float,
    /// Single-character types.
    Char,
    /// Text types.
    Str,
    /// Raw data and reserved types.
    Misc,
    /// Placeholder for synthetic component wrapper fields.
    Component,
}

/// FIX field data type.
///
/// Discriminants are grouped into numeric bands: 0-99 integer-like,
/// 100-199 float-like, 200-299 char-like, 300-399 string-like,
/// 400-499 misc/reserved, 500 component placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u16)]
pub enum FieldKind {
    /// Integer value.
    Int = 0,
    /// Length field (for data fields).
    Length = 1,
    /// Sequence number.
    SeqNum = 2,
    /// Number of entries in a repeating group.
    NumInGroup = 3,
    /// Tag number reference.
    TagNum = 4,
    /// Day of month (1-31).
    DayOfMonth = 5,
    /// Floating point number.
    Float = 100,
    /// Quantity.
    Qty = 101,
    /// Price.
    Price = 102,
    /// Price offset.
    PriceOffset = 103,
    /// Amount (price * quantity).
    Amt = 104,
    /// Percentage.
    Percentage = 105,
    /// Single character.
    Char = 200,
    /// Boolean (Y/N).
    Boolean = 201,
    /// String.
    String = 300,
    /// Multiple character value (space-separated).
    MultipleCharValue = 301,
    /// Multiple string value (space-separated).
    MultipleStringValue = 302,
    /// Country code (ISO 3166).
    Country = 303,
    /// Currency code (ISO 4217).
    Currency = 304,
    /// Exchange code (ISO 10383 MIC).
    Exchange = 305,
    /// Month-year (YYYYMM or YYYYMMDD or YYYYMMWW).
    MonthYear = 306,
    /// UTC timestamp.
    UtcTimestamp = 307,
    /// UTC time only.
    UtcTimeOnly = 308,
    /// UTC date only.
    UtcDateOnly = 309,
    /// Local market date.
    LocalMktDate = 310,
    /// Local market time.
    LocalMktTime = 311,
    /// Timezone time only.
    TzTimeOnly = 312,
    /// Timezone with timestamp.
    TzTimestamp = 313,
    /// Language code (ISO 639-1).
    Language = 314,
    /// Pattern (regex).
    Pattern = 315,
    /// Tenor (e.g., "1M", "3M").
    Tenor = 316,
    /// XML data.
    XmlData = 317,
    /// Raw data (binary).
    Data = 400,
    /// Reserved for future use.
    Reserved = 401,
    /// Synthetic wrapper for a component child entry.
    Component = 500,
}

impl FieldKind {
    /// Resolves a dictionary type name, case-insensitively.
    ///
    /// # Arguments
    /// * `name` - The type name from the FIX dictionary
    ///
    /// # Returns
    /// The matching kind, or `None` if the name is unknown.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name.to_uppercase().as_str() {
            "INT" => Self::Int,
            "LENGTH" => Self::Length,
            "SEQNUM" => Self::SeqNum,
            "NUMINGROUP" => Self::NumInGroup,
            "TAGNUM" => Self::TagNum,
            "DAYOFMONTH" => Self::DayOfMonth,
            "FLOAT" => Self::Float,
            "QTY" | "QUANTITY" => Self::Qty,
            "PRICE" => Self::Price,
            "PRICEOFFSET" => Self::PriceOffset,
            "AMT" | "AMOUNT" => Self::Amt,
            "PERCENTAGE" => Self::Percentage,
            "CHAR" => Self::Char,
            "BOOLEAN" => Self::Boolean,
            "STRING" => Self::String,
            "MULTIPLECHARVALUE" => Self::MultipleCharValue,
            "MULTIPLESTRINGVALUE" => Self::MultipleStringValue,
            "COUNTRY" => Self::Country,
            "CURRENCY" => Self::Currency,
            "EXCHANGE" => Self::Exchange,
            "MONTHYEAR" => Self::MonthYear,
            "UTCTIMESTAMP" => Self::UtcTimestamp,
            "UTCTIMEONLY" => Self::UtcTimeOnly,
            "UTCDATEONLY" => Self::UtcDateOnly,
            "LOCALMKTDATE" => Self::LocalMktDate,
            "LOCALMKTTIME" => Self::LocalMktTime,
            "TZTIMEONLY" => Self::TzTimeOnly,
            "TZTIMESTAMP" => Self::TzTimestamp,
            "LANGUAGE" => Self::Language,
            "PATTERN" => Self::Pattern,
            "TENOR" => Self::Tenor,
            "XMLDATA" => Self::XmlData,
            "DATA" => Self::Data,
            "RESERVED" => Self::Reserved,
            _ => return None,
        })
    }

    /// Returns the semantic band of this kind.
    ///
    /// The banding is a range test over the discriminant, not a match.
    #[must_use]
    pub const fn band(self) -> TypeBand {
        match (self as u16) / 100 {
            0 => TypeBand::Integer,
            1 => TypeBand::Float,
            2 => TypeBand::Char,
            3 => TypeBand::Str,
            4 => TypeBand::Misc,
            _ => TypeBand::Component,
        }
    }
}

/// Enumerated value domain for a field.
///
/// Storage is selected by the owning field's [`TypeBand`] so that
/// membership checks compare in the band's native representation rather
/// than through one generic string map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EnumDomain {
    /// Domain keyed by string values.
    Str(HashMap<String, String>),
    /// Domain keyed by integer values.
    Int(HashMap<i64, String>),
    /// Domain keyed by decimal values.
    Float(HashMap<Decimal, String>),
    /// Domain keyed by single-character values.
    Char(HashMap<char, String>),
}

impl EnumDomain {
    /// Creates an empty domain with storage matching the given band.
    ///
    /// Misc-band fields fall back to string storage.
    #[must_use]
    pub fn for_band(band: TypeBand) -> Self {
        match band {
            TypeBand::Integer => Self::Int(HashMap::new()),
            TypeBand::Float => Self::Float(HashMap::new()),
            TypeBand::Char => Self::Char(HashMap::new()),
            _ => Self::Str(HashMap::new()),
        }
    }

    /// Inserts one enumerated value with its description.
    ///
    /// # Errors
    /// Returns `SchemaLoadError::MalformedAttribute` if the value cannot be
    /// represented in this domain's native storage.
    pub fn insert(&mut self, value: &str, description: String) -> Result<(), SchemaLoadError> {
        let malformed = |reason: String| SchemaLoadError::MalformedAttribute {
            element: "value".to_string(),
            attribute: "enum".to_string(),
            reason,
        };
        match self {
            Self::Str(map) => {
                map.insert(value.to_string(), description);
            }
            Self::Int(map) => {
                let key = value
                    .parse::<i64>()
                    .map_err(|_| malformed(format!("'{value}' is not an integer")))?;
                map.insert(key, description);
            }
            Self::Float(map) => {
                let key = value
                    .parse::<Decimal>()
                    .map_err(|_| malformed(format!("'{value}' is not a decimal")))?;
                map.insert(key, description);
            }
            Self::Char(map) => {
                let mut chars = value.chars();
                let key = chars
                    .next()
                    .filter(|_| chars.next().is_none())
                    .ok_or_else(|| malformed(format!("'{value}' is not a single character")))?;
                map.insert(key, description);
            }
        }
        Ok(())
    }

    /// Tests whether a raw wire value belongs to this domain.
    ///
    /// The value is parsed into the domain's native representation first;
    /// a value that does not parse is not a member.
    #[must_use]
    pub fn contains(&self, raw: &[u8]) -> bool {
        let Ok(s) = std::str::from_utf8(raw) else {
            return false;
        };
        match self {
            Self::Str(map) => map.contains_key(s),
            Self::Int(map) => s.parse::<i64>().is_ok_and(|v| map.contains_key(&v)),
            Self::Float(map) => s.parse::<Decimal>().is_ok_and(|v| map.contains_key(&v)),
            Self::Char(map) => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => map.contains_key(&c),
                    _ => false,
                }
            }
        }
    }

    /// Returns the number of enumerated values.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Str(map) => map.len(),
            Self::Int(map) => map.len(),
            Self::Float(map) => map.len(),
            Self::Char(map) => map.len(),
        }
    }

    /// Returns true if the domain is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Definition of a FIX field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldDef {
    /// Field number, unique within a dictionary.
    pub fid: u32,
    /// Field name, unique within a dictionary.
    pub name: String,
    /// Field data type.
    pub kind: FieldKind,
    /// Enumerated value domain, if the field carries one.
    pub domain: Option<EnumDomain>,
    /// Field description.
    pub description: Option<String>,
}

impl FieldDef {
    /// Creates a new field definition.
    ///
    /// # Arguments
    /// * `fid` - The field number
    /// * `name` - The field name
    /// * `kind` - The field data type
    #[must_use]
    pub fn new(fid: u32, name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            fid,
            name: name.into(),
            kind,
            domain: None,
            description: None,
        }
    }

    /// Attaches an enumerated value domain.
    #[must_use]
    pub fn with_domain(mut self, domain: EnumDomain) -> Self {
        self.domain = Some(domain);
        self
    }

    /// Adds a description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Returns true if this field carries an enumerated domain.
    #[must_use]
    pub fn is_enumerated(&self) -> bool {
        self.domain.as_ref().is_some_and(|d| !d.is_empty())
    }
}

/// Index of a schema node within the dictionary arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(usize);

/// Kind of a schema node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    /// Named, reusable ordered field set.
    Component,
    /// Repeating group with a count field.
    Group,
    /// Top-level message.
    Message,
}

/// Message category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageCategory {
    /// Administrative message (session level).
    Admin,
    /// Application message.
    App,
}

/// One entry in a schema node's ordered field list.
///
/// Entries are a uniform `(fid, required)` sequence regardless of whether
/// they stand for a scalar field, a repeating group (the group's count fid)
/// or a plain component (synthetic fid 0).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// The field number sequenced at this position; 0 for a plain component.
    pub fid: u32,
    /// Whether the entry is required.
    pub required: bool,
    /// Nested schema node, for group and component entries.
    pub node: Option<NodeId>,
}

impl Entry {
    /// Returns true if this entry nests another schema node.
    #[must_use]
    pub const fn is_nested(&self) -> bool {
        self.node.is_some()
    }

    /// Returns true if this entry is a synthetic component wrapper.
    #[must_use]
    pub const fn is_component_wrapper(&self) -> bool {
        self.fid == 0
    }
}

/// A schema node: component, repeating group, or message.
///
/// The ordered entry list defines the wire sequencing contract; the
/// tag index maps every reachable fid to its entry position, with plain
/// component members flattened in so membership tests are one lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaNode {
    /// What this node is.
    pub kind: NodeKind,
    /// Node name (component name, group count-field name, or message name).
    pub name: String,
    /// Message type code (tag 35 value), for message nodes.
    pub msg_type: Option<String>,
    /// Message category, for message nodes.
    pub category: Option<MessageCategory>,
    /// The fid whose value carries the repeat count, for group nodes.
    pub count_fid: Option<u32>,
    entries: Vec<Entry>,
    tag_index: HashMap<u32, usize>,
}

impl SchemaNode {
    /// Creates an empty component node.
    #[must_use]
    pub fn component(name: impl Into<String>) -> Self {
        Self {
            kind: NodeKind::Component,
            name: name.into(),
            msg_type: None,
            category: None,
            count_fid: None,
            entries: Vec::new(),
            tag_index: HashMap::new(),
        }
    }

    /// Creates an empty group node with its count field.
    #[must_use]
    pub fn group(name: impl Into<String>, count_fid: u32) -> Self {
        Self {
            kind: NodeKind::Group,
            name: name.into(),
            msg_type: None,
            category: None,
            count_fid: Some(count_fid),
            entries: Vec::new(),
            tag_index: HashMap::new(),
        }
    }

    /// Creates an empty message node.
    #[must_use]
    pub fn message(
        name: impl Into<String>,
        msg_type: impl Into<String>,
        category: MessageCategory,
    ) -> Self {
        Self {
            kind: NodeKind::Message,
            name: name.into(),
            msg_type: Some(msg_type.into()),
            category: Some(category),
            count_fid: None,
            entries: Vec::new(),
            tag_index: HashMap::new(),
        }
    }

    /// Appends a scalar field entry.
    pub fn add_field(&mut self, fid: u32, required: bool) {
        let idx = self.entries.len();
        self.entries.push(Entry {
            fid,
            required,
            node: None,
        });
        self.tag_index.entry(fid).or_insert(idx);
    }

    /// Returns the ordered entry list.
    #[must_use]
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Looks up the entry sequenced for a fid, including flattened
    /// component members.
    #[must_use]
    pub fn entry_of(&self, fid: u32) -> Option<&Entry> {
        self.tag_index.get(&fid).map(|&idx| &self.entries[idx])
    }

    /// Returns true if a fid belongs to this node's sub-schema.
    #[must_use]
    pub fn contains(&self, fid: u32) -> bool {
        self.tag_index.contains_key(&fid)
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the node has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn tag_index(&self) -> &HashMap<u32, usize> {
        &self.tag_index
    }

    pub(crate) fn push_entry(&mut self, entry: Entry, member_fids: &[u32]) {
        let idx = self.entries.len();
        self.entries.push(entry);
        if entry.fid != 0 {
            self.tag_index.entry(entry.fid).or_insert(idx);
        }
        for &fid in member_fids {
            self.tag_index.entry(fid).or_insert(idx);
        }
    }
}

/// Complete FIX dictionary for a specific version.
///
/// Built once at startup, then treated as an immutable, freely shareable
/// snapshot: decode and validate operations only ever read it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dictionary {
    version: DictVersion,
    fields: Vec<FieldDef>,
    by_fid: HashMap<u32, usize>,
    by_name: HashMap<String, usize>,
    nodes: Vec<SchemaNode>,
    components: HashMap<String, NodeId>,
    groups: HashMap<u32, NodeId>,
    messages: HashMap<String, NodeId>,
    header: NodeId,
    trailer: NodeId,
}

impl Dictionary {
    /// Creates a new empty dictionary for the specified version.
    ///
    /// # Arguments
    /// * `version` - The dictionary version metadata
    #[must_use]
    pub fn new(version: DictVersion) -> Self {
        let nodes = vec![
            SchemaNode::component("Header"),
            SchemaNode::component("Trailer"),
        ];
        Self {
            version,
            fields: Vec::new(),
            by_fid: HashMap::new(),
            by_name: HashMap::new(),
            nodes,
            components: HashMap::new(),
            groups: HashMap::new(),
            messages: HashMap::new(),
            header: NodeId(0),
            trailer: NodeId(1),
        }
    }

    /// Returns the dictionary version metadata.
    #[must_use]
    pub fn version(&self) -> &DictVersion {
        &self.version
    }

    /// Adds a field definition.
    ///
    /// # Errors
    /// Returns `SchemaLoadError::DuplicateFid` or `DuplicateName` if either
    /// key is already registered.
    pub fn add_field(&mut self, field: FieldDef) -> Result<(), SchemaLoadError> {
        if self.by_fid.contains_key(&field.fid) {
            return Err(SchemaLoadError::DuplicateFid { fid: field.fid });
        }
        if self.by_name.contains_key(&field.name) {
            return Err(SchemaLoadError::DuplicateName {
                name: field.name.clone(),
            });
        }
        let idx = self.fields.len();
        self.by_fid.insert(field.fid, idx);
        self.by_name.insert(field.name.clone(), idx);
        self.fields.push(field);
        Ok(())
    }

    /// Gets a field definition by fid.
    #[must_use]
    pub fn field_by_fid(&self, fid: u32) -> Option<&FieldDef> {
        self.by_fid.get(&fid).map(|&idx| &self.fields[idx])
    }

    /// Gets a field definition by name.
    #[must_use]
    pub fn field_by_name(&self, name: &str) -> Option<&FieldDef> {
        self.by_name.get(name).map(|&idx| &self.fields[idx])
    }

    /// Resolves a node id to its schema node.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &SchemaNode {
        &self.nodes[id.0]
    }

    /// Gets a component node by name.
    #[must_use]
    pub fn component_by_name(&self, name: &str) -> Option<&SchemaNode> {
        self.components.get(name).map(|&id| self.node(id))
    }

    /// Gets a group node by its count-field fid.
    #[must_use]
    pub fn group_by_count_fid(&self, fid: u32) -> Option<&SchemaNode> {
        self.groups.get(&fid).map(|&id| self.node(id))
    }

    /// Gets a message node by its message type code.
    #[must_use]
    pub fn message_by_type(&self, msg_type: &str) -> Option<&SchemaNode> {
        self.messages.get(msg_type).map(|&id| self.node(id))
    }

    /// Returns the shared header node.
    #[must_use]
    pub fn header(&self) -> &SchemaNode {
        self.node(self.header)
    }

    /// Returns the shared trailer node.
    #[must_use]
    pub fn trailer(&self) -> &SchemaNode {
        self.node(self.trailer)
    }

    /// Returns an iterator over all field definitions.
    pub fn fields(&self) -> impl Iterator<Item = &FieldDef> {
        self.fields.iter()
    }

    /// Returns an iterator over all message nodes.
    pub fn messages(&self) -> impl Iterator<Item = &SchemaNode> {
        self.messages.values().map(|&id| self.node(id))
    }

    /// Returns an iterator over all component nodes.
    pub fn components(&self) -> impl Iterator<Item = &SchemaNode> {
        self.components.values().map(|&id| self.node(id))
    }

    /// Number of registered fields.
    #[must_use]
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Number of registered messages.
    #[must_use]
    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    pub(crate) fn component_id(&self, name: &str) -> Option<NodeId> {
        self.components.get(name).copied()
    }

    pub(crate) fn insert_component(&mut self, node: SchemaNode) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.components.insert(node.name.clone(), id);
        self.nodes.push(node);
        id
    }

    pub(crate) fn insert_group(&mut self, node: SchemaNode) -> NodeId {
        let id = NodeId(self.nodes.len());
        if let Some(count_fid) = node.count_fid {
            self.groups.entry(count_fid).or_insert(id);
        }
        self.nodes.push(node);
        id
    }

    pub(crate) fn insert_message(&mut self, node: SchemaNode) -> NodeId {
        let id = NodeId(self.nodes.len());
        if let Some(msg_type) = node.msg_type.clone() {
            self.messages.entry(msg_type).or_insert(id);
        }
        self.nodes.push(node);
        id
    }

    pub(crate) fn set_header(&mut self, node: SchemaNode) {
        self.nodes[self.header.0] = node;
    }

    pub(crate) fn set_trailer(&mut self, node: SchemaNode) {
        self.nodes[self.trailer.0] = node;
    }

    /// Appends a nested node to a parent's entry list.
    ///
    /// A group child is sequenced under its count fid; a plain component
    /// gets a synthetic zero-fid wrapper entry and its member fids are
    /// flattened into the parent's tag index. This keeps every entry list
    /// a uniform `(fid, required)` sequence.
    pub(crate) fn attach_child(&self, parent: &mut SchemaNode, child_id: NodeId, required: bool) {
        let child = self.node(child_id);
        match child.count_fid {
            Some(count_fid) => {
                parent.push_entry(
                    Entry {
                        fid: count_fid,
                        required,
                        node: Some(child_id),
                    },
                    &[],
                );
            }
            None => {
                let member_fids: Vec<u32> = child.tag_index().keys().copied().collect();
                parent.push_entry(
                    Entry {
                        fid: 0,
                        required,
                        node: Some(child_id),
                    },
                    &member_fids,
                );
            }
        }
    }
}
