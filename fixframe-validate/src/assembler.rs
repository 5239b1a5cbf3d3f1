/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Schema-driven message assembly and validation.
//!
//! The assembler walks a token cursor against a schema node, binding field
//! values and enforcing sequencing, repeat-count, and enumeration rules.
//! One sequencing algorithm serves scalar fields, components, and groups,
//! because schema nodes present every entry as a uniform `(fid, required)`
//! pair; repeating groups recurse through a dedicated repetition scan.
//!
//! Bindings are committed all-or-nothing per schema node: values go into a
//! scratch set during the walk and are published only if the whole node
//! validates. A failed node leaves the caller's bindings and the cursor
//! exactly as they were.

use crate::bindings::Bindings;
use arrayvec::ArrayVec;
use fixframe_core::error::ValidationError;
use fixframe_dictionary::{Dictionary, SchemaNode};
use fixframe_tagvalue::TokenCursor;
use tracing::trace;

/// Hard cap on repetitions in one group, to bound adversarial input.
pub const MAX_GROUP_REPETITIONS: usize = 50;

/// Walks token cursors against dictionary schema nodes.
///
/// The assembler only reads the dictionary, so one instance may serve
/// unboundedly many concurrent messages; all per-message state lives in
/// the cursor and the scratch bindings.
#[derive(Debug, Clone, Copy)]
pub struct Assembler<'d> {
    dict: &'d Dictionary,
}

impl<'d> Assembler<'d> {
    /// Creates an assembler over a dictionary snapshot.
    #[must_use]
    pub const fn new(dict: &'d Dictionary) -> Self {
        Self { dict }
    }

    /// Validates one complete message against its schema.
    ///
    /// Walks the shared header, then the message node's own entries, then
    /// the shared trailer. Tokens left unconsumed afterwards fail as
    /// `UnknownField`.
    ///
    /// With `validate` off, every token is routed into the bindings by its
    /// tag and no sequencing, required-field, or enumeration checks run.
    ///
    /// # Errors
    /// Returns the first `ValidationError` encountered; no bindings are
    /// published on failure.
    pub fn validate_message<'a>(
        &self,
        msg_type: &str,
        cursor: &mut TokenCursor<'a>,
        validate: bool,
    ) -> Result<Bindings<'a>, ValidationError> {
        let node = self.dict.message_by_type(msg_type).ok_or_else(|| {
            // Message types are the enumerated domain of tag 35.
            ValidationError::UnknownEnumValue {
                fid: 35,
                value: msg_type.to_string(),
            }
        })?;

        cursor.reset();
        if !validate {
            return Ok(route_by_tag(cursor));
        }

        let mut out = Bindings::new();
        self.match_sequence(self.dict.header(), cursor, &mut out)?;
        self.match_sequence(node, cursor, &mut out)?;
        self.match_sequence(self.dict.trailer(), cursor, &mut out)?;

        if let Some(token) = cursor.current() {
            return Err(ValidationError::UnknownField { fid: token.tag });
        }
        Ok(out)
    }

    /// Validates a token stream against one schema node.
    ///
    /// The cursor is consumed from its current position; entries absent
    /// from the wire are only an error when the schema requires them.
    ///
    /// # Errors
    /// Returns the first `ValidationError` encountered; the cursor is
    /// restored to its entry position on failure.
    pub fn validate_node<'a>(
        &self,
        node: &SchemaNode,
        cursor: &mut TokenCursor<'a>,
        validate: bool,
    ) -> Result<Bindings<'a>, ValidationError> {
        if !validate {
            return Ok(route_by_tag(cursor));
        }
        let mut out = Bindings::new();
        self.match_sequence(node, cursor, &mut out)?;
        Ok(out)
    }

    /// Walks a node's entries in declared order, committing all-or-nothing.
    ///
    /// On success the node's bindings merge into `out`; on failure the
    /// cursor is restored to where it was and nothing is published.
    fn match_sequence<'a>(
        &self,
        node: &SchemaNode,
        cursor: &mut TokenCursor<'a>,
        out: &mut Bindings<'a>,
    ) -> Result<(), ValidationError> {
        let start = cursor.position();
        let mut scratch = Bindings::new();
        match self.walk_entries(node, cursor, &mut scratch) {
            Ok(()) => {
                out.merge(scratch);
                Ok(())
            }
            Err(err) => {
                cursor.set_position(start);
                Err(err)
            }
        }
    }

    fn walk_entries<'a>(
        &self,
        node: &SchemaNode,
        cursor: &mut TokenCursor<'a>,
        scratch: &mut Bindings<'a>,
    ) -> Result<(), ValidationError> {
        for entry in node.entries() {
            match entry.node {
                // Plain component: recurse with the same consume/advance
                // contract. An absent optional component restores the
                // cursor inside match_sequence and sequencing moves on.
                Some(child_id) if entry.is_component_wrapper() => {
                    let child = self.dict.node(child_id);
                    match self.match_sequence(child, cursor, scratch) {
                        Ok(()) => {}
                        Err(_) if !entry.required => {}
                        Err(err) => return Err(err),
                    }
                }
                // Repeating group, sequenced under its count fid.
                Some(child_id) => match cursor.current() {
                    Some(token) if token.tag == entry.fid => {
                        self.bind_checked(token.tag, token.value, scratch)?;
                        let count = parse_count(entry.fid, token.value)?;
                        cursor.advance();
                        self.match_group(self.dict.node(child_id), entry.fid, count, cursor, scratch)?;
                    }
                    Some(token) if entry.required => {
                        return Err(ValidationError::SequenceViolation {
                            expected: entry.fid,
                            found: token.tag,
                        });
                    }
                    None if entry.required => {
                        return Err(ValidationError::MissingRequiredField { fid: entry.fid });
                    }
                    _ => {}
                },
                // Scalar field.
                None => match cursor.current() {
                    Some(token) if token.tag == entry.fid => {
                        self.bind_checked(token.tag, token.value, scratch)?;
                        cursor.advance();
                    }
                    Some(token) if entry.required => {
                        return Err(ValidationError::SequenceViolation {
                            expected: entry.fid,
                            found: token.tag,
                        });
                    }
                    None if entry.required => {
                        return Err(ValidationError::MissingRequiredField { fid: entry.fid });
                    }
                    _ => {}
                },
            }
        }
        Ok(())
    }

    /// Consumes the repetitions of one group whose count field is already
    /// bound.
    ///
    /// The first group-member tag seen becomes the leading-field
    /// fingerprint; each reappearance completes one repetition. Every
    /// member tag is dispatched to its sub-field for binding, with nested
    /// group count fids recursing through both algorithms. A foreign tag
    /// ends the scan with the cursor left on it, as does a fingerprint
    /// reappearance beyond the declared count.
    fn match_group<'a>(
        &self,
        group: &SchemaNode,
        count_fid: u32,
        count: u32,
        cursor: &mut TokenCursor<'a>,
        out: &mut Bindings<'a>,
    ) -> Result<(), ValidationError> {
        if count == 0 {
            return Ok(());
        }
        if count as usize > MAX_GROUP_REPETITIONS {
            return Err(ValidationError::CapacityExceeded {
                what: "repetitions per group",
                limit: MAX_GROUP_REPETITIONS,
            });
        }

        let mut scratch = Bindings::new();
        let mut fingerprint: Option<u32> = None;
        // Cursor positions where each repetition began.
        let mut reps: ArrayVec<usize, MAX_GROUP_REPETITIONS> = ArrayVec::new();

        loop {
            let Some(token) = cursor.current() else {
                break;
            };
            if !group.contains(token.tag) {
                break;
            }
            match fingerprint {
                None => {
                    fingerprint = Some(token.tag);
                    reps.push(cursor.position());
                }
                Some(leading) if token.tag == leading => {
                    if reps.len() as u32 == count {
                        // One repetition too many; leave it for the parent.
                        break;
                    }
                    reps.push(cursor.position());
                }
                _ => {}
            }

            match group.entry_of(token.tag) {
                Some(entry) if entry.node.is_some() && entry.fid == token.tag => {
                    // Nested repeating group: this token is its count field.
                    self.bind_checked(token.tag, token.value, &mut scratch)?;
                    let nested_count = parse_count(token.tag, token.value)?;
                    cursor.advance();
                    if let Some(child_id) = entry.node {
                        self.match_group(
                            self.dict.node(child_id),
                            token.tag,
                            nested_count,
                            cursor,
                            &mut scratch,
                        )?;
                    }
                }
                _ => {
                    self.bind_checked(token.tag, token.value, &mut scratch)?;
                    cursor.advance();
                }
            }
        }

        let actual = reps.len() as u32;
        trace!(count_fid, expected = count, actual, "group scan complete");
        if actual == count {
            out.merge(scratch);
            Ok(())
        } else {
            Err(ValidationError::GroupCountMismatch {
                count_fid,
                expected: count,
                actual,
            })
        }
    }

    /// Binds one value, rejecting it if the field's enumerated domain
    /// does not contain it.
    fn bind_checked<'a>(
        &self,
        fid: u32,
        value: &'a [u8],
        out: &mut Bindings<'a>,
    ) -> Result<(), ValidationError> {
        if let Some(field) = self.dict.field_by_fid(fid)
            && let Some(domain) = &field.domain
            && !domain.contains(value)
        {
            return Err(ValidationError::UnknownEnumValue {
                fid,
                value: String::from_utf8_lossy(value).into_owned(),
            });
        }
        out.bind(fid, value);
        Ok(())
    }
}

/// Trusted-input path: every token routed by tag, no checks.
fn route_by_tag<'a>(cursor: &mut TokenCursor<'a>) -> Bindings<'a> {
    let mut out = Bindings::new();
    while let Some(token) = cursor.current() {
        out.bind(token.tag, token.value);
        cursor.advance();
    }
    out
}

/// Parses a repeat count from its wire value.
fn parse_count(count_fid: u32, value: &[u8]) -> Result<u32, ValidationError> {
    std::str::from_utf8(value)
        .ok()
        .and_then(|s| s.parse::<u32>().ok())
        .ok_or(ValidationError::GroupCountMismatch {
            count_fid,
            expected: 0,
            actual: 0,
        })
}
