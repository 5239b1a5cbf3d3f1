/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Bound field values produced by the assembler.
//!
//! Bindings are per-message scratch state: raw byte slices into the wire
//! buffer, keyed by fid, created for one message and discarded after it is
//! processed. A repeating group binds one value per repetition under the
//! same fid, in wire order.

use fixframe_core::field::FieldRef;
use smallvec::SmallVec;
use std::collections::HashMap;

/// Field values bound during one assembly walk, addressable by fid.
#[derive(Debug, Default)]
pub struct Bindings<'a> {
    values: HashMap<u32, SmallVec<[&'a [u8]; 1]>>,
}

impl<'a> Bindings<'a> {
    /// Creates an empty binding set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a bound value for a fid.
    pub fn bind(&mut self, fid: u32, value: &'a [u8]) {
        self.values.entry(fid).or_default().push(value);
    }

    /// Returns the first bound value for a fid.
    #[must_use]
    pub fn get(&self, fid: u32) -> Option<&'a [u8]> {
        self.values.get(&fid).and_then(|v| v.first().copied())
    }

    /// Returns the first bound value as a typed field reference.
    #[must_use]
    pub fn get_field(&self, fid: u32) -> Option<FieldRef<'a>> {
        self.get(fid).map(|value| FieldRef::new(fid, value))
    }

    /// Returns every bound value for a fid, in wire order.
    #[must_use]
    pub fn get_all(&self, fid: u32) -> &[&'a [u8]] {
        self.values.get(&fid).map_or(&[], |v| v.as_slice())
    }

    /// Number of values bound for a fid.
    #[must_use]
    pub fn count(&self, fid: u32) -> usize {
        self.values.get(&fid).map_or(0, SmallVec::len)
    }

    /// Number of distinct fids with at least one bound value.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if nothing has been bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Absorbs another binding set, appending its values after ours.
    pub fn merge(&mut self, other: Bindings<'a>) {
        for (fid, values) in other.values {
            self.values.entry(fid).or_default().extend(values);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_and_get() {
        let mut b = Bindings::new();
        b.bind(55, b"IBM");
        assert_eq!(b.get(55), Some(b"IBM".as_ref()));
        assert_eq!(b.get(56), None);
        assert_eq!(b.len(), 1);
    }

    #[test]
    fn test_repeated_bindings_preserve_order() {
        let mut b = Bindings::new();
        b.bind(707, b"CASH");
        b.bind(707, b"CRES");
        assert_eq!(b.count(707), 2);
        assert_eq!(b.get(707), Some(b"CASH".as_ref()));
        assert_eq!(b.get_all(707), &[b"CASH".as_ref(), b"CRES".as_ref()]);
    }

    #[test]
    fn test_get_field_parses() {
        let mut b = Bindings::new();
        b.bind(34, b"42");
        let field = b.get_field(34).unwrap();
        assert_eq!(field.as_u64().unwrap(), 42);
    }

    #[test]
    fn test_merge_appends() {
        let mut a = Bindings::new();
        a.bind(707, b"CASH");
        let mut b = Bindings::new();
        b.bind(707, b"CRES");
        b.bind(55, b"IBM");
        a.merge(b);
        assert_eq!(a.get_all(707), &[b"CASH".as_ref(), b"CRES".as_ref()]);
        assert_eq!(a.get(55), Some(b"IBM".as_ref()));
    }
}
