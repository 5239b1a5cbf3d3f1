/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Schema-driven validation for FIX tag/value messages.
//!
//! Bridges the tag/value layer and the dictionary: a [`TokenCursor`] of
//! decoded fields is walked against a [`Dictionary`] schema node, enforcing
//! field sequencing, required-field presence, repeating-group counts, and
//! enumerated-value domains, and producing the message's field
//! [`Bindings`] on success.
//!
//! Validation commits all-or-nothing per schema node: a node that fails
//! leaves no partial bindings and restores the cursor, so an optional
//! component that does not match costs nothing.
//!
//! [`TokenCursor`]: fixframe_tagvalue::TokenCursor
//! [`Dictionary`]: fixframe_dictionary::Dictionary

pub mod assembler;
pub mod bindings;

pub use assembler::{Assembler, MAX_GROUP_REPETITIONS};
pub use bindings::Bindings;
