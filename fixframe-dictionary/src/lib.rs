/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! # FixFrame Dictionary
//!
//! FIX specification parsing and dictionary management for the FixFrame codec.
//!
//! This crate provides:
//! - **Schema definitions**: Field, message, component, and group definitions
//!   unified into arena-indexed schema nodes
//! - **Dictionary parsing**: QuickFIX XML format loader with single-pass,
//!   fail-closed resolution
//! - **Enum domains**: Per-band native storage for enumerated value checks

pub mod loader;
pub mod schema;

pub use schema::{
    DictVersion, Dictionary, Entry, EnumDomain, FieldDef, FieldKind, MessageCategory, NodeId,
    NodeKind, SchemaNode, TypeBand,
};
