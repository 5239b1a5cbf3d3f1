/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! # FixFrame Core
//!
//! Core types, traits, and error definitions for the FixFrame FIX codec.
//!
//! This crate provides the fundamental building blocks used across all FixFrame crates:
//! - **Error types**: Unified error handling with `thiserror`
//! - **Field types**: The zero-copy `FieldRef`
//!
//! ## Zero-Copy Design
//!
//! Field values stay as byte slices referencing the wire buffer; typed
//! representations (integer, decimal, boolean, timestamp) are derived on
//! demand and never cached.

pub mod error;
pub mod field;

pub use error::{DecodeError, FixError, FrameError, Result, SchemaLoadError, ValidationError};
pub use field::FieldRef;
