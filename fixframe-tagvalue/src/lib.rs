/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! # FixFrame Tag-Value
//!
//! Zero-copy FIX message framing and tag=value tokenization for the
//! FixFrame codec.
//!
//! ## Features
//!
//! - **Framing**: Detects complete messages in an accumulating byte stream
//! - **Zero-copy tokenization**: Token values reference the original buffer
//! - **SIMD-accelerated**: Uses `memchr` for fast delimiter search
//! - **Checksum helpers**: Calculation, formatting, and verification

pub mod checksum;
pub mod decoder;
pub mod framer;

pub use checksum::{calculate_checksum, verify_checksum};
pub use decoder::{MAX_TOKENS_PER_MESSAGE, TokenCursor};
pub use framer::{FrameResult, Framer, SOH};
