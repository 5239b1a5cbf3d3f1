/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! # FixFrame
//!
//! A schema-driven FIX message dictionary, framer, and validator for Rust.
//!
//! FixFrame loads a FIX data dictionary from its XML specification, frames
//! complete messages out of a byte stream, decodes them into zero-copy
//! tag/value tokens, and validates the token stream against the schema,
//! producing the message's field bindings.
//!
//! ## Features
//!
//! - **Zero-copy parsing**: Field values reference the original buffer
//! - **SIMD-accelerated**: Uses `memchr` for fast delimiter search
//! - **Schema-driven**: Sequencing, groups, and enums come from the loaded
//!   dictionary, not from generated code
//! - **All-or-nothing validation**: A failed message or component publishes
//!   no partial bindings
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use fixframe::prelude::*;
//!
//! let dict = Dictionary::load(&std::fs::read_to_string("FIX44.xml")?)?;
//! let framer = Framer::new();
//!
//! if let FrameResult::Complete(len) = framer.frame_next(&mut buf) {
//!     let mut cursor = TokenCursor::parse(&buf[..len])?;
//!     let msg_type = /* tag 35 from the cursor */;
//!     let bindings = Assembler::new(&dict).validate_message(msg_type, &mut cursor, true)?;
//! }
//! ```
//!
//! ## Crate Organization
//!
//! - [`core`]: Fundamental types and error definitions
//! - [`dictionary`]: FIX specification parsing and dictionary management
//! - [`tagvalue`]: Framing, checksums, and zero-copy tag=value decoding
//! - [`validate`]: Schema-driven message assembly and validation

pub mod core {
    //! Fundamental types and error definitions.
    pub use fixframe_core::*;
}

pub mod dictionary {
    //! FIX specification parsing and dictionary management.
    pub use fixframe_dictionary::*;
}

pub mod tagvalue {
    //! Framing, checksums, and zero-copy tag=value decoding.
    pub use fixframe_tagvalue::*;
}

pub mod validate {
    //! Schema-driven message assembly and validation.
    pub use fixframe_validate::*;
}

/// Prelude module for convenient imports.
pub mod prelude {
    // Core types
    pub use fixframe_core::{
        DecodeError, FieldRef, FixError, FrameError, Result, SchemaLoadError, ValidationError,
    };

    // Dictionary
    pub use fixframe_dictionary::{
        DictVersion, Dictionary, EnumDomain, Entry, FieldDef, FieldKind, MessageCategory, NodeId,
        SchemaNode, TypeBand,
    };

    // Tag-value framing and decoding
    pub use fixframe_tagvalue::{
        FrameResult, Framer, SOH, TokenCursor, calculate_checksum, verify_checksum,
    };

    // Validation
    pub use fixframe_validate::{Assembler, Bindings, MAX_GROUP_REPETITIONS};
}

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use bytes::BytesMut;

    const FIXTURE: &str = r#"
<fix major="4" minor="4">
  <header>
    <field name="BeginString" required="Y"/>
    <field name="BodyLength" required="Y"/>
    <field name="MsgType" required="Y"/>
    <field name="SenderCompID" required="Y"/>
    <field name="TargetCompID" required="Y"/>
  </header>
  <trailer>
    <field name="CheckSum" required="Y"/>
  </trailer>
  <messages>
    <message name="PositionReport" msgtype="AP" msgcat="app">
      <group name="NoPosAmt" required="N">
        <field name="PosAmtType" required="N"/>
        <field name="PosAmt" required="N"/>
        <field name="PositionCurrency" required="N"/>
      </group>
    </message>
    <message name="Heartbeat" msgtype="0" msgcat="admin"/>
  </messages>
  <components/>
  <fields>
    <field number="8" name="BeginString" type="STRING"/>
    <field number="9" name="BodyLength" type="LENGTH"/>
    <field number="10" name="CheckSum" type="STRING"/>
    <field number="35" name="MsgType" type="STRING"/>
    <field number="49" name="SenderCompID" type="STRING"/>
    <field number="56" name="TargetCompID" type="STRING"/>
    <field number="707" name="PosAmtType" type="STRING">
      <value enum="CASH" description="CASH_AMOUNT"/>
      <value enum="CRES" description="CASH_RESIDUAL"/>
    </field>
    <field number="708" name="PosAmt" type="AMT"/>
    <field number="753" name="NoPosAmt" type="NUMINGROUP"/>
    <field number="1055" name="PositionCurrency" type="CURRENCY"/>
  </fields>
</fix>
"#;

    fn make_message(body: &[u8]) -> Vec<u8> {
        let mut msg = format!("8=FIX.4.4\x019={}\x01", body.len()).into_bytes();
        msg.extend_from_slice(body);
        let cks = calculate_checksum(&msg);
        msg.extend_from_slice(format!("10={cks:03}\x01").as_bytes());
        msg
    }

    #[test]
    fn test_prelude_imports() {
        let field = FieldRef::new(35, b"D");
        assert_eq!(field.as_str().unwrap(), "D");
        let _framer = Framer::new();
    }

    #[test]
    fn test_version_begin_string() {
        let version = DictVersion::new(4, 4, 0, "FIX");
        assert_eq!(version.begin_string(), "FIX.4.4");
    }

    #[test]
    fn test_frame_decode_validate_pipeline() {
        let dict = Dictionary::load(FIXTURE).unwrap();
        let mut buf = make_message(
            b"35=AP\x0149=001\x0156=YYY\x01753=1\x01707=CASH\x01708=0\x011055=GBP\x01",
        );

        let FrameResult::Complete(len) = Framer::new().frame_next(&mut buf) else {
            panic!("expected a complete frame");
        };
        assert_eq!(len, buf.len());
        assert!(verify_checksum(&buf[..len]));

        let mut cursor = TokenCursor::parse(&buf[..len]).unwrap();
        let msg_type = cursor
            .tokens()
            .iter()
            .find(|t| t.tag == 35)
            .and_then(|t| t.as_str().ok())
            .map(str::to_owned)
            .unwrap();

        let bindings = Assembler::new(&dict)
            .validate_message(&msg_type, &mut cursor, true)
            .unwrap();
        assert_eq!(bindings.get(49), Some(b"001".as_ref()));
        assert_eq!(bindings.get(707), Some(b"CASH".as_ref()));
        assert_eq!(bindings.get(1055), Some(b"GBP".as_ref()));
    }

    #[test]
    fn test_pipeline_rejects_bad_enum() {
        let dict = Dictionary::load(FIXTURE).unwrap();
        let mut buf = make_message(b"35=AP\x0149=001\x0156=YYY\x01753=1\x01707=JUNK\x01");

        let FrameResult::Complete(len) = Framer::new().frame_next(&mut buf) else {
            panic!("expected a complete frame");
        };
        let mut cursor = TokenCursor::parse(&buf[..len]).unwrap();
        let err = Assembler::new(&dict)
            .validate_message("AP", &mut cursor, true)
            .unwrap_err();
        assert!(matches!(
            err,
            ValidationError::UnknownEnumValue { fid: 707, .. }
        ));
    }

    #[test]
    fn test_stream_of_messages_splits_and_validates() {
        let dict = Dictionary::load(FIXTURE).unwrap();
        let assembler = Assembler::new(&dict);
        let framer = Framer::new();

        let mut stream = BytesMut::new();
        stream.extend_from_slice(&make_message(b"35=0\x0149=A\x0156=B\x01"));
        stream.extend_from_slice(&make_message(b"35=0\x0149=B\x0156=A\x01"));

        let mut seen = 0;
        while let Some(frame) = framer.split_frame(&mut stream).unwrap() {
            let mut cursor = TokenCursor::parse(&frame).unwrap();
            let bindings = assembler.validate_message("0", &mut cursor, true).unwrap();
            assert!(bindings.get(49).is_some());
            seen += 1;
        }
        assert_eq!(seen, 2);
        assert!(stream.is_empty());
    }
}
