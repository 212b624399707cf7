// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Phase-enforced streaming message encoder.
//!
//! A message encodes through ordered phases: header, then the key's
//! attribute block (when declared), then the extended header (when
//! declared), then the payload, then completion. The encoder is a
//! consuming typestate builder, so calling a phase out of order does not
//! compile; the two checks the types cannot express (a declared attrib
//! or extended header that was never supplied) are rejected at the
//! payload phase.
//!
//! Any phase failure rolls the writer back to the start of the message
//! before the error is returned, leaving previously written sibling
//! data intact. `complete(false)` does the same for a caller-initiated
//! abandon.

use crate::core::error::{CodecError, Result};
use crate::core::types::DataType;
use crate::encoding::wire::{SlotMark, WireWriter};
use crate::message::{
    body_flags, encode_body_fields, encode_key_fields, Msg, HAS_EXTENDED_HEADER, HAS_KEY,
    HAS_PERM_DATA,
};
use std::marker::PhantomData;

/// Phase marker: header (and key fields) written.
pub struct HeaderWritten(());
/// Phase marker: key attribute block written.
pub struct AttribWritten(());
/// Phase marker: extended header written.
pub struct ExtendedWritten(());
/// Phase marker: payload written; only completion remains.
pub struct PayloadWritten(());

struct Inner<'a> {
    w: &'a mut WireWriter,
    start: usize,
    // Open (attrib, key) slots while an attrib block is awaited.
    pending_attrib: Option<(SlotMark, SlotMark)>,
    needs_ext: bool,
    ext_written: bool,
}

impl<'a> Inner<'a> {
    fn init(w: &'a mut WireWriter, msg: &Msg) -> Result<Self> {
        let start = w.mark();
        let mut inner = Self {
            w,
            start,
            pending_attrib: None,
            needs_ext: msg.extended_header.is_some(),
            ext_written: false,
        };
        if let Err(e) = inner.write_header(msg) {
            inner.w.truncate(start);
            return Err(e);
        }
        Ok(inner)
    }

    fn write_header(&mut self, msg: &Msg) -> Result<()> {
        let mut flags = body_flags(&msg.body);
        if msg.key.is_some() {
            flags |= HAS_KEY;
        }
        if msg.extended_header.is_some() {
            flags |= HAS_EXTENDED_HEADER;
        }
        if msg.perm_data.is_some() {
            flags |= HAS_PERM_DATA;
        }

        self.w.write_u8(msg.class() as u8)?;
        self.w.write_u8(msg.domain)?;
        self.w.write_i32(msg.stream_id)?;
        self.w.write_u16(flags)?;
        encode_body_fields(self.w, &msg.body)?;
        if let Some(perm) = &msg.perm_data {
            self.w.write_slot(perm)?;
        }
        if let Some(key) = &msg.key {
            let key_slot = self.w.begin_slot()?;
            encode_key_fields(self.w, key)?;
            if let Some(attrib) = &key.attrib {
                self.w.write_u8(attrib.data_type().code())?;
                let attrib_slot = self.w.begin_slot()?;
                self.pending_attrib = Some((attrib_slot, key_slot));
            } else {
                self.w.end_slot(key_slot)?;
            }
        }
        Ok(())
    }

    fn fail(&mut self, e: CodecError) -> CodecError {
        self.w.truncate(self.start);
        e
    }

    fn attrib<F>(&mut self, f: F) -> Result<()>
    where
        F: FnOnce(&mut WireWriter) -> Result<()>,
    {
        let Some((attrib_slot, key_slot)) = self.pending_attrib.take() else {
            return Err(self.fail(CodecError::invalid_argument(
                "message key does not declare an attribute block",
            )));
        };
        if let Err(e) = f(self.w)
            .and_then(|()| self.w.end_slot(attrib_slot))
            .and_then(|()| self.w.end_slot(key_slot))
        {
            return Err(self.fail(e));
        }
        Ok(())
    }

    fn extended_header(&mut self, bytes: &[u8]) -> Result<()> {
        if !self.needs_ext {
            return Err(self.fail(CodecError::invalid_argument(
                "message does not declare an extended header",
            )));
        }
        if let Err(e) = self.check_attrib_done() {
            return Err(self.fail(e));
        }
        if let Err(e) = self.w.write_slot(bytes) {
            return Err(self.fail(e));
        }
        self.ext_written = true;
        Ok(())
    }

    fn check_attrib_done(&self) -> Result<()> {
        if self.pending_attrib.is_some() {
            return Err(CodecError::invalid_argument(
                "declared attribute block was not encoded",
            ));
        }
        Ok(())
    }

    fn payload<F>(&mut self, payload_type: DataType, f: F) -> Result<()>
    where
        F: FnOnce(&mut WireWriter) -> Result<()>,
    {
        if let Err(e) = self.check_pre_payload() {
            return Err(self.fail(e));
        }
        if payload_type == DataType::NoData {
            return Err(self.fail(CodecError::invalid_argument(
                "use payload_none for messages without data",
            )));
        }
        if let Err(e) = self
            .w
            .write_u8(payload_type.code())
            .and_then(|()| f(self.w))
        {
            return Err(self.fail(e));
        }
        Ok(())
    }

    fn payload_none(&mut self) -> Result<()> {
        if let Err(e) = self.check_pre_payload() {
            return Err(self.fail(e));
        }
        if let Err(e) = self.w.write_u8(DataType::NoData.code()) {
            return Err(self.fail(e));
        }
        Ok(())
    }

    fn check_pre_payload(&self) -> Result<()> {
        self.check_attrib_done()?;
        if self.needs_ext && !self.ext_written {
            return Err(CodecError::invalid_argument(
                "declared extended header was not encoded",
            ));
        }
        Ok(())
    }

    fn complete(self, success: bool) -> Result<()> {
        if !success {
            self.w.truncate(self.start);
        }
        Ok(())
    }

    fn rollback(self) {
        self.w.truncate(self.start);
    }
}

/// Streaming message encoder; the type parameter is the current phase.
///
/// See the [module docs](self) for the phase order. Obtained from
/// [`MsgEncoder::init`], which writes the complete header and the key
/// fields.
pub struct MsgEncoder<'a, Phase> {
    inner: Inner<'a>,
    _phase: PhantomData<Phase>,
}

impl<'a, Phase> std::fmt::Debug for MsgEncoder<'a, Phase> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MsgEncoder").finish_non_exhaustive()
    }
}

impl<'a, Phase> MsgEncoder<'a, Phase> {
    fn advance<Next>(self) -> MsgEncoder<'a, Next> {
        MsgEncoder {
            inner: self.inner,
            _phase: PhantomData,
        }
    }

    /// Abandon the message, rolling the writer back to where it began.
    pub fn rollback(self) {
        self.inner.rollback();
    }
}

impl<'a> MsgEncoder<'a, HeaderWritten> {
    /// Start a message: write the envelope header, class fields, and key
    /// fields. The payload (and the key's attribute body, if declared)
    /// follow in later phases.
    pub fn init(w: &'a mut WireWriter, msg: &Msg) -> Result<Self> {
        Ok(Self {
            inner: Inner::init(w, msg)?,
            _phase: PhantomData,
        })
    }

    /// Encode the key's declared attribute block.
    pub fn attrib<F>(mut self, f: F) -> Result<MsgEncoder<'a, AttribWritten>>
    where
        F: FnOnce(&mut WireWriter) -> Result<()>,
    {
        self.inner.attrib(f)?;
        Ok(self.advance())
    }

    /// Encode the declared extended header.
    pub fn extended_header(mut self, bytes: &[u8]) -> Result<MsgEncoder<'a, ExtendedWritten>> {
        self.inner.extended_header(bytes)?;
        Ok(self.advance())
    }

    /// Encode the payload with the declared container type.
    pub fn payload<F>(
        mut self,
        payload_type: DataType,
        f: F,
    ) -> Result<MsgEncoder<'a, PayloadWritten>>
    where
        F: FnOnce(&mut WireWriter) -> Result<()>,
    {
        self.inner.payload(payload_type, f)?;
        Ok(self.advance())
    }

    /// Declare that the message carries no payload.
    pub fn payload_none(mut self) -> Result<MsgEncoder<'a, PayloadWritten>> {
        self.inner.payload_none()?;
        Ok(self.advance())
    }
}

impl<'a> MsgEncoder<'a, AttribWritten> {
    /// Encode the declared extended header.
    pub fn extended_header(mut self, bytes: &[u8]) -> Result<MsgEncoder<'a, ExtendedWritten>> {
        self.inner.extended_header(bytes)?;
        Ok(self.advance())
    }

    /// Encode the payload with the declared container type.
    pub fn payload<F>(
        mut self,
        payload_type: DataType,
        f: F,
    ) -> Result<MsgEncoder<'a, PayloadWritten>>
    where
        F: FnOnce(&mut WireWriter) -> Result<()>,
    {
        self.inner.payload(payload_type, f)?;
        Ok(self.advance())
    }

    /// Declare that the message carries no payload.
    pub fn payload_none(mut self) -> Result<MsgEncoder<'a, PayloadWritten>> {
        self.inner.payload_none()?;
        Ok(self.advance())
    }
}

impl<'a> MsgEncoder<'a, ExtendedWritten> {
    /// Encode the payload with the declared container type.
    pub fn payload<F>(
        mut self,
        payload_type: DataType,
        f: F,
    ) -> Result<MsgEncoder<'a, PayloadWritten>>
    where
        F: FnOnce(&mut WireWriter) -> Result<()>,
    {
        self.inner.payload(payload_type, f)?;
        Ok(self.advance())
    }

    /// Declare that the message carries no payload.
    pub fn payload_none(mut self) -> Result<MsgEncoder<'a, PayloadWritten>> {
        self.inner.payload_none()?;
        Ok(self.advance())
    }
}

impl<'a> MsgEncoder<'a, PayloadWritten> {
    /// Finish the message. With `success = false` the writer is rolled
    /// back to where the message began.
    pub fn complete(self, success: bool) -> Result<()> {
        self.inner.complete(success)
    }
}

/// Encode an owned message by driving the phases in order.
pub(crate) fn encode_msg(w: &mut WireWriter, msg: &Msg) -> Result<()> {
    let mut inner = Inner::init(w, msg)?;
    if let Some(attrib) = msg.key.as_ref().and_then(|key| key.attrib.as_ref()) {
        inner.attrib(|w| attrib.encode_body(w))?;
    }
    if let Some(ext) = &msg.extended_header {
        inner.extended_header(ext)?;
    }
    match &msg.payload {
        crate::container::Payload::None => inner.payload_none()?,
        payload => inner.payload(payload.data_type(), |w| payload.encode_body(w))?,
    }
    inner.complete(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::{ElementEntry, ElementList, Payload, WireEncode};
    use crate::core::value::PrimitiveValue;
    use crate::message::{domain, MsgBody, MsgKey, MsgRef, UpdateInfo};

    fn attrib_list() -> ElementList {
        let mut list = ElementList::new();
        list.push(ElementEntry::new(
            "Position",
            Payload::value(PrimitiveValue::Ascii("127.0.0.1".to_string())),
        ));
        list
    }

    fn msg_with_attrib() -> Msg {
        let mut key = MsgKey::named(b"user".to_vec(), 1);
        key.attrib = Some(Payload::ElementList(attrib_list()));
        Msg::new(domain::LOGIN, 1, MsgBody::Update(UpdateInfo::default())).with_key(key)
    }

    #[test]
    fn test_streaming_matches_owned_encode() {
        let msg = msg_with_attrib();
        let owned = msg.encode_to_vec().unwrap();

        let attrib = attrib_list();
        let mut w = WireWriter::new();
        let enc = MsgEncoder::init(&mut w, &msg).unwrap();
        let enc = enc.attrib(|w| Payload::ElementList(attrib.clone()).encode_body(w)).unwrap();
        let enc = enc.payload_none().unwrap();
        enc.complete(true).unwrap();

        assert_eq!(w.data(), &owned[..]);
    }

    #[test]
    fn test_skipping_declared_attrib_is_rejected() {
        let msg = msg_with_attrib();
        let mut w = WireWriter::new();
        let enc = MsgEncoder::init(&mut w, &msg).unwrap();
        let err = enc.payload_none().unwrap_err();
        assert!(matches!(err, CodecError::InvalidArgument { .. }));
        // The failed encode rolled everything back.
        assert!(w.is_empty());
    }

    #[test]
    fn test_undeclared_attrib_is_rejected() {
        let msg = Msg::new(domain::MARKET_PRICE, 5, MsgBody::Update(UpdateInfo::default()));
        let mut w = WireWriter::new();
        let enc = MsgEncoder::init(&mut w, &msg).unwrap();
        assert!(enc.attrib(|_| Ok(())).is_err());
        assert!(w.is_empty());
    }

    #[test]
    fn test_skipping_declared_extended_header_is_rejected() {
        let mut msg = Msg::new(domain::MARKET_PRICE, 5, MsgBody::Update(UpdateInfo::default()));
        msg.extended_header = Some(vec![1, 2]);
        let mut w = WireWriter::new();
        let enc = MsgEncoder::init(&mut w, &msg).unwrap();
        assert!(enc.payload_none().is_err());
        assert!(w.is_empty());
    }

    #[test]
    fn test_complete_false_rolls_back() {
        let msg = Msg::new(domain::MARKET_PRICE, 5, MsgBody::Update(UpdateInfo::default()));
        let mut w = WireWriter::new();
        w.write_u8(0x55).unwrap();

        let enc = MsgEncoder::init(&mut w, &msg).unwrap();
        let enc = enc.payload_none().unwrap();
        enc.complete(false).unwrap();

        // Only the sibling byte written before the message survives.
        assert_eq!(w.data(), &[0x55]);
    }

    #[test]
    fn test_rollback_from_header_phase() {
        let msg = msg_with_attrib();
        let mut w = WireWriter::new();
        w.write_u8(0x55).unwrap();
        let enc = MsgEncoder::init(&mut w, &msg).unwrap();
        enc.rollback();
        assert_eq!(w.data(), &[0x55]);
    }

    #[test]
    fn test_streaming_with_extended_header_decodes() {
        let mut msg = Msg::new(domain::MARKET_PRICE, 9, MsgBody::Update(UpdateInfo::default()));
        msg.extended_header = Some(vec![0xAA]);

        let mut w = WireWriter::new();
        let enc = MsgEncoder::init(&mut w, &msg).unwrap();
        let enc = enc.extended_header(&[0xAA]).unwrap();
        let enc = enc
            .payload(crate::core::types::DataType::ElementList, |w| {
                attrib_list().encode(w)
            })
            .unwrap();
        enc.complete(true).unwrap();

        let decoded = MsgRef::decode(w.data()).unwrap();
        assert_eq!(decoded.extended_header(), Some(&[0xAA][..]));
        assert!(decoded.payload().unwrap().element_list().is_ok());
    }

    #[test]
    fn test_payload_rejects_no_data_type() {
        let msg = Msg::new(domain::MARKET_PRICE, 5, MsgBody::Update(UpdateInfo::default()));
        let mut w = WireWriter::new();
        let enc = MsgEncoder::init(&mut w, &msg).unwrap();
        assert!(enc
            .payload(crate::core::types::DataType::NoData, |_| Ok(()))
            .is_err());
    }
}
