// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Message codec: typed envelopes carrying containers.
//!
//! Seven message classes share a common envelope (domain, stream id,
//! optional key, extended header, and permission data) and add
//! class-specific fields. The key's attribute block and the message
//! payload are both declared-type containers, so a message can nest
//! inside a container entry and vice versa to any depth.
//!
//! Encoding runs through the phase-enforced builder in [`builder`];
//! [`Msg::encode`] drives it for the owned model. Decoding yields a
//! [`MsgRef`] whose `attrib()` and `payload()` accessors re-derive their
//! views on every call.

pub mod builder;

pub use builder::{AttribWritten, ExtendedWritten, HeaderWritten, MsgEncoder, PayloadWritten};

use crate::container::{Payload, PayloadRef, WireEncode};
use crate::core::error::{CodecError, Result};
use crate::core::quality::{Qos, State};
use crate::core::types::DataType;
use crate::encoding::primitive::{decode_primitive, encode_primitive};
use crate::encoding::wire::{WireCursor, WireWriter};

/// Well-known message domains.
pub mod domain {
    /// Login
    pub const LOGIN: u8 = 1;
    /// Source directory
    pub const SOURCE: u8 = 4;
    /// Dictionary
    pub const DICTIONARY: u8 = 5;
    /// Market price
    pub const MARKET_PRICE: u8 = 6;
    /// Market by order
    pub const MARKET_BY_ORDER: u8 = 7;
    /// Market by price
    pub const MARKET_BY_PRICE: u8 = 8;
    /// Symbol list
    pub const SYMBOL_LIST: u8 = 10;
}

/// Message class tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MsgClass {
    /// Request for a stream
    Request = 1,
    /// Full image response
    Refresh = 2,
    /// Incremental change
    Update = 3,
    /// Stream status change
    Status = 4,
    /// Bidirectional free-form message
    Generic = 5,
    /// Contribution posted up a stream
    Post = 6,
    /// Acknowledgment of a post
    Ack = 7,
}

impl MsgClass {
    fn from_code(code: u8) -> Result<Self> {
        match code {
            1 => Ok(MsgClass::Request),
            2 => Ok(MsgClass::Refresh),
            3 => Ok(MsgClass::Update),
            4 => Ok(MsgClass::Status),
            5 => Ok(MsgClass::Generic),
            6 => Ok(MsgClass::Post),
            7 => Ok(MsgClass::Ack),
            other => Err(CodecError::invalid_argument(format!(
                "unrecognized message class code {other}"
            ))),
        }
    }
}

/// Stream priority carried by requests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Priority {
    /// Priority class, higher is more important
    pub class: u8,
    /// Number of interested users at this priority
    pub count: u16,
}

/// Identity of the user a refresh or post originates from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PostUserInfo {
    /// Originating address
    pub address: u32,
    /// Originating user id
    pub id: u32,
}

/// Conflation details carried by updates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConflationInfo {
    /// Number of updates folded into this one
    pub count: u16,
    /// Conflation interval in milliseconds
    pub time: u16,
}

/// Negative acknowledgment reason carried by acks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum NakCode {
    /// No reason given
    None = 0,
    /// Access denied
    AccessDenied = 1,
    /// Denied by the source
    DeniedBySource = 2,
    /// Source is down
    SourceDown = 3,
    /// Source unknown
    SourceUnknown = 4,
    /// No resources available
    NoResources = 5,
    /// No response from the source
    NoResponse = 6,
    /// Gateway is down
    GatewayDown = 7,
    /// Symbol unknown
    SymbolUnknown = 10,
    /// Item not open
    NotOpen = 11,
    /// Invalid content
    InvalidContent = 12,
}

impl NakCode {
    fn from_code(code: u8) -> Result<Self> {
        match code {
            0 => Ok(NakCode::None),
            1 => Ok(NakCode::AccessDenied),
            2 => Ok(NakCode::DeniedBySource),
            3 => Ok(NakCode::SourceDown),
            4 => Ok(NakCode::SourceUnknown),
            5 => Ok(NakCode::NoResources),
            6 => Ok(NakCode::NoResponse),
            7 => Ok(NakCode::GatewayDown),
            10 => Ok(NakCode::SymbolUnknown),
            11 => Ok(NakCode::NotOpen),
            12 => Ok(NakCode::InvalidContent),
            other => Err(CodecError::invalid_argument(format!(
                "unrecognized nak code {other}"
            ))),
        }
    }
}

/// Class-specific message fields.
#[derive(Debug, Clone, PartialEq)]
pub enum MsgBody {
    /// Request fields
    Request(RequestInfo),
    /// Refresh fields
    Refresh(RefreshInfo),
    /// Update fields
    Update(UpdateInfo),
    /// Status fields
    Status(StatusInfo),
    /// Generic fields
    Generic(GenericInfo),
    /// Post fields
    Post(PostInfo),
    /// Ack fields
    Ack(AckInfo),
}

impl MsgBody {
    /// Get the class tag for this body.
    #[must_use]
    pub fn class(&self) -> MsgClass {
        match self {
            MsgBody::Request(_) => MsgClass::Request,
            MsgBody::Refresh(_) => MsgClass::Refresh,
            MsgBody::Update(_) => MsgClass::Update,
            MsgBody::Status(_) => MsgClass::Status,
            MsgBody::Generic(_) => MsgClass::Generic,
            MsgBody::Post(_) => MsgClass::Post,
            MsgBody::Ack(_) => MsgClass::Ack,
        }
    }
}

/// Request-specific fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestInfo {
    /// Keep the stream open after the refresh
    pub streaming: bool,
    /// Request a private stream
    pub private_stream: bool,
    /// Ask for conflation info in updates
    pub conf_info_in_updates: bool,
    /// Stream priority
    pub priority: Option<Priority>,
    /// Requested quality of service
    pub qos: Option<Qos>,
}

/// Refresh-specific fields.
#[derive(Debug, Clone, PartialEq)]
pub struct RefreshInfo {
    /// Stream and data state
    pub state: State,
    /// Delivered quality of service
    pub qos: Option<Qos>,
    /// Response to a request rather than unsolicited
    pub solicited: bool,
    /// Consumers should drop cached data first
    pub clear_cache: bool,
    /// Consumers should not cache this response
    pub do_not_cache: bool,
    /// Part number of a multi-part refresh
    pub part_num: Option<u16>,
    /// Sequence number
    pub seq_num: Option<u32>,
    /// Identity of the posting user, when relayed
    pub post_user: Option<PostUserInfo>,
}

impl RefreshInfo {
    /// Create a refresh body with the given state.
    #[must_use]
    pub fn new(state: State) -> Self {
        Self {
            state,
            qos: None,
            solicited: false,
            clear_cache: false,
            do_not_cache: false,
            part_num: None,
            seq_num: None,
            post_user: None,
        }
    }
}

/// Update-specific fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateInfo {
    /// Kind of update (quote, trade, ...)
    pub update_type: u8,
    /// Sequence number
    pub seq_num: Option<u32>,
    /// Conflation details
    pub conflation: Option<ConflationInfo>,
    /// Consumers should not cache this update
    pub do_not_cache: bool,
    /// Intermediaries should not conflate this update
    pub do_not_conflate: bool,
    /// Consumers should not ripple fields
    pub do_not_ripple: bool,
}

/// Status-specific fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatusInfo {
    /// New stream and data state, if changed
    pub state: Option<State>,
    /// Consumers should drop cached data
    pub clear_cache: bool,
}

/// Generic-message fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenericInfo {
    /// Part number of a multi-part message
    pub part_num: Option<u16>,
    /// Sequence number
    pub seq_num: Option<u32>,
    /// Secondary sequence number
    pub secondary_seq_num: Option<u32>,
    /// Final part marker
    pub complete: bool,
}

/// Post-specific fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostInfo {
    /// Identity of the posting user
    pub post_user: PostUserInfo,
    /// Post id for correlation with acks
    pub post_id: Option<u32>,
    /// Rights the poster asserts
    pub user_rights: Option<u16>,
    /// Ask the provider to acknowledge
    pub solicit_ack: bool,
}

/// Ack-specific fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AckInfo {
    /// Id of the acknowledged post
    pub ack_id: u32,
    /// Negative acknowledgment reason, if any
    pub nak_code: Option<NakCode>,
    /// Human-readable detail
    pub text: Option<String>,
}

/// Message key: identifies the item a message concerns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MsgKey {
    /// Item name bytes
    pub name: Option<Vec<u8>>,
    /// Namespace of the name
    pub name_type: Option<u8>,
    /// Service the item belongs to
    pub service_id: Option<u16>,
    /// Filter id set for filtered domains
    pub filter: Option<u32>,
    /// Numeric item identifier
    pub identifier: Option<i32>,
    /// Attribute block of a declared container type
    pub attrib: Option<Payload>,
}

impl MsgKey {
    /// Create a key with a name and service id.
    #[must_use]
    pub fn named(name: impl Into<Vec<u8>>, service_id: u16) -> Self {
        Self {
            name: Some(name.into()),
            service_id: Some(service_id),
            ..Self::default()
        }
    }
}

/// Owned message for encoding.
#[derive(Debug, Clone, PartialEq)]
pub struct Msg {
    /// Message domain, see [`domain`]
    pub domain: u8,
    /// Stream the message belongs to
    pub stream_id: i32,
    /// Optional message key
    pub key: Option<MsgKey>,
    /// Optional opaque extended header
    pub extended_header: Option<Vec<u8>>,
    /// Optional permission bytes
    pub perm_data: Option<Vec<u8>>,
    /// Class-specific fields
    pub body: MsgBody,
    /// Payload of a declared container type
    pub payload: Payload,
}

impl Msg {
    /// Create a message with no key and no payload.
    #[must_use]
    pub fn new(domain: u8, stream_id: i32, body: MsgBody) -> Self {
        Self {
            domain,
            stream_id,
            key: None,
            extended_header: None,
            perm_data: None,
            body,
            payload: Payload::None,
        }
    }

    /// Set the message key.
    #[must_use]
    pub fn with_key(mut self, key: MsgKey) -> Self {
        self.key = Some(key);
        self
    }

    /// Set the payload.
    #[must_use]
    pub fn with_payload(mut self, payload: Payload) -> Self {
        self.payload = payload;
        self
    }

    /// Get the class tag.
    #[must_use]
    pub fn class(&self) -> MsgClass {
        self.body.class()
    }
}

impl WireEncode for Msg {
    fn encode(&self, w: &mut WireWriter) -> Result<()> {
        builder::encode_msg(w, self)
    }
}

// ============================================================================
// Flags
// ============================================================================

pub(crate) const HAS_KEY: u16 = 0x0001;
pub(crate) const HAS_EXTENDED_HEADER: u16 = 0x0002;
pub(crate) const HAS_PERM_DATA: u16 = 0x0004;

const REQ_STREAMING: u16 = 0x0008;
const REQ_HAS_PRIORITY: u16 = 0x0010;
const REQ_HAS_QOS: u16 = 0x0020;
const REQ_PRIVATE_STREAM: u16 = 0x0040;
const REQ_CONF_INFO_IN_UPDATES: u16 = 0x0080;

const RFR_SOLICITED: u16 = 0x0008;
const RFR_CLEAR_CACHE: u16 = 0x0010;
const RFR_DO_NOT_CACHE: u16 = 0x0020;
const RFR_HAS_QOS: u16 = 0x0040;
const RFR_HAS_PART_NUM: u16 = 0x0080;
const RFR_HAS_SEQ_NUM: u16 = 0x0100;
const RFR_HAS_POST_USER: u16 = 0x0200;

const UPD_HAS_SEQ_NUM: u16 = 0x0008;
const UPD_HAS_CONF_INFO: u16 = 0x0010;
const UPD_DO_NOT_CACHE: u16 = 0x0020;
const UPD_DO_NOT_CONFLATE: u16 = 0x0040;
const UPD_DO_NOT_RIPPLE: u16 = 0x0080;

const STA_HAS_STATE: u16 = 0x0008;
const STA_CLEAR_CACHE: u16 = 0x0010;

const GEN_HAS_PART_NUM: u16 = 0x0008;
const GEN_HAS_SEQ_NUM: u16 = 0x0010;
const GEN_HAS_SECONDARY_SEQ_NUM: u16 = 0x0020;
const GEN_COMPLETE: u16 = 0x0040;

const PST_HAS_POST_ID: u16 = 0x0008;
const PST_HAS_USER_RIGHTS: u16 = 0x0010;
const PST_SOLICIT_ACK: u16 = 0x0020;

const ACK_HAS_NAK_CODE: u16 = 0x0008;
const ACK_HAS_TEXT: u16 = 0x0010;

const KEY_HAS_NAME: u8 = 0x01;
const KEY_HAS_NAME_TYPE: u8 = 0x02;
const KEY_HAS_SERVICE_ID: u8 = 0x04;
const KEY_HAS_FILTER: u8 = 0x08;
const KEY_HAS_IDENTIFIER: u8 = 0x10;
const KEY_HAS_ATTRIB: u8 = 0x20;

pub(crate) fn body_flags(body: &MsgBody) -> u16 {
    match body {
        MsgBody::Request(info) => {
            let mut flags = 0;
            if info.streaming {
                flags |= REQ_STREAMING;
            }
            if info.priority.is_some() {
                flags |= REQ_HAS_PRIORITY;
            }
            if info.qos.is_some() {
                flags |= REQ_HAS_QOS;
            }
            if info.private_stream {
                flags |= REQ_PRIVATE_STREAM;
            }
            if info.conf_info_in_updates {
                flags |= REQ_CONF_INFO_IN_UPDATES;
            }
            flags
        }
        MsgBody::Refresh(info) => {
            let mut flags = 0;
            if info.solicited {
                flags |= RFR_SOLICITED;
            }
            if info.clear_cache {
                flags |= RFR_CLEAR_CACHE;
            }
            if info.do_not_cache {
                flags |= RFR_DO_NOT_CACHE;
            }
            if info.qos.is_some() {
                flags |= RFR_HAS_QOS;
            }
            if info.part_num.is_some() {
                flags |= RFR_HAS_PART_NUM;
            }
            if info.seq_num.is_some() {
                flags |= RFR_HAS_SEQ_NUM;
            }
            if info.post_user.is_some() {
                flags |= RFR_HAS_POST_USER;
            }
            flags
        }
        MsgBody::Update(info) => {
            let mut flags = 0;
            if info.seq_num.is_some() {
                flags |= UPD_HAS_SEQ_NUM;
            }
            if info.conflation.is_some() {
                flags |= UPD_HAS_CONF_INFO;
            }
            if info.do_not_cache {
                flags |= UPD_DO_NOT_CACHE;
            }
            if info.do_not_conflate {
                flags |= UPD_DO_NOT_CONFLATE;
            }
            if info.do_not_ripple {
                flags |= UPD_DO_NOT_RIPPLE;
            }
            flags
        }
        MsgBody::Status(info) => {
            let mut flags = 0;
            if info.state.is_some() {
                flags |= STA_HAS_STATE;
            }
            if info.clear_cache {
                flags |= STA_CLEAR_CACHE;
            }
            flags
        }
        MsgBody::Generic(info) => {
            let mut flags = 0;
            if info.part_num.is_some() {
                flags |= GEN_HAS_PART_NUM;
            }
            if info.seq_num.is_some() {
                flags |= GEN_HAS_SEQ_NUM;
            }
            if info.secondary_seq_num.is_some() {
                flags |= GEN_HAS_SECONDARY_SEQ_NUM;
            }
            if info.complete {
                flags |= GEN_COMPLETE;
            }
            flags
        }
        MsgBody::Post(info) => {
            let mut flags = 0;
            if info.post_id.is_some() {
                flags |= PST_HAS_POST_ID;
            }
            if info.user_rights.is_some() {
                flags |= PST_HAS_USER_RIGHTS;
            }
            if info.solicit_ack {
                flags |= PST_SOLICIT_ACK;
            }
            flags
        }
        MsgBody::Ack(info) => {
            let mut flags = 0;
            if info.nak_code.is_some() {
                flags |= ACK_HAS_NAK_CODE;
            }
            if info.text.is_some() {
                flags |= ACK_HAS_TEXT;
            }
            flags
        }
    }
}

fn write_state_slot(w: &mut WireWriter, state: &State) -> Result<()> {
    let slot = w.begin_slot()?;
    encode_primitive(w, &crate::core::value::PrimitiveValue::State(state.clone()))?;
    w.end_slot(slot)
}

fn write_qos_slot(w: &mut WireWriter, qos: &Qos) -> Result<()> {
    let slot = w.begin_slot()?;
    encode_primitive(w, &crate::core::value::PrimitiveValue::Qos(*qos))?;
    w.end_slot(slot)
}

pub(crate) fn encode_body_fields(w: &mut WireWriter, body: &MsgBody) -> Result<()> {
    match body {
        MsgBody::Request(info) => {
            if let Some(priority) = &info.priority {
                w.write_u8(priority.class)?;
                w.write_u16(priority.count)?;
            }
            if let Some(qos) = &info.qos {
                write_qos_slot(w, qos)?;
            }
        }
        MsgBody::Refresh(info) => {
            write_state_slot(w, &info.state)?;
            if let Some(qos) = &info.qos {
                write_qos_slot(w, qos)?;
            }
            if let Some(part_num) = info.part_num {
                w.write_u16(part_num)?;
            }
            if let Some(seq_num) = info.seq_num {
                w.write_u32(seq_num)?;
            }
            if let Some(post_user) = &info.post_user {
                w.write_u32(post_user.address)?;
                w.write_u32(post_user.id)?;
            }
        }
        MsgBody::Update(info) => {
            w.write_u8(info.update_type)?;
            if let Some(seq_num) = info.seq_num {
                w.write_u32(seq_num)?;
            }
            if let Some(conflation) = &info.conflation {
                w.write_u16(conflation.count)?;
                w.write_u16(conflation.time)?;
            }
        }
        MsgBody::Status(info) => {
            if let Some(state) = &info.state {
                write_state_slot(w, state)?;
            }
        }
        MsgBody::Generic(info) => {
            if let Some(part_num) = info.part_num {
                w.write_u16(part_num)?;
            }
            if let Some(seq_num) = info.seq_num {
                w.write_u32(seq_num)?;
            }
            if let Some(secondary) = info.secondary_seq_num {
                w.write_u32(secondary)?;
            }
        }
        MsgBody::Post(info) => {
            w.write_u32(info.post_user.address)?;
            w.write_u32(info.post_user.id)?;
            if let Some(post_id) = info.post_id {
                w.write_u32(post_id)?;
            }
            if let Some(rights) = info.user_rights {
                w.write_u16(rights)?;
            }
        }
        MsgBody::Ack(info) => {
            w.write_u32(info.ack_id)?;
            if let Some(nak_code) = info.nak_code {
                w.write_u8(nak_code as u8)?;
            }
            if let Some(text) = &info.text {
                w.write_slot(text.as_bytes())?;
            }
        }
    }
    Ok(())
}

pub(crate) fn encode_key_fields(w: &mut WireWriter, key: &MsgKey) -> Result<()> {
    let mut key_flags = 0u8;
    if key.name.is_some() {
        key_flags |= KEY_HAS_NAME;
    }
    if key.name_type.is_some() {
        key_flags |= KEY_HAS_NAME_TYPE;
    }
    if key.service_id.is_some() {
        key_flags |= KEY_HAS_SERVICE_ID;
    }
    if key.filter.is_some() {
        key_flags |= KEY_HAS_FILTER;
    }
    if key.identifier.is_some() {
        key_flags |= KEY_HAS_IDENTIFIER;
    }
    if key.attrib.is_some() {
        key_flags |= KEY_HAS_ATTRIB;
    }
    w.write_u8(key_flags)?;
    if let Some(name) = &key.name {
        w.write_slot(name)?;
    }
    if let Some(name_type) = key.name_type {
        w.write_u8(name_type)?;
    }
    if let Some(service_id) = key.service_id {
        w.write_u16(service_id)?;
    }
    if let Some(filter) = key.filter {
        w.write_u32(filter)?;
    }
    if let Some(identifier) = key.identifier {
        w.write_i32(identifier)?;
    }
    // The attrib type byte and slot are written by the builder so the
    // attrib body can stream in its own phase.
    Ok(())
}

// ============================================================================
// Decode
// ============================================================================

/// Decoded message view.
#[derive(Debug, Clone)]
pub struct MsgRef<'a> {
    /// Message domain
    pub domain: u8,
    /// Stream the message belongs to
    pub stream_id: i32,
    /// Class-specific fields
    pub body: MsgBody,
    key: Option<MsgKeyRef<'a>>,
    extended_header: Option<&'a [u8]>,
    perm_data: Option<&'a [u8]>,
    payload_type: DataType,
    payload_raw: &'a [u8],
}

impl<'a> MsgRef<'a> {
    /// Decode a message from its byte scope.
    pub fn decode(bytes: &'a [u8]) -> Result<Self> {
        let mut cursor = WireCursor::new(bytes);
        let class = MsgClass::from_code(cursor.read_u8()?)?;
        let domain = cursor.read_u8()?;
        let stream_id = cursor.read_i32()?;
        let flags = cursor.read_u16()?;
        let body = decode_body(&mut cursor, class, flags)?;
        let perm_data = if flags & HAS_PERM_DATA != 0 {
            Some(cursor.read_slot()?)
        } else {
            None
        };
        let key = if flags & HAS_KEY != 0 {
            Some(MsgKeyRef::decode(cursor.read_slot()?)?)
        } else {
            None
        };
        let extended_header = if flags & HAS_EXTENDED_HEADER != 0 {
            Some(cursor.read_slot()?)
        } else {
            None
        };
        let payload_type = DataType::from_code(cursor.read_u8()?)?;
        let payload_raw = cursor.take_rest();
        if payload_type == DataType::NoData && !payload_raw.is_empty() {
            return Err(CodecError::invalid_argument(
                "message declares no payload but carries bytes",
            ));
        }
        Ok(Self {
            domain,
            stream_id,
            body,
            key,
            extended_header,
            perm_data,
            payload_type,
            payload_raw,
        })
    }

    /// Get the class tag.
    #[must_use]
    pub fn class(&self) -> MsgClass {
        self.body.class()
    }

    /// Get the message key, if present.
    #[must_use]
    pub fn key(&self) -> Option<&MsgKeyRef<'a>> {
        self.key.as_ref()
    }

    /// Get the extended header bytes, if present.
    #[must_use]
    pub fn extended_header(&self) -> Option<&'a [u8]> {
        self.extended_header
    }

    /// Get the permission bytes, if present.
    #[must_use]
    pub fn perm_data(&self) -> Option<&'a [u8]> {
        self.perm_data
    }

    /// Get the declared payload type.
    #[must_use]
    pub fn payload_type(&self) -> DataType {
        self.payload_type
    }

    /// Decode the payload. Each call derives a fresh view.
    pub fn payload(&self) -> Result<PayloadRef<'a>> {
        PayloadRef::decode(self.payload_type, self.payload_raw)
    }
}

/// Decoded message key view.
#[derive(Debug, Clone)]
pub struct MsgKeyRef<'a> {
    /// Namespace of the name
    pub name_type: Option<u8>,
    /// Service the item belongs to
    pub service_id: Option<u16>,
    /// Filter id set
    pub filter: Option<u32>,
    /// Numeric item identifier
    pub identifier: Option<i32>,
    name: Option<&'a [u8]>,
    attrib_type: DataType,
    attrib_raw: &'a [u8],
}

impl<'a> MsgKeyRef<'a> {
    fn decode(bytes: &'a [u8]) -> Result<Self> {
        let mut cursor = WireCursor::new(bytes);
        let key_flags = cursor.read_u8()?;
        let name = if key_flags & KEY_HAS_NAME != 0 {
            Some(cursor.read_slot()?)
        } else {
            None
        };
        let name_type = if key_flags & KEY_HAS_NAME_TYPE != 0 {
            Some(cursor.read_u8()?)
        } else {
            None
        };
        let service_id = if key_flags & KEY_HAS_SERVICE_ID != 0 {
            Some(cursor.read_u16()?)
        } else {
            None
        };
        let filter = if key_flags & KEY_HAS_FILTER != 0 {
            Some(cursor.read_u32()?)
        } else {
            None
        };
        let identifier = if key_flags & KEY_HAS_IDENTIFIER != 0 {
            Some(cursor.read_i32()?)
        } else {
            None
        };
        let (attrib_type, attrib_raw) = if key_flags & KEY_HAS_ATTRIB != 0 {
            let attrib_type = DataType::from_code(cursor.read_u8()?)?;
            (attrib_type, cursor.read_slot()?)
        } else {
            (DataType::NoData, &[] as &[u8])
        };
        Ok(Self {
            name_type,
            service_id,
            filter,
            identifier,
            name,
            attrib_type,
            attrib_raw,
        })
    }

    /// Get the item name bytes, if present.
    #[must_use]
    pub fn name(&self) -> Option<&'a [u8]> {
        self.name
    }

    /// Check whether an attribute block is present.
    #[must_use]
    pub fn has_attrib(&self) -> bool {
        self.attrib_type != DataType::NoData
    }

    /// Get the declared attribute container type.
    #[must_use]
    pub fn attrib_type(&self) -> DataType {
        self.attrib_type
    }

    /// Decode the attribute block. Each call derives a fresh view.
    pub fn attrib(&self) -> Result<PayloadRef<'a>> {
        PayloadRef::decode(self.attrib_type, self.attrib_raw)
    }
}

fn decode_state_slot(cursor: &mut WireCursor<'_>) -> Result<State> {
    let slot = cursor.read_slot()?;
    match decode_primitive(DataType::State, slot)? {
        crate::core::value::PrimitiveValue::State(state) => Ok(state),
        _ => unreachable!(),
    }
}

fn decode_qos_slot(cursor: &mut WireCursor<'_>) -> Result<Qos> {
    let slot = cursor.read_slot()?;
    match decode_primitive(DataType::Qos, slot)? {
        crate::core::value::PrimitiveValue::Qos(qos) => Ok(qos),
        _ => unreachable!(),
    }
}

fn decode_body(cursor: &mut WireCursor<'_>, class: MsgClass, flags: u16) -> Result<MsgBody> {
    match class {
        MsgClass::Request => {
            let priority = if flags & REQ_HAS_PRIORITY != 0 {
                Some(Priority {
                    class: cursor.read_u8()?,
                    count: cursor.read_u16()?,
                })
            } else {
                None
            };
            let qos = if flags & REQ_HAS_QOS != 0 {
                Some(decode_qos_slot(cursor)?)
            } else {
                None
            };
            Ok(MsgBody::Request(RequestInfo {
                streaming: flags & REQ_STREAMING != 0,
                private_stream: flags & REQ_PRIVATE_STREAM != 0,
                conf_info_in_updates: flags & REQ_CONF_INFO_IN_UPDATES != 0,
                priority,
                qos,
            }))
        }
        MsgClass::Refresh => {
            let state = decode_state_slot(cursor)?;
            let qos = if flags & RFR_HAS_QOS != 0 {
                Some(decode_qos_slot(cursor)?)
            } else {
                None
            };
            let part_num = if flags & RFR_HAS_PART_NUM != 0 {
                Some(cursor.read_u16()?)
            } else {
                None
            };
            let seq_num = if flags & RFR_HAS_SEQ_NUM != 0 {
                Some(cursor.read_u32()?)
            } else {
                None
            };
            let post_user = if flags & RFR_HAS_POST_USER != 0 {
                Some(PostUserInfo {
                    address: cursor.read_u32()?,
                    id: cursor.read_u32()?,
                })
            } else {
                None
            };
            Ok(MsgBody::Refresh(RefreshInfo {
                state,
                qos,
                solicited: flags & RFR_SOLICITED != 0,
                clear_cache: flags & RFR_CLEAR_CACHE != 0,
                do_not_cache: flags & RFR_DO_NOT_CACHE != 0,
                part_num,
                seq_num,
                post_user,
            }))
        }
        MsgClass::Update => {
            let update_type = cursor.read_u8()?;
            let seq_num = if flags & UPD_HAS_SEQ_NUM != 0 {
                Some(cursor.read_u32()?)
            } else {
                None
            };
            let conflation = if flags & UPD_HAS_CONF_INFO != 0 {
                Some(ConflationInfo {
                    count: cursor.read_u16()?,
                    time: cursor.read_u16()?,
                })
            } else {
                None
            };
            Ok(MsgBody::Update(UpdateInfo {
                update_type,
                seq_num,
                conflation,
                do_not_cache: flags & UPD_DO_NOT_CACHE != 0,
                do_not_conflate: flags & UPD_DO_NOT_CONFLATE != 0,
                do_not_ripple: flags & UPD_DO_NOT_RIPPLE != 0,
            }))
        }
        MsgClass::Status => {
            let state = if flags & STA_HAS_STATE != 0 {
                Some(decode_state_slot(cursor)?)
            } else {
                None
            };
            Ok(MsgBody::Status(StatusInfo {
                state,
                clear_cache: flags & STA_CLEAR_CACHE != 0,
            }))
        }
        MsgClass::Generic => {
            let part_num = if flags & GEN_HAS_PART_NUM != 0 {
                Some(cursor.read_u16()?)
            } else {
                None
            };
            let seq_num = if flags & GEN_HAS_SEQ_NUM != 0 {
                Some(cursor.read_u32()?)
            } else {
                None
            };
            let secondary_seq_num = if flags & GEN_HAS_SECONDARY_SEQ_NUM != 0 {
                Some(cursor.read_u32()?)
            } else {
                None
            };
            Ok(MsgBody::Generic(GenericInfo {
                part_num,
                seq_num,
                secondary_seq_num,
                complete: flags & GEN_COMPLETE != 0,
            }))
        }
        MsgClass::Post => {
            let post_user = PostUserInfo {
                address: cursor.read_u32()?,
                id: cursor.read_u32()?,
            };
            let post_id = if flags & PST_HAS_POST_ID != 0 {
                Some(cursor.read_u32()?)
            } else {
                None
            };
            let user_rights = if flags & PST_HAS_USER_RIGHTS != 0 {
                Some(cursor.read_u16()?)
            } else {
                None
            };
            Ok(MsgBody::Post(PostInfo {
                post_user,
                post_id,
                user_rights,
                solicit_ack: flags & PST_SOLICIT_ACK != 0,
            }))
        }
        MsgClass::Ack => {
            let ack_id = cursor.read_u32()?;
            let nak_code = if flags & ACK_HAS_NAK_CODE != 0 {
                Some(NakCode::from_code(cursor.read_u8()?)?)
            } else {
                None
            };
            let text = if flags & ACK_HAS_TEXT != 0 {
                let slot = cursor.read_slot()?;
                match std::str::from_utf8(slot) {
                    Ok(text) => Some(text.to_string()),
                    Err(_) => {
                        return Err(CodecError::invalid_argument("ack text is not UTF-8"))
                    }
                }
            } else {
                None
            };
            Ok(MsgBody::Ack(AckInfo {
                ack_id,
                nak_code,
                text,
            }))
        }
    }
}
