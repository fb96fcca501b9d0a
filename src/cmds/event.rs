//! Event commands (Sensor/Event NetFn): set/get event receiver.

use crate::cmds::{fill_cmd, parse_response};
use crate::error::{Error, Result};
use crate::obj::Obj;
use crate::template::{FieldSpec, Template};

/// `Set Event Receiver` command code.
pub const CMD_SET_EVENT_RECEIVER: u8 = 0x00;
/// `Get Event Receiver` command code.
pub const CMD_GET_EVENT_RECEIVER: u8 = 0x01;

/// `Set Event Receiver` request.
pub static SET_EVENT_RECEIVER_RQ: Template = Template::new(&[
    FieldSpec::required(8, "cmd"),
    FieldSpec::required(8, "event_receiver_slave_address"),
    FieldSpec::required(2, "event_receiver_lun"),
    FieldSpec::required(6, "reserved"),
]);

/// `Set Event Receiver` response.
pub static SET_EVENT_RECEIVER_RS: Template = Template::new(&[
    FieldSpec::required(8, "cmd").makes_packet_valid(),
    FieldSpec::required(8, "comp_code").makes_packet_valid(),
]);

/// `Get Event Receiver` request.
pub static GET_EVENT_RECEIVER_RQ: Template = Template::new(&[FieldSpec::required(8, "cmd")]);

/// `Get Event Receiver` response.
pub static GET_EVENT_RECEIVER_RS: Template = Template::new(&[
    FieldSpec::required(8, "cmd").makes_packet_valid(),
    FieldSpec::required(8, "comp_code").makes_packet_valid(),
    FieldSpec::required(8, "event_receiver_slave_address"),
    FieldSpec::required(2, "event_receiver_lun"),
    FieldSpec::required(6, "reserved"),
]);

/// The configured event receiver, as reported by `Get Event Receiver`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventReceiver {
    /// IPMB slave address of the receiver.
    pub slave_address: u8,
    /// LUN on the receiver (2 bits).
    pub lun: u8,
}

/// Fill a `Set Event Receiver` request object. `lun` is 2 bits.
pub fn fill_set_event_receiver(slave_address: u8, lun: u8, obj: &mut Obj) -> Result<()> {
    if lun > 0x03 {
        return Err(Error::InvalidParameters("event receiver lun out of range"));
    }
    fill_cmd(
        obj,
        &SET_EVENT_RECEIVER_RQ,
        CMD_SET_EVENT_RECEIVER,
        &[
            ("event_receiver_slave_address", u64::from(slave_address)),
            ("event_receiver_lun", u64::from(lun)),
            ("reserved", 0),
        ],
    )
}

/// Fill a `Get Event Receiver` request object.
pub fn fill_get_event_receiver(obj: &mut Obj) -> Result<()> {
    fill_cmd(obj, &GET_EVENT_RECEIVER_RQ, CMD_GET_EVENT_RECEIVER, &[])
}

/// Decode a `Get Event Receiver` response wire image.
pub fn decode_event_receiver(raw: &[u8]) -> Result<EventReceiver> {
    let obj = parse_response(&GET_EVENT_RECEIVER_RS, raw, CMD_GET_EVENT_RECEIVER)?;
    Ok(EventReceiver {
        slave_address: obj.get("event_receiver_slave_address")? as u8,
        lun: obj.get("event_receiver_lun")? as u8,
    })
}
