//! Sensor Data Record (SDR) templates.
//!
//! SDR records are not command payloads but share the same wire
//! discipline: the 5-byte record header is parsed first, then the record
//! is re-viewed through the record-type-specific template (here the Full
//! Sensor Record, type 0x01) via cross-template copy or a fresh
//! bulk load.

use crate::error::{Error, Result};
use crate::obj::Obj;
use crate::template::{FieldSpec, SubFieldSpec, Template};

/// Record type of a Full Sensor Record.
pub const RECORD_TYPE_FULL_SENSOR: u8 = 0x01;
/// Record type of a Compact Sensor Record.
pub const RECORD_TYPE_COMPACT_SENSOR: u8 = 0x02;

/// The common 5-byte SDR record header, with the record body as a
/// trailing opaque payload.
pub static SDR_RECORD_HEADER: Template = Template::new(&[
    FieldSpec::required(16, "record_id"),
    FieldSpec::required(4, "sdr_version_major"),
    FieldSpec::required(4, "sdr_version_minor"),
    FieldSpec::required(8, "record_type"),
    FieldSpec::required(8, "record_length"),
    FieldSpec::variable(2040, "record_data"),
]);

static SENSOR_OWNER_ID_SUB: [SubFieldSpec; 2] =
    [SubFieldSpec::new(1, "type"), SubFieldSpec::new(7, "id")];

static SENSOR_OWNER_LUN_SUB: [SubFieldSpec; 3] = [
    SubFieldSpec::new(2, "lun"),
    SubFieldSpec::new(2, "reserved"),
    SubFieldSpec::new(4, "channel_number"),
];

static ENTITY_INSTANCE_SUB: [SubFieldSpec; 2] = [
    SubFieldSpec::new(7, "number"),
    SubFieldSpec::new(1, "type"),
];

static SENSOR_CAPABILITIES_SUB: [SubFieldSpec; 5] = [
    SubFieldSpec::new(2, "event_message_control_support"),
    SubFieldSpec::new(2, "threshold_access_support"),
    SubFieldSpec::new(2, "hysteresis_support"),
    SubFieldSpec::new(1, "auto_re_arm_support"),
    SubFieldSpec::new(1, "entity_ignore_support"),
];

static SENSOR_UNIT1_SUB: [SubFieldSpec; 4] = [
    SubFieldSpec::new(1, "percentage"),
    SubFieldSpec::new(2, "modifier_unit"),
    SubFieldSpec::new(3, "rate_unit"),
    SubFieldSpec::new(2, "analog_data_format"),
];

/// Full Sensor Record (record type 0x01), header included, through the
/// variable-length ID string.
pub static FULL_SENSOR_RECORD: Template = Template::new(&[
    FieldSpec::required(16, "record_id"),
    FieldSpec::required(4, "sdr_version_major"),
    FieldSpec::required(4, "sdr_version_minor"),
    FieldSpec::required(8, "record_type"),
    FieldSpec::required(8, "record_length"),
    FieldSpec::required(8, "sensor_owner_id").with_sub(&SENSOR_OWNER_ID_SUB),
    FieldSpec::required(8, "sensor_owner_lun").with_sub(&SENSOR_OWNER_LUN_SUB),
    FieldSpec::required(8, "sensor_number"),
    FieldSpec::required(8, "entity_id"),
    FieldSpec::required(8, "entity_instance").with_sub(&ENTITY_INSTANCE_SUB),
    FieldSpec::required(8, "sensor_initialization"),
    FieldSpec::required(8, "sensor_capabilities").with_sub(&SENSOR_CAPABILITIES_SUB),
    FieldSpec::required(8, "sensor_type"),
    FieldSpec::required(8, "event_reading_type_code"),
    FieldSpec::required(16, "threshold_assertion_event_mask"),
    FieldSpec::required(16, "threshold_deassertion_event_mask"),
    FieldSpec::required(16, "discrete_reading_setting_mask"),
    FieldSpec::required(8, "sensor_unit1").with_sub(&SENSOR_UNIT1_SUB),
    FieldSpec::required(8, "sensor_unit2_base"),
    FieldSpec::required(8, "sensor_unit3_modifier"),
    FieldSpec::required(7, "linearization"),
    FieldSpec::required(1, "reserved1"),
    FieldSpec::required(8, "m_ls"),
    FieldSpec::required(6, "tolerance"),
    FieldSpec::required(2, "m_ms"),
    FieldSpec::required(8, "b_ls"),
    FieldSpec::required(6, "accuracy_ls"),
    FieldSpec::required(2, "b_ms"),
    FieldSpec::required(2, "sensor_direction"),
    FieldSpec::required(2, "accuracy_exp"),
    FieldSpec::required(4, "accuracy_ms"),
    FieldSpec::required(4, "b_exponent"),
    FieldSpec::required(4, "r_exponent"),
    FieldSpec::required(1, "nominal_reading_specified"),
    FieldSpec::required(1, "normal_max_specified"),
    FieldSpec::required(1, "normal_min_specified"),
    FieldSpec::required(5, "reserved2"),
    FieldSpec::required(8, "nominal_reading"),
    FieldSpec::required(8, "normal_maximum"),
    FieldSpec::required(8, "normal_minimum"),
    FieldSpec::required(8, "sensor_maximum_reading"),
    FieldSpec::required(8, "sensor_minimum_reading"),
    FieldSpec::required(8, "upper_non_recoverable_threshold"),
    FieldSpec::required(8, "upper_critical_threshold"),
    FieldSpec::required(8, "upper_non_critical_threshold"),
    FieldSpec::required(8, "lower_non_recoverable_threshold"),
    FieldSpec::required(8, "lower_critical_threshold"),
    FieldSpec::required(8, "lower_non_critical_threshold"),
    FieldSpec::required(8, "positive_going_threshold_hysteresis"),
    FieldSpec::required(8, "negative_going_threshold_hysteresis"),
    FieldSpec::required(16, "reserved3"),
    FieldSpec::required(8, "oem"),
    FieldSpec::required(8, "id_string_type_length"),
    FieldSpec::variable(128, "id_string"),
]);

/// Bulk-load an SDR record against the generic header template.
pub fn parse_record_header(raw: &[u8]) -> Result<Obj> {
    let mut obj = Obj::new(&SDR_RECORD_HEADER)?;
    obj.set_all(raw)?;
    Ok(obj)
}

/// Bulk-load an SDR record against the Full Sensor Record template,
/// verifying the record type first.
pub fn parse_full_sensor_record(raw: &[u8]) -> Result<Obj> {
    let header = parse_record_header(raw)?;
    if header.get("record_type")? != u64::from(RECORD_TYPE_FULL_SENSOR) {
        return Err(Error::InvalidParameters("not a full sensor record"));
    }
    let mut obj = Obj::new(&FULL_SENSOR_RECORD)?;
    obj.set_all(raw)?;
    Ok(obj)
}

/// A synthetic but wire-shaped temperature sensor record used by unit
/// tests here and in sensor decoding: m = 2, b = 0, r_exponent = -1
/// (raw 0xF), two's complement readings, ID string "CPU1".
#[cfg(test)]
pub(crate) fn sample_record() -> Vec<u8> {
    let mut raw = vec![0u8; 48];
    raw[0] = 0x34; // record_id LS byte
    raw[1] = 0x12;
    raw[2] = 0x51; // SDR version 1.5, packed BCD LS nibble first
    raw[3] = RECORD_TYPE_FULL_SENSOR;
    raw[4] = 43; // record length (body after header)
    raw[5] = 0x20; // owner id 0x10, type 0 (IPMB slave address)
    raw[6] = 0x01; // owner lun 1, channel 0
    raw[7] = 0x05; // sensor number
    raw[8] = 0x07; // entity id: system board
    raw[9] = 0x81; // entity instance 1, logical
    raw[10] = 0x7F; // sensor initialization
    raw[11] = 0x59; // capabilities
    raw[12] = 0x01; // sensor type: temperature
    raw[13] = 0x01; // event/reading type: threshold
    raw[20] = 0x80; // unit1: two's complement analog format
    raw[21] = 0x01; // unit2 base: degrees C
    raw[24] = 0x02; // m_ls
    raw[29] = 0xF0; // r_exponent 0xF (-1), b_exponent 0
    raw[47] = 0xC4; // id string: 8-bit ascii, length 4
    raw.extend_from_slice(b"CPU1");
    raw
}
