//! Chassis commands (Chassis NetFn): capabilities, status, control,
//! identify.
//!
//! Field widths and order are bit-exact against the IPMI chassis command
//! wire format; request/response templates include the `cmd` echo byte
//! as the first field.

use crate::cmds::{fill_cmd, optional_field, parse_response};
use crate::error::Result;
use crate::obj::Obj;
use crate::template::{FieldSpec, Template};

/// `Get Chassis Capabilities` command code.
pub const CMD_GET_CHASSIS_CAPABILITIES: u8 = 0x00;
/// `Get Chassis Status` command code.
pub const CMD_GET_CHASSIS_STATUS: u8 = 0x01;
/// `Chassis Control` command code.
pub const CMD_CHASSIS_CONTROL: u8 = 0x02;
/// `Chassis Identify` command code.
pub const CMD_CHASSIS_IDENTIFY: u8 = 0x04;

/// `Get Chassis Capabilities` request.
pub static GET_CHASSIS_CAPABILITIES_RQ: Template =
    Template::new(&[FieldSpec::required(8, "cmd")]);

/// `Get Chassis Capabilities` response.
pub static GET_CHASSIS_CAPABILITIES_RS: Template = Template::new(&[
    FieldSpec::required(8, "cmd").makes_packet_valid(),
    FieldSpec::required(8, "comp_code").makes_packet_valid(),
    FieldSpec::required(1, "intrusion_sensor"),
    FieldSpec::required(1, "front_panel_lockout"),
    FieldSpec::required(1, "diagnostic_interrupt"),
    FieldSpec::required(1, "power_interlock"),
    FieldSpec::required(4, "reserved"),
    FieldSpec::required(8, "fru_info_device_address"),
    FieldSpec::required(8, "sdr_device_address"),
    FieldSpec::required(8, "sel_device_address"),
    FieldSpec::required(8, "system_management_device_address"),
    FieldSpec::optional(8, "bridge_device_address"),
]);

/// `Get Chassis Status` request.
pub static GET_CHASSIS_STATUS_RQ: Template = Template::new(&[FieldSpec::required(8, "cmd")]);

/// `Get Chassis Status` response. The final byte of front panel button
/// capabilities is optional on the wire.
pub static GET_CHASSIS_STATUS_RS: Template = Template::new(&[
    FieldSpec::required(8, "cmd").makes_packet_valid(),
    FieldSpec::required(8, "comp_code").makes_packet_valid(),
    FieldSpec::required(1, "power_is_on"),
    FieldSpec::required(1, "power_overload"),
    FieldSpec::required(1, "interlock"),
    FieldSpec::required(1, "power_fault"),
    FieldSpec::required(1, "power_control_fault"),
    FieldSpec::required(2, "power_restore_policy"),
    FieldSpec::required(1, "reserved1"),
    FieldSpec::required(1, "ac_failed"),
    FieldSpec::required(1, "power_down_caused_by_power_overload"),
    FieldSpec::required(1, "power_down_caused_by_power_interlock_being_activated"),
    FieldSpec::required(1, "power_down_caused_by_power_fault"),
    FieldSpec::required(1, "power_on_entered_via_ipmi"),
    FieldSpec::required(3, "reserved2"),
    FieldSpec::required(1, "chassis_intrusion_active"),
    FieldSpec::required(1, "front_panel_lockout_active"),
    FieldSpec::required(1, "drive_fault"),
    FieldSpec::required(1, "cooling_fan_fault_detected"),
    FieldSpec::required(2, "chassis_identify_state"),
    FieldSpec::required(1, "chassis_identify_command_and_state_info_supported"),
    FieldSpec::required(1, "reserved3"),
    FieldSpec::optional(1, "power_off_button_disabled"),
    FieldSpec::optional(1, "reset_button_disabled"),
    FieldSpec::optional(1, "diagnostic_interrupt_button_disabled"),
    FieldSpec::optional(1, "standby_button_disabled"),
    FieldSpec::optional(1, "power_off_button_disable_allowed"),
    FieldSpec::optional(1, "reset_button_disable_allowed"),
    FieldSpec::optional(1, "diagnostic_interrupt_button_disable_allowed"),
    FieldSpec::optional(1, "standby_button_disable_allowed"),
]);

/// `Chassis Control` request.
pub static CHASSIS_CONTROL_RQ: Template = Template::new(&[
    FieldSpec::required(8, "cmd"),
    FieldSpec::required(4, "chassis_control"),
    FieldSpec::required(4, "reserved"),
]);

/// `Chassis Control` response.
pub static CHASSIS_CONTROL_RS: Template = Template::new(&[
    FieldSpec::required(8, "cmd").makes_packet_valid(),
    FieldSpec::required(8, "comp_code").makes_packet_valid(),
]);

/// `Chassis Identify` request; both parameter bytes may be omitted.
pub static CHASSIS_IDENTIFY_RQ: Template = Template::new(&[
    FieldSpec::required(8, "cmd"),
    FieldSpec::optional(8, "identify_interval"),
    FieldSpec::optional(1, "force_identify"),
    FieldSpec::optional(7, "reserved"),
]);

/// `Chassis Identify` response.
pub static CHASSIS_IDENTIFY_RS: Template = Template::new(&[
    FieldSpec::required(8, "cmd").makes_packet_valid(),
    FieldSpec::required(8, "comp_code").makes_packet_valid(),
]);

/// Chassis control operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChassisControl {
    /// Power down the system.
    PowerDown,
    /// Power up the system.
    PowerUp,
    /// Power cycle the system.
    PowerCycle,
    /// Hard reset the system.
    HardReset,
    /// Pulse diagnostic interrupt.
    PulseDiagnostic,
    /// ACPI soft shutdown.
    AcpiSoft,
}

impl ChassisControl {
    pub(crate) fn as_u64(self) -> u64 {
        match self {
            Self::PowerDown => 0x00,
            Self::PowerUp => 0x01,
            Self::PowerCycle => 0x02,
            Self::HardReset => 0x03,
            Self::PulseDiagnostic => 0x04,
            Self::AcpiSoft => 0x05,
        }
    }
}

/// Fill a `Get Chassis Capabilities` request object.
pub fn fill_get_chassis_capabilities(obj: &mut Obj) -> Result<()> {
    fill_cmd(
        obj,
        &GET_CHASSIS_CAPABILITIES_RQ,
        CMD_GET_CHASSIS_CAPABILITIES,
        &[],
    )
}

/// Fill a `Get Chassis Status` request object.
pub fn fill_get_chassis_status(obj: &mut Obj) -> Result<()> {
    fill_cmd(obj, &GET_CHASSIS_STATUS_RQ, CMD_GET_CHASSIS_STATUS, &[])
}

/// Fill a `Chassis Control` request object.
pub fn fill_chassis_control(control: ChassisControl, obj: &mut Obj) -> Result<()> {
    fill_cmd(
        obj,
        &CHASSIS_CONTROL_RQ,
        CMD_CHASSIS_CONTROL,
        &[("chassis_control", control.as_u64()), ("reserved", 0)],
    )
}

/// Fill a `Chassis Identify` request object. `force_identify` is only
/// meaningful when an interval is given, matching the wire layout.
pub fn fill_chassis_identify(
    identify_interval: Option<u8>,
    force_identify: Option<bool>,
    obj: &mut Obj,
) -> Result<()> {
    fill_cmd(obj, &CHASSIS_IDENTIFY_RQ, CMD_CHASSIS_IDENTIFY, &[])?;
    if let Some(interval) = identify_interval {
        obj.set("identify_interval", u64::from(interval))?;
        if let Some(force) = force_identify {
            obj.set("force_identify", u64::from(force))?;
            obj.set("reserved", 0)?;
        }
    }
    Ok(())
}

/// Power restore policy reported by `Get Chassis Status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerRestorePolicy {
    /// Always remain off after AC loss.
    AlwaysOff,
    /// Restore previous power state after AC loss.
    Previous,
    /// Always power on after AC loss.
    AlwaysOn,
    /// Reserved or unknown value.
    Unknown(u8),
}

impl PowerRestorePolicy {
    fn from_bits(bits: u64) -> Self {
        match bits {
            0x00 => Self::AlwaysOff,
            0x01 => Self::Previous,
            0x02 => Self::AlwaysOn,
            other => Self::Unknown(other as u8),
        }
    }
}

/// Optional front panel button capabilities from `Get Chassis Status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrontPanelControls {
    /// Power off button is currently disabled.
    pub power_off_button_disabled: bool,
    /// Reset button is currently disabled.
    pub reset_button_disabled: bool,
    /// Diagnostic interrupt button is currently disabled.
    pub diagnostic_interrupt_button_disabled: bool,
    /// Standby button is currently disabled.
    pub standby_button_disabled: bool,
    /// Power off button disable is allowed.
    pub power_off_button_disable_allowed: bool,
    /// Reset button disable is allowed.
    pub reset_button_disable_allowed: bool,
    /// Diagnostic interrupt button disable is allowed.
    pub diagnostic_interrupt_button_disable_allowed: bool,
    /// Standby button disable is allowed.
    pub standby_button_disable_allowed: bool,
}

/// Parsed `Get Chassis Status` response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChassisStatus {
    /// System power state.
    pub power_is_on: bool,
    /// Power overload state.
    pub power_overload: bool,
    /// Power interlock state.
    pub interlock: bool,
    /// Main power fault state.
    pub power_fault: bool,
    /// Power control fault state.
    pub power_control_fault: bool,
    /// Power restore policy.
    pub power_restore_policy: PowerRestorePolicy,
    /// AC failed since last power event.
    pub ac_failed: bool,
    /// Last power down was caused by a power overload.
    pub power_down_caused_by_power_overload: bool,
    /// Last power down was caused by the power interlock.
    pub power_down_caused_by_power_interlock: bool,
    /// Last power down was caused by a power fault.
    pub power_down_caused_by_power_fault: bool,
    /// Last power on was commanded via IPMI.
    pub power_on_entered_via_ipmi: bool,
    /// Chassis intrusion state.
    pub chassis_intrusion_active: bool,
    /// Front panel lockout state.
    pub front_panel_lockout_active: bool,
    /// Drive fault state.
    pub drive_fault: bool,
    /// Cooling/fan fault state.
    pub cooling_fan_fault_detected: bool,
    /// Chassis identify state, when the BMC reports it.
    pub chassis_identify_state: u8,
    /// Front panel button capabilities, when the optional byte is present
    /// and non-zero.
    pub front_panel_controls: Option<FrontPanelControls>,
}

impl ChassisStatus {
    /// Extract a typed status from a decoded response object.
    pub fn from_obj(obj: &Obj) -> Result<Self> {
        let flag = |name: &str| -> Result<bool> { Ok(obj.get(name)? != 0) };

        let front_panel_controls = match optional_field(obj.get("power_off_button_disabled"))? {
            None => None,
            Some(_) => {
                let controls = FrontPanelControls {
                    power_off_button_disabled: flag("power_off_button_disabled")?,
                    reset_button_disabled: flag("reset_button_disabled")?,
                    diagnostic_interrupt_button_disabled: flag(
                        "diagnostic_interrupt_button_disabled",
                    )?,
                    standby_button_disabled: flag("standby_button_disabled")?,
                    power_off_button_disable_allowed: flag("power_off_button_disable_allowed")?,
                    reset_button_disable_allowed: flag("reset_button_disable_allowed")?,
                    diagnostic_interrupt_button_disable_allowed: flag(
                        "diagnostic_interrupt_button_disable_allowed",
                    )?,
                    standby_button_disable_allowed: flag("standby_button_disable_allowed")?,
                };
                // An all-zero byte means the BMC does not report button
                // state.
                if controls == FrontPanelControls::none() {
                    None
                } else {
                    Some(controls)
                }
            }
        };

        Ok(Self {
            power_is_on: flag("power_is_on")?,
            power_overload: flag("power_overload")?,
            interlock: flag("interlock")?,
            power_fault: flag("power_fault")?,
            power_control_fault: flag("power_control_fault")?,
            power_restore_policy: PowerRestorePolicy::from_bits(obj.get("power_restore_policy")?),
            ac_failed: flag("ac_failed")?,
            power_down_caused_by_power_overload: flag("power_down_caused_by_power_overload")?,
            power_down_caused_by_power_interlock: flag(
                "power_down_caused_by_power_interlock_being_activated",
            )?,
            power_down_caused_by_power_fault: flag("power_down_caused_by_power_fault")?,
            power_on_entered_via_ipmi: flag("power_on_entered_via_ipmi")?,
            chassis_intrusion_active: flag("chassis_intrusion_active")?,
            front_panel_lockout_active: flag("front_panel_lockout_active")?,
            drive_fault: flag("drive_fault")?,
            cooling_fan_fault_detected: flag("cooling_fan_fault_detected")?,
            chassis_identify_state: obj.get("chassis_identify_state")? as u8,
            front_panel_controls,
        })
    }
}

impl FrontPanelControls {
    fn none() -> Self {
        Self {
            power_off_button_disabled: false,
            reset_button_disabled: false,
            diagnostic_interrupt_button_disabled: false,
            standby_button_disabled: false,
            power_off_button_disable_allowed: false,
            reset_button_disable_allowed: false,
            diagnostic_interrupt_button_disable_allowed: false,
            standby_button_disable_allowed: false,
        }
    }
}

/// Decode a `Get Chassis Status` response wire image into a typed
/// status.
pub fn decode_chassis_status(raw: &[u8]) -> Result<ChassisStatus> {
    let obj = parse_response(&GET_CHASSIS_STATUS_RS, raw, CMD_GET_CHASSIS_STATUS)?;
    ChassisStatus::from_obj(&obj)
}

/// Completion-code-checked decode of a `Chassis Control` response.
pub fn decode_chassis_control(raw: &[u8]) -> Result<()> {
    parse_response(&CHASSIS_CONTROL_RS, raw, CMD_CHASSIS_CONTROL).map(|_| ())
}
