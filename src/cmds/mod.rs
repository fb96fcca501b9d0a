//! Representative IPMI command catalog.
//!
//! Each command ships a pair of templates (request/response) as static
//! data; the templates here are bit-exact against the IPMI wire format.
//! One generic fill/check engine serves every command, so per-command
//! helpers are thin declarative calls rather than hand-duplicated
//! procedures.

pub mod chassis;
pub mod event;
pub mod sdr;

use crate::error::{Error, Result};
use crate::obj::Obj;
use crate::template::Template;

/// Populate a request object: check the object is bound to the expected
/// template shape, clear it, set the command code, then set each listed
/// field in order.
pub fn fill_cmd(
    obj: &mut Obj,
    template: &'static Template,
    cmd: u8,
    fields: &[(&str, u64)],
) -> Result<()> {
    if !obj.template().same_shape(template) {
        return Err(Error::NotIdentical);
    }
    obj.clear();
    obj.set("cmd", u64::from(cmd))?;
    for (name, value) in fields {
        obj.set(name, *value)?;
    }
    Ok(())
}

/// Validate a decoded response object: the packet must be structurally
/// valid, echo the expected command code, and report a zero completion
/// code. A non-zero completion code surfaces as
/// [`Error::CompletionCode`].
pub fn check_cmd(obj: &Obj, expected_cmd: u8) -> Result<()> {
    if !obj.packet_valid() {
        return Err(Error::IncompleteRecord);
    }
    if obj.get("cmd")? != u64::from(expected_cmd) {
        return Err(Error::InvalidParameters("unexpected command code"));
    }
    let code = obj.get("comp_code")? as u8;
    if code != 0x00 {
        return Err(Error::CompletionCode { code });
    }
    Ok(())
}

/// Decode a received wire image against `template` and run the standard
/// response checks.
pub fn parse_response(template: &'static Template, raw: &[u8], expected_cmd: u8) -> Result<Obj> {
    let mut obj = Obj::new(template)?;
    obj.set_all(raw)?;
    check_cmd(&obj, expected_cmd)?;
    Ok(obj)
}

/// Map an unset-optional-field error to `None`, keeping other errors.
pub(crate) fn optional_field(result: Result<u64>) -> Result<Option<u64>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(Error::DataNotAvailable(_)) => Ok(None),
        Err(err) => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::FieldSpec;

    static RQ: Template = Template::new(&[
        FieldSpec::required(8, "cmd"),
        FieldSpec::required(4, "selector"),
        FieldSpec::required(4, "reserved"),
    ]);

    static RS: Template = Template::new(&[
        FieldSpec::required(8, "cmd").makes_packet_valid(),
        FieldSpec::required(8, "comp_code").makes_packet_valid(),
        FieldSpec::required(8, "value"),
    ]);

    #[test]
    fn fill_cmd_sets_command_and_fields() {
        let mut obj = Obj::new(&RQ).expect("create");
        fill_cmd(&mut obj, &RQ, 0x09, &[("selector", 0x5), ("reserved", 0)]).expect("fill");
        assert_eq!(obj.get_all().expect("get_all"), vec![0x09, 0x05]);
    }

    #[test]
    fn fill_cmd_rejects_foreign_template() {
        let mut obj = Obj::new(&RQ).expect("create");
        assert!(matches!(
            fill_cmd(&mut obj, &RS, 0x09, &[]),
            Err(Error::NotIdentical)
        ));
    }

    #[test]
    fn check_cmd_accepts_clean_response() {
        let obj = parse_response(&RS, &[0x09, 0x00, 0x42], 0x09).expect("parse");
        assert_eq!(obj.get("value").expect("get"), 0x42);
    }

    #[test]
    fn check_cmd_reports_completion_code() {
        let err = parse_response(&RS, &[0x09, 0xC1, 0x00], 0x09).expect_err("must fail");
        assert_eq!(err, Error::CompletionCode { code: 0xC1 });
    }

    #[test]
    fn check_cmd_rejects_wrong_command_echo() {
        let err = parse_response(&RS, &[0x0A, 0x00, 0x42], 0x09).expect_err("must fail");
        assert!(matches!(err, Error::InvalidParameters(_)));
    }

    #[test]
    fn check_cmd_rejects_incomplete_packet() {
        let mut obj = Obj::new(&RS).expect("create");
        obj.set("cmd", 0x09).expect("set");
        assert!(matches!(
            check_cmd(&obj, 0x09),
            Err(Error::IncompleteRecord)
        ));
    }
}
