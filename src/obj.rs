//! The runtime FIID object: an owned byte buffer bound to a template.

use std::cell::Cell;

use crate::bits::{copy_bits, read_bits, write_bits};
use crate::error::{Errnum, Error, Result};
use crate::observe;
use crate::template::{FieldSpec, Template};

/// A byte buffer bound to a [`Template`], with per-field fill tracking.
///
/// An object is bound to exactly one template for its lifetime; its
/// buffer is sized for the worst case (all optional fields present, all
/// variable fields at declared maximum). Individual fields are read and
/// written by name; whole wire images move through
/// [`set_all`](Obj::set_all) and [`get_all`](Obj::get_all).
///
/// Objects are meant to be short-lived: one per command invocation,
/// cleared or dropped when the exchange completes. They are `Send` but
/// deliberately not `Sync`; concurrent use is never shared.
#[derive(Debug, Clone)]
pub struct Obj {
    template: &'static Template,
    buf: Vec<u8>,
    /// Actual set length of each field in bits; 0 means unset.
    field_len: Vec<usize>,
    /// Cumulative declared widths, cached so objects without variable
    /// fields get O(1) offsets.
    decl_start: Vec<usize>,
    first_variable: Option<usize>,
    errnum: Cell<Errnum>,
}

enum Target {
    Field(usize),
    Sub {
        field: usize,
        bit_off: usize,
        bits: usize,
    },
}

impl Obj {
    /// Create an object bound to `template`, with a zeroed buffer and all
    /// fields unset. Fails with [`Error::InternalError`] when the
    /// template is inconsistent (debug builds assert instead).
    pub fn new(template: &'static Template) -> Result<Self> {
        template.validate()?;

        let fields = template.fields();
        let mut decl_start = Vec::with_capacity(fields.len());
        let mut off = 0usize;
        for field in fields {
            decl_start.push(off);
            off += field.bits;
        }

        Ok(Self {
            template,
            buf: vec![0u8; template.max_len()],
            field_len: vec![0usize; fields.len()],
            decl_start,
            first_variable: fields.iter().position(|f| f.is_variable()),
            errnum: Cell::new(Errnum::Success),
        })
    }

    /// The template this object is bound to.
    pub fn template(&self) -> &'static Template {
        self.template
    }

    /// The error code of the most recent operation on this object.
    pub fn errnum(&self) -> Errnum {
        self.errnum.get()
    }

    /// Current populated length in whole bytes (highest set field
    /// included, trailing unset optional fields excluded).
    pub fn len_bytes(&self) -> usize {
        self.populated_bits().div_ceil(8)
    }

    /// Zero the buffer and all fill state, keeping the template binding.
    /// Idempotent; used to reset a request object for reuse.
    pub fn clear(&mut self) {
        self.buf.fill(0);
        self.field_len.fill(0);
        self.errnum.set(Errnum::Success);
    }

    /// Store `value` into the named field (dotted names address
    /// sub-fields). The field's prior state is untouched on failure.
    pub fn set(&mut self, name: &str, value: u64) -> Result<()> {
        let result = self.set_inner(name, value);
        self.finish("set", name, result)
    }

    /// Store `value` into a sub-field without string parsing.
    pub fn set_sub(&mut self, parent: &str, child: &str, value: u64) -> Result<()> {
        let result = self
            .resolve_sub(parent, child)
            .and_then(|target| self.write_target(target, value));
        self.finish("set_sub", parent, result)
    }

    /// Read the named field (dotted names address sub-fields).
    pub fn get(&self, name: &str) -> Result<u64> {
        let result = self.get_inner(name);
        self.finish("get", name, result)
    }

    /// Read a sub-field without string parsing.
    pub fn get_sub(&self, parent: &str, child: &str) -> Result<u64> {
        let result = self
            .resolve_sub(parent, child)
            .and_then(|target| self.read_target(target));
        self.finish("get_sub", parent, result)
    }

    /// Store raw bytes into the named field. The field must start on a
    /// byte boundary; FIXED fields take exactly their declared width,
    /// VARIABLE fields any whole-byte length up to their maximum.
    pub fn set_data(&mut self, name: &str, bytes: &[u8]) -> Result<()> {
        let result = self.set_data_inner(name, bytes);
        self.finish("set_data", name, result)
    }

    /// Read the named field's raw bytes.
    pub fn get_data(&self, name: &str) -> Result<Vec<u8>> {
        let result = self.get_data_inner(name);
        self.finish("get_data", name, result)
    }

    /// Bulk-load an entire wire image, walking the template left to right
    /// and inferring the consumed length of each VARIABLE field. Fails
    /// with [`Error::IncompleteRecord`] when the input ends before a
    /// REQUIRED field (or mid-way through any fixed field), leaving the
    /// object unchanged.
    pub fn set_all(&mut self, raw: &[u8]) -> Result<()> {
        observe::dump_hex("set_all", raw);
        let result = self.set_all_inner(raw);
        self.finish("set_all", "", result)
    }

    /// Bulk-extract the wire image up to the highest set field. Trailing
    /// unset OPTIONAL fields are omitted; an unset REQUIRED field at or
    /// before the highest set field is an error.
    pub fn get_all(&self) -> Result<Vec<u8>> {
        let result = self.get_all_inner();
        if let Ok(bytes) = &result {
            observe::dump_hex("get_all", bytes);
        }
        self.finish("get_all", "", result)
    }

    /// True once every REQUIRED field up to and including the last field
    /// marked MAKES_PACKET_VALID has been set. False for templates
    /// without such a marker.
    pub fn packet_valid(&self) -> bool {
        let fields = self.template.fields();
        let Some(last) = fields.iter().rposition(|f| f.is_makes_packet_valid()) else {
            return false;
        };
        fields
            .iter()
            .enumerate()
            .take(last + 1)
            .all(|(i, f)| !f.is_required() || self.field_len[i] > 0)
    }

    /// Build a new object bound to `dest`, copying every by-name-matching
    /// field's current value. Fails with [`Error::NotIdentical`] when the
    /// templates share no fields or a shared field disagrees in width;
    /// `dest`-only fields stay zero and unset.
    pub fn copy_to(&self, dest: &'static Template) -> Result<Obj> {
        let result = self.copy_to_inner(dest);
        self.finish("copy_to", "", result)
    }

    fn finish<T>(&self, op: &'static str, field: &str, result: Result<T>) -> Result<T> {
        match &result {
            Ok(_) => self.errnum.set(Errnum::Success),
            Err(err) => {
                self.errnum.set(err.errnum());
                observe::trace_err(op, field, err);
            }
        }
        result
    }

    fn field(&self, idx: usize) -> &'static FieldSpec {
        &self.template.fields()[idx]
    }

    /// Effective length a field contributes to the offsets of its
    /// successors: declared width for FIXED fields (set or not), current
    /// set length for VARIABLE fields.
    fn effective_len(&self, idx: usize) -> usize {
        let field = self.field(idx);
        if field.is_variable() {
            self.field_len[idx]
        } else {
            field.bits
        }
    }

    fn effective_start(&self, idx: usize) -> usize {
        match self.first_variable {
            Some(v) if v < idx => (0..idx).map(|j| self.effective_len(j)).sum(),
            _ => self.decl_start[idx],
        }
    }

    fn populated_bits(&self) -> usize {
        let Some(highest) = self.field_len.iter().rposition(|&len| len > 0) else {
            return 0;
        };
        (0..=highest).map(|i| self.effective_len(i)).sum()
    }

    fn resolve(&self, name: &str) -> Result<Target> {
        match name.split_once('.') {
            Some((parent, child)) => self.resolve_sub(parent, child),
            None => self
                .template
                .field_index(name)
                .map(Target::Field)
                .ok_or_else(|| Error::FieldNotFound(name.to_string())),
        }
    }

    fn resolve_sub(&self, parent: &str, child: &str) -> Result<Target> {
        let not_found = || Error::FieldNotFound(format!("{parent}.{child}"));
        let field = self.template.field_index(parent).ok_or_else(not_found)?;
        let sub = self.field(field).sub.ok_or_else(not_found)?;
        let mut bit_off = 0;
        for spec in sub {
            if spec.name == child {
                return Ok(Target::Sub {
                    field,
                    bit_off,
                    bits: spec.bits,
                });
            }
            bit_off += spec.bits;
        }
        Err(not_found())
    }

    fn set_inner(&mut self, name: &str, value: u64) -> Result<()> {
        let target = self.resolve(name)?;
        self.write_target(target, value)
    }

    fn write_target(&mut self, target: Target, value: u64) -> Result<()> {
        match target {
            Target::Field(idx) => {
                let field = self.field(idx);
                if field.is_variable() {
                    return Err(Error::InvalidParameters(
                        "variable length field requires set_data",
                    ));
                }
                if field.bits > 64 {
                    return Err(Error::InvalidParameters(
                        "field wider than 64 bits requires set_data",
                    ));
                }
                if field.bits < 64 && value >> field.bits != 0 {
                    return Err(Error::FixedLengthFieldInvalid(field.name));
                }
                let start = self.effective_start(idx);
                write_bits(&mut self.buf, start, field.bits, value);
                self.field_len[idx] = field.bits;
                Ok(())
            }
            Target::Sub {
                field: idx,
                bit_off,
                bits,
            } => {
                let field = self.field(idx);
                if bits < 64 && value >> bits != 0 {
                    return Err(Error::FixedLengthFieldInvalid(field.name));
                }
                // Read-modify-write the whole parent so sibling sub-bits
                // survive, then mark the parent set.
                let start = self.effective_start(idx);
                let mut parent = read_bits(&self.buf, start, field.bits);
                let mask = if bits == 64 {
                    u64::MAX
                } else {
                    ((1u64 << bits) - 1) << bit_off
                };
                parent = (parent & !mask) | ((value << bit_off) & mask);
                write_bits(&mut self.buf, start, field.bits, parent);
                self.field_len[idx] = field.bits;
                Ok(())
            }
        }
    }

    fn get_inner(&self, name: &str) -> Result<u64> {
        let target = self.resolve(name)?;
        self.read_target(target)
    }

    fn read_target(&self, target: Target) -> Result<u64> {
        let idx = match &target {
            Target::Field(idx) | Target::Sub { field: idx, .. } => *idx,
        };
        let field = self.field(idx);
        if field.is_variable() || field.bits > 64 {
            return Err(Error::InvalidParameters(
                "wide or variable length field requires get_data",
            ));
        }
        if self.field_len[idx] == 0 {
            return Err(Error::DataNotAvailable(field.name.to_string()));
        }
        let start = self.effective_start(idx);
        let parent = read_bits(&self.buf, start, field.bits);
        match target {
            Target::Field(_) => Ok(parent),
            Target::Sub { bit_off, bits, .. } => {
                let mask = if bits == 64 {
                    u64::MAX
                } else {
                    (1u64 << bits) - 1
                };
                Ok((parent >> bit_off) & mask)
            }
        }
    }

    fn set_data_inner(&mut self, name: &str, bytes: &[u8]) -> Result<()> {
        let idx = self
            .template
            .field_index(name)
            .ok_or_else(|| Error::FieldNotFound(name.to_string()))?;
        let field = self.field(idx);
        let new_bits = bytes.len() * 8;

        if field.is_variable() {
            if new_bits > field.bits {
                return Err(Error::FixedLengthFieldInvalid(field.name));
            }
            // Resizing a variable field would shift every later field.
            if new_bits != self.field_len[idx]
                && self.field_len[idx + 1..].iter().any(|&len| len > 0)
            {
                return Err(Error::InvalidParameters(
                    "cannot resize variable field with later fields set",
                ));
            }
        } else {
            if field.bits % 8 != 0 {
                return Err(Error::NotByteAligned(field.name));
            }
            if new_bits != field.bits {
                return Err(Error::FixedLengthFieldInvalid(field.name));
            }
        }

        let start = self.effective_start(idx);
        if start % 8 != 0 {
            return Err(Error::NotByteAligned(field.name));
        }

        let byte_start = start / 8;
        self.buf[byte_start..byte_start + bytes.len()].copy_from_slice(bytes);
        self.field_len[idx] = new_bits;
        Ok(())
    }

    fn get_data_inner(&self, name: &str) -> Result<Vec<u8>> {
        let idx = self
            .template
            .field_index(name)
            .ok_or_else(|| Error::FieldNotFound(name.to_string()))?;
        let field = self.field(idx);
        let len = self.field_len[idx];
        if len == 0 {
            return Err(Error::DataNotAvailable(field.name.to_string()));
        }
        let start = self.effective_start(idx);
        if start % 8 != 0 || len % 8 != 0 {
            return Err(Error::NotByteAligned(field.name));
        }
        let byte_start = start / 8;
        Ok(self.buf[byte_start..byte_start + len / 8].to_vec())
    }

    fn set_all_inner(&mut self, raw: &[u8]) -> Result<()> {
        let total_bits = raw.len() * 8;
        if total_bits > self.template.max_bits() {
            return Err(Error::InvalidParameters(
                "input exceeds template maximum length",
            ));
        }

        // Stage lengths first so a mid-walk failure leaves the object
        // untouched.
        let fields = self.template.fields();
        let mut lens = vec![0usize; fields.len()];
        let mut consumed = 0usize;
        for (i, field) in fields.iter().enumerate() {
            let remaining = total_bits - consumed;
            let take = if field.is_variable() {
                remaining.min(field.bits)
            } else if remaining >= field.bits {
                field.bits
            } else if remaining == 0 && !field.is_required() {
                0
            } else {
                return Err(Error::IncompleteRecord);
            };
            lens[i] = take;
            consumed += take;
        }

        let mut buf = vec![0u8; self.template.max_len()];
        buf[..raw.len()].copy_from_slice(raw);
        self.buf = buf;
        self.field_len = lens;
        Ok(())
    }

    fn get_all_inner(&self) -> Result<Vec<u8>> {
        let fields = self.template.fields();
        let Some(highest) = self.field_len.iter().rposition(|&len| len > 0) else {
            return Ok(Vec::new());
        };
        let mut total = 0usize;
        for (i, field) in fields.iter().enumerate().take(highest + 1) {
            if field.is_required() && self.field_len[i] == 0 {
                return Err(Error::RequiredFieldMissing(field.name));
            }
            total += self.effective_len(i);
        }
        Ok(self.buf[..total.div_ceil(8)].to_vec())
    }

    fn copy_to_inner(&self, dest: &'static Template) -> Result<Obj> {
        dest.validate()?;

        let mut shared = 0usize;
        for field in dest.fields() {
            let Some(src_idx) = self.template.field_index(field.name) else {
                continue;
            };
            if self.field(src_idx).bits != field.bits {
                return Err(Error::NotIdentical);
            }
            shared += 1;
        }
        if shared == 0 {
            return Err(Error::NotIdentical);
        }

        let mut out = Obj::new(dest)?;
        // Walk in destination order so variable-field offsets stay
        // coherent as fields land.
        for (dst_idx, field) in dest.fields().iter().enumerate() {
            let Some(src_idx) = self.template.field_index(field.name) else {
                continue;
            };
            let len = self.field_len[src_idx];
            if len == 0 {
                continue;
            }
            let src_off = self.effective_start(src_idx);
            let dst_off = out.effective_start(dst_idx);
            copy_bits(&self.buf, src_off, &mut out.buf, dst_off, len);
            out.field_len[dst_idx] = len;
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::{FieldSpec, SubFieldSpec};

    static RESPONSE: Template = Template::new(&[
        FieldSpec::required(8, "cmd").makes_packet_valid(),
        FieldSpec::required(8, "comp_code").makes_packet_valid(),
        FieldSpec::required(1, "flag_a"),
        FieldSpec::required(1, "flag_b"),
        FieldSpec::required(6, "mode"),
        FieldSpec::optional(8, "extra"),
        FieldSpec::variable(64, "raw_data"),
    ]);

    static OWNER: Template = Template::new(&[
        FieldSpec::required(8, "cmd"),
        FieldSpec::required(8, "sensor_owner_id").with_sub(&[
            SubFieldSpec::new(1, "type"),
            SubFieldSpec::new(7, "id"),
        ]),
    ]);

    fn obj(template: &'static Template) -> Obj {
        Obj::new(template).expect("create object")
    }

    #[test]
    fn set_get_roundtrip_per_field() {
        let mut obj = obj(&RESPONSE);
        obj.set("cmd", 0x01).expect("set");
        obj.set("comp_code", 0x00).expect("set");
        obj.set("flag_a", 1).expect("set");
        obj.set("flag_b", 0).expect("set");
        obj.set("mode", 0b101010).expect("set");

        assert_eq!(obj.get("cmd").expect("get"), 0x01);
        assert_eq!(obj.get("comp_code").expect("get"), 0x00);
        assert_eq!(obj.get("flag_a").expect("get"), 1);
        assert_eq!(obj.get("flag_b").expect("get"), 0);
        assert_eq!(obj.get("mode").expect("get"), 0b101010);
        assert_eq!(obj.errnum(), Errnum::Success);
    }

    #[test]
    fn sub_byte_fields_compose_lsb_first() {
        let mut obj = obj(&RESPONSE);
        obj.set("cmd", 0x01).expect("set");
        obj.set("comp_code", 0x00).expect("set");
        obj.set("flag_a", 1).expect("set");
        obj.set("flag_b", 0).expect("set");
        obj.set("mode", 0b101010).expect("set");

        let bytes = obj.get_all().expect("get_all");
        assert_eq!(bytes, vec![0x01, 0x00, 0b1010_1001]);
    }

    #[test]
    fn setting_one_bit_field_leaves_neighbors_alone() {
        let mut obj = obj(&RESPONSE);
        obj.set("cmd", 0x01).expect("set");
        obj.set("comp_code", 0x00).expect("set");
        obj.set("mode", 0x3F).expect("set");
        obj.set("flag_b", 1).expect("set");
        obj.set("flag_a", 0).expect("set");
        assert_eq!(obj.get("mode").expect("get"), 0x3F);
        assert_eq!(obj.get("flag_b").expect("get"), 1);
    }

    #[test]
    fn width_boundary_is_enforced() {
        let mut obj = obj(&RESPONSE);
        assert_eq!(
            obj.set("mode", 1 << 6),
            Err(Error::FixedLengthFieldInvalid("mode"))
        );
        assert_eq!(obj.errnum(), Errnum::FixedLengthFieldInvalid);
        obj.set("mode", (1 << 6) - 1).expect("max value fits");
    }

    #[test]
    fn unknown_field_is_reported() {
        let mut obj = obj(&RESPONSE);
        assert!(matches!(
            obj.set("bogus", 1),
            Err(Error::FieldNotFound(_))
        ));
        assert!(matches!(obj.get("bogus"), Err(Error::FieldNotFound(_))));
    }

    #[test]
    fn unset_field_is_not_available() {
        let obj = obj(&RESPONSE);
        assert!(matches!(
            obj.get("extra"),
            Err(Error::DataNotAvailable(_))
        ));
        assert_eq!(obj.errnum(), Errnum::DataNotAvailable);
    }

    #[test]
    fn clear_is_idempotent() {
        let mut obj = obj(&RESPONSE);
        obj.set("cmd", 0x01).expect("set");
        obj.clear();
        let once = obj.get_all().expect("get_all");
        obj.clear();
        let twice = obj.get_all().expect("get_all");
        assert_eq!(once, twice);
        assert!(once.is_empty());
        assert!(matches!(obj.get("cmd"), Err(Error::DataNotAvailable(_))));
    }

    #[test]
    fn duplicate_preserves_buffer_and_fill_state() {
        let mut obj = obj(&RESPONSE);
        obj.set("cmd", 0x01).expect("set");
        obj.set("comp_code", 0x00).expect("set");
        let copy = obj.clone();
        assert_eq!(copy.get("cmd").expect("get"), 0x01);
        assert_eq!(copy.get_all().expect("get_all"), obj.get_all().expect("get_all"));
    }

    #[test]
    fn dotted_sub_fields_do_not_disturb_siblings() {
        let mut obj = obj(&OWNER);
        obj.set("sensor_owner_id", 0x00).expect("set");
        obj.set("sensor_owner_id.id", 0x2A).expect("set sub");
        obj.set("sensor_owner_id.type", 1).expect("set sub");
        assert_eq!(obj.get("sensor_owner_id.id").expect("get"), 0x2A);
        assert_eq!(obj.get("sensor_owner_id.type").expect("get"), 1);
        assert_eq!(obj.get("sensor_owner_id").expect("get"), (0x2A << 1) | 1);

        obj.set_sub("sensor_owner_id", "type", 0).expect("set sub");
        assert_eq!(obj.get_sub("sensor_owner_id", "id").expect("get"), 0x2A);
    }

    #[test]
    fn dotted_set_marks_parent_set() {
        let mut obj = obj(&OWNER);
        obj.set("sensor_owner_id.type", 1).expect("set sub");
        assert_eq!(obj.get("sensor_owner_id").expect("get"), 1);
    }

    #[test]
    fn set_all_infers_variable_length() {
        let mut obj = obj(&RESPONSE);
        obj.set_all(&[0x01, 0x00, 0xA9, 0x55, 0xDE, 0xAD])
            .expect("set_all");
        assert_eq!(obj.get("cmd").expect("get"), 0x01);
        assert_eq!(obj.get("mode").expect("get"), 0b101010);
        assert_eq!(obj.get("extra").expect("get"), 0x55);
        assert_eq!(obj.get_data("raw_data").expect("get_data"), vec![0xDE, 0xAD]);
        assert_eq!(obj.len_bytes(), 6);
    }

    #[test]
    fn set_all_roundtrips_bit_for_bit() {
        let frames: &[&[u8]] = &[
            &[0x01, 0x00, 0xA9],
            &[0x01, 0x00, 0xFF, 0x12],
            &[0x01, 0xC0, 0x00, 0x00, 0x01, 0x02, 0x03],
        ];
        for frame in frames {
            let mut obj = obj(&RESPONSE);
            obj.set_all(frame).expect("set_all");
            assert_eq!(&obj.get_all().expect("get_all"), frame);
        }
    }

    #[test]
    fn set_all_short_input_is_atomic() {
        let mut obj = obj(&RESPONSE);
        obj.set_all(&[0x01, 0x00, 0xA9]).expect("set_all");
        let before = obj.get_all().expect("get_all");

        // Two bytes end mid-way through the required bit fields.
        assert_eq!(obj.set_all(&[0x01, 0x00]), Err(Error::IncompleteRecord));
        assert_eq!(obj.errnum(), Errnum::IncompleteRecord);
        assert_eq!(obj.get_all().expect("get_all"), before);
    }

    #[test]
    fn set_all_rejects_oversized_input() {
        let mut obj = obj(&RESPONSE);
        let oversized = vec![0u8; RESPONSE.max_len() + 1];
        assert!(matches!(
            obj.set_all(&oversized),
            Err(Error::InvalidParameters(_))
        ));
    }

    #[test]
    fn trailing_variable_field_may_be_empty() {
        static TRAILING: Template = Template::new(&[
            FieldSpec::required(8, "cmd"),
            FieldSpec::variable(8192, "raw_data"),
        ]);
        let mut obj = Obj::new(&TRAILING).expect("create");
        obj.set_all(&[0x01]).expect("set_all");
        assert_eq!(obj.get_all().expect("get_all"), vec![0x01]);
        assert!(matches!(
            obj.get_data("raw_data"),
            Err(Error::DataNotAvailable(_))
        ));
    }

    #[test]
    fn get_all_requires_earlier_required_fields() {
        let mut obj = obj(&RESPONSE);
        obj.set("cmd", 0x01).expect("set");
        obj.set("mode", 0x01).expect("set");
        assert_eq!(
            obj.get_all(),
            Err(Error::RequiredFieldMissing("comp_code"))
        );
    }

    #[test]
    fn packet_valid_transitions() {
        let mut obj = obj(&RESPONSE);
        assert!(!obj.packet_valid());
        obj.set("cmd", 0x01).expect("set");
        assert!(!obj.packet_valid());
        obj.set("comp_code", 0x00).expect("set");
        assert!(obj.packet_valid());
        obj.clear();
        assert!(!obj.packet_valid());
    }

    #[test]
    fn packet_valid_false_without_marker() {
        let mut obj = obj(&OWNER);
        obj.set("cmd", 0x01).expect("set");
        assert!(!obj.packet_valid());
    }

    #[test]
    fn copy_to_overlapping_template() {
        static WIDER: Template = Template::new(&[
            FieldSpec::required(8, "cmd"),
            FieldSpec::required(8, "comp_code"),
            FieldSpec::required(16, "record_id"),
            FieldSpec::optional(8, "extra"),
        ]);
        let mut src = obj(&RESPONSE);
        src.set("cmd", 0x22).expect("set");
        src.set("comp_code", 0x00).expect("set");
        src.set("extra", 0x7E).expect("set");

        let dst = src.copy_to(&WIDER).expect("copy");
        assert_eq!(dst.get("cmd").expect("get"), 0x22);
        assert_eq!(dst.get("comp_code").expect("get"), 0x00);
        assert_eq!(dst.get("extra").expect("get"), 0x7E);
        assert!(matches!(
            dst.get("record_id"),
            Err(Error::DataNotAvailable(_))
        ));
    }

    #[test]
    fn copy_to_rejects_width_mismatch_and_disjoint() {
        static MISMATCH: Template = Template::new(&[FieldSpec::required(4, "cmd")]);
        static DISJOINT: Template = Template::new(&[FieldSpec::required(8, "unrelated")]);
        let mut src = obj(&RESPONSE);
        src.set("cmd", 0x01).expect("set");
        assert!(matches!(src.copy_to(&MISMATCH), Err(Error::NotIdentical)));
        assert!(matches!(src.copy_to(&DISJOINT), Err(Error::NotIdentical)));
    }

    #[test]
    fn variable_field_set_data_bounds() {
        let mut obj = obj(&RESPONSE);
        obj.set("cmd", 0x01).expect("set");
        obj.set("comp_code", 0x00).expect("set");
        obj.set("flag_a", 0).expect("set");
        obj.set("flag_b", 0).expect("set");
        obj.set("mode", 0).expect("set");
        obj.set("extra", 0).expect("set");

        obj.set_data("raw_data", &[1, 2, 3]).expect("set_data");
        assert_eq!(obj.get_data("raw_data").expect("get_data"), vec![1, 2, 3]);

        let too_long = vec![0u8; 9];
        assert_eq!(
            obj.set_data("raw_data", &too_long),
            Err(Error::FixedLengthFieldInvalid("raw_data"))
        );
    }

    #[test]
    fn set_data_rejects_unaligned_fields() {
        let mut obj = obj(&RESPONSE);
        assert_eq!(
            obj.set_data("flag_b", &[1]),
            Err(Error::NotByteAligned("flag_b"))
        );
    }
}
