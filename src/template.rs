//! Static field templates: the wire shape of one command payload.
//!
//! A template is an ordered list of named, bit-width-specified field
//! descriptors. Templates are compile-time constant data; consistency is
//! checked at first use (when an [`Obj`](crate::Obj) is bound to them).

use crate::error::{Error, Result};

/// Presence, length class, and packet-validity flags of one field.
///
/// The axes are independent: a field is REQUIRED or OPTIONAL, FIXED or
/// VARIABLE length, and may additionally be marked MAKES_PACKET_VALID
/// (typically the command-code and completion-code fields of a response).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldFlags(u8);

impl FieldFlags {
    /// The field must be present in a well-formed payload.
    pub const REQUIRED: FieldFlags = FieldFlags(0x01);
    /// The field may be absent from the wire image.
    pub const OPTIONAL: FieldFlags = FieldFlags(0x02);
    /// The field always occupies its declared width.
    pub const FIXED: FieldFlags = FieldFlags(0x04);
    /// The declared width is a maximum; the actual length is runtime data.
    pub const VARIABLE: FieldFlags = FieldFlags(0x08);
    /// Setting this field (and all required fields before it) establishes
    /// the object as a complete, well-formed packet.
    pub const MAKES_PACKET_VALID: FieldFlags = FieldFlags(0x10);

    /// Combine two flag sets.
    pub const fn or(self, other: FieldFlags) -> FieldFlags {
        FieldFlags(self.0 | other.0)
    }

    /// True when every bit of `other` is set in `self`.
    pub const fn contains(self, other: FieldFlags) -> bool {
        self.0 & other.0 == other.0
    }
}

/// One sub-field of a byte-level parent field, addressed as
/// `"parent.child"` (e.g. `sensor_owner_id.type`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubFieldSpec {
    /// Width in bits.
    pub bits: usize,
    /// Name unique within the parent's sub-template.
    pub name: &'static str,
}

impl SubFieldSpec {
    /// Declare a sub-field.
    pub const fn new(bits: usize, name: &'static str) -> Self {
        Self { bits, name }
    }
}

/// One field descriptor: width, name, flags, and an optional secondary
/// sub-template for dotted sub-field addressing.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    /// Declared width in bits (the maximum for VARIABLE fields).
    pub bits: usize,
    /// Name, unique within the template.
    pub name: &'static str,
    /// Presence/length/validity flags.
    pub flags: FieldFlags,
    /// Sub-fields packed inside this field, LSB first.
    pub sub: Option<&'static [SubFieldSpec]>,
}

impl FieldSpec {
    /// Declare a field with explicit flags.
    pub const fn new(bits: usize, name: &'static str, flags: FieldFlags) -> Self {
        Self {
            bits,
            name,
            flags,
            sub: None,
        }
    }

    /// A required fixed-length field.
    pub const fn required(bits: usize, name: &'static str) -> Self {
        Self::new(bits, name, FieldFlags::REQUIRED.or(FieldFlags::FIXED))
    }

    /// An optional fixed-length field.
    pub const fn optional(bits: usize, name: &'static str) -> Self {
        Self::new(bits, name, FieldFlags::OPTIONAL.or(FieldFlags::FIXED))
    }

    /// An optional variable-length field; `bits` is the declared maximum
    /// and must be a multiple of 8.
    pub const fn variable(bits: usize, name: &'static str) -> Self {
        Self::new(bits, name, FieldFlags::OPTIONAL.or(FieldFlags::VARIABLE))
    }

    /// Mark this field as establishing packet validity.
    pub const fn makes_packet_valid(self) -> Self {
        Self {
            flags: self.flags.or(FieldFlags::MAKES_PACKET_VALID),
            ..self
        }
    }

    /// Attach a sub-template for dotted sub-field addressing.
    pub const fn with_sub(self, sub: &'static [SubFieldSpec]) -> Self {
        Self {
            sub: Some(sub),
            ..self
        }
    }

    pub(crate) fn is_required(&self) -> bool {
        self.flags.contains(FieldFlags::REQUIRED)
    }

    pub(crate) fn is_variable(&self) -> bool {
        self.flags.contains(FieldFlags::VARIABLE)
    }

    pub(crate) fn is_makes_packet_valid(&self) -> bool {
        self.flags.contains(FieldFlags::MAKES_PACKET_VALID)
    }
}

/// An ordered, named, bit-precise schema for one command payload.
///
/// Field order determines wire position: a field's offset is the
/// cumulative effective length of all preceding fields.
#[derive(Debug)]
pub struct Template {
    fields: &'static [FieldSpec],
}

impl Template {
    /// Wrap a static field list. Consistency is validated at first use.
    pub const fn new(fields: &'static [FieldSpec]) -> Self {
        Self { fields }
    }

    /// The field descriptors in declaration order.
    pub fn fields(&self) -> &'static [FieldSpec] {
        self.fields
    }

    /// Index of the named top-level field.
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    /// Sum of the widths of all REQUIRED fields, in bits.
    pub fn required_bits(&self) -> usize {
        self.fields
            .iter()
            .filter(|f| f.is_required())
            .map(|f| f.bits)
            .sum()
    }

    /// Sum of all declared widths, counting VARIABLE fields at their
    /// declared maximum, in bits.
    pub fn max_bits(&self) -> usize {
        self.fields.iter().map(|f| f.bits).sum()
    }

    /// [`max_bits`](Self::max_bits) rounded up to whole bytes.
    pub fn max_len(&self) -> usize {
        self.max_bits().div_ceil(8)
    }

    /// Field-for-field equality: same field count, names, and widths.
    /// Used to check an object is bound to the template a fill routine
    /// expects.
    pub fn same_shape(&self, other: &Template) -> bool {
        self.fields.len() == other.fields.len()
            && self
                .fields
                .iter()
                .zip(other.fields)
                .all(|(a, b)| a.name == b.name && a.bits == b.bits)
    }

    /// Structural compatibility: for every field name present in both
    /// templates, bit-width and relative field order must match. False
    /// when the templates share no fields at all.
    pub fn compatible(&self, other: &Template) -> bool {
        let mut shared = 0usize;
        let mut last = None;
        for field in self.fields {
            let Some(j) = other.field_index(field.name) else {
                continue;
            };
            if other.fields[j].bits != field.bits {
                return false;
            }
            if last.is_some_and(|prev| j <= prev) {
                return false;
            }
            last = Some(j);
            shared += 1;
        }
        shared > 0
    }

    /// Consistency assertion run at first use. A malformed template is a
    /// programming error: fatal in debug builds, a recoverable
    /// [`Error::InternalError`] in release builds.
    pub(crate) fn validate(&self) -> Result<()> {
        if let Err(msg) = self.check() {
            debug_assert!(false, "malformed template: {msg}");
            return Err(Error::InternalError(msg));
        }
        Ok(())
    }

    fn check(&self) -> std::result::Result<(), &'static str> {
        if self.fields.is_empty() {
            return Err("template has no fields");
        }
        for (i, field) in self.fields.iter().enumerate() {
            if field.name.is_empty() {
                return Err("field with empty name");
            }
            if field.bits == 0 {
                return Err("named field with zero width");
            }
            if field.flags.contains(FieldFlags::REQUIRED)
                == field.flags.contains(FieldFlags::OPTIONAL)
            {
                return Err("field must be exactly one of REQUIRED or OPTIONAL");
            }
            if field.flags.contains(FieldFlags::FIXED) == field.is_variable() {
                return Err("field must be exactly one of FIXED or VARIABLE");
            }
            if field.is_variable() && field.bits % 8 != 0 {
                return Err("variable field width not a multiple of 8");
            }
            if field.name.contains('.') {
                return Err("top-level field name contains '.'");
            }
            if self.fields[..i].iter().any(|f| f.name == field.name) {
                return Err("duplicate field name");
            }
            if let Some(sub) = field.sub {
                if field.is_variable() || field.bits > 64 {
                    return Err("sub-template on a variable or over-wide field");
                }
                let mut total = 0;
                for (j, s) in sub.iter().enumerate() {
                    if s.name.is_empty() || s.bits == 0 {
                        return Err("malformed sub-field");
                    }
                    if sub[..j].iter().any(|p| p.name == s.name) {
                        return Err("duplicate sub-field name");
                    }
                    total += s.bits;
                }
                if total != field.bits {
                    return Err("sub-field widths do not sum to parent width");
                }
            }
        }
        Ok(())
    }
}
