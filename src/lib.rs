#![deny(unsafe_code)]
#![warn(missing_docs)]

//! A schema-driven, bit-precise codec for IPMI command payloads.
//!
//! Every IPMI command is declared as a flat table of named,
//! bit-width-specified fields (a [`Template`]); an [`Obj`] binds a byte
//! buffer to one template and packs or unpacks individual fields by
//! name, including dotted sub-fields inside a single byte. Whole wire
//! images move through [`Obj::set_all`] and [`Obj::get_all`], which
//! infer the runtime length of variable trailing payloads.
//!
//! The crate carries a representative command catalog under [`cmds`]
//! (chassis, event, SDR) and analog sensor reading decode under
//! [`sensor`]; transports, sessions, and CLI tooling live elsewhere and
//! exchange only packed byte buffers with this crate.

mod bits;
mod error;
mod obj;
mod observe;
mod template;

pub mod cmds;
pub mod sensor;

pub use crate::error::{Errnum, Error, Result};
pub use crate::obj::Obj;
pub use crate::template::{FieldFlags, FieldSpec, SubFieldSpec, Template};
