//! Analog sensor reading decode.
//!
//! A Full Sensor Record carries the coefficients of the IPMI linear
//! conversion `value = ((m * raw) + (b * 10^b_exponent)) * 10^r_exponent`.
//! The exponents are 4-bit two's complement fields and `m`/`b` are 10-bit
//! two's complement values split across two fields each; the sign
//! extension below is deliberately per-field-width rather than a generic
//! helper, because it is only correct for these declared widths.

use crate::error::{Error, Result};
use crate::obj::Obj;

/// Linear conversion (the only linearization this crate decodes).
pub const LINEARIZATION_LINEAR: u8 = 0x00;

/// Interpretation of the raw 8-bit sensor reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalogDataFormat {
    /// Unsigned reading.
    Unsigned,
    /// 1's complement signed reading.
    OnesComplement,
    /// 2's complement signed reading.
    TwosComplement,
    /// The sensor provides no analog reading.
    NonAnalog,
}

impl AnalogDataFormat {
    /// Decode the 2-bit `sensor_unit1.analog_data_format` field.
    pub fn from_bits(bits: u64) -> Result<Self> {
        match bits {
            0x00 => Ok(Self::Unsigned),
            0x01 => Ok(Self::OnesComplement),
            0x02 => Ok(Self::TwosComplement),
            0x03 => Ok(Self::NonAnalog),
            _ => Err(Error::InvalidParameters("analog data format out of range")),
        }
    }
}

/// Conversion coefficients extracted from a Full Sensor Record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecodingCoefficients {
    /// Result exponent (4-bit two's complement on the wire).
    pub r_exponent: i8,
    /// Offset exponent (4-bit two's complement on the wire).
    pub b_exponent: i8,
    /// Multiplier (10-bit two's complement on the wire).
    pub m: i16,
    /// Offset (10-bit two's complement on the wire).
    pub b: i16,
    /// Linearization code.
    pub linearization: u8,
    /// Raw reading interpretation.
    pub analog_data_format: AnalogDataFormat,
}

/// Extract the decoding coefficients from a Full Sensor Record object.
pub fn decoding_coefficients(record: &Obj) -> Result<DecodingCoefficients> {
    let mut r_exponent = record.get("r_exponent")? as i8;
    if r_exponent & 0x08 != 0 {
        r_exponent = (r_exponent as u8 | 0xF0) as i8;
    }

    let mut b_exponent = record.get("b_exponent")? as i8;
    if b_exponent & 0x08 != 0 {
        b_exponent = (b_exponent as u8 | 0xF0) as i8;
    }

    let m_ls = record.get("m_ls")?;
    let m_ms = record.get("m_ms")?;
    let mut m = (m_ls | ((m_ms & 0x3) << 8)) as i16;
    if m & 0x200 != 0 {
        m = (m as u16 | 0xFE00) as i16;
    }

    let b_ls = record.get("b_ls")?;
    let b_ms = record.get("b_ms")?;
    let mut b = (b_ls | ((b_ms & 0x3) << 8)) as i16;
    if b & 0x200 != 0 {
        b = (b as u16 | 0xFE00) as i16;
    }

    Ok(DecodingCoefficients {
        r_exponent,
        b_exponent,
        m,
        b,
        linearization: record.get("linearization")? as u8,
        analog_data_format: AnalogDataFormat::from_bits(
            record.get("sensor_unit1.analog_data_format")?,
        )?,
    })
}

/// Decode one raw sensor reading. Returns `None` when the sensor
/// declares no analog reading; fails for linearizations other than
/// linear.
pub fn decode_sensor_reading(
    coefficients: &DecodingCoefficients,
    raw: u8,
) -> Result<Option<f64>> {
    if coefficients.linearization != LINEARIZATION_LINEAR {
        return Err(Error::Unsupported("non-linear sensor linearization"));
    }

    let reading = match coefficients.analog_data_format {
        AnalogDataFormat::NonAnalog => return Ok(None),
        AnalogDataFormat::Unsigned => i32::from(raw),
        AnalogDataFormat::OnesComplement => {
            if raw & 0x80 != 0 {
                -i32::from(raw ^ 0xFF)
            } else {
                i32::from(raw)
            }
        }
        AnalogDataFormat::TwosComplement => i32::from(raw as i8),
    };

    let m = f64::from(coefficients.m);
    let b = f64::from(coefficients.b);
    let value = (m * f64::from(reading) + b * 10f64.powi(i32::from(coefficients.b_exponent)))
        * 10f64.powi(i32::from(coefficients.r_exponent));
    Ok(Some(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cmds::sdr::{parse_full_sensor_record, sample_record};

    #[test]
    fn coefficients_from_sample_record() {
        let record = parse_full_sensor_record(&sample_record()).expect("parse");
        let coefficients = decoding_coefficients(&record).expect("coefficients");
        assert_eq!(coefficients.m, 2);
        assert_eq!(coefficients.b, 0);
        assert_eq!(coefficients.r_exponent, -1);
        assert_eq!(coefficients.b_exponent, 0);
        assert_eq!(coefficients.linearization, LINEARIZATION_LINEAR);
        assert_eq!(
            coefficients.analog_data_format,
            AnalogDataFormat::TwosComplement
        );
    }

    #[test]
    fn four_bit_exponent_sign_extension() {
        // Raw nibble values 0x8..0xF are negative in 4-bit two's
        // complement.
        let cases = [
            (0x0u8, 0i8),
            (0x7, 7),
            (0x8, -8),
            (0xF, -1),
        ];
        for (raw, expected) in cases {
            let mut value = raw as i8;
            if value & 0x08 != 0 {
                value = (value as u8 | 0xF0) as i8;
            }
            assert_eq!(value, expected, "raw nibble {raw:#x}");
        }
    }

    #[test]
    fn ten_bit_m_sign_extension() {
        let record = parse_full_sensor_record(&{
            let mut raw = sample_record();
            raw[24] = 0xFE; // m_ls
            raw[25] = 0xC0; // m_ms = 0b11 in the top 2 bits
            raw
        })
        .expect("parse");
        let coefficients = decoding_coefficients(&record).expect("coefficients");
        // 10-bit 0x3FE is -2.
        assert_eq!(coefficients.m, -2);
    }

    #[test]
    fn linear_decode_formula() {
        let coefficients = DecodingCoefficients {
            r_exponent: -1,
            b_exponent: 0,
            m: 2,
            b: 0,
            linearization: LINEARIZATION_LINEAR,
            analog_data_format: AnalogDataFormat::TwosComplement,
        };
        let value = decode_sensor_reading(&coefficients, 0x80)
            .expect("decode")
            .expect("analog");
        assert!((value - (-25.6)).abs() < 1e-9);

        let value = decode_sensor_reading(&coefficients, 50)
            .expect("decode")
            .expect("analog");
        assert!((value - 10.0).abs() < 1e-9);
    }

    #[test]
    fn b_offset_scales_by_its_exponent() {
        let coefficients = DecodingCoefficients {
            r_exponent: 0,
            b_exponent: 1,
            m: 1,
            b: 5,
            linearization: LINEARIZATION_LINEAR,
            analog_data_format: AnalogDataFormat::Unsigned,
        };
        let value = decode_sensor_reading(&coefficients, 10)
            .expect("decode")
            .expect("analog");
        assert!((value - 60.0).abs() < 1e-9);
    }

    #[test]
    fn ones_complement_readings() {
        let coefficients = DecodingCoefficients {
            r_exponent: 0,
            b_exponent: 0,
            m: 1,
            b: 0,
            linearization: LINEARIZATION_LINEAR,
            analog_data_format: AnalogDataFormat::OnesComplement,
        };
        let value = decode_sensor_reading(&coefficients, 0xFE)
            .expect("decode")
            .expect("analog");
        assert!((value - (-1.0)).abs() < 1e-9);
    }

    #[test]
    fn non_analog_sensor_yields_no_reading() {
        let coefficients = DecodingCoefficients {
            r_exponent: 0,
            b_exponent: 0,
            m: 1,
            b: 0,
            linearization: LINEARIZATION_LINEAR,
            analog_data_format: AnalogDataFormat::NonAnalog,
        };
        assert_eq!(decode_sensor_reading(&coefficients, 0x42).expect("decode"), None);
    }

    #[test]
    fn non_linear_linearization_is_unsupported() {
        let coefficients = DecodingCoefficients {
            r_exponent: 0,
            b_exponent: 0,
            m: 1,
            b: 0,
            linearization: 0x07, // ln
            analog_data_format: AnalogDataFormat::Unsigned,
        };
        assert!(matches!(
            decode_sensor_reading(&coefficients, 1),
            Err(Error::Unsupported(_))
        ));
    }
}
