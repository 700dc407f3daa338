// Copyright (c) the JPEG Quality Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Quantization table model and the parser for the table units packed
//! into a DQT segment body.

use std::fmt;

use byteorder::{BigEndian, ByteOrder};

use crate::error::{Error, Result};

/// Number of coefficients in one quantization table (an 8x8 block).
pub const TABLE_COEFFICIENTS: usize = 64;

/// Size of one packed table unit: the index/precision byte plus 64
/// single-byte coefficients. A DQT body must be a whole number of
/// these.
pub const TABLE_UNIT_BYTES: usize = 1 + TABLE_COEFFICIENTS;

/// Standard luminance quantization table, in zig-zag scan order.
/// Used only as a quality yardstick, never for dequantization.
pub const STD_LUMINANCE: [u16; TABLE_COEFFICIENTS] = [
    16, 11, 12, 14, 12, 10, 16, 14, //
    13, 14, 18, 17, 16, 19, 24, 40, //
    26, 24, 22, 22, 24, 49, 35, 37, //
    29, 40, 58, 51, 61, 60, 57, 51, //
    56, 55, 64, 72, 92, 78, 64, 68, //
    87, 69, 55, 56, 80, 109, 81, 87, //
    95, 98, 103, 104, 103, 62, 77, 113, //
    121, 112, 100, 120, 92, 101, 103, 99,
];

/// Standard chrominance quantization table, in zig-zag scan order.
pub const STD_CHROMINANCE: [u16; TABLE_COEFFICIENTS] = [
    17, 18, 18, 24, 21, 24, 47, 26, //
    26, 47, 99, 66, 56, 66, 99, 99, //
    99, 99, 99, 99, 99, 99, 99, 99, //
    99, 99, 99, 99, 99, 99, 99, 99, //
    99, 99, 99, 99, 99, 99, 99, 99, //
    99, 99, 99, 99, 99, 99, 99, 99, //
    99, 99, 99, 99, 99, 99, 99, 99, //
    99, 99, 99, 99, 99, 99, 99, 99,
];

/// Which reference table a decoded quantization table is scored
/// against. Only destinations 0 and 1 have a reference; the rest are
/// parsed but never scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableClass {
    /// Destination 0. The only class whose score terminates a scan.
    Luminance,
    /// Destination 1. Scored for diagnostics only.
    Chrominance,
    /// Destinations 2..=15 have no reference table.
    Unscored(u8),
}

impl TableClass {
    pub fn from_index(index: u8) -> Self {
        match index {
            0 => TableClass::Luminance,
            1 => TableClass::Chrominance,
            other => TableClass::Unscored(other),
        }
    }

    /// The fixed reference table for this class, if it has one.
    pub fn reference(self) -> Option<&'static [u16; TABLE_COEFFICIENTS]> {
        match self {
            TableClass::Luminance => Some(&STD_LUMINANCE),
            TableClass::Chrominance => Some(&STD_CHROMINANCE),
            TableClass::Unscored(_) => None,
        }
    }
}

impl fmt::Display for TableClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableClass::Luminance => write!(f, "luminance"),
            TableClass::Chrominance => write!(f, "chrominance"),
            TableClass::Unscored(index) => write!(f, "table {index}"),
        }
    }
}

/// Coefficient precision as declared by the high nibble of the first
/// byte of a DQT segment body. Informational only: it never drives the
/// decode width of a table unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precision {
    Bits8,
    Bits16,
}

impl Precision {
    pub(crate) fn from_segment_byte(byte: u8) -> Self {
        if byte >> 4 == 0 {
            Precision::Bits8
        } else {
            Precision::Bits16
        }
    }

    pub fn bits(self) -> u8 {
        match self {
            Precision::Bits8 => 8,
            Precision::Bits16 => 16,
        }
    }
}

/// One decoded quantization table: the destination class and the 64
/// coefficients in zig-zag scan order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuantTable {
    pub class: TableClass,
    pub values: [u16; TABLE_COEFFICIENTS],
}

/// Iterates over the table units packed back to back into one DQT
/// segment body, decoding each unit as it is reached so the caller can
/// score tables in segment order.
pub struct DqtTables<'a> {
    body: &'a [u8],
    pos: usize,
    declared_precision: Precision,
}

impl<'a> DqtTables<'a> {
    /// The caller has already checked the declared segment length
    /// against [`TABLE_UNIT_BYTES`]; `body` may still be shorter than
    /// declared if the stream was truncated.
    pub fn new(body: &'a [u8]) -> Self {
        let declared_precision =
            Precision::from_segment_byte(body.first().copied().unwrap_or(0));
        DqtTables {
            body,
            pos: 0,
            declared_precision,
        }
    }

    /// Precision as labelled by the first byte of the whole segment
    /// body, not per unit.
    pub fn declared_precision(&self) -> Precision {
        self.declared_precision
    }

    fn next_table(&mut self) -> Result<QuantTable> {
        let index = self.body[self.pos] & 0x0f;
        self.pos += 1;
        // The decode width keys off the high nibble of the masked
        // index; the mask keeps that nibble zero, so units always
        // decode as single-byte values and `declared_precision` stays
        // a label.
        let wide = index >> 4 != 0;
        let step = if wide { 2 } else { 1 };
        if self.pos + TABLE_COEFFICIENTS > self.body.len() {
            return Err(Error::ShortTable);
        }
        let mut values = [0u16; TABLE_COEFFICIENTS];
        for value in values.iter_mut() {
            if self.pos + step > self.body.len() {
                break;
            }
            *value = if wide {
                BigEndian::read_u16(&self.body[self.pos..self.pos + 2])
            } else {
                u16::from(self.body[self.pos])
            };
            self.pos += step;
        }
        Ok(QuantTable {
            class: TableClass::from_index(index),
            values,
        })
    }
}

impl Iterator for DqtTables<'_> {
    type Item = Result<QuantTable>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.body.len() {
            return None;
        }
        Some(self.next_table())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Builds one 65-byte table unit with the given destination index.
    fn unit(index: u8, values: &[u16; TABLE_COEFFICIENTS]) -> Vec<u8> {
        let mut out = vec![index];
        out.extend(values.iter().map(|&v| v as u8));
        out
    }

    #[test]
    fn test_single_unit() {
        let body = unit(0, &STD_LUMINANCE);
        let tables: Vec<_> = DqtTables::new(&body).collect::<Result<_>>().unwrap();
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].class, TableClass::Luminance);
        assert_eq!(tables[0].values, STD_LUMINANCE);
    }

    #[test]
    fn test_packed_units_in_order() {
        let mut body = unit(1, &STD_CHROMINANCE);
        body.extend(unit(0, &STD_LUMINANCE));
        body.extend(unit(2, &[3; TABLE_COEFFICIENTS]));
        let tables: Vec<_> = DqtTables::new(&body).collect::<Result<_>>().unwrap();
        assert_eq!(tables.len(), 3);
        assert_eq!(tables[0].class, TableClass::Chrominance);
        assert_eq!(tables[1].class, TableClass::Luminance);
        assert_eq!(tables[2].class, TableClass::Unscored(2));
        assert_eq!(tables[2].values, [3; TABLE_COEFFICIENTS]);
    }

    #[test]
    fn test_high_index_has_no_reference() {
        assert!(TableClass::from_index(4).reference().is_none());
        assert!(TableClass::from_index(0).reference().is_some());
        assert!(TableClass::from_index(1).reference().is_some());
    }

    #[test]
    fn test_index_is_low_nibble_only() {
        // 0x31: declared 16-bit precision (high nibble 3), index 1.
        let body = unit(0x31, &[5; TABLE_COEFFICIENTS]);
        let parser = DqtTables::new(&body);
        assert_eq!(parser.declared_precision(), Precision::Bits16);
        let tables: Vec<_> = parser.collect::<Result<_>>().unwrap();
        // The declared precision does not change the decode width:
        // exactly one 65-byte unit, single-byte values.
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].class, TableClass::Chrominance);
        assert_eq!(tables[0].values, [5; TABLE_COEFFICIENTS]);
    }

    #[test]
    fn test_declared_precision_label() {
        assert_eq!(Precision::from_segment_byte(0x00).bits(), 8);
        assert_eq!(Precision::from_segment_byte(0x01).bits(), 8);
        assert_eq!(Precision::from_segment_byte(0x10).bits(), 16);
        assert_eq!(Precision::from_segment_byte(0xf0).bits(), 16);
    }

    #[test]
    fn test_truncated_unit_is_short_table() {
        let body = unit(0, &STD_LUMINANCE);
        let mut iter = DqtTables::new(&body[..40]);
        assert!(matches!(iter.next(), Some(Err(Error::ShortTable))));
    }

    #[test]
    fn test_empty_body_yields_no_tables() {
        assert!(DqtTables::new(&[]).next().is_none());
    }
}
