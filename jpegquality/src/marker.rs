// Copyright (c) the JPEG Quality Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use num_derive::FromPrimitive;

/// First byte of every marker pair.
pub const MARKER_PREFIX: u8 = 0xff;

/// The two bytes every JPEG stream starts with.
pub const SOI_SIGNATURE: [u8; 2] = [MARKER_PREFIX, Marker::Soi as u8];

/// The markers the scanner knows by name. Every other marker code is
/// opaque: its segment is framed by the declared length and skipped.
#[repr(u8)]
#[derive(Debug, FromPrimitive, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    /// Start of image
    Soi = 0xd8,
    /// End of image
    Eoi = 0xd9,
    /// Start of scan
    Sos = 0xda,
    /// Define quantization table(s)
    Dqt = 0xdb,
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_traits::FromPrimitive;

    #[test]
    fn test_known_markers_round_trip() {
        for marker in [Marker::Soi, Marker::Eoi, Marker::Sos, Marker::Dqt] {
            assert_eq!(Marker::from_u8(marker as u8), Some(marker));
        }
    }

    #[test]
    fn test_unknown_codes_are_opaque() {
        // APP0 and COM carry segments but have no named variant.
        assert_eq!(Marker::from_u8(0xe0), None);
        assert_eq!(Marker::from_u8(0xfe), None);
    }
}
