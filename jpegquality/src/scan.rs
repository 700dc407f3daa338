// Copyright (c) the JPEG Quality Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Low-level access to a marker-delimited stream: signature check,
//! marker scanning, and segment framing over any `Read + Seek` source.

use std::io::{ErrorKind, Read, Seek, SeekFrom};

use byteorder::{BigEndian, ReadBytesExt};

use crate::error::{Error, Result};
use crate::marker::{MARKER_PREFIX, SOI_SIGNATURE};

/// Walks a seekable byte stream one segment at a time. The scanner
/// never reads more than a segment's declared length ahead, so a
/// truncated stream surfaces as a short read instead of a hang.
pub struct MarkerScanner<R> {
    reader: R,
}

impl<R: Read + Seek> MarkerScanner<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    /// Rewinds to the start of the stream and checks the SOI
    /// signature. Consumes exactly the first two bytes.
    pub fn check_signature(&mut self) -> Result<()> {
        self.reader.seek(SeekFrom::Start(0))?;
        let mut signature = [0u8; 2];
        self.reader.read_exact(&mut signature)?;
        if signature != SOI_SIGNATURE {
            return Err(Error::InvalidJpeg);
        }
        Ok(())
    }

    /// Returns the identifying byte of the next marker, or `None` once
    /// the stream is exhausted. Exhaustion is not an error here; the
    /// caller decides whether running out of markers is fatal.
    ///
    /// Bytes are consumed in pairs. Fill pairs (`ff ff`, `ff 00`) and
    /// pairs that do not start with `ff` are skipped wholesale.
    pub fn next_marker(&mut self) -> Option<u8> {
        let mut pair = [0u8; 2];
        loop {
            if self.reader.read_exact(&mut pair).is_err() {
                return None;
            }
            if pair[0] == MARKER_PREFIX && pair[1] != 0xff && pair[1] != 0x00 {
                return Some(pair[1]);
            }
        }
    }

    /// Reads the 2-byte big-endian length that follows a marker and
    /// returns the body length. The declared length counts the two
    /// length bytes themselves, so anything below 2 is malformed.
    pub fn read_body_len(&mut self) -> Result<usize> {
        let declared = self.reader.read_u16::<BigEndian>()?;
        if declared < 2 {
            return Err(Error::ShortSegment(declared));
        }
        Ok(declared as usize - 2)
    }

    /// Skips over a segment body by seeking forward.
    pub fn skip_body(&mut self, len: usize) -> Result<()> {
        self.reader.seek(SeekFrom::Current(len as i64))?;
        Ok(())
    }

    /// Reads a segment body of up to `len` bytes. The length has
    /// already been validated against the declared segment length,
    /// which its 16-bit field caps at 65533, so the allocation is
    /// bounded no matter what the stream advertises.
    ///
    /// A stream that ends mid-body yields the bytes that were
    /// available; a stream with no body bytes at all is a read
    /// failure.
    pub fn read_body(&mut self, len: usize) -> Result<Vec<u8>> {
        let mut body = vec![0u8; len];
        let mut filled = 0;
        while filled < len {
            match self.reader.read(&mut body[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
        if filled == 0 && len > 0 {
            return Err(Error::Io(ErrorKind::UnexpectedEof.into()));
        }
        body.truncate(filled);
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn scanner(bytes: &[u8]) -> MarkerScanner<Cursor<&[u8]>> {
        MarkerScanner::new(Cursor::new(bytes))
    }

    #[test]
    fn test_signature_accepted() {
        let mut s = scanner(&[0xff, 0xd8, 0xff, 0xd9]);
        assert!(s.check_signature().is_ok());
    }

    #[test]
    fn test_signature_rejected() {
        for bad in [[0x00u8, 0x00], [0xff, 0xd9], [0x89, 0x50]] {
            let mut s = scanner(&bad);
            assert!(matches!(s.check_signature(), Err(Error::InvalidJpeg)));
        }
    }

    #[test]
    fn test_truncated_signature_is_read_failure() {
        let mut s = scanner(&[0xff]);
        assert!(matches!(s.check_signature(), Err(Error::Io(_))));
    }

    #[test]
    fn test_next_marker_skips_fill_bytes() {
        // Two fill pairs, then a real marker.
        let mut s = scanner(&[0xff, 0xff, 0xff, 0x00, 0xff, 0xdb]);
        assert_eq!(s.next_marker(), Some(0xdb));
    }

    #[test]
    fn test_next_marker_skips_non_marker_pairs() {
        let mut s = scanner(&[0x12, 0x34, 0xab, 0xcd, 0xff, 0xc0]);
        assert_eq!(s.next_marker(), Some(0xc0));
    }

    #[test]
    fn test_next_marker_none_at_end_of_stream() {
        let mut s = scanner(&[0x12, 0x34]);
        assert_eq!(s.next_marker(), None);
        // An odd trailing byte cannot form a pair either.
        let mut s = scanner(&[0xff]);
        assert_eq!(s.next_marker(), None);
    }

    #[test]
    fn test_body_len_subtracts_length_field() {
        let mut s = scanner(&[0x00, 0x43]);
        assert_eq!(s.read_body_len().unwrap(), 65);
    }

    #[test]
    fn test_body_len_below_two_is_short_segment() {
        for declared in [0u16, 1] {
            let bytes = declared.to_be_bytes();
            let mut s = scanner(&bytes);
            assert!(matches!(
                s.read_body_len(),
                Err(Error::ShortSegment(d)) if d == declared
            ));
        }
    }

    #[test]
    fn test_read_body_tolerates_truncation() {
        let mut s = scanner(&[1, 2, 3]);
        let body = s.read_body(10).unwrap();
        assert_eq!(body, vec![1, 2, 3]);
    }

    #[test]
    fn test_read_body_with_no_bytes_is_read_failure() {
        let mut s = scanner(&[]);
        assert!(matches!(s.read_body(10), Err(Error::Io(_))));
    }

    #[test]
    fn test_read_body_empty_segment() {
        let mut s = scanner(&[]);
        assert_eq!(s.read_body(0).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn test_skip_body_advances_past_segment() {
        let mut s = scanner(&[0xaa, 0xbb, 0xff, 0xe1]);
        s.skip_body(2).unwrap();
        assert_eq!(s.next_marker(), Some(0xe1));
    }
}
