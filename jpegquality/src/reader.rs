// Copyright (c) the JPEG Quality Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! The whole-stream scan: validate the signature, walk the marker
//! stream, and stop at the first luminance quantization table that
//! yields a score.

use std::io::{Cursor, Read, Seek};

use num_traits::FromPrimitive;

use crate::error::{Error, Result};
use crate::estimate::ScaleStats;
use crate::marker::Marker;
use crate::quant::{DqtTables, Precision, TableClass, TABLE_UNIT_BYTES};
use crate::scan::MarkerScanner;
use crate::util::tracing_wrappers::*;

/// The quality factor recovered from a JPEG stream.
///
/// Produced by a single scan over the stream; holds no reference to
/// it afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QualityEstimate {
    quality: u8,
    precision: Precision,
}

impl QualityEstimate {
    /// Validates the stream signature, then scans the marker stream
    /// until the first luminance quantization table produces a score.
    ///
    /// The stream is read to at most the end of that table's segment.
    /// A stream whose DQT segments carry only chrominance or
    /// higher-indexed tables is exhausted and rejected as
    /// [`Error::InvalidJpeg`].
    pub fn read<R: Read + Seek>(reader: R) -> Result<Self> {
        let mut scanner = MarkerScanner::new(reader);
        scanner.check_signature()?;
        Self::scan(&mut scanner)
    }

    /// Convenience constructor for in-memory streams.
    pub fn from_bytes(buf: &[u8]) -> Result<Self> {
        Self::read(Cursor::new(buf))
    }

    /// The estimated quality factor, 0-100. Pure accessor.
    pub fn quality(&self) -> u8 {
        self.quality
    }

    /// Coefficient precision as declared by the segment that produced
    /// the score. A label only; see [`DqtTables::declared_precision`].
    pub fn declared_precision(&self) -> Precision {
        self.precision
    }

    fn scan<R: Read + Seek>(scanner: &mut MarkerScanner<R>) -> Result<Self> {
        loop {
            let Some(code) = scanner.next_marker() else {
                // Marker stream exhausted without a luminance table.
                return Err(Error::InvalidJpeg);
            };
            let body_len = scanner.read_body_len()?;
            if Marker::from_u8(code) != Some(Marker::Dqt) {
                trace!("skipping segment ff{code:02x} ({body_len} bytes)");
                scanner.skip_body(body_len)?;
                continue;
            }
            if body_len % TABLE_UNIT_BYTES != 0 {
                return Err(Error::WrongTableSize(body_len));
            }
            let body = scanner.read_body(body_len)?;
            let tables = DqtTables::new(&body);
            let precision = tables.declared_precision();
            for table in tables {
                let table = table?;
                let Some(stats) = ScaleStats::gather(&table) else {
                    debug!("DQT: {} has no reference table, not scored", table.class);
                    continue;
                };
                let quality = stats.quality();
                debug!(
                    "DQT: {} ({}-bit): mean scale {:.4}, variance {:.4}, quality {}",
                    table.class,
                    precision.bits(),
                    stats.mean_scale,
                    stats.variance(),
                    quality
                );
                if table.class == TableClass::Luminance {
                    return Ok(QualityEstimate { quality, precision });
                }
            }
        }
    }
}
