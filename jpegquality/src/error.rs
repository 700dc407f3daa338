// Copyright (c) the JPEG Quality Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Signature mismatch, or the marker stream ran out before a
    /// luminance quantization table produced a score.
    #[error("Invalid JPEG marker stream")]
    InvalidJpeg,
    #[error("Segment length {0} is shorter than the length field itself")]
    ShortSegment(u16),
    #[error("Wrong size for quantization table: {0} bytes is not a whole number of 65-byte units")]
    WrongTableSize(usize),
    #[error("Quantization table truncated")]
    ShortTable,
    #[error("Read failed: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
