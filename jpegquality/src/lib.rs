// Copyright (c) the JPEG Quality Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Estimates the quality factor (0-100) a JPEG encoder was configured
//! with, by scanning the compressed stream's quantization tables
//! instead of decoding any pixel data.
//!
//! The scan walks the marker stream, skips every segment except the
//! DQT segments, and scores the first luminance table it finds against
//! the standard reference tables.

#![deny(unsafe_code)]

pub mod error;
pub mod estimate;
pub mod marker;
pub mod quant;
pub mod reader;
pub mod scan;
pub mod util;

pub use error::{Error, Result};
pub use reader::QualityEstimate;
