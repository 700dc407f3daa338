// Copyright (c) the JPEG Quality Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Maps a decoded quantization table onto the 0-100 quality scale by
//! comparing it coefficient by coefficient against its reference
//! table.

use crate::quant::{QuantTable, TABLE_COEFFICIENTS};

/// Scale-factor statistics of one table relative to its reference.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleStats {
    /// Mean of the per-position scale factors, in percent.
    pub mean_scale: f64,
    /// Mean of the squared scale factors.
    pub mean_scale_squared: f64,
    /// Every coefficient equals exactly 1.
    pub all_ones: bool,
}

impl ScaleStats {
    /// Gathers the scale factors of `table` against its reference.
    /// Returns `None` for classes with no reference table.
    pub fn gather(table: &QuantTable) -> Option<ScaleStats> {
        let reference = table.class.reference()?;
        let mut sum = 0.0;
        let mut sum_squared = 0.0;
        let mut all_ones = true;
        for (&value, &base) in table.values.iter().zip(reference.iter()) {
            let scale = 100.0 * f64::from(value) / f64::from(base);
            sum += scale;
            sum_squared += scale * scale;
            if value != 1 {
                all_ones = false;
            }
        }
        Some(ScaleStats {
            mean_scale: sum / TABLE_COEFFICIENTS as f64,
            mean_scale_squared: sum_squared / TABLE_COEFFICIENTS as f64,
            all_ones,
        })
    }

    /// Spread of the scale factors around their mean.
    pub fn variance(&self) -> f64 {
        self.mean_scale_squared - self.mean_scale * self.mean_scale
    }

    /// The quality factor, rounded to the nearest integer.
    ///
    /// An all-ones table quantizes nothing, so it short-circuits the
    /// formula to 100 even though its mean scale is nowhere near a
    /// boundary value.
    pub fn quality(&self) -> u8 {
        let quality = if self.all_ones {
            100.0
        } else if self.mean_scale <= 100.0 {
            (200.0 - self.mean_scale) / 2.0
        } else {
            5000.0 / self.mean_scale
        };
        (quality + 0.5) as u8
    }
}
