// Copyright (c) the JPEG Quality Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use jpegquality::QualityEstimate;

/// Prints the estimated encoder quality factor of JPEG files.
#[derive(Parser)]
#[command(version, about)]
struct Options {
    /// JPEG files to inspect.
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Only report files whose estimated quality is below this value.
    #[arg(long, value_name = "QUALITY")]
    threshold: Option<u8>,
}

fn estimate(path: &Path) -> jpegquality::Result<QualityEstimate> {
    let file = File::open(path)?;
    QualityEstimate::read(BufReader::new(file))
}

fn main() -> ExitCode {
    #[cfg(feature = "tracing-subscriber")]
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let options = Options::parse();
    let mut status = ExitCode::SUCCESS;
    for path in &options.files {
        match estimate(path) {
            Ok(estimate) => {
                let quality = estimate.quality();
                match options.threshold {
                    Some(threshold) if quality >= threshold => {}
                    _ => println!("{}: {}", path.display(), quality),
                }
            }
            Err(err) => {
                eprintln!("{}: {}", path.display(), err);
                status = ExitCode::FAILURE;
            }
        }
    }
    status
}
