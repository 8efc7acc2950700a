use crate::core::pbrt::Float;
use anyhow::{Context, Result};
use log::warn;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Read a text file of whitespace-separated floats, used for spectrum files
/// of alternating wavelength/value pairs. Lines starting with '#' are
/// comments; tokens that fail to parse are reported and skipped.
pub fn read_float_file(name: &str) -> Result<Vec<Float>> {
    let path = Path::new(name);
    let f = File::open(path).with_context(|| format!("Failed to open float file \"{}\"", name))?;
    let reader = BufReader::new(f);

    let mut values = Vec::new();

    for (n, l) in reader.lines().enumerate() {
        let line = l.with_context(|| format!("Failed to read float file \"{}\"", name))?;

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        for token in line.split_whitespace() {
            match token.parse::<Float>() {
                Ok(val) => values.push(val),
                Err(_) => warn!(
                    "Unexpected text found at line {} of float file \"{}\"",
                    n + 1,
                    name
                ),
            }
        }
    }

    Ok(values)
}
