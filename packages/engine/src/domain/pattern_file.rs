//! Pattern files
//!
//! Plain text, one live cell per line as `row col` or `row,col`.
//! Blank lines and lines starting with `#` or `!` are ignored.

use std::fs;
use std::path::Path;

use crate::core::error::{EngineError, EngineResult};

use super::patterns::Pattern;

pub fn parse_pattern(name: &str, text: &str) -> EngineResult<Pattern> {
    let mut cells = Vec::new();
    for (line_no, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
            continue;
        }
        cells.push(parse_line(line_no + 1, line)?);
    }
    Ok(Pattern::new(name, cells))
}

pub fn read_pattern_file(path: &Path) -> EngineResult<Pattern> {
    let text = fs::read_to_string(path)?;
    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    parse_pattern(&name, &text)
}

fn parse_line(line_no: usize, line: &str) -> EngineResult<(u32, u32)> {
    let mut parts = line
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty());

    let row = parts
        .next()
        .ok_or_else(|| EngineError::malformed(line_no, "missing row"))?;
    let col = parts
        .next()
        .ok_or_else(|| EngineError::malformed(line_no, "missing column"))?;
    if parts.next().is_some() {
        return Err(EngineError::malformed(line_no, "expected exactly two values"));
    }

    let row = row
        .parse::<u32>()
        .map_err(|e| EngineError::malformed(line_no, format!("row {row:?}: {e}")))?;
    let col = col
        .parse::<u32>()
        .map_err(|e| EngineError::malformed(line_no, format!("column {col:?}: {e}")))?;
    Ok((row, col))
}
