//! Reading and writing parameter arrays
//!
//! Two on-disk layouts are supported:
//! - NumPy `.npy` files holding a 2-D little-endian `f8` or `f4` array
//! - plain text, one sample per line, values separated by whitespace or commas.
//!   Lines starting with `#` are comments; a `# names: a b c` comment names
//!   the columns.

use std::fs;
use std::path::Path;

use crate::error::LoadError;
use crate::model::ParameterTable;

const NPY_MAGIC: &[u8] = b"\x93NUMPY";
const NAMES_PREFIX: &str = "names:";

/// Load a parameter table from `path`, choosing the layout by file extension.
///
/// `names` overrides any names stored in the file; without either, default
/// names are used.
pub fn load_parameters(path: &Path, names: Option<&[String]>) -> Result<ParameterTable, LoadError> {
    let is_npy = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("npy"));

    let (rows, cols, data, stored_names) = if is_npy {
        let (rows, cols, data) = parse_npy(&fs::read(path)?)?;
        (rows, cols, data, None)
    } else {
        parse_text(&fs::read_to_string(path)?)?
    };

    let names = match (names, stored_names) {
        (Some(names), _) => names.to_vec(),
        (None, Some(stored)) => stored,
        (None, None) => ParameterTable::default_names(cols),
    };
    if names.len() != cols {
        return Err(LoadError::Format(format!(
            "{} column names given for {cols} columns",
            names.len()
        )));
    }

    let table = ParameterTable::from_flat(names, rows, data)?;
    tracing::info!(
        path = %path.display(),
        samples = table.len(),
        params = table.n_params(),
        "Loaded parameter table"
    );
    Ok(table)
}

/// Parse the text layout into (rows, cols, row-major data, names)
pub fn parse_text(
    content: &str,
) -> Result<(usize, usize, Vec<f64>, Option<Vec<String>>), LoadError> {
    let mut names = None;
    let mut data = Vec::new();
    let mut rows = 0;
    let mut cols = None;

    for (line_no, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(comment) = line.strip_prefix('#') {
            if let Some(list) = comment.trim().strip_prefix(NAMES_PREFIX) {
                names = Some(split_fields(list).map(str::to_string).collect::<Vec<_>>());
            }
            continue;
        }

        let before = data.len();
        for field in split_fields(line) {
            let value = field.parse::<f64>().map_err(|_| {
                LoadError::Format(format!("line {}: '{field}' is not a number", line_no + 1))
            })?;
            data.push(value);
        }

        let width = data.len() - before;
        match cols {
            None => cols = Some(width),
            Some(expected) if expected != width => {
                return Err(LoadError::Format(format!(
                    "line {}: {width} values, expected {expected}",
                    line_no + 1
                )));
            }
            Some(_) => {}
        }
        rows += 1;
    }

    let cols = cols.ok_or_else(|| LoadError::Format("no data rows".to_string()))?;
    Ok((rows, cols, data, names))
}

fn split_fields(line: &str) -> impl Iterator<Item = &str> {
    line.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|field| !field.is_empty())
}

/// Parse a `.npy` buffer into (rows, cols, row-major data)
pub fn parse_npy(bytes: &[u8]) -> Result<(usize, usize, Vec<f64>), LoadError> {
    let format_err = |msg: &str| LoadError::Format(msg.to_string());

    if bytes.len() < 10 || !bytes.starts_with(NPY_MAGIC) {
        return Err(format_err("missing NumPy magic string"));
    }

    let major = bytes[6];
    let (header_len, header_start) = match major {
        1 => (u16::from_le_bytes([bytes[8], bytes[9]]) as usize, 10),
        2 | 3 if bytes.len() >= 12 => (
            u32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]) as usize,
            12,
        ),
        _ => return Err(format_err("unsupported NumPy format version")),
    };
    let data_start = header_start + header_len;
    let header = bytes
        .get(header_start..data_start)
        .and_then(|h| std::str::from_utf8(h).ok())
        .ok_or_else(|| format_err("truncated header"))?;

    let descr = header_value(header, "descr")
        .map(|v| v.trim_matches(|c| c == '\'' || c == '"'))
        .ok_or_else(|| format_err("header has no descr"))?;
    let fortran_order = header_value(header, "fortran_order")
        .ok_or_else(|| format_err("header has no fortran_order"))?
        == "True";
    let shape = parse_shape(header).ok_or_else(|| format_err("header has no valid shape"))?;
    let &[rows, cols] = shape.as_slice() else {
        return Err(LoadError::Format(format!(
            "expected a 2-D array, found {} dimensions",
            shape.len()
        )));
    };

    let payload = &bytes[data_start..];
    let values: Vec<f64> = match descr {
        "<f8" => payload
            .chunks_exact(8)
            .map(|c| f64::from_le_bytes([c[0], c[1], c[2], c[3], c[4], c[5], c[6], c[7]]))
            .collect(),
        "<f4" => payload
            .chunks_exact(4)
            .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]) as f64)
            .collect(),
        other => {
            return Err(LoadError::Format(format!("unsupported dtype '{other}'")));
        }
    };
    let expected = rows
        .checked_mul(cols)
        .ok_or_else(|| LoadError::Format(format!("shape ({rows}, {cols}) is too large")))?;
    if values.len() != expected {
        return Err(LoadError::Format(format!(
            "shape ({rows}, {cols}) needs {expected} values, found {}",
            values.len()
        )));
    }

    let data = if fortran_order {
        let mut transposed = vec![0.0; values.len()];
        for col in 0..cols {
            for row in 0..rows {
                transposed[row * cols + col] = values[col * rows + row];
            }
        }
        transposed
    } else {
        values
    };

    Ok((rows, cols, data))
}

/// Raw text of the value stored under `key` in a NumPy header dict
fn header_value<'a>(header: &'a str, key: &str) -> Option<&'a str> {
    let start = header.find(&format!("'{key}'"))? + key.len() + 2;
    let rest = header[start..].trim_start().strip_prefix(':')?.trim_start();
    let end = rest.find([',', '}']).unwrap_or(rest.len());
    Some(rest[..end].trim())
}

fn parse_shape(header: &str) -> Option<Vec<usize>> {
    let start = header.find("'shape'")?;
    let rest = &header[start..];
    let open = rest.find('(')?;
    let close = rest.find(')')?;
    if close < open {
        return None;
    }
    rest[open + 1..close]
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse().ok())
        .collect()
}

/// Serialise a table in the text layout, names first
pub fn parameters_to_text(table: &ParameterTable) -> String {
    let mut out = format!("# {NAMES_PREFIX} {}\n", table.names().join(" "));
    for row in 0..table.len() {
        let line: Vec<String> = table.row(row).iter().map(f64::to_string).collect();
        out.push_str(&line.join(" "));
        out.push('\n');
    }
    out
}

/// Serialise a table as a version 1.0 `.npy` buffer of little-endian `f8`
pub fn parameters_to_npy(table: &ParameterTable) -> Vec<u8> {
    let mut header = format!(
        "{{'descr': '<f8', 'fortran_order': False, 'shape': ({}, {}), }}",
        table.len(),
        table.n_params()
    );
    // Magic (6) + version (2) + length (2) + header must end on a 64-byte boundary
    let unpadded = 10 + header.len() + 1;
    header.push_str(&" ".repeat(unpadded.next_multiple_of(64) - unpadded));
    header.push('\n');

    let mut out = Vec::with_capacity(10 + header.len() + table.as_flat().len() * 8);
    out.extend_from_slice(NPY_MAGIC);
    out.extend_from_slice(&[1, 0]);
    out.extend_from_slice(&(header.len() as u16).to_le_bytes());
    out.extend_from_slice(header.as_bytes());
    for value in table.as_flat() {
        out.extend_from_slice(&value.to_le_bytes());
    }
    out
}
