use std::ffi::OsStr;
use std::fs::File;
use std::io::prelude::*;
use std::io::{BufRead, BufReader, BufWriter};
use std::path::Path;

use anyhow::{Context, Result};
use flate2::Compression;
use flate2::read::MultiGzDecoder;
use flate2::write::GzEncoder;
use serde::de::DeserializeOwned;

fn is_gzipped(path: &Path) -> bool {
    path.extension() == Some(OsStr::new("gz"))
}

///
/// Get a reader for either a gzip'd or non-gzip'd file.
///
/// # Arguments
///
/// - path: path to the file to read
///
pub fn get_dynamic_reader(path: &Path) -> Result<BufReader<Box<dyn Read>>> {
    let file = File::open(path).with_context(|| format!("Failed to open file: {:?}", path))?;
    let file: Box<dyn Read> = match is_gzipped(path) {
        true => Box::new(MultiGzDecoder::new(file)),
        false => Box::new(file),
    };

    let reader = BufReader::new(file);

    Ok(reader)
}

/// Get a reader for either a gzipped, non-gzipped file, or stdin
///
/// # Arguments
///
/// - file_path: path to the file to read, or '-' for stdin
///
/// # Returns
///
/// A `BufReader` object for a given file path or stdin.
pub fn get_dynamic_reader_w_stdin(file_path_str: &str) -> Result<BufReader<Box<dyn Read>>> {
    if file_path_str == "-" {
        Ok(BufReader::new(Box::new(std::io::stdin()) as Box<dyn Read>))
    } else {
        let file_path = Path::new(file_path_str);
        get_dynamic_reader(file_path)
    }
}

///
/// Read a whole (possibly gzip'd) file into a string.
///
pub fn read_to_string_dynamic(path: &Path) -> Result<String> {
    let mut reader = get_dynamic_reader(path)?;
    let mut content = String::new();
    reader
        .read_to_string(&mut content)
        .with_context(|| format!("Failed to read file: {:?}", path))?;
    Ok(content)
}

///
/// Read a positional line-delimited JSON file: line `i` becomes element `i`.
///
/// Every line must parse; a trailing newline does not produce an extra element.
///
/// # Arguments
///
/// - path: path to the `.jsonl` (or `.jsonl.gz`) file
///
pub fn read_json_lines<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let reader = get_dynamic_reader(path)?;

    let mut items = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let item = serde_json::from_str(line.trim())
            .with_context(|| format!("Failed to parse line {} of {:?}", i + 1, path))?;
        items.push(item);
    }

    Ok(items)
}

///
/// Write text to a file, compressing it when the path ends in `.gz`.
/// Parent directories are created as needed.
///
pub fn write_dynamic(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = File::create(path).with_context(|| format!("Failed to create file: {:?}", path))?;
    match is_gzipped(path) {
        true => {
            let mut encoder = GzEncoder::new(BufWriter::new(file), Compression::best());
            encoder.write_all(content.as_bytes())?;
            encoder.finish()?.flush()?;
        }
        false => {
            let mut writer = BufWriter::new(file);
            writer.write_all(content.as_bytes())?;
            writer.flush()?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;
    use tempfile::tempdir;

    #[rstest]
    #[case("labels.jsonl")]
    #[case("nested/labels.jsonl.gz")]
    fn test_write_then_read(#[case] name: &str) {
        let dir = tempdir().unwrap();
        let path = dir.path().join(name);

        write_dynamic(&path, "[\"a\", \"b\"]\n[\"c\"]\n").unwrap();

        let content = read_to_string_dynamic(&path).unwrap();
        assert_eq!(content, "[\"a\", \"b\"]\n[\"c\"]\n");

        let lines: Vec<Vec<String>> = read_json_lines(&path).unwrap();
        assert_eq!(lines, vec![vec!["a".to_string(), "b".to_string()], vec!["c".to_string()]]);
    }

    #[rstest]
    fn test_read_missing_file() {
        let result = read_to_string_dynamic(Path::new("does/not/exist.jsonl"));
        assert_eq!(result.is_err(), true);
    }

    #[rstest]
    fn test_read_json_lines_reports_bad_line() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tokens.jsonl");
        write_dynamic(&path, "[\"a\"]\nnot json\n").unwrap();

        let err = read_json_lines::<Vec<String>>(&path).unwrap_err();
        assert_eq!(err.to_string().contains("line 2"), true);
    }
}
