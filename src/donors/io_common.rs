// Primitives for reading and writing the delimited files of the pipeline.

use std::path::Path;

use csv::{QuoteStyle, ReaderBuilder, Terminator, WriterBuilder};

use crate::donors::*;

const SNIFF_BYTES: usize = 8192;
const SNIFF_LINES: usize = 5;
const CANDIDATE_DELIMITERS: [u8; 4] = [b',', b'|', b'\t', b';'];

/// Guesses the delimiter from the first non-blank lines of a sample.
///
/// The most frequent of `,`, `|`, tab and `;` wins, ties going to the first one
/// in that order. Defaults to `,`.
pub fn sniff_delimiter(sample: &str) -> u8 {
    let lines: Vec<&str> = sample
        .lines()
        .filter(|l| !l.trim().is_empty())
        .take(SNIFF_LINES)
        .collect();
    let mut best = (b',', 0usize);
    for d in CANDIDATE_DELIMITERS.iter() {
        let count: usize = lines
            .iter()
            .map(|l| l.bytes().filter(|b| b == d).count())
            .sum();
        if count > best.1 {
            best = (*d, count);
        }
    }
    best.0
}

/// The delimiter of the contributions files, decided from the header line alone.
pub fn header_delimiter(header_line: &str) -> u8 {
    if header_line.contains('|') {
        b'|'
    } else {
        b','
    }
}

fn sample_of(contents: &str) -> &str {
    if contents.len() <= SNIFF_BYTES {
        return contents;
    }
    let mut end = SNIFF_BYTES;
    while !contents.is_char_boundary(end) {
        end -= 1;
    }
    &contents[..end]
}

pub fn read_to_string(path: &Path) -> DonorResult<String> {
    fs::read_to_string(path).context(OpeningFileSnafu {
        path: path.display().to_string(),
    })
}

/// Parses delimited text. The first record is the header.
pub fn parse_table(contents: &str, delimiter: u8, path: &Path) -> DonorResult<Table> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(contents.as_bytes());
    let mut records: Vec<Vec<String>> = Vec::new();
    for (idx, rec) in rdr.records().enumerate() {
        let rec = rec.context(CsvLineParseSnafu {
            path: path.display().to_string(),
            lineno: idx + 1,
        })?;
        records.push(rec.iter().map(|s| s.to_string()).collect());
    }
    let mut iter = records.into_iter();
    let header = iter.next().unwrap_or_default();
    Ok(Table::new(header, iter.collect()))
}

/// Reads a file whose delimiter is not known in advance.
pub fn read_table_sniffed(path: &Path) -> DonorResult<(Table, u8)> {
    let contents = read_to_string(path)?;
    let delimiter = sniff_delimiter(sample_of(&contents));
    debug!(
        "read_table_sniffed: {:?} delimiter {:?}",
        path,
        delimiter as char
    );
    let table = parse_table(&contents, delimiter, path)?;
    Ok((table, delimiter))
}

/// Reads a contributions file: `|` delimited when the header contains a `|`.
pub fn read_contributions_table(path: &Path) -> DonorResult<Table> {
    let contents = read_to_string(path)?;
    let delimiter = header_delimiter(contents.lines().next().unwrap_or(""));
    parse_table(&contents, delimiter, path)
}

/// Reads one of the comma separated files produced by the pipeline itself.
pub fn read_table(path: &Path) -> DonorResult<Table> {
    let contents = read_to_string(path)?;
    parse_table(&contents, b',', path)
}

/// Writes a table with minimal quoting and `\n` line endings.
pub fn write_table(path: &Path, table: &Table, delimiter: u8) -> DonorResult<()> {
    let path_s = path.display().to_string();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).context(CreatingDirSnafu {
                path: parent.display().to_string(),
            })?;
        }
    }
    let mut wtr = WriterBuilder::new()
        .delimiter(delimiter)
        .quote_style(QuoteStyle::Necessary)
        .terminator(Terminator::Any(b'\n'))
        .flexible(true)
        .from_path(path)
        .context(CsvWriteSnafu {
            path: path_s.clone(),
        })?;
    wtr.write_record(&table.header).context(CsvWriteSnafu {
        path: path_s.clone(),
    })?;
    for row in table.rows.iter() {
        wtr.write_record(row).context(CsvWriteSnafu {
            path: path_s.clone(),
        })?;
    }
    wtr.flush().context(WritingFileSnafu { path: path_s })?;
    Ok(())
}

pub fn write_text(path: &Path, contents: &str) -> DonorResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).context(CreatingDirSnafu {
                path: parent.display().to_string(),
            })?;
        }
    }
    fs::write(path, contents).context(WritingFileSnafu {
        path: path.display().to_string(),
    })
}

fn list_entries(dir: &Path) -> DonorResult<Vec<PathBuf>> {
    let path_s = dir.display().to_string();
    ensure!(
        dir.is_dir(),
        MissingDirectorySnafu {
            path: path_s.clone()
        }
    );
    let mut res: Vec<PathBuf> = Vec::new();
    for entry in fs::read_dir(dir).context(OpeningFileSnafu {
        path: path_s.clone(),
    })? {
        let entry = entry.context(OpeningFileSnafu {
            path: path_s.clone(),
        })?;
        res.push(entry.path());
    }
    res.sort();
    Ok(res)
}

/// The files of a directory whose name satisfies `pred`, sorted by name.
pub fn list_files(dir: &Path, pred: impl Fn(&str) -> bool) -> DonorResult<Vec<PathBuf>> {
    Ok(list_entries(dir)?
        .into_iter()
        .filter(|p| p.is_file() && pred(&file_name(p)))
        .collect())
}

/// The subdirectories of a directory, sorted by name.
pub fn list_dirs(dir: &Path) -> DonorResult<Vec<PathBuf>> {
    Ok(list_entries(dir)?
        .into_iter()
        .filter(|p| p.is_dir())
        .collect())
}

pub fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default()
}

pub fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default()
}

pub fn is_csv(name: &str) -> bool {
    name.to_lowercase().ends_with(".csv")
}

/// Reads all the CSV files of a candidate directory, as (stem, table).
pub fn read_party_tables(candidate_dir: &Path) -> DonorResult<Vec<(String, Table)>> {
    let mut res: Vec<(String, Table)> = Vec::new();
    for p in list_files(candidate_dir, is_csv)? {
        res.push((file_stem(&p), read_table(&p)?));
    }
    Ok(res)
}
