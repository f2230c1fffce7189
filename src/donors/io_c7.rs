// Reading the raw C7 filings: candidate-data-raw/{city}/{candidate}/*.{csv,xlsx}

use calamine::{open_workbook, DataType, Reader, Xlsx};
use snafu::OptionExt;
use std::path::Path;

use crate::donors::{io_common::*, *};

/// The filings of one candidate.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct CandidateFilings {
    pub candidate: Candidate,
    pub files: Vec<PathBuf>,
}

fn is_filing(name: &str) -> bool {
    let n = name.to_lowercase();
    n.ends_with(".csv") || n.ends_with(".xlsx")
}

/// Walks the raw directory. Candidate folder names must be unique across cities,
/// since the contributions files are named after the candidate only.
pub fn discover_candidates(raw_root: &Path) -> DonorResult<Vec<CandidateFilings>> {
    let mut res: Vec<CandidateFilings> = Vec::new();
    for city_dir in list_dirs(raw_root)? {
        let city = file_name(&city_dir);
        for candidate_dir in list_dirs(&city_dir)? {
            let name = file_name(&candidate_dir);
            if let Some(other) = res.iter().find(|cf| cf.candidate.name == name) {
                return DuplicateCandidateSnafu {
                    name,
                    first_city: other.candidate.city.clone(),
                    second_city: city,
                }
                .fail();
            }
            let files = list_files(&candidate_dir, is_filing)?;
            debug!(
                "discover_candidates: {}/{}: {} files",
                city,
                name,
                files.len()
            );
            res.push(CandidateFilings {
                candidate: Candidate::new(&city, &name),
                files,
            });
        }
    }
    Ok(res)
}

/// Reads one filing, CSV (any delimiter) or Excel.
pub fn read_filing(path: &Path) -> DonorResult<Table> {
    if file_name(path).to_lowercase().ends_with(".xlsx") {
        read_excel_filing(path)
    } else {
        read_table_sniffed(path).map(|(t, _)| t)
    }
}

fn read_excel_filing(path: &Path) -> DonorResult<Table> {
    let path_s = path.display().to_string();
    info!("Attempting to read filing {:?}", path_s);
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu {
        path: path_s.clone(),
    })?;
    let wrange = workbook
        .worksheet_range_at(0)
        .context(EmptyExcelSnafu {
            path: path_s.clone(),
        })?
        .context(OpeningExcelSnafu {
            path: path_s.clone(),
        })?;
    let mut rows = wrange.rows();
    let header: Vec<String> = rows
        .next()
        .context(EmptyExcelSnafu { path: path_s })?
        .iter()
        .map(cell_to_string)
        .collect();
    debug!("read_excel_filing: header: {:?}", header);
    let data: Vec<Vec<String>> = rows
        .map(|r| r.iter().map(cell_to_string).collect())
        .filter(|r: &Vec<String>| r.iter().any(|c| !c.is_empty()))
        .collect();
    Ok(Table::new(header, data))
}

fn cell_to_string(cell: &DataType) -> String {
    match cell {
        DataType::String(s) => s.trim().to_string(),
        DataType::Float(f) => format_amount(*f),
        DataType::Int(i) => i.to_string(),
        DataType::Bool(b) => b.to_string(),
        DataType::DateTime(serial) => excel_serial_to_date(*serial)
            .map(|d| d.format("%m/%d/%Y").to_string())
            .unwrap_or_default(),
        DataType::Empty => "".to_string(),
        other => {
            warn!("cell_to_string: unreadable cell {:?}", other);
            "".to_string()
        }
    }
}

/// Merges all the filings of a candidate in one table.
/// Filings that cannot be read are left out.
pub fn read_candidate_filings(filings: &CandidateFilings) -> DonorResult<Table> {
    let mut tables: Vec<Table> = Vec::new();
    for f in filings.files.iter() {
        let t = match read_filing(f) {
            Ok(t) => t,
            Err(e) => {
                warn!("Skipping unreadable filing {:?}: {}", f, e);
                continue;
            }
        };
        if t.is_empty() {
            warn!("Skipping empty filing {:?}", f);
            continue;
        }
        tables.push(t);
    }
    Ok(Table::union(&tables))
}

/// Reads a contributions file as records of the given candidate.
pub fn load_contributions(
    path: &Path,
    candidate: &Candidate,
    race: Option<&Race>,
) -> DonorResult<Vec<ContributionRecord>> {
    let table = read_contributions_table(path)?;
    Ok(contributions_from_table(&table, candidate, race))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discovers_the_layout() {
        let dir = tempfile::tempdir().unwrap();
        let jane = dir.path().join("missoula").join("jane-doe");
        fs::create_dir_all(&jane).unwrap();
        fs::write(jane.join("q1.csv"), "First Name,Amount\nJo,5\n").unwrap();
        fs::write(jane.join("notes.txt"), "").unwrap();
        fs::create_dir_all(dir.path().join("helena").join("john-roe")).unwrap();

        let found = discover_candidates(dir.path()).unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].candidate, Candidate::new("helena", "john-roe"));
        assert!(found[0].files.is_empty());
        assert_eq!(found[1].candidate, Candidate::new("missoula", "jane-doe"));
        assert_eq!(found[1].files.len(), 1);
    }

    #[test]
    fn same_candidate_in_two_cities_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("helena").join("jane-doe")).unwrap();
        fs::create_dir_all(dir.path().join("missoula").join("jane-doe")).unwrap();
        let err = discover_candidates(dir.path()).unwrap_err();
        assert!(matches!(err, DonorError::DuplicateCandidate { .. }));
    }

    #[test]
    fn filings_with_different_delimiters_merge() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.csv");
        let b = dir.path().join("b.csv");
        fs::write(&a, "Last Name|Amount\nDoe|10\n").unwrap();
        fs::write(&b, "Amount;City;Last Name\n20;Helena;Roe\n").unwrap();
        let filings = CandidateFilings {
            candidate: Candidate::new("helena", "jane-doe"),
            files: vec![a, b],
        };
        let t = read_candidate_filings(&filings).unwrap();
        assert_eq!(t.header, vec!["Last Name", "Amount", "City"]);
        assert_eq!(t.rows.len(), 2);
        assert_eq!(t.rows[1], vec!["Roe", "20", "Helena"]);
    }

    fn xlsx_fixture() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("tests")
            .join("data")
            .join("xlsx")
            .join("c7-2025-q3.xlsx")
    }

    #[test]
    fn excel_filing_cells() {
        let t = read_filing(&xlsx_fixture()).unwrap();
        assert_eq!(t.header, vec!["Date Paid", "First Name", "Last Name", "Amount"]);
        // The blank third row is dropped.
        assert_eq!(
            t.rows,
            vec![
                vec!["03/10/2025", "Ann", "Lee", "25.50"],
                vec!["03/15/2025", "Jo", "Roe", "100"],
            ]
        );
    }

    #[test]
    fn excel_and_csv_filings_merge() {
        let dir = tempfile::tempdir().unwrap();
        let csv = dir.path().join("q4.csv");
        fs::write(&csv, "Last Name|Amount|City\nDoe|10|Helena\n").unwrap();
        let filings = CandidateFilings {
            candidate: Candidate::new("helena", "jane-doe"),
            files: vec![xlsx_fixture(), csv],
        };
        let t = read_candidate_filings(&filings).unwrap();
        assert_eq!(
            t.header,
            vec!["Date Paid", "First Name", "Last Name", "Amount", "City"]
        );
        assert_eq!(t.rows.len(), 3);
        assert_eq!(t.rows[0], vec!["03/10/2025", "Ann", "Lee", "25.50", ""]);
        assert_eq!(t.rows[2], vec!["", "", "Doe", "10", "Helena"]);
    }

    #[test]
    fn unreadable_filings_are_left_out() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("q1.csv");
        let cp1252 = dir.path().join("q2.csv");
        let broken = dir.path().join("q3.xlsx");
        fs::write(&good, "First Name,Amount\nJo,5\n").unwrap();
        fs::write(&cp1252, b"First Name,Amount\nJos\xe9,7\n").unwrap();
        fs::write(&broken, "not a workbook").unwrap();
        assert!(read_filing(&cp1252).is_err());
        assert!(read_filing(&broken).is_err());

        let filings = CandidateFilings {
            candidate: Candidate::new("helena", "jane-doe"),
            files: vec![good, cp1252, broken],
        };
        let t = read_candidate_filings(&filings).unwrap();
        assert_eq!(t.rows, vec![vec!["Jo", "5"]]);
    }
}
