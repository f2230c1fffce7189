use log::{debug, info, warn};

use snafu::{prelude::*, Snafu};

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::json;
use serde_json::Value as JSValue;
use text_diff::print_diff;

pub use donor_analysis::*;

use crate::args::{Args, Command};

pub mod config_reader;
pub mod io_c7;
pub mod io_common;
pub mod io_ftm;

use config_reader::*;
use io_c7::*;
use io_common::*;
use io_ftm::*;

#[derive(Debug, Snafu)]
pub enum DonorError {
    #[snafu(display("Error opening file {path}"))]
    OpeningFile {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error writing file {path}"))]
    WritingFile {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error creating directory {path}"))]
    CreatingDir {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON from {path}"))]
    ParsingJson {
        source: serde_json::Error,
        path: String,
    },
    #[snafu(display("Error writing JSON to {path}"))]
    WritingJson {
        source: serde_json::Error,
        path: String,
    },
    #[snafu(display("Error parsing {path} at record {lineno}"))]
    CsvLineParse {
        source: csv::Error,
        path: String,
        lineno: usize,
    },
    #[snafu(display("Error writing CSV file {path}"))]
    CsvWrite { source: csv::Error, path: String },
    #[snafu(display("Error opening file {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("No data in the first worksheet of {path}"))]
    EmptyExcel { path: String },
    #[snafu(display("Directory {path} not found"))]
    MissingDirectory { path: String },
    #[snafu(display("Request to {url} failed"))]
    HttpRequest { source: reqwest::Error, url: String },
    #[snafu(display("HTTP {status} for {url}"))]
    HttpStatus { status: u16, url: String },
    #[snafu(display("Cannot build a URL from {url}: {reason}"))]
    BadUrl { url: String, reason: String },
    #[snafu(display(
        "Candidate folder {name} found in both {first_city} and {second_city}"
    ))]
    DuplicateCandidate {
        name: String,
        first_city: String,
        second_city: String,
    },
    #[snafu(display("Unexpected content in {path}"))]
    Analysis {
        source: AnalysisError,
        path: String,
    },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type DonorResult<T> = Result<T, DonorError>;

pub const DONOR_COLUMNS: [&str; 8] = [
    "entityName",
    "firstName",
    "middleInitial",
    "lastName",
    "city",
    "state",
    "eid",
    "donationsToCampaign",
];

pub const PARTY_COLUMNS: [&str; 5] = [
    "entityName",
    "firstName",
    "lastName",
    "amount",
    "donationsToCampaign",
];

// ********* Loader ***********

/// Writes one `|` delimited contributions file per candidate found in `raw_dir`.
pub fn collect_filings(
    raw_dir: &Path,
    data_dir: &Path,
    settings: &Settings,
) -> DonorResult<Vec<PathBuf>> {
    let mut written: Vec<PathBuf> = Vec::new();
    for filings in discover_candidates(raw_dir)? {
        let candidate = &filings.candidate;
        let table = read_candidate_filings(&filings)?;
        if table.rows.is_empty() {
            warn!(
                "{}/{}: no readable filings, skipping",
                candidate.city, candidate.name
            );
            continue;
        }
        let race = settings.race_of(Some(&candidate.city), &candidate.name);
        let records = contributions_from_table(&table, candidate, race.as_ref());
        let raised: f64 = records.iter().map(|r| r.amount).sum();
        info!(
            "{} ({}): {} contributions, ${} raised, race: {:?}",
            candidate.display_name(),
            candidate.city,
            records.len(),
            format_thousands(raised),
            race
        );
        let out = data_dir.join(format!("{}-contributions.csv", candidate.name));
        write_table(&out, &table, b'|')?;
        written.push(out);
    }
    Ok(written)
}

// ********* Cleaner ***********

/// Removes the duplicated rows of every CSV file of `dir` and sorts them by date.
/// Returns the total number of rows removed.
pub fn clean_directory(dir: &Path) -> DonorResult<usize> {
    let files = list_files(dir, is_csv)?;
    if files.is_empty() {
        warn!("No CSV files found in {}", dir.display());
    }
    let mut total_removed = 0;
    for p in files.iter() {
        let name = file_name(p);
        let (mut table, delimiter) = read_table_sniffed(p)?;
        if table.header.is_empty() {
            info!("{}: empty file, skipping", name);
            continue;
        }
        let stats = clean_table(&mut table);
        if !stats.sorted {
            info!("{}: date column not found; will not sort", name);
        }
        write_table(p, &table, delimiter)?;
        info!(
            "{}: removed {} duplicate rows, wrote {} rows",
            name, stats.removed, stats.written
        );
        total_removed += stats.removed;
    }
    info!("Done. Total duplicates removed: {}", total_removed);
    Ok(total_removed)
}

// ********* Campaign totals ***********

fn is_contributions_file(name: &str) -> bool {
    name.ends_with("-contributions.csv")
}

/// The sum of the amount column of every contributions file, by candidate.
pub fn campaign_totals(data_dir: &Path) -> DonorResult<Vec<(String, f64)>> {
    let mut res: Vec<(String, f64)> = Vec::new();
    for p in list_files(data_dir, is_contributions_file)? {
        let name = file_stem(&p).replace("-contributions", "");
        let table = read_contributions_table(&p)?;
        let total: f64 = match table.amount_column() {
            Some(idx) => table
                .rows
                .iter()
                .map(|r| Table::cell(r, Some(idx)).trim())
                .filter(|v| !v.is_empty())
                .filter_map(parse_amount)
                .sum::<f64>(),
            None => {
                warn!("{}: no amount column", p.display());
                0.0
            }
        };
        debug!("campaign_totals: {}: {}", name, total);
        res.push((name, total));
    }
    Ok(res)
}

pub fn format_totals(totals: &[(String, f64)]) -> String {
    totals
        .iter()
        .map(|(name, total)| format!("{}: ${}\n", name, format_thousands(*total)))
        .collect()
}

// ********* Donor search ***********

/// The candidate a contributions file belongs to: `jane-doe-contributions.csv` is `jane-doe`.
pub fn candidate_of_contributions(path: &Path) -> String {
    let stem = file_stem(path).replace("contributions", "");
    stem.trim_end_matches(&['-', '_', ' '][..])
        .trim_start_matches(&['-', '_', ' '][..])
        .to_string()
}

/// Looks up every donor of a contributions file and writes the positive-dollar
/// matches to `{out_dir}/donors-{candidate}.csv`.
pub fn search_donors(
    contributions: &Path,
    out_dir: &Path,
    source: &dyn SearchSource,
    settings: &Settings,
) -> DonorResult<PathBuf> {
    let name = candidate_of_contributions(contributions);
    let candidate = Candidate::new("", &name);
    let race = settings.race_of(None, &name);
    let records = load_contributions(contributions, &candidate, race.as_ref())?;
    let totals = donor_totals(&records);
    let donors = totals.donors();
    info!(
        "{}: {} rows, {} distinct donors",
        contributions.display(),
        records.len(),
        donors.len()
    );

    let mut out = Table::with_header(&DONOR_COLUMNS);
    for (idx, (donor, donated)) in donors.iter().enumerate() {
        let query = match donor.query() {
            Some(q) => q,
            None => {
                debug!("search_donors: nothing to look up for {:?}", donor);
                continue;
            }
        };
        debug!(
            "search_donors: [{}/{}] {:?}",
            idx + 1,
            donors.len(),
            query
        );
        let html = match source.search(&query, &donor.state) {
            Ok(h) => h,
            Err(e) => {
                warn!("Lookup failed for {}: {}", donor.display_name(), e);
                continue;
            }
        };
        for hit in parse_search_results(&html) {
            let (entity, first, middle, last) = match &query {
                DonorQuery::Name { .. } => (
                    "",
                    donor.first_name.as_str(),
                    donor.middle_initial.as_str(),
                    donor.last_name.as_str(),
                ),
                DonorQuery::Entity(_) => (donor.entity_name.as_str(), "", "", ""),
            };
            out.rows.push(vec![
                entity.to_string(),
                first.to_string(),
                middle.to_string(),
                last.to_string(),
                donor.city.clone(),
                donor.state.clone(),
                extract_eid(&hit.href),
                format!("{:.2}", donated),
            ]);
        }
    }
    let out_path = out_dir.join(format!("donors-{}.csv", name));
    write_table(&out_path, &out, b',')?;
    info!("Wrote results to: {}", out_path.display());
    Ok(out_path)
}

// ********* Party aggregation ***********

/// Fetches the history of every eid of a donors file and writes one file per
/// party under `{out_dir}/{candidate}/`. Returns that directory.
pub fn aggregate_parties(
    donors_file: &Path,
    out_dir: &Path,
    source: &dyn HistorySource,
    limit: usize,
) -> DonorResult<PathBuf> {
    let path_s = donors_file.display().to_string();
    let candidate = file_stem(donors_file).replace("donors-", "");
    let candidate_dir = out_dir.join(&candidate);
    fs::create_dir_all(&candidate_dir).context(CreatingDirSnafu {
        path: candidate_dir.display().to_string(),
    })?;

    let table = read_table(donors_file)?;
    let eid_idx = table
        .require_column("eid")
        .context(AnalysisSnafu { path: path_s })?;

    // eid -> donor, in first-seen order; a repeated eid goes to the last donor listed with it.
    let mut eids: Vec<String> = Vec::new();
    let mut eid_donor: HashMap<String, DonorKey> = HashMap::new();
    let mut donors: HashMap<DonorKey, (DonorIdentity, f64)> = HashMap::new();
    for row in table.rows.iter() {
        let eid = Table::cell(row, Some(eid_idx)).trim().to_string();
        if eid.is_empty() {
            continue;
        }
        let donor = DonorIdentity::new(
            table.field(row, &["entityName"]),
            table.field(row, &["firstName"]),
            table.field(row, &["middleInitial"]),
            table.field(row, &["lastName"]),
            table.field(row, &["city"]),
            table.field(row, &["state"]),
        );
        let key = donor.key();
        if !eid_donor.contains_key(&eid) {
            eids.push(eid.clone());
        }
        eid_donor.insert(eid, key.clone());
        donors.entry(key).or_insert_with(|| {
            let donated = parse_amount_lenient(table.field(row, &["donationsToCampaign"]));
            (donor, donated)
        });
    }
    if limit > 0 {
        eids.truncate(limit);
    }

    let mut totals = PartyTotals::new();
    for (idx, eid) in eids.iter().enumerate() {
        info!(
            "[{}] [{}/{}] Fetching eid={}",
            candidate,
            idx + 1,
            eids.len(),
            eid
        );
        let history = match source.history(eid) {
            Ok(js) => parse_entity_history(&js),
            Err(e) => {
                warn!("History fetch failed for eid={}: {}", eid, e);
                Vec::new()
            }
        };
        if let Some(key) = eid_donor.get(eid) {
            for rec in history.iter() {
                totals.add(&rec.party, key, rec.amount);
            }
        }
    }

    for (party, per_donor) in totals.parties() {
        let mut out = Table::with_header(&PARTY_COLUMNS);
        for (key, amount) in per_donor.sorted_desc() {
            let (donor, donated) = match donors.get(&key) {
                Some((d, v)) => (d.clone(), *v),
                None => (key.identity().clone(), 0.0),
            };
            out.rows.push(vec![
                donor.entity_name,
                donor.first_name,
                donor.last_name,
                format_amount(amount),
                format_amount(donated),
            ]);
        }
        let out_path = candidate_dir.join(format!("{}.csv", party_file_stem(party)));
        write_table(&out_path, &out, b',')?;
        info!("Wrote {} ({} rows)", out_path.display(), out.rows.len());
    }
    Ok(candidate_dir)
}

// ********* Cross-party dedupe ***********

/// Removes from the nonpartisan and third-party files of a candidate the donors
/// already found in `republican.csv` or `democratic.csv`. Returns the rows removed.
pub fn dedupe_parties(candidate_dir: &Path) -> DonorResult<usize> {
    let mut known: HashSet<MatchKey> = HashSet::new();
    for stem in ["republican", "democratic"].iter() {
        let p = candidate_dir.join(format!("{}.csv", stem));
        if p.is_file() {
            known.extend(match_keys(&read_table(&p)?));
        }
    }
    if known.is_empty() {
        debug!(
            "dedupe_parties: no major party donors in {}",
            candidate_dir.display()
        );
        return Ok(0);
    }
    let mut total = 0;
    for p in list_files(candidate_dir, is_csv)? {
        if PartyCategory::from_label(&file_stem(&p)).is_major() {
            continue;
        }
        let mut table = read_table(&p)?;
        let removed = remove_known_donors(&mut table, &known);
        if removed > 0 {
            write_table(&p, &table, b',')?;
        }
        info!(
            "{}: removed {} rows; kept {}",
            p.display(),
            removed,
            table.rows.len()
        );
        total += removed;
    }
    Ok(total)
}

// ********* Duplicate check ***********

/// Writes `{root}/{candidate}-duplicates.txt` for every candidate directory.
pub fn write_duplicates(root: &Path) -> DonorResult<usize> {
    let mut total = 0;
    for dir in list_dirs(root)? {
        let candidate = file_name(&dir);
        let duplicates = find_duplicates(&read_party_tables(&dir)?);
        let text: String = duplicates.iter().map(|d| format!("{}\n", d)).collect();
        let out_path = root.join(format!("{}-duplicates.txt", candidate));
        write_text(&out_path, &text)?;
        if duplicates.is_empty() {
            info!("No duplicates for {}", candidate);
        } else {
            info!(
                "Wrote {} ({} duplicates)",
                out_path.display(),
                duplicates.len()
            );
        }
        total += duplicates.len();
    }
    Ok(total)
}

// ********* Party splits ***********

/// The money of one party file: its donation column, else its amount column.
fn party_file_sum(table: &Table) -> f64 {
    let idx = table
        .column_containing("donat")
        .or_else(|| table.amount_column());
    match idx {
        Some(_) => table
            .rows
            .iter()
            .map(|r| parse_amount_lenient(Table::cell(r, idx).trim()))
            .sum::<f64>(),
        None => 0.0,
    }
}

/// The category split of every candidate directory, by candidate folder name.
pub fn candidate_splits(root: &Path) -> DonorResult<Vec<(String, CategorySplit)>> {
    let mut res: Vec<(String, CategorySplit)> = Vec::new();
    for dir in list_dirs(root)? {
        let mut split = CategorySplit::default();
        for (stem, table) in read_party_tables(&dir)? {
            split.add(PartyCategory::from_label(&stem), party_file_sum(&table));
        }
        res.push((file_name(&dir), split));
    }
    Ok(res)
}

/// Writes `{root}/splits.csv`. When a reference file is given, the output must
/// match it.
pub fn compute_splits(root: &Path, reference: Option<&Path>) -> DonorResult<PathBuf> {
    let mut header: Vec<&str> = vec!["candidate"];
    header.extend(PartyCategory::ALL.iter().map(|c| c.as_str()));
    let mut out = Table::with_header(&header);
    for (candidate, split) in candidate_splits(root)? {
        let mut row = vec![display_candidate_name(&candidate)];
        row.extend(split.percentages().iter().map(|p| format!("{:.2}", p)));
        out.rows.push(row);
    }
    let out_path = root.join("splits.csv");
    write_table(&out_path, &out, b',')?;
    info!("Wrote {}", out_path.display());

    if let Some(reference_p) = reference {
        let computed = read_to_string(&out_path)?;
        let expected = read_to_string(reference_p)?.replace("\r\n", "\n");
        if expected != computed {
            warn!("Found differences with the reference splits");
            print_diff(expected.as_str(), computed.as_str(), "\n");
            whatever!(
                "Difference detected between {} and the reference {}",
                out_path.display(),
                reference_p.display()
            )
        }
    }
    Ok(out_path)
}

// ********* Reporter ***********

fn share(x: Option<f64>) -> String {
    x.map(|v| format!("{:.2}", v)).unwrap_or_default()
}

fn profile_row(p: &DonorProfile) -> Vec<String> {
    let split = p.split();
    let dominant = split.dominant();
    let mut row = vec![
        p.donor.key().id(),
        p.donor.display_name(),
        format_amount(p.campaign_amount),
        format_amount(p.historical_total()),
        dominant
            .map(|(c, _)| c.as_str().to_string())
            .unwrap_or_default(),
        share(dominant.map(|(_, s)| s)),
        p.party_count().to_string(),
        share(p.campaign_share()),
    ];
    row.extend(
        PartyCategory::ALL
            .iter()
            .map(|c| format_amount(split.amount(*c))),
    );
    row
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

fn summary_js(folder: &str, s: &CampaignSummary) -> JSValue {
    let pct = s.split.percentages();
    let mut split = serde_json::Map::new();
    for (c, p) in PartyCategory::ALL.iter().zip(pct.iter()) {
        split.insert(c.as_str().to_string(), json!(round2(*p)));
    }
    json!({
        "candidate": s.candidate,
        "folder": folder,
        "donors": s.donors,
        "totalRaised": round2(s.total_raised),
        "meanContribution": round2(s.mean_contribution),
        "medianContribution": round2(s.median_contribution),
        "split": split,
    })
}

/// Writes `{root}/{candidate}-report.csv` for every candidate directory and
/// `{root}/report.json` with all the campaign summaries.
pub fn write_reports(root: &Path) -> DonorResult<Vec<CampaignSummary>> {
    let mut header: Vec<&str> = vec![
        "donorId",
        "donor",
        "campaignAmount",
        "historicalTotal",
        "dominantParty",
        "dominantShare",
        "partyCount",
        "campaignShare",
    ];
    header.extend(PartyCategory::ALL.iter().map(|c| c.as_str()));

    let mut summaries: Vec<CampaignSummary> = Vec::new();
    let mut campaigns: Vec<JSValue> = Vec::new();
    for dir in list_dirs(root)? {
        let folder = file_name(&dir);
        let profiles = build_profiles(&read_party_tables(&dir)?);
        let mut out = Table::with_header(&header);
        out.rows.extend(profiles.iter().map(profile_row));
        write_table(&root.join(format!("{}-report.csv", folder)), &out, b',')?;

        let summary = summarize_campaign(&display_candidate_name(&folder), &profiles);
        campaigns.push(summary_js(&folder, &summary));
        summaries.push(summary);
    }

    let report_p = root.join("report.json");
    let pretty = serde_json::to_string_pretty(&json!({ "campaigns": campaigns })).context(
        WritingJsonSnafu {
            path: report_p.display().to_string(),
        },
    )?;
    write_text(&report_p, &pretty)?;
    info!("Wrote {}", report_p.display());
    Ok(summaries)
}

// ********* Commands ***********

fn search_source(
    settings: &Settings,
    test_html: &Option<String>,
) -> DonorResult<Box<dyn SearchSource>> {
    let source: Box<dyn SearchSource> = match test_html {
        Some(p) => Box::new(FixedPage::read(Path::new(p))?),
        None => Box::new(FtmClient::new(&settings.ftm)?),
    };
    Ok(source)
}

fn history_source(
    settings: &Settings,
    fixtures: &Option<String>,
) -> DonorResult<Box<dyn HistorySource>> {
    let source: Box<dyn HistorySource> = match fixtures {
        Some(p) => Box::new(FixtureHistory::new(Path::new(p))),
        None => Box::new(FtmClient::new(&settings.ftm)?),
    };
    Ok(source)
}

fn run_search(
    settings: &Settings,
    csv: &Option<String>,
    test_html: &Option<String>,
) -> DonorResult<()> {
    let files = match csv {
        Some(p) => vec![PathBuf::from(p)],
        None => list_files(&settings.data_dir, is_contributions_file)?,
    };
    if files.is_empty() {
        warn!(
            "No contributions files found in {}",
            settings.data_dir.display()
        );
        return Ok(());
    }
    let source = search_source(settings, test_html)?;
    for p in files.iter() {
        search_donors(p, &settings.donors_dir, source.as_ref(), settings)?;
    }
    Ok(())
}

fn run_party(settings: &Settings, fixtures: &Option<String>) -> DonorResult<()> {
    let files = list_files(&settings.donors_dir, |n| {
        n.starts_with("donors-") && is_csv(n)
    })?;
    if files.is_empty() {
        warn!(
            "No donors-*.csv files found in {}",
            settings.donors_dir.display()
        );
        return Ok(());
    }
    let source = history_source(settings, fixtures)?;
    for p in files.iter() {
        aggregate_parties(p, &settings.by_donor_dir, source.as_ref(), settings.ftm.limit)?;
    }
    Ok(())
}

fn run_dedupe_parties(root: &Path) -> DonorResult<()> {
    for dir in list_dirs(root)? {
        info!("Processing candidate: {}", file_name(&dir));
        dedupe_parties(&dir)?;
    }
    Ok(())
}

fn run_totals(data_dir: &Path, out: &Path) -> DonorResult<()> {
    let text = format_totals(&campaign_totals(data_dir)?);
    write_text(out, &text)?;
    println!("{}", text);
    Ok(())
}

fn run_lookup(
    settings: &Settings,
    first: &Option<String>,
    last: &Option<String>,
    file: &Option<String>,
) -> DonorResult<()> {
    let html = match (file, first, last) {
        (Some(f), _, _) => read_to_string(Path::new(f))?,
        (None, Some(first), Some(last)) => {
            let query = DonorQuery::Name {
                first: first.clone(),
                middle: "".to_string(),
                last: last.clone(),
            };
            FtmClient::new(&settings.ftm)?.search(&query, "")?
        }
        _ => whatever!("lookup needs a first and a last name, or --file"),
    };
    for hit in parse_search_results(&html) {
        println!("{} {}", hit.name, hit.href);
    }
    Ok(())
}

fn run_all(
    settings: &Settings,
    test_html: &Option<String>,
    fixtures: &Option<String>,
) -> DonorResult<()> {
    collect_filings(&settings.raw_dir, &settings.data_dir, settings)?;
    clean_directory(&settings.data_dir)?;
    run_totals(&settings.data_dir, &settings.totals_file)?;
    run_search(settings, &None, test_html)?;
    run_party(settings, fixtures)?;
    run_dedupe_parties(&settings.by_donor_dir)?;
    write_duplicates(&settings.by_donor_dir)?;
    compute_splits(&settings.by_donor_dir, None)?;
    write_reports(&settings.by_donor_dir)?;
    Ok(())
}

fn set_path(target: &mut PathBuf, value: &Option<String>) {
    if let Some(v) = value {
        *target = PathBuf::from(v);
    }
}

pub fn run(args: &Args) -> DonorResult<()> {
    let mut settings = match &args.config {
        Some(p) => Settings::from_config(&read_config(p)?),
        None => Settings::default(),
    };
    debug!("run: command: {:?}", args.command);

    match &args.command {
        Command::Collect { raw_dir, data_dir } => {
            set_path(&mut settings.raw_dir, raw_dir);
            set_path(&mut settings.data_dir, data_dir);
            let written = collect_filings(&settings.raw_dir, &settings.data_dir, &settings)?;
            info!("Wrote {} contributions files", written.len());
            Ok(())
        }
        Command::Clean { dir } => {
            set_path(&mut settings.data_dir, dir);
            clean_directory(&settings.data_dir).map(|_| ())
        }
        Command::Totals { data_dir, out } => {
            set_path(&mut settings.data_dir, data_dir);
            set_path(&mut settings.totals_file, out);
            run_totals(&settings.data_dir, &settings.totals_file)
        }
        Command::Search {
            csv,
            data_dir,
            output_dir,
            test_html,
            delay,
            timeout,
        } => {
            set_path(&mut settings.data_dir, data_dir);
            set_path(&mut settings.donors_dir, output_dir);
            if let Some(d) = delay {
                settings.ftm.delay = seconds(*d);
            }
            if let Some(t) = timeout {
                settings.ftm.timeout = seconds(*t);
            }
            run_search(&settings, csv, test_html)
        }
        Command::Lookup {
            first,
            last,
            file,
            timeout,
        } => {
            if let Some(t) = timeout {
                settings.ftm.timeout = seconds(*t);
            }
            run_lookup(&settings, first, last, file)
        }
        Command::Party {
            in_dir,
            out_dir,
            fixtures,
            sleep,
            timeout,
            limit,
        } => {
            set_path(&mut settings.donors_dir, in_dir);
            set_path(&mut settings.by_donor_dir, out_dir);
            if let Some(s) = sleep {
                settings.ftm.history_delay = seconds(*s);
            }
            if let Some(t) = timeout {
                settings.ftm.timeout = seconds(*t);
            }
            if let Some(l) = limit {
                settings.ftm.limit = *l;
            }
            run_party(&settings, fixtures)
        }
        Command::DedupeParties { root } => {
            set_path(&mut settings.by_donor_dir, root);
            run_dedupe_parties(&settings.by_donor_dir)
        }
        Command::Duplicates { root } => {
            set_path(&mut settings.by_donor_dir, root);
            write_duplicates(&settings.by_donor_dir).map(|_| ())
        }
        Command::Splits { root, reference } => {
            set_path(&mut settings.by_donor_dir, root);
            compute_splits(
                &settings.by_donor_dir,
                reference.as_ref().map(Path::new),
            )
            .map(|_| ())
        }
        Command::Report { root } => {
            set_path(&mut settings.by_donor_dir, root);
            write_reports(&settings.by_donor_dir).map(|_| ())
        }
        Command::All {
            test_html,
            fixtures,
        } => run_all(&settings, test_html, fixtures),
    }
}
