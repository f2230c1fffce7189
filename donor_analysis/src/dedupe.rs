use log::debug;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt::Display;

use crate::dates::parse_date;
use crate::money::{format_dollars, normalize_donation};
use crate::normalize::normalize_name;
use crate::table::Table;

// ********* Exact duplicates in a filing ***********

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub struct CleanStats {
    pub removed: usize,
    pub written: usize,
    /// False when the table has no date column and was left in its original order.
    pub sorted: bool,
}

/// Removes repeated data rows (the first copy is kept) and orders the rows by date.
///
/// The date column is the first one whose name starts with `date`. The sort is
/// stable and rows whose date is blank or unreadable go last.
pub fn clean_table(table: &mut Table) -> CleanStats {
    let mut seen: HashSet<Vec<String>> = HashSet::new();
    let before = table.rows.len();
    table.rows.retain(|r| seen.insert(r.clone()));
    let removed = before - table.rows.len();

    let sorted = match table.date_column() {
        Some(idx) => {
            table.rows.sort_by_cached_key(|r| {
                let d = parse_date(Table::cell(r, Some(idx)));
                (d.is_none(), d)
            });
            true
        }
        None => false,
    };
    debug!(
        "clean_table: removed {} rows, sorted: {}",
        removed, sorted
    );
    CleanStats {
        removed,
        written: table.rows.len(),
        sorted,
    }
}

// ********* Donors in both a major party file and another file ***********

/// How a donor row is recognized across the party files of a candidate.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub enum MatchKey {
    Entity {
        name: String,
        donation: String,
    },
    Person {
        first: String,
        last: String,
        donation: String,
    },
}

/// The match key of a party file row, None for rows with nothing to match on.
pub fn match_key(table: &Table, row: &[String]) -> Option<MatchKey> {
    let entity = table.field(row, &["entityName", "EntityName"]);
    let donation = normalize_donation(
        table.field(row, &["donationsToCampaign", "donation", "amount"]),
    );
    if !entity.is_empty() {
        return Some(MatchKey::Entity {
            name: normalize_name(entity),
            donation,
        });
    }
    let first = table.field(row, &["firstName", "FirstName"]);
    let last = table.field(row, &["lastName", "LastName"]);
    if !first.is_empty() || !last.is_empty() || !donation.is_empty() {
        Some(MatchKey::Person {
            first: normalize_name(first),
            last: normalize_name(last),
            donation,
        })
    } else {
        None
    }
}

pub fn match_keys(table: &Table) -> HashSet<MatchKey> {
    table
        .rows
        .iter()
        .filter_map(|r| match_key(table, r))
        .collect()
}

/// Drops the rows whose donor is already accounted for in `known`.
/// Returns the number of rows removed.
pub fn remove_known_donors(table: &mut Table, known: &HashSet<MatchKey>) -> usize {
    let before = table.rows.len();
    let header = Table::new(table.header.clone(), Vec::new());
    table.rows.retain(|r| match match_key(&header, r) {
        Some(k) => !known.contains(&k),
        None => true,
    });
    before - table.rows.len()
}

// ********* Donors listed in several party files ***********

/// A donor row found identically in more than one party file.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct DuplicateDonor {
    pub name: String,
    pub donations: String,
    /// The file stems, sorted.
    pub files: Vec<String>,
}

impl Display for DuplicateDonor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {}", self.name, self.donations, self.files.join("/"))
    }
}

/// Finds the rows present in several files.
///
/// Rows are compared on every column of every file except `amount`, which
/// differs per party by construction. Files are given as (stem, table), and the
/// duplicates come out in the order in which they were first seen.
pub fn find_duplicates(files: &[(String, Table)]) -> Vec<DuplicateDonor> {
    let mut fields: Vec<String> = Vec::new();
    for (_, t) in files.iter().filter(|(_, t)| !t.rows.is_empty()) {
        for h in t.header.iter() {
            if !fields.contains(h) {
                fields.push(h.clone());
            }
        }
    }
    let match_fields: Vec<&String> = fields
        .iter()
        .filter(|f| f.to_lowercase() != "amount")
        .collect();

    let mut order: Vec<Vec<String>> = Vec::new();
    let mut found: HashMap<Vec<String>, (BTreeSet<String>, String, String)> = HashMap::new();
    for (stem, t) in files.iter() {
        let idxs: Vec<Option<usize>> = match_fields.iter().map(|f| t.column(f)).collect();
        for row in t.rows.iter() {
            let key: Vec<String> = idxs
                .iter()
                .map(|idx| Table::cell(row, *idx).trim().to_string())
                .collect();
            let entry = found.entry(key.clone()).or_insert_with(|| {
                order.push(key.clone());
                let first = t.field(row, &["firstName"]);
                let last = t.field(row, &["lastName"]);
                let name = if !first.is_empty() || !last.is_empty() {
                    format!("{} {}", first, last).trim().to_string()
                } else {
                    t.field(row, &["entityName"]).to_string()
                };
                let donations = format_dollars(t.field(row, &["donationsToCampaign"]));
                (BTreeSet::new(), name, donations)
            });
            entry.0.insert(stem.clone());
        }
    }

    order
        .iter()
        .filter_map(|k| found.get(k))
        .filter(|(stems, _, _)| stems.len() > 1)
        .map(|(stems, name, donations)| DuplicateDonor {
            name: name.clone(),
            donations: donations.clone(),
            files: stems.iter().cloned().collect(),
        })
        .collect()
}
