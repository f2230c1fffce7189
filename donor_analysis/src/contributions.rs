use log::debug;

use crate::dates::parse_date;
use crate::model::{Candidate, ContributionRecord, Race};
use crate::money::parse_amount_lenient;
use crate::normalize::DonorIdentity;
use crate::table::Table;

// Column aliases seen in C7 exports.
pub const FIRST_NAME: [&str; 2] = ["First Name", "FirstName"];
pub const MIDDLE_INITIAL: [&str; 2] = ["Middle Initial", "MiddleInitial"];
pub const LAST_NAME: [&str; 2] = ["Last Name", "LastName"];
pub const ENTITY_NAME: [&str; 2] = ["Entity Name", "EntityName"];
pub const CITY: [&str; 1] = ["City"];
pub const STATE: [&str; 1] = ["State"];

/// The donor written on one row of a contributions table.
pub fn donor_from_row(table: &Table, row: &[String]) -> DonorIdentity {
    DonorIdentity::new(
        table.field(row, &ENTITY_NAME),
        table.field(row, &FIRST_NAME),
        table.field(row, &MIDDLE_INITIAL),
        table.field(row, &LAST_NAME),
        table.field(row, &CITY),
        table.field(row, &STATE),
    )
}

/// Reads the contribution records of one candidate.
///
/// The amount column is the first one mentioning `amount` (`Amount` if there
/// is none). Amounts that cannot be read count as zero, dates that cannot be
/// read are left out.
pub fn contributions_from_table(
    table: &Table,
    candidate: &Candidate,
    race: Option<&Race>,
) -> Vec<ContributionRecord> {
    let amount_idx = table.amount_column().or_else(|| table.column("Amount"));
    let date_idx = table.date_column();
    debug!(
        "contributions_from_table: candidate: {:?} amount column: {:?} date column: {:?}",
        candidate.name, amount_idx, date_idx
    );
    table
        .rows
        .iter()
        .map(|row| ContributionRecord {
            donor: donor_from_row(table, row),
            amount: parse_amount_lenient(Table::cell(row, amount_idx).trim()),
            date: parse_date(Table::cell(row, date_idx)),
            candidate: candidate.clone(),
            race: race.cloned(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn records_carry_candidate_and_race() {
        let t = Table::new(
            row(&["Date Paid", "First Name", "Last Name", "Entity Name", "City", "State", "Amount"]),
            vec![
                row(&["03/01/2025", "Mike", "Nelson", "", "Missoula", "MT", "$100.00"]),
                row(&["", "", "", "Acme LLC", "Helena", "MT", "oops"]),
            ],
        );
        let c = Candidate::new("missoula", "jane-doe");
        let race = Race {
            city: "missoula".to_string(),
            office: "mayor".to_string(),
            cycle: "2025".to_string(),
        };
        let records = contributions_from_table(&t, &c, Some(&race));
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].amount, 100.0);
        assert!(records[0].date.is_some());
        assert_eq!(records[0].donor.display_name(), "Mike Nelson");
        assert_eq!(records[1].amount, 0.0);
        assert_eq!(records[1].date, None);
        assert_eq!(records[1].donor.entity_name, "Acme LLC");
        assert!(records.iter().all(|r| r.candidate == c && r.race.as_ref() == Some(&race)));
    }
}
