// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;

use chrono::NaiveDateTime;

use crate::normalize::{title_case, DonorIdentity};

/// A candidate, as laid out in the raw filings directory:
/// `candidate-data-raw/{city}/{name}/`.
///
/// The name is the folder name (`jennifer-owen`), not the display name.
#[derive(Eq, PartialEq, Debug, Clone, Hash, Ord, PartialOrd)]
pub struct Candidate {
    pub city: String,
    pub name: String,
}

impl Candidate {
    pub fn new(city: &str, name: &str) -> Candidate {
        Candidate {
            city: city.to_string(),
            name: name.to_string(),
        }
    }

    /// The human-friendly form of the folder name: `jennifer-owen` becomes `Jennifer Owen`.
    pub fn display_name(&self) -> String {
        display_candidate_name(&self.name)
    }
}

/// Converts a folder-style candidate id to a display name.
///
/// Hyphens and underscores become spaces, runs of whitespace are collapsed
/// and every word is title-cased.
pub fn display_candidate_name(raw: &str) -> String {
    let spaced = raw.replace(&['-', '_'][..], " ");
    spaced
        .split_whitespace()
        .map(title_case)
        .collect::<Vec<String>>()
        .join(" ")
}

/// The seat being contested. Candidates competing against each other share a race.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub struct Race {
    pub city: String,
    pub office: String,
    pub cycle: String,
}

/// One line of a C7 filing.
#[derive(PartialEq, Debug, Clone)]
pub struct ContributionRecord {
    pub donor: DonorIdentity,
    pub amount: f64,
    pub date: Option<NaiveDateTime>,
    pub candidate: Candidate,
    pub race: Option<Race>,
}

/// The coarse party buckets used for all the splits.
///
/// Party labels coming from FollowTheMoney (and the party file stems derived
/// from them) are free-form, so they are folded into one of these four.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
pub enum PartyCategory {
    Republican,
    Democratic,
    ThirdParty,
    Nonpartisan,
}

impl PartyCategory {
    /// All the categories, in the order they are reported.
    pub const ALL: [PartyCategory; 4] = [
        PartyCategory::Republican,
        PartyCategory::Democratic,
        PartyCategory::ThirdParty,
        PartyCategory::Nonpartisan,
    ];

    pub fn from_label(label: &str) -> PartyCategory {
        let s = label.to_lowercase();
        if s.contains("republic") {
            PartyCategory::Republican
        } else if s.contains("democ") {
            PartyCategory::Democratic
        } else if s.contains("non") || s.contains("no-party") {
            PartyCategory::Nonpartisan
        } else {
            PartyCategory::ThirdParty
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PartyCategory::Republican => "republican",
            PartyCategory::Democratic => "democratic",
            PartyCategory::ThirdParty => "thirdParty",
            PartyCategory::Nonpartisan => "nonpartisan",
        }
    }

    /// Republican and Democratic donors are the reference set when pruning the other files.
    pub fn is_major(&self) -> bool {
        matches!(self, PartyCategory::Republican | PartyCategory::Democratic)
    }

    pub(crate) fn index(&self) -> usize {
        match self {
            PartyCategory::Republican => 0,
            PartyCategory::Democratic => 1,
            PartyCategory::ThirdParty => 2,
            PartyCategory::Nonpartisan => 3,
        }
    }
}

impl Display for PartyCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Errors raised while interpreting tabular data.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum AnalysisError {
    /// A column that the operation cannot do without.
    MissingColumn(String),
    /// The table has no header row.
    EmptyTable,
}

impl Error for AnalysisError {}

impl Display for AnalysisError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnalysisError::MissingColumn(name) => write!(f, "missing column {:?}", name),
            AnalysisError::EmptyTable => write!(f, "table has no header"),
        }
    }
}
