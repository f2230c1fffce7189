use log::{debug, info};
use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

use crate::model::{ContributionRecord, PartyCategory};
use crate::money::parse_amount_lenient;
use crate::normalize::{DonorIdentity, DonorKey};
use crate::table::Table;

/// Sums of amounts per key, remembering the order in which keys were first seen.
#[derive(Debug, Clone)]
pub struct OrderedTotals<K: Hash + Eq + Clone> {
    order: Vec<K>,
    amounts: HashMap<K, f64>,
}

impl<K: Hash + Eq + Clone> Default for OrderedTotals<K> {
    fn default() -> Self {
        OrderedTotals {
            order: Vec::new(),
            amounts: HashMap::new(),
        }
    }
}

impl<K: Hash + Eq + Clone> OrderedTotals<K> {
    pub fn new() -> OrderedTotals<K> {
        Self::default()
    }

    pub fn add(&mut self, key: &K, amount: f64) {
        match self.amounts.get_mut(key) {
            Some(total) => *total += amount,
            None => {
                self.order.push(key.clone());
                self.amounts.insert(key.clone(), amount);
            }
        }
    }

    pub fn get(&self, key: &K) -> Option<f64> {
        self.amounts.get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Entries in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, f64)> + '_ {
        self.order
            .iter()
            .map(move |k| (k, self.amounts.get(k).cloned().unwrap_or(0.0)))
    }

    /// Entries by decreasing amount. Equal amounts keep their first-seen order.
    pub fn sorted_desc(&self) -> Vec<(K, f64)> {
        let mut res: Vec<(K, f64)> = self.iter().map(|(k, v)| (k.clone(), v)).collect();
        res.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        res
    }
}

/// What each donor gave to a campaign, with the first way the donor was written down.
#[derive(Debug, Clone, Default)]
pub struct DonorTotals {
    pub totals: OrderedTotals<DonorKey>,
    pub identities: HashMap<DonorKey, DonorIdentity>,
}

impl DonorTotals {
    /// The donors in first-seen order with their totals.
    pub fn donors(&self) -> Vec<(&DonorIdentity, f64)> {
        self.totals
            .iter()
            .filter_map(|(k, v)| self.identities.get(k).map(|d| (d, v)))
            .collect()
    }
}

/// Sums the contributions per resolved donor.
pub fn donor_totals(records: &[ContributionRecord]) -> DonorTotals {
    let mut res = DonorTotals::default();
    for r in records.iter() {
        let key = r.donor.key();
        res.totals.add(&key, r.amount);
        res.identities
            .entry(key)
            .or_insert_with(|| r.donor.clone());
    }
    debug!(
        "donor_totals: {} records, {} donors",
        records.len(),
        res.totals.len()
    );
    res
}

/// Donor-history amounts per party label, then per donor.
#[derive(Debug, Clone, Default)]
pub struct PartyTotals {
    parties: BTreeMap<String, OrderedTotals<DonorKey>>,
}

impl PartyTotals {
    pub fn new() -> PartyTotals {
        Self::default()
    }

    /// Records an amount given by a donor to a party. Records without party
    /// or with a non-positive amount carry no information and are dropped.
    pub fn add(&mut self, party: &str, donor: &DonorKey, amount: f64) -> bool {
        if party.is_empty() || amount <= 0.0 {
            return false;
        }
        self.parties
            .entry(party.to_string())
            .or_default()
            .add(donor, amount);
        true
    }

    pub fn parties(&self) -> impl Iterator<Item = (&String, &OrderedTotals<DonorKey>)> {
        self.parties.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.parties.is_empty()
    }
}

/// The file name used for a party: `Montana Republican` is stored in `montana-republican.csv`.
pub fn party_file_stem(party: &str) -> String {
    party.to_lowercase().replace(' ', "-")
}

/// Amounts per party category.
#[derive(PartialEq, Debug, Clone, Copy, Default)]
pub struct CategorySplit {
    amounts: [f64; 4],
}

impl CategorySplit {
    pub fn add(&mut self, category: PartyCategory, amount: f64) {
        self.amounts[category.index()] += amount;
    }

    pub fn amount(&self, category: PartyCategory) -> f64 {
        self.amounts[category.index()]
    }

    pub fn total(&self) -> f64 {
        self.amounts.iter().sum()
    }

    /// Share of each category in percent, in the order of [`PartyCategory::ALL`].
    /// All zero when nothing was given.
    pub fn percentages(&self) -> [f64; 4] {
        let total = self.total();
        if total <= 0.0 {
            return [0.0; 4];
        }
        let mut res = [0.0; 4];
        for (idx, a) in self.amounts.iter().enumerate() {
            res[idx] = a / total * 100.0;
        }
        res
    }

    /// The category with the most money and its share in percent.
    /// Ties go to the category listed first.
    pub fn dominant(&self) -> Option<(PartyCategory, f64)> {
        let total = self.total();
        if total <= 0.0 {
            return None;
        }
        let mut best: Option<(PartyCategory, f64)> = None;
        for c in PartyCategory::ALL.iter() {
            let a = self.amount(*c);
            match best {
                Some((_, b)) if b >= a => {}
                _ => best = Some((*c, a)),
            }
        }
        best.map(|(c, a)| (c, a / total * 100.0))
    }
}

/// A donor's giving history next to what they gave to one campaign.
#[derive(PartialEq, Debug, Clone)]
pub struct DonorProfile {
    pub donor: DonorIdentity,
    /// What the donor gave to the campaign being reported on.
    pub campaign_amount: f64,
    /// Historical totals per party file stem.
    pub by_party: BTreeMap<String, f64>,
}

impl DonorProfile {
    pub fn historical_total(&self) -> f64 {
        self.by_party.values().sum()
    }

    pub fn split(&self) -> CategorySplit {
        let mut split = CategorySplit::default();
        for (party, amount) in self.by_party.iter() {
            split.add(PartyCategory::from_label(party), *amount);
        }
        split
    }

    pub fn party_count(&self) -> usize {
        self.by_party.values().filter(|a| **a > 0.0).count()
    }

    /// The campaign contribution as a percentage of the donor's historical giving.
    pub fn campaign_share(&self) -> Option<f64> {
        let total = self.historical_total();
        if total > 0.0 {
            Some(self.campaign_amount / total * 100.0)
        } else {
            None
        }
    }
}

/// Assembles donor profiles from the per-party files of one candidate.
///
/// Each input is the party file stem and its table, with the
/// `entityName,firstName,lastName,amount,donationsToCampaign` columns.
/// The result is sorted by decreasing historical total, then by name.
pub fn build_profiles(party_tables: &[(String, Table)]) -> Vec<DonorProfile> {
    let mut order: Vec<DonorKey> = Vec::new();
    let mut profiles: HashMap<DonorKey, DonorProfile> = HashMap::new();
    for (party, table) in party_tables.iter() {
        let amount_idx = table.column("amount").or_else(|| table.amount_column());
        let donation_idx = table.column_containing("donat");
        for row in table.rows.iter() {
            let donor = DonorIdentity::person(
                table.field(row, &["entityName"]),
                table.field(row, &["firstName"]),
                table.field(row, &["lastName"]),
            );
            if donor.is_empty() {
                continue;
            }
            let key = donor.key();
            let amount = parse_amount_lenient(Table::cell(row, amount_idx));
            let donation = parse_amount_lenient(Table::cell(row, donation_idx));
            let profile = profiles.entry(key.clone()).or_insert_with(|| {
                order.push(key.clone());
                DonorProfile {
                    donor: donor.clone(),
                    campaign_amount: 0.0,
                    by_party: BTreeMap::new(),
                }
            });
            *profile.by_party.entry(party.clone()).or_insert(0.0) += amount;
            if profile.campaign_amount == 0.0 {
                profile.campaign_amount = donation;
            }
        }
    }
    let mut res: Vec<DonorProfile> = order
        .iter()
        .filter_map(|k| profiles.remove(k))
        .collect();
    res.sort_by(|a, b| {
        b.historical_total()
            .partial_cmp(&a.historical_total())
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.donor.display_name().cmp(&b.donor.display_name()))
    });
    res
}

/// The median of the values, None if there are none.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut v = values.to_vec();
    v.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = v.len() / 2;
    if v.len() % 2 == 0 {
        Some((v[mid - 1] + v[mid]) / 2.0)
    } else {
        Some(v[mid])
    }
}

/// Campaign-level summary of the donors of one candidate.
#[derive(PartialEq, Debug, Clone)]
pub struct CampaignSummary {
    pub candidate: String,
    pub donors: usize,
    pub total_raised: f64,
    pub mean_contribution: f64,
    pub median_contribution: f64,
    pub split: CategorySplit,
}

pub fn summarize_campaign(candidate: &str, profiles: &[DonorProfile]) -> CampaignSummary {
    let contributions: Vec<f64> = profiles.iter().map(|p| p.campaign_amount).collect();
    let total_raised: f64 = contributions.iter().sum();
    let mut split = CategorySplit::default();
    for p in profiles.iter() {
        let s = p.split();
        for c in PartyCategory::ALL.iter() {
            split.add(*c, s.amount(*c));
        }
    }
    let mean_contribution = if contributions.is_empty() {
        0.0
    } else {
        total_raised / contributions.len() as f64
    };
    let res = CampaignSummary {
        candidate: candidate.to_string(),
        donors: profiles.len(),
        total_raised,
        mean_contribution,
        median_contribution: median(&contributions).unwrap_or(0.0),
        split,
    };
    info!(
        "Campaign {}: {} donors, {:.2} raised",
        res.candidate, res.donors, res.total_raised
    );
    res
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|s| s.to_string()).collect()
    }

    fn party_table(rows: &[&[&str]]) -> Table {
        Table::new(
            row(&["entityName", "firstName", "lastName", "amount", "donationsToCampaign"]),
            rows.iter().map(|r| row(r)).collect(),
        )
    }

    #[test]
    fn ordered_totals_keep_first_seen_order() {
        let mut t: OrderedTotals<String> = OrderedTotals::new();
        t.add(&"b".to_string(), 5.0);
        t.add(&"a".to_string(), 10.0);
        t.add(&"b".to_string(), 5.0);
        t.add(&"c".to_string(), 2.0);
        let keys: Vec<&String> = t.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["b", "a", "c"]);
        let sorted = t.sorted_desc();
        assert_eq!(sorted[0], ("b".to_string(), 10.0));
        assert_eq!(sorted[1], ("a".to_string(), 10.0));
        assert_eq!(sorted[2], ("c".to_string(), 2.0));
    }

    #[test]
    fn party_totals_ignore_empty_records() {
        let mut p = PartyTotals::new();
        let k = DonorIdentity::person("", "Jo", "Doe").key();
        assert!(p.add("Republican", &k, 100.0));
        assert!(!p.add("", &k, 100.0));
        assert!(!p.add("Democratic", &k, 0.0));
        assert!(p.add("Republican", &k, 50.0));
        let parties: Vec<(&String, &OrderedTotals<DonorKey>)> = p.parties().collect();
        assert_eq!(parties.len(), 1);
        assert_eq!(parties[0].1.get(&k), Some(150.0));
        assert_eq!(party_file_stem("Montana Republican"), "montana-republican");
    }

    #[test]
    fn split_percentages() {
        let mut s = CategorySplit::default();
        assert_eq!(s.percentages(), [0.0; 4]);
        assert_eq!(s.dominant(), None);
        s.add(PartyCategory::Republican, 75.0);
        s.add(PartyCategory::Nonpartisan, 25.0);
        assert_eq!(s.percentages(), [75.0, 0.0, 0.0, 25.0]);
        assert_eq!(s.dominant(), Some((PartyCategory::Republican, 75.0)));
    }

    #[test]
    fn split_ties_go_to_first_category() {
        let mut s = CategorySplit::default();
        s.add(PartyCategory::Democratic, 50.0);
        s.add(PartyCategory::Republican, 50.0);
        assert_eq!(s.dominant(), Some((PartyCategory::Republican, 50.0)));
    }

    #[test]
    fn profiles_merge_party_files() {
        let _ = env_logger::builder().is_test(true).try_init();
        let tables = vec![
            (
                "republican".to_string(),
                party_table(&[&["", "Mike", "Nelson", "300", "100"], &["Acme", "", "", "50", "25"]]),
            ),
            (
                "democratic".to_string(),
                party_table(&[&["", "MIKE", "nelson", "100", "100"]]),
            ),
        ];
        let profiles = build_profiles(&tables);
        assert_eq!(profiles.len(), 2);
        let mike = &profiles[0];
        assert_eq!(mike.donor.display_name(), "Mike Nelson");
        assert_eq!(mike.historical_total(), 400.0);
        assert_eq!(mike.party_count(), 2);
        assert_eq!(mike.campaign_share(), Some(25.0));
        assert_eq!(mike.split().dominant(), Some((PartyCategory::Republican, 75.0)));
        assert_eq!(profiles[1].donor.display_name(), "Acme");

        let summary = summarize_campaign("Jane Doe", &profiles);
        assert_eq!(summary.donors, 2);
        assert_eq!(summary.total_raised, 125.0);
        assert_eq!(summary.mean_contribution, 62.5);
        assert_eq!(summary.median_contribution, 62.5);
        assert_eq!(summary.split.amount(PartyCategory::Republican), 350.0);
    }

    #[test]
    fn medians() {
        assert_eq!(median(&[]), None);
        assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(&[4.0, 1.0, 2.0, 3.0]), Some(2.5));
    }
}
