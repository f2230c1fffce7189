/*!
Donor identity resolution.

The same donor shows up across filings with small variations: case, stray
whitespace, `LAST, FIRST` ordering. Every identity is reduced to a [`DonorKey`]
made of case-folded, whitespace-collapsed components. Resolution is idempotent:
resolving an already canonical identity gives it back unchanged.
*/

/// Lowercases and collapses all runs of whitespace to a single space.
pub fn normalize_name(s: &str) -> String {
    s.split_whitespace()
        .map(|w| w.to_lowercase())
        .collect::<Vec<String>>()
        .join(" ")
}

/// Title-cases a string: the first letter of every run of letters is
/// uppercased, the other letters are lowercased.
///
/// `o'neil` becomes `O'Neil`, `MCDONALD` becomes `Mcdonald`.
pub fn title_case(s: &str) -> String {
    let mut res = String::with_capacity(s.len());
    let mut prev_is_letter = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if prev_is_letter {
                res.extend(c.to_lowercase());
            } else {
                res.extend(c.to_uppercase());
            }
            prev_is_letter = true;
        } else {
            res.push(c);
            prev_is_letter = false;
        }
    }
    res
}

/// Formats a name as it appears in search listings (`NELSON, MIKE`) into `Mike Nelson`.
pub fn format_last_first(raw: &str) -> String {
    match raw.split_once(',') {
        Some((last, first)) => {
            format!("{} {}", title_case(first.trim()), title_case(last.trim()))
        }
        None => title_case(raw),
    }
}

/// A donor as written in a filing, with all the fields trimmed.
#[derive(Eq, PartialEq, Debug, Clone, Hash, Default)]
pub struct DonorIdentity {
    pub entity_name: String,
    pub first_name: String,
    pub middle_initial: String,
    pub last_name: String,
    pub city: String,
    pub state: String,
}

/// The lookup that identifies a donor on the donor-history service.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum DonorQuery {
    Name {
        first: String,
        middle: String,
        last: String,
    },
    Entity(String),
}

impl DonorIdentity {
    pub fn new(
        entity_name: &str,
        first_name: &str,
        middle_initial: &str,
        last_name: &str,
        city: &str,
        state: &str,
    ) -> DonorIdentity {
        DonorIdentity {
            entity_name: entity_name.trim().to_string(),
            first_name: first_name.trim().to_string(),
            middle_initial: middle_initial.trim().to_string(),
            last_name: last_name.trim().to_string(),
            city: city.trim().to_string(),
            state: state.trim().to_string(),
        }
    }

    /// A person without middle initial or address, as found in the party files.
    pub fn person(entity_name: &str, first_name: &str, last_name: &str) -> DonorIdentity {
        DonorIdentity::new(entity_name, first_name, "", last_name, "", "")
    }

    /// The canonical form of this identity.
    pub fn canonical(&self) -> DonorIdentity {
        DonorIdentity {
            entity_name: normalize_name(&self.entity_name),
            first_name: normalize_name(&self.first_name),
            middle_initial: normalize_name(self.middle_initial.trim_end_matches('.')),
            last_name: normalize_name(&self.last_name),
            city: normalize_name(&self.city),
            state: normalize_name(&self.state),
        }
    }

    pub fn key(&self) -> DonorKey {
        DonorKey(self.canonical())
    }

    /// Either `first last` or the entity name.
    pub fn display_name(&self) -> String {
        if !self.first_name.is_empty() || !self.last_name.is_empty() {
            format!("{} {}", self.first_name, self.last_name)
                .trim()
                .to_string()
        } else {
            self.entity_name.clone()
        }
    }

    /// People are looked up by name, organisations by entity name.
    /// Rows with neither cannot be looked up.
    pub fn query(&self) -> Option<DonorQuery> {
        if !self.first_name.is_empty() && !self.last_name.is_empty() {
            Some(DonorQuery::Name {
                first: self.first_name.clone(),
                middle: self.middle_initial.clone(),
                last: self.last_name.clone(),
            })
        } else if !self.entity_name.is_empty() {
            Some(DonorQuery::Entity(self.entity_name.clone()))
        } else {
            None
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entity_name.is_empty() && self.first_name.is_empty() && self.last_name.is_empty()
    }
}

/// The resolved identity of a donor. Two rows belong to the same donor
/// exactly when their keys are equal.
#[derive(Eq, PartialEq, Debug, Clone, Hash, Ord, PartialOrd)]
pub struct DonorKey(DonorIdentity);

impl DonorKey {
    pub fn identity(&self) -> &DonorIdentity {
        &self.0
    }

    /// A short stable identifier for this donor.
    pub fn id(&self) -> String {
        let d = &self.0;
        let joined = [
            d.entity_name.as_str(),
            d.first_name.as_str(),
            d.middle_initial.as_str(),
            d.last_name.as_str(),
            d.city.as_str(),
            d.state.as_str(),
        ]
        .join("\u{1f}");
        let digest = sha256::digest(joined.as_str());
        digest[..16].to_string()
    }
}

impl Ord for DonorIdentity {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (
            &self.entity_name,
            &self.last_name,
            &self.first_name,
            &self.middle_initial,
            &self.city,
            &self.state,
        )
            .cmp(&(
                &other.entity_name,
                &other.last_name,
                &other.first_name,
                &other.middle_initial,
                &other.city,
                &other.state,
            ))
    }
}

impl PartialOrd for DonorIdentity {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_collapses_case_and_spaces() {
        assert_eq!(normalize_name("  John   SMITH "), "john smith");
        assert_eq!(normalize_name(""), "");
    }

    #[test]
    fn title_case_like_names() {
        assert_eq!(title_case("NELSON"), "Nelson");
        assert_eq!(title_case("o'neil"), "O'Neil");
        assert_eq!(title_case("smith-jones"), "Smith-Jones");
    }

    #[test]
    fn last_first_is_reordered() {
        assert_eq!(format_last_first("NELSON, MIKE"), "Mike Nelson");
        assert_eq!(format_last_first("Smith, John"), "John Smith");
        assert_eq!(format_last_first("FLATHEAD COUNTY REPUBLICANS"), "Flathead County Republicans");
    }

    #[test]
    fn resolution_is_idempotent() {
        let raw = DonorIdentity::new("", " Mike ", "J.", "NELSON", "Missoula ", "MT");
        let once = raw.canonical();
        let twice = once.canonical();
        assert_eq!(once, twice);
        assert_eq!(raw.key(), once.key());
        assert_eq!(raw.key().id(), twice.key().id());
    }

    #[test]
    fn variants_resolve_to_same_key() {
        let a = DonorIdentity::new("", "Mike", "J", "Nelson", "Missoula", "MT");
        let b = DonorIdentity::new("", "MIKE", "j.", "nelson", " missoula", "mt");
        let c = DonorIdentity::new("", "Mike", "", "Nelson", "Missoula", "MT");
        assert_eq!(a.key(), b.key());
        assert_ne!(a.key(), c.key());
        assert_eq!(a.key().id().len(), 16);
    }

    #[test]
    fn query_prefers_names() {
        let person = DonorIdentity::new("Acme", "Jo", "", "Doe", "", "");
        assert_eq!(
            person.query(),
            Some(DonorQuery::Name {
                first: "Jo".to_string(),
                middle: "".to_string(),
                last: "Doe".to_string()
            })
        );
        let org = DonorIdentity::new("Acme", "Jo", "", "", "", "");
        assert_eq!(org.query(), Some(DonorQuery::Entity("Acme".to_string())));
        assert_eq!(DonorIdentity::default().query(), None);
        assert_eq!(org.display_name(), "Jo");
        assert_eq!(DonorIdentity::person("Acme", "", "").display_name(), "Acme");
    }
}
