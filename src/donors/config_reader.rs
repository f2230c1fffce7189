use crate::donors::*;

use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_SEARCH_URL: &str =
    "https://www.followthemoney.org/metaselect/full/entitySearch.php";
pub const DEFAULT_ENTITY_URL: &str =
    "https://www.followthemoney.org/aaengine/aafetch.php?d-eid={eid}&gro=d-par&mode=json";
pub const DEFAULT_USER_AGENT: &str = "c7donors/0.1 (+https://github.com)";

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct OutputSettings {
    #[serde(rename = "rawDirectory")]
    pub raw_directory: Option<String>,
    #[serde(rename = "dataDirectory")]
    pub data_directory: Option<String>,
    #[serde(rename = "donorsDirectory")]
    pub donors_directory: Option<String>,
    #[serde(rename = "byDonorDirectory")]
    pub by_donor_directory: Option<String>,
    #[serde(rename = "totalsFile")]
    pub totals_file: Option<String>,
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct FtmConfig {
    pub state: Option<String>,
    #[serde(rename = "searchUrl")]
    pub search_url: Option<String>,
    #[serde(rename = "entityUrl")]
    pub entity_url: Option<String>,
    #[serde(rename = "userAgent")]
    pub user_agent: Option<String>,
    #[serde(rename = "delaySeconds")]
    pub delay_seconds: Option<f64>,
    #[serde(rename = "historyDelaySeconds")]
    pub history_delay_seconds: Option<f64>,
    #[serde(rename = "timeoutSeconds")]
    pub timeout_seconds: Option<f64>,
    pub limit: Option<usize>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct RaceConfig {
    pub city: String,
    pub office: String,
    pub cycle: String,
    #[serde(default)]
    pub candidates: Vec<String>,
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DonorConfig {
    #[serde(rename = "outputSettings")]
    pub output_settings: OutputSettings,
    #[serde(rename = "followTheMoney")]
    pub follow_the_money: FtmConfig,
    pub races: Vec<RaceConfig>,
}

/// The FollowTheMoney settings once the defaults are applied.
#[derive(PartialEq, Debug, Clone)]
pub struct FtmSettings {
    pub state: String,
    pub search_url: String,
    pub entity_url: String,
    pub user_agent: String,
    pub delay: Duration,
    pub history_delay: Duration,
    pub timeout: Duration,
    pub limit: usize,
}

/// Everything a stage needs to know, once the configuration file and the defaults are merged.
#[derive(PartialEq, Debug, Clone)]
pub struct Settings {
    pub raw_dir: PathBuf,
    pub data_dir: PathBuf,
    pub donors_dir: PathBuf,
    pub by_donor_dir: PathBuf,
    pub totals_file: PathBuf,
    pub ftm: FtmSettings,
    pub races: Vec<RaceConfig>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings::from_config(&DonorConfig::default())
    }
}

impl Settings {
    pub fn from_config(config: &DonorConfig) -> Settings {
        let o = &config.output_settings;
        let f = &config.follow_the_money;
        let dir = |v: &Option<String>, default: &str| {
            PathBuf::from(v.clone().unwrap_or_else(|| default.to_string()))
        };
        Settings {
            raw_dir: dir(&o.raw_directory, "candidate-data-raw"),
            data_dir: dir(&o.data_directory, "data"),
            donors_dir: dir(&o.donors_directory, "output"),
            by_donor_dir: dir(&o.by_donor_directory, "by-donor-output"),
            totals_file: dir(&o.totals_file, "totals.txt"),
            ftm: FtmSettings {
                state: f.state.clone().unwrap_or_else(|| "MT".to_string()),
                search_url: f
                    .search_url
                    .clone()
                    .unwrap_or_else(|| DEFAULT_SEARCH_URL.to_string()),
                entity_url: f
                    .entity_url
                    .clone()
                    .unwrap_or_else(|| DEFAULT_ENTITY_URL.to_string()),
                user_agent: f
                    .user_agent
                    .clone()
                    .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
                delay: seconds(f.delay_seconds.unwrap_or(1.0)),
                history_delay: seconds(f.history_delay_seconds.unwrap_or(0.5)),
                timeout: seconds(f.timeout_seconds.unwrap_or(15.0)),
                limit: f.limit.unwrap_or(0),
            },
            races: config.races.clone(),
        }
    }

    /// The race a candidate (folder name) runs in, if one is configured.
    /// When a city is given, the race must be in that city.
    pub fn race_of(&self, city: Option<&str>, candidate: &str) -> Option<Race> {
        self.races
            .iter()
            .filter(|r| city.map(|c| c == r.city).unwrap_or(true))
            .find(|r| r.candidates.iter().any(|c| c == candidate))
            .map(|r| Race {
                city: r.city.clone(),
                office: r.office.clone(),
                cycle: r.cycle.clone(),
            })
    }
}

/// Negative or non-finite values are treated as zero, values too large for a
/// `Duration` as the longest one.
pub fn seconds(x: f64) -> Duration {
    if x.is_finite() && x > 0.0 {
        Duration::try_from_secs_f64(x).unwrap_or(Duration::MAX)
    } else {
        Duration::ZERO
    }
}

pub fn read_config(path: &str) -> DonorResult<DonorConfig> {
    let contents = fs::read_to_string(path).context(OpeningFileSnafu { path })?;
    let config: DonorConfig =
        serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu { path })?;
    debug!("read_config: {:?}", config);
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_config() {
        let s = Settings::default();
        assert_eq!(s.data_dir, PathBuf::from("data"));
        assert_eq!(s.by_donor_dir, PathBuf::from("by-donor-output"));
        assert_eq!(s.ftm.state, "MT");
        assert_eq!(s.ftm.delay, Duration::from_secs(1));
        assert_eq!(s.ftm.limit, 0);
    }

    #[test]
    fn partial_config_keeps_defaults() {
        let js = r#"{
            "outputSettings": {"dataDirectory": "filings"},
            "followTheMoney": {"state": "WY", "delaySeconds": 0},
            "races": [{"city": "missoula", "office": "mayor", "cycle": "2025", "candidates": ["jane-doe"]}]
        }"#;
        let config: DonorConfig = serde_json::from_str(js).unwrap();
        let s = Settings::from_config(&config);
        assert_eq!(s.data_dir, PathBuf::from("filings"));
        assert_eq!(s.donors_dir, PathBuf::from("output"));
        assert_eq!(s.ftm.state, "WY");
        assert_eq!(s.ftm.delay, Duration::ZERO);
        let race = s.race_of(Some("missoula"), "jane-doe").unwrap();
        assert_eq!(race.office, "mayor");
        assert_eq!(s.race_of(None, "jane-doe"), Some(race));
        assert_eq!(s.race_of(Some("helena"), "jane-doe"), None);
        assert_eq!(s.race_of(None, "john-roe"), None);
    }

    #[test]
    fn durations_from_seconds() {
        assert_eq!(seconds(1.5), Duration::from_millis(1500));
        assert_eq!(seconds(-2.0), Duration::ZERO);
        assert_eq!(seconds(f64::NAN), Duration::ZERO);
        assert_eq!(seconds(1e300), Duration::MAX);

        let js = r#"{"followTheMoney": {"timeoutSeconds": 1e300}}"#;
        let config: DonorConfig = serde_json::from_str(js).unwrap();
        assert_eq!(Settings::from_config(&config).ftm.timeout, Duration::MAX);
    }
}
