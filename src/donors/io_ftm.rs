// Client side of FollowTheMoney: the HTML entity search and the JSON entity histories.

use regex::Regex;
use reqwest::Url;
use scraper::{ElementRef, Html, Selector};
use serde_json::Value as JSValue;
use std::path::Path;
use std::thread;
use std::time::{Duration, Instant};

use crate::donors::{config_reader::*, io_common::*, *};

pub const FTM_ROOT: &str = "https://www.followthemoney.org";

/// One positive-dollar row of a search result page.
#[derive(PartialEq, Debug, Clone)]
pub struct SearchHit {
    pub name: String,
    pub href: String,
    pub amount: f64,
}

fn selector(s: &str) -> Option<Selector> {
    match Selector::parse(s) {
        Ok(sel) => Some(sel),
        Err(e) => {
            warn!("selector: cannot parse {:?}: {:?}", s, e);
            None
        }
    }
}

fn element_text(e: &ElementRef) -> String {
    e.text().collect::<String>().trim().to_string()
}

/// Extracts the matches with a positive amount from a search result page.
///
/// Every `tbody tr` with at least three cells is a match. The last cell is
/// the amount, the second one holds the link to the entity.
pub fn parse_search_results(html: &str) -> Vec<SearchHit> {
    let (row_sel, td_sel, a_sel) = match (selector("tbody tr"), selector("td"), selector("a")) {
        (Some(r), Some(t), Some(a)) => (r, t, a),
        _ => return Vec::new(),
    };
    let document = Html::parse_document(html);
    let mut res: Vec<SearchHit> = Vec::new();
    for tr in document.select(&row_sel) {
        let tds: Vec<ElementRef> = tr.select(&td_sel).collect();
        if tds.len() < 3 {
            continue;
        }
        let amount = tds
            .last()
            .map(|td| parse_amount_lenient(&element_text(td)))
            .unwrap_or(0.0);
        if amount <= 0.0 {
            continue;
        }
        let link = match tds[1].select(&a_sel).next() {
            Some(a) => a,
            None => continue,
        };
        let href = match link.value().attr("href") {
            Some(h) if !h.trim().is_empty() => normalize_href(h),
            _ => continue,
        };
        res.push(SearchHit {
            name: format_last_first(&element_text(&link)),
            href,
            amount,
        });
    }
    debug!("parse_search_results: {} hits", res.len());
    res
}

/// Makes site-relative links absolute.
pub fn normalize_href(href: &str) -> String {
    let href = href.trim();
    if href.starts_with('/') {
        if let Ok(joined) = Url::parse(FTM_ROOT).and_then(|root| root.join(href)) {
            return joined.to_string();
        }
    }
    href.to_string()
}

/// The entity id of an entity link: `/entity-details?eid=49301129` gives `49301129`.
///
/// Falls back to the last run of digits of the link, then to the link itself.
pub fn extract_eid(href: &str) -> String {
    let href = href.trim();
    let from_query = Url::parse(href)
        .or_else(|_| Url::parse(FTM_ROOT).and_then(|root| root.join(href)))
        .ok()
        .and_then(|u| {
            u.query_pairs()
                .find(|(k, _)| k == "eid")
                .map(|(_, v)| v.chars().filter(|c| c.is_ascii_digit()).collect::<String>())
        })
        .filter(|eid| !eid.is_empty());
    if let Some(eid) = from_query {
        return eid;
    }
    Regex::new(r"\d+")
        .ok()
        .and_then(|re| re.find_iter(href).last().map(|m| m.as_str().to_string()))
        .unwrap_or_else(|| href.to_string())
}

fn quote_plus(s: &str) -> String {
    urlencoding::encode(s).replace("%20", "+")
}

/// The `eid` search term: `:Mike+J+Nelson` for a person, `:Acme+LLC` for an organisation.
pub fn build_query(query: &DonorQuery) -> String {
    match query {
        DonorQuery::Name {
            first,
            middle,
            last,
        } if !middle.is_empty() => format!(
            ":{}+{}+{}",
            quote_plus(first),
            quote_plus(middle),
            quote_plus(last)
        ),
        DonorQuery::Name { first, last, .. } => {
            format!(":{}+{}", quote_plus(first), quote_plus(last))
        }
        DonorQuery::Entity(name) => format!(":{}", quote_plus(name)),
    }
}

pub fn search_url(
    base: &str,
    query: &DonorQuery,
    state: &str,
    donor_state: &str,
) -> DonorResult<Url> {
    let eid = build_query(query);
    Url::parse_with_params(
        base,
        &[
            ("navType", "1"),
            ("noclicky", "1"),
            ("eid", eid.as_str()),
            ("s", state),
            ("y", ""),
            ("add-s", donor_state),
        ],
    )
    .map_err(|e| {
        BadUrlSnafu {
            url: base.to_string(),
            reason: e.to_string(),
        }
        .build()
    })
}

/// Amounts in the histories are strings with thousands separators, or plain numbers.
fn history_amount(v: &JSValue) -> f64 {
    match v {
        JSValue::Number(n) => n.as_f64().unwrap_or(0.0),
        JSValue::String(s) => s.replace(',', "").trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    }
}

/// One line of an entity's giving history.
#[derive(PartialEq, Debug, Clone)]
pub struct PartyRecord {
    pub party: String,
    pub amount: f64,
}

/// Reads `records[].Party.Party` and `records[]."Total_$"."Total_$"`.
/// Records without party or with a non-positive amount are dropped.
pub fn parse_entity_history(js: &JSValue) -> Vec<PartyRecord> {
    let records = match js["records"].as_array() {
        Some(r) => r,
        None => return Vec::new(),
    };
    records
        .iter()
        .filter_map(|rec| {
            let party = rec["Party"]["Party"].as_str().unwrap_or("").trim().to_string();
            let amount = history_amount(&rec["Total_$"]["Total_$"]);
            if party.is_empty() || amount <= 0.0 {
                None
            } else {
                Some(PartyRecord { party, amount })
            }
        })
        .collect()
}

// ********* Sources ***********

/// Where the search result pages come from.
pub trait SearchSource {
    fn search(&self, query: &DonorQuery, donor_state: &str) -> DonorResult<String>;
}

/// Where the entity histories come from.
pub trait HistorySource {
    fn history(&self, eid: &str) -> DonorResult<JSValue>;
}

/// The live service. Every request, successful or not, is followed by a pause.
pub struct FtmClient {
    client: reqwest::blocking::Client,
    settings: FtmSettings,
}

/// No timeout at all when the deadline would not fit in an `Instant`.
fn request_timeout(timeout: Duration) -> Option<Duration> {
    Instant::now().checked_add(timeout).map(|_| timeout)
}

impl FtmClient {
    pub fn new(settings: &FtmSettings) -> DonorResult<FtmClient> {
        let client = reqwest::blocking::Client::builder()
            .timeout(request_timeout(settings.timeout))
            .user_agent(settings.user_agent.clone())
            .build()
            .context(HttpRequestSnafu {
                url: settings.search_url.clone(),
            })?;
        Ok(FtmClient {
            client,
            settings: settings.clone(),
        })
    }

    fn get(&self, url: &str, pause: Duration) -> DonorResult<String> {
        debug!("get: {}", url);
        let res = self.fetch(url);
        thread::sleep(pause);
        res
    }

    fn fetch(&self, url: &str) -> DonorResult<String> {
        let resp = self
            .client
            .get(url)
            .send()
            .context(HttpRequestSnafu { url })?;
        let status = resp.status().as_u16();
        ensure!(status == 200, HttpStatusSnafu { status, url });
        resp.text().context(HttpRequestSnafu { url })
    }
}

impl SearchSource for FtmClient {
    fn search(&self, query: &DonorQuery, donor_state: &str) -> DonorResult<String> {
        let url = search_url(
            &self.settings.search_url,
            query,
            &self.settings.state,
            donor_state,
        )?;
        self.get(url.as_str(), self.settings.delay)
    }
}

impl HistorySource for FtmClient {
    fn history(&self, eid: &str) -> DonorResult<JSValue> {
        let url = self.settings.entity_url.replace("{eid}", eid);
        let text = self.get(&url, self.settings.history_delay)?;
        serde_json::from_str(&text).context(ParsingJsonSnafu { path: url })
    }
}

/// A saved result page returned for every query.
pub struct FixedPage {
    html: String,
}

impl FixedPage {
    pub fn new(html: &str) -> FixedPage {
        FixedPage {
            html: html.to_string(),
        }
    }

    pub fn read(path: &Path) -> DonorResult<FixedPage> {
        Ok(FixedPage {
            html: read_to_string(path)?,
        })
    }
}

impl SearchSource for FixedPage {
    fn search(&self, _query: &DonorQuery, _donor_state: &str) -> DonorResult<String> {
        Ok(self.html.clone())
    }
}

/// Saved histories, one `{eid}.json` file per entity.
pub struct FixtureHistory {
    dir: PathBuf,
}

impl FixtureHistory {
    pub fn new(dir: &Path) -> FixtureHistory {
        FixtureHistory {
            dir: dir.to_path_buf(),
        }
    }
}

impl HistorySource for FixtureHistory {
    fn history(&self, eid: &str) -> DonorResult<JSValue> {
        let p = self.dir.join(format!("{}.json", eid));
        let contents = read_to_string(&p)?;
        serde_json::from_str(&contents).context(ParsingJsonSnafu {
            path: p.display().to_string(),
        })
    }
}
