// Runs the c7donors binary over the fixtures of tests/data.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use serde_json::json;
use serde_json::Value as JSValue;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join(name)
}

fn c7donors(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_c7donors"))
        .args(args)
        .output()
        .unwrap()
}

fn lines(p: &Path) -> Vec<String> {
    fs::read_to_string(p)
        .unwrap()
        .lines()
        .map(|s| s.to_string())
        .collect()
}

fn path_str(p: &Path) -> String {
    p.display().to_string()
}

/// A configuration with every output under `work`.
fn write_config(work: &Path) -> PathBuf {
    let config = json!({
        "outputSettings": {
            "rawDirectory": path_str(&fixture("candidate-data-raw")),
            "dataDirectory": path_str(&work.join("data")),
            "donorsDirectory": path_str(&work.join("output")),
            "byDonorDirectory": path_str(&work.join("by-donor-output")),
            "totalsFile": path_str(&work.join("totals.txt"))
        },
        "followTheMoney": { "delaySeconds": 0, "historyDelaySeconds": 0 },
        "races": [
            { "city": "missoula", "office": "mayor", "cycle": "2025", "candidates": ["jennifer-owen"] }
        ]
    });
    let p = work.join("config.json");
    fs::write(&p, serde_json::to_string_pretty(&config).unwrap()).unwrap();
    p
}

#[test]
fn full_pipeline_over_fixtures() {
    let work = tempfile::tempdir().unwrap();
    let config = write_config(work.path());
    let out = c7donors(&[
        "--config",
        &path_str(&config),
        "all",
        "--test-html",
        &path_str(&fixture("search_results.html")),
        "--fixtures",
        &path_str(&fixture("history")),
    ]);
    assert!(
        out.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&out.stderr)
    );
    let w = work.path();

    assert_eq!(
        lines(&w.join("data").join("jennifer-owen-contributions.csv")),
        vec![
            "Date Paid|First Name|Middle Initial|Last Name|Entity Name|City|State|Amount|Description",
            "03/15/2025|Ann||Lee||Missoula|MT|100|",
            "03/20/2025||||Flathead County Republicans|Kalispell|MT|1,000|",
            "04/02/2025|Mike|J|Nelson||Missoula|MT|$250.00|",
            "05/01/2025|MIKE|J.|NELSON||missoula|mt|50|Cash",
        ]
    );
    assert_eq!(
        fs::read_to_string(w.join("totals.txt")).unwrap(),
        "jennifer-owen: $1,400\nsam-park: $115\n"
    );
    assert!(String::from_utf8_lossy(&out.stdout).contains("jennifer-owen: $1,400"));

    assert_eq!(
        lines(&w.join("output").join("donors-jennifer-owen.csv")),
        vec![
            "entityName,firstName,middleInitial,lastName,city,state,eid,donationsToCampaign",
            ",Ann,,Lee,Missoula,MT,101,100.00",
            ",Ann,,Lee,Missoula,MT,102,100.00",
            "Flathead County Republicans,,,,Kalispell,MT,101,1000.00",
            "Flathead County Republicans,,,,Kalispell,MT,102,1000.00",
            ",Mike,J,Nelson,Missoula,MT,101,300.00",
            ",Mike,J,Nelson,Missoula,MT,102,300.00",
        ]
    );

    let by_donor = w.join("by-donor-output");
    let jo = by_donor.join("jennifer-owen");
    assert_eq!(
        lines(&jo.join("republican.csv")),
        vec![
            "entityName,firstName,lastName,amount,donationsToCampaign",
            ",Mike,Nelson,2000,300",
        ]
    );
    assert_eq!(
        lines(&jo.join("democratic.csv"))[1],
        ",Mike,Nelson,200,300"
    );
    // Removed by dedupe-parties: the same donor is in the major party files.
    assert_eq!(lines(&jo.join("libertarian.csv")).len(), 1);

    assert_eq!(
        fs::read_to_string(by_donor.join("jennifer-owen-duplicates.txt")).unwrap(),
        "Mike Nelson $300 democratic/republican\n"
    );
    assert_eq!(
        fs::read_to_string(by_donor.join("sam-park-duplicates.txt")).unwrap(),
        "Ann Lee $75 democratic/republican\n"
    );

    assert_eq!(
        fs::read_to_string(by_donor.join("splits.csv")).unwrap(),
        fs::read_to_string(fixture("splits_expected.csv")).unwrap()
    );

    let report = lines(&by_donor.join("jennifer-owen-report.csv"));
    assert_eq!(report.len(), 2);
    assert!(report[1].ends_with(",Mike Nelson,300,2200,republican,90.91,2,13.64,2000,200,0,0"));

    let js: JSValue =
        serde_json::from_str(&fs::read_to_string(by_donor.join("report.json")).unwrap()).unwrap();
    assert_eq!(js["campaigns"][0]["candidate"], "Jennifer Owen");
    assert_eq!(js["campaigns"][0]["donors"], 1);
    assert_eq!(js["campaigns"][0]["totalRaised"], 300.0);
    assert_eq!(js["campaigns"][1]["candidate"], "Sam Park");
}

#[test]
fn splits_reference_mismatch_fails() {
    let work = tempfile::tempdir().unwrap();
    let root = work.path().join("by-donor-output");
    let candidate = root.join("jennifer-owen");
    fs::create_dir_all(&candidate).unwrap();
    fs::write(
        candidate.join("republican.csv"),
        "entityName,firstName,lastName,amount,donationsToCampaign\n,Mike,Nelson,2000,300\n",
    )
    .unwrap();
    let root_s = path_str(&root);
    let reference = path_str(&fixture("splits_expected.csv"));

    let out = c7donors(&["splits", "--root", &root_s, "--reference", &reference]);
    assert!(!out.status.success());
    assert_eq!(
        lines(&root.join("splits.csv")),
        vec![
            "candidate,republican,democratic,thirdParty,nonpartisan",
            "Jennifer Owen,100.00,0.00,0.00,0.00",
        ]
    );

    let out = c7donors(&["splits", "--root", &root_s]);
    assert!(out.status.success());
}

#[test]
fn lookup_prints_positive_matches() {
    let out = c7donors(&[
        "lookup",
        "--file",
        &path_str(&fixture("search_results.html")),
    ]);
    assert!(out.status.success());
    assert_eq!(
        String::from_utf8_lossy(&out.stdout),
        "Mike Nelson https://www.followthemoney.org/entity-details?eid=101\n\
         Michael J Nelson https://www.followthemoney.org/entity-details?eid=102\n"
    );
}

#[test]
fn collect_rejects_candidate_in_two_cities() {
    let work = tempfile::tempdir().unwrap();
    let raw = work.path().join("raw");
    for city in ["helena", "missoula"].iter() {
        let dir = raw.join(city).join("jane-doe");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("c7.csv"), "First Name,Amount\nJo,5\n").unwrap();
    }
    let out = c7donors(&[
        "collect",
        "--raw-dir",
        &path_str(&raw),
        "--data-dir",
        &path_str(&work.path().join("data")),
    ]);
    assert!(!out.status.success());
    assert!(!work.path().join("data").exists());
}
