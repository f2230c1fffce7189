/*!

This is the long-form manual for `donor_analysis` and `c7donors`.

## Directory layout

The raw filings are organised per city and per candidate:

```text
candidate-data-raw/
  missoula/
    jennifer-owen/
      c7-2025-q1.csv
      c7-2025-q2.xlsx
```

Each file is an export of C7 forms. CSV files may use `,`, `|`, `;` or tabs
as delimiter, the delimiter is detected from the first lines. Excel files are
read from their first worksheet.

The pipeline then produces:

```text
data/{candidate}-contributions.csv        collect: all the filings of a candidate, `|` delimited
totals.txt                                totals: amount raised per candidate
output/donors-{candidate}.csv             search: donors matched on FollowTheMoney
by-donor-output/{candidate}/{party}.csv   party: historical giving per party
by-donor-output/{candidate}-duplicates.txt
by-donor-output/splits.csv                splits: party split per candidate
by-donor-output/{candidate}-report.csv    report: donors against their giving history
by-donor-output/report.json
```

## Commands

### `collect`

Merges the filings of every candidate in the raw directory into one
contributions file. The columns of the merged file are the union of the columns
of all the filings. Two candidate folders with the same name in different
cities are rejected.

### `clean [DIR]`

Rewrites every CSV file of `DIR` (default `data`) without duplicated rows and
sorted by the first column whose name starts with `Date`. Rows with a missing or
unreadable date go last.

### `totals`

Sums the first column mentioning `amount` of every `*-contributions.csv` file
and writes one `name: $1,234` line per candidate.

### `search`

Looks up every donor of every contributions file on FollowTheMoney. People are
searched by name (with middle initial when present), organisations by entity
name. Every positive-dollar match is written with its FollowTheMoney entity id
(`eid`) and the total given to the candidate. `--test-html` replaces all the
lookups with a saved result page.

### `lookup FIRST LAST`

Prints the positive-dollar matches of one search, as `Name href`.

### `party`

Fetches the giving history of every `eid` and writes, per candidate and per
party, the amount each donor gave to that party. `--fixtures DIR` reads the
histories from `DIR/{eid}.json` instead of the network.

### `dedupe-parties`

Donors that appear in `republican.csv` or `democratic.csv` are removed from the
nonpartisan and third-party files of the same candidate: nominally
non-partisan races are often driven by the same partisan donors.

### `duplicates`

Lists the donors present in several party files of a candidate.

### `splits`

Computes the share of republican, democratic, third-party and nonpartisan money
behind every candidate. `--reference` compares the result with a previous output.

### `report`

Relates what each donor gave to a candidate to their giving history: historical
total, dominant party and its share, and the contribution as a share of the history.

### `all`

Runs every stage in order.

## Configuration

All the paths and the FollowTheMoney settings have defaults and can be set in a
JSON file passed with `--config`:

```json
{
  "outputSettings": {
    "rawDirectory": "candidate-data-raw",
    "dataDirectory": "data",
    "donorsDirectory": "output",
    "byDonorDirectory": "by-donor-output",
    "totalsFile": "totals.txt"
  },
  "followTheMoney": {
    "state": "MT",
    "delaySeconds": 1.0,
    "historyDelaySeconds": 0.5,
    "timeoutSeconds": 15.0,
    "limit": 0
  },
  "races": [
    { "city": "missoula", "office": "mayor", "cycle": "2025", "candidates": ["jennifer-owen"] }
  ]
}
```

Command line options take precedence over the configuration file.

*/
