/*!
Donor identity resolution and giving aggregation for C7 campaign contribution filings.

This crate holds the data model and the pure transformations of the
`c7donors` pipeline: it does not touch the file system or the network.

* [`Table`] is the in-memory form of every delimited file.
* [`DonorIdentity`] and [`DonorKey`] resolve the many spellings of a donor to one identity.
* [`contributions_from_table`] turns a C7 export into [`ContributionRecord`]s.
* [`donor_totals`], [`PartyTotals`] and [`CategorySplit`] aggregate giving.
* [`clean_table`], [`remove_known_donors`] and [`find_duplicates`] prune the data.
* [`build_profiles`] and [`summarize_campaign`] produce the per-campaign report.

See the [manual] for the directory layout and the full pipeline.
*/

mod aggregate;
mod contributions;
mod dates;
mod dedupe;
mod model;
mod money;
mod normalize;
mod table;

pub mod manual;

pub use crate::aggregate::*;
pub use crate::contributions::*;
pub use crate::dates::*;
pub use crate::dedupe::*;
pub use crate::model::*;
pub use crate::money::*;
pub use crate::normalize::*;
pub use crate::table::*;
