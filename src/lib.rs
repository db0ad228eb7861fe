//! # Name Atlas
//!
//! A static site generator for baby-name research pages. A curated dataset
//! of first names, surnames, popularity rows, and style categories is turned
//! into thousands of interlinked pages: name profiles, "names like" lists,
//! sibling pairings, surname matches, and filter listings.
//!
//! # Architecture: Two-Stage Pipeline
//!
//! ```text
//! 1. Load      data/    →  Dataset          (JSON + config.toml + pages/*.md)
//! 2. Generate  Dataset  →  dist/            (HTML, sitemap.xml, robots.txt)
//! ```
//!
//! The scoring modules underneath are pure functions over records and carry
//! no I/O, so every ranking can be tested without a dataset on disk.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`dataset`] | Stage 1: loads and validates the data directory, builds lookup indexes |
//! | [`generate`] | Stage 2: renders every page with Maud, enforces content floors, writes through the ledger |
//! | [`phonetics`] | Syllable counting and boundary-letter predicates over spellings |
//! | [`compat`] | First name × surname scoring, smoothness, and flow tiers |
//! | [`harmony`] | Sibling harmony between two first names, top matches and clashes |
//! | [`variants`] | Seeded template selection and placeholder substitution for page prose |
//! | [`guards`] | Word, internal link, and meta description floors per page kind |
//! | [`config`] | Layered `config.toml` loading, validation, and the stock config |
//! | [`cache`] | Content-hash build ledger: unchanged pages are never rewritten |
//! | [`sitemap`] | `sitemap.xml` and `robots.txt` |
//! | [`audit`] | Re-measures an existing output directory against the floors |
//! | [`types`] | Dataset record types and page kinds |
//! | [`naming`] | `NNN-name` file convention and URL slugs |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Deterministic Prose
//!
//! Each page picks its wording from a library of interchangeable templates.
//! The choice is a hash of the page subject, never a random draw, so the same
//! dataset always renders the same bytes. Rebuilding an unchanged dataset is
//! a no-op that the [`cache`] ledger reports as fully unchanged.
//!
//! ## Content Floors Before Output
//!
//! Programmatic pages are only worth publishing when they say something.
//! Every guarded page is rendered and measured before anything is written; a
//! single thin page fails the whole build and leaves `dist/` untouched.
//!
//! ## Maud Over Template Engines
//!
//! HTML is generated with [Maud](https://maud.lambda.xyz/). Dataset strings
//! are interpolated as text and always escaped; only the stylesheet and the
//! rendered Markdown of legal pages go in as raw HTML.

pub mod audit;
pub mod cache;
pub mod compat;
pub mod config;
pub mod dataset;
pub mod generate;
pub mod guards;
pub mod harmony;
pub mod naming;
pub mod output;
pub mod phonetics;
pub mod sitemap;
pub mod types;
pub mod variants;

#[cfg(test)]
pub(crate) mod test_helpers;
