//! Administrative report building.
//!
//! Reports are assembled from the enrollments' already-reconciled aggregate
//! fields; nothing in this module recomputes balances from payment rows.

pub mod csv;
pub mod types;

pub use csv::render_collections_csv;
pub use types::{CollectionsReport, CollectionsTotals, EnrollmentCollectionRow};
