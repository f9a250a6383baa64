pub mod cohere;
pub mod record;

pub use record::QueryRecord;
