pub mod query_input;

pub use query_input::UserQuery;
