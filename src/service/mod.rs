pub mod agents;
pub mod assistant;
pub mod intent;

pub use assistant::SqlAssistant;
pub use intent::Intent;
