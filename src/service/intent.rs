use serde::{Deserialize, Serialize};
use std::fmt;

/// What the user wants to do to the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Intent {
    Create,
    Read,
    Update,
    Delete,
}

impl Intent {
    pub const ALL: [Intent; 4] = [Intent::Create, Intent::Read, Intent::Update, Intent::Delete];

    pub fn label(self) -> &'static str {
        match self {
            Intent::Create => "CREATE",
            Intent::Read => "READ",
            Intent::Update => "UPDATE",
            Intent::Delete => "DELETE",
        }
    }

    pub fn agent_name(self) -> &'static str {
        match self {
            Intent::Create => "CREATE Agent",
            Intent::Read => "READ Agent",
            Intent::Update => "UPDATE Agent",
            Intent::Delete => "DELETE Agent",
        }
    }

    /// Map a free-text classifier reply onto an intent.
    ///
    /// Substrings are checked in the order CREATE, UPDATE, DELETE; anything
    /// else is READ.
    pub fn from_reply(reply: &str) -> Self {
        let decision = reply.trim().to_uppercase();
        if decision.contains("CREATE") {
            Intent::Create
        } else if decision.contains("UPDATE") {
            Intent::Update
        } else if decision.contains("DELETE") {
            Intent::Delete
        } else {
            Intent::Read
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Instruction sent to the model to classify `query`.
pub fn router_prompt(query: &str) -> String {
    format!(
        r#"
Based on the user's query, classify the intent as one of the following: CREATE, READ, UPDATE, DELETE.
- **CREATE**: User wants to add new structures (e.g., 'make a table', 'create a database').
- **READ**: User wants to ask a question or see data (e.g., 'what is', 'show me', 'list all', 'describe table').
- **UPDATE**: User wants to modify existing data or structures (e.g., 'change', 'modify', 'set', 'alter table', 'insert into').
- **DELETE**: User wants to remove data or structures (e.g., 'remove', 'drop', 'delete from').

User Query: "{query}"

Respond with a single word: CREATE, READ, UPDATE, or DELETE.
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_labels_map_to_themselves() {
        for intent in Intent::ALL {
            assert_eq!(Intent::from_reply(intent.label()), intent);
        }
    }

    #[test]
    fn reply_is_case_and_whitespace_insensitive() {
        assert_eq!(Intent::from_reply("  create\n"), Intent::Create);
        assert_eq!(Intent::from_reply("Delete."), Intent::Delete);
        assert_eq!(Intent::from_reply("The intent is: update"), Intent::Update);
    }

    #[test]
    fn unrecognised_reply_defaults_to_read() {
        assert_eq!(Intent::from_reply(""), Intent::Read);
        assert_eq!(Intent::from_reply("SELECT"), Intent::Read);
        assert_eq!(Intent::from_reply("I am not sure"), Intent::Read);
        assert_eq!(Intent::from_reply("INSERT"), Intent::Read);
    }

    #[test]
    fn create_wins_over_update_and_delete() {
        assert_eq!(Intent::from_reply("DELETE or CREATE"), Intent::Create);
        assert_eq!(Intent::from_reply("UPDATE then CREATE"), Intent::Create);
        assert_eq!(Intent::from_reply("DELETE, maybe UPDATE"), Intent::Update);
    }

    #[test]
    fn router_prompt_quotes_the_query() {
        let prompt = router_prompt("drop the sessions table");
        assert!(prompt.contains("User Query: \"drop the sessions table\""));
        assert!(prompt.contains("Respond with a single word: CREATE, READ, UPDATE, or DELETE."));
    }

    #[test]
    fn labels_serialize_upper_case() {
        assert_eq!(serde_json::to_string(&Intent::Delete).unwrap(), "\"DELETE\"");
        assert_eq!(Intent::Update.to_string(), "UPDATE");
        assert_eq!(Intent::Read.agent_name(), "READ Agent");
    }
}
