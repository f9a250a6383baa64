//! Per-intent statement prompts.

use crate::service::intent::Intent;

const NO_PROSE: &str = "Do NOT output any text or explanation other than the SQL query itself.";
const NO_FENCES: &str = "Do not include any backticks such as (```sql) in the output.";

/// Prompt asking the model for one statement of the kind `intent` calls for.
///
/// `schema` and `query` are embedded verbatim.
pub fn generation_prompt(intent: Intent, schema: &str, query: &str) -> String {
    let task = match intent {
        Intent::Create => {
            "generate a valid SQL DDL statement for creating a table or other database objects"
        }
        Intent::Read => "generate a valid SQL query to retrieve information from the database",
        Intent::Update => {
            "generate a valid SQL DML statement to modify data or table structures. \
             This includes INSERT, UPDATE, and ALTER statements"
        }
        Intent::Delete => {
            "generate a valid SQL DML/DDL statement to delete data or drop database objects"
        }
    };

    let steps: &[&str] = match intent {
        Intent::Create => &[
            "Analyze the user's query to understand the required table structure, column names, and data types.",
            "Generate a single, complete `CREATE TABLE` or similar DDL SQL statement.",
            NO_PROSE,
            NO_FENCES,
        ],
        Intent::Read => &[
            "Analyze the user's query to understand what information they want to retrieve.",
            "Generate a single, complete `SELECT`, `SHOW`, or `DESCRIBE` SQL statement.",
            NO_PROSE,
            NO_FENCES,
        ],
        Intent::Update => &[
            "Analyze the user's query to understand what data or structure needs to be modified.",
            "Generate a single, complete `UPDATE`, `INSERT`, or `ALTER TABLE` SQL statement.",
            NO_PROSE,
            NO_FENCES,
        ],
        Intent::Delete => &[
            "Analyze the user's query to understand what data or objects need to be deleted.",
            "Generate a single, complete `DELETE FROM`, `DROP TABLE`, or `TRUNCATE TABLE` SQL statement.",
            "Be cautious with `DROP` and `DELETE` operations. Ensure there's a `WHERE` clause if appropriate.",
            NO_PROSE,
            NO_FENCES,
        ],
    };

    let instructions = steps
        .iter()
        .enumerate()
        .map(|(i, step)| format!("{}. {step}", i + 1))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "You are an expert MySQL developer. Your task is to {task} based on the user's query and the database schema.\n\
         \n\
         Database Schema:\n\
         {schema}\n\
         \n\
         User Query:\n\
         {query}\n\
         \n\
         Instructions:\n\
         {instructions}\n"
    )
}

/// The model's reply, trimmed, is the statement.
pub fn statement_from_reply(reply: &str) -> String {
    reply.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCHEMA: &str = "Table: users\n  - id (int)\n  - email (varchar(255))\n";

    #[test]
    fn every_prompt_embeds_schema_and_query_verbatim() {
        for intent in Intent::ALL {
            let prompt = generation_prompt(intent, SCHEMA, "who signed up today?");
            assert!(prompt.contains(&format!("Database Schema:\n{SCHEMA}\n")), "{intent}");
            assert!(prompt.contains("User Query:\nwho signed up today?\n"), "{intent}");
            assert!(prompt.contains(NO_PROSE), "{intent}");
        }
    }

    #[test]
    fn instructions_are_specific_to_the_intent() {
        let create = generation_prompt(Intent::Create, SCHEMA, "q");
        assert!(create.contains("2. Generate a single, complete `CREATE TABLE`"));

        let read = generation_prompt(Intent::Read, SCHEMA, "q");
        assert!(read.contains("`SELECT`, `SHOW`, or `DESCRIBE`"));
        assert!(!read.contains("CREATE TABLE"));

        let update = generation_prompt(Intent::Update, SCHEMA, "q");
        assert!(update.contains("`UPDATE`, `INSERT`, or `ALTER TABLE`"));

        let delete = generation_prompt(Intent::Delete, SCHEMA, "q");
        assert!(delete.contains("3. Be cautious with `DROP` and `DELETE` operations."));
        assert!(delete.contains("5. Do not include any backticks"));
    }

    #[test]
    fn reply_is_trimmed_but_otherwise_untouched() {
        assert_eq!(
            statement_from_reply("\n  SELECT * FROM users WHERE email LIKE '%@x.io'  \n"),
            "SELECT * FROM users WHERE email LIKE '%@x.io'"
        );
    }
}
