//! Synthetic user record generation tool.

use super::traits::{Tool, ToolResult};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::json;

const FIRST_NAMES: [&str; 5] = ["Alice", "Bob", "Charlie", "Diana", "Ethan"];
const LAST_NAMES: [&str; 5] = ["Smith", "Johnson", "Williams", "Brown", "Jones"];
const DOMAINS: [&str; 3] = ["example.com", "mail.com", "test.org"];

const RECORD_COUNT: usize = 5;
const SIGNUP_WINDOW_SECS: i64 = 365 * 24 * 60 * 60;

/// One generated user profile.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserRecord {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub signup_date: String,
}

/// Generate the fixed-shape record set: five profiles with names drawn
/// uniformly (with replacement) from small pools, a derived email, and a
/// signup date uniform over the trailing 365 days.
///
/// This is the only non-deterministic operation in the system; everything
/// else is a pure function of its inputs.
pub fn generate_users() -> Vec<UserRecord> {
    let mut rng = rand::thread_rng();
    let now = Utc::now();

    (0..RECORD_COUNT)
        .map(|_| {
            let first = *FIRST_NAMES.choose(&mut rng).unwrap_or(&FIRST_NAMES[0]);
            let last = *LAST_NAMES.choose(&mut rng).unwrap_or(&LAST_NAMES[0]);
            let domain = *DOMAINS.choose(&mut rng).unwrap_or(&DOMAINS[0]);
            let offset = rng.gen_range(0..=SIGNUP_WINDOW_SECS);
            let signup = now - Duration::seconds(offset);

            UserRecord {
                first_name: first.to_string(),
                last_name: last.to_string(),
                email: format!(
                    "{}.{}@{domain}",
                    first.to_lowercase(),
                    last.to_lowercase()
                ),
                signup_date: signup.format("%Y-%m-%d").to_string(),
            }
        })
        .collect()
}

/// Tool wrapper: returns `{"users": [...]}` pretty-printed.
pub struct GenerateUsersTool;

impl GenerateUsersTool {
    pub fn new() -> Self {
        Self
    }
}

impl Default for GenerateUsersTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for GenerateUsersTool {
    fn name(&self) -> &str {
        "generate_user_data"
    }

    fn description(&self) -> &str {
        "Generate five sample user records with names, emails, and signup dates."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {}
        })
    }

    async fn execute(&self, _args: serde_json::Value) -> anyhow::Result<ToolResult> {
        let document = json!({ "users": generate_users() });
        let text = serde_json::to_string_pretty(&document)?;
        Ok(ToolResult::ok(text))
    }
}
