//! Session store
//!
//! One SQLite row per survey session: the scored results, the tools carried
//! over to the wizard, and the configuration lines from the last wizard
//! submitted. List-valued columns hold JSON.

use crate::advisor::SurveyResults;
use crate::classify;
use crate::types::Evaluation;
use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Open (or create) the session database with schema
pub fn init_db(path: &Path) -> Result<Connection> {
    let conn = Connection::open(path)
        .with_context(|| format!("Failed to open session database at {:?}", path))?;

    init_schema(&conn)?;

    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)
        .context("Failed to create session schema")?;
    Ok(())
}

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS sessions (
    id TEXT PRIMARY KEY,
    ranked_json TEXT,           -- JSON array of RankedTechnique
    parameters_json TEXT,       -- JSON array of strings
    vetoed_json TEXT,           -- JSON array of VetoReport
    wizard_tools_json TEXT,     -- JSON array of tool names
    last_tool TEXT,
    config_json TEXT,           -- JSON array of configuration lines
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
"#;

/// Scored results as saved for a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredResults {
    pub session_id: String,
    pub evaluation: Evaluation,
    pub wizard_tools: Vec<String>,
    pub updated_at: String,
}

/// What the wizard results page shows
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WizardResults {
    pub config: Vec<String>,
    /// Carried-over tools with policy names dropped
    pub wizard_tools: Vec<String>,
    pub current_tool: Option<String>,
}

/// Start a new, empty session and return its id
pub fn create_session(conn: &Connection) -> Result<String> {
    let id = uuid::Uuid::new_v4().to_string();
    let now = Utc::now().to_rfc3339();
    conn.execute(
        "INSERT INTO sessions (id, created_at, updated_at) VALUES (?1, ?2, ?2)",
        params![id, now],
    )?;
    debug!(session = %id, "session created");
    Ok(id)
}

/// Store survey results, creating the session row if needed
pub fn save_results(conn: &Connection, session_id: &str, results: &SurveyResults) -> Result<()> {
    let now = Utc::now().to_rfc3339();
    conn.execute(
        "INSERT INTO sessions
         (id, ranked_json, parameters_json, vetoed_json, wizard_tools_json, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
         ON CONFLICT(id) DO UPDATE SET
             ranked_json = excluded.ranked_json,
             parameters_json = excluded.parameters_json,
             vetoed_json = excluded.vetoed_json,
             wizard_tools_json = excluded.wizard_tools_json,
             updated_at = excluded.updated_at",
        params![
            session_id,
            serde_json::to_string(&results.evaluation.ranked)?,
            serde_json::to_string(&results.evaluation.parameters)?,
            serde_json::to_string(&results.evaluation.vetoed)?,
            serde_json::to_string(&results.wizard_tools)?,
            now,
        ],
    )?;
    debug!(session = %session_id, ranked = results.evaluation.ranked.len(), "results saved");
    Ok(())
}

/// Results for a session; `None` if unknown or never scored
pub fn load_results(conn: &Connection, session_id: &str) -> Result<Option<StoredResults>> {
    let row = conn
        .query_row(
            "SELECT ranked_json, parameters_json, vetoed_json, wizard_tools_json, updated_at
             FROM sessions WHERE id = ?1",
            [session_id],
            |row| {
                Ok((
                    row.get::<_, Option<String>>(0)?,
                    row.get::<_, Option<String>>(1)?,
                    row.get::<_, Option<String>>(2)?,
                    row.get::<_, Option<String>>(3)?,
                    row.get::<_, String>(4)?,
                ))
            },
        )
        .optional()?;

    let Some((Some(ranked), parameters, vetoed, tools, updated_at)) = row else {
        return Ok(None);
    };

    Ok(Some(StoredResults {
        session_id: session_id.to_string(),
        evaluation: Evaluation {
            ranked: serde_json::from_str(&ranked).context("Corrupt ranked_json")?,
            parameters: parse_list(parameters.as_deref())?,
            vetoed: match vetoed {
                Some(json) => serde_json::from_str(&json).context("Corrupt vetoed_json")?,
                None => Vec::new(),
            },
        },
        wizard_tools: parse_list(tools.as_deref())?,
        updated_at,
    }))
}

/// Record the configuration produced by a wizard submission
pub fn save_wizard_config(
    conn: &Connection,
    session_id: &str,
    tool: &str,
    lines: &[String],
) -> Result<()> {
    let now = Utc::now().to_rfc3339();
    conn.execute(
        "INSERT INTO sessions (id, last_tool, config_json, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?4)
         ON CONFLICT(id) DO UPDATE SET
             last_tool = excluded.last_tool,
             config_json = excluded.config_json,
             updated_at = excluded.updated_at",
        params![session_id, tool, serde_json::to_string(lines)?, now],
    )?;
    debug!(session = %session_id, tool, lines = lines.len(), "wizard config saved");
    Ok(())
}

/// Last wizard configuration plus the privacy tools still on offer
pub fn load_wizard_results(conn: &Connection, session_id: &str) -> Result<Option<WizardResults>> {
    let row = conn
        .query_row(
            "SELECT config_json, wizard_tools_json, last_tool FROM sessions WHERE id = ?1",
            [session_id],
            |row| {
                Ok((
                    row.get::<_, Option<String>>(0)?,
                    row.get::<_, Option<String>>(1)?,
                    row.get::<_, Option<String>>(2)?,
                ))
            },
        )
        .optional()?;

    let Some((config, tools, current_tool)) = row else {
        return Ok(None);
    };

    Ok(Some(WizardResults {
        config: parse_list(config.as_deref())?,
        wizard_tools: classify::privacy_tools(&parse_list(tools.as_deref())?),
        current_tool,
    }))
}

fn parse_list(json: Option<&str>) -> Result<Vec<String>> {
    match json {
        Some(json) => serde_json::from_str(json).context("Corrupt JSON list column"),
        None => Ok(Vec::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advisor::tests::advisor;
    use crate::types::AnswerSet;

    fn setup() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        conn
    }

    fn survey() -> SurveyResults {
        let answers: AnswerSet = [("q1", "The public"), ("q2", "Student records")]
            .into_iter()
            .collect();
        advisor().survey_results(&answers)
    }

    #[test]
    fn test_unknown_session_is_none() {
        let conn = setup();
        assert!(load_results(&conn, "missing").unwrap().is_none());
        assert!(load_wizard_results(&conn, "missing").unwrap().is_none());
    }

    #[test]
    fn test_new_session_has_no_results_yet() {
        let conn = setup();
        let id = create_session(&conn).unwrap();
        assert!(uuid::Uuid::parse_str(&id).is_ok());
        assert!(load_results(&conn, &id).unwrap().is_none());

        let wizard = load_wizard_results(&conn, &id).unwrap().unwrap();
        assert!(wizard.config.is_empty());
        assert!(wizard.current_tool.is_none());
    }

    #[test]
    fn test_results_saved_and_overwritten() {
        let conn = setup();
        let id = create_session(&conn).unwrap();
        let results = survey();
        save_results(&conn, &id, &results).unwrap();

        let stored = load_results(&conn, &id).unwrap().unwrap();
        assert_eq!(stored.evaluation, results.evaluation);
        assert_eq!(stored.wizard_tools, results.wizard_tools);

        let rescored = advisor().survey_results(&AnswerSet::new());
        save_results(&conn, &id, &rescored).unwrap();
        let stored = load_results(&conn, &id).unwrap().unwrap();
        assert!(stored.evaluation.ranked.is_empty());
    }

    #[test]
    fn test_wizard_results_drop_policy_tools() {
        let conn = setup();
        let id = create_session(&conn).unwrap();
        let results = survey();
        assert!(results.wizard_tools.iter().any(|t| t == "FOIA review"));
        save_results(&conn, &id, &results).unwrap();

        let lines = vec!["Your TEE settings:".to_string()];
        save_wizard_config(&conn, &id, "Trusted Execution Environments", &lines).unwrap();

        let wizard = load_wizard_results(&conn, &id).unwrap().unwrap();
        assert_eq!(wizard.config, lines);
        assert_eq!(
            wizard.current_tool.as_deref(),
            Some("Trusted Execution Environments")
        );
        assert!(wizard.wizard_tools.iter().all(|t| !classify::is_policy(t)));
        assert!(wizard.wizard_tools.contains(&"Differential Privacy".to_string()));
    }

    #[test]
    fn test_wizard_config_without_prior_session() {
        let conn = setup();
        save_wizard_config(&conn, "adhoc", "Differential Privacy", &[]).unwrap();
        let wizard = load_wizard_results(&conn, "adhoc").unwrap().unwrap();
        assert!(wizard.wizard_tools.is_empty());
        assert_eq!(wizard.current_tool.as_deref(), Some("Differential Privacy"));
    }
}
