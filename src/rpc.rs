//! JSON-RPC tool surface for the PET advisor
//!
//! The survey flow as callable tools:
//! 1. `get_questions` - the screening questionnaire
//! 2. `evaluate` - score answers, store them under a session
//! 3. `get_results` - reload a session's scored results
//! 4. `wizard_steps` / `wizard_submit` - configure one technique
//! 5. `wizard_results` - last configuration plus remaining privacy tools

use crate::advisor::Advisor;
use crate::error::AdvisorError;
use crate::session;
use crate::types::AnswerSet;
use crate::wizard::StepAnswers;
use anyhow::{Context, Result};
use rusqlite::Connection;
use serde_json::{json, Map, Value};
use tracing::debug;

/// Tool definitions advertised by `tools/list`
pub fn get_tools() -> Vec<Value> {
    vec![
        json!({
            "name": "get_questions",
            "description": "List the screening questions. Each has an id (q1, q2, ...), text, options, whether several options may be selected, and optionally the question/answer it depends on.",
            "inputSchema": {
                "type": "object",
                "properties": {}
            }
        }),
        json!({
            "name": "evaluate",
            "description": "Score survey answers. Returns ranked techniques with scores, parameter suggestions, vetoed techniques with reasons, techniques and policies for display, and the tools offered as wizards. Results are stored under a session id.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "answers": {
                        "type": "object",
                        "description": "Map of question id or question text to an answer string or list of answer strings"
                    },
                    "session_id": {
                        "type": "string",
                        "description": "Optional: existing session to store results under (a new one is created otherwise)"
                    }
                },
                "required": ["answers"]
            }
        }),
        json!({
            "name": "get_results",
            "description": "Reload the scored results stored for a session.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "session_id": {
                        "type": "string",
                        "description": "Session id returned by evaluate"
                    }
                },
                "required": ["session_id"]
            }
        }),
        json!({
            "name": "wizard_steps",
            "description": "Get the configuration wizard for a technique: differential privacy, secure multiparty computation, synthetic data, trusted execution environments or k-anonymity. Returns the wizard name to submit under and its steps.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "tool": {
                        "type": "string",
                        "description": "Ranked technique name (matched by keyword)"
                    }
                },
                "required": ["tool"]
            }
        }),
        json!({
            "name": "wizard_submit",
            "description": "Submit wizard answers and get configuration advice lines.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "tool": {
                        "type": "string",
                        "description": "Wizard name as returned by wizard_steps"
                    },
                    "answers": {
                        "type": "object",
                        "description": "Map of step id (D1, S2, K1, ...) to answer"
                    },
                    "session_id": {
                        "type": "string",
                        "description": "Optional: session to record the configuration under"
                    }
                },
                "required": ["tool", "answers"]
            }
        }),
        json!({
            "name": "wizard_results",
            "description": "Last wizard configuration for a session, with the privacy tools still available to configure.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "session_id": {
                        "type": "string",
                        "description": "Session id returned by evaluate"
                    }
                },
                "required": ["session_id"]
            }
        }),
    ]
}

/// Run one tool call
pub fn dispatch(advisor: &Advisor, conn: &Connection, name: &str, args: &Value) -> Result<Value> {
    debug!(tool = name, "dispatch");
    match name {
        "get_questions" => Ok(json!({ "questions": advisor.questions() })),
        "evaluate" => handle_evaluate(advisor, conn, args),
        "get_results" => {
            let session_id = required_str(args, "session_id")?;
            match session::load_results(conn, session_id)? {
                Some(stored) => Ok(serde_json::to_value(stored)?),
                None => Ok(no_session(session_id)),
            }
        }
        "wizard_steps" => {
            let tool = required_str(args, "tool")?;
            match advisor.wizard_steps(tool) {
                Ok(plan) => Ok(serde_json::to_value(plan)?),
                Err(AdvisorError::UnsupportedTool { tool }) => Ok(json!({
                    "error": AdvisorError::UNSUPPORTED_TOOL_ADVICE,
                    "tool": tool
                })),
                Err(e) => Err(e.into()),
            }
        }
        "wizard_submit" => {
            let tool = required_str(args, "tool")?;
            let answers = step_answers(args.get("answers"));
            let config = advisor.wizard_submit(tool, &answers);
            if let Some(session_id) = args.get("session_id").and_then(Value::as_str) {
                session::save_wizard_config(conn, session_id, tool, &config)?;
            }
            Ok(json!({ "tool": tool, "config": config }))
        }
        "wizard_results" => {
            let session_id = required_str(args, "session_id")?;
            match session::load_wizard_results(conn, session_id)? {
                Some(results) => Ok(serde_json::to_value(results)?),
                None => Ok(no_session(session_id)),
            }
        }
        _ => Ok(json!({ "error": format!("Unknown tool: {}", name) })),
    }
}

fn handle_evaluate(advisor: &Advisor, conn: &Connection, args: &Value) -> Result<Value> {
    let answers: AnswerSet = match args.get("answers") {
        Some(value) => serde_json::from_value(value.clone()).context("Invalid answers")?,
        None => AnswerSet::new(),
    };

    let session_id = match args.get("session_id").and_then(Value::as_str) {
        Some(id) => id.to_string(),
        None => session::create_session(conn)?,
    };

    let results = advisor.survey_results(&answers);
    session::save_results(conn, &session_id, &results)?;

    let mut response = serde_json::to_value(&results)?;
    if let Value::Object(map) = &mut response {
        map.insert("session_id".to_string(), json!(session_id));
    }
    Ok(response)
}

fn required_str<'a>(args: &'a Value, key: &str) -> Result<&'a str> {
    args.get(key)
        .and_then(Value::as_str)
        .with_context(|| format!("Missing required argument: {}", key))
}

fn no_session(session_id: &str) -> Value {
    json!({ "error": format!("No results for session: {}", session_id) })
}

/// Wizard answers arrive as JSON; numbers and booleans are kept as text
pub fn step_answers(value: Option<&Value>) -> StepAnswers {
    let Some(Value::Object(map)) = value else {
        return StepAnswers::new();
    };
    map.iter()
        .map(|(k, v)| (k.clone(), value_text(v)))
        .collect()
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Largest request body the HTTP endpoint will read
pub const MAX_BODY: usize = 1 << 20;

pub const PARSE_ERROR: i64 = -32700;
pub const INVALID_REQUEST: i64 = -32600;
const SERVER_ERROR: i64 = -32000;

/// A decoded JSON-RPC request
#[derive(Debug, Clone, PartialEq)]
pub struct RpcRequest {
    pub id: Value,
    pub method: String,
    pub params: Value,
}

/// Decode a request body; malformed JSON yields a parse-error response
pub fn parse_request(body: &[u8]) -> std::result::Result<RpcRequest, Value> {
    let request: Value = serde_json::from_slice(body).map_err(|e| {
        error_response(Value::Null, PARSE_ERROR, &format!("Parse error: {}", e))
    })?;
    let Value::Object(fields) = request else {
        return Err(error_response(
            Value::Null,
            INVALID_REQUEST,
            "Request must be a JSON object",
        ));
    };

    Ok(RpcRequest {
        id: fields.get("id").cloned().unwrap_or(json!(1)),
        method: fields
            .get("method")
            .and_then(Value::as_str)
            .unwrap_or("")
            .to_string(),
        params: fields.get("params").cloned().unwrap_or(json!({})),
    })
}

/// Error response for a declared body length over [`MAX_BODY`]
pub fn reject_oversized(content_length: usize) -> Option<Value> {
    (content_length > MAX_BODY).then(|| {
        error_response(
            Value::Null,
            INVALID_REQUEST,
            &format!("Request body of {} bytes exceeds {} bytes", content_length, MAX_BODY),
        )
    })
}

pub fn error_response(id: Value, code: i64, message: &str) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "error": {"code": code, "message": message}
    })
}

/// Wrap a tool result as a JSON-RPC response object
pub fn response(id: Value, result: Result<Value>) -> Value {
    match result {
        Ok(r) => json!({
            "jsonrpc": "2.0",
            "id": id,
            "result": r
        }),
        Err(e) => error_response(id, SERVER_ERROR, &format!("{:#}", e)),
    }
}

/// Route a JSON-RPC method (`tools/list` or `tools/call`)
pub fn handle_method(
    advisor: &Advisor,
    conn: &Connection,
    method: &str,
    params: &Value,
) -> Result<Value> {
    match method {
        "tools/list" => Ok(json!({ "tools": get_tools() })),
        "tools/call" => {
            let name = params.get("name").and_then(Value::as_str).unwrap_or("");
            let empty = Value::Object(Map::new());
            let args = params.get("arguments").unwrap_or(&empty);
            dispatch(advisor, conn, name, args)
        }
        _ => Ok(json!({ "error": format!("Unknown method: {}", method) })),
    }
}
