//! pet-advisor
//!
//! Privacy-enhancing technology recommendations from a questionnaire table.
//!
//! Run with: pet-advisor --questions
//! Or serve JSON-RPC: pet-advisor --serve --port=3100

use anyhow::{bail, Context, Result};
use pet_advisor::{rpc, session, Advisor, AdvisorConfig, AdvisorError, AnswerSet, SourceTable};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "\
Usage: pet-advisor [--source=<path>] <command>

Commands:
  --questions                              Print the screening questions as JSON
  --evaluate <answers.json>                Score answers and print the results
  --wizard <tool>                          Print the wizard steps for a tool
  --wizard-submit <tool> <answers.json>    Print configuration advice
  --check-source                           Summarize the source table
  --serve [--port=N]                       Run the JSON-RPC HTTP endpoint";

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();

    let mut config = AdvisorConfig::from_env();
    if let Some(path) = flag_value(&args, "--source=") {
        config.source_path = PathBuf::from(path);
    }
    if let Some(port) = flag_value(&args, "--port=").and_then(|p| p.parse().ok()) {
        config.port = port;
    }

    let positional: Vec<&str> = args
        .iter()
        .map(String::as_str)
        .filter(|a| !a.starts_with("--source=") && !a.starts_with("--port="))
        .collect();

    match positional.as_slice() {
        ["--questions"] => run_questions(&config),
        ["--evaluate", path] => run_evaluate(&config, Path::new(path)),
        ["--wizard", tool @ ..] if !tool.is_empty() => run_wizard(&tool.join(" ")),
        ["--wizard-submit", tool, path] => run_wizard_submit(tool, Path::new(path)),
        ["--check-source"] => run_check_source(&config),
        ["--serve"] => run_http_server(config).await,
        _ => {
            eprintln!("{}", USAGE);
            bail!("unrecognized arguments: {}", args.join(" "));
        }
    }
}

fn flag_value<'a>(args: &'a [String], prefix: &str) -> Option<&'a str> {
    args.iter().find_map(|a| a.strip_prefix(prefix))
}

fn load_advisor(config: &AdvisorConfig) -> Result<Advisor> {
    Advisor::load(&config.source_path)
        .with_context(|| format!("Failed to load source table {:?}", config.source_path))
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn run_questions(config: &AdvisorConfig) -> Result<()> {
    let advisor = load_advisor(config)?;
    print_json(&advisor.questions())
}

fn run_evaluate(config: &AdvisorConfig, answers_path: &Path) -> Result<()> {
    let advisor = load_advisor(config)?;
    let text = std::fs::read_to_string(answers_path)
        .with_context(|| format!("Failed to read answers from {:?}", answers_path))?;
    let answers: AnswerSet = serde_json::from_str(&text).context("Answers must be a JSON object")?;
    print_json(&advisor.survey_results(&answers))
}

fn run_wizard(tool: &str) -> Result<()> {
    match pet_advisor::wizard_steps(tool) {
        Ok(plan) => print_json(&plan),
        Err(AdvisorError::UnsupportedTool { tool }) => print_json(&serde_json::json!({
            "error": AdvisorError::UNSUPPORTED_TOOL_ADVICE,
            "tool": tool
        })),
        Err(e) => Err(e.into()),
    }
}

fn run_wizard_submit(tool: &str, answers_path: &Path) -> Result<()> {
    let text = std::fs::read_to_string(answers_path)
        .with_context(|| format!("Failed to read answers from {:?}", answers_path))?;
    let value: serde_json::Value = serde_json::from_str(&text).context("Invalid answers JSON")?;
    let answers = rpc::step_answers(Some(&value));
    for line in pet_advisor::wizard_submit(tool, &answers) {
        println!("{}", line);
    }
    Ok(())
}

fn run_check_source(config: &AdvisorConfig) -> Result<()> {
    let table = SourceTable::load(&config.source_path)
        .with_context(|| format!("Failed to load source table {:?}", config.source_path))?;
    let advisor = Advisor::from_table(&table);
    let headers = table.headers();
    let columns = table.columns();
    let name = |pos: Option<usize>| {
        pos.and_then(|i| headers.get(i))
            .map(String::as_str)
            .unwrap_or("(none)")
    };

    println!("Source: {}", config.source_path.display());
    println!("Rows: {}", table.len());
    println!("Columns:");
    println!("  question:       {}", name(Some(columns.question)));
    println!("  answer:         {}", name(Some(columns.answer)));
    println!("  techniques:     {}", name(Some(columns.techniques)));
    println!("  parameters:     {}", name(columns.parameters));
    println!("  deal-breakers:  {}", name(columns.deal_breakers));
    println!("  multi-select:   {}", name(columns.multi_select));
    println!("  depends on:     {}", name(columns.depends_on));
    println!("  depends value:  {}", name(columns.depends_value));
    println!("Index:");
    println!("  technique entries: {}", advisor.index().entry_count());
    println!("  veto entries:      {}", advisor.index().veto_count());
    println!("Questions: {}", advisor.catalog().len());
    for q in advisor.questions() {
        let kind = if q.multi { "multi" } else { "single" };
        match &q.depends_on {
            Some(parent) => println!(
                "  {} [{}, {} options, shown when {} = {}] {}",
                q.id,
                kind,
                q.options.len(),
                parent,
                q.depends_value.as_deref().unwrap_or(""),
                q.text
            ),
            None => println!("  {} [{}, {} options] {}", q.id, kind, q.options.len(), q.text),
        }
    }
    Ok(())
}

/// JSON-RPC over HTTP: `tools/list` and `tools/call`
async fn run_http_server(config: AdvisorConfig) -> Result<()> {
    use tokio::net::TcpListener;

    let advisor = Arc::new(load_advisor(&config)?);

    std::fs::create_dir_all(&config.data_dir)
        .with_context(|| format!("Failed to create data dir {:?}", config.data_dir))?;
    let db_path = config.session_db_path();
    session::init_db(&db_path)?;

    let listener = TcpListener::bind(format!("127.0.0.1:{}", config.port)).await?;
    tracing::info!(
        port = config.port,
        db = %db_path.display(),
        "listening on http://localhost:{}/rpc",
        config.port
    );

    loop {
        let (stream, peer) = listener.accept().await?;
        let advisor = Arc::clone(&advisor);
        let db_path = db_path.clone();

        tokio::spawn(async move {
            if let Err(e) = handle_http_request(stream, advisor, db_path).await {
                tracing::warn!(%peer, "request error: {:#}", e);
            }
        });
    }
}

async fn handle_http_request(
    stream: tokio::net::TcpStream,
    advisor: Arc<Advisor>,
    db_path: PathBuf,
) -> Result<()> {
    use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};

    let mut reader = BufReader::new(stream);
    let mut request_line = String::new();
    reader.read_line(&mut request_line).await?;

    // Headers
    let mut content_length: usize = 0;
    loop {
        let mut header = String::new();
        reader.read_line(&mut header).await?;
        if header.trim().is_empty() {
            break;
        }
        if header.to_lowercase().starts_with("content-length:") {
            content_length = header
                .split(':')
                .nth(1)
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(0);
        }
    }

    let response_body = match rpc::reject_oversized(content_length) {
        Some(rejection) => rejection,
        None => {
            let mut body = vec![0u8; content_length];
            if content_length > 0 {
                reader.read_exact(&mut body).await?;
            }

            match rpc::parse_request(&body) {
                Ok(rpc::RpcRequest { id, method, params }) => {
                    // SQLite work stays off the async workers
                    let result = tokio::task::spawn_blocking(move || {
                        let conn = session::init_db(&db_path)?;
                        rpc::handle_method(&advisor, &conn, &method, &params)
                    })
                    .await?;
                    rpc::response(id, result)
                }
                Err(parse_error) => parse_error,
            }
        }
    };

    let response_str = serde_json::to_string(&response_body)?;
    let response = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\
         Access-Control-Allow-Origin: *\r\n\r\n{}",
        response_str.len(),
        response_str
    );

    let mut stream = reader.into_inner();
    stream.write_all(response.as_bytes()).await?;
    stream.flush().await?;

    Ok(())
}
