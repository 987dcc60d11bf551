use clap::{Parser, Subcommand};
use clausal_answer::{
    GeminiClient, MISSING_KEY_SENTINEL, evaluate_decision, explain, parse_query, summarize,
};
use clausal_context::{ChunkConfig, DEFAULT_CHUNK_SIZE, DEFAULT_OVERLAP};
use clausal_embed::FastEmbedProvider;
use clausal_extract::{ExtractError, extract_text};
use clausal_retriever::{DocumentRetriever, SearchHit, Session, SessionOutcome};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::process;

/// Ask questions about insurance policy documents and get clause-grounded
/// answers or structured claim decisions.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Characters per chunk when indexing the document
    #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE)]
    chunk_size: usize,

    /// Characters of overlap between consecutive chunks
    #[arg(long, default_value_t = DEFAULT_OVERLAP)]
    overlap: usize,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Ask a single question about a document
    Ask {
        /// Policy document to index (.pdf, .docx, or .txt)
        #[arg(short, long)]
        file: PathBuf,
        /// The question to answer
        #[arg(short, long)]
        question: String,
        /// Answer mode
        #[arg(short, long, default_value = "explain")]
        mode: Mode,
        /// Number of clauses to retrieve
        #[arg(short = 'k', long, default_value_t = 5)]
        top_k: usize,
    },
    /// Summarize a document's key points
    Summarize {
        /// Policy document to summarize (.pdf, .docx, or .txt)
        #[arg(short, long)]
        file: PathBuf,
    },
    /// Interactive question session over one document
    Chat {
        /// Policy document to index (.pdf, .docx, or .txt)
        #[arg(short, long)]
        file: PathBuf,
        /// Number of clauses to retrieve per question
        #[arg(short = 'k', long, default_value_t = 5)]
        top_k: usize,
    },
    /// List the generation models available to the configured API key
    Models,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Mode {
    Explain,
    Decision,
}

impl std::str::FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "explain" => Ok(Mode::Explain),
            "decision" => Ok(Mode::Decision),
            _ => Err(format!("Invalid mode: {s} (expected 'explain' or 'decision')")),
        }
    }
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let config = ChunkConfig::new(args.chunk_size, args.overlap)?;

    match args.command {
        Commands::Ask {
            file,
            question,
            mode,
            top_k,
        } => {
            let mut session = index_document(&file, config).await?;
            let hits = session.retrieve(&question, top_k).await?;
            answer_question(&mut session, &question, &hits, mode).await?;
            Ok(())
        }
        Commands::Summarize { file } => {
            let text = extract_or_report(&file).await?;
            let Some(client) = GeminiClient::from_env() else {
                anyhow::bail!("{MISSING_KEY_SENTINEL}");
            };

            let summary = summarize(&client, &text).await?;
            if let Some(line) = &summary.summary {
                println!("{line}");
                println!();
            }
            for bullet in &summary.bullets {
                println!("  - {bullet}");
            }
            Ok(())
        }
        Commands::Chat { file, top_k } => {
            let session = index_document(&file, config).await?;
            chat_loop(session, top_k).await
        }
        Commands::Models => {
            let Some(client) = GeminiClient::from_env() else {
                anyhow::bail!("{MISSING_KEY_SENTINEL}");
            };

            let models = client.list_models().await?;
            println!("Found {} models:", models.len());
            for model in models {
                match model.display_name {
                    Some(display_name) => println!("  {} ({display_name})", model.name),
                    None => println!("  {}", model.name),
                }
            }
            Ok(())
        }
    }
}

/// Extraction failures travel as bracketed sentinel strings, never as raw
/// faults.
fn render_extract_error(err: &ExtractError) -> String {
    match err {
        ExtractError::UnsupportedFileType { .. } => "[Unsupported file type]".to_string(),
        ExtractError::Pdf { source } => format!("[Error extracting PDF: {source}]"),
        ExtractError::Docx { message } => format!("[Error extracting DOCX: {message}]"),
        ExtractError::Io { source } => format!("[Error reading file: {source}]"),
        ExtractError::AsyncTask { source } => format!("[Error extracting text: {source}]"),
    }
}

/// Extract a document's text, converting failures to their sentinel form.
async fn extract_or_report(file: &PathBuf) -> anyhow::Result<String> {
    extract_text(file)
        .await
        .map_err(|e| anyhow::anyhow!("{}", render_extract_error(&e)))
}

/// Extract the document's text and build a fresh indexed session over it.
async fn index_document(
    file: &PathBuf,
    config: ChunkConfig,
) -> anyhow::Result<Session<FastEmbedProvider>> {
    let text = extract_or_report(file).await?;
    tracing::info!("Extracted {} characters from {}", text.len(), file.display());

    let provider = FastEmbedProvider::create().await?;
    let mut session = Session::new(DocumentRetriever::with_config(provider, config));
    let chunk_count = session.load_document(&text).await?;
    println!("Indexed {} ({chunk_count} chunks)", file.display());
    Ok(session)
}

/// Answer one question in the given mode, print the result, and record it in
/// the session history.
async fn answer_question(
    session: &mut Session<FastEmbedProvider>,
    question: &str,
    hits: &[SearchHit],
    mode: Mode,
) -> anyhow::Result<()> {
    let retrieved: Vec<(String, f32)> = hits
        .iter()
        .map(|hit| (hit.text.clone(), hit.distance))
        .collect();
    let client = GeminiClient::from_env();

    match mode {
        Mode::Decision => {
            let parsed = parse_query(question);
            let decision = evaluate_decision(client.as_ref(), &parsed, &retrieved).await;
            let wire = serde_json::to_value(&decision)?;
            println!("{}", serde_json::to_string_pretty(&wire)?);
            session.record_decision(question, wire);
        }
        Mode::Explain => {
            let explanation = explain(client.as_ref(), question, &retrieved).await;
            println!("{}", explanation.answer);
            if !explanation.referenced_clauses.is_empty() {
                println!();
                println!("Referenced clauses:");
                for clause in &explanation.referenced_clauses {
                    println!("  - {}", preview(clause, 120));
                }
            }
            session.record_answer(question, explanation.answer);
        }
    }
    Ok(())
}

/// Read questions from stdin until EOF or `:quit`.
///
/// `:decision <question>` forces decision mode for one question,
/// `:explain <question>` forces explanation mode, `:history` prints the
/// session so far, and a bare question defaults to explanation mode.
async fn chat_loop(mut session: Session<FastEmbedProvider>, top_k: usize) -> anyhow::Result<()> {
    println!("Ask a question (:decision/:explain to pick a mode, :history, :quit to exit)");

    let stdin = std::io::stdin();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let (mode, question) = match line.split_once(' ') {
            _ if line == ":quit" || line == ":q" => break,
            _ if line == ":history" => {
                print_history(&session);
                continue;
            }
            _ if line == ":decision" || line == ":explain" => {
                println!("Usage: {line} <question>");
                continue;
            }
            Some((":decision", rest)) => (Mode::Decision, rest.trim()),
            Some((":explain", rest)) => (Mode::Explain, rest.trim()),
            _ => (Mode::Explain, line),
        };
        if question.is_empty() {
            continue;
        }

        let hits = session.retrieve(question, top_k).await?;
        answer_question(&mut session, question, &hits, mode).await?;
    }

    Ok(())
}

fn print_history(session: &Session<FastEmbedProvider>) {
    if session.history().is_empty() {
        println!("No questions asked yet.");
        return;
    }
    for (i, entry) in session.history().iter().enumerate() {
        println!("{}. {}", i + 1, entry.question);
        match &entry.outcome {
            SessionOutcome::Answer(answer) => println!("   {}", preview(answer, 200)),
            SessionOutcome::Decision(decision) => {
                let verdict = decision
                    .get("decision")
                    .and_then(|v| v.as_str())
                    .unwrap_or("unknown");
                println!("   decision: {verdict}");
            }
        }
    }
}

/// First `max_chars` characters of `text`, on one line.
fn preview(text: &str, max_chars: usize) -> String {
    let flat = text.replace('\n', " ");
    let mut out: String = flat.chars().take(max_chars).collect();
    if flat.chars().count() > max_chars {
        out.push_str("...");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_parsing() {
        assert_eq!("explain".parse::<Mode>().unwrap(), Mode::Explain);
        assert_eq!("Decision".parse::<Mode>().unwrap(), Mode::Decision);
        assert!("verdict".parse::<Mode>().is_err());
    }

    #[test]
    fn test_extraction_failures_render_as_bracketed_sentinels() {
        let unsupported = ExtractError::UnsupportedFileType {
            extension: Some("pptx".to_string()),
        };
        assert_eq!(render_extract_error(&unsupported), "[Unsupported file type]");

        let docx = ExtractError::Docx {
            message: "not a DOCX container: bad magic".to_string(),
        };
        assert_eq!(
            render_extract_error(&docx),
            "[Error extracting DOCX: not a DOCX container: bad magic]"
        );

        let io = ExtractError::Io {
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        let rendered = render_extract_error(&io);
        assert!(rendered.starts_with("[Error"));
        assert!(rendered.ends_with(']'));
    }

    #[test]
    fn test_preview_truncates_on_char_boundary() {
        assert_eq!(preview("short", 10), "short");
        assert_eq!(preview("one\ntwo three", 7), "one two...");
        assert_eq!(preview("ééééé", 3), "ééé...");
    }
}
