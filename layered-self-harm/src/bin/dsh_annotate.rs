//! dsh-annotate - find deliberate self-harm mentions in clinical notes
//!
//! ```bash
//! # One text, JSON mentions on stdout
//! dsh-annotate text "She took an overdose last year."
//!
//! # Every note of a corpus directory, eHOST XML into ../saved/
//! dsh-annotate batch notes/corpus
//!
//! # Pre-parsed CoNLL-U input
//! dsh-annotate conllu notes.conllu
//!
//! # A JSON service request from stdin
//! echo '{"type":"text","content":"Denies self-harm."}' | dsh-annotate request
//! ```

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use layered_rules::conllu;
use layered_self_harm::service::handle_request;
use layered_self_harm::{Annotator, AnnotatorConfig, Cohort, Mentions, Outcome};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "dsh-annotate", version, about = "Deliberate self-harm mention detection")]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the configured cohort (`all` or `female`)
    #[arg(long, global = true)]
    cohort: Option<Cohort>,

    /// Print the annotated tokens and rule trace to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Annotate a text given inline, or read from stdin when omitted
    Text { text: Option<String> },

    /// Annotate a file or every file of a directory
    Batch {
        path: PathBuf,

        /// Do not write eHOST XML
        #[arg(long)]
        dry_run: bool,
    },

    /// Annotate pre-parsed CoNLL-U documents
    Conllu { path: PathBuf },

    /// Answer a JSON service request read from a file or stdin
    Request { path: Option<PathBuf> },
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut input = String::new();
            io::stdin().read_to_string(&mut input).context("failed to read stdin")?;
            Ok(input)
        }
    }
}

fn print_mentions(mentions: &Mentions) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(mentions)?);
    Ok(())
}

fn annotate_text(annotator: &Annotator, text: &str, verbose: bool) -> Result<()> {
    if !verbose {
        return match annotator.process_text(text, "stdin")? {
            Outcome::Annotated(mentions) => print_mentions(&mentions),
            Outcome::Skipped(reason) => bail!("text skipped: {}", reason),
        };
    }
    let chars = text.chars().count();
    if chars >= annotator.config().max_chars {
        bail!("text skipped: {} characters", chars);
    }
    let doc = annotator.annotate_traced(text)?;
    eprintln!("{}\n", doc.display().with_all().with_trace());
    print_mentions(&annotator.process_doc(doc))
}

fn run(cli: Cli) -> Result<ExitCode> {
    let mut config = match &cli.config {
        Some(path) => AnnotatorConfig::load(path)?,
        None => AnnotatorConfig::standard(),
    };
    if let Some(cohort) = cli.cohort {
        config = config.with_cohort(cohort);
    }
    let annotator = Annotator::builder().config(config).build()?;

    match cli.command {
        Command::Text { text } => {
            let text = match text {
                Some(text) => text,
                None => read_input(None)?,
            };
            annotate_text(&annotator, &text, cli.verbose)?;
        }
        Command::Batch { path, dry_run } => {
            let report = annotator.process_path(&path, !dry_run)?;
            for document in &report.documents {
                match (&document.outcome, &document.output) {
                    (Outcome::Skipped(reason), _) => {
                        println!("{}\tskipped: {}", document.path.display(), reason)
                    }
                    (Outcome::Annotated(mentions), Some(output)) if output.written => println!(
                        "{}\t{} mentions\t{}",
                        document.path.display(),
                        mentions.len(),
                        output.path.display()
                    ),
                    (Outcome::Annotated(mentions), Some(_)) => println!(
                        "{}\t{} mentions\tnot written",
                        document.path.display(),
                        mentions.len()
                    ),
                    (Outcome::Annotated(mentions), None) => {
                        println!("{}\t{} mentions", document.path.display(), mentions.len())
                    }
                }
            }
        }
        Command::Conllu { path } => {
            let text = read_input(Some(&path))?;
            let docs = conllu::parse_documents(&text)
                .with_context(|| format!("failed to parse {}", path.display()))?;
            for (n, doc) in docs.into_iter().enumerate() {
                let mut doc = doc;
                if cli.verbose {
                    doc.enable_trace();
                }
                let doc = annotator.annotate_doc(doc);
                if cli.verbose {
                    eprintln!("# document {}\n{}\n", n + 1, doc.display().with_all().with_trace());
                }
                print_mentions(&annotator.process_doc(doc))?;
            }
        }
        Command::Request { path } => {
            let body = read_input(path.as_deref())?;
            let reply = handle_request(&annotator, &body);
            println!("{}", reply.to_json());
            if reply.status != 200 {
                return Ok(ExitCode::FAILURE);
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    match run(Cli::parse()) {
        Ok(code) => code,
        Err(err) => {
            log::error!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}
