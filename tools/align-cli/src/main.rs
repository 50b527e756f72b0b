mod import;
mod report;
mod store;

use std::fs;
use std::path::{Path, PathBuf};

use align_editor::{PointerEvent, Session, Workbench};
use align_protocol::{LayoutConfig, NodeId};
use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::store::JsonStore;

#[derive(Parser)]
#[command(author, version, about = "Word alignment corpus tool")]
struct Cli {
    /// JSON layout overrides (positions and colors)
    #[arg(long, value_name = "FILE", global = true)]
    layout: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Load a parallel CoNLL-U treebank into a corpus of the store
    Import {
        #[arg(long, value_name = "FILE")]
        store: PathBuf,
        #[arg(long)]
        corpus: String,
        #[arg(long, value_name = "FILE")]
        source: PathBuf,
        #[arg(long, value_name = "FILE")]
        target: PathBuf,
        /// One pharaoh line per sentence, or `_` for empty alignments
        #[arg(long, value_name = "FILE")]
        alignment: Option<PathBuf>,
    },
    /// Write `source ||| target` lines for an external word aligner
    Pharaoh {
        #[arg(long, value_name = "FILE")]
        source: PathBuf,
        #[arg(long, value_name = "FILE")]
        target: PathBuf,
        #[arg(long, value_name = "FILE")]
        output: PathBuf,
    },
    /// List the corpora of a store
    Corpora {
        #[arg(long, value_name = "FILE")]
        store: PathBuf,
    },
    /// List the sentence ids of a corpus
    Ids {
        #[arg(long, value_name = "FILE")]
        store: PathBuf,
        #[arg(long)]
        corpus: String,
    },
    /// Load a sentence and print its normalized alignment
    Check {
        #[arg(long, value_name = "FILE")]
        store: PathBuf,
        #[arg(long)]
        corpus: String,
        /// 1-based position in the corpus
        #[arg(long)]
        sentence: usize,
    },
    /// Analyse the verified sentences of a corpus.
    ///
    /// With `--path`, group the source pairs joined by that path by their
    /// target rendering; otherwise print per-relation path statistics.
    Report {
        #[arg(long, value_name = "FILE")]
        store: PathBuf,
        #[arg(long)]
        corpus: String,
        /// Directionless source path, e.g. `nsubj` or `nsubj->obj`
        #[arg(long)]
        path: Option<String>,
        /// Target part of speech to leave out of the statistics
        #[arg(long, value_name = "UPOS")]
        skip_pos: Vec<String>,
    },
    /// Replay editor events on a sentence and save the result.
    ///
    /// Clears run first, then clicks in order, then double clicks.
    Review {
        #[arg(long, value_name = "FILE")]
        store: PathBuf,
        #[arg(long)]
        corpus: String,
        #[arg(long)]
        sentence: usize,
        /// Node id (`top3`, `bottom1`) or `none` for empty space
        #[arg(long, value_name = "ID", value_parser = parse_target)]
        click: Vec<Target>,
        #[arg(long, value_name = "ID", value_parser = parse_target)]
        double: Vec<Target>,
        #[arg(long)]
        clear_links: bool,
        #[arg(long)]
        clear_markers: bool,
        #[arg(long)]
        verified: Option<bool>,
    },
}

#[derive(Debug, Clone, Copy)]
struct Target(Option<NodeId>);

fn parse_target(raw: &str) -> Result<Target, String> {
    if raw == "none" {
        return Ok(Target(None));
    }
    raw.parse::<NodeId>().map(|id| Target(Some(id))).map_err(|e| e.to_string())
}

fn load_layout(path: Option<&Path>) -> Result<LayoutConfig> {
    let Some(path) = path else {
        return Ok(LayoutConfig::default());
    };
    let text = fs::read_to_string(path).with_context(|| format!("reading layout {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing layout {}", path.display()))
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

fn open_workbench(store: &Path, layout: LayoutConfig) -> Result<Workbench<JsonStore>> {
    let store = JsonStore::open(store).with_context(|| format!("opening store {}", store.display()))?;
    Ok(Workbench::new(store, layout))
}

fn open_sentence(store: &Path, corpus: &str, sentence: usize, layout: LayoutConfig) -> Result<Workbench<JsonStore>> {
    let mut bench = open_workbench(store, layout)?;
    bench.choose_corpus(corpus)?;
    if bench.current() != Some(sentence) {
        bench.show_sentence(sentence)?;
    }
    Ok(bench)
}

fn print_summary(session: &Session) {
    let summary = session.summary();
    println!("alignment: {}", session.encode_alignment());
    println!(
        "tokens: {}  links: {}  aligned: {}  unaligned: {}  untouched: {}",
        summary.tokens, summary.links, summary.aligned, summary.unaligned, summary.untouched
    );
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("align_cli=info,align_editor=info,align_analysis=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let layout = load_layout(cli.layout.as_deref())?;

    match cli.command {
        Command::Import {
            store,
            corpus,
            source,
            target,
            alignment,
        } => {
            let alignments = match alignment {
                Some(path) if path.as_os_str() != "_" => Some(read(&path)?),
                _ => None,
            };
            let sentences = import::build_corpus(&read(&source)?, &read(&target)?, alignments.as_deref())?;

            let mut json = JsonStore::open(&store).with_context(|| format!("opening store {}", store.display()))?;
            let count = sentences.len();
            json.put_corpus(&corpus, sentences);
            json.persist().with_context(|| format!("writing store {}", store.display()))?;
            tracing::info!(corpus = %corpus, sentences = count, "corpus imported");
        }
        Command::Pharaoh { source, target, output } => {
            let lines = import::aligner_input(&read(&source)?, &read(&target)?)?;
            let mut text = lines.join("\n");
            text.push('\n');
            fs::write(&output, text).with_context(|| format!("writing {}", output.display()))?;
            tracing::info!(lines = lines.len(), output = %output.display(), "aligner input written");
        }
        Command::Corpora { store } => {
            let bench = open_workbench(&store, layout)?;
            for corpus in bench.corpora()? {
                println!("{}", corpus.name);
            }
        }
        Command::Ids { store, corpus } => {
            let mut bench = open_workbench(&store, layout)?;
            bench.choose_corpus(&corpus)?;
            for (i, sentence) in bench.sentences().iter().enumerate() {
                println!("{}\t{}\t{}", i + 1, sentence.document_id, sentence.sentence_id);
            }
        }
        Command::Check { store, corpus, sentence } => {
            let bench = open_sentence(&store, &corpus, sentence, layout)?;
            print_summary(bench.session());
            println!("verified: {}", bench.verified());
        }
        Command::Report {
            store,
            corpus,
            path,
            skip_pos,
        } => {
            let json = JsonStore::open(&store).with_context(|| format!("opening store {}", store.display()))?;
            let sentences = report::verified_sentences(&json, &corpus)?;
            let text = match path {
                Some(path) => report::path_report(&sentences, &path),
                None => report::path_table(&sentences, &skip_pos),
            };
            print!("{text}");
        }
        Command::Review {
            store,
            corpus,
            sentence,
            click,
            double,
            clear_links,
            clear_markers,
            verified,
        } => {
            let mut bench = open_sentence(&store, &corpus, sentence, layout)?;
            let session = bench.session_mut();

            if clear_links {
                session.clear_links();
            }
            if clear_markers {
                session.clear_markers();
            }

            let events = click
                .into_iter()
                .map(|Target(node)| PointerEvent::Click(node))
                .chain(double.into_iter().map(|Target(node)| PointerEvent::DoubleClick(node)));
            for event in events {
                let outcome = session.handle(event);
                tracing::info!(%outcome, "event applied");
            }
            if let Some(node) = session.pending() {
                bail!("click on {node} has no second endpoint");
            }

            if let Some(flag) = verified {
                bench.set_verified(flag);
            }
            bench.save()?;
            print_summary(bench.session());
        }
    }

    Ok(())
}
