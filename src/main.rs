//! onto-linker CLI: ontology vocabulary linking for question-to-query translation.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};
use serde::Deserialize;

use onto_linker::config::TranslatorConfig;
use onto_linker::embed::StaticEmbeddings;
use onto_linker::ontology::loader::load_ontology;
use onto_linker::ontology::{Category, EntityId, OntologyIndex};
use onto_linker::pipeline::Translator;
use onto_linker::scoring::{restriction_score, usage_score, Compatibility};
use onto_linker::vocab::TaggedPhrase;

#[derive(Parser)]
#[command(name = "onto-linker", version, about = "Ontology vocabulary linking and disambiguation")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default translator config next to an ontology document.
    Init {
        /// Ontology JSON document the config should point at.
        #[arg(long)]
        ontology: PathBuf,

        /// Where to write the TOML config.
        #[arg(long, default_value = "onto-linker.toml")]
        out: PathBuf,
    },

    /// List the normalised vocabulary of an ontology.
    Labels {
        /// Ontology JSON document.
        #[arg(long)]
        ontology: PathBuf,

        /// Only this category (class, individual, object-property, data-property).
        #[arg(long)]
        category: Option<Category>,
    },

    /// Translate one question into filled query templates.
    Translate {
        /// Translator config (TOML).
        #[arg(long)]
        config: PathBuf,

        /// The question text.
        #[arg(long)]
        question: String,

        /// JSON file with `phrases` (tagged phrases) and `templates` (variant lists).
        #[arg(long)]
        input: PathBuf,
    },

    /// Score a (property, subject, object) tuple against the ontology.
    Score {
        /// Ontology JSON document.
        #[arg(long)]
        ontology: PathBuf,

        /// Property IRI.
        #[arg(long)]
        property: String,

        /// Subject IRI.
        #[arg(long)]
        subject: String,

        /// Object IRI; omit for unary templates.
        #[arg(long)]
        object: Option<String>,
    },
}

/// Contents of the `translate --input` file.
#[derive(Deserialize)]
struct TranslateInput {
    #[serde(default)]
    phrases: Vec<TaggedPhrase>,
    templates: Vec<Vec<String>>,
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))
    .ok(); // Ignore error if hook already set (e.g., in tests)

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init { ontology, out } => {
            // Loading first catches a broken document before the config points at it.
            load_ontology(&ontology)?;
            let ontology = std::fs::canonicalize(&ontology).into_diagnostic()?;
            TranslatorConfig::new(ontology).save(&out)?;
            println!("Wrote {}", out.display());
        }

        Commands::Labels { ontology, category } => {
            let report = load_ontology(&ontology)?;
            let categories = match category {
                Some(c) => vec![c],
                None => Category::ALL.to_vec(),
            };
            for category in categories {
                for (label, id) in report.index.vocabulary(category).iter() {
                    println!("{category}\t{label}\t{}", report.index.entity(id).iri);
                }
            }
            if !report.skipped.is_empty() {
                println!("({} malformed axioms skipped)", report.skipped.len());
            }
        }

        Commands::Translate {
            config,
            question,
            input,
        } => {
            let config = TranslatorConfig::load(&config)?;
            let report = load_ontology(&config.ontology)?;
            let embeddings = config
                .embeddings
                .as_deref()
                .map(StaticEmbeddings::from_path)
                .transpose()?;

            let content = std::fs::read_to_string(&input).into_diagnostic()?;
            let input: TranslateInput = serde_json::from_str(&content).into_diagnostic()?;

            let mut translator = Translator::new(&report.index, config.linker.clone());
            if let Some(embeddings) = &embeddings {
                translator = translator.with_embedder(embeddings);
            }
            let translation = translator.translate(&question, &input.phrases, &input.templates)?;

            println!("Question: {}", translation.question);
            for item in &translation.matches {
                let chunk = item.chunk.map(|c| c.to_string()).unwrap_or_default();
                let marker = if item.explicit { " (explicit)" } else { "" };
                println!("  {chunk}: \"{}\"{marker}", item.raw_text);
            }
            for (n, query) in translation.queries().enumerate() {
                match query {
                    Ok(query) => println!("[{n}] {query}"),
                    Err(e) => println!("[{n}] skipped: {e}"),
                }
            }
        }

        Commands::Score {
            ontology,
            property,
            subject,
            object,
        } => {
            let report = load_ontology(&ontology)?;
            let index = &report.index;
            let property = index.require(&property)?;
            let subject = index.require(&subject)?;
            let object = object.as_deref().map(|iri| index.require(iri)).transpose()?;

            let show = |name: &str, c: Compatibility| {
                let swap = c.swap.map(|s| s.to_string()).unwrap_or_else(|| "-".into());
                println!("{name:<12} score={:.2} swap={swap}", c.score);
            };
            println!("{}", describe(index, property, subject, object));
            show("restriction", restriction_score(index, property, subject, object));
            show("usage", usage_score(index, property, subject, object));
        }
    }

    Ok(())
}

fn describe(index: &OntologyIndex, property: EntityId, subject: EntityId, object: Option<EntityId>) -> String {
    let object = object.map(|o| index.label_of(o)).unwrap_or("(none)");
    format!(
        "{} ({}, {})",
        index.label_of(property),
        index.label_of(subject),
        object
    )
}
