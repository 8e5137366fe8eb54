// thiserror's #[error("...{field}...")] format strings reference struct fields,
// but the compiler doesn't see through the derive macro and reports false positives.
#![allow(unused_assignments)]

//! # onto-linker
//!
//! Links the phrases of a natural-language question to the vocabulary of an
//! OWL ontology and fills query templates with the result.
//!
//! ## Architecture
//!
//! - **Ontology index** (`ontology`): labels per category, ancestor closure,
//!   domain/range restrictions and observed property usages
//! - **Scoring** (`scoring`): restriction and usage compatibility of a
//!   (relation, subject, object) tuple, with the argument-swap signal
//! - **Phrases** (`vocab`): tagged phrases, direct label hits and chunk numbering
//! - **Linking** (`linker`): per-phrase candidates, then joint selection of
//!   one consistent combination per template
//! - **Templates** (`template`): chunk roles and query filling
//! - **Pipeline** (`pipeline`): one question against many templates
//!
//! ## Library usage
//!
//! ```no_run
//! use std::path::Path;
//! use onto_linker::config::LinkerConfig;
//! use onto_linker::ontology::loader::load_ontology;
//! use onto_linker::pipeline::Translator;
//! use onto_linker::vocab::TaggedPhrase;
//!
//! let report = load_ontology(Path::new("pizza.json")).unwrap();
//! let translator = Translator::new(&report.index, LinkerConfig::default());
//! let translation = translator
//!     .translate(
//!         "Which pizza has a meat topping?",
//!         &[TaggedPhrase::entity("pizza"), TaggedPhrase::relation("has"), TaggedPhrase::entity("meat topping")],
//!         &[vec!["ASK { <EC1> rdfs:subClassOf [ owl:onProperty <PC1> ; owl:someValuesFrom <EC2> ] }".into()]],
//!     )
//!     .unwrap();
//! for query in translation.queries().flatten() {
//!     println!("{query}");
//! }
//! ```

pub mod config;
pub mod embed;
pub mod error;
pub mod linker;
pub mod nlp;
pub mod ontology;
pub mod pipeline;
pub mod scoring;
pub mod template;
pub mod vocab;
