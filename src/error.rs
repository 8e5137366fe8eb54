//! Rich diagnostic error types for the onto-linker engine.
//!
//! Each subsystem defines its own error type with miette `#[diagnostic]` derives,
//! providing error codes, help text, and source chains so users know exactly what
//! went wrong and how to fix it.

use miette::Diagnostic;
use thiserror::Error;

/// Top-level error type for the onto-linker engine.
///
/// Each variant wraps a subsystem-specific error, preserving the full diagnostic
/// chain (error codes, help text, source spans) through to the user.
#[derive(Debug, Error, Diagnostic)]
pub enum LinkError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Ontology(#[from] OntologyError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Linking(#[from] LinkingError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Template(#[from] TemplateError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Embed(#[from] EmbedError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),
}

// ---------------------------------------------------------------------------
// Ontology errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum OntologyError {
    #[error("failed to load ontology from {path}")]
    #[diagnostic(
        code(onto::ontology::load),
        help(
            "The ontology file could not be read. Check that the path exists \
             and is readable, or pass a different file with `--ontology`."
        )
    )]
    Load {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse ontology document {path}: {message}")]
    #[diagnostic(
        code(onto::ontology::parse),
        help(
            "The ontology document is not valid JSON or is missing required \
             sections. Expected top-level arrays: classes, individuals, \
             object_properties, data_properties, assertions."
        )
    )]
    Parse { path: String, message: String },

    #[error("malformed axiom: {axiom} references unknown entity \"{iri}\"")]
    #[diagnostic(
        code(onto::ontology::malformed_axiom),
        severity(Warning),
        help(
            "The axiom was skipped. Declare the referenced entity in the \
             ontology or remove the axiom."
        )
    )]
    MalformedAxiom { axiom: String, iri: String },

    #[error("unknown ontology entity: \"{iri}\"")]
    #[diagnostic(
        code(onto::ontology::unknown_entity),
        help("No class, individual or property with this IRI was declared.")
    )]
    UnknownEntity { iri: String },

    #[error("entity \"{iri}\" is already declared as {existing}")]
    #[diagnostic(
        code(onto::ontology::duplicate_entity),
        help("Each IRI belongs to exactly one category. Remove the second declaration.")
    )]
    DuplicateEntity { iri: String, existing: String },
}

// ---------------------------------------------------------------------------
// Linking errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum LinkingError {
    #[error("no translations for {}", .phrases.join(", "))]
    #[diagnostic(
        code(onto::linking::failure),
        help(
            "No ontology label scored above the similarity threshold for these \
             phrases. Lower `min_entity_similarity` / `min_relation_similarity`, \
             or add labels to the ontology that cover the wording."
        )
    )]
    LinkingFailure { phrases: Vec<String> },

    #[error("candidate \"{label}\" is not in the {category} vocabulary")]
    #[diagnostic(
        code(onto::linking::unknown_candidate),
        help(
            "A scored translation refers to a label the ontology index does not \
             know. Candidates must be produced from the same index they are \
             resolved against."
        )
    )]
    UnknownCandidate { label: String, category: String },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Embed(#[from] EmbedError),
}

// ---------------------------------------------------------------------------
// Template errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum TemplateError {
    #[error(
        "template not handleable: {relations} relation chunk(s), {entities} entity chunk(s)"
    )]
    #[diagnostic(
        code(onto::template::unhandleable),
        help(
            "Only templates with at most one relation chunk and one or two \
             entity chunks can be disambiguated. The template was skipped."
        )
    )]
    Unhandleable { relations: usize, entities: usize },

    #[error("no candidate combination satisfies the domain/range restrictions")]
    #[diagnostic(
        code(onto::template::no_valid_combination),
        help(
            "Every (relation, argument) combination violated the ontology's \
             declared domain or range. The template was skipped; other template \
             variants may still succeed."
        )
    )]
    NoValidCombination,

    #[error("no binding for chunk {chunk}")]
    #[diagnostic(
        code(onto::template::missing_binding),
        help("The template references a chunk that was not linked to any ontology entity.")
    )]
    MissingBinding { chunk: String },

    #[error("template instance has no query variants")]
    #[diagnostic(
        code(onto::template::no_variants),
        help("Provide at least one template string per template instance.")
    )]
    NoVariants,
}

// ---------------------------------------------------------------------------
// Embedding errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum EmbedError {
    #[error("failed to read embedding table {path}")]
    #[diagnostic(
        code(onto::embed::load),
        help("Check that the embedding table exists and is readable.")
    )]
    Load {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed embedding table {path} at line {line}: {message}")]
    #[diagnostic(
        code(onto::embed::malformed),
        help(
            "Each line must be a token followed by whitespace-separated floats, \
             and all rows must share the same dimension."
        )
    )]
    Malformed {
        path: String,
        line: usize,
        message: String,
    },

    #[error("dimension mismatch: expected {expected}, got {actual}")]
    #[diagnostic(
        code(onto::embed::dim_mismatch),
        help("Both vectors in a similarity must come from the same embedding provider.")
    )]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("cannot embed an empty phrase")]
    #[diagnostic(
        code(onto::embed::empty_phrase),
        help("The phrase contained no tokens after normalization.")
    )]
    EmptyPhrase,
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("failed to read config: {path}")]
    #[diagnostic(
        code(onto::config::read),
        help("Ensure the config file exists and is valid TOML.")
    )]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {path}")]
    #[diagnostic(
        code(onto::config::parse),
        help("Check the TOML syntax in the config file. {message}")
    )]
    Parse { path: String, message: String },

    #[error("failed to write config: {path}")]
    #[diagnostic(
        code(onto::config::write),
        help("Ensure you have write permissions to the config directory.")
    )]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {message}")]
    #[diagnostic(code(onto::config::invalid), help("Check the linker settings. {message}"))]
    Invalid { message: String },
}

/// Convenience alias for functions returning onto-linker results.
pub type LinkResult<T> = std::result::Result<T, LinkError>;
