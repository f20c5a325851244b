//! The check battery
//!
//! Every check is a pure function of the parsed document (and sometimes the page
//! URL) that always returns a finding. Missing elements degrade to empty strings,
//! zeros and `false`; unparsable JSON-LD blocks are skipped one by one.

pub mod content;
pub mod metadata;
pub mod trust;

pub use content::{
    Headers, Questions, SemanticClarity, SpecialContent, Structure, analyze_headers,
    analyze_questions, analyze_semantic_clarity, analyze_special_content, analyze_structure,
};
pub use metadata::{
    Canonical, ContentSync, Dates, LlmAccessibility, MetaIssue, MetaValidation, SocialMeta,
    StructuredData, SyncIssue, analyze_canonical, analyze_content_sync, analyze_dates,
    analyze_llm_accessibility, analyze_social_meta, analyze_structured_data, validate_meta_tags,
};
pub use trust::{
    AuthorSignals, CitationLicense, Eeat, analyze_author_signals, analyze_citation_license,
    analyze_eeat,
};
