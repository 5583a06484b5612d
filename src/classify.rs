//! Heuristic classification of search results.
//!
//! Everything here is a total, stateless function over the expected input
//! shape: every input maps to *some* answer, with an explicit default. These
//! are best-effort advisory heuristics, not ground-truth classifiers — the
//! substring and fixed-vocabulary matching will produce false positives and
//! negatives, and that behavior is part of the contract.

use crate::node::Difficulty;
use crate::search::SearchResult;

// ---------------------------------------------------------------------------
// Difficulty
// ---------------------------------------------------------------------------

const ADVANCED_KEYWORDS: &[&str] = &[
    "advanced",
    "expert",
    "deep dive",
    "internals",
    "optimization",
    "performance tuning",
    "architecture",
];

const BEGINNER_KEYWORDS: &[&str] = &[
    "beginner",
    "introduction",
    "intro to",
    "getting started",
    "basics",
    "fundamentals",
    "101",
    "tutorial",
];

/// Q&A and code-hosting domains default to intermediate.
const INTERMEDIATE_DOMAINS: &[&str] = &[
    "stackoverflow.com",
    "stackexchange.com",
    "github.com",
    "gitlab.com",
];

/// Tutorial-site domains default to beginner.
const BEGINNER_DOMAINS: &[&str] = &[
    "w3schools.com",
    "freecodecamp.org",
    "codecademy.com",
    "khanacademy.org",
];

/// Assess a result's difficulty band.
///
/// Precedence: title/snippet keyword match first, domain match second,
/// intermediate as the default. A "Beginner Tutorial" hosted on github.com is
/// beginner — the text wins over the domain.
pub fn assess_difficulty(result: &SearchResult) -> Difficulty {
    let text = result.text();
    if ADVANCED_KEYWORDS.iter().any(|k| text.contains(k)) {
        return Difficulty::Advanced;
    }
    if BEGINNER_KEYWORDS.iter().any(|k| text.contains(k)) {
        return Difficulty::Beginner;
    }
    let domain = result.domain.to_lowercase();
    if INTERMEDIATE_DOMAINS.iter().any(|d| domain.contains(d)) {
        return Difficulty::Intermediate;
    }
    if BEGINNER_DOMAINS.iter().any(|d| domain.contains(d)) {
        return Difficulty::Beginner;
    }
    Difficulty::Intermediate
}

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

/// Default category when no rule matches.
pub const DEFAULT_CATEGORY: &str = "General Knowledge";

/// Assign a category label from the fixed taxonomy. First matching rule wins.
pub fn categorize(result: &SearchResult) -> &'static str {
    let domain = result.domain.to_lowercase();
    let title = result.title.to_lowercase();

    let domain_has = |list: &[&str]| list.iter().any(|d| domain.contains(d));

    if domain_has(&["github.com", "gitlab.com", "bitbucket.org"]) {
        "Code & Development"
    } else if domain_has(&["stackoverflow.com", "stackexchange.com", "quora.com"]) {
        "Q&A & Problem Solving"
    } else if domain_has(&["wikipedia.org", "britannica.com"]) {
        "Reference & Encyclopedia"
    } else if domain_has(&["youtube.com", "vimeo.com"]) {
        "Video & Tutorials"
    } else if domain_has(&["medium.com", "dev.to", "hashnode.com", "substack.com"]) {
        "Articles & Blogs"
    } else if domain.starts_with("docs.") || domain.contains("readthedocs") {
        "Documentation"
    } else if title.contains("tutorial") || title.contains("guide") {
        "Tutorials & Guides"
    } else if title.contains("news") || title.contains("update") {
        "News & Updates"
    } else {
        DEFAULT_CATEGORY
    }
}

// ---------------------------------------------------------------------------
// Related topics
// ---------------------------------------------------------------------------

/// Fixed vocabulary scanned for related-topic mentions.
const TOPIC_VOCABULARY: &[&str] = &[
    "javascript",
    "typescript",
    "python",
    "rust",
    "java",
    "react",
    "database",
    "sql",
    "algorithm",
    "data structure",
    "machine learning",
    "api",
    "security",
    "testing",
    "performance",
    "networking",
    "concurrency",
    "docker",
    "cloud",
    "git",
];

/// Intersect the result's text against the fixed topic vocabulary.
pub fn extract_related_topics(result: &SearchResult) -> Vec<String> {
    let text = result.text();
    TOPIC_VOCABULARY
        .iter()
        .filter(|topic| text.contains(*topic))
        .map(|topic| (*topic).to_string())
        .collect()
}

// ---------------------------------------------------------------------------
// Prerequisites & next steps
// ---------------------------------------------------------------------------

/// Suggest prerequisites from a small fixed rule set.
///
/// Advanced/expert material implies the base topic's fundamentals; framework
/// or library material implies the topic's core concepts.
pub fn identify_prerequisites(result: &SearchResult, topic: &str) -> Vec<String> {
    let text = result.text();
    let mut prereqs = Vec::new();
    if text.contains("advanced") || text.contains("expert") {
        prereqs.push(format!("{topic} fundamentals"));
    }
    if text.contains("framework") || text.contains("library") {
        prereqs.push(format!("{topic} core concepts"));
    }
    prereqs
}

/// Suggest where to go next, keyed off the assessed difficulty.
pub fn suggest_next_steps(result: &SearchResult, topic: &str) -> Vec<String> {
    match assess_difficulty(result) {
        Difficulty::Beginner => vec![format!("intermediate {topic}")],
        Difficulty::Intermediate => vec![format!("advanced {topic}")],
        Difficulty::Advanced => vec![format!("{topic} in practice")],
    }
}
