use std::sync::OnceLock;

use regex::Regex;

use super::Frontmatter;

/// Inputs available when deriving a display title.
#[derive(Debug, Clone, Copy)]
pub struct TitleSource<'a> {
    pub frontmatter: Option<&'a Frontmatter>,
    /// Document text after the metadata block, or the whole text when there is none.
    /// `None` for folder-based resources.
    pub body: Option<&'a str>,
    /// File name without its kind suffix, or the folder name.
    pub stem: &'a str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleStrategy {
    ExplicitTitle,
    Name,
    Heading,
    Stem,
}

impl TitleStrategy {
    pub const CHAIN: [TitleStrategy; 4] = [
        TitleStrategy::ExplicitTitle,
        TitleStrategy::Name,
        TitleStrategy::Heading,
        TitleStrategy::Stem,
    ];

    pub fn apply(self, source: &TitleSource<'_>) -> Option<String> {
        match self {
            TitleStrategy::ExplicitTitle => source
                .frontmatter
                .and_then(|fm| fm.str("title"))
                .map(String::from),
            TitleStrategy::Name => source.frontmatter.and_then(|fm| fm.str("name")).map(title_case),
            TitleStrategy::Heading => source.body.and_then(first_heading),
            TitleStrategy::Stem => Some(humanize_stem(source.stem)),
        }
    }
}

/// Walk the strategy chain and return the first title produced.
pub fn derive_title(source: &TitleSource<'_>) -> String {
    TitleStrategy::CHAIN
        .iter()
        .find_map(|strategy| strategy.apply(source))
        .unwrap_or_else(|| source.stem.to_string())
}

/// `my-cool-agent` -> `My Cool Agent`. Only the first character of each word changes.
pub fn title_case(name: &str) -> String {
    name.split('-')
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn word_start_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b\w").expect("valid word start regex"))
}

/// `my_file-name` -> `My File Name`.
pub fn humanize_stem(stem: &str) -> String {
    let spaced = stem.replace(['-', '_'], " ");
    word_start_re()
        .replace_all(&spaced, |caps: &regex::Captures<'_>| caps[0].to_uppercase())
        .into_owned()
}

/// First `# ` heading outside fenced code blocks.
pub fn first_heading(body: &str) -> Option<String> {
    let mut in_code = false;
    for line in body.lines() {
        if line.trim().starts_with("```") {
            in_code = !in_code;
            continue;
        }
        if !in_code && let Some(rest) = line.strip_prefix("# ") {
            let heading = rest.trim();
            if !heading.is_empty() {
                return Some(heading.to_string());
            }
        }
    }
    None
}
