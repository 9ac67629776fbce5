use pulldown_cmark::{html, Options, Parser};
use regex::{Captures, Regex};
use std::collections::HashSet;
use std::sync::OnceLock;

const DIAGRAM_KEYWORDS: [&str; 12] = [
    "graph",
    "flowchart",
    "sequenceDiagram",
    "classDiagram",
    "stateDiagram",
    "erDiagram",
    "journey",
    "gantt",
    "pie",
    "gitGraph",
    "mindmap",
    "timeline",
];

fn wiki_link_regex() -> &'static Regex {
    static RE_WIKI: OnceLock<Regex> = OnceLock::new();
    RE_WIKI.get_or_init(|| Regex::new(r"\[\[([^\]|]+)(?:\|([^\]]+))?\]\]").unwrap())
}

/// Replaces `[[target]]` and `[[target|alias]]` with the span the preview
/// pane listens on. The target lands in `data-link` verbatim.
pub fn convert_wiki_links(html: &str) -> String {
    wiki_link_regex()
        .replace_all(html, |caps: &Captures| {
            let target = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
            let text = caps.get(2).map(|m| m.as_str()).unwrap_or(target);
            format!("<span class=\"wiki-link\" data-link=\"{target}\">{text}</span>")
        })
        .into_owned()
}

/// Renders a note for the preview pane.
///
/// pulldown-cmark's own wiki-link extension stays off: `[[..]]` has to survive
/// as text so that [`convert_wiki_links`] can produce the host's markup.
pub fn parse_markdown(content: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);
    options.insert(Options::ENABLE_FOOTNOTES);

    let parser = Parser::new_ext(content, options);
    let mut rendered = String::with_capacity(content.len() * 3 / 2);
    html::push_html(&mut rendered, parser);
    convert_wiki_links(&rendered)
}

/// Distinct link targets of a note in first-seen order, without `#heading`
/// suffixes.
pub fn extract_link_targets(content: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut targets = Vec::new();
    for caps in wiki_link_regex().captures_iter(content) {
        let Some(raw) = caps.get(1) else {
            continue;
        };
        let target = match raw.as_str().split_once('#') {
            Some((before, _)) => before,
            None => raw.as_str(),
        }
        .trim();
        if !target.is_empty() && seen.insert(target.to_string()) {
            targets.push(target.to_string());
        }
    }
    targets
}

/// Whether a fenced code block holds a mermaid diagram.
pub fn is_mermaid_source(info: Option<&str>, body: &str) -> bool {
    if info.is_some_and(|lang| lang.trim().eq_ignore_ascii_case("mermaid")) {
        return true;
    }
    let body = body.trim_start();
    DIAGRAM_KEYWORDS
        .iter()
        .any(|keyword| body.starts_with(*keyword))
}

pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
