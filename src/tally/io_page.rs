// Fetching the voting thread and finding its top-level comments.

use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use std::time::Duration;

use crate::tally::*;

const USER_AGENT: &str = "Mozilla/5.0 (compatible; vote-tally/1.5)";
const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

const AUTHOR_SELECTOR: &str = r#"a[rel="author"], .link-user"#;
const AUTHOR_REL_SELECTOR: &str = r#"a[rel="author"]"#;
const AUTHOR_CLASS_SELECTOR: &str = ".link-user";
const BODY_SELECTOR: &str = ".topic-comment-text, .comment-text, .markdown, .md, .content, .text";
// In order of preference.
const BODY_SELECTORS: [&str; 3] = [
    ".topic-comment-text",
    ".comment-text",
    ".markdown, .md, .content, .text",
];
const LINK_SELECTOR: &str = "a";

const CONTAINER_TAGS: [&str; 3] = ["li", "article", "div"];
const MAX_ANCESTORS: usize = 6;
const PARENT_LINK_TEXT: &str = "parent";
pub const UNKNOWN_AUTHOR: &str = "UNKNOWN_USER";

pub fn fetch_page(url: &str) -> TallyResult<String> {
    let client = reqwest::blocking::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(FETCH_TIMEOUT)
        .build()
        .context(FetchingSnafu { url })?;
    let response = client
        .get(url)
        .send()
        .context(FetchingSnafu { url })?
        .error_for_status()
        .context(FetchingSnafu { url })?;
    let status = response.status();
    let body = response.text().context(FetchingSnafu { url })?;
    info!("fetch_page: {} -> {}, {} bytes", url, status, body.len());
    Ok(body)
}

pub fn read_page(path: &str) -> TallyResult<String> {
    info!("Attempting to read page {:?}", path);
    fs::read_to_string(path).context(ReadingPageSnafu { path })
}

/// Saves the page for later inspection. A failure is only reported.
pub fn dump_page(path: &str, html: &str) {
    match fs::write(path, html) {
        Ok(()) => debug!("dump_page: saved HTML to {}", path),
        Err(e) => warn!("Failed to save HTML to {}: {}", path, e),
    }
}

fn parse_selector(selector: &str) -> TallyResult<Selector> {
    Selector::parse(selector).map_err(|e| TallyError::InvalidSelector {
        selector: selector.to_string(),
        message: format!("{:?}", e),
    })
}

struct CommentSelectors {
    author: Selector,
    author_rel: Selector,
    author_class: Selector,
    body: Selector,
    bodies: Vec<Selector>,
    link: Selector,
}

impl CommentSelectors {
    fn new() -> TallyResult<CommentSelectors> {
        let mut bodies: Vec<Selector> = Vec::new();
        for s in BODY_SELECTORS.iter() {
            bodies.push(parse_selector(s)?);
        }
        Ok(CommentSelectors {
            author: parse_selector(AUTHOR_SELECTOR)?,
            author_rel: parse_selector(AUTHOR_REL_SELECTOR)?,
            author_class: parse_selector(AUTHOR_CLASS_SELECTOR)?,
            body: parse_selector(BODY_SELECTOR)?,
            bodies,
            link: parse_selector(LINK_SELECTOR)?,
        })
    }

    /// Holds both an author and a body somewhere inside.
    fn looks_like_comment(&self, el: ElementRef) -> bool {
        el.select(&self.author).next().is_some() && el.select(&self.body).next().is_some()
    }

    /// The closest block around an author link that holds a whole comment.
    fn find_container<'a>(&self, anchor: ElementRef<'a>) -> Option<ElementRef<'a>> {
        let mut cur = Some(anchor);
        for _ in 0..MAX_ANCESTORS {
            let el = cur?;
            if CONTAINER_TAGS.contains(&el.value().name()) && self.looks_like_comment(el) {
                return Some(el);
            }
            cur = el.parent().and_then(ElementRef::wrap);
        }
        None
    }

    /// Replies show a "Parent" link, top-level comments do not.
    fn has_parent_link(&self, el: ElementRef) -> bool {
        el.select(&self.link).any(|a| {
            a.text().collect::<String>().trim().to_lowercase() == PARENT_LINK_TEXT
        })
    }

    fn author(&self, el: ElementRef) -> String {
        let a = el
            .select(&self.author_rel)
            .next()
            .or_else(|| el.select(&self.author_class).next());
        match a.map(|a| a.text().collect::<String>().trim().to_string()) {
            Some(name) if !name.is_empty() => name,
            _ => UNKNOWN_AUTHOR.to_string(),
        }
    }

    fn body_text(&self, el: ElementRef) -> String {
        let body = self
            .bodies
            .iter()
            .find_map(|s| el.select(s).next())
            .unwrap_or(el);
        body.text()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect::<Vec<&str>>()
            .join("\n")
    }
}

/// The `(author, text)` of every top-level comment, in document order.
pub fn top_level_comments(html: &str) -> TallyResult<Vec<Ballot>> {
    let selectors = CommentSelectors::new()?;
    let document = Html::parse_document(html);

    let mut seen = HashSet::new();
    let mut res: Vec<Ballot> = Vec::new();
    for anchor in document.select(&selectors.author) {
        let container = match selectors.find_container(anchor) {
            Some(c) => c,
            None => continue,
        };
        if !seen.insert(container.id()) {
            continue;
        }
        if selectors.has_parent_link(container) {
            continue;
        }
        res.push(Ballot {
            author: selectors.author(container),
            text: selectors.body_text(container),
        });
    }
    info!("top_level_comments: {} top-level comments found", res.len());
    Ok(res)
}

#[cfg(test)]
mod tests {
    use super::*;

    const THREAD: &str = r##"
<html><body>
<ol class="comment-tree">
  <li>
    <article class="comment" id="comment-1">
      <header><a rel="author" href="/user/alice">alice</a></header>
      <div class="comment-text"><p>Hades (5)</p><p>Celeste (3)</p></div>
    </article>
  </li>
  <li>
    <article class="comment" id="comment-2">
      <header><a class="link-user" href="/user/bob">bob</a><a href="#comment-1">Parent</a></header>
      <div class="comment-text"><p>Ico (5)</p></div>
    </article>
  </li>
  <li>
    <article class="comment" id="comment-3">
      <header><a rel="author" href="/user/carol"> </a></header>
      <div class="markdown">Outer Wilds (2)</div>
    </article>
  </li>
  <li>
    <div><a rel="author" href="/user/nobody">nobody</a></div>
  </li>
</ol>
</body></html>
"##;

    #[test]
    fn finds_top_level_comments() {
        let comments = top_level_comments(THREAD).unwrap();
        assert_eq!(
            comments,
            vec![
                Ballot::new("alice", "Hades (5)\nCeleste (3)"),
                Ballot::new(UNKNOWN_AUTHOR, "Outer Wilds (2)"),
            ]
        );
    }

    #[test]
    fn empty_page() {
        assert_eq!(top_level_comments("").unwrap(), vec![]);
        assert_eq!(
            top_level_comments("<html><body><p>Nothing here</p></body></html>").unwrap(),
            vec![]
        );
    }

    #[test]
    fn selectors_parse() {
        assert!(CommentSelectors::new().is_ok());
    }
}
