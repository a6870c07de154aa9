//! Markdown-to-HTML rendering.
//!
//! Wraps pulldown-cmark with the site's conventions: tables, footnotes and
//! strikethrough enabled; headings get slugified anchor ids and feed a table
//! of contents prepended to the body; links to foreign sites open in a new
//! tab while local links do not.

use pulldown_cmark::{html, CowStr, Event, HeadingLevel, Options, Parser, Tag, TagEnd};

use agora_core::escape::html_escape;

/// A rendered documentation page.
#[derive(Debug, Clone)]
pub struct RenderedPage {
    /// TOC div followed by the rendered body.
    pub html: String,
    /// Text of the first `<h1>`, if the page has one.
    pub title: Option<String>,
}

struct HeadingRef {
    level: HeadingLevel,
    text: String,
    slug: String,
}

/// Render markdown `source` into a [`RenderedPage`].
pub fn render_markdown(source: &str) -> RenderedPage {
    let options =
        Options::ENABLE_TABLES | Options::ENABLE_FOOTNOTES | Options::ENABLE_STRIKETHROUGH;
    let events: Vec<Event> = Parser::new_ext(source, options).collect();

    let headings = collect_headings(&events);
    let title = headings
        .iter()
        .find(|h| h.level == HeadingLevel::H1)
        .map(|h| h.text.clone());

    let mut body = String::new();
    html::push_html(&mut body, rewrite_events(events, &headings).into_iter());

    RenderedPage {
        html: format!("{}\n{body}", build_toc(&headings)),
        title,
    }
}

/// First pass: gather heading text and assign unique slugs.
fn collect_headings(events: &[Event]) -> Vec<HeadingRef> {
    let mut headings = Vec::new();
    let mut seen: std::collections::HashMap<String, usize> = std::collections::HashMap::new();
    let mut current: Option<(HeadingLevel, String)> = None;

    for event in events {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                current = Some((*level, String::new()));
            }
            Event::End(TagEnd::Heading(_)) => {
                if let Some((level, text)) = current.take() {
                    let base = slugify(&text);
                    let count = seen.entry(base.clone()).or_insert(0);
                    let slug = if *count == 0 {
                        base.clone()
                    } else {
                        format!("{base}-{count}")
                    };
                    *count += 1;
                    headings.push(HeadingRef { level, text, slug });
                }
            }
            Event::Text(t) | Event::Code(t) => {
                if let Some((_, buf)) = current.as_mut() {
                    buf.push_str(t);
                }
            }
            _ => {}
        }
    }
    headings
}

/// Second pass: inject heading ids and retarget external links.
fn rewrite_events<'a>(events: Vec<Event<'a>>, headings: &[HeadingRef]) -> Vec<Event<'a>> {
    let mut out = Vec::with_capacity(events.len());
    let mut heading_idx = 0usize;
    let mut in_external_link = false;

    for event in events {
        match event {
            Event::Start(Tag::Heading {
                level,
                id,
                classes,
                attrs,
            }) => {
                let slug = headings.get(heading_idx).map(|h| h.slug.clone());
                heading_idx += 1;
                // An explicit id from the source wins over the generated slug.
                let id = id.or_else(|| slug.map(CowStr::from));
                out.push(Event::Start(Tag::Heading {
                    level,
                    id,
                    classes,
                    attrs,
                }));
            }
            Event::Start(Tag::Link {
                dest_url, title, ..
            }) if is_external(&dest_url) => {
                in_external_link = true;
                let mut anchor = format!("<a href=\"{}\"", html_escape(&dest_url));
                if !title.is_empty() {
                    anchor.push_str(&format!(" title=\"{}\"", html_escape(&title)));
                }
                anchor.push_str(" target=\"_blank\" rel=\"noopener\">");
                out.push(Event::InlineHtml(anchor.into()));
            }
            Event::End(TagEnd::Link) if in_external_link => {
                in_external_link = false;
                out.push(Event::InlineHtml("</a>".into()));
            }
            other => out.push(other),
        }
    }
    out
}

fn is_external(dest: &str) -> bool {
    dest.starts_with("http://") || dest.starts_with("https://")
}

fn heading_rank(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

/// Anchor list for headings h1-h3, matching the layout's `.toc` styling.
fn build_toc(headings: &[HeadingRef]) -> String {
    let mut toc = String::from("<div class=\"toc\">\n<ul>\n");
    for heading in headings {
        if heading_rank(heading.level) > 3 {
            continue;
        }
        toc.push_str(&format!(
            "<li class=\"toc-{}\"><a href=\"#{}\">{}</a></li>\n",
            heading.level,
            heading.slug,
            html_escape(&heading.text)
        ));
    }
    toc.push_str("</ul>\n</div>");
    toc
}

fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut last_dash = true;
    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_dash = false;
        } else if !last_dash {
            slug.push('-');
            last_dash = true;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    if slug.is_empty() {
        slug.push_str("section");
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_heading_with_anchor_id() {
        let page = render_markdown("# Getting Started\n\nSome text.");
        assert!(page.html.contains("<h1 id=\"getting-started\">Getting Started</h1>"));
        assert_eq!(page.title.as_deref(), Some("Getting Started"));
    }

    #[test]
    fn toc_links_to_headings() {
        let page = render_markdown("# Intro\n\n## Setup\n\n## Usage\n");
        assert!(page.html.starts_with("<div class=\"toc\">"));
        assert!(page.html.contains("<a href=\"#setup\">Setup</a>"));
        assert!(page.html.contains("<a href=\"#usage\">Usage</a>"));
    }

    #[test]
    fn duplicate_headings_get_unique_slugs() {
        let page = render_markdown("## Setup\n\n## Setup\n");
        assert!(page.html.contains("id=\"setup\""));
        assert!(page.html.contains("id=\"setup-1\""));
    }

    #[test]
    fn deep_headings_stay_out_of_the_toc() {
        let page = render_markdown("# Top\n\n#### Fine print\n");
        assert!(!page.html.contains("<a href=\"#fine-print\">"));
        // The heading itself still renders with its anchor.
        assert!(page.html.contains("id=\"fine-print\""));
    }

    #[test]
    fn external_links_open_in_new_tab() {
        let page = render_markdown("[docs](https://example.com/docs)");
        assert!(page
            .html
            .contains("<a href=\"https://example.com/docs\" target=\"_blank\" rel=\"noopener\">docs</a>"));
    }

    #[test]
    fn local_links_keep_default_target() {
        let page = render_markdown("[basics](/docs/basics)");
        assert!(page.html.contains("href=\"/docs/basics\""));
        assert!(!page.html.contains("target=\"_blank\""));
    }

    #[test]
    fn external_link_title_is_carried_over() {
        let page = render_markdown("[x](https://example.com \"The Title\")");
        assert!(page.html.contains("title=\"The Title\""));
    }

    #[test]
    fn tables_are_enabled() {
        let page = render_markdown("| a | b |\n|---|---|\n| 1 | 2 |\n");
        assert!(page.html.contains("<table>"));
    }

    #[test]
    fn page_without_h1_has_no_title() {
        let page = render_markdown("## Only a subheading\n");
        assert!(page.title.is_none());
    }

    #[test]
    fn slugify_flattens_punctuation() {
        assert_eq!(slugify("Hello, World!"), "hello-world");
        assert_eq!(slugify("  spaced   out  "), "spaced-out");
        assert_eq!(slugify("??"), "section");
    }
}
