//! The markup formatter: converts an entry's raw body to an HTML fragment.

use pulldown_cmark::{html, CowStr, Event, Options, Parser, Tag};

/// Converts `markdown` to HTML.
///
/// Footnote labels are rewritten as `{footnote_prefix}-{label}`. The home
/// page and archive pages render several entries into one document, and
/// without a per-entry prefix two entries' `[^1]` footnotes would share an
/// element id.
pub fn to_html(markdown: &str, footnote_prefix: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);

    let converter = EventConverter { footnote_prefix };
    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(
        &mut out,
        Parser::new_ext(markdown, options).map(|ev| converter.convert(ev)),
    );
    out
}

struct EventConverter<'a> {
    footnote_prefix: &'a str,
}

impl<'a> EventConverter<'a> {
    fn label<'b>(&self, label: CowStr<'b>) -> CowStr<'b> {
        if self.footnote_prefix.is_empty() {
            return label;
        }
        CowStr::Boxed(format!("{}-{}", self.footnote_prefix, label).into_boxed_str())
    }

    fn convert_tag<'b>(&self, tag: Tag<'b>) -> Tag<'b> {
        match tag {
            Tag::FootnoteDefinition(label) => Tag::FootnoteDefinition(self.label(label)),
            _ => tag,
        }
    }

    fn convert<'b>(&self, ev: Event<'b>) -> Event<'b> {
        match ev {
            Event::Start(tag) => Event::Start(self.convert_tag(tag)),
            Event::End(tag) => Event::End(self.convert_tag(tag)),
            Event::FootnoteReference(label) => Event::FootnoteReference(self.label(label)),
            _ => ev,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_strong_emphasis() {
        assert_eq!(
            to_html("**bold** text", "hello-world"),
            "<p><strong>bold</strong> text</p>\n"
        );
    }

    #[test]
    fn test_footnotes_are_prefixed() {
        let html = to_html("Claim.[^1]\n\n[^1]: Source.\n", "first-post");
        assert!(html.contains(r##"href="#first-post-1""##), "{}", html);
        assert!(html.contains(r#"id="first-post-1""#), "{}", html);
    }

    #[test]
    fn test_empty_prefix_leaves_labels_alone() {
        let html = to_html("Claim.[^note]\n\n[^note]: Source.\n", "");
        assert!(html.contains(r##"href="#note""##), "{}", html);
    }
}
