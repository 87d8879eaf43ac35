//! Markdown to HTML using pulldown-cmark.
//!
//! Fenced code is highlighted with syntect and the result is sanitized with
//! ammonia, keeping `class` and `style` so the highlighting survives.

use std::sync::LazyLock;

use maud::{PreEscaped, html as markup};
use pulldown_cmark::{CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd, html};
use syntect::easy::HighlightLines;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::{IncludeBackground, styled_line_to_highlighted_html};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;

/// Characters of plain text kept in a preview blurb.
pub const BLURB_CHARS: usize = 140;

/// Theme for fenced code blocks.
pub const HIGHLIGHT_THEME: &str = "base16-ocean.dark";

static SYNTAXES: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);
static THEMES: LazyLock<ThemeSet> = LazyLock::new(ThemeSet::load_defaults);

/// Options for markdown conversion
#[derive(Debug, Clone, Default)]
pub struct MarkdownOptions {
    pub tables: bool,
    pub footnotes: bool,
    pub strikethrough: bool,
    pub task_lists: bool,
    /// Highlight fenced code blocks
    pub highlight: bool,
    /// Run the rendered HTML through ammonia
    pub sanitize: bool,
}

impl MarkdownOptions {
    /// Create options with all extensions enabled
    pub fn all() -> Self {
        Self {
            tables: true,
            footnotes: true,
            strikethrough: true,
            task_lists: true,
            highlight: true,
            sanitize: true,
        }
    }

    fn to_pulldown_options(&self) -> Options {
        let mut opts = Options::empty();
        if self.tables {
            opts.insert(Options::ENABLE_TABLES);
        }
        if self.footnotes {
            opts.insert(Options::ENABLE_FOOTNOTES);
        }
        if self.strikethrough {
            opts.insert(Options::ENABLE_STRIKETHROUGH);
        }
        if self.task_lists {
            opts.insert(Options::ENABLE_TASKLISTS);
        }
        opts
    }
}

/// Render a post body. Fenced code keeps its `language-*` class.
pub fn to_html(markdown: &str, options: &MarkdownOptions) -> String {
    let parser = Parser::new_ext(markdown, options.to_pulldown_options());
    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    if options.highlight {
        html::push_html(&mut out, highlight_fences(parser).into_iter());
    } else {
        html::push_html(&mut out, parser);
    }

    if options.sanitize { sanitize(&out) } else { out }
}

/// Replace every fenced code block with one pre-rendered HTML event.
fn highlight_fences<'a>(parser: Parser<'a>) -> Vec<Event<'a>> {
    let mut events = Vec::new();
    // (language, collected code) while inside a fence
    let mut fence: Option<(String, String)> = None;

    for event in parser {
        match event {
            Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(info))) => {
                let lang = info.split_whitespace().next().unwrap_or_default();
                fence = Some((lang.to_owned(), String::new()));
            }
            Event::Text(text) if fence.is_some() => {
                if let Some((_, code)) = fence.as_mut() {
                    code.push_str(&text);
                }
            }
            Event::End(TagEnd::CodeBlock) if fence.is_some() => {
                if let Some((lang, code)) = fence.take() {
                    events.push(Event::Html(CowStr::from(highlight_block(&code, &lang))));
                }
            }
            event => events.push(event),
        }
    }
    events
}

/// `<pre class="highlight"><code class="language-*">` with inline styles.
///
/// Unknown languages fall back to plain text.
pub fn highlight_block(code: &str, lang: &str) -> String {
    let syntax = SYNTAXES
        .find_syntax_by_token(lang)
        .or_else(|| SYNTAXES.find_syntax_by_name(lang))
        .unwrap_or_else(|| SYNTAXES.find_syntax_plain_text());
    let class = (!lang.is_empty()).then(|| format!("language-{lang}"));

    let Some(theme) = THEMES.themes.get(HIGHLIGHT_THEME) else {
        return markup! { pre { code class=[class] { (code) } } }.into_string();
    };
    let background = theme
        .settings
        .background
        .map(|c| format!("background-color:#{:02x}{:02x}{:02x};", c.r, c.g, c.b));

    match highlight_lines(code, syntax, theme) {
        Ok(body) => markup! {
            pre.highlight style=[background] { code class=[class] { (PreEscaped(body)) } }
        }
        .into_string(),
        Err(e) => {
            crate::debug!("markdown"; "highlighting {} failed: {}", lang, e);
            markup! { pre { code class=[class] { (code) } } }.into_string()
        }
    }
}

fn highlight_lines(
    code: &str,
    syntax: &SyntaxReference,
    theme: &Theme,
) -> Result<String, syntect::Error> {
    let mut highlighter = HighlightLines::new(syntax, theme);
    let mut out = String::with_capacity(code.len() * 4);
    for line in LinesWithEndings::from(code) {
        let regions = highlighter.highlight_line(line, &SYNTAXES)?;
        out.push_str(&styled_line_to_highlighted_html(&regions, IncludeBackground::No)?);
    }
    Ok(out)
}

/// Strip scripts, event handlers and unknown tags.
///
/// Task-list checkboxes and footnote anchors are kept.
pub fn sanitize(html: &str) -> String {
    ammonia::Builder::default()
        .add_generic_attributes(&["class", "style", "id"])
        .add_tags(&["input"])
        .add_tag_attributes("input", &["type", "checked", "disabled"])
        .clean(html)
        .to_string()
}

/// Plain text of a post: text and inline code, with breaks and block ends
/// turned into single spaces.
pub fn plain_text(markdown: &str) -> String {
    let mut text = String::with_capacity(markdown.len());

    for event in Parser::new_ext(markdown, MarkdownOptions::all().to_pulldown_options()) {
        match event {
            Event::Text(t) | Event::Code(t) => text.push_str(&t),
            Event::SoftBreak | Event::HardBreak => push_space(&mut text),
            Event::End(
                TagEnd::Paragraph | TagEnd::Heading(_) | TagEnd::Item | TagEnd::CodeBlock,
            ) => push_space(&mut text),
            _ => {}
        }
    }
    text.trim_end().to_owned()
}

fn push_space(text: &mut String) {
    if !text.is_empty() && !text.ends_with(' ') {
        text.push(' ');
    }
}

/// First `BLURB_CHARS` characters of the plain text, then `...`.
pub fn blurb(markdown: &str) -> String {
    let text = plain_text(markdown);
    let mut blurb: String = text.chars().take(BLURB_CHARS).collect();
    blurb.push_str("...");
    blurb
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_html_extensions() {
        let html = to_html(
            "| a | b |\n|---|---|\n| 1 | 2 |\n\n~~old~~\n\n- [x] done\n",
            &MarkdownOptions::all(),
        );
        assert!(html.contains("<table>"));
        assert!(html.contains("<del>old</del>"));
        assert!(html.contains("checkbox"));
    }

    #[test]
    fn test_fenced_code_language_class() {
        let html = to_html("```rust\nfn main() {}\n```\n", &MarkdownOptions::default());
        assert!(html.contains(r#"<code class="language-rust">"#));
        assert!(html.contains("fn main() {}"));
    }

    #[test]
    fn test_fenced_code_highlighted() {
        let html = to_html(
            "```rust\nfn main() { let x = 1; }\n```\n",
            &MarkdownOptions::all(),
        );
        assert!(html.contains(r#"class="highlight""#));
        assert!(html.contains(r#"style="background-color:#"#));
        assert!(html.contains(r#"<code class="language-rust">"#));
        assert!(html.contains("<span style=\""));
        assert!(html.contains("main"));
        // One block, not a pre nested in pulldown's own
        assert_eq!(html.matches("<pre").count(), 1);
    }

    #[test]
    fn test_unknown_language_is_escaped_plain_text() {
        let html = highlight_block("<b>&</b>\n", "no-such-lang");
        assert!(html.contains(r#"class="language-no-such-lang""#));
        assert!(html.contains("&lt;b&gt;&amp;&lt;/b&gt;"));
        assert!(!html.contains("<b>"));
    }

    #[test]
    fn test_sanitize_strips_script() {
        let html = to_html(
            "Hello <script>alert(1)</script>\n\n<p onclick=\"x()\">hi</p>\n",
            &MarkdownOptions::all(),
        );
        assert!(!html.contains("<script"));
        assert!(!html.contains("alert(1)"));
        assert!(!html.contains("onclick"));
        assert!(html.contains("hi</p>"));
    }

    #[test]
    fn test_sanitize_keeps_task_lists_and_footnotes() {
        let html = to_html(
            "- [x] done\n\nText[^1].\n\n[^1]: Note.\n",
            &MarkdownOptions::all(),
        );
        assert!(html.contains(r#"type="checkbox""#));
        assert!(html.contains("checked"));
        assert!(html.contains(r#"class="footnote-definition""#));
        assert!(html.contains(r#"id="1""#));
    }

    #[test]
    fn test_plain_text() {
        let text = plain_text("# Title\n\nSome *emphasis* and `code`.\nNext line.\n");
        assert_eq!(text, "Title Some emphasis and code. Next line.");
    }

    #[test]
    fn test_blurb_truncates_on_chars() {
        let body = "é".repeat(200);
        let blurb = blurb(&body);
        assert_eq!(blurb.chars().count(), BLURB_CHARS + 3);
        assert!(blurb.ends_with("..."));

        assert_eq!(super::blurb("Short."), "Short....");
        assert_eq!(super::blurb(""), "...");
    }
}
