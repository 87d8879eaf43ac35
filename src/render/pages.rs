//! Page bodies: posts, the index, and the tag pages.

use maud::{Markup, PreEscaped, html};

use super::layout::Layout;
use super::markdown::{MarkdownOptions, blurb, to_html};
use crate::content::{Post, TagGroup};
use crate::utils::plural::plural_count;

/// Renders every page kind with one layout.
pub struct PageRenderer<'a> {
    layout: Layout<'a>,
    site_title: &'a str,
    /// URL prefix of post pages, e.g. `/posts`
    posts_url: String,
    markdown: MarkdownOptions,
}

impl<'a> PageRenderer<'a> {
    pub fn new(config: &'a crate::config::SiteConfig) -> Self {
        Self {
            layout: Layout::new(config),
            site_title: &config.site.title,
            posts_url: config.build.posts_url(),
            markdown: MarkdownOptions::all(),
        }
    }

    pub fn post_url(&self, post: &Post) -> String {
        post.url(&self.posts_url)
    }

    /// `<posts>/<stem>.html`
    pub fn post(&self, post: &Post) -> String {
        let front = &post.front;
        let main = html! {
            h1 { (front.title) }
            time datetime=(front.date.to_string()) { (front.date.to_display_date()) }
            @if let Some((href, text)) = front.external_link() {
                p.link { a href=(href) { (text) } }
            }
            article { (PreEscaped(to_html(&post.body, &self.markdown))) }
        };
        self.layout.render(&front.title, main).into_string()
    }

    /// `index.html`: preview cards for the most recent posts.
    pub fn index(&self, recent: &[Post]) -> String {
        let main = html! {
            @for post in recent {
                (self.preview(post))
            }
        };
        self.layout.render(self.site_title, main).into_string()
    }

    /// `tags/index.html`: every tag with its post count.
    pub fn tags_index(&self, tags: &[TagGroup<'_>]) -> String {
        let main = html! {
            h1 { "tags" }
            ul.tags {
                @for tag in tags {
                    li {
                        a href={ "/tags/" (tag.slug) "/" } { (tag.name) }
                        " "
                        span.count { (plural_count(tag.posts.len(), "post")) }
                    }
                }
            }
        };
        self.layout.render("tags", main).into_string()
    }

    /// `tags/<slug>/index.html`: previews of every post with the tag.
    pub fn tag(&self, tag: &TagGroup<'_>) -> String {
        let main = html! {
            h1 { (tag.name) }
            @for post in &tag.posts {
                (self.preview(post))
            }
        };
        self.layout.render(tag.name, main).into_string()
    }

    /// Card linking to a post: tags, title and blurb.
    fn preview(&self, post: &Post) -> Markup {
        let front = &post.front;
        html! {
            a href=(self.post_url(post)) {
                div.card {
                    div.topline {
                        span.tags { (front.tags.join(", ")) }
                        h2 { (front.title) }
                    }
                    p { (blurb(&post.body)) }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;
    use crate::content::PostStore;
    use std::path::Path;

    fn post(stem: &str, date: &str, tags: &str, body: &str) -> Post {
        let text = format!("---\ntitle: {stem} <b>\ntags: [{tags}]\nlink: ''\ndate: {date}\n---\n{body}");
        Post::parse(Path::new(&format!("content/{stem}.md")), &text).unwrap()
    }

    #[test]
    fn test_post_page() {
        let config = test_parse_config("");
        let renderer = PageRenderer::new(&config);
        let mut p = post("hello", "2020-05-03 10:15", "dev", "Hi **there**.\n");
        p.front.link = "https://example.com/?a=1&b=2".into();

        let html = renderer.post(&p);
        assert!(html.contains("<title>hello &lt;b&gt;</title>"));
        assert!(html.contains("<h1>hello &lt;b&gt;</h1>"));
        assert!(html.contains("<strong>there</strong>"));
        assert!(html.contains(r#"<a href="https://example.com/?a=1&amp;b=2">"#));
        assert!(html.contains(">3 May 2020</time>"));
        assert!(!html.contains("livereload"));
    }

    #[test]
    fn test_index_links_to_posts() {
        let config = test_parse_config("[site]\ntitle = \"Blog\"\n");
        let renderer = PageRenderer::new(&config);
        let store = PostStore::from_posts(vec![
            post("a", "2020-01-01 00:00", "dev", "First post body."),
            post("b", "2021-01-01 00:00", "dev, design", "Second post body."),
        ])
        .unwrap();

        let html = renderer.index(store.most_recent(5));
        assert!(html.contains("<title>Blog</title>"));
        let b = html.find(r#"<a href="/posts/b.html">"#).unwrap();
        let a = html.find(r#"<a href="/posts/a.html">"#).unwrap();
        assert!(b < a);
        assert!(html.contains(r#"<span class="tags">dev, design</span>"#));
        assert!(html.contains("<p>Second post body....</p>"));
    }

    #[test]
    fn test_tag_pages() {
        let config = test_parse_config("");
        let renderer = PageRenderer::new(&config);
        let store = PostStore::from_posts(vec![
            post("a", "2020-01-01 00:00", "dev", ""),
            post("b", "2021-01-01 00:00", "dev, Web Design", ""),
        ])
        .unwrap();
        let tags = store.tags();

        let index = renderer.tags_index(&tags);
        assert!(index.contains(
            r#"<li><a href="/tags/dev/">dev</a> <span class="count">2 posts</span></li>"#
        ));
        assert!(index.contains(r#"<a href="/tags/web-design/">Web Design</a> <span class="count">1 post</span>"#));

        let dev = renderer.tag(&tags[0]);
        assert!(dev.contains("<h1>dev</h1>"));
        assert!(dev.contains("/posts/a.html"));
        assert!(dev.contains("/posts/b.html"));
    }
}
