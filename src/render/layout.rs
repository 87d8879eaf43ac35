//! Shared page chrome: head, sidebar and footer.

use maud::{DOCTYPE, Markup, Render, html};

use crate::config::SiteConfig;
use crate::utils::slug::slugify;

const STYLESHEETS: [&str; 2] = ["/reset.css", "/style.css"];

/// Links to a stylesheet at the given path.
struct Css(&'static str);

impl Render for Css {
    fn render(&self) -> Markup {
        html! {
            link rel="stylesheet" type="text/css" href=(self.0);
        }
    }
}

/// Wraps page content in the site layout.
pub struct Layout<'a> {
    config: &'a SiteConfig,
}

impl<'a> Layout<'a> {
    pub fn new(config: &'a SiteConfig) -> Self {
        Self { config }
    }

    /// Full document with `main` inside `<main>`.
    pub fn render(&self, title: &str, main: Markup) -> Markup {
        let site = &self.config.site;
        let feed = self.config.feed_enabled().then(|| self.feed_href());

        html! {
            (DOCTYPE)
            html lang=(site.language) {
                head {
                    meta charset="utf-8";
                    title { (title) }
                    @for href in STYLESHEETS {
                        (Css(href))
                    }
                    @if let Some(feed) = &feed {
                        link rel="alternate" type="application/rss+xml" title=(site.title) href=(feed);
                    }
                }
                body {
                    div.buffer {}
                    (self.sidebar())
                    div #main {
                        main { (main) }
                        (self.footer(feed.as_deref()))
                    }
                }
            }
        }
    }

    fn sidebar(&self) -> Markup {
        let site = &self.config.site;

        html! {
            div #sidebar {
                div.tagline {
                    ul {
                        @for tag in &site.featured_tags {
                            li {
                                a href={ "/tags/" (slugify(tag)) "/" } { span { (tag) } }
                            }
                        }
                        li {
                            a href="/tags/" { span { "tags" } }
                        }
                    }
                    @if !site.tagline.is_empty() {
                        p { (site.tagline) }
                    }
                }
                @match &site.logo {
                    Some(logo) => {
                        a href="/" { img.logo src=(logo) alt=(site.title); }
                    }
                    None => {
                        a.logo href="/" { (site.title) }
                    }
                }
            }
        }
    }

    fn footer(&self, feed: Option<&str>) -> Markup {
        let site = &self.config.site;

        html! {
            footer {
                @if !site.copyright.is_empty() {
                    span { (site.copyright) }
                }
                div.links {
                    @for link in &site.links {
                        a href=(link.href) rel="noopener noreferrer" { (link.label) }
                    }
                    @if let Some(feed) = feed {
                        a href=(feed) { "rss" }
                    }
                }
            }
        }
    }

    fn feed_href(&self) -> String {
        format!("/{}", self.config.build.feed.path.display())
    }
}
