//! RSS 2.0 feed generation.

use anyhow::{Result, anyhow};
use rss::{ChannelBuilder, GuidBuilder, ItemBuilder, validation::Validate};

use super::markdown::blurb;
use crate::config::SiteConfig;
use crate::content::PostStore;

/// Build the feed XML, or `None` when the feed is disabled or `site.url`
/// is unset.
pub fn build_rss(config: &SiteConfig, store: &PostStore) -> Result<Option<String>> {
    let Some(base_url) = config.site.base_url().filter(|_| config.feed_enabled()) else {
        return Ok(None);
    };
    let posts_url = config.build.posts_url();

    let items: Vec<_> = store
        .iter()
        .map(|post| {
            let link = format!("{base_url}{}", post.url(&posts_url));
            ItemBuilder::default()
                .title(post.front.title.clone())
                .link(Some(link.clone()))
                .guid(GuidBuilder::default().permalink(true).value(link).build())
                .description(blurb(&post.body))
                .categories(
                    post.front
                        .tags
                        .iter()
                        .map(|t| rss::CategoryBuilder::default().name(t.clone()).build())
                        .collect::<Vec<_>>(),
                )
                .pub_date(post.front.date.to_rfc2822())
                .build()
        })
        .collect();

    let site = &config.site;
    let channel = ChannelBuilder::default()
        .title(&site.title)
        .link(base_url)
        .description(&site.description)
        .language(site.language.clone())
        .copyright((!site.copyright.is_empty()).then(|| site.copyright.clone()))
        .generator(concat!("quire ", env!("CARGO_PKG_VERSION")).to_string())
        .items(items)
        .build();

    channel
        .validate()
        .map_err(|e| anyhow!("RSS validation failed: {e}"))?;
    Ok(Some(channel.to_string()))
}
