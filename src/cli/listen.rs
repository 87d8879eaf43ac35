//! `quire listen`: the page-side listener, run from a terminal.

use anyhow::{Context, Result};

use crate::config::SiteConfig;
use crate::log;
use crate::reload::client::{ListenEnd, listen};
use crate::reload::host::{CommandHost, LogHost};

/// Endpoint from `--url`, else the `[reload]` section.
pub fn endpoint(config: &SiteConfig, url: Option<&str>) -> String {
    url.map_or_else(|| config.reload.url(), str::to_owned)
}

pub fn run(config: &SiteConfig, url: Option<&str>, exec: Option<&str>) -> Result<()> {
    let url = endpoint(config, url);

    let end = match exec {
        Some(command) => listen(&url, CommandHost::new(command)),
        None => listen(&url, LogHost),
    }
    .with_context(|| format!("live reload listener on {url} failed"))?;

    match end {
        ListenEnd::Reloaded => log!("listen"; "done"),
        ListenEnd::ServerClosed => log!("listen"; "server closed the connection"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;
    use crate::reload::notifier::DEFAULT_ENDPOINT;

    #[test]
    fn test_endpoint() {
        let config = test_parse_config("");
        assert_eq!(endpoint(&config, None), DEFAULT_ENDPOINT);
        assert_eq!(endpoint(&config, Some("ws://h:1/x")), "ws://h:1/x");

        let config = test_parse_config("[reload]\nport = 6000\npath = \"/ws\"\n");
        assert_eq!(endpoint(&config, None), "ws://localhost:6000/ws");
    }

    #[test]
    fn test_unreachable_server_is_an_error() {
        // Bind then drop to get a port nothing listens on
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let config = test_parse_config("");
        let url = format!("ws://127.0.0.1:{port}/websocket");
        assert!(run(&config, Some(&url), None).is_err());
    }
}
