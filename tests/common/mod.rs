//! Shared fixtures: a mock origin plus mirrors on one HTTP server

use httpmock::prelude::*;
use httpmock::Method::HEAD;
use httpmock::Mock;
use mirrorcheck_events::{AppEvent, EventReceiver};
use mirrorcheck_hash::HashAlgorithm;
use mirrorcheck_net::{NetClient, NetConfig};
use mirrorcheck_types::RemoteMirror;
use std::time::Duration;

/// Origin and mirrors served under different path prefixes of one server
pub struct RepoFixture {
    pub server: MockServer,
}

#[allow(dead_code)]
impl RepoFixture {
    pub fn new() -> Self {
        Self {
            server: MockServer::start(),
        }
    }

    pub fn url(&self, path: &str) -> String {
        self.server.url(path)
    }

    pub fn mirror(&self, base: &str) -> RemoteMirror {
        RemoteMirror::parse(&self.url(base)).unwrap()
    }

    /// Base URL that passes the liveness probe
    pub fn live(&self, base: &str) -> Mock<'_> {
        let base = base.to_string();
        self.server.mock(|when, then| {
            when.method(HEAD).path(base);
            then.status(200);
        })
    }

    /// Base URL that fails the liveness probe
    pub fn forbidden(&self, base: &str) -> Mock<'_> {
        let base = base.to_string();
        self.server.mock(|when, then| {
            when.method(HEAD).path(base);
            then.status(403);
        })
    }

    /// Artifact answering HEAD with a Nexus `ETag` for `content`
    pub fn artifact(&self, path: &str, content: &[u8]) -> Mock<'_> {
        let path = path.to_string();
        let etag = format!(
            "\"{{SHA1{{{}}}}}\"",
            HashAlgorithm::Sha1.hash_data(content)
        );
        self.server.mock(|when, then| {
            when.method(HEAD).path(path);
            then.status(200).header("ETag", etag);
        })
    }

    pub fn missing(&self, path: &str) -> Mock<'_> {
        let path = path.to_string();
        self.server.mock(|when, then| {
            when.method(HEAD).path(path);
            then.status(404);
        })
    }

    /// Directory listing page at `path` linking to `entries` (directories end with `/`)
    pub fn listing(&self, path: &str, entries: &[&str]) -> Mock<'_> {
        let path = path.to_string();
        let body = listing_html(entries);
        self.server.mock(|when, then| {
            when.method(GET).path(path);
            then.status(200)
                .header("Content-Type", "text/html")
                .body(body);
        })
    }
}

/// Apache-style index page
pub fn listing_html(entries: &[&str]) -> String {
    let mut html = String::from(
        "<html><head><link rel=\"stylesheet\" href=\"/style.css\"></head><body><table>\n\
         <tr><td><a href=\"../\">Parent Directory</a></td></tr>\n",
    );
    for entry in entries {
        html.push_str(&format!(
            "<tr><td><a href=\"{entry}\">{entry}</a>&nbsp;</td><td>-</td></tr>\n"
        ));
    }
    html.push_str("</table></body></html>\n");
    html
}

/// Client without meaningful request spacing
pub fn fast_client() -> NetClient {
    NetClient::new(NetConfig {
        min_request_distance: Duration::from_millis(1),
        ..NetConfig::default()
    })
    .unwrap()
}

/// Drain every event emitted so far
pub fn drain(rx: &mut EventReceiver) -> Vec<AppEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}
