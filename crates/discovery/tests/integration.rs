//! Integration tests for online repository discovery

#[cfg(test)]
mod tests {
    use httpmock::prelude::*;
    use mirrorcheck_discovery::*;
    use mirrorcheck_events::{channel, AppEvent, DiscoveryEvent};
    use mirrorcheck_net::NetClient;
    use std::collections::BTreeSet;
    use tempfile::TempDir;

    fn listing(entries: &[&str]) -> String {
        let mut rows = String::from(
            r#"<tr><td><a href="../">Parent Directory</a></td><td>&nbsp;</td></tr>"#,
        );
        for entry in entries {
            rows.push_str(&format!(
                r#"<tr><td><a href="{entry}">{entry}</a></td><td>&nbsp;</td></tr>"#
            ));
        }
        format!("<html><head><link rel=\"stylesheet\" href=\"/s.css\"></head><body><table>{rows}</table></body></html>")
    }

    fn serve(server: &MockServer, path: &'static str, entries: &[&str]) {
        let body = listing(entries);
        server.mock(|when, then| {
            when.method(GET).path(path);
            then.status(200).header("content-type", "text/html").body(body);
        });
    }

    fn manifest_lines(path: &std::path::Path) -> Vec<String> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(ToString::to_string)
            .collect()
    }

    #[tokio::test]
    async fn test_two_level_listing() {
        let server = MockServer::start();
        serve(&server, "/ga/", &["subdir/"]);
        serve(&server, "/ga/subdir/", &["a.jar", "b.jar"]);

        let temp = TempDir::new().unwrap();
        let manifest = temp.path().join(DEFAULT_MANIFEST);
        let discovery = OnlineRepositoryDiscovery::new(
            NetClient::with_defaults().unwrap(),
            &server.url("/ga"),
            &manifest,
        )
        .unwrap();

        let report = discovery.discover().await.unwrap();
        assert_eq!(report.artifacts, 2);
        assert_eq!(report.listings, 2);

        let found: BTreeSet<_> = manifest_lines(&manifest).into_iter().collect();
        let expected: BTreeSet<_> = [
            server.url("/ga/subdir/a.jar"),
            server.url("/ga/subdir/b.jar"),
        ]
        .into_iter()
        .collect();
        assert_eq!(found, expected);
        assert_eq!(manifest_lines(&manifest).len(), 2);
    }

    #[tokio::test]
    async fn test_depth_limit_skips_deeper_directories() {
        let server = MockServer::start();
        serve(&server, "/ga/", &["top.pom", "org/"]);
        let nested = server.mock(|when, then| {
            when.method(GET).path("/ga/org/");
            then.status(200).body(listing(&["deep.jar"]));
        });

        let temp = TempDir::new().unwrap();
        let manifest = temp.path().join("entities.txt");
        let (tx, mut rx) = channel();
        let report = OnlineRepositoryDiscovery::new(
            NetClient::with_defaults().unwrap(),
            &server.url("/ga/"),
            &manifest,
        )
        .unwrap()
        .with_max_depth(Some(0))
        .with_event_sender(tx)
        .discover()
        .await
        .unwrap();

        assert_eq!(report.artifacts, 1);
        nested.assert_hits(0);
        assert_eq!(manifest_lines(&manifest), vec![server.url("/ga/top.pom")]);

        let mut found_events = 0;
        while let Ok(event) = rx.try_recv() {
            if matches!(event, AppEvent::Discovery(DiscoveryEvent::ArtifactFound { .. })) {
                found_events += 1;
            }
        }
        assert_eq!(found_events, 1);
    }

    #[tokio::test]
    async fn test_failed_sub_listing_is_skipped() {
        let server = MockServer::start();
        serve(&server, "/ga/", &["broken/", "ok/"]);
        server.mock(|when, then| {
            when.method(GET).path("/ga/broken/");
            then.status(500);
        });
        serve(&server, "/ga/ok/", &["c.war"]);

        let temp = TempDir::new().unwrap();
        let manifest = temp.path().join("entities.txt");
        let report = OnlineRepositoryDiscovery::new(
            NetClient::with_defaults().unwrap(),
            &server.url("/ga/"),
            &manifest,
        )
        .unwrap()
        .discover()
        .await
        .unwrap();

        assert_eq!(report.failed_listings, 1);
        assert_eq!(manifest_lines(&manifest), vec![server.url("/ga/ok/c.war")]);
    }

    #[tokio::test]
    async fn test_unreachable_root_fails() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/ga/");
            then.status(404);
        });

        let temp = TempDir::new().unwrap();
        let result = OnlineRepositoryDiscovery::new(
            NetClient::with_defaults().unwrap(),
            &server.url("/ga/"),
            temp.path().join("entities.txt"),
        )
        .unwrap()
        .discover()
        .await;

        assert!(result.is_err());
    }
}
