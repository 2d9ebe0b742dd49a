//! Header formats of the supported repository managers

use reqwest::header::{HeaderMap, ETAG};

const ARTIFACTORY_SHA1: &str = "x-checksum-sha1";

fn header<'a>(headers: &'a HeaderMap, name: impl reqwest::header::AsHeaderName) -> Option<&'a str> {
    headers.get(name)?.to_str().ok().map(str::trim)
}

/// `"{SHA1{<hex>}}"`
pub(crate) fn nexus(headers: &HeaderMap) -> Option<&str> {
    header(headers, ETAG)?
        .strip_prefix("\"{SHA1{")?
        .strip_suffix("}}\"")
        .filter(|hex| !hex.is_empty())
}

/// Verbatim `X-Checksum-Sha1`
pub(crate) fn artifactory(headers: &HeaderMap) -> Option<&str> {
    header(headers, ARTIFACTORY_SHA1).filter(|hex| !hex.is_empty())
}

/// `"<md5>:<timestamp>"`, keeping the part before the colon
pub(crate) fn akamai(headers: &HeaderMap) -> Option<&str> {
    let etag = header(headers, ETAG)?.strip_prefix('"')?;
    let (md5, _) = etag.split_once(':')?;
    Some(md5).filter(|hex| !hex.is_empty())
}

/// ETag with surrounding quotes removed
pub(crate) fn nginx(headers: &HeaderMap) -> Option<&str> {
    let etag = header(headers, ETAG)?;
    let etag = etag.strip_prefix("W/").unwrap_or(etag);
    Some(etag.trim_matches('"')).filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    fn etag(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ETAG, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn test_nexus() {
        assert_eq!(nexus(&etag("\"{SHA1{abc123}}\"")), Some("abc123"));
        assert_eq!(nexus(&etag("\"abc123\"")), None);
        assert_eq!(nexus(&etag("\"{SHA1{}}\"")), None);
        assert_eq!(nexus(&HeaderMap::new()), None);
    }

    #[test]
    fn test_artifactory() {
        let mut headers = HeaderMap::new();
        headers.insert(ARTIFACTORY_SHA1, HeaderValue::from_static("DEADBEEF"));
        assert_eq!(artifactory(&headers), Some("DEADBEEF"));
        assert_eq!(artifactory(&etag("\"x\"")), None);
    }

    #[test]
    fn test_akamai() {
        assert_eq!(
            akamai(&etag("\"d41d8cd98f00b204e9800998ecf8427e:1500000000\"")),
            Some("d41d8cd98f00b204e9800998ecf8427e")
        );
        assert_eq!(akamai(&etag("\"d41d8cd98f00b204e9800998ecf8427e\"")), None);
    }

    #[test]
    fn test_nginx() {
        assert_eq!(nginx(&etag("\"5f3c2a10-1a2b\"")), Some("5f3c2a10-1a2b"));
        assert_eq!(nginx(&etag("W/\"5f3c2a10-1a2b\"")), Some("5f3c2a10-1a2b"));
        assert_eq!(nginx(&etag("\"\"")), None);
    }
}
