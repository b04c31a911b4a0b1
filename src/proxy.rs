use reqwest::Proxy;

/// Proxy assignment for a single account, resolved once at spawn time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProxyAssignment {
    None,
    Http(String),
    Socks(String),
}

impl ProxyAssignment {
    pub fn parse(raw: &str) -> Self {
        if raw.starts_with("http://") || raw.starts_with("https://") {
            Self::Http(raw.to_owned())
        } else if raw.starts_with("socks4://") || raw.starts_with("socks5://") {
            Self::Socks(raw.to_owned())
        } else {
            tracing::warn!("Unsupported proxy scheme: {raw}, connecting directly");
            Self::None
        }
    }

    pub fn url(&self) -> Option<&str> {
        match self {
            Self::None => None,
            Self::Http(url) | Self::Socks(url) => Some(url),
        }
    }

    pub fn to_reqwest(&self) -> Option<Proxy> {
        let url = self.url()?;

        match Proxy::all(url) {
            Ok(proxy) => Some(proxy),
            Err(err) => {
                tracing::warn!("Invalid proxy {url}: {err}, connecting directly");
                None
            }
        }
    }
}

/// Round-robin pairing of accounts to proxies: account `index` gets
/// `proxies[index % proxies.len()]`, or no proxy when the list is empty.
pub fn assign(proxies: &[String], index: usize) -> ProxyAssignment {
    if proxies.is_empty() {
        ProxyAssignment::None
    } else {
        ProxyAssignment::parse(&proxies[index % proxies.len()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_http_and_socks_schemes() {
        assert_eq!(
            ProxyAssignment::parse("http://10.0.0.1:8080"),
            ProxyAssignment::Http("http://10.0.0.1:8080".to_owned())
        );
        assert_eq!(
            ProxyAssignment::parse("https://10.0.0.1:8080"),
            ProxyAssignment::Http("https://10.0.0.1:8080".to_owned())
        );
        assert_eq!(
            ProxyAssignment::parse("socks4://10.0.0.1:1080"),
            ProxyAssignment::Socks("socks4://10.0.0.1:1080".to_owned())
        );
        assert_eq!(
            ProxyAssignment::parse("socks5://10.0.0.1:1080"),
            ProxyAssignment::Socks("socks5://10.0.0.1:1080".to_owned())
        );
    }

    #[test]
    fn unknown_scheme_degrades_to_direct() {
        assert_eq!(
            ProxyAssignment::parse("ftp://10.0.0.1:21"),
            ProxyAssignment::None
        );
        assert_eq!(ProxyAssignment::parse("10.0.0.1:8080"), ProxyAssignment::None);
    }

    #[test]
    fn round_robin_wraps_around_the_proxy_list() {
        let proxies: Vec<String> = ["http://a:1", "http://b:1", "http://c:1"]
            .iter()
            .map(|s| (*s).to_owned())
            .collect();

        for index in 0..10 {
            assert_eq!(
                assign(&proxies, index).url(),
                Some(proxies[index % proxies.len()].as_str())
            );
        }
    }

    #[test]
    fn empty_proxy_list_means_direct() {
        assert_eq!(assign(&[], 0), ProxyAssignment::None);
        assert_eq!(assign(&[], 7), ProxyAssignment::None);
    }

    #[test]
    fn accepted_assignments_build_reqwest_proxies() {
        assert!(ProxyAssignment::parse("http://10.0.0.1:8080")
            .to_reqwest()
            .is_some());
        assert!(ProxyAssignment::parse("socks5://10.0.0.1:1080")
            .to_reqwest()
            .is_some());
        assert!(ProxyAssignment::None.to_reqwest().is_none());
    }
}
