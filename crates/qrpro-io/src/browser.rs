use anyhow::{Context, bail};

/// Results that look like web links can be handed to the browser
pub fn is_openable(data: &str) -> bool {
    data.starts_with("http://") || data.starts_with("https://")
}

pub fn open_url(url: &str) -> anyhow::Result<()> {
    if !is_openable(url) {
        bail!("Not a web link: {url}");
    }
    open::that(url).with_context(|| format!("Failed to open {url}"))?;
    tracing::info!("Opened {url}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_http_links_are_openable() {
        assert!(is_openable("https://example.com"));
        assert!(is_openable("http://example.com/a?b=c"));
        assert!(!is_openable("HTTPS://example.com"));
        assert!(!is_openable("mailto:a@b.c"));
        assert!(!is_openable("WIFI:T:WPA;S:Home;P:pw123;;"));
    }

    #[test]
    fn non_links_are_never_launched() {
        assert!(open_url("ftp://example.com").is_err());
    }
}
