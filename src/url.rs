use crate::error::{Result, StreamError};

/// Transport family selected by a URL's scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    File,
    Sock,
    Http,
    Data,
}

/// Parsed URL carried by a [`crate::Stream`], built on the `url` crate the
/// way the teacher's `Opts::try_from(&str)` parses `mysql://...` URLs.
#[derive(Debug, Clone)]
pub struct UrlValue {
    raw: String,
    scheme: Scheme,
}

impl UrlValue {
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    /// Host portion, if the URL has one (file/data URLs generally don't).
    pub fn host(&self) -> Option<String> {
        url::Url::parse(&self.raw)
            .ok()
            .and_then(|u| u.host_str().map(ToString::to_string))
    }

    pub fn port(&self) -> Option<u16> {
        url::Url::parse(&self.raw).ok().and_then(|u| u.port())
    }

    /// Path portion (for `file://` and bare paths, the filesystem path).
    pub fn path(&self) -> String {
        match self.scheme {
            Scheme::File => strip_file_prefix(&self.raw).to_string(),
            _ => url::Url::parse(&self.raw)
                .map(|u| u.path().to_string())
                .unwrap_or_default(),
        }
    }
}

/// Scheme prefixes recognized by the URL dispatcher (C8). A string lacking
/// `://` is treated as `file://`, matching `tb_async_stream_init_from_url`.
pub fn parse_scheme(url: &str) -> Result<Scheme> {
    let lower_prefix = |n: usize| -> Option<String> {
        url.get(..n).map(str::to_ascii_lowercase)
    };

    if lower_prefix(8).as_deref() == Some("https://") {
        Ok(Scheme::Http)
    } else if lower_prefix(7).as_deref() == Some("http://") {
        Ok(Scheme::Http)
    } else if lower_prefix(8).as_deref() == Some("socks://") {
        Ok(Scheme::Sock)
    } else if lower_prefix(7).as_deref() == Some("sock://") {
        Ok(Scheme::Sock)
    } else if lower_prefix(7).as_deref() == Some("file://") {
        Ok(Scheme::File)
    } else if lower_prefix(7).as_deref() == Some("data://") {
        Ok(Scheme::Data)
    } else if !url.contains("://") {
        Ok(Scheme::File)
    } else {
        Err(StreamError::UnrecognizedScheme(url.to_string()))
    }
}

pub fn parse(url: &str) -> Result<UrlValue> {
    let scheme = parse_scheme(url)?;
    Ok(UrlValue {
        raw: url.to_string(),
        scheme,
    })
}

fn strip_file_prefix(url: &str) -> &str {
    url.strip_prefix("file://").unwrap_or(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_every_scheme_table_entry() {
        assert_eq!(parse_scheme("http://x/y").unwrap(), Scheme::Http);
        assert_eq!(parse_scheme("https://x/y").unwrap(), Scheme::Http);
        assert_eq!(parse_scheme("sock://x:1").unwrap(), Scheme::Sock);
        assert_eq!(parse_scheme("socks://x:1").unwrap(), Scheme::Sock);
        assert_eq!(parse_scheme("file:///tmp/a").unwrap(), Scheme::File);
        assert_eq!(parse_scheme("data://AABB").unwrap(), Scheme::Data);
        assert_eq!(parse_scheme("/tmp/a").unwrap(), Scheme::File);
        assert_eq!(parse_scheme("relative/path").unwrap(), Scheme::File);
    }

    #[test]
    fn unrecognized_scheme_fails() {
        assert!(matches!(
            parse_scheme("ftp://x/y"),
            Err(StreamError::UnrecognizedScheme(_))
        ));
    }

    #[test]
    fn dispatch_is_idempotent() {
        let a = parse("https://x/y").unwrap();
        let b = parse("https://x/y").unwrap();
        assert_eq!(a.raw(), b.raw());
        assert_eq!(a.scheme(), b.scheme());
    }

    #[test]
    fn file_path_strips_prefix() {
        let u = parse("file:///tmp/data.bin").unwrap();
        assert_eq!(u.path(), "/tmp/data.bin");
    }
}
