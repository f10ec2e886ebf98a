use std::fmt;

use super::error::DeepLinkError;

/// A parsed `scheme://host/segment/...?key=value` link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeepLink {
    raw: String,
    scheme: String,
    host: String,
    segments: Vec<String>,
    query: Vec<(String, String)>,
}

impl DeepLink {
    pub fn parse(url: &str) -> Result<Self, DeepLinkError> {
        let raw = url.trim();
        let malformed = |reason: &str| DeepLinkError::Malformed {
            url: url.to_string(),
            reason: reason.to_string(),
        };

        if raw.is_empty() {
            return Err(malformed("empty link"));
        }
        if raw.chars().any(char::is_whitespace) {
            return Err(malformed("link contains whitespace"));
        }

        let (scheme, rest) = raw
            .split_once("://")
            .ok_or_else(|| malformed("missing '://' after scheme"))?;
        if !is_valid_scheme(scheme) {
            return Err(malformed("invalid scheme"));
        }

        // Fragments never affect routing.
        let rest = rest.split_once('#').map_or(rest, |(before, _)| before);
        let (location, query) = rest.split_once('?').unwrap_or((rest, ""));
        let (host, path) = location.split_once('/').unwrap_or((location, ""));

        let segments = path
            .split('/')
            .filter(|segment| !segment.is_empty())
            .map(|segment| percent_decode(segment, false))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|reason| malformed(reason))?;

        let query = query
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| -> Result<(String, String), &'static str> {
                let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
                Ok((percent_decode(key, true)?, percent_decode(value, true)?))
            })
            .collect::<Result<Vec<_>, _>>()
            .map_err(|reason| malformed(reason))?;

        Ok(Self {
            raw: raw.to_string(),
            scheme: scheme.to_ascii_lowercase(),
            host: percent_decode(host, false).map_err(|reason| malformed(reason))?,
            segments,
            query,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Lower-cased scheme.
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// First value for `key` in the query string.
    pub fn query(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Host followed by the path segments.
    ///
    /// Custom-scheme links put the first route component in the host slot
    /// (`app://events/42`), so routers match on this instead of the path.
    pub fn route(&self) -> Vec<&str> {
        std::iter::once(self.host.as_str())
            .filter(|host| !host.is_empty())
            .chain(self.segments.iter().map(String::as_str))
            .collect()
    }
}

impl fmt::Display for DeepLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

fn is_valid_scheme(scheme: &str) -> bool {
    let mut chars = scheme.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

fn percent_decode(input: &str, plus_as_space: bool) -> Result<String, &'static str> {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'%' => {
                let hi = bytes.get(i + 1).and_then(|b| hex_value(*b));
                let lo = bytes.get(i + 2).and_then(|b| hex_value(*b));
                match (hi, lo) {
                    (Some(hi), Some(lo)) => out.push(hi << 4 | lo),
                    _ => return Err("invalid percent escape"),
                }
                i += 3;
            }
            b'+' if plus_as_space => {
                out.push(b' ');
                i += 1;
            }
            byte => {
                out.push(byte);
                i += 1;
            }
        }
    }

    String::from_utf8(out).map_err(|_| "percent escapes are not valid UTF-8")
}

fn hex_value(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}
