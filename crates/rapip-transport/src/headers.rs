use crate::{Error, Result};
use http::header::{CONTENT_LENGTH, HeaderMap, HeaderName, HeaderValue};
use rapip_core::{Millis, parse_overhead};
use std::collections::BTreeMap;

pub const DEFAULT_PRESENCE_HEADER: &str = "x-rapip-proxy";
pub const DEFAULT_OVERHEAD_HEADER: &str = "x-rapip-proxy-overhead";

/// Headers attached to an outgoing request.
///
/// Kept sorted by name so they are always applied in the same order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestHeaders {
    entries: BTreeMap<String, String>,
}

impl RequestHeaders {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(name.into(), value.into());
    }

    /// Parse `Name: value` lines as given on a command line
    pub fn from_lines<I, S>(lines: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut headers = Self::new();
        for line in lines {
            let line = line.as_ref();
            let (name, value) = line
                .split_once(':')
                .ok_or_else(|| Error::InvalidHeader(line.to_string()))?;
            let name = name.trim();
            if name.is_empty() {
                return Err(Error::InvalidHeader(line.to_string()));
            }
            headers.insert(name, value.trim());
        }
        Ok(headers)
    }

    /// Validate every header and build the map sent on the wire.
    ///
    /// Names differing only in case are separate entries here and are all
    /// sent as values of the same header.
    pub fn to_header_map(&self) -> Result<HeaderMap> {
        let mut map = HeaderMap::with_capacity(self.entries.len());
        for (name, value) in &self.entries {
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| Error::InvalidHeader(name.clone()))?;
            let header_value = HeaderValue::from_str(value)
                .map_err(|_| Error::InvalidHeader(format!("{}: {}", name, value)))?;
            map.append(header_name, header_value);
        }
        Ok(map)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RequestHeaders {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut headers = Self::new();
        for (name, value) in iter {
            headers.insert(name, value);
        }
        headers
    }
}

/// Response headers an intermediary proxy uses to report itself
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyHeaders {
    presence: HeaderName,
    overhead: HeaderName,
}

impl ProxyHeaders {
    /// Header names are matched case-insensitively
    pub fn new(presence: &str, overhead: &str) -> Result<Self> {
        let presence = HeaderName::from_bytes(presence.as_bytes())
            .map_err(|_| Error::InvalidHeader(presence.to_string()))?;
        let overhead = HeaderName::from_bytes(overhead.as_bytes())
            .map_err(|_| Error::InvalidHeader(overhead.to_string()))?;
        Ok(Self { presence, overhead })
    }

    /// Proxy overhead reported by the response.
    ///
    /// `None` unless both the presence and the overhead header are set.
    pub fn extract(&self, headers: &HeaderMap) -> Result<Option<Millis>> {
        if !headers.contains_key(&self.presence) {
            return Ok(None);
        }
        let Some(value) = headers.get(&self.overhead) else {
            tracing::debug!(
                "Proxy presence header {} set without {}",
                self.presence,
                self.overhead
            );
            return Ok(None);
        };

        let raw = value.to_str().map_err(|_| {
            rapip_core::Error::InvalidOverhead(String::from_utf8_lossy(value.as_bytes()).into())
        })?;

        Ok(Some(parse_overhead(raw)?))
    }
}

impl Default for ProxyHeaders {
    fn default() -> Self {
        Self {
            presence: HeaderName::from_static(DEFAULT_PRESENCE_HEADER),
            overhead: HeaderName::from_static(DEFAULT_OVERHEAD_HEADER),
        }
    }
}

/// Declared body size in bytes, if the response carried a valid Content-Length
pub(crate) fn content_length(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(CONTENT_LENGTH)?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()
}
