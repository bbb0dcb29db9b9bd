//! Resource extraction from request paths.

/// Strip a literal base-path prefix. Returns `None` when `path` does not start
/// with `base_path`. The comparison is a plain string prefix, not path-aware.
pub fn strip_base_path<'a>(path: &'a str, base_path: Option<&str>) -> Option<&'a str> {
    match base_path {
        Some(base) => path.strip_prefix(base),
        None => Some(path),
    }
}

/// Logical resource and shape of a request path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedPath {
    resource: Option<String>,
    is_collection: bool,
}

impl ParsedPath {
    /// `/Users` and `/Users/` are collections, `/Users/abc` is a singleton.
    pub fn parse(path: &str, base_path: Option<&str>) -> Self {
        let Some(relative) = strip_base_path(path, base_path) else {
            return Self::unmatched();
        };

        let mut segments = relative.split('/').filter(|s| !s.is_empty());
        let Some(first) = segments.next() else {
            return Self::unmatched();
        };

        ParsedPath {
            resource: Some(format!("/{first}")),
            is_collection: segments.next().is_none(),
        }
    }

    fn unmatched() -> Self {
        ParsedPath {
            resource: None,
            is_collection: true,
        }
    }

    /// The resource with its leading slash, e.g. `/Users`.
    pub fn resource(&self) -> Option<&str> {
        self.resource.as_deref()
    }

    pub fn is_collection(&self) -> bool {
        self.is_collection
    }
}
