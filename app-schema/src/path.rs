use serde::{Serialize, Serializer};
use serde_json::Value;
use std::fmt;

/// Name of the root segment every rendered property path starts with.
pub const ROOT: &str = "instance";

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

/// Location of a value inside a definition.
///
/// Paths are stored as segments and only rendered on output, so joining a
/// nested error path onto its parent never has to strip `instance` prefixes
/// out of strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PropertyPath {
    segments: Vec<PathSegment>,
}

impl PropertyPath {
    #[must_use]
    pub fn root() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn key(&self, key: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Key(key.to_owned()));
        Self { segments }
    }

    #[must_use]
    pub fn index(&self, index: usize) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Index(index));
        Self { segments }
    }

    /// Appends `tail` (a path relative to some nested value) onto this path.
    #[must_use]
    pub fn join(&self, tail: &PropertyPath) -> Self {
        let mut segments = self.segments.clone();
        segments.extend(tail.segments.iter().cloned());
        Self { segments }
    }

    #[must_use]
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Full rendering, e.g. `instance.triggers.foo.operation.inputFields[1]`.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::from(ROOT);
        self.write_segments(&mut out);
        out
    }

    /// Rendering without the root segment, e.g.
    /// `triggers.foo.operation.inputFields[1]`. The root itself renders empty.
    #[must_use]
    pub fn relative(&self) -> String {
        let mut out = String::new();
        self.write_segments(&mut out);
        out.strip_prefix('.').map(str::to_owned).unwrap_or(out)
    }

    /// Looks the path up inside `root`.
    #[must_use]
    pub fn lookup<'v>(&self, root: &'v Value) -> Option<&'v Value> {
        self.segments
            .iter()
            .try_fold(root, |current, segment| match segment {
                PathSegment::Key(k) => current.as_object()?.get(k),
                PathSegment::Index(i) => current.as_array()?.get(*i),
            })
    }

    fn write_segments(&self, out: &mut String) {
        for segment in &self.segments {
            match segment {
                PathSegment::Key(k) if is_identifier(k) => {
                    out.push('.');
                    out.push_str(k);
                }
                PathSegment::Key(k) => {
                    out.push('[');
                    out.push_str(&Value::String(k.clone()).to_string());
                    out.push(']');
                }
                PathSegment::Index(i) => {
                    out.push('[');
                    out.push_str(&i.to_string());
                    out.push(']');
                }
            }
        }
    }
}

fn is_identifier(key: &str) -> bool {
    let mut chars = key.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

impl fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl Serialize for PropertyPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.render())
    }
}
