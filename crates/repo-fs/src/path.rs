//! Normalized path handling for cross-platform compatibility

use std::path::{Path, PathBuf};

/// A path normalized to use forward slashes internally.
///
/// Provides consistent path handling across platforms by normalizing
/// all paths to forward slashes internally and converting to
/// platform-native format only at I/O boundaries.
///
/// Normalization is purely lexical: repeated separators collapse, `.`
/// segments are dropped and `..` pops the previous segment. A leading `..`
/// on a relative path is dropped, and `..` never climbs above the root of an
/// absolute path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NormalizedPath {
    /// Internal representation always uses forward slashes
    inner: String,
}

impl NormalizedPath {
    /// Create a new NormalizedPath from any path-like input.
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path_str = path.as_ref().to_string_lossy();
        Self {
            inner: clean(&path_str.replace('\\', "/")),
        }
    }

    /// Get the internal normalized string representation.
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Convert to a platform-native PathBuf for I/O operations.
    pub fn to_native(&self) -> PathBuf {
        PathBuf::from(&self.inner)
    }

    /// Join this path with a segment, resolving dot segments.
    pub fn join(&self, segment: &str) -> Self {
        let segment_normalized = segment.replace('\\', "/");
        Self {
            inner: clean(&format!("{}/{}", self.inner, segment_normalized)),
        }
    }

    /// Whether the path is rooted (`/…`, `//server/…` or `C:/…`).
    pub fn is_absolute(&self) -> bool {
        !self.root().is_empty() || has_drive_letter(&self.inner)
    }

    /// Iterate over the path's segments, excluding the root prefix.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.inner[self.root().len()..]
            .split('/')
            .filter(|s| !s.is_empty() && *s != ".")
    }

    /// Number of segments below the root.
    pub fn depth(&self) -> usize {
        self.segments().count()
    }

    /// Segment-wise prefix test.
    ///
    /// `/a/pkg/x` starts with `/a/pkg`, but `/a/pkg-2` does not.
    pub fn starts_with(&self, base: &NormalizedPath) -> bool {
        if self.root() != base.root() {
            return false;
        }
        let mut mine = self.segments();
        base.segments().all(|theirs| mine.next() == Some(theirs))
    }

    /// Strip `base` from the front of this path.
    ///
    /// Returns `None` when `base` is not a segment-wise prefix. Stripping a
    /// path from itself yields `.`.
    pub fn strip_prefix(&self, base: &NormalizedPath) -> Option<Self> {
        if !self.starts_with(base) {
            return None;
        }
        let rest: Vec<&str> = self.segments().skip(base.depth()).collect();
        Some(Self {
            inner: if rest.is_empty() {
                ".".to_string()
            } else {
                rest.join("/")
            },
        })
    }

    /// Get the parent directory.
    pub fn parent(&self) -> Option<Self> {
        let segments: Vec<&str> = self.segments().collect();
        let (_, init) = segments.split_last()?;
        let root = self.root();
        if init.is_empty() && root.is_empty() {
            return None;
        }
        Some(Self {
            inner: format!("{root}{}", init.join("/")),
        })
    }

    /// Get the file name component.
    pub fn file_name(&self) -> Option<&str> {
        self.segments().last()
    }

    /// Check if this path exists on the filesystem.
    pub fn exists(&self) -> bool {
        self.to_native().exists()
    }

    /// Check if this is a directory.
    pub fn is_dir(&self) -> bool {
        self.to_native().is_dir()
    }

    /// Check if this is a file.
    pub fn is_file(&self) -> bool {
        self.to_native().is_file()
    }

    fn root(&self) -> &str {
        root_prefix(&self.inner)
    }
}

fn root_prefix(path: &str) -> &str {
    if path.starts_with("//") && !path.starts_with("///") {
        "//"
    } else if path.starts_with('/') {
        "/"
    } else {
        ""
    }
}

fn has_drive_letter(path: &str) -> bool {
    let bytes = path.as_bytes();
    bytes.len() >= 2
        && bytes[0].is_ascii_alphabetic()
        && bytes[1] == b':'
        && (bytes.len() == 2 || bytes[2] == b'/')
}

/// Lexically normalize a forward-slash path.
fn clean(raw: &str) -> String {
    let prefix = root_prefix(raw);
    let rest = raw[prefix.len()..].trim_start_matches('/');

    let mut segments: Vec<&str> = Vec::new();
    for segment in rest.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                // Never pop a drive letter
                if segments.len() == 1 && prefix.is_empty() && has_drive_letter(segments[0]) {
                    continue;
                }
                segments.pop();
            }
            other => segments.push(other),
        }
    }

    let joined = segments.join("/");
    if prefix.is_empty() && joined.is_empty() {
        ".".to_string()
    } else {
        format!("{prefix}{joined}")
    }
}

impl AsRef<Path> for NormalizedPath {
    fn as_ref(&self) -> &Path {
        Path::new(&self.inner)
    }
}

impl std::fmt::Display for NormalizedPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl From<&str> for NormalizedPath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for NormalizedPath {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<PathBuf> for NormalizedPath {
    fn from(p: PathBuf) -> Self {
        Self::new(p)
    }
}

impl From<&Path> for NormalizedPath {
    fn from(p: &Path) -> Self {
        Self::new(p)
    }
}
