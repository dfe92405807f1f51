use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error, Eq, PartialEq)]
pub enum PathError {
    #[error("Path is empty")]
    Empty,

    #[error("Path contains forbidden characters")]
    Malformed,

    #[error("Path escapes the content root")]
    Escape,
}

/// A store-relative media path after lexical normalization.
///
/// `.` and empty segments are dropped, `..` removes the previous segment and a
/// leading `/` is relative to the store root. A `..` with nothing left to
/// remove is an escape and is rejected.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct LogicalPath(String);

impl LogicalPath {
    pub fn parse(raw: &str) -> Result<Self, PathError> {
        if raw.contains(['\0', '\\']) {
            return Err(PathError::Malformed);
        }

        let mut segments: Vec<&str> = Vec::new();
        for segment in raw.split('/') {
            match segment {
                "" | "." => {}
                ".." => {
                    if segments.pop().is_none() {
                        return Err(PathError::Escape);
                    }
                }
                segment => segments.push(segment),
            }
        }

        if segments.is_empty() {
            return Err(PathError::Empty);
        }

        Ok(Self(segments.join("/")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Relative filesystem path; every component is a normal one
    pub fn to_relative(&self) -> PathBuf {
        self.0.split('/').collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Component;

    #[test]
    fn test_parse_normalizes() {
        let cases = [
            ("courseA/lesson1.mp4", "courseA/lesson1.mp4"),
            ("/courseA/lesson1.mp4", "courseA/lesson1.mp4"),
            ("courseA//./lesson1.mp4", "courseA/lesson1.mp4"),
            ("courseA/drafts/../lesson1.mp4", "courseA/lesson1.mp4"),
            ("./lesson1.mp4/", "lesson1.mp4"),
        ];

        for (raw, expected) in cases {
            assert_eq!(LogicalPath::parse(raw).unwrap().as_str(), expected, "{raw}");
        }
    }

    #[test]
    fn test_parse_rejects_traversal() {
        for raw in [
            "../../etc/passwd",
            "..",
            "courseA/../../secret.mp4",
            "/../etc/passwd",
            "a/b/../../../c",
        ] {
            assert_eq!(LogicalPath::parse(raw), Err(PathError::Escape), "{raw}");
        }
    }

    #[test]
    fn test_parse_rejects_empty_and_malformed() {
        assert_eq!(LogicalPath::parse(""), Err(PathError::Empty));
        assert_eq!(LogicalPath::parse("/"), Err(PathError::Empty));
        assert_eq!(LogicalPath::parse("a/.."), Err(PathError::Empty));
        assert_eq!(
            LogicalPath::parse("a\\..\\..\\b"),
            Err(PathError::Malformed)
        );
        assert_eq!(LogicalPath::parse("a\0.mp4"), Err(PathError::Malformed));
    }

    #[test]
    fn test_relative_path_has_only_normal_components() {
        let path = LogicalPath::parse("/x/./y/../z.mp4").unwrap().to_relative();
        assert_eq!(path, PathBuf::from("x/z.mp4"));
        assert!(path.components().all(|c| matches!(c, Component::Normal(_))));
    }
}
