use std::fmt;
use std::path::{Component, Path, PathBuf};

use serde::{Serialize, Serializer};

use crate::domain::error::DomainError;

/// A filesystem path guaranteed to stay **inside** the directory it is
/// resolved against.
///
/// Artifact paths and subproject output directories are both expressed with
/// this type, so a component can never write outside its project and a
/// subproject can never climb out of its parent.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RelativePath(PathBuf);

impl RelativePath {
    /// The directory itself (`.`).
    pub fn current() -> Self {
        Self(PathBuf::new())
    }

    /// Validate and normalise a relative path.
    ///
    /// `.` segments are dropped; absolute paths and `..` segments are rejected.
    pub fn try_new(path: impl AsRef<Path>) -> Result<Self, DomainError> {
        let path = path.as_ref();
        let mut normalised = PathBuf::new();

        for component in path.components() {
            match component {
                Component::Normal(segment) => normalised.push(segment),
                Component::CurDir => {}
                Component::ParentDir => {
                    return Err(DomainError::PathEscapesProject {
                        path: path.display().to_string(),
                    });
                }
                Component::RootDir | Component::Prefix(_) => {
                    return Err(DomainError::AbsolutePathNotAllowed {
                        path: path.display().to_string(),
                    });
                }
            }
        }

        Ok(Self(normalised))
    }

    /// Join another relative path onto this one.
    pub fn join(&self, other: &RelativePath) -> Self {
        Self(self.0.join(&other.0))
    }

    pub fn is_current(&self) -> bool {
        self.0.as_os_str().is_empty()
    }

    pub fn as_path(&self) -> &Path {
        &self.0
    }
}

impl AsRef<Path> for RelativePath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl fmt::Display for RelativePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_current() {
            f.write_str(".")
        } else {
            write!(f, "{}", self.0.display())
        }
    }
}

impl Serialize for RelativePath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_nested_relative_paths() {
        let p = RelativePath::try_new("packages/cluster").unwrap();
        assert_eq!(p.as_path(), Path::new("packages/cluster"));
    }

    #[test]
    fn drops_current_dir_segments() {
        let p = RelativePath::try_new("./.vscode/./settings.json").unwrap();
        assert_eq!(p.as_path(), Path::new(".vscode/settings.json"));
        assert!(RelativePath::try_new(".").unwrap().is_current());
    }

    #[test]
    fn rejects_absolute() {
        assert!(matches!(
            RelativePath::try_new("/etc/passwd"),
            Err(DomainError::AbsolutePathNotAllowed { .. })
        ));
    }

    #[test]
    fn rejects_parent_segments() {
        assert!(matches!(
            RelativePath::try_new("packages/../../outside"),
            Err(DomainError::PathEscapesProject { .. })
        ));
    }

    #[test]
    fn join_and_display() {
        let base = RelativePath::try_new("packages").unwrap();
        let joined = base.join(&RelativePath::try_new("api").unwrap());
        assert_eq!(joined.to_string(), "packages/api");
        assert_eq!(RelativePath::current().to_string(), ".");
    }
}
