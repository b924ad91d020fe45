//! Paths within validated instances.
use std::{fmt, fmt::Write};

/// JSON Pointer into the validated instance, built from individual path
/// components during traversal.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct JSONPointer(Vec<PathChunk>);

impl JSONPointer {
    /// The pointer as a vector of strings; each component is cast to
    /// `String`. Consumes the pointer.
    pub fn into_vec(self) -> Vec<String> {
        self.0.into_iter().map(PathChunk::into_string).collect()
    }

    /// Whether the pointer addresses the instance root.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Components joined with `.`, the way error fields are reported.
    pub(crate) fn dotted(&self) -> String {
        let mut result = String::new();
        for chunk in &self.0 {
            if !result.is_empty() {
                result.push('.');
            }
            match chunk {
                PathChunk::Name(name) => result.push_str(name),
                PathChunk::Index(index) => result.push_str(&index.to_string()),
            }
        }
        result
    }
}

impl fmt::Display for JSONPointer {
    fn fmt(&self, mut f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for chunk in &self.0 {
            f.write_char('/')?;
            match chunk {
                PathChunk::Name(name) => {
                    f.write_str(&name.replace('~', "~0").replace('/', "~1"))?
                }
                PathChunk::Index(index) => itoa::fmt(&mut f, *index)?,
            }
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum PathChunk {
    Name(String),
    Index(usize),
}

impl PathChunk {
    fn into_string(self) -> String {
        match self {
            PathChunk::Name(name) => name,
            PathChunk::Index(index) => index.to_string(),
        }
    }
}

impl From<String> for PathChunk {
    #[inline]
    fn from(value: String) -> Self {
        PathChunk::Name(value)
    }
}
impl From<usize> for PathChunk {
    #[inline]
    fn from(value: usize) -> Self {
        PathChunk::Index(value)
    }
}

/// Parent-linked path under construction. Pushing borrows the parent, so a
/// traversal never clones path prefixes; a `JSONPointer` is materialized
/// only when an error is recorded.
#[derive(Debug)]
pub(crate) struct InstancePath<'a> {
    chunk: Option<PathChunk>,
    parent: Option<&'a InstancePath<'a>>,
}

impl<'a> InstancePath<'a> {
    pub(crate) const fn new() -> Self {
        InstancePath {
            chunk: None,
            parent: None,
        }
    }

    pub(crate) fn push(&'a self, chunk: impl Into<PathChunk>) -> Self {
        InstancePath {
            chunk: Some(chunk.into()),
            parent: Some(self),
        }
    }

    fn to_vec(&'a self) -> Vec<PathChunk> {
        let mut result = Vec::with_capacity(6);
        let mut current = self;
        if let Some(chunk) = &current.chunk {
            result.push(chunk.clone())
        }
        while let Some(next) = current.parent {
            current = next;
            if let Some(chunk) = &current.chunk {
                result.push(chunk.clone())
            }
        }
        result.reverse();
        result
    }
}

impl<'a> From<&'a InstancePath<'a>> for JSONPointer {
    #[inline]
    fn from(path: &'a InstancePath<'a>) -> Self {
        JSONPointer(path.to_vec())
    }
}

impl From<&[&str]> for JSONPointer {
    #[inline]
    fn from(path: &[&str]) -> Self {
        JSONPointer(
            path.iter()
                .map(|item| PathChunk::Name((*item).to_string()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{InstancePath, JSONPointer};

    #[test]
    fn empty_pointer() {
        let path = InstancePath::new();
        let pointer = JSONPointer::from(&path);
        assert!(pointer.is_empty());
        assert_eq!(pointer.to_string(), "");
        assert_eq!(pointer.dotted(), "");
    }

    #[test]
    fn nested_pointer() {
        let path = InstancePath::new();
        let first = path.push("next".to_string());
        let second = first.push(3_usize);
        let pointer = JSONPointer::from(&second);
        assert_eq!(pointer.to_string(), "/next/3");
        assert_eq!(pointer.dotted(), "next.3");
        assert_eq!(pointer.into_vec(), vec!["next".to_string(), "3".to_string()]);
    }

    #[test]
    fn escaped_components() {
        let path = InstancePath::new();
        let child = path.push("a/b~c".to_string());
        assert_eq!(JSONPointer::from(&child).to_string(), "/a~1b~0c");
    }
}
