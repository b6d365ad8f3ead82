//! Resource descriptors with lazily-read byte sources.

use std::io;
use std::path::PathBuf;

/// Whether a resource is visible to downstream loads.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ResourceVisibility {
    /// Extractable by downstream loads (neutral reference artifacts).
    Public,
    /// Internal to the unit's own payload.
    Private,
}

/// Where a resource's bytes come from.
///
/// File-backed sources are not materialized until [`read`](Self::read) is
/// called, so assembling a payload never touches files the consumer doesn't
/// ask for.
#[derive(Clone, Debug)]
pub enum ResourceSource {
    /// Bytes already in memory.
    Inline(Vec<u8>),
    /// Bytes read from a file on demand.
    File(PathBuf),
}

impl ResourceSource {
    /// Produces the resource bytes, reading the backing file if necessary.
    pub fn read(&self) -> io::Result<Vec<u8>> {
        match self {
            ResourceSource::Inline(bytes) => Ok(bytes.clone()),
            ResourceSource::File(path) => std::fs::read(path),
        }
    }
}

/// A named resource attached to a unit's payload.
#[derive(Clone, Debug)]
pub struct ResourceDescriptor {
    /// The logical resource name, unique within one payload.
    pub name: String,
    /// The byte-producing source.
    pub source: ResourceSource,
    /// Visibility to downstream loads.
    pub visibility: ResourceVisibility,
}

impl ResourceDescriptor {
    /// Creates a private resource over in-memory bytes.
    pub fn inline(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            source: ResourceSource::Inline(bytes),
            visibility: ResourceVisibility::Private,
        }
    }

    /// Creates a private resource backed by a file, read lazily.
    pub fn file(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            source: ResourceSource::File(path.into()),
            visibility: ResourceVisibility::Private,
        }
    }

    /// Marks this resource publicly visible.
    pub fn public(mut self) -> Self {
        self.visibility = ResourceVisibility::Public;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inline_source_reads_bytes() {
        let descriptor = ResourceDescriptor::inline("demo.strings", vec![1, 2, 3]);
        assert_eq!(descriptor.source.read().unwrap(), vec![1, 2, 3]);
        assert_eq!(descriptor.visibility, ResourceVisibility::Private);
    }

    #[test]
    fn file_source_is_lazy() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("late.bin");

        // Descriptor exists before the file does; only read() touches disk
        let descriptor = ResourceDescriptor::file("demo.late", &path);
        assert!(descriptor.source.read().is_err());

        std::fs::write(&path, b"now present").unwrap();
        assert_eq!(descriptor.source.read().unwrap(), b"now present");
    }

    #[test]
    fn public_marker() {
        let descriptor = ResourceDescriptor::inline("Lib.kbin", Vec::new()).public();
        assert_eq!(descriptor.visibility, ResourceVisibility::Public);
    }
}
