//! Byte-addressable non-volatile media.
//!
//! The lock stores its reference signature on a small EEPROM-like medium
//! addressed by byte. Erased cells read back as `0xFF`.

use std::fmt;
use std::path::{Path, PathBuf};

/// Value of an erased byte.
pub const ERASED_BYTE: u8 = 0xFF;

/// Default medium size in bytes (the size of a small on-board EEPROM).
pub const DEFAULT_MEDIUM_SIZE: usize = 1024;

/// A byte-addressable persistent medium.
pub trait PersistentMedium {
    /// Total addressable bytes.
    fn capacity(&self) -> usize;

    /// Write `bytes` starting at `addr`.
    fn write_bytes(&mut self, addr: usize, bytes: &[u8]) -> Result<(), MediumError>;

    /// Read `len` bytes starting at `addr`.
    fn read_bytes(&self, addr: usize, len: usize) -> Result<Vec<u8>, MediumError>;

    /// Reset every byte to the erased state.
    fn erase(&mut self) -> Result<(), MediumError> {
        let image = vec![ERASED_BYTE; self.capacity()];
        self.write_bytes(0, &image)
    }
}

fn check_bounds(addr: usize, len: usize, capacity: usize) -> Result<(), MediumError> {
    match addr.checked_add(len) {
        Some(end) if end <= capacity => Ok(()),
        _ => Err(MediumError::OutOfBounds {
            addr,
            len,
            capacity,
        }),
    }
}

/// An in-memory medium. Starts erased.
#[derive(Debug, Clone)]
pub struct MemoryMedium {
    image: Vec<u8>,
}

impl MemoryMedium {
    pub fn new(capacity: usize) -> Self {
        Self {
            image: vec![ERASED_BYTE; capacity],
        }
    }

    /// Raw view of the whole image.
    pub fn as_bytes(&self) -> &[u8] {
        &self.image
    }
}

impl Default for MemoryMedium {
    fn default() -> Self {
        Self::new(DEFAULT_MEDIUM_SIZE)
    }
}

impl PersistentMedium for MemoryMedium {
    fn capacity(&self) -> usize {
        self.image.len()
    }

    fn write_bytes(&mut self, addr: usize, bytes: &[u8]) -> Result<(), MediumError> {
        check_bounds(addr, bytes.len(), self.image.len())?;
        self.image[addr..addr + bytes.len()].copy_from_slice(bytes);
        Ok(())
    }

    fn read_bytes(&self, addr: usize, len: usize) -> Result<Vec<u8>, MediumError> {
        check_bounds(addr, len, self.image.len())?;
        Ok(self.image[addr..addr + len].to_vec())
    }
}

/// A medium backed by an image file on disk.
///
/// The whole image is held in memory and written back after every write, so
/// the file always reflects the last completed write.
#[derive(Debug)]
pub struct FileMedium {
    path: PathBuf,
    image: MemoryMedium,
}

impl FileMedium {
    /// Open an image file, creating an erased one if it does not exist.
    ///
    /// An existing file of a different size is padded with erased bytes or
    /// cut to `capacity`.
    pub fn open(path: impl Into<PathBuf>, capacity: usize) -> Result<Self, MediumError> {
        let path = path.into();
        let mut image = MemoryMedium::new(capacity);

        if path.exists() {
            let content = std::fs::read(&path).map_err(|e| MediumError::Io(e.to_string()))?;
            let n = content.len().min(capacity);
            image.image[..n].copy_from_slice(&content[..n]);
        }

        let medium = Self { path, image };
        medium.flush()?;
        Ok(medium)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sibling file each flush is written to before it replaces the image.
    fn staging_path(&self) -> PathBuf {
        let mut name = self.path.clone().into_os_string();
        name.push(".tmp");
        PathBuf::from(name)
    }

    /// Write the image to the staging file, then rename it over the image
    /// file. An interrupted flush leaves the previous image in place.
    fn flush(&self) -> Result<(), MediumError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| MediumError::Io(e.to_string()))?;
        }

        let staging = self.staging_path();
        std::fs::write(&staging, self.image.as_bytes())
            .map_err(|e| MediumError::Io(e.to_string()))?;
        std::fs::rename(&staging, &self.path).map_err(|e| MediumError::Io(e.to_string()))
    }
}

impl PersistentMedium for FileMedium {
    fn capacity(&self) -> usize {
        self.image.capacity()
    }

    fn write_bytes(&mut self, addr: usize, bytes: &[u8]) -> Result<(), MediumError> {
        self.image.write_bytes(addr, bytes)?;
        self.flush()
    }

    fn read_bytes(&self, addr: usize, len: usize) -> Result<Vec<u8>, MediumError> {
        self.image.read_bytes(addr, len)
    }
}

/// Medium access errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediumError {
    OutOfBounds {
        addr: usize,
        len: usize,
        capacity: usize,
    },
    Io(String),
}

impl fmt::Display for MediumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediumError::OutOfBounds {
                addr,
                len,
                capacity,
            } => write!(
                f,
                "Access of {len} bytes at {addr} exceeds medium capacity {capacity}"
            ),
            MediumError::Io(e) => write!(f, "IO error: {e}"),
        }
    }
}

impl std::error::Error for MediumError {}
