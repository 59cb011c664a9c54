//! Persistence of the single reference signature.
//!
//! Layout at `base_addr`, no header or checksum:
//!
//! ```text
//! +-----------------+----------------+-----+--------------------+
//! | len: i32 (LE)   | v[0]: f32 (LE) | ... | v[len-1]: f32 (LE) |
//! +-----------------+----------------+-----+--------------------+
//! ```
//!
//! The stored length is untrusted on load. Anything outside `0..=MAX_SIZE`,
//! including the all-`0xFF` erased pattern, means there is no reference.

use crate::core::signature::{Signature, MAX_SIZE};
use crate::storage::medium::{MediumError, PersistentMedium, ERASED_BYTE};
use std::fmt;

/// Width of the length field in bytes.
pub const LENGTH_FIELD_SIZE: usize = std::mem::size_of::<i32>();

/// Width of one stored value in bytes.
pub const VALUE_SIZE: usize = std::mem::size_of::<f32>();

/// Default base address of the reference signature.
pub const DEFAULT_BASE_ADDR: usize = 0;

/// Bytes needed to store a signature of `len` samples.
pub const fn encoded_len(len: usize) -> usize {
    LENGTH_FIELD_SIZE + len * VALUE_SIZE
}

/// Reads and writes the reference signature on a medium.
#[derive(Debug)]
pub struct SignatureStore<M> {
    medium: M,
    base_addr: usize,
}

impl<M: PersistentMedium> SignatureStore<M> {
    /// Create a store at `base_addr`.
    ///
    /// Fails if a full-size signature would not fit on the medium.
    pub fn new(medium: M, base_addr: usize) -> Result<Self, StoreError> {
        let capacity = medium.capacity();
        let fits = base_addr
            .checked_add(encoded_len(MAX_SIZE))
            .is_some_and(|end| end <= capacity);
        if !fits {
            return Err(StoreError::Layout {
                base_addr,
                capacity,
            });
        }

        Ok(Self { medium, base_addr })
    }

    /// Persist `signature`, overwriting the previous reference.
    pub fn save(&mut self, signature: &Signature) -> Result<(), StoreError> {
        let mut bytes = Vec::with_capacity(encoded_len(signature.len()));
        bytes.extend_from_slice(&(signature.len() as i32).to_le_bytes());
        for value in signature {
            bytes.extend_from_slice(&value.to_le_bytes());
        }

        self.medium.write_bytes(self.base_addr, &bytes)?;
        tracing::debug!(len = signature.len(), addr = self.base_addr, "Saved reference signature");
        Ok(())
    }

    /// Load the reference signature.
    pub fn load(&self) -> Result<Signature, StoreError> {
        let header = self.medium.read_bytes(self.base_addr, LENGTH_FIELD_SIZE)?;
        let stored_len = i32::from_le_bytes([header[0], header[1], header[2], header[3]]);

        let len = match usize::try_from(stored_len) {
            Ok(len) if len <= MAX_SIZE => len,
            _ => return Err(StoreError::NoReference { stored_len }),
        };

        let bytes = self
            .medium
            .read_bytes(self.base_addr + LENGTH_FIELD_SIZE, len * VALUE_SIZE)?;

        let values: Vec<f32> = bytes
            .chunks_exact(VALUE_SIZE)
            .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect();

        Signature::from_slice(&values).map_err(|_| StoreError::NoReference { stored_len })
    }

    /// Invalidate the stored reference by erasing its length field.
    pub fn erase(&mut self) -> Result<(), StoreError> {
        self.medium
            .write_bytes(self.base_addr, &[ERASED_BYTE; LENGTH_FIELD_SIZE])?;
        Ok(())
    }

    pub fn base_addr(&self) -> usize {
        self.base_addr
    }

    pub fn medium(&self) -> &M {
        &self.medium
    }

    pub fn medium_mut(&mut self) -> &mut M {
        &mut self.medium
    }
}

/// Signature store errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The medium could not be accessed
    Medium(MediumError),
    /// The stored length is out of range; no usable reference exists
    NoReference { stored_len: i32 },
    /// A full-size signature does not fit at the base address
    Layout { base_addr: usize, capacity: usize },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Medium(e) => write!(f, "Medium error: {e}"),
            StoreError::NoReference { stored_len } => {
                write!(f, "No reference signature (stored length {stored_len})")
            }
            StoreError::Layout {
                base_addr,
                capacity,
            } => write!(
                f,
                "A {MAX_SIZE}-sample signature at address {base_addr} does not fit in {capacity} bytes"
            ),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Medium(e) => Some(e),
            _ => None,
        }
    }
}

impl From<MediumError> for StoreError {
    fn from(e: MediumError) -> Self {
        StoreError::Medium(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::medium::MemoryMedium;

    fn store() -> SignatureStore<MemoryMedium> {
        SignatureStore::new(MemoryMedium::default(), DEFAULT_BASE_ADDR).unwrap()
    }

    #[test]
    fn test_round_trip() {
        let mut store = store();
        let signature = Signature::from_slice(&[0.98, 1.02, 1.5, 2.25, 0.0]).unwrap();

        store.save(&signature).unwrap();
        assert_eq!(store.load().unwrap(), signature);
    }

    #[test]
    fn test_round_trip_empty_and_full() {
        let mut store = store();

        store.save(&Signature::new()).unwrap();
        assert!(store.load().unwrap().is_empty());

        let full: Vec<f32> = (0..MAX_SIZE).map(|i| i as f32 * 0.1).collect();
        let full = Signature::from_slice(&full).unwrap();
        store.save(&full).unwrap();
        assert_eq!(store.load().unwrap(), full);
    }

    #[test]
    fn test_byte_layout() {
        let mut store = SignatureStore::new(MemoryMedium::new(512), 16).unwrap();
        store.save(&Signature::from_slice(&[1.0]).unwrap()).unwrap();

        let bytes = store.medium().read_bytes(16, encoded_len(1)).unwrap();
        assert_eq!(&bytes[..4], &1i32.to_le_bytes());
        assert_eq!(&bytes[4..], &1.0f32.to_le_bytes());
        // Nothing written before the base address.
        assert_eq!(store.medium().read_bytes(0, 16).unwrap(), vec![ERASED_BYTE; 16]);
    }

    #[test]
    fn test_save_overwrites() {
        let mut store = store();
        store.save(&Signature::from_slice(&[1.0; 10]).unwrap()).unwrap();
        store.save(&Signature::from_slice(&[2.0; 3]).unwrap()).unwrap();

        assert_eq!(store.load().unwrap().as_slice(), &[2.0; 3]);
    }

    #[test]
    fn test_erased_medium_has_no_reference() {
        let store = store();
        assert_eq!(
            store.load(),
            Err(StoreError::NoReference { stored_len: -1 })
        );
    }

    #[test]
    fn test_oversized_length_rejected() {
        let mut store = store();
        store
            .medium_mut()
            .write_bytes(0, &((MAX_SIZE as i32) + 1).to_le_bytes())
            .unwrap();

        assert_eq!(
            store.load(),
            Err(StoreError::NoReference {
                stored_len: MAX_SIZE as i32 + 1
            })
        );
    }

    #[test]
    fn test_erase_invalidates() {
        let mut store = store();
        store.save(&Signature::from_slice(&[1.0; 6]).unwrap()).unwrap();
        store.erase().unwrap();
        assert!(matches!(store.load(), Err(StoreError::NoReference { .. })));
    }

    #[test]
    fn test_layout_must_fit() {
        let result = SignatureStore::new(MemoryMedium::new(encoded_len(MAX_SIZE)), 1);
        assert!(matches!(result, Err(StoreError::Layout { .. })));
        assert!(SignatureStore::new(MemoryMedium::new(encoded_len(MAX_SIZE)), 0).is_ok());
    }
}
