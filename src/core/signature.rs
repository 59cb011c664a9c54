//! Fixed-capacity gesture signature.
//!
//! A signature is the ordered sequence of motion magnitudes captured while a
//! trigger button is held. Storage is a plain array so capture never touches
//! the heap; the live prefix is tracked by an explicit length.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Maximum number of samples a signature can hold.
pub const MAX_SIZE: usize = 80;

/// An ordered sequence of motion magnitudes, `0..=MAX_SIZE` long.
#[derive(Clone, Copy)]
pub struct Signature {
    values: [f32; MAX_SIZE],
    len: usize,
}

impl Signature {
    /// Create an empty signature.
    pub const fn new() -> Self {
        Self {
            values: [0.0; MAX_SIZE],
            len: 0,
        }
    }

    /// Build a signature from a slice of magnitudes.
    pub fn from_slice(values: &[f32]) -> Result<Self, SignatureError> {
        if values.len() > MAX_SIZE {
            return Err(SignatureError::TooLong { len: values.len() });
        }

        let mut signature = Self::new();
        signature.values[..values.len()].copy_from_slice(values);
        signature.len = values.len();
        Ok(signature)
    }

    /// Append a sample. Fails once the signature holds `MAX_SIZE` samples.
    pub fn push(&mut self, value: f32) -> Result<(), SignatureError> {
        if self.is_full() {
            return Err(SignatureError::Full);
        }
        self.values[self.len] = value;
        self.len += 1;
        Ok(())
    }

    /// Number of live samples.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_full(&self) -> bool {
        self.len == MAX_SIZE
    }

    /// Shorten the signature, keeping the first `len` samples.
    ///
    /// Has no effect if `len` is not smaller than the current length.
    pub fn truncate(&mut self, len: usize) {
        if len < self.len {
            self.len = len;
        }
    }

    /// The live samples.
    pub fn as_slice(&self) -> &[f32] {
        &self.values[..self.len]
    }

    /// The live samples, mutable in place.
    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.values[..self.len]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, f32> {
        self.as_slice().iter()
    }
}

impl Default for Signature {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for Signature {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

impl<'a> IntoIterator for &'a Signature {
    type Item = &'a f32;
    type IntoIter = std::slice::Iter<'a, f32>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Serialize for Signature {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.as_slice().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Signature {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let values = Vec::<f32>::deserialize(deserializer)?;
        Signature::from_slice(&values).map_err(serde::de::Error::custom)
    }
}

/// Signature construction errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignatureError {
    /// The signature already holds `MAX_SIZE` samples
    Full,
    /// A source sequence is longer than `MAX_SIZE`
    TooLong { len: usize },
}

impl fmt::Display for SignatureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignatureError::Full => write!(f, "Signature is full ({MAX_SIZE} samples)"),
            SignatureError::TooLong { len } => {
                write!(f, "Signature of {len} samples exceeds capacity {MAX_SIZE}")
            }
        }
    }
}

impl std::error::Error for SignatureError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_until_full() {
        let mut signature = Signature::new();
        for i in 0..MAX_SIZE {
            signature.push(i as f32).unwrap();
        }

        assert!(signature.is_full());
        assert_eq!(signature.push(1.0), Err(SignatureError::Full));
        assert_eq!(signature.len(), MAX_SIZE);
    }

    #[test]
    fn test_from_slice_rejects_oversized() {
        let values = vec![0.5; MAX_SIZE + 1];
        assert_eq!(
            Signature::from_slice(&values),
            Err(SignatureError::TooLong { len: MAX_SIZE + 1 })
        );
    }

    #[test]
    fn test_equality_ignores_dead_tail() {
        let mut a = Signature::from_slice(&[1.0, 2.0, 3.0]).unwrap();
        a.truncate(2);
        let b = Signature::from_slice(&[1.0, 2.0]).unwrap();

        assert_eq!(a, b);
        assert_eq!(a.as_slice(), &[1.0, 2.0]);
    }

    #[test]
    fn test_serde_as_plain_list() {
        let signature = Signature::from_slice(&[0.5, 1.5]).unwrap();
        let json = serde_json::to_string(&signature).unwrap();
        assert_eq!(json, "[0.5,1.5]");

        let back: Signature = serde_json::from_str(&json).unwrap();
        assert_eq!(back, signature);

        let too_long = serde_json::to_string(&vec![0.0f32; MAX_SIZE + 1]).unwrap();
        assert!(serde_json::from_str::<Signature>(&too_long).is_err());
    }
}
