//! Encoder trait, the reverse direction of [`crate::decoder::Decoder`].
//!
//! kensa only needs encoding in a few places: re-encoding DER so that a
//! signature or MAC can be checked over the exact bytes that were signed.

/// Encoder trait for converting from type `T` into type `E`.
pub trait Encoder<T, E: EncodableTo<T>> {
    /// The error type returned when encoding fails.
    type Error;

    /// Encodes `self` into type `E`.
    fn encode(&self) -> Result<E, Self::Error>;
}

/// Marker trait indicating that type `E` can be produced by encoding `T`.
pub trait EncodableTo<T> {}
