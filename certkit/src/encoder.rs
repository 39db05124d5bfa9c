//! Encoder trait, the reverse direction of [`crate::decoder::Decoder`].
//!
//! Implemented by the structured type that knows how to lower itself into
//! the next representation down the chain (for example `Element` into a
//! DER `Tlv`, or a `Der` tree into bytes).

/// Converts `self` (of type `T`) into `E`.
pub trait Encoder<T, E: EncodableTo<T>> {
    /// The error type returned when encoding fails.
    type Error;

    /// Encodes `self` into type `E`.
    ///
    /// # Errors
    ///
    /// Returns an error if `self` holds a value that cannot be represented
    /// in the target encoding.
    fn encode(&self) -> Result<E, Self::Error>;
}

/// Marker trait indicating that type `E` can be encoded from type `T`.
pub trait EncodableTo<T> {}
