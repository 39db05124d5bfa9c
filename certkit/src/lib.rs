//! # certkit
//!
//! Core traits for encoding and decoding in the certkit X.509 toolkit.
//!
//! Every layer of the toolkit converts between representations with the
//! `Decoder` and `Encoder` traits defined here:
//!
//! ```text
//! PEM → Vec<u8> → Der → ASN1Object → DecodedCertificate → Certificate
//! ```
//!
//! Decoding walks that chain left to right and encoding walks it back. The
//! marker traits (`DecodableFrom` and `EncodableTo`) restrict each trait to
//! the conversions a crate actually provides.
//!
//! ```ignore
//! use certkit::decoder::Decoder;
//! use certkit::encoder::Encoder;
//! use certkit_asn1::ASN1Object;
//! use certkit_der::Der;
//!
//! let bytes = vec![0x30, 0x00];
//! let der: Der = bytes.decode().unwrap();
//! let asn1: ASN1Object = der.decode().unwrap();
//!
//! let der: Der = asn1.encode().unwrap();
//! let bytes: Vec<u8> = der.encode().unwrap();
//! ```

#![forbid(unsafe_code)]

pub mod decoder;
pub mod encoder;
