// Copyright 2021 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
////////////////////////////////////////////////////////////////////////////////

//! Common types.

use crate::{
    cbor,
    cbor::value::Value,
    codec, iana,
    iana::EnumI64,
    util::{cbor_type_error, ValueTryAs},
};
use alloc::{boxed::Box, string::String, vec::Vec};
use core::{cmp::Ordering, convert::TryInto};


/// Marker structure indicating that the EOF was encountered when reading CBOR data.
#[derive(Debug)]
pub struct EndOfFile;

/// Error type for failures in encoding, decoding, signing or verifying COSE types.
pub enum CoseError {
    /// CBOR decoding failure.
    DecodeFailed(cbor::de::Error<EndOfFile>),
    /// Duplicate map key detected.
    DuplicateMapKey,
    /// CBOR encoding failure.
    EncodeFailed,
    /// CBOR input had extra data.
    ExtraneousData,
    /// Integer value on the wire is outside the range of integers representable in this crate.
    OutOfRangeIntegerValue,
    /// Unexpected CBOR item encountered (got, want).
    UnexpectedItem(&'static str, &'static str),
    /// Well-formed CBOR that does not have the shape of a COSE_Sign1 message.
    MalformedMessage(&'static str),
    /// No algorithm with this identifier is registered.
    UnsupportedAlgorithm(i64),
    /// An algorithm with this identifier is already registered.
    DuplicateAlgorithm(i64),
    /// Key bytes do not describe a valid key.
    InvalidKey,
    /// Signature creation failed.
    SigningFailed(SignatureFailure),
    /// Signature verification failed.
    VerificationFailed(SignatureFailure),
}

/// Crate-specific Result type
pub type Result<T, E = CoseError> = core::result::Result<T, E>;

impl<T> core::convert::From<cbor::de::Error<T>> for CoseError {
    fn from(e: cbor::de::Error<T>) -> Self {
        // Make sure we use our [`EndOfFile`] marker.
        use cbor::de::Error::{Io, RecursionLimitExceeded, Semantic, Syntax};
        let e = match e {
            Io(_) => Io(EndOfFile),
            Syntax(x) => Syntax(x),
            Semantic(a, b) => Semantic(a, b),
            RecursionLimitExceeded => RecursionLimitExceeded,
        };
        CoseError::DecodeFailed(e)
    }
}

impl<T> core::convert::From<cbor::ser::Error<T>> for CoseError {
    fn from(_e: cbor::ser::Error<T>) -> Self {
        CoseError::EncodeFailed
    }
}

impl core::convert::From<core::num::TryFromIntError> for CoseError {
    fn from(_: core::num::TryFromIntError) -> Self {
        CoseError::OutOfRangeIntegerValue
    }
}

impl core::fmt::Debug for CoseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        self.fmt_msg(f)
    }
}

impl core::fmt::Display for CoseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        self.fmt_msg(f)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for CoseError {}

impl CoseError {
    fn fmt_msg(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            CoseError::DecodeFailed(e) => write!(f, "decode CBOR failure: {}", e),
            CoseError::DuplicateMapKey => write!(f, "duplicate map key"),
            CoseError::EncodeFailed => write!(f, "encode CBOR failure"),
            CoseError::ExtraneousData => write!(f, "extraneous data in CBOR input"),
            CoseError::OutOfRangeIntegerValue => write!(f, "out of range integer value"),
            CoseError::UnexpectedItem(got, want) => write!(f, "got {}, expected {}", got, want),
            CoseError::MalformedMessage(what) => write!(f, "malformed COSE_Sign1 message: {}", what),
            CoseError::UnsupportedAlgorithm(alg) => write!(f, "unsupported algorithm {}", alg),
            CoseError::DuplicateAlgorithm(alg) => write!(f, "duplicate algorithm {}", alg),
            CoseError::InvalidKey => write!(f, "invalid key encoding"),
            CoseError::SigningFailed(cause) => write!(f, "signing failed: {}", cause),
            CoseError::VerificationFailed(cause) => write!(f, "verification failed: {}", cause),
        }
    }
}

/// Underlying cause of a signing or verification failure.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SignatureFailure {
    /// No algorithm with this identifier is registered.
    UnsupportedAlgorithm(i64),
    /// The protected header carries no algorithm identifier.
    MissingAlgorithm,
    /// The protected algorithm entry is not a signed integer.
    InvalidAlgorithmHeader,
    /// The protected header names a different algorithm than the one requested.
    AlgorithmMismatch { requested: i64, header: i64 },
    /// Neither an embedded nor a detached payload is available.
    MissingPayload,
    /// A detached payload was supplied for a message that embeds one.
    UnexpectedPayload,
    /// The key cannot be used with the algorithm.
    KeyMismatch,
    /// The randomness source failed to produce bytes.
    RandomnessUnavailable,
    /// The signature primitive reported an error.
    Primitive,
    /// The signature has the wrong length for the algorithm.
    MalformedSignature { expected: usize, got: usize },
    /// The signature does not match the signed data.
    SignatureMismatch,
}

impl core::fmt::Display for SignatureFailure {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            SignatureFailure::UnsupportedAlgorithm(alg) => {
                write!(f, "unsupported algorithm {}", alg)
            }
            SignatureFailure::MissingAlgorithm => write!(f, "missing algorithm header"),
            SignatureFailure::InvalidAlgorithmHeader => write!(f, "invalid algorithm header"),
            SignatureFailure::AlgorithmMismatch { requested, header } => write!(
                f,
                "algorithm mismatch: requested {}, header has {}",
                requested, header
            ),
            SignatureFailure::MissingPayload => write!(f, "missing payload"),
            SignatureFailure::UnexpectedPayload => {
                write!(f, "detached payload supplied for message with payload")
            }
            SignatureFailure::KeyMismatch => write!(f, "key does not match algorithm"),
            SignatureFailure::RandomnessUnavailable => write!(f, "randomness source failed"),
            SignatureFailure::Primitive => write!(f, "signature primitive failed"),
            SignatureFailure::MalformedSignature { expected, got } => write!(
                f,
                "malformed signature: expected {} bytes, got {}",
                expected, got
            ),
            SignatureFailure::SignatureMismatch => write!(f, "signature mismatch"),
        }
    }
}

/// Trait for types that can be converted to/from a [`Value`].
pub trait AsCborValue: Sized {
    /// Convert a [`Value`] into an instance of the type.
    fn from_cbor_value(value: Value) -> Result<Self>;
    /// Convert the object into a [`Value`], consuming it along the way.
    fn to_cbor_value(self) -> Result<Value>;
}

/// Extension trait that adds serialization/deserialization methods.
pub trait CborSerializable: AsCborValue {
    /// Create an object instance from serialized CBOR data in a slice.  This method will fail (with
    /// `CoseError::ExtraneousData`) if there is additional CBOR data after the object.
    fn from_slice(slice: &[u8]) -> Result<Self> {
        Self::from_cbor_value(codec::decode(slice)?)
    }

    /// Serialize this object to a vector, consuming it along the way.
    fn to_vec(self) -> Result<Vec<u8>> {
        codec::encode(&self.to_cbor_value()?)
    }
}

/// Extension trait that adds tagged serialization/deserialization methods.
pub trait TaggedCborSerializable: AsCborValue {
    /// The associated tag value.
    const TAG: u64;

    /// Create an object instance from serialized CBOR data in a slice, expecting an initial
    /// tag value.
    fn from_tagged_slice(slice: &[u8]) -> Result<Self> {
        let (t, v) = codec::decode(slice)?
            .try_as_tag()
            .map_err(|_| CoseError::MalformedMessage("missing tag"))?;
        if t != Self::TAG {
            return Err(CoseError::MalformedMessage("unexpected tag"));
        }
        Self::from_cbor_value(*v)
    }

    /// Serialize this object to a vector, including initial tag, consuming the object along the
    /// way.
    fn to_tagged_vec(self) -> Result<Vec<u8>> {
        codec::encode(&Value::Tag(Self::TAG, Box::new(self.to_cbor_value()?)))
    }
}

/// Trivial implementation of [`AsCborValue`] for [`Value`].
impl AsCborValue for Value {
    fn from_cbor_value(value: Value) -> Result<Self> {
        Ok(value)
    }
    fn to_cbor_value(self) -> Result<Value> {
        Ok(self)
    }
}

impl CborSerializable for Value {}

/// A COSE label may be either a signed integer value or a string.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Label {
    Int(i64),
    Text(String),
}

impl CborSerializable for Label {}

impl From<i64> for Label {
    fn from(i: i64) -> Self {
        Label::Int(i)
    }
}

impl From<&str> for Label {
    fn from(t: &str) -> Self {
        Label::Text(t.into())
    }
}

impl From<String> for Label {
    fn from(t: String) -> Self {
        Label::Text(t)
    }
}

impl From<iana::HeaderParameter> for Label {
    fn from(param: iana::HeaderParameter) -> Self {
        Label::Int(param.to_i64())
    }
}

/// Manual implementation of [`Ord`] to ensure that CBOR canonical ordering is respected.
///
/// This matches the ordering given by RFC 8949 section 4.2.1 (lexicographic ordering of encoded
/// form), so a map keyed by `Label` iterates in the order its entries are encoded.
impl Ord for Label {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Label::Int(i1), Label::Int(i2)) => match (i1.signum(), i2.signum()) {
                (-1, -1) => i2.cmp(i1),
                (-1, 0) => Ordering::Greater,
                (-1, 1) => Ordering::Greater,
                (0, -1) => Ordering::Less,
                (0, 0) => Ordering::Equal,
                (0, 1) => Ordering::Less,
                (1, -1) => Ordering::Less,
                (1, 0) => Ordering::Greater,
                (1, 1) => i1.cmp(i2),
                (_, _) => unreachable!(), // safe: all possibilies covered
            },
            (Label::Int(_i1), Label::Text(_t2)) => Ordering::Less,
            (Label::Text(_t1), Label::Int(_i2)) => Ordering::Greater,
            (Label::Text(t1), Label::Text(t2)) => t1.len().cmp(&t2.len()).then(t1.cmp(t2)),
        }
    }
}

impl PartialOrd for Label {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl AsCborValue for Label {
    fn from_cbor_value(value: Value) -> Result<Self> {
        match value {
            Value::Integer(i) => Ok(Label::Int(i.try_into()?)),
            Value::Text(t) => Ok(Label::Text(t)),
            v => cbor_type_error(&v, "int/tstr"),
        }
    }
    fn to_cbor_value(self) -> Result<Value> {
        Ok(match self {
            Label::Int(i) => Value::from(i),
            Label::Text(t) => Value::Text(t),
        })
    }
}
