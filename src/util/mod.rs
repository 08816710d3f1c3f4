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

//! Common internal utilities.

use crate::{cbor::value::Value, CoseError, Result};
use alloc::{boxed::Box, vec::Vec};
use core::convert::TryFrom;


/// Return an error indicating that an unexpected CBOR type was encountered.
pub(crate) fn cbor_type_error<T>(value: &Value, want: &'static str) -> Result<T> {
    let got = match value {
        Value::Integer(_) => "int",
        Value::Bytes(_) => "bstr",
        Value::Float(_) => "float",
        Value::Text(_) => "tstr",
        Value::Bool(_) => "bool",
        Value::Null => "nul",
        Value::Tag(_, _) => "tag",
        Value::Array(_) => "array",
        Value::Map(_) => "map",
        _ => "other",
    };
    Err(CoseError::UnexpectedItem(got, want))
}

/// Trait which augments the [`Value`] type with methods for convenient conversions to contained
/// types which throw a [`CoseError`] if the Value is not of the expected type.
pub(crate) trait ValueTryAs
where
    Self: Sized,
{
    /// Extractor for [`Value::Integer`], narrowed to `i64`.
    fn try_as_i64(self) -> Result<i64>;

    /// Extractor for [`Value::Bytes`]
    fn try_as_bytes(self) -> Result<Vec<u8>>;

    /// Extractor for [`Value::Bytes`] which also accepts [`Value::Null`] as `None`.
    fn try_as_optional_bytes(self) -> Result<Option<Vec<u8>>>;

    /// Extractor for [`Value::Array`]
    fn try_as_array(self) -> Result<Vec<Value>>;

    /// Extractor for [`Value::Map`]
    fn try_as_map(self) -> Result<Vec<(Value, Value)>>;

    /// Extractor for [`Value::Tag`]
    fn try_as_tag(self) -> Result<(u64, Box<Value>)>;
}

impl ValueTryAs for Value {
    fn try_as_i64(self) -> Result<i64> {
        match self {
            Value::Integer(i) => Ok(i64::try_from(i)?),
            v => cbor_type_error(&v, "int"),
        }
    }

    fn try_as_bytes(self) -> Result<Vec<u8>> {
        match self {
            Value::Bytes(b) => Ok(b),
            v => cbor_type_error(&v, "bstr"),
        }
    }

    fn try_as_optional_bytes(self) -> Result<Option<Vec<u8>>> {
        match self {
            Value::Bytes(b) => Ok(Some(b)),
            Value::Null => Ok(None),
            v => cbor_type_error(&v, "bstr / nil"),
        }
    }

    fn try_as_array(self) -> Result<Vec<Value>> {
        match self {
            Value::Array(a) => Ok(a),
            v => cbor_type_error(&v, "array"),
        }
    }

    fn try_as_map(self) -> Result<Vec<(Value, Value)>> {
        match self {
            Value::Map(m) => Ok(m),
            v => cbor_type_error(&v, "map"),
        }
    }

    fn try_as_tag(self) -> Result<(u64, Box<Value>)> {
        match self {
            Value::Tag(tag, inner) => Ok((tag, inner)),
            v => cbor_type_error(&v, "tag"),
        }
    }
}

/// Check for an expected error.
#[cfg(test)]
pub fn expect_err<T: core::fmt::Debug, E: core::fmt::Debug + core::fmt::Display>(
    result: Result<T, E>,
    err_msg: &str,
) {
    use alloc::format;
    match result {
        Ok(v) => panic!("expected error containing '{}', got success {:?}", err_msg, v),
        Err(err) => {
            assert!(
                format!("{:?}", err).contains(err_msg),
                "unexpected error {:?}, doesn't contain '{}' (Debug impl)",
                err,
                err_msg
            );
            assert!(
                format!("{}", err).contains(err_msg),
                "unexpected error {:?}, doesn't contain '{}' (Display impl)",
                err,
                err_msg
            );
        }
    }
}

/// Randomness source that always fails.
#[cfg(test)]
pub(crate) struct FailingRng;

#[cfg(test)]
impl rand_core::RngCore for FailingRng {
    fn next_u32(&mut self) -> u32 {
        panic!("randomness requested from failing source");
    }
    fn next_u64(&mut self) -> u64 {
        panic!("randomness requested from failing source");
    }
    fn fill_bytes(&mut self, _dest: &mut [u8]) {
        panic!("randomness requested from failing source");
    }
    fn try_fill_bytes(&mut self, _dest: &mut [u8]) -> Result<(), rand_core::Error> {
        Err(rand_core::Error::from(
            core::num::NonZeroU32::new(rand_core::Error::CUSTOM_START).unwrap(),
        ))
    }
}

#[cfg(test)]
impl rand_core::CryptoRng for FailingRng {}

// Macros to reduce boilerplate when creating `CoseSomethingBuilder` structures.

/// Add `new()` and `build()` methods to the builder.
macro_rules! builder {
    ( $otype: ty ) => {
        /// Constructor for builder.
        pub fn new() -> Self {
            Self(<$otype>::default())
        }
        /// Build the completed object.
        pub fn build(self) -> $otype {
            self.0
        }
    };
}

/// Add a setter function for a field to the builder.
macro_rules! builder_set {
    ( $name:ident: $ftype:ty ) => {
        /// Set the associated field.
        #[must_use]
        pub fn $name(mut self, $name: $ftype) -> Self {
            self.0.$name = $name;
            self
        }
    };
}

/// Add a setter function for an optional field to the builder.
macro_rules! builder_set_optional {
    ( $name:ident: $ftype:ty ) => {
        /// Set the associated field.
        #[must_use]
        pub fn $name(mut self, $name: $ftype) -> Self {
            self.0.$name = Some($name);
            self
        }
    };
}
