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

//! COSE_Sign1 functionality.

use crate::{
    cbor::value::Value,
    common::AsCborValue,
    iana,
    util::{cbor_type_error, ValueTryAs},
    CoseError, HeaderMap, Label, ProtectedHeader, Result, TaggedCborSerializable,
};
use alloc::{string::String, vec, vec::Vec};

#[cfg(test)]
mod tests;

/// Context string identifying the signature structure of a COSE_Sign1 message.
pub const SIGNATURE1_CONTEXT: &str = "Signature1";

/// Structure representing a single-signer COSE message.
///
/// ```cddl
///  COSE_Sign1 = [
///      Headers,
///      payload : bstr / nil,
///      signature : bstr
///  ]
///  ```
///
/// The `protected` header keeps the exact bytes it was decoded from (or signed as), and those
/// bytes are what get serialized and verified; they are never re-derived from the header map once
/// present.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CoseSign1 {
    pub protected: ProtectedHeader,
    pub unprotected: HeaderMap,
    pub payload: Option<Vec<u8>>,
    pub signature: Vec<u8>,
}

impl crate::CborSerializable for CoseSign1 {}

impl TaggedCborSerializable for CoseSign1 {
    const TAG: u64 = iana::CborTag::CoseSign1 as u64;
}

impl AsCborValue for CoseSign1 {
    fn from_cbor_value(value: Value) -> Result<Self> {
        let mut a = value
            .try_as_array()
            .map_err(|_| CoseError::MalformedMessage("expected array"))?;
        if a.len() != 4 {
            return Err(CoseError::MalformedMessage("expected array with 4 items"));
        }

        // Remove array elements in reverse order to avoid shifts.
        let signature = a
            .remove(3)
            .try_as_bytes()
            .map_err(|_| CoseError::MalformedMessage("signature is not a bstr"))?;
        let payload = a
            .remove(2)
            .try_as_optional_bytes()
            .map_err(|_| CoseError::MalformedMessage("payload is not a bstr or nil"))?;
        let unprotected = match a.remove(1) {
            v @ Value::Map(_) => HeaderMap::from_cbor_value(v)
                .map_err(|_| CoseError::MalformedMessage("invalid unprotected header"))?,
            _ => return Err(CoseError::MalformedMessage("unprotected header is not a map")),
        };
        let protected = ProtectedHeader::from_cbor_bstr(a.remove(0))?;

        Ok(Self {
            protected,
            unprotected,
            payload,
            signature,
        })
    }

    fn to_cbor_value(self) -> Result<Value> {
        Ok(Value::Array(vec![
            self.protected.cbor_bstr()?,
            self.unprotected.to_cbor_value()?,
            match self.payload {
                None => Value::Null,
                Some(b) => Value::Bytes(b),
            },
            Value::Bytes(self.signature),
        ]))
    }
}

impl CoseSign1 {
    /// Create an empty message.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a protected header value.  Any previously signed or decoded form of the protected
    /// header is discarded, so an existing signature no longer covers the message.
    pub fn set_protected<L: Into<Label>, V: Into<Value>>(&mut self, label: L, value: V) {
        self.protected.original_data = None;
        self.protected.header.insert(label, value);
    }

    /// Return a protected header value.
    pub fn protected_value<L: Into<Label>>(&self, label: L) -> Option<&Value> {
        self.protected.header.get(label)
    }

    /// Set an unprotected header value.  Unprotected headers are not covered by the signature.
    pub fn set_unprotected<L: Into<Label>, V: Into<Value>>(&mut self, label: L, value: V) {
        self.unprotected.insert(label, value);
    }

    /// Return an unprotected header value.
    pub fn unprotected_value<L: Into<Label>>(&self, label: L) -> Option<&Value> {
        self.unprotected.get(label)
    }

    /// Indicate whether the message carries a signature over a fixed protected header.
    pub fn is_signed(&self) -> bool {
        self.protected.original_data.is_some() && !self.signature.is_empty()
    }

    /// Build the signature structure over the embedded payload (an absent payload contributes an
    /// empty byte string).
    pub fn sig_structure(&self, external_aad: &[u8]) -> Result<SigStructure> {
        let payload = self.payload.as_deref().unwrap_or_default();
        self.detached_sig_structure(external_aad, payload)
    }

    /// Build the signature structure over a payload that is carried out of band.
    pub fn detached_sig_structure(
        &self,
        external_aad: &[u8],
        payload: &[u8],
    ) -> Result<SigStructure> {
        Ok(SigStructure::new(
            self.protected.encoded()?,
            external_aad.to_vec(),
            payload.to_vec(),
        ))
    }

    /// Encode the message as a tagged COSE_Sign1 structure.
    pub fn serialize(&self) -> Result<Vec<u8>> {
        self.clone().to_tagged_vec()
    }

    /// Decode a tagged COSE_Sign1 structure.
    pub fn deserialize(data: &[u8]) -> Result<Self> {
        Self::from_tagged_slice(data)
    }
}

/// Builder for [`CoseSign1`] objects.
#[derive(Debug, Default)]
pub struct CoseSign1Builder(CoseSign1);

impl CoseSign1Builder {
    builder! {CoseSign1}
    builder_set! {unprotected: HeaderMap}
    builder_set! {signature: Vec<u8>}
    builder_set_optional! {payload: Vec<u8>}

    /// Set the protected header, which has not been serialized yet.
    #[must_use]
    pub fn protected(mut self, header: HeaderMap) -> Self {
        self.0.protected = ProtectedHeader::new(header);
        self
    }
}

/// Signature structure: the data that is actually signed and verified.  It is never placed on the
/// wire.
///
/// ```cddl
///  Sig_structure = [
///      context : "Signature1",
///      body_protected : empty_or_serialized_map,
///      external_aad : bstr,
///      payload : bstr
///  ]
///  ```
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SigStructure {
    pub body_protected: Vec<u8>,
    pub external_aad: Vec<u8>,
    pub payload: Vec<u8>,
}

impl SigStructure {
    pub fn new(body_protected: Vec<u8>, external_aad: Vec<u8>, payload: Vec<u8>) -> Self {
        Self {
            body_protected,
            external_aad,
            payload,
        }
    }
}

impl crate::CborSerializable for SigStructure {}

impl AsCborValue for SigStructure {
    fn from_cbor_value(value: Value) -> Result<Self> {
        let mut a = value.try_as_array()?;
        if a.len() != 4 {
            return Err(CoseError::UnexpectedItem("array", "array with 4 items"));
        }

        // Remove array elements in reverse order to avoid shifts.
        let payload = a.remove(3).try_as_bytes()?;
        let external_aad = a.remove(2).try_as_bytes()?;
        let body_protected = a.remove(1).try_as_bytes()?;
        match a.remove(0) {
            Value::Text(t) if t == SIGNATURE1_CONTEXT => {}
            Value::Text(_) => return Err(CoseError::UnexpectedItem("tstr", "\"Signature1\"")),
            v => return cbor_type_error(&v, "tstr"),
        }
        Ok(Self {
            body_protected,
            external_aad,
            payload,
        })
    }

    fn to_cbor_value(self) -> Result<Value> {
        Ok(Value::Array(vec![
            Value::Text(String::from(SIGNATURE1_CONTEXT)),
            Value::Bytes(self.body_protected),
            Value::Bytes(self.external_aad),
            Value::Bytes(self.payload),
        ]))
    }
}
