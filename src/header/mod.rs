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

//! COSE Headers functionality.

use crate::{
    cbor::value::Value,
    codec::{self, CborOrdering},
    common::AsCborValue,
    iana,
    util::ValueTryAs,
    CborSerializable, CoseError, Label, Result,
};
use alloc::{
    collections::{btree_map, BTreeMap},
    string::String,
    vec::Vec,
};


/// Structure representing a common COSE header map.
///
/// Entries are kept in canonical label order, so two maps holding the same entries always encode
/// to the same bytes, whatever order the entries were inserted in.
///
/// ```cddl
///   header_map = {
///       Generic_Headers,
///       * label => values
///   }
///  ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HeaderMap(BTreeMap<Label, Value>);

impl HeaderMap {
    /// Create an empty header map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the value for `label`, returning any previous value.
    ///
    /// Maps nested in `value` are stored in canonical order, so the held value is the one that
    /// goes on the wire.  A value with duplicate nested map keys is kept as given, and fails to
    /// encode.
    pub fn insert<L: Into<Label>, V: Into<Value>>(&mut self, label: L, value: V) -> Option<Value> {
        let value = value.into();
        let value =
            codec::canonicalize(value.clone(), CborOrdering::Lexicographic).unwrap_or(value);
        self.0.insert(label.into(), value)
    }

    /// Return the value held for `label`.
    pub fn get<L: Into<Label>>(&self, label: L) -> Option<&Value> {
        self.0.get(&label.into())
    }

    /// Remove the value held for `label`.
    pub fn remove<L: Into<Label>>(&mut self, label: L) -> Option<Value> {
        self.0.remove(&label.into())
    }

    /// Indicate whether a value is held for `label`.
    pub fn contains<L: Into<Label>>(&self, label: L) -> bool {
        self.0.contains_key(&label.into())
    }

    /// Number of entries in the map.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Indicate whether the map is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the entries in canonical order.
    pub fn iter(&self) -> btree_map::Iter<'_, Label, Value> {
        self.0.iter()
    }

    /// Return the algorithm identifier, if present.  Fails if the entry is not an integer in the
    /// signed 64-bit range.
    pub fn algorithm(&self) -> Result<Option<i64>> {
        match self.get(iana::HeaderParameter::Alg) {
            None => Ok(None),
            Some(v) => v.clone().try_as_i64().map(Some),
        }
    }

    /// Set the algorithm identifier.
    pub fn set_algorithm<A: Into<i64>>(&mut self, alg: A) {
        self.insert(iana::HeaderParameter::Alg, alg.into());
    }

    /// Return the key identifier, if present as a byte string.
    pub fn key_id(&self) -> Option<&[u8]> {
        match self.get(iana::HeaderParameter::Kid) {
            Some(Value::Bytes(kid)) => Some(kid),
            _ => None,
        }
    }

    /// Return the content type, if present.
    pub fn content_type(&self) -> Option<&Value> {
        self.get(iana::HeaderParameter::ContentType)
    }
}

impl crate::CborSerializable for HeaderMap {}

impl AsCborValue for HeaderMap {
    fn from_cbor_value(value: Value) -> Result<Self> {
        let mut headers = BTreeMap::new();
        for (l, value) in value.try_as_map()?.into_iter() {
            // The `ciborium` CBOR library does not police duplicate map keys, so do it here.
            match headers.entry(Label::from_cbor_value(l)?) {
                btree_map::Entry::Occupied(_) => return Err(CoseError::DuplicateMapKey),
                btree_map::Entry::Vacant(ve) => {
                    ve.insert(codec::canonicalize(value, CborOrdering::Lexicographic)?);
                }
            }
        }
        Ok(Self(headers))
    }

    fn to_cbor_value(self) -> Result<Value> {
        let mut map = Vec::with_capacity(self.0.len());
        for (label, value) in self.0.into_iter() {
            map.push((
                label.to_cbor_value()?,
                codec::canonicalize(value, CborOrdering::Lexicographic)?,
            ));
        }
        Ok(Value::Map(map))
    }
}

/// Header map that is covered by the signature, together with the exact bytes it was read from
/// or signed as.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProtectedHeader {
    /// If this structure was created by parsing serialized data or by signing, this field holds
    /// the exact bytes of the serialized header.  When present these bytes are used in place of a
    /// fresh encoding of `header`.
    pub original_data: Option<Vec<u8>>,
    pub header: HeaderMap,
}

impl ProtectedHeader {
    /// Wrap a header map that has not been serialized yet.
    pub fn new(header: HeaderMap) -> Self {
        Self {
            original_data: None,
            header,
        }
    }

    /// Constructor from a [`Value`] holding a `bstr` encoded header map.
    ///
    /// A zero-length `bstr` is an empty header map (RFC 9052 section 3).  The algorithm entry,
    /// if present, must be a signed integer.
    pub fn from_cbor_bstr(val: Value) -> Result<Self> {
        let data = val
            .try_as_bytes()
            .map_err(|_| CoseError::MalformedMessage("protected header is not a bstr"))?;
        let header = if data.is_empty() {
            HeaderMap::default()
        } else {
            HeaderMap::from_slice(&data)
                .map_err(|_| CoseError::MalformedMessage("protected header is not an encoded map"))?
        };
        header.algorithm().map_err(|_| {
            CoseError::MalformedMessage("protected algorithm is not a signed integer")
        })?;
        Ok(Self {
            original_data: Some(data),
            header,
        })
    }

    /// The bytes covered by the signature: the original bytes if there are any, otherwise the
    /// canonical encoding of `header` (a zero-length string for an empty map).
    pub fn encoded(&self) -> Result<Vec<u8>> {
        match &self.original_data {
            Some(data) => Ok(data.clone()),
            None if self.header.is_empty() => Ok(Vec::new()),
            None => self.header.clone().to_vec(),
        }
    }

    /// Convert this header to a `bstr` encoded map, as a [`Value`], consuming the object along the
    /// way.
    pub fn cbor_bstr(self) -> Result<Value> {
        Ok(Value::Bytes(match self.original_data {
            Some(data) => data,
            None if self.header.is_empty() => Vec::new(),
            None => self.header.to_vec()?,
        }))
    }
}

/// Builder for [`HeaderMap`] objects.
#[derive(Debug, Default)]
pub struct HeaderBuilder(HeaderMap);

impl HeaderBuilder {
    builder! {HeaderMap}

    /// Set the algorithm.
    #[must_use]
    pub fn algorithm(mut self, alg: iana::Algorithm) -> Self {
        self.0.set_algorithm(alg);
        self
    }

    /// Set the key identifier.
    #[must_use]
    pub fn key_id(mut self, kid: Vec<u8>) -> Self {
        self.0.insert(iana::HeaderParameter::Kid, kid);
        self
    }

    /// Set the content type to a text value.
    #[must_use]
    pub fn content_type(mut self, content_type: String) -> Self {
        self.0.insert(iana::HeaderParameter::ContentType, content_type);
        self
    }

    /// Set a header label:value pair.
    #[must_use]
    pub fn value(mut self, label: i64, value: Value) -> Self {
        self.0.insert(label, value);
        self
    }

    /// Set a header label:value pair where the `label` is text.
    #[must_use]
    pub fn text_value(mut self, label: String, value: Value) -> Self {
        self.0.insert(label, value);
        self
    }
}
