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

//! Deterministic CBOR encoding and decoding, on top of `ciborium`.

use crate::{cbor, cbor::value::Value, CoseError, Result};
use alloc::{boxed::Box, vec::Vec};
use core::cmp::Ordering;


/// Indicate which ordering should be applied to CBOR map keys.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum CborOrdering {
    /// Order keys lexicographically by their encoded form, as per RFC 8949 section 4.2.1 (Core
    /// Deterministic Encoding Requirements)
    #[default]
    Lexicographic,
    /// Order keys by encoded length, then by lexicographic ordering of encoded form, as per RFC
    /// 7049 section 3.9 (Canonical CBOR) / RFC 8949 section 4.2.3 (Length-First Map Key Ordering).
    LengthFirstLexicographic,
}

impl CborOrdering {
    fn compare(self, left: &[u8], right: &[u8]) -> Ordering {
        match self {
            CborOrdering::Lexicographic => left.cmp(right),
            CborOrdering::LengthFirstLexicographic => {
                left.len().cmp(&right.len()).then_with(|| left.cmp(right))
            }
        }
    }
}

/// Read a CBOR [`Value`] from a byte slice, failing if any extra data remains after the `Value` has
/// been read.
pub fn decode(mut slice: &[u8]) -> Result<Value> {
    let value = cbor::de::from_reader(&mut slice)?;
    if slice.is_empty() {
        Ok(value)
    } else {
        Err(CoseError::ExtraneousData)
    }
}

/// Encode a CBOR [`Value`] as-is, preserving the order of any map entries it holds.
pub fn encode(value: &Value) -> Result<Vec<u8>> {
    let mut data = Vec::new();
    cbor::ser::into_writer(value, &mut data)?;
    Ok(data)
}

/// Re-order every map inside `value` according to `ordering`, so that logically equal values
/// encode to identical bytes.  Fails with [`CoseError::DuplicateMapKey`] if a map holds the same
/// key twice.
pub fn canonicalize(value: Value, ordering: CborOrdering) -> Result<Value> {
    Ok(match value {
        Value::Map(m) => {
            let mut entries = Vec::with_capacity(m.len());
            for (k, v) in m.into_iter() {
                let k = canonicalize(k, ordering)?;
                let encoded_key = encode(&k)?;
                entries.push((encoded_key, k, canonicalize(v, ordering)?));
            }
            entries.sort_by(|l, r| ordering.compare(&l.0, &r.0));
            if entries.windows(2).any(|pair| pair[0].0 == pair[1].0) {
                return Err(CoseError::DuplicateMapKey);
            }
            Value::Map(entries.into_iter().map(|(_, k, v)| (k, v)).collect())
        }
        Value::Array(a) => Value::Array(
            a.into_iter()
                .map(|v| canonicalize(v, ordering))
                .collect::<Result<Vec<_>>>()?,
        ),
        Value::Tag(t, inner) => Value::Tag(t, Box::new(canonicalize(*inner, ordering)?)),
        v => v,
    })
}

/// Encode `value` after putting it into canonical form.
pub fn encode_canonical(value: Value, ordering: CborOrdering) -> Result<Vec<u8>> {
    encode(&canonicalize(value, ordering)?)
}
