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

//! Key material for the signature algorithms this crate supports.
//!
//! Keys are owned by the caller; the signing and verification engines only borrow them for the
//! duration of a single call.

use crate::{CoseError, Result};
use alloc::vec::Vec;
use rand_core::CryptoRngCore;

#[cfg(test)]
mod tests;

/// Elliptic curve that a key lives on.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Curve {
    /// NIST P-256 also known as secp256r1
    P256,
    /// NIST P-384 also known as secp384r1
    P384,
}

impl Curve {
    /// Length of a fixed-width `r || s` signature over this curve.
    pub fn signature_len(self) -> usize {
        match self {
            Curve::P256 => 64,
            Curve::P384 => 96,
        }
    }
}

/// Private key used to create signatures.
#[derive(Clone, Debug)]
pub enum SigningKey {
    P256(p256::ecdsa::SigningKey),
    P384(p384::ecdsa::SigningKey),
}

impl SigningKey {
    /// Generate a fresh private key on `curve`.
    pub fn generate<R: CryptoRngCore>(curve: Curve, rng: &mut R) -> Self {
        match curve {
            Curve::P256 => SigningKey::P256(p256::ecdsa::SigningKey::random(rng)),
            Curve::P384 => SigningKey::P384(p384::ecdsa::SigningKey::random(rng)),
        }
    }

    /// Curve that the key lives on.
    pub fn curve(&self) -> Curve {
        match self {
            SigningKey::P256(_) => Curve::P256,
            SigningKey::P384(_) => Curve::P384,
        }
    }

    /// Public key that verifies signatures made with this key.
    pub fn verifying_key(&self) -> VerifyingKey {
        match self {
            SigningKey::P256(k) => VerifyingKey::P256(p256::ecdsa::VerifyingKey::from(k)),
            SigningKey::P384(k) => VerifyingKey::P384(p384::ecdsa::VerifyingKey::from(k)),
        }
    }
}

/// Public key used to verify signatures.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum VerifyingKey {
    P256(p256::ecdsa::VerifyingKey),
    P384(p384::ecdsa::VerifyingKey),
}

impl VerifyingKey {
    /// Parse a SEC1 encoded (compressed or uncompressed) public key for `curve`.
    pub fn from_sec1_bytes(curve: Curve, data: &[u8]) -> Result<Self> {
        Ok(match curve {
            Curve::P256 => VerifyingKey::P256(
                p256::ecdsa::VerifyingKey::from_sec1_bytes(data)
                    .map_err(|_| CoseError::InvalidKey)?,
            ),
            Curve::P384 => VerifyingKey::P384(
                p384::ecdsa::VerifyingKey::from_sec1_bytes(data)
                    .map_err(|_| CoseError::InvalidKey)?,
            ),
        })
    }

    /// Uncompressed SEC1 encoding of the public key.
    pub fn to_sec1_bytes(&self) -> Vec<u8> {
        match self {
            VerifyingKey::P256(k) => k.to_encoded_point(false).as_bytes().to_vec(),
            VerifyingKey::P384(k) => k.to_encoded_point(false).as_bytes().to_vec(),
        }
    }

    /// Curve that the key lives on.
    pub fn curve(&self) -> Curve {
        match self {
            VerifyingKey::P256(_) => Curve::P256,
            VerifyingKey::P384(_) => Curve::P384,
        }
    }
}
