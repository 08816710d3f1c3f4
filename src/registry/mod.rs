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

//! Registry mapping COSE algorithm identifiers to signature strategies.

use crate::{
    iana,
    key::{Curve, SigningKey, VerifyingKey},
    CoseError, Result, SignatureFailure,
};
use alloc::{collections::BTreeMap, vec::Vec};
use p256::ecdsa::signature::hazmat::{PrehashVerifier, RandomizedPrehashSigner};
use rand_chacha::ChaCha20Rng;
use rand_core::{CryptoRngCore, RngCore, SeedableRng};
use sha2::{Digest, Sha256, Sha384};


/// Hash function applied to the encoded `Sig_structure`.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum HashFunction {
    Sha256,
    Sha384,
}

impl HashFunction {
    /// Hash `data`.
    pub fn digest(self, data: &[u8]) -> Vec<u8> {
        match self {
            HashFunction::Sha256 => Sha256::digest(data).to_vec(),
            HashFunction::Sha384 => Sha384::digest(data).to_vec(),
        }
    }
}

/// Signature scheme applied to the digest.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum SignatureScheme {
    /// ECDSA, with the nonce derived per RFC 6979 and mixed with fresh randomness.
    Ecdsa,
}

/// Description of a signature algorithm: which hash, scheme and key type an algorithm identifier
/// stands for.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct AlgorithmDescriptor {
    pub id: i64,
    pub hash: HashFunction,
    pub scheme: SignatureScheme,
    pub curve: Curve,
}

impl AlgorithmDescriptor {
    /// ECDSA w/ SHA-256 over P-256.
    pub const ES256: AlgorithmDescriptor = AlgorithmDescriptor {
        id: iana::Algorithm::ES256 as i64,
        hash: HashFunction::Sha256,
        scheme: SignatureScheme::Ecdsa,
        curve: Curve::P256,
    };

    /// ECDSA w/ SHA-384 over P-384.
    pub const ES384: AlgorithmDescriptor = AlgorithmDescriptor {
        id: iana::Algorithm::ES384 as i64,
        hash: HashFunction::Sha384,
        scheme: SignatureScheme::Ecdsa,
        curve: Curve::P384,
    };

    /// Hash the encoded `Sig_structure`.
    pub fn digest(&self, data: &[u8]) -> Vec<u8> {
        self.hash.digest(data)
    }

    /// Generate a fresh private key suitable for this algorithm.
    pub fn generate_key<R: CryptoRngCore>(&self, rng: &mut R) -> SigningKey {
        SigningKey::generate(self.curve, rng)
    }

    /// Sign `digest` with `key`.  The randomness source seeds the entropy that is mixed into the
    /// signature nonce; if it fails no signature is produced.
    pub fn sign<R: CryptoRngCore + ?Sized>(
        &self,
        key: &SigningKey,
        digest: &[u8],
        rng: &mut R,
    ) -> Result<Vec<u8>, SignatureFailure> {
        if key.curve() != self.curve {
            return Err(SignatureFailure::KeyMismatch);
        }
        let mut seed = [0u8; 32];
        RngCore::try_fill_bytes(rng, &mut seed)
            .map_err(|_| SignatureFailure::RandomnessUnavailable)?;
        let mut nonce_rng = ChaCha20Rng::from_seed(seed);

        match (self.scheme, key) {
            (SignatureScheme::Ecdsa, SigningKey::P256(k)) => {
                let sig: p256::ecdsa::Signature = k
                    .sign_prehash_with_rng(&mut nonce_rng, digest)
                    .map_err(|_| SignatureFailure::Primitive)?;
                Ok(sig.to_bytes().to_vec())
            }
            (SignatureScheme::Ecdsa, SigningKey::P384(k)) => {
                let sig: p384::ecdsa::Signature = k
                    .sign_prehash_with_rng(&mut nonce_rng, digest)
                    .map_err(|_| SignatureFailure::Primitive)?;
                Ok(sig.to_bytes().to_vec())
            }
        }
    }

    /// Check `signature` over `digest` against `key`.
    pub fn verify(
        &self,
        key: &VerifyingKey,
        digest: &[u8],
        signature: &[u8],
    ) -> Result<(), SignatureFailure> {
        if key.curve() != self.curve {
            return Err(SignatureFailure::KeyMismatch);
        }
        let expected = self.curve.signature_len();
        if signature.len() != expected {
            return Err(SignatureFailure::MalformedSignature {
                expected,
                got: signature.len(),
            });
        }

        match (self.scheme, key) {
            (SignatureScheme::Ecdsa, VerifyingKey::P256(k)) => {
                let sig = p256::ecdsa::Signature::from_slice(signature)
                    .map_err(|_| SignatureFailure::SignatureMismatch)?;
                k.verify_prehash(digest, &sig)
                    .map_err(|_| SignatureFailure::SignatureMismatch)
            }
            (SignatureScheme::Ecdsa, VerifyingKey::P384(k)) => {
                let sig = p384::ecdsa::Signature::from_slice(signature)
                    .map_err(|_| SignatureFailure::SignatureMismatch)?;
                k.verify_prehash(digest, &sig)
                    .map_err(|_| SignatureFailure::SignatureMismatch)
            }
        }
    }
}

/// Set of algorithms available to the signing and verification engines.
///
/// A registry is populated up front and then shared by reference; lookups need no locking.
#[derive(Clone, Debug)]
pub struct Registry {
    algorithms: BTreeMap<i64, AlgorithmDescriptor>,
}

impl Registry {
    /// Create a registry with no algorithms in it.
    pub fn new() -> Self {
        Self {
            algorithms: BTreeMap::new(),
        }
    }

    /// Create a registry holding ES256 and ES384.
    pub fn with_defaults() -> Self {
        let mut algorithms = BTreeMap::new();
        for descriptor in [AlgorithmDescriptor::ES256, AlgorithmDescriptor::ES384] {
            algorithms.insert(descriptor.id, descriptor);
        }
        Self { algorithms }
    }

    /// Add an algorithm.  Fails if an algorithm with the same identifier is already present.
    pub fn register(&mut self, descriptor: AlgorithmDescriptor) -> Result<()> {
        if self.algorithms.contains_key(&descriptor.id) {
            return Err(CoseError::DuplicateAlgorithm(descriptor.id));
        }
        tracing::debug!(alg = descriptor.id, "registered signature algorithm");
        self.algorithms.insert(descriptor.id, descriptor);
        Ok(())
    }

    /// Find the algorithm registered under `id`.
    pub fn lookup(&self, id: i64) -> Result<&AlgorithmDescriptor> {
        self.algorithms
            .get(&id)
            .ok_or(CoseError::UnsupportedAlgorithm(id))
    }

    /// Identifiers of all registered algorithms, in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = i64> + '_ {
        self.algorithms.keys().copied()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
