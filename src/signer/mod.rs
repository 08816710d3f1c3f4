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

//! Signing engine for COSE_Sign1 messages.

use crate::{
    key::SigningKey, registry::Registry, CborSerializable, CoseError, CoseSign1, ProtectedHeader,
    Result, SigStructure, SignatureFailure,
};
use alloc::vec::Vec;
use rand_core::CryptoRngCore;


/// Creates signatures over COSE_Sign1 messages, using the algorithms of a [`Registry`].
#[derive(Clone, Copy, Debug)]
pub struct Signer<'a> {
    registry: &'a Registry,
}

impl<'a> Signer<'a> {
    /// Create a signer that draws its algorithms from `registry`.
    pub fn new(registry: &'a Registry) -> Self {
        Self { registry }
    }

    /// Sign the message's embedded payload with `key` under algorithm `alg`, store the signature in
    /// the message and return it.
    ///
    /// The algorithm is added to the protected header if it is not there yet, and the protected
    /// header bytes are fixed at this point.  On failure the message is left untouched.
    pub fn sign<A: Into<i64>, R: CryptoRngCore + ?Sized>(
        &self,
        message: &mut CoseSign1,
        key: &SigningKey,
        alg: A,
        rng: &mut R,
        external_aad: &[u8],
    ) -> Result<Vec<u8>> {
        let payload = match &message.payload {
            Some(payload) => payload.clone(),
            None => return Err(CoseError::SigningFailed(SignatureFailure::MissingPayload)),
        };
        self.sign_over(message, &payload, key, alg.into(), rng, external_aad)
    }

    /// Sign a payload that is carried separately from the message (RFC 9052 section 4.1).  The
    /// message itself must not embed a payload.
    pub fn sign_detached<A: Into<i64>, R: CryptoRngCore + ?Sized>(
        &self,
        message: &mut CoseSign1,
        payload: &[u8],
        key: &SigningKey,
        alg: A,
        rng: &mut R,
        external_aad: &[u8],
    ) -> Result<Vec<u8>> {
        if message.payload.is_some() {
            return Err(CoseError::SigningFailed(SignatureFailure::UnexpectedPayload));
        }
        self.sign_over(message, payload, key, alg.into(), rng, external_aad)
    }

    fn sign_over<R: CryptoRngCore + ?Sized>(
        &self,
        message: &mut CoseSign1,
        payload: &[u8],
        key: &SigningKey,
        alg: i64,
        rng: &mut R,
        external_aad: &[u8],
    ) -> Result<Vec<u8>> {
        let failed = CoseError::SigningFailed;
        let descriptor = self
            .registry
            .lookup(alg)
            .map_err(|_| failed(SignatureFailure::UnsupportedAlgorithm(alg)))?;

        let mut header = message.protected.header.clone();
        match header.algorithm() {
            Ok(None) => header.set_algorithm(alg),
            Ok(Some(existing)) if existing == alg => {}
            Ok(Some(existing)) => {
                return Err(failed(SignatureFailure::AlgorithmMismatch {
                    requested: alg,
                    header: existing,
                }))
            }
            Err(_) => return Err(failed(SignatureFailure::InvalidAlgorithmHeader)),
        }
        let protected = ProtectedHeader {
            original_data: Some(header.clone().to_vec()?),
            header,
        };

        let tbs = SigStructure::new(
            protected.encoded()?,
            external_aad.to_vec(),
            payload.to_vec(),
        )
        .to_vec()?;
        tracing::trace!(alg, tbs_len = tbs.len(), "encoded Sig_structure");
        let digest = descriptor.digest(&tbs);
        let signature = descriptor.sign(key, &digest, rng).map_err(failed)?;
        tracing::debug!(alg, payload_len = payload.len(), "signed COSE_Sign1 message");

        message.protected = protected;
        message.signature = signature.clone();
        Ok(signature)
    }
}
