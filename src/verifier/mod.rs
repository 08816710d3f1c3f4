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

//! Verification engine for COSE_Sign1 messages.

use crate::{
    key::VerifyingKey, registry::Registry, CborSerializable, CoseError, CoseSign1, Result,
    SignatureFailure,
};


/// Checks signatures on COSE_Sign1 messages, using the algorithms of a [`Registry`].
#[derive(Clone, Copy, Debug)]
pub struct Verifier<'a> {
    registry: &'a Registry,
}

impl<'a> Verifier<'a> {
    /// Create a verifier that draws its algorithms from `registry`.
    pub fn new(registry: &'a Registry) -> Self {
        Self { registry }
    }

    /// Verify the signature over the message's embedded payload.
    ///
    /// The algorithm comes from the protected header, and the protected header bytes carried by
    /// the message are used as-is.  Any failure to match is an error; the message is not changed.
    pub fn verify(
        &self,
        message: &CoseSign1,
        key: &VerifyingKey,
        external_aad: &[u8],
    ) -> Result<()> {
        let payload = message
            .payload
            .as_deref()
            .ok_or(CoseError::VerificationFailed(SignatureFailure::MissingPayload))?;
        self.verify_over(message, payload, key, external_aad)
    }

    /// Verify the signature over a payload that is carried separately from the message.  The
    /// message itself must not embed a payload.
    pub fn verify_detached(
        &self,
        message: &CoseSign1,
        payload: &[u8],
        key: &VerifyingKey,
        external_aad: &[u8],
    ) -> Result<()> {
        if message.payload.is_some() {
            return Err(CoseError::VerificationFailed(
                SignatureFailure::UnexpectedPayload,
            ));
        }
        self.verify_over(message, payload, key, external_aad)
    }

    fn verify_over(
        &self,
        message: &CoseSign1,
        payload: &[u8],
        key: &VerifyingKey,
        external_aad: &[u8],
    ) -> Result<()> {
        let failed = CoseError::VerificationFailed;
        let alg = match message.protected.header.algorithm() {
            Ok(Some(alg)) => alg,
            Ok(None) => return Err(failed(SignatureFailure::MissingAlgorithm)),
            Err(_) => return Err(failed(SignatureFailure::InvalidAlgorithmHeader)),
        };
        let descriptor = self
            .registry
            .lookup(alg)
            .map_err(|_| failed(SignatureFailure::UnsupportedAlgorithm(alg)))?;

        let tbs = message
            .detached_sig_structure(external_aad, payload)?
            .to_vec()?;
        tracing::trace!(alg, tbs_len = tbs.len(), "encoded Sig_structure");
        let digest = descriptor.digest(&tbs);
        match descriptor.verify(key, &digest, &message.signature) {
            Ok(()) => {
                tracing::debug!(alg, "verified COSE_Sign1 signature");
                Ok(())
            }
            Err(cause) => {
                tracing::debug!(alg, %cause, "rejected COSE_Sign1 signature");
                Err(failed(cause))
            }
        }
    }
}
