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

//! Signing and verification of single-signer [CBOR Object Signing and Encryption (COSE)][COSE]
//! messages (`COSE_Sign1`).
//!
//! Builds on the [`ciborium`](https://docs.rs/ciborium) crate for underlying [CBOR][CBOR] support,
//! and on the RustCrypto elliptic curve crates for the ECDSA algorithms in the default
//! [`Registry`].
//!
//! ## Usage
//!
//! ```
//! use cose_sign1::{iana, CoseSign1, Curve, Registry, Signer, SigningKey, Verifier};
//! use rand_core::OsRng;
//!
//! // Inputs.
//! let pt = b"This is the content";
//! let aad = b"this is additional data";
//! let registry = Registry::with_defaults();
//! let key = SigningKey::generate(Curve::P256, &mut OsRng);
//!
//! // Build and sign a `CoseSign1` object.
//! let mut sign1 = cose_sign1::CoseSign1Builder::new()
//!     .protected(cose_sign1::HeaderBuilder::new().key_id(b"11".to_vec()).build())
//!     .payload(pt.to_vec())
//!     .build();
//! Signer::new(&registry)
//!     .sign(&mut sign1, &key, iana::Algorithm::ES256, &mut OsRng, aad)
//!     .unwrap();
//!
//! // Serialize to bytes.
//! let sign1_data = sign1.serialize().unwrap();
//!
//! // At the receiving end, deserialize the bytes back to a `CoseSign1` object.
//! let mut sign1 = CoseSign1::deserialize(&sign1_data).unwrap();
//!
//! // Check the signature, which needs to have the same `aad` provided.
//! let verifier = Verifier::new(&registry);
//! assert!(verifier.verify(&sign1, &key.verifying_key(), aad).is_ok());
//!
//! // Changing an unprotected header leaves the signature valid.
//! sign1.set_unprotected(iana::HeaderParameter::ContentType, "text/plain");
//! assert!(verifier.verify(&sign1, &key.verifying_key(), aad).is_ok());
//!
//! // Providing a different `aad` means the signature won't validate.
//! assert!(verifier.verify(&sign1, &key.verifying_key(), b"not aad").is_err());
//!
//! // Changing a protected header invalidates the signature.
//! sign1.set_protected(iana::HeaderParameter::ContentType, "text/plain");
//! assert!(verifier.verify(&sign1, &key.verifying_key(), aad).is_err());
//! ```
//!
//! [COSE]: https://tools.ietf.org/html/rfc9052
//! [CBOR]: https://tools.ietf.org/html/rfc8949

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(rustdoc::broken_intra_doc_links)]
extern crate alloc;

/// Re-export of the `ciborium` crate used for underlying CBOR encoding.
pub use ciborium as cbor;

#[macro_use]
pub(crate) mod util;

#[macro_use]
pub mod iana;

pub mod codec;
pub use codec::CborOrdering;
mod common;
pub use common::*;
mod header;
pub use header::*;
mod key;
pub use key::*;
mod registry;
pub use registry::*;
mod sign1;
pub use sign1::*;
mod signer;
pub use signer::*;
mod verifier;
pub use verifier::*;
