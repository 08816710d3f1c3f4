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

use super::*;
use crate::util::expect_err;
use alloc::vec;
use rand_core::OsRng;

#[test]
fn test_generate() {
    for curve in [Curve::P256, Curve::P384] {
        let key = SigningKey::generate(curve, &mut OsRng);
        assert_eq!(key.curve(), curve);
        assert_eq!(key.verifying_key().curve(), curve);

        let other = SigningKey::generate(curve, &mut OsRng);
        assert_ne!(key.verifying_key(), other.verifying_key());
    }
}

#[test]
fn test_sec1_round_trip() {
    let tests = vec![(Curve::P256, 65), (Curve::P384, 97)];
    for (curve, len) in tests {
        let public = SigningKey::generate(curve, &mut OsRng).verifying_key();
        let data = public.to_sec1_bytes();
        assert_eq!(data.len(), len);
        assert_eq!(data[0], 0x04);
        assert_eq!(VerifyingKey::from_sec1_bytes(curve, &data).unwrap(), public);
    }
}

#[test]
fn test_sec1_decode_fail() {
    let p256_point = SigningKey::generate(Curve::P256, &mut OsRng)
        .verifying_key()
        .to_sec1_bytes();
    let tests = vec![
        (Curve::P256, vec![]),
        (Curve::P256, vec![0x04; 65]),
        (Curve::P256, p256_point[..64].to_vec()),
        (Curve::P384, p256_point),
    ];
    for (curve, data) in tests {
        expect_err(
            VerifyingKey::from_sec1_bytes(curve, &data),
            "invalid key encoding",
        );
    }
}

#[test]
fn test_signature_len() {
    assert_eq!(Curve::P256.signature_len(), 64);
    assert_eq!(Curve::P384.signature_len(), 96);
}
