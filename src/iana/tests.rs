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

#[test]
fn test_algorithm_conversion() {
    assert_eq!(Some(Algorithm::ES256), Algorithm::from_i64(-7));
    assert_eq!(Some(Algorithm::ES384), Algorithm::from_i64(-35));
    assert_eq!(Algorithm::ES256 as i64, -7);
    assert_eq!(i64::from(Algorithm::ES384), -35);
    assert_eq!(Algorithm::EdDSA.to_i64(), -8);
    assert_eq!(None, Algorithm::from_i64(1));
    assert_eq!(None, Algorithm::from_i64(-65538));
}

#[test]
fn test_header_param_conversion() {
    assert_eq!(Some(HeaderParameter::Alg), HeaderParameter::from_i64(1));
    assert_eq!(Some(HeaderParameter::Kid), HeaderParameter::from_i64(4));
    assert_eq!(None, HeaderParameter::from_i64(-1));
    assert_eq!(None, HeaderParameter::from_i64(5));
}

#[test]
fn test_cbor_tag() {
    assert_eq!(CborTag::CoseSign1.to_i64(), 18);
    assert_eq!(Some(CborTag::CoseSign1), CborTag::from_i64(18));
    assert_eq!(None, CborTag::from_i64(98));
}
