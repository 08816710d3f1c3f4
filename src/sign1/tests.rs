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
use crate::{util::expect_err, CborSerializable, HeaderBuilder};
use alloc::vec;

#[test]
fn test_cose_sign1_encode() {
    let tests = vec![
        (
            CoseSign1::default(),
            concat!(
                "d2", // tag
                "84", // 4-arr
                "40", // 0-bstr
                "a0", // 0-map
                "f6", // nil
                "40", // 0-bstr
            ),
        ),
        (
            CoseSign1Builder::new()
                .protected(
                    HeaderBuilder::new()
                        .algorithm(iana::Algorithm::ES256)
                        .build(),
                )
                .unprotected(HeaderBuilder::new().key_id(b"11".to_vec()).build())
                .payload(b"ab".to_vec())
                .signature(vec![1, 2, 3])
                .build(),
            concat!(
                "d2", // tag
                "84", // 4-arr
                "43", "a10126", // 3-bstr holding {1: -7}
                "a1", "04", "42", "3131", // {4: h'3131'}
                "42", "6162", // 2-bstr
                "43", "010203", // 3-bstr
            ),
        ),
        (
            CoseSign1Builder::new()
                .protected(
                    HeaderBuilder::new()
                        .algorithm(iana::Algorithm::ES384)
                        .build(),
                )
                .signature(vec![1])
                .build(),
            concat!(
                "d2", // tag
                "84", // 4-arr
                "44", "a1013822", // 4-bstr holding {1: -35}
                "a0", // 0-map
                "f6", // nil
                "41", "01", // 1-bstr
            ),
        ),
    ];
    for (i, (msg, want_hex)) in tests.iter().enumerate() {
        let got = msg.serialize().unwrap();
        assert_eq!(*want_hex, hex::encode(&got), "case {}", i);

        let mut got = CoseSign1::deserialize(&got).unwrap();
        assert!(got.protected.original_data.is_some(), "case {}", i);
        got.protected.original_data = None;
        assert_eq!(*msg, got, "case {}", i);
    }
}

#[test]
fn test_cose_sign1_untagged() {
    let msg = CoseSign1Builder::new()
        .payload(b"ab".to_vec())
        .signature(vec![1, 2, 3])
        .build();
    let data = msg.clone().to_vec().unwrap();
    assert_eq!(
        hex::encode(&data),
        concat!("84", "40", "a0", "42", "6162", "43", "010203")
    );

    let mut got = CoseSign1::from_slice(&data).unwrap();
    got.protected.original_data = None;
    assert_eq!(msg, got);
}

#[test]
fn test_cose_sign1_keeps_protected_bytes() {
    // Protected map {1: -7} with a non-canonical (two byte) encoding of the algorithm.
    let data = hex::decode(concat!(
        "d2", // tag
        "84", // 4-arr
        "44", "a1013806", // 4-bstr holding {1: -7}
        "a0", // 0-map
        "41", "00", // 1-bstr
        "40", // 0-bstr
    ))
    .unwrap();
    let msg = CoseSign1::deserialize(&data).unwrap();
    assert_eq!(msg.protected.header.algorithm().unwrap(), Some(-7));
    assert_eq!(
        msg.protected.original_data,
        Some(hex::decode("a1013806").unwrap())
    );
    assert_eq!(msg.serialize().unwrap(), data);
    assert_eq!(
        msg.sig_structure(b"").unwrap().body_protected,
        hex::decode("a1013806").unwrap()
    );
}

#[test]
fn test_cose_sign1_decode_fail() {
    let tests = vec![
        (
            concat!(
                "d2", // tag
                "83", // 3-arr
                "40", "a0", "f6",
            ),
            "expected array with 4 items",
        ),
        (
            concat!(
                "d2", // tag
                "85", // 5-arr
                "40", "a0", "f6", "40", "40",
            ),
            "expected array with 4 items",
        ),
        (
            concat!(
                "d2", // tag
                "a0", // 0-map
            ),
            "expected array",
        ),
        (
            concat!(
                "84", // 4-arr
                "40", "a0", "f6", "40",
            ),
            "missing tag",
        ),
        (
            concat!(
                "d1", // tag 17
                "84", // 4-arr
                "40", "a0", "f6", "40",
            ),
            "unexpected tag",
        ),
        (
            concat!(
                "d2", // tag
                "84", // 4-arr
                "a0", // 0-map instead of bstr
                "a0", "f6", "40",
            ),
            "protected header is not a bstr",
        ),
        (
            concat!(
                "d2", // tag
                "84", // 4-arr
                "41", "01", // 1-bstr holding an int
                "a0", "f6", "40",
            ),
            "protected header is not an encoded map",
        ),
        (
            concat!(
                "d2", // tag
                "84", // 4-arr
                "48", "a101654553323536", // {1: "ES256"}
                "a0", "f6", "40",
            ),
            "protected algorithm is not a signed integer",
        ),
        (
            concat!(
                "d2", // tag
                "84", // 4-arr
                "4b", "a1013bffffffffffffffff", // {1: -2^64}
                "a0", "f6", "40",
            ),
            "protected algorithm is not a signed integer",
        ),
        (
            concat!(
                "d2", // tag
                "84", // 4-arr
                "40", //
                "40", // bstr instead of map
                "f6", "40",
            ),
            "unprotected header is not a map",
        ),
        (
            concat!(
                "d2", // tag
                "84", // 4-arr
                "40", //
                "a1", "05", "a2", "0100", "0101", // {5: {1: 0, 1: 1}}
                "f6", "40",
            ),
            "invalid unprotected header",
        ),
        (
            concat!(
                "d2", // tag
                "84", // 4-arr
                "40", //
                "a2", "04", "40", "04", "40", // {4: h'', 4: h''}
                "f6", "40",
            ),
            "invalid unprotected header",
        ),
        (
            concat!(
                "d2", // tag
                "84", // 4-arr
                "40", "a0", //
                "01", // int instead of bstr / nil
                "40",
            ),
            "payload is not a bstr or nil",
        ),
        (
            concat!(
                "d2", // tag
                "84", // 4-arr
                "40", "a0", "f6", //
                "f6", // nil instead of bstr
            ),
            "signature is not a bstr",
        ),
    ];
    for (data_hex, err_msg) in tests.iter() {
        let data = hex::decode(data_hex).unwrap();
        let result = CoseSign1::deserialize(&data);
        expect_err(result, "malformed COSE_Sign1 message");
        let result = CoseSign1::deserialize(&data);
        expect_err(result, err_msg);
    }
}

#[test]
fn test_cose_sign1_decode_truncated() {
    let data = hex::decode("d28440a0f6").unwrap();
    let result = CoseSign1::deserialize(&data);
    expect_err(result, "decode CBOR failure");

    let data = hex::decode("d28440a0f64000").unwrap();
    let result = CoseSign1::deserialize(&data);
    expect_err(result, "extraneous data");
}

#[test]
fn test_set_protected_drops_snapshot() {
    let data = hex::decode(concat!("d2", "84", "43", "a10126", "a0", "f6", "40")).unwrap();
    let mut msg = CoseSign1::deserialize(&data).unwrap();
    assert!(msg.protected.original_data.is_some());

    msg.set_protected(iana::HeaderParameter::ContentType, 0);
    assert!(msg.protected.original_data.is_none());
    assert_eq!(
        msg.protected_value(iana::HeaderParameter::ContentType),
        Some(&Value::from(0))
    );
    assert_eq!(
        hex::encode(msg.serialize().unwrap()),
        concat!("d2", "84", "45", "a201260300", "a0", "f6", "40")
    );
}

#[test]
fn test_cose_sign1_nested_header_round_trip() {
    let mut msg = CoseSign1Builder::new()
        .payload(b"ab".to_vec())
        .signature(vec![1, 2, 3])
        .build();
    msg.set_unprotected(
        5i64,
        Value::Map(vec![
            (Value::from(2), Value::from(0)),
            (Value::from(1), Value::from(1)),
        ]),
    );
    let data = msg.serialize().unwrap();
    assert_eq!(
        hex::encode(&data),
        concat!(
            "d2", // tag
            "84", // 4-arr
            "40", // 0-bstr
            "a1", "05", "a2", "0101", "0200", // {5: {1: 1, 2: 0}}
            "42", "6162", // 2-bstr
            "43", "010203", // 3-bstr
        )
    );

    let mut got = CoseSign1::deserialize(&data).unwrap();
    got.protected.original_data = None;
    assert_eq!(got, msg);
    assert_eq!(got.serialize().unwrap(), data);
}

#[test]
fn test_unprotected_accessors() {
    let mut msg = CoseSign1::new();
    assert!(msg.unprotected_value(iana::HeaderParameter::Kid).is_none());
    msg.set_unprotected(iana::HeaderParameter::Kid, b"11".to_vec());
    assert_eq!(
        msg.unprotected_value(iana::HeaderParameter::Kid),
        Some(&Value::Bytes(b"11".to_vec()))
    );
    msg.set_unprotected("x", "y");
    assert_eq!(msg.unprotected.len(), 2);
    assert!(msg.protected.header.is_empty());
}

#[test]
fn test_is_signed() {
    let mut msg = CoseSign1::new();
    assert!(!msg.is_signed());
    msg.signature = vec![1];
    assert!(!msg.is_signed());
    msg.protected.original_data = Some(vec![]);
    assert!(msg.is_signed());
}

#[test]
fn test_sig_structure_encode() {
    let msg = CoseSign1Builder::new()
        .protected(
            HeaderBuilder::new()
                .algorithm(iana::Algorithm::ES256)
                .build(),
        )
        .payload(b"ab".to_vec())
        .build();
    let tbs = msg.sig_structure(b"aad").unwrap();
    assert_eq!(
        hex::encode(tbs.clone().to_vec().unwrap()),
        concat!(
            "84", // 4-arr
            "6a", "5369676e617475726531", // "Signature1"
            "43", "a10126", // protected
            "43", "616164", // external aad
            "42", "6162", // payload
        )
    );
    assert_eq!(SigStructure::from_slice(&tbs.clone().to_vec().unwrap()).unwrap(), tbs);

    // Absent payloads and empty protected headers contribute zero-length strings.
    let tbs = CoseSign1::new().sig_structure(b"").unwrap();
    assert_eq!(
        hex::encode(tbs.to_vec().unwrap()),
        concat!("84", "6a", "5369676e617475726531", "40", "40", "40")
    );

    let tbs = CoseSign1::new().detached_sig_structure(b"", b"ab").unwrap();
    assert_eq!(tbs.payload, b"ab".to_vec());
}

#[test]
fn test_sig_structure_decode_fail() {
    let tests = vec![
        (
            concat!("83", "6a", "5369676e617475726531", "40", "40"),
            "expected array with 4 items",
        ),
        (
            concat!("84", "6a", "5369676e617475726530", "40", "40", "40"),
            "expected \"Signature1\"",
        ),
        (concat!("84", "01", "40", "40", "40"), "expected tstr"),
        (
            concat!("84", "6a", "5369676e617475726531", "40", "40", "f6"),
            "expected bstr",
        ),
    ];
    for (data_hex, err_msg) in tests.iter() {
        let data = hex::decode(data_hex).unwrap();
        let result = SigStructure::from_slice(&data);
        expect_err(result, err_msg);
    }
}
