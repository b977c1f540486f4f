#![cfg(feature = "gzip")]

mod common;

use common::*;
use tlcodec::gzip::GzipPacked;
use tlcodec::{Constructor, DecodeConfig, Error, Registry, Serializable, write_object};

#[test]
fn packed_objects_are_unwrapped() {
    let registry = Registry::with(register_all);
    let list = StatusList {
        statuses: (0..200).map(|i| UserStatusOffline { was_online: i }.into_object()).collect(),
    }
    .into_object();

    let packed = GzipPacked::compress(&list).unwrap();
    let bytes = write_object(&packed.into_object());
    assert_eq!(bytes[..4], tlcodec::GZIP_PACKED_ID.to_le_bytes());
    assert!(bytes.len() < write_object(&list).len());

    assert_eq!(registry.decode(&bytes).unwrap(), list);
}

#[test]
fn packed_objects_count_towards_depth() {
    let registry = Registry::with(register_all);
    let packed = GzipPacked::compress(&UserStatusEmpty.into_object()).unwrap();
    let bytes = write_object(&packed.into_object());

    let config = DecodeConfig { max_depth: 1, ..Default::default() };
    assert_eq!(registry.decode_with(&bytes, config), Err(Error::MaxDepthExceeded { limit: 1 }));
}

#[test]
fn corrupt_payload_is_malformed() {
    let registry = Registry::with(register_all);
    let mut bytes = tlcodec::GZIP_PACKED_ID.to_bytes();
    bytes.extend(b"not gzip".to_vec().to_bytes());
    assert_eq!(registry.decode(&bytes), Err(Error::MalformedGzip));
}

#[test]
fn inflated_size_is_capped() {
    let registry = Registry::with(register_all);
    let list = StatusList {
        statuses: (0..200).map(|i| UserStatusOffline { was_online: i }.into_object()).collect(),
    }
    .into_object();
    let inflated = write_object(&list).len();
    let bytes = write_object(&GzipPacked::compress(&list).unwrap().into_object());

    let tight = DecodeConfig { max_unpacked_len: inflated - 1, ..Default::default() };
    assert_eq!(registry.decode_with(&bytes, tight), Err(Error::MalformedGzip));
    let exact = DecodeConfig { max_unpacked_len: inflated, ..Default::default() };
    assert_eq!(registry.decode_with(&bytes, exact).unwrap(), list);
}
