#![cfg(feature = "schema")]

use std::sync::Arc;

use tlcodec::deserialize::{Buffer, Result};
use tlcodec::{
    Constructor, Deserializable, Error, Flags, Identifiable, Object, RawObject, Registry, Schema,
    SchemaOptions, Serializable, WireValue, write_object,
};

const SAMPLE: &str = include_str!("../tl/sample.tl");

const CONTAINER: &str = "
message#5bb8e511 msg_id:long seqno:int bytes:int body:Object = Message;
msg_container#73f1f8dc messages:vector<%Message> = MessageContainer;
ping#7abe77ec ping_id:long = Ping;
";

fn registry(options: SchemaOptions) -> Registry {
    let schema = Schema::parse(SAMPLE).unwrap();
    let mut builder = Registry::builder();
    builder.register_schema(&schema, options).unwrap();
    builder.build()
}

fn raw<const N: usize>(registry: &Registry, name: &str, fields: [(&str, WireValue); N]) -> RawObject {
    RawObject::new(registry.definition(name).unwrap(), fields).unwrap()
}

#[test]
fn builtins_are_not_registered() {
    let registry = registry(SchemaOptions::default());
    assert_eq!(registry.id_for_name("boolTrue"), None);
    assert_eq!(registry.id_for_name("true"), None);
    assert_eq!(registry.id_for_name("help.getNearestDc"), None);
    assert_eq!(registry.id_for_name("message"), Some(0x5d1f3b02));
}

#[test]
fn two_flags_words() {
    let registry = registry(SchemaOptions::default());
    let peer = raw(&registry, "peerUser", [("user_id", WireValue::Long(42))]);
    let message = raw(
        &registry,
        "message",
        [
            ("out", WireValue::Bool(true)),
            ("id", WireValue::Int(7)),
            ("peer_id", WireValue::Object(Object::new(peer))),
            ("message", "hi".into()),
            ("offline", WireValue::Bool(true)),
            ("via_bot_id", WireValue::Long(99)),
        ],
    );
    assert_eq!(message.flags("flags"), Flags(0b10));
    assert_eq!(message.flags("flags2"), Flags(0b11));

    let object = Object::new(message.clone());
    let bytes = write_object(&object);
    assert_eq!(bytes.len(), 40);
    assert_eq!(bytes[4..8], 0b10u32.to_le_bytes());
    assert_eq!(bytes[28..32], 0b11u32.to_le_bytes());

    let decoded = registry.decode(&bytes).unwrap();
    assert_eq!(decoded, object);
    let decoded = decoded.downcast::<RawObject>().unwrap();
    assert_eq!(decoded.get("from_id"), None);
    assert_eq!(decoded.get("out"), Some(&WireValue::Bool(true)));
    assert_eq!(decoded.get("message").and_then(WireValue::as_str), Some("hi"));
    let peer = decoded.get("peer_id").and_then(WireValue::as_object).unwrap();
    assert_eq!(peer.qualified_name(), "peerUser");
}

#[test]
fn unused_flags_word_is_still_written() {
    let registry = registry(SchemaOptions::default());
    let draft = Object::new(raw(&registry, "draft", [("id", WireValue::Int(3))]));
    let bytes = write_object(&draft);
    assert_eq!(bytes[4..], [0, 0, 0, 0, 3, 0, 0, 0]);
    assert_eq!(registry.decode(&bytes).unwrap(), draft);
}

#[test]
fn optional_bool_and_vector() {
    let registry = registry(SchemaOptions::default());
    let chat = |id| WireValue::Object(Object::new(raw(&registry, "peerChat", [("chat_id", WireValue::Long(id))])));
    let reaction = Object::new(raw(
        &registry,
        "reaction",
        [
            ("chosen", WireValue::Bool(false)),
            ("count", WireValue::Int(2)),
            ("recent", WireValue::Vector(vec![chat(1), chat(2)])),
        ],
    ));
    let bytes = write_object(&reaction);
    // id, flags, Bool, count, vector header, two peers
    assert_eq!(bytes.len(), 4 + 4 + 4 + 4 + 8 + 2 * 12);
    assert_eq!(bytes[8..12], false.to_bytes());
    assert_eq!(registry.decode(&bytes).unwrap(), reaction);
}

#[test]
fn bare_vector_of_bare_constructors() {
    let registry = registry(SchemaOptions::default());
    let salt = |s: i64| {
        WireValue::Object(Object::new(raw(
            &registry,
            "future_salt",
            [
                ("valid_since", WireValue::Int(10)),
                ("valid_until", WireValue::Int(20)),
                ("salt", WireValue::Long(s)),
            ],
        )))
    };
    let salts = Object::new(raw(
        &registry,
        "future_salts",
        [
            ("req_msg_id", WireValue::Long(1)),
            ("now", WireValue::Int(15)),
            ("salts", WireValue::Vector(vec![salt(-1), salt(-2), salt(-3)])),
        ],
    ));
    let bytes = write_object(&salts);
    // No vector marker and no per-element constructor IDs.
    assert_eq!(bytes.len(), 4 + 8 + 4 + 4 + 3 * 16);
    assert_eq!(bytes[16..20], 3i32.to_le_bytes());

    let decoded = registry.decode(&bytes).unwrap();
    assert_eq!(decoded, salts);
}

#[test]
fn container_of_bare_messages() {
    let schema = Schema::parse(CONTAINER).unwrap();
    let mut builder = Registry::builder();
    builder.register_schema(&schema, SchemaOptions::default()).unwrap();
    let registry = builder.build();

    let ping = Object::new(raw(&registry, "ping", [("ping_id", WireValue::Long(77))]));
    let message = Object::new(raw(
        &registry,
        "message",
        [
            ("msg_id", WireValue::Long(5)),
            ("seqno", WireValue::Int(1)),
            ("bytes", WireValue::Int(12)),
            ("body", WireValue::Object(ping)),
        ],
    ));
    let container = Object::new(raw(
        &registry,
        "msg_container",
        [("messages", WireValue::Vector(vec![WireValue::Object(message)]))],
    ));

    let bytes = write_object(&container);
    // id, count, then the message body with no constructor ID in front.
    assert_eq!(bytes.len(), 4 + 4 + 8 + 4 + 4 + 12);
    assert_eq!(bytes[4..8], 1i32.to_le_bytes());
    assert_eq!(bytes[8..16], 5i64.to_le_bytes());
    assert_eq!(bytes[24..28], 0x7abe77ecu32.to_le_bytes());
    assert_eq!(registry.decode(&bytes).unwrap(), container);
}

#[test]
fn percent_type_needs_a_single_constructor() {
    let schema = Schema::parse(
        "
optionA#0000000a = Choice;
optionB#0000000b = Choice;
choices#0000000c items:vector<%Choice> = Choices;
",
    )
    .unwrap();
    let mut builder = Registry::builder();
    builder.register_schema(&schema, SchemaOptions::default()).unwrap();
    let registry = builder.build();

    let mut bytes = 0x0000000cu32.to_bytes();
    bytes.extend(1i32.to_bytes());
    bytes.extend(0i32.to_bytes());
    assert_eq!(registry.decode(&bytes), Err(Error::UnknownType { name: "%Choice".into() }));
}

#[test]
fn bare_type_must_be_registered() {
    let registry = registry(SchemaOptions::default());
    let mut bytes = 0xbadc0ffeu32.to_bytes();
    bytes.extend(1i32.to_bytes());
    bytes.extend([0u8; 16]);
    assert_eq!(registry.decode(&bytes), Err(Error::UnknownType { name: "missing_salt".into() }));
}

#[test]
fn boxed_field_checks_the_base_type() {
    let registry = registry(SchemaOptions::default());
    let mut bytes = 0x10a0c0e0u32.to_bytes();
    bytes.extend(0x2331b22du32.to_bytes());
    bytes.extend(5i64.to_bytes());
    assert_eq!(registry.decode(&bytes), Err(Error::UnexpectedConstructor { id: 0x2331b22d }));
}

#[test]
fn generic_query_holds_any_object() {
    let registry = registry(SchemaOptions { include_functions: true });
    let nearest = Object::new(raw(&registry, "help.getNearestDc", []));
    let invoke = Object::new(raw(
        &registry,
        "invokeWithLayer",
        [("layer", WireValue::Int(1)), ("query", WireValue::Object(nearest))],
    ));
    let bytes = write_object(&invoke);
    assert_eq!(bytes.len(), 12);
    let decoded = registry.decode(&bytes).unwrap();
    assert_eq!(decoded, invoke);
    assert_eq!(decoded.base_type(), "X");
}

#[test]
fn schema_objects_mix_with_typed_leaves() {
    #[derive(Clone, Debug, PartialEq)]
    struct Photo(i64);

    impl Identifiable for Photo {
        const CONSTRUCTOR_ID: u32 = 0x2331b22d;
    }
    impl Serializable for Photo {
        fn serialize(&self, buf: &mut impl Extend<u8>) {
            self.0.serialize(buf);
        }
    }
    impl Deserializable for Photo {
        fn deserialize(buf: Buffer) -> Result<Self> {
            i64::deserialize(buf).map(Self)
        }
    }
    impl Constructor for Photo {
        const NAME: &'static str = "photoEmpty";
        const BASE: &'static str = "Photo";
    }

    let schema = Schema::parse(SAMPLE).unwrap();
    let mut builder = Registry::builder();
    builder.register_type::<Photo>();
    let err = builder.register_schema(&schema, SchemaOptions::default()).unwrap_err();
    assert_eq!(err.id, 0x2331b22d);
    assert_eq!(err.existing, "photoEmpty");

    let schema = Schema {
        definitions: schema.definitions.into_iter().filter(|d| d.name != "photoEmpty").collect(),
        ..schema
    };
    let mut builder = Registry::builder();
    builder.register_type::<Photo>();
    builder.register_schema(&schema, SchemaOptions::default()).unwrap();
    let registry = builder.build();

    let photo = registry.decode(&write_object(&Object::new(Photo(8)))).unwrap();
    assert!(photo.is::<Photo>());
    let online = registry.decode(&[0x49, 0x39, 0xb9, 0xed, 1, 0, 0, 0]).unwrap();
    assert!(online.is::<RawObject>());
}

#[test]
fn definitions_are_shared() {
    let registry = registry(SchemaOptions::default());
    let def = registry.definition("userStatusOnline").unwrap();
    assert_eq!(def.id, 0xedb93949);
    let again = registry.definition("userStatusOnline").unwrap();
    assert!(Arc::ptr_eq(&def, &again));
}
