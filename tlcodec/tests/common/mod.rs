//! Hand-written leaf types shaped like generated code, for the object tests.
//!
//! ```text
//! userStatusEmpty#9d05049 = UserStatus;
//! userStatusOnline#edb93949 expires:int = UserStatus;
//! userStatusOffline#8c703f was_online:int = UserStatus;
//! userStatusRecently#7b197dc8 flags:# by_me:flags.0?true = UserStatus;
//! userStatusLastWeek#541a1d1a flags:# by_me:flags.0?true = UserStatus;
//! userStatusLastMonth#65899777 flags:# by_me:flags.0?true = UserStatus;
//! statusList#5ac1a2e3 statuses:Vector<UserStatus> = StatusList;
//! ```

#![allow(dead_code)]

use tlcodec::deserialize::{Buffer, Result};
use tlcodec::flags::read_flag_only;
use tlcodec::{
    Constructor, Deserializable, Flags, FlagsWriter, Identifiable, Object, RegistryBuilder,
    Serializable,
};

macro_rules! empty_status {
    ($name:ident, $id:literal, $tl:literal) => {
        #[derive(Clone, Debug, PartialEq)]
        pub struct $name;

        impl Identifiable for $name {
            const CONSTRUCTOR_ID: u32 = $id;
        }
        impl Serializable for $name {
            fn serialize(&self, _buf: &mut impl Extend<u8>) {}
        }
        impl Deserializable for $name {
            fn deserialize(_buf: Buffer) -> Result<Self> {
                Ok(Self)
            }
        }
        impl Constructor for $name {
            const NAME: &'static str = $tl;
            const BASE: &'static str = "UserStatus";
        }
    };
}

macro_rules! dated_status {
    ($name:ident, $field:ident, $id:literal, $tl:literal) => {
        #[derive(Clone, Debug, PartialEq)]
        pub struct $name {
            pub $field: i32,
        }

        impl Identifiable for $name {
            const CONSTRUCTOR_ID: u32 = $id;
        }
        impl Serializable for $name {
            fn serialize(&self, buf: &mut impl Extend<u8>) {
                self.$field.serialize(buf);
            }
        }
        impl Deserializable for $name {
            fn deserialize(buf: Buffer) -> Result<Self> {
                Ok(Self { $field: i32::deserialize(buf)? })
            }
        }
        impl Constructor for $name {
            const NAME: &'static str = $tl;
            const BASE: &'static str = "UserStatus";
        }
    };
}

macro_rules! approximate_status {
    ($name:ident, $id:literal, $tl:literal) => {
        #[derive(Clone, Debug, Default, PartialEq)]
        pub struct $name {
            pub by_me: bool,
        }

        impl Identifiable for $name {
            const CONSTRUCTOR_ID: u32 = $id;
        }
        impl Serializable for $name {
            fn serialize(&self, buf: &mut impl Extend<u8>) {
                FlagsWriter::new().flag_only(0, self.by_me).finish(buf);
            }
        }
        impl Deserializable for $name {
            fn deserialize(buf: Buffer) -> Result<Self> {
                let flags = Flags::deserialize(buf)?;
                Ok(Self { by_me: read_flag_only(flags, 0) })
            }
        }
        impl Constructor for $name {
            const NAME: &'static str = $tl;
            const BASE: &'static str = "UserStatus";
        }
    };
}

empty_status!(UserStatusEmpty, 0x09d05049, "userStatusEmpty");
dated_status!(UserStatusOnline, expires, 0xedb93949, "userStatusOnline");
dated_status!(UserStatusOffline, was_online, 0x008c703f, "userStatusOffline");
approximate_status!(UserStatusRecently, 0x7b197dc8, "userStatusRecently");
approximate_status!(UserStatusLastWeek, 0x541a1d1a, "userStatusLastWeek");
approximate_status!(UserStatusLastMonth, 0x65899777, "userStatusLastMonth");

/// A constructor with a `Vector<UserStatus>` field.
#[derive(Clone, Debug, PartialEq)]
pub struct StatusList {
    pub statuses: Vec<Object>,
}

impl Identifiable for StatusList {
    const CONSTRUCTOR_ID: u32 = 0x5ac1a2e3;
}

impl Serializable for StatusList {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        self.statuses.serialize(buf);
    }
}

impl Deserializable for StatusList {
    fn deserialize(buf: Buffer) -> Result<Self> {
        Ok(Self { statuses: Vec::<Object>::deserialize(buf)? })
    }
}

impl Constructor for StatusList {
    const NAME: &'static str = "statusList";
    const BASE: &'static str = "StatusList";
}

/// What generated code hands to `Registry::with`.
pub fn register_all(registry: &mut RegistryBuilder) {
    registry
        .register_type::<UserStatusEmpty>()
        .register_type::<UserStatusOnline>()
        .register_type::<UserStatusOffline>()
        .register_type::<UserStatusRecently>()
        .register_type::<UserStatusLastWeek>()
        .register_type::<UserStatusLastMonth>()
        .register_type::<StatusList>();
}

