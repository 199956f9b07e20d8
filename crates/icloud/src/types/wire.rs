//! Wire-string enum plumbing.

use std::fmt;

use super::ParseEnumError;

/// Generates the string table, parsing, and serde glue for a wire enum.
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident as $kind:literal {
            $(
                $(#[$vmeta:meta])*
                $variant:ident => $wire:literal,
            )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $(
                $(#[$vmeta])*
                $variant,
            )+
        }

        impl $name {
            /// All values in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Returns the canonical wire string.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $wire,)+
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = $crate::types::ParseEnumError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($wire => Ok($name::$variant),)+
                    _ => Err($crate::types::ParseEnumError::new($kind, s)),
                }
            }
        }

        impl ::serde::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: ::serde::Serializer,
            {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> ::serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: ::serde::Deserializer<'de>,
            {
                deserializer.deserialize_str(
                    $crate::types::wire::WireStrVisitor::<$name>::new($kind),
                )
            }
        }
    };
}

pub(crate) use wire_enum;

/// Visitor shared by all wire enums; borrows the string when it can.
pub(crate) struct WireStrVisitor<T> {
    kind: &'static str,
    _marker: std::marker::PhantomData<T>,
}

impl<T> WireStrVisitor<T> {
    pub(crate) fn new(kind: &'static str) -> Self {
        Self {
            kind,
            _marker: std::marker::PhantomData,
        }
    }
}

impl<T> serde::de::Visitor<'_> for WireStrVisitor<T>
where
    T: std::str::FromStr<Err = ParseEnumError>,
{
    type Value = T;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "a {} string", self.kind)
    }

    fn visit_str<E>(self, v: &str) -> Result<T, E>
    where
        E: serde::de::Error,
    {
        v.parse().map_err(E::custom)
    }
}
