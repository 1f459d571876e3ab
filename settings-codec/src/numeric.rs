//! Integer and floating point codecs.

use std::fmt;
use std::marker::PhantomData;

use crate::{Codec, CodecError, CodecResult, SettingValue};

/// Decimal integer codec, range-checked against the width of `T`.
pub struct Integer<T>(PhantomData<fn() -> T>);

/// Floating point codec; formats the shortest decimal that parses back to the
/// same value.
pub struct Float<T>(PhantomData<fn() -> T>);

macro_rules! marker_impls {
    ($name:ident) => {
        impl<T> $name<T> {
            /// Creates the codec.
            #[must_use]
            pub const fn new() -> Self {
                Self(PhantomData)
            }
        }

        impl<T> Default for $name<T> {
            fn default() -> Self {
                Self::new()
            }
        }

        impl<T> Clone for $name<T> {
            fn clone(&self) -> Self {
                *self
            }
        }

        impl<T> Copy for $name<T> {}

        impl<T> fmt::Debug for $name<T> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(concat!(stringify!($name), "<", "..", ">"))
            }
        }
    };
}

marker_impls!(Integer);
marker_impls!(Float);

macro_rules! number_codecs {
    ($codec:ident: $($ty:ty),+ $(,)?) => {
        $(
            impl Codec for $codec<$ty> {
                type Value = $ty;

                fn type_name(&self) -> &'static str {
                    stringify!($ty)
                }

                fn parse(&self, input: &str) -> CodecResult<$ty> {
                    input
                        .parse::<$ty>()
                        .map_err(|err| CodecError::decode(input, stringify!($ty), err))
                }

                fn format(&self, value: &$ty) -> String {
                    value.to_string()
                }
            }

            impl SettingValue for $ty {
                type Codec = $codec<$ty>;
            }
        )+
    };
}

number_codecs!(Integer: i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);
number_codecs!(Float: f32, f64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers_respect_width() {
        assert_eq!(Integer::<i8>::new().parse("-128").unwrap(), -128);
        let err = Integer::<i8>::new().parse("128").expect_err("out of range");
        assert!(matches!(err, CodecError::Decode { type_name: "i8", .. }));

        assert_eq!(Integer::<u16>::new().parse("65535").unwrap(), u16::MAX);
        assert!(Integer::<u16>::new().parse("-1").is_err());
        assert_eq!(Integer::<u64>::new().format(&u64::MAX), "18446744073709551615");
    }

    #[test]
    fn integer_rejects_garbage() {
        let err = Integer::<i32>::new().parse("notanumber").unwrap_err();
        assert_eq!(err.input(), "notanumber");
        assert_eq!(err.type_name(), "i32");
        assert!(Integer::<i64>::new().parse("").is_err());
        assert!(Integer::<i64>::new().parse(" 1").is_err());
    }

    #[test]
    fn floats_format_shortest_form() {
        let codec = Float::<f64>::new();
        assert_eq!(codec.format(&0.1), "0.1");
        assert_eq!(codec.format(&3.0), "3");
        assert_eq!(codec.format(&1e21), "1000000000000000000000");

        let parsed = codec.parse("2.5e-3").unwrap();
        assert_eq!(codec.parse(&codec.format(&parsed)).unwrap(), parsed);

        let narrow = Float::<f32>::new();
        assert_eq!(narrow.format(&narrow.parse("0.1").unwrap()), "0.1");
        assert!(narrow.parse("one").is_err());
    }
}
