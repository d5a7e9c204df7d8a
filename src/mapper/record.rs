//! Record mappings
//!
//! [`record!`](crate::record) declares a plain struct together with its
//! [`ToValue`](crate::ToValue) and [`FromValue`](crate::FromValue) impls. Each
//! field maps to a struct member named after the field, or after the literal
//! given with `=>`:
//!
//! ```
//! xmlrpc_codec::record! {
//!     #[derive(Debug, Default)]
//!     pub struct Person {
//!         pub name: String => "Name",
//!         pub age: i32 => "Age",
//!         pub email: String,
//!     }
//! }
//! ```
//!
//! Encoding emits members in declaration order. Decoding assigns members by
//! name in whatever order they arrive, leaves absent fields untouched and
//! rejects names the record does not declare.

/// Declare a struct that maps to an XML-RPC `<struct>`
#[macro_export]
macro_rules! record {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$fmeta:meta])*
                $fvis:vis $field:ident : $ty:ty $(=> $wire:literal)?
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $(
                $(#[$fmeta])*
                $fvis $field: $ty,
            )*
        }

        impl $crate::ToValue for $name {
            fn to_value(&self) -> $crate::Value {
                $crate::Value::Struct(::std::vec![
                    $(
                        $crate::Member::new(
                            $crate::__wire_name!($field $(=> $wire)?),
                            $crate::ToValue::to_value(&self.$field),
                        ),
                    )*
                ])
            }
        }

        impl $crate::FromValue for $name {
            fn from_value(&mut self, value: &$crate::Value) -> $crate::Result<()> {
                $crate::mapper::project_record(value, stringify!($name), |wire, member| {
                    $(
                        if wire == $crate::__wire_name!($field $(=> $wire)?) {
                            return $crate::mapper::project(member, &mut self.$field).map(|()| true);
                        }
                    )*
                    let _ = (wire, member);
                    ::std::result::Result::Ok(false)
                })
            }
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __wire_name {
    ($field:ident) => {
        stringify!($field)
    };
    ($field:ident => $wire:literal) => {
        $wire
    };
}
