//! Helper macro generating `thiserror` port error enums with snake_case
//! constructors for each variant.

macro_rules! define_port_error {
    (@ctor $variant:ident) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@ctor $variant:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        define_port_error!(@ctor_impl $variant () () $( $field : $ty, )*);
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) ) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]($($params)*) -> Self {
                Self::$variant { $($inits)* }
            }
        }
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) $field:ident : $ty:ty, $($rest:tt)*) => {
        define_port_error!(
            @ctor_impl
            $variant
            ($($params)* $field: impl Into<$ty>,)
            ($($inits)* $field: $field.into(),)
            $($rest)*
        );
    };
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $($field:ident : $ty:ty),* $(,)? } )? => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant $( { $($field : $ty),* } )?,
            )*
        }

        impl $name {
            $(
                define_port_error!(@ctor $variant $( { $($field : $ty),* } )?);
            )*
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    //! Regression coverage for generated constructors and messages.
    define_port_error! {
        pub enum InventoryPortError {
            Unreachable { message: String } => "inventory backend unreachable: {message}",
            Exhausted { available: i32 } => "only {available} units left",
            Rejected { message: String, attempts: u32 } => "rejected: {message} after {attempts} attempts",
        }
    }

    #[test]
    fn constructors_accept_str_for_string_fields() {
        let err = InventoryPortError::unreachable("timeout");
        assert_eq!(err.to_string(), "inventory backend unreachable: timeout");
    }

    #[test]
    fn constructors_preserve_non_string_types() {
        let err = InventoryPortError::exhausted(3_i32);
        assert_eq!(err, InventoryPortError::Exhausted { available: 3 });
        assert_eq!(err.to_string(), "only 3 units left");
    }

    #[test]
    fn constructors_support_mixed_fields() {
        let err = InventoryPortError::rejected("locked", 2_u32);
        assert_eq!(err.to_string(), "rejected: locked after 2 attempts");
    }
}
