//! Macros for declaring compile-time state sets.

/// Declare a state enum together with its `State` implementation and a
/// conversion into `StateName`.
///
/// Variants convert to their identifier, upper-cased, so handlers may return
/// either the enum or a string and reach the same registry entry.
///
/// # Example
///
/// ```
/// use cargofsm::core::{State, StateName};
/// use cargofsm::state_enum;
///
/// state_enum! {
///     pub enum Fly {
///         Resting,
///         Eating,
///         Dead,
///     }
///     end: [Dead]
/// }
///
/// assert_eq!(StateName::from(Fly::Eating), StateName::new("eating"));
/// assert!(Fly::Dead.is_end());
/// ```
#[macro_export]
macro_rules! state_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
            ),* $(,)?
        }

        $(end: [$($end:ident),* $(,)?])?
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $name {
            /// Every variant in declaration order.
            #[allow(dead_code)]
            pub const ALL: &'static [$name] = &[$(Self::$variant),*];
        }

        impl $crate::core::State for $name {
            fn name(&self) -> &str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }

            fn is_end(&self) -> bool {
                match self {
                    $($(Self::$end => true,)*)?
                    #[allow(unreachable_patterns)]
                    _ => false,
                }
            }
        }

        impl ::std::convert::From<$name> for $crate::core::StateName {
            fn from(state: $name) -> Self {
                $crate::core::State::state_name(&state)
            }
        }

        impl ::std::convert::From<&$name> for $crate::core::StateName {
            fn from(state: &$name) -> Self {
                $crate::core::State::state_name(state)
            }
        }
    };
}
