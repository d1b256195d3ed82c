/// Declares a row struct and derives its [`Record`](crate::projection::Record)
/// description from the field list.
///
/// Plain fields become one column each, named after the field, and must be
/// [`Leaf`](crate::projection::Leaf)s. `#[embed]` inlines another record's
/// columns in place; `#[union]` projects a [`Union`](crate::projection::Union).
///
/// ```ignore
/// kubequery::record! {
///     #[derive(Debug, Clone, Default)]
///     pub struct DaemonSetVolume {
///         #[embed] pub meta: NamespacedMeta,
///         #[embed] pub volume: VolumeSummary,
///         pub daemon_set_name: String,
///     }
/// }
/// ```
#[macro_export]
macro_rules! record {
    (@field $visitor:ident, [embed], $value:expr, $field:ident) => {
        $visitor.embed(&$value)?
    };
    (@field $visitor:ident, [union], $value:expr, $field:ident) => {
        $visitor.union(&$value)?
    };
    (@field $visitor:ident, [], $value:expr, $field:ident) => {
        $visitor.leaf(stringify!($field), &$value)?
    };
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$attr:ident])?
                $fvis:vis $field:ident : $ty:ty
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $( $fvis $field: $ty, )*
        }

        impl $crate::projection::Record for $name {
            fn visit<V: $crate::projection::Visitor>(
                &self,
                visitor: &mut V,
            ) -> ::std::result::Result<(), $crate::errors::ProjectionError> {
                $( $crate::record!(@field visitor, [$($attr)?], self.$field, $field); )*
                Ok(())
            }
        }
    };
}
