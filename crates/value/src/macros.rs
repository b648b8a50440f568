/// Construct a [`crate::FieldValue`] from a literal. Arrays use `[...]`, maps
/// use `{"key" => value, ...}` and go through marker detection. Nested
/// negative numbers need parentheses: `val!([(-1), 2])`.
#[macro_export]
macro_rules! val {
    (null) => {
        $crate::FieldValue::Null
    };
    ([ $($elem:tt),* $(,)? ]) => {
        $crate::FieldValue::Array(vec![$($crate::val!($elem)),*])
    };
    ({ $($key:literal => $value:tt),* $(,)? }) => {
        $crate::FieldValue::from_fields::<&str>([$(($key, $crate::val!($value))),*])
    };
    ($other:expr) => {
        $crate::FieldValue::from($other)
    };
}
