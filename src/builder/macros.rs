//! Macros for declarative record type construction.

/// Declare a record type in one block.
///
/// Each field is `name: shape`, optionally followed by `=> marker`. A field
/// without a marker is required. Evaluates to
/// `Result<RecordTypeRef, BuildError>`.
///
/// # Example
///
/// ```
/// use recordkit::record_type;
/// use recordkit::{read_only, Args, Marker, Shape};
///
/// let person = record_type! {
///     Person {
///         name: Shape::Str,
///         score: Shape::Int => 100,
///         nickname: Shape::Str => Marker::Optional,
///     }
/// }
/// .unwrap();
///
/// let staff = record_type! {
///     Staff extends [person] {
///         badge: Shape::Int => read_only(0),
///     }
/// }
/// .unwrap();
///
/// let record = staff.construct(Args::new().kw("name", "ada")).unwrap();
/// assert_eq!(
///     record.serialize(),
///     serde_json::json!({"name": "ada", "score": 100, "badge": 0})
/// );
/// ```
#[macro_export]
macro_rules! record_type {
    (@marker) => {
        $crate::schema::Marker::Absent
    };

    (@marker $marker:expr) => {
        $marker
    };

    (
        $name:ident $(extends [$($base:expr),* $(,)?])? {
            $(
                $field:ident : $shape:expr $(=> $marker:expr)?
            ),* $(,)?
        }
    ) => {{
        let builder = $crate::record::RecordType::builder(stringify!($name));
        $($(let builder = builder.extends(&$base);)*)?
        $(
            let builder = builder.field(
                stringify!($field),
                $shape,
                $crate::record_type!(@marker $($marker)?),
            );
        )*
        builder.build()
    }};
}
