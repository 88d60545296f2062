// ==============================================================================
// Scalar and Well-Known Type Mapping
// ==============================================================================
//
// Protobuf scalars and a handful of well-known message types map onto Swagger
// primitives. Anything not listed here is a "rich" type: a message or enum
// that is emitted as a `$ref` into `#/definitions`. Keeping the well-known
// types in the same table means rich-type detection is a single lookup.
//
// 64-bit integers are strings because the protobuf JSON mapping encodes them
// as strings.

/// A Swagger primitive: `type` plus an optional `format`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Primitive {
    pub kind: &'static str,
    pub format: Option<&'static str>,
}

const fn primitive(kind: &'static str, format: Option<&'static str>) -> Primitive {
    Primitive { kind, format }
}

/// Look up the Swagger primitive for a protobuf type name, or `None` for a
/// rich (message/enum) type.
///
/// A leading `.` (fully-qualified spelling) is ignored.
pub fn lookup(type_name: &str) -> Option<Primitive> {
    let name = type_name.strip_prefix('.').unwrap_or(type_name);
    let mapped = match name {
        "double" => primitive("number", Some("double")),
        "float" => primitive("number", Some("float")),
        "int32" | "sint32" | "sfixed32" => primitive("integer", Some("int32")),
        "uint32" | "fixed32" => primitive("integer", Some("int64")),
        "int64" | "sint64" | "sfixed64" => primitive("string", Some("int64")),
        "uint64" | "fixed64" => primitive("string", Some("uint64")),
        "bool" => primitive("boolean", None),
        "string" => primitive("string", None),
        "bytes" => primitive("string", Some("byte")),

        "google.protobuf.Timestamp" => primitive("string", Some("date-time")),

        "google.protobuf.DoubleValue" => primitive("number", Some("double")),
        "google.protobuf.FloatValue" => primitive("number", Some("float")),
        "google.protobuf.Int64Value" => primitive("string", Some("int64")),
        "google.protobuf.UInt64Value" => primitive("string", Some("uint64")),
        "google.protobuf.Int32Value" => primitive("integer", Some("int32")),
        "google.protobuf.UInt32Value" => primitive("integer", Some("int64")),
        "google.protobuf.BoolValue" => primitive("boolean", None),
        "google.protobuf.StringValue" => primitive("string", None),
        "google.protobuf.BytesValue" => primitive("string", Some("byte")),

        _ => return None,
    };
    Some(mapped)
}

/// Qualify a rich type name with `package` unless it is already qualified.
///
/// A name containing a `.` is taken as qualified; a leading `.` (protobuf's
/// absolute-name marker) is dropped. An empty package leaves the name bare.
pub fn qualify(type_name: &str, package: &str) -> String {
    if let Some(absolute) = type_name.strip_prefix('.') {
        return absolute.to_string();
    }
    if type_name.contains('.') || package.is_empty() {
        return type_name.to_string();
    }
    format!("{package}.{type_name}")
}
