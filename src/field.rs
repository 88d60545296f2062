// ==============================================================================
// Field Translation
// ==============================================================================
//
// One protobuf field becomes one property schema. The shape depends on the
// field kind:
//
//   scalar             {type, format, title, description, example}
//   message / enum     {$ref, title, description, example}
//   repeated X         {type: array, title, description, format, items: X'}
//                      where X' is the bare item schema plus the example
//   map<K, scalar>     {type: object, additionalProperties: {type}}
//   map<K, message>    {type: object}
//
// Every top-level property carries `x-order`, its position in the message's
// flattened field list. Item schemas never do.

use crate::doc_comments::{description, title_and_example};
use crate::model::proto::Field;
use crate::model::swagger::Schema;
use crate::types;

/// How a field is declared, beyond its name and type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldShape<'a> {
    Single,
    Repeated,
    /// A map field with the given key type; the field's type is the value type.
    Map(&'a str),
}

/// Translate `field` into a property schema and append its name to
/// `order_list`.
///
/// `order` is the field's zero-based position among the message's flattened
/// fields; `package` qualifies bare message/enum type names.
pub fn translate_field(
    field: &Field,
    shape: FieldShape<'_>,
    order: usize,
    package: &str,
    order_list: &mut Vec<String>,
) -> Schema {
    let (title, example) = title_and_example(field.comment.as_ref());
    let description = description(field.comment.as_ref());
    order_list.push(field.name.clone());

    let primitive = types::lookup(&field.type_name);

    let mut schema = match (shape, primitive) {
        (FieldShape::Map(_), Some(value)) => Schema {
            additional_properties: Some(Box::new(Schema::of_type(value.kind))),
            ..Schema::of_type("object")
        },
        (FieldShape::Map(_), None) => Schema::of_type("object"),
        (FieldShape::Single, Some(primitive)) => Schema {
            format: primitive.format.map(str::to_string),
            example,
            ..Schema::of_type(primitive.kind)
        },
        (FieldShape::Repeated, Some(primitive)) => Schema {
            format: primitive.format.map(str::to_string),
            items: Some(Box::new(Schema {
                example,
                ..Schema::of_type(primitive.kind)
            })),
            ..Schema::of_type("array")
        },
        (FieldShape::Single, None) => Schema {
            example,
            ..Schema::reference(&types::qualify(&field.type_name, package))
        },
        (FieldShape::Repeated, None) => Schema {
            items: Some(Box::new(Schema {
                example,
                ..Schema::reference(&types::qualify(&field.type_name, package))
            })),
            ..Schema::of_type("array")
        },
    };

    schema.title = title;
    schema.description = description;
    schema.order = Some(order);
    schema
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::proto::Comment;
    use serde_json::json;

    fn field(name: &str, type_name: &str, comment: Option<&[&str]>) -> Field {
        Field {
            name: name.to_string(),
            type_name: type_name.to_string(),
            number: 1,
            comment: comment.map(|lines| Comment::new(lines.iter().copied())),
        }
    }

    fn translate(field: &Field, shape: FieldShape<'_>, order: usize) -> serde_json::Value {
        let mut order_list = Vec::new();
        let schema = translate_field(field, shape, order, "orders", &mut order_list);
        assert_eq!(order_list, vec![field.name.clone()]);
        serde_json::to_value(&schema).unwrap()
    }

    #[test]
    fn scalar_with_title_and_example() {
        let f = field("age", "int32", Some(&[" Age; 42"]));
        assert_eq!(
            translate(&f, FieldShape::Single, 0),
            json!({
                "title": "Age",
                "description": "Age",
                "type": "integer",
                "format": "int32",
                "example": 42,
                "x-order": 0
            })
        );
    }

    #[test]
    fn unformatted_scalar_has_no_format() {
        let f = field("name", "string", None);
        assert_eq!(
            translate(&f, FieldShape::Single, 2),
            json!({"type": "string", "x-order": 2})
        );
    }

    #[test]
    fn repeated_scalar_moves_docs_to_wrapper() {
        let f = field("scores", "double", Some(&[" Scores; 1.5"]));
        assert_eq!(
            translate(&f, FieldShape::Repeated, 1),
            json!({
                "title": "Scores",
                "description": "Scores",
                "type": "array",
                "format": "double",
                "items": {"type": "number", "example": 1.5},
                "x-order": 1
            })
        );
    }

    #[test]
    fn message_reference_is_qualified() {
        let f = field("address", "Address", Some(&["Where to ship"]));
        assert_eq!(
            translate(&f, FieldShape::Single, 3),
            json!({
                "$ref": "#/definitions/orders.Address",
                "title": "Where to ship",
                "description": "Where to ship",
                "x-order": 3
            })
        );
    }

    #[test]
    fn qualified_reference_is_kept() {
        let f = field("total", "common.Money", None);
        assert_eq!(
            translate(&f, FieldShape::Single, 0),
            json!({"$ref": "#/definitions/common.Money", "x-order": 0})
        );
    }

    #[test]
    fn repeated_reference_wraps_items() {
        let f = field("lines", "LineItem", Some(&["Lines; first"]));
        assert_eq!(
            translate(&f, FieldShape::Repeated, 4),
            json!({
                "title": "Lines",
                "description": "Lines",
                "type": "array",
                "items": {"$ref": "#/definitions/orders.LineItem", "example": "first"},
                "x-order": 4
            })
        );
    }

    #[test]
    fn scalar_map_uses_additional_properties() {
        let f = field("counts", "int64", None);
        assert_eq!(
            translate(&f, FieldShape::Map("string"), 0),
            json!({
                "type": "object",
                "additionalProperties": {"type": "string"},
                "x-order": 0
            })
        );
    }

    #[test]
    fn message_map_degrades_to_bare_object() {
        let f = field("by_id", "Order", None);
        assert_eq!(
            translate(&f, FieldShape::Map("string"), 5),
            json!({"type": "object", "x-order": 5})
        );
    }

    #[test]
    fn well_known_types_are_inline() {
        let f = field("placed_at", "google.protobuf.Timestamp", None);
        assert_eq!(
            translate(&f, FieldShape::Single, 0),
            json!({"type": "string", "format": "date-time", "x-order": 0})
        );
    }
}
