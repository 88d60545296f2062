// ==============================================================================
// Message and Enum Translation
// ==============================================================================
//
// Messages become `type: object` definitions, enums become `type: string`
// definitions with an `enum` value list. Swagger objects have no property
// order, so a message's field order is recorded twice: as `x-order` on every
// property and as a trailing `Fields: a, b, c` line in the description.

use tracing::debug;

use crate::context::TranslationContext;
use crate::doc_comments::{description, title};
use crate::field::{FieldShape, translate_field};
use crate::model::proto::{Element, Enum, Field, Message};
use crate::model::swagger::Schema;
use crate::types;

/// Translate `message` and store it under `<package>.<Name>`.
///
/// Nested declarations are not visited here; the walkers reach them on their
/// own.
pub fn define_message(message: &Message, ctx: &mut TranslationContext) {
    let name = types::qualify(&message.name, &ctx.current_package);
    let schema = translate_message(message, &ctx.current_package);
    ctx.definitions.insert(name, schema);
}

/// Translate `enumeration` and store it under `<package>.<Name>`.
pub fn define_enum(enumeration: &Enum, ctx: &mut TranslationContext) {
    let name = types::qualify(&enumeration.name, &ctx.current_package);
    ctx.definitions.insert(name, translate_enum(enumeration));
}

pub fn translate_message(message: &Message, package: &str) -> Schema {
    let mut order_list = Vec::new();
    let mut schema = Schema::of_type("object");

    for (field, shape) in flatten_fields(&message.elements) {
        let order = order_list.len();
        let property = translate_field(field, shape, order, package, &mut order_list);
        schema.properties.insert(field.name.clone(), property);
    }

    let mut text = description(message.comment.as_ref());
    if !order_list.is_empty() {
        text.push_str("\n\nFields: ");
        text.push_str(&order_list.join(", "));
    }

    schema.title = title(message.comment.as_ref());
    schema.description = text.trim().to_string();
    schema
}

/// The message's fields in declaration order, with `oneof` members spliced in
/// where their block appears.
fn flatten_fields(elements: &[Element]) -> Vec<(&Field, FieldShape<'_>)> {
    let mut fields = Vec::new();
    for element in elements {
        match element {
            Element::NormalField(normal) => {
                let shape = if normal.is_repeated() {
                    FieldShape::Repeated
                } else {
                    FieldShape::Single
                };
                fields.push((&normal.field, shape));
            }
            Element::MapField(map) => {
                fields.push((&map.field, FieldShape::Map(map.key_type.as_str())));
            }
            Element::OneOf(oneof) => {
                fields.extend(oneof.elements.iter().filter_map(|member| match member {
                    Element::OneOfField(f) => Some((&f.field, FieldShape::Single)),
                    _ => None,
                }));
            }
            Element::OneOfField(f) => fields.push((&f.field, FieldShape::Single)),
            Element::Comment(_) | Element::Message(_) | Element::Enum(_) => {}
            other => debug!(kind = other.kind(), "skipping element inside message"),
        }
    }
    fields
}

pub fn translate_enum(enumeration: &Enum) -> Schema {
    let values = enumeration
        .elements
        .iter()
        .filter_map(|element| match element {
            Element::EnumValue(value) => Some(value.name.clone()),
            Element::Comment(_) => None,
            other => {
                debug!(kind = other.kind(), "skipping element inside enum");
                None
            }
        })
        .collect();

    Schema {
        title: title(enumeration.comment.as_ref()),
        description: description(enumeration.comment.as_ref()),
        values,
        ..Schema::of_type("string")
    }
}
