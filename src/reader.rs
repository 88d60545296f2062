// ==============================================================================
// Protobuf Reader: Descriptor to Declaration Tree
// ==============================================================================
//
// Turns `.proto` source into the declaration tree in `model::proto`. Parsing
// is done by `protox-parse`, which yields an unresolved `FileDescriptorProto`
// (type names stay as written) together with its `SourceCodeInfo`. This module
// walks that descriptor back into a tree:
//
// - declarations are put back into source order using the span recorded for
//   each descriptor path, so interleaved `import`, `message` and `service`
//   statements come out the way they were written;
// - fields sharing a real `oneof` index are regrouped under a `OneOf`, placed
//   where the `oneof` was declared;
// - synthetic `<Name>Entry` messages become `map<K, V>` fields again;
// - the leading comment of every declaration becomes its documentation, and
//   detached comments become standalone `Element::Comment`s.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use miette::{Diagnostic, NamedSource};
use prost_types::field_descriptor_proto::{Label, Type};
use prost_types::source_code_info::Location;
use prost_types::{
    DescriptorProto, EnumDescriptorProto, FieldDescriptorProto, FileDescriptorProto,
    ServiceDescriptorProto,
};

use crate::doc_comments::parse_comment;
use crate::error::{ParseDiagnostic, Result, TranslateError};
use crate::model::proto::{
    Comment, Element, Enum, EnumValue, Field, FieldLabel, Import, ImportKind, MapField, Message,
    NormalField, OneOf, OneOfField, Package, ProtoFile, Rpc, Service, Unsupported,
};

const BYTE_ORDER_MARK: char = '\u{FEFF}';

// Field numbers used in `SourceCodeInfo` paths (see descriptor.proto).
const FILE_PACKAGE: i32 = 2;
const FILE_DEPENDENCY: i32 = 3;
const FILE_MESSAGE: i32 = 4;
const FILE_ENUM: i32 = 5;
const FILE_SERVICE: i32 = 6;
const FILE_EXTENSION: i32 = 7;
const MESSAGE_FIELD: i32 = 2;
const MESSAGE_NESTED: i32 = 3;
const MESSAGE_ENUM: i32 = 4;
const MESSAGE_EXTENSION: i32 = 6;
const MESSAGE_ONEOF: i32 = 8;
const ENUM_VALUE: i32 = 2;
const SERVICE_METHOD: i32 = 2;

// ==========================================================================
// Public API
// ==========================================================================

/// Parse `.proto` source text. `name` labels diagnostics and becomes
/// [`ProtoFile::name`]. A leading byte order mark is ignored.
pub fn parse_proto(source: &str, name: &str) -> Result<ProtoFile, ParseDiagnostic> {
    let source = source.strip_prefix(BYTE_ORDER_MARK).unwrap_or(source);
    let descriptor =
        protox_parse::parse(name, source).map_err(|err| diagnostic(&err, name, source))?;

    let reader = Reader::new(&descriptor);
    Ok(ProtoFile {
        name: name.to_string(),
        elements: reader.file(&descriptor),
    })
}

/// Read and parse the file at `path`.
pub fn load_proto(path: &Path) -> Result<ProtoFile> {
    let source = fs::read_to_string(path).map_err(|source| TranslateError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_proto(&source, &path.display().to_string())?)
}

/// Re-home a `protox-parse` error on our own source so it renders like every
/// other diagnostic of this crate.
fn diagnostic(err: &protox_parse::ParseError, name: &str, source: &str) -> ParseDiagnostic {
    let label = err.labels().and_then(|mut labels| labels.next());
    ParseDiagnostic {
        src: NamedSource::new(name, source.to_string()),
        span: label
            .as_ref()
            .map_or_else(|| (source.len(), 0).into(), |l| *l.inner()),
        message: err.to_string(),
        label: label.and_then(|l| l.label().map(str::to_string)),
        help: err.help().map(|h| h.to_string()),
    }
}

// ==========================================================================
// Source Positions
// ==========================================================================

/// Zero-based `(line, column)` where a declaration starts.
type Position = (i32, i32);

/// Declarations without a recorded span sort after everything else.
const UNPLACED: Position = (i32::MAX, i32::MAX);

/// Elements collected out of order, tagged with their source position.
#[derive(Default)]
struct Placed(Vec<(Position, Element)>);

impl Placed {
    fn push(&mut self, position: Position, element: Element) {
        self.0.push((position, element));
    }

    /// The elements in source order. The sort is stable, so a detached
    /// comment stays in front of the declaration it was recorded with.
    fn into_elements(mut self) -> Vec<Element> {
        self.0.sort_by_key(|(position, _)| *position);
        self.0.into_iter().map(|(_, element)| element).collect()
    }
}

fn child(path: &[i32], field: i32, index: usize) -> Vec<i32> {
    let mut child = path.to_vec();
    child.extend([field, to_i32(index)]);
    child
}

fn to_i32(index: usize) -> i32 {
    i32::try_from(index).unwrap_or(i32::MAX)
}

// ==========================================================================
// Descriptor Walk
// ==========================================================================

struct Reader<'a> {
    locations: HashMap<Vec<i32>, &'a Location>,
}

impl<'a> Reader<'a> {
    fn new(descriptor: &'a FileDescriptorProto) -> Self {
        let mut locations = HashMap::new();
        for location in descriptor
            .source_code_info
            .iter()
            .flat_map(|info| &info.location)
        {
            locations.entry(location.path.clone()).or_insert(location);
        }
        Reader { locations }
    }

    fn comment(&self, path: &[i32]) -> Option<Comment> {
        self.locations
            .get(path)
            .and_then(|location| location.leading_comments.as_deref())
            .and_then(parse_comment)
    }

    fn position(&self, path: &[i32]) -> Position {
        self.locations
            .get(path)
            .and_then(|location| Some((*location.span.first()?, *location.span.get(1)?)))
            .unwrap_or(UNPLACED)
    }

    /// Add `element` at the position recorded for `path`, preceded by the
    /// detached comments found in front of it.
    fn place(&self, placed: &mut Placed, path: &[i32], element: Element) {
        let position = self.position(path);
        if let Some(location) = self.locations.get(path) {
            for detached in &location.leading_detached_comments {
                if let Some(comment) = parse_comment(detached) {
                    placed.push(position, Element::Comment(comment));
                }
            }
        }
        placed.push(position, element);
    }

    fn file(&self, file: &FileDescriptorProto) -> Vec<Element> {
        let mut placed = Placed::default();

        if let Some(name) = &file.package {
            let path = [FILE_PACKAGE];
            let package = Package {
                name: name.clone(),
                comment: self.comment(&path),
            };
            self.place(&mut placed, &path, Element::Package(package));
        }

        for (i, dependency) in file.dependency.iter().enumerate() {
            let path = child(&[], FILE_DEPENDENCY, i);
            let index = to_i32(i);
            let kind = if file.public_dependency.contains(&index) {
                ImportKind::Public
            } else if file.weak_dependency.contains(&index) {
                ImportKind::Weak
            } else {
                ImportKind::Default
            };
            let import = Import {
                path: dependency.clone(),
                kind,
                comment: self.comment(&path),
            };
            self.place(&mut placed, &path, Element::Import(import));
        }

        for (i, message) in file.message_type.iter().enumerate() {
            let path = child(&[], FILE_MESSAGE, i);
            let element = Element::Message(self.message(message, &path));
            self.place(&mut placed, &path, element);
        }
        for (i, enumeration) in file.enum_type.iter().enumerate() {
            let path = child(&[], FILE_ENUM, i);
            let element = Element::Enum(self.enumeration(enumeration, &path));
            self.place(&mut placed, &path, element);
        }
        for (i, service) in file.service.iter().enumerate() {
            let path = child(&[], FILE_SERVICE, i);
            let element = Element::Service(self.service(service, &path));
            self.place(&mut placed, &path, element);
        }
        for (i, extension) in file.extension.iter().enumerate() {
            let path = child(&[], FILE_EXTENSION, i);
            self.place(&mut placed, &path, unsupported("extend", extension.name()));
        }

        placed.into_elements()
    }

    fn message(&self, message: &DescriptorProto, path: &[i32]) -> Message {
        let mut placed = Placed::default();

        let entries: HashMap<&str, &DescriptorProto> = message
            .nested_type
            .iter()
            .filter(|nested| is_map_entry(nested))
            .map(|nested| (nested.name(), nested))
            .collect();
        // proto2 groups also declare a nested message of the same name.
        let groups: Vec<&str> = message
            .field
            .iter()
            .filter(|field| field.r#type == Some(Type::Group as i32))
            .map(|field| last_segment(field.type_name()))
            .collect();

        let mut oneofs: Vec<Vec<Element>> = vec![Vec::new(); message.oneof_decl.len()];
        for (i, field) in message.field.iter().enumerate() {
            let field_path = child(path, MESSAGE_FIELD, i);

            let members = field
                .oneof_index
                .filter(|_| !field.proto3_optional())
                .and_then(|index| usize::try_from(index).ok())
                .and_then(|index| oneofs.get_mut(index));
            if let Some(members) = members {
                let field = self.field(field, &field_path, type_name(field));
                members.push(Element::OneOfField(OneOfField { field }));
                continue;
            }

            let element = if field.r#type == Some(Type::Group as i32) {
                unsupported("group", field.name())
            } else if let Some(entry) = map_entry(field, &entries) {
                let value = entry_field(entry, 2).map(type_name).unwrap_or_default();
                Element::MapField(MapField {
                    key_type: entry_field(entry, 1).map(type_name).unwrap_or_default(),
                    field: self.field(field, &field_path, value),
                })
            } else {
                Element::NormalField(NormalField {
                    field: self.field(field, &field_path, type_name(field)),
                    label: label(field),
                })
            };
            self.place(&mut placed, &field_path, element);
        }

        for (k, (decl, members)) in message.oneof_decl.iter().zip(oneofs).enumerate() {
            // Synthetic oneofs of proto3 `optional` fields end up empty.
            if members.is_empty() {
                continue;
            }
            let oneof_path = child(path, MESSAGE_ONEOF, k);
            let oneof = OneOf {
                name: decl.name().to_string(),
                comment: self.comment(&oneof_path),
                elements: members,
            };
            self.place(&mut placed, &oneof_path, Element::OneOf(oneof));
        }

        for (j, nested) in message.nested_type.iter().enumerate() {
            if is_map_entry(nested) || groups.contains(&nested.name()) {
                continue;
            }
            let nested_path = child(path, MESSAGE_NESTED, j);
            let element = Element::Message(self.message(nested, &nested_path));
            self.place(&mut placed, &nested_path, element);
        }
        for (j, enumeration) in message.enum_type.iter().enumerate() {
            let enum_path = child(path, MESSAGE_ENUM, j);
            let element = Element::Enum(self.enumeration(enumeration, &enum_path));
            self.place(&mut placed, &enum_path, element);
        }
        for (j, extension) in message.extension.iter().enumerate() {
            let extension_path = child(path, MESSAGE_EXTENSION, j);
            self.place(&mut placed, &extension_path, unsupported("extend", extension.name()));
        }

        Message {
            name: message.name().to_string(),
            comment: self.comment(path),
            elements: placed.into_elements(),
        }
    }

    fn field(&self, field: &FieldDescriptorProto, path: &[i32], type_name: String) -> Field {
        Field {
            name: field.name().to_string(),
            type_name,
            number: i64::from(field.number()),
            comment: self.comment(path),
        }
    }

    fn enumeration(&self, enumeration: &EnumDescriptorProto, path: &[i32]) -> Enum {
        let mut placed = Placed::default();
        for (i, value) in enumeration.value.iter().enumerate() {
            let value_path = child(path, ENUM_VALUE, i);
            let element = Element::EnumValue(EnumValue {
                name: value.name().to_string(),
                number: i64::from(value.number()),
                comment: self.comment(&value_path),
            });
            self.place(&mut placed, &value_path, element);
        }
        Enum {
            name: enumeration.name().to_string(),
            comment: self.comment(path),
            elements: placed.into_elements(),
        }
    }

    fn service(&self, service: &ServiceDescriptorProto, path: &[i32]) -> Service {
        let mut placed = Placed::default();
        for (i, method) in service.method.iter().enumerate() {
            let method_path = child(path, SERVICE_METHOD, i);
            let element = Element::Rpc(Rpc {
                name: method.name().to_string(),
                request_type: method.input_type().to_string(),
                streams_request: method.client_streaming(),
                returns_type: method.output_type().to_string(),
                streams_returns: method.server_streaming(),
                comment: self.comment(&method_path),
            });
            self.place(&mut placed, &method_path, element);
        }
        Service {
            name: service.name().to_string(),
            comment: self.comment(path),
            elements: placed.into_elements(),
        }
    }
}

// ==========================================================================
// Field Helpers
// ==========================================================================

fn is_map_entry(message: &DescriptorProto) -> bool {
    message
        .options
        .as_ref()
        .is_some_and(|options| options.map_entry())
}

/// The synthetic entry message behind a `map<K, V>` field, if `field` is one.
fn map_entry<'m>(
    field: &FieldDescriptorProto,
    entries: &HashMap<&str, &'m DescriptorProto>,
) -> Option<&'m DescriptorProto> {
    if field.label() != Label::Repeated {
        return None;
    }
    let name = field.type_name.as_deref()?;
    entries.get(last_segment(name)).copied()
}

/// Field `number` of a map entry: 1 is the key, 2 the value.
fn entry_field(entry: &DescriptorProto, number: i32) -> Option<&FieldDescriptorProto> {
    entry.field.iter().find(|field| field.number() == number)
}

fn last_segment(name: &str) -> &str {
    name.rsplit('.').next().unwrap_or(name)
}

fn unsupported(keyword: &str, name: &str) -> Element {
    Element::Unsupported(Unsupported {
        keyword: keyword.to_string(),
        name: name.to_string(),
    })
}

fn label(field: &FieldDescriptorProto) -> FieldLabel {
    match field.label() {
        Label::Repeated => FieldLabel::Repeated,
        Label::Required => FieldLabel::Required,
        Label::Optional if field.proto3_optional() => FieldLabel::Optional,
        Label::Optional => FieldLabel::Singular,
    }
}

/// The type as written: a named type keeps its spelling, a scalar its keyword.
fn type_name(field: &FieldDescriptorProto) -> String {
    match &field.type_name {
        Some(name) => name.clone(),
        None => scalar_name(field.r#type()).to_string(),
    }
}

fn scalar_name(kind: Type) -> &'static str {
    match kind {
        Type::Double => "double",
        Type::Float => "float",
        Type::Int64 => "int64",
        Type::Uint64 => "uint64",
        Type::Int32 => "int32",
        Type::Fixed64 => "fixed64",
        Type::Fixed32 => "fixed32",
        Type::Bool => "bool",
        Type::String => "string",
        Type::Group => "group",
        Type::Message => "message",
        Type::Bytes => "bytes",
        Type::Uint32 => "uint32",
        Type::Enum => "enum",
        Type::Sfixed32 => "sfixed32",
        Type::Sfixed64 => "sfixed64",
        Type::Sint32 => "sint32",
        Type::Sint64 => "sint64",
    }
}
