// ==============================================================================
// Declaration Tree for Protocol Buffers Source Files
// ==============================================================================
//
// The reader produces one `ProtoFile` per `.proto` file. Declarations form a
// closed set of element kinds; containers (messages, enums, services, oneofs)
// hold their children in source order so the translator can recover field
// positions, and every declaration may carry the documentation comment that
// directly precedes it.

/// A documentation comment, stored as lines with the comment markers
/// (`//`, `/*`, `*/`) removed but whitespace otherwise untouched.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Comment {
    pub lines: Vec<String>,
}

impl Comment {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Comment {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }
}

/// A parsed `.proto` file.
#[derive(Debug, Clone, PartialEq)]
pub struct ProtoFile {
    /// Name used in diagnostics and as the document title (usually the path
    /// the file was loaded from).
    pub name: String,
    pub elements: Vec<Element>,
}

/// Every kind of declaration the translator looks at.
///
/// Not every variant is legal in every container; the reader only produces
/// the combinations protobuf allows, but the translator still treats a
/// misplaced variant as a recoverable oddity (or, for `Rpc`, a structural
/// error).
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Package(Package),
    Import(Import),
    Message(Message),
    Enum(Enum),
    EnumValue(EnumValue),
    Service(Service),
    Rpc(Rpc),
    NormalField(NormalField),
    MapField(MapField),
    OneOf(OneOf),
    OneOfField(OneOfField),
    /// A comment not attached to any declaration.
    Comment(Comment),
    /// A construct that is parsed but not modelled (`extend` fields, `group`
    /// fields).
    Unsupported(Unsupported),
}

impl Element {
    /// Short human-readable kind name, used in log messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Element::Package(_) => "package",
            Element::Import(_) => "import",
            Element::Message(_) => "message",
            Element::Enum(_) => "enum",
            Element::EnumValue(_) => "enum value",
            Element::Service(_) => "service",
            Element::Rpc(_) => "rpc",
            Element::NormalField(_) => "field",
            Element::MapField(_) => "map field",
            Element::OneOf(_) => "oneof",
            Element::OneOfField(_) => "oneof field",
            Element::Comment(_) => "comment",
            Element::Unsupported(_) => "unsupported",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    pub name: String,
    pub comment: Option<Comment>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportKind {
    Default,
    Public,
    Weak,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Import {
    pub path: String,
    pub kind: ImportKind,
    pub comment: Option<Comment>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub name: String,
    pub comment: Option<Comment>,
    pub elements: Vec<Element>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Enum {
    pub name: String,
    pub comment: Option<Comment>,
    pub elements: Vec<Element>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumValue {
    pub name: String,
    pub number: i64,
    pub comment: Option<Comment>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Service {
    pub name: String,
    pub comment: Option<Comment>,
    pub elements: Vec<Element>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rpc {
    pub name: String,
    pub request_type: String,
    pub streams_request: bool,
    pub returns_type: String,
    pub streams_returns: bool,
    pub comment: Option<Comment>,
}

/// The parts shared by every field kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    /// Declared type as written (`int32`, `Address`, `google.protobuf.Timestamp`).
    /// For map fields this is the value type.
    pub type_name: String,
    pub number: i64,
    pub comment: Option<Comment>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldLabel {
    /// No label, or proto2 `optional`.
    Singular,
    /// proto3 `optional` (explicit presence).
    Optional,
    Required,
    Repeated,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalField {
    pub field: Field,
    pub label: FieldLabel,
}

impl NormalField {
    pub fn is_repeated(&self) -> bool {
        self.label == FieldLabel::Repeated
    }
}

/// `map<KeyType, ValueType> name = N;`. `field.type_name` holds the value type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapField {
    pub key_type: String,
    pub field: Field,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OneOf {
    pub name: String,
    pub comment: Option<Comment>,
    pub elements: Vec<Element>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OneOfField {
    pub field: Field,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unsupported {
    pub keyword: String,
    pub name: String,
}
