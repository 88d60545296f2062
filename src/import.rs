// ==============================================================================
// Import Resolution
// ==============================================================================
//
// An `import "x/y.proto";` pulls the messages and enums of another file into
// the document, so that `$ref`s into it resolve. Imported files contribute
// definitions only: their services and RPCs are not documented.
//
// Resolution is best-effort. A file that cannot be read or parsed is logged
// and skipped; the root translation carries on with whatever definitions it
// has. Imports are resolved against a single base directory (`proto_dir`), the
// same way `protoc -I` resolves them.
//
// While an imported file is walked its own `package` declaration is in force.
// The importer's package is saved on the context's package stack and restored
// afterwards, so a definition that follows an import is still keyed by the
// importing file's package.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::context::TranslationContext;
use crate::message::{define_enum, define_message};
use crate::model::proto::Element;
use crate::reader::load_proto;

/// Imports that are never loaded. Their types are either mapped to primitives
/// (`Timestamp`, the wrappers) or only carry options.
const SKIPPED_IMPORTS: &[&str] = &[
    "google/api/annotations.proto",
    "google/protobuf/timestamp.proto",
    "google/protobuf/wrappers.proto",
];

/// Where imports are looked up.
#[derive(Debug, Clone, Copy)]
pub struct ImportResolver<'a> {
    proto_dir: &'a Path,
}

impl<'a> ImportResolver<'a> {
    pub fn new(proto_dir: &'a Path) -> Self {
        ImportResolver { proto_dir }
    }

    /// Whether `import_path` names one of the well-known files that are never
    /// loaded.
    pub fn is_skipped(import_path: &str) -> bool {
        SKIPPED_IMPORTS
            .iter()
            .any(|skipped| import_path.contains(skipped))
    }

    /// The file an import refers to. Canonicalized when it exists so that the
    /// cycle check sees one spelling per file.
    pub fn locate(&self, import_path: &str) -> PathBuf {
        let joined = self.proto_dir.join(import_path);
        joined.canonicalize().unwrap_or(joined)
    }

    /// Load `import_path` and merge its messages and enums into `ctx`.
    ///
    /// Never fails: skipped, missing, unparsable and cyclic imports are logged
    /// and leave `ctx` untouched.
    pub fn resolve(&self, import_path: &str, ctx: &mut TranslationContext) {
        if Self::is_skipped(import_path) {
            debug!(import = import_path, "skipping well-known import");
            return;
        }

        let path = self.locate(import_path);
        let file = match load_proto(&path) {
            Ok(file) => file,
            Err(err) => {
                warn!(import = import_path, error = %err, "could not load import; skipping");
                return;
            }
        };

        if !ctx.enter_import(&path) {
            warn!(
                import = import_path,
                path = %path.display(),
                "import cycle detected; skipping"
            );
            return;
        }

        ctx.push_package();
        self.walk(&file.elements, ctx);
        ctx.pop_package();
        ctx.leave_import();
    }

    /// Visit the declarations of an imported file. Only packages, imports,
    /// messages and enums matter here; nested messages and enums are visited
    /// too.
    fn walk(&self, elements: &[Element], ctx: &mut TranslationContext) {
        for element in elements {
            match element {
                Element::Package(package) => ctx.current_package = package.name.clone(),
                Element::Import(import) => self.resolve(&import.path, ctx),
                Element::Message(message) => {
                    define_message(message, ctx);
                    self.walk(&message.elements, ctx);
                }
                Element::Enum(enumeration) => define_enum(enumeration, ctx),
                _ => {}
            }
        }
    }
}
