//! Protocol Buffers to Swagger 2.0 translator for Twirp services. Reads a
//! `.proto` file (and the files it imports) and emits a Swagger 2.0 document
//! describing its RPCs as HTTP `POST` operations.
//!
//! The entry point is [`Translator`], a non-consuming builder that holds the
//! translation settings and can be reused across many files.
//!
//! # Translating a file
//!
//! ```no_run
//! use twirp_swagger::Translator;
//!
//! let document = Translator::new()
//!     .hostname("api.example.com")
//!     .version("1.0.0")
//!     .proto_dir("protos/")
//!     .translate("orders/order.proto")?;
//! std::fs::write("order.swagger.json", document.to_json_pretty()?)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # What gets translated
//!
//! - every `message` and `enum` (nested ones included, imported ones too)
//!   becomes an entry of `definitions`, keyed `<package>.<Name>`;
//! - every `service` becomes a tag, and every `rpc` a path
//!   `/<service base>/<package>.<Service>/<Method>` with a single `POST`;
//! - leading comments become titles, descriptions and examples
//!   (`// Age; 42` documents a field titled "Age" with example `42`).
//!
//! # Error handling
//!
//! Fallible methods return [`TranslateError`], which implements
//! [`miette::Diagnostic`]: parse errors render with the offending source span.
//! A file that declares no RPCs yields [`TranslateError::NoServiceDefinition`]
//! (see [`TranslateError::is_empty_result`]); batch callers usually skip such
//! files. Problems with imported files are logged through `tracing` and never
//! fail the translation.

pub mod compiler;
pub mod context;
pub mod doc_comments;
pub mod error;
pub mod field;
pub mod import;
pub mod message;
pub mod model;
pub mod reader;
pub mod service;
pub mod template;
pub mod types;

// Re-export the small number of public API at the crate root.
pub use compiler::{DEFAULT_HOSTNAME, DEFAULT_PATH_PREFIX, Translator};
pub use error::{ParseDiagnostic, TranslateError};
pub use model::swagger::Document;
pub use reader::{load_proto, parse_proto};
