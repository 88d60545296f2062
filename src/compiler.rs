// ==============================================================================
// Library API: the `Translator` Builder
// ==============================================================================
//
// `Translator` holds the configuration of a translation (host name, version,
// SDK files, lookup directories) and turns one root `.proto` file into one
// Swagger 2.0 document. It follows the non-consuming `&mut self` builder
// pattern (C-BUILDER): configure once, translate many files.
//
// All mutable translation state lives in a `TranslationContext` created fresh
// for every call, so translations never see each other's definitions.
//
// The walk over the root file is depth-first in declaration order:
//
//   package  -> becomes the current package
//   import   -> messages/enums of the imported file are merged (best-effort)
//   message  -> definition, then nested messages/enums
//   enum     -> definition
//   service  -> tag, then one path per rpc

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::context::TranslationContext;
use crate::error::{Result, TranslateError};
use crate::import::ImportResolver;
use crate::message::{define_enum, define_message};
use crate::model::proto::{Element, ProtoFile, Service};
use crate::model::swagger::{Document, Info, SecurityScheme};
use crate::reader::{load_proto, parse_proto};
use crate::service::{define_rpc, define_service};
use crate::template;

/// Host used when none is configured.
pub const DEFAULT_HOSTNAME: &str = "api.example.com";
/// Route prefix accepted for compatibility with Twirp's default mount point.
pub const DEFAULT_PATH_PREFIX: &str = "/twirp";

const JSON_MEDIA_TYPE: &str = "application/json";
const SECURITY_SCHEME: &str = "oauth";
const OAUTH_DESCRIPTION: &str = "Please use [client credentials](https://datatracker.ietf.org/doc/html/rfc6749#section-4.4) given to you by Compass IOT, please only use [basic auth](https://en.wikipedia.org/wiki/Basic_access_authentication) via the 'Authorization' header to obtain access tokens";

/// Builder for translating `.proto` files into Swagger 2.0 documents.
///
/// Configuration and terminal methods both take `&mut self`, so the builder
/// supports chained one-liners as well as multi-step setup.
///
/// # Examples
///
/// ```no_run
/// use twirp_swagger::Translator;
///
/// let document = Translator::new()
///     .hostname("api.example.com")
///     .version("1.4.0")
///     .proto_dir("protos/")
///     .translate("orders/order.proto")?;
/// println!("{}", document.to_json_pretty()?);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct Translator {
    hostname: String,
    path_prefix: String,
    version: String,
    sdk_files: String,
    proto_dir: PathBuf,
    template_dir: PathBuf,
}

impl Default for Translator {
    fn default() -> Self {
        Self::new()
    }
}

impl Translator {
    pub fn new() -> Self {
        Translator {
            hostname: DEFAULT_HOSTNAME.to_string(),
            path_prefix: DEFAULT_PATH_PREFIX.to_string(),
            version: String::new(),
            sdk_files: String::new(),
            proto_dir: PathBuf::from("."),
            template_dir: PathBuf::new(),
        }
    }

    /// API host written to `host` and used for the OAuth token URL.
    pub fn hostname(&mut self, hostname: impl Into<String>) -> &mut Self {
        self.hostname = hostname.into();
        self
    }

    /// Route prefix. An empty prefix means [`DEFAULT_PATH_PREFIX`].
    ///
    /// Routes are always `/<service base>/<package>.<Service>/<Method>`; the
    /// prefix is kept for callers that mount the document elsewhere.
    pub fn path_prefix(&mut self, prefix: impl Into<String>) -> &mut Self {
        let prefix = prefix.into();
        self.path_prefix = if prefix.is_empty() {
            DEFAULT_PATH_PREFIX.to_string()
        } else {
            prefix
        };
        self
    }

    /// The configured route prefix.
    pub fn configured_path_prefix(&self) -> &str {
        &self.path_prefix
    }

    /// API version written to `info.version` and used in SDK URLs.
    pub fn version(&mut self, version: impl Into<String>) -> &mut Self {
        self.version = version.into();
        self
    }

    /// Comma-separated SDK file paths offered to the overview template.
    pub fn sdk_files(&mut self, sdk_files: impl Into<String>) -> &mut Self {
        self.sdk_files = sdk_files.into();
        self
    }

    /// Directory that root files and every import are resolved against.
    pub fn proto_dir(&mut self, dir: impl Into<PathBuf>) -> &mut Self {
        self.proto_dir = dir.into();
        self
    }

    /// Directory holding `<name>.html` overview templates.
    pub fn template_dir(&mut self, dir: impl Into<PathBuf>) -> &mut Self {
        self.template_dir = dir.into();
        self
    }

    /// Translate the file at `path`, resolved against the proto directory.
    ///
    /// Fails with [`TranslateError::NoServiceDefinition`] if the file declares
    /// no RPCs.
    pub fn translate(&mut self, path: impl AsRef<Path>) -> Result<Document> {
        let root = path.as_ref();
        let file = load_proto(&self.proto_dir.join(root))?;
        self.translate_file(&file, &root.to_string_lossy())
    }

    /// Translate `.proto` source text. Uses `"<input>"` as the file name.
    pub fn translate_str(&mut self, source: &str) -> Result<Document> {
        self.translate_str_named(source, "<input>")
    }

    /// Translate `.proto` source text. `name` labels diagnostics and stands
    /// in for the root path (document title, template and SDK URLs).
    pub fn translate_str_named(&mut self, source: &str, name: &str) -> Result<Document> {
        let file = parse_proto(source, name)?;
        self.translate_file(&file, name)
    }

    /// Translate an already-parsed declaration tree. `root` is the path the
    /// file is known by.
    pub fn translate_file(&mut self, file: &ProtoFile, root: &str) -> Result<Document> {
        let mut ctx = TranslationContext::new();
        let resolver = ImportResolver::new(&self.proto_dir);

        walk(&file.elements, None, &resolver, &mut ctx)?;

        if ctx.paths.is_empty() {
            return Err(TranslateError::NoServiceDefinition {
                file: root.to_string(),
            });
        }
        Ok(self.assemble(root, ctx))
    }

    fn assemble(&self, root: &str, ctx: TranslationContext) -> Document {
        let sdk_urls = template::sdk_files_map(root, &self.version, &self.sdk_files);
        let description = template::overview(&self.template_dir, root, &sdk_urls);
        let title = Path::new(root)
            .file_name()
            .map_or_else(|| root.to_string(), |name| name.to_string_lossy().into_owned());

        let security_scheme = SecurityScheme {
            description: OAUTH_DESCRIPTION.to_string(),
            kind: "oauth2".to_string(),
            flow: "application".to_string(),
            token_url: token_url(&self.hostname),
            scopes: BTreeMap::new(),
        };

        let tags = ctx.tags();
        Document {
            consumes: vec![JSON_MEDIA_TYPE.to_string()],
            produces: vec![JSON_MEDIA_TYPE.to_string()],
            schemes: vec!["https".to_string()],
            swagger: "2.0".to_string(),
            info: Info {
                description,
                title,
                version: self.version.clone(),
                logo: template::logo(),
            },
            host: self.hostname.clone(),
            paths: ctx.paths,
            definitions: ctx.definitions,
            security_definitions: BTreeMap::from([(SECURITY_SCHEME.to_string(), security_scheme)]),
            security: vec![BTreeMap::from([(SECURITY_SCHEME.to_string(), Vec::new())])],
            tags,
        }
    }
}

/// `<host>/auth`, or `auth` without a host.
fn token_url(hostname: &str) -> String {
    let host = hostname.trim_end_matches('/');
    if host.is_empty() {
        "auth".to_string()
    } else {
        format!("{host}/auth")
    }
}

/// Visit the root file's declarations. `parent` is the enclosing service,
/// if any.
fn walk(
    elements: &[Element],
    parent: Option<&Service>,
    resolver: &ImportResolver<'_>,
    ctx: &mut TranslationContext,
) -> Result<()> {
    for element in elements {
        match element {
            Element::Package(package) => ctx.current_package = package.name.clone(),
            Element::Import(import) => resolver.resolve(&import.path, ctx),
            Element::Message(message) => {
                define_message(message, ctx);
                walk(&message.elements, None, resolver, ctx)?;
            }
            Element::Enum(enumeration) => define_enum(enumeration, ctx),
            Element::Service(service) => {
                define_service(service, ctx);
                walk(&service.elements, Some(service), resolver, ctx)?;
            }
            Element::Rpc(rpc) => define_rpc(rpc, parent, ctx)?,
            Element::Unsupported(unsupported) => {
                debug!(keyword = %unsupported.keyword, "skipping unsupported declaration");
            }
            Element::EnumValue(_)
            | Element::NormalField(_)
            | Element::MapField(_)
            | Element::OneOf(_)
            | Element::OneOfField(_)
            | Element::Comment(_) => {}
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::proto::Rpc;
    use serde_json::json;

    const ORDERS: &str = r#"
syntax = "proto3";
package orders;

// Manages orders.
service OrderService {
  // Fetch one order.
  rpc GetOrder(GetOrderRequest) returns (Order);
}

message GetOrderRequest { string id = 1; }
message Order { string id = 1; }
"#;

    #[test]
    fn header_is_fixed() {
        let doc = Translator::new()
            .hostname("api.compass.test")
            .version("2.1.0")
            .translate_str_named(ORDERS, "orders/order.proto")
            .unwrap();
        let value = doc.to_value().unwrap();

        assert_eq!(value["swagger"], "2.0");
        assert_eq!(value["schemes"], json!(["https"]));
        assert_eq!(value["consumes"], json!(["application/json"]));
        assert_eq!(value["produces"], json!(["application/json"]));
        assert_eq!(value["host"], "api.compass.test");
        assert_eq!(value["security"], json!([{"oauth": []}]));
        assert_eq!(
            value["securityDefinitions"]["oauth"]["tokenUrl"],
            "api.compass.test/auth"
        );
        assert_eq!(value["securityDefinitions"]["oauth"]["type"], "oauth2");
        assert_eq!(value["securityDefinitions"]["oauth"]["flow"], "application");
        assert_eq!(value["securityDefinitions"]["oauth"]["scopes"], json!({}));
        assert_eq!(value["info"]["title"], "order.proto");
        assert_eq!(value["info"]["version"], "2.1.0");
        assert_eq!(value["info"]["x-logo"]["altText"], "Compass IoT logo");
        assert_eq!(
            value["tags"],
            json!([{"name": "OrderService", "description": "Manages orders."}])
        );
    }

    #[test]
    fn top_level_key_order() {
        let doc = Translator::new().translate_str(ORDERS).unwrap();
        let json = doc.to_json_pretty().unwrap();
        let keys: Vec<_> = json
            .lines()
            .filter(|line| line.starts_with("  \"") && !line.starts_with("   "))
            .map(|line| line.trim().split('"').nth(1).unwrap_or_default().to_string())
            .collect();
        assert_eq!(
            keys,
            [
                "consumes",
                "produces",
                "schemes",
                "swagger",
                "info",
                "host",
                "paths",
                "definitions",
                "securityDefinitions",
                "security",
                "tags"
            ]
        );
    }

    #[test]
    fn file_without_rpcs_is_empty_result() {
        let err = Translator::new()
            .translate_str("package p; service Empty {} message M {}")
            .unwrap_err();
        assert!(err.is_empty_result());
    }

    #[test]
    fn rpc_outside_service_aborts() {
        let file = ProtoFile {
            name: "orphan.proto".to_string(),
            elements: vec![Element::Rpc(Rpc {
                name: "Orphan".to_string(),
                request_type: "A".to_string(),
                streams_request: false,
                returns_type: "B".to_string(),
                streams_returns: false,
                comment: None,
            })],
        };
        let err = Translator::new()
            .translate_file(&file, "orphan.proto")
            .unwrap_err();
        assert!(matches!(err, TranslateError::Structural(_)));
    }

    #[test]
    fn empty_path_prefix_falls_back_to_default() {
        let mut translator = Translator::new();
        translator.path_prefix("");
        assert_eq!(translator.configured_path_prefix(), "/twirp");
        translator.path_prefix("/api");
        assert_eq!(translator.configured_path_prefix(), "/api");
    }

    #[test]
    fn token_url_joins_host() {
        assert_eq!(token_url("api.example.com"), "api.example.com/auth");
        assert_eq!(token_url("api.example.com/"), "api.example.com/auth");
        assert_eq!(token_url(""), "auth");
    }
}
