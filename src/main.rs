// ==============================================================================
// CLI for the Protobuf to Swagger Translator
// ==============================================================================
//
// Two ways to run:
//   - `twirp-swagger [-o FILE] INPUT`     -- one document, to a file or stdout
//   - `twirp-swagger --out-dir DIR INPUT...` -- one document per input; inputs
//     that are directories are searched for `.proto` files, and files without
//     services are skipped

use std::fs;
use std::io::{self, Write as _};
use std::path::{Component, Path, PathBuf};

use clap::{ArgAction, Parser};
use miette::{Context, IntoDiagnostic, bail};
use tracing::info;
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

use twirp_swagger::{DEFAULT_HOSTNAME, DEFAULT_PATH_PREFIX, Document, TranslateError, Translator};

// ==============================================================================
// CLI Argument Definitions
// ==============================================================================

#[derive(Parser)]
#[command(
    name = "twirp-swagger",
    version,
    about = "Generate Swagger 2.0 documentation for Twirp services from .proto files"
)]
struct Cli {
    /// Input .proto files, relative to --proto-dir. With --out-dir, directories
    /// are searched recursively for .proto files.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// API host name written to the document.
    #[arg(long, default_value = DEFAULT_HOSTNAME)]
    hostname: String,

    /// Twirp route prefix. Accepted for compatibility only: it has no effect
    /// on the generated routes.
    #[arg(long, default_value = DEFAULT_PATH_PREFIX)]
    path_prefix: String,

    /// API version written to `info.version` and used in SDK URLs.
    #[arg(long = "api-version")]
    api_version: Option<String>,

    /// Comma-separated SDK files linked from the overview template.
    #[arg(long)]
    sdk_files: Option<String>,

    /// Directory that inputs and imports are resolved against.
    #[arg(long, default_value = ".")]
    proto_dir: PathBuf,

    /// Directory holding `<name>.html` overview templates.
    #[arg(long)]
    template_dir: Option<PathBuf>,

    /// Write the document to this file instead of stdout (single input only).
    #[arg(short, long, conflicts_with = "out_dir")]
    out: Option<PathBuf>,

    /// Write one document per input into this directory.
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// File name suffix for documents written with --out-dir.
    #[arg(long, default_value = ".swagger.json")]
    output_suffix: String,

    /// Increase log verbosity (-v info, -vv debug). `RUST_LOG` takes precedence.
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

// ==============================================================================
// Entry Point
// ==============================================================================

fn main() -> miette::Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(miette::MietteHandlerOpts::new().build())
    }))?;

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut translator = Translator::new();
    translator
        .hostname(&cli.hostname)
        .path_prefix(&cli.path_prefix)
        .version(cli.api_version.clone().unwrap_or_default())
        .sdk_files(cli.sdk_files.clone().unwrap_or_default())
        .proto_dir(&cli.proto_dir)
        .template_dir(cli.template_dir.clone().unwrap_or_default());

    match &cli.out_dir {
        Some(out_dir) => run_batch(&mut translator, &cli, out_dir),
        None => run_single(&mut translator, &cli),
    }
}

fn init_tracing(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();
}

// ==============================================================================
// Single Document
// ==============================================================================

fn run_single(translator: &mut Translator, cli: &Cli) -> miette::Result<()> {
    let [input] = cli.inputs.as_slice() else {
        bail!("multiple inputs need --out-dir");
    };

    if let Some(out) = &cli.out
        && is_same_file(out, &cli.proto_dir.join(input))
    {
        bail!("input and output file are the same: {}", out.display());
    }

    let document = translator.translate(input)?;
    let json = render(&document)?;

    match &cli.out {
        Some(out) => write_file(out, &json),
        None => write_stdout(&json),
    }
}

fn is_same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

// ==============================================================================
// Batch Mode
// ==============================================================================

fn run_batch(translator: &mut Translator, cli: &Cli, out_dir: &Path) -> miette::Result<()> {
    fs::create_dir_all(out_dir)
        .into_diagnostic()
        .wrap_err_with(|| format!("create {}", out_dir.display()))?;

    for input in collect_inputs(&cli.proto_dir, &cli.inputs)? {
        let document = match translator.translate(&input) {
            Ok(document) => document,
            Err(err) if err.is_empty_result() => {
                info!(file = %input.display(), "no service definition; skipping");
                continue;
            }
            Err(err) => return Err(err.into()),
        };

        let target = output_path(out_dir, &input, &cli.output_suffix);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .into_diagnostic()
                .wrap_err_with(|| format!("create {}", parent.display()))?;
        }
        write_file(&target, &render(&document)?)?;
        info!(file = %input.display(), output = %target.display(), "wrote swagger document");
    }
    Ok(())
}

/// Expand directory inputs into the `.proto` files below them, sorted by
/// file name. Returned paths are relative to `proto_dir`, like the inputs.
fn collect_inputs(proto_dir: &Path, inputs: &[PathBuf]) -> miette::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for input in inputs {
        let full = proto_dir.join(input);
        if !full.is_dir() {
            files.push(input.clone());
            continue;
        }
        for entry in WalkDir::new(&full).sort_by_file_name() {
            let entry = entry
                .into_diagnostic()
                .wrap_err_with(|| format!("walk {}", full.display()))?;
            let path = entry.path();
            if entry.file_type().is_file() && path.extension().is_some_and(|ext| ext == "proto") {
                let relative = path.strip_prefix(proto_dir).unwrap_or(path);
                files.push(relative.to_path_buf());
            }
        }
    }
    Ok(files)
}

/// `<out_dir>/<input without extension><suffix>`, keeping the input's
/// relative directories.
fn output_path(out_dir: &Path, input: &Path, suffix: &str) -> PathBuf {
    let relative: PathBuf = input
        .with_extension("")
        .components()
        .filter(|c| matches!(c, Component::Normal(_)))
        .collect();
    let mut name = relative.into_os_string();
    name.push(suffix);
    out_dir.join(name)
}

// ==============================================================================
// Output
// ==============================================================================

fn render(document: &Document) -> miette::Result<String> {
    Ok(document.to_json_pretty().map_err(TranslateError::from)?)
}

fn write_file(path: &Path, json: &str) -> miette::Result<()> {
    fs::write(path, format!("{json}\n"))
        .into_diagnostic()
        .wrap_err_with(|| format!("write {}", path.display()))
}

fn write_stdout(json: &str) -> miette::Result<()> {
    // A closed pipe (`twirp-swagger x.proto | head`) is not an error.
    if let Err(e) = writeln!(io::stdout(), "{json}") {
        if e.kind() == io::ErrorKind::BrokenPipe {
            return Ok(());
        }
        return Err(e).into_diagnostic().wrap_err("write to stdout");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_path_keeps_relative_directories() {
        assert_eq!(
            output_path(Path::new("out"), Path::new("orders/order.proto"), ".swagger.json"),
            Path::new("out").join("orders").join("order.swagger.json")
        );
        assert_eq!(
            output_path(Path::new("out"), Path::new("../up/x.proto"), ".json"),
            Path::new("out").join("up").join("x.json")
        );
    }

    #[test]
    fn directories_expand_to_sorted_proto_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("api/nested")).unwrap();
        fs::write(dir.path().join("api/b.proto"), "").unwrap();
        fs::write(dir.path().join("api/a.proto"), "").unwrap();
        fs::write(dir.path().join("api/notes.txt"), "").unwrap();
        fs::write(dir.path().join("api/nested/c.proto"), "").unwrap();

        let files = collect_inputs(dir.path(), &[PathBuf::from("api")]).unwrap();
        assert_eq!(
            files,
            vec![
                PathBuf::from("api/a.proto"),
                PathBuf::from("api/b.proto"),
                PathBuf::from("api/nested/c.proto"),
            ]
        );
    }
}
