//! services/api/src/bin/openapi.rs
//!
//! Exports the course catalog's OpenAPI document.
//!
//! Usage: `openapi [--compact] [PATH | -]`. Writes `openapi.json` by default;
//! `-` prints the document to stdout instead.

use api_lib::web::rest::ApiDoc;
use std::io::Write;
use utoipa::OpenApi;

const DEFAULT_OUTPUT: &str = "openapi.json";

struct ExportOptions {
    compact: bool,
    output: String,
}

impl ExportOptions {
    fn from_args(args: impl Iterator<Item = String>) -> Self {
        let mut options = Self {
            compact: false,
            output: DEFAULT_OUTPUT.to_string(),
        };
        for arg in args {
            match arg.as_str() {
                "--compact" => options.compact = true,
                _ => options.output = arg,
            }
        }
        options
    }
}

fn render_catalog_document(compact: bool) -> Result<String, serde_json::Error> {
    let document = ApiDoc::openapi();
    if compact {
        document.to_json()
    } else {
        document.to_pretty_json()
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let options = ExportOptions::from_args(std::env::args().skip(1));
    let document = render_catalog_document(options.compact)?;

    if options.output == "-" {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(document.as_bytes())?;
        stdout.write_all(b"\n")?;
    } else {
        std::fs::write(&options.output, document)?;
        eprintln!("Wrote catalog API document to {}", options.output);
    }
    Ok(())
}
