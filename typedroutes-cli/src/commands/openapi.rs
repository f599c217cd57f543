use anyhow::Result;
use std::path::Path;
use typedroutes_core::{build_router, openapi};

use super::load_config;

/// Render the OpenAPI document the server would serve
pub fn run(config: Option<&Path>, compact: bool) -> Result<String> {
    let mut config = load_config(config)?;
    config.validate()?;
    // Built without the docs routes, which never appear in the document anyway
    config.docs.enabled = false;

    let router = build_router(&config)?;
    let document = openapi::build_document(&router, &config.docs);
    Ok(openapi::render_document(&document, !compact)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn renders_document_from_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[docs]\ntitle = \"Tutorial API\"").unwrap();

        let document: serde_json::Value =
            serde_json::from_str(&run(Some(file.path()), true).unwrap()).unwrap();
        assert_eq!(document["info"]["title"], "Tutorial API");
        assert!(document["paths"]["/items/"]["post"].is_object());
    }

    #[test]
    fn compact_output_is_single_line() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server]\nport = 8000").unwrap();
        assert!(!run(Some(file.path()), true).unwrap().contains('\n'));
    }

    #[test]
    fn missing_config_file_is_an_error() {
        assert!(run(Some(Path::new("/nonexistent/typedroutes.toml")), false).is_err());
    }
}
