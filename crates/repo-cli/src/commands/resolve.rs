//! Import request resolution

use std::path::Path;

use repo_packages::{ImportKind, get_packages, parse_kbn_import_req};

use crate::error::{CliError, Result};

/// Run the resolve command
///
/// Prints the target directory. With `from`, a second line names the kind
/// of import; external imports print only the kind.
pub fn run_resolve(root: &Path, request: &str, from: Option<&Path>) -> Result<()> {
    let req = parse_kbn_import_req(request).ok_or_else(|| {
        CliError::user(format!("'{request}' is not an @scope/name import request"))
    })?;
    let registry = get_packages(root)?;

    let kind = match from {
        Some(importer) => {
            let importer = if importer.is_absolute() {
                importer.to_path_buf()
            } else {
                std::env::current_dir()?.join(importer)
            };
            Some(req.classify(&registry, importer))
        }
        None => None,
    };

    if kind == Some(ImportKind::External) {
        println!("{}", ImportKind::External);
        return Ok(());
    }

    let dir = registry.resolve_import(&req)?;
    println!("{}", dir.display());
    if let Some(kind) = kind {
        println!("{kind}");
    }
    Ok(())
}
