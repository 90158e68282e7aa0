use serde_json::{Map, Value};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to read manifest {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("manifest {path} is not valid JSON: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
    #[error("manifest root must be a JSON object")]
    RootNotAnObject,
    #[error("'dependencies' must be a JSON object")]
    DependenciesNotAnObject,
    #[error("failed to write manifest {path}: {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },
}

/// Dependencies commonly missing from the app manifest.
pub const CORE_DEPENDENCIES: &[(&str, &str)] = &[
    ("connect-mongo", "^4.6.0"),
    ("express", "^4.18.2"),
    ("express-session", "^1.17.3"),
    ("mongoose", "^7.5.0"),
    ("socket.io", "^4.7.2"),
    ("express-fileupload", "^1.4.0"),
    ("winston", "^3.10.0"),
    ("dotenv", "^16.3.1"),
];

/// The comprehensive set, applied with `--all`.
pub const EXTENDED_DEPENDENCIES: &[(&str, &str)] = &[
    ("handlebars", "^4.7.8"),
    ("@sentry/node", "^7.77.0"),
    ("express-fileupload", "^1.4.0"),
    ("swagger-jsdoc", "^6.2.8"),
    ("swagger-ui-express", "^5.0.0"),
    ("node-cron", "^3.0.2"),
    ("express-validator", "^7.0.1"),
    ("cookie-parser", "^1.4.6"),
    ("express-ejs-layouts", "^2.5.1"),
    ("method-override", "^3.0.0"),
    ("moment", "^2.29.4"),
    ("uuid", "^9.0.1"),
    ("axios", "^1.6.0"),
    ("lodash", "^4.17.21"),
    ("async", "^3.2.4"),
];

/// Inserts every pair from `deps` whose key is not already pinned in the
/// manifest's `dependencies` object (which is created when absent).
/// Existing pins are never overwritten. Returns the added pairs in input
/// order.
pub fn merge_dependencies(
    manifest: &mut Value,
    deps: &[(&str, &str)],
) -> Result<Vec<(String, String)>, ManifestError> {
    let root = manifest
        .as_object_mut()
        .ok_or(ManifestError::RootNotAnObject)?;

    let dependencies = root
        .entry("dependencies")
        .or_insert_with(|| Value::Object(Map::new()));

    let dependencies = dependencies
        .as_object_mut()
        .ok_or(ManifestError::DependenciesNotAnObject)?;

    let mut added = Vec::new();
    for &(name, version) in deps {
        if !dependencies.contains_key(name) {
            dependencies.insert(name.to_string(), Value::String(version.to_string()));
            added.push((name.to_string(), version.to_string()));
        }
    }

    Ok(added)
}

/// Reads a manifest, merges `deps`, and writes it back pretty-printed with
/// two-space indentation. The file is rewritten only when something was
/// actually added.
pub fn patch_file(
    path: &Path,
    deps: &[(&str, &str)],
) -> Result<Vec<(String, String)>, ManifestError> {
    let display_path = path.display().to_string();

    let content = std::fs::read_to_string(path).map_err(|source| ManifestError::Read {
        path: display_path.clone(),
        source,
    })?;

    let mut manifest: Value =
        serde_json::from_str(&content).map_err(|source| ManifestError::Parse {
            path: display_path.clone(),
            source,
        })?;

    let added = merge_dependencies(&mut manifest, deps)?;

    if !added.is_empty() {
        let mut output = serde_json::to_string_pretty(&manifest).map_err(|source| {
            ManifestError::Parse {
                path: display_path.clone(),
                source,
            }
        })?;
        output.push('\n');

        std::fs::write(path, output).map_err(|source| ManifestError::Write {
            path: display_path,
            source,
        })?;
    }

    Ok(added)
}
