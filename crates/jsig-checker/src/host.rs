//! Boundary to the external parsers and the file system.
//!
//! The checker never reads files or parses text. A `CompilerHost` hands it
//! parsed source trees and parsed header programs by path.

use crate::error_handler::{CheckResult, CheckerError};
use jsig_ast::{SourceFile, TypeProgram};
use rustc_hash::FxHashMap;
use std::rc::Rc;

pub trait CompilerHost {
    /// Parsed source tree and text for `path`, if the file exists.
    fn source_file(&self, path: &str) -> Option<Rc<SourceFile>>;

    /// Parsed header program for `path`, if the file exists.
    fn header_file(&self, path: &str) -> Option<Rc<TypeProgram>>;
}

/// In-memory host keyed by normalized path.
#[derive(Default)]
pub struct MemoryHost {
    sources: FxHashMap<String, Rc<SourceFile>>,
    headers: FxHashMap<String, Rc<TypeProgram>>,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_source(&mut self, source: SourceFile) -> &mut Self {
        let path = normalize_path(&source.path);
        self.sources.insert(path, Rc::new(source));
        self
    }

    pub fn add_header(&mut self, path: &str, program: TypeProgram) -> &mut Self {
        self.headers.insert(normalize_path(path), Rc::new(program));
        self
    }

    /// Add a source file from the ESTree JSON its parser emitted.
    pub fn add_source_json(&mut self, path: &str, text: &str, json: &str) -> CheckResult<&mut Self> {
        let source = SourceFile::from_json(path, text, json).map_err(|e| CheckerError::InvalidJson {
            kind: "source",
            path: path.to_string(),
            message: e.to_string(),
        })?;
        Ok(self.add_source(source))
    }

    /// Add a header from the JSON the signature grammar emitted.
    pub fn add_header_json(&mut self, path: &str, json: &str) -> CheckResult<&mut Self> {
        let program: TypeProgram =
            serde_json::from_str(json).map_err(|e| CheckerError::InvalidJson {
                kind: "header",
                path: path.to_string(),
                message: e.to_string(),
            })?;
        Ok(self.add_header(path, program))
    }
}

impl CompilerHost for MemoryHost {
    fn source_file(&self, path: &str) -> Option<Rc<SourceFile>> {
        self.sources.get(&normalize_path(path)).cloned()
    }

    fn header_file(&self, path: &str) -> Option<Rc<TypeProgram>> {
        self.headers.get(&normalize_path(path)).cloned()
    }
}

// ===== Paths =====

/// Whether a module request is a relative or absolute path rather than a
/// bare package name.
pub fn is_path_request(request: &str) -> bool {
    request.starts_with("./") || request.starts_with("../") || request.starts_with('/')
}

/// Resolve `request` against the directory containing `from`.
pub fn resolve_request(from: &str, request: &str) -> String {
    if request.starts_with('/') {
        return normalize_path(request);
    }
    let dir = match from.rfind('/') {
        Some(idx) => &from[..idx],
        None => ".",
    };
    normalize_path(&format!("{dir}/{request}"))
}

/// Collapse `.` and `..` segments and repeated separators.
pub fn normalize_path(path: &str) -> String {
    let absolute = path.starts_with('/');
    let mut parts: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if matches!(parts.last(), Some(last) if *last != "..") {
                    parts.pop();
                } else if !absolute {
                    parts.push("..");
                }
            }
            other => parts.push(other),
        }
    }
    let joined = parts.join("/");
    if absolute { format!("/{joined}") } else { joined }
}

/// Append `.ext` unless the final segment already has an extension.
pub fn with_default_extension(path: &str, ext: &str) -> String {
    let file = path.rsplit('/').next().unwrap_or(path);
    if file.contains('.') {
        path.to_string()
    } else {
        format!("{path}.{ext}")
    }
}
