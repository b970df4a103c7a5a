use serde::{Deserialize, Serialize};

/// Settings shared by every file compiled through one `Program`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CheckerOptions {
    /// Directory holding header files for bare-module `require`s.
    pub definitions: Option<String>,
    /// Header whose assignments extend the global scope.
    pub globals_file: Option<String>,
    pub header_extension: String,
    pub source_extension: String,
}

impl Default for CheckerOptions {
    fn default() -> Self {
        Self {
            definitions: None,
            globals_file: None,
            header_extension: "hjs".to_string(),
            source_extension: "js".to_string(),
        }
    }
}

impl CheckerOptions {
    /// Companion header of a source file: `a/b.js` -> `a/b.hjs`.
    pub fn header_path(&self, source_path: &str) -> String {
        let suffix = format!(".{}", self.source_extension);
        match source_path.strip_suffix(&suffix) {
            Some(stem) => format!("{stem}.{}", self.header_extension),
            None => format!("{source_path}.{}", self.header_extension),
        }
    }

    /// Header for a bare module name inside `definitions`.
    pub fn definition_path(&self, module_name: &str) -> Option<String> {
        let dir = self.definitions.as_deref()?;
        Some(format!(
            "{}/{module_name}.{}",
            dir.trim_end_matches('/'),
            self.header_extension
        ))
    }
}
