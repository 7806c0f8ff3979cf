use serde::{Deserialize, Serialize};

/// Syntax mode of the embedded widget.
///
/// Tokens come from the parent as free-form strings; anything unrecognized
/// maps to plain text, never an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    Rust,
    Go,
    Python,
    JavaScript,
    TypeScript,
    C,
    Cpp,
    Java,
    Json,
    Yaml,
    Html,
    Css,
    Xml,
    Toml,
    Bash,
    Sql,
    Markdown,
    PlainText,
}

impl Language {
    pub fn from_token(token: &str) -> Self {
        match token.to_ascii_lowercase().as_str() {
            "rust" | "rs" => Self::Rust,
            "go" | "golang" => Self::Go,
            "python" | "py" => Self::Python,
            "javascript" | "js" => Self::JavaScript,
            "typescript" | "ts" => Self::TypeScript,
            "c" => Self::C,
            "cpp" | "c++" | "cxx" => Self::Cpp,
            "java" => Self::Java,
            "json" => Self::Json,
            "yaml" | "yml" => Self::Yaml,
            "html" => Self::Html,
            "css" => Self::Css,
            "xml" => Self::Xml,
            "toml" => Self::Toml,
            "bash" | "sh" | "shell" => Self::Bash,
            "sql" => Self::Sql,
            "markdown" | "md" => Self::Markdown,
            _ => Self::PlainText,
        }
    }

    pub fn mode_id(self) -> &'static str {
        match self {
            Self::Rust => "rust",
            Self::Go => "go",
            Self::Python => "python",
            Self::JavaScript => "javascript",
            Self::TypeScript => "typescript",
            Self::C => "c",
            Self::Cpp => "cpp",
            Self::Java => "java",
            Self::Json => "json",
            Self::Yaml => "yaml",
            Self::Html => "html",
            Self::Css => "css",
            Self::Xml => "xml",
            Self::Toml => "toml",
            Self::Bash => "bash",
            Self::Sql => "sql",
            Self::Markdown => "markdown",
            Self::PlainText => "text",
        }
    }
}
