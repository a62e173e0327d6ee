use crate::kernel::services::ports::{IconReply, IconResolver};

/// Answers every request right away with an icon name taken from the file
/// extension (`"file"` when there is none).
#[derive(Debug, Default, Clone, Copy)]
pub struct ExtensionIconResolver;

pub fn icon_for_extension(ext: &str) -> &'static str {
    match ext.to_ascii_lowercase().as_str() {
        "rs" => "rust",
        "go" => "go",
        "py" => "python",
        "js" | "mjs" | "cjs" => "javascript",
        "ts" | "tsx" => "typescript",
        "c" | "h" => "c",
        "cc" | "cpp" | "hpp" => "cpp",
        "java" => "java",
        "json" => "json",
        "toml" => "toml",
        "yaml" | "yml" => "yaml",
        "md" | "markdown" => "markdown",
        "html" | "htm" => "html",
        "css" => "css",
        "sh" | "bash" => "shell",
        _ => "file",
    }
}

impl IconResolver for ExtensionIconResolver {
    fn resolve(&self, reply: IconReply) {
        let icon = reply
            .file()
            .extension()
            .and_then(|e| e.to_str())
            .map_or("file", icon_for_extension);
        reply.send(icon);
    }
}
