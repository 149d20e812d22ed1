use std::path::PathBuf;

use crate::input;

pub const DEFAULT_SDK: &str = "dotnet";
pub const DEFAULT_DECOMPILER: &str = "ilspycmd";
pub const DEFAULT_PACKAGE: &str = "ilspycmd";
pub const DLL_EXTENSION: &str = ".dll";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub sdk: String,
    pub decompiler: String,
    pub package: String,
    /// Where `dotnet tool install --global` puts its shims.
    pub tools_dir: Option<PathBuf>,
    pub extension: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sdk: DEFAULT_SDK.to_string(),
            decompiler: DEFAULT_DECOMPILER.to_string(),
            package: DEFAULT_PACKAGE.to_string(),
            tools_dir: default_tools_dir(),
            extension: DLL_EXTENSION.to_string(),
        }
    }
}

pub fn default_tools_dir() -> Option<PathBuf> {
    input::home_dir().map(|home| home.join(".dotnet").join("tools"))
}
