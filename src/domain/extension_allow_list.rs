use std::collections::HashSet;

pub const DEFAULT_ALLOWED_EXTENSIONS: [&str; 4] = ["wav", "mp3", "ogg", "flac"];

/// Returns the text after the last `.` of `filename`, or `None` when there is no dot.
pub fn file_extension(filename: &str) -> Option<&str> {
    filename.rsplit_once('.').map(|(_, extension)| extension)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionAllowList {
    extensions: HashSet<String>,
}

impl ExtensionAllowList {
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let extensions = extensions
            .into_iter()
            .map(|ext| ext.as_ref().trim().trim_start_matches('.').to_lowercase())
            .filter(|ext| !ext.is_empty())
            .collect();
        Self { extensions }
    }

    pub fn is_allowed(&self, filename: &str) -> bool {
        match file_extension(filename) {
            Some(extension) => self.extensions.contains(&extension.to_lowercase()),
            None => false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }
}

impl Default for ExtensionAllowList {
    fn default() -> Self {
        Self::new(DEFAULT_ALLOWED_EXTENSIONS)
    }
}
