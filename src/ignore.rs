use crate::config::OrganizerConfig;

/// Keyword based exclusion of folders and files.
///
/// Matching is a case-insensitive substring test, so `EXTRAS` also hides
/// `Behind the Extras Reel`.
#[derive(Debug, Clone)]
pub struct IgnoreFilter {
    folder_keywords: Vec<String>,
    file_keywords: Vec<String>,
}

impl IgnoreFilter {
    pub fn new(config: &OrganizerConfig) -> Self {
        Self {
            folder_keywords: upper_all(&config.folder_ignore_keywords),
            file_keywords: upper_all(&config.file_ignore_keywords),
        }
    }

    pub fn is_ignored_folder(&self, name: &str) -> bool {
        contains_any(name, &self.folder_keywords)
    }

    pub fn is_ignored_file(&self, name: &str) -> bool {
        contains_any(name, &self.file_keywords)
    }
}

fn upper_all(keywords: &[String]) -> Vec<String> {
    keywords
        .iter()
        .filter(|k| !k.is_empty())
        .map(|k| k.to_uppercase())
        .collect()
}

fn contains_any(name: &str, keywords: &[String]) -> bool {
    let name = name.to_uppercase();
    keywords.iter().any(|k| name.contains(k.as_str()))
}
