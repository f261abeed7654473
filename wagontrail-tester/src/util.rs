use std::path::PathBuf;

use wagontrail_game::ConfigLoader;

/// Reads the trail tuning overlay from disk when a path was given.
#[derive(Debug, Clone, Default)]
pub struct FileConfigLoader {
    path: Option<PathBuf>,
}

impl FileConfigLoader {
    #[must_use]
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }
}

impl ConfigLoader for FileConfigLoader {
    type Error = std::io::Error;

    fn load_config_json(&self) -> Result<Option<String>, Self::Error> {
        self.path.as_ref().map(std::fs::read_to_string).transpose()
    }
}

pub fn split_csv(s: &str) -> Vec<String> {
    s.split(',')
        .map(|x| x.trim().to_string())
        .filter(|x| !x.is_empty())
        .collect()
}
