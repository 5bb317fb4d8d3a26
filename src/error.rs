use std::path::PathBuf;

/// Failure to load the timetable configuration. The resolver itself never fails, so these are
/// the only errors a board can show.
#[derive(thiserror::Error, Debug)]
pub enum LoadError {
    #[error("Could not find {file} in any of {}", display_paths(.searched))]
    NotFound {
        file: &'static str,
        searched: Vec<PathBuf>,
    },
    #[error("Malformed timetable in {}: {source}", .path.display())]
    Malformed {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl LoadError {
    /// Distinguishes missing configuration from configuration which is present but unusable
    pub fn is_not_found(&self) -> bool {
        matches!(self, LoadError::NotFound { .. })
    }
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|path| path.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn not_found_lists_the_searched_directories() {
        let err = LoadError::NotFound {
            file: "schedule.json",
            searched: vec![PathBuf::from("config"), PathBuf::from(".")],
        };
        assert!(err.is_not_found());
        assert_eq!(
            err.to_string(),
            "Could not find schedule.json in any of config, ."
        );
    }

    #[test]
    fn malformed_names_the_file() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = LoadError::Malformed {
            path: PathBuf::from("config/schedule.json"),
            source,
        };
        assert!(!err.is_not_found());
        assert!(err
            .to_string()
            .starts_with("Malformed timetable in config/schedule.json: "));
    }
}
