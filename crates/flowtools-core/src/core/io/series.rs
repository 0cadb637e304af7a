use std::path::PathBuf;

pub const DEFAULT_EXTENSION: &str = ".dat";
pub const DEFAULT_NUM_DIGITS: usize = 5;

/// A map file belonging to a numbered frame of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameFile {
    pub number: u64,
    pub path: PathBuf,
}

/// Naming of the map files of a run: `<base><zero-padded frame number><extension>`.
///
/// The base is a plain prefix and may include directories, e.g. `run1/flow_`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameNaming {
    pub base: String,
    pub extension: String,
    pub num_digits: usize,
}

impl FrameNaming {
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            extension: DEFAULT_EXTENSION.to_string(),
            num_digits: DEFAULT_NUM_DIGITS,
        }
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    pub fn with_num_digits(mut self, num_digits: usize) -> Self {
        self.num_digits = num_digits;
        self
    }

    /// Same numbering under a different base.
    pub fn rebased(&self, base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            ..self.clone()
        }
    }

    pub fn path(&self, frame: u64) -> PathBuf {
        PathBuf::from(format!(
            "{}{:0width$}{}",
            self.base,
            frame,
            self.extension,
            width = self.num_digits
        ))
    }

    /// Finds the consecutive frames that exist on disk.
    ///
    /// Starts at frame `start` and stops at the first missing file or after frame `end`.
    pub fn discover(&self, start: u64, end: Option<u64>) -> Vec<FrameFile> {
        (start..)
            .take_while(|&number| end.is_none_or(|end| number <= end))
            .map(|number| FrameFile {
                number,
                path: self.path(number),
            })
            .take_while(|file| file.path.is_file())
            .collect()
    }
}
