use std::fs::{self, File};
use std::io::{Error as IoError, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use snafu::prelude::*;

pub const DEFAULT_CONTENT: &str = r#"
# This configuration file is generated automatically. Feel free to do some
# modification.

# The `timer` section specifies the length of each phase in seconds and how
# many focus sessions make up a cycle.
[timer]
focus = 1500
short_break = 300
long_break = 900
sessions_until_long_break = 4
auto_start_breaks = true
auto_start_pomodoros = true

# The `notification.<notice>` section specifies the message shown in desktop
# notifications. `body` is optional.
[notification.focus]
summary = "Focus session completed!"
body = "Time for a break!"

[notification.short_break]
summary = "Break completed!"
body = "Time to focus!"

[notification.cycle]
summary = "Pomodoro cycle completed!"
body = "Great work today!"

# The `storage` section specifies where cycles and sessions are recorded.
# Leave it empty to use the XDG data directory.
# [storage]
# journal = "/path/to/journal.json"
"#;

/// A reader which reads the configuration content and creates a default
/// configuration file if it is missing.
pub struct ContentReader {
    path: PathBuf,
    create_new: bool,
}

impl ContentReader {
    /// Creates a new [`ContentReader`].
    pub fn new<P: AsRef<Path>>(path: P, create_new: bool) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            create_new,
        }
    }

    /// Read content from the file.
    ///
    /// # Errors
    ///
    /// This function will return an error if the file doesn't exist and may
    /// not be created, or any file system operation fails.
    pub fn read(self) -> Result<String, ReadContentError> {
        match fs::read_to_string(&self.path) {
            Ok(content) => Ok(content),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                ensure!(self.create_new, NotFoundSnafu { path: self.path });
                Self::create_default(&self.path)?;
                Ok(DEFAULT_CONTENT.to_owned())
            }
            Err(err) => Err(err).context(FileSystemSnafu {
                when: "Reading configuration",
            }),
        }
    }

    fn create_default(path: &Path) -> Result<(), ReadContentError> {
        tracing::info!(path = %path.display(), "Creating default configuration");
        let mut file = File::options()
            .write(true)
            .create_new(true)
            .open(path)
            .context(FileSystemSnafu {
                when: "Creating configuration file",
            })?;
        file.write_all(DEFAULT_CONTENT.as_bytes())
            .context(FileSystemSnafu {
                when: "Writing default configuration content",
            })
    }
}

/// An error type for reading content from the configuration file.
#[derive(Debug, Snafu, Clone)]
#[non_exhaustive]
pub enum ReadContentError {
    #[snafu(display("Could not open inexistent file {}", path.display()))]
    NotFound { path: PathBuf },
    #[snafu(display("Could not access configuration: {when}"))]
    FileSystem {
        when: String,
        #[snafu(source(from(IoError, Arc::new)))]
        source: Arc<IoError>,
    },
}
