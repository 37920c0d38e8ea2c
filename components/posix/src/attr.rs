//! Process attributes for `start_process`

use host_platform::HostValue;

/// Attributes of a process to spawn
///
/// `dir` empty means the caller's working directory; `env` `None` means the
/// caller's environment. `files` are handed to the host verbatim as the
/// child's stdio array.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProcAttr {
    pub dir: String,
    pub env: Option<Vec<String>>,
    pub files: Vec<HostValue>,
}

impl ProcAttr {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dir(mut self, dir: impl Into<String>) -> Self {
        self.dir = dir.into();
        self
    }

    pub fn env<I, S>(mut self, env: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.env = Some(env.into_iter().map(Into::into).collect());
        self
    }

    pub fn files(mut self, files: Vec<HostValue>) -> Self {
        self.files = files;
        self
    }
}
