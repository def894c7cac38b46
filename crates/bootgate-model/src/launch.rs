use std::{fmt, path::PathBuf};

use crate::{ModelError, ModelResult};

/// A program invocation: either a management step run to completion or the
/// final dispatch target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchSpec {
    pub program: String,
    pub args: Vec<String>,
    /// Working directory; `None` inherits the gate's.
    pub cwd: Option<PathBuf>,
}

impl LaunchSpec {
    pub fn new<P, I, A>(program: P, args: I) -> Self
    where
        P: Into<String>,
        I: IntoIterator<Item = A>,
        A: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            cwd: None,
        }
    }

    /// Build from a literal argument vector (`argv[0]` is the program).
    pub fn from_argv(argv: &[String]) -> ModelResult<Self> {
        let (program, args) = argv
            .split_first()
            .ok_or_else(|| ModelError::Invalid("empty command line".into()))?;
        let spec = Self::new(program.clone(), args.iter().cloned());
        spec.validate()?;
        Ok(spec)
    }

    pub fn with_cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    /// Rules:
    /// - `program` is not empty or whitespace-only.
    pub fn validate(&self) -> ModelResult<()> {
        if self.program.trim().is_empty() {
            return Err(ModelError::Invalid("program is empty".into()));
        }
        Ok(())
    }
}

impl fmt::Display for LaunchSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}
