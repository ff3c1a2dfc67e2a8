// Command Domain Model

use serde::{Deserialize, Serialize};

const MASK: &str = "******";

/// Single command-line argument
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum CommandArg {
    Plain(String),
    /// Credentials and the like; masked whenever displayed
    Secret(String),
}

impl CommandArg {
    pub fn value(&self) -> &str {
        match self {
            CommandArg::Plain(v) | CommandArg::Secret(v) => v,
        }
    }

    pub fn display(&self) -> &str {
        match self {
            CommandArg::Plain(v) => v,
            CommandArg::Secret(_) => MASK,
        }
    }
}

impl From<&str> for CommandArg {
    fn from(v: &str) -> Self {
        CommandArg::Plain(v.to_string())
    }
}

impl From<String> for CommandArg {
    fn from(v: String) -> Self {
        CommandArg::Plain(v)
    }
}

/// Command synthesized from a request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "form", rename_all = "snake_case")]
pub enum CommandSpec {
    /// Program plus argument vector, executed without a shell
    Argv {
        program: String,
        args: Vec<CommandArg>,
    },
    /// Flat string handed to `sh -c`
    Shell { script: String },
}

impl CommandSpec {
    pub fn argv<I, A>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<CommandArg>,
    {
        CommandSpec::Argv {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    pub fn shell(script: impl Into<String>) -> Self {
        CommandSpec::Shell {
            script: script.into(),
        }
    }

    /// Program and raw argument strings, ready for spawning
    pub fn to_argv(&self) -> (String, Vec<String>) {
        match self {
            CommandSpec::Argv { program, args } => (
                program.clone(),
                args.iter().map(|a| a.value().to_string()).collect(),
            ),
            CommandSpec::Shell { script } => {
                ("sh".to_string(), vec!["-c".to_string(), script.clone()])
            }
        }
    }

    /// Plain argument strings only, in order (secrets excluded)
    pub fn plain_args(&self) -> Vec<&str> {
        match self {
            CommandSpec::Argv { args, .. } => args
                .iter()
                .filter_map(|a| match a {
                    CommandArg::Plain(v) => Some(v.as_str()),
                    CommandArg::Secret(_) => None,
                })
                .collect(),
            CommandSpec::Shell { script } => script.split_whitespace().collect(),
        }
    }
}

impl std::fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommandSpec::Argv { program, args } => {
                write!(f, "{}", program)?;
                for arg in args {
                    write!(f, " {}", arg.display())?;
                }
                Ok(())
            }
            CommandSpec::Shell { script } => write!(f, "{}", script),
        }
    }
}
