//! Positional-argument validators.

use crate::command::node::Command;
use crate::error::ArgsError;
use std::fmt;
use std::sync::Arc;

/// Signature of an application-supplied validator
pub type ArgsFn = Arc<dyn Fn(&Command, &[String]) -> Result<(), ArgsError> + Send + Sync>;

/// Constraint on the positional arguments a command accepts.
#[derive(Clone)]
pub enum PositionalArgs {
    Arbitrary,
    None,
    Minimum(usize),
    Maximum(usize),
    Exact(usize),
    Range(usize, usize),
    /// Every argument must be one of the command's static valid args
    OnlyValid,
    /// Exactly N arguments, each one of the command's static valid args
    ExactValid(usize),
    Custom(ArgsFn),
}

impl PositionalArgs {
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&Command, &[String]) -> Result<(), ArgsError> + Send + Sync + 'static,
    {
        PositionalArgs::Custom(Arc::new(f))
    }

    pub fn validate(&self, command: &Command, args: &[String]) -> Result<(), ArgsError> {
        self.check_count(command, args.len())?;
        match self {
            PositionalArgs::OnlyValid | PositionalArgs::ExactValid(_) => {
                check_valid(command, args)
            }
            PositionalArgs::Custom(f) => f(command, args),
            _ => Ok(()),
        }
    }

    /// Validate `consumed` plus the in-progress token at the cursor.
    ///
    /// The in-progress token counts toward arity but its content is not
    /// checked, since it is usually a prefix of a valid value.
    pub(crate) fn validate_completion(
        &self,
        command: &Command,
        consumed: &[String],
        partial: &str,
    ) -> Result<(), ArgsError> {
        self.check_count(command, consumed.len() + 1)?;
        match self {
            PositionalArgs::OnlyValid | PositionalArgs::ExactValid(_) => {
                check_valid(command, consumed)
            }
            PositionalArgs::Custom(f) => {
                let mut args = consumed.to_vec();
                args.push(partial.to_string());
                f(command, &args)
            }
            _ => Ok(()),
        }
    }

    fn check_count(&self, command: &Command, received: usize) -> Result<(), ArgsError> {
        match *self {
            PositionalArgs::None if received > 0 => Err(ArgsError::NoArgs {
                command: command.name().to_string(),
                received,
            }),
            PositionalArgs::Minimum(min) if received < min => {
                Err(ArgsError::TooFew { min, received })
            }
            PositionalArgs::Maximum(max) if received > max => {
                Err(ArgsError::TooMany { max, received })
            }
            PositionalArgs::Exact(expected) | PositionalArgs::ExactValid(expected)
                if received != expected =>
            {
                Err(ArgsError::WrongCount { expected, received })
            }
            PositionalArgs::Range(min, max) if received < min || received > max => {
                Err(ArgsError::OutOfRange { min, max, received })
            }
            _ => Ok(()),
        }
    }
}

fn check_valid(command: &Command, args: &[String]) -> Result<(), ArgsError> {
    if command.valid_arg_candidates().is_empty() {
        return Ok(());
    }
    for arg in args {
        if !command.valid_arg_candidates().iter().any(|v| &v.value == arg) {
            return Err(ArgsError::InvalidArg {
                command: command.name().to_string(),
                arg: arg.clone(),
            });
        }
    }
    Ok(())
}

impl fmt::Debug for PositionalArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PositionalArgs::Arbitrary => write!(f, "Arbitrary"),
            PositionalArgs::None => write!(f, "None"),
            PositionalArgs::Minimum(n) => write!(f, "Minimum({})", n),
            PositionalArgs::Maximum(n) => write!(f, "Maximum({})", n),
            PositionalArgs::Exact(n) => write!(f, "Exact({})", n),
            PositionalArgs::Range(a, b) => write!(f, "Range({}, {})", a, b),
            PositionalArgs::OnlyValid => write!(f, "OnlyValid"),
            PositionalArgs::ExactValid(n) => write!(f, "ExactValid({})", n),
            PositionalArgs::Custom(_) => write!(f, "Custom(..)"),
        }
    }
}
