use std::fmt;

#[derive(Debug, PartialEq, Eq)]
pub enum ConversionError {
    MissingArgument,
    BadArgument(&'static str),
}

impl fmt::Display for ConversionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingArgument => write!(f, "missing command argument"),
            Self::BadArgument(reason) => write!(f, "bad command argument: {reason}"),
        }
    }
}

pub trait ConvertArgument: Sized {
    fn convert(arguments: &str) -> Result<(Self, &str), ConversionError>;
}

/// Everything left in the arguments, with surrounding whitespace removed.
#[derive(Debug, PartialEq, Eq)]
pub struct StringGreedy(pub String);

impl ConvertArgument for StringGreedy {
    fn convert(arguments: &str) -> Result<(Self, &str), ConversionError> {
        let argument = arguments.trim();

        if argument.is_empty() {
            Err(ConversionError::MissingArgument)?;
        }

        if argument.chars().count() > 512 {
            Err(ConversionError::BadArgument("this query is too long (>512)."))?;
        }

        Ok((Self(argument.into()), ""))
    }
}
