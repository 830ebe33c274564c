use std::fmt;

#[derive(Debug)]
pub enum ParseError {
    UnterminatedString,
    UnterminatedGroup,
    UnmatchedCloseParen,
    DanglingBinder(&'static str),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::UnterminatedString => write!(f, "unterminated string literal"),
            ParseError::UnterminatedGroup => write!(f, "unterminated parenthesized group"),
            ParseError::UnmatchedCloseParen => write!(f, "unmatched ')'"),
            ParseError::DanglingBinder(kw) => {
                write!(f, "{kw} at end of input with no name/value to bind")
            }
        }
    }
}

impl std::error::Error for ParseError {}
