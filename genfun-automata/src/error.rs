//! The reasons a regular expression can be rejected before compilation.

use genfun_error::ErrorKind;

/// A union operator with a missing operand, such as `a+` or `(+a)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MisplacedUnion;

impl ErrorKind for MisplacedUnion {
    fn message(&self) -> String {
        "missing operand for union operator".to_string()
    }

    fn labels(&self) -> Vec<String> {
        vec!["this operator".to_string()]
    }

    fn help(&self) -> Option<String> {
        Some("`+` must appear between two expressions".to_string())
    }
}

/// A repetition operator with nothing to repeat, such as `*a` or `(*`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MisplacedStar;

impl ErrorKind for MisplacedStar {
    fn message(&self) -> String {
        "missing operand for repetition operator".to_string()
    }

    fn labels(&self) -> Vec<String> {
        vec!["this operator".to_string()]
    }

    fn help(&self) -> Option<String> {
        Some("`*` must follow a character or a parenthesized group".to_string())
    }
}

/// A parenthesis without a counterpart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnmatchedParen {
    /// Whether the parenthesis in question is an opening parenthesis.
    pub opening: bool,
}

impl ErrorKind for UnmatchedParen {
    fn message(&self) -> String {
        "unmatched parenthesis".to_string()
    }

    fn labels(&self) -> Vec<String> {
        if self.opening {
            vec!["this opening parenthesis is never closed".to_string()]
        } else {
            vec!["this closing parenthesis has no counterpart".to_string()]
        }
    }
}
