//! Ordered argument list.

use std::fmt;

/// An append-only, ordered list of argument tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArgList {
    args: Vec<String>,
}

impl ArgList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends tokens in order.
    pub fn append<I, S>(&mut self, tokens: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(tokens.into_iter().map(Into::into));
        self
    }

    /// Appends a single token.
    pub fn push(&mut self, token: impl Into<String>) -> &mut Self {
        self.args.push(token.into());
        self
    }

    pub fn len(&self) -> usize {
        self.args.len()
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.args
    }

    /// Number of occurrences of `token`.
    pub fn count(&self, token: &str) -> usize {
        self.args.iter().filter(|a| *a == token).count()
    }

    /// Position of the first occurrence of `token`.
    pub fn position(&self, token: &str) -> Option<usize> {
        self.args.iter().position(|a| a == token)
    }

    pub fn into_vec(self) -> Vec<String> {
        self.args
    }
}

impl From<ArgList> for Vec<String> {
    fn from(list: ArgList) -> Self {
        list.args
    }
}

impl fmt::Display for ArgList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.args.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_keeps_order() {
        let mut list = ArgList::new();
        list.append(["-v", "error"]).push("-y").append(vec!["-i".to_string()]);
        assert_eq!(list.as_slice(), ["-v", "error", "-y", "-i"]);
        assert_eq!(list.len(), 4);
        assert_eq!(list.position("-y"), Some(2));
        assert_eq!(list.count("-i"), 1);
        assert_eq!(list.to_string(), "-v error -y -i");
    }
}
