//! printf-style numbering for output names.

use super::error::ArgsError;

/// A parsed padding pattern such as `%03d` or `-part%d`.
///
/// Exactly one integer directive (`%d`, `%Nd`, `%0Nd`, `%-Nd`) is allowed;
/// `%%` is a literal percent sign.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Padding {
    prefix: String,
    suffix: String,
    width: usize,
    zero_fill: bool,
    left_align: bool,
}

impl Padding {
    pub fn parse(pattern: &str) -> Result<Self, ArgsError> {
        let mut prefix = String::new();
        let mut suffix = String::new();
        let mut directive: Option<(usize, bool, bool)> = None;
        let mut chars = pattern.chars().peekable();

        while let Some(c) = chars.next() {
            if c != '%' {
                if directive.is_some() {
                    suffix.push(c);
                } else {
                    prefix.push(c);
                }
                continue;
            }

            if chars.peek() == Some(&'%') {
                chars.next();
                if directive.is_some() {
                    suffix.push('%');
                } else {
                    prefix.push('%');
                }
                continue;
            }

            if directive.is_some() {
                return Err(ArgsError::invalid_padding(
                    pattern,
                    "more than one directive",
                ));
            }

            let mut zero_fill = false;
            let mut left_align = false;
            while let Some(flag) = chars.peek().copied() {
                match flag {
                    '0' => zero_fill = true,
                    '-' => left_align = true,
                    _ => break,
                }
                chars.next();
            }

            let mut width = String::new();
            while let Some(d) = chars.peek().copied().filter(char::is_ascii_digit) {
                width.push(d);
                chars.next();
            }

            match chars.next() {
                Some('d') => {}
                Some(other) => {
                    return Err(ArgsError::invalid_padding(
                        pattern,
                        format!("unsupported verb '{}'", other),
                    ))
                }
                None => return Err(ArgsError::invalid_padding(pattern, "unterminated directive")),
            }

            let width = if width.is_empty() {
                0
            } else {
                width
                    .parse::<usize>()
                    .map_err(|_| ArgsError::invalid_padding(pattern, "width out of range"))?
            };
            directive = Some((width, zero_fill, left_align));
        }

        let (width, zero_fill, left_align) =
            directive.ok_or_else(|| ArgsError::invalid_padding(pattern, "missing %d directive"))?;

        Ok(Self {
            prefix,
            suffix,
            width,
            zero_fill,
            left_align,
        })
    }

    /// Renders the pattern for `number`.
    pub fn apply(&self, number: u32) -> String {
        let width = self.width;
        let digits = if self.left_align {
            format!("{:<width$}", number)
        } else if self.zero_fill {
            format!("{:0width$}", number)
        } else {
            format!("{:>width$}", number)
        };
        format!("{}{}{}", self.prefix, digits, self.suffix)
    }
}
