//! Query scanner.
//!
//! Converts raw query text into a stream of tokens, applying the escape rules and the enabled
//! feature flags. Scanning never fails: any sequence that cannot be read as an operator is
//! read as term text.
//!
//! # Escaping
//!
//! `\` removes the special meaning of the next character, inside terms and phrases alike.
//! `-` is special only as the first character of a term and `*` only as the last, so
//! `term-1` and `term*1` need no escaping. A backslash before an ordinary character is
//! dropped and the character kept.
//!
//! # Unbalanced input
//!
//! Parentheses are operators only when they pair up, and a quote only opens a phrase when a
//! closing quote follows. A lone `(`, `)` or `"` is an ordinary character of the term it
//! starts or sits in.

use tracing::trace;

use crate::flags::{Flag, Flags};

/// A token in the query language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Plain term text, escapes removed.
    Term(String),

    /// A term ending in an unescaped `*`, stored without the marker.
    Prefix(String),

    /// A term with a `~N` suffix, N > 0.
    Fuzzy {
        /// Term text.
        text: String,
        /// Requested edit distance, not yet clamped.
        distance: u32,
    },

    /// A quoted phrase (quotes stripped), with its `~N` slop if any.
    Phrase {
        /// Phrase text, escapes removed.
        text: String,
        /// Requested slop; 0 when absent.
        slop: u32,
    },

    /// `+`.
    And,

    /// `|`.
    Or,

    /// Leading `-`.
    Not,

    /// Matched `(`.
    LParen,

    /// Matched `)`.
    RParen,
}

/// Whether `ch` delimits tokens when whitespace splitting is enabled.
fn is_whitespace(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\n' | '\r')
}

/// Returns the index of the first unescaped `"` at or after `from`.
fn find_closing_quote(chars: &[char], from: usize, escape: bool) -> Option<usize> {
    let mut i = from;
    while i < chars.len() {
        match chars[i] {
            '\\' if escape => i += 2,
            '"' => return Some(i),
            _ => i += 1,
        }
    }
    None
}

/// Marks the quotes and parentheses that act as operators.
///
/// A quote is structural when a closing quote follows it; parentheses are structural when they
/// pair up. Characters inside phrases and escaped characters are never structural.
fn mark_structural(chars: &[char], flags: Flags) -> Vec<bool> {
    let escape = flags.contains(Flag::Escape);
    let phrase = flags.contains(Flag::Phrase);
    let precedence = flags.contains(Flag::Precedence);

    let mut structural = vec![false; chars.len()];
    let mut open = Vec::new();
    let mut unmatched_close = 0usize;
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            '\\' if escape => {
                i += 2;
                continue;
            }
            '"' if phrase => {
                if let Some(close) = find_closing_quote(chars, i + 1, escape) {
                    structural[i] = true;
                    structural[close] = true;
                    i = close + 1;
                    continue;
                }
                trace!(position = i, "unclosed quote read as text");
            }
            '(' if precedence => open.push(i),
            ')' if precedence => match open.pop() {
                Some(start) => {
                    structural[start] = true;
                    structural[i] = true;
                }
                None => unmatched_close += 1,
            },
            _ => {}
        }
        i += 1;
    }

    if !open.is_empty() || unmatched_close > 0 {
        trace!(
            unmatched_open = open.len(),
            unmatched_close, "unbalanced parentheses read as text"
        );
    }

    structural
}

/// Tokenizes a query string.
struct Lexer {
    /// Input characters.
    chars: Vec<char>,
    /// Which characters act as quote or parenthesis operators.
    structural: Vec<bool>,
    /// Current character index.
    position: usize,
    /// Enabled features.
    flags: Flags,
}

impl Lexer {
    /// Creates a new lexer for the given input.
    fn new(input: &str, flags: Flags) -> Self {
        let chars: Vec<char> = input.chars().collect();
        let structural = mark_structural(&chars, flags);
        Self {
            chars,
            structural,
            position: 0,
            flags,
        }
    }

    /// Tokenizes the entire input.
    fn tokenize(mut self) -> Vec<Token> {
        let mut tokens = Vec::new();

        while let Some(token) = self.next_token() {
            tokens.push(token);
        }

        tokens
    }

    /// Returns the next token, or None at end of input.
    fn next_token(&mut self) -> Option<Token> {
        loop {
            self.skip_whitespace();
            let ch = self.peek()?;

            let token = match ch {
                '(' if self.is_structural() => {
                    self.advance();
                    Some(Token::LParen)
                }
                ')' if self.is_structural() => {
                    self.advance();
                    Some(Token::RParen)
                }
                '"' if self.is_structural() => self.read_phrase(),
                '"' if self.flags.contains(Flag::Phrase) => self.read_term(true),
                '+' if self.flags.contains(Flag::And) => {
                    self.advance();
                    Some(Token::And)
                }
                '|' if self.flags.contains(Flag::Or) => {
                    self.advance();
                    Some(Token::Or)
                }
                '-' if self.flags.contains(Flag::Not) => {
                    self.advance();
                    if self.starts_operand() {
                        Some(Token::Not)
                    } else {
                        trace!(position = self.position - 1, "dropped dangling '-'");
                        None
                    }
                }
                '(' | ')' => self.read_term(true),
                _ => self.read_term(false),
            };

            if token.is_some() {
                return token;
            }
        }
    }

    /// Reads a phrase whose opening quote is at the current position.
    ///
    /// Returns None for an empty phrase.
    fn read_phrase(&mut self) -> Option<Token> {
        self.advance(); // opening quote

        let mut text = String::new();
        let mut escaped = false;

        while let Some(ch) = self.peek() {
            if !escaped {
                if ch == '\\' && self.flags.contains(Flag::Escape) {
                    escaped = true;
                    self.advance();
                    continue;
                }
                if ch == '"' {
                    break;
                }
            }
            escaped = false;
            text.push(ch);
            self.advance();
        }
        self.advance(); // closing quote

        let slop = if self.peek() == Some('~') && self.flags.contains(Flag::Near) {
            self.advance();
            self.read_number()
        } else {
            0
        };

        if text.is_empty() {
            return None;
        }

        Some(Token::Phrase { text, slop })
    }

    /// Reads a term, prefix or fuzzy token.
    ///
    /// With `literal_first`, the current character is taken as text even if it would otherwise
    /// end the token (an unbalanced quote or parenthesis).
    fn read_term(&mut self, literal_first: bool) -> Option<Token> {
        let mut text = String::new();
        let mut escaped = false;
        let mut prefix = false;

        if literal_first && let Some(ch) = self.peek() {
            text.push(ch);
            self.advance();
        }

        while let Some(ch) = self.peek() {
            if !escaped {
                if ch == '\\' && self.flags.contains(Flag::Escape) {
                    escaped = true;
                    prefix = false;
                    self.advance();
                    continue;
                }
                if self.at_boundary() {
                    break;
                }
                if ch == '~' && !text.is_empty() && self.flags.contains(Flag::Fuzzy) {
                    self.advance();
                    return Some(match self.read_number() {
                        0 => Token::Term(text),
                        distance => Token::Fuzzy { text, distance },
                    });
                }
                prefix = ch == '*' && !text.is_empty() && self.flags.contains(Flag::Prefix);
            }
            escaped = false;
            text.push(ch);
            self.advance();
        }

        if text.is_empty() {
            return None;
        }

        if prefix {
            text.pop();
            return Some(Token::Prefix(text));
        }

        Some(Token::Term(text))
    }

    /// Reads the number after a `~` up to the end of the token.
    ///
    /// Anything that is not a non-negative integer reads as 0.
    fn read_number(&mut self) -> u32 {
        let mut digits = String::new();
        while let Some(ch) = self.peek() {
            if self.at_boundary() {
                break;
            }
            digits.push(ch);
            self.advance();
        }

        digits
            .parse::<i64>()
            .map(|n| u32::try_from(n.max(0)).unwrap_or(u32::MAX))
            .unwrap_or(0)
    }

    /// Whether the current character ends a term.
    fn at_boundary(&self) -> bool {
        let Some(ch) = self.peek() else {
            return true;
        };

        match ch {
            '"' | '(' | ')' => self.is_structural(),
            '|' => self.flags.contains(Flag::Or),
            '+' => self.flags.contains(Flag::And),
            c if is_whitespace(c) => self.flags.contains(Flag::Whitespace),
            _ => false,
        }
    }

    /// Whether the current position begins something a `-` can negate.
    fn starts_operand(&self) -> bool {
        match self.peek() {
            None => false,
            Some('-') => true,
            Some(')') => !self.is_structural(),
            Some(_) => !self.at_boundary() || matches!(self.peek(), Some('"' | '(')),
        }
    }

    /// Whether the current character is a structural quote or parenthesis.
    fn is_structural(&self) -> bool {
        self.structural.get(self.position).copied().unwrap_or(false)
    }

    /// Skips whitespace characters when whitespace delimits tokens.
    fn skip_whitespace(&mut self) {
        if !self.flags.contains(Flag::Whitespace) {
            return;
        }
        while let Some(ch) = self.peek() {
            if is_whitespace(ch) {
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Returns the current character.
    fn peek(&self) -> Option<char> {
        self.chars.get(self.position).copied()
    }

    /// Advances to the next character.
    fn advance(&mut self) {
        if self.position < self.chars.len() {
            self.position += 1;
        }
    }
}

/// Tokenizes a query string under the given flags. Never fails.
pub fn tokenize(input: &str, flags: Flags) -> Vec<Token> {
    Lexer::new(input, flags).tokenize()
}
