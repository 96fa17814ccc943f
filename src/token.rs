use crate::style::{HeadingLevel, StyleAttribute};

/// One element of the tokenized text stream.
///
/// `Text` and `Space` are the placeable tokens: they are the only tokens
/// that receive geometry during layout. The rest are structural markers
/// that update the active style and are preserved in order for the
/// renderer to replay.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// A run of text rendered under one unchanging style.
    Text(String),
    /// A single inter-word space.
    Space,
    /// An explicit line break from a line feed in the input.
    LineBreak,
    /// A `#` or `##` heading opened at the start of a line.
    Heading(HeadingLevel),
    /// Emitted when a heading block is closed by the next line break;
    /// reverts the active style to the default.
    ParagraphReset,
    /// A bold/italic/underline toggle. Toggles flip, they do not nest.
    Style { attribute: StyleAttribute, on: bool },
}

/// How the tokenizer treats spaces between words.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum TokenizerMode {
    /// Spaces become standalone [`Token::Space`] tokens. This is the
    /// canonical mode, and the only one under which justification is
    /// meaningful.
    #[default]
    SplitSpaces,
    /// Legacy compatibility mode: each space is glued onto the end of the
    /// preceding word run and no `Space` tokens are emitted. Justification
    /// degrades under this mode; prefer [`TokenizerMode::SplitSpaces`].
    GluedSpaces,
}

/// Parses text with lightweight inline markup into an ordered token stream.
///
/// Recognized markup: `**bold**`, `*italic*`, `_underline_`, `#`/`##`
/// headings at the start of a line, and backslash escapes (`\\` for a
/// literal backslash, `\x` to suppress the special meaning of `x`).
///
/// Unmatched toggles are not an error: an unterminated `**` simply leaves
/// bold active through the end of the text.
pub fn tokenize(text: &str, mode: TokenizerMode) -> Vec<Token> {
    let text = text.replace("\r\n", "\n").replace("\n\r", "\n");
    let chars: Vec<char> = text.chars().collect();

    let mut tokens: Vec<Token> = Vec::new();
    let mut buffer = String::new();
    let mut bold = false;
    let mut italic = false;
    let mut underline = false;
    let mut heading_open = false;
    let mut ignore_whitespace = false;
    let mut escaped = false;

    fn flush(buffer: &mut String, tokens: &mut Vec<Token>) {
        if !buffer.is_empty() {
            tokens.push(Token::Text(std::mem::take(buffer)));
        }
    }

    let mut i = 0usize;
    while i < chars.len() {
        let ch = chars[i];
        let next = chars.get(i + 1).copied();

        if ch == '\\' {
            if next == Some('\\') {
                buffer.push('\\');
                i += 2;
            } else {
                escaped = true;
                i += 1;
            }
            continue;
        }

        if ch == '*' && next == Some('*') && !escaped {
            flush(&mut buffer, &mut tokens);
            bold = !bold;
            tokens.push(Token::Style {
                attribute: StyleAttribute::Bold,
                on: bold,
            });
            i += 2;
            continue;
        }

        if ch == '*' && !escaped {
            flush(&mut buffer, &mut tokens);
            italic = !italic;
            tokens.push(Token::Style {
                attribute: StyleAttribute::Italic,
                on: italic,
            });
            i += 1;
            continue;
        }

        if ch == '_' && !escaped {
            flush(&mut buffer, &mut tokens);
            underline = !underline;
            tokens.push(Token::Style {
                attribute: StyleAttribute::Underline,
                on: underline,
            });
            i += 1;
            continue;
        }

        // headings only open when the buffer is empty, i.e. at the start of
        // a line or directly after another token boundary
        if ch == '#' && buffer.is_empty() && !escaped {
            if next == Some('#') {
                tokens.push(Token::Heading(HeadingLevel::H2));
                i += 2;
            } else {
                tokens.push(Token::Heading(HeadingLevel::H1));
                i += 1;
            }
            heading_open = true;
            // discard the separating space after the marker
            ignore_whitespace = true;
            continue;
        }

        if ch == '\n' {
            flush(&mut buffer, &mut tokens);
            tokens.push(Token::LineBreak);
            if heading_open {
                tokens.push(Token::ParagraphReset);
            }
            heading_open = false;
            ignore_whitespace = false;
            i += 1;
            continue;
        }

        if ch == ' ' {
            if !ignore_whitespace {
                match mode {
                    TokenizerMode::SplitSpaces => {
                        flush(&mut buffer, &mut tokens);
                        tokens.push(Token::Space);
                    }
                    TokenizerMode::GluedSpaces => {
                        buffer.push(' ');
                        flush(&mut buffer, &mut tokens);
                    }
                }
            }
            i += 1;
            continue;
        }

        buffer.push(ch);
        ignore_whitespace = false;
        escaped = false;
        i += 1;
    }

    flush(&mut buffer, &mut tokens);

    tokens
}
