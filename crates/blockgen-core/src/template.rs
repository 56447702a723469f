//! Minimal `{{ .var }}` template engine for label values.
//!
//! Supported syntax is literal text interleaved with actions. An action is
//! one of:
//!
//! - a variable reference: `{{ .index }}`
//! - a `printf` call over variables: `{{ printf "%03d" .index }}`
//! - a comment: `{{/* ... */}}`
//!
//! `printf` understands the `%d`, `%s`, `%v` and `%%` verbs with optional
//! `0`/`-` flags and a width. `{{-` and `-}}` trim whitespace on the
//! adjacent side.
//!
//! Other Go template constructs (pipes with `|`, `if`/`range`, function
//! calls besides `printf`, `$` variables) are parse errors. Label rendering
//! keeps such values as literal text.

use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("unclosed action starting at byte {offset}")]
    Unclosed { offset: usize },

    #[error("empty action at byte {offset}")]
    EmptyAction { offset: usize },

    #[error("unsupported action {action:?}")]
    UnsupportedAction { action: String },

    #[error("undefined variable {name:?}")]
    UndefinedVariable { name: String },

    #[error("%{verb} expects an integer, got {value:?}")]
    NotAnInteger { verb: char, value: String },
}

/// Named values a template may reference.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Vars(BTreeMap<String, String>);

impl Vars {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.0.insert(name.into(), value.to_string());
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Text(String),
    Var(String),
    Printf { pieces: Vec<Piece>, args: Vec<String> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Piece {
    Text(String),
    Verb(Verb),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Verb {
    kind: char,
    zero: bool,
    left: bool,
    width: usize,
}

impl Verb {
    fn format(&self, value: &str) -> Result<String, TemplateError> {
        let w = self.width;
        if self.kind == 'd' {
            let n: i64 = value.parse().map_err(|_| TemplateError::NotAnInteger {
                verb: self.kind,
                value: value.to_string(),
            })?;
            return Ok(if self.left {
                format!("{n:<w$}")
            } else if self.zero {
                format!("{n:0w$}")
            } else {
                format!("{n:>w$}")
            });
        }
        Ok(if self.left {
            format!("{value:<w$}")
        } else if self.zero {
            format!("{value:0>w$}")
        } else {
            format!("{value:>w$}")
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    segments: Vec<Segment>,
}

impl Template {
    pub fn parse(src: &str) -> Result<Self, TemplateError> {
        let mut segments = Vec::new();
        let mut rest = src;
        let mut offset = 0;
        let mut trim_next = false;

        while let Some(open) = rest.find("{{") {
            let mut text = &rest[..open];
            if trim_next {
                text = text.trim_start();
            }
            let after_open = &rest[open + 2..];
            let close = after_open
                .find("}}")
                .ok_or(TemplateError::Unclosed { offset: offset + open })?;
            let mut body = &after_open[..close];

            if let Some(stripped) = strip_left_trim(body) {
                body = stripped;
                text = text.trim_end();
            }
            trim_next = false;
            if let Some(stripped) = strip_right_trim(body) {
                body = stripped;
                trim_next = true;
            }

            if !text.is_empty() {
                segments.push(Segment::Text(text.to_string()));
            }
            if let Some(seg) = parse_action(body, offset + open)? {
                segments.push(seg);
            }

            let consumed = open + 2 + close + 2;
            offset += consumed;
            rest = &rest[consumed..];
        }

        let tail = if trim_next { rest.trim_start() } else { rest };
        if !tail.is_empty() {
            segments.push(Segment::Text(tail.to_string()));
        }
        Ok(Self { segments })
    }

    pub fn execute(&self, vars: &Vars) -> Result<String, TemplateError> {
        let mut out = String::new();
        for seg in &self.segments {
            match seg {
                Segment::Text(t) => out.push_str(t),
                Segment::Var(name) => out.push_str(lookup(vars, name)?),
                Segment::Printf { pieces, args } => {
                    let mut args = args.iter();
                    for piece in pieces {
                        match piece {
                            Piece::Text(t) => out.push_str(t),
                            Piece::Verb(verb) => {
                                // Arity is checked at parse time.
                                let name = args.next().map(String::as_str).unwrap_or_default();
                                out.push_str(&verb.format(lookup(vars, name)?)?);
                            }
                        }
                    }
                }
            }
        }
        Ok(out)
    }
}

/// Parse and execute in one step.
pub fn render(src: &str, vars: &Vars) -> Result<String, TemplateError> {
    Template::parse(src)?.execute(vars)
}

fn lookup<'a>(vars: &'a Vars, name: &str) -> Result<&'a str, TemplateError> {
    vars.get(name)
        .ok_or_else(|| TemplateError::UndefinedVariable { name: name.to_string() })
}

// Go-style trim markers require whitespace between the dash and the body.
fn strip_left_trim(body: &str) -> Option<&str> {
    let stripped = body.strip_prefix('-')?;
    stripped
        .starts_with(|c: char| c.is_ascii_whitespace())
        .then_some(stripped)
}

fn strip_right_trim(body: &str) -> Option<&str> {
    let stripped = body.strip_suffix('-')?;
    stripped
        .ends_with(|c: char| c.is_ascii_whitespace())
        .then_some(stripped)
}

fn parse_action(body: &str, offset: usize) -> Result<Option<Segment>, TemplateError> {
    let body = body.trim();
    if body.is_empty() {
        return Err(TemplateError::EmptyAction { offset });
    }
    if body.starts_with("/*") && body.ends_with("*/") && body.len() >= 4 {
        return Ok(None);
    }
    let unsupported = || TemplateError::UnsupportedAction {
        action: body.to_string(),
    };
    if let Some(call) = body.strip_prefix("printf") {
        if call.starts_with(|c: char| c.is_ascii_whitespace()) {
            return parse_printf(call.trim_start()).ok_or_else(unsupported).map(Some);
        }
    }
    let name = variable(body).ok_or_else(unsupported)?;
    Ok(Some(Segment::Var(name.to_string())))
}

/// `.name` to `name`.
fn variable(token: &str) -> Option<&str> {
    let name = token.strip_prefix('.')?;
    let mut chars = name.chars();
    let valid_head = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    (valid_head && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')).then_some(name)
}

fn parse_printf(call: &str) -> Option<Segment> {
    let (format, rest) = string_literal(call)?;
    if !rest.is_empty() && !rest.starts_with(|c: char| c.is_ascii_whitespace()) {
        return None;
    }
    let args = rest
        .split_whitespace()
        .map(|t| variable(t).map(str::to_string))
        .collect::<Option<Vec<_>>>()?;
    let pieces = parse_format(&format)?;
    let verbs = pieces.iter().filter(|p| matches!(p, Piece::Verb(_))).count();
    (verbs == args.len()).then_some(Segment::Printf { pieces, args })
}

// Double-quoted with the common escapes, or a raw backtick string.
fn string_literal(src: &str) -> Option<(String, &str)> {
    if let Some(raw) = src.strip_prefix('`') {
        let end = raw.find('`')?;
        return Some((raw[..end].to_string(), &raw[end + 1..]));
    }
    let quoted = src.strip_prefix('"')?;
    let mut out = String::new();
    let mut chars = quoted.char_indices();
    while let Some((i, c)) = chars.next() {
        match c {
            '"' => return Some((out, &quoted[i + 1..])),
            '\\' => match chars.next()?.1 {
                'n' => out.push('\n'),
                't' => out.push('\t'),
                c @ ('"' | '\\') => out.push(c),
                _ => return None,
            },
            c => out.push(c),
        }
    }
    None
}

fn parse_format(format: &str) -> Option<Vec<Piece>> {
    let mut pieces = Vec::new();
    let mut text = String::new();
    let mut chars = format.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '%' {
            text.push(c);
            continue;
        }
        let mut verb = Verb {
            kind: ' ',
            zero: false,
            left: false,
            width: 0,
        };
        while let Some(&flag) = chars.peek() {
            match flag {
                '0' => verb.zero = true,
                '-' => verb.left = true,
                _ => break,
            }
            chars.next();
        }
        while let Some(d) = chars.peek().and_then(|c| c.to_digit(10)) {
            verb.width = verb.width.checked_mul(10)?.checked_add(d as usize)?;
            chars.next();
        }
        let bare = !verb.zero && !verb.left && verb.width == 0;
        match chars.next()? {
            '%' if bare => text.push('%'),
            kind @ ('d' | 's' | 'v') => {
                if !text.is_empty() {
                    pieces.push(Piece::Text(std::mem::take(&mut text)));
                }
                verb.kind = kind;
                pieces.push(Piece::Verb(verb));
            }
            _ => return None,
        }
    }
    if !text.is_empty() {
        pieces.push(Piece::Text(text));
    }
    Some(pieces)
}
