use crate::core::error::{PbrtError, Result};
use crate::core::fileutil::path_and_filename;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexemeType {
    Identifier,
    Number,
    String,
    Singleton,
}

/// One token of the scene grammar. Numbers keep their literal text until a
/// consumer converts them; strings carry the unquoted content; singletons
/// are the bracket characters.
#[derive(Debug, Clone, PartialEq)]
pub struct Lexeme {
    pub kind: LexemeType,
    pub value: String,
}

impl Lexeme {
    fn new(kind: LexemeType, value: String) -> Self {
        Self { kind, value }
    }

    pub fn is_identifier(&self, name: &str) -> bool {
        self.kind == LexemeType::Identifier && self.value == name
    }
}

/// Tokenizer over one input text. Tracks 1-based line and column, advanced
/// one character at a time; mutated only through `advance`.
pub struct Lexer {
    text: Vec<char>,
    pos: usize,
    line: usize,
    column: usize,
    /// directory of the source file, used to resolve relative asset paths
    pub path: String,
    pub filename: String,
}

impl Lexer {
    pub fn from_file<P: AsRef<Path>>(filename: P) -> Result<Self> {
        let filename = filename.as_ref();
        let text = fs::read_to_string(filename).map_err(|source| PbrtError::Io {
            file: filename.to_path_buf(),
            source,
        })?;

        let (path, name) = path_and_filename(&filename.to_string_lossy());
        Ok(Self::from_source(&text, &path, &name))
    }

    pub fn from_source(text: &str, path: &str, filename: &str) -> Self {
        Self {
            text: text.chars().collect(),
            pos: 0,
            line: 1,
            column: 1,
            path: path.to_owned(),
            filename: filename.to_owned(),
        }
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn column(&self) -> usize {
        self.column
    }

    pub fn file(&self) -> String {
        format!("{}/{}", self.path, self.filename)
    }

    fn peek(&self) -> Option<char> {
        self.text.get(self.pos).copied()
    }

    fn advance(&mut self) {
        if let Some(c) = self.peek() {
            self.pos += 1;
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
    }

    fn lexical_error(&self, msg: &str) -> PbrtError {
        PbrtError::Lexical {
            file: self.file(),
            line: self.line,
            column: self.column,
            msg: msg.to_owned(),
        }
    }

    /// Skip whitespace and '#' line comments. Signals `InputEnded` when only
    /// ignorable input remains.
    fn remove_blanks(&mut self) -> Result<()> {
        loop {
            match self.peek() {
                Some(' ') | Some('\t') | Some('\r') | Some('\n') => self.advance(),
                Some('#') => {
                    while let Some(c) = self.peek() {
                        self.advance();
                        if c == '\n' {
                            break;
                        }
                    }
                }
                Some(_) => return Ok(()),
                None => return Err(PbrtError::InputEnded),
            }
        }
    }

    /// Produce the next lexeme, or `InputEnded` past the last one.
    pub fn next_lexeme(&mut self) -> Result<Lexeme> {
        self.remove_blanks()?;

        if let Some(lex) = self.read_identifier() {
            return Ok(lex);
        }
        if let Some(lex) = self.read_string()? {
            return Ok(lex);
        }
        if let Some(lex) = self.read_number()? {
            return Ok(lex);
        }

        match self.peek() {
            Some(c @ '[') | Some(c @ ']') => {
                self.advance();
                Ok(Lexeme::new(LexemeType::Singleton, c.to_string()))
            }
            _ => Err(self.lexical_error("input not recognized")),
        }
    }

    fn read_identifier(&mut self) -> Option<Lexeme> {
        match self.peek() {
            Some(c) if c.is_alphabetic() => {}
            _ => return None,
        }

        let mut s = String::new();
        while let Some(c) = self.peek() {
            if !c.is_alphabetic() {
                break;
            }
            s.push(c);
            self.advance();
        }

        Some(Lexeme::new(LexemeType::Identifier, s))
    }

    fn read_string(&mut self) -> Result<Option<Lexeme>> {
        if self.peek() != Some('"') {
            return Ok(None);
        }
        self.advance();

        let mut s = String::new();
        loop {
            match self.peek() {
                Some('"') => {
                    self.advance();
                    return Ok(Some(Lexeme::new(LexemeType::String, s)));
                }
                Some(c) => {
                    s.push(c);
                    self.advance();
                }
                None => return Err(self.lexical_error("unterminated string")),
            }
        }
    }

    /// Finite automaton over '+', '-', '.', digits and 'e'/'E'.
    ///
    /// * state 0: start, expects digit, sign or point
    /// * state 7: sign seen, waiting for a digit or point
    /// * state 1: waiting for one mandatory digit
    /// * state 2: digits, point still possible [final]
    /// * state 3: digits after the point [final]
    /// * state 4: after 'e', waiting for sign or digit
    /// * state 5: waiting for a mandatory exponent digit
    /// * state 6: exponent digits [final]
    ///
    /// At a final state a non-consumable character ends the token; any other
    /// failed transition is a lexical error.
    fn read_number(&mut self) -> Result<Option<Lexeme>> {
        match self.peek() {
            Some(c) if c == '+' || c == '-' || c == '.' || c.is_ascii_digit() => {}
            _ => return Ok(None),
        }

        let mut s = String::new();
        let mut point_seen = false;
        let mut state = 0;

        loop {
            let c = self.peek();
            let is_digit = c.map_or(false, |c| c.is_ascii_digit());
            let is_exp = matches!(c, Some('e') | Some('E'));
            let is_sign = matches!(c, Some('+') | Some('-'));

            match state {
                0 if is_sign => state = 7,
                0 if c == Some('.') => {
                    point_seen = true;
                    state = 1;
                }
                0 if is_digit => state = 2,
                1 if is_digit => state = if point_seen { 3 } else { 2 },
                2 if c == Some('.') && !point_seen => {
                    point_seen = true;
                    state = 3;
                }
                2 if is_digit => {}
                2 if is_exp => state = 4,
                3 if is_digit => {}
                3 if is_exp => state = 4,
                4 if is_sign => state = 5,
                4 if is_digit => state = 6,
                5 if is_digit => state = 6,
                6 if is_digit => {}
                7 if is_digit => state = 2,
                7 if c == Some('.') => {
                    point_seen = true;
                    state = 1;
                }
                // legal points of exit
                2 | 3 | 6 => break,
                _ => return Err(self.lexical_error("wrong literal specification")),
            }

            if let Some(c) = c {
                s.push(c);
                self.advance();
            }
        }

        Ok(Some(Lexeme::new(LexemeType::Number, s)))
    }
}

/// Ordered list of lexers; position 0 is active. Include pushes a new lexer,
/// end-of-input pops it, and the token stream continues transparently from
/// the including file. The stream ends when the stack runs empty.
pub struct LexerStack {
    lexers: Vec<Lexer>,
    // position to report after the last lexer is popped
    last_position: (String, usize, usize),
}

impl LexerStack {
    pub fn new(root: Lexer) -> Self {
        let last_position = (root.file(), root.line(), root.column());
        Self {
            lexers: vec![root],
            last_position,
        }
    }

    pub fn push(&mut self, lexer: Lexer) {
        self.lexers.insert(0, lexer);
    }

    pub fn next_lexeme(&mut self) -> Result<Lexeme> {
        loop {
            let top = match self.lexers.first_mut() {
                Some(top) => top,
                None => return Err(PbrtError::InputEnded),
            };

            match top.next_lexeme() {
                Err(PbrtError::InputEnded) => {
                    let done = self.lexers.remove(0);
                    self.last_position = (done.file(), done.line(), done.column());
                }
                other => return other,
            }
        }
    }

    /// Directory of the file the active lexer reads from.
    pub fn current_path(&self) -> String {
        match self.lexers.first() {
            Some(l) => l.path.clone(),
            None => ".".to_owned(),
        }
    }

    /// (file, line, column) of the active lexer, for error reporting.
    pub fn position(&self) -> (String, usize, usize) {
        match self.lexers.first() {
            Some(l) => (l.file(), l.line(), l.column()),
            None => self.last_position.clone(),
        }
    }
}
