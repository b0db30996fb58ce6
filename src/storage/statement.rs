use super::error::StorageError;

/// A literal value inside a `VALUES` tuple
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Literal {
    /// Signed integer literal
    Int(i64),
    /// Single-quoted string literal (no embedded quotes)
    Text(String),
    /// `nextval('<sequence>')`: draw the value from a named sequence
    NextVal(String),
}

/// A parsed multi-row insert statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertStatement {
    pub table: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Literal>>,
}

/// Parse the restricted statement shape the benchmark strategies emit:
///
/// `INSERT INTO <table> (<col>, ...) VALUES (<lit>, ...), (<lit>, ...), ...`
///
/// Literals are integers, single-quoted strings, or `nextval('...')`.
/// Every tuple must match the column list arity.
pub fn parse_insert(sql: &str) -> Result<InsertStatement, StorageError> {
    let mut parser = Parser::new(sql);

    parser.expect_keyword("INSERT")?;
    parser.expect_keyword("INTO")?;
    let table = parser.parse_ident()?;
    let columns = parser.parse_column_list()?;
    parser.expect_keyword("VALUES")?;

    let mut rows = Vec::new();
    loop {
        let row = parser.parse_tuple()?;
        if row.len() != columns.len() {
            return Err(StorageError::ColumnLengthMismatch {
                expected: columns.len(),
                actual: row.len(),
            });
        }
        rows.push(row);

        parser.skip_ws();
        if !parser.consume(',') {
            break;
        }
    }

    parser.skip_ws();
    if !parser.at_end() {
        return Err(parser.error("trailing input after VALUES list"));
    }

    Ok(InsertStatement {
        table,
        columns,
        rows,
    })
}

/// Cursor over the statement text
struct Parser {
    chars: Vec<char>,
    pos: usize,
}

impl Parser {
    fn new(input: &str) -> Self {
        Self {
            chars: input.chars().collect(),
            pos: 0,
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }

    /// Consume the expected character, returning whether it was present
    fn consume(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect_char(&mut self, expected: char) -> Result<(), StorageError> {
        if self.consume(expected) {
            Ok(())
        } else {
            Err(self.error(&format!("expected '{expected}'")))
        }
    }

    /// Match a keyword case-insensitively
    fn expect_keyword(&mut self, keyword: &str) -> Result<(), StorageError> {
        self.skip_ws();
        for expected in keyword.chars() {
            match self.peek() {
                Some(c) if c.eq_ignore_ascii_case(&expected) => self.pos += 1,
                _ => return Err(self.error(&format!("expected keyword {keyword}"))),
            }
        }
        // The keyword must not run into an identifier
        if self.peek().is_some_and(|c| c.is_alphanumeric() || c == '_') {
            return Err(self.error(&format!("expected keyword {keyword}")));
        }
        Ok(())
    }

    fn parse_ident(&mut self) -> Result<String, StorageError> {
        self.skip_ws();
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_alphanumeric() || c == '_')
        {
            self.pos += 1;
        }
        if self.pos == start {
            return Err(self.error("expected identifier"));
        }
        Ok(self.chars[start..self.pos].iter().collect())
    }

    fn parse_column_list(&mut self) -> Result<Vec<String>, StorageError> {
        self.skip_ws();
        self.expect_char('(')?;
        let mut columns = Vec::new();
        loop {
            columns.push(self.parse_ident()?);
            self.skip_ws();
            if self.consume(',') {
                continue;
            }
            self.expect_char(')')?;
            return Ok(columns);
        }
    }

    fn parse_tuple(&mut self) -> Result<Vec<Literal>, StorageError> {
        self.skip_ws();
        self.expect_char('(')?;
        let mut literals = Vec::new();
        loop {
            literals.push(self.parse_literal()?);
            self.skip_ws();
            if self.consume(',') {
                continue;
            }
            self.expect_char(')')?;
            return Ok(literals);
        }
    }

    fn parse_literal(&mut self) -> Result<Literal, StorageError> {
        self.skip_ws();
        match self.peek() {
            Some('\'') => self.parse_string().map(Literal::Text),
            Some(c) if c.is_ascii_digit() || c == '-' => self.parse_int().map(Literal::Int),
            Some(c) if c.is_alphabetic() => self.parse_nextval(),
            _ => Err(self.error("expected literal")),
        }
    }

    fn parse_string(&mut self) -> Result<String, StorageError> {
        self.expect_char('\'')?;
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c == '\'' {
                let text = self.chars[start..self.pos].iter().collect();
                self.pos += 1;
                return Ok(text);
            }
            self.pos += 1;
        }
        Err(self.error("unterminated string literal"))
    }

    fn parse_int(&mut self) -> Result<i64, StorageError> {
        let start = self.pos;
        if self.peek() == Some('-') {
            self.pos += 1;
        }
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.pos += 1;
        }
        let text: String = self.chars[start..self.pos].iter().collect();
        text.parse()
            .map_err(|_| self.error("invalid integer literal"))
    }

    fn parse_nextval(&mut self) -> Result<Literal, StorageError> {
        let name = self.parse_ident()?;
        if !name.eq_ignore_ascii_case("nextval") {
            return Err(self.error(&format!("unexpected function {name}")));
        }
        self.skip_ws();
        self.expect_char('(')?;
        self.skip_ws();
        let sequence = self.parse_string()?;
        self.skip_ws();
        self.expect_char(')')?;
        Ok(Literal::NextVal(sequence))
    }

    fn error(&self, message: &str) -> StorageError {
        StorageError::InvalidStatement(format!("{message} at position {}", self.pos))
    }
}
