/// PerfettoSQL statement splitter and extension-statement parser
///
/// Splits a block of SQL into statements using tokenizer-level knowledge
/// only, recognizes `CREATE PERFETTO FUNCTION` declarations, and rejects
/// trigger creation. Everything else is handed to the caller as a verbatim
/// source range for the underlying engine to execute.
use crate::error::{ParserError, Result};
use crate::lexer::Lexer;
use crate::source::SqlSource;
use crate::token::{keyword_eq, Token, TokenType};

/// One statement recognized in a block of PerfettoSQL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    /// Plain SQL, forwarded to the engine unexamined. The range covers the
    /// statement text without surrounding whitespace or the terminator.
    Verbatim(SqlSource),
    /// A `CREATE PERFETTO FUNCTION` declaration.
    CreateFunction(CreateFunction),
}

/// Parsed form of `CREATE PERFETTO FUNCTION name(params) RETURNS type AS body`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateFunction {
    /// `name(arg1 type1, arg2 type2, ...)` with the original inter-token
    /// spacing collapsed to single spaces.
    pub prototype: String,
    pub return_type: String,
    /// The SQL expression after `as`, up to the statement terminator.
    pub body: SqlSource,
}

// Prefix classification while scanning a statement. Passthrough is
// absorbing: once a statement is known not to be an extension, tokens are
// consumed only to find its terminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    StmtStart,
    Create,
    CreatePerfetto,
    Passthrough,
}

/// Pull parser over one block of SQL. Construct it per block, call
/// [`next_statement`](Self::next_statement) until it returns `Ok(None)` or an
/// error; it is not reusable afterwards.
pub struct PerfettoSqlParser {
    source: SqlSource,
    lexer: Lexer,
    error: Option<ParserError>,
}

impl PerfettoSqlParser {
    pub fn new(source: SqlSource) -> Self {
        let lexer = Lexer::new(&source);
        Self { source, lexer, error: None }
    }

    /// Advance to the next statement.
    ///
    /// Returns `Ok(Some(..))` when a statement was recognized, `Ok(None)`
    /// when the input is exhausted, and `Err(..)` with a located diagnostic
    /// on a grammar violation. The first error is terminal: every later call
    /// returns it again without consuming more input.
    pub fn next_statement(&mut self) -> Result<Option<Statement>> {
        if let Some(err) = &self.error {
            return Err(err.clone());
        }
        match self.scan_statement() {
            Ok(statement) => Ok(statement),
            Err(err) => {
                self.error = Some(err.clone());
                Err(err)
            }
        }
    }

    /// The source text this parser was constructed over.
    pub fn source(&self) -> &SqlSource {
        &self.source
    }

    fn scan_statement(&mut self) -> Result<Option<Statement>> {
        let mut state = State::StmtStart;
        let mut first_non_space: Option<usize> = None;
        let mut last_non_space_end = 0;

        loop {
            let token = self.lexer.next_token();

            // Space never changes the state machine or boundary tracking.
            if token.token_type == TokenType::Space {
                continue;
            }

            if token.is_terminal() {
                // Everything since the first non-space token is one verbatim
                // statement, trailing terminator excluded.
                if let Some(start) = first_non_space {
                    let range = self.source.substr(start, last_non_space_end - start);
                    return Ok(Some(Statement::Verbatim(range)));
                }
                // A semicolon with no content before it is a no-op
                // statement: skip it and keep scanning.
                if token.token_type == TokenType::Semicolon {
                    continue;
                }
                return Ok(None);
            }

            if first_non_space.is_none() {
                first_non_space = Some(token.start);
            }
            last_non_space_end = token.end;

            match state {
                State::Passthrough => {}
                State::StmtStart => {
                    state = if self.token_is_keyword("create", token) {
                        State::Create
                    } else {
                        State::Passthrough
                    };
                }
                State::Create => {
                    if self.token_is_keyword("trigger", token) {
                        return Err(ParserError::Unsupported(
                            self.located(token, "Creating triggers is not supported."),
                        ));
                    }
                    state = if self.token_is_id("perfetto", token) {
                        State::CreatePerfetto
                    } else {
                        State::Passthrough
                    };
                }
                State::CreatePerfetto => {
                    if self.token_is_id("function", token) {
                        return self.parse_create_function().map(Some);
                    }
                    let message = format!(
                        "Expected 'function' after 'create perfetto', received '{}'.",
                        self.text(token)
                    );
                    return Err(self.malformed(token, &message));
                }
            }
        }
    }

    /// Parse `name(params) RETURNS type AS body` after the prefix
    /// `create perfetto function` has been recognized.
    fn parse_create_function(&mut self) -> Result<Statement> {
        let mut prototype = String::new();

        let name = self.lexer.next_non_whitespace();
        if name.token_type != TokenType::Id {
            let message = format!("Invalid function name '{}'.", self.text(name));
            return Err(self.malformed(name, &message));
        }
        prototype.push_str(self.text(name));

        let lp = self.lexer.next_non_whitespace();
        if lp.token_type != TokenType::LParen {
            return Err(self.malformed(lp, "Malformed function prototype: '(' expected."));
        }
        prototype.push_str(self.text(lp));

        // Parameter list, copied into the prototype with whitespace collapsed
        // to single spaces.
        loop {
            let token = self.lexer.next_token();
            if token.token_type == TokenType::Space {
                prototype.push(' ');
                continue;
            }
            prototype.push_str(self.text(token));
            match token.token_type {
                TokenType::Id | TokenType::Comma => {}
                TokenType::RParen => break,
                _ => {
                    return Err(self.malformed(
                        token,
                        "Malformed function prototype: ')', ',', name or type expected.",
                    ));
                }
            }
        }

        let returns = self.lexer.next_non_whitespace();
        if !self.token_is_id("returns", returns) {
            return Err(self.malformed(returns, "Expected keyword 'returns'."));
        }

        let ret = self.lexer.next_non_whitespace();
        if ret.token_type != TokenType::Id {
            return Err(self.malformed(ret, "Invalid return type."));
        }
        let return_type = self.text(ret).to_string();

        let as_token = self.lexer.next_non_whitespace();
        if !self.token_is_keyword("as", as_token) {
            return Err(self.malformed(as_token, "Expected keyword 'as'."));
        }

        // The body is everything up to the statement terminator, with no
        // grammar awareness of its internal structure.
        let first = self.lexer.next_non_whitespace();
        if first.is_terminal() {
            return Err(self.malformed(first, "Expected a SQL expression after 'as'."));
        }
        let mut end = first.end;
        loop {
            let token = self.lexer.next_token();
            if token.is_terminal() {
                break;
            }
            if token.token_type != TokenType::Space {
                end = token.end;
            }
        }

        let body = self.source.substr(first.start, end - first.start);
        Ok(Statement::CreateFunction(CreateFunction { prototype, return_type, body }))
    }

    // Helper methods

    fn text(&self, token: Token) -> &str {
        token.text(self.source.sql())
    }

    fn token_is_keyword(&self, keyword: &str, token: Token) -> bool {
        token.token_type == TokenType::Keyword && keyword_eq(keyword, self.text(token))
    }

    fn token_is_id(&self, keyword: &str, token: Token) -> bool {
        token.token_type == TokenType::Id && keyword_eq(keyword, self.text(token))
    }

    fn malformed(&self, token: Token, message: &str) -> ParserError {
        ParserError::MalformedFunction(self.located(token, message))
    }

    fn located(&self, token: Token, message: &str) -> String {
        format!("{}{}", self.source.traceback(token.start), message)
    }
}
