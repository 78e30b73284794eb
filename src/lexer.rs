/// PerfettoSQL lexer - turns SQL text into spanned tokens
///
/// Pull-based and infallible: anything it cannot classify comes back as an
/// `Illegal` token for the statement splitter to forward verbatim, so lexical
/// problems in plain SQL surface in the engine that executes the statement,
/// not here. Comments lex as `Space` since they are statement-internal
/// filler.
use crate::source::SqlSource;
use crate::token::{Token, TokenType};

pub struct Lexer {
    source: SqlSource,
    position: usize,
}

impl Lexer {
    pub fn new(source: &SqlSource) -> Self {
        Self { source: source.clone(), position: 0 }
    }

    /// Next token. Returns `Eof` with an empty span once input is exhausted,
    /// and keeps returning it on every later call.
    pub fn next_token(&mut self) -> Token {
        let start = self.position;

        let Some(ch) = self.current_char() else {
            return Token::new(TokenType::Eof, start, start);
        };

        let token_type = match ch {
            c if c.is_whitespace() => self.read_whitespace(),
            '-' if self.peek_char() == Some('-') => self.read_line_comment(),
            '/' if self.peek_char() == Some('*') => self.read_block_comment(),
            ';' => {
                self.advance();
                TokenType::Semicolon
            }
            '(' => {
                self.advance();
                TokenType::LParen
            }
            ')' => {
                self.advance();
                TokenType::RParen
            }
            ',' => {
                self.advance();
                TokenType::Comma
            }
            '\'' => self.read_string(),
            '"' => self.read_quoted_id(),
            '0'..='9' => self.read_number(),
            'a'..='z' | 'A'..='Z' | '_' => self.read_word(start),
            c if is_operator_char(c) => self.read_operator(c),
            _ => {
                self.advance();
                TokenType::Illegal
            }
        };

        Token::new(token_type, start, self.position)
    }

    /// Next token, skipping leading whitespace and comments.
    pub fn next_non_whitespace(&mut self) -> Token {
        loop {
            let token = self.next_token();
            if token.token_type != TokenType::Space {
                return token;
            }
        }
    }

    fn sql(&self) -> &str {
        self.source.sql()
    }

    fn current_char(&self) -> Option<char> {
        self.sql()[self.position..].chars().next()
    }

    fn peek_char(&self) -> Option<char> {
        let mut chars = self.sql()[self.position..].chars();
        chars.next();
        chars.next()
    }

    fn advance(&mut self) {
        if let Some(ch) = self.current_char() {
            self.position += ch.len_utf8();
        }
    }

    fn read_whitespace(&mut self) -> TokenType {
        while matches!(self.current_char(), Some(c) if c.is_whitespace()) {
            self.advance();
        }
        TokenType::Space
    }

    fn read_line_comment(&mut self) -> TokenType {
        while let Some(ch) = self.current_char() {
            self.advance();
            if ch == '\n' {
                break;
            }
        }
        TokenType::Space
    }

    fn read_block_comment(&mut self) -> TokenType {
        self.advance(); // skip '/'
        self.advance(); // skip '*'

        while let Some(ch) = self.current_char() {
            if ch == '*' && self.peek_char() == Some('/') {
                self.advance();
                self.advance();
                break;
            }
            self.advance();
        }
        // An unterminated comment swallows the rest of the input; it is still
        // filler as far as statement boundaries are concerned.
        TokenType::Space
    }

    fn read_string(&mut self) -> TokenType {
        self.read_quoted('\'', TokenType::String)
    }

    fn read_quoted_id(&mut self) -> TokenType {
        self.read_quoted('"', TokenType::Id)
    }

    fn read_quoted(&mut self, quote: char, token_type: TokenType) -> TokenType {
        self.advance(); // skip opening quote

        while let Some(ch) = self.current_char() {
            self.advance();
            if ch == quote {
                // A doubled quote is an escaped quote, not a close.
                if self.current_char() == Some(quote) {
                    self.advance();
                    continue;
                }
                return token_type;
            }
        }
        TokenType::Illegal // unterminated
    }

    fn read_number(&mut self) -> TokenType {
        while matches!(self.current_char(), Some(c) if c.is_ascii_digit() || c == '.') {
            self.advance();
        }

        // Scientific notation (e.g. 1.5e10)
        if matches!(self.current_char(), Some('e' | 'E')) {
            self.advance();
            if matches!(self.current_char(), Some('+' | '-')) {
                self.advance();
            }
            while matches!(self.current_char(), Some(c) if c.is_ascii_digit()) {
                self.advance();
            }
        }
        TokenType::Number
    }

    fn read_word(&mut self, start: usize) -> TokenType {
        while matches!(self.current_char(), Some(c) if c.is_alphanumeric() || c == '_') {
            self.advance();
        }
        TokenType::for_word(&self.sql()[start..self.position])
    }

    fn read_operator(&mut self, first: char) -> TokenType {
        self.advance();
        // Two-character operators; everything else stands alone.
        let pair = matches!(
            (first, self.current_char()),
            ('!', Some('='))
                | ('<', Some('=' | '>'))
                | ('>', Some('='))
                | ('=', Some('='))
                | ('|', Some('|'))
        );
        if pair {
            self.advance();
        }
        TokenType::Operator
    }
}

fn is_operator_char(ch: char) -> bool {
    matches!(
        ch,
        '+' | '-' | '*' | '/' | '%' | '=' | '<' | '>' | '!' | '|' | '&' | '~' | '.' | '[' | ']'
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokenize(sql: &str) -> Vec<Token> {
        let source = SqlSource::new(sql);
        let mut lexer = Lexer::new(&source);
        let mut tokens = Vec::new();
        loop {
            let token = lexer.next_token();
            let is_eof = token.token_type == TokenType::Eof;
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        tokens
    }

    fn kinds(sql: &str) -> Vec<TokenType> {
        tokenize(sql).into_iter().map(|t| t.token_type).collect()
    }

    #[test]
    fn test_lexer_simple_select() {
        assert_eq!(
            kinds("SELECT * FROM slice;"),
            vec![
                TokenType::Keyword,
                TokenType::Space,
                TokenType::Operator,
                TokenType::Space,
                TokenType::Keyword,
                TokenType::Space,
                TokenType::Id,
                TokenType::Semicolon,
                TokenType::Eof,
            ]
        );
    }

    #[test]
    fn test_lexer_spans_cover_input() {
        let sql = "create perfetto function foo(x INT) returns INT as select 1;";
        let tokens = tokenize(sql);
        let mut pos = 0;
        for token in &tokens {
            assert_eq!(token.start, pos, "gap before {:?}", token);
            pos = token.end;
        }
        assert_eq!(pos, sql.len());
        assert!(tokens.last().unwrap().is_empty());
    }

    #[test]
    fn test_lexer_contextual_words_are_ids() {
        let sql = "perfetto function returns";
        let tokens = tokenize(sql);
        assert_eq!(tokens[0].token_type, TokenType::Id);
        assert_eq!(tokens[2].token_type, TokenType::Id);
        assert_eq!(tokens[4].token_type, TokenType::Id);
    }

    #[test]
    fn test_lexer_comments_are_space() {
        assert_eq!(
            kinds("select -- trailing\n1"),
            vec![
                TokenType::Keyword,
                TokenType::Space,
                TokenType::Space,
                TokenType::Number,
                TokenType::Eof,
            ]
        );
        assert_eq!(
            kinds("/* block */;"),
            vec![TokenType::Space, TokenType::Semicolon, TokenType::Eof]
        );
    }

    #[test]
    fn test_lexer_string_hides_semicolon() {
        let sql = "select ';'";
        let tokens = tokenize(sql);
        assert_eq!(tokens[2].token_type, TokenType::String);
        assert_eq!(tokens[2].text(sql), "';'");
        assert!(!tokens.iter().any(|t| t.token_type == TokenType::Semicolon));
    }

    #[test]
    fn test_lexer_escaped_quote() {
        let sql = "'it''s'";
        let tokens = tokenize(sql);
        assert_eq!(tokens[0].token_type, TokenType::String);
        assert_eq!(tokens[0].text(sql), "'it''s'");
    }

    #[test]
    fn test_lexer_unterminated_string_is_illegal() {
        let tokens = tokenize("select 'oops");
        assert_eq!(tokens[2].token_type, TokenType::Illegal);
    }

    #[test]
    fn test_lexer_quoted_identifier() {
        let sql = "\"weird name\"";
        let tokens = tokenize(sql);
        assert_eq!(tokens[0].token_type, TokenType::Id);
        assert_eq!(tokens[0].text(sql), "\"weird name\"");
    }

    #[test]
    fn test_lexer_numbers() {
        assert_eq!(kinds("42"), vec![TokenType::Number, TokenType::Eof]);
        assert_eq!(kinds("1.5e10"), vec![TokenType::Number, TokenType::Eof]);
    }

    #[test]
    fn test_lexer_operators() {
        assert_eq!(
            kinds("a<=b"),
            vec![TokenType::Id, TokenType::Operator, TokenType::Id, TokenType::Eof]
        );
        let tokens = tokenize("a != b");
        assert_eq!(tokens[2].text("a != b"), "!=");
    }

    #[test]
    fn test_lexer_eof_repeats() {
        let source = SqlSource::new("");
        let mut lexer = Lexer::new(&source);
        assert_eq!(lexer.next_token().token_type, TokenType::Eof);
        assert_eq!(lexer.next_token().token_type, TokenType::Eof);
        assert_eq!(lexer.next_non_whitespace().token_type, TokenType::Eof);
    }
}
