/// Token types for the PerfettoSQL lexer
use phf::phf_set;

// Generic SQL keywords, matched case-insensitively. The contextual words of
// the extension grammar (`perfetto`, `function`, `returns`) and bare type
// names (`int`, `long`, `string`) are deliberately absent: they lex as plain
// identifiers, which is what lets them appear as function parameters and
// return types.
static KEYWORDS: phf::Set<&'static str> = phf_set! {
    "abort",
    "action",
    "add",
    "after",
    "all",
    "alter",
    "analyze",
    "and",
    "as",
    "asc",
    "attach",
    "autoincrement",
    "before",
    "begin",
    "between",
    "by",
    "cascade",
    "case",
    "cast",
    "check",
    "collate",
    "column",
    "commit",
    "conflict",
    "constraint",
    "create",
    "cross",
    "database",
    "default",
    "deferred",
    "delete",
    "desc",
    "detach",
    "distinct",
    "drop",
    "each",
    "else",
    "end",
    "escape",
    "except",
    "exclusive",
    "exists",
    "explain",
    "fail",
    "for",
    "foreign",
    "from",
    "full",
    "glob",
    "group",
    "having",
    "if",
    "ignore",
    "immediate",
    "in",
    "index",
    "indexed",
    "inner",
    "insert",
    "instead",
    "intersect",
    "into",
    "is",
    "isnull",
    "join",
    "key",
    "left",
    "like",
    "limit",
    "match",
    "natural",
    "no",
    "not",
    "notnull",
    "null",
    "of",
    "offset",
    "on",
    "or",
    "order",
    "outer",
    "plan",
    "pragma",
    "primary",
    "query",
    "raise",
    "recursive",
    "references",
    "regexp",
    "reindex",
    "release",
    "rename",
    "replace",
    "restrict",
    "right",
    "rollback",
    "row",
    "savepoint",
    "select",
    "set",
    "table",
    "temp",
    "temporary",
    "then",
    "to",
    "transaction",
    "trigger",
    "union",
    "unique",
    "update",
    "using",
    "vacuum",
    "values",
    "view",
    "virtual",
    "when",
    "where",
    "with",
    "without",
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenType {
    /// Whitespace runs and comments.
    Space,

    // Delimiters
    Semicolon, // ;
    LParen,    // (
    RParen,    // )
    Comma,     // ,

    // Words
    Keyword, // generic SQL keyword
    Id,      // identifier, quoted identifier, or contextual keyword

    // Literals
    String, // 'single quoted'
    Number,

    /// Operators and remaining punctuation; never inspected by the parser.
    Operator,
    /// Bytes the lexer cannot classify. The statement splitter forwards them
    /// verbatim; the engine executing the statement reports them.
    Illegal,

    /// End of input, carried as an empty span.
    Eof,
}

/// A lexed token: a type plus the byte span it covers in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub token_type: TokenType,
    pub start: usize,
    pub end: usize,
}

impl Token {
    pub fn new(token_type: TokenType, start: usize, end: usize) -> Self {
        Self { token_type, start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// A statement boundary: a semicolon or the end of input.
    pub fn is_terminal(&self) -> bool {
        matches!(self.token_type, TokenType::Semicolon | TokenType::Eof)
    }

    /// The slice of `sql` this token covers.
    pub fn text<'a>(&self, sql: &'a str) -> &'a str {
        &sql[self.start..self.end]
    }
}

impl TokenType {
    /// Classify an identifier-shaped word (O(1) perfect hash lookup).
    pub fn for_word(word: &str) -> Self {
        let lowercase = word.to_lowercase();
        if KEYWORDS.contains(lowercase.as_str()) {
            TokenType::Keyword
        } else {
            TokenType::Id
        }
    }
}

/// Case-insensitive comparison of token text against a lowercase keyword.
pub fn keyword_eq(expected: &str, actual: &str) -> bool {
    debug_assert!(expected.chars().all(|c| c.is_ascii_lowercase()));
    expected.len() == actual.len()
        && expected
            .chars()
            .zip(actual.chars())
            .all(|(e, a)| e == a.to_ascii_lowercase())
}
