/// Zero-copy views into a block of SQL text
///
/// `SqlSource` is the arena every statement range points into: the parser and
/// all ranges it produces share one reference-counted copy of the original
/// text, and every sub-view remembers its absolute offset so diagnostics can
/// be rendered against the full source.
use std::fmt;
use std::sync::Arc;

#[derive(Clone)]
pub struct SqlSource {
    text: Arc<str>,
    offset: usize,
    len: usize,
}

impl SqlSource {
    /// Wrap a full block of SQL; the view covers all of it.
    pub fn new(sql: impl Into<String>) -> Self {
        let text: Arc<str> = Arc::from(sql.into());
        let len = text.len();
        Self { text, offset: 0, len }
    }

    /// The text this view covers.
    pub fn sql(&self) -> &str {
        &self.text[self.offset..self.offset + self.len]
    }

    /// The full text this view was carved from.
    pub fn full_sql(&self) -> &str {
        &self.text
    }

    /// Absolute byte offset of this view in the original text.
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// A sub-view of this view. `offset` is relative to this view; the result
    /// remembers its absolute position and shares the same text allocation.
    pub fn substr(&self, offset: usize, len: usize) -> SqlSource {
        assert!(
            offset + len <= self.len,
            "substr [{}, {}) out of bounds of view of length {}",
            offset,
            offset + len,
            self.len
        );
        SqlSource {
            text: Arc::clone(&self.text),
            offset: self.offset + offset,
            len,
        }
    }

    /// Render a location frame for an offset relative to this view: the
    /// 1-based line and column, the source line itself, and a caret under the
    /// offending column. Diagnostics prepend this to their message.
    pub fn traceback(&self, offset: usize) -> String {
        let abs = self.offset + offset.min(self.len);
        let text = &*self.text;
        let line_start = text[..abs].rfind('\n').map_or(0, |i| i + 1);
        let line_end = text[abs..].find('\n').map_or(text.len(), |i| abs + i);
        let line = 1 + text[..line_start].matches('\n').count();
        let col = 1 + text[line_start..abs].chars().count();

        let mut frame = String::new();
        frame.push_str(&format!("line {} col {}\n", line, col));
        frame.push_str("  ");
        frame.push_str(&text[line_start..line_end]);
        frame.push('\n');
        frame.push_str("  ");
        for _ in 1..col {
            frame.push(' ');
        }
        frame.push_str("^\n");
        frame
    }
}

// Two views are equal when they cover the same text at the same absolute
// position, regardless of which allocation they came from.
impl PartialEq for SqlSource {
    fn eq(&self, other: &Self) -> bool {
        self.offset == other.offset && self.sql() == other.sql()
    }
}

impl Eq for SqlSource {}

impl fmt::Debug for SqlSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqlSource")
            .field("offset", &self.offset)
            .field("sql", &self.sql())
            .finish()
    }
}
