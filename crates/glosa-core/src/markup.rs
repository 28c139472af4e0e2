//! dict-markdown to HTML.
//!
//! Bold (`**`) is resolved first by pairing occurrences from the right. The
//! single-character marks are then toggled against the most recently opened
//! mark only, so improperly interleaved marks are emitted as they come rather
//! than rejected.

const BOLD_MARK: &str = "**";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Bold,
    Italic,
    Superscript,
    Subscript,
    Spaced,
    Reference,
}

impl Mark {
    fn from_char(c: char) -> Option<Self> {
        match c {
            '*' => Some(Mark::Italic),
            '^' => Some(Mark::Superscript),
            '_' => Some(Mark::Subscript),
            '$' => Some(Mark::Spaced),
            '@' => Some(Mark::Reference),
            _ => None,
        }
    }

    fn tag_name(self) -> &'static str {
        match self {
            Mark::Bold => "strong",
            Mark::Italic => "em",
            Mark::Superscript => "superscript",
            Mark::Subscript => "subscript",
            Mark::Spaced => "code",
            Mark::Reference => "cite",
        }
    }

    fn open_tag(self) -> String {
        format!("<{}>", self.tag_name())
    }

    fn close_tag(self) -> String {
        format!("</{}>", self.tag_name())
    }
}

/// Render one paragraph of dict-markdown as an HTML fragment. Never fails.
pub fn render(text: &str) -> String {
    let text = replace_bold(text);

    let mut html = String::with_capacity(text.len());
    let mut open_marks: Vec<Mark> = Vec::new();

    for c in text.chars() {
        let Some(mark) = Mark::from_char(c) else {
            html.push(c);
            continue;
        };

        if open_marks.last() == Some(&mark) {
            open_marks.pop();
            html.push_str(&mark.close_tag());
        } else {
            open_marks.push(mark);
            html.push_str(&mark.open_tag());
        }
    }

    html
}

/// Replace every `**` with a `strong` tag. The rightmost occurrence closes,
/// the one before it opens, and so on; with an odd count the leftmost
/// occurrence ends up as a lone closing tag.
fn replace_bold(text: &str) -> String {
    let positions: Vec<usize> = text.match_indices(BOLD_MARK).map(|(idx, _)| idx).collect();

    let mut out = text.to_owned();
    // Right to left, so earlier byte offsets stay valid.
    for (n, &idx) in positions.iter().rev().enumerate() {
        let tag = if n % 2 == 0 {
            Mark::Bold.close_tag()
        } else {
            Mark::Bold.open_tag()
        };
        out.replace_range(idx..idx + BOLD_MARK.len(), &tag);
    }
    out
}
