/// Node filter in the shape the oracle's node specifiers use (`spine.*`,
/// `/leaf-1|leaf-2/`, `leaf-*`).
///
/// Matching is anchored and case-insensitive. Only `.*` and `*` are
/// wildcards; every other character is literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodePattern {
    alternatives: Vec<Vec<Piece>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Piece {
    Literal(String),
    Any,
}

impl NodePattern {
    pub fn parse(raw: &str) -> Self {
        let s = raw.trim();
        let s = s
            .strip_prefix('/')
            .and_then(|x| x.strip_suffix('/'))
            .unwrap_or(s);
        let alternatives = s
            .split('|')
            .map(|alt| {
                let alt = alt.trim().trim_start_matches('^').trim_end_matches('$');
                parse_alternative(&alt.to_ascii_lowercase())
            })
            .collect();
        Self { alternatives }
    }

    pub fn matches(&self, node: &str) -> bool {
        let node = node.to_ascii_lowercase();
        self.alternatives
            .iter()
            .any(|pieces| match_pieces(pieces, &node))
    }
}

fn parse_alternative(alt: &str) -> Vec<Piece> {
    let mut pieces = Vec::new();
    let mut literal = String::new();
    let mut chars = alt.chars().peekable();
    while let Some(c) = chars.next() {
        let wildcard = match c {
            '*' => true,
            '.' if chars.peek() == Some(&'*') => {
                chars.next();
                true
            }
            _ => false,
        };
        if wildcard {
            if !literal.is_empty() {
                pieces.push(Piece::Literal(std::mem::take(&mut literal)));
            }
            if pieces.last() != Some(&Piece::Any) {
                pieces.push(Piece::Any);
            }
        } else {
            literal.push(c);
        }
    }
    if !literal.is_empty() {
        pieces.push(Piece::Literal(literal));
    }
    pieces
}

fn match_pieces(pieces: &[Piece], text: &str) -> bool {
    match pieces.split_first() {
        None => text.is_empty(),
        Some((Piece::Literal(lit), rest)) => text
            .strip_prefix(lit.as_str())
            .map(|tail| match_pieces(rest, tail))
            .unwrap_or(false),
        Some((Piece::Any, rest)) => (0..=text.len())
            .filter(|i| text.is_char_boundary(*i))
            .any(|i| match_pieces(rest, &text[i..])),
    }
}
