//! The slice of CSS selector syntax the in-memory document understands.
//!
//! Selector lists of compound selectors: type, universal, `#id`, `.class`,
//! `[attr]`, `[attr=value]` and `:not(...)`. Combinators are rejected; the
//! drawer never needs them and the browser backend hands selectors to the
//! real engine anyway.

use crate::error::DrawerError;

/// Read access to an element for selector matching.
pub(crate) trait Subject {
    fn tag(&self) -> &str;
    fn attr(&self, name: &str) -> Option<&str>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SelectorList(Vec<Compound>);

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<AttrCondition>,
    not: Vec<Compound>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum AttrCondition {
    Exists(String),
    Eq(String, String),
}

impl SelectorList {
    pub(crate) fn parse(selector: &str) -> Result<Self, DrawerError> {
        let groups = split_top_level(selector)?;
        let compounds = groups
            .iter()
            .map(|g| parse_compound(g, selector))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self(compounds))
    }

    pub(crate) fn matches(&self, subject: &impl Subject) -> bool {
        self.0.iter().any(|c| c.matches(subject))
    }
}

impl Compound {
    fn matches(&self, subject: &impl Subject) -> bool {
        if let Some(tag) = &self.tag {
            if !subject.tag().eq_ignore_ascii_case(tag) {
                return false;
            }
        }
        if let Some(id) = &self.id {
            if subject.attr("id") != Some(id.as_str()) {
                return false;
            }
        }
        if !self.classes.is_empty() {
            let class_attr = subject.attr("class").unwrap_or("");
            if !self
                .classes
                .iter()
                .all(|c| class_attr.split_ascii_whitespace().any(|h| h == c))
            {
                return false;
            }
        }
        let attrs_ok = self.attrs.iter().all(|cond| match cond {
            AttrCondition::Exists(key) => subject.attr(key).is_some(),
            AttrCondition::Eq(key, value) => subject.attr(key) == Some(value.as_str()),
        });
        attrs_ok && !self.not.iter().any(|n| n.matches(subject))
    }
}

fn unsupported(selector: &str) -> DrawerError {
    DrawerError::UnsupportedSelector(selector.to_string())
}

/// Splits a selector list on commas that are not nested in brackets, parens
/// or quotes.
fn split_top_level(selector: &str) -> Result<Vec<&str>, DrawerError> {
    let mut groups = vec![];
    let mut depth = 0i32;
    let mut quote: Option<char> = None;
    let mut start = 0;
    for (i, ch) in selector.char_indices() {
        match (quote, ch) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(ch),
            (None, '[' | '(') => depth += 1,
            (None, ']' | ')') => {
                depth -= 1;
                if depth < 0 {
                    return Err(unsupported(selector));
                }
            }
            (None, ',') if depth == 0 => {
                groups.push(selector[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    if depth != 0 || quote.is_some() {
        return Err(unsupported(selector));
    }
    groups.push(selector[start..].trim());
    if groups.iter().any(|g| g.is_empty()) {
        return Err(unsupported(selector));
    }
    Ok(groups)
}

fn is_ident_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'-'
}

fn parse_ident(src: &str, start: usize) -> Option<(String, usize)> {
    let bytes = src.as_bytes();
    let mut end = start;
    while end < bytes.len() && is_ident_char(bytes[end]) {
        end += 1;
    }
    if end == start {
        return None;
    }
    Some((src[start..end].to_string(), end))
}

fn parse_compound(part: &str, whole: &str) -> Result<Compound, DrawerError> {
    let bytes = part.as_bytes();
    let mut i = 0;
    let mut compound = Compound::default();
    let mut universal = false;

    while i < bytes.len() {
        match bytes[i] {
            b'*' => {
                if universal || compound.tag.is_some() {
                    return Err(unsupported(whole));
                }
                universal = true;
                i += 1;
            }
            b'#' => {
                let (id, next) = parse_ident(part, i + 1).ok_or_else(|| unsupported(whole))?;
                if compound.id.replace(id).is_some() {
                    return Err(unsupported(whole));
                }
                i = next;
            }
            b'.' => {
                let (class, next) = parse_ident(part, i + 1).ok_or_else(|| unsupported(whole))?;
                compound.classes.push(class);
                i = next;
            }
            b'[' => {
                let (cond, next) = parse_attr(part, i, whole)?;
                compound.attrs.push(cond);
                i = next;
            }
            b':' => {
                let rest = &part[i..];
                if !rest.starts_with(":not(") {
                    return Err(unsupported(whole));
                }
                let inner_start = i + ":not(".len();
                let inner_end = matching_paren(part, inner_start).ok_or_else(|| unsupported(whole))?;
                let inner = SelectorList::parse(&part[inner_start..inner_end])?;
                compound.not.extend(inner.0);
                i = inner_end + 1;
            }
            b if is_ident_char(b) => {
                if i != 0 {
                    return Err(unsupported(whole));
                }
                let (tag, next) = parse_ident(part, i).ok_or_else(|| unsupported(whole))?;
                compound.tag = Some(tag.to_ascii_lowercase());
                i = next;
            }
            // whitespace and combinators
            _ => return Err(unsupported(whole)),
        }
    }
    Ok(compound)
}

fn matching_paren(src: &str, start: usize) -> Option<usize> {
    let mut depth = 1;
    let mut quote: Option<u8> = None;
    for (offset, &b) in src.as_bytes()[start..].iter().enumerate() {
        match (quote, b) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, b'"' | b'\'') => quote = Some(b),
            (None, b'(') => depth += 1,
            (None, b')') => {
                depth -= 1;
                if depth == 0 {
                    return Some(start + offset);
                }
            }
            _ => {}
        }
    }
    None
}

fn parse_attr(src: &str, open: usize, whole: &str) -> Result<(AttrCondition, usize), DrawerError> {
    let bytes = src.as_bytes();
    let skip_ws = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        i
    };

    let i = skip_ws(open + 1);
    let (key, i) = parse_ident(src, i).ok_or_else(|| unsupported(whole))?;
    let key = key.to_ascii_lowercase();
    let i = skip_ws(i);
    match bytes.get(i) {
        Some(b']') => return Ok((AttrCondition::Exists(key), i + 1)),
        Some(b'=') => {}
        _ => return Err(unsupported(whole)),
    }

    let i = skip_ws(i + 1);
    let (value, i) = match bytes.get(i) {
        Some(&q) if q == b'"' || q == b'\'' => {
            let close = bytes[i + 1..]
                .iter()
                .position(|&b| b == q)
                .ok_or_else(|| unsupported(whole))?;
            let end = i + 1 + close;
            (src[i + 1..end].to_string(), end + 1)
        }
        _ => parse_ident(src, i).ok_or_else(|| unsupported(whole))?,
    };
    let i = skip_ws(i);
    if bytes.get(i) != Some(&b']') {
        return Err(unsupported(whole));
    }
    Ok((AttrCondition::Eq(key, value), i + 1))
}
