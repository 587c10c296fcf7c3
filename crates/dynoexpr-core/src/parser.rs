//! Mini-language parser for operator syntax embedded in string values.
//!
//! Clause values like `"> 4.5"`, `"between 1 and 5"`, or
//! `"begins_with(prefix)"` carry a small textual operator grammar. The parser
//! is an ordered list of pattern matchers tried against the trimmed input;
//! the first match wins and extracts the operands. Keywords are matched
//! case-insensitively. Anything no matcher recognizes degrades to a literal
//! equality on the whole string: there is no validation layer, and malformed
//! operator strings never fail compilation.
//!
//! Update `SET` values have their own recognizer (`parse_set_value`) for
//! `if_not_exists(...)`, `list_append(...)`, and arithmetic deltas against
//! the entry's own field name.

use std::fmt;

use serde_json::Value as JsonValue;

use crate::codec::unquote;

// ---------------------------------------------------------------------------
// Comparison operators
// ---------------------------------------------------------------------------

/// Comparison operators recognized at the head of a clause value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    /// Equal (`=`).
    Eq,
    /// Not equal (`<>`).
    Ne,
    /// Less than (`<`).
    Lt,
    /// Less than or equal (`<=`).
    Le,
    /// Greater than (`>`).
    Gt,
    /// Greater than or equal (`>=`).
    Ge,
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Eq => write!(f, "="),
            Self::Ne => write!(f, "<>"),
            Self::Lt => write!(f, "<"),
            Self::Le => write!(f, "<="),
            Self::Gt => write!(f, ">"),
            Self::Ge => write!(f, ">="),
        }
    }
}

impl CompareOp {
    /// Split a leading comparison operator off `input`, longest match first.
    fn take_prefix(input: &str) -> Option<(Self, &str)> {
        for (token, op) in [
            ("<=", Self::Le),
            ("<>", Self::Ne),
            (">=", Self::Ge),
            ("<", Self::Lt),
            (">", Self::Gt),
            ("=", Self::Eq),
        ] {
            if let Some(rest) = input.strip_prefix(token) {
                return Some((op, rest));
            }
        }
        None
    }
}

// ---------------------------------------------------------------------------
// Value coercion
// ---------------------------------------------------------------------------

/// Coerce an extracted operand string to a JSON value.
///
/// `null`, `true`, and `false` map to their primitives; unsigned integers
/// and decimals map to numbers; everything else stays a string, trimmed and
/// with one pair of wrapping double quotes removed. Strings that look
/// numeric but fail to parse (`1.2.3`) stay strings.
#[must_use]
pub fn convert_value(raw: &str) -> JsonValue {
    let v = raw.trim();
    match v {
        "null" => return JsonValue::Null,
        "true" => return JsonValue::Bool(true),
        "false" => return JsonValue::Bool(false),
        _ => {}
    }
    if !v.is_empty() && v.chars().all(|c| c.is_ascii_digit() || c == '.') {
        if v.contains('.') {
            if let Ok(f) = v.parse::<f64>() {
                if let Some(n) = serde_json::Number::from_f64(f) {
                    return JsonValue::Number(n);
                }
            }
        } else if let Ok(i) = v.parse::<u64>() {
            return JsonValue::Number(serde_json::Number::from(i));
        }
    }
    let v = if v.len() >= 2 && v.starts_with('"') && v.ends_with('"') {
        unquote(v)
    } else {
        v
    };
    JsonValue::String(v.to_owned())
}

// ---------------------------------------------------------------------------
// Condition grammar
// ---------------------------------------------------------------------------

/// One recognized operator form with its extracted operands.
#[derive(Debug, Clone, PartialEq)]
pub enum ConditionKind {
    /// `<op> <operand>` comparison.
    Compare {
        /// The comparison operator.
        op: CompareOp,
        /// The right-hand operand.
        operand: JsonValue,
    },
    /// `between <low> and <high>`.
    Between {
        /// Lower bound (inclusive).
        low: JsonValue,
        /// Upper bound (inclusive).
        high: JsonValue,
    },
    /// `in (<v1>, <v2>, ...)`.
    In {
        /// Candidate values.
        list: Vec<JsonValue>,
    },
    /// Bare `attribute_exists`.
    AttributeExists,
    /// Bare `attribute_not_exists`.
    AttributeNotExists,
    /// `attribute_type(<v>)`.
    AttributeType {
        /// The type descriptor operand.
        operand: JsonValue,
    },
    /// `begins_with(<v>)` or `begins_with <v>`.
    BeginsWith {
        /// The prefix operand.
        operand: JsonValue,
    },
    /// `contains(<v>)`.
    Contains {
        /// The searched-for operand.
        operand: JsonValue,
    },
    /// `size <op> <n>`.
    Size {
        /// The comparison operator after `size`.
        op: CompareOp,
        /// The numeric operand.
        operand: JsonValue,
    },
    /// Fallback: the whole string as a literal equality value.
    Equals {
        /// The literal value.
        operand: JsonValue,
    },
}

impl ConditionKind {
    /// The operands contributing entries to the value-placeholder map.
    ///
    /// The exists functions take no operand and contribute nothing.
    #[must_use]
    pub fn operands(&self) -> Vec<&JsonValue> {
        match self {
            Self::Compare { operand, .. }
            | Self::AttributeType { operand }
            | Self::BeginsWith { operand }
            | Self::Contains { operand }
            | Self::Size { operand, .. }
            | Self::Equals { operand } => vec![operand],
            Self::Between { low, high } => vec![low, high],
            Self::In { list } => list.iter().collect(),
            Self::AttributeExists | Self::AttributeNotExists => Vec::new(),
        }
    }
}

/// A parsed condition value: the operator form plus an optional `not` prefix.
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionExpr {
    /// Whether the expression is wrapped with a leading `not`.
    pub negated: bool,
    /// The recognized operator form.
    pub kind: ConditionKind,
}

/// Parse a clause string value into its operator form.
#[must_use]
pub fn parse_condition_value(raw: &str) -> ConditionExpr {
    let mut value = raw.trim();
    let mut negated = false;
    // `not` must be followed by whitespace; `not(...)` is not part of the
    // grammar and falls through to the literal fallback.
    if let Some(head) = value.get(..3) {
        if head.eq_ignore_ascii_case("not")
            && value[3..].starts_with(|c: char| c.is_ascii_whitespace())
        {
            negated = true;
            value = value[3..].trim();
        }
    }

    let matchers: [fn(&str) -> Option<ConditionKind>; 9] = [
        match_comparison,
        match_between,
        match_in,
        match_attribute_exists,
        match_attribute_not_exists,
        match_attribute_type,
        match_begins_with,
        match_contains,
        match_size,
    ];
    let kind = matchers
        .iter()
        .find_map(|matcher| matcher(value))
        .unwrap_or_else(|| ConditionKind::Equals {
            operand: JsonValue::String(value.to_owned()),
        });

    ConditionExpr { negated, kind }
}

/// Strip a case-insensitive keyword followed by a word boundary: anything
/// that cannot continue an identifier (so `in (`, `size>`, and end of input
/// all qualify, while `inventory` does not).
fn strip_keyword_ci<'a>(input: &'a str, keyword: &str) -> Option<&'a str> {
    let head = input.get(..keyword.len())?;
    if !head.eq_ignore_ascii_case(keyword) {
        return None;
    }
    let rest = &input[keyword.len()..];
    match rest.chars().next() {
        None => Some(rest),
        Some(c) if c.is_ascii_alphanumeric() || c == '_' => None,
        Some(_) => Some(rest),
    }
}

/// Capture the argument after a function keyword: optional whitespace, `(`,
/// then everything up to the first `)` (or end of input when `require_close`
/// is off, tolerating an unbalanced open paren).
fn capture_paren_arg<'a>(rest: &'a str, require_close: bool) -> Option<&'a str> {
    let rest = rest.trim_start();
    let inner = rest.strip_prefix('(')?;
    match inner.find(')') {
        Some(end) => (end > 0).then(|| &inner[..end]),
        None if require_close => None,
        None => (!inner.is_empty()).then_some(inner),
    }
}

fn match_comparison(input: &str) -> Option<ConditionKind> {
    let (op, rest) = CompareOp::take_prefix(input)?;
    let rest = rest.trim();
    if rest.is_empty() {
        return None;
    }
    Some(ConditionKind::Compare {
        op,
        operand: convert_value(rest),
    })
}

fn match_between(input: &str) -> Option<ConditionKind> {
    let rest = strip_keyword_ci(input, "between")?.trim_start();
    // The upper bound follows the last ` and `, so bounds containing the
    // word keep their text intact.
    let lower = rest.to_ascii_lowercase();
    let idx = lower.rfind(" and ")?;
    let (low, high) = (rest[..idx].trim(), rest[idx + " and ".len()..].trim());
    if low.is_empty() || high.is_empty() {
        return None;
    }
    Some(ConditionKind::Between {
        low: convert_value(low),
        high: convert_value(high),
    })
}

fn match_in(input: &str) -> Option<ConditionKind> {
    let rest = strip_keyword_ci(input, "in")?;
    let inner = capture_paren_arg(rest, false)?;
    let list = inner.split(',').map(convert_value).collect();
    Some(ConditionKind::In { list })
}

fn match_attribute_exists(input: &str) -> Option<ConditionKind> {
    input
        .eq_ignore_ascii_case("attribute_exists")
        .then_some(ConditionKind::AttributeExists)
}

fn match_attribute_not_exists(input: &str) -> Option<ConditionKind> {
    input
        .eq_ignore_ascii_case("attribute_not_exists")
        .then_some(ConditionKind::AttributeNotExists)
}

fn match_attribute_type(input: &str) -> Option<ConditionKind> {
    let rest = strip_keyword_ci(input, "attribute_type")?;
    let inner = capture_paren_arg(rest, false)?;
    Some(ConditionKind::AttributeType {
        operand: convert_value(inner),
    })
}

fn match_begins_with(input: &str) -> Option<ConditionKind> {
    let rest = strip_keyword_ci(input, "begins_with")?;
    // Parens are optional: `begins_with(prefix)` and `begins_with prefix`
    // both parse.
    let operand = match capture_paren_arg(rest, false) {
        Some(inner) => inner,
        None => {
            let bare = rest.trim_start();
            if bare.is_empty() {
                return None;
            }
            bare.trim_end_matches(')')
        }
    };
    Some(ConditionKind::BeginsWith {
        operand: convert_value(operand),
    })
}

fn match_contains(input: &str) -> Option<ConditionKind> {
    let rest = strip_keyword_ci(input, "contains")?;
    let inner = capture_paren_arg(rest, true)?;
    Some(ConditionKind::Contains {
        operand: convert_value(inner),
    })
}

fn match_size(input: &str) -> Option<ConditionKind> {
    let rest = strip_keyword_ci(input, "size")?.trim_start();
    let (op, rest) = CompareOp::take_prefix(rest)?;
    let digits: String = rest
        .trim_start()
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    if digits.is_empty() {
        return None;
    }
    Some(ConditionKind::Size {
        op,
        operand: convert_value(&digits),
    })
}

// ---------------------------------------------------------------------------
// Update SET grammar
// ---------------------------------------------------------------------------

/// Arithmetic operator in a SET delta expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MathOp {
    /// Addition.
    Plus,
    /// Subtraction.
    Minus,
}

impl fmt::Display for MathOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plus => write!(f, "+"),
            Self::Minus => write!(f, "-"),
        }
    }
}

/// One side of a SET arithmetic delta.
#[derive(Debug, Clone, PartialEq)]
pub enum MathOperand {
    /// The entry's own field.
    Field,
    /// An integer literal.
    Literal(serde_json::Number),
}

/// One argument of a `list_append(...)` call.
#[derive(Debug, Clone, PartialEq)]
pub enum ListAppendOperand {
    /// The entry's own field.
    Field,
    /// A `[...]` JSON-array literal.
    Literal(Vec<JsonValue>),
    /// Any other token (e.g. a pre-supplied `:ref`), kept verbatim.
    Token(String),
}

/// The recognized form of an update `SET` string value.
#[derive(Debug, Clone, PartialEq)]
pub enum SetValueExpr {
    /// `if_not_exists(<operand>)`: assign a default when the field is absent.
    IfNotExists {
        /// The raw default operand (may itself be a `:`-reference).
        operand: String,
    },
    /// `list_append(<a>, <b>)`.
    ListAppend {
        /// The call's arguments in order.
        operands: Vec<ListAppendOperand>,
    },
    /// Arithmetic delta against the entry's own field.
    Math {
        /// Left operand.
        left: MathOperand,
        /// The operator.
        op: MathOp,
        /// Right operand.
        right: MathOperand,
    },
    /// Plain assignment of the value as-is.
    Assign,
}

/// Recognize the form of an update `SET` string value.
///
/// Detection order: `if_not_exists`, then `list_append`, then arithmetic
/// delta, then plain assignment. The arithmetic matcher requires the entry's
/// own field name as a standalone token, so strings that merely contain
/// `+`/`-` (dates, emails, composite identifiers) assign literally.
#[must_use]
pub fn parse_set_value(key: &str, raw: &str) -> SetValueExpr {
    if raw.starts_with("if_not_exists") {
        if let Some(inner) = capture_call_arg(raw, "if_not_exists") {
            return SetValueExpr::IfNotExists {
                operand: inner.trim().to_owned(),
            };
        }
    }
    if raw.starts_with("list_append") {
        if let Some(inner) = capture_call_arg(raw, "list_append") {
            return SetValueExpr::ListAppend {
                operands: parse_list_append_operands(key, inner),
            };
        }
    }
    if let Some((left, op, right)) = parse_math(key, raw) {
        return SetValueExpr::Math { left, op, right };
    }
    SetValueExpr::Assign
}

/// Capture everything between the first `(` and the last `)` of a call.
fn capture_call_arg<'a>(input: &'a str, keyword: &str) -> Option<&'a str> {
    let rest = input.strip_prefix(keyword)?;
    let open = rest.find('(')?;
    let close = rest.rfind(')')?;
    (close > open).then(|| &rest[open + 1..close])
}

/// Split `list_append` arguments on top-level commas and classify each as
/// the field itself, a `[...]` literal, or a verbatim token.
fn parse_list_append_operands(key: &str, inner: &str) -> Vec<ListAppendOperand> {
    let mut operands = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;
    for (idx, c) in inner.char_indices() {
        match c {
            '[' => depth += 1,
            ']' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                operands.push(classify_list_append_operand(key, &inner[start..idx]));
                start = idx + 1;
            }
            _ => {}
        }
    }
    operands.push(classify_list_append_operand(key, &inner[start..]));
    operands
}

fn classify_list_append_operand(key: &str, segment: &str) -> ListAppendOperand {
    let segment = segment.trim();
    if segment == key {
        return ListAppendOperand::Field;
    }
    if let Some(body) = segment
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
    {
        let members = body
            .split(',')
            .map(|member| {
                let member = member.trim();
                serde_json::from_str(member)
                    .unwrap_or_else(|_| JsonValue::String(unquote(member).to_owned()))
            })
            .collect();
        return ListAppendOperand::Literal(members);
    }
    ListAppendOperand::Token(segment.to_owned())
}

/// Match `<field> op <int>` or `<int> op <field>`, anchored on both ends.
fn parse_math(key: &str, raw: &str) -> Option<(MathOperand, MathOp, MathOperand)> {
    let s = raw.trim();

    // <field> op <int>
    if let Some(rest) = s.strip_prefix(key) {
        let trimmed = rest.trim_start();
        let boundary = rest.len() != trimmed.len() || trimmed.starts_with(['+', '-']);
        if boundary {
            if let Some((op, number)) = take_op_and_int(trimmed) {
                return Some((MathOperand::Field, op, MathOperand::Literal(number)));
            }
        }
    }

    // <int> op <field>
    let digits: String = s.chars().take_while(char::is_ascii_digit).collect();
    if !digits.is_empty() {
        let rest = s[digits.len()..].trim_start();
        if let Some((op, field)) = take_op(rest) {
            if field.trim() == key {
                let number = digits.parse::<u64>().ok().map(serde_json::Number::from)?;
                return Some((MathOperand::Literal(number), op, MathOperand::Field));
            }
        }
    }

    None
}

fn take_op(input: &str) -> Option<(MathOp, &str)> {
    if let Some(rest) = input.strip_prefix('+') {
        Some((MathOp::Plus, rest))
    } else {
        input.strip_prefix('-').map(|rest| (MathOp::Minus, rest))
    }
}

/// An operator followed by an integer running to the end of input.
fn take_op_and_int(input: &str) -> Option<(MathOp, serde_json::Number)> {
    let (op, rest) = take_op(input)?;
    let rest = rest.trim();
    if rest.is_empty() || !rest.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let number = rest.parse::<u64>().ok().map(serde_json::Number::from)?;
    Some((op, number))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
