//! Request validation for the product routes.
//!
//! Each route owns an ordered list of [`Rule`]s. Every rule is evaluated
//! independently and each failure contributes exactly one [`FieldError`], so a
//! client sees all problems with a request at once.

use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

use super::domain::ProductDraft;

pub const INVALID_ID: &str = "Invalid Id";
pub const NAME_EMPTY: &str = "Product name can not be empty";
pub const PRICE_NOT_NUMERIC: &str = "Invalid price value";
pub const PRICE_EMPTY: &str = "Product price can not be empty";
pub const PRICE_NOT_POSITIVE: &str = "The price can not be 0";
pub const AVAILABILITY_NOT_BOOLEAN: &str = "Invalid availability value";
pub const MALFORMED_BODY: &str = "Malformed JSON body";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Location {
    Body,
    Params,
}

/// One failed rule, shaped like the entries clients already parse:
/// `{ "type": "field", "value": .., "msg": "..", "path": "price", "location": "body" }`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    #[serde(rename = "type")]
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    pub msg: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<&'static str>,
    pub location: Location,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn new() -> Self { Self::default() }

    /// A single body-level error that is not tied to one field.
    pub fn body(msg: impl Into<String>) -> Self {
        Self(vec![FieldError { kind: "body", value: None, msg: msg.into(), path: None, location: Location::Body }])
    }

    pub fn push(&mut self, err: FieldError) { self.0.push(err); }

    pub fn extend(&mut self, other: ValidationErrors) { self.0.extend(other.0); }

    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    pub fn len(&self) -> usize { self.0.len() }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> { self.0.iter() }

    pub fn messages(&self) -> Vec<&str> { self.0.iter().map(|e| e.msg.as_str()).collect() }

    /// `Ok(value)` when nothing failed.
    pub fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.messages().join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// A named predicate over one input value. `None` is an absent field.
#[derive(Clone, Copy)]
pub struct Rule {
    pub field: &'static str,
    pub location: Location,
    pub msg: &'static str,
    pub check: fn(Option<&Value>) -> bool,
}

impl Rule {
    fn apply(&self, input: &Map<String, Value>, errors: &mut ValidationErrors) {
        let value = input.get(self.field);
        if !(self.check)(value) {
            errors.push(FieldError {
                kind: "field",
                value: value.cloned(),
                msg: self.msg.to_string(),
                path: Some(self.field),
                location: self.location,
            });
        }
    }
}

pub const ID_IS_POSITIVE_INT: Rule =
    Rule { field: "id", location: Location::Params, msg: INVALID_ID, check: is_positive_id };
pub const NAME_NOT_EMPTY: Rule =
    Rule { field: "name", location: Location::Body, msg: NAME_EMPTY, check: not_empty };
pub const PRICE_IS_NUMERIC: Rule =
    Rule { field: "price", location: Location::Body, msg: PRICE_NOT_NUMERIC, check: is_numeric };
pub const PRICE_NOT_EMPTY: Rule =
    Rule { field: "price", location: Location::Body, msg: PRICE_EMPTY, check: not_empty };
pub const PRICE_IS_POSITIVE: Rule = Rule {
    field: "price",
    location: Location::Body,
    msg: PRICE_NOT_POSITIVE,
    check: is_positive,
};
pub const AVAILABILITY_IS_BOOLEAN: Rule = Rule {
    field: "availability",
    location: Location::Body,
    msg: AVAILABILITY_NOT_BOOLEAN,
    check: is_boolean,
};

pub const ID_RULES: &[Rule] = &[ID_IS_POSITIVE_INT];
pub const CREATE_RULES: &[Rule] = &[NAME_NOT_EMPTY, PRICE_IS_NUMERIC, PRICE_NOT_EMPTY, PRICE_IS_POSITIVE];
pub const REPLACE_RULES: &[Rule] =
    &[NAME_NOT_EMPTY, PRICE_IS_NUMERIC, PRICE_NOT_EMPTY, PRICE_IS_POSITIVE, AVAILABILITY_IS_BOOLEAN];

/// Evaluate every rule; never stops at the first failure.
pub fn run(rules: &[Rule], input: &Map<String, Value>) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    for rule in rules {
        rule.apply(input, &mut errors);
    }
    errors
}

fn params(raw_id: &str) -> Map<String, Value> {
    let mut m = Map::new();
    m.insert("id".into(), Value::String(raw_id.to_string()));
    m
}

/// Validate a path id.
pub fn product_id(raw: &str) -> Result<i32, ValidationErrors> {
    let input = params(raw);
    run(ID_RULES, &input).into_result(())?;
    id_value(input.get("id")).ok_or_else(|| ValidationErrors::body(INVALID_ID))
}

/// Validate a create body. `availability` is optional and only honoured when it
/// is a JSON boolean.
pub fn create_draft(body: &Map<String, Value>) -> Result<ProductDraft, ValidationErrors> {
    run(CREATE_RULES, body).into_result(())?;
    draft(body, body.get("availability").and_then(Value::as_bool).unwrap_or(true))
}

/// Validate a full replacement: path id and body together, so a bad id and a
/// bad body are reported in one response.
pub fn replace_request(raw_id: &str, body: &Map<String, Value>) -> Result<(i32, ProductDraft), ValidationErrors> {
    let mut errors = run(ID_RULES, &params(raw_id));
    errors.extend(run(REPLACE_RULES, body));
    errors.into_result(())?;
    let id = product_id(raw_id)?;
    let availability = boolean(body.get("availability")).ok_or_else(|| ValidationErrors::body(AVAILABILITY_NOT_BOOLEAN))?;
    Ok((id, draft(body, availability)?))
}

fn draft(body: &Map<String, Value>, availability: bool) -> Result<ProductDraft, ValidationErrors> {
    let name = text(body.get("name")).unwrap_or_default();
    let price = number(body.get("price")).ok_or_else(|| ValidationErrors::body(PRICE_NOT_NUMERIC))?;
    Ok(ProductDraft { name, price, availability })
}

/// String form of a scalar; `None` for absent or null.
fn text(v: Option<&Value>) -> Option<String> {
    match v? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    }
}

fn not_empty(v: Option<&Value>) -> bool {
    text(v).is_some_and(|s| !s.is_empty())
}

fn is_numeric(v: Option<&Value>) -> bool {
    match v {
        Some(Value::Number(_)) => true,
        Some(Value::String(s)) => is_numeric_str(s),
        _ => false,
    }
}

/// Optional sign, digits, at most one decimal point followed by digits.
fn is_numeric_str(s: &str) -> bool {
    let digits = s.strip_prefix(['+', '-']).unwrap_or(s);
    let (int, frac) = match digits.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (digits, None),
    };
    let all_digits = |p: &str| p.bytes().all(|b| b.is_ascii_digit());
    match frac {
        Some(f) => !f.is_empty() && all_digits(int) && all_digits(f),
        None => !int.is_empty() && all_digits(int),
    }
}

fn is_positive(v: Option<&Value>) -> bool {
    number(v).is_some_and(|n| n > 0.0)
}

fn is_boolean(v: Option<&Value>) -> bool {
    boolean(v).is_some()
}

fn is_positive_id(v: Option<&Value>) -> bool {
    id_value(v).is_some()
}

fn number(v: Option<&Value>) -> Option<f64> {
    match v? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) if is_numeric_str(s) => s.parse::<f64>().ok(),
        _ => None,
    }
}

fn boolean(v: Option<&Value>) -> Option<bool> {
    match v? {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.as_str() {
            "true" | "1" => Some(true),
            "false" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn id_value(v: Option<&Value>) -> Option<i32> {
    match v? {
        Value::String(s) => s.parse::<i32>().ok().filter(|id| *id > 0),
        Value::Number(n) => n.as_i64().and_then(|id| i32::try_from(id).ok()).filter(|id| *id > 0),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn obj(v: Value) -> Map<String, Value> {
        v.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn empty_create_body_reports_four_errors() {
        let errs = create_draft(&Map::new()).unwrap_err();
        assert_eq!(errs.messages(), vec![NAME_EMPTY, PRICE_NOT_NUMERIC, PRICE_EMPTY, PRICE_NOT_POSITIVE]);
    }

    #[test]
    fn zero_price_reports_only_positivity() {
        let errs = create_draft(&obj(json!({ "name": "Teclado gamer", "price": 0 }))).unwrap_err();
        assert_eq!(errs.messages(), vec![PRICE_NOT_POSITIVE]);
    }

    #[test]
    fn text_price_reports_numeric_and_positivity() {
        let errs = create_draft(&obj(json!({ "name": "Teclado gamer", "price": "Hola" }))).unwrap_err();
        assert_eq!(errs.len(), 2);
        assert_eq!(errs.messages(), vec![PRICE_NOT_NUMERIC, PRICE_NOT_POSITIVE]);
    }

    #[test]
    fn valid_create_body_defaults_availability() {
        let d = create_draft(&obj(json!({ "name": "Mouse Testing", "price": 40 }))).unwrap();
        assert_eq!(d.name, "Mouse Testing");
        assert_eq!(d.price, 40.0);
        assert!(d.availability);
    }

    #[test]
    fn numeric_string_price_is_accepted() {
        let d = create_draft(&obj(json!({ "name": "Cable", "price": "12.50" }))).unwrap();
        assert_eq!(d.price, 12.5);
    }

    #[test]
    fn create_honours_boolean_availability_only() {
        let d = create_draft(&obj(json!({ "name": "A", "price": 1, "availability": false }))).unwrap();
        assert!(!d.availability);
        let d = create_draft(&obj(json!({ "name": "A", "price": 1, "availability": "nope" }))).unwrap();
        assert!(d.availability);
    }

    #[test]
    fn null_fields_count_as_missing() {
        let errs = create_draft(&obj(json!({ "name": null, "price": null }))).unwrap_err();
        assert_eq!(errs.len(), 4);
    }

    #[test]
    fn invalid_ids() {
        for raw in ["hola", "not-valid-url", "0", "-3", "1.5", "", "99999999999"] {
            let errs = product_id(raw).unwrap_err();
            assert_eq!(errs.messages(), vec![INVALID_ID], "raw id {raw:?}");
            let first = errs.iter().next().unwrap();
            assert_eq!(first.location, Location::Params);
            assert_eq!(first.path, Some("id"));
        }
        assert_eq!(product_id("2000").unwrap(), 2000);
    }

    #[test]
    fn replace_with_empty_body_reports_five_errors() {
        let errs = replace_request("1", &Map::new()).unwrap_err();
        assert_eq!(
            errs.messages(),
            vec![NAME_EMPTY, PRICE_NOT_NUMERIC, PRICE_EMPTY, PRICE_NOT_POSITIVE, AVAILABILITY_NOT_BOOLEAN]
        );
    }

    #[test]
    fn replace_with_bad_id_and_good_body_reports_only_id() {
        let body = obj(json!({ "name": "Monitor curvo", "price": 300, "availability": true }));
        let errs = replace_request("not-valid-url", &body).unwrap_err();
        assert_eq!(errs.messages(), vec![INVALID_ID]);
    }

    #[test]
    fn replace_with_negative_price() {
        let body = obj(json!({ "name": "Monitor Curvo", "availability": true, "price": -300 }));
        let errs = replace_request("1", &body).unwrap_err();
        assert_eq!(errs.messages(), vec![PRICE_NOT_POSITIVE]);
    }

    #[test]
    fn replace_accepts_string_booleans() {
        let body = obj(json!({ "name": "Monitor", "price": 300, "availability": "false" }));
        let (id, d) = replace_request("7", &body).unwrap();
        assert_eq!(id, 7);
        assert!(!d.availability);
    }

    #[test]
    fn field_error_serializes_like_the_api_contract() {
        let errs = product_id("hola").unwrap_err();
        let v = serde_json::to_value(&errs).unwrap();
        assert_eq!(
            v,
            json!([{ "type": "field", "value": "hola", "msg": "Invalid Id", "path": "id", "location": "params" }])
        );
    }

    #[test]
    fn numeric_string_grammar() {
        for ok in ["40", "-3", "+2", "4.5", ".5"] {
            assert!(is_numeric_str(ok), "{ok}");
        }
        for bad in ["", "4.", "1e3", "abc", "1.2.3", "-", " 4"] {
            assert!(!is_numeric_str(bad), "{bad}");
        }
    }
}
