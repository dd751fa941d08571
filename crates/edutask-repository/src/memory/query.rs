//! Filter matching and update operators for the in-memory store.
//!
//! Covers the query and update subset the data access layer relies on:
//! equality (with array membership), `$eq`, `$ne`, `$in`, `$nin`, `$exists`,
//! `$and`, `$or` for filters and `$set`, `$unset`, `$inc`, `$push` for
//! updates. Dotted paths address nested documents.

use bson::{Bson, Document};
use edutask_core::{EdutaskError, EdutaskResult};

/// Resolves a dotted path inside a document.
pub fn get_path<'a>(document: &'a Document, path: &str) -> Option<&'a Bson> {
    let mut segments = path.split('.');
    let first = segments.next()?;
    let mut current = document.get(first)?;
    for segment in segments {
        current = match current {
            Bson::Document(inner) => inner.get(segment)?,
            Bson::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

fn set_path(document: &mut Document, path: &str, value: Bson) -> EdutaskResult<()> {
    match path.split_once('.') {
        None => {
            document.insert(path, value);
            Ok(())
        }
        Some((head, rest)) => {
            if !document.contains_key(head) {
                document.insert(head, Document::new());
            }
            match document.get_mut(head) {
                Some(Bson::Document(inner)) => set_path(inner, rest, value),
                _ => Err(EdutaskError::Database(format!(
                    "Cannot create field '{rest}' in element {{{head}}}"
                ))),
            }
        }
    }
}

fn remove_path(document: &mut Document, path: &str) {
    match path.split_once('.') {
        None => {
            document.remove(path);
        }
        Some((head, rest)) => {
            if let Some(Bson::Document(inner)) = document.get_mut(head) {
                remove_path(inner, rest);
            }
        }
    }
}

fn as_number(value: &Bson) -> Option<f64> {
    match value {
        Bson::Int32(v) => Some(f64::from(*v)),
        #[allow(clippy::cast_precision_loss)]
        Bson::Int64(v) => Some(*v as f64),
        Bson::Double(v) => Some(*v),
        _ => None,
    }
}

fn as_integer(value: &Bson) -> Option<i64> {
    match value {
        Bson::Int32(v) => Some(i64::from(*v)),
        Bson::Int64(v) => Some(*v),
        _ => None,
    }
}

/// Compares values the way the server does for equality: numbers compare
/// by value across int, long and double. Integer pairs compare exactly.
#[must_use]
#[allow(clippy::float_cmp)]
pub fn values_equal(a: &Bson, b: &Bson) -> bool {
    if let (Some(x), Some(y)) = (as_integer(a), as_integer(b)) {
        return x == y;
    }
    match (as_number(a), as_number(b)) {
        (Some(x), Some(y)) => x == y,
        _ => a == b,
    }
}

/// Equality against a possibly missing field. Arrays match when any
/// element matches; a missing field matches `null`.
fn field_equals(value: Option<&Bson>, expected: &Bson) -> bool {
    match value {
        None => matches!(expected, Bson::Null),
        Some(v) if values_equal(v, expected) => true,
        Some(Bson::Array(items)) => items.iter().any(|item| values_equal(item, expected)),
        Some(_) => false,
    }
}

fn is_operator_document(value: &Bson) -> bool {
    match value {
        Bson::Document(d) => d.keys().next().is_some_and(|k| k.starts_with('$')),
        _ => false,
    }
}

fn operand_array<'a>(operator: &str, operand: &'a Bson) -> EdutaskResult<&'a Vec<Bson>> {
    match operand {
        Bson::Array(items) => Ok(items),
        _ => Err(EdutaskError::Database(format!("{operator} needs an array"))),
    }
}

fn matches_operators(value: Option<&Bson>, operators: &Document) -> EdutaskResult<bool> {
    for (operator, operand) in operators {
        let ok = match operator.as_str() {
            "$eq" => field_equals(value, operand),
            "$ne" => !field_equals(value, operand),
            "$in" => operand_array(operator, operand)?
                .iter()
                .any(|candidate| field_equals(value, candidate)),
            "$nin" => !operand_array(operator, operand)?
                .iter()
                .any(|candidate| field_equals(value, candidate)),
            "$exists" => {
                let wanted = match operand {
                    Bson::Boolean(b) => *b,
                    other => as_number(other).is_some_and(|n| n != 0.0),
                };
                value.is_some() == wanted
            }
            unknown => {
                return Err(EdutaskError::Database(format!(
                    "unknown operator: {unknown}"
                )))
            }
        };
        if !ok {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Returns true when `document` satisfies every clause of `filter`.
pub fn matches(document: &Document, filter: &Document) -> EdutaskResult<bool> {
    for (key, condition) in filter {
        let ok = match key.as_str() {
            "$and" => {
                let mut all = true;
                for clause in operand_array(key, condition)? {
                    if !matches(document, clause_document(key, clause)?)? {
                        all = false;
                        break;
                    }
                }
                all
            }
            "$or" => {
                let mut any = false;
                for clause in operand_array(key, condition)? {
                    if matches(document, clause_document(key, clause)?)? {
                        any = true;
                        break;
                    }
                }
                any
            }
            k if k.starts_with('$') => {
                return Err(EdutaskError::Database(format!(
                    "unknown top level operator: {k}"
                )))
            }
            path => {
                let value = get_path(document, path);
                match condition {
                    Bson::Document(operators) if is_operator_document(condition) => {
                        matches_operators(value, operators)?
                    }
                    expected => field_equals(value, expected),
                }
            }
        };
        if !ok {
            return Ok(false);
        }
    }
    Ok(true)
}

fn clause_document<'a>(operator: &str, clause: &'a Bson) -> EdutaskResult<&'a Document> {
    match clause {
        Bson::Document(d) => Ok(d),
        _ => Err(EdutaskError::Database(format!(
            "{operator} argument's entries must be objects"
        ))),
    }
}

fn operator_fields<'a>(operator: &str, operand: &'a Bson) -> EdutaskResult<&'a Document> {
    match operand {
        Bson::Document(d) => Ok(d),
        _ => Err(EdutaskError::Database(format!(
            "Modifiers operate on fields but we found type {:?} instead for {operator}",
            operand.element_type()
        ))),
    }
}

/// Applies an operator update to `document` in place.
///
/// The identifier field is immutable. Documents without any `$` operator
/// are rejected; whole-document replacement is not an update.
pub fn apply_update(document: &mut Document, update: &Document) -> EdutaskResult<()> {
    if update.is_empty() || !update.keys().all(|k| k.starts_with('$')) {
        return Err(EdutaskError::Database(
            "update document requires atomic operators".to_string(),
        ));
    }

    for (operator, operand) in update {
        let fields = operator_fields(operator, operand)?;
        for (path, value) in fields {
            if path == "_id" || path.starts_with("_id.") {
                return Err(EdutaskError::Database(format!(
                    "Performing an update on the path '{path}' would modify the immutable field '_id'"
                )));
            }
            match operator.as_str() {
                "$set" => set_path(document, path, value.clone())?,
                "$unset" => remove_path(document, path),
                "$inc" => increment(document, path, value)?,
                "$push" => push(document, path, value)?,
                unknown => {
                    return Err(EdutaskError::Database(format!(
                        "Unknown modifier: {unknown}"
                    )))
                }
            }
        }
    }
    Ok(())
}

fn increment(document: &mut Document, path: &str, by: &Bson) -> EdutaskResult<()> {
    let sum = match (get_path(document, path), by) {
        (None, v) if as_number(v).is_some() => v.clone(),
        (Some(Bson::Int32(a)), Bson::Int32(b)) => a
            .checked_add(*b)
            .map_or_else(|| Bson::Int64(i64::from(*a) + i64::from(*b)), Bson::Int32),
        (Some(Bson::Int64(a)), Bson::Int32(b)) => Bson::Int64(a.saturating_add(i64::from(*b))),
        (Some(Bson::Int32(a)), Bson::Int64(b)) => Bson::Int64(i64::from(*a).saturating_add(*b)),
        (Some(Bson::Int64(a)), Bson::Int64(b)) => Bson::Int64(a.saturating_add(*b)),
        (Some(current), v) => match (as_number(current), as_number(v)) {
            (Some(a), Some(b)) => Bson::Double(a + b),
            _ => {
                return Err(EdutaskError::Database(format!(
                    "Cannot apply $inc to a value of non-numeric type at '{path}'"
                )))
            }
        },
        (None, _) => {
            return Err(EdutaskError::Database(
                "Cannot increment with non-numeric argument".to_string(),
            ))
        }
    };
    set_path(document, path, sum)
}

fn push(document: &mut Document, path: &str, value: &Bson) -> EdutaskResult<()> {
    let additions = match value {
        Bson::Document(d) if d.contains_key("$each") => match d.get("$each") {
            Some(Bson::Array(items)) => items.clone(),
            _ => {
                return Err(EdutaskError::Database(
                    "The argument to $each in $push must be an array".to_string(),
                ))
            }
        },
        single => vec![single.clone()],
    };

    let mut items = match get_path(document, path) {
        None => Vec::new(),
        Some(Bson::Array(existing)) => existing.clone(),
        Some(_) => {
            return Err(EdutaskError::Database(format!(
                "The field '{path}' must be an array"
            )))
        }
    };
    items.extend(additions);
    set_path(document, path, Bson::Array(items))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    fn sample() -> Document {
        doc! {
            "name": "Test Item",
            "count": 5,
            "tags": ["a", "b"],
            "metadata": { "created_by": "user1", "version": 1 }
        }
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        assert!(matches(&sample(), &doc! {}).unwrap());
    }

    #[test]
    fn test_equality_and_nested_paths() {
        let d = sample();
        assert!(matches(&d, &doc! { "name": "Test Item" }).unwrap());
        assert!(!matches(&d, &doc! { "name": "Other" }).unwrap());
        assert!(matches(&d, &doc! { "metadata.created_by": "user1" }).unwrap());
        assert!(matches(&d, &doc! { "name": "Test Item", "count": 5 }).unwrap());
        assert!(!matches(&d, &doc! { "name": "Test Item", "count": 6 }).unwrap());
    }

    #[test]
    fn test_numeric_equality_across_types() {
        assert!(matches(&sample(), &doc! { "count": 5.0 }).unwrap());
        assert!(matches(&sample(), &doc! { "count": 5_i64 }).unwrap());
    }

    #[test]
    fn test_array_membership() {
        assert!(matches(&sample(), &doc! { "tags": "a" }).unwrap());
        assert!(!matches(&sample(), &doc! { "tags": "z" }).unwrap());
    }

    #[test]
    fn test_large_integers_compare_exactly() {
        let big = Bson::Int64(9_007_199_254_740_992);
        assert!(!values_equal(&big, &Bson::Int64(9_007_199_254_740_993)));
        assert!(values_equal(&Bson::Int32(7), &Bson::Int64(7)));
        assert!(values_equal(&Bson::Int64(7), &Bson::Double(7.0)));
        assert!(!values_equal(&Bson::Double(0.1 + 0.2), &Bson::Double(0.3)));
    }

    #[test]
    fn test_missing_field_matches_null() {
        assert!(matches(&sample(), &doc! { "email": Bson::Null }).unwrap());
        assert!(!matches(&sample(), &doc! { "email": "x@y" }).unwrap());
    }

    #[test]
    fn test_operators() {
        let d = sample();
        assert!(matches(&d, &doc! { "count": { "$ne": 4 } }).unwrap());
        assert!(matches(&d, &doc! { "count": { "$in": [1, 5] } }).unwrap());
        assert!(matches(&d, &doc! { "count": { "$nin": [1, 2] } }).unwrap());
        assert!(matches(&d, &doc! { "email": { "$exists": false } }).unwrap());
        assert!(!matches(&d, &doc! { "name": { "$exists": false } }).unwrap());
        assert!(matches(&d, &doc! { "$or": [{ "name": "x" }, { "count": 5 }] }).unwrap());
        assert!(!matches(&d, &doc! { "$and": [{ "name": "Test Item" }, { "count": 1 }] }).unwrap());
    }

    #[test]
    fn test_unknown_operator_is_error() {
        assert!(matches(&sample(), &doc! { "count": { "$regex": "5" } }).is_err());
        assert!(matches(&sample(), &doc! { "$where": "true" }).is_err());
    }

    #[test]
    fn test_set_and_unset() {
        let mut d = sample();
        apply_update(&mut d, &doc! { "$set": { "name": "Updated", "metadata.version": 2, "new.field": true } }).unwrap();
        assert_eq!(d.get_str("name").unwrap(), "Updated");
        assert_eq!(get_path(&d, "metadata.version"), Some(&Bson::Int32(2)));
        assert_eq!(get_path(&d, "new.field"), Some(&Bson::Boolean(true)));

        apply_update(&mut d, &doc! { "$unset": { "tags": "" } }).unwrap();
        assert!(!d.contains_key("tags"));
    }

    #[test]
    fn test_inc_and_push() {
        let mut d = sample();
        apply_update(&mut d, &doc! { "$inc": { "count": 2, "views": 1 } }).unwrap();
        assert_eq!(d.get_i32("count").unwrap(), 7);
        assert_eq!(d.get_i32("views").unwrap(), 1);

        apply_update(&mut d, &doc! { "$push": { "tags": "c" } }).unwrap();
        apply_update(&mut d, &doc! { "$push": { "tags": { "$each": ["d", "e"] } } }).unwrap();
        assert_eq!(d.get_array("tags").unwrap().len(), 5);

        assert!(apply_update(&mut d, &doc! { "$push": { "name": "x" } }).is_err());
        assert!(apply_update(&mut d, &doc! { "$inc": { "name": 1 } }).is_err());
    }

    #[test]
    fn test_rejects_replacement_and_id_changes() {
        let mut d = sample();
        assert!(apply_update(&mut d, &doc! { "name": "plain" }).is_err());
        assert!(apply_update(&mut d, &doc! {}).is_err());
        assert!(apply_update(&mut d, &doc! { "$set": { "_id": 1 } }).is_err());
        assert!(apply_update(&mut d, &doc! { "$rename": { "name": "title" } }).is_err());
    }
}
