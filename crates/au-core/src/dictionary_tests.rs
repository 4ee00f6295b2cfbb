use crate::{DictCode, Dictionary, DictionaryError};

#[test]
fn define_then_resolve() {
    let mut dict = Dictionary::new();
    dict.define(DictCode::new(1), "name").unwrap();
    dict.define(DictCode::new(2), "age").unwrap();

    assert_eq!(dict.resolve(DictCode::new(1)), Ok("name"));
    assert_eq!(dict.resolve(DictCode::new(2)), Ok("age"));
    assert_eq!(dict.len(), 2);
}

#[test]
fn resolve_unknown_code_fails() {
    let dict = Dictionary::new();
    assert_eq!(
        dict.resolve(DictCode::new(7)),
        Err(DictionaryError::UnknownCode(DictCode::new(7)))
    );
}

#[test]
fn redefining_same_name_is_idempotent() {
    let mut dict = Dictionary::new();

    assert!(dict.define(DictCode::new(3), "id").is_ok());
    assert!(dict.define(DictCode::new(3), "id").is_ok());

    assert_eq!(dict.resolve(DictCode::new(3)), Ok("id"));
    assert_eq!(dict.len(), 1);
}

#[test]
fn redefining_different_name_fails_and_keeps_original() {
    let mut dict = Dictionary::new();
    dict.define(DictCode::new(3), "id").unwrap();

    let err = dict.define(DictCode::new(3), "key").unwrap_err();
    assert_eq!(
        err,
        DictionaryError::DuplicateCode {
            code: DictCode::new(3),
            existing: "id".into(),
            attempted: "key".into(),
        }
    );
    assert_eq!(dict.resolve(DictCode::new(3)), Ok("id"));
}

#[test]
fn iter_follows_definition_order() {
    let mut dict = Dictionary::new();
    dict.define(DictCode::new(9), "z").unwrap();
    dict.define(DictCode::new(0), "a").unwrap();

    let entries: Vec<_> = dict.iter().collect();
    assert_eq!(entries, vec![(DictCode::new(9), "z"), (DictCode::new(0), "a")]);
}

#[test]
fn distinct_codes_may_share_a_name() {
    let mut dict = Dictionary::new();
    dict.define(DictCode::new(0), "x").unwrap();
    dict.define(DictCode::new(1), "x").unwrap();

    assert_eq!(dict.resolve(DictCode::new(0)), Ok("x"));
    assert_eq!(dict.resolve(DictCode::new(1)), Ok("x"));
}

#[test]
fn error_messages() {
    let unknown = DictionaryError::UnknownCode(DictCode::new(7));
    assert_eq!(
        unknown.to_string(),
        "dictionary code #7 referenced before it was defined"
    );

    let dup = DictionaryError::DuplicateCode {
        code: DictCode::new(1),
        existing: "a".into(),
        attempted: "b".into(),
    };
    assert_eq!(
        dup.to_string(),
        r#"dictionary code #1 already bound to "a", cannot rebind to "b""#
    );
}
