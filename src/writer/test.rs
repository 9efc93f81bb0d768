use chrono::NaiveDate;
use pretty_assertions::assert_eq;

use super::*;
use crate::parser::parse;

fn round_trip(input: &str) -> String {
    let tree = parse(input).unwrap();
    let text = tree.to_text().unwrap();
    assert_eq!(parse(&text).unwrap(), tree, "written as:\n{}", text);
    text
}

#[test]
fn nested_table_round_trip() {
    let mut tree = Tree::new();
    tree.insert_path(&["name", "first"], "Tom").unwrap();
    let text = tree.to_text().unwrap();
    assert_eq!(text, "[name]\n  first = \"Tom\"\n");
    assert_eq!(parse(&text).unwrap(), tree);
}

#[test]
fn simple_keys_come_first() {
    let mut tree = Tree::new();
    tree.insert("t", Tree::new()).unwrap();
    tree.insert("z", 1).unwrap();
    tree.insert("a", "x").unwrap();
    assert_eq!(tree.to_text().unwrap(), "z = 1\na = \"x\"\n\n[t]\n");
}

#[test]
fn headers_are_indented_by_depth() {
    let text = round_trip("[a]\nx = 1\n[a.b]\ny = 2\n[[c]]\nz = 'q'\n[[c]]\n");
    assert_eq!(
        text,
        "[a]\n  x = 1\n\n  [a.b]\n    y = 2\n\n[[c]]\n  z = \"q\"\n\n[[c]]\n"
    );
}

#[test]
fn indent_width_is_configurable() {
    let tree = parse("[a]\nx = 1").unwrap();
    let options = WriteOptions {
        indent: 4,
        ..WriteOptions::default()
    };
    assert_eq!(tree.to_text_with(&options).unwrap(), "[a]\n    x = 1\n");
}

#[test]
fn scalars_are_canonical() {
    let text = round_trip(
        "one = 1.0\nhuge = 1e300\nup = +inf\ndown = -inf\nhalf = 0.5\n\
         s = \"a\\\"b\\n\"\n\"b c\" = 1\nd = 1979-05-27 07:32:00Z\nyes = true\n",
    );
    assert_eq!(
        text,
        "one = 1.0\nhuge = 1e300\nup = inf\ndown = -inf\nhalf = 0.5\n\
         s = \"a\\\"b\\n\"\n\"b c\" = 1\nd = 1979-05-27T07:32:00Z\nyes = true\n"
    );
}

#[test]
fn nan_is_written_as_nan() {
    let mut tree = Tree::new();
    tree.insert("n", f64::NAN).unwrap();
    assert_eq!(tree.to_text().unwrap(), "n = nan\n");
}

#[test]
fn arrays_and_inline_tables_stay_on_one_line() {
    let text = round_trip("a = [1, [2, 3], {x = 1}, {}]\np = { q.r = 'w' }\n");
    assert_eq!(
        text,
        "a = [1, [2, 3], { x = 1 }, {}]\n\n[p]\n\n  [p.q]\n    r = \"w\"\n"
    );
}

#[test]
fn arrays_of_tables_with_subtables() {
    round_trip(
        "[[fruit]]\nname = 'apple'\n[fruit.physical]\ncolor = 'red'\n\
         [[fruit.variety]]\nname = 'red delicious'\n[[fruit]]\nname = 'banana'\n",
    );
}

#[test]
fn empty_array_of_tables_is_refused() {
    let mut tree = Tree::new();
    tree.insert_path(&["a", "b"], Vec::<Tree>::new()).unwrap();
    assert_eq!(
        tree.to_text().unwrap_err().to_string(),
        "cannot write empty array of tables 'a.b'"
    );
}

#[test]
fn out_of_range_year_is_refused() {
    let mut tree = Tree::new();
    let date = NaiveDate::from_ymd_opt(10000, 1, 1).unwrap();
    tree.insert("d", Datetime::LocalDate(date)).unwrap();
    let err = tree.to_text().unwrap_err();
    assert!(matches!(*err.kind(), ErrorKind::Serialize(_)));
    assert!(err.to_string().contains("year must be between 0 and 9999"));
}

#[test]
fn strict_arrays_refuse_mixed_kinds() {
    let tree = parse("a = [1, 'x']").unwrap();
    assert_eq!(tree.to_text().unwrap(), "a = [1, \"x\"]\n");
    let strict = WriteOptions {
        strict_arrays: true,
        ..WriteOptions::default()
    };
    assert_eq!(
        tree.to_text_with(&strict).unwrap_err().to_string(),
        "mixed types in array: expected integer, found string"
    );
}
