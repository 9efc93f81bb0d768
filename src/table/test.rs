use pretty_assertions::assert_eq;

use super::*;

fn sample() -> Tree {
    "title = 'x'\n[[bin]]\nname = 'a'\n[[bin]]\nname = 'b'\n[bin.deps]\nlog = '0.4'\n"
        .parse()
        .unwrap()
}

#[test]
fn lookups_follow_the_last_array_element() {
    let tree = sample();
    assert_eq!(tree.get("bin.name"), Some(&Value::from("b")));
    assert_eq!(tree.get_path(&["bin", "deps", "log"]), Some(&Value::from("0.4")));
    assert_eq!(tree.get("bin.missing"), None);
    assert_eq!(tree.get("title.x"), None);
    assert_eq!(tree.get("bad..path"), None);
    assert!(tree.contains("bin.deps"));
    assert_eq!(tree.position_of("bin.deps.log"), Some(Position::new(6, 0)));
}

#[test]
fn insert_refuses_existing_keys() {
    let mut tree = Tree::new();
    tree.insert("a", 1).unwrap();
    let err = tree.insert("a", 2).unwrap_err();
    assert!(matches!(*err.kind(), ErrorKind::DuplicateKey(ref key) if key == "a"));
    assert_eq!(tree.value("a"), Some(&Value::from(1)));
}

#[test]
fn insert_path_creates_tables() {
    let mut tree = Tree::new();
    tree.insert_path(&["a", "b", "c"], true).unwrap();
    tree.insert_path(&["a", "d"], 1.5).unwrap();
    assert_eq!(tree.get("a.b.c"), Some(&Value::from(true)));
    assert_eq!(tree.get("a").and_then(Value::as_table).map(Tree::len), Some(2));

    assert_eq!(
        tree.insert_path(&["a", "d", "e"], 1).unwrap_err().to_string(),
        "key 'a.d' is not a table"
    );
    assert_eq!(
        tree.insert_path(&["a", "b", "c"], 1).unwrap_err().to_string(),
        "duplicate key 'a.b.c'"
    );
    assert!(tree.insert_path::<&str, _>(&[], 1).is_err());
}

#[test]
fn replace_and_remove_keep_order() {
    let mut tree = Tree::new();
    tree.insert("a", 1).unwrap();
    tree.insert("b", 2).unwrap();
    tree.insert("c", 3).unwrap();
    assert_eq!(tree.replace("b", "two"), Some(Value::from(2)));
    assert_eq!(tree.replace("d", 4), None);
    assert_eq!(tree.remove("a"), Some(Value::from(1)));
    assert_eq!(tree.keys().collect::<Vec<_>>(), vec!["b", "c", "d"]);
    assert_eq!(tree.value("b"), Some(&Value::from("two")));
}

#[test]
fn replace_may_change_the_kind_of_a_value() {
    let mut tree: Tree = "a = 1\n[b]\nc = 2\n[d]\ne = 3\n".parse().unwrap();
    let old = tree.replace("b", "flat").unwrap();
    assert_eq!(old.as_table().and_then(|t| t.get("c")), Some(&Value::from(2)));
    assert_eq!(tree.replace("a", Tree::new()), Some(Value::from(1)));
    assert_eq!(tree.keys().collect::<Vec<_>>(), vec!["a", "b", "d"]);

    let text = tree.to_text().unwrap();
    assert_eq!(text, "b = \"flat\"\n\n[a]\n\n[d]\n  e = 3\n");
    assert_eq!(text.parse::<Tree>().unwrap(), tree);
}

#[test]
fn equality_ignores_order_and_positions() {
    let left: Tree = "a = 1\nb = { c = 2 }".parse().unwrap();
    let right: Tree = "\n\n[b]\nc = 2\n".parse().unwrap();
    assert_ne!(left, right);
    let right: Tree = "[b]\nc = 2\n[c]".parse().unwrap();
    assert_ne!(left, right);
    let mut reordered = Tree::new();
    reordered.insert_path(&["b", "c"], 2).unwrap();
    reordered.insert("a", 1).unwrap();
    assert_eq!(left, reordered);
}

#[test]
fn nested_map_copies_values_in_order() {
    let tree = sample();
    let map = tree.to_nested_map();
    assert_eq!(map.keys().collect::<Vec<_>>(), vec!["title", "bin"]);
    assert_eq!(map["title"], Value::from("x"));
    assert_eq!(map["bin"].as_tables().map(|t| t.len()), Some(2));
}
