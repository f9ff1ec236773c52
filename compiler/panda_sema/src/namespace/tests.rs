use super::*;
use panda_ir::Span;
use pretty_assertions::assert_eq;

fn path(names: &[&str]) -> Vec<Ident> {
    names.iter().map(|n| Ident::new(*n, Span::DUMMY)).collect()
}

#[test]
fn creates_intermediate_nodes_once() {
    let mut tree = NamespaceTree::new();
    let abc = tree.resolve_qualified_path(&path(&["a", "b", "c"]));
    let ab = tree.resolve_qualified_path(&path(&["a", "b"]));
    let abc_again = tree.resolve_qualified_path(&path(&["a", "b", "c"]));

    assert_eq!(abc, abc_again);
    assert_eq!(tree.len(), 4);
    assert_eq!(tree.node(abc).path, "a.b.c");
    assert_eq!(tree.parent(abc), Some(ab));
    assert_eq!(tree.child(ab, "c"), Some(abc));
}

#[test]
fn empty_path_is_root() {
    let mut tree = NamespaceTree::new();
    assert_eq!(tree.resolve_qualified_path(&[]), NamespaceId::ROOT);
    assert_eq!(tree.parent(NamespaceId::ROOT), None);
    assert_eq!(tree.qualify(NamespaceId::ROOT, "main"), "main");
}

#[test]
fn ancestors_walk_to_root() {
    let mut tree = NamespaceTree::new();
    let leaf = tree.resolve_qualified_path(&path(&["x", "y"]));
    let names: Vec<String> = tree
        .ancestors(leaf)
        .map(|id| tree.node(id).path.clone())
        .collect();
    assert_eq!(names, vec!["x.y", "x", ""]);
    assert_eq!(tree.qualify(leaf, "Point"), "x.y.Point");
}

#[test]
fn insert_declaration_keeps_first() {
    let mut table: FxHashMap<String, VarId> = FxHashMap::default();
    let x = Ident::new("x", Span::new(0, 1));
    assert_eq!(insert_declaration(&mut table, &x, VarId::new(0)), Ok(()));
    assert_eq!(
        insert_declaration(&mut table, &x, VarId::new(1)),
        Err(VarId::new(0))
    );
    assert_eq!(table.get("x"), Some(&VarId::new(0)));
}
