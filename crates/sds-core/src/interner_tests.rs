use crate::{Interner, Symbol};

#[test]
fn intern_deduplicates() {
    let mut interner = Interner::new();

    let a = interner.intern("foo");
    let b = interner.intern("foo");
    let c = interner.intern("bar");

    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_eq!(interner.len(), 2);
}

#[test]
fn resolve_roundtrip() {
    let mut interner = Interner::new();

    let sym = interner.intern("hello");
    assert_eq!(interner.resolve(sym), "hello");
    assert_eq!(interner.get("hello"), Some(sym));
    assert_eq!(interner.get("world"), None);
}

#[test]
fn intern_owned_avoids_clone_on_hit() {
    let mut interner = Interner::new();

    let a = interner.intern("test");
    let b = interner.intern_owned("test".to_string());

    assert_eq!(a, b);
    assert_eq!(interner.len(), 1);
}

#[test]
fn symbol_ordering_is_insertion_order() {
    let mut interner = Interner::new();

    let z = interner.intern("z");
    let a = interner.intern("a");

    assert!(z < a);
}

#[test]
fn try_resolve_rejects_foreign_symbol() {
    let interner = Interner::new();
    assert_eq!(interner.try_resolve(Symbol::from_raw(3)), None);
}

#[test]
fn serializes_as_string_list() {
    let mut interner = Interner::new();
    interner.intern("Int");
    interner.intern("f");

    let json = serde_json::to_string(&interner).unwrap();
    assert_eq!(json, r#"["Int","f"]"#);

    let back: Interner = serde_json::from_str(&json).unwrap();
    assert_eq!(back.get("f"), Some(Symbol::from_raw(1)));
    assert_eq!(back.resolve(Symbol::from_raw(0)), "Int");
}
