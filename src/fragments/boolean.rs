use crate::types::Predicate;

#[must_use]
pub fn is_true() -> Predicate<bool> {
    Predicate::test("is true", |value: &bool| *value)
}

#[must_use]
pub fn is_false() -> Predicate<bool> {
    Predicate::test("is false", |value: &bool| !*value)
}
