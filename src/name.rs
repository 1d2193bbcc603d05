/// Types that expose a comparable name (volumes, materials, elements).
pub trait HasName {
    fn get_name(&self) -> &str;
}

impl<T: HasName + ?Sized> HasName for &T {
    fn get_name(&self) -> &str {
        (*self).get_name()
    }
}
impl<T: HasName + ?Sized> HasName for Box<T> {
    fn get_name(&self) -> &str {
        (**self).get_name()
    }
}
impl<T: HasName + ?Sized> HasName for std::rc::Rc<T> {
    fn get_name(&self) -> &str {
        (**self).get_name()
    }
}
impl<T: HasName + ?Sized> HasName for std::sync::Arc<T> {
    fn get_name(&self) -> &str {
        (**self).get_name()
    }
}

/// Finds the first item with the given name.
pub fn find_by_name<'a, T: HasName>(items: &'a [T], name: &str) -> Option<&'a T> {
    items.iter().find(|item| item.get_name() == name)
}
