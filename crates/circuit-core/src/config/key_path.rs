//! Key paths into a manifest

/// A single key or an ordered sequence of keys.
pub trait KeyPath {
    fn segments(&self) -> Vec<&str>;

    /// Dotted rendering used in error messages, e.g. `common.atlas`.
    fn dotted(&self) -> String {
        self.segments().join(".")
    }
}

impl KeyPath for str {
    fn segments(&self) -> Vec<&str> {
        vec![self]
    }
}

impl KeyPath for String {
    fn segments(&self) -> Vec<&str> {
        vec![self.as_str()]
    }
}

impl KeyPath for [&str] {
    fn segments(&self) -> Vec<&str> {
        self.to_vec()
    }
}

impl<const N: usize> KeyPath for [&str; N] {
    fn segments(&self) -> Vec<&str> {
        self.to_vec()
    }
}
