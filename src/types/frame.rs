use std::collections::HashMap;

/// One tick of raw tracking values, keyed by input name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputFrame {
    values: HashMap<String, f64>,
}

impl InputFrame {
    /// Create an empty frame.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a value (builder version).
    #[must_use]
    pub fn set(mut self, name: &str, value: f64) -> Self {
        self.insert(name, value);
        self
    }

    /// Insert a value (mutable reference version).
    pub fn insert(&mut self, name: &str, value: f64) {
        self.values.insert(name.to_owned(), value);
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub(crate) fn values(&self) -> &HashMap<String, f64> {
        &self.values
    }
}

impl From<HashMap<String, f64>> for InputFrame {
    fn from(values: HashMap<String, f64>) -> Self {
        Self { values }
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for InputFrame {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_and_get() {
        let frame = InputFrame::new().set("HeadYaw", 12.5);
        assert_eq!(frame.get("HeadYaw"), Some(12.5));
        assert_eq!(frame.get("HeadPitch"), None);
    }

    #[test]
    fn overwrite_value() {
        let frame = InputFrame::new().set("x", 1.0).set("x", 2.0);
        assert_eq!(frame.get("x"), Some(2.0));
        assert_eq!(frame.len(), 1);
    }

    #[test]
    fn insert_mutable_ref() {
        let mut frame = InputFrame::new();
        frame.insert("JawOpen", 0.4);
        assert_eq!(frame.get("JawOpen"), Some(0.4));
    }

    #[test]
    fn dotted_names_are_flat_keys() {
        let frame = InputFrame::new().set("head.yaw", 3.0);
        assert_eq!(frame.get("head.yaw"), Some(3.0));
        assert_eq!(frame.get("head"), None);
    }

    #[test]
    fn from_iterator_and_map() {
        let a: InputFrame = [("a", 1.0), ("b", 2.0)].into_iter().collect();
        let b = InputFrame::from(HashMap::from([
            ("a".to_owned(), 1.0),
            ("b".to_owned(), 2.0),
        ]));
        assert_eq!(a, b);
        assert!(!a.is_empty());
    }

    #[test]
    fn empty_frame() {
        let frame = InputFrame::new();
        assert!(frame.is_empty());
        assert_eq!(frame.iter().count(), 0);
    }
}
