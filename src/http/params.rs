//! Request parameters for GET query strings and multipart POST bodies.

use std::fmt;
use std::path::{Path, PathBuf};

/// A single parameter value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    /// Any scalar, already rendered as a string.
    Text(String),
    /// A local file; uploaded as a file part in multipart bodies.
    File(PathBuf),
}

impl ParamValue {
    pub fn file<P: Into<PathBuf>>(path: P) -> Self {
        ParamValue::File(path.into())
    }

    pub fn is_file(&self) -> bool {
        matches!(self, ParamValue::File(_))
    }
}

/// Renders the value as it appears in a query string: text as is, files by path.
impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Text(s) => f.write_str(s),
            ParamValue::File(p) => write!(f, "{}", p.display()),
        }
    }
}

impl From<String> for ParamValue {
    fn from(s: String) -> Self {
        ParamValue::Text(s)
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        ParamValue::Text(s.to_owned())
    }
}

impl From<&String> for ParamValue {
    fn from(s: &String) -> Self {
        ParamValue::Text(s.clone())
    }
}

impl From<PathBuf> for ParamValue {
    fn from(p: PathBuf) -> Self {
        ParamValue::File(p)
    }
}

impl From<&Path> for ParamValue {
    fn from(p: &Path) -> Self {
        ParamValue::File(p.to_path_buf())
    }
}

macro_rules! impl_from_scalar {
    ($($t:ty),*) => {
        $(
            impl From<$t> for ParamValue {
                fn from(v: $t) -> Self {
                    ParamValue::Text(v.to_string())
                }
            }
        )*
    };
}

impl_from_scalar!(bool, char, i8, i16, i32, i64, u8, u16, u32, u64, usize, isize, f32, f64);

/// Ordered name → value mapping with unique names.
///
/// Insertion order decides the order of query pairs and multipart parts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    entries: Vec<(String, ParamValue)>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a parameter. An existing name keeps its position and gets the
    /// new value; the old value is returned.
    pub fn insert<K, V>(&mut self, name: K, value: V) -> Option<ParamValue>
    where
        K: Into<String>,
        V: Into<ParamValue>,
    {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == name) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((name, value));
                None
            }
        }
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with<K, V>(mut self, name: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<ParamValue>,
    {
        self.insert(name, value);
        self
    }

    /// Builder-style insert of a file reference.
    pub fn with_file<K, P>(self, name: K, path: P) -> Self
    where
        K: Into<String>,
        P: Into<PathBuf>,
    {
        self.with(name, ParamValue::file(path))
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.entries
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v)
    }

    pub fn remove(&mut self, name: &str) -> Option<ParamValue> {
        let pos = self.entries.iter().position(|(k, _)| k == name)?;
        Some(self.entries.remove(pos).1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K, V> FromIterator<(K, V)> for Params
where
    K: Into<String>,
    V: Into<ParamValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Params::new();
        for (k, v) in iter {
            params.insert(k, v);
        }
        params
    }
}

impl<'a> IntoIterator for &'a Params {
    type Item = (&'a str, &'a ParamValue);
    type IntoIter = Box<dyn Iterator<Item = Self::Item> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insertion_order() {
        let params = Params::new().with("b", "2").with("a", 1).with("c", true);
        let names: Vec<_> = params.iter().map(|(k, _)| k).collect();
        assert_eq!(names, ["b", "a", "c"]);
    }

    #[test]
    fn test_reinsert_replaces_in_place() {
        let mut params = Params::new().with("a", "1").with("b", "2");
        let old = params.insert("a", "3");
        assert_eq!(old, Some(ParamValue::Text("1".into())));
        assert_eq!(params.len(), 2);
        let pairs: Vec<_> = params.iter().map(|(k, v)| (k, v.to_string())).collect();
        assert_eq!(pairs, [("a", "3".to_string()), ("b", "2".to_string())]);
    }

    #[test]
    fn test_scalar_conversions() {
        assert_eq!(ParamValue::from(42u32), ParamValue::Text("42".into()));
        assert_eq!(ParamValue::from(-7i64), ParamValue::Text("-7".into()));
        assert_eq!(ParamValue::from(1.5f64), ParamValue::Text("1.5".into()));
        assert_eq!(ParamValue::from(false), ParamValue::Text("false".into()));
    }

    #[test]
    fn test_file_values() {
        let params = Params::new().with_file("upload", "/tmp/a.png");
        let value = params.get("upload").unwrap();
        assert!(value.is_file());
        assert_eq!(value.to_string(), "/tmp/a.png");
    }

    #[test]
    fn test_remove_and_collect() {
        let mut params: Params = [("x", "1"), ("y", "2")].into_iter().collect();
        assert_eq!(params.remove("x"), Some(ParamValue::Text("1".into())));
        assert_eq!(params.remove("x"), None);
        assert_eq!(params.len(), 1);
        assert!(params.get("y").is_some());
    }
}
