use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Server-assigned identifier of the uploaded dataset
///
/// Opaque to the client: it is only ever echoed back to the server.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Column metadata derived from an upload
///
/// `numeric` is the ordered subset of `all` whose declared dtype names an
/// integer or float kind.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ColumnSet {
    all: Vec<String>,
    numeric: Vec<String>,
}

impl ColumnSet {
    pub fn derive(columns: Vec<String>, dtypes: &HashMap<String, String>) -> Self {
        let numeric = columns
            .iter()
            .filter(|c| dtypes.get(*c).is_some_and(|dtype| is_numeric_dtype(dtype)))
            .cloned()
            .collect();
        Self {
            all: columns,
            numeric,
        }
    }

    pub fn all(&self) -> &[String] {
        &self.all
    }

    pub fn numeric(&self) -> &[String] {
        &self.numeric
    }

    pub fn is_numeric(&self, column: &str) -> bool {
        self.numeric.iter().any(|c| c == column)
    }
}

/// True when a dtype string denotes an integer or floating-point column
pub fn is_numeric_dtype(dtype: &str) -> bool {
    dtype.contains("int") || dtype.contains("float")
}

/// An accepted upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    id: SessionId,
    columns: ColumnSet,
}

impl Session {
    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn columns(&self) -> &ColumnSet {
        &self.columns
    }
}

/// Application state shared by the flows
///
/// `set_session` is the only mutator. A session and its column set are
/// stored together, so one exists exactly when the other does. There is no
/// way to clear a session; a fresh process is the only reset.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    session: Option<Session>,
    /// Bumped on every `set_session`; lets in-flight work detect that the
    /// session it was started for has been replaced.
    epoch: u64,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace any prior session in one assignment
    pub fn set_session(
        &mut self,
        id: impl Into<String>,
        columns: Vec<String>,
        dtypes: &HashMap<String, String>,
    ) -> &Session {
        let session = Session {
            id: SessionId::new(id),
            columns: ColumnSet::derive(columns, dtypes),
        };
        self.epoch += 1;
        self.session.insert(session)
    }

    pub fn has_session(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn session_id(&self) -> Option<&SessionId> {
        self.session.as_ref().map(Session::id)
    }

    pub fn columns(&self) -> Option<&ColumnSet> {
        self.session.as_ref().map(Session::columns)
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn dtypes(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(c, t)| (c.to_string(), t.to_string()))
            .collect()
    }

    fn names(cols: &[&str]) -> Vec<String> {
        cols.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_numeric_columns_follow_dtype() {
        let set = ColumnSet::derive(
            names(&["A", "B"]),
            &dtypes(&[("A", "int64"), ("B", "object")]),
        );
        assert_eq!(set.numeric(), &["A".to_string()]);
        assert_eq!(set.all(), &names(&["A", "B"])[..]);
    }

    #[test]
    fn test_numeric_order_preserved() {
        let set = ColumnSet::derive(
            names(&["z", "name", "a", "when", "m"]),
            &dtypes(&[
                ("z", "float64"),
                ("name", "object"),
                ("a", "int32"),
                ("when", "datetime64[ns]"),
                ("m", "uint8"),
            ]),
        );
        assert_eq!(set.numeric(), &names(&["z", "a", "m"])[..]);
        assert!(set.is_numeric("a"));
        assert!(!set.is_numeric("name"));
    }

    #[test]
    fn test_column_without_dtype_is_not_numeric() {
        let set = ColumnSet::derive(names(&["A", "B"]), &dtypes(&[("A", "float32")]));
        assert_eq!(set.numeric(), &["A".to_string()]);
    }

    #[test]
    fn test_state_starts_empty() {
        let state = AppState::new();
        assert!(!state.has_session());
        assert!(state.columns().is_none());
        assert_eq!(state.epoch(), 0);
    }

    #[test]
    fn test_set_session_replaces_prior() {
        let mut state = AppState::new();
        state.set_session("s1", names(&["A"]), &dtypes(&[("A", "int64")]));
        assert_eq!(state.session_id().unwrap().as_str(), "s1");
        assert_eq!(state.epoch(), 1);

        state.set_session("s2", names(&["B"]), &dtypes(&[("B", "object")]));
        assert_eq!(state.session_id().unwrap().as_str(), "s2");
        assert_eq!(state.columns().unwrap().all(), &["B".to_string()]);
        assert!(state.columns().unwrap().numeric().is_empty());
        assert_eq!(state.epoch(), 2);
    }
}
