use serde::{Deserialize, Deserializer};

/// A JSON field that may be absent, explicitly `null`, or set.
#[derive(Debug, Clone, PartialEq)]
pub enum DoubleOption<T> {
    NotProvided,
    Null,
    Some(T),
}

impl<T> Default for DoubleOption<T> {
    fn default() -> Self {
        DoubleOption::NotProvided
    }
}

impl<T> DoubleOption<T> {
    /// `None` => leave unchanged, `Some(None)` => clear, `Some(Some(v))` => set.
    pub fn into_patch(self) -> Option<Option<T>> {
        match self {
            DoubleOption::NotProvided => None,
            DoubleOption::Null => Some(None),
            DoubleOption::Some(v) => Some(Some(v)),
        }
    }
}

/// Use with `#[serde(default, deserialize_with = "deserialize_double_option")]`.
pub fn deserialize_double_option<'de, D, T>(deserializer: D) -> Result<DoubleOption<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(|opt| match opt {
        None => DoubleOption::Null,
        Some(value) => DoubleOption::Some(value),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Body {
        #[serde(default, deserialize_with = "deserialize_double_option")]
        team_id: DoubleOption<u32>,
    }

    #[test]
    fn distinguishes_absent_null_and_value() {
        let absent: Body = serde_json::from_str("{}").unwrap();
        assert_eq!(absent.team_id.into_patch(), None);
        let null: Body = serde_json::from_str(r#"{"team_id": null}"#).unwrap();
        assert_eq!(null.team_id.into_patch(), Some(None));
        let set: Body = serde_json::from_str(r#"{"team_id": 7}"#).unwrap();
        assert_eq!(set.team_id.into_patch(), Some(Some(7)));
    }
}
