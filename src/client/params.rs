use std::fmt::Display;

#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Scalar(String),
    Nested(Vec<(String, String)>),
}

/// Ordered query parameters. Nested values flatten to `key[sub]=value`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params(Vec<(String, ParamValue)>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(mut self, key: impl Into<String>, value: impl Display) -> Self {
        self.0.push((key.into(), ParamValue::Scalar(value.to_string())));
        self
    }

    pub fn insert_opt<V: Display>(self, key: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(value) => self.insert(key, value),
            None => self,
        }
    }

    /// Adds `key[sub]=value` for each present value; nothing when all are absent.
    pub fn nested<V: Display>(
        mut self,
        key: impl Into<String>,
        values: Vec<(&str, Option<V>)>,
    ) -> Self {
        let values: Vec<(String, String)> = values
            .into_iter()
            .filter_map(|(sub, value)| value.map(|value| (sub.to_string(), value.to_string())))
            .collect();

        if !values.is_empty() {
            self.0.push((key.into(), ParamValue::Nested(values)));
        }
        self
    }

    pub fn merge(mut self, other: Params) -> Self {
        self.0.extend(other.0);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();

        for (key, value) in &self.0 {
            match value {
                ParamValue::Scalar(value) => pairs.push((key.clone(), value.clone())),
                ParamValue::Nested(values) => {
                    for (sub, value) in values {
                        pairs.push((format!("{}[{}]", key, sub), value.clone()));
                    }
                }
            }
        }

        pairs
    }
}

/// `limit`/`page` pair shared by every list call; zero counts as unset.
pub fn pagination(limit: Option<u32>, page: Option<u32>) -> Params {
    Params::new()
        .insert_opt("limit", limit.filter(|limit| *limit > 0))
        .insert_opt("page", page.filter(|page| *page > 0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flattens_nested_values_with_brackets() {
        let params = Params::new()
            .nested("date", vec![("start", Some("A")), ("end", Some("B"))])
            .insert("limit", 10);

        assert_eq!(
            params.to_pairs(),
            vec![
                ("date[start]".to_string(), "A".to_string()),
                ("date[end]".to_string(), "B".to_string()),
                ("limit".to_string(), "10".to_string()),
            ]
        );
    }

    #[test]
    fn skips_absent_values() {
        let params = Params::new()
            .insert_opt::<&str>("status", None)
            .nested::<&str>("requestor", vec![("type", None), ("id", None)])
            .nested("date", vec![("start", None), ("end", Some("B"))]);

        assert_eq!(
            params.to_pairs(),
            vec![("date[end]".to_string(), "B".to_string())]
        );
    }

    #[test]
    fn pagination_ignores_zero() {
        assert!(pagination(Some(0), None).is_empty());
        assert_eq!(
            pagination(Some(5), Some(2)).to_pairs(),
            vec![
                ("limit".to_string(), "5".to_string()),
                ("page".to_string(), "2".to_string()),
            ]
        );
    }
}
