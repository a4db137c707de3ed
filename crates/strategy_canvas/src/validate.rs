use std::collections::BTreeMap;

use serde::ser::{Serialize, SerializeMap, Serializer};

pub const COMPANY_NAME_REQUIRED: &str = "Company Name is required";
pub const COMPETITOR_NAME_REQUIRED: &str = "Competitor Name is required";
pub const FEATURE_NAME_REQUIRED: &str = "Feature Name is required";

/// Identifies one text field of the entry form.
///
/// Renders as `companyName`, `competitor{i}` or `feature{i}`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldKey {
    CompanyName,
    Competitor(usize),
    Feature(usize),
}

impl std::fmt::Display for FieldKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CompanyName => write!(f, "companyName"),
            Self::Competitor(i) => write!(f, "competitor{i}"),
            Self::Feature(i) => write!(f, "feature{i}"),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    fields: BTreeMap<FieldKey, String>,
}

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn get(&self, key: FieldKey) -> Option<&str> {
        self.fields.get(&key).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (FieldKey, &str)> {
        self.fields.iter().map(|(k, v)| (*k, v.as_str()))
    }

    pub fn insert(&mut self, key: FieldKey, message: impl Into<String>) {
        self.fields.insert(key, message.into());
    }

    pub fn clear_field(&mut self, key: FieldKey) {
        self.fields.remove(&key);
    }

    pub fn clear(&mut self) {
        self.fields.clear();
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (key, message) in &self.fields {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{key}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

impl Serialize for ValidationErrors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (key, message) in &self.fields {
            map.serialize_entry(&key.to_string(), message)?;
        }
        map.end()
    }
}

pub(crate) fn is_blank(name: &str) -> bool {
    name.trim().is_empty()
}

/// Checks that the company name and every competitor and feature name is filled in.
pub fn validate<C, F>(company_name: &str, competitor_names: &[C], feature_names: &[F]) -> ValidationErrors
where
    C: AsRef<str>,
    F: AsRef<str>,
{
    let mut errors = ValidationErrors::default();
    if is_blank(company_name) {
        errors.insert(FieldKey::CompanyName, COMPANY_NAME_REQUIRED);
    }
    for (i, name) in competitor_names.iter().enumerate() {
        if is_blank(name.as_ref()) {
            errors.insert(FieldKey::Competitor(i), COMPETITOR_NAME_REQUIRED);
        }
    }
    for (i, name) in feature_names.iter().enumerate() {
        if is_blank(name.as_ref()) {
            errors.insert(FieldKey::Feature(i), FEATURE_NAME_REQUIRED);
        }
    }
    errors
}
