use std::fmt;

/// Required fields that were absent or empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingFields(Vec<&'static str>);

impl MissingFields {
    #[cfg(test)]
    pub fn names(&self) -> &[&'static str] {
        &self.0
    }
}

impl fmt::Display for MissingFields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "missing required parameters: [{}]", self.0.join(" "))
    }
}

impl std::error::Error for MissingFields {}

/// Check every `(name, value)` pair and collect the names whose value is
/// absent, empty or whitespace-only.
///
/// All missing fields are reported together rather than failing on the
/// first one.
pub fn validate_required<'a>(
    fields: impl IntoIterator<Item = (&'static str, Option<&'a str>)>,
) -> Result<(), MissingFields> {
    let missing: Vec<&'static str> = fields
        .into_iter()
        .filter(|(_, value)| value.is_none_or(|v| v.trim().is_empty()))
        .map(|(name, _)| name)
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(MissingFields(missing))
    }
}
