use serde::{Deserialize, Serialize};

/// Caller-supplied switches for one biography generation.
///
/// Deserializes from partial JSON; absent fields default to `false`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BiographyOptions {
    /// Keep events where the subject is only a Witness or Informant.
    pub include_witness_events: bool,
    /// List witnesses under Primary births and Family marriages.
    pub include_witnesses: bool,
    /// Render the notes section and citation notes.
    pub include_notes: bool,
}

#[cfg(test)]
mod tests {
    use super::BiographyOptions;

    #[test]
    fn partial_json_fills_defaults() {
        let options: BiographyOptions =
            serde_json::from_str(r#"{"include_notes": true}"#).expect("valid options json");
        assert!(options.include_notes);
        assert!(!options.include_witnesses);
        assert!(!options.include_witness_events);
    }
}
