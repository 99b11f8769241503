//! Query parameters for the catalog event feed

use crate::models::Checkpoint;

/// Name of the event type filter parameter
pub const TYPE_PARAM: &str = "type";

/// Name of the lower bound parameter
pub const SINCE_PARAM: &str = "since";

/// Parameters used to expand the advertised event link
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchParameters {
    pairs: Vec<(String, String)>,
}

impl FetchParameters {
    /// Build the parameters for the next fetch
    ///
    /// `type` is always present. `since` is only sent once a checkpoint
    /// exists; without it the catalog returns its full history.
    pub fn new(event_type: &str, checkpoint: Option<&Checkpoint>) -> Self {
        let mut pairs = vec![(TYPE_PARAM.to_string(), event_type.to_string())];
        if let Some(checkpoint) = checkpoint {
            pairs.push((SINCE_PARAM.to_string(), checkpoint.since()));
        }
        Self { pairs }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn as_pairs(&self) -> &[(String, String)] {
        &self.pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_without_checkpoint_omits_since() {
        let params = FetchParameters::new("productAdded", None);
        assert_eq!(params.get(TYPE_PARAM), Some("productAdded"));
        assert_eq!(params.get(SINCE_PARAM), None);
        assert_eq!(params.as_pairs().len(), 1);
    }

    #[test]
    fn test_with_checkpoint_includes_since() {
        let checkpoint = Checkpoint::new(
            NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
        );
        let params = FetchParameters::new("productAdded", Some(&checkpoint));

        assert_eq!(params.get(TYPE_PARAM), Some("productAdded"));
        assert_eq!(params.get(SINCE_PARAM), Some("2024-01-01T00:00:00"));
    }
}
