//! Outcome classification.
//!
//! Callers want three answers, not two: the resource is there, the resource
//! legitimately is not there, or something went wrong. `classify` maps a
//! `DispatchOutcome` onto `Result<Option<T>, ApiError>` so that "not found"
//! stays `Ok(None)` and never turns into an error.

use super::dispatch::DispatchOutcome;
use super::error::ApiError;

pub fn classify<T>(outcome: DispatchOutcome<T>) -> Result<Option<T>, ApiError> {
    match outcome {
        DispatchOutcome::Success(value) => Ok(Some(value)),
        DispatchOutcome::NotFound => Ok(None),
        DispatchOutcome::Transport(e) => Err(ApiError::Transport(e)),
        DispatchOutcome::Decode(e) => Err(ApiError::Decode(e)),
    }
}

/// Same split for callers that only care whether the call landed.
pub fn presence<T>(outcome: DispatchOutcome<T>) -> Result<bool, ApiError> {
    classify(outcome).map(|v| v.is_some())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::error::TransportError;

    fn decode_error() -> serde_json::Error {
        serde_json::from_str::<u32>("\"x\"").unwrap_err()
    }

    #[test]
    fn success_is_found() {
        assert_eq!(classify(DispatchOutcome::Success(3)).unwrap(), Some(3));
    }

    #[test]
    fn not_found_is_not_an_error() {
        let r = classify::<u32>(DispatchOutcome::NotFound);
        assert!(matches!(r, Ok(None)));
        assert!(!presence::<u32>(DispatchOutcome::NotFound).unwrap());
    }

    #[test]
    fn transport_failure_is_an_error() {
        let r = classify::<u32>(DispatchOutcome::Transport(TransportError::Status {
            status: 502,
            body: "bad gateway".into(),
        }));
        let err = r.unwrap_err();
        assert!(err.to_string().contains("502"));
    }

    #[test]
    fn decode_failure_is_an_error() {
        let r = presence::<u32>(DispatchOutcome::Decode(decode_error()));
        assert!(matches!(r, Err(ApiError::Decode(_))));
    }
}
