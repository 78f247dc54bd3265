use tokenlens::{Result, TokenLensError};

#[test]
fn model_load_display_names_model_and_upstream_error() {
    let err = TokenLensError::model_load("bert-base-uncased", "connection refused");
    assert_eq!(
        err.to_string(),
        "Failed to load model bert-base-uncased: connection refused"
    );
}

#[test]
fn tokenizer_errors_pass_message_through() {
    assert_eq!(
        TokenLensError::Decode("Invalid token id".into()).to_string(),
        "Invalid token id"
    );
    assert_eq!(
        TokenLensError::Encode("sequence too long".into()).to_string(),
        "sequence too long"
    );
}

#[test]
fn result_alias() {
    fn returns_error() -> Result<()> {
        Err(TokenLensError::Internal("worker died".into()))
    }
    assert!(returns_error().is_err());
}

#[test]
fn json_errors_convert() {
    let parse: std::result::Result<serde_json::Value, _> = serde_json::from_str("{");
    let err: TokenLensError = parse.unwrap_err().into();
    assert!(err.to_string().starts_with("JSON error"));
}

// ============================================================================
// Client/server error classification
// ============================================================================

#[test]
fn client_errors() {
    assert!(TokenLensError::model_load("x", "y").is_client_error());
    assert!(TokenLensError::InvalidInput("x".into()).is_client_error());
}

#[test]
fn server_errors() {
    assert!(!TokenLensError::Decode("x".into()).is_client_error());
    assert!(!TokenLensError::Encode("x".into()).is_client_error());
    assert!(!TokenLensError::Configuration("x".into()).is_client_error());
    assert!(!TokenLensError::Internal("x".into()).is_client_error());
}
