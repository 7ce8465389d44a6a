use api_contract::ApiResponse;

#[test]
fn api_response_success() {
    let response = ApiResponse::success("ok");
    assert!(response.success);
    assert!(response.data.is_some());
    assert!(response.error.is_none());
}

#[test]
fn api_response_error() {
    let response = ApiResponse::<()>::error("RESOURCE.NOT_FOUND", "not found");
    assert!(!response.success);
    assert!(response.data.is_none());
    let error = response.error.expect("error");
    assert_eq!(error.code, "RESOURCE.NOT_FOUND");
}

#[test]
fn api_response_serializes_envelope() {
    let value = serde_json::to_value(ApiResponse::success(3)).expect("serialize");
    assert_eq!(value["success"], serde_json::Value::Bool(true));
    assert_eq!(value["data"], serde_json::Value::from(3));
    assert!(value["error"].is_null());
}
