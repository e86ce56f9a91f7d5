use issuer_types::{Credential, LoginRequest, LoginResponse, ADMIN_ISSUER, ANONYMOUS_ISSUER};

#[test]
fn default_is_anonymous() {
    let c = Credential::default();
    assert_eq!(c.token, "");
    assert_eq!(c.issuer_id, ANONYMOUS_ISSUER);
    assert_eq!(c, Credential::anonymous());
    assert!(!c.is_logged_in());
    assert!(!c.is_privileged());
}

#[test]
fn logged_in_iff_token_present() {
    assert!(Credential::new("tok", 7).is_logged_in());
    assert!(!Credential::new("", 7).is_logged_in());
}

#[test]
fn privileged_iff_admin_issuer() {
    assert!(Credential::new("tok", ADMIN_ISSUER).is_privileged());
    assert!(!Credential::new("tok", 3).is_privileged());
    assert!(!Credential::new("tok", ANONYMOUS_ISSUER).is_privileged());
}

#[test]
fn persisted_form_uses_issuer_id_key() {
    let json = serde_json::to_value(Credential::new("abc", 12)).unwrap();
    assert_eq!(json, serde_json::json!({"token": "abc", "issuerID": 12}));
}

#[test]
fn persisted_form_roundtrip() {
    let c = Credential::new("abc.def", 0);
    let s = serde_json::to_string(&c).unwrap();
    let back: Credential = serde_json::from_str(&s).unwrap();
    assert_eq!(back, c);
}

#[test]
fn login_request_body_shape() {
    let req = LoginRequest {
        username: "acme",
        password: "hunter2",
    };
    let json = serde_json::to_value(&req).unwrap();
    assert_eq!(
        json,
        serde_json::json!({"username": "acme", "password": "hunter2"})
    );
}

#[test]
fn login_response_converts_to_credential() {
    let res: LoginResponse =
        serde_json::from_str(r#"{"token":"t0k","licenseIssuerID":4}"#).unwrap();
    let c = Credential::from(res);
    assert_eq!(c, Credential::new("t0k", 4));
}

#[test]
fn login_response_requires_issuer() {
    let res = serde_json::from_str::<LoginResponse>(r#"{"token":"t0k"}"#);
    assert!(res.is_err());
}

#[test]
fn debug_output_hides_token() {
    let shown = format!("{:?}", Credential::new("secret-token", 3));
    assert!(!shown.contains("secret-token"), "{shown}");
    assert!(shown.contains("<redacted>"));
    assert!(shown.contains("issuer_id: 3"));

    let res: LoginResponse =
        serde_json::from_str(r#"{"token":"secret-token","licenseIssuerID":4}"#).unwrap();
    assert!(!format!("{res:?}").contains("secret-token"));
}

#[test]
fn debug_output_of_anonymous_has_no_marker() {
    let shown = format!("{:?}", Credential::anonymous());
    assert!(!shown.contains("<redacted>"), "{shown}");
    assert!(shown.contains("issuer_id: -1"));
}
