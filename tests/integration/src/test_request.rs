//! Request-form launch verification tests.

#[cfg(test)]
mod tests {
    use ltistack_core::{LtiErrorKind, VerificationError};
    use ltistack_launch::{LaunchRequest, LtiOauthVerifier, VerificationResult};
    use ltistack_oauth::StaticConsumerSecretProvider;

    use crate::{
        CONSUMER_KEY, CONSUMER_SECRET, LAUNCH_URL, authorization_header, basic_launch,
        form_body, form_request, init_tracing, signed, signed_launch, with_oauth,
    };

    #[test]
    fn test_should_verify_form_post() {
        init_tracing();
        let request = form_request("/launch", &signed_launch("r-1"));

        let result = LtiOauthVerifier::default()
            .verify_request(&request, CONSUMER_SECRET)
            .unwrap();

        let launch = result.launch().expect("launch should verify");
        assert_eq!(launch.user_id(), Some("42"));
        assert_eq!(launch.context_id(), Some("course-7"));
        assert_eq!(launch.get("oauth_consumer_key"), Some(CONSUMER_KEY));
    }

    #[test]
    fn test_should_verify_query_parameters_in_signature() {
        init_tracing();
        let url = "https://tool.example/launch?course=7";
        let params = signed(
            with_oauth(
                basic_launch(),
                "HMAC-SHA1",
                chrono::Utc::now().timestamp(),
                "r-2",
            ),
            "POST",
            url,
            CONSUMER_SECRET,
        );
        let request = form_request("/launch?course=7", &params);

        let result = LtiOauthVerifier::default()
            .verify_request(&request, CONSUMER_SECRET)
            .unwrap();

        assert_eq!(result.launch().unwrap().get("course"), Some("7"));
    }

    #[test]
    fn test_should_verify_authorization_header_launch() {
        init_tracing();
        let params = signed_launch("r-3");
        let (oauth, launch): (Vec<_>, Vec<_>) =
            params.into_iter().partition(|(k, _)| k.starts_with("oauth_"));

        let request = http::Request::builder()
            .method("POST")
            .uri(LAUNCH_URL)
            .header("authorization", authorization_header(&oauth))
            .header("content-type", "application/x-www-form-urlencoded")
            .body(form_body(&launch))
            .unwrap();

        let result = LtiOauthVerifier::default()
            .verify_request(&request, CONSUMER_SECRET)
            .unwrap();

        let verified = result.launch().expect("launch should verify");
        assert_eq!(verified.user_id(), Some("42"));
        assert_eq!(verified.get("oauth_consumer_key"), None);
    }

    #[test]
    fn test_should_report_missing_consumer_key() {
        init_tracing();
        let request = form_request("/launch", &basic_launch());

        let result = LtiOauthVerifier::default()
            .verify_request(&request, CONSUMER_SECRET)
            .unwrap();

        assert_eq!(
            result,
            VerificationResult::failed(
                LtiErrorKind::BadRequest,
                "Unable to find consumer key in message"
            )
        );
    }

    #[test]
    fn test_should_report_bad_signature_without_parameters() {
        init_tracing();
        let request = form_request("/launch", &signed_launch("r-4"));

        let result = LtiOauthVerifier::default()
            .verify_request(&request, "wrong")
            .unwrap();

        assert_eq!(
            result,
            VerificationResult::failed(
                LtiErrorKind::BadRequest,
                "Failed to validate: signature_invalid"
            )
        );
    }

    #[test]
    fn test_should_use_default_scheme_for_relative_uri() {
        init_tracing();
        let params = signed(
            with_oauth(
                basic_launch(),
                "HMAC-SHA1",
                chrono::Utc::now().timestamp(),
                "r-5",
            ),
            "POST",
            "http://tool.example/launch",
            CONSUMER_SECRET,
        );
        let request = form_request("/launch", &params);

        let https = LtiOauthVerifier::default()
            .verify_request(&request, CONSUMER_SECRET)
            .unwrap();
        assert!(!https.is_verified());

        let http = LtiOauthVerifier::default()
            .with_default_scheme("http")
            .verify_request(&request, CONSUMER_SECRET)
            .unwrap();
        assert!(http.is_verified());
    }

    #[test]
    fn test_should_error_when_url_cannot_be_built() {
        init_tracing();
        let request = http::Request::builder()
            .method("POST")
            .uri("/launch")
            .body(form_body(&signed_launch("r-6")))
            .unwrap();

        let result = LtiOauthVerifier::default().verify_request(&request, CONSUMER_SECRET);
        assert!(matches!(result, Err(VerificationError::InvalidUrl(_))));
    }

    #[test]
    fn test_should_verify_request_through_provider() {
        init_tracing();
        let provider = StaticConsumerSecretProvider::new([(
            CONSUMER_KEY.to_owned(),
            CONSUMER_SECRET.to_owned(),
        )]);
        let request = form_request("/launch", &signed_launch("r-7"));

        let result = LtiOauthVerifier::default()
            .verify_request_with_provider(&request, &provider)
            .unwrap();
        assert!(result.is_verified());
    }

    #[test]
    fn test_should_verify_extracted_launch_request() {
        init_tracing();
        let request = LaunchRequest::new("POST", LAUNCH_URL, signed_launch("r-8"));

        let result = LtiOauthVerifier::default().verify_launch_request(&request, CONSUMER_SECRET);
        assert!(result.is_verified());
    }
}
