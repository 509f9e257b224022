//! Parameter-form launch verification tests.

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use ltistack_core::{LtiConfig, LtiErrorKind};
    use ltistack_launch::{LtiOauthVerifier, LtiVerifier, VerificationResult};
    use ltistack_oauth::StaticConsumerSecretProvider;

    use crate::{
        CONSUMER_KEY, CONSUMER_SECRET, LAUNCH_URL, basic_launch, init_tracing, signed,
        signed_launch, with_oauth,
    };

    fn now() -> i64 {
        chrono::Utc::now().timestamp()
    }

    #[test]
    fn test_should_verify_signed_launch() {
        init_tracing();
        let params = signed_launch("p-1");
        let expected: BTreeMap<String, String> = params.iter().cloned().collect();

        let result = LtiOauthVerifier::default()
            .verify_parameters(params, LAUNCH_URL, "POST", CONSUMER_SECRET)
            .unwrap();

        let launch = result.into_launch().expect("launch should verify");
        assert_eq!(launch.user_id(), Some("42"));
        assert_eq!(launch.roles(), vec!["Learner"]);
        assert_eq!(launch.custom_parameters().get("chapter"), Some(&"3"));
        assert_eq!(launch.into_parameters(), expected);
    }

    #[test]
    fn test_should_verify_through_generic_verifier() {
        fn verify(verifier: &impl LtiVerifier) -> VerificationResult {
            verifier
                .verify_parameters(signed_launch("p-2"), LAUNCH_URL, "POST", CONSUMER_SECRET)
                .unwrap()
        }

        init_tracing();
        assert!(verify(&LtiOauthVerifier::default()).is_verified());
    }

    #[test]
    fn test_should_verify_every_supported_signature_method() {
        init_tracing();
        for method in ["HMAC-SHA1", "HMAC-SHA256", "PLAINTEXT"] {
            let params = signed(
                with_oauth(basic_launch(), method, now(), "p-3"),
                "POST",
                LAUNCH_URL,
                CONSUMER_SECRET,
            );
            let result = LtiOauthVerifier::default()
                .verify_parameters(params, LAUNCH_URL, "POST", CONSUMER_SECRET)
                .unwrap();
            assert!(result.is_verified(), "{method} should verify: {result:?}");
        }
    }

    #[test]
    fn test_should_reject_rsa_sha1() {
        init_tracing();
        let mut params = with_oauth(basic_launch(), "RSA-SHA1", now(), "p-4");
        params.push(("oauth_signature".to_owned(), "c2lnbmF0dXJl".to_owned()));

        let result = LtiOauthVerifier::default()
            .verify_parameters(params, LAUNCH_URL, "POST", CONSUMER_SECRET)
            .unwrap();

        assert_eq!(result.error_kind(), Some(LtiErrorKind::BadRequest));
        assert!(
            result
                .message()
                .unwrap()
                .starts_with("Failed to validate: signature_method_rejected: RSA-SHA1")
        );
    }

    #[test]
    fn test_should_reject_tampered_parameter() {
        init_tracing();
        let mut params = signed_launch("p-5");
        for (name, value) in &mut params {
            if name == "user_id" {
                *value = "43".to_owned();
            }
        }

        let result = LtiOauthVerifier::default()
            .verify_parameters(params, LAUNCH_URL, "POST", CONSUMER_SECRET)
            .unwrap();

        let message = result.message().unwrap();
        assert!(message.starts_with("Failed to validate: signature_invalid, Parameters: ["));
        assert!(message.contains("user_id=43"));
    }

    #[test]
    fn test_should_reject_other_url_or_method() {
        init_tracing();
        let verifier = LtiOauthVerifier::default();

        let other_url = verifier
            .verify_parameters(
                signed_launch("p-6"),
                "https://tool.example/other",
                "POST",
                CONSUMER_SECRET,
            )
            .unwrap();
        assert_eq!(other_url.error_kind(), Some(LtiErrorKind::BadRequest));

        let other_method = verifier
            .verify_parameters(signed_launch("p-7"), LAUNCH_URL, "GET", CONSUMER_SECRET)
            .unwrap();
        assert_eq!(other_method.error_kind(), Some(LtiErrorKind::BadRequest));
    }

    #[test]
    fn test_should_normalize_url_case_and_default_port() {
        init_tracing();
        let result = LtiOauthVerifier::default()
            .verify_parameters(
                signed_launch("p-8"),
                "HTTPS://Tool.Example:443/launch",
                "post",
                CONSUMER_SECRET,
            )
            .unwrap();
        assert!(result.is_verified());
    }

    #[test]
    fn test_should_refuse_stale_timestamp() {
        init_tracing();
        let params = signed(
            with_oauth(basic_launch(), "HMAC-SHA1", now() - 3600, "p-9"),
            "POST",
            LAUNCH_URL,
            CONSUMER_SECRET,
        );

        let verifier = LtiOauthVerifier::default();
        let result = verifier
            .verify_parameters(params.clone(), LAUNCH_URL, "POST", CONSUMER_SECRET)
            .unwrap();
        assert!(
            result
                .message()
                .unwrap()
                .starts_with("Failed to validate: timestamp_refused")
        );

        let lenient = LtiOauthVerifier::from_config(&LtiConfig {
            timestamp_window_secs: 0,
            ..LtiConfig::default()
        });
        let result = lenient
            .verify_parameters(params, LAUNCH_URL, "POST", CONSUMER_SECRET)
            .unwrap();
        assert!(result.is_verified());
    }

    #[test]
    fn test_should_reject_replayed_nonce_when_enabled() {
        init_tracing();
        let verifier = LtiOauthVerifier::from_config(&LtiConfig {
            nonce_check: true,
            ..LtiConfig::default()
        });
        let params = signed_launch("p-10");

        let first = verifier
            .verify_parameters(params.clone(), LAUNCH_URL, "POST", CONSUMER_SECRET)
            .unwrap();
        assert!(first.is_verified());

        let replay = verifier
            .verify_parameters(params, LAUNCH_URL, "POST", CONSUMER_SECRET)
            .unwrap();
        assert!(
            replay
                .message()
                .unwrap()
                .starts_with("Failed to validate: nonce_used: p-10")
        );
    }

    #[test]
    fn test_should_allow_replay_by_default() {
        init_tracing();
        let verifier = LtiOauthVerifier::default();
        let params = signed_launch("p-11");
        for _ in 0..2 {
            let result = verifier
                .verify_parameters(params.clone(), LAUNCH_URL, "POST", CONSUMER_SECRET)
                .unwrap();
            assert!(result.is_verified());
        }
    }

    #[test]
    fn test_should_report_missing_protocol_parameters() {
        init_tracing();
        let result = LtiOauthVerifier::default()
            .verify_parameters(
                [("oauth_consumer_key", CONSUMER_KEY), ("user_id", "42")],
                LAUNCH_URL,
                "POST",
                CONSUMER_SECRET,
            )
            .unwrap();
        assert!(
            result
                .message()
                .unwrap()
                .starts_with("Failed to validate: parameter_absent: ")
        );
    }

    #[test]
    fn test_should_report_missing_key_with_parameters() {
        init_tracing();
        let result = LtiOauthVerifier::default()
            .verify_parameters(
                [("user_id", "42"), ("roles", "Learner")],
                LAUNCH_URL,
                "POST",
                CONSUMER_SECRET,
            )
            .unwrap();
        assert_eq!(
            result,
            VerificationResult::failed(
                LtiErrorKind::BadRequest,
                "No key found in LTI request with parameters: [user_id=42, roles=Learner]"
            )
        );
    }

    #[test]
    fn test_should_look_up_secret_by_consumer_key() {
        init_tracing();
        let provider = StaticConsumerSecretProvider::new([
            (CONSUMER_KEY.to_owned(), CONSUMER_SECRET.to_owned()),
            ("other".to_owned(), "nope".to_owned()),
        ]);
        let verifier = LtiOauthVerifier::default();

        let result = verifier
            .verify_parameters_with_provider(signed_launch("p-12"), LAUNCH_URL, "POST", &provider)
            .unwrap();
        assert!(result.is_verified());

        let unknown = StaticConsumerSecretProvider::default();
        let result = verifier
            .verify_parameters_with_provider(signed_launch("p-13"), LAUNCH_URL, "POST", &unknown)
            .unwrap();
        assert_eq!(result.error_kind(), Some(LtiErrorKind::UnknownConsumer));
    }
}
