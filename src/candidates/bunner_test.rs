use super::*;
use crate::handler::{CountingHandler, HELLO_BODY};
use crate::request::RequestSpec;

const DEFAULT_HEADERS: [&str; 3] = ["Accept", "Content-Type", "X-Requested-With"];

fn config(origins: &[&str], credentialed: bool) -> OriginConfig {
    OriginConfig::new(origins.iter().copied(), credentialed, DEFAULT_HEADERS)
        .expect("non-empty origins")
}

fn serve(origins: &[&str], spec: RequestSpec) -> (u64, ResponseRecorder) {
    let counter = CountingHandler::new();
    let handler = BunnerCandidate
        .middleware(&config(origins, false))
        .expect("valid configuration")
        .wrap(counter.clone());
    let request = spec.build().expect("valid request");

    let mut recorder = ResponseRecorder::new();
    handler.serve(&mut recorder, &request);
    (counter.calls(), recorder)
}

fn allow_origin(recorder: &ResponseRecorder) -> Option<&str> {
    recorder
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .and_then(|value| value.to_str().ok())
}

mod build_cors {
    use super::*;

    #[test]
    fn when_star_is_credentialed_should_reject_before_building() {
        let result = build_cors(&config(&["*"], true));

        assert!(matches!(result, Err(CandidateError::CredentialedWildcard)));
    }

    #[test]
    fn when_origins_mix_exact_and_wildcard_entries_should_build() {
        let result = build_cors(&config(
            &["https://*.example.net", "https://example.net:8080"],
            false,
        ));

        assert!(result.is_ok());
    }
}

mod simple_request {
    use super::*;

    #[test]
    fn when_origin_is_listed_should_reach_handler_and_allow_origin() {
        // Arrange & Act
        let (calls, recorder) = serve(
            &["https://example.com"],
            RequestSpec::actual("https://example.com"),
        );

        // Assert
        assert_eq!(calls, 1);
        assert_eq!(recorder.status(), StatusCode::OK);
        assert_eq!(recorder.body(), HELLO_BODY);
        assert_eq!(allow_origin(&recorder), Some("https://example.com"));
    }

    #[test]
    fn when_origin_matches_wildcard_should_echo_request_origin() {
        let (calls, recorder) = serve(
            &["https://*.example.com"],
            RequestSpec::actual("https://api.example.com"),
        );

        assert_eq!(calls, 1);
        assert_eq!(allow_origin(&recorder), Some("https://api.example.com"));
    }

    #[test]
    fn when_origin_is_unlisted_should_answer_forbidden_without_handler() {
        // Arrange & Act
        let (calls, recorder) = serve(
            &["https://example.com"],
            RequestSpec::actual("https://evil.example.org"),
        );

        // Assert
        assert_eq!(calls, 0);
        assert_eq!(recorder.status(), StatusCode::FORBIDDEN);
        assert_eq!(allow_origin(&recorder), None);
    }
}

mod preflight {
    use super::*;

    #[test]
    fn when_origin_and_headers_are_allowed_should_answer_no_content() {
        // Arrange & Act
        let (calls, recorder) = serve(
            &["https://example.com"],
            RequestSpec::preflight("https://example.com").request_headers(["content-type"]),
        );

        // Assert
        assert_eq!(calls, 0);
        assert_eq!(recorder.status(), StatusCode::NO_CONTENT);
        assert_eq!(allow_origin(&recorder), Some("https://example.com"));
    }

    #[test]
    fn when_header_is_not_allowed_should_answer_forbidden() {
        let (calls, recorder) = serve(
            &["*"],
            RequestSpec::preflight("https://example.com").request_headers(["content-length"]),
        );

        assert_eq!(calls, 0);
        assert_eq!(recorder.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn when_origin_is_unlisted_should_answer_forbidden_without_allow_origin() {
        let (calls, recorder) = serve(
            &["https://example.com"],
            RequestSpec::preflight("https://evil.example.org"),
        );

        assert_eq!(calls, 0);
        assert_eq!(recorder.status(), StatusCode::FORBIDDEN);
        assert_eq!(allow_origin(&recorder), None);
    }

    #[test]
    fn when_request_headers_repeat_should_evaluate_first_line_only() {
        // Arrange & Act
        let (_, recorder) = serve(
            &["*"],
            RequestSpec::preflight("https://example.com")
                .request_headers(["accept", "content-length"]),
        );

        // Assert
        assert_eq!(recorder.status(), StatusCode::NO_CONTENT);
    }
}
