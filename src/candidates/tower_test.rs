use super::*;
use crate::constants::header;
use crate::handler::{CountingHandler, HELLO_BODY};
use crate::request::RequestSpec;
use http::StatusCode;

const DEFAULT_HEADERS: [&str; 3] = ["Accept", "Content-Type", "X-Requested-With"];

fn config(origins: &[&str], credentialed: bool) -> OriginConfig {
    OriginConfig::new(origins.iter().copied(), credentialed, DEFAULT_HEADERS)
        .expect("non-empty origins")
}

fn serve(origins: &[&str], spec: RequestSpec) -> (u64, ResponseRecorder) {
    let counter = CountingHandler::new();
    let handler = TowerCandidate
        .middleware(&config(origins, false))
        .expect("valid configuration")
        .wrap(counter.clone());
    let request = spec.build().expect("valid request");

    let mut recorder = ResponseRecorder::new();
    handler.serve(&mut recorder, &request);
    (counter.calls(), recorder)
}

fn header_str<'a>(recorder: &'a ResponseRecorder, name: &str) -> Option<&'a str> {
    recorder
        .headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
}

mod build_layer {
    use super::*;

    #[test]
    fn when_star_is_credentialed_should_reject_instead_of_panicking() {
        let result = build_layer(&config(&["*"], true));

        assert!(matches!(result, Err(CandidateError::CredentialedWildcard)));
    }

    #[test]
    fn when_request_header_name_is_invalid_should_reject() {
        // Arrange
        let config = OriginConfig::new(["https://example.com"], false, ["bad header"])
            .expect("non-empty origins");

        // Act
        let result = build_layer(&config);

        // Assert
        assert!(matches!(
            result,
            Err(CandidateError::InvalidHeaderName(name)) if name == "bad header"
        ));
    }

    #[test]
    fn when_exact_origin_is_not_a_header_value_should_reject() {
        let result = build_layer(&config(&["https://example.com\n"], false));

        assert!(matches!(result, Err(CandidateError::InvalidOrigin { .. })));
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
        assert_eq!(
            header_str(&recorder, header::ACCESS_CONTROL_ALLOW_ORIGIN),
            Some("https://example.com")
        );
    }

    #[test]
    fn when_origin_is_unlisted_should_still_reach_handler_without_allow_origin() {
        let (calls, recorder) = serve(
            &["https://example.com"],
            RequestSpec::actual("https://evil.example.org"),
        );

        assert_eq!(calls, 1);
        assert_eq!(recorder.body(), HELLO_BODY);
        assert_eq!(header_str(&recorder, header::ACCESS_CONTROL_ALLOW_ORIGIN), None);
    }

    #[test]
    fn when_origin_matches_wildcard_entry_should_echo_request_origin() {
        let (_, recorder) = serve(
            &["https://*.example.com", "https://example.org"],
            RequestSpec::actual("https://API.example.com"),
        );

        assert_eq!(
            header_str(&recorder, header::ACCESS_CONTROL_ALLOW_ORIGIN),
            Some("https://API.example.com")
        );
    }

    #[test]
    fn when_origin_only_shares_wildcard_suffix_should_not_allow() {
        let (_, recorder) = serve(
            &["https://*.example.com", "https://example.org"],
            RequestSpec::actual("https://example.com"),
        );

        assert_eq!(header_str(&recorder, header::ACCESS_CONTROL_ALLOW_ORIGIN), None);
    }
}

mod preflight {
    use super::*;

    #[test]
    fn when_origin_is_listed_should_answer_without_handler() {
        // Arrange & Act
        let (calls, recorder) = serve(
            &["https://example.com"],
            RequestSpec::preflight("https://example.com").request_headers(["content-type"]),
        );

        // Assert
        assert_eq!(calls, 0);
        assert_eq!(recorder.status(), StatusCode::OK);
        assert!(recorder.body().is_empty());
        assert_eq!(
            header_str(&recorder, header::ACCESS_CONTROL_ALLOW_ORIGIN),
            Some("https://example.com")
        );
        let methods = header_str(&recorder, header::ACCESS_CONTROL_ALLOW_METHODS)
            .expect("allow-methods header");
        assert!(methods.contains("GET"));
    }

    #[test]
    fn when_answered_should_vary_on_origin_and_request_headers() {
        // Arrange & Act
        let (_, recorder) = serve(&["*"], RequestSpec::preflight("https://example.com"));

        // Assert
        let vary: Vec<String> = recorder
            .headers()
            .get_all(header::VARY)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|value| value.split(','))
            .map(|part| part.trim().to_ascii_lowercase())
            .collect();
        assert!(vary.iter().any(|part| part == header::ORIGIN));
        assert!(vary.iter().any(|part| part == header::ACCESS_CONTROL_REQUEST_METHOD));
        assert!(vary.iter().any(|part| part == header::ACCESS_CONTROL_REQUEST_HEADERS));
        assert_eq!(header_str(&recorder, header::ACCESS_CONTROL_ALLOW_ORIGIN), Some("*"));
    }
}

mod call_ready {
    use super::*;

    struct NeverReady;

    impl Service<Request<()>> for NeverReady {
        type Response = ();
        type Error = Infallible;
        type Future = Ready<Result<(), Infallible>>;

        fn poll_ready(&mut self, _: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
            Poll::Pending
        }

        fn call(&mut self, _: Request<()>) -> Self::Future {
            future::ready(Ok(()))
        }
    }

    #[test]
    fn when_inner_service_is_ready_should_return_its_response() {
        // Arrange
        let service = Terminal {
            next: CountingHandler::new(),
        };

        // Act
        let response = call_ready(service, Request::new(()));

        // Assert
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.body().as_slice(), HELLO_BODY);
    }

    #[test]
    #[should_panic(expected = "was not ready")]
    fn when_service_is_pending_should_panic() {
        call_ready(NeverReady, Request::new(()));
    }
}
