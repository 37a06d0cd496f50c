use serde_json::{Map, Value};
use std::time::Duration;

use crate::error::PricingError;

pub(crate) const LITELLM_PRICING_URL: &str =
    "https://raw.githubusercontent.com/BerriAI/litellm/main/model_prices_and_context_window.json";

/// Source of the raw pricing catalog.
pub(crate) trait CatalogFetcher {
    fn fetch(&self) -> Result<Map<String, Value>, PricingError>;
}

/// Single GET against the catalog URL, bounded by a global timeout.
pub(crate) struct HttpFetcher {
    agent: ureq::Agent,
    url: String,
    user_agent: String,
}

impl HttpFetcher {
    pub(crate) fn new(url: impl Into<String>, user_agent: impl Into<String>, timeout: Duration) -> Self {
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .build()
            .into();
        Self {
            agent,
            url: url.into(),
            user_agent: user_agent.into(),
        }
    }
}

impl CatalogFetcher for HttpFetcher {
    fn fetch(&self) -> Result<Map<String, Value>, PricingError> {
        // Non-2xx statuses surface as `ureq::Error::StatusCode`.
        let response = self
            .agent
            .get(&self.url)
            .header("User-Agent", self.user_agent.as_str())
            .call()?;
        let mut body = response.into_body();
        let payload: Value = serde_json::from_reader(body.as_reader())?;
        catalog_object(payload)
    }
}

/// Accept only a JSON object as the catalog payload.
pub(crate) fn catalog_object(payload: Value) -> Result<Map<String, Value>, PricingError> {
    let kind = match payload {
        Value::Object(map) => return Ok(map),
        Value::Null => "null",
        Value::Array(_) => "array",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
    };
    Err(PricingError::MalformedPayload { kind })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::{PricingConfig, PricingLoader, PricingSource};
    use serde_json::json;
    use std::io::{BufRead, BufReader, Write};
    use std::net::TcpListener;
    use std::thread;
    use std::time::Instant;

    /// Serve one connection on a local port with a canned response.
    /// `None` accepts the request and then stalls past any test timeout.
    fn serve_once(response: Option<String>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/prices.json", listener.local_addr().unwrap());
        thread::spawn(move || {
            let Ok((mut stream, _)) = listener.accept() else {
                return;
            };
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut line = String::new();
            while reader.read_line(&mut line).is_ok_and(|n| n > 0) {
                if line == "\r\n" {
                    break;
                }
                line.clear();
            }
            match response {
                Some(response) => {
                    let _ = stream.write_all(response.as_bytes());
                }
                None => thread::sleep(Duration::from_secs(3)),
            }
        });
        url
    }

    fn http_response(status: &str, body: &str) -> Option<String> {
        Some(format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        ))
    }

    fn fetcher(url: &str, timeout: Duration) -> HttpFetcher {
        HttpFetcher::new(url, "tokcost-test", timeout)
    }

    #[test]
    fn http_object_body_is_fetched() {
        let url = serve_once(http_response(
            "200 OK",
            r#"{"gpt-4":{"input_cost_per_token":3e-5}}"#,
        ));
        let map = fetcher(&url, Duration::from_secs(5)).fetch().unwrap();
        assert!(map.contains_key("gpt-4"));
    }

    #[test]
    fn http_error_status_fails_fetch() {
        let url = serve_once(http_response("500 Internal Server Error", "{}"));
        let result = fetcher(&url, Duration::from_secs(5)).fetch();
        assert!(matches!(result, Err(PricingError::Http(_))), "got {result:?}");
    }

    #[test]
    fn http_array_body_fails_fetch() {
        let url = serve_once(http_response("200 OK", "[]"));
        let result = fetcher(&url, Duration::from_secs(5)).fetch();
        assert!(
            matches!(result, Err(PricingError::MalformedPayload { kind: "array" })),
            "got {result:?}"
        );
    }

    #[test]
    fn http_garbage_body_fails_fetch() {
        let url = serve_once(http_response("200 OK", "<html>not json</html>"));
        let result = fetcher(&url, Duration::from_secs(5)).fetch();
        assert!(matches!(result, Err(PricingError::Json(_))), "got {result:?}");
    }

    #[test]
    fn http_stalled_server_times_out() {
        let url = serve_once(None);
        let start = Instant::now();
        let result = fetcher(&url, Duration::from_millis(300)).fetch();
        assert!(result.is_err());
        assert!(start.elapsed() < Duration::from_secs(3));
    }

    #[test]
    fn http_failure_falls_back_to_stale_cache() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = PricingConfig::new(dir.path().join("pricing-cache.json"));
        config.url = serve_once(http_response("503 Service Unavailable", ""));
        config.fetch_timeout = Duration::from_secs(5);
        std::fs::write(
            &config.cache_path,
            r#"{"fetchedAt":"2020-01-01T00:00:00.000Z","data":{"openai/gpt-4":{"input_cost_per_token":3e-5}}}"#,
        )
        .unwrap();

        let status = PricingLoader::from_config(&config).acquire(false);
        assert_eq!(status.source, PricingSource::StaleCache);
        assert!(!status.is_empty);
    }

    #[test]
    fn object_payload_is_accepted() {
        let map = catalog_object(json!({"gpt-4": {"input_cost_per_token": 3e-5}})).unwrap();
        assert!(map.contains_key("gpt-4"));
    }

    #[test]
    fn non_object_payloads_are_rejected() {
        for (payload, kind) in [
            (json!(null), "null"),
            (json!([1, 2]), "array"),
            (json!("text"), "string"),
            (json!(7), "number"),
        ] {
            match catalog_object(payload) {
                Err(PricingError::MalformedPayload { kind: got }) => assert_eq!(got, kind),
                other => panic!("expected malformed payload, got {other:?}"),
            }
        }
    }
}
