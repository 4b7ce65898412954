#![no_main]

use std::sync::Arc;

use libfuzzer_sys::fuzz_target;
use policy_relay::domain::ports::{HttpClient, HttpRequest, HttpResponse, TransportError};
use policy_relay::{LokiOptions, LokiTarget, PolicyResult, SummaryBatch};

struct NoopClient;

impl HttpClient for NoopClient {
    fn post(&self, _request: HttpRequest) -> Result<HttpResponse, TransportError> {
        Ok(HttpResponse { status: 204 })
    }
}

fuzz_target!(|data: &[u8]| {
    // Any result that parses must produce a payload that encodes
    if let Ok(result) = serde_json::from_slice::<PolicyResult>(data) {
        let target = LokiTarget::new(LokiOptions::new(
            "fuzz",
            "http://localhost:3100/api/prom/push",
            Arc::new(NoopClient),
        ))
        .expect("valid target");

        let payload = target.payload_at(&result, 0);
        serde_json::to_vec(&payload).expect("payload encodes");

        let _ = SummaryBatch::from_results([&result]);
    }
});
