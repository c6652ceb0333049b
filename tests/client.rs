use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;
use crimescope::client::{
    transport::{AttemptError, Sleeper, Transport},
    CrimeApiClient, CrimeDataPoint, CrimeSeries, OffenseType,
};
use crimescope::error::CrimeApiError;

fn point(year: i32, actual: u64) -> CrimeDataPoint {
    CrimeDataPoint {
        data_year: year,
        offense: "violent-crime".to_string(),
        actual,
        cleared: actual / 2,
        cleared_exceptionally: actual / 20,
        actual_min: actual - 10,
        actual_max: actual + 10,
    }
}

fn series_fixture() -> CrimeSeries {
    CrimeSeries {
        data: vec![point(2020, 100)],
        total: 1,
    }
}

fn gateway(code: u16) -> AttemptError {
    AttemptError::Status {
        code,
        reason: "gateway".to_string(),
    }
}

/// Pops a scripted outcome per attempt and records every URL it saw.
#[derive(Default)]
struct ScriptedTransport {
    responses: Mutex<VecDeque<Result<CrimeSeries, AttemptError>>>,
    urls: Mutex<Vec<String>>,
}

impl ScriptedTransport {
    fn new(responses: Vec<Result<CrimeSeries, AttemptError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            urls: Mutex::new(Vec::new()),
        }
    }

    fn attempts(&self) -> usize {
        self.urls.lock().unwrap().len()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn fetch(&self, url: &str) -> Result<CrimeSeries, AttemptError> {
        self.urls.lock().unwrap().push(url.to_string());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .expect("script exhausted")
    }
}

/// Records requested delays instead of sleeping.
#[derive(Default)]
struct RecordingSleeper {
    delays: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    fn delays(&self) -> Vec<Duration> {
        self.delays.lock().unwrap().clone()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, delay: Duration) {
        self.delays.lock().unwrap().push(delay);
    }
}

#[tokio::test]
async fn recovers_after_transient_gateway_errors() {
    let transport = Arc::new(ScriptedTransport::new(vec![
        Err(gateway(503)),
        Err(gateway(503)),
        Err(gateway(503)),
        Ok(series_fixture()),
    ]));
    let sleeper = Arc::new(RecordingSleeper::default());
    let client = CrimeApiClient::with_parts("http://api.test", transport.clone(), sleeper.clone());

    let series = client
        .crime_estimates("NJ1234567", OffenseType::ViolentCrime, 2020, 2020, false)
        .await
        .expect("fourth attempt succeeds");

    assert_eq!(series.total, 1);
    assert_eq!(transport.attempts(), 4);
    assert_eq!(
        sleeper.delays(),
        vec![
            Duration::from_secs(1),
            Duration::from_secs(2),
            Duration::from_secs(3),
        ]
    );
}

#[tokio::test]
async fn exhausted_gateway_errors_fall_back_to_mock_data() {
    let transport = Arc::new(ScriptedTransport::new(
        (0..4).map(|_| Err(gateway(503))).collect(),
    ));
    let sleeper = Arc::new(RecordingSleeper::default());
    let client = CrimeApiClient::with_parts("http://api.test", transport.clone(), sleeper);

    let series = client
        .crime_estimates("NJ1234567", OffenseType::Robbery, 2015, 2019, true)
        .await
        .expect("mock fallback substitutes the outage");

    assert_eq!(transport.attempts(), 4);
    assert_eq!(series.data.len(), 5);
    assert!(series
        .data
        .windows(2)
        .all(|pair| pair[0].data_year + 1 == pair[1].data_year));
}

#[tokio::test]
async fn exhausted_gateway_errors_without_fallback_classify_service_unavailable() {
    let transport = Arc::new(ScriptedTransport::new(
        (0..4).map(|_| Err(gateway(502))).collect(),
    ));
    let sleeper = Arc::new(RecordingSleeper::default());
    let client = CrimeApiClient::with_parts("http://api.test", transport, sleeper);

    let err = client
        .crime_estimates("NJ1234567", OffenseType::Assault, 2020, 2021, false)
        .await
        .expect_err("no fallback allowed");
    assert!(matches!(
        err,
        CrimeApiError::ServiceUnavailable { status: 502 }
    ));
}

#[tokio::test]
async fn not_found_is_not_retried() {
    let transport = Arc::new(ScriptedTransport::new(vec![Err(AttemptError::Status {
        code: 404,
        reason: "not found".to_string(),
    })]));
    let sleeper = Arc::new(RecordingSleeper::default());
    let client = CrimeApiClient::with_parts("http://api.test", transport.clone(), sleeper.clone());

    let err = client
        .crime_estimates("ZZ0000000", OffenseType::ViolentCrime, 2020, 2020, true)
        .await
        .expect_err("404 is permanent");

    assert!(matches!(err, CrimeApiError::NotFound { agency } if agency == "ZZ0000000"));
    assert_eq!(transport.attempts(), 1);
    assert!(sleeper.delays().is_empty());
}

#[tokio::test]
async fn network_failures_retry_but_never_mock() {
    let transport = Arc::new(ScriptedTransport::new(
        (0..4)
            .map(|_| Err(AttemptError::Network("connection refused".to_string())))
            .collect(),
    ));
    let sleeper = Arc::new(RecordingSleeper::default());
    let client = CrimeApiClient::with_parts("http://api.test", transport.clone(), sleeper);

    let err = client
        .crime_estimates("NJ1234567", OffenseType::Burglary, 2020, 2020, true)
        .await
        .expect_err("network errors are not mock-substituted");
    assert!(matches!(err, CrimeApiError::Network(_)));
    assert_eq!(transport.attempts(), 4);
}

/// Routes by URL so concurrent fetches stay deterministic: homicide fails,
/// everything else answers.
struct RouteTransport;

#[async_trait]
impl Transport for RouteTransport {
    async fn fetch(&self, url: &str) -> Result<CrimeSeries, AttemptError> {
        if url.contains("/homicide/") {
            Err(AttemptError::Status {
                code: 404,
                reason: "not found".to_string(),
            })
        } else {
            Ok(series_fixture())
        }
    }
}

#[tokio::test]
async fn multi_offense_failure_is_isolated() {
    let sleeper = Arc::new(RecordingSleeper::default());
    let client = CrimeApiClient::with_parts("http://api.test", Arc::new(RouteTransport), sleeper);

    let offenses = [
        OffenseType::ViolentCrime,
        OffenseType::Homicide,
        OffenseType::Robbery,
    ];
    let results = client
        .multiple_offenses("NJ1234567", &offenses, 2020, 2020)
        .await;

    assert_eq!(results.len(), 3);
    assert!(results[&OffenseType::Homicide].data.is_empty());
    assert_eq!(results[&OffenseType::ViolentCrime].total, 1);
    assert_eq!(results[&OffenseType::Robbery].total, 1);

    // Result order follows the requested order, not completion order.
    let keys: Vec<OffenseType> = results.keys().copied().collect();
    assert_eq!(keys, offenses);
}

#[tokio::test]
async fn request_url_follows_the_estimates_contract() {
    let transport = Arc::new(ScriptedTransport::new(vec![Ok(series_fixture())]));
    let sleeper = Arc::new(RecordingSleeper::default());
    let client = CrimeApiClient::with_parts("http://api.test/", transport.clone(), sleeper);

    client
        .crime_estimates("NJ1234567", OffenseType::MotorVehicleTheft, 2010, 2022, false)
        .await
        .expect("scripted success");

    let urls = transport.urls.lock().unwrap().clone();
    assert_eq!(
        urls,
        vec![
            "http://api.test/estimates/agencies/agency/NJ1234567/offenses/motor-vehicle-theft/2010/2022"
                .to_string()
        ]
    );
}
