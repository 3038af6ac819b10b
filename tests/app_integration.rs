use inr_usd_converter::core::{
    Converter, ConverterSettings, Currency, Direction, RateSource, RefreshPolicy,
};
use inr_usd_converter::providers::ExchangeRateApiProvider;
use inr_usd_converter::{AppCommand, RunOptions};
use std::fs;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};
use wiremock::MockServer;

mod test_utils {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    pub const LATEST_USD: &str = r#"{
        "provider": "https://www.exchangerate-api.com",
        "base": "USD",
        "date": "2026-10-18",
        "rates": {"USD": 1, "EUR": 0.92, "INR": 80.0}
    }"#;

    /// Mock server answering `/v4/latest/USD`, expecting exactly `calls` requests.
    pub async fn create_mock_server(template: ResponseTemplate, calls: u64) -> MockServer {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v4/latest/USD"))
            .respond_with(template)
            .expect(calls)
            .mount(&mock_server)
            .await;

        mock_server
    }

    pub fn ok(body: &str) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_string(body)
    }

    pub fn write_config(extra: &str, base_url: &str) -> tempfile::NamedTempFile {
        let config_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
        let config_content = format!(
            r#"
{extra}
providers:
  exchangerate_api:
    base_url: "{base_url}"
    timeout_secs: 2
"#
        );
        std::fs::write(config_file.path(), config_content).expect("Failed to write config file");
        config_file
    }
}

fn converter_for(mock_server: &MockServer, policy: RefreshPolicy) -> Converter {
    let source: Arc<dyn RateSource> = Arc::new(ExchangeRateApiProvider::new(
        &mock_server.uri(),
        Duration::from_secs(2),
    ));
    Converter::new(
        source,
        ConverterSettings {
            policy,
            ..ConverterSettings::default()
        },
    )
    .expect("valid settings")
}

#[test_log::test(tokio::test)]
#[ignore = "hits the live exchange rate API"]
async fn test_real_exchange_rate_api() {
    let provider = ExchangeRateApiProvider::default();
    info!("Fetching USD/INR rate from exchangerate-api.com");

    match provider.fetch_rate().await {
        Ok(rate) => {
            info!(?rate, "Received successful rate response");
            assert!(rate > 0.0, "Exchange rate should be positive");
        }
        Err(e) => {
            error!("Exchange rate API request failed: {e}\n{e:?}");
            panic!("Exchange rate API request failed: {e}");
        }
    }
}

#[test_log::test(tokio::test)]
async fn test_converter_uses_fetched_rate_and_caches_it() {
    let mock_server =
        test_utils::create_mock_server(test_utils::ok(test_utils::LATEST_USD), 1).await;
    let converter = converter_for(&mock_server, RefreshPolicy::Inline);

    assert_eq!(converter.convert(100.0, Direction::ToTarget).await, 8000.0);
    assert_eq!(converter.convert(8000.0, Direction::ToSource).await, 100.0);
    assert_eq!(converter.convert(50.50, Direction::ToTarget).await, 4040.0);

    let snapshot = converter.snapshot();
    assert_eq!(snapshot.rate, 80.0);
    assert!(snapshot.is_live());
    // MockServer verifies the single request on drop
}

#[test_log::test(tokio::test)]
async fn test_failed_fetches_leave_rate_unchanged() {
    use wiremock::ResponseTemplate;

    let cases = [
        ResponseTemplate::new(503),
        ResponseTemplate::new(404).set_body_string(test_utils::LATEST_USD),
        test_utils::ok("{not json"),
        test_utils::ok(r#"{"rates": {"EUR": 0.92}}"#),
        test_utils::ok(r#"{"rates": {"INR": null}}"#),
        test_utils::ok(r#"{"rates": {"INR": 0}}"#),
    ];

    for template in cases {
        let mock_server = test_utils::create_mock_server(template, 1).await;
        let converter = converter_for(&mock_server, RefreshPolicy::Inline);
        let before = converter.snapshot();

        assert!(!converter.fetch_rate().await);
        assert_eq!(converter.snapshot(), before);
        assert_eq!(converter.snapshot().rate, 83.12);
        assert!(!converter.snapshot().is_live());
    }
}

#[test_log::test(tokio::test)]
async fn test_unavailable_api_falls_back_to_default() {
    let mock_server = MockServer::start().await;
    let uri = mock_server.uri();
    drop(mock_server);

    let source: Arc<dyn RateSource> =
        Arc::new(ExchangeRateApiProvider::new(&uri, Duration::from_secs(1)));
    let converter = Converter::new(source, ConverterSettings::default()).unwrap();

    assert_eq!(converter.get_rate().await, 83.12);
    assert!(!converter.snapshot().is_live());
}

#[test_log::test(tokio::test)]
async fn test_full_app_flow_convert() {
    let mock_server =
        test_utils::create_mock_server(test_utils::ok(test_utils::LATEST_USD), 1).await;
    let config_file = test_utils::write_config("precision: 3", &mock_server.uri());

    let options = RunOptions {
        config_path: config_file.path().to_str(),
        ..RunOptions::default()
    };
    let result = inr_usd_converter::run_command(
        AppCommand::Convert {
            amount: 100.0,
            currency: Currency::Usd,
        },
        &options,
    )
    .await;
    assert!(
        result.is_ok(),
        "Main function failed with: {:?}",
        result.err()
    );
}

#[test_log::test(tokio::test)]
async fn test_full_app_flow_survives_api_failure() {
    let mock_server =
        test_utils::create_mock_server(wiremock::ResponseTemplate::new(500), 1).await;
    let config_file = test_utils::write_config("", &mock_server.uri());

    let options = RunOptions {
        config_path: config_file.path().to_str(),
        ..RunOptions::default()
    };
    let result = inr_usd_converter::run_command(AppCommand::Rate, &options).await;
    assert!(result.is_ok(), "Rate display failed: {:?}", result.err());
}

#[test_log::test(tokio::test)]
async fn test_no_fetch_never_calls_api() {
    let mock_server =
        test_utils::create_mock_server(test_utils::ok(test_utils::LATEST_USD), 0).await;
    let config_file = test_utils::write_config("default_rate: 82.0", &mock_server.uri());

    let options = RunOptions {
        config_path: config_file.path().to_str(),
        no_fetch: true,
        precision: Some(2),
    };
    inr_usd_converter::run_command(AppCommand::Rate, &options)
        .await
        .expect("rate display");
    inr_usd_converter::run_command(
        AppCommand::Convert {
            amount: -1000.0,
            currency: Currency::Inr,
        },
        &options,
    )
    .await
    .expect("conversion");
}

#[test_log::test(tokio::test)]
async fn test_rejects_bad_configuration() {
    let mock_server = MockServer::start().await;

    let config_file = test_utils::write_config("default_rate: -5", &mock_server.uri());
    let options = RunOptions {
        config_path: config_file.path().to_str(),
        no_fetch: true,
        ..RunOptions::default()
    };
    let result = inr_usd_converter::run_command(AppCommand::Rate, &options).await;
    assert!(
        result
            .unwrap_err()
            .to_string()
            .contains("must be a positive number")
    );

    let config_file = test_utils::write_config("precision: 42", &mock_server.uri());
    let options = RunOptions {
        config_path: config_file.path().to_str(),
        no_fetch: true,
        ..RunOptions::default()
    };
    let result = inr_usd_converter::run_command(AppCommand::Rate, &options).await;
    assert!(result.unwrap_err().to_string().contains("Precision"));

    let config_file = tempfile::NamedTempFile::new().unwrap();
    fs::write(
        config_file.path(),
        format!(
            "providers:\n  exchangerate_api:\n    base_url: \"{}\"\n    timeout_secs: 0\n",
            mock_server.uri()
        ),
    )
    .unwrap();
    let options = RunOptions {
        config_path: config_file.path().to_str(),
        no_fetch: true,
        ..RunOptions::default()
    };
    let result = inr_usd_converter::run_command(AppCommand::Rate, &options).await;
    assert!(result.unwrap_err().to_string().contains("timeout"));

    let config_file = tempfile::NamedTempFile::new().unwrap();
    fs::write(config_file.path(), "default_rate: [not, a, number]").unwrap();
    let options = RunOptions {
        config_path: config_file.path().to_str(),
        ..RunOptions::default()
    };
    let result = inr_usd_converter::run_command(AppCommand::Rate, &options).await;
    assert!(
        result
            .unwrap_err()
            .to_string()
            .contains("Failed to parse config file")
    );
}
