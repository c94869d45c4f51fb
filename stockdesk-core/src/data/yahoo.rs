//! Yahoo Finance data provider.
//!
//! Fetches daily OHLCV bars from Yahoo's v8 chart API for a range such as
//! `1y`. Every request carries an explicit timeout; a transient failure
//! (connect error, timeout, HTTP 429 or 5xx) is retried `retries` times, after
//! which the error is returned and the pipeline reports "no data".
//!
//! Yahoo Finance has no official API and is subject to unannounced format
//! changes. `CsvProvider` is the offline fallback.

use super::circuit_breaker::CircuitBreaker;
use super::provider::{DataError, FetchPeriod, MarketDataProvider, RawBar};
use chrono::NaiveDate;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://query2.finance.yahoo.com/v8/finance/chart";
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    meta: Option<ChartMeta>,
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct ChartMeta {
    gmtoffset: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteData>,
}

#[derive(Debug, Deserialize)]
struct QuoteData {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

/// Network settings for the Yahoo provider.
#[derive(Debug, Clone)]
pub struct YahooSettings {
    pub base_url: String,
    pub timeout: Duration,
    pub retries: u32,
    pub retry_delay: Duration,
}

impl Default for YahooSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(10),
            retries: 1,
            retry_delay: Duration::from_millis(500),
        }
    }
}

pub struct YahooProvider {
    client: reqwest::blocking::Client,
    circuit_breaker: Arc<CircuitBreaker>,
    settings: YahooSettings,
}

impl YahooProvider {
    pub fn new(
        settings: YahooSettings,
        circuit_breaker: Arc<CircuitBreaker>,
    ) -> Result<Self, DataError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(settings.timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| DataError::Client(e.to_string()))?;

        Ok(Self {
            client,
            circuit_breaker,
            settings,
        })
    }

    fn chart_url(&self, symbol: &str, period: FetchPeriod) -> String {
        format!(
            "{}/{symbol}?range={period}&interval=1d&includeAdjustedClose=true",
            self.settings.base_url.trim_end_matches('/')
        )
    }

    /// Issue one request and classify the outcome.
    fn fetch_once(&self, symbol: &str, url: &str) -> Result<Vec<RawBar>, DataError> {
        let resp = self.client.get(url).send().map_err(|e| {
            if e.is_connect() || e.is_timeout() || e.is_request() {
                DataError::Transient(e.to_string())
            } else {
                DataError::ResponseFormat(e.to_string())
            }
        })?;

        let status = resp.status();
        if status == reqwest::StatusCode::FORBIDDEN {
            self.circuit_breaker.trip();
            return Err(DataError::CircuitOpen {
                remaining_secs: self.circuit_breaker.remaining_cooldown().as_secs(),
            });
        }
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(DataError::SymbolNotFound {
                symbol: symbol.to_string(),
            });
        }
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
            return Err(DataError::Transient(format!("HTTP {status} for {symbol}")));
        }
        if !status.is_success() {
            return Err(DataError::ResponseFormat(format!(
                "HTTP {status} for {symbol}"
            )));
        }

        let chart: ChartResponse = resp.json().map_err(|e| {
            if e.is_timeout() || e.is_body() {
                DataError::Transient(format!("failed to read response for {symbol}: {e}"))
            } else {
                DataError::ResponseFormat(format!("failed to parse response for {symbol}: {e}"))
            }
        })?;
        parse_response(symbol, chart)
    }
}

impl MarketDataProvider for YahooProvider {
    fn name(&self) -> &str {
        "yahoo_finance"
    }

    fn fetch_bars(&self, symbol: &str, period: FetchPeriod) -> Result<Vec<RawBar>, DataError> {
        let url = self.chart_url(symbol, period);
        let attempts = self.settings.retries + 1;
        let mut last_error = None;

        for attempt in 0..attempts {
            if !self.circuit_breaker.allows_request() {
                return Err(DataError::CircuitOpen {
                    remaining_secs: self.circuit_breaker.remaining_cooldown().as_secs(),
                });
            }
            if attempt > 0 {
                std::thread::sleep(self.settings.retry_delay);
            }

            tracing::debug!(symbol, %period, attempt, "requesting daily bars from Yahoo");
            match self.fetch_once(symbol, &url) {
                Ok(bars) => {
                    self.circuit_breaker.record_success();
                    tracing::debug!(symbol, bars = bars.len(), "Yahoo fetch complete");
                    return Ok(bars);
                }
                Err(e) if e.is_transient() => {
                    self.circuit_breaker.record_failure();
                    tracing::warn!(symbol, attempt, error = %e, "transient Yahoo failure");
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or_else(|| DataError::Transient("no attempts made".into())))
    }

    fn is_available(&self) -> bool {
        self.circuit_breaker.allows_request()
    }
}

/// Parse a chart API response into raw bars, oldest first.
///
/// Days where every field is null (exchange holidays) are skipped. Partially
/// null days are kept so cleaning can account for them.
fn parse_response(symbol: &str, resp: ChartResponse) -> Result<Vec<RawBar>, DataError> {
    let result = match resp.chart.result {
        Some(result) => result,
        None => {
            return match resp.chart.error {
                Some(err) if err.code == "Not Found" => Err(DataError::SymbolNotFound {
                    symbol: symbol.to_string(),
                }),
                Some(err) => Err(DataError::ResponseFormat(format!(
                    "{}: {}",
                    err.code, err.description
                ))),
                None => Err(DataError::ResponseFormat(
                    "empty result with no error".into(),
                )),
            };
        }
    };

    let Some(data) = result.into_iter().next() else {
        return Ok(Vec::new());
    };
    // Yahoo omits timestamps entirely for symbols with no trading history.
    let Some(timestamps) = data.timestamp else {
        return Ok(Vec::new());
    };
    let quote = data
        .indicators
        .quote
        .into_iter()
        .next()
        .ok_or_else(|| DataError::ResponseFormat("no quote data".into()))?;
    let offset = data.meta.and_then(|m| m.gmtoffset).unwrap_or(0);

    let mut bars = Vec::with_capacity(timestamps.len());
    for (i, &ts) in timestamps.iter().enumerate() {
        let date = exchange_date(ts, offset)
            .ok_or_else(|| DataError::ResponseFormat(format!("invalid timestamp: {ts}")))?;

        let open = quote.open.get(i).copied().flatten();
        let high = quote.high.get(i).copied().flatten();
        let low = quote.low.get(i).copied().flatten();
        let close = quote.close.get(i).copied().flatten();
        let volume = quote
            .volume
            .get(i)
            .copied()
            .flatten()
            .filter(|v| v.is_finite() && *v >= 0.0)
            .map(|v| v.round() as u64);

        if open.is_none() && high.is_none() && low.is_none() && close.is_none() {
            continue;
        }

        bars.push(RawBar {
            date,
            open,
            high,
            low,
            close,
            volume,
        });
    }

    Ok(bars)
}

/// Calendar date at the exchange for a UTC epoch timestamp.
fn exchange_date(ts: i64, gmtoffset: i64) -> Option<NaiveDate> {
    chrono::DateTime::from_timestamp(ts + gmtoffset, 0).map(|dt| dt.naive_utc().date())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Result<Vec<RawBar>, DataError> {
        let resp: ChartResponse = serde_json::from_str(json).unwrap();
        parse_response("RELIANCE.NS", resp)
    }

    #[test]
    fn parses_quotes_in_exchange_time() {
        // 2024-01-01T22:00:00Z is already 2024-01-02 in IST (+05:30).
        let json = r#"{"chart":{"result":[{
            "meta":{"gmtoffset":19800},
            "timestamp":[1704146400,1704232800],
            "indicators":{"quote":[{
                "open":[100.0,101.0],"high":[102.0,103.0],"low":[99.0,100.0],
                "close":[101.0,102.0],"volume":[1000,1100]
            }]}
        }],"error":null}}"#;
        let bars = parse(json).unwrap();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!(bars[0].open, Some(100.0));
        assert_eq!(bars[1].volume, Some(1100));
    }

    #[test]
    fn skips_all_null_days_but_keeps_partial_ones() {
        let json = r#"{"chart":{"result":[{
            "timestamp":[1704153600,1704240000,1704326400],
            "indicators":{"quote":[{
                "open":[100.0,null,101.0],"high":[102.0,null,103.0],"low":[99.0,null,100.0],
                "close":[101.0,null,null],"volume":[1000,null,900]
            }]}
        }],"error":null}}"#;
        let bars = parse(json).unwrap();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[1].close, None);
    }

    #[test]
    fn not_found_error_maps_to_symbol_not_found() {
        let json = r#"{"chart":{"result":null,"error":{
            "code":"Not Found","description":"No data found, symbol may be delisted"}}}"#;
        assert!(matches!(
            parse(json),
            Err(DataError::SymbolNotFound { .. })
        ));
    }

    #[test]
    fn missing_timestamps_mean_no_data() {
        let json = r#"{"chart":{"result":[{
            "indicators":{"quote":[{}]}
        }],"error":null}}"#;
        assert!(parse(json).unwrap().is_empty());
    }

    #[test]
    fn chart_url_carries_range_and_interval() {
        let provider = YahooProvider::new(
            YahooSettings {
                base_url: "http://localhost:9/chart/".into(),
                ..YahooSettings::default()
            },
            Arc::new(CircuitBreaker::new(Duration::from_secs(60), 3)),
        )
        .unwrap();
        assert_eq!(
            provider.chart_url("TCS.NS", FetchPeriod::OneYear),
            "http://localhost:9/chart/TCS.NS?range=1y&interval=1d&includeAdjustedClose=true"
        );
    }

    /// Serve one canned response on a local port, then hold the socket open.
    fn one_shot_server(response: &'static str, hold: Duration) -> String {
        use std::io::{Read, Write};

        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut buf = [0u8; 4096];
            let _ = stream.read(&mut buf);
            let _ = stream.write_all(response.as_bytes());
            let _ = stream.flush();
            std::thread::sleep(hold);
        });
        format!("http://{addr}/chart")
    }

    fn local_provider(base_url: String) -> YahooProvider {
        YahooProvider::new(
            YahooSettings {
                base_url,
                timeout: Duration::from_millis(300),
                retries: 0,
                retry_delay: Duration::ZERO,
            },
            Arc::new(CircuitBreaker::new(Duration::from_secs(60), 5)),
        )
        .unwrap()
    }

    #[test]
    fn stalled_body_is_transient() {
        let url = one_shot_server(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\n\
             Content-Length: 4096\r\n\r\n{\"chart\":",
            Duration::from_secs(2),
        );
        let err = local_provider(url)
            .fetch_bars("TCS.NS", FetchPeriod::OneYear)
            .unwrap_err();
        assert!(matches!(err, DataError::Transient(_)), "got {err:?}");
    }

    #[test]
    fn malformed_body_is_a_format_error() {
        let url = one_shot_server(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\n\
             Content-Length: 9\r\nConnection: close\r\n\r\nnot json!",
            Duration::ZERO,
        );
        let err = local_provider(url)
            .fetch_bars("TCS.NS", FetchPeriod::OneYear)
            .unwrap_err();
        assert!(matches!(err, DataError::ResponseFormat(_)), "got {err:?}");
    }

    #[test]
    fn open_breaker_refuses_without_network() {
        let breaker = Arc::new(CircuitBreaker::new(Duration::from_secs(60), 1));
        breaker.trip();
        let provider = YahooProvider::new(YahooSettings::default(), breaker).unwrap();
        assert!(!provider.is_available());
        assert!(matches!(
            provider.fetch_bars("TCS.NS", FetchPeriod::OneYear),
            Err(DataError::CircuitOpen { .. })
        ));
    }
}
