// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use heroview_app::{DatasetSource, Record};
use reqwest::StatusCode;
use reqwest::blocking::Client as HttpClient;
use serde_json::Value;
use std::collections::HashSet;
use std::time::Duration;
use url::Url;

pub const DEFAULT_SOURCE_URL: &str =
    "https://rawcdn.githack.com/akabab/superhero-api/0.2.0/api/all.json";

/// Blocking client for the dataset endpoint.
#[derive(Debug, Clone)]
pub struct Client {
    url: Url,
    http: HttpClient,
}

impl Client {
    pub fn new(url: &str, timeout: Duration) -> Result<Self> {
        let trimmed = url.trim();
        if trimmed.is_empty() {
            bail!("source.url must not be empty -- set [source].url or HEROVIEW_SOURCE_URL");
        }
        let url = Url::parse(trimmed)
            .with_context(|| format!("source.url {trimmed:?} is not a valid URL"))?;
        if !matches!(url.scheme(), "http" | "https") {
            bail!("source.url must use http or https, got {:?}", url.scheme());
        }

        let http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .context("build HTTP client")?;

        Ok(Self { url, http })
    }

    pub fn fetch(&self) -> Result<Vec<Record>> {
        tracing::info!(url = %self.url, "fetching dataset");
        let response = self
            .http
            .get(self.url.clone())
            .send()
            .map_err(|error| connection_error(&self.url, error))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(clean_error_response(status, &body));
        }

        let body = response.text().context("read dataset response")?;
        let records = decode_dataset(&body)?;
        tracing::info!(records = records.len(), "dataset fetched");
        Ok(records)
    }
}

impl DatasetSource for Client {
    fn fetch_all(&self) -> Result<Vec<Record>> {
        self.fetch()
    }
}

/// Decodes a dataset body leniently.
///
/// The body must be a JSON array. Elements that are not records, or that
/// repeat an id already seen, are skipped with a warning instead of failing
/// the whole load.
pub fn decode_dataset(body: &str) -> Result<Vec<Record>> {
    let value: Value = serde_json::from_str(body).context("decode dataset: invalid JSON")?;
    let Value::Array(elements) = value else {
        bail!("decode dataset: expected a JSON array of records");
    };

    let mut seen = HashSet::with_capacity(elements.len());
    let mut records = Vec::with_capacity(elements.len());
    for (index, element) in elements.into_iter().enumerate() {
        let record = match serde_json::from_value::<Record>(element) {
            Ok(record) => record,
            Err(error) => {
                tracing::warn!(index, %error, "skipping malformed dataset element");
                continue;
            }
        };
        if !seen.insert(record.id) {
            tracing::warn!(index, id = record.id.get(), "skipping duplicate dataset id");
            continue;
        }
        records.push(record);
    }
    Ok(records)
}

fn connection_error(url: &Url, error: reqwest::Error) -> anyhow::Error {
    let host = url.host_str().unwrap_or("dataset host");
    if error.is_timeout() {
        return anyhow!(
            "timed out fetching {url} -- raise [source].timeout or check the network ({error})"
        );
    }
    anyhow!("cannot reach {host} -- check the network or [source].url ({error})")
}

fn clean_error_response(status: StatusCode, body: &str) -> anyhow::Error {
    let body = body.trim();
    if !body.is_empty() && body.len() < 100 && !body.contains('{') && !body.contains('<') {
        return anyhow!("dataset server error ({}): {}", status.as_u16(), body);
    }
    anyhow!("dataset server returned {}", status.as_u16())
}

#[cfg(test)]
mod tests {
    use super::{Client, clean_error_response, decode_dataset};
    use heroview_app::Column;
    use reqwest::StatusCode;
    use std::time::Duration;

    #[test]
    fn new_rejects_empty_and_non_http_urls() {
        let empty = Client::new("  ", Duration::from_secs(1))
            .expect_err("empty url should be rejected")
            .to_string();
        assert!(empty.contains("[source].url"));

        let bad = Client::new("not a url", Duration::from_secs(1))
            .expect_err("unparseable url should be rejected");
        assert!(format!("{bad:#}").contains("not a valid URL"));

        let scheme = Client::new("ftp://example.com/all.json", Duration::from_secs(1))
            .expect_err("ftp should be rejected")
            .to_string();
        assert!(scheme.contains("http or https"));
    }

    #[test]
    fn decode_reads_wire_shape() -> anyhow::Result<()> {
        let body = r#"[{
            "id": 1,
            "name": "A-Bomb",
            "slug": "1-a-bomb",
            "powerstats": {"intelligence": 38, "strength": "100", "speed": null},
            "appearance": {"gender": "Male", "race": "Human",
                           "height": ["6'8", "203 cm"], "weight": ["980 lb", null]},
            "biography": {"fullName": "Richard Milhouse Jones", "alignment": "good"},
            "images": {"xs": "https://cdn.example/xs/1-a-bomb.jpg"}
        }]"#;
        let records = decode_dataset(body)?;
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.powerstats.strength, Some(100));
        assert_eq!(record.powerstats.speed, None);
        assert_eq!(record.appearance.weight.metric, None);
        assert_eq!(
            heroview_app::resolve_raw(record, Column::Height).map(|raw| raw.display()),
            Some("203 cm".to_owned())
        );
        Ok(())
    }

    #[test]
    fn decode_skips_malformed_and_duplicate_elements() -> anyhow::Result<()> {
        let body = r#"[
            {"id": 1, "name": "one"},
            "not a record",
            {"name": "no id"},
            {"id": 1, "name": "again"},
            {"id": "2", "name": "two"}
        ]"#;
        let records = decode_dataset(body)?;
        let ids = records.iter().map(|record| record.id.get()).collect::<Vec<_>>();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(records[0].name.as_deref(), Some("one"));
        Ok(())
    }

    #[test]
    fn decode_keeps_records_whose_fields_have_the_wrong_type() -> anyhow::Result<()> {
        let body = r#"[
            {"id": 1, "name": "A", "appearance": {"height": "203 cm"}},
            {"id": 2, "name": "B", "appearance": {"race": 7}},
            {"id": 3, "name": "C", "biography": {"alignment": false}},
            {"id": 4, "name": "D", "powerstats": "-"},
            {"id": 5, "name": 42},
            {"id": 6, "name": "F", "images": {"xs": null}}
        ]"#;
        let records = decode_dataset(body)?;
        let ids = records.iter().map(|record| record.id.get()).collect::<Vec<_>>();
        assert_eq!(ids, vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(heroview_app::resolve_raw(&records[0], Column::Height), None);
        assert_eq!(records[1].appearance.race, None);
        assert_eq!(records[2].biography.alignment, None);
        assert_eq!(records[3].powerstats.strength, None);
        assert_eq!(records[4].name, None);
        Ok(())
    }

    #[test]
    fn decode_rejects_non_array_payloads() {
        let error = decode_dataset(r#"{"id": 1}"#).expect_err("object should fail");
        assert!(error.to_string().contains("JSON array"));
        let error = decode_dataset("<html>").expect_err("html should fail");
        assert!(error.to_string().contains("invalid JSON"));
    }

    #[test]
    fn error_bodies_are_kept_only_when_short_and_plain() {
        let short = clean_error_response(StatusCode::NOT_FOUND, "no such file");
        assert_eq!(short.to_string(), "dataset server error (404): no such file");

        let html = clean_error_response(StatusCode::BAD_GATEWAY, "<html>bad gateway</html>");
        assert_eq!(html.to_string(), "dataset server returned 502");
    }
}
