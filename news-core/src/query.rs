use chrono::SecondsFormat;

use crate::filter::FilterRecord;

/// Endpoint path the serialized query is issued against.
pub const ARTICLES_PATH: &str = "/v1/articles";

/// Ordered query parameters; order is part of the contract so output is
/// deterministic for a given record.
pub type QueryParams = Vec<(&'static str, String)>;

/// Project a filter record onto the API's query vocabulary. Empty strings and
/// absent dates are omitted; `limit` is always present and always last. Date
/// bounds serialize as RFC 3339 with UTC offset.
pub fn serialize_filters(record: &FilterRecord, page_size: u32) -> QueryParams {
    let mut params = QueryParams::new();
    if !record.title.is_empty() {
        params.push(("title", record.title.clone()));
    }
    if !record.content.is_empty() {
        params.push(("content", record.content.clone()));
    }
    if !record.news_provider.is_empty() {
        params.push(("news_provider", record.news_provider.clone()));
    }
    if let Some(start) = record.start_date {
        params.push(("start_date", start.to_rfc3339_opts(SecondsFormat::Millis, true)));
    }
    if let Some(end) = record.end_date {
        params.push(("end_date", end.to_rfc3339_opts(SecondsFormat::Millis, true)));
    }
    params.push(("limit", page_size.to_string()));
    params
}
