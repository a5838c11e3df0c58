use crate::{
    client::{pagination, Document, KeygenClient, ListDocument, Params, RequestOptions},
    models::{RequestLog, RequestLogAttributes},
    Result,
};
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<String>,
    pub end: Option<String>,
}

impl DateRange {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: Some(start.into()),
            end: Some(end.into()),
        }
    }

    fn params(range: Option<&DateRange>) -> Params {
        match range {
            Some(range) => Params::new().nested(
                "date",
                vec![
                    ("start", range.start.as_deref()),
                    ("end", range.end.as_deref()),
                ],
            ),
            None => Params::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestorType {
    User,
    Environment,
    Product,
    License,
}

impl RequestorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Environment => "environment",
            Self::Product => "product",
            Self::License => "license",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Requestor {
    pub kind: Option<RequestorType>,
    pub id: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct RequestLogFilters {
    pub date: Option<DateRange>,
    pub requestor: Option<Requestor>,
    pub url: Option<String>,
    pub ip: Option<String>,
    pub method: Option<String>,
    pub status: Option<String>,
    pub limit: Option<u32>,
    pub page: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalyticsGrouping {
    Day,
    Hour,
    Method,
    Status,
}

impl AnalyticsGrouping {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Hour => "hour",
            Self::Method => "method",
            Self::Status => "status",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AnalyticsFilters {
    pub date_range: Option<DateRange>,
    pub group_by: Option<AnalyticsGrouping>,
    pub limit: Option<u32>,
}

pub struct RequestLogResource<'a> {
    client: &'a KeygenClient,
}

impl<'a> RequestLogResource<'a> {
    pub(crate) fn new(client: &'a KeygenClient) -> Self {
        Self { client }
    }

    pub async fn list(
        &self,
        filters: &RequestLogFilters,
    ) -> Result<ListDocument<RequestLogAttributes>> {
        let requestor = filters.requestor.clone().unwrap_or_default();

        let params = pagination(filters.limit, filters.page)
            .insert_opt("url", filters.url.as_deref())
            .insert_opt("ip", filters.ip.as_deref())
            .insert_opt("method", filters.method.as_deref())
            .insert_opt("status", filters.status.as_deref())
            .merge(DateRange::params(filters.date.as_ref()))
            .nested(
                "requestor",
                vec![
                    ("type", requestor.kind.map(|kind| kind.as_str())),
                    ("id", requestor.id.as_deref()),
                ],
            );

        self.client
            .request("request-logs", RequestOptions::get().params(params))
            .await
    }

    pub async fn get(&self, id: &str) -> Result<Document<RequestLog>> {
        self.client
            .request(&format!("request-logs/{}", id), RequestOptions::get())
            .await
    }

    async fn analytics_report(&self, report: &str, params: Params) -> Result<Document<Value>> {
        self.client
            .request(
                &format!("analytics/{}", report),
                RequestOptions::get().params(params),
            )
            .await
    }

    /// Request log summary, optionally grouped.
    pub async fn analytics(&self, filters: &AnalyticsFilters) -> Result<Document<Value>> {
        let params = DateRange::params(filters.date_range.as_ref())
            .insert_opt("groupBy", filters.group_by.map(|group| group.as_str()));

        self.analytics_report("request-logs", params).await
    }

    pub async fn error_rates(&self, date_range: Option<&DateRange>) -> Result<Document<Value>> {
        self.analytics_report("error-rates", DateRange::params(date_range))
            .await
    }

    pub async fn endpoint_stats(
        &self,
        date_range: Option<&DateRange>,
        limit: Option<u32>,
    ) -> Result<Document<Value>> {
        let params =
            DateRange::params(date_range).insert_opt("limit", limit.filter(|limit| *limit > 0));

        self.analytics_report("endpoints", params).await
    }

    pub async fn performance(&self, date_range: Option<&DateRange>) -> Result<Document<Value>> {
        self.analytics_report("performance", DateRange::params(date_range))
            .await
    }
}
