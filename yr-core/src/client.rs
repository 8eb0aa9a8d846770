//! The public client.
//!
//! Every accessor runs the full fetch-or-cache sequence and parses the
//! document again. Within the cache TTL repeated calls do not touch the
//! network, but each one still pays for an XML parse. Use
//! [`YrClient::report`] to read several fields from a single pass.

use chrono::{Local, NaiveDate, NaiveDateTime};

use crate::{
    cache::DocumentCache,
    config::{ClientOptions, format_timestamp, validate_date_format},
    document,
    error::{Result, YrError},
    fetcher::Fetcher,
    location::{Language, LocationSpec},
    model::{Coordinates, ForecastEntry, Sun, Timezone, WeatherReport, next_three_middays},
    render::{TableStyle, render_table},
    transport::{HttpTransport, Transport},
};

#[derive(Debug)]
pub struct YrClient<T = HttpTransport> {
    location: LocationSpec,
    language: Language,
    options: ClientOptions,
    fetcher: Fetcher<T>,
}

impl YrClient<HttpTransport> {
    /// Create a client for a yr.no place URL, e.g.
    /// `http://www.yr.no/sted/Norge/Østfold/Halden/Halden`.
    pub fn new(url: &str, options: ClientOptions) -> Result<Self> {
        let transport = HttpTransport::new(options.timeout())?;
        Self::with_transport(url, options, transport)
    }
}

impl<T: Transport> YrClient<T> {
    pub fn with_transport(url: &str, options: ClientOptions, transport: T) -> Result<Self> {
        options.validate()?;
        let location = LocationSpec::resolve(url)?;

        let cache = match &options.cache_directory {
            Some(dir) => DocumentCache::new(dir, options.cache_ttl()),
            None => DocumentCache::disabled(),
        };

        Ok(Self {
            language: location.language(),
            location,
            options,
            fetcher: Fetcher::new(cache, transport),
        })
    }

    pub fn location_spec(&self) -> &LocationSpec {
        &self.location
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    pub fn fetcher(&self) -> &Fetcher<T> {
        &self.fetcher
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Switch language. Later fetches use the matching feed variant.
    pub fn set_language(&mut self, language: Language) {
        self.language = language;
    }

    /// URL of the XML feed for the current language.
    pub fn feed_url(&self) -> String {
        self.location
            .document_url(&self.options.base_url, self.language, "varsel.xml")
    }

    /// URL of the printable PDF forecast. Not fetched.
    pub fn pdf_url(&self) -> String {
        self.location
            .document_url(&self.options.base_url, self.language, "varsel.pdf")
    }

    /// Fetch (or load from cache) and parse the whole document.
    pub async fn report(&self) -> Result<WeatherReport> {
        let bytes = self.fetcher.fetch_document(&self.feed_url()).await?;
        document::parse_report(&bytes)
    }

    /// Like [`report`](Self::report), also returning the error when the
    /// downloaded copy could not be cached because the cache directory is
    /// missing.
    pub async fn report_checked(&self) -> Result<(WeatherReport, Option<YrError>)> {
        let (bytes, cache_error) = self.fetcher.fetch_document_checked(&self.feed_url()).await?;
        Ok((document::parse_report(&bytes)?, cache_error))
    }

    pub async fn name(&self) -> Result<String> {
        Ok(self.report().await?.location.name)
    }

    /// Location type, e.g. "By".
    pub async fn location_type(&self) -> Result<String> {
        Ok(self.report().await?.location.kind)
    }

    pub async fn country(&self) -> Result<String> {
        Ok(self.report().await?.location.country)
    }

    pub async fn timezone(&self) -> Result<Timezone> {
        Ok(self.report().await?.location.timezone)
    }

    pub async fn coordinates(&self) -> Result<Coordinates> {
        Ok(self.report().await?.location.coordinates)
    }

    pub async fn sun(&self) -> Result<Sun> {
        Ok(self.report().await?.sun)
    }

    /// Sunrise formatted with `format`, or the configured date format.
    /// `None` when the sun does not rise that day.
    pub async fn sunrise(&self, format: Option<&str>) -> Result<Option<String>> {
        let sun = self.sun().await?;
        self.format_time(sun.rise, format)
    }

    /// Sunset formatted with `format`, or the configured date format.
    pub async fn sunset(&self, format: Option<&str>) -> Result<Option<String>> {
        let sun = self.sun().await?;
        self.format_time(sun.set, format)
    }

    pub async fn forecast(&self) -> Result<Vec<ForecastEntry>> {
        Ok(self.report().await?.forecast)
    }

    /// Up to three 12:00-18:00 forecasts, in document order.
    pub async fn forecast_next_three_days(&self) -> Result<Vec<ForecastEntry>> {
        Ok(next_three_middays(&self.forecast().await?))
    }

    /// The forecast as HTML tables, captions relative to the local date.
    pub async fn forecast_table(&self, style: &TableStyle) -> Result<String> {
        self.forecast_table_on(style, Local::now().date_naive()).await
    }

    pub async fn forecast_table_on(&self, style: &TableStyle, today: NaiveDate) -> Result<String> {
        let entries = self.forecast().await?;
        render_table(&entries, self.language, style, today)
    }

    fn format_time(&self, time: Option<NaiveDateTime>, format: Option<&str>) -> Result<Option<String>> {
        let format = match format {
            Some(f) => {
                validate_date_format(f)?;
                f
            }
            None => self.options.date_format.as_str(),
        };

        time.map(|t| format_timestamp(t, format)).transpose()
    }
}
