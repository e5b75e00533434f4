use once_cell::sync::Lazy;
use opentelemetry::{
    global,
    metrics::{Counter, Histogram, MeterProvider},
};
use opentelemetry_sdk::metrics::SdkMeterProvider;
use prometheus::{Registry, TextEncoder};

pub static METRICS: Lazy<SearchMetrics> = Lazy::new(SearchMetrics::init);

pub struct SearchMetrics {
    registry: Registry,
    /// `None` when the exporter could not be built; instruments then go to the global meter.
    _provider: Option<SdkMeterProvider>,
    pub searches_total: Counter<u64>,
    pub conditions_applied_total: Counter<u64>,
    pub unknown_conditions_total: Counter<u64>,
    pub compose_duration: Histogram<f64>,
}

impl SearchMetrics {
    pub fn init() -> Self {
        let registry = Registry::new();
        let exporter = opentelemetry_prometheus::exporter()
            .with_registry(registry.clone())
            .build();
        let (provider, meter) = match exporter {
            Ok(exporter) => {
                let provider = SdkMeterProvider::builder().with_reader(exporter).build();
                let meter = provider.meter("scoped_search");
                (Some(provider), meter)
            }
            Err(e) => {
                log::warn!("failed to build prometheus exporter: {}", e);
                (None, global::meter("scoped_search"))
            }
        };

        let searches_total = meter.u64_counter("scoped_search_searches_total")
            .with_description("Total searches composed").build();

        let conditions_applied_total = meter.u64_counter("scoped_search_conditions_applied_total")
            .with_description("Scope calls applied while composing searches").build();

        let unknown_conditions_total = meter.u64_counter("scoped_search_unknown_conditions_total")
            .with_description("Condition names rejected at assignment").build();

        let compose_duration = meter.f64_histogram("scoped_search_compose_duration_seconds")
            .with_description("Duration of search composition").build();

        Self {
            registry,
            _provider: provider,
            searches_total,
            conditions_applied_total,
            unknown_conditions_total,
            compose_duration,
        }
    }

    pub fn record_compose(&self, elapsed: std::time::Duration, applied: usize) {
        self.searches_total.add(1, &[]);
        self.conditions_applied_total.add(applied as u64, &[]);
        self.compose_duration.record(elapsed.as_secs_f64(), &[]);
    }

    pub fn record_unknown_condition(&self) {
        self.unknown_conditions_total.add(1, &[]);
    }

    /// Current metrics in the Prometheus text exposition format.
    pub fn render(&self) -> String {
        let mut out = String::new();
        if let Err(e) = TextEncoder::new().encode_utf8(&self.registry.gather(), &mut out) {
            log::warn!("failed to encode metrics: {}", e);
        }
        out
    }
}
