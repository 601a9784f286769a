use crate::core::client::PortalApiClient;
use crate::domain::model::ConnectivityReport;
use crate::domain::ports::HttpTransport;
use chrono::Utc;

pub async fn test_connectivity<T: HttpTransport>(client: &PortalApiClient<T>) -> ConnectivityReport {
    tracing::info!("🔍 Testing connectivity to {}", client.portal_url());

    let accessible = client.validate_accessibility().await;
    let metadata = client.metadata();

    let report = ConnectivityReport {
        portal: client.portal_url().to_string(),
        domain: client.portal_domain().to_string(),
        accessible,
        metadata,
        checked_at: Utc::now(),
    };

    tracing::info!(
        "📊 Connectivity check finished: accessible={} at {}",
        report.accessible,
        report.checked_at
    );
    report
}
