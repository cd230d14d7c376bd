use std::time::Duration;

use assert_matches::assert_matches;
use okuru_navi::domain::analysis::{fallback_profit_analysis, FALLBACK_CONFIDENCE};
use okuru_navi::domain::{
    AnalysisOutcome, AnalysisRequest, AnalysisType, DiagnosisSettings, ProductForm, ProductInfo,
    ShippingResolver, UserPreferences,
};
use okuru_navi::infra::AnalysisService;
use okuru_navi::util::config::{AiSettings, AppConfig};

fn request() -> AnalysisRequest {
    let product = ProductInfo::from_form(&ProductForm {
        category: "衣類".into(),
        length: "30".into(),
        width: "20".into(),
        thickness: "8".into(),
        weight: "1200".into(),
        destination: "福岡県".into(),
        ..ProductForm::default()
    });
    let shipping_options = ShippingResolver::default()
        .diagnose_info(&product, &DiagnosisSettings::default())
        .options;
    AnalysisRequest {
        product,
        shipping_options,
        preferences: UserPreferences::default(),
    }
}

#[tokio::test]
async fn missing_api_key_returns_canned_advice() {
    let service = AnalysisService::from_config(&AppConfig::default()).unwrap();
    let outcome = service.run(&request(), AnalysisType::Comprehensive).await;

    let (result, reason) =
        assert_matches!(outcome, AnalysisOutcome::Fallback { result, reason } => (result, reason));
    assert!(reason.contains("no API key configured"));
    assert_eq!(result.profit_analysis, fallback_profit_analysis());
    assert_eq!(result.confidence, FALLBACK_CONFIDENCE);
    assert!(result.analysis_id.starts_with("analysis_"));
}

#[tokio::test]
async fn unreachable_endpoint_is_bounded_and_recovers() {
    let config = AppConfig {
        ai: AiSettings {
            api_key: Some("sk-test".to_string()),
            endpoint: "http://127.0.0.1:9/v1".to_string(),
            timeout_secs: 2,
            ..AiSettings::default()
        },
        ..AppConfig::default()
    };
    let service = AnalysisService::from_config(&config).unwrap();

    let outcome = tokio::time::timeout(
        Duration::from_secs(10),
        service.run(&request(), AnalysisType::Market),
    )
    .await
    .expect("analysis must finish within its own timeout");

    assert!(outcome.is_fallback());
    assert_eq!(outcome.result().confidence, FALLBACK_CONFIDENCE);
}
