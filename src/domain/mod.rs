//! Shipping-rate resolution, profit math and AI advice types. No I/O lives here.

pub mod analysis;
pub mod catalog;
pub mod eligibility;
pub mod entities;
pub mod input;
pub mod profit;
pub mod rates;
pub mod region;
pub mod resolver;
pub mod size;

#[allow(unused_imports)]
pub use analysis::{
    AIAnalysisResult, AnalysisOutcome, AnalysisRequest, AnalysisType, MarketInsights,
    PackagingAdvice, ProfitAnalysis, RiskAssessment, RiskTolerance, UserPreferences,
};
#[allow(unused_imports)]
pub use catalog::{service_by_id, Provider, ShippingService, SERVICES};
#[allow(unused_imports)]
pub use entities::{ShippingOption, ShippingResult, ShippingSummary};
#[allow(unused_imports)]
pub use input::{validate_form, ProductForm, ProductInfo, ValidationReport};
#[allow(unused_imports)]
pub use profit::{compute_profit, Platform, ProfitBreakdown};
#[allow(unused_imports)]
pub use region::{correct_prefecture, distance_bucket, region_of, DistanceBucket, Region};
#[allow(unused_imports)]
pub use resolver::{fallback_options, DiagnosisSettings, ShippingRequest, ShippingResolver};
#[allow(unused_imports)]
pub use size::{size_category, Parcel, SizeCode};
