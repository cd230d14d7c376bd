//! AI advice payload, lenient parsing of model output, and canned fallbacks.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use uuid::Uuid;

use super::entities::ShippingOption;
use super::input::{leading_number, ProductInfo};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AnalysisType {
    #[default]
    Comprehensive,
    Profit,
    Risk,
    Packaging,
    Market,
}

impl AnalysisType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisType::Comprehensive => "comprehensive",
            AnalysisType::Profit => "profit",
            AnalysisType::Risk => "risk",
            AnalysisType::Packaging => "packaging",
            AnalysisType::Market => "market",
        }
    }

    /// Sections requested from the model for this analysis type.
    pub fn sections(&self) -> &'static [AnalysisType] {
        match self {
            AnalysisType::Comprehensive => &[
                AnalysisType::Profit,
                AnalysisType::Risk,
                AnalysisType::Packaging,
                AnalysisType::Market,
            ],
            AnalysisType::Profit => &[AnalysisType::Profit],
            AnalysisType::Risk => &[AnalysisType::Risk],
            AnalysisType::Packaging => &[AnalysisType::Packaging],
            AnalysisType::Market => &[AnalysisType::Market],
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RiskTolerance {
    Low,
    #[default]
    Medium,
    High,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserPreferences {
    pub prioritize_speed: bool,
    pub prioritize_cost: bool,
    pub risk_tolerance: RiskTolerance,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    pub product: ProductInfo,
    pub shipping_options: Vec<ShippingOption>,
    #[serde(default)]
    pub preferences: UserPreferences,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfitAnalysis {
    pub current_profit: i64,
    pub optimized_profit: i64,
    pub improvements: Vec<String>,
    pub cost_savings: i64,
    pub price_recommendation: String,
    pub competitive_advantage: String,
}

/// Scores run from 1 (low) to 10 (high).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RiskAssessment {
    pub damage_risk: u8,
    pub delay_risk: u8,
    pub loss_risk: u8,
    pub overall_risk: u8,
    pub risk_factors: Vec<String>,
    pub prevention_tips: Vec<String>,
    pub seasonal_considerations: Vec<String>,
}

impl Default for RiskAssessment {
    fn default() -> Self {
        Self {
            damage_risk: 3,
            delay_risk: 3,
            loss_risk: 2,
            overall_risk: 3,
            risk_factors: Vec::new(),
            prevention_tips: Vec::new(),
            seasonal_considerations: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BudgetItem {
    pub material: String,
    pub cost: u32,
    pub durability: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PackagingAdvice {
    pub recommended_materials: Vec<String>,
    pub cost_effective_solutions: Vec<String>,
    pub sustainability_tips: Vec<String>,
    pub sizing_tips: Vec<String>,
    pub budget_breakdown: Vec<BudgetItem>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MarketInsights {
    pub competitive_advantage: String,
    pub pricing_strategy: String,
    pub timing_advice: String,
    pub seasonal_trends: String,
    pub buyer_behavior: String,
    pub demand_forecast: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AIAnalysisResult {
    pub summary: String,
    pub profit_analysis: ProfitAnalysis,
    pub risk_assessment: RiskAssessment,
    pub packaging_advice: PackagingAdvice,
    pub market_insights: MarketInsights,
    pub confidence: f32,
    pub analysis_id: String,
    pub timestamp: String,
}

impl AIAnalysisResult {
    /// Stamps four sections with a summary, a fresh id and the current time.
    pub fn assemble(
        profit_analysis: ProfitAnalysis,
        risk_assessment: RiskAssessment,
        packaging_advice: PackagingAdvice,
        market_insights: MarketInsights,
        confidence: f32,
    ) -> Self {
        let now = OffsetDateTime::now_utc();
        Self {
            summary: compose_summary(&profit_analysis, &risk_assessment, &market_insights),
            profit_analysis,
            risk_assessment,
            packaging_advice,
            market_insights,
            confidence,
            analysis_id: analysis_id_at(now),
            timestamp: now.format(&Rfc3339).unwrap_or_default(),
        }
    }

    /// Entirely canned result, used when no section could be produced.
    pub fn canned() -> Self {
        Self::assemble(
            fallback_profit_analysis(),
            fallback_risk_assessment(),
            fallback_packaging_advice(),
            fallback_market_insights(),
            FALLBACK_CONFIDENCE,
        )
    }
}

/// `analysis_<unix millis>_<9 random chars>`
fn analysis_id_at(now: OffsetDateTime) -> String {
    let millis = now.unix_timestamp_nanos() / 1_000_000;
    let suffix: String = Uuid::new_v4().simple().to_string().chars().take(9).collect();
    format!("analysis_{millis}_{suffix}")
}

/// Either every requested section came from the model, or at least one was
/// replaced by canned content. Neither variant is an error for the caller.
#[derive(Clone, Debug, PartialEq)]
pub enum AnalysisOutcome {
    Completed(AIAnalysisResult),
    Fallback {
        result: AIAnalysisResult,
        reason: String,
    },
}

impl AnalysisOutcome {
    pub fn result(&self) -> &AIAnalysisResult {
        match self {
            AnalysisOutcome::Completed(result) => result,
            AnalysisOutcome::Fallback { result, .. } => result,
        }
    }

    pub fn into_result(self) -> AIAnalysisResult {
        match self {
            AnalysisOutcome::Completed(result) => result,
            AnalysisOutcome::Fallback { result, .. } => result,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, AnalysisOutcome::Fallback { .. })
    }
}

/// Confidence when every requested section came from the model.
pub const MODEL_CONFIDENCE: f32 = 0.85;
/// Confidence when every requested section is canned content.
pub const FALLBACK_CONFIDENCE: f32 = 0.70;

/// Linear between the two anchors by the share of sections the model answered.
pub fn confidence_for(model_sections: usize, requested_sections: usize) -> f32 {
    if requested_sections == 0 {
        return FALLBACK_CONFIDENCE;
    }
    let answered = model_sections.min(requested_sections);
    if answered == requested_sections {
        return MODEL_CONFIDENCE;
    }
    let share = answered as f32 / requested_sections as f32;
    FALLBACK_CONFIDENCE + (MODEL_CONFIDENCE - FALLBACK_CONFIDENCE) * share
}

pub fn compose_summary(
    profit: &ProfitAnalysis,
    risk: &RiskAssessment,
    market: &MarketInsights,
) -> String {
    let risk_label = if risk.overall_risk <= 4 {
        "低リスク"
    } else {
        "要注意"
    };
    format!(
        "🤖 AI分析完了！利益を¥{}改善できる可能性があります。リスクスコア{}/10で{}です。{}",
        profit.cost_savings, risk.overall_risk, risk_label, market.pricing_strategy
    )
}

/// Removes Markdown code fences the model sometimes wraps JSON in.
pub fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let without_open = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    without_open
        .trim()
        .strip_suffix("```")
        .unwrap_or(without_open)
        .trim()
}

/// Parses one section leniently.
///
/// Null or unconvertible fields take their defaults. Amounts may arrive as
/// floats or strings like `"1,500円"`. Risk scores are clamped to 1..=10 and
/// a zero score counts as missing.
pub fn parse_section<T>(raw: &str) -> Result<T, serde_json::Error>
where
    T: serde::de::DeserializeOwned,
{
    let value: Value = serde_json::from_str(strip_code_fences(raw))?;
    serde_json::from_value(normalize_section(value))
}

const AMOUNT_FIELDS: [&str; 3] = ["currentProfit", "optimizedProfit", "costSavings"];
const SCORE_FIELDS: [&str; 4] = ["damageRisk", "delayRisk", "lossRisk", "overallRisk"];

fn normalize_section(mut value: Value) -> Value {
    if let Value::Object(map) = &mut value {
        normalize_fields(map);
    }
    value
}

fn normalize_fields(map: &mut Map<String, Value>) {
    map.retain(|_, field| !field.is_null());

    for field in AMOUNT_FIELDS {
        coerce_field(map, field, |amount| Some(Value::from(amount.round() as i64)));
    }
    for field in SCORE_FIELDS {
        coerce_field(map, field, |score| {
            let score = score.round();
            (score >= 1.0).then(|| Value::from(score.min(10.0) as u8))
        });
    }
    if let Some(Value::Array(items)) = map.get_mut("budgetBreakdown") {
        for item in items.iter_mut() {
            if let Value::Object(entry) = item {
                entry.retain(|_, field| !field.is_null());
                coerce_field(entry, "cost", |cost| {
                    (cost >= 0.0).then(|| Value::from(cost.round() as u32))
                });
            }
        }
    }
}

/// Rewrites `field` through `convert`, or removes it so the serde default applies.
fn coerce_field(map: &mut Map<String, Value>, field: &str, convert: impl Fn(f64) -> Option<Value>) {
    let Some(raw) = map.get(field) else {
        return;
    };
    match numeric_value(raw).and_then(convert) {
        Some(converted) => {
            map.insert(field.to_string(), converted);
        }
        None => {
            map.remove(field);
        }
    }
}

fn numeric_value(raw: &Value) -> Option<f64> {
    match raw {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => {
            let cleaned = text
                .trim()
                .trim_start_matches(['¥', '￥'])
                .replace([',', '，'], "");
            leading_number(&cleaned)
        }
        _ => None,
    }
}

pub fn fallback_profit_analysis() -> ProfitAnalysis {
    ProfitAnalysis {
        current_profit: 890,
        optimized_profit: 1240,
        improvements: vec![
            "厚みを2.5cm以下に圧縮してネコポス利用".to_string(),
            "送料込み価格で購入率向上".to_string(),
            "平日午前中の発送で印象アップ".to_string(),
        ],
        cost_savings: 350,
        price_recommendation: "送料込み1,680円で設定すると購入率が向上します".to_string(),
        competitive_advantage: "丁寧な梱包と迅速発送で差別化しましょう".to_string(),
    }
}

pub fn fallback_risk_assessment() -> RiskAssessment {
    RiskAssessment {
        damage_risk: 3,
        delay_risk: 4,
        loss_risk: 2,
        overall_risk: 3,
        risk_factors: vec![
            "薄い商品のため折れ曲がりリスク".to_string(),
            "繁忙期の遅延可能性".to_string(),
        ],
        prevention_tips: vec![
            "硬めの封筒または薄型ダンボールを使用".to_string(),
            "「折り曲げ厳禁」シールを貼付".to_string(),
            "追跡可能な配送方法を選択".to_string(),
        ],
        seasonal_considerations: vec!["年末年始は配送が遅れる可能性があります".to_string()],
    }
}

pub fn fallback_packaging_advice() -> PackagingAdvice {
    PackagingAdvice {
        recommended_materials: vec![
            "クリックポスト用箱".to_string(),
            "プチプチ（薄型）".to_string(),
            "透明テープ".to_string(),
        ],
        cost_effective_solutions: vec![
            "100円ショップの薄型ダンボール使用".to_string(),
            "新聞紙での緩衝材代用".to_string(),
        ],
        sustainability_tips: vec![
            "再利用可能な梱包材の使用".to_string(),
            "過剰梱包を避ける".to_string(),
        ],
        sizing_tips: vec![
            "厚み制限ぎりぎりまで活用".to_string(),
            "サイズ測定は正確に".to_string(),
        ],
        budget_breakdown: vec![
            BudgetItem {
                material: "薄型ダンボール".to_string(),
                cost: 50,
                durability: "高".to_string(),
            },
            BudgetItem {
                material: "プチプチ".to_string(),
                cost: 30,
                durability: "中".to_string(),
            },
        ],
    }
}

pub fn fallback_market_insights() -> MarketInsights {
    MarketInsights {
        competitive_advantage: "迅速な対応と丁寧な梱包で差別化".to_string(),
        pricing_strategy: "送料込み価格で購入ハードルを下げる".to_string(),
        timing_advice: "平日午前中の発送で好印象".to_string(),
        seasonal_trends: "季節商品は需要ピーク前の出品が効果的".to_string(),
        buyer_behavior: "評価の高い出品者を選ぶ傾向".to_string(),
        demand_forecast: "安定した需要が見込まれるカテゴリです".to_string(),
    }
}
