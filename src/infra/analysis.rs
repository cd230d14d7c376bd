//! Runs the AI advice prompts against a completion backend.
//!
//! - Sections are requested concurrently and each one is bounded by a timeout.
//! - Any failed section is replaced by canned content; the caller always gets a result.

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use thiserror::Error;
use time::OffsetDateTime;
use tracing::{info, warn};

use crate::domain::analysis::{
    confidence_for, fallback_market_insights, fallback_packaging_advice, fallback_profit_analysis,
    fallback_risk_assessment, parse_section, AIAnalysisResult, AnalysisOutcome, AnalysisRequest,
    AnalysisType, MarketInsights, PackagingAdvice, ProfitAnalysis, RiskAssessment, RiskTolerance,
};
use crate::infra::openai::{CompletionBackend, OpenAiClient, OpenAiClientError};
use crate::util::config::AppConfig;

/// Sale price assumed in the profit prompt when the seller gave none.
const ASSUMED_SALE_PRICE: u32 = 1500;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("no answer within {0:?}")]
    Timeout(Duration),
    #[error(transparent)]
    Client(#[from] OpenAiClientError),
    #[error("unreadable answer: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Clone)]
pub struct AnalysisService {
    backend: Arc<dyn CompletionBackend>,
    timeout: Duration,
}

impl AnalysisService {
    pub fn new(backend: Arc<dyn CompletionBackend>, timeout: Duration) -> Self {
        Self { backend, timeout }
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, OpenAiClientError> {
        let client = OpenAiClient::new(&config.ai)?;
        if !client.has_api_key() {
            warn!("no OpenAI API key configured; analysis will return canned advice");
        }
        Ok(Self::new(
            Arc::new(client),
            Duration::from_secs(config.ai.timeout_secs.max(1)),
        ))
    }

    pub async fn run(&self, request: &AnalysisRequest, kind: AnalysisType) -> AnalysisOutcome {
        let requested = kind.sections();
        let wants = |section: AnalysisType| requested.contains(&section);
        info!(
            analysis = kind.as_str(),
            category = %request.product.category,
            options = request.shipping_options.len(),
            "starting AI analysis"
        );

        let (profit, risk, packaging, market) = tokio::join!(
            self.section::<ProfitAnalysis>(
                AnalysisType::Profit,
                wants(AnalysisType::Profit).then(|| profit_prompt(request)),
            ),
            self.section::<RiskAssessment>(
                AnalysisType::Risk,
                wants(AnalysisType::Risk).then(|| risk_prompt(request)),
            ),
            self.section::<PackagingAdvice>(
                AnalysisType::Packaging,
                wants(AnalysisType::Packaging).then(|| packaging_prompt(request)),
            ),
            self.section::<MarketInsights>(
                AnalysisType::Market,
                wants(AnalysisType::Market).then(|| market_prompt(request)),
            ),
        );

        let mut tally = Tally::default();
        let profit = tally.settle(AnalysisType::Profit, profit, fallback_profit_analysis);
        let risk = tally.settle(AnalysisType::Risk, risk, fallback_risk_assessment);
        let packaging = tally.settle(AnalysisType::Packaging, packaging, fallback_packaging_advice);
        let market = tally.settle(AnalysisType::Market, market, fallback_market_insights);

        let confidence = confidence_for(tally.answered, requested.len());
        let result = AIAnalysisResult::assemble(profit, risk, packaging, market, confidence);

        if tally.failures.is_empty() {
            info!(analysis_id = %result.analysis_id, confidence, "AI analysis completed");
            AnalysisOutcome::Completed(result)
        } else {
            let reason = tally.failures.join("; ");
            warn!(analysis_id = %result.analysis_id, %reason, "AI analysis fell back to canned advice");
            AnalysisOutcome::Fallback { result, reason }
        }
    }

    /// `None` when the section was not requested.
    async fn section<T>(
        &self,
        kind: AnalysisType,
        prompt: Option<String>,
    ) -> Option<Result<T, AnalysisError>>
    where
        T: DeserializeOwned,
    {
        let prompt = prompt?;
        Some(self.ask(&system_prompt(kind), &prompt).await)
    }

    async fn ask<T>(&self, system: &str, prompt: &str) -> Result<T, AnalysisError>
    where
        T: DeserializeOwned,
    {
        let raw = tokio::time::timeout(self.timeout, self.backend.complete(system, prompt))
            .await
            .map_err(|_| AnalysisError::Timeout(self.timeout))??;
        Ok(parse_section(&raw)?)
    }
}

#[derive(Default)]
struct Tally {
    answered: usize,
    failures: Vec<String>,
}

impl Tally {
    fn settle<T>(
        &mut self,
        kind: AnalysisType,
        outcome: Option<Result<T, AnalysisError>>,
        fallback: fn() -> T,
    ) -> T {
        match outcome {
            Some(Ok(section)) => {
                self.answered += 1;
                section
            }
            Some(Err(error)) => {
                warn!(section = kind.as_str(), %error, "AI section failed; using canned content");
                self.failures.push(format!("{}: {error}", kind.as_str()));
                fallback()
            }
            None => fallback(),
        }
    }
}

const BASE_SYSTEM_PROMPT: &str = "あなたは日本のフリマ市場（メルカリ、ヤフオク等）に精通した物流・配送コンサルタントです。
実際の配送業界での豊富な経験を持ち、フリマ出品者の利益最大化を専門としています。
回答は必ずJSON形式で、具体的で実践的なアドバイスを提供してください。";

fn system_prompt(kind: AnalysisType) -> String {
    let focus = match kind {
        AnalysisType::Profit => {
            "特に利益最大化、コスト削減、価格戦略に関する専門知識を活用して分析してください。
メルカリ手数料10%、ヤフオク手数料8.8%を考慮した実際の手取り計算を行ってください。"
        }
        AnalysisType::Risk => {
            "特に配送リスク管理、破損・遅延・紛失の予防に関する専門知識を活用してください。
過去の配送事故事例や季節要因も考慮した実践的なリスク評価を行ってください。"
        }
        AnalysisType::Packaging => {
            "特に梱包材の選定、コスト効率、商品保護に関する専門知識を活用してください。
100円ショップやネット通販で入手可能な材料を中心とした現実的な提案をしてください。"
        }
        AnalysisType::Market => {
            "特にフリマ市場の動向、価格戦略、購買行動に関する専門知識を活用してください。
実際の取引データに基づいた市場分析と戦略提案を行ってください。"
        }
        AnalysisType::Comprehensive => {
            "利益最大化、リスク管理、梱包最適化、市場戦略の全ての観点から総合的に分析してください。"
        }
    };
    format!("{BASE_SYSTEM_PROMPT}\n{focus}")
}

fn today() -> String {
    let date = OffsetDateTime::now_utc().date();
    format!("{}/{}/{}", date.year(), u8::from(date.month()), date.day())
}

fn dimensions(request: &AnalysisRequest) -> String {
    let product = &request.product;
    format!(
        "サイズ: {}×{}×{}cm\n重量: {}g",
        product.length, product.width, product.thickness, product.weight
    )
}

fn preference_notes(request: &AnalysisRequest) -> String {
    let preferences = &request.preferences;
    let mut notes = Vec::new();
    if preferences.prioritize_speed {
        notes.push("配送スピード重視");
    }
    if preferences.prioritize_cost {
        notes.push("送料の安さ重視");
    }
    notes.push(match preferences.risk_tolerance {
        RiskTolerance::Low => "リスク許容度: 低",
        RiskTolerance::Medium => "リスク許容度: 中",
        RiskTolerance::High => "リスク許容度: 高",
    });
    notes.join(" / ")
}

fn profit_prompt(request: &AnalysisRequest) -> String {
    let product = &request.product;
    let sale_price = product.sale_price.unwrap_or(ASSUMED_SALE_PRICE);
    let options = request
        .shipping_options
        .iter()
        .enumerate()
        .map(|(index, option)| {
            format!(
                "{}. {}: ¥{} ({})",
                index + 1,
                option.name,
                option.price,
                option.delivery_days
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "フリマ配送の利益最大化エキスパートとして、以下の商品の配送戦略を分析してください。

【商品情報】
カテゴリ: {category}
{dimensions}
配送先: {destination}
出品者の希望: {preferences}

【配送オプション】
{options}

以下のJSONフォーマットで回答してください：
{{
  \"currentProfit\": 売価{sale_price}円での現在利益（数値）,
  \"optimizedProfit\": 最適化後の予想利益（数値）,
  \"improvements\": [\"具体的な改善提案1\", \"具体的な改善提案2\", \"具体的な改善提案3\"],
  \"costSavings\": 節約可能金額（数値）,
  \"priceRecommendation\": \"最適な販売価格設定の提案\",
  \"competitiveAdvantage\": \"競合との差別化ポイント\"
}}

フリマ初心者にも分かりやすく、具体的な数値と実践的なアドバイスを含めてください。",
        category = product.category,
        dimensions = dimensions(request),
        destination = product.destination,
        preferences = preference_notes(request),
    )
}

fn risk_prompt(request: &AnalysisRequest) -> String {
    let product = &request.product;
    let method = request
        .shipping_options
        .first()
        .map(|option| option.name.as_str())
        .unwrap_or("未定");

    format!(
        "物流リスク管理の専門家として、以下の配送のリスクを分析してください。

【商品・配送情報】
商品: {category}
{dimensions}
配送方法: {method}
配送先: {destination}
時期: {date}
出品者の希望: {preferences}

以下のJSONフォーマットで回答してください：
{{
  \"damageRisk\": 破損リスク度（1-10の数値）,
  \"delayRisk\": 遅延リスク度（1-10の数値）,
  \"lossRisk\": 紛失リスク度（1-10の数値）,
  \"overallRisk\": 総合リスク度（1-10の数値）,
  \"riskFactors\": [\"主要リスク要因1\", \"主要リスク要因2\"],
  \"preventionTips\": [\"具体的な予防策1\", \"具体的な予防策2\", \"具体的な予防策3\"],
  \"seasonalConsiderations\": [\"季節的な注意点1\", \"季節的な注意点2\"]
}}

過去の配送事故事例も考慮し、実践的で具体的なアドバイスをお願いします。",
        category = product.category,
        dimensions = dimensions(request),
        destination = product.destination,
        date = today(),
        preferences = preference_notes(request),
    )
}

fn packaging_prompt(request: &AnalysisRequest) -> String {
    format!(
        "梱包エキスパートとして、以下の商品の最適な梱包方法を提案してください。

【商品情報】
カテゴリ: {category}
{dimensions}

以下のJSONフォーマットで回答してください：
{{
  \"recommendedMaterials\": [\"推奨梱包材1\", \"推奨梱包材2\", \"推奨梱包材3\"],
  \"costEffectiveSolutions\": [\"コスト重視の梱包方法1\", \"コスト重視の梱包方法2\"],
  \"sustainabilityTips\": [\"環境配慮のアドバイス1\", \"環境配慮のアドバイス2\"],
  \"sizingTips\": [\"サイズ最適化のコツ1\", \"サイズ最適化のコツ2\"],
  \"budgetBreakdown\": [{{\"material\": \"梱包材名\", \"cost\": 概算コスト（数値）, \"durability\": \"耐久性評価\"}}]
}}

100円ショップやネット通販で入手可能な材料を中心に、実用的で具体的な提案をお願いします。",
        category = request.product.category,
        dimensions = dimensions(request),
    )
}

fn market_prompt(request: &AnalysisRequest) -> String {
    format!(
        "フリマ市場分析の専門家として、以下の商品の市場戦略を分析してください。

【商品情報】
カテゴリ: {category}
配送先: {destination}
現在時期: {date}

以下のJSONフォーマットで回答してください：
{{
  \"competitiveAdvantage\": \"この商品の競合優位性\",
  \"pricingStrategy\": \"最適な価格戦略\",
  \"timingAdvice\": \"発送・出品タイミングの提案\",
  \"seasonalTrends\": \"季節トレンドの影響\",
  \"buyerBehavior\": \"購入者行動の特徴\",
  \"demandForecast\": \"需要予測と販売戦略\"
}}

メルカリ、ヤフオクでの実際の取引事例を考慮し、データに基づいた実践的なアドバイスをお願いします。",
        category = request.product.category,
        destination = request.product.destination,
        date = today(),
    )
}
