// Client for the external generative-language backend (Gemini REST API).
// The backend is consumed through a narrow contract: prompt + history in,
// a schema-constrained AiResponse out. Everything that can go wrong here is
// a BackendError; the orchestrator recovers from all of them locally.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use thiserror::Error;

use crate::config::Settings;
use crate::models::{AiResponse, ChatRole, ConversationTurn, Vehicle};

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

// System instruction for the chat assistant, mirrored from the product
// persona: a friendly used-car search navigator answering in Japanese.
const SYSTEM_INSTRUCTION: &str = "あなたは超未来的な中古車検索アシスタント「AI Car Navigator」です。親しみやすく、プロフェッショナルなトーンで対話してください。ユーザーの要望に基づいて中古車を提案します。\n\
- ユーザーの入力が車の検索に関する具体的な条件を含んでいる場合、'responseType'を'CAR_RESULTS'に設定し、条件に合う車を3〜5台提案してください。見つからない場合は、その旨を'message'に含め、'cars'配列は空にしてください。\n\
- 車両の比較依頼が来た場合は'responseType'を'CONVERSATION'とし、'message'に比較結果をMarkdown形式でまとめてください。\n\
- 挨拶や一般的な質問の場合は'responseType'を'CONVERSATION'に設定し、自然な会話を続けてください。'cars'配列は空にしてください。\n\
- 車両の画像URLは 'https://picsum.photos/seed/{ランダムな文字列}/800/600' の形式で生成してください。\n\
- 価格は万円単位の整数で返してください。\n\
- ユーザーの次の行動を予測し、'quickReplies'フィールドに3〜4個の選択肢を提示してください。";

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("generative backend is not configured (missing API key)")]
    NotConfigured,
    #[error("request to generative backend failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("generative backend returned status {0}")]
    Status(reqwest::StatusCode),
    #[error("generative backend returned an unusable payload: {0}")]
    MalformedResponse(String),
}

// Seam between the orchestrator and the real backend; tests substitute a
// stub that counts invocations.
#[async_trait]
pub trait GenerativeBackend: Send + Sync {
    async fn generate(
        &self,
        prompt: &str,
        history: &[ConversationTurn],
    ) -> Result<AiResponse, BackendError>;
}

#[derive(Clone)]
pub struct GeminiClient {
    http_client: Client,
    api_key: Option<String>,
    model: String,
}

impl GeminiClient {
    pub fn new(http_client: Client, settings: &Settings) -> Self {
        if settings.gemini_api_key.is_none() {
            tracing::warn!(
                "No Gemini API key configured; free-text queries will rely on local extraction only."
            );
        }
        GeminiClient {
            http_client,
            api_key: settings.gemini_api_key.clone(),
            model: settings.gemini_model.clone(),
        }
    }

    // JSON schema the backend must conform to (the AiResponse contract).
    fn response_schema() -> Value {
        let car_schema = json!({
            "type": "OBJECT",
            "properties": {
                "name": { "type": "STRING", "description": "車両のフルネーム (例: トヨタ プリウス S)" },
                "year": { "type": "INTEGER", "description": "年式 (西暦)" },
                "mileage": { "type": "INTEGER", "description": "走行距離 (km単位)" },
                "price": { "type": "NUMBER", "description": "価格 (万円単位)" },
                "imageUrl": { "type": "STRING", "description": "車両の画像URL" },
                "specs": {
                    "type": "OBJECT",
                    "properties": {
                        "engine": { "type": "STRING" },
                        "size": { "type": "STRING" },
                        "safety": { "type": "STRING" }
                    },
                    "required": ["engine", "size", "safety"]
                }
            },
            "required": ["name", "year", "mileage", "price", "imageUrl", "specs"]
        });

        json!({
            "type": "OBJECT",
            "properties": {
                "responseType": {
                    "type": "STRING",
                    "enum": ["CONVERSATION", "CAR_RESULTS"],
                    "description": "ユーザーの入力が一般的な会話か、車の検索クエリかを判断します。"
                },
                "message": { "type": "STRING", "description": "ユーザーへの応答メッセージ。" },
                "cars": { "type": "ARRAY", "items": car_schema },
                "quickReplies": { "type": "ARRAY", "items": { "type": "STRING" } }
            },
            "required": ["responseType", "message", "cars"]
        })
    }

    fn contents(prompt: &str, history: &[ConversationTurn]) -> Vec<Value> {
        let mut contents: Vec<Value> = history
            .iter()
            .map(|turn| {
                let role = match turn.role {
                    ChatRole::User => "user",
                    ChatRole::Model => "model",
                };
                json!({ "role": role, "parts": [{ "text": turn.text }] })
            })
            .collect();
        contents.push(json!({ "role": "user", "parts": [{ "text": prompt }] }));
        contents
    }

    // Sends one generateContent request and extracts the JSON text of the
    // first candidate. The response body nests the payload under
    // candidates[0].content.parts[0].text.
    async fn generate_json(
        &self,
        contents: Vec<Value>,
        system_instruction: &str,
        response_schema: Value,
    ) -> Result<String, BackendError> {
        let api_key = self.api_key.as_deref().ok_or(BackendError::NotConfigured)?;
        let url = format!("{}/{}:generateContent", GEMINI_API_BASE, self.model);

        let body = json!({
            "system_instruction": { "parts": [{ "text": system_instruction }] },
            "contents": contents,
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": response_schema,
                "temperature": 0.7,
                "maxOutputTokens": 2048
            }
        });

        let response = self
            .http_client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::Status(status));
        }

        let payload: Value = response.json().await?;
        payload["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| {
                BackendError::MalformedResponse("no candidate text in response".to_string())
            })
    }

    // Asks the backend for exactly three appeal points for a vehicle. Any
    // failure, or the wrong number of points, falls back to a fixed list;
    // this surface is decorative and must never error out.
    pub async fn selling_points(&self, vehicle: &Vehicle) -> Vec<String> {
        let fallback = || {
            vec![
                "魅力的なデザイン".to_string(),
                "快適なドライビング体験".to_string(),
                "充実した安全性能".to_string(),
            ]
        };

        let schema = json!({
            "type": "OBJECT",
            "properties": {
                "points": {
                    "type": "ARRAY",
                    "description": "車両の魅力を伝える3つのおすすめポイント",
                    "items": { "type": "STRING" }
                }
            },
            "required": ["points"]
        });

        let prompt = format!(
            "以下の車両情報に基づき、この車に興味を持ちそうな顧客に向けた、簡潔で魅力的な「おすすめポイント」を日本語で3つだけ作成してください。\n車両情報:\n- 車種: {}\n- 年式: {}年\n- 価格: {}万円\n- スペック: {}, {}",
            vehicle.name, vehicle.year, vehicle.price, vehicle.specs.engine, vehicle.specs.safety
        );
        let contents = vec![json!({ "role": "user", "parts": [{ "text": prompt }] })];
        let instruction =
            "あなたは優秀な自動車セールスライターです。指定された車両の最も魅力的な点を3つ、簡潔に要約してください。";

        let text = match self.generate_json(contents, instruction, schema).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("Failed to fetch selling points: {}", e);
                return fallback();
            }
        };

        #[derive(serde::Deserialize)]
        struct Points {
            points: Vec<String>,
        }
        match serde_json::from_str::<Points>(&text) {
            Ok(parsed) if parsed.points.len() == 3 => parsed.points,
            _ => fallback(),
        }
    }
}

#[async_trait]
impl GenerativeBackend for GeminiClient {
    async fn generate(
        &self,
        prompt: &str,
        history: &[ConversationTurn],
    ) -> Result<AiResponse, BackendError> {
        tracing::debug!(history_len = history.len(), "Delegating query to Gemini backend");

        let text = self
            .generate_json(
                Self::contents(prompt, history),
                SYSTEM_INSTRUCTION,
                Self::response_schema(),
            )
            .await?;

        let parsed: AiResponse = serde_json::from_str(&text)
            .map_err(|e| BackendError::MalformedResponse(e.to_string()))?;

        // Presence check only; the schema-constrained output is otherwise
        // trusted as canonical Vehicle shapes.
        if parsed.message.is_empty() {
            return Err(BackendError::MalformedResponse(
                "empty message field".to_string(),
            ));
        }

        Ok(parsed)
    }
}
