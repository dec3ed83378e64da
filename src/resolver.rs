// Query resolution orchestrator: the composition root of the core. Free
// text goes through the local fast path first (intent extraction +
// structured search); only queries the deterministic path cannot resolve
// are delegated to the generative backend. Sequential local-then-remote,
// never a race: the backend costs latency and money, the catalog does not.
//
// resolve() is infallible by contract. Every backend failure is swallowed
// into a fixed apologetic response.

use serde::Serialize;

use crate::gemini::GenerativeBackend;
use crate::intent::{extract, Intent};
use crate::models::{ConversationTurn, RawInventoryRecord, Vehicle};
use crate::sample::sample;
use crate::search::search;

// Maximum vehicles returned on the chat surface.
const CHAT_RESULT_LIMIT: usize = 5;
const RECOMMEND_COUNT: usize = 5;

const EMPTY_QUERY_MESSAGE: &str =
    "検索条件を入力してください。メーカー名や予算（例: 100万円以内）で探せます。";
const RECOMMEND_MESSAGE: &str = "おすすめの車両をご紹介します！気になる車はありますか？";
const FALLBACK_MESSAGE: &str =
    "すみません、現在システムに問題が発生しています。後ほど再度お試しください。";

// The sole result shape the UI layer consumes for free-text queries.
#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Resolution {
    pub message: String,
    pub vehicles: Vec<Vehicle>,
    pub quick_replies: Vec<String>,
}

fn local_result_replies() -> Vec<String> {
    vec![
        "詳細を見る".to_string(),
        "他の条件で検索".to_string(),
        "問い合わせする".to_string(),
    ]
}

fn fallback_resolution() -> Resolution {
    Resolution {
        message: FALLBACK_MESSAGE.to_string(),
        vehicles: Vec::new(),
        quick_replies: vec!["もう一度試す".to_string(), "条件を変更する".to_string()],
    }
}

// Resolves one free-text query against the catalog, falling back to the
// generative backend for anything the local heuristics cannot answer.
pub async fn resolve(
    free_text: &str,
    history: &[ConversationTurn],
    catalog: &[RawInventoryRecord],
    backend: &dyn GenerativeBackend,
) -> Resolution {
    let trimmed = free_text.trim();
    if trimmed.is_empty() {
        return Resolution {
            message: EMPTY_QUERY_MESSAGE.to_string(),
            vehicles: Vec::new(),
            quick_replies: Vec::new(),
        };
    }

    match extract(trimmed) {
        Intent::Recommend => {
            let vehicles = sample(catalog, RECOMMEND_COUNT);
            tracing::info!(count = vehicles.len(), "Resolved locally via recommendation feed");
            return Resolution {
                message: RECOMMEND_MESSAGE.to_string(),
                vehicles,
                quick_replies: local_result_replies(),
            };
        }
        Intent::Criteria(criteria) => {
            let mut vehicles = search(catalog, &criteria);
            if !vehicles.is_empty() {
                vehicles.truncate(CHAT_RESULT_LIMIT);
                tracing::info!(
                    count = vehicles.len(),
                    "Resolved locally via structured search"
                );
                return Resolution {
                    message: format!("条件に合う車両を{}台見つけました。", vehicles.len()),
                    vehicles,
                    quick_replies: local_result_replies(),
                };
            }
            // Extractable criteria but zero local matches: let the backend
            // try a broader interpretation.
            tracing::debug!(?criteria, "Local search empty, delegating to backend");
        }
        Intent::Unresolved => {
            tracing::debug!("No extractable criteria, delegating to backend");
        }
    }

    match backend.generate(trimmed, history).await {
        Ok(response) => Resolution {
            message: response.message,
            vehicles: response.cars,
            quick_replies: response.quick_replies.unwrap_or_default(),
        },
        Err(e) => {
            tracing::warn!("Generative backend failed, serving fallback response: {}", e);
            fallback_resolution()
        }
    }
}
