use axum::Json;
use serde::Serialize;

/// Liveness response, kept as `{"ok": "true"}` for existing probes.
#[derive(Debug, Serialize)]
pub struct Liveness {
    ok: &'static str,
}

/// GET / - Liveness check
pub async fn liveness() -> Json<Liveness> {
    Json(Liveness { ok: "true" })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_liveness_body() {
        let Json(body) = liveness().await;
        assert_eq!(serde_json::to_value(body).unwrap(), serde_json::json!({"ok": "true"}));
    }
}
