use thiserror::Error;

/// Failure talking to the BaaS. Propagated unchanged up to the views.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataError {
    #[error("Falha de conexão: {0}")]
    Network(String),

    #[error("Erro {status} do servidor: {message}")]
    Http { status: u16, message: String },

    #[error("Resposta inesperada do servidor: {0}")]
    Decode(String),

    #[error("Sessão expirada, entre novamente")]
    NotAuthenticated,
}

impl DataError {
    /// Map a non-2xx response. 401/403 end the session.
    pub fn from_status(status: u16, body: &str) -> Self {
        if status == 401 || status == 403 {
            return DataError::NotAuthenticated;
        }
        DataError::Http {
            status,
            message: extract_message(body),
        }
    }
}

/// PostgREST puts the reason in `message`; fall back to the raw body
fn extract_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("message")
                .or_else(|| v.get("msg"))
                .and_then(|m| m.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.trim().chars().take(200).collect())
}
