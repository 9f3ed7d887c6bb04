use thiserror::Error;

use crate::service_client::ServiceError;

/// Application-level error type.
/// Every fallible pipeline operation returns `Result<T, AppError>`; the UI turns it
/// into a visible message with `user_message`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Service error (status {status}): {message}")]
    Service { status: u16, message: String },

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Render error: {0}")]
    Render(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// Stable machine-readable code for the variant.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::InvalidInput(_) => "INVALID_INPUT",
            AppError::Network(_) => "NETWORK_ERROR",
            AppError::Service { .. } => "SERVICE_ERROR",
            AppError::Decode(_) => "DECODE_ERROR",
            AppError::Render(_) => "RENDER_ERROR",
            AppError::Io(_) => "IO_ERROR",
        }
    }

    /// Message shown to the user. Input errors carry their own detail; transport
    /// and service failures collapse into the generic evaluation message.
    pub fn user_message(&self) -> String {
        match self {
            AppError::InvalidInput(msg) => msg.clone(),
            AppError::Network(e) => {
                tracing::error!("Network error: {e}");
                "No se pudo conectar con el servicio de evaluación.".to_string()
            }
            AppError::Service { status, message } => {
                tracing::error!("Service error {status}: {message}");
                "No se pudo calcular la evaluación.".to_string()
            }
            AppError::Decode(e) => {
                tracing::error!("Decode error: {e}");
                "La respuesta del servicio no es válida.".to_string()
            }
            AppError::Render(e) => {
                tracing::error!("Render error: {e}");
                "No se pudo generar el documento.".to_string()
            }
            AppError::Io(e) => {
                tracing::error!("I/O error: {e}");
                "No se pudo guardar el documento.".to_string()
            }
        }
    }
}

impl From<ServiceError> for AppError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Http(e) => AppError::Network(e.to_string()),
            ServiceError::Api { status, message } => AppError::Service { status, message },
            ServiceError::Parse(e) => AppError::Decode(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_api_error_maps_to_service_variant() {
        let err: AppError = ServiceError::Api {
            status: 503,
            message: "down".to_string(),
        }
        .into();
        assert!(matches!(err, AppError::Service { status: 503, .. }));
        assert_eq!(err.code(), "SERVICE_ERROR");
    }

    #[test]
    fn test_parse_error_maps_to_decode_variant() {
        let parse = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: AppError = ServiceError::Parse(parse).into();
        assert_eq!(err.code(), "DECODE_ERROR");
    }

    #[test]
    fn test_invalid_input_message_is_passed_through() {
        let err = AppError::InvalidInput("Fecha de nacimiento inválida".to_string());
        assert_eq!(err.user_message(), "Fecha de nacimiento inválida");
    }

    #[test]
    fn test_service_failure_uses_generic_message() {
        let err = AppError::Service {
            status: 500,
            message: "traceback".to_string(),
        };
        assert_eq!(err.user_message(), "No se pudo calcular la evaluación.");
    }
}
