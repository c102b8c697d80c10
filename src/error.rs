use thiserror::Error;

/// 草稿快照编解码错误
#[derive(Debug, Error)]
pub enum DraftCodecError {
    #[error("Snapshot is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Snapshot is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("Snapshot JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// 合同生成错误
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ContractError {
    #[error("Seleccione al menos un servicio.")]
    NothingSelected,

    #[error("Line index {0} out of range")]
    IndexOutOfRange(usize),
}
