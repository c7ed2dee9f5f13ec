use study_core::{ContentType, GenerationError, GenerationResult};

/// 响应校验: 模型可能"成功"返回但没有任何可用内容，这种结果绝不能以 200 交给客户端。
/// 只含空白字符同样视为空。非空时原样返回，不做任何修剪。
pub fn ensure_content(
    raw: String,
    content_type: ContentType,
) -> Result<GenerationResult, GenerationError> {
    if raw.trim().is_empty() {
        return Err(GenerationError::EmptyResult(content_type));
    }
    Ok(GenerationResult { text: raw })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_and_blank_output_are_rejected() {
        for raw in ["", " ", "\n\t "] {
            let err = ensure_content(raw.to_string(), ContentType::Quiz).unwrap_err();
            assert!(matches!(err, GenerationError::EmptyResult(ContentType::Quiz)));
        }
    }

    #[test]
    fn content_is_returned_unchanged() {
        let raw = "  • Plants convert light to energy\n".to_string();
        let result = ensure_content(raw.clone(), ContentType::Notes).unwrap();
        assert_eq!(result.text, raw);
    }
}
