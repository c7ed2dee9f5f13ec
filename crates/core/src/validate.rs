pub mod validate {
    /// 核心校验宏：如果条件为假，则返回格式化的 anyhow 错误
    #[macro_export]
    macro_rules! ensure_that {
        ($cond:expr, $($arg:tt)+) => {
            if !($cond) {
                return Err(::anyhow::anyhow!($($arg)+));
            }
        };
    }

    /// 校验字符串去掉空白后不为空 (String / &str / Option<String> 的 as_deref 结果)
    #[macro_export]
    macro_rules! ensure_not_blank {
        ($text:expr, $($arg:tt)+) => {
            if $text.trim().is_empty() {
                return Err(::anyhow::anyhow!($($arg)+));
            }
        };
    }
}

#[cfg(test)]
mod tests {
    fn check(secret: &str, port: u16) -> anyhow::Result<()> {
        crate::ensure_not_blank!(secret, "secret is blank");
        crate::ensure_that!(port > 0, "port must be positive, got {}", port);
        Ok(())
    }

    #[test]
    fn macros_short_circuit_with_message() {
        assert!(check("s3cret", 80).is_ok());
        assert_eq!(check("  ", 80).unwrap_err().to_string(), "secret is blank");
        assert_eq!(
            check("s3cret", 0).unwrap_err().to_string(),
            "port must be positive, got 0"
        );
    }
}
