use std::fmt;

#[derive(Debug, Clone)]
pub enum ShortgateError {
    // 领域错误：调用方可恢复，在传输边界映射为状态码
    Validation(String),
    Conflict(String),
    NotFound(String),
    Gone(String),
    Forbidden(String),
    ResourceExhausted(String),
    // 基础设施错误
    CacheConnection(String),
    Config(String),
    DatabaseConfig(String),
    DatabaseConnection(String),
    DatabaseOperation(String),
    Serialization(String),
}

impl ShortgateError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            ShortgateError::Validation(_) => "E001",
            ShortgateError::Conflict(_) => "E002",
            ShortgateError::NotFound(_) => "E003",
            ShortgateError::Gone(_) => "E004",
            ShortgateError::Forbidden(_) => "E005",
            ShortgateError::ResourceExhausted(_) => "E006",
            ShortgateError::CacheConnection(_) => "E101",
            ShortgateError::Config(_) => "E102",
            ShortgateError::DatabaseConfig(_) => "E103",
            ShortgateError::DatabaseConnection(_) => "E104",
            ShortgateError::DatabaseOperation(_) => "E105",
            ShortgateError::Serialization(_) => "E106",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            ShortgateError::Validation(_) => "Validation Error",
            ShortgateError::Conflict(_) => "Conflict",
            ShortgateError::NotFound(_) => "Resource Not Found",
            ShortgateError::Gone(_) => "Link Gone",
            ShortgateError::Forbidden(_) => "Forbidden",
            ShortgateError::ResourceExhausted(_) => "Resource Exhausted",
            ShortgateError::CacheConnection(_) => "Cache Connection Error",
            ShortgateError::Config(_) => "Configuration Error",
            ShortgateError::DatabaseConfig(_) => "Database Configuration Error",
            ShortgateError::DatabaseConnection(_) => "Database Connection Error",
            ShortgateError::DatabaseOperation(_) => "Database Operation Error",
            ShortgateError::Serialization(_) => "Serialization Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            ShortgateError::Validation(msg)
            | ShortgateError::Conflict(msg)
            | ShortgateError::NotFound(msg)
            | ShortgateError::Gone(msg)
            | ShortgateError::Forbidden(msg)
            | ShortgateError::ResourceExhausted(msg)
            | ShortgateError::CacheConnection(msg)
            | ShortgateError::Config(msg)
            | ShortgateError::DatabaseConfig(msg)
            | ShortgateError::DatabaseConnection(msg)
            | ShortgateError::DatabaseOperation(msg)
            | ShortgateError::Serialization(msg) => msg,
        }
    }

    /// Transport status for this failure. Only the outer boundary should use this.
    pub fn http_status(&self) -> u16 {
        match self {
            ShortgateError::Validation(_) => 400,
            ShortgateError::Forbidden(_) => 403,
            ShortgateError::NotFound(_) => 404,
            ShortgateError::Conflict(_) => 409,
            ShortgateError::Gone(_) => 410,
            ShortgateError::ResourceExhausted(_) => 503,
            _ => 500,
        }
    }

    /// Whether the failure comes from the caller's input or state rather than infrastructure
    pub fn is_domain_error(&self) -> bool {
        matches!(
            self,
            ShortgateError::Validation(_)
                | ShortgateError::Conflict(_)
                | ShortgateError::NotFound(_)
                | ShortgateError::Gone(_)
                | ShortgateError::Forbidden(_)
                | ShortgateError::ResourceExhausted(_)
        )
    }

    /// 格式化为彩色输出
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for ShortgateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for ShortgateError {}

// 便捷的构造函数
impl ShortgateError {
    pub fn validation<T: Into<String>>(msg: T) -> Self {
        ShortgateError::Validation(msg.into())
    }

    pub fn conflict<T: Into<String>>(msg: T) -> Self {
        ShortgateError::Conflict(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        ShortgateError::NotFound(msg.into())
    }

    pub fn gone<T: Into<String>>(msg: T) -> Self {
        ShortgateError::Gone(msg.into())
    }

    pub fn forbidden<T: Into<String>>(msg: T) -> Self {
        ShortgateError::Forbidden(msg.into())
    }

    pub fn resource_exhausted<T: Into<String>>(msg: T) -> Self {
        ShortgateError::ResourceExhausted(msg.into())
    }

    pub fn cache_connection<T: Into<String>>(msg: T) -> Self {
        ShortgateError::CacheConnection(msg.into())
    }

    pub fn config<T: Into<String>>(msg: T) -> Self {
        ShortgateError::Config(msg.into())
    }

    pub fn database_config<T: Into<String>>(msg: T) -> Self {
        ShortgateError::DatabaseConfig(msg.into())
    }

    pub fn database_connection<T: Into<String>>(msg: T) -> Self {
        ShortgateError::DatabaseConnection(msg.into())
    }

    pub fn database_operation<T: Into<String>>(msg: T) -> Self {
        ShortgateError::DatabaseOperation(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        ShortgateError::Serialization(msg.into())
    }
}

// 唯一约束冲突必须表现为 Conflict，而不是泛化的数据库错误
impl From<sea_orm::DbErr> for ShortgateError {
    fn from(err: sea_orm::DbErr) -> Self {
        match err.sql_err() {
            Some(sea_orm::SqlErr::UniqueConstraintViolation(msg)) => ShortgateError::Conflict(msg),
            _ => ShortgateError::DatabaseOperation(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for ShortgateError {
    fn from(err: serde_json::Error) -> Self {
        ShortgateError::Serialization(err.to_string())
    }
}

impl From<redis::RedisError> for ShortgateError {
    fn from(err: redis::RedisError) -> Self {
        ShortgateError::CacheConnection(err.to_string())
    }
}

impl From<std::io::Error> for ShortgateError {
    fn from(err: std::io::Error) -> Self {
        ShortgateError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ShortgateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_status_mapping() {
        assert_eq!(ShortgateError::validation("x").http_status(), 400);
        assert_eq!(ShortgateError::forbidden("x").http_status(), 403);
        assert_eq!(ShortgateError::not_found("x").http_status(), 404);
        assert_eq!(ShortgateError::conflict("x").http_status(), 409);
        assert_eq!(ShortgateError::gone("x").http_status(), 410);
        assert_eq!(ShortgateError::resource_exhausted("x").http_status(), 503);
        assert_eq!(ShortgateError::database_operation("x").http_status(), 500);
    }

    #[test]
    fn test_is_domain_error() {
        assert!(ShortgateError::gone("expired").is_domain_error());
        assert!(!ShortgateError::cache_connection("down").is_domain_error());
    }

    #[test]
    fn test_format_simple() {
        let err = ShortgateError::not_found("Link 'abc' not found");
        assert_eq!(err.format_simple(), "Resource Not Found: Link 'abc' not found");
        assert_eq!(err.to_string(), err.format_simple());
    }

    #[test]
    fn test_generic_db_error_is_database_operation() {
        let err: ShortgateError = sea_orm::DbErr::Custom("boom".to_string()).into();
        assert!(matches!(err, ShortgateError::DatabaseOperation(_)));
    }
}
